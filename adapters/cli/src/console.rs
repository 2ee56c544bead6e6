//! Announcer that prints spoken lines to standard output.

use std::io::{self, Write};

use cellwise_core::{Announcer, Priority};
use tracing::warn;

/// Prints each spoken line prefixed by its priority.
#[derive(Debug)]
pub(crate) struct ConsoleAnnouncer<W> {
    out: W,
    minimum: Priority,
    spoken: usize,
}

impl ConsoleAnnouncer<io::Stdout> {
    /// Writes to standard output, dropping lines below `minimum`.
    pub(crate) fn stdout(minimum: Priority) -> Self {
        Self::new(io::stdout(), minimum)
    }
}

impl<W: Write> ConsoleAnnouncer<W> {
    pub(crate) fn new(out: W, minimum: Priority) -> Self {
        Self {
            out,
            minimum,
            spoken: 0,
        }
    }

    /// Lines written so far.
    pub(crate) const fn spoken(&self) -> usize {
        self.spoken
    }
}

impl<W: Write> Announcer for ConsoleAnnouncer<W> {
    fn speak(&mut self, text: &str, priority: Priority) {
        if priority < self.minimum {
            return;
        }
        let marker = match priority {
            Priority::Low => "  ",
            Priority::Normal => "> ",
            Priority::High => "! ",
        };
        if let Err(error) = writeln!(self.out, "{marker}{text}") {
            warn!(%error, "failed to write announcement");
            return;
        }
        self.spoken += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_priority_and_marks_lines() {
        let mut announcer = ConsoleAnnouncer::new(Vec::new(), Priority::Normal);
        announcer.speak("3 by 1", Priority::Low);
        announcer.speak("Placed 3 wooden walls.", Priority::Normal);
        announcer.speak("No placement target.", Priority::High);

        assert_eq!(announcer.spoken(), 2);
        let text = String::from_utf8(announcer.out).expect("utf8");
        assert_eq!(text, "> Placed 3 wooden walls.\n! No placement target.\n");
    }
}
