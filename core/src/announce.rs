//! Speech output contract.

use serde::{Deserialize, Serialize};

/// Urgency attached to a spoken line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    /// Incidental feedback that may be interrupted, such as live dimensions.
    Low,
    /// Regular feedback.
    #[default]
    Normal,
    /// Failures the player must hear.
    High,
}

/// Text-to-speech sink. Calls are fire-and-forget.
pub trait Announcer {
    /// Queues `text` for speech at the provided priority.
    fn speak(&mut self, text: &str, priority: Priority);
}

/// A line captured by [`RecordingAnnouncer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpokenLine {
    /// Text that was spoken.
    pub text: String,
    /// Priority the text was spoken at.
    pub priority: Priority,
}

/// Announcer that keeps every line in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingAnnouncer {
    lines: Vec<SpokenLine>,
}

impl RecordingAnnouncer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line spoken so far, oldest first.
    #[must_use]
    pub fn lines(&self) -> &[SpokenLine] {
        &self.lines
    }

    /// The most recently spoken line.
    #[must_use]
    pub fn last(&self) -> Option<&SpokenLine> {
        self.lines.last()
    }

    /// Text of the most recently spoken line.
    #[must_use]
    pub fn last_text(&self) -> Option<&str> {
        self.lines.last().map(|line| line.text.as_str())
    }

    /// Drains the captured lines.
    pub fn take(&mut self) -> Vec<SpokenLine> {
        std::mem::take(&mut self.lines)
    }

    /// Reports whether any captured line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text.contains(needle))
    }
}

impl Announcer for RecordingAnnouncer {
    fn speak(&mut self, text: &str, priority: Priority) {
        self.lines.push(SpokenLine {
            text: text.to_owned(),
            priority,
        });
    }
}
