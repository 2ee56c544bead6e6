use cellwise_core::{Command, HostMap, MapView, ThingId};
use tracing::debug;

use crate::{submit, UndoReport, UndoTracker};

/// Tracks blueprints created by each placement.
///
/// Creations are recorded inline while the placement runs rather than found
/// by diffing, so the before/after captures only open and close the segment.
#[derive(Clone, Debug, Default)]
pub struct BuildTracker {
    pending: Vec<ThingId>,
    segments: Vec<Vec<ThingId>>,
}

impl BuildTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a thing created by the placement in progress.
    pub fn record_created(&mut self, thing: ThingId) {
        self.pending.push(thing);
    }
}

impl UndoTracker for BuildTracker {
    fn capture_before_state<M>(&mut self, _map: &M)
    where
        M: MapView + ?Sized,
    {
        self.pending.clear();
    }

    fn capture_after_state<M>(&mut self, _map: &M)
    where
        M: MapView + ?Sized,
    {
    }

    fn add_segment(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        debug!(things = self.pending.len(), "build segment recorded");
        self.segments.push(std::mem::take(&mut self.pending));
        true
    }

    fn undo_last_segment<H>(&mut self, host: &mut H) -> Option<UndoReport>
    where
        H: HostMap + ?Sized,
    {
        let things = self.segments.pop()?;
        let mut report = UndoReport {
            segments: 1,
            ..UndoReport::default()
        };
        for thing in things.into_iter().rev() {
            if host.thing(thing).is_some() && submit(host, Command::DestroyThing { thing }) {
                report.reverted += 1;
            } else {
                report.already_gone += 1;
            }
        }
        Some(report)
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.segments.clear();
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }
}
