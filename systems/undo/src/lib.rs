#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Segment-based undo for confirmed placements.
//!
//! Every confirmed placement becomes one segment on a LIFO stack. A tracker
//! snapshots the relevant host state right before the placement mutates the
//! map, diffs it right after, and commits the difference as a segment. Undoing
//! a segment restores exactly the state captured before it, leaving earlier and
//! later segments alone. Things, zones and designations that vanished in the
//! meantime count as already undone.
//!
//! Three trackers cover the three kinds of placement:
//!
//! * [`BuildTracker`] records created blueprints inline and destroys them.
//! * [`ZoneTracker`] diffs every zone on the map so that zones spawned by the
//!   host's contiguity check are found and removed.
//! * [`OrderTracker`] diffs the set of live designations, since thing-anchored
//!   orders follow their thing rather than a cell.

use cellwise_core::{first_rejection, Command, HostMap, MapView, ThingId};

mod build;
mod orders;
mod zones;

pub use build::BuildTracker;
pub use orders::OrderTracker;
pub use zones::ZoneTracker;

/// Summary of what an undo actually reverted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UndoReport {
    /// Things destroyed, designations removed or zone cells restored.
    pub reverted: usize,
    /// Items that had already disappeared before the undo ran.
    pub already_gone: usize,
    /// Zones created by the undone segment and deleted by the undo.
    pub zones_removed: usize,
    /// Segments rolled back.
    pub segments: usize,
}

impl UndoReport {
    /// Adds the counts of `other` to this report.
    pub fn absorb(&mut self, other: Self) {
        self.reverted += other.reverted;
        self.already_gone += other.already_gone;
        self.zones_removed += other.zones_removed;
        self.segments += other.segments;
    }
}

/// Snapshot-and-restore protocol shared by every tracker.
pub trait UndoTracker {
    /// Snapshots host state right before a placement mutates the map.
    fn capture_before_state<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized;

    /// Diffs host state right after the placement finished.
    fn capture_after_state<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized;

    /// Commits the captured difference as a segment.
    ///
    /// Returns `false` and pushes nothing when the placement changed nothing.
    fn add_segment(&mut self) -> bool;

    /// Reverts the most recent segment, or returns `None` when the stack is empty.
    fn undo_last_segment<H>(&mut self, host: &mut H) -> Option<UndoReport>
    where
        H: HostMap + ?Sized;

    /// Reverts every segment, newest first.
    fn undo_all<H>(&mut self, host: &mut H) -> UndoReport
    where
        H: HostMap + ?Sized,
    {
        let mut report = UndoReport::default();
        while let Some(step) = self.undo_last_segment(host) {
            report.absorb(step);
        }
        report
    }

    /// Discards every segment and any pending capture.
    fn clear(&mut self);

    /// Number of segments on the stack.
    fn segment_count(&self) -> usize;
}

/// Which tracker a ledger uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgerKind {
    /// Blueprint placement.
    Build,
    /// Zone expansion or deletion.
    Zone,
    /// Cell or thing orders.
    Order,
}

/// Undo stack for one placement session, dispatching to the matching tracker.
#[derive(Clone, Debug)]
pub enum UndoLedger {
    /// Tracks created blueprints.
    Build(BuildTracker),
    /// Tracks zone cell sets.
    Zone(ZoneTracker),
    /// Tracks designations.
    Order(OrderTracker),
}

impl UndoLedger {
    /// Creates an empty ledger of the requested kind.
    #[must_use]
    pub fn new(kind: LedgerKind) -> Self {
        match kind {
            LedgerKind::Build => Self::Build(BuildTracker::new()),
            LedgerKind::Zone => Self::Zone(ZoneTracker::new()),
            LedgerKind::Order => Self::Order(OrderTracker::new()),
        }
    }

    /// Kind of tracker in use.
    #[must_use]
    pub const fn kind(&self) -> LedgerKind {
        match self {
            Self::Build(_) => LedgerKind::Build,
            Self::Zone(_) => LedgerKind::Zone,
            Self::Order(_) => LedgerKind::Order,
        }
    }

    /// Records a thing created by the placement in progress.
    ///
    /// Only build ledgers track creations inline; other ledgers ignore this.
    pub fn record_created(&mut self, thing: ThingId) {
        if let Self::Build(tracker) = self {
            tracker.record_created(thing);
        }
    }
}

impl UndoTracker for UndoLedger {
    fn capture_before_state<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized,
    {
        match self {
            Self::Build(tracker) => tracker.capture_before_state(map),
            Self::Zone(tracker) => tracker.capture_before_state(map),
            Self::Order(tracker) => tracker.capture_before_state(map),
        }
    }

    fn capture_after_state<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized,
    {
        match self {
            Self::Build(tracker) => tracker.capture_after_state(map),
            Self::Zone(tracker) => tracker.capture_after_state(map),
            Self::Order(tracker) => tracker.capture_after_state(map),
        }
    }

    fn add_segment(&mut self) -> bool {
        match self {
            Self::Build(tracker) => tracker.add_segment(),
            Self::Zone(tracker) => tracker.add_segment(),
            Self::Order(tracker) => tracker.add_segment(),
        }
    }

    fn undo_last_segment<H>(&mut self, host: &mut H) -> Option<UndoReport>
    where
        H: HostMap + ?Sized,
    {
        match self {
            Self::Build(tracker) => tracker.undo_last_segment(host),
            Self::Zone(tracker) => tracker.undo_last_segment(host),
            Self::Order(tracker) => tracker.undo_last_segment(host),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Build(tracker) => tracker.clear(),
            Self::Zone(tracker) => tracker.clear(),
            Self::Order(tracker) => tracker.clear(),
        }
    }

    fn segment_count(&self) -> usize {
        match self {
            Self::Build(tracker) => tracker.segment_count(),
            Self::Zone(tracker) => tracker.segment_count(),
            Self::Order(tracker) => tracker.segment_count(),
        }
    }
}

/// Applies a command, reporting whether the host accepted it.
fn submit<H>(host: &mut H, command: Command) -> bool
where
    H: HostMap + ?Sized,
{
    let mut events = Vec::new();
    host.apply(command, &mut events);
    first_rejection(&events).is_none()
}
