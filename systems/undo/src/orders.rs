use std::collections::BTreeSet;

use cellwise_core::{Command, DesignationId, HostMap, MapView};
use tracing::debug;

use crate::{submit, UndoReport, UndoTracker};

/// Tracks designations queued by each placement.
///
/// Thing-anchored orders follow their thing around the map, so new
/// designations are found by diffing the full set of live handles instead of
/// looking at the selected cells.
#[derive(Clone, Debug, Default)]
pub struct OrderTracker {
    before: Option<BTreeSet<DesignationId>>,
    pending: Vec<DesignationId>,
    segments: Vec<Vec<DesignationId>>,
}

impl OrderTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn live_designations<M>(map: &M) -> BTreeSet<DesignationId>
where
    M: MapView + ?Sized,
{
    map.designations()
        .into_iter()
        .map(|designation| designation.id)
        .collect()
}

impl UndoTracker for OrderTracker {
    fn capture_before_state<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized,
    {
        self.pending.clear();
        self.before = Some(live_designations(map));
    }

    fn capture_after_state<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized,
    {
        let Some(before) = self.before.take() else {
            return;
        };
        self.pending = live_designations(map).difference(&before).copied().collect();
    }

    fn add_segment(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        debug!(designations = self.pending.len(), "order segment recorded");
        self.segments.push(std::mem::take(&mut self.pending));
        true
    }

    fn undo_last_segment<H>(&mut self, host: &mut H) -> Option<UndoReport>
    where
        H: HostMap + ?Sized,
    {
        let designations = self.segments.pop()?;
        let mut report = UndoReport {
            segments: 1,
            ..UndoReport::default()
        };
        for designation in designations {
            if host.designation(designation).is_some()
                && submit(host, Command::RemoveDesignation { designation })
            {
                report.reverted += 1;
            } else {
                report.already_gone += 1;
            }
        }
        Some(report)
    }

    fn clear(&mut self) {
        self.before = None;
        self.pending.clear();
        self.segments.clear();
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }
}
