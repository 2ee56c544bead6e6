use std::collections::{BTreeMap, BTreeSet};

use cellwise_core::{Cell, Command, HostMap, MapView, ZoneId};
use tracing::{debug, warn};

use crate::{submit, UndoReport, UndoTracker};

type ZoneCells = BTreeMap<ZoneId, BTreeSet<Cell>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct ZoneSegment {
    /// Zones whose cells changed, with the cells they held before.
    restore: Vec<(ZoneId, BTreeSet<Cell>)>,
    /// Zones that did not exist before the placement.
    spawned: Vec<ZoneId>,
    /// Zones the placement emptied and the host deleted.
    vanished: Vec<ZoneId>,
}

impl ZoneSegment {
    fn is_empty(&self) -> bool {
        self.restore.is_empty() && self.spawned.is_empty() && self.vanished.is_empty()
    }
}

/// Tracks zone cell sets across placements.
///
/// The tracker snapshots every zone on the map because the host contiguity
/// check may split the edited zone into new ones. Any zone present after the
/// placement but not before belongs to the segment and is deleted on undo.
#[derive(Clone, Debug, Default)]
pub struct ZoneTracker {
    before: Option<ZoneCells>,
    pending: Option<ZoneSegment>,
    segments: Vec<ZoneSegment>,
}

impl ZoneTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn all_zones<M>(map: &M) -> ZoneCells
where
    M: MapView + ?Sized,
{
    map.zone_ids()
        .into_iter()
        .filter_map(|id| map.zone(id).map(|zone| (id, zone.cells)))
        .collect()
}

impl UndoTracker for ZoneTracker {
    fn capture_before_state<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized,
    {
        self.pending = None;
        self.before = Some(all_zones(map));
    }

    fn capture_after_state<M>(&mut self, map: &M)
    where
        M: MapView + ?Sized,
    {
        let Some(before) = self.before.take() else {
            return;
        };
        let after = all_zones(map);

        let mut segment = ZoneSegment::default();
        for (zone, cells) in &before {
            match after.get(zone) {
                Some(now) if now != cells => segment.restore.push((*zone, cells.clone())),
                Some(_) => {}
                None => segment.vanished.push(*zone),
            }
        }
        segment.spawned = after
            .keys()
            .filter(|zone| !before.contains_key(*zone))
            .copied()
            .collect();

        self.pending = (!segment.is_empty()).then_some(segment);
    }

    fn add_segment(&mut self) -> bool {
        let Some(segment) = self.pending.take() else {
            return false;
        };
        debug!(
            changed = segment.restore.len(),
            spawned = segment.spawned.len(),
            "zone segment recorded"
        );
        self.segments.push(segment);
        true
    }

    fn undo_last_segment<H>(&mut self, host: &mut H) -> Option<UndoReport>
    where
        H: HostMap + ?Sized,
    {
        let segment = self.segments.pop()?;
        let mut report = UndoReport {
            segments: 1,
            ..UndoReport::default()
        };

        let mut affected = BTreeSet::new();
        for zone in &segment.spawned {
            if let Some(snapshot) = host.zone(*zone) {
                affected.extend(snapshot.cells);
            }
        }
        for (zone, original) in &segment.restore {
            affected.extend(original.iter().copied());
            if let Some(snapshot) = host.zone(*zone) {
                affected.extend(snapshot.cells);
            }
        }
        let owners: Vec<(Cell, Option<ZoneId>)> = affected
            .into_iter()
            .map(|cell| (cell, host.zone_at(cell)))
            .collect();

        for zone in segment.spawned.into_iter().rev() {
            if host.zone(zone).is_some() && submit(host, Command::DeleteZone { zone }) {
                report.zones_removed += 1;
            } else {
                report.already_gone += 1;
            }
        }

        // Restoration never asks for a contiguity check: the original cells
        // are put back exactly, even if that leaves the zone disconnected.
        for (zone, original) in segment.restore {
            let Some(current) = host.zone(zone) else {
                warn!(zone = zone.get(), "zone vanished before undo; dropping it");
                report.already_gone += 1;
                continue;
            };
            let extra: Vec<Cell> = current.cells.difference(&original).copied().collect();
            let missing: Vec<Cell> = original.difference(&current.cells).copied().collect();
            if !extra.is_empty() {
                let _ = submit(host, Command::RemoveZoneCells { zone, cells: extra });
            }
            if !missing.is_empty() {
                let _ = submit(host, Command::AddZoneCells { zone, cells: missing });
            }
        }

        for zone in segment.vanished {
            warn!(
                zone = zone.get(),
                "zone was emptied and deleted by the host; it cannot be restored"
            );
            report.already_gone += 1;
        }

        report.reverted = owners
            .iter()
            .filter(|(cell, owner)| host.zone_at(*cell) != *owner)
            .count();
        Some(report)
    }

    fn clear(&mut self) {
        self.before = None;
        self.pending = None;
        self.segments.clear();
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }
}
