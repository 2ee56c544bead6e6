//! Value objects produced by a confirmed placement and by post-placement scans.

use serde::{Deserialize, Serialize};

use crate::{grid::Cell, things::ThingId};

/// A cell that could not be designated, with the spoken reason.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockedCell {
    /// Cell that was refused.
    pub cell: Cell,
    /// Short label of whatever blocked the cell, e.g. `granite`.
    pub reason: String,
}

/// Outcome of one confirmed placement.
///
/// Every attempted cell ends up either in the placed list or in the blocked
/// list, so `placed_count() + obstacle_count() == attempted_count()` always
/// holds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    placed_cells: Vec<Cell>,
    blocked: Vec<BlockedCell>,
    total_cost: u32,
    resource_label: Option<String>,
    created_things: Vec<ThingId>,
}

impl PlacementResult {
    /// Assembles a result from its parts.
    #[must_use]
    pub fn new(
        placed_cells: Vec<Cell>,
        blocked: Vec<BlockedCell>,
        total_cost: u32,
        resource_label: Option<String>,
        created_things: Vec<ThingId>,
    ) -> Self {
        Self {
            placed_cells,
            blocked,
            total_cost,
            resource_label,
            created_things,
        }
    }

    /// Result describing an operation that touched nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Cells that were designated, in placement order.
    #[must_use]
    pub fn placed_cells(&self) -> &[Cell] {
        &self.placed_cells
    }

    /// Cells that were refused, with reasons.
    #[must_use]
    pub fn blocked(&self) -> &[BlockedCell] {
        &self.blocked
    }

    /// Cells that were refused.
    pub fn obstacle_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocked.iter().map(|blocked| blocked.cell)
    }

    /// Number of designated cells.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.placed_cells.len()
    }

    /// Number of refused cells.
    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.blocked.len()
    }

    /// Number of cells the operation tried to designate.
    #[must_use]
    pub fn attempted_count(&self) -> usize {
        self.placed_count() + self.obstacle_count()
    }

    /// Total material cost of the placed cells.
    #[must_use]
    pub const fn total_cost(&self) -> u32 {
        self.total_cost
    }

    /// Name of the material the cost is expressed in.
    #[must_use]
    pub fn resource_label(&self) -> Option<&str> {
        self.resource_label.as_deref()
    }

    /// Things created by the operation, for build placements.
    #[must_use]
    pub fn created_things(&self) -> &[ThingId] {
        &self.created_things
    }

    /// Reports whether the operation attempted no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attempted_count() == 0
    }
}

/// A navigable point of interest: a thing or a bare cell, with its distance
/// from the reference position used when the list was built.
#[derive(Clone, Debug, PartialEq)]
pub struct ScannerItem {
    /// Spoken label.
    pub label: String,
    /// Cell the item occupies.
    pub cell: Cell,
    /// Thing the item refers to, when it is not a bare cell.
    pub thing: Option<ThingId>,
    /// Distance from the reference position.
    pub distance: f32,
}

/// Region of passable cells fully bounded by wall-type cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enclosure {
    /// Interior cells in row-major order.
    pub interior_cells: Vec<Cell>,
    /// Obstacles standing inside the enclosure, nearest first.
    pub obstacles: Vec<ScannerItem>,
    /// Failed placements that would have sealed the perimeter.
    pub gap_cells: Vec<Cell>,
}

impl Enclosure {
    /// Number of interior cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.interior_cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_add_up_to_attempted_cells() {
        let result = PlacementResult::new(
            vec![Cell::new(0, 0), Cell::new(1, 0)],
            vec![BlockedCell {
                cell: Cell::new(2, 0),
                reason: "granite".to_owned(),
            }],
            10,
            Some("wood".to_owned()),
            vec![ThingId::new(3), ThingId::new(4)],
        );

        assert_eq!(result.placed_count(), 2);
        assert_eq!(result.obstacle_count(), 1);
        assert_eq!(result.attempted_count(), 3);
        assert_eq!(result.obstacle_cells().collect::<Vec<_>>(), vec![Cell::new(2, 0)]);
    }

    #[test]
    fn placement_result_round_trips_through_bincode() {
        let result = PlacementResult::new(
            vec![Cell::new(5, 7)],
            Vec::new(),
            5,
            Some("steel".to_owned()),
            vec![ThingId::new(42)],
        );
        let bytes = bincode::serialize(&result).expect("serialize");
        let restored: PlacementResult = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, result);
    }
}
