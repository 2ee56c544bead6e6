#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flood-fill detection of rooms sealed by freshly placed walls.
//!
//! After a wall-type batch placement the detector seeds a fill from every
//! passable cell next to a placed wall. A fill that reaches the map edge or
//! grows past the cell cap is open ground; anything else is an [`Enclosure`]
//! reported with its interior obstacles and the failed placements that sit in
//! its perimeter.

use std::collections::{BTreeSet, VecDeque};

use cellwise_core::{
    Cell, Enclosure, MapView, Settings, ThingId, ThingSnapshot, DEFAULT_ENCLOSURE_CELL_CAP,
};
use cellwise_system_obstacles::find_obstacles;
use tracing::debug;

/// Reports whether the thing is, or will become, a wall-type structure.
#[must_use]
pub fn is_wall_like(thing: &ThingSnapshot) -> bool {
    thing.kind.is_structure() && (thing.traits.is_wall || thing.traits.impassable)
}

/// Detects enclosures with the default cell cap.
pub fn detect_enclosures<M>(map: &M, placed: &[ThingId], failed: &[Cell]) -> Vec<Enclosure>
where
    M: MapView + ?Sized,
{
    EnclosureDetector::default().detect(map, placed, failed)
}

/// Enclosure detector bounded by a maximum region size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnclosureDetector {
    cell_cap: usize,
}

impl Default for EnclosureDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ENCLOSURE_CELL_CAP)
    }
}

impl EnclosureDetector {
    /// Creates a detector that treats regions larger than `cell_cap` as open.
    #[must_use]
    pub const fn new(cell_cap: usize) -> Self {
        Self { cell_cap }
    }

    /// Creates a detector using the configured cell cap.
    #[must_use]
    pub const fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.enclosure_cell_cap)
    }

    /// Largest region the detector accepts as an enclosure.
    #[must_use]
    pub const fn cell_cap(&self) -> usize {
        self.cell_cap
    }

    /// Finds every region sealed by the placed things.
    ///
    /// `placed` lists the things created by the placement; anything that is
    /// not wall-like is ignored. `failed` lists cells where placement was
    /// refused and is only used to report perimeter gaps.
    pub fn detect<M>(&self, map: &M, placed: &[ThingId], failed: &[Cell]) -> Vec<Enclosure>
    where
        M: MapView + ?Sized,
    {
        let walls: BTreeSet<Cell> = placed
            .iter()
            .filter_map(|id| map.thing(*id))
            .filter(is_wall_like)
            .map(|thing| thing.cell)
            .collect();
        if walls.is_empty() {
            return Vec::new();
        }

        let fill = Fill {
            map,
            walls: &walls,
            cell_cap: self.cell_cap,
        };

        let mut processed = BTreeSet::new();
        let mut enclosures = Vec::new();
        for wall in &walls {
            for candidate in wall.cardinal_neighbors() {
                if processed.contains(&candidate) || !map.in_bounds(candidate) {
                    continue;
                }
                if fill.is_barrier(candidate) {
                    continue;
                }
                if let Some(mut interior) = fill.region_from(candidate, &mut processed) {
                    interior.sort_by_key(|cell| cell.row_major_key());
                    enclosures.push(fill.describe(interior, failed));
                }
            }
        }

        debug!(
            walls = walls.len(),
            enclosures = enclosures.len(),
            "enclosure scan finished"
        );
        enclosures
    }
}

struct Fill<'a, M: ?Sized> {
    map: &'a M,
    walls: &'a BTreeSet<Cell>,
    cell_cap: usize,
}

impl<M> Fill<'_, M>
where
    M: MapView + ?Sized,
{
    fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell) || self.map.things_at(cell).iter().any(is_wall_like)
    }

    fn is_barrier(&self, cell: Cell) -> bool {
        self.is_wall(cell) || self.map.is_impassable(cell)
    }

    /// Flood fills from `seed`, returning the region when it is sealed.
    fn region_from(&self, seed: Cell, processed: &mut BTreeSet<Cell>) -> Option<Vec<Cell>> {
        let bounds = self.map.bounds();
        let mut region = Vec::new();
        let mut open = false;
        let mut queue = VecDeque::from([seed]);
        let _ = processed.insert(seed);

        while let Some(cell) = queue.pop_front() {
            region.push(cell);
            if bounds.is_edge(cell) {
                open = true;
            }
            if region.len() > self.cell_cap {
                open = true;
                break;
            }
            for neighbor in cell.cardinal_neighbors() {
                if !bounds.contains(neighbor) || processed.contains(&neighbor) {
                    continue;
                }
                if self.is_barrier(neighbor) {
                    continue;
                }
                let _ = processed.insert(neighbor);
                queue.push_back(neighbor);
            }
        }

        (!open).then_some(region)
    }

    fn describe(&self, interior_cells: Vec<Cell>, failed: &[Cell]) -> Enclosure {
        let interior: BTreeSet<Cell> = interior_cells.iter().copied().collect();
        let reference = interior_cells.first().copied().unwrap_or_default();
        let obstacles = find_obstacles(self.map, &interior_cells, reference);

        let mut gap_cells = Vec::new();
        for cell in failed {
            if interior.contains(cell) || gap_cells.contains(cell) {
                continue;
            }
            let neighbors = cell.cardinal_neighbors();
            let adjacent_walls = neighbors.iter().filter(|n| self.is_wall(**n)).count();
            let touches_interior = neighbors.iter().any(|n| interior.contains(n));

            if adjacent_walls >= 2 || (adjacent_walls >= 1 && touches_interior) {
                gap_cells.push(*cell);
            }
        }

        Enclosure {
            interior_cells,
            obstacles,
            gap_cells,
        }
    }
}
