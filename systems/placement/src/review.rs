//! Post-placement review: stepping through what blocked a confirmed placement.

use std::collections::BTreeSet;

use cellwise_core::{Announcer, Cell, Enclosure, MapView, PlacementResult, Priority, ScannerItem};
use cellwise_system_announcement::obstacle_announcement;
use cellwise_system_obstacles::find_obstacles;

/// Review state entered after a confirmed two-corner placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewSession {
    result: PlacementResult,
    enclosures: Vec<Enclosure>,
    obstacles: Vec<ScannerItem>,
    position: Option<usize>,
}

impl ReviewSession {
    /// Collects the obstacles of `result` and of any sealed rooms, nearest to
    /// `cursor` first.
    ///
    /// Blocked cells without a blocking thing (terrain, zones, the map edge)
    /// are listed as bare cells labelled with the blocking reason.
    pub fn new<M>(map: &M, result: PlacementResult, enclosures: Vec<Enclosure>, cursor: Cell) -> Self
    where
        M: MapView + ?Sized,
    {
        let blocked: Vec<Cell> = result.obstacle_cells().collect();
        let mut obstacles = find_obstacles(map, &blocked, cursor);

        let covered: BTreeSet<Cell> = obstacles.iter().map(|item| item.cell).collect();
        obstacles.extend(
            result
                .blocked()
                .iter()
                .filter(|blocked| !covered.contains(&blocked.cell))
                .map(|blocked| ScannerItem {
                    label: blocked.reason.clone(),
                    cell: blocked.cell,
                    thing: None,
                    distance: blocked.cell.distance(cursor),
                }),
        );

        let mut things: BTreeSet<_> = obstacles.iter().filter_map(|item| item.thing).collect();
        for item in enclosures.iter().flat_map(|room| room.obstacles.iter()) {
            if item.thing.map_or(true, |thing| things.insert(thing)) {
                obstacles.push(ScannerItem {
                    distance: item.cell.distance(cursor),
                    ..item.clone()
                });
            }
        }

        obstacles.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.cell.row_major_key().cmp(&b.cell.row_major_key()))
        });

        Self {
            result,
            enclosures,
            obstacles,
            position: None,
        }
    }

    /// Placement being reviewed.
    #[must_use]
    pub const fn result(&self) -> &PlacementResult {
        &self.result
    }

    /// Rooms the placement sealed.
    #[must_use]
    pub fn enclosures(&self) -> &[Enclosure] {
        &self.enclosures
    }

    /// Navigable obstacles, nearest first.
    #[must_use]
    pub fn obstacles(&self) -> &[ScannerItem] {
        &self.obstacles
    }

    /// Obstacle last stepped onto.
    #[must_use]
    pub fn current(&self) -> Option<&ScannerItem> {
        self.obstacles.get(self.position?)
    }

    /// Steps to the next obstacle, wrapping around, and announces it.
    pub fn next_obstacle(&mut self, announcer: &mut dyn Announcer) -> Option<&ScannerItem> {
        let total = self.obstacles.len();
        let next = match self.position {
            _ if total == 0 => None,
            Some(index) => Some((index + 1) % total),
            None => Some(0),
        };
        self.step_to(next, announcer)
    }

    /// Steps to the previous obstacle, wrapping around, and announces it.
    pub fn previous_obstacle(&mut self, announcer: &mut dyn Announcer) -> Option<&ScannerItem> {
        let total = self.obstacles.len();
        let previous = match self.position {
            _ if total == 0 => None,
            Some(index) => Some((index + total - 1) % total),
            None => Some(total - 1),
        };
        self.step_to(previous, announcer)
    }

    fn step_to(
        &mut self,
        index: Option<usize>,
        announcer: &mut dyn Announcer,
    ) -> Option<&ScannerItem> {
        let Some(index) = index else {
            announcer.speak("No obstacles.", Priority::Normal);
            return None;
        };
        self.position = Some(index);
        let item = self.obstacles.get(index)?;
        announcer.speak(
            &obstacle_announcement(item, index, self.obstacles.len()),
            Priority::Normal,
        );
        Some(item)
    }
}
