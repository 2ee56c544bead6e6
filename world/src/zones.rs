//! Zone storage and the contiguity repair performed after zone edits.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use cellwise_core::{Cell, MapBounds, ZoneId, ZoneKind, ZoneSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct ZoneState {
    pub(crate) kind: ZoneKind,
    pub(crate) label: String,
    pub(crate) cells: BTreeSet<Cell>,
}

/// Outcome of a contiguity check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Contiguity {
    /// Every cell is connected; nothing changed.
    Intact,
    /// Disconnected parts were moved into new zones.
    Split(Vec<ZoneId>),
    /// The zone had no cells and was removed.
    Deleted,
}

/// Registry that stores zones, their per-cell ownership and label counters.
#[derive(Debug)]
pub(crate) struct ZoneRegistry {
    bounds: MapBounds,
    entries: BTreeMap<ZoneId, ZoneState>,
    owner: Vec<Option<ZoneId>>,
    next_zone_id: u32,
    labels_issued: BTreeMap<ZoneKind, u32>,
}

impl ZoneRegistry {
    pub(crate) fn new(bounds: MapBounds) -> Self {
        let capacity = usize::try_from(bounds.area()).unwrap_or(0);
        Self {
            bounds,
            entries: BTreeMap::new(),
            owner: vec![None; capacity],
            next_zone_id: 0,
            labels_issued: BTreeMap::new(),
        }
    }

    pub(crate) fn create(&mut self, kind: ZoneKind) -> ZoneId {
        let id = ZoneId::new(self.next_zone_id);
        self.next_zone_id = self.next_zone_id.saturating_add(1);
        let issued = self.labels_issued.entry(kind).or_insert(0);
        *issued = issued.saturating_add(1);
        let label = format!("{} {}", kind.label(), issued);
        let _ = self.entries.insert(
            id,
            ZoneState {
                kind,
                label,
                cells: BTreeSet::new(),
            },
        );
        id
    }

    pub(crate) fn get(&self, id: ZoneId) -> Option<&ZoneState> {
        self.entries.get(&id)
    }

    pub(crate) fn snapshot(&self, id: ZoneId) -> Option<ZoneSnapshot> {
        self.entries.get(&id).map(|state| ZoneSnapshot {
            id,
            kind: state.kind,
            label: state.label.clone(),
            cells: state.cells.clone(),
        })
    }

    pub(crate) fn ids(&self) -> Vec<ZoneId> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn owner_of(&self, cell: Cell) -> Option<ZoneId> {
        self.bounds
            .index(cell)
            .and_then(|index| self.owner.get(index).copied().flatten())
    }

    /// Assigns the cell to the zone. The caller has already validated the cell.
    pub(crate) fn assign(&mut self, id: ZoneId, cell: Cell) -> bool {
        let Some(index) = self.bounds.index(cell) else {
            return false;
        };
        let Some(state) = self.entries.get_mut(&id) else {
            return false;
        };
        if !state.cells.insert(cell) {
            return false;
        }
        self.owner[index] = Some(id);
        true
    }

    pub(crate) fn release(&mut self, id: ZoneId, cell: Cell) -> bool {
        let Some(state) = self.entries.get_mut(&id) else {
            return false;
        };
        if !state.cells.remove(&cell) {
            return false;
        }
        if let Some(index) = self.bounds.index(cell) {
            self.owner[index] = None;
        }
        true
    }

    pub(crate) fn delete(&mut self, id: ZoneId) -> Option<ZoneState> {
        let state = self.entries.remove(&id)?;
        for cell in &state.cells {
            if let Some(index) = self.bounds.index(*cell) {
                self.owner[index] = None;
            }
        }
        Some(state)
    }

    /// Keeps the largest connected part in the zone and moves every other part
    /// into a fresh zone of the same kind. Ties favour the part holding the
    /// first cell in row-major order. Empty zones are deleted.
    pub(crate) fn check_contiguity(&mut self, id: ZoneId) -> Option<Contiguity> {
        let state = self.entries.get(&id)?;
        if state.cells.is_empty() {
            let _ = self.delete(id);
            return Some(Contiguity::Deleted);
        }

        let kind = state.kind;
        let mut parts = connected_parts(&state.cells);
        if parts.len() <= 1 {
            return Some(Contiguity::Intact);
        }

        parts.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then_with(|| first_row_major(a).cmp(&first_row_major(b)))
        });

        let mut spawned = Vec::with_capacity(parts.len() - 1);
        for part in parts.into_iter().skip(1) {
            let new_zone = self.create(kind);
            for cell in part {
                let _ = self.release(id, cell);
                let _ = self.assign(new_zone, cell);
            }
            spawned.push(new_zone);
        }
        Some(Contiguity::Split(spawned))
    }
}

fn first_row_major(cells: &[Cell]) -> Option<(i32, i32)> {
    cells.iter().map(|cell| cell.row_major_key()).min()
}

fn connected_parts(cells: &BTreeSet<Cell>) -> Vec<Vec<Cell>> {
    let mut remaining = cells.clone();
    let mut parts = Vec::new();

    while let Some(seed) = remaining.pop_first() {
        let mut part = vec![seed];
        let mut queue = VecDeque::from([seed]);
        while let Some(cell) = queue.pop_front() {
            for neighbor in cell.cardinal_neighbors() {
                if remaining.remove(&neighbor) {
                    part.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        parts.push(part);
    }

    parts
}
