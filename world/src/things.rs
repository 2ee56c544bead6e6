//! Authoritative thing state management utilities.

use std::collections::BTreeMap;

use cellwise_core::{BuildTraits, Cell, MapBounds, Rotation, ThingId, ThingKind, ThingSnapshot};

/// Description of a thing to place while seeding a world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThingSeed {
    /// Human readable name announced to the player.
    pub label: String,
    /// Category of the thing.
    pub kind: ThingKind,
    /// Structural traits of the thing.
    pub traits: BuildTraits,
}

impl ThingSeed {
    fn new(label: impl Into<String>, kind: ThingKind, traits: BuildTraits) -> Self {
        Self {
            label: label.into(),
            kind,
            traits,
        }
    }

    /// Natural rock that fills the cell.
    #[must_use]
    pub fn rock(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::NaturalRock, BuildTraits::SOLID)
    }

    /// A finished wall.
    #[must_use]
    pub fn wall(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Building, BuildTraits::WALL)
    }

    /// A finished building that does not block movement.
    #[must_use]
    pub fn furniture(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Building, BuildTraits::OPEN)
    }

    /// A wall that has been planned but not started.
    #[must_use]
    pub fn wall_blueprint(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Blueprint, BuildTraits::WALL)
    }

    /// A tree.
    #[must_use]
    pub fn tree(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Tree, BuildTraits::OPEN)
    }

    /// Low vegetation.
    #[must_use]
    pub fn plant(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Plant, BuildTraits::OPEN)
    }

    /// A loose item.
    #[must_use]
    pub fn item(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Item, BuildTraits::OPEN)
    }

    /// A colonist.
    #[must_use]
    pub fn colonist(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Pawn { wild: false }, BuildTraits::OPEN)
    }

    /// A wild animal.
    #[must_use]
    pub fn animal(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Pawn { wild: true }, BuildTraits::OPEN)
    }

    /// Floor grime.
    #[must_use]
    pub fn filth(label: impl Into<String>) -> Self {
        Self::new(label, ThingKind::Filth, BuildTraits::OPEN)
    }
}

/// Snapshot of a thing stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct ThingState {
    pub(crate) id: ThingId,
    pub(crate) label: String,
    pub(crate) kind: ThingKind,
    pub(crate) cell: Cell,
    pub(crate) traits: BuildTraits,
    pub(crate) rotation: Rotation,
}

impl ThingState {
    pub(crate) fn snapshot(&self) -> ThingSnapshot {
        ThingSnapshot {
            id: self.id,
            label: self.label.clone(),
            kind: self.kind,
            cell: self.cell,
            traits: self.traits,
        }
    }
}

/// Registry that stores things, indexes them by cell and allocates identifiers.
#[derive(Debug)]
pub(crate) struct ThingRegistry {
    bounds: MapBounds,
    entries: BTreeMap<ThingId, ThingState>,
    by_cell: Vec<Vec<ThingId>>,
    next_thing_id: u32,
}

impl ThingRegistry {
    /// Creates an empty registry covering the provided bounds.
    pub(crate) fn new(bounds: MapBounds) -> Self {
        let capacity = usize::try_from(bounds.area()).unwrap_or(0);
        Self {
            bounds,
            entries: BTreeMap::new(),
            by_cell: vec![Vec::new(); capacity],
            next_thing_id: 0,
        }
    }

    /// Stores a new thing at the cell and returns its identifier.
    pub(crate) fn insert(&mut self, seed: ThingSeed, cell: Cell, rotation: Rotation) -> Option<ThingId> {
        let index = self.bounds.index(cell)?;
        let id = ThingId::new(self.next_thing_id);
        self.next_thing_id = self.next_thing_id.saturating_add(1);
        self.by_cell[index].push(id);
        let _ = self.entries.insert(
            id,
            ThingState {
                id,
                label: seed.label,
                kind: seed.kind,
                cell,
                traits: seed.traits,
                rotation,
            },
        );
        Some(id)
    }

    /// Removes a thing, returning its final state.
    pub(crate) fn remove(&mut self, id: ThingId) -> Option<ThingState> {
        let state = self.entries.remove(&id)?;
        if let Some(index) = self.bounds.index(state.cell) {
            self.by_cell[index].retain(|entry| *entry != id);
        }
        Some(state)
    }

    pub(crate) fn get(&self, id: ThingId) -> Option<&ThingState> {
        self.entries.get(&id)
    }

    /// Things standing on the cell in insertion order.
    pub(crate) fn at(&self, cell: Cell) -> impl Iterator<Item = &ThingState> + '_ {
        self.bounds
            .index(cell)
            .map(|index| self.by_cell[index].as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.entries.get(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_and_allocates_sequential_ids() {
        let mut registry = ThingRegistry::new(MapBounds::new(4, 4));
        assert_eq!(registry.len(), 0);

        let first = registry.insert(ThingSeed::tree("oak tree"), Cell::new(1, 1), Rotation::North);
        let second = registry.insert(ThingSeed::item("steel"), Cell::new(1, 1), Rotation::North);

        assert_eq!(first, Some(ThingId::new(0)));
        assert_eq!(second, Some(ThingId::new(1)));
        assert_eq!(registry.at(Cell::new(1, 1)).count(), 2);
    }

    #[test]
    fn insert_outside_bounds_is_refused() {
        let mut registry = ThingRegistry::new(MapBounds::new(2, 2));
        assert!(registry
            .insert(ThingSeed::rock("granite"), Cell::new(5, 0), Rotation::North)
            .is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn remove_clears_cell_index() {
        let mut registry = ThingRegistry::new(MapBounds::new(3, 3));
        let id = registry
            .insert(ThingSeed::wall("granite wall"), Cell::new(2, 2), Rotation::North)
            .expect("in bounds");

        let removed = registry.remove(id).expect("present");
        assert_eq!(removed.label, "granite wall");
        assert_eq!(registry.at(Cell::new(2, 2)).count(), 0);
        assert!(registry.remove(id).is_none());
    }
}
