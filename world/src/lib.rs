#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative reference host for the Cellwise placement overlay.
//!
//! [`World`] is a self-contained grid map with terrain, things, zones and a
//! designation manager. It implements [`HostMap`] so the placement systems can
//! run against it exactly as they would against a game host.

use cellwise_core::{
    Cell, Command, CommandRejection, DesignationAnchor, DesignationId, DesignationSnapshot, Event,
    HostMap, MapBounds, MapView, TerrainKind, ThingId, ThingKind, ThingSnapshot, ZoneId, ZoneKind,
    ZoneSnapshot,
};
use tracing::debug;

mod designations;
mod layout;
mod things;
mod zones;

pub use layout::LayoutError;
pub use things::ThingSeed;

use designations::DesignationRegistry;
use things::ThingRegistry;
use zones::{Contiguity, ZoneRegistry};

/// Represents the authoritative world state of a single map.
#[derive(Debug)]
pub struct World {
    bounds: MapBounds,
    terrain: Vec<TerrainKind>,
    things: ThingRegistry,
    zones: ZoneRegistry,
    designations: DesignationRegistry,
}

impl World {
    /// Creates an empty soil map of the provided size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_bounds(MapBounds::new(width, height))
    }

    /// Creates an empty soil map with the provided bounds.
    #[must_use]
    pub fn with_bounds(bounds: MapBounds) -> Self {
        let capacity = usize::try_from(bounds.area()).unwrap_or(0);
        Self {
            bounds,
            terrain: vec![TerrainKind::Soil; capacity],
            things: ThingRegistry::new(bounds),
            zones: ZoneRegistry::new(bounds),
            designations: DesignationRegistry::new(),
        }
    }

    /// Builds a world from an ASCII layout. See the `layout` module for glyphs.
    pub fn from_layout(text: &str) -> Result<Self, LayoutError> {
        layout::parse(text)
    }

    /// Replaces the terrain of a cell. Cells outside the map are ignored.
    pub fn set_terrain(&mut self, cell: Cell, terrain: TerrainKind) {
        if let Some(index) = self.bounds.index(cell) {
            self.terrain[index] = terrain;
        }
    }

    /// Places a thing while seeding the map, bypassing placement rules.
    pub fn spawn_thing(&mut self, seed: ThingSeed, cell: Cell) -> Option<ThingId> {
        self.things.insert(seed, cell, Default::default())
    }

    /// Creates a zone over the provided cells while seeding the map.
    ///
    /// Disconnected cells end up in separate zones, exactly as if the zone had
    /// been painted and then checked for contiguity.
    pub fn seed_zone(&mut self, kind: ZoneKind, cells: &[Cell]) -> Option<ZoneId> {
        let zone = self.zones.create(kind);
        for cell in cells {
            if self.bounds.contains(*cell) && self.zones.owner_of(*cell).is_none() {
                let _ = self.zones.assign(zone, *cell);
            }
        }
        match self.zones.check_contiguity(zone) {
            Some(Contiguity::Deleted) | None => None,
            Some(_) => Some(zone),
        }
    }

    fn terrain_at(&self, cell: Cell) -> Option<TerrainKind> {
        self.bounds
            .index(cell)
            .and_then(|index| self.terrain.get(index).copied())
    }

    fn spawn_blueprint(
        &mut self,
        buildable: &cellwise_core::BuildableDef,
        cell: Cell,
        rotation: cellwise_core::Rotation,
    ) -> Result<ThingId, CommandRejection> {
        let terrain = self
            .terrain_at(cell)
            .ok_or(CommandRejection::OutOfBounds(cell))?;
        if !terrain.supports_structures() {
            return Err(CommandRejection::UnsuitableTerrain { cell, terrain });
        }
        if let Some(occupant) = self
            .things
            .at(cell)
            .find(|thing| thing.kind.is_edifice() || thing.kind.is_plan())
        {
            return Err(CommandRejection::CellOccupied {
                cell,
                occupant: occupant.label.clone(),
            });
        }

        let seed = ThingSeed {
            label: format!("{} blueprint", buildable.label()),
            kind: ThingKind::Blueprint,
            traits: buildable.traits(),
        };
        self.things
            .insert(seed, cell, rotation)
            .ok_or(CommandRejection::OutOfBounds(cell))
    }

    fn zone_cell_rejection(&self, zone: ZoneId, cell: Cell) -> Option<CommandRejection> {
        if !self.bounds.contains(cell) {
            return Some(CommandRejection::OutOfBounds(cell));
        }
        if self.is_impassable(cell) {
            return Some(CommandRejection::Impassable(cell));
        }
        match self.zones.owner_of(cell) {
            Some(owner) if owner != zone => Some(CommandRejection::ZoneConflict {
                cell,
                label: self
                    .zones
                    .get(owner)
                    .map(|state| state.label.clone())
                    .unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let reject = |out_events: &mut Vec<Event>, reason: CommandRejection| {
        out_events.push(Event::CommandRejected { reason });
    };

    match command {
        Command::SpawnBlueprint {
            buildable,
            cell,
            rotation,
        } => match world.spawn_blueprint(&buildable, cell, rotation) {
            Ok(thing) => out_events.push(Event::ThingSpawned { thing, cell }),
            Err(reason) => reject(out_events, reason),
        },
        Command::DestroyThing { thing } => {
            if world.things.remove(thing).is_none() {
                reject(out_events, CommandRejection::MissingThing(thing));
                return;
            }
            for designation in world.designations.remove_for_thing(thing) {
                out_events.push(Event::DesignationRemoved { designation });
            }
            out_events.push(Event::ThingDestroyed { thing });
        }
        Command::CreateZone { kind } => {
            let zone = world.zones.create(kind);
            out_events.push(Event::ZoneCreated { zone, kind });
        }
        Command::AddZoneCells { zone, cells } => {
            if world.zones.get(zone).is_none() {
                reject(out_events, CommandRejection::MissingZone(zone));
                return;
            }
            let mut added = Vec::new();
            for cell in cells {
                if let Some(reason) = world.zone_cell_rejection(zone, cell) {
                    reject(out_events, reason);
                } else if world.zones.assign(zone, cell) {
                    added.push(cell);
                }
            }
            if !added.is_empty() {
                out_events.push(Event::ZoneCellsChanged {
                    zone,
                    added,
                    removed: Vec::new(),
                });
            }
        }
        Command::RemoveZoneCells { zone, cells } => {
            if world.zones.get(zone).is_none() {
                reject(out_events, CommandRejection::MissingZone(zone));
                return;
            }
            let removed: Vec<Cell> = cells
                .into_iter()
                .filter(|cell| world.zones.release(zone, *cell))
                .collect();
            if !removed.is_empty() {
                out_events.push(Event::ZoneCellsChanged {
                    zone,
                    added: Vec::new(),
                    removed,
                });
            }
        }
        Command::CheckZoneContiguity { zone } => match world.zones.check_contiguity(zone) {
            None => reject(out_events, CommandRejection::MissingZone(zone)),
            Some(Contiguity::Intact) => {}
            Some(Contiguity::Split(spawned)) => {
                debug!(zone = zone.get(), parts = spawned.len() + 1, "zone split");
                for new_zone in &spawned {
                    if let Some(state) = world.zones.get(*new_zone) {
                        out_events.push(Event::ZoneCreated {
                            zone: *new_zone,
                            kind: state.kind,
                        });
                    }
                }
                out_events.push(Event::ZoneSplit { zone, spawned });
            }
            Some(Contiguity::Deleted) => out_events.push(Event::ZoneDeleted { zone }),
        },
        Command::DeleteZone { zone } => {
            if world.zones.delete(zone).is_some() {
                out_events.push(Event::ZoneDeleted { zone });
            } else {
                reject(out_events, CommandRejection::MissingZone(zone));
            }
        }
        Command::AddDesignation { kind, anchor } => {
            let valid = match anchor {
                DesignationAnchor::Cell(cell) => {
                    world.bounds.contains(cell).then_some(()).ok_or(CommandRejection::OutOfBounds(cell))
                }
                DesignationAnchor::Thing(thing) => world
                    .things
                    .get(thing)
                    .map(|_| ())
                    .ok_or(CommandRejection::MissingThing(thing)),
            };
            if let Err(reason) = valid {
                reject(out_events, reason);
                return;
            }
            if world.designations.find(kind, anchor).is_some() {
                reject(out_events, CommandRejection::DuplicateDesignation { kind });
                return;
            }
            let designation = world.designations.insert(kind, anchor);
            out_events.push(Event::DesignationAdded {
                designation,
                kind,
                anchor,
            });
        }
        Command::RemoveDesignation { designation } => {
            if world.designations.remove(designation).is_some() {
                out_events.push(Event::DesignationRemoved { designation });
            } else {
                reject(out_events, CommandRejection::MissingDesignation(designation));
            }
        }
    }
}

impl MapView for World {
    fn bounds(&self) -> MapBounds {
        self.bounds
    }

    fn terrain(&self, cell: Cell) -> Option<TerrainKind> {
        self.terrain_at(cell)
    }

    fn things_at(&self, cell: Cell) -> Vec<ThingSnapshot> {
        self.things.at(cell).map(|thing| thing.snapshot()).collect()
    }

    fn thing(&self, id: ThingId) -> Option<ThingSnapshot> {
        self.things.get(id).map(|thing| thing.snapshot())
    }

    fn zone_at(&self, cell: Cell) -> Option<ZoneId> {
        self.zones.owner_of(cell)
    }

    fn zone(&self, id: ZoneId) -> Option<ZoneSnapshot> {
        self.zones.snapshot(id)
    }

    fn zone_ids(&self) -> Vec<ZoneId> {
        self.zones.ids()
    }

    fn designations(&self) -> Vec<DesignationSnapshot> {
        self.designations.all()
    }

    fn designation(&self, id: DesignationId) -> Option<DesignationSnapshot> {
        self.designations.get(id)
    }
}

impl HostMap for World {
    fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        apply(self, command, out_events);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use cellwise_core::{Cell, Rotation, ThingId, ZoneId};

    use super::World;

    /// Renders the world as ASCII rows using the layout glyphs.
    #[must_use]
    pub fn render_layout(world: &World) -> Vec<String> {
        super::layout::render(world)
    }

    /// Number of things on the map.
    #[must_use]
    pub fn thing_count(world: &World) -> usize {
        world.things.len()
    }

    /// Facing the thing was placed with.
    #[must_use]
    pub fn thing_rotation(world: &World, thing: ThingId) -> Option<Rotation> {
        world.things.get(thing).map(|state| state.rotation)
    }

    /// Cells of the zone, empty when the zone does not exist.
    #[must_use]
    pub fn zone_cells(world: &World, zone: ZoneId) -> BTreeSet<Cell> {
        world
            .zones
            .get(zone)
            .map(|state| state.cells.clone())
            .unwrap_or_default()
    }

    /// Every zone as a set of cells, keyed by identifier.
    #[must_use]
    pub fn zone_layout(world: &World) -> Vec<(ZoneId, BTreeSet<Cell>)> {
        world
            .zones
            .ids()
            .into_iter()
            .map(|zone| (zone, zone_cells(world, zone)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellwise_core::{BuildableDef, MaterialCost, OrderKind, Rotation};

    fn wall() -> BuildableDef {
        BuildableDef::wall("wooden wall", MaterialCost::new("wood", 5))
    }

    #[test]
    fn spawn_blueprint_rejects_occupied_cells() {
        let mut world = World::from_layout("#.\n..\n").expect("layout");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnBlueprint {
                buildable: wall(),
                cell: Cell::new(0, 0),
                rotation: Rotation::North,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: CommandRejection::CellOccupied {
                    cell: Cell::new(0, 0),
                    occupant: "granite".to_owned(),
                },
            }]
        );
    }

    #[test]
    fn spawn_blueprint_records_rotation_and_label() {
        let mut world = World::new(3, 3);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SpawnBlueprint {
                buildable: wall(),
                cell: Cell::new(1, 1),
                rotation: Rotation::West,
            },
            &mut events,
        );

        let [Event::ThingSpawned { thing, cell }] = events.as_slice() else {
            panic!("expected a spawn event, got {events:?}");
        };
        assert_eq!(*cell, Cell::new(1, 1));
        assert_eq!(query::thing_rotation(&world, *thing), Some(Rotation::West));
        assert_eq!(
            world.thing(*thing).map(|snapshot| snapshot.label),
            Some("wooden wall blueprint".to_owned())
        );
    }

    #[test]
    fn destroying_a_thing_drops_its_designations() {
        let mut world = World::from_layout("d.\n").expect("layout");
        let deer = world.things_at(Cell::new(0, 0))[0].id;
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::AddDesignation {
                kind: OrderKind::Hunt,
                anchor: DesignationAnchor::Thing(deer),
            },
            &mut events,
        );
        assert_eq!(world.designations().len(), 1);

        events.clear();
        apply(&mut world, Command::DestroyThing { thing: deer }, &mut events);

        assert!(world.designations().is_empty());
        assert!(matches!(events.last(), Some(Event::ThingDestroyed { .. })));
    }

    #[test]
    fn duplicate_designations_are_rejected() {
        let mut world = World::from_layout("#\n").expect("layout");
        let mut events = Vec::new();
        let command = Command::AddDesignation {
            kind: OrderKind::Mine,
            anchor: DesignationAnchor::Cell(Cell::new(0, 0)),
        };

        apply(&mut world, command.clone(), &mut events);
        apply(&mut world, command, &mut events);

        assert!(matches!(
            events.last(),
            Some(Event::CommandRejected {
                reason: CommandRejection::DuplicateDesignation { .. }
            })
        ));
        assert_eq!(world.designations().len(), 1);
    }

    #[test]
    fn zone_cells_owned_elsewhere_are_refused() {
        let mut world = World::from_layout("SS..\n....\n").expect("layout");
        let stockpile = world.zone_at(Cell::new(0, 0)).expect("seeded zone");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::CreateZone {
                kind: ZoneKind::Growing,
            },
            &mut events,
        );
        let Some(Event::ZoneCreated { zone: growing, .. }) = events.first().cloned() else {
            panic!("zone not created");
        };

        events.clear();
        apply(
            &mut world,
            Command::AddZoneCells {
                zone: growing,
                cells: vec![Cell::new(1, 0), Cell::new(2, 0)],
            },
            &mut events,
        );

        assert_eq!(world.zone_at(Cell::new(1, 0)), Some(stockpile));
        assert_eq!(world.zone_at(Cell::new(2, 0)), Some(growing));
        assert!(events.iter().any(|event| matches!(
            event,
            Event::CommandRejected {
                reason: CommandRejection::ZoneConflict { .. }
            }
        )));
    }

    #[test]
    fn removing_a_bridge_cell_splits_the_zone_on_contiguity_check() {
        let mut world = World::from_layout("SSS\n").expect("layout");
        let zone = world.zone_at(Cell::new(0, 0)).expect("seeded zone");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::RemoveZoneCells {
                zone,
                cells: vec![Cell::new(1, 0)],
            },
            &mut events,
        );
        assert_eq!(world.zone_ids().len(), 1, "no split before the check");

        apply(&mut world, Command::CheckZoneContiguity { zone }, &mut events);

        assert_eq!(world.zone_ids().len(), 2);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ZoneSplit { spawned, .. } if spawned.len() == 1)));
    }
}
