//! Narrow contract between the placement overlay and the host world.
//!
//! The overlay never reaches into host state directly. It reads through
//! [`MapView`] and mutates by submitting [`Command`] values to
//! [`HostMap::apply`], observing the outcome through the returned [`Event`]
//! stream. Anything the host does as a side effect of a command (such as
//! splitting a zone during a contiguity check) is only visible to the overlay
//! through events and subsequent queries.

use thiserror::Error;

use crate::{
    grid::{Cell, MapBounds, Rotation, TerrainKind},
    things::{
        BuildableDef, DesignationAnchor, DesignationId, DesignationSnapshot, OrderKind, ThingId,
        ThingSnapshot, ZoneId, ZoneKind, ZoneSnapshot,
    },
};

/// Commands that express all mutations the overlay may request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Plans a structure at the provided cell.
    SpawnBlueprint {
        /// Structure to plan.
        buildable: BuildableDef,
        /// Cell that receives the blueprint.
        cell: Cell,
        /// Facing of the structure.
        rotation: Rotation,
    },
    /// Removes a thing from the map.
    DestroyThing {
        /// Identifier of the thing to remove.
        thing: ThingId,
    },
    /// Creates an empty zone.
    CreateZone {
        /// Purpose of the new zone.
        kind: ZoneKind,
    },
    /// Adds cells to an existing zone without checking contiguity.
    AddZoneCells {
        /// Zone that receives the cells.
        zone: ZoneId,
        /// Cells to add.
        cells: Vec<Cell>,
    },
    /// Removes cells from a zone without checking contiguity.
    RemoveZoneCells {
        /// Zone that loses the cells.
        zone: ZoneId,
        /// Cells to remove.
        cells: Vec<Cell>,
    },
    /// Asks the host to repair a zone whose cells may have become disconnected.
    ///
    /// Hosts may split the zone into several zones or delete it when it has
    /// no cells left. The overlay treats the outcome as opaque.
    CheckZoneContiguity {
        /// Zone to inspect.
        zone: ZoneId,
    },
    /// Deletes a zone and releases its cells.
    DeleteZone {
        /// Zone to delete.
        zone: ZoneId,
    },
    /// Queues a player order.
    AddDesignation {
        /// Order to queue.
        kind: OrderKind,
        /// Cell or thing the order attaches to.
        anchor: DesignationAnchor,
    },
    /// Withdraws a queued player order.
    RemoveDesignation {
        /// Designation to withdraw.
        designation: DesignationId,
    },
}

/// Events broadcast by the host after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A thing appeared on the map.
    ThingSpawned {
        /// Identifier assigned to the thing.
        thing: ThingId,
        /// Cell the thing occupies.
        cell: Cell,
    },
    /// A thing was removed from the map.
    ThingDestroyed {
        /// Identifier of the removed thing.
        thing: ThingId,
    },
    /// A zone was created.
    ZoneCreated {
        /// Identifier assigned to the zone.
        zone: ZoneId,
        /// Purpose of the zone.
        kind: ZoneKind,
    },
    /// The cell set of a zone changed.
    ZoneCellsChanged {
        /// Zone whose cells changed.
        zone: ZoneId,
        /// Cells that joined the zone.
        added: Vec<Cell>,
        /// Cells that left the zone.
        removed: Vec<Cell>,
    },
    /// A contiguity check moved disconnected cells into new zones.
    ZoneSplit {
        /// Zone that was split.
        zone: ZoneId,
        /// Zones created from the disconnected parts.
        spawned: Vec<ZoneId>,
    },
    /// A zone was deleted.
    ZoneDeleted {
        /// Identifier of the deleted zone.
        zone: ZoneId,
    },
    /// A designation was queued.
    DesignationAdded {
        /// Identifier assigned to the designation.
        designation: DesignationId,
        /// Order the designation represents.
        kind: OrderKind,
        /// Cell or thing the designation is attached to.
        anchor: DesignationAnchor,
    },
    /// A designation was withdrawn, either on request or because its thing vanished.
    DesignationRemoved {
        /// Identifier of the withdrawn designation.
        designation: DesignationId,
    },
    /// The host refused a command.
    CommandRejected {
        /// Reason the command was refused.
        reason: CommandRejection,
    },
}

/// Reasons a host may refuse a command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandRejection {
    /// The cell lies outside the map.
    #[error("{0} is out of bounds")]
    OutOfBounds(Cell),
    /// Something already occupies the cell.
    #[error("blocked by {occupant}")]
    CellOccupied {
        /// Cell that was requested.
        cell: Cell,
        /// Label of the blocking thing.
        occupant: String,
    },
    /// The terrain cannot accept the request.
    #[error("{} is unsuitable", .terrain.label())]
    UnsuitableTerrain {
        /// Cell that was requested.
        cell: Cell,
        /// Terrain found at the cell.
        terrain: TerrainKind,
    },
    /// The cell is impassable.
    #[error("{0} is impassable")]
    Impassable(Cell),
    /// The cell already belongs to another zone.
    #[error("{cell} already belongs to {label}")]
    ZoneConflict {
        /// Cell that was requested.
        cell: Cell,
        /// Label of the zone that owns the cell.
        label: String,
    },
    /// The thing does not exist.
    #[error("thing {} no longer exists", .0.get())]
    MissingThing(ThingId),
    /// The zone does not exist.
    #[error("zone {} no longer exists", .0.get())]
    MissingZone(ZoneId),
    /// The designation does not exist.
    #[error("designation {} no longer exists", .0.get())]
    MissingDesignation(DesignationId),
    /// An identical designation is already queued.
    #[error("already designated for {}", .kind.purpose())]
    DuplicateDesignation {
        /// Order that was requested.
        kind: OrderKind,
    },
}

impl CommandRejection {
    /// Cell the rejection refers to, when it concerns a single cell.
    #[must_use]
    pub fn cell(&self) -> Option<Cell> {
        match self {
            Self::OutOfBounds(cell) | Self::Impassable(cell) => Some(*cell),
            Self::CellOccupied { cell, .. }
            | Self::UnsuitableTerrain { cell, .. }
            | Self::ZoneConflict { cell, .. } => Some(*cell),
            Self::MissingThing(_)
            | Self::MissingZone(_)
            | Self::MissingDesignation(_)
            | Self::DuplicateDesignation { .. } => None,
        }
    }

    /// Short label of whatever caused the rejection, spoken after "blocked by".
    #[must_use]
    pub fn blocker_label(&self) -> String {
        match self {
            Self::OutOfBounds(_) => "the map edge".to_owned(),
            Self::CellOccupied { occupant, .. } => occupant.clone(),
            Self::UnsuitableTerrain { terrain, .. } => terrain.label().to_owned(),
            Self::Impassable(_) => "impassable ground".to_owned(),
            Self::ZoneConflict { label, .. } => label.clone(),
            Self::MissingThing(_) => "a missing thing".to_owned(),
            Self::MissingZone(_) => "a missing zone".to_owned(),
            Self::MissingDesignation(_) => "a missing designation".to_owned(),
            Self::DuplicateDesignation { kind } => {
                format!("an existing {} designation", kind.purpose())
            }
        }
    }
}

/// Returns the first rejection reported in an event batch.
#[must_use]
pub fn first_rejection(events: &[Event]) -> Option<&CommandRejection> {
    events.iter().find_map(|event| match event {
        Event::CommandRejected { reason } => Some(reason),
        _ => None,
    })
}

/// Read-only queries the overlay needs from the host map.
pub trait MapView {
    /// Dimensions of the map.
    fn bounds(&self) -> MapBounds;

    /// Terrain at the cell, or `None` outside the map.
    fn terrain(&self, cell: Cell) -> Option<TerrainKind>;

    /// Every thing standing on the cell, in host order.
    fn things_at(&self, cell: Cell) -> Vec<ThingSnapshot>;

    /// Looks up a thing by identifier.
    fn thing(&self, id: ThingId) -> Option<ThingSnapshot>;

    /// Zone owning the cell, if any.
    fn zone_at(&self, cell: Cell) -> Option<ZoneId>;

    /// Looks up a zone by identifier.
    fn zone(&self, id: ZoneId) -> Option<ZoneSnapshot>;

    /// Identifiers of every zone on the map.
    fn zone_ids(&self) -> Vec<ZoneId>;

    /// Every designation currently queued on the map.
    fn designations(&self) -> Vec<DesignationSnapshot>;

    /// Looks up a designation by identifier.
    fn designation(&self, id: DesignationId) -> Option<DesignationSnapshot>;

    /// Reports whether the cell lies on the map.
    fn in_bounds(&self, cell: Cell) -> bool {
        self.bounds().contains(cell)
    }

    /// The building or rock filling the cell, if any.
    fn edifice(&self, cell: Cell) -> Option<ThingSnapshot> {
        self.things_at(cell)
            .into_iter()
            .find(|thing| thing.kind.is_edifice())
    }

    /// Reports whether agents are unable to enter the cell.
    fn is_impassable(&self, cell: Cell) -> bool {
        match self.terrain(cell) {
            None => true,
            Some(terrain) if !terrain.is_passable() => true,
            Some(_) => self
                .things_at(cell)
                .iter()
                .any(|thing| thing.kind.is_edifice() && thing.traits.impassable),
        }
    }

    /// Designations attached to the cell or to anything standing on it.
    fn designations_at(&self, cell: Cell) -> Vec<DesignationSnapshot> {
        let things: Vec<ThingId> = self.things_at(cell).iter().map(|thing| thing.id).collect();
        self.designations()
            .into_iter()
            .filter(|designation| match designation.anchor {
                DesignationAnchor::Cell(anchor) => anchor == cell,
                DesignationAnchor::Thing(thing) => things.contains(&thing),
            })
            .collect()
    }
}

/// A host map that accepts mutation commands.
pub trait HostMap: MapView {
    /// Applies the command, appending every resulting event to `out_events`.
    fn apply(&mut self, command: Command, out_events: &mut Vec<Event>);
}
