//! What a placement session designates, and how each kind touches the map.

use std::collections::{BTreeMap, BTreeSet};

use cellwise_core::{
    first_rejection, AnchorStyle, BlockedCell, BuildableDef, Cell, Command, CommandRejection,
    DesignationAnchor, Event, HostMap, MapView, OrderKind, Rotation, ShapeKind, ThingId,
    ThingSnapshot, ZoneId, ZoneKind,
};
use cellwise_system_obstacles::obstacle_at;
use cellwise_system_undo::LedgerKind;
use thiserror::Error;

const ZONE_SHAPES: [ShapeKind; 5] = [
    ShapeKind::Manual,
    ShapeKind::FilledRectangle,
    ShapeKind::EmptyRectangle,
    ShapeKind::FilledOval,
    ShapeKind::EmptyOval,
];

const ORDER_SHAPES: [ShapeKind; 3] = [
    ShapeKind::Manual,
    ShapeKind::FilledRectangle,
    ShapeKind::FilledOval,
];

/// Answer to [`DesignationTarget::can_apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acceptance {
    /// The cell can be designated.
    Accepted,
    /// The cell is blocked; carries the spoken label of the blocker.
    Rejected(String),
}

impl Acceptance {
    /// Reports whether the cell was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Failures raised while applying a target to the map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The host refused the command.
    #[error(transparent)]
    Rejected(#[from] CommandRejection),
    /// The target only accepts whole batches of cells.
    #[error("{0} must be applied as a batch")]
    BatchOnly(String),
    /// The target only accepts cells one at a time.
    #[error("{0} must be applied one cell at a time")]
    NotBatched(String),
    /// The host accepted the command but nothing new appeared.
    #[error("nothing was created at {0}")]
    NothingCreated(Cell),
    /// The host accepted a zone creation but reported no new zone.
    #[error("no {} zone was created", .0.label())]
    ZoneNotCreated(ZoneKind),
}

impl ApplyError {
    /// Spoken label used when the error blocks a cell.
    #[must_use]
    pub fn blocker_label(&self) -> String {
        match self {
            Self::Rejected(rejection) => rejection.blocker_label(),
            Self::BatchOnly(_)
            | Self::NotBatched(_)
            | Self::NothingCreated(_)
            | Self::ZoneNotCreated(_) => {
                "error".to_owned()
            }
        }
    }
}

/// Outcome of a batch application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Cells the host accepted.
    pub applied: Vec<Cell>,
    /// Cells the host refused, with spoken reasons.
    pub rejected: Vec<BlockedCell>,
}

/// The thing a session designates, resolved once when the session opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DesignationTarget {
    /// Plans one structure per cell.
    Place {
        /// Structure to plan.
        buildable: BuildableDef,
        /// Facing forwarded with every blueprint.
        rotation: Rotation,
    },
    /// Adds cells to a zone, creating it on first use.
    ZoneAdd {
        /// Purpose of the zone.
        kind: ZoneKind,
        /// Zone being grown; `None` until the first batch creates one.
        zone: Option<ZoneId>,
    },
    /// Removes cells from whichever zones own them.
    ZoneDelete {
        /// Zones shrunk since the last contiguity check.
        touched: BTreeSet<ZoneId>,
    },
    /// Queues an order on bare cells.
    CellOrder(OrderKind),
    /// Queues an order on the things standing in each cell.
    ThingOrder(OrderKind),
}

impl DesignationTarget {
    /// Plans `buildable`, facing north.
    #[must_use]
    pub fn place(buildable: BuildableDef) -> Self {
        Self::Place {
            buildable,
            rotation: Rotation::default(),
        }
    }

    /// Creates a new zone of `kind` and grows it.
    #[must_use]
    pub const fn zone_add(kind: ZoneKind) -> Self {
        Self::ZoneAdd { kind, zone: None }
    }

    /// Grows an existing zone.
    #[must_use]
    pub const fn zone_expand(kind: ZoneKind, zone: ZoneId) -> Self {
        Self::ZoneAdd {
            kind,
            zone: Some(zone),
        }
    }

    /// Removes zone cells.
    #[must_use]
    pub fn zone_delete() -> Self {
        Self::ZoneDelete {
            touched: BTreeSet::new(),
        }
    }

    /// Queues `kind`, anchored the way the order requires.
    #[must_use]
    pub const fn order(kind: OrderKind) -> Self {
        match kind.anchor_style() {
            AnchorStyle::Cell => Self::CellOrder(kind),
            AnchorStyle::Thing => Self::ThingOrder(kind),
        }
    }

    /// Spoken name of the target, used when a session opens.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Place { buildable, .. } => buildable.label().to_owned(),
            Self::ZoneAdd { kind, .. } => kind.label().to_owned(),
            Self::ZoneDelete { .. } => "delete zone".to_owned(),
            Self::CellOrder(kind) | Self::ThingOrder(kind) => kind.label().to_owned(),
        }
    }

    /// Singular noun counted in summaries, e.g. `wooden wall`.
    #[must_use]
    pub fn noun(&self) -> String {
        match self {
            Self::Place { buildable, .. } => buildable.label().to_owned(),
            Self::ZoneAdd { kind, .. } => format!("{} cell", kind.label()),
            Self::ZoneDelete { .. } => "zone cell".to_owned(),
            Self::CellOrder(kind) | Self::ThingOrder(kind) => {
                format!("{} designation", kind.purpose())
            }
        }
    }

    /// Past-tense verb opening a placement summary.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Place { .. } => "Placed",
            Self::ZoneAdd { .. } => "Added",
            Self::ZoneDelete { .. } => "Removed",
            Self::CellOrder(_) | Self::ThingOrder(_) => "Designated",
        }
    }

    /// Selection shapes the target offers, Manual first.
    #[must_use]
    pub fn available_shapes(&self) -> Vec<ShapeKind> {
        match self {
            Self::Place { buildable, .. } => buildable.shapes().to_vec(),
            Self::ZoneAdd { .. } | Self::ZoneDelete { .. } => ZONE_SHAPES.to_vec(),
            Self::CellOrder(_) | Self::ThingOrder(_) => ORDER_SHAPES.to_vec(),
        }
    }

    /// Reports whether the target offers any two-corner shape.
    #[must_use]
    pub fn supports_shapes(&self) -> bool {
        self.available_shapes()
            .iter()
            .any(|shape| shape.is_two_point())
    }

    /// Reports whether cells go to the host in one batch.
    #[must_use]
    pub const fn is_batched(&self) -> bool {
        matches!(self, Self::ZoneAdd { .. } | Self::ZoneDelete { .. })
    }

    /// Undo tracker suited to the target.
    #[must_use]
    pub const fn ledger_kind(&self) -> LedgerKind {
        match self {
            Self::Place { .. } => LedgerKind::Build,
            Self::ZoneAdd { .. } | Self::ZoneDelete { .. } => LedgerKind::Zone,
            Self::CellOrder(_) | Self::ThingOrder(_) => LedgerKind::Order,
        }
    }

    /// Per-unit cost and its material, for placeables that declare one.
    #[must_use]
    pub fn unit_cost(&self) -> Option<(u32, &str)> {
        match self {
            Self::Place { buildable, .. } => buildable
                .cost()
                .map(|cost| (cost.per_unit, cost.label.as_str())),
            _ => None,
        }
    }

    /// Reports whether placed things may seal rooms.
    #[must_use]
    pub fn is_wall_type(&self) -> bool {
        match self {
            Self::Place { buildable, .. } => {
                let traits = buildable.traits();
                traits.is_wall || traits.impassable
            }
            _ => false,
        }
    }

    /// Facing of a rotatable placeable.
    #[must_use]
    pub fn rotation(&self) -> Option<Rotation> {
        match self {
            Self::Place {
                buildable,
                rotation,
            } if buildable.is_rotatable() => Some(*rotation),
            _ => None,
        }
    }

    /// Turns a rotatable placeable a quarter turn, returning the new facing.
    pub fn rotate(&mut self, clockwise: bool) -> Option<Rotation> {
        match self {
            Self::Place {
                buildable,
                rotation,
            } if buildable.is_rotatable() => {
                *rotation = if clockwise {
                    rotation.rotated_clockwise()
                } else {
                    rotation.rotated_counterclockwise()
                };
                Some(*rotation)
            }
            _ => None,
        }
    }

    /// Checks whether `cell` can be designated without touching the map.
    pub fn can_apply<M>(&self, map: &M, cell: Cell) -> Acceptance
    where
        M: MapView + ?Sized,
    {
        let Some(terrain) = map.terrain(cell) else {
            return Acceptance::Rejected("the map edge".to_owned());
        };
        match self {
            Self::Place { .. } => {
                if !terrain.supports_structures() {
                    return Acceptance::Rejected(terrain.label().to_owned());
                }
                if let Some(obstacle) = obstacle_at(map, cell) {
                    return Acceptance::Rejected(obstacle.label);
                }
                match map.things_at(cell).into_iter().find(|thing| thing.kind.is_plan()) {
                    Some(plan) => Acceptance::Rejected(plan.label),
                    None => Acceptance::Accepted,
                }
            }
            Self::ZoneAdd { zone, .. } => {
                if map.is_impassable(cell) {
                    let blocker = map
                        .edifice(cell)
                        .map_or_else(|| terrain.label().to_owned(), |edifice| edifice.label);
                    return Acceptance::Rejected(blocker);
                }
                match map
                    .zone_at(cell)
                    .filter(|owner| Some(*owner) != *zone)
                    .and_then(|owner| map.zone(owner))
                {
                    Some(owner) => Acceptance::Rejected(owner.label),
                    None => Acceptance::Accepted,
                }
            }
            Self::ZoneDelete { .. } => match map.zone_at(cell) {
                Some(_) => Acceptance::Accepted,
                None => Acceptance::Rejected("unzoned ground".to_owned()),
            },
            Self::CellOrder(kind) => {
                if !map
                    .things_at(cell)
                    .iter()
                    .any(|thing| kind.applies_to(thing.kind))
                {
                    return Acceptance::Rejected(format!("nothing to {}", kind.label()));
                }
                if is_designated(map, *kind, DesignationAnchor::Cell(cell)) {
                    return Acceptance::Rejected(existing_designation(*kind));
                }
                Acceptance::Accepted
            }
            Self::ThingOrder(kind) => {
                let applicable: Vec<ThingSnapshot> = map
                    .things_at(cell)
                    .into_iter()
                    .filter(|thing| kind.applies_to(thing.kind))
                    .collect();
                if applicable.is_empty() {
                    return Acceptance::Rejected(format!("nothing to {}", kind.label()));
                }
                if applicable
                    .iter()
                    .all(|thing| is_designated(map, *kind, DesignationAnchor::Thing(thing.id)))
                {
                    return Acceptance::Rejected(existing_designation(*kind));
                }
                Acceptance::Accepted
            }
        }
    }

    /// Designates a single cell.
    ///
    /// Placeables return the blueprint that appeared, found by diffing the
    /// things at the cell before and after the command.
    pub fn apply<H>(&self, host: &mut H, cell: Cell) -> Result<Option<ThingId>, ApplyError>
    where
        H: HostMap + ?Sized,
    {
        match self {
            Self::Place {
                buildable,
                rotation,
            } => {
                let before: BTreeSet<ThingId> =
                    host.things_at(cell).iter().map(|thing| thing.id).collect();
                let _ = submit(
                    host,
                    Command::SpawnBlueprint {
                        buildable: buildable.clone(),
                        cell,
                        rotation: *rotation,
                    },
                )?;
                host.things_at(cell)
                    .into_iter()
                    .map(|thing| thing.id)
                    .find(|id| !before.contains(id))
                    .map(Some)
                    .ok_or(ApplyError::NothingCreated(cell))
            }
            Self::CellOrder(kind) => {
                let _ = submit(
                    host,
                    Command::AddDesignation {
                        kind: *kind,
                        anchor: DesignationAnchor::Cell(cell),
                    },
                )?;
                Ok(None)
            }
            Self::ThingOrder(kind) => {
                let pending: Vec<ThingId> = host
                    .things_at(cell)
                    .into_iter()
                    .filter(|thing| kind.applies_to(thing.kind))
                    .map(|thing| thing.id)
                    .filter(|id| !is_designated(&*host, *kind, DesignationAnchor::Thing(*id)))
                    .collect();
                for thing in pending {
                    let _ = submit(
                        host,
                        Command::AddDesignation {
                            kind: *kind,
                            anchor: DesignationAnchor::Thing(thing),
                        },
                    )?;
                }
                Ok(None)
            }
            Self::ZoneAdd { .. } | Self::ZoneDelete { .. } => {
                Err(ApplyError::BatchOnly(self.label()))
            }
        }
    }

    /// Designates every cell in one host round trip. Zone targets only.
    pub fn apply_batch<H>(&mut self, host: &mut H, cells: &[Cell]) -> Result<BatchOutcome, ApplyError>
    where
        H: HostMap + ?Sized,
    {
        let label = self.label();
        match self {
            Self::ZoneAdd { kind, zone } => {
                let (target, created) = match *zone {
                    Some(id) if host.zone(id).is_some() => (id, false),
                    _ => (create_zone(host, *kind)?, true),
                };
                *zone = Some(target);

                let mut events = Vec::new();
                host.apply(
                    Command::AddZoneCells {
                        zone: target,
                        cells: cells.to_vec(),
                    },
                    &mut events,
                );
                let outcome = partition(cells, &events, |cell| host.zone_at(cell) == Some(target));

                if created && outcome.applied.is_empty() {
                    let _ = submit(host, Command::DeleteZone { zone: target });
                    *zone = None;
                }
                Ok(outcome)
            }
            Self::ZoneDelete { touched } => {
                let mut by_zone: BTreeMap<ZoneId, Vec<Cell>> = BTreeMap::new();
                for cell in cells {
                    if let Some(owner) = host.zone_at(*cell) {
                        by_zone.entry(owner).or_default().push(*cell);
                    }
                }

                let mut events = Vec::new();
                for (owner, owned) in by_zone {
                    host.apply(
                        Command::RemoveZoneCells {
                            zone: owner,
                            cells: owned,
                        },
                        &mut events,
                    );
                    let _ = touched.insert(owner);
                }
                Ok(partition(cells, &events, |cell| host.zone_at(cell).is_none()))
            }
            _ => Err(ApplyError::NotBatched(label)),
        }
    }

    /// Flushes host side effects once a placement completes.
    ///
    /// Zone targets ask the host to repair the contiguity of every zone they
    /// touched; the other targets have nothing to flush.
    pub fn finalize<H>(&mut self, host: &mut H)
    where
        H: HostMap + ?Sized,
    {
        let zones: Vec<ZoneId> = match self {
            Self::ZoneAdd { zone, .. } => zone.iter().copied().collect(),
            Self::ZoneDelete { touched } => std::mem::take(touched).into_iter().collect(),
            _ => Vec::new(),
        };
        for zone in zones {
            if host.zone(zone).is_some() {
                let _ = submit(host, Command::CheckZoneContiguity { zone });
            }
        }
    }
}

fn existing_designation(kind: OrderKind) -> String {
    format!("an existing {} designation", kind.purpose())
}

fn is_designated<M>(map: &M, kind: OrderKind, anchor: DesignationAnchor) -> bool
where
    M: MapView + ?Sized,
{
    map.designations()
        .iter()
        .any(|designation| designation.kind == kind && designation.anchor == anchor)
}

fn submit<H>(host: &mut H, command: Command) -> Result<Vec<Event>, CommandRejection>
where
    H: HostMap + ?Sized,
{
    let mut events = Vec::new();
    host.apply(command, &mut events);
    match first_rejection(&events) {
        Some(rejection) => Err(rejection.clone()),
        None => Ok(events),
    }
}

fn create_zone<H>(host: &mut H, kind: ZoneKind) -> Result<ZoneId, ApplyError>
where
    H: HostMap + ?Sized,
{
    let events = submit(host, Command::CreateZone { kind })?;
    events
        .iter()
        .find_map(|event| match event {
            Event::ZoneCreated { zone, .. } => Some(*zone),
            _ => None,
        })
        .ok_or(ApplyError::ZoneNotCreated(kind))
}

/// Splits `cells` into applied and rejected using the host's verdict.
fn partition<F>(cells: &[Cell], events: &[Event], applied: F) -> BatchOutcome
where
    F: Fn(Cell) -> bool,
{
    let mut outcome = BatchOutcome::default();
    for cell in cells {
        if applied(*cell) {
            outcome.applied.push(*cell);
            continue;
        }
        let reason = events
            .iter()
            .find_map(|event| match event {
                Event::CommandRejected { reason } if reason.cell() == Some(*cell) => {
                    Some(reason.blocker_label())
                }
                _ => None,
            })
            .unwrap_or_else(|| "error".to_owned());
        outcome.rejected.push(BlockedCell {
            cell: *cell,
            reason,
        });
    }
    outcome
}
