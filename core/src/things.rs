//! Snapshots of the entities, zones and designations a host map exposes.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, ShapeKind};

/// Unique identifier assigned to a thing by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThingId(u32);

impl ThingId {
    /// Creates a new thing identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a zone by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(u32);

impl ZoneId {
    /// Creates a new zone identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a designation by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DesignationId(u32);

impl DesignationId {
    /// Creates a new designation identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Broad category of a thing placed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThingKind {
    /// Planned structure that has not been started.
    Blueprint,
    /// Structure under construction.
    Frame,
    /// Completed structure.
    Building,
    /// Mineable rock filling the whole cell.
    NaturalRock,
    /// Tree that has to be cut before building.
    Tree,
    /// Low vegetation.
    Plant,
    /// Moving agent.
    Pawn {
        /// Whether the pawn is a wild animal that can be hunted.
        wild: bool,
    },
    /// Loose item lying on the ground.
    Item,
    /// Dirt, blood and similar floor grime.
    Filth,
}

impl ThingKind {
    /// Reports whether the thing fills its cell the way a building does.
    #[must_use]
    pub const fn is_edifice(self) -> bool {
        matches!(self, Self::Building | Self::NaturalRock)
    }

    /// Reports whether the thing is a planned or partially built structure.
    #[must_use]
    pub const fn is_plan(self) -> bool {
        matches!(self, Self::Blueprint | Self::Frame)
    }

    /// Reports whether the thing is, or will become, a structure.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        matches!(self, Self::Blueprint | Self::Frame | Self::Building)
    }
}

/// Physical traits of a structure or of the structure a plan will become.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildTraits {
    /// The structure is a wall segment.
    pub is_wall: bool,
    /// Agents cannot walk through the finished structure.
    pub impassable: bool,
}

impl BuildTraits {
    /// Traits of a wall: a wall segment that blocks movement.
    pub const WALL: Self = Self {
        is_wall: true,
        impassable: true,
    };

    /// Traits of open furniture and floors.
    pub const OPEN: Self = Self {
        is_wall: false,
        impassable: false,
    };

    /// Traits of solid, non-wall structures such as machinery.
    pub const SOLID: Self = Self {
        is_wall: false,
        impassable: true,
    };
}

/// Immutable view of a single thing used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThingSnapshot {
    /// Identifier allocated to the thing by the host.
    pub id: ThingId,
    /// Human readable name announced to the player.
    pub label: String,
    /// Category of the thing.
    pub kind: ThingKind,
    /// Cell the thing occupies.
    pub cell: Cell,
    /// Structural traits; for plans these describe the finished structure.
    pub traits: BuildTraits,
}

/// Material requirement charged per placed unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialCost {
    /// Name of the material, for example `wood`.
    pub label: String,
    /// Amount consumed by one placed unit.
    pub per_unit: u32,
}

impl MaterialCost {
    /// Creates a new material cost descriptor.
    #[must_use]
    pub fn new(label: impl Into<String>, per_unit: u32) -> Self {
        Self {
            label: label.into(),
            per_unit,
        }
    }
}

/// Description of a structure the player can plan.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildableDef {
    label: String,
    traits: BuildTraits,
    cost: Option<MaterialCost>,
    rotatable: bool,
    shapes: Vec<ShapeKind>,
}

impl BuildableDef {
    /// Creates a single-cell, non-rotatable buildable without a cost.
    #[must_use]
    pub fn new(label: impl Into<String>, traits: BuildTraits) -> Self {
        Self {
            label: label.into(),
            traits,
            cost: None,
            rotatable: false,
            shapes: vec![ShapeKind::Manual],
        }
    }

    /// Convenience constructor for a wall that offers every selection shape.
    #[must_use]
    pub fn wall(label: impl Into<String>, cost: MaterialCost) -> Self {
        Self::new(label, BuildTraits::WALL)
            .with_cost(cost)
            .with_shapes(ShapeKind::ALL.to_vec())
    }

    /// Attaches a per-unit material cost.
    #[must_use]
    pub fn with_cost(mut self, cost: MaterialCost) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Replaces the offered selection shapes. Manual is always retained.
    #[must_use]
    pub fn with_shapes(mut self, shapes: Vec<ShapeKind>) -> Self {
        let mut shapes: Vec<ShapeKind> = shapes
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !shapes.contains(&ShapeKind::Manual) {
            shapes.insert(0, ShapeKind::Manual);
        }
        self.shapes = shapes;
        self
    }

    /// Marks the buildable as accepting a facing.
    #[must_use]
    pub fn rotatable(mut self) -> Self {
        self.rotatable = true;
        self
    }

    /// Human readable name of the structure.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Structural traits of the finished structure.
    #[must_use]
    pub const fn traits(&self) -> BuildTraits {
        self.traits
    }

    /// Material charged per placed unit, if any.
    #[must_use]
    pub fn cost(&self) -> Option<&MaterialCost> {
        self.cost.as_ref()
    }

    /// Reports whether the structure accepts a facing.
    #[must_use]
    pub const fn is_rotatable(&self) -> bool {
        self.rotatable
    }

    /// Selection shapes offered for the structure, Manual first.
    #[must_use]
    pub fn shapes(&self) -> &[ShapeKind] {
        &self.shapes
    }
}

/// Purpose assigned to a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneKind {
    /// Storage area for items.
    Stockpile,
    /// Farmland.
    Growing,
    /// Area where unwanted items are dumped.
    Dumping,
}

impl ZoneKind {
    /// Spoken name of the zone kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stockpile => "stockpile",
            Self::Growing => "growing zone",
            Self::Dumping => "dumping zone",
        }
    }
}

/// Immutable view of a single zone used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneSnapshot {
    /// Identifier allocated to the zone by the host.
    pub id: ZoneId,
    /// Purpose of the zone.
    pub kind: ZoneKind,
    /// Human readable name announced to the player.
    pub label: String,
    /// Cells covered by the zone.
    pub cells: BTreeSet<Cell>,
}

/// How an order attaches to the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorStyle {
    /// The order marks a fixed cell.
    Cell,
    /// The order follows a thing wherever it moves.
    Thing,
}

/// Player orders that can be queued as designations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderKind {
    /// Dig out natural rock.
    Mine,
    /// Hunt a wild animal.
    Hunt,
    /// Carry an item to storage.
    Haul,
    /// Cut down a tree or plant.
    CutPlant,
    /// Take apart a building.
    Deconstruct,
}

impl OrderKind {
    /// How designations of this kind attach to the map.
    #[must_use]
    pub const fn anchor_style(self) -> AnchorStyle {
        match self {
            Self::Mine => AnchorStyle::Cell,
            Self::Hunt | Self::Haul | Self::CutPlant | Self::Deconstruct => AnchorStyle::Thing,
        }
    }

    /// Reports whether the order applies to the provided thing.
    #[must_use]
    pub const fn applies_to(self, kind: ThingKind) -> bool {
        match self {
            Self::Mine => matches!(kind, ThingKind::NaturalRock),
            Self::Hunt => matches!(kind, ThingKind::Pawn { wild: true }),
            Self::Haul => matches!(kind, ThingKind::Item),
            Self::CutPlant => matches!(kind, ThingKind::Tree | ThingKind::Plant),
            Self::Deconstruct => matches!(kind, ThingKind::Building),
        }
    }

    /// Spoken name of the order.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mine => "mine",
            Self::Hunt => "hunt",
            Self::Haul => "haul",
            Self::CutPlant => "cut plants",
            Self::Deconstruct => "deconstruct",
        }
    }

    /// Gerund used when summarising designated targets, e.g. "for mining".
    #[must_use]
    pub const fn purpose(self) -> &'static str {
        match self {
            Self::Mine => "mining",
            Self::Hunt => "hunting",
            Self::Haul => "hauling",
            Self::CutPlant => "cutting",
            Self::Deconstruct => "deconstruction",
        }
    }
}

/// What a designation is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DesignationAnchor {
    /// A fixed cell.
    Cell(Cell),
    /// A thing, independent of where it stands.
    Thing(ThingId),
}

impl fmt::Display for DesignationAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(cell) => write!(f, "cell {cell}"),
            Self::Thing(thing) => write!(f, "thing {}", thing.get()),
        }
    }
}

/// Immutable view of a single designation used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DesignationSnapshot {
    /// Identifier allocated to the designation by the host.
    pub id: DesignationId,
    /// Order the designation represents.
    pub kind: OrderKind,
    /// Cell or thing the designation is attached to.
    pub anchor: DesignationAnchor,
}
