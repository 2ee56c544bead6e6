//! Scripted placement sessions loaded from TOML.

use anyhow::{Context, Result};
use cellwise_core::{
    BuildTraits, BuildableDef, Cell, MaterialCost, OrderKind, ShapeKind, ZoneKind,
};
use cellwise_system_placement::{DesignationTarget, KeyPress};
use serde::Deserialize;

/// A layout, a target and the keys to press against it.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Scenario {
    /// ASCII layout rows.
    pub(crate) layout: String,
    /// What the session designates.
    pub(crate) target: TargetConfig,
    /// Shape the session starts with.
    #[serde(default = "default_shape")]
    pub(crate) shape: ShapeKind,
    /// Starting cursor as `[x, z]`.
    #[serde(default)]
    pub(crate) cursor: [i32; 2],
    /// Key script, for example `["space", "right*5", "ctrl+z"]`.
    #[serde(default)]
    pub(crate) keys: Vec<String>,
}

const fn default_shape() -> ShapeKind {
    ShapeKind::FilledRectangle
}

/// Designation target as written in a scenario file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub(crate) enum TargetConfig {
    /// A structure to plan.
    Build {
        /// Spoken name of the structure.
        label: String,
        /// Whether the structure is a wall segment.
        #[serde(default)]
        wall: bool,
        /// Whether the structure blocks movement.
        #[serde(default)]
        impassable: bool,
        /// Material charged per placed unit.
        #[serde(default)]
        material: Option<String>,
        /// Amount of material charged per placed unit.
        #[serde(default)]
        cost: u32,
        /// Whether the structure accepts a facing.
        #[serde(default)]
        rotatable: bool,
        /// Offered shapes; defaults to every shape for walls and manual otherwise.
        #[serde(default)]
        shapes: Option<Vec<ShapeKind>>,
    },
    /// Grow a new zone.
    Zone {
        /// Purpose of the zone.
        zone: ZoneKind,
    },
    /// Remove zone cells.
    DeleteZone,
    /// Queue an order.
    Order {
        /// Order to queue.
        order: OrderKind,
    },
}

impl TargetConfig {
    /// Resolves the entry into a designation target.
    pub(crate) fn into_target(self) -> DesignationTarget {
        match self {
            Self::Build {
                label,
                wall,
                impassable,
                material,
                cost,
                rotatable,
                shapes,
            } => {
                let traits = BuildTraits {
                    is_wall: wall,
                    impassable: impassable || wall,
                };
                let mut buildable = BuildableDef::new(label, traits);
                if let Some(material) = material {
                    buildable = buildable.with_cost(MaterialCost::new(material, cost));
                }
                let shapes = shapes.unwrap_or_else(|| {
                    if wall {
                        ShapeKind::ALL.to_vec()
                    } else {
                        vec![ShapeKind::Manual]
                    }
                });
                buildable = buildable.with_shapes(shapes);
                if rotatable {
                    buildable = buildable.rotatable();
                }
                DesignationTarget::place(buildable)
            }
            Self::Zone { zone } => DesignationTarget::zone_add(zone),
            Self::DeleteZone => DesignationTarget::zone_delete(),
            Self::Order { order } => DesignationTarget::order(order),
        }
    }
}

impl Scenario {
    /// Parses a scenario from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("scenario is not valid TOML")
    }

    /// Starting cursor cell.
    pub(crate) const fn cursor(&self) -> Cell {
        Cell::new(self.cursor[0], self.cursor[1])
    }

    /// Expands the key script, honouring `key*count` repetitions.
    pub(crate) fn key_presses(&self) -> Result<Vec<KeyPress>> {
        let mut presses = Vec::new();
        for entry in &self.keys {
            let (name, count) = match entry.rsplit_once('*') {
                Some((name, count)) => {
                    let count = count
                        .trim()
                        .parse::<usize>()
                        .with_context(|| format!("invalid repeat count in '{entry}'"))?;
                    (name, count)
                }
                None => (entry.as_str(), 1),
            };
            let press = name
                .parse::<KeyPress>()
                .with_context(|| format!("invalid key '{entry}'"))?;
            presses.extend(std::iter::repeat(press).take(count));
        }
        Ok(presses)
    }
}
