//! ASCII layouts used to seed worlds in tests, scenarios and layout transfer.
//!
//! Each line is one row of the map; row `n` holds the cells with `z == n`.
//!
//! | Glyph | Meaning |
//! |-------|---------|
//! | `.` | soil |
//! | `:` | sand |
//! | `,` | marsh |
//! | `~` | shallow water |
//! | `=` | deep water |
//! | `_` | floor |
//! | `#` | granite (natural rock) |
//! | `W` | granite wall |
//! | `h` | wooden table |
//! | `+` | wooden wall blueprint |
//! | `T` | oak tree |
//! | `"` | grass |
//! | `i` | steel |
//! | `@` | colonist |
//! | `d` | deer |
//! | `f` | dirt |
//! | `S` | stockpile cell |
//! | `G` | growing zone cell |
//! | `D` | dumping zone cell |

use std::collections::BTreeMap;

use cellwise_core::{Cell, MapBounds, TerrainKind, ThingKind, ZoneKind};
use thiserror::Error;

use crate::{things::ThingSeed, World};

/// Errors raised while parsing an ASCII layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contained no rows.
    #[error("layout is empty")]
    Empty,
    /// A row was wider or narrower than the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph has no meaning.
    #[error("unknown glyph '{glyph}' at {x}, {z}")]
    UnknownGlyph {
        /// The unrecognised character.
        glyph: char,
        /// Column of the glyph.
        x: usize,
        /// Row of the glyph.
        z: usize,
    },
    /// The layout is too large to address.
    #[error("layout dimensions overflow")]
    TooLarge,
}

enum Glyph {
    Terrain(TerrainKind),
    Thing(ThingSeed),
    Zone(ZoneKind),
}

fn decode(glyph: char) -> Option<Glyph> {
    let decoded = match glyph {
        '.' => Glyph::Terrain(TerrainKind::Soil),
        ':' => Glyph::Terrain(TerrainKind::Sand),
        ',' => Glyph::Terrain(TerrainKind::Marsh),
        '~' => Glyph::Terrain(TerrainKind::ShallowWater),
        '=' => Glyph::Terrain(TerrainKind::DeepWater),
        '_' => Glyph::Terrain(TerrainKind::Floor),
        '#' => Glyph::Thing(ThingSeed::rock("granite")),
        'W' => Glyph::Thing(ThingSeed::wall("granite wall")),
        'h' => Glyph::Thing(ThingSeed::furniture("wooden table")),
        '+' => Glyph::Thing(ThingSeed::wall_blueprint("wooden wall blueprint")),
        'T' => Glyph::Thing(ThingSeed::tree("oak tree")),
        '"' => Glyph::Thing(ThingSeed::plant("grass")),
        'i' => Glyph::Thing(ThingSeed::item("steel")),
        '@' => Glyph::Thing(ThingSeed::colonist("colonist")),
        'd' => Glyph::Thing(ThingSeed::animal("deer")),
        'f' => Glyph::Thing(ThingSeed::filth("dirt")),
        'S' => Glyph::Zone(ZoneKind::Stockpile),
        'G' => Glyph::Zone(ZoneKind::Growing),
        'D' => Glyph::Zone(ZoneKind::Dumping),
        _ => return None,
    };
    Some(decoded)
}

/// Builds a world from an ASCII layout.
pub(crate) fn parse(text: &str) -> Result<World, LayoutError> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(first) = rows.first() else {
        return Err(LayoutError::Empty);
    };
    let width = first.chars().count();
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::Ragged {
                row,
                expected: width,
                found,
            });
        }
    }

    let bounds = MapBounds::new(
        u32::try_from(width).map_err(|_| LayoutError::TooLarge)?,
        u32::try_from(rows.len()).map_err(|_| LayoutError::TooLarge)?,
    );
    let mut world = World::with_bounds(bounds);
    let mut zone_cells: BTreeMap<ZoneKind, Vec<Cell>> = BTreeMap::new();

    for (z, line) in rows.iter().enumerate() {
        for (x, glyph) in line.chars().enumerate() {
            let cell = Cell::new(
                i32::try_from(x).map_err(|_| LayoutError::TooLarge)?,
                i32::try_from(z).map_err(|_| LayoutError::TooLarge)?,
            );
            match decode(glyph).ok_or(LayoutError::UnknownGlyph { glyph, x, z })? {
                Glyph::Terrain(terrain) => world.set_terrain(cell, terrain),
                Glyph::Thing(seed) => {
                    let _ = world.spawn_thing(seed, cell);
                }
                Glyph::Zone(kind) => zone_cells.entry(kind).or_default().push(cell),
            }
        }
    }

    for (kind, cells) in zone_cells {
        let _ = world.seed_zone(kind, &cells);
    }

    Ok(world)
}

/// Renders the world back into glyphs. Things win over zones, zones over terrain.
pub(crate) fn render(world: &World) -> Vec<String> {
    let bounds = world.bounds;
    let mut rows = Vec::new();
    for z in 0..bounds.height() {
        let mut row = String::new();
        for x in 0..bounds.width() {
            let cell = Cell::new(
                i32::try_from(x).unwrap_or(i32::MAX),
                i32::try_from(z).unwrap_or(i32::MAX),
            );
            row.push(glyph_at(world, cell));
        }
        rows.push(row);
    }
    rows
}

fn glyph_at(world: &World, cell: Cell) -> char {
    if let Some(thing) = world.things.at(cell).next() {
        return match thing.kind {
            ThingKind::NaturalRock => '#',
            ThingKind::Building if thing.traits.is_wall => 'W',
            ThingKind::Building => 'h',
            ThingKind::Blueprint | ThingKind::Frame => '+',
            ThingKind::Tree => 'T',
            ThingKind::Plant => '"',
            ThingKind::Item => 'i',
            ThingKind::Pawn { wild: true } => 'd',
            ThingKind::Pawn { wild: false } => '@',
            ThingKind::Filth => 'f',
        };
    }
    if let Some(zone) = world.zones.owner_of(cell).and_then(|id| world.zones.get(id)) {
        return match zone.kind {
            ZoneKind::Stockpile => 'S',
            ZoneKind::Growing => 'G',
            ZoneKind::Dumping => 'D',
        };
    }
    match world.terrain_at(cell) {
        Some(TerrainKind::Sand) => ':',
        Some(TerrainKind::Marsh) => ',',
        Some(TerrainKind::ShallowWater) => '~',
        Some(TerrainKind::DeepWater) => '=',
        Some(TerrainKind::Floor) => '_',
        Some(TerrainKind::Soil) | None => '.',
    }
}
