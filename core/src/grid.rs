//! Grid coordinates, map bounds and the shape vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a single map cell expressed as `x` and `z` coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    x: i32,
    z: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Depth coordinate of the cell.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Returns the cell displaced by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// The four orthogonally adjacent cells, in north, east, south, west order.
    #[must_use]
    pub const fn cardinal_neighbors(self) -> [Self; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// The eight cells surrounding this one.
    #[must_use]
    pub const fn surrounding(self) -> [Self; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(1, 0),
            self.offset(1, 1),
            self.offset(0, 1),
            self.offset(-1, 1),
            self.offset(-1, 0),
        ]
    }

    /// Chebyshev (king move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// Straight-line distance between the centres of two cells.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dz = f64::from(self.z) - f64::from(other.z);
        (dx * dx + dz * dz).sqrt() as f32
    }

    /// Sort key that orders cells row by row.
    #[must_use]
    pub const fn row_major_key(self) -> (i32, i32) {
        (self.z, self.x)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.z)
    }
}

/// Dimensions of the playable map. Valid cells span `0..width` by `0..height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapBounds {
    width: u32,
    height: u32,
}

impl MapBounds {
    /// Creates bounds describing a `width` by `height` map.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cells along the x axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells along the z axis.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells on the map.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reports whether the cell lies on the map.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        u32::try_from(cell.x()).map_or(false, |x| x < self.width)
            && u32::try_from(cell.z()).map_or(false, |z| z < self.height)
    }

    /// Reports whether the cell lies on the outermost ring of the map.
    #[must_use]
    pub fn is_edge(&self, cell: Cell) -> bool {
        if !self.contains(cell) {
            return false;
        }
        let max_x = i64::from(self.width) - 1;
        let max_z = i64::from(self.height) - 1;
        cell.x() == 0
            || cell.z() == 0
            || i64::from(cell.x()) == max_x
            || i64::from(cell.z()) == max_z
    }

    /// Moves the cell onto the nearest valid coordinate.
    #[must_use]
    pub fn clamp(&self, cell: Cell) -> Cell {
        let max_x = i32::try_from(self.width.saturating_sub(1)).unwrap_or(i32::MAX);
        let max_z = i32::try_from(self.height.saturating_sub(1)).unwrap_or(i32::MAX);
        Cell::new(cell.x().clamp(0, max_x), cell.z().clamp(0, max_z))
    }

    /// Dense row-major index of the cell, if it lies on the map.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let x = usize::try_from(cell.x()).ok()?;
        let z = usize::try_from(cell.z()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        z.checked_mul(width)?.checked_add(x)
    }
}

/// Selection shapes offered while designating cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    /// One cell at a time under the cursor.
    Manual,
    /// Straight line snapped to the dominant axis.
    Line,
    /// Line of arbitrary slope between the two corners.
    AngledLine,
    /// Every cell of the rectangle spanned by the corners.
    FilledRectangle,
    /// Only the border of the rectangle spanned by the corners.
    EmptyRectangle,
    /// Every cell of the ellipse inscribed in the corner rectangle.
    FilledOval,
    /// Only the outline of the inscribed ellipse.
    EmptyOval,
}

impl ShapeKind {
    /// Every shape in presentation order.
    pub const ALL: [Self; 7] = [
        Self::Manual,
        Self::Line,
        Self::AngledLine,
        Self::FilledRectangle,
        Self::EmptyRectangle,
        Self::FilledOval,
        Self::EmptyOval,
    ];

    /// Spoken name of the shape.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Line => "line",
            Self::AngledLine => "angled line",
            Self::FilledRectangle => "filled rectangle",
            Self::EmptyRectangle => "empty rectangle",
            Self::FilledOval => "filled oval",
            Self::EmptyOval => "empty oval",
        }
    }

    /// Reports whether the shape needs a first and second corner.
    #[must_use]
    pub const fn is_two_point(self) -> bool {
        !matches!(self, Self::Manual)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Facing applied to rotatable buildables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rotation {
    /// Facing toward decreasing z.
    #[default]
    North,
    /// Facing toward increasing x.
    East,
    /// Facing toward increasing z.
    South,
    /// Facing toward decreasing x.
    West,
}

impl Rotation {
    /// Rotation a quarter turn clockwise from this one.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Rotation a quarter turn counterclockwise from this one.
    #[must_use]
    pub const fn rotated_counterclockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Spoken name of the facing.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

/// Ground covering a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerrainKind {
    /// Plain diggable ground.
    #[default]
    Soil,
    /// Loose sand.
    Sand,
    /// Soft wet ground that cannot carry structures.
    Marsh,
    /// Wadeable water.
    ShallowWater,
    /// Water nothing can cross.
    DeepWater,
    /// Constructed flooring.
    Floor,
}

impl TerrainKind {
    /// Reports whether agents can walk across the terrain.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::DeepWater)
    }

    /// Reports whether buildings may be planned on the terrain.
    #[must_use]
    pub const fn supports_structures(self) -> bool {
        matches!(self, Self::Soil | Self::Sand | Self::Floor)
    }

    /// Spoken name of the terrain.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Soil => "soil",
            Self::Sand => "sand",
            Self::Marsh => "marsh",
            Self::ShallowWater => "shallow water",
            Self::DeepWater => "deep water",
            Self::Floor => "floor",
        }
    }
}
