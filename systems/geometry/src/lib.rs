#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure shape geometry mapping a selection shape and two corners to cells.
//!
//! Every function here is deterministic and side-effect free. Rectangles and
//! ovals treat the corners as opposite ends of a bounding box and return their
//! cells row by row; lines return cells in walking order from the origin.

use std::collections::BTreeSet;

use cellwise_core::{Cell, ShapeKind};

/// Axis-aligned box spanned by two opposite corners, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    min: Cell,
    max: Cell,
}

impl BoundingBox {
    /// Creates the box spanned by two corners given in any order.
    #[must_use]
    pub fn new(a: Cell, b: Cell) -> Self {
        Self {
            min: Cell::new(a.x().min(b.x()), a.z().min(b.z())),
            max: Cell::new(a.x().max(b.x()), a.z().max(b.z())),
        }
    }

    /// Corner with the smallest coordinates.
    #[must_use]
    pub const fn min(&self) -> Cell {
        self.min
    }

    /// Corner with the largest coordinates.
    #[must_use]
    pub const fn max(&self) -> Cell {
        self.max
    }

    /// Number of columns covered by the box.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max.x().abs_diff(self.min.x()) + 1
    }

    /// Number of rows covered by the box.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.max.z().abs_diff(self.min.z()) + 1
    }

    /// Number of cells covered by the box.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Reports whether the cell lies inside the box.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        (self.min.x()..=self.max.x()).contains(&cell.x())
            && (self.min.z()..=self.max.z()).contains(&cell.z())
    }

    /// Reports whether the cell lies on the outermost ring of the box.
    #[must_use]
    pub fn is_border(&self, cell: Cell) -> bool {
        self.contains(cell)
            && (cell.x() == self.min.x()
                || cell.x() == self.max.x()
                || cell.z() == self.min.z()
                || cell.z() == self.max.z())
    }

    /// Every cell of the box in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.min.z()..=self.max.z())
            .flat_map(move |z| (self.min.x()..=self.max.x()).map(move |x| Cell::new(x, z)))
    }
}

/// Computes the ordered cells covered by `shape` between `origin` and `target`.
///
/// Manual selections always return `[target]`.
#[must_use]
pub fn cells(shape: ShapeKind, origin: Cell, target: Cell) -> Vec<Cell> {
    match shape {
        ShapeKind::Manual => vec![target],
        ShapeKind::Line => snapped_line(origin, target),
        ShapeKind::AngledLine => bresenham(origin, target),
        ShapeKind::FilledRectangle => BoundingBox::new(origin, target).cells().collect(),
        ShapeKind::EmptyRectangle => {
            let bounds = BoundingBox::new(origin, target);
            bounds.cells().filter(|cell| bounds.is_border(*cell)).collect()
        }
        ShapeKind::FilledOval => filled_oval(BoundingBox::new(origin, target)),
        ShapeKind::EmptyOval => {
            let filled = filled_oval(BoundingBox::new(origin, target));
            let members: BTreeSet<Cell> = filled.iter().copied().collect();
            filled
                .into_iter()
                .filter(|cell| {
                    cell.cardinal_neighbors()
                        .iter()
                        .any(|neighbor| !members.contains(neighbor))
                })
                .collect()
        }
    }
}

/// Straight line along whichever axis the target is farther along.
fn snapped_line(origin: Cell, target: Cell) -> Vec<Cell> {
    let dx = target.x() - origin.x();
    let dz = target.z() - origin.z();
    if dx.abs() >= dz.abs() {
        let step = dx.signum();
        (0..=dx.abs())
            .map(|i| Cell::new(origin.x() + i * step, origin.z()))
            .collect()
    } else {
        let step = dz.signum();
        (0..=dz.abs())
            .map(|i| Cell::new(origin.x(), origin.z() + i * step))
            .collect()
    }
}

fn bresenham(origin: Cell, target: Cell) -> Vec<Cell> {
    let (mut x, mut z) = (origin.x(), origin.z());
    let dx = (target.x() - x).abs();
    let dz = -(target.z() - z).abs();
    let sx = if x < target.x() { 1 } else { -1 };
    let sz = if z < target.z() { 1 } else { -1 };
    let mut err = dx + dz;
    let mut line = Vec::new();

    loop {
        line.push(Cell::new(x, z));
        if x == target.x() && z == target.z() {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dz {
            err += dz;
            x += sx;
        }
        if doubled <= dx {
            err += dx;
            z += sz;
        }
    }

    line
}

fn filled_oval(bounds: BoundingBox) -> Vec<Cell> {
    let centre_x = (f64::from(bounds.min().x()) + f64::from(bounds.max().x())) / 2.0;
    let centre_z = (f64::from(bounds.min().z()) + f64::from(bounds.max().z())) / 2.0;
    let radius_x = f64::from(bounds.width()) / 2.0;
    let radius_z = f64::from(bounds.height()) / 2.0;

    bounds
        .cells()
        .filter(|cell| {
            let nx = (f64::from(cell.x()) - centre_x) / radius_x;
            let nz = (f64::from(cell.z()) - centre_z) / radius_z;
            nx * nx + nz * nz <= 1.0
        })
        .collect()
}

/// Width and height of the box spanned by two corners.
#[must_use]
pub fn dimensions(origin: Cell, target: Cell) -> (u32, u32) {
    let bounds = BoundingBox::new(origin, target);
    (bounds.width(), bounds.height())
}

/// Formats the live dimensions of a selection as `"W by H"`.
#[must_use]
pub fn format_dimensions(origin: Cell, target: Cell) -> String {
    let (width, height) = dimensions(origin, target);
    format!("{width} by {height}")
}

/// Reports whether a selection of `cell_count` cells fills its bounding box.
#[must_use]
pub fn is_regular_rectangle(cell_count: usize, origin: Cell, target: Cell) -> bool {
    u64::try_from(cell_count).ok() == Some(BoundingBox::new(origin, target).area())
}

/// Formats a finalized selection as `"W by H"` when it fills its box and
/// `"N cells"` otherwise.
#[must_use]
pub fn format_size(cell_count: usize, origin: Cell, target: Cell) -> String {
    if is_regular_rectangle(cell_count, origin, target) {
        format_dimensions(origin, target)
    } else if cell_count == 1 {
        "1 cell".to_owned()
    } else {
        format!("{cell_count} cells")
    }
}
