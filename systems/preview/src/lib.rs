#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Incremental two-corner selection helper.
//!
//! The preview keeps the first and second corner of a shape selection and the
//! cells the shape currently covers. Cursor movement recomputes the cells, but
//! a [`PreviewChange`] is only reported when the number of covered cells moves,
//! so callers can tie audio feedback to it without chattering on every frame.

use cellwise_core::{Cell, ShapeKind};
use cellwise_system_geometry as geometry;

/// Notification that the previewed cell count changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewChange {
    /// Cells covered by the shape after the update.
    pub cell_count: usize,
    /// Width of the selection bounding box.
    pub width: u32,
    /// Height of the selection bounding box.
    pub height: u32,
}

/// Two-corner selection state for a single shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapePreview {
    shape: ShapeKind,
    first: Option<Cell>,
    second: Option<Cell>,
    moving: Option<Cell>,
    cells: Vec<Cell>,
    last_count: Option<usize>,
}

impl ShapePreview {
    /// Creates an empty preview for the shape.
    #[must_use]
    pub const fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            first: None,
            second: None,
            moving: None,
            cells: Vec::new(),
            last_count: None,
        }
    }

    /// Shape being previewed.
    #[must_use]
    pub const fn shape(&self) -> ShapeKind {
        self.shape
    }

    /// Switches shape, discarding any corners.
    pub fn set_shape(&mut self, shape: ShapeKind) {
        *self = Self::new(shape);
    }

    /// Anchors the selection at `cell`.
    pub fn set_first_corner(&mut self, cell: Cell) {
        self.first = Some(cell);
        self.second = None;
        self.recompute(cell);
    }

    /// Recomputes the covered cells with the cursor as the moving corner.
    ///
    /// Returns a change only when the cell count differs from the last update.
    /// Does nothing until the first corner is set or after the second one is.
    pub fn update(&mut self, cursor: Cell) -> Option<PreviewChange> {
        let first = self.first?;
        if self.second.is_some() {
            return None;
        }
        let previous = self.last_count;
        self.recompute(cursor);
        if previous == Some(self.cells.len()) {
            return None;
        }
        let (width, height) = geometry::dimensions(first, cursor);
        Some(PreviewChange {
            cell_count: self.cells.len(),
            width,
            height,
        })
    }

    /// Fixes the second corner, returning the final covered cells.
    ///
    /// Returns `None` when no first corner has been set.
    pub fn set_second_corner(&mut self, cell: Cell) -> Option<&[Cell]> {
        let _ = self.first?;
        self.recompute(cell);
        self.second = Some(cell);
        Some(&self.cells)
    }

    /// Drops both corners while keeping the shape.
    pub fn clear(&mut self) {
        self.set_shape(self.shape);
    }

    /// First corner, if set.
    #[must_use]
    pub const fn first_corner(&self) -> Option<Cell> {
        self.first
    }

    /// Second corner, if set.
    #[must_use]
    pub const fn second_corner(&self) -> Option<Cell> {
        self.second
    }

    /// Reports whether both corners are set.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    /// Cells currently covered by the shape.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Live `"W by H"` dimensions of the selection.
    #[must_use]
    pub fn dimensions_label(&self) -> Option<String> {
        let first = self.first?;
        let other = self.second.or(self.moving)?;
        Some(geometry::format_dimensions(first, other))
    }

    /// Final size: `"W by H"` for full boxes and `"N cells"` otherwise.
    #[must_use]
    pub fn size_label(&self) -> Option<String> {
        let first = self.first?;
        let second = self.second?;
        Some(geometry::format_size(self.cells.len(), first, second))
    }

    fn recompute(&mut self, moving: Cell) {
        if let Some(first) = self.first {
            self.cells = geometry::cells(self.shape, first, moving);
            self.moving = Some(moving);
            self.last_count = Some(self.cells.len());
        }
    }
}
