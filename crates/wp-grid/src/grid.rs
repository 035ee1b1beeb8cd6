//! Sample lattice over a bounding box.
//!
//! # Layout
//!
//! Cells are stored row-major: rows run along `y`, columns along `x`, and
//! cell `(row, col)` lives at index `row * cols + col`.  The sample of column
//! `c` sits at `min_x + c · cell_size` (likewise for rows), so the lattice
//! starts on the box's minimum corner and never extends past its maximum.
//!
//! Per axis the count is `ceil(span / cell_size)`, computed with a 1e-9
//! slack so that spans which are an exact multiple of the cell size in
//! decimal (0.9 / 0.3) do not pick up an extra column from binary rounding.
//! A box `(0,0)-(2,2)` with cell size 1 is therefore a 2×2 lattice at
//! `{0, 1} × {0, 1}`.
//!
//! A lattice with more cells than the builder's limit
//! ([`DEFAULT_MAX_CELLS`] unless raised) is rejected before allocation.

use log::debug;

use wp_core::CoreError;

use crate::GridResult;

/// Slack subtracted before `ceil` when counting cells per axis.
const COUNT_SLACK: f64 = 1e-9;

/// Default upper bound on the cells one grid may hold (32 MiB cells).
pub const DEFAULT_MAX_CELLS: usize = 1 << 25;

// ── BBox ──────────────────────────────────────────────────────────────────────

/// Axis-aligned planar bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Inclusive containment test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Finite corners with `min < max` on both axes.
    pub fn validate(&self) -> GridResult<()> {
        let corners = [self.min_x, self.min_y, self.max_x, self.max_y];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(CoreError::Invalid(format!("bounding box has a non-finite corner: {self:?}")).into());
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(CoreError::Invalid(format!("bounding box is empty or inverted: {self:?}")).into());
        }
        Ok(())
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One lattice sample.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x:        f64,
    pub y:        f64,
    /// Traversal cost, `>= 0`; `f64::INFINITY` marks impassable cells.
    pub cost:     f64,
    pub obstacle: bool,
}

impl Cell {
    /// A free, zero-cost sample at `(x, y)`.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, cost: 0.0, obstacle: false }
    }

    #[inline]
    pub fn is_traversable(&self) -> bool {
        !self.obstacle && self.cost.is_finite()
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Row-major lattice of cells.  Built by [`GridBuilder`], annotated by
/// [`CostMapBuilder`][crate::CostMapBuilder], then read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    bbox:      BBox,
    cell_size: f64,
    rows:      usize,
    cols:      usize,
    cells:     Vec<Cell>,
}

impl Grid {
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Flat index of `(row, col)`, or `None` if out of range.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// `(x, y)` of every cell in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.cells.iter().map(|c| (c.x, c.y))
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.obstacle).count()
    }

    /// `false` for obstacles, infinite-cost cells and out-of-range indices.
    pub fn is_traversable(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(Cell::is_traversable)
    }

    /// The `(row, col)` of the sample nearest to world coordinate `(x, y)`,
    /// or `None` if that falls outside the lattice.
    pub fn world_to_cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = ((x - self.bbox.min_x) / self.cell_size).round();
        let row = ((y - self.bbox.min_y) / self.cell_size).round();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        self.index(row, col).map(|_| (row, col))
    }
}

// ── GridBuilder ───────────────────────────────────────────────────────────────

/// Discretise a bounding box into a [`Grid`].
///
/// # Example
///
/// ```
/// use wp_grid::{BBox, GridBuilder};
///
/// let grid = GridBuilder::new(BBox::new(0.0, 0.0, 2.0, 2.0), 1.0).build().unwrap();
/// assert_eq!((grid.rows(), grid.cols()), (2, 2));
/// ```
pub struct GridBuilder {
    bbox:      BBox,
    cell_size: f64,
    max_cells: usize,
}

impl GridBuilder {
    pub fn new(bbox: BBox, cell_size: f64) -> Self {
        Self { bbox, cell_size, max_cells: DEFAULT_MAX_CELLS }
    }

    /// Raise or lower the cell-count limit (default [`DEFAULT_MAX_CELLS`]).
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Number of samples along an axis of length `span`, kept in `f64` so
    /// that huge spans are caught before any integer cast.
    fn axis_count(span: f64, cell_size: f64) -> f64 {
        (span / cell_size - COUNT_SLACK).ceil().max(1.0)
    }

    /// Validate the inputs and lay out every cell with cost 0, no obstacle.
    pub fn build(self) -> GridResult<Grid> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CoreError::Invalid(format!(
                "cell size must be positive and finite, got {}",
                self.cell_size
            ))
            .into());
        }
        self.bbox.validate()?;

        let cols = Self::axis_count(self.bbox.width(), self.cell_size);
        let rows = Self::axis_count(self.bbox.height(), self.cell_size);
        let max_cells = self.max_cells.min(isize::MAX as usize / size_of::<Cell>());
        if !(rows * cols).is_finite() || rows * cols > max_cells as f64 {
            return Err(CoreError::Invalid(format!(
                "{rows}×{cols} grid at cell size {} exceeds the limit of {max_cells} cells",
                self.cell_size
            ))
            .into());
        }
        let (rows, cols) = (rows as usize, cols as usize);
        let len = rows * cols;

        let mut cells = Vec::with_capacity(len);
        for r in 0..rows {
            let y = self.bbox.min_y + r as f64 * self.cell_size;
            for c in 0..cols {
                let x = self.bbox.min_x + c as f64 * self.cell_size;
                cells.push(Cell::new(x, y));
            }
        }
        debug!("grid {rows}×{cols} at cell size {}", self.cell_size);

        Ok(Grid {
            bbox: self.bbox,
            cell_size: self.cell_size,
            rows,
            cols,
            cells,
        })
    }
}
