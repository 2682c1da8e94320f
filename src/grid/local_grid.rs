//! The local occupancy grid snapshot.

use crate::config::GridConfig;
use crate::error::{Error, Result};
use crate::grid::raster::line_cells;
use crate::{CellIndex, Point};

/// An immutable occupancy raster captured around an agent.
///
/// Row index increases as world-y decreases (image convention). One
/// instance is produced per sampling cycle and discarded after use. Cells
/// outside the stored data are treated as occupied, so lines leaving the
/// snapshot always collide.
pub struct LocalGrid {
    /// World position of the agent when the snapshot was captured.
    center: Point,
    side_cells: i64,
    cell_size_m: f64,
    /// Single-channel intensity, row-major, `side_cells * side_cells`.
    data: Vec<u8>,
    config: GridConfig,
}

impl LocalGrid {
    /// Wraps raster data captured at `center`.
    ///
    /// # Panics
    /// Panics if `data` does not match the configured grid area.
    #[must_use]
    pub fn new(center: Point, config: GridConfig, data: Vec<u8>) -> Self {
        let side = config.side_cells();
        assert_eq!(
            data.len(),
            (side * side) as usize,
            "local grid data must be side_cells^2"
        );
        Self {
            center,
            side_cells: side,
            cell_size_m: config.cell_size_m,
            data,
            config,
        }
    }

    #[must_use]
    pub fn side_cells(&self) -> i64 {
        self.side_cells
    }

    #[must_use]
    pub fn length_m(&self) -> f64 {
        self.config.length_m
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// The cell the capturing agent sits in.
    #[must_use]
    pub fn center_cell(&self) -> CellIndex {
        (self.side_cells / 2, self.side_cells / 2)
    }

    /// True iff the world coordinate falls within half the grid extent of
    /// the capture center on both axes.
    #[must_use]
    pub fn is_within(&self, xy: Point) -> bool {
        let half = self.config.length_m / 2.0;
        (xy.0 - self.center.0).abs() <= half && (xy.1 - self.center.1).abs() <= half
    }

    /// Converts a world coordinate to this grid's `(row, col)` index.
    /// Errors when the coordinate lies outside the grid; callers must
    /// check [`Self::is_within`] first.
    pub fn world_to_cell(&self, xy: Point) -> Result<CellIndex> {
        if !self.is_within(xy) {
            return Err(Error::OutsideLocalGrid { x: xy.0, y: xy.1 });
        }
        let half = self.config.length_m / 2.0;
        let col = ((xy.0 - self.center.0 + half) / self.cell_size_m).floor() as i64;
        let row = ((-xy.1 + self.center.1 + half) / self.cell_size_m).floor() as i64;
        Ok((row, col))
    }

    /// Converts a cell index back to the world coordinate of its top-left
    /// corner; exact inverse of [`Self::world_to_cell`] up to flooring.
    #[must_use]
    pub fn cell_to_world(&self, rc: CellIndex) -> Point {
        let half = self.config.length_m / 2.0;
        let x = self.center.0 - half + rc.1 as f64 * self.cell_size_m;
        let y = self.center.1 + half - rc.0 as f64 * self.cell_size_m;
        (x, y)
    }

    fn intensity(&self, rc: CellIndex) -> Option<u8> {
        let (r, c) = rc;
        if r < 0 || c < 0 || r >= self.side_cells || c >= self.side_cells {
            return None;
        }
        self.data.get((r * self.side_cells + c) as usize).copied()
    }

    /// True if the cell blocks traversal under the configured occupancy
    /// policy. Cells outside the snapshot count as occupied.
    #[must_use]
    pub fn cell_is_occupied(&self, rc: CellIndex) -> bool {
        match self.intensity(rc) {
            Some(value) => self.config.occupancy.is_occupied(value),
            None => true,
        }
    }

    /// Rasterizes the straight line between two cells and tests every
    /// traversed cell against the occupancy policy. Returns `(true, None)`
    /// when the line is free, otherwise `(false, Some(world_point))` with
    /// the first colliding cell's world coordinate.
    #[must_use]
    pub fn line_is_collision_free(&self, a: CellIndex, b: CellIndex) -> (bool, Option<Point>) {
        for cell in line_cells(a, b) {
            if self.cell_is_occupied(cell) {
                return (false, Some(self.cell_to_world(cell)));
            }
        }
        (true, None)
    }
}
