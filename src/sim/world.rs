//! A synthetic occupancy world that spoofs local grid captures.

use crate::config::GridConfig;
use crate::grid::LocalGrid;
use crate::{CellIndex, Point};

const FREE: u8 = 255;
const OCCUPIED: u8 = 0;

/// A global occupancy raster centered on the world origin, from which
/// per-agent [`LocalGrid`] snapshots are cropped. Cells outside the map
/// read as occupied, so agents cannot sample their way off the edge.
pub struct SimWorld {
    length_m: f64,
    cell_size_m: f64,
    side_cells: i64,
    data: Vec<u8>,
    objects: Vec<(Point, String)>,
}

impl SimWorld {
    /// An open square arena of the given side length with occupied border
    /// walls.
    #[must_use]
    pub fn open_arena(length_m: f64, cell_size_m: f64) -> Self {
        let side_cells = (length_m / cell_size_m) as i64;
        let side = side_cells as usize;
        let mut data = vec![FREE; side * side];
        for r in 0..side {
            for c in 0..side {
                if r == 0 || c == 0 || r == side - 1 || c == side - 1 {
                    data[r * side + c] = OCCUPIED;
                }
            }
        }
        Self {
            length_m,
            cell_size_m,
            side_cells,
            data,
            objects: Vec::new(),
        }
    }

    /// Fills a rectangular region (world coordinates) with occupied cells.
    pub fn add_obstacle_block(&mut self, min: Point, max: Point) {
        let side = self.side_cells as usize;
        for r in 0..side {
            for c in 0..side {
                let (x, y) = self.cell_center((r as i64, c as i64));
                if x >= min.0 && x <= max.0 && y >= min.1 && y <= max.1 {
                    self.data[r * side + c] = OCCUPIED;
                }
            }
        }
    }

    /// Places a labeled world object for agents to perceive.
    pub fn add_object(&mut self, position: Point, label: &str) {
        self.objects.push((position, label.to_owned()));
    }

    fn world_to_cell(&self, xy: Point) -> CellIndex {
        let half = self.length_m / 2.0;
        let col = ((xy.0 + half) / self.cell_size_m).floor() as i64;
        let row = ((half - xy.1) / self.cell_size_m).floor() as i64;
        (row, col)
    }

    fn cell_center(&self, rc: CellIndex) -> Point {
        let half = self.length_m / 2.0;
        let x = -half + (rc.1 as f64 + 0.5) * self.cell_size_m;
        let y = half - (rc.0 as f64 + 0.5) * self.cell_size_m;
        (x, y)
    }

    fn intensity_at(&self, xy: Point) -> u8 {
        let (r, c) = self.world_to_cell(xy);
        if r < 0 || c < 0 || r >= self.side_cells || c >= self.side_cells {
            return OCCUPIED;
        }
        self.data[(r * self.side_cells + c) as usize]
    }

    /// Crops a local grid snapshot around `center`, sampling the world at
    /// each local cell's center. Off-map cells come back occupied.
    #[must_use]
    pub fn capture_local_grid(&self, center: Point, config: GridConfig) -> LocalGrid {
        let side = config.side_cells();
        let half = config.length_m / 2.0;
        let mut data = Vec::with_capacity((side * side) as usize);
        for r in 0..side {
            for c in 0..side {
                let x = center.0 - half + (c as f64 + 0.5) * config.cell_size_m;
                let y = center.1 + half - (r as f64 + 0.5) * config.cell_size_m;
                data.push(self.intensity_at((x, y)));
            }
        }
        LocalGrid::new(center, config, data)
    }

    /// Objects within Euclidean `radius` of a position.
    #[must_use]
    pub fn objects_within(&self, position: Point, radius: f64) -> Vec<(Point, String)> {
        self.objects
            .iter()
            .filter(|(pos, _)| (pos.0 - position.0).hypot(pos.1 - position.1) <= radius)
            .cloned()
            .collect()
    }
}
