//! Occupancy-raster geometry: coordinate transforms, line-of-sight
//! collision checks, and randomized frontier sampling.

mod local_grid;
mod raster;
mod sampler;

pub use local_grid::LocalGrid;
pub use raster::line_cells;
pub use sampler::FrontierSampler;
