//! Randomized frontier sampling over a local occupancy grid.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::config::SamplerConfig;
use crate::error::{Error, Result};
use crate::grid::local_grid::LocalGrid;
use crate::{CellIndex, Point};

/// Samples candidate frontier points around an agent.
///
/// Candidates are drawn from an annulus biased towards the outer band of
/// the sampling disk and accepted only when the straight line from the
/// grid center is collision-free. Retries per candidate are capped so a
/// fully blocked band surfaces [`Error::SamplingExhausted`] instead of
/// spinning forever.
pub struct FrontierSampler {
    rng: StdRng,
    config: SamplerConfig,
}

impl FrontierSampler {
    #[must_use]
    pub fn new(config: SamplerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, config }
    }

    /// Draws one collision-free cell in the annulus around `center`.
    ///
    /// The radius is `radius * sqrt(uniform(0.6, 1.0))`, which avoids
    /// samples too close to the center, and the angle is uniform over the
    /// full circle.
    pub fn sample_point_around(
        &mut self,
        center: CellIndex,
        radius_cells: f64,
        grid: &LocalGrid,
    ) -> Result<CellIndex> {
        for attempt in 0..self.config.max_attempts {
            let r = radius_cells * self.rng.random_range(0.6..1.0f64).sqrt();
            let theta = self.rng.random_range(0.0..TAU);

            let candidate = (
                center.0 + (r * theta.sin()) as i64,
                center.1 + (r * theta.cos()) as i64,
            );

            let (free, collision) = grid.line_is_collision_free(center, candidate);
            if free {
                trace!(?candidate, attempt, "accepted frontier candidate");
                return Ok(candidate);
            }
            trace!(?candidate, ?collision, "candidate rejected, resampling");
        }
        Err(Error::SamplingExhausted {
            attempts: self.config.max_attempts,
        })
    }

    /// Collects the configured number of accepted candidates around the
    /// grid center and converts them to world coordinates.
    ///
    /// Duplicates are not filtered here; the graph-merge step discards
    /// candidates whose exact position is already known.
    pub fn sample_frontiers(&mut self, grid: &LocalGrid) -> Result<Vec<Point>> {
        let center = grid.center_cell();
        let mut frontiers = Vec::with_capacity(self.config.frontier_count);
        while frontiers.len() < self.config.frontier_count {
            let cell = self.sample_point_around(center, self.config.sample_radius_cells, grid)?;
            frontiers.push(grid.cell_to_world(cell));
        }
        Ok(frontiers)
    }
}
