//! Run configuration.
//!
//! Every component takes its configuration as an explicit value at
//! construction time so that multiple missions with different settings can
//! run in the same process. All values are treated as immutable for the
//! duration of a run.

use std::collections::BTreeMap;

use crate::graph::{Behavior, Capability, CapabilitySet};

/// Which intensity values count as occupied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionRule {
    /// A cell collides when its intensity is below the threshold
    /// (bright-is-free occupancy images).
    BelowThreshold,
    /// A cell collides when its intensity is above the threshold
    /// (cost-map style data).
    AboveThreshold,
}

/// Occupancy interpretation for a raster snapshot.
///
/// The threshold and rule vary by data source; the collision algorithm
/// itself is scenario-agnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OccupancyPolicy {
    pub threshold: u8,
    pub rule: CollisionRule,
}

impl OccupancyPolicy {
    /// Returns true if a cell with the given intensity blocks traversal.
    #[must_use]
    pub fn is_occupied(&self, intensity: u8) -> bool {
        match self.rule {
            CollisionRule::BelowThreshold => intensity < self.threshold,
            CollisionRule::AboveThreshold => intensity > self.threshold,
        }
    }
}

impl Default for OccupancyPolicy {
    fn default() -> Self {
        Self {
            threshold: 220,
            rule: CollisionRule::BelowThreshold,
        }
    }
}

/// Geometry of the local occupancy grid captured around an agent.
#[derive(Clone, Copy, Debug)]
pub struct GridConfig {
    /// Side length of the square grid in meters.
    pub length_m: f64,
    /// World-space size of one cell in meters.
    pub cell_size_m: f64,
    pub occupancy: OccupancyPolicy,
}

impl GridConfig {
    /// Number of cells along one side of the grid.
    #[must_use]
    pub fn side_cells(&self) -> i64 {
        (self.length_m / self.cell_size_m) as i64
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            length_m: 10.0,
            cell_size_m: 0.5,
            occupancy: OccupancyPolicy::default(),
        }
    }
}

/// Frontier sampling parameters.
#[derive(Clone, Copy, Debug)]
pub struct SamplerConfig {
    /// Outer radius of the sampling annulus, in cells.
    pub sample_radius_cells: f64,
    /// Number of frontier candidates collected per sampling cycle.
    pub frontier_count: usize,
    /// Retry bound per candidate before sampling reports exhaustion.
    pub max_attempts: usize,
    /// Fixed rng seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_radius_cells: 8.0,
            frontier_count: 4,
            max_attempts: 200,
            seed: None,
        }
    }
}

/// Capability requirements per behavior, injected into the graph so that
/// every created edge carries the capabilities it demands.
#[derive(Clone, Debug, Default)]
pub struct BehaviorRequirements {
    requirements: BTreeMap<Behavior, CapabilitySet>,
}

impl BehaviorRequirements {
    /// The default search-and-rescue domain: assessing requires
    /// `CanAssess`, extraction planning requires `CanPlanExtraction`,
    /// moving and exploring require nothing.
    #[must_use]
    pub fn domain_defaults() -> Self {
        let mut requirements = BTreeMap::new();
        requirements.insert(
            Behavior::Assess,
            CapabilitySet::from([Capability::CanAssess]),
        );
        requirements.insert(
            Behavior::PlanExtraction,
            CapabilitySet::from([Capability::CanPlanExtraction]),
        );
        Self { requirements }
    }

    pub fn set(&mut self, behavior: Behavior, capabilities: CapabilitySet) {
        self.requirements.insert(behavior, capabilities);
    }

    /// Capabilities required to traverse an edge of the given behavior.
    #[must_use]
    pub fn required_for(&self, behavior: Behavior) -> CapabilitySet {
        self.requirements.get(&behavior).cloned().unwrap_or_default()
    }
}

/// Configuration owned by the situational graph.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    pub requirements: BehaviorRequirements,
    /// Reward attached to every derived exploration task.
    pub exploration_reward: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            requirements: BehaviorRequirements::domain_defaults(),
            exploration_reward: 1.0,
        }
    }
}

/// Mission-level settings.
#[derive(Clone, Copy, Debug)]
pub struct MissionConfig {
    /// Hard bound on simulation steps; exceeding it ends the mission as
    /// incomplete, which is reported distinctly from task exhaustion.
    pub max_steps: u64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self { max_steps: 400 }
    }
}
