//! Crate-wide error type.
//!
//! All planner and sampler failures are recoverable: the pipeline discards
//! the affected task or skips sampling for the step, logs the error, and
//! the mission loop carries on. Only exceeding the step budget terminates
//! a mission early, and that is reported through
//! [`crate::mission::MissionOutcome`], not through this type.

use thiserror::Error;

use crate::graph::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    /// No task was reachable for the agent under its capability filter.
    /// Not necessarily fatal: it may just mean "explore more".
    #[error("no reachable task for agent {agent}")]
    CouldNotFindTask { agent: usize },

    /// The task's target is unreachable on the capability-filtered graph.
    /// The task is discarded, not retried.
    #[error("could not find a plan towards node {target}")]
    CouldNotFindPlan { target: NodeId },

    /// The task's target vanished from the full graph, typically because
    /// another agent consumed the frontier first.
    #[error("target node {target} no longer exists in the graph")]
    TargetNodeNotFound { target: NodeId },

    /// The frontier sampler found no collision-free candidate within its
    /// retry bound.
    #[error("frontier sampling exhausted after {attempts} attempts")]
    SamplingExhausted { attempts: usize },

    /// A world coordinate was converted to a cell index without being
    /// inside the local grid. Callers must check `is_within` first.
    #[error("world coordinate ({x:.2}, {y:.2}) is outside the local grid")]
    OutsideLocalGrid { x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
