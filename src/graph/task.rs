//! Tasks: units of work bound to one graph edge.

use crate::graph::types::{EdgeRef, NodeId, Objective};

/// A unit of work competing for allocation each step.
///
/// While a task is live its target node must exist in the full graph; the
/// planner discards tasks whose target has vanished.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    /// The edge whose traversal completes the task.
    pub edge: EdgeRef,
    pub reward: f64,
    pub objective: Objective,
}

impl Task {
    #[must_use]
    pub fn new(edge: EdgeRef, reward: f64, objective: Objective) -> Self {
        Self {
            edge,
            reward,
            objective,
        }
    }

    /// The node an agent must reach to complete this task.
    #[must_use]
    pub fn target_node(&self) -> NodeId {
        self.edge.target
    }
}
