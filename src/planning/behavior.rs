//! The executable boundary between planning and actuation.
//!
//! A behavior is the opaque unit bound to an edge's type. In a real
//! deployment it drives hardware and may block; any internal timeout must
//! surface as an unsuccessful result, never hang the loop. Behaviors may
//! move the agent and mutate the graph, but task lifecycle belongs to the
//! executor: a behavior must never touch the task list.

use std::collections::BTreeMap;

use crate::agent::Agent;
use crate::graph::{Behavior, EdgeRef, SituationalGraph};

/// Outcome of executing one plan step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
}

impl ExecutionResult {
    #[must_use]
    pub fn success() -> Self {
        Self { success: true }
    }

    #[must_use]
    pub fn failure() -> Self {
        Self { success: false }
    }
}

/// An executable unit invoked once per plan step.
pub trait BehaviorImpl {
    fn execute(
        &mut self,
        agent: &mut Agent,
        graph: &mut SituationalGraph,
        edge: &EdgeRef,
    ) -> ExecutionResult;
}

/// Configured mapping from edge behavior to its implementation.
#[derive(Default)]
pub struct BehaviorRegistry {
    implementations: BTreeMap<Behavior, Box<dyn BehaviorImpl>>,
}

impl BehaviorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, behavior: Behavior, implementation: Box<dyn BehaviorImpl>) {
        self.implementations.insert(behavior, implementation);
    }

    pub fn get_mut(&mut self, behavior: Behavior) -> Option<&mut Box<dyn BehaviorImpl>> {
        self.implementations.get_mut(&behavior)
    }
}
