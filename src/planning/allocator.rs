//! Utility-greedy task selection.

use std::collections::BTreeSet;

use tracing::debug;

use crate::events::{EventSink, MissionEvent};
use crate::graph::{GraphView, NodeId, Task};

/// Selects, per agent and per step, the most useful reachable task.
///
/// Allocation is greedy and per-agent: it maximizes `reward / path_cost`
/// over the capability-filtered graph and is recomputed every step. No
/// attempt is made at globally optimal multi-agent assignment.
#[derive(Debug, Default)]
pub struct TaskAllocator;

impl TaskAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the reachable task with the highest utility, or `None` when
    /// nothing is reachable.
    ///
    /// A zero path cost (the agent already stands at the target) scores as
    /// infinite utility. Utility ties go to the earliest task in the live
    /// list; that insertion-order tie-break is part of the contract.
    pub fn select_task(
        &self,
        agent: usize,
        at_wp: NodeId,
        view: &GraphView,
        events: &mut dyn EventSink,
    ) -> Option<Task> {
        let targets: BTreeSet<NodeId> = view.tasks().iter().map(Task::target_node).collect();
        let (costs, _paths) = view.distances_and_paths(at_wp, &targets);

        let mut utilities = Vec::new();
        let mut best: Option<(f64, Task)> = None;
        for task in view.tasks() {
            let Some(&cost) = costs.get(&task.target_node()) else {
                continue;
            };
            let utility = if cost == 0.0 {
                f64::INFINITY
            } else {
                task.reward / cost
            };
            utilities.push((task.target_node(), utility));

            let improves = match &best {
                None => true,
                // Strict comparison keeps the first task on ties.
                Some((best_utility, _)) => utility > *best_utility,
            };
            if improves {
                best = Some((utility, task.clone()));
            }
        }

        events.post(&MissionEvent::TaskUtilitiesComputed { agent, utilities });

        match best {
            Some((utility, task)) => {
                debug!(agent, target = task.target_node(), utility, "task selected");
                Some(task)
            }
            None => None,
        }
    }
}
