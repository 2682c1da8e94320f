//! Plan generation and the per-step execution state machine.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::error::Error;
use crate::events::EventSink;
use crate::graph::{EdgeRef, GraphView, NodeId, SituationalGraph, Task};
use crate::planning::allocator::TaskAllocator;
use crate::planning::behavior::BehaviorRegistry;

/// An ordered edge path from the agent's waypoint to a task's target.
///
/// Consumed front-first: each successful behavior execution pops one edge,
/// and the plan becomes empty exactly when the target has been reached.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    edges: VecDeque<EdgeRef>,
}

impl Plan {
    #[must_use]
    pub fn new(edges: Vec<EdgeRef>) -> Self {
        Self {
            edges: edges.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The edge the executor will run next.
    #[must_use]
    pub fn upcoming_edge(&self) -> Option<EdgeRef> {
        self.edges.front().copied()
    }

    /// The node this plan ultimately leads to.
    #[must_use]
    pub fn final_target(&self) -> Option<NodeId> {
        self.edges.back().map(|edge| edge.target)
    }

    /// Consumes the front edge after its behavior succeeded.
    pub fn pop_completed_edge(&mut self) {
        self.edges.pop_front();
    }

    /// A plan is valid only while non-empty and while its final target
    /// still exists in the full graph. Re-checked before every step:
    /// another agent may have consumed the target frontier mid-plan.
    #[must_use]
    pub fn is_valid(&self, graph: &SituationalGraph) -> bool {
        match self.final_target() {
            Some(target) => graph.has_node(target),
            None => false,
        }
    }
}

enum PlanningDecision {
    NoTask,
    TargetGone(Task),
    Unreachable(Task),
    Planned { task: Task, plan: Plan },
}

/// Runs one agent through task selection, plan generation, and one step of
/// plan execution.
///
/// Selection and planning are recomputed every step; execution makes one
/// edge of progress per call. All planning failures are recovered locally
/// by discarding the affected task.
#[derive(Debug, Default)]
pub struct Planner;

impl Planner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// One pipeline pass for one agent. Returns true iff the live task
    /// list is empty afterwards.
    pub fn pipeline(
        &self,
        agent: &mut Agent,
        graph: &mut SituationalGraph,
        registry: &mut BehaviorRegistry,
        allocator: &TaskAllocator,
        events: &mut dyn EventSink,
    ) -> bool {
        Self::purge_stale_tasks(graph);
        if agent.localized {
            let decision = {
                let view = graph.filter_by_capabilities(&agent.capabilities);
                match allocator.select_task(agent.id, agent.at_wp, &view, events) {
                    None => PlanningDecision::NoTask,
                    Some(task) => Self::plan_for_task(agent.at_wp, &view, graph, task),
                }
            };
            match decision {
                PlanningDecision::NoTask => {
                    let err = Error::CouldNotFindTask { agent: agent.id };
                    debug!(%err, "no allocation this step");
                    agent.clear_task();
                    return graph.check_if_tasks_exhausted();
                }
                PlanningDecision::TargetGone(task) => {
                    let err = Error::TargetNodeNotFound {
                        target: task.target_node(),
                    };
                    warn!(agent = agent.id, %err, "discarding task");
                    graph.remove_task(&task);
                    agent.clear_task();
                }
                PlanningDecision::Unreachable(task) => {
                    let err = Error::CouldNotFindPlan {
                        target: task.target_node(),
                    };
                    warn!(agent = agent.id, %err, "discarding task");
                    graph.remove_task(&task);
                    agent.clear_task();
                }
                PlanningDecision::Planned { task, plan } => {
                    agent.task = Some(task);
                    agent.plan = Some(plan);
                }
            }
        }

        self.execute_step(agent, graph, registry);
        graph.check_if_tasks_exhausted()
    }

    /// Drops live tasks whose target node no longer exists. Frontier
    /// removal leaves such tasks behind; the allocator never scores them
    /// (no path cost exists), so without this pass they would block task
    /// exhaustion forever.
    fn purge_stale_tasks(graph: &mut SituationalGraph) {
        let stale: Vec<Task> = graph
            .tasks
            .iter()
            .filter(|task| !graph.has_node(task.target_node()))
            .cloned()
            .collect();
        for task in stale {
            let err = Error::TargetNodeNotFound {
                target: task.target_node(),
            };
            warn!(%err, "purging stale task");
            graph.remove_task(&task);
        }
    }

    /// Validates the task target against the full graph, then searches the
    /// capability-filtered view for an edge path to it.
    fn plan_for_task(
        at_wp: NodeId,
        view: &GraphView,
        full_graph: &SituationalGraph,
        task: Task,
    ) -> PlanningDecision {
        let target = task.target_node();
        if !full_graph.has_node(target) {
            return PlanningDecision::TargetGone(task);
        }

        // The bootstrap exploration task is a self-loop at the agent's own
        // waypoint; its plan is that single edge.
        if task.edge.is_self_loop() && task.edge.source == at_wp {
            let plan = Plan::new(vec![task.edge]);
            return PlanningDecision::Planned { task, plan };
        }

        match view.shortest_path(at_wp, target) {
            Some(path) if !path.is_empty() => {
                let plan = Plan::new(path);
                PlanningDecision::Planned { task, plan }
            }
            _ => PlanningDecision::Unreachable(task),
        }
    }

    /// Executes the upcoming edge of the agent's plan, if any.
    fn execute_step(
        &self,
        agent: &mut Agent,
        graph: &mut SituationalGraph,
        registry: &mut BehaviorRegistry,
    ) {
        let Some(mut plan) = agent.plan.take() else {
            return;
        };
        if !plan.is_valid(graph) {
            debug!(agent = agent.id, "plan invalidated, dropping task");
            self.destroy_task(agent, graph);
            return;
        }
        let Some(edge) = plan.upcoming_edge() else {
            return;
        };
        let Some(behavior) = graph.behavior_of_edge(edge.id) else {
            debug!(agent = agent.id, edge = edge.id, "edge vanished, dropping task");
            self.destroy_task(agent, graph);
            return;
        };
        let Some(implementation) = registry.get_mut(behavior) else {
            warn!(agent = agent.id, ?behavior, "no implementation registered");
            self.destroy_task(agent, graph);
            return;
        };

        let result = implementation.execute(agent, graph, &edge);

        if result.success {
            plan.pop_completed_edge();
            if plan.is_empty() {
                // Target reached: mission progress, not failure.
                info!(agent = agent.id, target = edge.target, "task completed");
                self.destroy_task(agent, graph);
            } else {
                agent.plan = Some(plan);
            }
        } else {
            debug!(agent = agent.id, edge = edge.id, "behavior failed, dropping task");
            self.destroy_task(agent, graph);
        }
    }

    /// Removes the agent's task from the live list and clears its state.
    fn destroy_task(&self, agent: &mut Agent, graph: &mut SituationalGraph) {
        if let Some(task) = &agent.task {
            graph.remove_task(task);
        }
        agent.clear_task();
    }
}
