//! Orchestrates agents, graph, allocator, and planner step by step.

use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::config::MissionConfig;
use crate::events::{EventSink, MissionEvent};
use crate::graph::{Behavior, SituationalGraph};
use crate::planning::{BehaviorRegistry, Planner, TaskAllocator};

/// How a mission ended. Budget exhaustion is a distinct terminal condition
/// from task exhaustion and must never be conflated with completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionOutcome {
    /// Every task was consumed.
    Completed { steps: u64 },
    /// The step budget ran out with tasks still live.
    StepBudgetExhausted { steps: u64 },
}

impl MissionOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, MissionOutcome::Completed { .. })
    }
}

/// Runs a mission to completion or step-budget exhaustion.
///
/// Agents are processed strictly in index order within each step and the
/// graph is mutated in place between agent turns, so a later agent's
/// allocation sees an earlier agent's consumed frontiers within the same
/// tick. That ordering is a determinism choice, not an accident.
pub struct MissionRunner {
    config: MissionConfig,
    planner: Planner,
    allocator: TaskAllocator,
    registry: BehaviorRegistry,
    events: Box<dyn EventSink>,
}

impl MissionRunner {
    #[must_use]
    pub fn new(config: MissionConfig, registry: BehaviorRegistry, events: Box<dyn EventSink>) -> Self {
        Self {
            config,
            planner: Planner::new(),
            allocator: TaskAllocator::new(),
            registry,
            events,
        }
    }

    /// Seeds the graph with start waypoints, localizes every agent, and
    /// plants one bootstrap exploration task per agent so the first step
    /// has work to allocate.
    pub fn initialize(&mut self, agents: &mut [Agent], graph: &mut SituationalGraph) {
        let mut seeded: Vec<(f64, f64)> = Vec::new();
        for agent in agents.iter() {
            // One waypoint per unique start position.
            if !seeded.contains(&agent.pos) {
                graph.add_waypoint_node(agent.pos);
                seeded.push(agent.pos);
            }
        }

        for agent in agents.iter_mut() {
            if !agent.localize_to_waypoint(graph) {
                warn!(agent = agent.id, "agent failed to localize at start");
                continue;
            }
            self.events.post(&MissionEvent::StartPointLocated {
                agent: agent.id,
                position: agent.pos,
            });

            // The self-loop EXPLORE edge guarantees an initial sampling
            // action at the start node.
            if let Some(edge) = graph.add_edge_of_type(agent.at_wp, agent.at_wp, Behavior::Explore)
            {
                graph.push_exploration_task(edge);
            }
        }
    }

    /// Runs initialization and the main loop, returning how the mission
    /// ended.
    pub fn run(&mut self, agents: &mut [Agent], graph: &mut SituationalGraph) -> MissionOutcome {
        self.initialize(agents, graph);

        let mut step: u64 = 0;
        let mut completed = graph.check_if_tasks_exhausted();

        while !completed && step < self.config.max_steps {
            for agent in agents.iter_mut() {
                if !agent.localized {
                    continue;
                }
                completed = self.planner.pipeline(
                    agent,
                    graph,
                    &mut self.registry,
                    &self.allocator,
                    self.events.as_mut(),
                );
            }
            step += 1;

            self.events.post(&MissionEvent::GraphUpdated {
                step,
                nodes: graph.node_count(),
                edges: graph.edge_count(),
                tasks: graph.tasks.len(),
            });
            debug!(
                step,
                nodes = graph.node_count(),
                tasks = graph.tasks.len(),
                "step finished"
            );
        }

        if completed {
            self.events.post(&MissionEvent::MissionCompleted { steps: step });
            info!(step, "mission completed, all tasks exhausted");
            MissionOutcome::Completed { steps: step }
        } else {
            warn!(
                step,
                live_tasks = graph.tasks.len(),
                "step budget exhausted before tasks"
            );
            MissionOutcome::StepBudgetExhausted { steps: step }
        }
    }
}
