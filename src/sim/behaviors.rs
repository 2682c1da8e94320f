//! Simulated behavior implementations.
//!
//! These move the agent instantaneously and mutate the graph the way the
//! platform layer would: exploring consumes frontiers into waypoints,
//! samples new frontiers from a spoofed local grid, links shortcuts, and
//! records perceived world objects. None of them touch the task list.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::agent::Agent;
use crate::config::{GridConfig, SamplerConfig};
use crate::graph::{Behavior, EdgeRef, NodeId, NodeKind, Objective, SituationalGraph, Task};
use crate::grid::{FrontierSampler, LocalGrid};
use crate::planning::{BehaviorImpl, BehaviorRegistry, ExecutionResult};
use crate::sim::world::SimWorld;

/// Moves the agent along a traversable edge and localizes it to the
/// target waypoint.
#[derive(Debug, Default)]
pub struct GotoBehavior;

impl BehaviorImpl for GotoBehavior {
    fn execute(
        &mut self,
        agent: &mut Agent,
        graph: &mut SituationalGraph,
        edge: &EdgeRef,
    ) -> ExecutionResult {
        let Some(target_pos) = graph.position_of(edge.target) else {
            return ExecutionResult::failure();
        };
        agent.move_to(target_pos);
        if graph.node(edge.target).is_some_and(|n| n.kind.is_waypoint()) {
            agent.at_wp = edge.target;
        }
        ExecutionResult::success()
    }
}

/// Visits a world object. The agent keeps its waypoint localization; the
/// assessment itself is instantaneous in simulation.
#[derive(Debug, Default)]
pub struct AssessBehavior;

impl BehaviorImpl for AssessBehavior {
    fn execute(
        &mut self,
        agent: &mut Agent,
        graph: &mut SituationalGraph,
        edge: &EdgeRef,
    ) -> ExecutionResult {
        let Some(target_pos) = graph.position_of(edge.target) else {
            return ExecutionResult::failure();
        };
        agent.move_to(target_pos);
        debug!(agent = agent.id, node = edge.target, "world object assessed");
        ExecutionResult::success()
    }
}

/// Tuning knobs for the simulated exploration behavior.
#[derive(Clone, Copy, Debug)]
pub struct ExploreBehaviorConfig {
    /// Radius within which observable nodes get shortcut edges.
    pub shortcut_margin_m: f64,
    /// Candidate frontiers closer than this to a known waypoint or
    /// frontier are discarded, so sampling converges on covered space.
    pub frontier_spacing_m: f64,
    /// Radius within which world objects are perceived.
    pub perception_radius_m: f64,
    /// Reward attached to assessment tasks for perceived objects.
    pub assess_reward: f64,
}

impl Default for ExploreBehaviorConfig {
    fn default() -> Self {
        Self {
            shortcut_margin_m: 3.0,
            frontier_spacing_m: 2.0,
            perception_radius_m: 2.5,
            assess_reward: 5.0,
        }
    }
}

/// Consumes a frontier into a waypoint, then discovers new graph
/// structure around the agent's new position.
pub struct ExploreBehavior {
    world: Rc<SimWorld>,
    sampler: FrontierSampler,
    grid_config: GridConfig,
    config: ExploreBehaviorConfig,
}

impl ExploreBehavior {
    #[must_use]
    pub fn new(
        world: Rc<SimWorld>,
        sampler_config: SamplerConfig,
        grid_config: GridConfig,
        config: ExploreBehaviorConfig,
    ) -> Self {
        Self {
            world,
            sampler: FrontierSampler::new(sampler_config),
            grid_config,
            config,
        }
    }

    /// Merges sampled frontier candidates into the graph, discarding
    /// exact-position duplicates and candidates crowding known nodes.
    fn merge_frontiers(
        &mut self,
        graph: &mut SituationalGraph,
        grid: &LocalGrid,
        parent_wp: NodeId,
    ) {
        let candidates = match self.sampler.sample_frontiers(grid) {
            Ok(points) => points,
            Err(err) => {
                warn!(%err, "skipping frontier sampling this cycle");
                return;
            }
        };
        for point in candidates {
            if graph.contains_position(point) {
                continue;
            }
            let spacing = self.config.frontier_spacing_m;
            let crowded = !graph
                .get_nodes_of_type_in_margin(point, spacing, &NodeKind::Waypoint)
                .is_empty()
                || !graph
                    .get_nodes_of_type_in_margin(point, spacing, &NodeKind::Frontier)
                    .is_empty();
            if crowded {
                continue;
            }
            graph.add_frontier_node(point, parent_wp);
        }
    }

    /// Links the new waypoint to observable nodes not yet connected to it,
    /// when a collision-free line exists.
    fn link_shortcuts(
        &self,
        agent: &Agent,
        graph: &mut SituationalGraph,
        grid: &LocalGrid,
        wp: NodeId,
    ) {
        let Ok(agent_cell) = grid.world_to_cell(agent.pos) else {
            return;
        };
        for kind in [NodeKind::Waypoint, NodeKind::Frontier] {
            let observable =
                graph.get_nodes_of_type_in_margin(agent.pos, self.config.shortcut_margin_m, &kind);
            for node in observable {
                if node == wp || graph.has_edge_between(wp, node) {
                    continue;
                }
                let Some(position) = graph.position_of(node) else {
                    continue;
                };
                if !grid.is_within(position) {
                    continue;
                }
                let Ok(node_cell) = grid.world_to_cell(position) else {
                    continue;
                };
                let (free, _) = grid.line_is_collision_free(agent_cell, node_cell);
                if !free {
                    continue;
                }
                let behavior = if kind.is_frontier() {
                    Behavior::Explore
                } else {
                    Behavior::Goto
                };
                graph.add_edge_of_type(wp, node, behavior);
                debug!(agent = agent.id, from = wp, to = node, "shortcut found");
            }
        }
    }

    /// Records newly perceived world objects and derives assessment tasks
    /// for them.
    fn perceive_objects(&self, agent: &Agent, graph: &mut SituationalGraph, wp: NodeId) {
        for (position, label) in self.world.objects_within(agent.pos, self.config.perception_radius_m)
        {
            if graph.contains_position(position) {
                continue;
            }
            debug!(agent = agent.id, label, "world object found");
            let object = graph.add_world_object_node(position, &label);
            if let Some(edge) = graph.add_edge_of_type(wp, object, Behavior::Assess) {
                graph.push_task(Task::new(edge, self.config.assess_reward, Objective::Assess));
            }
        }
    }
}

impl BehaviorImpl for ExploreBehavior {
    fn execute(
        &mut self,
        agent: &mut Agent,
        graph: &mut SituationalGraph,
        edge: &EdgeRef,
    ) -> ExecutionResult {
        let Some(frontier_pos) = graph.position_of(edge.target) else {
            return ExecutionResult::failure();
        };
        agent.move_to(frontier_pos);

        // Consume the frontier into a waypoint linked back to where the
        // agent came from. The bootstrap self-loop targets a waypoint
        // already, so there is nothing to consume.
        let wp = if graph.node(edge.target).is_some_and(|n| n.kind.is_frontier()) {
            graph.remove_frontier_node(edge.target);
            let wp = graph.add_waypoint_node(frontier_pos);
            graph.add_edge_of_type(edge.source, wp, Behavior::Goto);
            wp
        } else {
            edge.target
        };
        agent.at_wp = wp;

        let grid = self.world.capture_local_grid(agent.pos, self.grid_config);
        self.merge_frontiers(graph, &grid, wp);
        self.link_shortcuts(agent, graph, &grid, wp);
        self.perceive_objects(agent, graph, wp);

        ExecutionResult::success()
    }
}

/// Wires the full simulated behavior set for a world.
#[must_use]
pub fn sim_behavior_registry(
    world: &Rc<SimWorld>,
    sampler_config: SamplerConfig,
    grid_config: GridConfig,
    explore_config: ExploreBehaviorConfig,
) -> BehaviorRegistry {
    let mut registry = BehaviorRegistry::new();
    registry.register(
        Behavior::Explore,
        Box::new(ExploreBehavior::new(
            Rc::clone(world),
            sampler_config,
            grid_config,
            explore_config,
        )),
    );
    registry.register(Behavior::Goto, Box::new(GotoBehavior));
    registry.register(Behavior::Assess, Box::new(AssessBehavior));
    registry
}
