//! Tests for the mission loop and the planning pipeline: bootstrap
//! allocation, failure handling, stale-task cleanup, and a full
//! simulated exploration run.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use knowledge_roadmap::config::{GraphConfig, GridConfig, MissionConfig, SamplerConfig};
use knowledge_roadmap::events::{EventSink, MissionEvent, NullSink};
use knowledge_roadmap::graph::{
    Behavior, CapabilitySet, EdgeRef, Objective, SituationalGraph, Task,
};
use knowledge_roadmap::planning::{BehaviorImpl, BehaviorRegistry, ExecutionResult};
use knowledge_roadmap::sim::{sim_behavior_registry, ExploreBehaviorConfig, SimWorld};
use knowledge_roadmap::{
    Agent, MissionOutcome, MissionRunner, Planner, TaskAllocator,
};

/// Event sink whose storage outlives the runner that owns it.
#[derive(Clone, Default)]
struct SharedSink {
    events: Rc<RefCell<Vec<MissionEvent>>>,
}

impl EventSink for SharedSink {
    fn post(&mut self, event: &MissionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Succeeds without discovering anything, so the bootstrap task is the
/// only work a mission ever sees.
struct InertExplore;

impl BehaviorImpl for InertExplore {
    fn execute(
        &mut self,
        _agent: &mut Agent,
        _graph: &mut SituationalGraph,
        _edge: &EdgeRef,
    ) -> ExecutionResult {
        ExecutionResult::success()
    }
}

/// Replays scripted outcomes and records which edges it was asked to
/// traverse. Successful moves mimic a real goto.
struct ScriptedGoto {
    outcomes: VecDeque<bool>,
    traversed: Rc<RefCell<Vec<usize>>>,
}

impl BehaviorImpl for ScriptedGoto {
    fn execute(
        &mut self,
        agent: &mut Agent,
        graph: &mut SituationalGraph,
        edge: &EdgeRef,
    ) -> ExecutionResult {
        self.traversed.borrow_mut().push(edge.id);
        if self.outcomes.pop_front().unwrap_or(false) {
            if let Some(position) = graph.position_of(edge.target) {
                agent.move_to(position);
            }
            agent.at_wp = edge.target;
            ExecutionResult::success()
        } else {
            ExecutionResult::failure()
        }
    }
}

fn waypoint_chain(graph: &mut SituationalGraph, length: usize) -> Vec<EdgeRef> {
    let mut previous = graph.add_waypoint_node((0.0, 0.0));
    let mut edges = Vec::new();
    for i in 1..=length {
        #[allow(clippy::cast_precision_loss)]
        let next = graph.add_waypoint_node((i as f64, 0.0));
        edges.push(graph.add_edge_of_type(previous, next, Behavior::Goto).unwrap());
        previous = next;
    }
    edges
}

fn localized_agent(graph: &SituationalGraph) -> Agent {
    let mut agent = Agent::new(0, (0.0, 0.0), CapabilitySet::new());
    assert!(agent.localize_to_waypoint(graph));
    agent
}

#[test]
fn test_lone_agent_completes_bootstrap_in_one_step() {
    let sink = SharedSink::default();
    let mut registry = BehaviorRegistry::new();
    registry.register(Behavior::Explore, Box::new(InertExplore));

    let mut graph = SituationalGraph::new(GraphConfig::default());
    let mut agents = vec![Agent::new(0, (1.0, 1.0), CapabilitySet::new())];
    let mut runner =
        MissionRunner::new(MissionConfig::default(), registry, Box::new(sink.clone()));

    let outcome = runner.run(&mut agents, &mut graph);
    assert_eq!(outcome, MissionOutcome::Completed { steps: 1 });
    assert!(graph.check_if_tasks_exhausted());

    let events = sink.events.borrow();
    assert!(matches!(
        events[0],
        MissionEvent::StartPointLocated { agent: 0, .. }
    ));
    // The bootstrap self-loop has zero path cost, so its utility is
    // infinite.
    let utilities = events
        .iter()
        .find_map(|event| match event {
            MissionEvent::TaskUtilitiesComputed { utilities, .. } => Some(utilities),
            _ => None,
        })
        .unwrap();
    assert_eq!(utilities.len(), 1);
    assert!(utilities[0].1.is_infinite());
    assert!(matches!(
        events.last(),
        Some(MissionEvent::MissionCompleted { steps: 1 })
    ));
}

#[test]
fn test_agents_sharing_a_start_share_the_waypoint() {
    let registry = BehaviorRegistry::new();
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let mut agents = vec![
        Agent::new(0, (2.0, 2.0), CapabilitySet::new()),
        Agent::new(1, (2.0, 2.0), CapabilitySet::new()),
    ];
    let mut runner =
        MissionRunner::new(MissionConfig::default(), registry, Box::new(NullSink));

    runner.initialize(&mut agents, &mut graph);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(agents[0].at_wp, agents[1].at_wp);
    // One bootstrap exploration task per agent.
    assert_eq!(graph.tasks.len(), 2);
}

#[test]
fn test_failed_step_destroys_task_and_halts_plan() {
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let edges = waypoint_chain(&mut graph, 3);
    let target_edge = *edges.last().unwrap();
    graph.push_task(Task::new(target_edge, 1.0, Objective::ExploreAllFrontiers));
    let mut agent = localized_agent(&graph);

    let traversed = Rc::new(RefCell::new(Vec::new()));
    let mut registry = BehaviorRegistry::new();
    registry.register(
        Behavior::Goto,
        Box::new(ScriptedGoto {
            outcomes: VecDeque::from([false]),
            traversed: Rc::clone(&traversed),
        }),
    );

    let exhausted = Planner::new().pipeline(
        &mut agent,
        &mut graph,
        &mut registry,
        &TaskAllocator::new(),
        &mut NullSink,
    );

    // The failure on the first edge destroys the task; the remaining
    // plan edges are never attempted.
    assert!(exhausted);
    assert!(graph.check_if_tasks_exhausted());
    assert!(agent.task.is_none());
    assert!(agent.plan.is_none());
    assert_eq!(*traversed.borrow(), vec![edges[0].id]);
}

#[test]
fn test_pipeline_walks_a_plan_edge_by_edge() {
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let edges = waypoint_chain(&mut graph, 3);
    let target_edge = *edges.last().unwrap();
    graph.push_task(Task::new(target_edge, 1.0, Objective::ExploreAllFrontiers));
    let mut agent = localized_agent(&graph);

    let traversed = Rc::new(RefCell::new(Vec::new()));
    let mut registry = BehaviorRegistry::new();
    registry.register(
        Behavior::Goto,
        Box::new(ScriptedGoto {
            outcomes: VecDeque::from([true, true, true]),
            traversed: Rc::clone(&traversed),
        }),
    );

    let planner = Planner::new();
    let allocator = TaskAllocator::new();
    let mut exhausted = false;
    for _ in 0..3 {
        assert!(!exhausted);
        exhausted =
            planner.pipeline(&mut agent, &mut graph, &mut registry, &allocator, &mut NullSink);
    }

    assert!(exhausted, "three successful steps reach the target");
    assert_eq!(agent.at_wp, target_edge.target);
    let expected: Vec<usize> = edges.iter().map(|edge| edge.id).collect();
    assert_eq!(*traversed.borrow(), expected);
}

#[test]
fn test_stale_task_is_purged_on_next_pass() {
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let w0 = graph.add_waypoint_node((0.0, 0.0));
    let frontier = graph.add_frontier_node((2.0, 0.0), w0);
    let mut agent = localized_agent(&graph);

    // Another agent consumed the frontier; the derived task lingers.
    graph.remove_frontier_node(frontier);
    assert_eq!(graph.tasks.len(), 1);

    let mut registry = BehaviorRegistry::new();
    let exhausted = Planner::new().pipeline(
        &mut agent,
        &mut graph,
        &mut registry,
        &TaskAllocator::new(),
        &mut NullSink,
    );
    assert!(exhausted);
    assert!(graph.check_if_tasks_exhausted());
    assert!(agent.task.is_none());
}

#[test]
fn test_simulated_exploration_discovers_structure() {
    let world = Rc::new(SimWorld::open_arena(20.0, 0.5));
    let registry = sim_behavior_registry(
        &world,
        SamplerConfig {
            seed: Some(11),
            ..SamplerConfig::default()
        },
        GridConfig::default(),
        ExploreBehaviorConfig::default(),
    );

    let sink = SharedSink::default();
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let mut agents = vec![Agent::new(0, (0.0, 0.0), CapabilitySet::new())];
    let mut runner = MissionRunner::new(
        MissionConfig { max_steps: 400 },
        registry,
        Box::new(sink.clone()),
    );

    let outcome = runner.run(&mut agents, &mut graph);

    // The first exploration consumes the bootstrap and samples fresh
    // frontiers, so the graph always grows past the start waypoint.
    assert!(graph.node_count() > 1);
    assert!(agents[0].steps_taken >= 1);

    let events = sink.events.borrow();
    let step_events = events
        .iter()
        .filter(|event| matches!(event, MissionEvent::GraphUpdated { .. }))
        .count();
    match outcome {
        MissionOutcome::Completed { steps } => {
            assert!(graph.check_if_tasks_exhausted());
            assert_eq!(step_events as u64, steps);
        }
        MissionOutcome::StepBudgetExhausted { steps } => {
            assert_eq!(steps, 400);
            assert_eq!(step_events as u64, steps);
        }
    }
}
