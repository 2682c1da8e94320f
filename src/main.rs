#![warn(clippy::all, clippy::pedantic)]

//! Demo mission: two agents explore a walled arena with obstacles and a
//! couple of world objects, one agent capable of assessment.

use std::rc::Rc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use knowledge_roadmap::config::{GraphConfig, GridConfig, MissionConfig, SamplerConfig};
use knowledge_roadmap::events::LogSink;
use knowledge_roadmap::graph::{Capability, CapabilitySet};
use knowledge_roadmap::sim::{sim_behavior_registry, ExploreBehaviorConfig, SimWorld};
use knowledge_roadmap::{Agent, MissionOutcome, MissionRunner, SituationalGraph};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A 30 m arena with two obstacle blocks and two objects worth
    // assessing.
    let mut world = SimWorld::open_arena(30.0, 0.5);
    world.add_obstacle_block((-6.0, 2.0), (-2.0, 8.0));
    world.add_obstacle_block((3.0, -8.0), (8.0, -3.0));
    world.add_object((6.0, 6.0), "victim");
    world.add_object((-8.0, -6.0), "gas leak");
    let world = Rc::new(world);

    let grid_config = GridConfig::default();
    let sampler_config = SamplerConfig {
        seed: Some(7),
        ..SamplerConfig::default()
    };
    let registry = sim_behavior_registry(
        &world,
        sampler_config,
        grid_config,
        ExploreBehaviorConfig::default(),
    );

    let mut graph = SituationalGraph::new(GraphConfig::default());
    let mut agents = vec![
        Agent::new(
            0,
            (-10.0, -10.0),
            CapabilitySet::from([Capability::CanAssess]),
        ),
        Agent::new(1, (10.0, 10.0), CapabilitySet::new()),
    ];

    let mut runner = MissionRunner::new(
        MissionConfig { max_steps: 400 },
        registry,
        Box::new(LogSink),
    );
    let outcome = runner.run(&mut agents, &mut graph);

    let move_actions: u64 = agents.iter().map(|agent| agent.steps_taken).sum();
    match outcome {
        MissionOutcome::Completed { steps } => info!(
            steps,
            move_actions,
            nodes = graph.node_count(),
            "exploration completed"
        ),
        MissionOutcome::StepBudgetExhausted { steps } => info!(
            steps,
            move_actions,
            live_tasks = graph.tasks.len(),
            "step budget exhausted before completing exploration"
        ),
    }
}
