//! Tests for utility-greedy task selection across capability sets.

use knowledge_roadmap::config::GraphConfig;
use knowledge_roadmap::events::{MissionEvent, NullSink, RecordingSink};
use knowledge_roadmap::graph::{
    Behavior, Capability, CapabilitySet, Objective, SituationalGraph, Task,
};
use knowledge_roadmap::TaskAllocator;

#[test]
fn test_missing_capability_redirects_allocation() {
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let w0 = graph.add_waypoint_node((0.0, 0.0));
    // A nearby object behind an assessment-only edge, and a farther
    // frontier anyone can explore.
    let object = graph.add_world_object_node((1.0, 0.0), "victim");
    let assess_edge = graph.add_edge_of_type(w0, object, Behavior::Assess).unwrap();
    graph.push_task(Task::new(assess_edge, 5.0, Objective::Assess));
    let frontier = graph.add_frontier_node((4.0, 0.0), w0);

    let allocator = TaskAllocator::new();

    let incapable_view = graph.filter_by_capabilities(&CapabilitySet::new());
    let task = allocator
        .select_task(0, w0, &incapable_view, &mut NullSink)
        .unwrap();
    assert_eq!(task.target_node(), frontier);

    // With the capability, the closer high-reward object wins.
    let capable_view =
        graph.filter_by_capabilities(&CapabilitySet::from([Capability::CanAssess]));
    let task = allocator
        .select_task(0, w0, &capable_view, &mut NullSink)
        .unwrap();
    assert_eq!(task.target_node(), object);
}

#[test]
fn test_equal_utilities_keep_the_earliest_task() {
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let w0 = graph.add_waypoint_node((0.0, 0.0));
    // Two frontiers at identical distance and reward.
    let first = graph.add_frontier_node((3.0, 0.0), w0);
    let second = graph.add_frontier_node((0.0, 3.0), w0);

    let view = graph.filter_by_capabilities(&CapabilitySet::new());
    let task = TaskAllocator::new()
        .select_task(0, w0, &view, &mut NullSink)
        .unwrap();
    assert_eq!(task.target_node(), first);
    assert_ne!(task.target_node(), second);
}

#[test]
fn test_higher_reward_wins_at_equal_cost() {
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let w0 = graph.add_waypoint_node((0.0, 0.0));
    let plain = graph.add_frontier_node((3.0, 0.0), w0);
    let object = graph.add_world_object_node((0.0, 3.0), "victim");
    let edge = graph.add_edge_of_type(w0, object, Behavior::Assess).unwrap();
    graph.push_task(Task::new(edge, 10.0, Objective::Assess));

    let view =
        graph.filter_by_capabilities(&CapabilitySet::from([Capability::CanAssess]));
    let task = TaskAllocator::new()
        .select_task(0, w0, &view, &mut NullSink)
        .unwrap();
    assert_eq!(task.target_node(), object);
    assert_ne!(task.target_node(), plain);
}

#[test]
fn test_utilities_event_reports_every_scored_task() {
    let mut graph = SituationalGraph::new(GraphConfig::default());
    let w0 = graph.add_waypoint_node((0.0, 0.0));
    let near = graph.add_frontier_node((2.0, 0.0), w0);
    let far = graph.add_frontier_node((4.0, 0.0), w0);

    let mut sink = RecordingSink::default();
    let view = graph.filter_by_capabilities(&CapabilitySet::new());
    TaskAllocator::new().select_task(7, w0, &view, &mut sink);

    assert_eq!(sink.events.len(), 1);
    let MissionEvent::TaskUtilitiesComputed { agent, utilities } = &sink.events[0] else {
        panic!("expected a utilities event, got {:?}", sink.events[0]);
    };
    assert_eq!(*agent, 7);
    assert_eq!(utilities.len(), 2);
    let near_utility = utilities.iter().find(|(n, _)| *n == near).unwrap().1;
    let far_utility = utilities.iter().find(|(n, _)| *n == far).unwrap().1;
    assert!(near_utility > far_utility);
}
