//! Typed event publication.
//!
//! The core emits named events through an injected sink and never depends
//! on a listener's presence or return value. Visualization, statistics
//! collection, and operator front ends all live behind this boundary.

use crate::graph::NodeId;
use crate::Point;

/// Events published by the mission loop and the planning stack.
#[derive(Clone, Debug, PartialEq)]
pub enum MissionEvent {
    /// A mission step finished and the graph may have changed.
    GraphUpdated {
        step: u64,
        nodes: usize,
        edges: usize,
        tasks: usize,
    },
    /// An agent localized to its start waypoint.
    StartPointLocated { agent: usize, position: Point },
    /// The allocator scored the reachable tasks for an agent, keyed by
    /// task target node.
    TaskUtilitiesComputed {
        agent: usize,
        utilities: Vec<(NodeId, f64)>,
    },
    /// All tasks are exhausted.
    MissionCompleted { steps: u64 },
}

/// Observer interface for mission events.
pub trait EventSink {
    fn post(&mut self, event: &MissionEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn post(&mut self, _event: &MissionEvent) {}
}

/// Forwards events to the `tracing` subscriber at debug level.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn post(&mut self, event: &MissionEvent) {
        tracing::debug!(?event, "mission event");
    }
}

/// Records every event, used by tests to assert on emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<MissionEvent>,
}

impl EventSink for RecordingSink {
    fn post(&mut self, event: &MissionEvent) {
        self.events.push(event.clone());
    }
}
