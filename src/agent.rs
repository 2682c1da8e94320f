//! The mobile agent record.

use tracing::debug;

use crate::graph::{CapabilitySet, NodeId, NodeKind, SituationalGraph, Task};
use crate::planning::Plan;
use crate::Point;

/// One mobile agent. Owned by the mission loop; the planner and executor
/// read and write it, everything else sees only its handles.
#[derive(Debug)]
pub struct Agent {
    pub id: usize,
    pub pos: Point,
    pub previous_pos: Point,
    /// The waypoint this agent is currently localized to. Only meaningful
    /// once `localized` is set.
    pub at_wp: NodeId,
    pub capabilities: CapabilitySet,
    pub task: Option<Task>,
    pub plan: Option<Plan>,
    /// Count of executed move actions, for reporting.
    pub steps_taken: u64,
    pub localized: bool,
}

impl Agent {
    #[must_use]
    pub fn new(id: usize, start_pos: Point, capabilities: CapabilitySet) -> Self {
        Self {
            id,
            pos: start_pos,
            previous_pos: start_pos,
            at_wp: 0,
            capabilities,
            task: None,
            plan: None,
            steps_taken: 0,
            localized: false,
        }
    }

    /// Moves the agent, remembering where it came from.
    pub fn move_to(&mut self, pos: Point) {
        self.previous_pos = self.pos;
        self.pos = pos;
        self.steps_taken += 1;
    }

    /// Binds the agent to the waypoint at (or nearest within half a meter
    /// of) its current position. Returns false when no waypoint is close
    /// enough.
    pub fn localize_to_waypoint(&mut self, graph: &SituationalGraph) -> bool {
        let candidates = graph.get_nodes_of_type_in_margin(self.pos, 0.5, &NodeKind::Waypoint);
        match candidates.first() {
            Some(&wp) => {
                self.at_wp = wp;
                self.localized = true;
                debug!(agent = self.id, at_wp = wp, "localized to waypoint");
                true
            }
            None => false,
        }
    }

    /// Drops the current task and any plan derived from it.
    pub fn clear_task(&mut self) {
        self.task = None;
        self.plan = None;
    }
}
