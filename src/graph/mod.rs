//! The typed situational graph (TOSG).
//!
//! Nodes are waypoints, frontiers, or world objects; edges carry the
//! behavior that traverses them and the capabilities that behavior
//! demands. The graph also owns the ordered list of live tasks.

mod situational_graph;
mod task;
mod types;

pub use situational_graph::{Edge, GraphView, Node, SituationalGraph};
pub use task::Task;
pub use types::{Behavior, Capability, CapabilitySet, EdgeId, EdgeRef, NodeId, NodeKind, Objective};
