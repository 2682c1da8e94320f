//! Closed type vocabulary of the situational graph.

use std::collections::BTreeSet;
use std::mem;

/// Stable handle to a node; unique within one graph instance.
pub type NodeId = usize;

/// Stable handle to an edge; unique within one graph instance.
pub type EdgeId = usize;

/// The set of capability tags an agent holds, or an edge demands.
pub type CapabilitySet = BTreeSet<Capability>;

/// What a graph node represents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A location the agent has visited and localized to.
    Waypoint,
    /// An observed-but-unvisited direction, candidate for exploration.
    Frontier,
    /// A perceived object with a free-form semantic label.
    WorldObject { label: String },
}

impl NodeKind {
    /// Compares variants only, ignoring any payload. Used by margin
    /// queries where the label of a world object is irrelevant.
    #[must_use]
    pub fn matches(&self, other: &NodeKind) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    #[must_use]
    pub fn is_frontier(&self) -> bool {
        matches!(self, NodeKind::Frontier)
    }

    #[must_use]
    pub fn is_waypoint(&self) -> bool {
        matches!(self, NodeKind::Waypoint)
    }
}

/// The executable unit bound to an edge, looked up in a
/// [`crate::planning::BehaviorRegistry`] at execution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Behavior {
    Explore,
    Goto,
    Assess,
    PlanExtraction,
}

/// A tag an agent either has or lacks, gating which edges it may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    CanAssess,
    CanPlanExtraction,
}

/// What completing a task achieves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    ExploreAllFrontiers,
    Assess,
    Extraction,
}

/// An oriented view of an edge as it appears in tasks and plans.
///
/// The underlying edge is traversable both ways; an `EdgeRef` fixes the
/// direction of one traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRef {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeRef {
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
