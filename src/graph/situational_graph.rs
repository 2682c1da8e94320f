//! The mutable node/edge/task store and its shortest-path queries.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use tracing::warn;

use crate::config::GraphConfig;
use crate::graph::task::Task;
use crate::graph::types::{
    Behavior, CapabilitySet, EdgeId, EdgeRef, NodeId, NodeKind, Objective,
};
use crate::Point;

/// A node record. Position and kind are fixed at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Point,
}

/// An edge record. Endpoints always reference live nodes; only the weight
/// may change after creation, via a priority override.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub behavior: Behavior,
    pub required_capabilities: CapabilitySet,
    pub weight: f64,
}

/// The typed situational graph: waypoints, frontiers, world objects, the
/// edges between them, and the ordered live task list.
///
/// All node and edge records are exclusively owned here; agents hold only
/// handles. Iteration over nodes and edges is in handle order and
/// adjacency lists keep insertion order, so traversal results are
/// deterministic for a fixed mutation history.
pub struct SituationalGraph {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    adjacency: BTreeMap<NodeId, Vec<EdgeId>>,
    next_node: NodeId,
    next_edge: EdgeId,
    /// Live tasks in insertion order. Order is semantically meaningful:
    /// the allocator breaks utility ties in favor of the earliest entry.
    pub tasks: Vec<Task>,
    config: GraphConfig,
}

impl SituationalGraph {
    #[must_use]
    pub fn new(config: GraphConfig) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            next_node: 0,
            next_edge: 0,
            tasks: Vec::new(),
            config,
        }
    }

    fn insert_node(&mut self, kind: NodeKind, position: Point) -> NodeId {
        let id = self.next_node;
        self.next_node += 1;
        self.nodes.insert(id, Node { kind, position });
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Adds a waypoint at a visited position.
    pub fn add_waypoint_node(&mut self, position: Point) -> NodeId {
        self.insert_node(NodeKind::Waypoint, position)
    }

    /// Adds a frontier, links it to its parent waypoint with an EXPLORE
    /// edge, and appends the derived exploration task.
    pub fn add_frontier_node(&mut self, position: Point, parent_wp: NodeId) -> NodeId {
        let frontier = self.insert_node(NodeKind::Frontier, position);
        if let Some(edge) = self.add_edge_of_type(parent_wp, frontier, Behavior::Explore) {
            self.push_exploration_task(edge);
        }
        frontier
    }

    /// Adds a perceived world object.
    pub fn add_world_object_node(&mut self, position: Point, label: &str) -> NodeId {
        self.insert_node(
            NodeKind::WorldObject {
                label: label.to_owned(),
            },
            position,
        )
    }

    /// Adds an edge between two existing nodes. The weight defaults to the
    /// Euclidean distance between the endpoints (zero for self-loops) and
    /// the edge carries the capabilities its behavior requires.
    ///
    /// Returns `None` if either endpoint does not exist.
    pub fn add_edge_of_type(
        &mut self,
        source: NodeId,
        target: NodeId,
        behavior: Behavior,
    ) -> Option<EdgeRef> {
        let source_pos = self.position_of(source)?;
        let target_pos = self.position_of(target)?;
        let weight = if source == target {
            0.0
        } else {
            (source_pos.0 - target_pos.0).hypot(source_pos.1 - target_pos.1)
        };

        let id = self.next_edge;
        self.next_edge += 1;
        self.edges.insert(
            id,
            Edge {
                source,
                target,
                behavior,
                required_capabilities: self.config.requirements.required_for(behavior),
                weight,
            },
        );
        if let Some(list) = self.adjacency.get_mut(&source) {
            list.push(id);
        }
        if source != target {
            if let Some(list) = self.adjacency.get_mut(&target) {
                list.push(id);
            }
        }
        Some(EdgeRef { id, source, target })
    }

    /// Overrides an edge weight, e.g. to prioritize a frontier. Negative
    /// weights would break the shortest-path search and are clamped.
    pub fn override_edge_weight(&mut self, edge: EdgeId, weight: f64) {
        let clamped = if weight < 0.0 {
            warn!(edge, weight, "negative priority weight clamped to 0");
            0.0
        } else {
            weight
        };
        if let Some(record) = self.edges.get_mut(&edge) {
            record.weight = clamped;
        }
    }

    /// Removes a frontier node and all its incident edges. Stale tasks
    /// pointing at the removed node stay in the list; the planner clears
    /// them on its next validation pass.
    pub fn remove_frontier_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if !node.kind.is_frontier() {
            return;
        }
        let incident = self.adjacency.remove(&id).unwrap_or_default();
        for edge_id in incident {
            if let Some(edge) = self.edges.remove(&edge_id) {
                let other = if edge.source == id { edge.target } else { edge.source };
                if let Some(list) = self.adjacency.get_mut(&other) {
                    list.retain(|&e| e != edge_id);
                }
            }
        }
        self.nodes.remove(&id);
    }

    /// Appends a task for traversing the given EXPLORE edge, using the
    /// configured exploration reward.
    pub fn push_exploration_task(&mut self, edge: EdgeRef) {
        self.tasks.push(Task::new(
            edge,
            self.config.exploration_reward,
            Objective::ExploreAllFrontiers,
        ));
    }

    /// Appends an arbitrary task, preserving insertion order.
    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Removes the first matching live task, if present.
    pub fn remove_task(&mut self, task: &Task) {
        if let Some(index) = self.tasks.iter().position(|t| t == task) {
            self.tasks.remove(index);
        }
    }

    /// True iff the live task list is empty.
    #[must_use]
    pub fn check_if_tasks_exhausted(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn position_of(&self, id: NodeId) -> Option<Point> {
        self.nodes.get(&id).map(|n| n.position)
    }

    #[must_use]
    pub fn behavior_of_edge(&self, id: EdgeId) -> Option<Behavior> {
        self.edges.get(&id).map(|e| e.behavior)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if any node sits at exactly this world position. Used to merge
    /// candidate frontiers against already-known nodes.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn contains_position(&self, position: Point) -> bool {
        self.nodes.values().any(|n| n.position == position)
    }

    /// True if some edge directly connects the two nodes, in either
    /// orientation.
    #[must_use]
    pub fn has_edge_between(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency
            .get(&a)
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
            .any(|e| (e.source == a && e.target == b) || (e.source == b && e.target == a))
    }

    /// Nodes of the given kind within Euclidean `radius` of `position`,
    /// in handle order. Used for shortcut detection and localization.
    #[must_use]
    pub fn get_nodes_of_type_in_margin(
        &self,
        position: Point,
        radius: f64,
        kind: &NodeKind,
    ) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.kind.matches(kind))
            .filter(|(_, node)| {
                (node.position.0 - position.0).hypot(node.position.1 - position.1) <= radius
            })
            .map(|(&id, _)| id)
            .collect()
    }

    /// A read-only view hiding edges the given capability set cannot
    /// traverse. Nodes are unaffected.
    #[must_use]
    pub fn filter_by_capabilities<'a>(&'a self, capabilities: &CapabilitySet) -> GraphView<'a> {
        GraphView {
            graph: self,
            capabilities: capabilities.clone(),
        }
    }

    /// Shortest edge path on the full, unfiltered graph.
    #[must_use]
    pub fn shortest_path(&self, source: NodeId, target: NodeId) -> Option<Vec<EdgeRef>> {
        let (_, prev) = self.shortest_paths_from(source, &|_| true);
        reconstruct(&prev, source, target)
    }

    /// Single-source Dijkstra over edges passing the `allow` predicate,
    /// treating every edge as traversable both ways. Returns the distance
    /// map and, per reached node, the oriented edge arriving at it.
    fn shortest_paths_from<F>(
        &self,
        source: NodeId,
        allow: &F,
    ) -> (BTreeMap<NodeId, f64>, BTreeMap<NodeId, EdgeRef>)
    where
        F: Fn(&Edge) -> bool,
    {
        let mut dist = BTreeMap::new();
        let mut prev = BTreeMap::new();
        if !self.nodes.contains_key(&source) {
            return (dist, prev);
        }

        let mut heap = BinaryHeap::new();
        dist.insert(source, 0.0);
        heap.push(QueueEntry {
            cost: 0.0,
            node: source,
        });

        while let Some(QueueEntry { cost, node }) = heap.pop() {
            if let Some(&best) = dist.get(&node) {
                if cost > best {
                    continue;
                }
            }
            for edge_id in self.adjacency.get(&node).into_iter().flatten() {
                let Some(edge) = self.edges.get(edge_id) else {
                    continue;
                };
                if !allow(edge) {
                    continue;
                }
                let next_node = if edge.source == node {
                    edge.target
                } else {
                    edge.source
                };
                let next_cost = cost + edge.weight;
                let improved = match dist.get(&next_node) {
                    None => true,
                    Some(&d) => next_cost < d,
                };
                if improved {
                    dist.insert(next_node, next_cost);
                    prev.insert(
                        next_node,
                        EdgeRef {
                            id: *edge_id,
                            source: node,
                            target: next_node,
                        },
                    );
                    heap.push(QueueEntry {
                        cost: next_cost,
                        node: next_node,
                    });
                }
            }
        }
        (dist, prev)
    }
}

/// A capability-filtered, read-only view over a [`SituationalGraph`].
///
/// Hides edges whose required capabilities exceed the view's set; never
/// adds or removes anything from the underlying graph.
pub struct GraphView<'a> {
    graph: &'a SituationalGraph,
    capabilities: CapabilitySet,
}

impl GraphView<'_> {
    fn allows(&self, edge: &Edge) -> bool {
        edge.required_capabilities.is_subset(&self.capabilities)
    }

    #[must_use]
    pub fn has_node(&self, id: NodeId) -> bool {
        self.graph.has_node(id)
    }

    /// The live task list, in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.graph.tasks
    }

    /// Shortest edge path from `source` to `target` on the visible edges;
    /// empty when `source == target`, `None` when unreachable.
    #[must_use]
    pub fn shortest_path(&self, source: NodeId, target: NodeId) -> Option<Vec<EdgeRef>> {
        let (_, prev) = self
            .graph
            .shortest_paths_from(source, &|edge| self.allows(edge));
        reconstruct(&prev, source, target)
    }

    /// Costs and edge paths from `source` to every reachable node in
    /// `targets`. Unreachable targets are absent from both maps.
    #[must_use]
    pub fn distances_and_paths(
        &self,
        source: NodeId,
        targets: &BTreeSet<NodeId>,
    ) -> (BTreeMap<NodeId, f64>, BTreeMap<NodeId, Vec<EdgeRef>>) {
        let (dist, prev) = self
            .graph
            .shortest_paths_from(source, &|edge| self.allows(edge));
        let mut costs = BTreeMap::new();
        let mut paths = BTreeMap::new();
        for &target in targets {
            if let Some(&cost) = dist.get(&target) {
                if let Some(path) = reconstruct(&prev, source, target) {
                    costs.insert(target, cost);
                    paths.insert(target, path);
                }
            }
        }
        (costs, paths)
    }
}

fn reconstruct(
    prev: &BTreeMap<NodeId, EdgeRef>,
    source: NodeId,
    target: NodeId,
) -> Option<Vec<EdgeRef>> {
    if source == target {
        return Some(Vec::new());
    }
    let mut path = Vec::new();
    let mut current = target;
    while current != source {
        let step = *prev.get(&current)?;
        path.push(step);
        current = step.source;
    }
    path.reverse();
    Some(path)
}

/// Min-heap entry for the Dijkstra frontier; ties break on node id so the
/// search order is deterministic.
struct QueueEntry {
    cost: f64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the lowest cost first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}
