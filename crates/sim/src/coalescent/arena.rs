//! Arena of genealogy records built during the backtrace.
//!
//! Nodes are ancestral genomes identified by their index in the arena. An
//! edge records that the child's sites `[start, end)` were copied from the
//! parent. Ids grow with creation order, and a parent is always created after
//! its children, so every edge satisfies `parent > child`.

use super::segments::SegmentSet;

/// Index of a node in the [`Genealogy`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An ancestral genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// Generations before the present
    pub time: u64,
}

/// Inheritance of a site range from parent to child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    pub start: usize,
    pub end: usize,
}

/// Lineage left without an ancestor when the backtrace stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub node: NodeId,
    pub segments: SegmentSet,
}

/// Node and edge records of one backtrace.
#[derive(Debug, Clone, Default)]
pub struct Genealogy {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    unresolved: Vec<Unresolved>,
}

impl Genealogy {
    /// Arena holding `samples` present-day nodes with ids `0..samples`.
    pub fn with_samples(samples: usize) -> Self {
        Self {
            nodes: vec![Node { time: 0 }; samples],
            edges: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    /// Add a node living `time` generations ago.
    pub fn add_node(&mut self, time: u64) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { time });
        id
    }

    /// Record that `child` inherited every segment of `segments` from `parent`.
    pub fn add_edges(&mut self, parent: NodeId, child: NodeId, segments: &SegmentSet) {
        debug_assert!(parent > child);
        self.edges.extend(segments.iter().map(|s| Edge {
            parent,
            child,
            start: s.start,
            end: s.end,
        }));
    }

    pub(crate) fn mark_unresolved(&mut self, node: NodeId, segments: SegmentSet) {
        self.unresolved.push(Unresolved { node, segments });
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in creation order; parents never decrease along the slice.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn unresolved(&self) -> &[Unresolved] {
        &self.unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genealogy_ids_follow_creation_order() {
        let mut g = Genealogy::with_samples(3);
        assert_eq!(g.nodes().len(), 3);
        let a = g.add_node(10);
        let b = g.add_node(12);
        assert_eq!(a, NodeId(3));
        assert_eq!(b, NodeId(4));
        assert_eq!(g.node(b).time, 12);
        assert_eq!(g.node(NodeId(0)).time, 0);
    }

    #[test]
    fn test_add_edges_one_per_segment() {
        let mut g = Genealogy::with_samples(2);
        let parent = g.add_node(5);
        let segments = SegmentSet::window(8, 4, 10);
        g.add_edges(parent, NodeId(1), &segments);
        assert_eq!(
            g.edges(),
            &[
                Edge { parent, child: NodeId(1), start: 0, end: 2 },
                Edge { parent, child: NodeId(1), start: 8, end: 10 },
            ]
        );
    }
}
