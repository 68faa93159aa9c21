//! Dense edge identities.
//!
//! Every directed edge gets a zero-based index in the order the raw graph
//! exposes it. All downstream tables reference edges by this index only;
//! the `(tail, head)` lookup exists for resolving raw data against it.

use hashbrown::HashMap;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use super::road::RawEdge;
use crate::{EdgeIndex, Error, NodeId};

#[derive(Debug, Clone)]
pub struct EdgeRegistry {
    /// Topology only: node weights are OSM ids, edge weights are edge indices
    graph: DiGraph<NodeId, EdgeIndex>,
    nodes: HashMap<NodeId, NodeIndex>,
    edges: HashMap<(NodeId, NodeId), EdgeIndex>,
    endpoints: Vec<(NodeId, NodeId)>,
}

impl EdgeRegistry {
    /// Assigns indices `0..edges.len()` in slice order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateEdge`] if two edges share the same
    /// `(tail, head)` pair.
    pub fn build(edges: &[RawEdge]) -> Result<Self, Error> {
        let mut graph = DiGraph::with_capacity(edges.len(), edges.len());
        let mut nodes: HashMap<NodeId, NodeIndex> = HashMap::new();
        let mut lookup = HashMap::with_capacity(edges.len());
        let mut endpoints = Vec::with_capacity(edges.len());

        for (index, edge) in edges.iter().enumerate() {
            let key = (edge.tail, edge.head);
            if lookup.insert(key, index).is_some() {
                return Err(Error::DuplicateEdge {
                    tail: edge.tail,
                    head: edge.head,
                });
            }

            let tail = *nodes
                .entry(edge.tail)
                .or_insert_with(|| graph.add_node(edge.tail));
            let head = *nodes
                .entry(edge.head)
                .or_insert_with(|| graph.add_node(edge.head));
            graph.add_edge(tail, head, index);
            endpoints.push(key);
        }

        Ok(Self {
            graph,
            nodes,
            edges: lookup,
            endpoints,
        })
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn index_of(&self, tail: NodeId, head: NodeId) -> Option<EdgeIndex> {
        self.edges.get(&(tail, head)).copied()
    }

    pub fn endpoints(&self, index: EdgeIndex) -> Option<(NodeId, NodeId)> {
        self.endpoints.get(index).copied()
    }

    /// `(index, tail, head)` for every edge, in index order
    pub fn iter(&self) -> impl Iterator<Item = (EdgeIndex, NodeId, NodeId)> + '_ {
        self.endpoints
            .iter()
            .enumerate()
            .map(|(index, &(tail, head))| (index, tail, head))
    }

    /// Edges ending at `node`, ascending by index
    pub fn incoming(&self, node: NodeId) -> Vec<EdgeIndex> {
        self.nodes
            .get(&node)
            .map(|&idx| self.edges_at(idx, Direction::Incoming))
            .unwrap_or_default()
    }

    /// Edges starting at `node`, ascending by index
    pub fn outgoing(&self, node: NodeId) -> Vec<EdgeIndex> {
        self.nodes
            .get(&node)
            .map(|&idx| self.edges_at(idx, Direction::Outgoing))
            .unwrap_or_default()
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub(crate) fn edges_at(&self, node: NodeIndex, direction: Direction) -> Vec<EdgeIndex> {
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(node, direction)
            .map(|edge| *edge.weight())
            .collect();
        // petgraph walks adjacency lists newest-first
        edges.sort_unstable();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_edges() -> Vec<RawEdge> {
        vec![
            RawEdge::new(1, 2, 10.0),
            RawEdge::new(2, 3, 10.0),
            RawEdge::new(3, 2, 10.0),
            RawEdge::new(2, 4, 10.0),
        ]
    }

    #[test]
    fn test_indices_are_dense_and_ordered() {
        let registry = EdgeRegistry::build(&sample_edges()).unwrap();
        assert_eq!(registry.len(), 4);
        let indices: Vec<_> = registry.iter().map(|(index, _, _)| index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(registry.endpoints(2), Some((3, 2)));
        assert_eq!(registry.endpoints(4), None);
    }

    #[test]
    fn test_lookup_returns_input_index() {
        let edges = sample_edges();
        let registry = EdgeRegistry::build(&edges).unwrap();
        for (index, edge) in edges.iter().enumerate() {
            assert_eq!(registry.index_of(edge.tail, edge.head), Some(index));
        }
        assert_eq!(registry.index_of(4, 2), None);
    }

    #[test]
    fn test_rebuild_is_reproducible() {
        let first = EdgeRegistry::build(&sample_edges()).unwrap();
        let second = EdgeRegistry::build(&sample_edges()).unwrap();
        assert!(first.iter().eq(second.iter()));
    }

    #[test]
    fn test_duplicate_edge_is_rejected() {
        let mut edges = sample_edges();
        edges.push(RawEdge::new(2, 3, 12.0));
        let err = EdgeRegistry::build(&edges).unwrap_err();
        assert!(matches!(err, Error::DuplicateEdge { tail: 2, head: 3 }));
    }

    #[test]
    fn test_incoming_and_outgoing_edges() {
        let registry = EdgeRegistry::build(&sample_edges()).unwrap();
        assert_eq!(registry.incoming(2), vec![0, 2]);
        assert_eq!(registry.outgoing(2), vec![1, 3]);
        assert!(registry.incoming(1).is_empty());
        assert!(registry.outgoing(99).is_empty());
        assert_eq!(registry.node_count(), 4);
    }
}
