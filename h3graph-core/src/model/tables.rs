//! Output tables of the pipeline.
//!
//! Every record here is immutable once emitted. Edges are referenced by
//! their [`EdgeIndex`] only.

use geo::LineString;
use h3o::CellIndex;

use super::road::{RoadNode, WaySet};
use super::stats::PipelineStats;
use crate::algo::speed::SpeedSource;
use crate::{EdgeIndex, NodeId, Seconds};

/// Cost- and cell-annotated directed edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub index: EdgeIndex,
    pub tail: NodeId,
    pub head: NodeId,
    /// Length in meters
    pub length: f64,
    /// Resolved speed in km/h
    pub speed_kmh: f64,
    pub speed_source: SpeedSource,
    pub road_class: Option<String>,
    pub ways: WaySet,
    /// Travel time in seconds
    pub cost: Seconds,
    /// Cell covering the head node
    pub incoming_cell: CellIndex,
    /// Cell covering the tail node
    pub outgoing_cell: CellIndex,
    /// Resolution of the lowest common ancestor of both cells, -1 if none
    pub lca_res: i8,
    pub geometry: Option<LineString<f64>>,
}

/// Legal turn from one edge onto the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionRecord {
    pub incoming_edge: EdgeIndex,
    pub outgoing_edge: EdgeIndex,
}

impl TransitionRecord {
    pub fn new(incoming_edge: EdgeIndex, outgoing_edge: EdgeIndex) -> Self {
        Self {
            incoming_edge,
            outgoing_edge,
        }
    }
}

impl From<(EdgeIndex, EdgeIndex)> for TransitionRecord {
    fn from((incoming_edge, outgoing_edge): (EdgeIndex, EdgeIndex)) -> Self {
        Self::new(incoming_edge, outgoing_edge)
    }
}

/// Precomputed cost and locality summary of one legal turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortcutRecord {
    pub incoming_edge: EdgeIndex,
    pub outgoing_edge: EdgeIndex,
    /// Kept explicitly for hierarchical routing, always equals `outgoing_edge`
    pub via_edge: EdgeIndex,
    /// Cost of the incoming edge
    pub cost: Seconds,
    /// Incoming cell of the incoming edge
    pub via_cell: CellIndex,
    pub via_cell_res: u8,
    pub lca_res_incoming: i8,
    pub lca_res_outgoing: i8,
    /// `max(lca_res_incoming, lca_res_outgoing)`
    pub lca_res: i8,
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone)]
pub struct RoutingTables {
    pub nodes: Vec<RoadNode>,
    /// Indexed by [`EdgeIndex`]
    pub edges: Vec<EdgeRecord>,
    pub transitions: Vec<TransitionRecord>,
    pub shortcuts: Vec<ShortcutRecord>,
    pub stats: PipelineStats,
}

impl RoutingTables {
    /// Edge index table: `(index, tail, head)`
    pub fn edge_index_table(&self) -> impl Iterator<Item = (EdgeIndex, NodeId, NodeId)> + '_ {
        self.edges.iter().map(|edge| (edge.index, edge.tail, edge.head))
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&EdgeRecord> {
        self.edges.get(index)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}
