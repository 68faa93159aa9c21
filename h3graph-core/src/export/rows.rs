//! Flat row shapes of the exported tables

use serde::Serialize;
use wkt::ToWkt;

use crate::model::{EdgeRecord, RoadNode, ShortcutRecord, TransitionRecord};
use crate::{EdgeIndex, NodeId, Seconds};

#[derive(Debug, Serialize)]
pub struct EdgeIdRow {
    pub index: EdgeIndex,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Serialize)]
pub struct NodeRow {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct EdgeRow {
    pub id: EdgeIndex,
    pub source: NodeId,
    pub target: NodeId,
    pub length: f64,
    /// Resolved speed, km/h
    pub maxspeed: f64,
    pub highway: String,
    pub osmid: String,
    pub cost: Seconds,
    pub incoming_cell: u64,
    pub outgoing_cell: u64,
    pub lca_res: i8,
    pub geometry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransitionRow {
    pub incoming_edge: EdgeIndex,
    pub outgoing_edge: EdgeIndex,
}

#[derive(Debug, Serialize)]
pub struct ShortcutRow {
    pub incoming_edge: EdgeIndex,
    pub outgoing_edge: EdgeIndex,
    pub via_edge: EdgeIndex,
    pub cost: Seconds,
    pub via_cell: u64,
    pub via_cell_res: u8,
    pub lca_res_incoming: i8,
    pub lca_res_outgoing: i8,
    pub lca_res: i8,
}

impl From<&EdgeRecord> for EdgeIdRow {
    fn from(edge: &EdgeRecord) -> Self {
        Self {
            index: edge.index,
            source: edge.tail,
            target: edge.head,
        }
    }
}

impl From<&RoadNode> for NodeRow {
    fn from(node: &RoadNode) -> Self {
        Self {
            id: node.id,
            lat: node.lat(),
            lon: node.lon(),
        }
    }
}

impl From<&EdgeRecord> for EdgeRow {
    fn from(edge: &EdgeRecord) -> Self {
        Self {
            id: edge.index,
            source: edge.tail,
            target: edge.head,
            length: edge.length,
            maxspeed: edge.speed_kmh,
            highway: edge.road_class.clone().unwrap_or_default(),
            osmid: edge.ways.to_string(),
            cost: edge.cost,
            incoming_cell: u64::from(edge.incoming_cell),
            outgoing_cell: u64::from(edge.outgoing_cell),
            lca_res: edge.lca_res,
            geometry: edge.geometry.as_ref().map(|line| line.wkt_string()),
        }
    }
}

impl From<&TransitionRecord> for TransitionRow {
    fn from(turn: &TransitionRecord) -> Self {
        Self {
            incoming_edge: turn.incoming_edge,
            outgoing_edge: turn.outgoing_edge,
        }
    }
}

impl From<&ShortcutRecord> for ShortcutRow {
    fn from(row: &ShortcutRecord) -> Self {
        Self {
            incoming_edge: row.incoming_edge,
            outgoing_edge: row.outgoing_edge,
            via_edge: row.via_edge,
            cost: row.cost,
            via_cell: u64::from(row.via_cell),
            via_cell_res: row.via_cell_res,
            lca_res_incoming: row.lca_res_incoming,
            lca_res_outgoing: row.lca_res_outgoing,
            lca_res: row.lca_res,
        }
    }
}
