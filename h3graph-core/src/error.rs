use thiserror::Error;

use crate::{EdgeIndex, NodeId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate edge {tail} -> {head}")]
    DuplicateEdge { tail: NodeId, head: NodeId },
    #[error("Self-loop edge at node {node} reached edge annotation")]
    SelfLoop { node: NodeId },
    #[error("Edge {tail} -> {head} has non-positive or non-finite length {length}")]
    NonPositiveLength {
        tail: NodeId,
        head: NodeId,
        length: f64,
    },
    #[error("Edge {tail} -> {head} references node {node} without coordinates")]
    UnknownNode {
        node: NodeId,
        tail: NodeId,
        head: NodeId,
    },
    #[error("Node {node} has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinate { node: NodeId, lat: f64, lon: f64 },
    #[error("Internal consistency error: transition references unknown edge #{0}")]
    InconsistentTables(EdgeIndex),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("H3 error: {0}")]
    H3Error(#[from] h3o::error::InvalidResolution),
}
