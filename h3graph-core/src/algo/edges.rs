//! Per-edge annotation: speed, travel time cost and H3 cells

use h3o::Resolution;
use hashbrown::HashMap;
use rayon::prelude::*;

use super::h3_index::edge_cells;
use super::speed::{SpeedStats, resolve_speed, travel_time};
use crate::model::{EdgeRecord, RawEdge, RoadNode};
use crate::{EdgeIndex, Error, NodeId};

/// Annotates edges in slice order, so `records[i].index == i`.
///
/// # Errors
///
/// Fails on the first self-loop, non-positive length, edge endpoint
/// without a node, or node with invalid coordinates.
pub fn annotate_edges(
    edges: Vec<RawEdge>,
    nodes: &[RoadNode],
    resolution: Resolution,
    parallel: bool,
) -> Result<(Vec<EdgeRecord>, SpeedStats), Error> {
    let lookup: HashMap<NodeId, &RoadNode> = nodes.iter().map(|node| (node.id, node)).collect();
    let annotate =
        |(index, edge): (EdgeIndex, RawEdge)| annotate_edge(index, edge, &lookup, resolution);

    let records: Vec<EdgeRecord> = if parallel {
        edges
            .into_par_iter()
            .enumerate()
            .map(annotate)
            .collect::<Result<_, _>>()?
    } else {
        edges
            .into_iter()
            .enumerate()
            .map(annotate)
            .collect::<Result<_, _>>()?
    };

    let stats = records.iter().map(|edge| edge.speed_source).collect();
    Ok((records, stats))
}

fn annotate_edge(
    index: EdgeIndex,
    edge: RawEdge,
    nodes: &HashMap<NodeId, &RoadNode>,
    resolution: Resolution,
) -> Result<EdgeRecord, Error> {
    if edge.is_self_loop() {
        return Err(Error::SelfLoop { node: edge.tail });
    }
    if !edge.length.is_finite() || edge.length <= 0.0 {
        return Err(Error::NonPositiveLength {
            tail: edge.tail,
            head: edge.head,
            length: edge.length,
        });
    }

    let endpoint = |node: NodeId| {
        nodes.get(&node).copied().ok_or(Error::UnknownNode {
            node,
            tail: edge.tail,
            head: edge.head,
        })
    };
    let cells = edge_cells(endpoint(edge.tail)?, endpoint(edge.head)?, resolution)?;

    let speed = resolve_speed(edge.maxspeed.as_deref(), edge.road_class());
    let road_class = edge.road_class().map(str::to_owned);

    Ok(EdgeRecord {
        index,
        tail: edge.tail,
        head: edge.head,
        length: edge.length,
        speed_kmh: speed.kmh,
        speed_source: speed.source,
        road_class,
        ways: edge.ways,
        cost: travel_time(edge.length, speed.kmh),
        incoming_cell: cells.incoming,
        outgoing_cell: cells.outgoing,
        lca_res: cells.lca_res,
        geometry: edge.geometry,
    })
}
