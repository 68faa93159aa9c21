//! Hierarchical spatial cells for edges.
//!
//! Each edge gets the H3 cell of its head node (incoming cell) and of its
//! tail node (outgoing cell). The resolution of their lowest common
//! ancestor tells how local the edge is: a high resolution means a short
//! edge, a low one means the edge crosses coarse regions.

use h3o::{CellIndex, LatLng, Resolution};

use crate::model::RoadNode;
use crate::{Error, NO_COMMON_ANCESTOR};

/// Finest H3 resolution, used when nothing else is configured
pub const DEFAULT_RESOLUTION: Resolution = Resolution::Fifteen;

/// Lowest common ancestor of two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonAncestor {
    pub cell: CellIndex,
    pub resolution: Resolution,
}

/// Cells of one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCells {
    pub incoming: CellIndex,
    pub outgoing: CellIndex,
    pub lca_res: i8,
}

/// H3 cell covering a coordinate, `None` for non-finite coordinates
pub fn latlng_to_cell(lat: f64, lon: f64, resolution: Resolution) -> Option<CellIndex> {
    LatLng::new(lat, lon)
        .ok()
        .map(|coord| coord.to_cell(resolution))
}

/// Walks from the coarser of the two resolutions down to 0 and returns the
/// first shared ancestor. Absent cells never share an ancestor.
pub fn lowest_common_ancestor(
    first: Option<CellIndex>,
    second: Option<CellIndex>,
) -> Option<CommonAncestor> {
    let (first, second) = (first?, second?);
    let start = u8::from(first.resolution().min(second.resolution()));

    (0..=start)
        .rev()
        .filter_map(|res| Resolution::try_from(res).ok())
        .find_map(|resolution| {
            let ancestor = first.parent(resolution)?;
            (second.parent(resolution)? == ancestor).then_some(CommonAncestor {
                cell: ancestor,
                resolution,
            })
        })
}

/// LCA resolution, or [`NO_COMMON_ANCESTOR`] (-1). Resolution 0 is a real
/// shared base cell, not a miss.
#[allow(clippy::cast_possible_wrap)]
pub fn lca_resolution(first: Option<CellIndex>, second: Option<CellIndex>) -> i8 {
    lowest_common_ancestor(first, second)
        .map_or(NO_COMMON_ANCESTOR, |lca| u8::from(lca.resolution) as i8)
}

fn node_cell(node: &RoadNode, resolution: Resolution) -> Result<CellIndex, Error> {
    latlng_to_cell(node.lat(), node.lon(), resolution).ok_or(Error::InvalidCoordinate {
        node: node.id,
        lat: node.lat(),
        lon: node.lon(),
    })
}

/// Incoming cell from the head node, outgoing cell from the tail node
pub fn edge_cells(
    tail: &RoadNode,
    head: &RoadNode,
    resolution: Resolution,
) -> Result<EdgeCells, Error> {
    let incoming = node_cell(head, resolution)?;
    let outgoing = node_cell(tail, resolution)?;

    Ok(EdgeCells {
        incoming,
        outgoing,
        lca_res: lca_resolution(Some(incoming), Some(outgoing)),
    })
}
