//! One-pass transformation of a raw road graph into routing tables

use log::{info, warn};

use crate::algo::{
    edges::annotate_edges, restrictions::resolve_restrictions, shortcuts::build_shortcuts,
    transitions::build_transitions,
};
use crate::loading::{RawGraphProvider, RelationExtractor};
use crate::model::{EdgeRegistry, PipelineStats, RawEdge, RawGraph, RawRestriction, RoutingTables};
use crate::{Error, PipelineConfig};

/// Loads the graph and restrictions from their providers and runs the
/// pipeline.
///
/// # Errors
///
/// Returns an error if either provider fails or the graph violates a
/// structural precondition (see [`build_routing_tables`]).
pub fn build_routing_tables_from<P, R>(
    provider: &P,
    extractor: &R,
    config: &PipelineConfig,
) -> Result<RoutingTables, Error>
where
    P: RawGraphProvider + ?Sized,
    R: RelationExtractor + ?Sized,
{
    let graph = provider.raw_graph()?;
    let restrictions = extractor.restrictions()?;
    build_routing_tables(graph, &restrictions, config)
}

/// Runs every stage on an in-memory graph.
///
/// # Errors
///
/// Returns an error on an invalid configuration, duplicate `(tail, head)`
/// edges, non-positive edge lengths, edges referencing unknown nodes or
/// nodes with invalid coordinates.
pub fn build_routing_tables(
    graph: RawGraph,
    restrictions: &[RawRestriction],
    config: &PipelineConfig,
) -> Result<RoutingTables, Error> {
    let resolution = config.resolution()?;
    let RawGraph { nodes, edges } = graph;

    let (edges, self_loops_dropped) = drop_self_loops(edges);
    if self_loops_dropped > 0 {
        warn!("Dropped {self_loops_dropped} self-loop edges");
    }

    let registry = EdgeRegistry::build(&edges)?;
    info!(
        "Registered {} edges between {} nodes",
        registry.len(),
        registry.node_count()
    );

    let (edges, speeds) = annotate_edges(edges, &nodes, resolution, config.parallel)?;
    info!(
        "Annotated edges with costs and H3 cells at resolution {}; speeds: {speeds}",
        u8::from(resolution)
    );

    let (forbidden, restriction_stats) = resolve_restrictions(restrictions, &registry, &edges);
    let (transitions, transition_stats) = build_transitions(&registry, &forbidden, config.parallel);
    let shortcuts = build_shortcuts(&transitions, &edges, resolution)?;

    let stats = PipelineStats {
        self_loops_dropped,
        speeds,
        restrictions: restriction_stats,
        transitions: transition_stats,
        shortcuts: shortcuts.len(),
    };

    release_memory();
    Ok(RoutingTables {
        nodes,
        edges,
        transitions,
        shortcuts,
        stats,
    })
}

fn drop_self_loops(edges: Vec<RawEdge>) -> (Vec<RawEdge>, usize) {
    let total = edges.len();
    let kept: Vec<RawEdge> = edges.into_iter().filter(|edge| !edge.is_self_loop()).collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

/// Intermediate tables (candidate sets, raw rows) leave a lot of freed
/// memory behind; hand the tail of the heap back to the system.
fn release_memory() {
    // # Safety
    //
    // This call is safe to use on linux with glibc implementation
    // which is checked by the cfg attribute in compile time.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::debug!("Memory trimming released nothing");
        } else {
            log::debug!("Successfully trimmed unused heap memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_loops_are_dropped_before_indexing() {
        let edges = vec![
            RawEdge::new(1, 2, 1.0),
            RawEdge::new(2, 2, 1.0),
            RawEdge::new(2, 3, 1.0),
        ];
        let (kept, dropped) = drop_self_loops(edges);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|edge| !edge.is_self_loop()));
    }
}
