//! Transforms a directed road graph into routing-ready tables:
//! cost-annotated edges, H3 cell hierarchy per edge, the edge-expanded
//! (turn) graph and its shortcut table.

pub mod algo;
pub mod config;
pub mod error;
pub mod export;
pub mod loading;
pub mod model;
pub mod pipeline;
pub mod prelude;

pub use config::PipelineConfig;
pub use error::Error;
pub use pipeline::{build_routing_tables, build_routing_tables_from};

/// OSM node identifier, as exposed by the raw graph
pub type NodeId = i64;
/// OSM way identifier, as preserved on raw edges
pub type WayId = i64;
/// Dense zero-based edge index assigned by the edge registry
pub type EdgeIndex = usize;
/// Travel time in seconds
pub type Seconds = f64;

/// Sentinel LCA resolution for two cells without a common ancestor
pub const NO_COMMON_ANCESTOR: i8 = -1;
