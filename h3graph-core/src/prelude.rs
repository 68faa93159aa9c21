// Re-export key components
pub use crate::config::PipelineConfig;
pub use crate::export::{ExportTarget, ExportedFiles, write_tables};
pub use crate::loading::{CsvSource, RawGraphProvider, RelationExtractor};
pub use crate::model::{
    EdgeRecord, EdgeRegistry, PipelineStats, RawEdge, RawGraph, RawRestriction, RoadNode,
    RoutingTables, ShortcutRecord, TransitionRecord, WaySet,
};
pub use crate::pipeline::{build_routing_tables, build_routing_tables_from};
pub use crate::{EdgeIndex, Error, NO_COMMON_ANCESTOR, NodeId, Seconds, WayId};
