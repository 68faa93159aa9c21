//! Data model for the road graph and the produced routing tables

pub mod registry;
pub mod road;
pub mod stats;
pub mod tables;

pub use registry::EdgeRegistry;
pub use road::{RawEdge, RawGraph, RawRestriction, RoadNode, WaySet};
pub use stats::PipelineStats;
pub use tables::{EdgeRecord, RoutingTables, ShortcutRecord, TransitionRecord};
