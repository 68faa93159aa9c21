//! Audit counters collected while running the pipeline

use std::fmt;

use serde::Serialize;

use crate::algo::restrictions::RestrictionStats;
use crate::algo::speed::SpeedStats;
use crate::algo::transitions::TransitionStats;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Self-loop edges dropped at ingestion
    pub self_loops_dropped: usize,
    pub speeds: SpeedStats,
    pub restrictions: RestrictionStats,
    pub transitions: TransitionStats,
    pub shortcuts: usize,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "self-loops dropped: {}", self.self_loops_dropped)?;
        writeln!(f, "speeds: {}", self.speeds)?;
        writeln!(f, "restrictions: {}", self.restrictions)?;
        writeln!(f, "transitions: {}", self.transitions)?;
        write!(f, "shortcuts: {}", self.shortcuts)
    }
}
