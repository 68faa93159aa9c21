use h3o::Resolution;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Pipeline settings; every field has a default so partial
/// configuration files are accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// H3 resolution used for edge cells, also written as `via_cell_res`
    pub h3_resolution: u8,
    /// Run per-edge and per-node stages on the rayon pool
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            h3_resolution: u8::from(Resolution::Fifteen),
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// # Errors
    ///
    /// Fails if `h3_resolution` is outside `0..=15`.
    pub fn resolution(&self) -> Result<Resolution, Error> {
        Ok(Resolution::try_from(self.h3_resolution)?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.resolution().map(|_| ())
    }
}
