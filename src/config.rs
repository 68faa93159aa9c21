//! Run configuration: a TOML file, overridden by command-line flags

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use h3graph_core::PipelineConfig;
use h3graph_core::loading::CsvSource;
use h3graph_core::prelude::ExportTarget;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Worker threads, rayon's default when unset
    pub threads: Option<usize>,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub nodes: Option<PathBuf>,
    pub edges: Option<PathBuf>,
    pub restrictions: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub district: Option<String>,
    pub network_type: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            district: None,
            network_type: "driving".to_string(),
        }
    }
}

/// Flags that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub nodes: Option<PathBuf>,
    pub edges: Option<PathBuf>,
    pub restrictions: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub district: Option<String>,
    pub network_type: Option<String>,
    pub resolution: Option<u8>,
    pub sequential: bool,
    pub threads: Option<usize>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In {}", path.display()))
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(nodes) = overrides.nodes {
            self.input.nodes = Some(nodes);
        }
        if let Some(edges) = overrides.edges {
            self.input.edges = Some(edges);
        }
        if let Some(restrictions) = overrides.restrictions {
            self.input.restrictions = Some(restrictions);
        }
        if let Some(directory) = overrides.output {
            self.output.directory = directory;
        }
        if let Some(district) = overrides.district {
            self.output.district = Some(district);
        }
        if let Some(network_type) = overrides.network_type {
            self.output.network_type = network_type;
        }
        if let Some(resolution) = overrides.resolution {
            self.pipeline.h3_resolution = resolution;
        }
        if overrides.sequential {
            self.pipeline.parallel = false;
        }
        if overrides.threads.is_some() {
            self.threads = overrides.threads;
        }
    }

    /// Checks that every required value is present and the input files exist
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;

        let Some(nodes) = &self.input.nodes else {
            bail!("No nodes file given");
        };
        let Some(edges) = &self.input.edges else {
            bail!("No edges file given");
        };
        for path in [Some(nodes), Some(edges), self.input.restrictions.as_ref()]
            .into_iter()
            .flatten()
        {
            if !path.is_file() {
                bail!("Input file {} does not exist", path.display());
            }
        }

        match self.output.district.as_deref() {
            None => bail!("No district name given"),
            Some(district) if district.trim().is_empty() => bail!("District name is empty"),
            Some(_) => {}
        }
        if self.output.network_type.trim().is_empty() {
            bail!("Network type is empty");
        }
        if self.threads == Some(0) {
            bail!("Thread count must be positive");
        }
        Ok(())
    }

    /// Input source, call after [`Config::validate`]
    pub fn source(&self) -> Result<CsvSource> {
        let (Some(nodes), Some(edges)) = (&self.input.nodes, &self.input.edges) else {
            bail!("Nodes and edges files are required");
        };
        Ok(CsvSource::new(nodes, edges, self.input.restrictions.clone()))
    }

    /// Output target, call after [`Config::validate`]
    pub fn target(&self) -> Result<ExportTarget> {
        let district = self
            .output
            .district
            .as_deref()
            .context("District name is required")?;
        let mut target = ExportTarget::new(&self.output.directory, district);
        target.network_type.clone_from(&self.output.network_type);
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FULL: &str = r#"
threads = 4

[input]
nodes = "nodes.csv"
edges = "edges.csv"

[output]
directory = "out"
district = "mitte"

[pipeline]
h3_resolution = 12
parallel = false
"#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(FULL).unwrap();
        assert_eq!(config.input.nodes, Some(PathBuf::from("nodes.csv")));
        assert_eq!(config.input.restrictions, None);
        assert_eq!(config.output.district.as_deref(), Some("mitte"));
        assert_eq!(config.output.network_type, "driving");
        assert_eq!(config.pipeline.h3_resolution, 12);
        assert!(!config.pipeline.parallel);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml("[output]\nformat = \"parquet\"").is_err());
        assert!(Config::from_toml("[pipeline]\nresolution = 9").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = Config::from_toml(FULL).unwrap();
        config.apply(Overrides {
            district: Some("kreuzberg".to_string()),
            resolution: Some(10),
            ..Overrides::default()
        });
        assert_eq!(config.output.district.as_deref(), Some("kreuzberg"));
        assert_eq!(config.pipeline.h3_resolution, 10);
        assert_eq!(config.input.edges, Some(PathBuf::from("edges.csv")));
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_validate() {
        let dir = TempDir::new().unwrap();
        let nodes = dir.path().join("nodes.csv");
        let edges = dir.path().join("edges.csv");
        fs::write(&nodes, "id,lat,lon\n").unwrap();
        fs::write(&edges, "source,target,length\n").unwrap();

        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.apply(Overrides {
            nodes: Some(nodes),
            edges: Some(edges),
            district: Some("mitte".to_string()),
            ..Overrides::default()
        });
        config.validate().unwrap();

        config.input.restrictions = Some(dir.path().join("missing.csv"));
        assert!(config.validate().is_err());

        config.input.restrictions = None;
        config.pipeline.h3_resolution = 16;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_naming() {
        let mut config = Config::from_toml(FULL).unwrap();
        config.output.network_type = "walking".to_string();
        let target = config.target().unwrap();
        assert_eq!(
            target.path("edge_graph", "csv"),
            PathBuf::from("out/mitte_walking_edge_graph.csv")
        );
    }
}
