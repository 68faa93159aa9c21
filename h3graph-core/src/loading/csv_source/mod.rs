//! Raw graph and restrictions from CSV files, as written by OSM
//! extraction tooling (osmnx-style edge lists)

mod de;
mod parser;
mod raw_types;

use std::path::PathBuf;

use log::info;

pub use parser::deserialize_csv_file;
pub use raw_types::{FeedEdge, FeedNode, FeedRestriction};

use super::{RawGraphProvider, RelationExtractor};
use crate::Error;
use crate::model::{RawEdge, RawGraph, RawRestriction, RoadNode};

/// Reads `nodes.csv` (`id,lat,lon`), `edges.csv`
/// (`source,target,length,maxspeed,highway,osmid,geometry`) and an optional
/// `restrictions.csv` (`id,restriction,from,via,to`)
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub nodes_path: PathBuf,
    pub edges_path: PathBuf,
    pub restrictions_path: Option<PathBuf>,
}

impl CsvSource {
    pub fn new(
        nodes_path: impl Into<PathBuf>,
        edges_path: impl Into<PathBuf>,
        restrictions_path: Option<PathBuf>,
    ) -> Self {
        Self {
            nodes_path: nodes_path.into(),
            edges_path: edges_path.into(),
            restrictions_path,
        }
    }
}

impl RawGraphProvider for CsvSource {
    fn raw_graph(&self) -> Result<RawGraph, Error> {
        let nodes: Vec<RoadNode> = deserialize_csv_file::<FeedNode>(&self.nodes_path)?
            .into_iter()
            .map(RoadNode::from)
            .collect();

        let edges = deserialize_csv_file::<FeedEdge>(&self.edges_path)?
            .into_iter()
            .map(RawEdge::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Loaded {} nodes from {} and {} edges from {}",
            nodes.len(),
            self.nodes_path.display(),
            edges.len(),
            self.edges_path.display()
        );
        Ok(RawGraph { nodes, edges })
    }
}

impl RelationExtractor for CsvSource {
    fn restrictions(&self) -> Result<Vec<RawRestriction>, Error> {
        let Some(path) = &self.restrictions_path else {
            info!("No restrictions file configured, building without turn restrictions");
            return Ok(Vec::new());
        };

        let restrictions: Vec<RawRestriction> = deserialize_csv_file::<FeedRestriction>(path)?
            .into_iter()
            .map(RawRestriction::from)
            .collect();
        info!(
            "Loaded {} turn restrictions from {}",
            restrictions.len(),
            path.display()
        );
        Ok(restrictions)
    }
}
