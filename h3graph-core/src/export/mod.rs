//! CSV export of the routing tables.
//!
//! File names follow `{district}_{network_type}_{table}.csv`. Edges are
//! referenced by index everywhere; node ids only appear in the edge index,
//! node and edge tables.

mod rows;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

pub use rows::{EdgeIdRow, EdgeRow, NodeRow, ShortcutRow, TransitionRow};

use crate::Error;
use crate::model::RoutingTables;

/// Where and under which name tables are written
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub directory: PathBuf,
    pub district: String,
    pub network_type: String,
}

impl ExportTarget {
    pub fn new(directory: impl Into<PathBuf>, district: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            district: district.into(),
            network_type: "driving".to_string(),
        }
    }

    pub fn path(&self, table: &str, extension: &str) -> PathBuf {
        self.directory.join(format!(
            "{}_{}_{table}.{extension}",
            self.district, self.network_type
        ))
    }
}

/// Paths of the written files
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub edge_ids: PathBuf,
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub edge_graph: PathBuf,
    pub shortcuts: PathBuf,
    pub stats: PathBuf,
}

fn write_csv<T, I>(path: &Path, rows: I) -> Result<(), Error>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes all tables plus a JSON file with the pipeline counters.
///
/// # Errors
///
/// Fails if the directory cannot be created or any file cannot be written.
pub fn write_tables(tables: &RoutingTables, target: &ExportTarget) -> Result<ExportedFiles, Error> {
    std::fs::create_dir_all(&target.directory)?;

    let files = ExportedFiles {
        edge_ids: target.path("edge_id", "csv"),
        nodes: target.path("simplified_nodes", "csv"),
        edges: target.path("simplified_edges_with_h3", "csv"),
        edge_graph: target.path("edge_graph", "csv"),
        shortcuts: target.path("shortcut_table", "csv"),
        stats: target.path("stats", "json"),
    };

    write_csv(&files.edge_ids, tables.edges.iter().map(EdgeIdRow::from))?;
    write_csv(&files.nodes, tables.nodes.iter().map(NodeRow::from))?;
    write_csv(&files.edges, tables.edges.iter().map(EdgeRow::from))?;
    write_csv(&files.edge_graph, tables.transitions.iter().map(TransitionRow::from))?;
    write_csv(&files.shortcuts, tables.shortcuts.iter().map(ShortcutRow::from))?;

    let mut writer = BufWriter::new(File::create(&files.stats)?);
    serde_json::to_writer_pretty(&mut writer, &tables.stats)?;
    writer.flush()?;

    info!("Outputs saved to {}", target.directory.display());
    Ok(files)
}
