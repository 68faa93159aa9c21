mod config;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use h3graph_core::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "h3graph")]
#[command(about = "Turn-aware routing tables with H3 locality from an OSM road graph")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build edge index, edge graph and shortcut tables from CSV inputs
    Build(BuildArgs),
    /// Print the effective configuration without running anything
    Config(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Nodes CSV (`id,lat,lon`)
    #[arg(long)]
    nodes: Option<PathBuf>,
    /// Edges CSV (`source,target,length,maxspeed,highway,osmid,geometry`)
    #[arg(long)]
    edges: Option<PathBuf>,
    /// Turn restrictions CSV (`id,restriction,from,via,to`)
    #[arg(long)]
    restrictions: Option<PathBuf>,
    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// District name used as the output file prefix
    #[arg(short, long)]
    district: Option<String>,
    /// Network type used in output file names
    #[arg(long)]
    network_type: Option<String>,
    /// H3 resolution of edge cells (0-15)
    #[arg(long)]
    resolution: Option<u8>,
    /// Run every stage on the current thread
    #[arg(long)]
    sequential: bool,
    /// Size of the worker pool
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

impl BuildArgs {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply(Overrides {
            nodes: self.nodes,
            edges: self.edges,
            restrictions: self.restrictions,
            output: self.output,
            district: self.district,
            network_type: self.network_type,
            resolution: self.resolution,
            sequential: self.sequential,
            threads: self.threads,
        });
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => build(&args.into_config()?),
        Commands::Config(args) => {
            let config = args.into_config()?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn build(config: &Config) -> Result<()> {
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    let source = config.source()?;
    let target = config.target()?;

    let start = Instant::now();
    let tables = build_routing_tables_from(&source, &source, &config.pipeline)
        .context("Failed to build routing tables")?;
    info!(
        "Built {} edges, {} transitions and {} shortcuts in {:.2}s",
        tables.edge_count(),
        tables.transition_count(),
        tables.shortcuts.len(),
        start.elapsed().as_secs_f64()
    );

    let files = write_tables(&tables, &target)
        .with_context(|| format!("Failed to write outputs to {}", target.directory.display()))?;
    info!("Shortcut table written to {}", files.shortcuts.display());
    info!("Pipeline summary:\n{}", tables.stats);
    Ok(())
}
