//! Atombridge CLI - Command-line interface for the SQL-to-AtomSpace bridge

use atombridge::batch::AtomBatch;
use atombridge::config::{self, BridgeConfig};
use atombridge::server::routes::{IngestSchemaRequest, IngestTableRequest};
use atombridge::{map_rows, map_schema};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "atombridge")]
#[command(version = "0.1.0")]
#[command(about = "SQL-to-AtomSpace bridge - content-addressed atom mapping for relational data")]
#[command(long_about = r#"
Atombridge maps relational schema and row data into a content-addressed
atom graph and hands the resulting batches to a symbolic-reasoning store.

Example usage:
  atombridge map-schema --input schema.json
  atombridge map-rows --input rows.json
  atombridge merge batch1.json batch2.json
  atombridge serve --port 7807
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP bridge server
    Serve {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Map a schema request file (tables + foreign keys) to a canonical batch
    MapSchema {
        /// JSON file with {"tables": [...], "foreign_keys": [...]}
        #[arg(short, long)]
        input: PathBuf,

        /// Pretty-print instead of canonical compact JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Map a row request file (table + primary key + rows) to a canonical batch
    MapRows {
        /// JSON file with {"schema": ..., "table": ..., "primary_key": ..., "rows": [...]}
        #[arg(short, long)]
        input: PathBuf,

        /// Pretty-print instead of canonical compact JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Merge batch files into one deduplicated canonical batch
    Merge {
        /// Batch JSON files, merged in argument order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Pretty-print instead of canonical compact JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Write a default atombridge.toml
    Init {
        /// Config file path
        #[arg(long, default_value = "atombridge.toml")]
        path: PathBuf,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { config, host, port } => {
            let mut config = config::load_config(config.as_deref())?.unwrap_or_default();
            config.apply_env_overrides()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(atombridge::server::start_server(&config))?;
        }

        Commands::MapSchema { input, pretty } => {
            let req: IngestSchemaRequest = read_json(&input)?;
            let batch = map_schema(&req.tables, &req.foreign_keys)?;
            tracing::info!(stats = %batch.stats(), "mapped schema from {}", input.display());
            print_batch(&batch, pretty)?;
        }

        Commands::MapRows { input, pretty } => {
            let req: IngestTableRequest = read_json(&input)?;
            let batch = map_rows(
                req.schema.as_deref(),
                &req.table,
                &req.rows,
                &req.primary_key,
            )?;
            tracing::info!(stats = %batch.stats(), "mapped rows from {}", input.display());
            print_batch(&batch, pretty)?;
        }

        Commands::Merge { inputs, pretty } => {
            let batches = inputs
                .iter()
                .map(|path| read_json::<AtomBatch>(path))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let merged = AtomBatch::merge(batches);
            tracing::info!(stats = %merged.stats(), "merged {} batches", inputs.len());
            print_batch(&merged, pretty)?;
        }

        Commands::Init { path, force } => {
            config::write_config(&path, &BridgeConfig::default(), force)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(value)
}

fn print_batch(batch: &AtomBatch, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(batch)?);
    } else {
        println!("{}", batch.to_canonical_json()?);
    }
    Ok(())
}
