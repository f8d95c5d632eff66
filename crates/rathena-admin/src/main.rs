//! `rathena-admin` - search a database snapshot from the command line.
//!
//! ```text
//! rathena-admin search item --query '{"filter": {"name": {"contains": "potion"}}}'
//! echo '{"sort": [{"field": "stats.level", "sort": "desc"}]}' | rathena-admin search monster -q -
//! rathena-admin fields drop
//! rathena-admin schema map
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rathena_admin::logging::init_logging;
use rathena_admin::{AdminConfig, EntityKind, SearchService, SnapshotRepository};
use serde_json::json;

#[derive(Parser)]
#[command(name = "rathena-admin", version)]
#[command(about = "Search rAthena database snapshots")]
struct Cli {
    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot file, overriding the config
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a search query and print the result
    Search {
        kind: EntityKind,

        /// Query JSON, or `-` to read it from stdin
        #[arg(short, long, default_value = "{}")]
        query: String,
    },

    /// List the paths an entity kind can be sorted by
    Fields { kind: EntityKind },

    /// Print the JSON schemas of queries and results
    Schema { kind: EntityKind },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AdminConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AdminConfig::default(),
    };
    if let Some(snapshot) = cli.snapshot {
        config.snapshot = snapshot;
    }
    init_logging(&config.log_level)?;

    let repository = Arc::new(SnapshotRepository::open(&config.snapshot, config.trade_scale));
    let service = SearchService::new(repository, &config.search);

    match cli.command {
        Command::Search { kind, query } => {
            let body = if query == "-" {
                let mut body = String::new();
                std::io::stdin()
                    .read_to_string(&mut body)
                    .context("reading query from stdin")?;
                body
            } else {
                query
            };
            let result = service.search_json(kind, &body).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Fields { kind } => {
            for field in service.sort_fields(kind) {
                println!("{field}");
            }
        }
        Command::Schema { kind } => {
            let schemas = json!({
                "query": service.query_schema(kind),
                "result": service.result_schema(kind),
            });
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
    }

    Ok(())
}
