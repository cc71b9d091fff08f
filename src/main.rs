//! sexpdb CLI - Command line interface for sexpdb
//!
//! Each invocation builds an in-memory store from the given source files and
//! answers one command against it. Results go to stdout as JSON; logs go to
//! stderr.

use clap::{Parser, Subcommand};
use sexpdb::{Config, Database, Id, OutputFormat, Seed, TraversalDirection, Weight};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sexpdb")]
#[command(about = "A content-addressed graph store for symbolic expression trees")]
#[command(version)]
struct Cli {
    /// Path to the config file [default: <config dir>/sexpdb/config.json]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hex seed (64 chars), overrides the configured seed
    #[arg(short, long)]
    seed: Option<String>,

    /// Output format (json or text), overrides the configured format
    #[arg(short, long)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the id of each expression
    Hash {
        /// One or more expressions
        expr: String,
    },

    /// Store source files and summarize the resulting store
    Ingest {
        /// Files of S-expressions, one transaction per file
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Weight applied to each file's transaction
        #[arg(short, long)]
        weight: Option<Weight>,
        /// Number of heaviest entries to list
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Store source files, then run an exact-match query
    Query {
        /// Files of S-expressions
        files: Vec<PathBuf>,
        /// The query expression
        #[arg(short, long)]
        query: String,
        /// Weight applied to each file's transaction
        #[arg(short, long)]
        weight: Option<Weight>,
    },

    /// Store source files, then show one entry and its neighbourhood
    Show {
        /// Files of S-expressions
        files: Vec<PathBuf>,
        /// Hex id of the entry
        #[arg(short, long)]
        id: String,
        /// Weight applied to each file's transaction
        #[arg(short, long)]
        weight: Option<Weight>,
    },

    /// Print a freshly generated seed
    Seed,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config);

    let format = cli.format.unwrap_or(config.format);
    let seed = match &cli.seed {
        Some(hex) => Some(Seed::from_hex(hex)?),
        None => config.seed()?,
    };
    let db = match seed {
        Some(seed) => Database::with_seed(seed),
        None => Database::new(),
    };

    match cli.command {
        Commands::Hash { expr } => {
            let values = sexpdb::parse(&expr)?;
            let items: Vec<_> = values
                .iter()
                .map(|value| {
                    serde_json::json!({
                        "id": db.hash(value).to_hex(),
                        "value": value.to_string()
                    })
                })
                .collect();
            output(
                format,
                &serde_json::json!({
                    "seed": db.seed().fingerprint(),
                    "ids": items
                }),
            );
        }

        Commands::Ingest { files, weight, top } => {
            let weight = weight.unwrap_or(config.default_weight);
            let roots = ingest(&db, &files, weight)?;
            let heaviest: Vec<_> = db
                .top(top)
                .into_iter()
                .map(|(id, _)| entry_json(&db, &id))
                .collect::<anyhow::Result<_>>()?;
            output(
                format,
                &serde_json::json!({
                    "status": "ok",
                    "seed": db.seed().fingerprint(),
                    "roots": roots.iter().map(|id| id.to_hex()).collect::<Vec<_>>(),
                    "entries": db.len(),
                    "total_weight": db.total_weight(),
                    "top": heaviest
                }),
            );
        }

        Commands::Query {
            files,
            query,
            weight,
        } => {
            let weight = weight.unwrap_or(config.default_weight);
            ingest(&db, &files, weight)?;
            let result = db.query(&query)?;
            let matches: Vec<_> = result
                .matches
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "id": m.id.to_hex(),
                        "value": m.value.to_string(),
                        "weight": m.weight
                    })
                })
                .collect();
            output(
                format,
                &serde_json::json!({
                    "count": matches.len(),
                    "matches": matches,
                    "placeholders": result.placeholders
                }),
            );
        }

        Commands::Show { files, id, weight } => {
            let weight = weight.unwrap_or(config.default_weight);
            ingest(&db, &files, weight)?;
            let id: Id = id.parse()?;
            if db.load(&id).is_none() {
                output(
                    format,
                    &serde_json::json!({
                        "status": "error",
                        "message": format!("Entry not found: {}", id)
                    }),
                );
                std::process::exit(1);
            }

            let mut entry = entry_json(&db, &id)?;
            entry["refs"] = hex_list(&db.refs(&id));
            entry["inverse_refs"] = hex_list(&db.inverse_refs(&id));
            entry["descendants"] = hex_list(&db.transitive(&id, TraversalDirection::Refs));
            entry["ancestors"] = hex_list(&db.transitive(&id, TraversalDirection::InverseRefs));
            output(format, &entry);
        }

        Commands::Seed => {
            let seed = Seed::generate();
            output(
                format,
                &serde_json::json!({
                    "seed": hex::encode(seed.as_bytes()),
                    "fingerprint": seed.fingerprint()
                }),
            );
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Store each file as its own transaction, returning all root ids
fn ingest(db: &Database, files: &[PathBuf], weight: Weight) -> anyhow::Result<Vec<Id>> {
    let mut roots = Vec::new();
    for path in files {
        let text = read_source(path)?;
        let ids = db
            .store_text(&text, weight)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        tracing::info!(file = %path.display(), roots = ids.len(), "ingested");
        roots.extend(ids);
    }
    Ok(roots)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
}

fn entry_json(db: &Database, id: &Id) -> anyhow::Result<serde_json::Value> {
    let (value, weight) = db
        .query_one_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;
    let kind = match &value {
        sexpdb::Value::Literal(_) => "literal",
        sexpdb::Value::Composite(_) => "composite",
    };
    Ok(serde_json::json!({
        "id": id.to_hex(),
        "kind": kind,
        "weight": weight,
        "value": value.to_string()
    }))
}

fn hex_list(ids: &[Id]) -> serde_json::Value {
    serde_json::Value::from(ids.iter().map(|id| id.to_hex()).collect::<Vec<_>>())
}

fn output(format: OutputFormat, value: &serde_json::Value) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to render output: {}", e),
    }
}
