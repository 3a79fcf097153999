use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use healthgraph::batch::{order_from_ids, resolve_batch, BatchResult};
use healthgraph::config::{load_config, save_config, ResolverConfig};
use healthgraph::errors::{HealthGraphError, Result};
use healthgraph::resolution::{EntityReference, RelationResolver};
use healthgraph::types::ResolvedDocument;
use healthgraph::wire::read_response;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Resolves healthcare entity relations into entity graphs.
#[derive(Parser)]
#[command(name = "healthgraph", about = "Resolve healthcare entity relation graphs")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every document of a service response
    Resolve {
        /// Path to the JSON response body
        file: PathBuf,
        /// Resolver configuration (JSON or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Comma-separated document ids giving the output order
        #[arg(short, long, value_delimiter = ',')]
        order: Vec<String>,
    },
    /// Parse a single entity reference
    CheckRef {
        /// Reference string, e.g. #/results/documents/0/entities/1
        reference: String,
        /// Number of entities in the document
        #[arg(short = 'n', long)]
        count: usize,
    },
    /// Write the default resolver configuration
    InitConfig {
        /// Destination path (.json or .toml)
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("healthgraph=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the selected command, returning `Ok(false)` when it completed but
/// some documents failed.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Resolve {
            file,
            config,
            format,
            order,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => ResolverConfig::default(),
            };
            let inputs = read_response(&file)?;
            let resolver = RelationResolver::new(config);
            let mut result = resolve_batch(&resolver, &inputs);
            if !order.is_empty() {
                result.sort_by_order(&order_from_ids(&order));
            }

            if format == "json" {
                print_json(&result)?;
            } else {
                print_text(&result);
            }
            Ok(result.is_success())
        }
        Commands::CheckRef { reference, count } => {
            let parsed = check_reference(&reference, count)?;
            println!("document {}, entity {}", parsed.document, parsed.entity);
            Ok(true)
        }
        Commands::InitConfig { path } => {
            save_config(&path, &ResolverConfig::default())?;
            println!("Wrote default configuration to {}", path.display());
            Ok(true)
        }
    }
}

/// Parses `reference` once and checks its entity index against `count`.
fn check_reference(reference: &str, count: usize) -> Result<EntityReference> {
    EntityReference::parse(reference)
        .filter(|r| r.entity < count)
        .ok_or_else(|| HealthGraphError::InvalidReference {
            reference: reference.to_string(),
        })
}

fn print_text(result: &BatchResult) {
    for document in &result.documents {
        print_document(document);
    }
    for failure in &result.errors {
        eprintln!("Document {} failed: {}", failure.id, failure.error);
    }
}

fn print_document(document: &ResolvedDocument) {
    println!(
        "Document {}: {} entities, {} relations",
        document.id,
        document.len(),
        document.relation_count()
    );
    for resolved in &document.entities {
        println!(
            "  [{}] {} ({})",
            resolved.index, resolved.entity.text, resolved.entity.category
        );
        for (target, kind) in resolved.relations.iter() {
            let text = document
                .get(target)
                .map(|e| e.entity.text.as_str())
                .unwrap_or("?");
            println!("      -> [{}] {}: {}", target, text, kind);
        }
    }
}

fn print_json(result: &BatchResult) -> Result<()> {
    println!("{}", render_json(result)?);
    Ok(())
}

fn render_json(result: &BatchResult) -> Result<String> {
    let errors: Vec<_> = result
        .errors
        .iter()
        .map(|e| json!({ "id": e.id, "error": e.error.to_string() }))
        .collect();
    let output = json!({
        "documents": serde_json::to_value(&result.documents)?,
        "errors": errors,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
