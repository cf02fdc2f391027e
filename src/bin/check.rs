//! Check CLI
//!
//! Imports and validates a source document without emitting anything.
//! Useful as a pre-commit gate: exits non-zero on fatal errors, reports
//! the warning summary otherwise.

use std::path::PathBuf;

use clap::Parser;
use domainforge::{compiler, import, WarningKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "domain-check")]
#[command(about = "Validate a domain document without emitting artifacts")]
struct Cli {
    /// Path to the source document
    input: PathBuf,

    /// Exit non-zero when entries were skipped
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Domain check");
    println!("  Input: {:?}", cli.input);

    let doc = import::load_document(&cli.input)?;

    let imported = import(&doc)?;
    compiler::validate(&imported.model)?;

    println!();
    println!(
        "  Entities: {}  Operations: {}",
        imported.model.entities.len(),
        imported.model.operations.len()
    );
    for entity in &imported.model.entities {
        println!(
            "    {} ({} properties, {} relationships)",
            entity.name,
            entity.properties.len(),
            entity.relationships.len()
        );
    }

    if imported.warnings.is_empty() {
        println!("✅ Document is clean");
        return Ok(());
    }

    println!("⚠️  {} warnings:", imported.warnings.len());
    for warning in &imported.warnings {
        println!("  {}", warning);
    }
    let skipped = imported
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::EntrySkipped)
        .count();
    if cli.strict && skipped > 0 {
        return Err(format!("strict: {} entries were skipped", skipped).into());
    }
    Ok(())
}
