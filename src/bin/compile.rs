//! Compile CLI
//!
//! Reads one source document (schema-document or domain-description JSON),
//! runs the full pipeline, and writes the enabled artifacts. Exits
//! non-zero when the run fails, so nothing downstream consumes half a set
//! of artifacts.

use std::path::PathBuf;

use clap::Parser;
use domainforge::{import, Compiler, CompilerConfig, DirectorySink, MemorySink};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "domain-compile")]
#[command(about = "Compile a domain document into validation, SQL, interface, and API-contract artifacts")]
struct Cli {
    /// Path to the source document
    input: PathBuf,

    /// Output directory for generated artifacts
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,

    /// Treat skipped entries as fatal
    #[arg(long)]
    strict: bool,

    /// Run the pipeline but write nothing
    #[arg(long)]
    dry_run: bool,
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
    let mut config = CompilerConfig::load_from(cli.config.as_deref())?;
    if cli.strict {
        config.import.strict = true;
    }
    if let Some(out) = cli.out {
        config.output.dir = out;
    }

    println!("📦 Domain compile");
    println!("  Input: {:?}", cli.input);

    let doc = import::load_document(&cli.input)?;

    let mut compiler = Compiler::with_config(&config);
    let report = if cli.dry_run {
        let mut sink = MemorySink::default();
        compiler.run(&doc, &mut sink)?
    } else {
        let mut sink = DirectorySink::new(config.output_dir());
        compiler.run(&doc, &mut sink)?
    };

    println!();
    println!("📊 Artifacts:");
    for artifact in &report.artifacts {
        println!(
            "  {} ({} bytes, sha256 {})",
            artifact.file_name,
            artifact.bytes,
            &artifact.checksum.as_str()[..12]
        );
    }

    println!();
    if report.has_warnings() {
        println!("⚠️  {} warnings:", report.warnings.len());
        for warning in &report.warnings {
            println!("  {}", warning);
        }
    }
    println!(
        "✅ Compiled {} entities, {} operations",
        report.entities, report.operations
    );
    if cli.dry_run {
        println!("🔍 Dry run - nothing written");
    } else {
        println!("  Output: {:?}", config.output_dir());
    }
    Ok(())
}
