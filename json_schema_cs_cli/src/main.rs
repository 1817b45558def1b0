//! Binary to generate C# classes from a directory of JSON Schema documents.
//!
//! Usage: `json-schema-cs [--root-schema <PATH>] [--output <DIR>] [--namespace <NS>]`
//!
//! Loads the root schema and every sibling `*.schema.json`, then writes one
//! `<ClassName>.cs` per object-typed document. Log verbosity follows `RUST_LOG`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use json_schema_cs::{DEFAULT_NAMESPACE, GenerateSettings, generate};
use tracing_subscriber::EnvFilter;

const DEFAULT_ROOT_SCHEMA: &str = "../glTF/specification/2.0/schema/glTF.schema.json";
const DEFAULT_OUTPUT_DIR: &str = "../glTFLoader/Schema";

/// Generate C# data-model classes from JSON Schema documents.
#[derive(Parser, Debug)]
#[command(name = "json-schema-cs", version, about)]
struct Cli {
    /// Root schema; every `*.schema.json` beside it is loaded too
    #[arg(long, default_value = DEFAULT_ROOT_SCHEMA)]
    root_schema: PathBuf,

    /// Directory the `.cs` files are written to (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// C# namespace for the generated classes
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli: Cli = Cli::parse();
    let settings: GenerateSettings = GenerateSettings {
        namespace: cli.namespace,
    };

    match generate(&cli.root_schema, &cli.output, &settings) {
        Ok(written) => {
            tracing::info!(files = written.len(), "generation complete");
        }
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
