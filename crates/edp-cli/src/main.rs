//! # edp-schema CLI Entry Point
//!
//! Parses arguments and dispatches to the export handler.

use clap::Parser;

/// Export the Extended Dataset Profile schema.
///
/// Writes the JSON Schema of the current schema version, or a Markdown
/// field reference with `--format markdown`. Set `RUST_LOG=info` to see
/// where the file was written.
#[derive(Parser, Debug)]
#[command(name = "edp-schema", version, about)]
struct Cli {
    #[command(flatten)]
    export: edp_cli::export::ExportArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    edp_cli::export::run_export(&cli.export)?;
    Ok(())
}
