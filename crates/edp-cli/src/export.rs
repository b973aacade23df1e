//! # Export Command
//!
//! Writes the current schema as JSON Schema or as a Markdown field
//! reference.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use edp_schema::{current_schema, export, ExportFormat};

/// Arguments for exporting the current schema.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file, or an existing directory to write `edp_schema.json` into.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format: `json` or `markdown`.
    #[arg(long, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
}

/// Export the current schema and return the file written.
pub fn run_export(args: &ExportArgs) -> anyhow::Result<PathBuf> {
    let entry = current_schema();
    tracing::debug!(
        schema = entry.name,
        format = %args.format,
        output = %args.output.display(),
        "exporting current schema"
    );
    export(&entry, &args.output, args.format).with_context(|| {
        format!(
            "failed to export {} ({}) to {}",
            entry.name,
            entry.version,
            args.output.display()
        )
    })
}
