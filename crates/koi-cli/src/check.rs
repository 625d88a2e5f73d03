//! # Check and Version Subcommands
//!
//! `check` rebuilds the record set from the configured vault and reports
//! every rejected document and folder collision. `version` prints the tag of
//! the snapshot the registry would serve.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use koi_schema::build::load_location;
use koi_schema::{SchemaError, SchemaRegistry};

/// Arguments for the `koi check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Also list the built-in types merged in because the vault lacks them.
    #[arg(long)]
    pub show_defaults: bool,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when every document loaded, 1 if any document was
/// rejected, 2 if the vault could not be read at all.
pub fn run_check(args: &CheckArgs, registry: &SchemaRegistry, out: &mut dyn Write) -> Result<u8> {
    let location = registry.config().lazy_source();
    let report = load_location(location.as_deref());

    match &location {
        Some(path) => writeln!(out, "vault: {}", path.display())?,
        None => writeln!(out, "vault: (none configured)")?,
    }

    let mut unavailable = false;
    for error in &report.errors {
        match error {
            SchemaError::SourceUnavailable { .. } => {
                unavailable = true;
                writeln!(out, "UNAVAILABLE {error}")?;
            }
            SchemaError::EmptyResult => writeln!(out, "NOTE {error}")?,
            SchemaError::FolderCollision { .. } => writeln!(out, "COLLISION {error}")?,
            _ => writeln!(out, "REJECTED {error}")?,
        }
    }

    for type_key in &report.loaded {
        writeln!(out, "OK {type_key}")?;
    }
    if args.show_defaults {
        for type_key in &report.merged_defaults {
            writeln!(out, "DEFAULT {type_key}")?;
        }
    }

    let rejected = report.errors.iter().filter(|e| is_rejection(e)).count();
    writeln!(
        out,
        "{} loaded, {} rejected, {} defaults merged{}",
        report.loaded.len(),
        rejected,
        report.merged_defaults.len(),
        if report.fell_back { " (using built-in defaults)" } else { "" }
    )?;

    if unavailable {
        Ok(2)
    } else if report.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn is_rejection(error: &SchemaError) -> bool {
    !matches!(
        error,
        SchemaError::EmptyResult | SchemaError::SourceUnavailable { .. }
    )
}

/// Print the registry version tag.
pub fn run_version(registry: &SchemaRegistry, out: &mut dyn Write) -> Result<u8> {
    writeln!(out, "{}", registry.version())?;
    Ok(0)
}
