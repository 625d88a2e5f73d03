//! # Lookup Subcommands
//!
//! `types`, `resolve`, `folder` and `type-of`: read-only queries against
//! the registry's current snapshot.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use koi_schema::SchemaRegistry;

/// Arguments for the `koi types` subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Only list types with phonetic matching enabled.
    #[arg(long)]
    pub phonetic: bool,
}

/// Arguments for the `koi resolve` subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Type key, alias, or any spelling of either.
    #[arg(value_name = "HINT")]
    pub hint: String,
}

/// Arguments for the `koi folder` subcommand.
#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Type key or alias.
    #[arg(value_name = "TYPE")]
    pub type_hint: String,
}

/// Arguments for the `koi type-of` subcommand.
#[derive(Args, Debug)]
pub struct TypeOfArgs {
    /// Storage folder name.
    #[arg(value_name = "FOLDER")]
    pub folder: String,
}

/// List known type keys, one per line.
pub fn run_types(args: &TypesArgs, registry: &SchemaRegistry, out: &mut dyn Write) -> Result<u8> {
    let snapshot = registry.snapshot();
    let types = if args.phonetic {
        snapshot.phonetic_enabled_types()
    } else {
        snapshot.all_known_types()
    };
    for type_key in types {
        writeln!(out, "{type_key}")?;
    }
    Ok(0)
}

/// Print the resolved record as pretty JSON.
///
/// Unknown hints print the sentinel record and exit 0; resolution never fails.
pub fn run_resolve(
    args: &ResolveArgs,
    registry: &SchemaRegistry,
    out: &mut dyn Write,
) -> Result<u8> {
    let schema = registry.snapshot().resolve(&args.hint);
    let json = serde_json::to_string_pretty(schema.as_ref())
        .context("failed to serialize entity type record")?;
    writeln!(out, "{json}")?;
    Ok(0)
}

/// Print the storage folder for a type hint.
pub fn run_folder(args: &FolderArgs, registry: &SchemaRegistry, out: &mut dyn Write) -> Result<u8> {
    writeln!(out, "{}", registry.snapshot().type_to_folder(&args.type_hint))?;
    Ok(0)
}

/// Print the type key stored in a folder.
///
/// Returns exit code 1 when no type owns the folder.
pub fn run_type_of(
    args: &TypeOfArgs,
    registry: &SchemaRegistry,
    out: &mut dyn Write,
) -> Result<u8> {
    match registry.snapshot().folder_to_type(&args.folder) {
        Some(type_key) => {
            writeln!(out, "{type_key}")?;
            Ok(0)
        }
        None => {
            tracing::warn!(folder = %args.folder, "no entity type for folder");
            Ok(1)
        }
    }
}
