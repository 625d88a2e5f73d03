//! # koi CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use koi_cli::check::{run_check, run_version, CheckArgs};
use koi_cli::lookup::{
    run_folder, run_resolve, run_type_of, run_types, FolderArgs, ResolveArgs, TypeOfArgs,
    TypesArgs,
};
use koi_cli::normalize::{run_normalize, NormalizeArgs};
use koi_cli::registry_for;

/// koi entity schema registry
///
/// Lists and resolves the entity types defined by a vault's
/// `Ontology/schema-*.md` documents, falling back to the built-in types.
#[derive(Parser, Debug)]
#[command(name = "koi", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Vault root to load schemas from. Overrides ENTITY_SCHEMA_PATH and VAULT_PATH.
    #[arg(long, global = true, value_name = "PATH")]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List known entity type keys.
    Types(TypesArgs),

    /// Resolve a type hint and print its full configuration as JSON.
    Resolve(ResolveArgs),

    /// Print the storage folder for a type.
    Folder(FolderArgs),

    /// Print the type stored in a folder.
    #[command(name = "type-of")]
    TypeOf(TypeOfArgs),

    /// Print the registry version tag.
    Version,

    /// Print the first significant phonetic token of a name.
    Normalize(NormalizeArgs),

    /// Validate the vault's schema documents.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise verbosity picks the level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let registry = registry_for(cli.vault.as_deref());
    tracing::debug!(config = ?registry.config(), "koi starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Types(args) => run_types(&args, &registry, &mut out),
        Commands::Resolve(args) => run_resolve(&args, &registry, &mut out),
        Commands::Folder(args) => run_folder(&args, &registry, &mut out),
        Commands::TypeOf(args) => run_type_of(&args, &registry, &mut out),
        Commands::Version => run_version(&registry, &mut out),
        Commands::Normalize(args) => run_normalize(&args, &registry, &mut out),
        Commands::Check(args) => run_check(&args, &registry, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
