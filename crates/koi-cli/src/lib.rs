//! # koi-cli: CLI for the Entity Schema Registry
//!
//! Provides the `koi` command-line interface over `koi-schema`.
//!
//! ## Subcommands
//!
//! - `koi types [--phonetic]`: known type keys.
//! - `koi resolve <HINT>`: the resolved record as JSON.
//! - `koi folder <TYPE>` / `koi type-of <FOLDER>`: folder mapping.
//! - `koi normalize <TEXT> [--type <TYPE>]`: first significant phonetic token.
//! - `koi version`: the registry version tag.
//! - `koi check`: validate a vault's schema documents.
//!
//! ```bash
//! koi --vault ~/Notes check
//! koi resolve proj
//! ```
//!
//! Handlers write to a caller-supplied writer and return the process exit
//! code, so they can be driven from tests.

pub mod check;
pub mod lookup;
pub mod normalize;

use std::path::Path;

use koi_schema::{SchemaConfig, SchemaRegistry};

/// Build the registry a command runs against.
///
/// `--vault` pins the location; without it the environment decides.
pub fn registry_for(vault: Option<&Path>) -> SchemaRegistry {
    match vault {
        Some(path) => SchemaRegistry::new(SchemaConfig::with_vault(path)),
        None => SchemaRegistry::from_env(),
    }
}
