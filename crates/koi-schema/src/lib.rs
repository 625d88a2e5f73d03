//! # koi-schema: Entity Type Schema Registry
//!
//! Loads per-entity-type resolution settings from schema documents kept in a
//! notes vault, and answers type lookups against them.
//!
//! - **Sources** (`source.rs`): enumerate `Ontology/schema-*.md` documents
//!   from a vault, or from memory.
//! - **Build** (`build.rs`, `frontmatter.rs`): parse each document's YAML
//!   front block, fill defaults, reject duplicates and folder collisions,
//!   merge the built-in types.
//! - **Registry** (`registry.rs`): versioned immutable snapshots with lazy
//!   first load and atomic reload.
//! - **Resolution** (`resolver.rs`): hint → record, folder ↔ type, with a
//!   strict sentinel for unknown hints.
//! - **Phonetic** (`phonetic.rs`): name-variant normalization and stopword
//!   skipping for person-like types.
//!
//! ## Crate Policy
//!
//! - Loading never fails. Document problems are logged and recorded in the
//!   build report; an unusable source degrades to the built-in defaults.
//! - Records and snapshots are immutable once built and shared via `Arc`.
//! - No I/O happens while the snapshot lock is held.

pub mod build;
pub mod config;
pub mod defaults;
pub mod error;
pub mod frontmatter;
pub mod phonetic;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod types;

pub use build::{build_from_source, build_registry, load, BuildReport};
pub use config::SchemaConfig;
pub use defaults::{default_schemas, unknown_type, UNKNOWN_TYPE_KEY};
pub use error::{SchemaError, SchemaResult};
pub use phonetic::{first_significant_token, first_significant_token_for, normalize};
pub use registry::{compute_version, LoadSummary, RegistrySnapshot, SchemaRegistry};
pub use resolver::TypeResolver;
pub use source::{MemorySource, RawDocument, SchemaSource, VaultSource};
pub use types::{EntityTypeConfig, SchemaMap};
