//! # Schema Registry: Versioned Snapshots with Atomic Reload
//!
//! [`SchemaRegistry`] owns the current [`RegistrySnapshot`]: an immutable
//! record set, its version tag and the lookup indexes derived from it.
//!
//! ## Concurrency
//!
//! - The snapshot lives behind a `parking_lot::RwLock<Option<Arc<_>>>`.
//!   Readers clone the `Arc` and drop the lock immediately; a snapshot stays
//!   valid for as long as anyone holds it.
//! - Reload builds the new snapshot (discovery, parsing, validation) before
//!   touching the lock. The write section is a pointer swap.
//! - The lazy first load is serialized by a separate init mutex, so
//!   concurrent first callers share one load.
//!
//! ## Version tag
//!
//! The first 8 hex characters of a SHA-256 over
//! `type_key:folder:phonetic_matching:similarity_threshold` for every
//! record in type-key order. Identical content always yields the same tag.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use sha2::{Digest, Sha256};

use crate::build::{build_from_source, load_location, load_report, BuildReport};
use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::phonetic::casefold;
use crate::source::SchemaSource;
use crate::types::{EntityTypeConfig, SchemaMap};

/// Length of the version tag in hex characters.
pub const VERSION_TAG_LEN: usize = 8;

/// Compute the version tag of a record set.
pub fn compute_version(schemas: &SchemaMap) -> String {
    let mut hasher = Sha256::new();
    for schema in schemas.values() {
        hasher.update(schema.version_fragment().as_bytes());
    }
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..VERSION_TAG_LEN].to_string()
}

/// Summary of the build that produced a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rendered document-level errors, in discovery order.
    pub errors: Vec<String>,
    /// Rendered folder collisions.
    pub collisions: Vec<String>,
    /// Whether the snapshot holds the built-in defaults verbatim.
    pub fell_back: bool,
}

impl LoadSummary {
    /// Whether the build recorded any error, including a fallback.
    pub fn has_problems(&self) -> bool {
        !self.errors.is_empty()
    }

    fn render<'a>(errors: impl IntoIterator<Item = &'a SchemaError>) -> Vec<String> {
        errors.into_iter().map(ToString::to_string).collect()
    }
}

// Errors are rendered so a snapshot holds no non-`Clone` state.
impl From<&BuildReport> for LoadSummary {
    fn from(report: &BuildReport) -> Self {
        Self {
            errors: Self::render(&report.errors),
            collisions: Self::render(report.collisions()),
            fell_back: report.fell_back,
        }
    }
}

/// An immutable record set with its version tag.
#[derive(Debug)]
pub struct RegistrySnapshot {
    schemas: SchemaMap,
    version: String,
    summary: LoadSummary,
    /// Case-folded type key → type key.
    by_folded_key: HashMap<String, String>,
    /// Case-folded alias → type key.
    by_folded_alias: HashMap<String, String>,
}

impl RegistrySnapshot {
    /// Index a record set and compute its version.
    pub fn new(schemas: SchemaMap) -> Self {
        Self::with_summary(schemas, LoadSummary::default())
    }

    fn with_summary(schemas: SchemaMap, summary: LoadSummary) -> Self {
        let mut by_folded_key = HashMap::new();
        let mut by_folded_alias = HashMap::new();
        // Type-key order: on a folded clash the smallest key wins.
        for (type_key, schema) in &schemas {
            index_folded(&mut by_folded_key, type_key, type_key, "type key");
            for alias in &schema.type_aliases {
                index_folded(&mut by_folded_alias, alias, type_key, "alias");
            }
        }
        let version = compute_version(&schemas);
        Self {
            schemas,
            version,
            summary,
            by_folded_key,
            by_folded_alias,
        }
    }

    fn from_report(report: BuildReport) -> Self {
        let summary = LoadSummary::from(&report);
        Self::with_summary(report.schemas, summary)
    }

    /// The record set.
    pub fn schemas(&self) -> &SchemaMap {
        &self.schemas
    }

    /// The version tag.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Summary of the build that produced this snapshot.
    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Exact type-key lookup.
    pub fn get(&self, type_key: &str) -> Option<&Arc<EntityTypeConfig>> {
        self.schemas.get(type_key)
    }

    /// Case-insensitive type-key lookup.
    pub(crate) fn get_folded_key(&self, folded: &str) -> Option<&Arc<EntityTypeConfig>> {
        self.by_folded_key
            .get(folded)
            .and_then(|key| self.schemas.get(key))
    }

    /// Case-insensitive alias lookup.
    pub(crate) fn get_folded_alias(&self, folded: &str) -> Option<&Arc<EntityTypeConfig>> {
        self.by_folded_alias
            .get(folded)
            .and_then(|key| self.schemas.get(key))
    }
}

/// Insert `name` folded into `index`, keeping the existing owner on a clash.
fn index_folded(index: &mut HashMap<String, String>, name: &str, type_key: &str, kind: &str) {
    match index.entry(casefold(name)) {
        Entry::Vacant(slot) => {
            slot.insert(type_key.to_string());
        }
        Entry::Occupied(slot) if slot.get() != type_key => {
            tracing::warn!(
                kind,
                name,
                owner = %slot.get(),
                shadowed = type_key,
                "case-insensitive name clash, keeping the first owner"
            );
        }
        Entry::Occupied(_) => {}
    }
}

/// Owner of the current schema snapshot.
///
/// Construct one per process (or per test) and share it through `Arc`.
pub struct SchemaRegistry {
    config: SchemaConfig,
    /// Replaces the configured vault for the lazy first load.
    lazy_source: Option<Box<dyn SchemaSource + Send + Sync>>,
    current: RwLock<Option<Arc<RegistrySnapshot>>>,
    init: Mutex<()>,
}

impl SchemaRegistry {
    /// Create an empty registry. Nothing loads until first use.
    pub fn new(config: SchemaConfig) -> Self {
        Self {
            config,
            lazy_source: None,
            current: RwLock::new(None),
            init: Mutex::new(()),
        }
    }

    /// Create an empty registry whose first use loads from `source`.
    pub fn with_source(source: impl SchemaSource + Send + Sync + 'static) -> Self {
        Self {
            lazy_source: Some(Box::new(source)),
            ..Self::new(SchemaConfig::unconfigured())
        }
    }

    /// Create a registry configured from the process environment.
    pub fn from_env() -> Self {
        Self::new(SchemaConfig::from_env())
    }

    /// The configuration this registry loads from.
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Whether a snapshot has been published.
    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// The current snapshot, loading it on first use.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        if let Some(snapshot) = self.current.read().as_ref() {
            return Arc::clone(snapshot);
        }

        let _init = self.init.lock();
        // Another caller may have finished the load while we waited.
        if let Some(snapshot) = self.current.read().as_ref() {
            return Arc::clone(snapshot);
        }

        let report = match &self.lazy_source {
            Some(source) => {
                tracing::info!(source = %source.describe(), "loading entity schemas");
                build_from_source(&**source)
            }
            None => {
                let location = self.config.lazy_source();
                match &location {
                    Some(path) => tracing::info!(path = %path.display(), "loading entity schemas"),
                    None => tracing::info!("loading entity schemas (no vault configured)"),
                }
                load_location(location.as_deref())
            }
        };
        let snapshot = Arc::new(RegistrySnapshot::from_report(report));
        tracing::info!(
            count = snapshot.len(),
            version = %snapshot.version(),
            "loaded entity schemas"
        );
        for (type_key, schema) in snapshot.schemas() {
            tracing::info!(
                type_key = %type_key,
                phonetic_matching = schema.phonetic_matching,
                folder = %schema.folder,
                "entity schema"
            );
        }

        let mut current = self.current.write();
        // A reload that landed during the build is newer; keep it.
        if let Some(existing) = current.as_ref() {
            return Arc::clone(existing);
        }
        *current = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// A copy of the current record set, loading on first use.
    ///
    /// Records are immutable and shared; holding the copy never blocks reloads.
    pub fn get_registry(&self) -> SchemaMap {
        self.snapshot().schemas().clone()
    }

    /// The current version tag, loading on first use.
    pub fn version(&self) -> String {
        self.snapshot().version().to_string()
    }

    /// Summary of the build behind the current snapshot, loading on first use.
    pub fn last_summary(&self) -> LoadSummary {
        self.snapshot().summary().clone()
    }

    /// Build a record set from a location without publishing it.
    ///
    /// The explicit location wins over `ENTITY_SCHEMA_PATH`; with neither,
    /// the defaults are returned.
    pub fn load(&self, source_location: Option<&Path>) -> SchemaMap {
        load_report(&self.config, source_location).schemas
    }

    /// Rebuild from a vault location and publish the result atomically.
    pub fn reload(&self, source_location: Option<&Path>) -> SchemaMap {
        let report = load_report(&self.config, source_location);
        self.publish(report).schemas().clone()
    }

    /// Rebuild from an arbitrary source and publish the result atomically.
    pub fn reload_from(&self, source: &dyn SchemaSource) -> Arc<RegistrySnapshot> {
        self.publish(build_from_source(source))
    }

    fn publish(&self, report: BuildReport) -> Arc<RegistrySnapshot> {
        let snapshot = Arc::new(RegistrySnapshot::from_report(report));
        *self.current.write() = Some(Arc::clone(&snapshot));
        tracing::info!(
            count = snapshot.len(),
            version = %snapshot.version(),
            "reloaded entity schemas"
        );
        snapshot
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("config", &self.config)
            .field("lazy_source", &self.lazy_source.as_ref().map(|s| s.describe()))
            .field("current", &*self.current.read())
            .finish()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(SchemaConfig::unconfigured())
    }
}
