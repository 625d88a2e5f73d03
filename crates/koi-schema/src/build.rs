//! # Registry Build: Validation and Default Merging
//!
//! Turns raw schema documents into a complete [`SchemaMap`].
//!
//! ## Per-document resolution
//!
//! - `type_key`: `resolution.type_key`, else top-level `label`, else the
//!   document slug. Never re-cased.
//! - `folder`: `resolution.folder`, else the fallback table for well-known
//!   type keys, else the document is rejected.
//! - Optional fields take the defaults in [`crate::types`].
//!
//! A rejected document never aborts the build. Within one build the first
//! document to claim a type key or a folder keeps it; later claimants are
//! rejected and recorded.
//!
//! ## Defaults
//!
//! A build that accepts nothing returns the built-in set verbatim. Otherwise
//! every built-in type the source does not define is merged in, so
//! well-known types stay resolvable.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::config::SchemaConfig;
use crate::defaults::{default_schemas, folder_fallback};
use crate::error::{SchemaError, SchemaResult};
use crate::frontmatter::{parse_front_matter, FrontMatter};
use crate::phonetic::casefold;
use crate::source::{RawDocument, SchemaSource, VaultSource};
use crate::types::{
    EntityTypeConfig, SchemaMap, DEFAULT_MIN_CONTEXT_PEOPLE, DEFAULT_PHONETIC_MATCHING,
    DEFAULT_REQUIRE_TOKEN_OVERLAP, DEFAULT_SEMANTIC_THRESHOLD, DEFAULT_SIMILARITY_THRESHOLD,
};

/// Outcome of one build.
#[derive(Debug)]
pub struct BuildReport {
    /// The complete record set. Never empty.
    pub schemas: SchemaMap,
    /// Every document-level problem, in discovery order.
    pub errors: Vec<SchemaError>,
    /// Documents that produced a record.
    pub loaded: Vec<String>,
    /// Built-in types merged in because the source did not define them.
    pub merged_defaults: Vec<String>,
    /// Whether the record set is the built-in defaults verbatim.
    pub fell_back: bool,
}

impl BuildReport {
    /// A report whose record set is exactly the built-in defaults.
    pub fn defaults(errors: Vec<SchemaError>) -> Self {
        Self {
            schemas: default_schemas().clone(),
            errors,
            loaded: Vec::new(),
            merged_defaults: Vec::new(),
            fell_back: true,
        }
    }

    /// Folder collisions recorded during the build.
    pub fn collisions(&self) -> Vec<&SchemaError> {
        self.errors.iter().filter(|e| e.is_collision()).collect()
    }

    /// Whether any document was rejected or skipped with an error.
    pub fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|e| !matches!(e, SchemaError::EmptyResult | SchemaError::SourceUnavailable { .. }))
    }
}

/// Build a record set from a document sequence.
///
/// Pure: holds no state across calls.
pub fn build_registry<I>(documents: I) -> BuildReport
where
    I: IntoIterator<Item = SchemaResult<RawDocument>>,
{
    let mut schemas = SchemaMap::new();
    let mut seen_folders: HashMap<String, String> = HashMap::new();
    let mut errors = Vec::new();
    let mut loaded = Vec::new();

    for document in documents {
        let document = match document {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(error = %e, "failed to read schema document");
                errors.push(e);
                continue;
            }
        };

        let front = match parse_front_matter(&document.id, &document.body) {
            Ok(Some(front)) => front,
            Ok(None) => {
                tracing::warn!(document = %document.origin, "no front block in schema, skipping");
                continue;
            }
            Err(e) => {
                tracing::warn!(
                    document = %document.origin,
                    error = %e,
                    "failed to parse schema front block"
                );
                errors.push(e);
                continue;
            }
        };

        let schema = match resolve_document(&document, front) {
            Ok(schema) => schema,
            Err(e) => {
                tracing::error!(document = %document.origin, error = %e, "rejected schema");
                errors.push(e);
                continue;
            }
        };

        if schemas.contains_key(&schema.type_key) {
            let e = SchemaError::DuplicateTypeKey {
                type_key: schema.type_key.clone(),
                document: document.id.clone(),
            };
            tracing::error!(document = %document.origin, error = %e, "rejected schema");
            errors.push(e);
            continue;
        }

        if let Some(claimed_by) = seen_folders.get(&schema.folder) {
            let e = SchemaError::FolderCollision {
                folder: schema.folder.clone(),
                claimed_by: claimed_by.clone(),
                rejected: schema.type_key.clone(),
            };
            tracing::error!(document = %document.origin, error = %e, "rejected schema");
            errors.push(e);
            continue;
        }
        seen_folders.insert(schema.folder.clone(), schema.type_key.clone());

        tracing::info!(
            type_key = %schema.type_key,
            folder = %schema.folder,
            phonetic = schema.phonetic_matching,
            "loaded schema"
        );
        loaded.push(schema.type_key.clone());
        schemas.insert(schema.type_key.clone(), Arc::new(schema));
    }

    if schemas.is_empty() {
        tracing::warn!("no schemas loaded from source, using defaults");
        errors.push(SchemaError::EmptyResult);
        return BuildReport::defaults(errors);
    }

    let mut merged_defaults = Vec::new();
    for (type_key, default) in default_schemas() {
        if schemas.contains_key(type_key) {
            continue;
        }
        // A source-defined type may already own this default's folder.
        if let Some(owner) = seen_folders.get(&default.folder) {
            tracing::warn!(
                type_key = %type_key,
                folder = %default.folder,
                owner = %owner,
                "default schema folder already claimed, not merging"
            );
            continue;
        }
        tracing::info!(type_key = %type_key, "using default schema (not found in source)");
        merged_defaults.push(type_key.clone());
        schemas.insert(type_key.clone(), Arc::clone(default));
    }

    BuildReport {
        schemas,
        errors,
        loaded,
        merged_defaults,
        fell_back: false,
    }
}

/// Build from any [`SchemaSource`]. An unavailable source yields the defaults.
pub fn build_from_source(source: &dyn SchemaSource) -> BuildReport {
    match source.discover() {
        Ok(documents) => build_registry(documents),
        Err(e) => {
            tracing::warn!(
                source = %source.describe(),
                error = %e,
                "schema source unavailable, using defaults"
            );
            BuildReport::defaults(vec![e])
        }
    }
}

/// Build from a vault location, resolved against `config`.
///
/// With no explicit path and no `ENTITY_SCHEMA_PATH`, returns the defaults.
pub fn load_report(config: &SchemaConfig, source_location: Option<&Path>) -> BuildReport {
    load_location(config.source_for(source_location).as_deref())
}

/// Build from an already-resolved vault location; `None` yields the defaults.
pub fn load_location(location: Option<&Path>) -> BuildReport {
    match location {
        Some(root) => build_from_source(&VaultSource::new(root)),
        None => {
            tracing::warn!("no vault path configured, using default schemas");
            BuildReport::defaults(Vec::new())
        }
    }
}

/// Load a record set from a vault location. Never fails.
///
/// The explicit location wins over `ENTITY_SCHEMA_PATH`.
pub fn load(source_location: Option<&Path>) -> SchemaMap {
    load_report(&SchemaConfig::from_env(), source_location).schemas
}

fn resolve_document(document: &RawDocument, front: FrontMatter) -> SchemaResult<EntityTypeConfig> {
    let label = non_empty(front.label);
    let resolution = front.resolution.unwrap_or_default();

    let type_key = non_empty(resolution.type_key)
        .or_else(|| label.clone())
        .unwrap_or_else(|| document.id.clone());
    let label = label.unwrap_or_else(|| type_key.clone());

    let folder = match non_empty(resolution.folder)
        .or_else(|| folder_fallback(&type_key).map(str::to_string))
    {
        Some(folder) => folder,
        None => {
            return Err(SchemaError::MissingRequiredField {
                document: document.id.clone(),
                type_key,
                field: "folder",
            })
        }
    };

    let similarity_threshold = check_unit_interval(
        document,
        "similarity_threshold",
        resolution
            .similarity_threshold
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
    )?;
    let semantic_threshold = check_unit_interval(
        document,
        "semantic_threshold",
        resolution
            .semantic_threshold
            .unwrap_or(DEFAULT_SEMANTIC_THRESHOLD),
    )?;

    let phonetic_stopwords: BTreeSet<String> = resolution
        .phonetic_stopwords
        .unwrap_or_default()
        .iter()
        .map(|s| casefold(s))
        .collect();

    Ok(EntityTypeConfig {
        type_key,
        label,
        folder,
        phonetic_matching: resolution
            .phonetic_matching
            .unwrap_or(DEFAULT_PHONETIC_MATCHING),
        phonetic_stopwords,
        type_aliases: resolution.type_aliases.unwrap_or_default(),
        min_context_people: resolution
            .min_context_people
            .unwrap_or(DEFAULT_MIN_CONTEXT_PEOPLE),
        similarity_threshold,
        semantic_threshold,
        require_token_overlap: resolution
            .require_token_overlap
            .unwrap_or(DEFAULT_REQUIRE_TOKEN_OVERLAP),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn check_unit_interval(
    document: &RawDocument,
    field: &'static str,
    value: f64,
) -> SchemaResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SchemaError::InvalidField {
            document: document.id.clone(),
            field,
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}
