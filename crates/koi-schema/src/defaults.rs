//! # Built-in Tables
//!
//! Static data the loader falls back on: the default record set used when a
//! vault is missing or incomplete, the folder fallback table for well-known
//! type keys, and the strict sentinel returned for unrecognized types.
//!
//! The tables are plain data. Records are materialized once per process and
//! shared through `Arc`.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use crate::types::{EntityTypeConfig, SchemaMap};

/// Type key of the sentinel record.
pub const UNKNOWN_TYPE_KEY: &str = "_unknown";

/// Folder used for well-known type keys whose schema omits `resolution.folder`.
pub const FOLDER_FALLBACKS: &[(&str, &str)] = &[
    ("Person", "People"),
    ("Organization", "Organizations"),
    ("Project", "Projects"),
    ("Location", "Locations"),
    ("Concept", "Concepts"),
    ("Meeting", "Meetings"),
    ("Practice", "Practices"),
    ("Pattern", "Patterns"),
    ("CaseStudy", "CaseStudies"),
    ("Bioregion", "Bioregions"),
    ("Protocol", "Protocols"),
    ("Playbook", "Playbooks"),
    ("Question", "Questions"),
    ("Claim", "Claims"),
    ("Evidence", "Evidence"),
];

/// Stopwords applied to every type, in addition to its own.
pub const GLOBAL_PHONETIC_STOPWORDS: &[&str] = &["the", "a", "an"];

/// Look up the fallback folder for a well-known type key.
pub fn folder_fallback(type_key: &str) -> Option<&'static str> {
    FOLDER_FALLBACKS
        .iter()
        .find(|(key, _)| *key == type_key)
        .map(|(_, folder)| *folder)
}

/// Row of the default table: key, label, folder and the overrides that
/// differ from the per-field defaults.
struct DefaultRow {
    key: &'static str,
    label: &'static str,
    folder: &'static str,
    phonetic: bool,
    stopwords: &'static [&'static str],
    min_context_people: u32,
    similarity: f64,
    semantic: f64,
    token_overlap: bool,
}

const fn row(
    key: &'static str,
    label: &'static str,
    folder: &'static str,
    similarity: f64,
    semantic: f64,
    token_overlap: bool,
) -> DefaultRow {
    DefaultRow {
        key,
        label,
        folder,
        phonetic: false,
        stopwords: &[],
        min_context_people: 2,
        similarity,
        semantic,
        token_overlap,
    }
}

// Phonetic matching is opt-in: only Person enables it.
const DEFAULT_ROWS: &[DefaultRow] = &[
    DefaultRow {
        key: "Person",
        label: "Person",
        folder: "People",
        phonetic: true,
        stopwords: &["dr", "mr", "mrs", "ms", "prof"],
        min_context_people: 1,
        similarity: 0.92,
        semantic: 0.92,
        token_overlap: false,
    },
    row("Organization", "Organization", "Organizations", 0.85, 0.92, true),
    row("Project", "Project", "Projects", 0.85, 0.92, true),
    row("Location", "Location", "Locations", 0.90, 0.92, true),
    row("Concept", "Concept", "Concepts", 0.75, 0.88, false),
    DefaultRow {
        min_context_people: 1,
        ..row("Meeting", "Meeting", "Meetings", 0.90, 0.92, true)
    },
    row("Practice", "Practice", "Practices", 0.80, 0.90, true),
    row("Pattern", "Pattern", "Patterns", 0.80, 0.90, true),
    row("CaseStudy", "Case Study", "CaseStudies", 0.85, 0.92, true),
    row("Bioregion", "Bioregion", "Bioregions", 0.85, 0.92, true),
    row("Protocol", "Protocol", "Protocols", 0.85, 0.92, true),
    row("Playbook", "Playbook", "Playbooks", 0.85, 0.92, true),
    row("Question", "Question", "Questions", 0.75, 0.88, false),
    row("Claim", "Claim", "Claims", 0.75, 0.88, false),
    row("Evidence", "Evidence", "Evidence", 0.80, 0.90, true),
];

impl DefaultRow {
    fn to_config(&self) -> EntityTypeConfig {
        EntityTypeConfig {
            phonetic_matching: self.phonetic,
            phonetic_stopwords: self.stopwords.iter().map(|s| s.to_string()).collect(),
            min_context_people: self.min_context_people,
            similarity_threshold: self.similarity,
            semantic_threshold: self.semantic,
            require_token_overlap: self.token_overlap,
            ..EntityTypeConfig::new(self.key, self.label, self.folder)
        }
    }
}

/// The built-in default record set.
pub fn default_schemas() -> &'static SchemaMap {
    static DEFAULTS: OnceLock<SchemaMap> = OnceLock::new();
    DEFAULTS.get_or_init(|| {
        DEFAULT_ROWS
            .iter()
            .map(|row| (row.key.to_string(), Arc::new(row.to_config())))
            .collect()
    })
}

/// The strict record returned for type hints that match nothing.
///
/// Never stored in a registry mapping.
pub fn unknown_type() -> Arc<EntityTypeConfig> {
    static UNKNOWN: OnceLock<Arc<EntityTypeConfig>> = OnceLock::new();
    UNKNOWN
        .get_or_init(|| {
            Arc::new(EntityTypeConfig {
                phonetic_stopwords: BTreeSet::new(),
                min_context_people: 2,
                similarity_threshold: 0.90,
                semantic_threshold: 0.95,
                require_token_overlap: true,
                ..EntityTypeConfig::new(UNKNOWN_TYPE_KEY, "Unknown", "Misc")
            })
        })
        .clone()
}
