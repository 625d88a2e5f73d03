//! # Entity Type Records
//!
//! [`EntityTypeConfig`] is the canonical, fully-populated configuration for
//! one entity type. Records are built once by the loader and never mutated
//! afterwards; the registry shares them as `Arc<EntityTypeConfig>`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Default for `phonetic_matching` when a schema omits it.
pub const DEFAULT_PHONETIC_MATCHING: bool = false;
/// Default for `min_context_people` when a schema omits it.
pub const DEFAULT_MIN_CONTEXT_PEOPLE: u32 = 2;
/// Default for `similarity_threshold` when a schema omits it.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;
/// Default for `semantic_threshold` when a schema omits it.
pub const DEFAULT_SEMANTIC_THRESHOLD: f64 = 0.92;
/// Default for `require_token_overlap` when a schema omits it.
pub const DEFAULT_REQUIRE_TOKEN_OVERLAP: bool = true;

/// Mapping from type key to its record, ordered by type key.
pub type SchemaMap = BTreeMap<String, Arc<EntityTypeConfig>>;

/// Configuration for a single entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeConfig {
    /// Unique identifier. Taken verbatim from the schema, never re-cased.
    pub type_key: String,
    /// Human-readable name.
    pub label: String,
    /// Storage folder. Unique across the active record set.
    pub folder: String,
    /// Whether name tokens are phonetically normalized before comparison.
    pub phonetic_matching: bool,
    /// Case-folded stopwords, unioned with the global set at use time.
    pub phonetic_stopwords: BTreeSet<String>,
    /// Alternate spellings that resolve to this record.
    pub type_aliases: Vec<String>,
    pub min_context_people: u32,
    pub similarity_threshold: f64,
    pub semantic_threshold: f64,
    pub require_token_overlap: bool,
}

impl EntityTypeConfig {
    /// Create a record with every optional field at its default.
    pub fn new(
        type_key: impl Into<String>,
        label: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            type_key: type_key.into(),
            label: label.into(),
            folder: folder.into(),
            phonetic_matching: DEFAULT_PHONETIC_MATCHING,
            phonetic_stopwords: BTreeSet::new(),
            type_aliases: Vec::new(),
            min_context_people: DEFAULT_MIN_CONTEXT_PEOPLE,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
            require_token_overlap: DEFAULT_REQUIRE_TOKEN_OVERLAP,
        }
    }

    /// The fragment this record contributes to the registry version tag.
    pub(crate) fn version_fragment(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.type_key, self.folder, self.phonetic_matching, self.similarity_threshold
        )
    }
}
