//! # Type Resolution
//!
//! Maps free-form type hints onto records. Resolution never fails: a hint
//! that matches nothing gets the strict unknown-type sentinel.
//!
//! ## Lookup order
//!
//! 1. Exact type key.
//! 2. Case-folded type key.
//! 3. Case-folded alias.
//! 4. The sentinel, with a warning.
//!
//! Every lookup runs against one [`RegistrySnapshot`]. [`TypeResolver`]
//! takes a fresh snapshot per call; callers that need several answers from
//! the same record set should call the snapshot methods directly.

use std::sync::Arc;

use crate::defaults::unknown_type;
use crate::phonetic::casefold;
use crate::registry::{RegistrySnapshot, SchemaRegistry};
use crate::types::EntityTypeConfig;

impl RegistrySnapshot {
    /// Resolve a type hint to a record, or the sentinel.
    pub fn resolve(&self, type_hint: &str) -> Arc<EntityTypeConfig> {
        if let Some(schema) = self.get(type_hint) {
            return Arc::clone(schema);
        }
        let folded = casefold(type_hint.trim());
        if let Some(schema) = self
            .get_folded_key(&folded)
            .or_else(|| self.get_folded_alias(&folded))
        {
            return Arc::clone(schema);
        }
        tracing::warn!(type_hint, version = %self.version(), "unknown entity type");
        unknown_type()
    }

    /// Storage folder for a type hint. `Misc` for unknown hints.
    pub fn type_to_folder(&self, type_hint: &str) -> String {
        self.resolve(type_hint).folder.clone()
    }

    /// Type key stored in a folder.
    ///
    /// An exact folder match wins. Otherwise the folder is compared, ignoring
    /// case and one pluralizing suffix, against every record's folder; only
    /// when no folder matches are the type keys tried.
    pub fn folder_to_type(&self, folder: &str) -> Option<String> {
        if let Some(schema) = self.schemas().values().find(|s| s.folder == folder) {
            return Some(schema.type_key.clone());
        }
        let wanted = singular(&casefold(folder.trim()));
        if wanted.is_empty() {
            return None;
        }
        let matches = |name: &str| singular(&casefold(name)) == wanted;
        self.schemas()
            .values()
            .find(|s| matches(&s.folder))
            .or_else(|| self.schemas().values().find(|s| matches(&s.type_key)))
            .map(|s| s.type_key.clone())
    }

    /// Every type key, in key order.
    pub fn all_known_types(&self) -> Vec<String> {
        self.schemas().keys().cloned().collect()
    }

    /// Type keys with phonetic matching enabled, in key order.
    pub fn phonetic_enabled_types(&self) -> Vec<String> {
        self.schemas()
            .values()
            .filter(|s| s.phonetic_matching)
            .map(|s| s.type_key.clone())
            .collect()
    }
}

/// Strip one pluralizing suffix: `ies` becomes `y`, a single trailing `s`
/// is dropped. `ss` endings are left alone.
fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Resolver bound to a shared registry.
///
/// Cheap to clone; every call reads the registry's current snapshot, so a
/// reload is visible on the next call.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    registry: Arc<SchemaRegistry>,
}

impl TypeResolver {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Resolve a type hint. Never fails.
    pub fn resolve(&self, type_hint: &str) -> Arc<EntityTypeConfig> {
        self.registry.snapshot().resolve(type_hint)
    }

    pub fn type_to_folder(&self, type_hint: &str) -> String {
        self.registry.snapshot().type_to_folder(type_hint)
    }

    pub fn folder_to_type(&self, folder: &str) -> Option<String> {
        self.registry.snapshot().folder_to_type(folder)
    }

    pub fn all_known_types(&self) -> Vec<String> {
        self.registry.snapshot().all_known_types()
    }

    pub fn phonetic_enabled_types(&self) -> Vec<String> {
        self.registry.snapshot().phonetic_enabled_types()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{default_schemas, UNKNOWN_TYPE_KEY};
    use crate::source::{MemorySource, RawDocument};
    use proptest::prelude::*;

    fn defaults_snapshot() -> RegistrySnapshot {
        RegistrySnapshot::new(default_schemas().clone())
    }

    fn resolver_with(docs: Vec<RawDocument>) -> TypeResolver {
        let registry = Arc::new(SchemaRegistry::default());
        registry.reload_from(&MemorySource::new(docs));
        TypeResolver::new(registry)
    }

    fn project_with_aliases() -> RawDocument {
        RawDocument::new(
            "project",
            "---\nlabel: Project\nresolution:\n  folder: Projects\n  \
             type_aliases: [Proj, initiative]\n---\n",
        )
    }

    #[test]
    fn test_resolve_exact_key() {
        let snapshot = defaults_snapshot();
        let person = snapshot.resolve("Person");
        assert_eq!(person.type_key, "Person");
        assert!(person.phonetic_matching);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let snapshot = defaults_snapshot();
        assert_eq!(snapshot.resolve("person").type_key, "Person");
        assert_eq!(snapshot.resolve("CASESTUDY").type_key, "CaseStudy");
        assert_eq!(snapshot.resolve("  organization ").type_key, "Organization");
    }

    #[test]
    fn test_resolve_aliases_any_case() {
        let resolver = resolver_with(vec![project_with_aliases()]);
        for hint in ["Proj", "proj", "PROJ", "Initiative"] {
            assert_eq!(resolver.resolve(hint).type_key, "Project", "hint {hint}");
        }
    }

    #[test]
    fn test_resolve_unknown_is_sentinel() {
        let snapshot = defaults_snapshot();
        let unknown = snapshot.resolve("Spaceship");
        assert_eq!(unknown.type_key, UNKNOWN_TYPE_KEY);
        assert_eq!(unknown.folder, "Misc");
        assert_eq!(unknown.semantic_threshold, 0.95);
        assert!(snapshot.get(UNKNOWN_TYPE_KEY).is_none());
    }

    #[test]
    fn test_type_to_folder() {
        let snapshot = defaults_snapshot();
        assert_eq!(snapshot.type_to_folder("Person"), "People");
        assert_eq!(snapshot.type_to_folder("case study"), "Misc");
        assert_eq!(snapshot.type_to_folder("casestudy"), "CaseStudies");
        assert_eq!(snapshot.type_to_folder(""), "Misc");
    }

    #[test]
    fn test_folder_to_type() {
        let snapshot = defaults_snapshot();
        assert_eq!(snapshot.folder_to_type("People").as_deref(), Some("Person"));
        assert_eq!(snapshot.folder_to_type("Person").as_deref(), Some("Person"));
        assert_eq!(snapshot.folder_to_type("CaseStudy").as_deref(), Some("CaseStudy"));
        assert_eq!(snapshot.folder_to_type("CaseStudies").as_deref(), Some("CaseStudy"));
        assert_eq!(snapshot.folder_to_type("projects").as_deref(), Some("Project"));
        assert_eq!(snapshot.folder_to_type("Evidence").as_deref(), Some("Evidence"));
        assert_eq!(snapshot.folder_to_type("Nonexistent"), None);
        assert_eq!(snapshot.folder_to_type(""), None);
        assert_eq!(snapshot.folder_to_type("Misc"), None);
    }

    #[test]
    fn test_folder_match_beats_type_key_match() {
        let resolver = resolver_with(vec![
            RawDocument::new(
                "campaign",
                "---\nlabel: Campaign\nresolution:\n  folder: Drives\n---\n",
            ),
            RawDocument::new(
                "drive",
                "---\nlabel: Drive\nresolution:\n  folder: Campaign\n---\n",
            ),
        ]);
        assert_eq!(resolver.folder_to_type("Campaign").as_deref(), Some("Drive"));
        assert_eq!(resolver.folder_to_type("campaign").as_deref(), Some("Drive"));
        assert_eq!(resolver.folder_to_type("campaigns").as_deref(), Some("Drive"));
        assert_eq!(resolver.folder_to_type("drive").as_deref(), Some("Campaign"));
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("casestudies"), "casestudy");
        assert_eq!(singular("projects"), "project");
        assert_eq!(singular("class"), "class");
        assert_eq!(singular("s"), "s");
        assert_eq!(singular("ies"), "ie");
    }

    #[test]
    fn test_known_and_phonetic_types() {
        let snapshot = defaults_snapshot();
        let known = snapshot.all_known_types();
        assert_eq!(known.len(), 15);
        let mut sorted = known.clone();
        sorted.sort();
        assert_eq!(known, sorted);
        assert_eq!(snapshot.phonetic_enabled_types(), vec!["Person"]);
    }

    #[test]
    fn test_resolver_sees_reload() {
        let resolver = resolver_with(vec![]);
        assert_eq!(resolver.resolve("proj").type_key, UNKNOWN_TYPE_KEY);

        resolver
            .registry()
            .reload_from(&MemorySource::new(vec![project_with_aliases()]));
        assert_eq!(resolver.resolve("proj").type_key, "Project");
        assert_eq!(resolver.type_to_folder("proj"), "Projects");
        assert_eq!(resolver.folder_to_type("Projects").as_deref(), Some("Project"));
    }

    proptest! {
        #[test]
        fn test_resolve_never_fails(hint in "\\PC{0,24}") {
            let snapshot = defaults_snapshot();
            let resolved = snapshot.resolve(&hint);
            let known = snapshot.get(&resolved.type_key).is_some();
            prop_assert!(known || resolved.type_key == UNKNOWN_TYPE_KEY);
            prop_assert!(!resolved.folder.is_empty());
        }
    }
}
