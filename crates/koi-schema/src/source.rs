//! # Schema Sources
//!
//! A [`SchemaSource`] yields the raw documents a registry is built from. The
//! registry never looks at where documents come from; it only sees
//! [`RawDocument`]s.
//!
//! [`VaultSource`] reads a notes vault from disk: every `schema-*.md` file
//! directly under `<root>/Ontology/`, in file-name order. [`MemorySource`]
//! serves documents held in memory.

use std::path::{Path, PathBuf};

use crate::error::{SchemaError, SchemaResult};

/// Subfolder of the vault root holding schema documents.
pub const ONTOLOGY_DIR: &str = "Ontology";
/// File-name prefix of schema documents.
pub const SCHEMA_FILE_PREFIX: &str = "schema-";
/// File extension of schema documents.
pub const SCHEMA_FILE_EXTENSION: &str = "md";

/// One undecoded schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Stable slug, used as the type key of last resort.
    pub id: String,
    /// Where the document came from, for log messages.
    pub origin: String,
    /// Full document text.
    pub body: String,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            origin: id.clone(),
            id,
            body: body.into(),
        }
    }
}

/// Lazy sequence of documents. A failed read is an `Err` item; the sequence
/// continues after it.
pub type Documents<'a> = Box<dyn Iterator<Item = SchemaResult<RawDocument>> + Send + 'a>;

/// Something that can enumerate schema documents.
pub trait SchemaSource {
    /// Start discovery.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::SourceUnavailable` when the discovery point does
    /// not exist.
    fn discover(&self) -> SchemaResult<Documents<'_>>;

    /// Human-readable description of the source, for log messages.
    fn describe(&self) -> String;
}

/// Schema documents stored in a vault's `Ontology/` folder.
#[derive(Debug, Clone)]
pub struct VaultSource {
    root: PathBuf,
}

impl VaultSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The discovery point: `<root>/Ontology`.
    pub fn ontology_dir(&self) -> PathBuf {
        self.root.join(ONTOLOGY_DIR)
    }
}

impl SchemaSource for VaultSource {
    fn discover(&self) -> SchemaResult<Documents<'_>> {
        let dir = self.ontology_dir();
        if !dir.is_dir() {
            let reason = if dir.exists() {
                "not a directory"
            } else {
                "not found"
            };
            return Err(SchemaError::SourceUnavailable {
                path: dir,
                reason: reason.to_string(),
            });
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| SchemaError::SourceUnavailable {
            path: dir.clone(),
            reason: format!("cannot read directory: {e}"),
        })?;

        let (paths, failures) = partition_entries(&dir, entries.map(|e| e.map(|e| e.path())));
        Ok(Box::new(
            failures
                .into_iter()
                .map(Err)
                .chain(paths.into_iter().map(read_document)),
        ))
    }

    fn describe(&self) -> String {
        self.ontology_dir().display().to_string()
    }
}

/// Split directory entries into sorted schema file paths and read failures.
///
/// An unreadable entry has no name of its own, so its failure carries the
/// directory path.
fn partition_entries<I>(dir: &Path, entries: I) -> (Vec<PathBuf>, Vec<SchemaError>)
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut paths = Vec::new();
    let mut failures = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() && schema_slug(&path).is_some() => paths.push(path),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "unreadable directory entry");
                failures.push(SchemaError::DocumentRead {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
        }
    }
    paths.sort();
    (paths, failures)
}

fn read_document(path: PathBuf) -> SchemaResult<RawDocument> {
    let id = schema_slug(&path).unwrap_or_default();
    let body = std::fs::read_to_string(&path).map_err(|e| SchemaError::DocumentRead {
        path: path.clone(),
        source: e,
    })?;
    Ok(RawDocument {
        id,
        origin: path.display().to_string(),
        body,
    })
}

/// Slug of a schema file: the stem with the `schema-` prefix removed.
///
/// Returns `None` for files that are not schema documents.
/// `Ontology/schema-eco-credit.md` → `eco-credit`.
pub fn schema_slug(path: &Path) -> Option<String> {
    if path.extension()?.to_str()? != SCHEMA_FILE_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let slug = stem.strip_prefix(SCHEMA_FILE_PREFIX)?;
    (!slug.is_empty()).then(|| slug.to_string())
}

/// Documents held in memory, yielded in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<RawDocument>,
}

impl MemorySource {
    pub fn new(documents: Vec<RawDocument>) -> Self {
        Self { documents }
    }
}

impl SchemaSource for MemorySource {
    fn discover(&self) -> SchemaResult<Documents<'_>> {
        Ok(Box::new(self.documents.iter().cloned().map(Ok)))
    }

    fn describe(&self) -> String {
        format!("{} in-memory documents", self.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_schema_slug() {
        assert_eq!(
            schema_slug(Path::new("Ontology/schema-eco-credit.md")).as_deref(),
            Some("eco-credit")
        );
        assert_eq!(schema_slug(Path::new("schema-.md")), None);
        assert_eq!(schema_slug(Path::new("notes-person.md")), None);
        assert_eq!(schema_slug(Path::new("schema-person.txt")), None);
        assert_eq!(schema_slug(Path::new("schema-person")), None);
    }

    #[test]
    fn test_vault_missing_ontology_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = VaultSource::new(tmp.path()).discover().err().unwrap();
        match err {
            SchemaError::SourceUnavailable { path, reason } => {
                assert!(path.ends_with(ONTOLOGY_DIR));
                assert_eq!(reason, "not found");
            }
            other => panic!("Expected SourceUnavailable, got: {other}"),
        }
    }

    #[test]
    fn test_vault_ontology_file_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), ONTOLOGY_DIR, "not a folder");
        let err = VaultSource::new(tmp.path()).discover().err().unwrap();
        assert!(format!("{err}").contains("not a directory"));
    }

    #[test]
    fn test_vault_discovers_schema_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let ontology = tmp.path().join(ONTOLOGY_DIR);
        std::fs::create_dir(&ontology).unwrap();
        write(&ontology, "schema-project.md", "---\nlabel: Project\n---\n");
        write(&ontology, "schema-claim.md", "---\nlabel: Claim\n---\n");
        write(&ontology, "readme.md", "ignored");
        write(&ontology, "schema-notes.txt", "ignored");
        std::fs::create_dir(ontology.join("schema-dir.md")).unwrap();

        let source = VaultSource::new(tmp.path());
        let docs: Vec<RawDocument> = source
            .discover()
            .unwrap()
            .collect::<SchemaResult<_>>()
            .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["claim", "project"]);
        assert!(docs[0].origin.ends_with("schema-claim.md"));
        assert_eq!(docs[1].body, "---\nlabel: Project\n---\n");
    }

    #[test]
    fn test_unreadable_entries_become_read_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("schema-claim.md");
        std::fs::write(&good, "---\nlabel: Claim\n---\n").unwrap();
        let entries = vec![
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")),
            Ok(good.clone()),
            Ok(tmp.path().join("readme.md")),
        ];

        let (paths, failures) = partition_entries(tmp.path(), entries);
        assert_eq!(paths, vec![good]);
        assert_eq!(failures.len(), 1);
        match &failures[0] {
            SchemaError::DocumentRead { path, source } => {
                assert_eq!(path, tmp.path());
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("Expected DocumentRead, got: {other}"),
        }
    }

    #[test]
    fn test_memory_source_preserves_order() {
        let source = MemorySource::new(vec![
            RawDocument::new("b", "second"),
            RawDocument::new("a", "first"),
        ]);
        let ids: Vec<String> = source
            .discover()
            .unwrap()
            .map(|d| d.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(source.describe(), "2 in-memory documents");
    }
}
