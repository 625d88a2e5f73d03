//! # Source Configuration
//!
//! Decides which vault a registry loads from. Precedence, highest first:
//!
//! 1. An explicit path passed to `load`/`reload`.
//! 2. `ENTITY_SCHEMA_PATH`.
//! 3. `VAULT_PATH`, only on the lazy first load.
//! 4. `~/Documents/Notes`, only on the lazy first load.
//!
//! Empty variables count as unset.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Override for the schema vault, honored by every load without an explicit path.
pub const ENTITY_SCHEMA_PATH_ENV: &str = "ENTITY_SCHEMA_PATH";
/// Vault root used by the lazy first load.
pub const VAULT_PATH_ENV: &str = "VAULT_PATH";
/// Vault location relative to the home directory when `VAULT_PATH` is unset.
pub const DEFAULT_VAULT_SUBDIR: &str = "Documents/Notes";

/// Where a registry looks for schema documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Value of `ENTITY_SCHEMA_PATH`.
    pub schema_path: Option<PathBuf>,
    /// Vault for the lazy first load: `VAULT_PATH` or the home default.
    pub vault_path: Option<PathBuf>,
}

impl SchemaConfig {
    /// Read configuration from the process environment.
    ///
    /// Environment variables:
    /// - `ENTITY_SCHEMA_PATH` (default: unset)
    /// - `VAULT_PATH` (default: `~/Documents/Notes`)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name), dirs::home_dir())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<OsString>,
        home: Option<PathBuf>,
    ) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            schema_path: var(ENTITY_SCHEMA_PATH_ENV),
            vault_path: var(VAULT_PATH_ENV).or_else(|| home.map(|h| h.join(DEFAULT_VAULT_SUBDIR))),
        }
    }

    /// Configuration that never touches the environment or disk defaults.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Configuration pinned to one vault.
    pub fn with_vault(path: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: None,
            vault_path: Some(path.into()),
        }
    }

    /// Location for a load that may carry an explicit path.
    pub fn source_for(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.schema_path.clone())
    }

    /// Location for the lazy first load.
    pub fn lazy_source(&self) -> Option<PathBuf> {
        self.schema_path.clone().or_else(|| self.vault_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_to_home_notes() {
        let cfg = SchemaConfig::from_lookup(lookup(&[]), Some(PathBuf::from("/home/ana")));
        assert_eq!(cfg.schema_path, None);
        assert_eq!(cfg.vault_path, Some(PathBuf::from("/home/ana/Documents/Notes")));
        assert_eq!(cfg.source_for(None), None);
        assert_eq!(cfg.lazy_source(), Some(PathBuf::from("/home/ana/Documents/Notes")));
    }

    #[test]
    fn test_no_home_no_vault() {
        let cfg = SchemaConfig::from_lookup(lookup(&[]), None);
        assert_eq!(cfg, SchemaConfig::unconfigured());
        assert_eq!(cfg.lazy_source(), None);
    }

    #[test]
    fn test_vault_path_overrides_home() {
        let cfg = SchemaConfig::from_lookup(
            lookup(&[(VAULT_PATH_ENV, "/srv/vault")]),
            Some(PathBuf::from("/home/ana")),
        );
        assert_eq!(cfg.lazy_source(), Some(PathBuf::from("/srv/vault")));
        // VAULT_PATH only feeds the lazy load.
        assert_eq!(cfg.source_for(None), None);
    }

    #[test]
    fn test_schema_path_precedence() {
        let cfg = SchemaConfig::from_lookup(
            lookup(&[(ENTITY_SCHEMA_PATH_ENV, "/srv/schemas"), (VAULT_PATH_ENV, "/srv/vault")]),
            None,
        );
        assert_eq!(cfg.lazy_source(), Some(PathBuf::from("/srv/schemas")));
        assert_eq!(cfg.source_for(None), Some(PathBuf::from("/srv/schemas")));
        assert_eq!(
            cfg.source_for(Some(Path::new("/tmp/explicit"))),
            Some(PathBuf::from("/tmp/explicit"))
        );
    }

    #[test]
    fn test_empty_variables_are_unset() {
        let cfg = SchemaConfig::from_lookup(
            lookup(&[(ENTITY_SCHEMA_PATH_ENV, ""), (VAULT_PATH_ENV, "")]),
            None,
        );
        assert_eq!(cfg, SchemaConfig::unconfigured());
    }

    #[test]
    fn test_with_vault() {
        let cfg = SchemaConfig::with_vault("/data/notes");
        assert_eq!(cfg.lazy_source(), Some(PathBuf::from("/data/notes")));
        assert_eq!(cfg.source_for(None), None);
    }
}
