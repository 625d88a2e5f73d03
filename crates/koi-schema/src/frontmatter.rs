//! # Front Block Extraction
//!
//! A schema document opens with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! label: Project
//! resolution:
//!   folder: Projects
//!   type_aliases: [project, proj]
//! ---
//! Free-form notes follow.
//! ```
//!
//! The opening fence must be the very first line, optionally preceded by a
//! UTF-8 byte-order mark. The block ends at the next line that is exactly
//! `---`. Both LF and CRLF line endings are accepted.
//!
//! Parsing is delegated to `serde_yaml`; any parser failure or shape mismatch
//! surfaces as [`SchemaError::MalformedBlock`].

use serde::Deserialize;

use crate::error::{SchemaError, SchemaResult};

const FENCE: &str = "---";
const BOM: char = '\u{feff}';

/// Top-level keys of a schema front block. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub resolution: Option<ResolutionBlock>,
}

/// The nested `resolution` object. Every field is optional; the loader
/// supplies fallbacks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolutionBlock {
    #[serde(default)]
    pub type_key: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub phonetic_matching: Option<bool>,
    #[serde(default)]
    pub phonetic_stopwords: Option<Vec<String>>,
    #[serde(default)]
    pub type_aliases: Option<Vec<String>>,
    #[serde(default)]
    pub min_context_people: Option<u32>,
    #[serde(default)]
    pub similarity_threshold: Option<f64>,
    #[serde(default)]
    pub semantic_threshold: Option<f64>,
    #[serde(default)]
    pub require_token_overlap: Option<bool>,
}

/// Return the text between the opening and closing fences, if the body has
/// a front block.
pub fn extract_front_block(body: &str) -> Option<&str> {
    let body = body.strip_prefix(BOM).unwrap_or(body);
    let rest = body
        .strip_prefix("---\r\n")
        .or_else(|| body.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let content = line.trim_end_matches('\n').trim_end_matches('\r');
        if content == FENCE {
            let block = &rest[..offset];
            return Some(block.trim_end_matches('\n').trim_end_matches('\r'));
        }
        offset += line.len();
    }
    None
}

/// Parse a document body into its front matter.
///
/// Returns `Ok(None)` when the body has no front block, or when the block is
/// empty (null or an empty mapping).
pub fn parse_front_matter(document: &str, body: &str) -> SchemaResult<Option<FrontMatter>> {
    let Some(block) = extract_front_block(body) else {
        return Ok(None);
    };
    if block.trim().is_empty() {
        return Ok(None);
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|e| SchemaError::MalformedBlock {
            document: document.to_string(),
            reason: e.to_string(),
        })?;

    match &value {
        serde_yaml::Value::Null => return Ok(None),
        serde_yaml::Value::Mapping(map) if map.is_empty() => return Ok(None),
        serde_yaml::Value::Mapping(_) => {}
        other => {
            return Err(SchemaError::MalformedBlock {
                document: document.to_string(),
                reason: format!("expected a mapping, found {}", yaml_kind(other)),
            })
        }
    }

    serde_yaml::from_value(value)
        .map(Some)
        .map_err(|e| SchemaError::MalformedBlock {
            document: document.to_string(),
            reason: e.to_string(),
        })
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
