//! # Normalize Subcommand
//!
//! Prints the first significant phonetic token of a name, as the entity
//! matcher would compare it.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use koi_schema::{first_significant_token, first_significant_token_for, SchemaRegistry};

/// Arguments for the `koi normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Name or phrase to normalize.
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Entity type whose stopwords apply. Without it only the global
    /// stopwords (`the`, `a`, `an`) are skipped.
    #[arg(long = "type", value_name = "TYPE")]
    pub type_hint: Option<String>,
}

/// Execute the normalize subcommand.
pub fn run_normalize(
    args: &NormalizeArgs,
    registry: &SchemaRegistry,
    out: &mut dyn Write,
) -> Result<u8> {
    let token = match &args.type_hint {
        Some(hint) => {
            let schema = registry.snapshot().resolve(hint);
            first_significant_token_for(&args.text, &schema)
        }
        None => first_significant_token(&args.text, std::iter::empty::<&str>()),
    };
    writeln!(out, "{token}")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use koi_schema::SchemaConfig;

    fn normalize_with(text: &str, type_hint: Option<&str>) -> String {
        let registry = SchemaRegistry::new(SchemaConfig::unconfigured());
        let args = NormalizeArgs {
            text: text.to_string(),
            type_hint: type_hint.map(str::to_string),
        };
        let mut buf = Vec::new();
        assert_eq!(run_normalize(&args, &registry, &mut buf).unwrap(), 0);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_person_stopwords_apply() {
        assert_eq!(normalize_with("Dr. Sean Murphy", Some("person")), "shawn\n");
    }

    #[test]
    fn test_without_type_only_global_stopwords() {
        assert_eq!(normalize_with("Dr. Sean Murphy", None), "dr\n");
        assert_eq!(normalize_with("The Niamh Trust", None), "neeve\n");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(normalize_with("", None), "\n");
    }
}
