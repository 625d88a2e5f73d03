//! # Phonetic Name Normalization
//!
//! Some names are spelled in a way that English phonetic encoders read
//! wrongly: Irish "Sean" sounds like "Shawn" but encodes differently. Before
//! a phonetic comparison, name tokens are case-folded and mapped through a
//! fixed table of such variants to a canonical spelling.
//!
//! Everything here is pure. Case folding is full Unicode folding via
//! `caseless`, not `str::to_lowercase`.

use std::collections::HashSet;

use crate::defaults::GLOBAL_PHONETIC_STOPWORDS;
use crate::types::EntityTypeConfig;

/// Spelling variant → phonetically equivalent canonical spelling.
pub const PHONETIC_NAME_NORMALIZATIONS: &[(&str, &str)] = &[
    // Irish
    ("sean", "shawn"),
    ("siobhan", "shivon"),
    ("niamh", "neeve"),
    ("caoimhe", "keeva"),
    ("cian", "kian"),
    ("ciara", "kiara"),
    ("aisling", "ashling"),
    ("aoife", "eefa"),
    ("saoirse", "seersha"),
    ("eoin", "owen"),
    ("padraig", "patrick"),
    ("tadhg", "tige"),
    // Scottish
    ("iain", "ian"),
    // Welsh
    ("rhys", "reese"),
    ("siân", "shan"),
];

/// Full Unicode case folding.
pub fn casefold(s: &str) -> String {
    caseless::default_case_fold_str(s)
}

/// Case-fold a token and map it to its canonical phonetic spelling.
///
/// Tokens absent from the table come back case-folded but otherwise unchanged.
pub fn normalize(token: &str) -> String {
    let folded = casefold(token);
    match PHONETIC_NAME_NORMALIZATIONS
        .iter()
        .find(|(variant, _)| *variant == folded)
    {
        Some((_, canonical)) => (*canonical).to_string(),
        None => folded,
    }
}

/// First token of `text` that is not a stopword, normalized.
///
/// `type_stopwords` is unioned with [`GLOBAL_PHONETIC_STOPWORDS`]; both sides
/// are case-folded. Tokens are split on whitespace and compared with edge
/// punctuation trimmed, so `"Dr."` matches the stopword `"dr"`. Only
/// stopwords are skipped: a punctuation-only token such as `"&"` is returned
/// as is. When every token is a stopword the first token is used. Only empty
/// or all-whitespace text yields an empty string.
pub fn first_significant_token<I, S>(text: &str, type_stopwords: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stopwords: HashSet<String> = GLOBAL_PHONETIC_STOPWORDS
        .iter()
        .map(|s| casefold(s))
        .collect();
    stopwords.extend(type_stopwords.into_iter().map(|s| casefold(s.as_ref())));

    let folded = casefold(text);
    let mut tokens = folded.split_whitespace().peekable();
    let Some(&first) = tokens.peek() else {
        return String::new();
    };
    let token = tokens
        .map(significant_form)
        .find(|token| !stopwords.contains(*token))
        .unwrap_or_else(|| significant_form(first));
    normalize(token)
}

/// The token with edge punctuation trimmed, or the token itself when nothing
/// but punctuation is left.
fn significant_form(token: &str) -> &str {
    let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        token
    } else {
        trimmed
    }
}

/// [`first_significant_token`] using the stopwords configured for a type.
pub fn first_significant_token_for(text: &str, schema: &EntityTypeConfig) -> String {
    first_significant_token(text, &schema.phonetic_stopwords)
}
