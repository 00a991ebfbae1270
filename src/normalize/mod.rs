//! Free-text place-name normalization.
//!
//! Canonicalizes city/state/country names so the reconciler compares like
//! with like: lowercase, punctuation stripped, filler prefixes removed,
//! known abbreviations expanded, country long-forms collapsed to short
//! codes. Pure string work; no I/O.

pub mod regions;

/// Filler tokens stripped from place names before comparison.
const FILLER_TOKENS: &[&str] = &["city of ", "town of "];

/// Country long-forms replaced by the short code used for comparison.
/// Order matters: "united states" must be rewritten before "usa" so the
/// trailing "a" of "usa" is never orphaned inside a longer phrase.
const COUNTRY_REPLACEMENTS: &[(&str, &str)] = &[
    ("united states", "us"),
    ("usa", "us"),
    ("canada", "ca"),
];

/// Normalizes a place name for comparison.
///
/// With a `country_code` that names a known region table, an input that is
/// exactly a postal abbreviation is expanded to the full region name first
/// ("CA" under "US" becomes "california").
///
/// Idempotent: normalizing an already-normalized name is a no-op.
///
/// # Examples
///
/// ```
/// use geo_accuracy::normalize::normalize_name;
///
/// assert_eq!(normalize_name("  City of Springfield. ", None), "springfield");
/// assert_eq!(normalize_name("IL", Some("US")), "illinois");
/// assert_eq!(normalize_name("United States", None), "us");
/// ```
pub fn normalize_name(raw: &str, country_code: Option<&str>) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut name = trimmed.to_lowercase();

    if let Some(code) = country_code {
        if let Some(full) =
            regions::expand_abbreviation(&code.trim().to_uppercase(), &trimmed.to_uppercase())
        {
            name = full.to_lowercase();
        }
    }

    name.retain(|c| c != '.' && c != ',');
    for token in FILLER_TOKENS {
        name = name.replace(token, "");
    }
    for (long_form, short_code) in COUNTRY_REPLACEMENTS {
        name = name.replace(long_form, short_code);
    }

    // Collapse runs of whitespace left behind by the replacements.
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}
