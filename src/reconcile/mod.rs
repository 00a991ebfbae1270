//! Address reconciliation: expected place vs geocoded address.
//!
//! Turns a geocoded address and the claimed (city, state, country) triple
//! into a single verdict. Country gates everything: a country mismatch
//! short-circuits before state or city are looked at. State and city each
//! tolerate abbreviations, partial matches, and fuzzy spelling via a 0-100
//! similarity score.
//!
//! Transport failures (`timeout`, `error`) are assigned upstream by the
//! retrying client and scheduler; this module only sees successful lookups.


use crate::config::{CITY_FUZZY_THRESHOLD, COUNTRY_FUZZY_THRESHOLD, STATE_FUZZY_THRESHOLD};
use crate::models::{GeocodedAddress, VerificationStatus};
use crate::normalize::{normalize_name, regions};

/// The claimed location for one record, borrowed from a `LocationRecord`.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedLocation<'a> {
    /// Claimed city name.
    pub city: &'a str,
    /// Claimed state or province, possibly an abbreviation.
    pub state: Option<&'a str>,
    /// Claimed country name or code.
    pub country: &'a str,
}

/// Similarity between two strings on a 0-100 scale.
pub fn fuzzy_ratio(a: &str, b: &str) -> u32 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u32
}

/// Compares a claimed location against a geocoded address and returns the
/// verdict.
///
/// Decision order:
/// 1. Empty payload -> `Unknown`.
/// 2. Country mismatch -> `InaccurateCountry` (state/city never compared).
/// 3. City + state matched -> `Accurate`.
/// 4. State matched, geocoder returned no city-like field -> `StateOnlyMatch`.
/// 5. State matched, city did not -> `StateMatchCityMismatch`.
/// 6. Anything else -> `Inaccurate`.
pub fn reconcile(expected: &ExpectedLocation<'_>, actual: &GeocodedAddress) -> VerificationStatus {
    if actual.is_empty() {
        return VerificationStatus::Unknown;
    }

    let expected_country = normalize_name(expected.country, None);
    let actual_country = normalize_name(actual.country.as_deref().unwrap_or(""), None);
    let country_matches = expected_country == actual_country
        || fuzzy_ratio(&expected_country, &actual_country) > COUNTRY_FUZZY_THRESHOLD;
    if !country_matches {
        return VerificationStatus::InaccurateCountry;
    }

    let state_matches = state_field_matches(expected, actual);

    let actual_city = normalize_name(actual.city_candidate().unwrap_or(""), None);
    let expected_city = normalize_name(expected.city, None);
    let city_matches = !actual_city.is_empty()
        && (expected_city.contains(&actual_city)
            || actual_city.contains(&expected_city)
            || fuzzy_ratio(&expected_city, &actual_city) > CITY_FUZZY_THRESHOLD);

    if city_matches && state_matches {
        VerificationStatus::Accurate
    } else if state_matches && actual_city.is_empty() {
        VerificationStatus::StateOnlyMatch
    } else if state_matches {
        VerificationStatus::StateMatchCityMismatch
    } else {
        VerificationStatus::Inaccurate
    }
}

/// State comparison. Matches on normalized equality, on the claimed
/// abbreviation agreeing with the reverse-mapped actual state, or on fuzzy
/// similarity. An empty side never matches.
fn state_field_matches(expected: &ExpectedLocation<'_>, actual: &GeocodedAddress) -> bool {
    let claimed_state = expected.state.unwrap_or("");
    let expected_state = normalize_name(claimed_state, Some(expected.country));
    let actual_state = normalize_name(actual.state.as_deref().unwrap_or(""), None);
    if expected_state.is_empty() || actual_state.is_empty() {
        return false;
    }

    if expected_state == actual_state {
        return true;
    }

    // "IL" claimed and "Illinois" returned: reverse-map the full name back
    // to its abbreviation and compare against the claim as written.
    let country_code = expected.country.trim().to_uppercase();
    if let Some(abbrev) = regions::abbreviation_for(&country_code, &actual_state) {
        if abbrev.eq_ignore_ascii_case(claimed_state.trim()) {
            return true;
        }
    }

    fuzzy_ratio(&expected_state, &actual_state) > STATE_FUZZY_THRESHOLD
}
