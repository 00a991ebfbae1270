//! State and province abbreviation tables.
//!
//! Forward maps expand postal abbreviations to full names ("CA" ->
//! "California"); reverse maps recover the abbreviation from a full name.
//! Keyed by uppercase ISO country code. Used as-is by the normalizer and
//! reconciler.

use std::collections::HashMap;
use std::sync::LazyLock;

const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

const CA_PROVINCES: &[(&str, &str)] = &[
    ("AB", "Alberta"),
    ("BC", "British Columbia"),
    ("MB", "Manitoba"),
    ("NB", "New Brunswick"),
    ("NL", "Newfoundland and Labrador"),
    ("NT", "Northwest Territories"),
    ("NS", "Nova Scotia"),
    ("NU", "Nunavut"),
    ("ON", "Ontario"),
    ("PE", "Prince Edward Island"),
    ("QC", "Quebec"),
    ("SK", "Saskatchewan"),
    ("YT", "Yukon"),
];

type RegionMap = HashMap<&'static str, HashMap<&'static str, &'static str>>;
type ReverseRegionMap = HashMap<&'static str, HashMap<String, &'static str>>;

static REGION_MAPPING: LazyLock<RegionMap> = LazyLock::new(|| {
    let mut mapping = HashMap::new();
    mapping.insert("US", US_STATES.iter().copied().collect());
    mapping.insert("CA", CA_PROVINCES.iter().copied().collect());
    mapping
});

static REVERSE_MAPPING: LazyLock<ReverseRegionMap> = LazyLock::new(|| {
    REGION_MAPPING
        .iter()
        .map(|(country, regions)| {
            let reversed = regions
                .iter()
                .map(|(abbrev, full)| (full.to_lowercase(), *abbrev))
                .collect();
            (*country, reversed)
        })
        .collect()
});

/// Expands an uppercase abbreviation to its full region name under the given
/// uppercase country code. `("US", "CA")` -> `Some("California")`.
pub fn expand_abbreviation(country_code: &str, abbreviation: &str) -> Option<&'static str> {
    REGION_MAPPING
        .get(country_code)?
        .get(abbreviation)
        .copied()
}

/// Looks up the abbreviation for a lowercase full region name under the given
/// uppercase country code. `("US", "california")` -> `Some("CA")`.
pub fn abbreviation_for(country_code: &str, full_name: &str) -> Option<&'static str> {
    REVERSE_MAPPING.get(country_code)?.get(full_name).copied()
}
