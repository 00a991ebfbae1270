//! Core data types: location records, verdicts, and geocoded addresses.

use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};

/// One input row: a coordinate pair and the place it claims to be.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    /// Row identifier, carried through from the input file.
    pub id: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Claimed city name.
    pub claimed_city: String,
    /// Alternate city spelling from the source data. Carried through the
    /// file format but not consulted by the matcher.
    pub claimed_city_alt: String,
    /// Claimed country name or code.
    pub claimed_country: String,
    /// Claimed state or province, if any. May be an abbreviation ("IL").
    pub claimed_state: Option<String>,
}

/// Verification verdict for a record.
///
/// Starts at `Unchecked` and transitions at most once per run. The snake_case
/// string form (`state_only_match`, ...) is what gets written to the
/// `geo_accuracy` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
    /// Not yet processed. The only state the pipeline will act on.
    Unchecked,
    /// City, state, and country all matched.
    Accurate,
    /// Country matched but the location heuristics failed.
    Inaccurate,
    /// Country did not match; city and state were not compared.
    InaccurateCountry,
    /// State matched and the geocoder returned no city-like field.
    StateOnlyMatch,
    /// State matched but the returned city did not.
    StateMatchCityMismatch,
    /// Geocoder returned no usable address for the coordinates.
    Unknown,
    /// Lookup timed out after all retries, or missed its deadline.
    Timeout,
    /// Geocoder reported a non-timeout failure.
    Error,
}

impl VerificationStatus {
    /// Whether this record is still awaiting processing.
    pub fn is_unchecked(self) -> bool {
        matches!(self, VerificationStatus::Unchecked)
    }
}

/// Structured address returned by the geocoding service.
///
/// All fields are optional; Nominatim populates whichever apply to the
/// location. Consumed immediately by the reconciler, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeocodedAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub hamlet: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl GeocodedAddress {
    /// True when the service returned no address payload at all.
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.town.is_none()
            && self.village.is_none()
            && self.municipality.is_none()
            && self.suburb.is_none()
            && self.neighbourhood.is_none()
            && self.hamlet.is_none()
            && self.county.is_none()
            && self.state.is_none()
            && self.country.is_none()
    }

    /// Best-guess city name: the first non-empty field in preference order,
    /// from most specific (neighbourhood) to least (county).
    pub fn city_candidate(&self) -> Option<&str> {
        [
            &self.neighbourhood,
            &self.suburb,
            &self.hamlet,
            &self.village,
            &self.town,
            &self.city,
            &self.municipality,
            &self.county,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find(|value| !value.trim().is_empty())
    }
}

/// The full dataset: input records plus one current verdict per record.
///
/// Only the scheduler writes statuses; workers report results back over a
/// channel rather than mutating this directly.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LocationRecord>,
    statuses: Vec<VerificationStatus>,
}

impl Dataset {
    /// Builds a dataset from parallel record/status vectors.
    ///
    /// # Panics
    ///
    /// Panics if the vectors differ in length.
    pub fn new(records: Vec<LocationRecord>, statuses: Vec<VerificationStatus>) -> Self {
        assert_eq!(records.len(), statuses.len());
        Dataset { records, statuses }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All input records, in file order.
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Current statuses, parallel to [`Dataset::records`].
    pub fn statuses(&self) -> &[VerificationStatus] {
        &self.statuses
    }

    /// Current status of one record.
    pub fn status(&self, index: usize) -> VerificationStatus {
        self.statuses[index]
    }

    /// Sets the verdict for one record.
    pub fn set_status(&mut self, index: usize, status: VerificationStatus) {
        self.statuses[index] = status;
    }

    /// Appends a record with its status.
    pub fn push(&mut self, record: LocationRecord, status: VerificationStatus) {
        self.records.push(record);
        self.statuses.push(status);
    }

    /// Indices of records still awaiting processing, in file order.
    /// Re-runs only act on these, leaving prior verdicts untouched.
    pub fn unchecked_indices(&self) -> Vec<usize> {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, status)| status.is_unchecked())
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(id: &str) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            claimed_city: "Springfield".to_string(),
            claimed_city_alt: String::new(),
            claimed_country: "US".to_string(),
            claimed_state: Some("IL".to_string()),
        }
    }

    #[test]
    fn test_status_string_round_trip() {
        assert_eq!(VerificationStatus::Unchecked.to_string(), "unchecked");
        assert_eq!(
            VerificationStatus::StateMatchCityMismatch.to_string(),
            "state_match_city_mismatch"
        );
        assert_eq!(
            VerificationStatus::from_str("inaccurate_country").unwrap(),
            VerificationStatus::InaccurateCountry
        );
        assert!(VerificationStatus::from_str("bogus").is_err());
    }

    #[test]
    fn test_city_candidate_preference_order() {
        let address = GeocodedAddress {
            city: Some("Chicago".to_string()),
            suburb: Some("Wicker Park".to_string()),
            county: Some("Cook County".to_string()),
            ..Default::default()
        };
        // Suburb beats city and county.
        assert_eq!(address.city_candidate(), Some("Wicker Park"));
    }

    #[test]
    fn test_city_candidate_skips_blank_fields() {
        let address = GeocodedAddress {
            neighbourhood: Some("  ".to_string()),
            town: Some("Pontoon Beach".to_string()),
            ..Default::default()
        };
        assert_eq!(address.city_candidate(), Some("Pontoon Beach"));
    }

    #[test]
    fn test_city_candidate_empty_address() {
        assert_eq!(GeocodedAddress::default().city_candidate(), None);
        assert!(GeocodedAddress::default().is_empty());
    }

    #[test]
    fn test_unchecked_indices() {
        let mut dataset = Dataset::default();
        dataset.push(record("1"), VerificationStatus::Accurate);
        dataset.push(record("2"), VerificationStatus::Unchecked);
        dataset.push(record("3"), VerificationStatus::Timeout);
        dataset.push(record("4"), VerificationStatus::Unchecked);
        assert_eq!(dataset.unchecked_indices(), vec![1, 3]);
    }
}
