//! Dataset load and checkpoint persistence.
//!
//! Flat headerless CSV with positional fields
//! `id, city, city_alt, country, latitude, longitude, state[, geo_accuracy]`.
//! A missing eighth field means the row has never been checked.
//!
//! Persistence rewrites the whole file after every batch: the new snapshot
//! is written to a temp file in the destination directory and renamed over
//! the old one, so a crash mid-write can never leave a half-updated
//! checkpoint behind.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tempfile::NamedTempFile;

use crate::error_handling::PersistenceError;
use crate::models::{Dataset, LocationRecord, VerificationStatus};

/// Persists dataset snapshots to a fixed path.
pub struct CheckpointWriter {
    path: PathBuf,
}

impl CheckpointWriter {
    /// Creates a writer targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CheckpointWriter { path: path.into() }
    }

    /// The checkpoint destination.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the full dataset snapshot atomically.
    pub fn persist(&self, dataset: &Dataset) -> Result<(), PersistenceError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file_mut());
            for (record, status) in dataset.records().iter().zip(dataset.statuses()) {
                let latitude = record.latitude.to_string();
                let longitude = record.longitude.to_string();
                let tag = status.to_string();
                writer.write_record([
                    record.id.as_str(),
                    record.claimed_city.as_str(),
                    record.claimed_city_alt.as_str(),
                    record.claimed_country.as_str(),
                    latitude.as_str(),
                    longitude.as_str(),
                    record.claimed_state.as_deref().unwrap_or(""),
                    tag.as_str(),
                ])?;
            }
            writer.flush()?;
        }

        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Loads a dataset from a headerless CSV at `path`.
///
/// Accepts both the 7-field input shape and the 8-field checkpoint shape, so
/// an interrupted run can be resumed from its own output.
pub fn load_dataset(path: &Path) -> Result<Dataset, PersistenceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut dataset = Dataset::default();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let row_number = index + 1;
        let (record, status) = parse_row(&row, row_number)?;
        dataset.push(record, status);
    }
    Ok(dataset)
}

fn parse_row(
    row: &csv::StringRecord,
    row_number: usize,
) -> Result<(LocationRecord, VerificationStatus), PersistenceError> {
    if row.len() < 7 {
        return Err(PersistenceError::MalformedRow {
            row: row_number,
            message: format!("expected at least 7 fields, got {}", row.len()),
        });
    }

    let field = |i: usize| row.get(i).unwrap_or("").trim();

    let latitude = parse_coordinate(field(4), "latitude", row_number)?;
    let longitude = parse_coordinate(field(5), "longitude", row_number)?;

    let state = field(6);
    let record = LocationRecord {
        id: field(0).to_string(),
        claimed_city: field(1).to_string(),
        claimed_city_alt: field(2).to_string(),
        claimed_country: field(3).to_string(),
        latitude,
        longitude,
        claimed_state: (!state.is_empty()).then(|| state.to_string()),
    };

    let status = match row.get(7).map(str::trim).filter(|s| !s.is_empty()) {
        None => VerificationStatus::Unchecked,
        Some(tag) => {
            VerificationStatus::from_str(tag).map_err(|_| PersistenceError::MalformedRow {
                row: row_number,
                message: format!("unrecognized geo_accuracy value {tag:?}"),
            })?
        }
    };

    Ok((record, status))
}

fn parse_coordinate(
    raw: &str,
    name: &str,
    row_number: usize,
) -> Result<f64, PersistenceError> {
    raw.parse().map_err(|_| PersistenceError::MalformedRow {
        row: row_number,
        message: format!("invalid {name} {raw:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_loads_seven_field_input() {
        let file = write_temp("1,Springfield,,US,39.78,-89.65,IL\n2,Quebec City,,CA,46.81,-71.21,QC\n");
        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].id, "1");
        assert_eq!(dataset.records()[0].claimed_state.as_deref(), Some("IL"));
        assert!(dataset.status(0).is_unchecked());
        assert!((dataset.records()[1].latitude - 46.81).abs() < 1e-9);
    }

    #[test]
    fn test_loads_eight_field_checkpoint() {
        let file = write_temp(
            "1,Springfield,,US,39.78,-89.65,IL,accurate\n2,Paris,,FR,48.85,2.35,,unchecked\n",
        );
        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.status(0), VerificationStatus::Accurate);
        assert!(dataset.status(1).is_unchecked());
        assert_eq!(dataset.records()[1].claimed_state, None);
        assert_eq!(dataset.unchecked_indices(), vec![1]);
    }

    #[test]
    fn test_rejects_short_row() {
        let file = write_temp("1,Springfield,US\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, PersistenceError::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn test_rejects_bad_coordinate() {
        let file = write_temp("1,Springfield,,US,not-a-number,-89.65,IL\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, PersistenceError::MalformedRow { .. }));
    }

    #[test]
    fn test_rejects_unknown_status_tag() {
        let file = write_temp("1,Springfield,,US,39.78,-89.65,IL,sort_of_accurate\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, PersistenceError::MalformedRow { .. }));
    }

    #[test]
    fn test_persist_round_trip() {
        let file = write_temp("1,Springfield,,US,39.78,-89.65,IL\n");
        let mut dataset = load_dataset(file.path()).unwrap();
        dataset.set_status(0, VerificationStatus::StateOnlyMatch);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tagged.csv");
        CheckpointWriter::new(&out).persist(&dataset).unwrap();

        let reloaded = load_dataset(&out).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.status(0), VerificationStatus::StateOnlyMatch);
        assert_eq!(reloaded.records()[0], dataset.records()[0]);
    }

    #[test]
    fn test_persist_overwrites_previous_checkpoint() {
        let file = write_temp("1,Springfield,,US,39.78,-89.65,IL\n");
        let mut dataset = load_dataset(file.path()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tagged.csv");
        let writer = CheckpointWriter::new(&out);

        writer.persist(&dataset).unwrap();
        dataset.set_status(0, VerificationStatus::Accurate);
        writer.persist(&dataset).unwrap();

        let reloaded = load_dataset(&out).unwrap();
        assert_eq!(reloaded.status(0), VerificationStatus::Accurate);
    }
}
