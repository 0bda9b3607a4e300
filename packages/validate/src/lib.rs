#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Conformance checks for an `OpenTrails` bundle.
//!
//! A bundle is the five fixed-name files extracted from an uploaded
//! archive. Each file is checked independently:
//!
//! 1. **Presence.** A missing required file is an error; a missing
//!    `areas.geojson` is only a warning.
//! 2. **Structure.** The file must be a well-formed feature collection
//!    (with allowed, constructible geometry) or CSV table. A failure is one
//!    error and skips the field checks for that file.
//! 3. **Fields.** Every feature or row is checked against the table's
//!    [`schema::schema`]. A file whose field checks add no messages gets a
//!    `valid-file-<table>` success message.
//!
//! The bundle passes if and only if no error was recorded.

pub mod fields;
pub mod schema;
pub mod structure;

use std::path::Path;

use open_trails_models::{BundlePaths, Message, MessageLog, Table};
use serde::Serialize;
use thiserror::Error;

use crate::fields::check_rows;
use crate::schema::schema;
use crate::structure::{csv_rows, geojson_rows};

pub use structure::{ShapeError, StructureError};

/// Errors that stop a validation run.
///
/// Data problems are never errors here; they are reported in the
/// [`ValidationReport`].
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A bundle file exists but could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Outcome of validating a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// De-duplicated diagnostics in first-seen order.
    pub messages: Vec<Message>,
    /// `false` if and only if `messages` contains an error.
    pub passed: bool,
}

impl ValidationReport {
    fn from_log(log: MessageLog) -> Self {
        let messages = log.into_deduped();
        let passed = !messages.iter().any(Message::is_error);
        Self { messages, passed }
    }
}

/// Validates the five bundle files at the given paths.
///
/// # Errors
///
/// Returns [`ValidateError::Io`] if a file exists but cannot be read.
pub fn check_open_trails(
    trail_segments: &Path,
    named_trails: &Path,
    trailheads: &Path,
    stewards: &Path,
    areas: &Path,
) -> Result<ValidationReport, ValidateError> {
    check_bundle(&BundlePaths {
        trail_segments: trail_segments.to_path_buf(),
        named_trails: named_trails.to_path_buf(),
        trailheads: trailheads.to_path_buf(),
        stewards: stewards.to_path_buf(),
        areas: areas.to_path_buf(),
    })
}

/// Validates a bundle.
///
/// # Errors
///
/// Returns [`ValidateError::Io`] if a file exists but cannot be read.
pub fn check_bundle(paths: &BundlePaths) -> Result<ValidationReport, ValidateError> {
    let mut log = MessageLog::new();

    for &table in Table::all() {
        check_table(table, paths.get(table), &mut log)?;
    }

    let report = ValidationReport::from_log(log);

    log::info!(
        "Validated bundle: {} message(s), {}",
        report.messages.len(),
        if report.passed { "passed" } else { "failed" }
    );

    Ok(report)
}

fn check_table(table: Table, path: &Path, log: &mut MessageLog) -> Result<(), ValidateError> {
    let file_name = table.file_name();

    if !path.is_file() {
        log::debug!("{table}: {} not found", path.display());
        if table.is_required() {
            log.error(
                format!("missing-file-{table}"),
                format!("Could not find required file {file_name}."),
            );
        } else {
            log.warning(
                format!("missing-file-{table}"),
                format!("Could not find optional file {file_name}."),
            );
        }
        return Ok(());
    }

    let bytes = std::fs::read(path).map_err(|source| ValidateError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let schema = schema(table);
    let (rows, incorrect_code) = match schema.geometry_types {
        Some(allowed) => (geojson_rows(&bytes, allowed), "incorrect-geojson-file"),
        None => (csv_rows(&bytes), "incorrect-csv-file"),
    };

    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => {
            log::debug!("{table}: structural check failed: {e}");
            log.error(incorrect_code, format!("Could not read {file_name}: {e}."));
            return Ok(());
        }
    };

    log::debug!("{table}: checking {} row(s)", rows.len());

    let before = log.len();
    check_rows(schema, &rows, log);

    if log.len() == before {
        log.success(
            format!("valid-file-{table}"),
            format!("Every {} field in {file_name} is valid.", table.label()),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use open_trails_models::Severity;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    fn fresh_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        tmp
    }

    fn write_segments(dir: &Path) {
        let collection = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "id": "1", "steward_id": "0", "name": "Ridge Trail",
                    "motor_vehicles": "no", "foot": "yes", "bicycle": "no",
                    "horse": null, "ski": null, "wheelchair": null, "osm_tags": null,
                },
                "geometry": {"type": "LineString", "coordinates": [[-122.25, 37.80], [-122.26, 37.81]]},
            }],
        });
        fs::write(dir.join("trail_segments.geojson"), collection.to_string()).unwrap();
    }

    fn write_trailheads(dir: &Path) {
        let collection = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "id": "1", "steward_id": "0", "name": "North Lot", "area_id": "0",
                    "trail_ids": "1", "segment_ids": null, "address": null,
                    "parking": "yes", "restrooms": "no", "kiosk": null, "drinkwater": null,
                    "osm_tags": null,
                },
                "geometry": {"type": "Point", "coordinates": [-122.25, 37.80]},
            }],
        });
        fs::write(dir.join("trailheads.geojson"), collection.to_string()).unwrap();
    }

    fn write_named_trails(dir: &Path) {
        fs::write(
            dir.join("named_trails.csv"),
            "id,name,segment_ids,description,part_of\n1,Ridge Trail,1,,\n",
        )
        .unwrap();
    }

    fn write_stewards(dir: &Path, header: &str, row: &str) {
        fs::write(dir.join("stewards.csv"), format!("{header}\n{row}\n")).unwrap();
    }

    fn write_complete_bundle(dir: &Path) {
        write_segments(dir);
        write_trailheads(dir);
        write_named_trails(dir);
        write_stewards(
            dir,
            "name,id,url,phone,address,publisher,license",
            "East Bay,0,https://example.org,555-0100,1 Main St,yes,CC0",
        );
    }

    fn codes(report: &ValidationReport) -> Vec<&str> {
        report.messages.iter().map(|m| m.code.as_str()).collect()
    }

    #[test]
    fn complete_bundle_passes() {
        let tmp = fresh_dir("open_trails_validate_complete");
        write_complete_bundle(&tmp);

        let report = check_bundle(&BundlePaths::in_dir(&tmp)).unwrap();
        assert!(report.passed, "{:?}", report.messages);
        assert_eq!(
            codes(&report),
            vec![
                "valid-file-trail-segments",
                "valid-file-named-trails",
                "valid-file-trailheads",
                "valid-file-stewards",
                "missing-file-areas",
            ]
        );
        assert_eq!(
            report.messages[4],
            Message::warning(
                "missing-file-areas",
                "Could not find optional file areas.geojson."
            )
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_trailheads_fails() {
        let tmp = fresh_dir("open_trails_validate_missing_trailheads");
        write_complete_bundle(&tmp);
        fs::remove_file(tmp.join("trailheads.geojson")).unwrap();

        let paths = BundlePaths::in_dir(&tmp);
        let report = check_open_trails(
            &paths.trail_segments,
            &paths.named_trails,
            &paths.trailheads,
            &paths.stewards,
            &paths.areas,
        )
        .unwrap();

        assert!(!report.passed);
        assert!(report.messages.contains(&Message::error(
            "missing-file-trailheads",
            "Could not find required file trailheads.geojson."
        )));
        // Sibling files are still checked.
        assert!(codes(&report).contains(&"valid-file-stewards"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn steward_without_license_fails() {
        let tmp = fresh_dir("open_trails_validate_no_license");
        write_complete_bundle(&tmp);
        write_stewards(
            &tmp,
            "name,id,url,phone,address,publisher",
            "East Bay,0,https://example.org,555-0100,1 Main St,yes",
        );

        let report = check_bundle(&BundlePaths::in_dir(&tmp)).unwrap();
        assert!(!report.passed);
        assert!(report.messages.contains(&Message::error(
            "bad-data-stewards",
            "Required stewards field \"license\" is missing."
        )));
        assert!(!codes(&report).contains(&"valid-file-stewards"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_geojson_skips_field_checks() {
        let tmp = fresh_dir("open_trails_validate_bad_geojson");
        write_complete_bundle(&tmp);
        fs::write(tmp.join("trail_segments.geojson"), "not json").unwrap();

        let report = check_bundle(&BundlePaths::in_dir(&tmp)).unwrap();
        assert!(!report.passed);
        let segment_codes: Vec<&str> = codes(&report)
            .into_iter()
            .filter(|c| c.contains("trail-segments") || c.contains("geojson"))
            .collect();
        assert_eq!(segment_codes, vec!["incorrect-geojson-file"]);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn wrong_geometry_is_incorrect_file() {
        let tmp = fresh_dir("open_trails_validate_wrong_geometry");
        write_complete_bundle(&tmp);
        // Segments where trailheads belong.
        fs::copy(tmp.join("trail_segments.geojson"), tmp.join("trailheads.geojson")).unwrap();

        let report = check_bundle(&BundlePaths::in_dir(&tmp)).unwrap();
        assert!(!report.passed);
        let message = report
            .messages
            .iter()
            .find(|m| m.code == "incorrect-geojson-file")
            .unwrap();
        assert!(message.text.starts_with("Could not read trailheads.geojson"));
        assert!(message.text.contains("LineString"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ragged_csv_is_incorrect_file() {
        let tmp = fresh_dir("open_trails_validate_ragged_csv");
        write_complete_bundle(&tmp);
        fs::write(tmp.join("named_trails.csv"), "id,name\n1,Ridge,extra\n").unwrap();

        let report = check_bundle(&BundlePaths::in_dir(&tmp)).unwrap();
        assert!(codes(&report).contains(&"incorrect-csv-file"));
        assert!(!report.passed);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn warnings_alone_still_pass() {
        let tmp = fresh_dir("open_trails_validate_warnings");
        write_complete_bundle(&tmp);
        fs::write(
            tmp.join("named_trails.csv"),
            "id,name,segment_ids,description\n1,Ridge Trail,1,\n",
        )
        .unwrap();

        let report = check_bundle(&BundlePaths::in_dir(&tmp)).unwrap();
        assert!(report.passed);
        assert!(
            report
                .messages
                .iter()
                .any(|m| m.severity == Severity::Warning && m.code == "missing-data-named-trails")
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn passed_matches_error_presence() {
        let tmp = fresh_dir("open_trails_validate_consistency");
        let report = check_bundle(&BundlePaths::in_dir(&tmp)).unwrap();
        assert_eq!(
            report.passed,
            !report.messages.iter().any(|m| m.severity == Severity::Error)
        );
        assert_eq!(report.messages.len(), 5);
        assert!(!report.passed);

        let _ = fs::remove_dir_all(&tmp);
    }
}
