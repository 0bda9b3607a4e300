#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Maps uploaded trail data onto the `OpenTrails` schema.
//!
//! Uploaded shapefiles arrive (already converted to `GeoJSON`) with
//! whatever attribute names their publisher chose: `TRAILID`, `Trail Name`,
//! `ROADBIKE`, a free-text `USE` column, and so on. The transforms in this
//! crate locate each canonical property through the embedded
//! [`fields`] tables and return a canonical collection together with the
//! diagnostics describing what could not be inferred.
//!
//! Named trails and the steward record, which are derived from the
//! canonical output rather than from the upload, live here too.

pub mod fields;
pub mod mapper;
pub mod named_trails;
pub mod properties;
pub mod resolve;
pub mod segments;
pub mod stewards;
pub mod trailheads;

use geojson::{FeatureCollection, GeoJson};
use open_trails_models::{DEFAULT_AREA_ID, DEFAULT_STEWARD_ID, Message};
use serde::Serialize;
use thiserror::Error;

pub use named_trails::{make_named_trails, write_named_trails_csv};
pub use segments::transform_segments;
pub use stewards::{make_steward, write_stewards_csv};
pub use trailheads::transform_trailheads;

/// Errors that can occur around a transform.
///
/// Field-level problems are never errors; they are reported as
/// [`Message`]s. These variants cover input that is not a feature
/// collection at all and failures writing derived files.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The input is not valid `GeoJSON` (bad JSON, missing `features`,
    /// malformed geometry).
    #[error("GeoJSON parse error: {0}")]
    Geojson(#[from] Box<geojson::Error>),

    /// The input is valid `GeoJSON` but not a `FeatureCollection`.
    #[error("Expected a FeatureCollection, found a {found}")]
    NotFeatureCollection {
        /// The `GeoJSON` object type that was found instead.
        found: &'static str,
    },

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity of the dataset being transformed.
///
/// Every dataset has a single steward and a single area, so the stamped ids
/// default to `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformContext {
    /// Opaque dataset identifier, used for logging.
    pub dataset_id: String,
    /// Stamped into every feature's `steward_id`.
    pub steward_id: String,
    /// Stamped into every trailhead's `area_id`.
    pub area_id: String,
}

impl TransformContext {
    /// Context for `dataset_id` with the default steward and area ids.
    #[must_use]
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            steward_id: DEFAULT_STEWARD_ID.to_string(),
            area_id: DEFAULT_AREA_ID.to_string(),
        }
    }
}

impl Default for TransformContext {
    fn default() -> Self {
        Self::new("unnamed")
    }
}

/// Result of a transform run.
#[derive(Debug, Clone, Serialize)]
pub struct TransformOutput {
    /// De-duplicated diagnostics in first-seen order.
    pub messages: Vec<Message>,
    /// The canonical collection, one feature per input feature.
    pub geojson: FeatureCollection,
}

/// Parses raw `GeoJSON` text into a [`FeatureCollection`].
///
/// This is the structural gate in front of the transforms: anything that
/// is not a well-formed feature collection is rejected here.
///
/// # Errors
///
/// Returns [`TransformError::Geojson`] if the text is not valid `GeoJSON`
/// and [`TransformError::NotFeatureCollection`] if it is a bare feature or
/// geometry.
pub fn parse_feature_collection(geojson_str: &str) -> Result<FeatureCollection, TransformError> {
    let geojson: GeoJson = geojson_str.parse().map_err(Box::new)?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(TransformError::NotFeatureCollection { found: "Feature" }),
        GeoJson::Geometry(_) => Err(TransformError::NotFeatureCollection { found: "Geometry" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_collection() {
        let collection = parse_feature_collection(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"A": 1},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn rejects_missing_features() {
        let err = parse_feature_collection(r#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, TransformError::Geojson(_)));
    }

    #[test]
    fn rejects_malformed_geometry() {
        let err = parse_feature_collection(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": "nope"}}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::Geojson(_)));
    }

    #[test]
    fn rejects_bare_feature() {
        let err = parse_feature_collection(
            r#"{"type": "Feature", "properties": {}, "geometry": null}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TransformError::NotFeatureCollection { found: "Feature" }
        ));
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_feature_collection("PK\u{3}\u{4}").is_err());
    }

    #[test]
    fn default_context_uses_single_steward() {
        let ctx = TransformContext::default();
        assert_eq!(ctx.steward_id, "0");
        assert_eq!(ctx.area_id, "0");
    }
}
