//! Structural checks: is the file a well-formed feature collection or CSV
//! table at all?
//!
//! Both checks turn the raw bytes into a list of property rows so that the
//! field checks in [`crate::fields`] can treat `GeoJSON` and CSV tables the
//! same way.

use open_trails_models::JsonObject;
use serde_json::Value;
use thiserror::Error;

/// Why a geometry's coordinates do not form a shape.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// Rejected by the `GeoJSON` reader.
    #[error("{0}")]
    Geojson(#[from] Box<geojson::Error>),

    /// A line with fewer than two positions.
    #[error("a line needs at least 2 positions, found {0}")]
    ShortLine(usize),

    /// A polygon ring with fewer than four positions.
    #[error("a polygon ring needs at least 4 positions, found {0}")]
    ShortRing(usize),

    /// A polygon ring whose last position differs from its first.
    #[error("a polygon ring is not closed")]
    OpenRing,
}

/// Why a file failed its structural check.
#[derive(Debug, Error)]
pub enum StructureError {
    /// Not valid JSON.
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level object is not a `FeatureCollection`.
    #[error("top-level type is not \"FeatureCollection\"")]
    NotFeatureCollection,

    /// `features` is missing or not an array.
    #[error("\"features\" is not a list")]
    FeaturesNotList,

    /// A feature whose `type` is not `"Feature"`.
    #[error("feature {index} does not have type \"Feature\"")]
    NotFeature {
        /// Position in `features`.
        index: usize,
    },

    /// A feature whose `properties` is not an object.
    #[error("feature {index} properties are not a mapping")]
    BadProperties {
        /// Position in `features`.
        index: usize,
    },

    /// A feature whose `geometry` is not an object.
    #[error("feature {index} geometry is not a mapping")]
    BadGeometry {
        /// Position in `features`.
        index: usize,
    },

    /// A geometry type not allowed in this table.
    #[error("feature {index} has {found} geometry, expected one of {}", .allowed.join(", "))]
    GeometryType {
        /// Position in `features`.
        index: usize,
        /// The geometry type found.
        found: String,
        /// The geometry types this table accepts.
        allowed: &'static [&'static str],
    },

    /// Geometry coordinates that do not form a valid shape.
    #[error("feature {index} has unrecognizable geometry: {source}")]
    UnrecognizableGeometry {
        /// Position in `features`.
        index: usize,
        /// Why the shape could not be built.
        source: ShapeError,
    },

    /// No header row.
    #[error("missing header row")]
    MissingHeader,

    /// A row with more cells than the header has columns.
    #[error("row {row} has {found} cells but the header has {expected} columns")]
    ExtraCells {
        /// 1-based data row number.
        row: usize,
        /// Cells in the row.
        found: usize,
        /// Columns in the header.
        expected: usize,
    },

    /// Malformed CSV (bad quoting, invalid UTF-8).
    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// Checks that `bytes` hold a `FeatureCollection` whose features all carry
/// properties and an allowed, well-formed geometry.
///
/// Returns each feature's properties in order.
///
/// # Errors
///
/// Returns the first [`StructureError`] encountered.
pub fn geojson_rows(
    bytes: &[u8],
    allowed: &'static [&'static str],
) -> Result<Vec<JsonObject>, StructureError> {
    let document: Value = serde_json::from_slice(bytes)?;

    if document.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(StructureError::NotFeatureCollection);
    }

    let features = document
        .get("features")
        .and_then(Value::as_array)
        .ok_or(StructureError::FeaturesNotList)?;

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| feature_properties(index, feature, allowed))
        .collect()
}

fn feature_properties(
    index: usize,
    feature: &Value,
    allowed: &'static [&'static str],
) -> Result<JsonObject, StructureError> {
    if feature.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err(StructureError::NotFeature { index });
    }

    let properties = feature
        .get("properties")
        .and_then(Value::as_object)
        .ok_or(StructureError::BadProperties { index })?;

    let geometry = feature
        .get("geometry")
        .filter(|g| g.is_object())
        .ok_or(StructureError::BadGeometry { index })?;

    let found = geometry
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !allowed.contains(&found) {
        return Err(StructureError::GeometryType {
            index,
            found: found.to_string(),
            allowed,
        });
    }

    build_shape(geometry)
        .map_err(|source| StructureError::UnrecognizableGeometry { index, source })?;

    Ok(properties.clone())
}

/// Builds a [`geo::Geometry`] from a `GeoJSON` geometry object.
///
/// Position counts and ring closure are checked first, since `geo` closes
/// open rings and accepts degenerate lines without complaint.
fn build_shape(geometry: &Value) -> Result<geo::Geometry<f64>, ShapeError> {
    let geometry = geojson::Geometry::from_json_value(geometry.clone()).map_err(Box::new)?;
    check_shape(&geometry.value)?;
    Ok(geometry.try_into().map_err(Box::new)?)
}

fn check_shape(value: &geojson::Value) -> Result<(), ShapeError> {
    use geojson::Value as Shape;

    match value {
        Shape::Point(_) | Shape::MultiPoint(_) => Ok(()),
        Shape::LineString(line) => check_line(line),
        Shape::MultiLineString(lines) => lines.iter().try_for_each(|line| check_line(line)),
        Shape::Polygon(rings) => rings.iter().try_for_each(|ring| check_ring(ring)),
        Shape::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .try_for_each(|ring| check_ring(ring)),
        Shape::GeometryCollection(geometries) => geometries
            .iter()
            .try_for_each(|geometry| check_shape(&geometry.value)),
    }
}

fn check_line<P>(positions: &[P]) -> Result<(), ShapeError> {
    if positions.len() < 2 {
        return Err(ShapeError::ShortLine(positions.len()));
    }
    Ok(())
}

fn check_ring<P: PartialEq>(positions: &[P]) -> Result<(), ShapeError> {
    if positions.len() < 4 {
        return Err(ShapeError::ShortRing(positions.len()));
    }
    if positions.first() != positions.last() {
        return Err(ShapeError::OpenRing);
    }
    Ok(())
}

/// Checks that `bytes` hold a CSV table with a header row and no row wider
/// than the header.
///
/// Each row becomes an object keyed by header with string values. A row
/// shorter than the header leaves the trailing columns absent.
///
/// # Errors
///
/// Returns [`StructureError::MissingHeader`] for an empty file,
/// [`StructureError::ExtraCells`] for an over-long row and
/// [`StructureError::Csv`] for anything the CSV reader rejects.
pub fn csv_rows(bytes: &[u8]) -> Result<Vec<JsonObject>, StructureError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(StructureError::MissingHeader);
    }

    reader
        .records()
        .enumerate()
        .map(|(i, record)| {
            let record = record?;
            if record.len() > headers.len() {
                return Err(StructureError::ExtraCells {
                    row: i + 1,
                    found: record.len(),
                    expected: headers.len(),
                });
            }
            Ok(headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), Value::String(value.to_string())))
                .collect())
        })
        .collect()
}
