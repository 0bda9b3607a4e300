//! Field sets checked for each bundle table.

use open_trails_models::Table;
use strum_macros::{AsRefStr, Display};

/// How a single field is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FieldRule {
    /// Must be present and a string.
    RequiredString,
    /// Should be present; a string or null.
    OptionalString,
    /// Must be present; `yes`, `no` or null.
    RequiredBoolean,
    /// Should be present; `yes`, `no` or null.
    OptionalBoolean,
}

impl FieldRule {
    /// Whether a missing field is an error rather than a warning.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::RequiredString | Self::RequiredBoolean)
    }
}

/// Rules for one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    /// Which table this describes.
    pub table: Table,
    /// Geometry types accepted in a `GeoJSON` table; `None` for CSV tables.
    pub geometry_types: Option<&'static [&'static str]>,
    /// Fields in check order.
    pub fields: &'static [(&'static str, FieldRule)],
}

impl TableSchema {
    /// Whether the table is stored as `GeoJSON`.
    #[must_use]
    pub const fn is_geojson(&self) -> bool {
        self.geometry_types.is_some()
    }
}

use FieldRule::{OptionalBoolean, OptionalString, RequiredBoolean, RequiredString};

const TRAIL_SEGMENTS: TableSchema = TableSchema {
    table: Table::TrailSegments,
    geometry_types: Some(&["LineString", "MultiLineString"]),
    fields: &[
        ("id", RequiredString),
        ("steward_id", RequiredString),
        ("osm_tags", OptionalString),
        ("motor_vehicles", OptionalBoolean),
        ("foot", OptionalBoolean),
        ("bicycle", OptionalBoolean),
        ("horse", OptionalBoolean),
        ("ski", OptionalBoolean),
        ("wheelchair", OptionalBoolean),
    ],
};

const NAMED_TRAILS: TableSchema = TableSchema {
    table: Table::NamedTrails,
    geometry_types: None,
    fields: &[
        ("name", RequiredString),
        ("segment_ids", RequiredString),
        ("id", RequiredString),
        ("description", RequiredString),
        ("part_of", OptionalString),
    ],
};

const TRAILHEADS: TableSchema = TableSchema {
    table: Table::Trailheads,
    geometry_types: Some(&["Point"]),
    fields: &[
        ("name", RequiredString),
        ("steward_id", RequiredString),
        ("address", OptionalString),
        ("trail_ids", OptionalString),
        ("segment_ids", OptionalString),
        ("area_id", OptionalString),
        ("osm_tags", OptionalString),
        ("parking", OptionalBoolean),
        ("drinkwater", OptionalBoolean),
        ("restrooms", OptionalBoolean),
        ("kiosk", OptionalBoolean),
    ],
};

const STEWARDS: TableSchema = TableSchema {
    table: Table::Stewards,
    geometry_types: None,
    fields: &[
        ("name", RequiredString),
        ("id", RequiredString),
        ("url", RequiredString),
        ("phone", RequiredString),
        ("address", RequiredString),
        ("license", RequiredString),
        ("publisher", RequiredBoolean),
    ],
};

const AREAS: TableSchema = TableSchema {
    table: Table::Areas,
    geometry_types: Some(&["Polygon", "MultiPolygon"]),
    fields: &[
        ("name", RequiredString),
        ("id", RequiredString),
        ("steward_id", RequiredString),
        ("url", OptionalString),
        ("osm_tags", OptionalString),
    ],
};

/// Returns the schema for `table`.
#[must_use]
pub const fn schema(table: Table) -> &'static TableSchema {
    match table {
        Table::TrailSegments => &TRAIL_SEGMENTS,
        Table::NamedTrails => &NAMED_TRAILS,
        Table::Trailheads => &TRAILHEADS,
        Table::Stewards => &STEWARDS,
        Table::Areas => &AREAS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geojson_tables_match_file_extensions() {
        for &table in Table::all() {
            assert_eq!(
                schema(table).is_geojson(),
                table.file_name().ends_with(".geojson"),
                "{table}"
            );
            assert_eq!(schema(table).table, table);
        }
    }

    #[test]
    fn only_stewards_require_a_boolean() {
        for &table in Table::all() {
            let has_required_boolean = schema(table)
                .fields
                .iter()
                .any(|(_, rule)| *rule == RequiredBoolean);
            assert_eq!(has_required_boolean, table == Table::Stewards);
        }
    }

    #[test]
    fn rule_names() {
        assert_eq!(OptionalBoolean.as_ref(), "optional_boolean");
        assert!(RequiredString.is_required());
        assert!(!OptionalString.is_required());
    }
}
