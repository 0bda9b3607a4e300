//! Config-driven field resolution tables.
//!
//! Each canonical property is described by a [`FieldSpec`]: the source
//! property names accepted for it, an optional free-text pattern searched
//! in the combined-use fields, and the diagnostic emitted when nothing is
//! found. The tables are TOML files under `packages/transform/fields/`,
//! baked into the binary with [`include_str!`]. Supporting a new source
//! dialect means adding a synonym to the TOML, not writing code.

use std::sync::LazyLock;

use open_trails_models::{Message, Severity};
use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Segment table, embedded at compile time.
const SEGMENT_FIELDS_TOML: &str = include_str!("../fields/segments.toml");

/// Trailhead table, embedded at compile time.
const TRAILHEAD_FIELDS_TOML: &str = include_str!("../fields/trailheads.toml");

static SEGMENT_FIELDS: LazyLock<FieldTable> = LazyLock::new(|| {
    parse_field_table(SEGMENT_FIELDS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse segments.toml: {e}"))
});

static TRAILHEAD_FIELDS: LazyLock<FieldTable> = LazyLock::new(|| {
    parse_field_table(TRAILHEAD_FIELDS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse trailheads.toml: {e}"))
});

/// Returns the resolution table for trail segments.
///
/// # Panics
///
/// Panics if the embedded `segments.toml` is malformed. The file is a
/// compile-time constant, so this is caught by the tests below.
#[must_use]
pub fn segment_fields() -> &'static FieldTable {
    &SEGMENT_FIELDS
}

/// Returns the resolution table for trailheads.
///
/// # Panics
///
/// Panics if the embedded `trailheads.toml` is malformed.
#[must_use]
pub fn trailhead_fields() -> &'static FieldTable {
    &TRAILHEAD_FIELDS
}

/// Parses a [`FieldTable`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed, a field is missing, or a
/// `pattern` is not a valid regular expression.
pub fn parse_field_table(toml_str: &str) -> Result<FieldTable, toml::de::Error> {
    toml::de::from_str(toml_str)
}

/// Resolution rules for every canonical property of one feature type.
#[derive(Debug, Deserialize)]
pub struct FieldTable {
    /// Free-text "combined use" fields searched by flag patterns, in order.
    #[serde(default)]
    pub use_fields: Vec<String>,
    /// One entry per canonical property.
    pub fields: Vec<FieldSpec>,
}

impl FieldTable {
    /// Looks up the [`FieldSpec`] for a canonical key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Whether `lower_key` is a synonym of some field other than `except`.
    ///
    /// Prefix scans skip such keys, so a `TRAILHEAD` name column is not
    /// mistaken for a trail reference.
    #[must_use]
    pub fn claims(&self, lower_key: &str, except: &str) -> bool {
        self.fields
            .iter()
            .filter(|f| f.key != except)
            .any(|f| f.synonyms.iter().any(|s| s == lower_key))
    }
}

/// How to locate one canonical property.
#[derive(Debug, Deserialize)]
pub struct FieldSpec {
    /// Canonical output key (e.g. `"motor_vehicles"`).
    pub key: String,
    /// What kind of value this is.
    pub kind: FieldKind,
    /// Accepted source names, lower-case, first match wins.
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Key prefixes collected by [`FieldKind::Prefixed`].
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Affirmative vocabulary searched in the combined-use fields.
    pub pattern: Option<UsePattern>,
    /// Diagnostic recorded when the property cannot be located.
    pub missing: MissingField,
}

/// The kind of canonical property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Identifier; synthesized from a counter when absent.
    Id,
    /// Free text copied from the source.
    Text,
    /// `yes` / `no` / null.
    Flag,
    /// Every property whose key starts with one of the prefixes, joined.
    Prefixed,
}

/// Diagnostic for a property that could not be located.
#[derive(Debug, Clone, Deserialize)]
pub struct MissingField {
    /// `warning` or `error`.
    pub severity: Severity,
    /// Machine-readable code, e.g. `"missing-segment-name"`.
    pub code: String,
    /// Human-readable explanation.
    pub text: String,
}

impl MissingField {
    /// Builds the diagnostic message.
    #[must_use]
    pub fn message(&self) -> Message {
        Message::new(self.severity, self.code.clone(), self.text.clone())
    }
}

/// A case-insensitive affirmative-term pattern.
///
/// Compiled once when the table is loaded.
#[derive(Debug, Clone)]
pub struct UsePattern(Regex);

impl UsePattern {
    /// Compiles `pattern` case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("(?i)(?:{pattern})")).map(Self)
    }

    /// The compiled expression.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.0
    }
}

impl<'de> Deserialize<'de> for UsePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Self::new(&pattern).map_err(serde::de::Error::custom)
    }
}
