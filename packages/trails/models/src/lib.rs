#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `OpenTrails` canonical schema types.
//!
//! Every uploaded trail dataset is normalized into these shapes: trail
//! segments and trailheads as `GeoJSON` feature properties, named trails
//! and stewards as CSV rows. The five tables travel together in a bundle
//! with fixed file names (see [`Table`] and [`BundlePaths`]).

pub mod messages;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

pub use messages::{Message, MessageLog, Severity};

/// `GeoJSON` property dictionary (insertion ordered).
pub type JsonObject = serde_json::Map<String, Value>;

/// The id of the single steward created for every dataset.
pub const DEFAULT_STEWARD_ID: &str = "0";

/// The id of the single area created for every dataset.
pub const DEFAULT_AREA_ID: &str = "0";

/// A boolean-coded `OpenTrails` value.
///
/// Unknown values are represented as `Option::<YesNo>::None` and serialize
/// as `null`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum YesNo {
    /// Allowed / present.
    Yes,
    /// Not allowed / absent.
    No,
}

impl YesNo {
    /// Interprets the loose spellings found in source data: `y`/`yes` and
    /// `n`/`no`, in any case. Anything else is `None`.
    #[must_use]
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "y" | "yes" => Some(Self::Yes),
            "n" | "no" => Some(Self::No),
            _ => None,
        }
    }
}

impl From<YesNo> for Value {
    fn from(value: YesNo) -> Self {
        Self::String(value.as_ref().to_string())
    }
}

/// Properties of a canonical trail segment feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentProperties {
    /// Segment id, discovered in the source or synthesized.
    pub id: String,
    /// Always [`DEFAULT_STEWARD_ID`].
    pub steward_id: String,
    /// Trail name, if one could be found.
    pub name: Option<String>,
    /// Motorized use.
    pub motor_vehicles: Option<YesNo>,
    /// Hiking / walking.
    pub foot: Option<YesNo>,
    /// Bicycles.
    pub bicycle: Option<YesNo>,
    /// Equestrian use.
    pub horse: Option<YesNo>,
    /// Skiing.
    pub ski: Option<YesNo>,
    /// Wheelchair accessible.
    pub wheelchair: Option<YesNo>,
    /// Reserved; always `None` after transformation.
    pub osm_tags: Option<String>,
}

impl SegmentProperties {
    /// Output keys, in the order they are written.
    pub const KEYS: &'static [&'static str] = &[
        "id",
        "steward_id",
        "name",
        "motor_vehicles",
        "foot",
        "bicycle",
        "horse",
        "ski",
        "wheelchair",
        "osm_tags",
    ];

    /// Renders these properties as a `GeoJSON` property dictionary.
    #[must_use]
    pub fn to_json_object(&self) -> JsonObject {
        let mut map = JsonObject::new();
        map.insert("id".to_string(), Value::from(self.id.clone()));
        map.insert("steward_id".to_string(), Value::from(self.steward_id.clone()));
        map.insert("name".to_string(), Value::from(self.name.clone()));
        map.insert("motor_vehicles".to_string(), Value::from(self.motor_vehicles));
        map.insert("foot".to_string(), Value::from(self.foot));
        map.insert("bicycle".to_string(), Value::from(self.bicycle));
        map.insert("horse".to_string(), Value::from(self.horse));
        map.insert("ski".to_string(), Value::from(self.ski));
        map.insert("wheelchair".to_string(), Value::from(self.wheelchair));
        map.insert("osm_tags".to_string(), Value::from(self.osm_tags.clone()));
        map
    }
}

/// Properties of a canonical trailhead feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailheadProperties {
    /// Trailhead id, discovered in the source or synthesized.
    pub id: String,
    /// Always [`DEFAULT_STEWARD_ID`].
    pub steward_id: String,
    /// Trailhead name, if one could be found.
    pub name: Option<String>,
    /// Always [`DEFAULT_AREA_ID`].
    pub area_id: String,
    /// `"; "`-joined ids of the trails or segments served by the trailhead.
    pub trail_ids: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Parking available.
    pub parking: Option<YesNo>,
    /// Restrooms available.
    pub restrooms: Option<YesNo>,
    /// Information kiosk present.
    pub kiosk: Option<YesNo>,
    /// Drinking water available.
    pub drinkwater: Option<YesNo>,
    /// Reserved; always `None` after transformation.
    pub osm_tags: Option<String>,
}

impl TrailheadProperties {
    /// Output keys, in the order they are written.
    pub const KEYS: &'static [&'static str] = &[
        "id",
        "steward_id",
        "name",
        "area_id",
        "trail_ids",
        "address",
        "parking",
        "restrooms",
        "kiosk",
        "drinkwater",
        "osm_tags",
    ];

    /// Renders these properties as a `GeoJSON` property dictionary.
    #[must_use]
    pub fn to_json_object(&self) -> JsonObject {
        let mut map = JsonObject::new();
        map.insert("id".to_string(), Value::from(self.id.clone()));
        map.insert("steward_id".to_string(), Value::from(self.steward_id.clone()));
        map.insert("name".to_string(), Value::from(self.name.clone()));
        map.insert("area_id".to_string(), Value::from(self.area_id.clone()));
        map.insert("trail_ids".to_string(), Value::from(self.trail_ids.clone()));
        map.insert("address".to_string(), Value::from(self.address.clone()));
        map.insert("parking".to_string(), Value::from(self.parking));
        map.insert("restrooms".to_string(), Value::from(self.restrooms));
        map.insert("kiosk".to_string(), Value::from(self.kiosk));
        map.insert("drinkwater".to_string(), Value::from(self.drinkwater));
        map.insert("osm_tags".to_string(), Value::from(self.osm_tags.clone()));
        map
    }
}

/// A named trail: every segment sharing one exact `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTrail {
    /// Sequential id starting at `"1"`.
    pub id: String,
    /// The shared segment name.
    pub name: String,
    /// `"; "`-joined segment ids.
    pub segment_ids: String,
    /// Free-text description (not inferred).
    pub description: Option<String>,
    /// Parent trail system (not inferred).
    pub part_of: Option<String>,
}

/// The organization responsible for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steward {
    /// Organization name.
    pub name: String,
    /// Steward id referenced by every feature's `steward_id`.
    pub id: String,
    /// Organization website.
    pub url: String,
    /// Contact phone number.
    pub phone: String,
    /// Mailing address.
    pub address: String,
    /// Whether the steward publishes the data itself.
    pub publisher: YesNo,
    /// License the data is released under.
    pub license: String,
}

/// One of the five tables in an `OpenTrails` bundle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Table {
    /// `trail_segments.geojson`
    TrailSegments,
    /// `named_trails.csv`
    NamedTrails,
    /// `trailheads.geojson`
    Trailheads,
    /// `stewards.csv`
    Stewards,
    /// `areas.geojson` (optional)
    Areas,
}

impl Table {
    /// Returns all tables in bundle order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TrailSegments,
            Self::NamedTrails,
            Self::Trailheads,
            Self::Stewards,
            Self::Areas,
        ]
    }

    /// The fixed file name of this table inside a bundle.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::TrailSegments => "trail_segments.geojson",
            Self::NamedTrails => "named_trails.csv",
            Self::Trailheads => "trailheads.geojson",
            Self::Stewards => "stewards.csv",
            Self::Areas => "areas.geojson",
        }
    }

    /// Human-readable name used in diagnostic text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TrailSegments => "trail segments",
            Self::NamedTrails => "named trails",
            Self::Trailheads => "trailheads",
            Self::Stewards => "stewards",
            Self::Areas => "areas",
        }
    }

    /// Whether a bundle must contain this table.
    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Areas)
    }

    /// Finds the table whose file name is `name`.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.file_name() == name)
    }
}

/// Locations of the five bundle files on local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    /// `trail_segments.geojson`
    pub trail_segments: PathBuf,
    /// `named_trails.csv`
    pub named_trails: PathBuf,
    /// `trailheads.geojson`
    pub trailheads: PathBuf,
    /// `stewards.csv`
    pub stewards: PathBuf,
    /// `areas.geojson`
    pub areas: PathBuf,
}

impl BundlePaths {
    /// The fixed bundle paths inside `dir`. The files need not exist.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            trail_segments: dir.join(Table::TrailSegments.file_name()),
            named_trails: dir.join(Table::NamedTrails.file_name()),
            trailheads: dir.join(Table::Trailheads.file_name()),
            stewards: dir.join(Table::Stewards.file_name()),
            areas: dir.join(Table::Areas.file_name()),
        }
    }

    /// The path of `table`.
    #[must_use]
    pub fn get(&self, table: Table) -> &Path {
        match table {
            Table::TrailSegments => &self.trail_segments,
            Table::NamedTrails => &self.named_trails,
            Table::Trailheads => &self.trailheads,
            Table::Stewards => &self.stewards,
            Table::Areas => &self.areas,
        }
    }
}
