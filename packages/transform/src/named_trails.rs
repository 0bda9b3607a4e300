//! Named trails: canonical segments grouped by name.

use std::collections::BTreeMap;
use std::io::Write;

use geojson::FeatureCollection;
use open_trails_models::NamedTrail;

use crate::TransformError;
use crate::resolve::{encode_list, value_to_text};

/// Column order of `named_trails.csv`.
pub const NAMED_TRAILS_HEADER: &[&str] = &["id", "name", "segment_ids", "description", "part_of"];

/// Groups canonical segments sharing an identical `name` into named trails.
///
/// Grouping is exact and case-sensitive; segments without a name are left
/// out. Trails are numbered from `"1"` in order of first appearance.
#[must_use]
pub fn make_named_trails(segments: &FeatureCollection) -> Vec<NamedTrail> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();

    for properties in segments.features.iter().filter_map(|f| f.properties.as_ref()) {
        let Some(name) = properties
            .get("name")
            .and_then(serde_json::Value::as_str)
            .filter(|name| !name.is_empty())
        else {
            continue;
        };
        let id = properties
            .get("id")
            .and_then(value_to_text)
            .unwrap_or_default();

        if let Some(&position) = positions.get(name) {
            groups[position].1.push(id);
        } else {
            positions.insert(name.to_string(), groups.len());
            groups.push((name.to_string(), vec![id]));
        }
    }

    log::debug!(
        "Grouped {} segment(s) into {} named trail(s)",
        segments.features.len(),
        groups.len()
    );

    groups
        .into_iter()
        .enumerate()
        .map(|(i, (name, ids))| NamedTrail {
            id: (i + 1).to_string(),
            name,
            segment_ids: encode_list(&ids),
            description: None,
            part_of: None,
        })
        .collect()
}

/// Writes `named_trails.csv`. The header row is always written.
///
/// # Errors
///
/// Returns [`TransformError::Csv`] if writing fails.
pub fn write_named_trails_csv<W: Write>(
    writer: W,
    trails: &[NamedTrail],
) -> Result<(), TransformError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(NAMED_TRAILS_HEADER)?;
    for trail in trails {
        csv_writer.serialize(trail)?;
    }
    csv_writer.flush()?;

    Ok(())
}
