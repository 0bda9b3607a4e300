//! Trail segment transform.

use geojson::FeatureCollection;
use open_trails_models::SegmentProperties;

use crate::fields::segment_fields;
use crate::mapper::transform_collection;
use crate::{TransformContext, TransformOutput};

/// Maps an uploaded segment collection onto canonical segment properties.
///
/// Every output feature has every [`SegmentProperties`] key. Fields that
/// cannot be located are null and reported once each in the returned
/// messages; missing ids are synthesized as `"1"`, `"2"`, ...
#[must_use]
pub fn transform_segments(raw: &FeatureCollection, ctx: &TransformContext) -> TransformOutput {
    log::debug!(
        "Transforming {} segment feature(s) for dataset {}",
        raw.features.len(),
        ctx.dataset_id
    );

    let output = transform_collection(
        raw,
        segment_fields(),
        (
            "transformed-segments",
            "Every segment field was found in the uploaded data.",
        ),
        |resolved| {
            SegmentProperties {
                id: resolved.id.clone(),
                steward_id: ctx.steward_id.clone(),
                name: resolved.text("name"),
                motor_vehicles: resolved.flag("motor_vehicles"),
                foot: resolved.flag("foot"),
                bicycle: resolved.flag("bicycle"),
                horse: resolved.flag("horse"),
                ski: resolved.flag("ski"),
                wheelchair: resolved.flag("wheelchair"),
                osm_tags: None,
            }
            .to_json_object()
        },
    );

    log::info!(
        "Transformed {} segment(s) for dataset {} with {} message(s)",
        output.geojson.features.len(),
        ctx.dataset_id,
        output.messages.len()
    );

    output
}
