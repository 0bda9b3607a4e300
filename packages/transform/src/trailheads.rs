//! Trailhead transform.

use geojson::FeatureCollection;
use open_trails_models::TrailheadProperties;

use crate::fields::trailhead_fields;
use crate::mapper::transform_collection;
use crate::{TransformContext, TransformOutput};

/// Maps an uploaded trailhead collection onto canonical trailhead
/// properties.
///
/// `trail_ids` is built from every source property whose name starts with
/// `trail` or `segment`, joined with `"; "`.
#[must_use]
pub fn transform_trailheads(raw: &FeatureCollection, ctx: &TransformContext) -> TransformOutput {
    log::debug!(
        "Transforming {} trailhead feature(s) for dataset {}",
        raw.features.len(),
        ctx.dataset_id
    );

    let output = transform_collection(
        raw,
        trailhead_fields(),
        (
            "transformed-trailheads",
            "Every trailhead field was found in the uploaded data.",
        ),
        |resolved| {
            TrailheadProperties {
                id: resolved.id.clone(),
                steward_id: ctx.steward_id.clone(),
                name: resolved.text("name"),
                area_id: ctx.area_id.clone(),
                trail_ids: resolved.text("trail_ids"),
                address: resolved.text("address"),
                parking: resolved.flag("parking"),
                restrooms: resolved.flag("restrooms"),
                kiosk: resolved.flag("kiosk"),
                drinkwater: resolved.flag("drinkwater"),
                osm_tags: None,
            }
            .to_json_object()
        },
    );

    log::info!(
        "Transformed {} trailhead(s) for dataset {} with {} message(s)",
        output.geojson.features.len(),
        ctx.dataset_id,
        output.messages.len()
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use open_trails_models::{Severity, YesNo};
    use serde_json::{Value, json};

    fn collection(properties: &[Value]) -> FeatureCollection {
        let features: Vec<Value> = properties
            .iter()
            .map(|props| {
                json!({
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-98.49, 29.42]},
                    "properties": props,
                })
            })
            .collect();
        crate::parse_feature_collection(
            &json!({"type": "FeatureCollection", "features": features}).to_string(),
        )
        .unwrap()
    }

    fn props(output: &TransformOutput, i: usize) -> TrailheadProperties {
        let map = output.geojson.features[i].properties.clone().unwrap();
        serde_json::from_value(Value::Object(map)).unwrap()
    }

    #[test]
    fn maps_san_antonio_style_properties() {
        let raw = collection(&[json!({
            "Name": "Hardberger Park",
            "Trail1": "Salado Creek",
            "TRAIL2": "Leon Creek",
            "Parking": "Y",
            "Restroom": "N",
            "ADDRESS": "8400 NW Military Hwy",
        })]);
        let output = transform_trailheads(&raw, &TransformContext::default());

        assert_eq!(
            props(&output, 0),
            TrailheadProperties {
                id: "1".to_string(),
                steward_id: "0".to_string(),
                name: Some("Hardberger Park".to_string()),
                area_id: "0".to_string(),
                trail_ids: Some("Salado Creek; Leon Creek".to_string()),
                address: Some("8400 NW Military Hwy".to_string()),
                parking: Some(YesNo::Yes),
                restrooms: Some(YesNo::No),
                kiosk: None,
                drinkwater: None,
                osm_tags: None,
            }
        );

        let codes: Vec<(Severity, &str)> = output
            .messages
            .iter()
            .map(|m| (m.severity, m.code.as_str()))
            .collect();
        assert_eq!(
            codes,
            vec![
                (Severity::Warning, "missing-trailhead-id"),
                (Severity::Warning, "missing-trailhead-kiosk"),
                (Severity::Warning, "missing-trailhead-drinkwater"),
            ]
        );
    }

    #[test]
    fn reports_missing_names_and_trails() {
        let raw = collection(&[json!({"FID": 3}), json!({"FID": 4})]);
        let output = transform_trailheads(&raw, &TransformContext::default());

        assert_eq!(props(&output, 0).id, "1");
        assert_eq!(props(&output, 1).id, "2");
        assert_eq!(props(&output, 1).trail_ids, None);
        assert!(output.messages.iter().any(|m| m.severity == Severity::Error
            && m.code == "missing-trailhead-name"));
        assert_eq!(
            output
                .messages
                .iter()
                .filter(|m| m.code == "missing-trailhead-trail-ids")
                .count(),
            1
        );
    }

    #[test]
    fn trailhead_name_and_id_columns_stay_out_of_trail_ids() {
        let raw = collection(&[json!({
            "TrailheadID": 12,
            "TRAILHEAD": "North Lot",
            "TRAIL1": "A",
        })]);
        let output = transform_trailheads(&raw, &TransformContext::default());
        let first = props(&output, 0);

        assert_eq!(first.id, "12");
        assert_eq!(first.name.as_deref(), Some("North Lot"));
        assert_eq!(first.trail_ids.as_deref(), Some("A"));
    }

    #[test]
    fn stamps_context_ids() {
        let raw = collection(&[json!({"name": "Lot"})]);
        let ctx = TransformContext {
            dataset_id: "ggnra".to_string(),
            steward_id: "7".to_string(),
            area_id: "9".to_string(),
        };
        let output = transform_trailheads(&raw, &ctx);
        let first = props(&output, 0);
        assert_eq!(first.steward_id, "7");
        assert_eq!(first.area_id, "9");
    }
}
