//! Per-row field checks.

use open_trails_models::{JsonObject, MessageLog, Table};
use serde_json::Value;

use crate::schema::{FieldRule, TableSchema};

/// Checks every row of a structurally valid table against its schema.
///
/// Problems are recorded in `log`; nothing here is fatal.
/// CSV tables have no null, so an empty cell stands in for one there; a
/// `GeoJSON` property must be an actual `null`.
pub fn check_rows(schema: &TableSchema, rows: &[JsonObject], log: &mut MessageLog) {
    let empty_is_null = !schema.is_geojson();
    for row in rows {
        for &(field, rule) in schema.fields {
            check_field(schema.table, field, rule, row.get(field), empty_is_null, log);
        }
    }
}

fn check_field(
    table: Table,
    field: &str,
    rule: FieldRule,
    value: Option<&Value>,
    empty_is_null: bool,
    log: &mut MessageLog,
) {
    let label = table.label();
    let bad_data = format!("bad-data-{table}");

    let Some(value) = value else {
        if rule.is_required() {
            log.error(
                bad_data,
                format!("Required {label} field \"{field}\" is missing."),
            );
        } else {
            log.warning(
                format!("missing-data-{table}"),
                format!("Optional {label} field \"{field}\" is missing."),
            );
        }
        return;
    };

    let problem = match rule {
        FieldRule::RequiredString if !value.is_string() => "should be a string",
        FieldRule::OptionalString if !(value.is_string() || value.is_null()) => {
            "should be a string or null"
        }
        FieldRule::RequiredBoolean | FieldRule::OptionalBoolean
            if !is_yes_no_or_null(value, empty_is_null) =>
        {
            "should be \"yes\", \"no\" or null"
        }
        _ => return,
    };

    let kind = if rule.is_required() { "Required" } else { "Optional" };
    log.error(bad_data, format!("{kind} {label} field \"{field}\" {problem}."));
}

/// `yes`, `no` (any case), null, or an empty string when `empty_is_null`.
fn is_yes_no_or_null(value: &Value, empty_is_null: bool) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) if s.is_empty() => empty_is_null,
        Value::String(s) => s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("no"),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::schema;
    use open_trails_models::{Message, Severity};
    use serde_json::json;

    fn row(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn check(table: Table, value: Value) -> Vec<Message> {
        let mut log = MessageLog::new();
        check_rows(schema(table), &[row(value)], &mut log);
        log.into_deduped()
    }

    fn steward() -> Value {
        json!({
            "name": "East Bay Regional Park District",
            "id": "0",
            "url": "https://www.ebparks.org",
            "phone": "888-327-2757",
            "address": "2950 Peralta Oaks Court, Oakland CA",
            "publisher": "yes",
            "license": "CC0",
        })
    }

    #[test]
    fn complete_steward_has_no_messages() {
        assert!(check(Table::Stewards, steward()).is_empty());
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let mut value = steward();
        value.as_object_mut().unwrap().remove("license");
        assert_eq!(
            check(Table::Stewards, value),
            vec![Message::error(
                "bad-data-stewards",
                "Required stewards field \"license\" is missing."
            )]
        );
    }

    #[test]
    fn publisher_must_be_yes_or_no() {
        let mut value = steward();
        value["publisher"] = json!("YES");
        assert!(check(Table::Stewards, value.clone()).is_empty());

        value["publisher"] = json!("sometimes");
        assert_eq!(
            check(Table::Stewards, value),
            vec![Message::error(
                "bad-data-stewards",
                "Required stewards field \"publisher\" should be \"yes\", \"no\" or null."
            )]
        );
    }

    #[test]
    fn empty_csv_cell_counts_as_null() {
        let mut value = steward();
        value["publisher"] = json!("");
        assert!(check(Table::Stewards, value).is_empty());
    }

    #[test]
    fn empty_geojson_flag_is_an_error() {
        let messages = check(
            Table::TrailSegments,
            json!({
                "id": "7",
                "steward_id": "0",
                "osm_tags": null,
                "motor_vehicles": "no",
                "foot": "",
                "bicycle": null,
                "horse": "yes",
                "ski": "no",
                "wheelchair": "no",
            }),
        );
        assert_eq!(
            messages,
            vec![Message::error(
                "bad-data-trail-segments",
                "Optional trail segments field \"foot\" should be \"yes\", \"no\" or null."
            )]
        );
    }

    #[test]
    fn missing_optional_field_is_a_warning() {
        let messages = check(
            Table::NamedTrails,
            json!({"name": "Ridge", "segment_ids": "1; 2", "id": "1", "description": ""}),
        );
        assert_eq!(
            messages,
            vec![Message::warning(
                "missing-data-named-trails",
                "Optional named trails field \"part_of\" is missing."
            )]
        );
    }

    #[test]
    fn wrong_types_are_errors() {
        let messages = check(
            Table::TrailSegments,
            json!({
                "id": 7,
                "steward_id": "0",
                "osm_tags": null,
                "motor_vehicles": "no",
                "foot": "Yes",
                "bicycle": null,
                "horse": true,
                "ski": "no",
                "wheelchair": "no",
            }),
        );
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.severity == Severity::Error));
        assert_eq!(
            messages[0].text,
            "Required trail segments field \"id\" should be a string."
        );
        assert_eq!(
            messages[1].text,
            "Optional trail segments field \"horse\" should be \"yes\", \"no\" or null."
        );
    }

    #[test]
    fn optional_string_rejects_numbers() {
        let messages = check(
            Table::Areas,
            json!({"name": "Park", "id": "0", "steward_id": "0", "url": 3, "osm_tags": null}),
        );
        assert_eq!(
            messages,
            vec![Message::error(
                "bad-data-areas",
                "Optional areas field \"url\" should be a string or null."
            )]
        );
    }

    #[test]
    fn repeated_problems_collapse() {
        let mut log = MessageLog::new();
        let rows = vec![row(json!({"name": "A"})), row(json!({"name": "B"}))];
        check_rows(schema(Table::Trailheads), &rows, &mut log);
        let messages = log.into_deduped();
        assert_eq!(
            messages[0],
            Message::error(
                "bad-data-trailheads",
                "Required trailheads field \"steward_id\" is missing."
            )
        );
        // steward_id error plus one warning per optional field.
        assert_eq!(messages.len(), 1 + 9);
    }
}
