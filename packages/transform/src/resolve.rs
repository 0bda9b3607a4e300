//! Field resolution: locating one canonical property in a feature's source
//! properties.
//!
//! Every resolver returns `None` when the property could not be located at
//! all and `Some(value)` when it was, where the located value may itself be
//! null.

use open_trails_models::YesNo;
use regex::Regex;
use serde_json::Value;

use crate::fields::{FieldSpec, FieldTable, UsePattern};
use crate::properties::PropertyIndex;

/// Matches immediately preceded by this text do not count as affirmative.
const NEGATION_PREFIX: &str = "no ";

/// Renders a located source value as text. Null stays absent.
#[must_use]
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Some(value.to_string())
        }
    }
}

/// Locates a free-text property by synonym.
#[must_use]
pub fn resolve_text(index: &PropertyIndex<'_>, spec: &FieldSpec) -> Option<Option<String>> {
    index.find_first(&spec.synonyms).map(value_to_text)
}

/// Locates an identifier. A located null id counts as not found, since
/// every feature must end up with an id.
#[must_use]
pub fn resolve_id(index: &PropertyIndex<'_>, spec: &FieldSpec) -> Option<String> {
    resolve_text(index, spec).flatten()
}

/// Locates a `yes`/`no` flag.
///
/// A direct field is normalized with [`YesNo::parse_loose`]. Failing that,
/// the combined-use fields are searched for the field's pattern: any
/// affirmative match gives `yes`, combined-use fields without one give
/// `no`, and no combined-use fields at all means not found.
#[must_use]
pub fn resolve_flag(
    index: &PropertyIndex<'_>,
    spec: &FieldSpec,
    use_fields: &[String],
) -> Option<Option<YesNo>> {
    if let Some(value) = index.find_first(&spec.synonyms) {
        return Some(value.as_str().and_then(YesNo::parse_loose));
    }

    let pattern = spec.pattern.as_ref()?;
    let mut found_use_field = false;

    for value in use_fields.iter().filter_map(|name| index.get(name)) {
        found_use_field = true;
        if let Some(text) = value_to_text(value)
            && affirms(pattern, &text)
        {
            return Some(Some(YesNo::Yes));
        }
    }

    found_use_field.then_some(Some(YesNo::No))
}

/// Collects every property whose key starts with one of the field's
/// prefixes and joins their values with `"; "`. Null values are skipped, as
/// are keys that `table` assigns to another field.
#[must_use]
pub fn resolve_prefixed(
    index: &PropertyIndex<'_>,
    spec: &FieldSpec,
    table: &FieldTable,
) -> Option<Option<String>> {
    let mut found = false;
    let parts: Vec<String> = index
        .with_prefixes(&spec.prefixes)
        .filter(|(key, _)| !table.claims(key, &spec.key))
        .map(|(_, value)| value)
        .inspect(|_| found = true)
        .filter_map(value_to_text)
        .collect();

    if !found {
        return None;
    }

    Some(if parts.is_empty() {
        None
    } else {
        Some(encode_list(&parts))
    })
}

/// Joins identifiers the way every `OpenTrails` list column is written.
#[must_use]
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("; ")
}

/// Whether `text` contains an affirmative match for `pattern` that is not
/// immediately preceded by `"no "` (compared case-insensitively).
///
/// The `regex` crate has no lookbehind, so each candidate match is checked
/// by hand and the search resumes one character past the rejected match's
/// start, the same positions a lookbehind-guarded search would try.
#[must_use]
pub fn affirms(pattern: &UsePattern, text: &str) -> bool {
    affirms_regex(pattern.regex(), text)
}

fn affirms_regex(regex: &Regex, text: &str) -> bool {
    let mut start = 0;

    while start <= text.len() {
        let Some(found) = regex.find_at(text, start) else {
            return false;
        };
        if !preceded_by_negation(text, found.start()) {
            return true;
        }
        start = found.start()
            + text[found.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }

    false
}

fn preceded_by_negation(text: &str, at: usize) -> bool {
    text[..at].to_lowercase().ends_with(NEGATION_PREFIX)
}
