//! Case-insensitive view over a feature's source properties.

use std::collections::BTreeMap;

use open_trails_models::JsonObject;
use serde_json::Value;

/// Source properties keyed by their lower-cased names.
///
/// Built once per feature so that every field lookup is a plain map hit.
/// When two keys collide after lower-casing, the later one wins.
#[derive(Debug, Default)]
pub struct PropertyIndex<'a> {
    by_key: BTreeMap<String, &'a Value>,
    ordered: Vec<(String, &'a Value)>,
}

impl<'a> PropertyIndex<'a> {
    /// Indexes `properties`. A feature without properties yields an empty
    /// index.
    #[must_use]
    pub fn new(properties: Option<&'a JsonObject>) -> Self {
        let Some(properties) = properties else {
            return Self::default();
        };

        let ordered: Vec<(String, &Value)> = properties
            .iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();
        let by_key = ordered
            .iter()
            .map(|(key, value)| (key.clone(), *value))
            .collect();

        Self { by_key, ordered }
    }

    /// Value of the property named `lower_key` (already lower-case).
    #[must_use]
    pub fn get(&self, lower_key: &str) -> Option<&'a Value> {
        self.by_key.get(lower_key).copied()
    }

    /// Value of the first synonym present, checked in order.
    #[must_use]
    pub fn find_first(&self, synonyms: &[String]) -> Option<&'a Value> {
        synonyms.iter().find_map(|name| self.get(name))
    }

    /// Lower-cased keys and values of every property whose key starts with
    /// one of `prefixes`, in source key order.
    pub fn with_prefixes<'s>(
        &'s self,
        prefixes: &'s [String],
    ) -> impl Iterator<Item = (&'s str, &'a Value)> + 's {
        self.ordered
            .iter()
            .filter(|(key, _)| prefixes.iter().any(|p| key.starts_with(p.as_str())))
            .map(|(key, value)| (key.as_str(), *value))
    }

    /// Whether the feature has no properties at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
