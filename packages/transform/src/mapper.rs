//! The table-driven core shared by the segment and trailhead transforms.

use std::collections::BTreeMap;

use geojson::{Feature, FeatureCollection};
use open_trails_models::{JsonObject, MessageLog, YesNo};

use crate::TransformOutput;
use crate::fields::{FieldKind, FieldTable};
use crate::properties::PropertyIndex;
use crate::resolve::{resolve_flag, resolve_id, resolve_prefixed, resolve_text};

/// Hands out synthesized ids `"1"`, `"2"`, ... for one run.
#[derive(Debug)]
struct IdCounter {
    next: u64,
}

impl IdCounter {
    const fn new() -> Self {
        Self { next: 1 }
    }

    fn next_id(&mut self) -> String {
        let id = self.next.to_string();
        self.next += 1;
        id
    }
}

/// Canonical values located for one feature.
#[derive(Debug, Default)]
pub struct ResolvedFeature {
    /// Discovered or synthesized id.
    pub id: String,
    texts: BTreeMap<String, Option<String>>,
    flags: BTreeMap<String, Option<YesNo>>,
}

impl ResolvedFeature {
    /// Text value for `key`; null when unresolved.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.texts.get(key).cloned().flatten()
    }

    /// Flag value for `key`; null when unresolved.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<YesNo> {
        self.flags.get(key).copied().flatten()
    }
}

/// Resolves every field in `table` for one feature, recording a diagnostic
/// for each field that cannot be located.
fn resolve_feature(
    index: &PropertyIndex<'_>,
    table: &FieldTable,
    ids: &mut IdCounter,
    log: &mut MessageLog,
) -> ResolvedFeature {
    let mut resolved = ResolvedFeature::default();
    let mut id = None;

    for spec in &table.fields {
        let found = match spec.kind {
            FieldKind::Id => {
                id = resolve_id(index, spec);
                id.is_some()
            }
            FieldKind::Text => resolve_text(index, spec)
                .map(|value| resolved.texts.insert(spec.key.clone(), value))
                .is_some(),
            FieldKind::Prefixed => resolve_prefixed(index, spec, table)
                .map(|value| resolved.texts.insert(spec.key.clone(), value))
                .is_some(),
            FieldKind::Flag => resolve_flag(index, spec, &table.use_fields)
                .map(|value| resolved.flags.insert(spec.key.clone(), value))
                .is_some(),
        };

        if !found {
            log.push(spec.missing.message());
        }
    }

    resolved.id = id.unwrap_or_else(|| ids.next_id());
    resolved
}

/// Maps every feature of `raw` through `table`, building each feature's
/// canonical properties with `build`.
///
/// The output has exactly one feature per input feature, in input order,
/// each carrying a copy of the source geometry.
pub fn transform_collection(
    raw: &FeatureCollection,
    table: &FieldTable,
    success: (&str, &str),
    build: impl Fn(&ResolvedFeature) -> JsonObject,
) -> TransformOutput {
    let mut log = MessageLog::new();
    let mut ids = IdCounter::new();

    let features = raw
        .features
        .iter()
        .map(|feature| {
            let index = PropertyIndex::new(feature.properties.as_ref());
            let resolved = resolve_feature(&index, table, &mut ids, &mut log);
            Feature {
                bbox: None,
                geometry: feature.geometry.clone(),
                id: None,
                properties: Some(build(&resolved)),
                foreign_members: None,
            }
        })
        .collect();

    if !log.has_problems() {
        let (code, text) = success;
        log.success(code, text);
    }

    TransformOutput {
        messages: log.into_deduped(),
        geojson: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}
