//! Filter matching, ordering, and the aggregation-pipeline interpreter
//! shared by every document-store backend.

use contentscout_core::error::StoreError;
use contentscout_core::store::{Document, FindOptions, SortOrder};
use serde_json::{Map, Value, json};
use std::cmp::Ordering;

/// Field-wise equality: every filter field must equal the document's.
/// An empty filter matches everything.
pub fn matches_filter(doc: &Document, filter: &Document) -> bool {
    let Some(filter_map) = filter.as_object() else {
        return false;
    };
    let Some(doc_map) = doc.as_object() else {
        return false;
    };
    filter_map
        .iter()
        .all(|(key, expected)| doc_map.get(key) == Some(expected))
}

/// Total order over JSON values for sorting: null < bool < number <
/// string, mixed kinds by that rank.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&y.as_f64().unwrap_or(0.0))
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Sort, skip, and truncate in place per the find options.
pub fn apply_find_options(mut docs: Vec<Document>, options: &FindOptions) -> Vec<Document> {
    if !options.sort.is_empty() {
        docs.sort_by(|a, b| {
            for (field, order) in &options.sort {
                let av = a.get(field).unwrap_or(&Value::Null);
                let bv = b.get(field).unwrap_or(&Value::Null);
                let cmp = match order {
                    SortOrder::Ascending => compare_values(av, bv),
                    SortOrder::Descending => compare_values(bv, av),
                };
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });
    }
    let docs: Vec<Document> = docs.into_iter().skip(options.skip).collect();
    match options.limit {
        Some(limit) => docs.into_iter().take(limit).collect(),
        None => docs,
    }
}

/// Interpret the supported pipeline stages over an in-memory collection:
/// `$match`, `$sort` (1 / -1), `$limit`, and `$group` with
/// `{_id: "$field", count: {"$sum": 1}}`.
pub fn run_pipeline(
    mut docs: Vec<Document>,
    pipeline: &[Value],
) -> Result<Vec<Document>, StoreError> {
    for stage in pipeline {
        let Some(stage_map) = stage.as_object() else {
            return Err(StoreError::UnsupportedStage(stage.to_string()));
        };
        let Some((name, spec)) = stage_map.iter().next() else {
            continue;
        };
        match name.as_str() {
            "$match" => {
                docs.retain(|doc| matches_filter(doc, spec));
            }
            "$sort" => {
                let sort = spec
                    .as_object()
                    .map(|m| {
                        m.iter()
                            .map(|(field, dir)| {
                                let order = if dir.as_i64() == Some(-1) {
                                    SortOrder::Descending
                                } else {
                                    SortOrder::Ascending
                                };
                                (field.clone(), order)
                            })
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                docs = apply_find_options(
                    docs,
                    &FindOptions {
                        sort,
                        ..FindOptions::default()
                    },
                );
            }
            "$limit" => {
                let limit = spec.as_u64().unwrap_or(0) as usize;
                docs.truncate(limit);
            }
            "$group" => {
                docs = run_group_stage(&docs, spec)?;
            }
            other => return Err(StoreError::UnsupportedStage(other.to_string())),
        }
    }
    Ok(docs)
}

/// `{_id: "$field", count: {"$sum": 1}}` — bucket by field value and count.
fn run_group_stage(docs: &[Document], spec: &Value) -> Result<Vec<Document>, StoreError> {
    let field = spec
        .get("_id")
        .and_then(Value::as_str)
        .and_then(|s| s.strip_prefix('$'))
        .ok_or_else(|| StoreError::UnsupportedStage(format!("$group: {spec}")))?;

    let mut buckets: Vec<(Value, u64)> = Vec::new();
    for doc in docs {
        let key = doc.get(field).cloned().unwrap_or(Value::Null);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => buckets.push((key, 1)),
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(key, count)| json!({"_id": key, "count": count}))
        .collect())
}

/// Field-wise set: copy every change field onto the document.
pub fn apply_changes(doc: &mut Document, changes: &Document) {
    let (Some(doc_map), Some(change_map)) = (doc.as_object_mut(), changes.as_object()) else {
        return;
    };
    for (key, value) in change_map {
        doc_map.insert(key.clone(), value.clone());
    }
}

/// Upsert seed: the filter's fields overlaid with the changes.
pub fn merge_for_upsert(filter: &Document, changes: &Document) -> Document {
    let mut doc = Value::Object(Map::new());
    apply_changes(&mut doc, filter);
    apply_changes(&mut doc, changes);
    doc
}
