//! # Envelope Normalization
//!
//! List endpoints answer either with a bare array or with the array wrapped
//! in an object. This module is the one place that knows the wrappers.

use crate::resource::Resource;
use serde_json::Value;
use tracing::warn;

/// Field names that conventionally hold the list inside an envelope.
pub const ENVELOPE_KEYS: &[&str] = &["data", "content", "items"];

// `{"data": {"content": [...]}}` is the deepest nesting seen in practice.
const MAX_DEPTH: usize = 3;

/// Extract the list payload from `body`.
///
/// Looks, in order, at: a bare array; the first field named after one of
/// [`ENVELOPE_KEYS`] or `plural` that holds a list; the only remaining field
/// of the object. A field holding an object is normalized again, which
/// covers paged payloads. Returns `None` when nothing matches.
pub fn normalize_list(body: Value, plural: &str) -> Option<Vec<Value>> {
    normalize_at(body, plural, 0)
}

fn normalize_at(body: Value, plural: &str, depth: usize) -> Option<Vec<Value>> {
    if depth > MAX_DEPTH {
        return None;
    }
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => {
            // A known key holding null or a scalar does not end the search.
            for key in ENVELOPE_KEYS.iter().copied().chain(std::iter::once(plural)) {
                let Some(inner) = map.remove(key) else {
                    continue;
                };
                if let Some(items) = unwrap_inner(inner, plural, depth) {
                    return Some(items);
                }
            }
            if map.len() == 1 {
                let (_, inner) = map.into_iter().next()?;
                return unwrap_inner(inner, plural, depth);
            }
            None
        }
        _ => None,
    }
}

fn unwrap_inner(inner: Value, plural: &str, depth: usize) -> Option<Vec<Value>> {
    match inner {
        Value::Array(items) => Some(items),
        nested @ Value::Object(_) => normalize_at(nested, plural, depth + 1),
        _ => None,
    }
}

/// Normalize and deserialize a list body into `T`s.
///
/// An unrecognized envelope yields an empty list. Rows that do not
/// deserialize into `T` are logged and skipped; the rest are kept.
pub fn decode_list<T: Resource>(body: Value) -> Vec<T> {
    let Some(raw) = normalize_list(body, T::PLURAL) else {
        warn!(resource = T::PLURAL, "Unrecognized list envelope, showing empty list");
        return Vec::new();
    };
    raw.into_iter()
        .enumerate()
        .filter_map(|(row, value)| match serde_json::from_value::<T>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(resource = T::PLURAL, row, error = %e, "Skipping malformed list item");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn nums() -> Option<Vec<Value>> {
        Some(vec![json!(1), json!(2), json!(3)])
    }

    #[test]
    fn bare_and_known_envelopes() {
        assert_eq!(normalize_list(json!([1, 2, 3]), "faculties"), nums());
        assert_eq!(normalize_list(json!({"data": [1, 2, 3]}), "faculties"), nums());
        assert_eq!(normalize_list(json!({"content": [1, 2, 3]}), "faculties"), nums());
        assert_eq!(
            normalize_list(json!({"items": [1, 2, 3], "total": 3}), "faculties"),
            nums()
        );
        assert_eq!(
            normalize_list(json!({"data": null, "items": [1, 2, 3]}), "faculties"),
            nums()
        );
        assert_eq!(
            normalize_list(json!({"data": "ok", "content": [1, 2, 3]}), "faculties"),
            nums()
        );
    }

    #[test]
    fn plural_and_single_field_envelopes() {
        assert_eq!(
            normalize_list(json!({"faculties": [1, 2, 3], "page": 0}), "faculties"),
            nums()
        );
        assert_eq!(normalize_list(json!({"onlyField": [1, 2, 3]}), "faculties"), nums());
    }

    #[test]
    fn nested_page_inside_data() {
        let body = json!({"data": {"content": [1, 2, 3], "totalElements": 3}});
        assert_eq!(normalize_list(body, "programs"), nums());
    }

    #[test]
    fn unrecognized_shapes() {
        assert_eq!(normalize_list(json!({"a": 1, "b": 2}), "faculties"), None);
        assert_eq!(normalize_list(json!({"data": 5}), "faculties"), None);
        assert_eq!(normalize_list(json!({"data": null, "items": "none"}), "faculties"), None);
        assert_eq!(normalize_list(json!({"data": "ok", "total": 0}), "faculties"), None);
        assert_eq!(normalize_list(json!("nope"), "faculties"), None);
        assert_eq!(normalize_list(json!(null), "faculties"), None);
    }

    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    struct Row {
        id: u32,
    }

    #[derive(Debug, Clone, serde::Serialize)]
    struct RowDraft;

    impl Resource for Row {
        type Id = u32;
        type Draft = RowDraft;
        const NAME: &'static str = "Row";
        const PLURAL: &'static str = "rows";

        fn id(&self) -> u32 {
            self.id
        }

        fn to_draft(&self) -> RowDraft {
            RowDraft
        }
    }

    #[test]
    fn bad_rows_are_skipped_and_good_rows_kept() {
        let rows: Vec<Row> = decode_list(json!({"data": [{"id": 1}, {"id": 2}, {"name": "no id"}]}));
        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 2 }]);
    }

    #[test]
    fn empty_array_is_a_valid_list() {
        assert_eq!(normalize_list(json!({"data": []}), "roles"), Some(vec![]));
    }
}
