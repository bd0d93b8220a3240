use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::store::StoreError;

/// A stored record in its untyped form: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Key carrying the record identifier in every [`Document`] handed out by a store.
pub const ID_FIELD: &str = "id";

/// Mongo's native identifier key. Never accepted from callers.
pub(crate) const MONGO_ID_FIELD: &str = "_id";

/// Serialize a value that must come out as a JSON object.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if serialization fails and
/// [`StoreError::NotAnObject`] if the value is not a struct/map.
pub fn to_document<S: Serialize>(value: &S) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Deserialize a stored document into a typed record.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if the document does not match `T`.
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// Serialize write input (create or update) and drop any identifier keys.
///
/// Identifiers are assigned by the store and are immutable afterwards, so a
/// caller-supplied `id` is never written.
///
/// # Errors
///
/// Same as [`to_document`].
pub fn write_document<S: Serialize>(input: &S) -> Result<Document, StoreError> {
    let mut document = to_document(input)?;
    strip_identifiers(&mut document);
    Ok(document)
}

pub(crate) fn strip_identifiers(document: &mut Document) {
    document.remove(ID_FIELD);
    document.remove(MONGO_ID_FIELD);
}

/// Shallow merge: every key in `changes` replaces the stored value, every
/// other key is left untouched.
#[must_use]
pub fn merge(mut existing: Document, changes: Document) -> Document {
    for (key, value) in changes {
        if key == ID_FIELD || key == MONGO_ID_FIELD {
            continue;
        }
        existing.insert(key, value);
    }
    existing
}

/// Returns the identifier of a stored document, if present and a string.
#[must_use]
pub fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Widget {
        id: String,
        name: String,
        count: i64,
    }

    #[derive(Serialize)]
    struct WidgetPatch {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<i64>,
    }

    #[test]
    fn test_write_document_strips_identifiers() {
        let input = json!({"id": "abc", "_id": "def", "name": "widget"});
        let document = write_document(&input).unwrap();
        assert_eq!(document.len(), 1);
        assert_eq!(document["name"], "widget");
    }

    #[test]
    fn test_non_object_is_rejected() {
        let result = to_document(&vec![1, 2, 3]);
        assert!(matches!(result, Err(StoreError::NotAnObject)));
    }

    #[test]
    fn test_partial_update_changes_only_supplied_fields() {
        let existing = to_document(&Widget {
            id: "1".into(),
            name: "widget".into(),
            count: 3,
        })
        .unwrap();
        let changes = write_document(&WidgetPatch {
            name: Some("gadget".into()),
            count: None,
        })
        .unwrap();

        let merged: Widget = from_document(merge(existing, changes)).unwrap();
        assert_eq!(
            merged,
            Widget {
                id: "1".into(),
                name: "gadget".into(),
                count: 3,
            }
        );
    }

    #[test]
    fn test_merge_never_touches_identifier() {
        let mut existing = Document::new();
        existing.insert(ID_FIELD.into(), json!("original"));
        let mut changes = Document::new();
        changes.insert(ID_FIELD.into(), json!("hijacked"));

        let merged = merge(existing, changes);
        assert_eq!(document_id(&merged), Some("original"));
    }

    #[test]
    fn test_explicit_null_is_a_change() {
        let mut existing = Document::new();
        existing.insert("note".into(), json!("keep me?"));
        let changes = write_document(&json!({"note": null})).unwrap();

        let merged = merge(existing, changes);
        assert_eq!(merged["note"], Value::Null);
    }
}
