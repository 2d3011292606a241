use mongodb::bson::{self, Bson, Document};
use serde_json::{Map, Value};

use crate::database::StoreResult;

/// Renders a stored document as API JSON: identifiers become hex strings,
/// dates become RFC 3339 strings, everything else relaxed extended JSON.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        Bson::Document(document) => document_to_json(document),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Converts a request body into a document, dropping any client supplied `_id`.
pub fn body_to_document(mut body: Map<String, Value>) -> StoreResult<Document> {
    body.remove("_id");
    Ok(bson::to_document(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId, DateTime};
    use serde_json::json;

    #[test]
    fn test_object_id_rendered_as_hex() {
        let id = ObjectId::new();
        let rendered = document_to_json(doc! { "_id": id, "title": "Flood Relief", "amount": 500 });

        assert_eq!(rendered, json!({ "_id": id.to_hex(), "title": "Flood Relief", "amount": 500 }));
    }

    #[test]
    fn test_nested_values() {
        let rendered = document_to_json(doc! {
            "when": DateTime::from_millis(0),
            "tags": ["a", 1.5],
            "meta": { "ok": true, "none": null },
        });

        assert_eq!(rendered["when"], json!("1970-01-01T00:00:00Z"));
        assert_eq!(rendered["tags"], json!(["a", 1.5]));
        assert_eq!(rendered["meta"], json!({ "ok": true, "none": null }));
    }

    #[test]
    fn test_body_drops_client_id() {
        let body = json!({ "_id": "abc", "title": "Food", "amount": 750 });
        let Value::Object(map) = body else { unreachable!() };

        let document = body_to_document(map).unwrap();
        assert!(document.get("_id").is_none());
        assert_eq!(document.get_str("title").unwrap(), "Food");
        assert_eq!(document.get_i64("amount").unwrap(), 750);
    }
}
