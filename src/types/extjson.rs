//! Conversion between BSON values and plain JSON at the HTTP boundary.
//!
//! Outgoing documents are encoded recursively: BSON types with no JSON
//! equivalent are mapped to fixed string forms (ObjectId to its 24-char hex,
//! DateTime to RFC 3339, binary to base64). The mapping is lossy but stable.
//!
//! Incoming filters, pipelines and documents are parsed with MongoDB
//! extended-JSON awareness, so clients can send `{"$oid": "..."}` or
//! `{"$date": "..."}` and match driver-generated values.

use base64::Engine;
use bson::{Bson, Document};
use serde_json::{json, Map, Value};

use crate::types::error::AppError;

/// Parse a JSON value (extended JSON allowed) into a BSON document.
pub fn json_to_document(value: Value) -> Result<Document, AppError> {
    match Bson::try_from(value) {
        Ok(Bson::Document(doc)) => Ok(doc),
        Ok(_) => Err(AppError::BadRequest("expected a JSON object".to_string())),
        Err(e) => Err(AppError::BadRequest(format!("Invalid extended JSON: {}", e))),
    }
}

/// Parse a JSON array of objects (extended JSON allowed) into BSON documents.
pub fn json_to_documents(values: Vec<Value>) -> Result<Vec<Document>, AppError> {
    values.into_iter().map(json_to_document).collect()
}

/// Encode a BSON document as JSON-safe output.
pub fn document_to_json(doc: Document) -> Value {
    bson_to_json(Bson::Document(doc))
}

/// Recursively encode a BSON value as JSON-safe output.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::String(s) => Value::String(s),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => {
            let mut map = Map::with_capacity(doc.len());
            for (key, val) in doc {
                map.insert(key, bson_to_json(val));
            }
            Value::Object(map)
        }
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Int32(i) => Value::Number(i.into()),
        Bson::Int64(i) => Value::Number(i.into()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        Bson::Timestamp(ts) => Value::String(format!("{}:{}", ts.time, ts.increment)),
        Bson::Decimal128(d) => Value::String(d.to_string()),
        Bson::Binary(bin) => {
            Value::String(base64::engine::general_purpose::STANDARD.encode(bin.bytes))
        }
        Bson::RegularExpression(re) => Value::String(format!("/{}/{}", re.pattern, re.options)),
        Bson::JavaScriptCode(code) => Value::String(code),
        Bson::JavaScriptCodeWithScope(cws) => Value::String(cws.code),
        Bson::Symbol(s) => Value::String(s),
        Bson::MinKey => json!({"$minKey": 1}),
        Bson::MaxKey => json!({"$maxKey": 1}),
        Bson::DbPointer(ptr) => Value::String(format!("{:?}", ptr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_object_id_encodes_as_hex_string() {
        let oid = ObjectId::new();
        let encoded = bson_to_json(Bson::ObjectId(oid));
        assert_eq!(encoded, Value::String(oid.to_hex()));
    }

    #[test]
    fn test_datetime_encodes_as_rfc3339() {
        let dt = bson::DateTime::from_millis(1_700_000_000_000);
        let encoded = bson_to_json(Bson::DateTime(dt));
        let s = encoded.as_str().unwrap();
        assert!(s.starts_with("2023-11-14T"), "unexpected encoding: {}", s);
    }

    #[test]
    fn test_int64_stays_numeric() {
        let encoded = bson_to_json(Bson::Int64(9_007_199_254_740_993));
        assert_eq!(encoded, json!(9_007_199_254_740_993_i64));
    }

    #[test]
    fn test_nested_values_encode_recursively() {
        let oid = ObjectId::new();
        let doc = doc! {
            "_id": oid,
            "tags": ["a", "b"],
            "meta": { "created": bson::DateTime::from_millis(0), "n": 3_i32 },
        };
        let encoded = document_to_json(doc);
        assert_eq!(encoded["_id"], Value::String(oid.to_hex()));
        assert_eq!(encoded["tags"], json!(["a", "b"]));
        assert_eq!(encoded["meta"]["n"], json!(3));
        assert!(encoded["meta"]["created"].is_string());
    }

    #[test]
    fn test_binary_encodes_as_base64() {
        let bin = bson::Binary {
            subtype: bson::spec::BinarySubtype::Generic,
            bytes: vec![1, 2, 3],
        };
        assert_eq!(bson_to_json(Bson::Binary(bin)), Value::String("AQID".into()));
    }

    #[test]
    fn test_non_finite_double_encodes_as_null() {
        assert_eq!(bson_to_json(Bson::Double(f64::NAN)), Value::Null);
    }

    #[test]
    fn test_inbound_extended_json_oid() {
        let oid = ObjectId::new();
        let doc = json_to_document(json!({ "_id": { "$oid": oid.to_hex() } })).unwrap();
        assert_eq!(doc.get_object_id("_id").unwrap(), oid);
    }

    #[test]
    fn test_inbound_plain_json_passes_through() {
        let doc = json_to_document(json!({ "status": "active", "n": 2 })).unwrap();
        assert_eq!(doc.get_str("status").unwrap(), "active");
    }

    #[test]
    fn test_inbound_non_object_is_rejected() {
        let err = json_to_document(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
