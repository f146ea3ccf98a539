//! Attachment models and download-payload normalization.
//!
//! Attachment metadata reaches the adapter by three different routes
//! (embedded in an article, a dedicated listing endpoint, or id-only
//! references in legacy article fields), and download responses arrive in
//! several body shapes. Everything is normalized here: metadata into
//! [`Attachment`], download bodies into raw bytes via [`AttachmentPayload`].

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attachment metadata.
///
/// Carries at least `id` and `filename` when the backend makes them
/// obtainable; records reconstructed from id-only references get a
/// synthesized filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique attachment ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Original filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// All remaining backend fields, passed through unchanged.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Attachment {
    /// Normalizes one entry of an article attachment field.
    ///
    /// Structured records are kept as-is; scalar id references are expanded
    /// to a minimal record with a synthesized filename. Values that are
    /// neither are dropped.
    pub fn from_reference(value: &Value) -> Option<Attachment> {
        match value {
            Value::Object(map) => Some(
                serde_json::from_value(value.clone()).unwrap_or_else(|_| Attachment {
                    id: None,
                    filename: None,
                    fields: map.clone(),
                }),
            ),
            Value::Number(n) => n.as_u64().map(|id| Attachment {
                id: Some(id),
                filename: Some(format!("attachment_{}", id)),
                fields: Map::new(),
            }),
            Value::String(s) => Some(Attachment {
                id: s.parse().ok(),
                filename: Some(format!("attachment_{}", s)),
                fields: Map::new(),
            }),
            _ => None,
        }
    }
}

/// A download response before byte normalization.
///
/// Backends return attachment content as a raw body, a JSON record wrapping
/// the content, or some other JSON value; the variants keep those cases
/// apart until [`AttachmentPayload::into_bytes`] flattens them.
#[derive(Debug, Clone)]
pub enum AttachmentPayload {
    /// Raw response body.
    Bytes(Vec<u8>),
    /// JSON object response, e.g. `{"data": "<base64>", "filename": "..."}`.
    Record(Map<String, Value>),
    /// Any other JSON response.
    Other(Value),
}

impl AttachmentPayload {
    /// Returns true if the payload carries nothing usable.
    pub fn is_empty(&self) -> bool {
        match self {
            AttachmentPayload::Bytes(b) => b.is_empty(),
            AttachmentPayload::Record(map) => map.is_empty(),
            AttachmentPayload::Other(v) => v.is_null(),
        }
    }

    /// Normalizes the payload to the attachment's raw bytes.
    ///
    /// Never fails: a record whose `data` field is not valid base64 is
    /// serialized whole, and anything unserializable degrades to an empty
    /// buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            AttachmentPayload::Bytes(bytes) => bytes,
            AttachmentPayload::Record(map) => record_bytes(map),
            AttachmentPayload::Other(value) => serde_json::to_vec(&value).unwrap_or_default(),
        }
    }
}

/// Extracts content bytes from a JSON record response.
fn record_bytes(map: Map<String, Value>) -> Vec<u8> {
    if let Some(Value::String(data)) = map.get("data") {
        return match BASE64_STANDARD.decode(data) {
            Ok(decoded) => decoded,
            Err(_) => serialize_record(map),
        };
    }

    if let Some(file) = map.get("file") {
        if let Some(bytes) = buffer_bytes(file) {
            return bytes;
        }
    }

    serialize_record(map)
}

/// Interprets a JSON value as a byte buffer, when it is one.
fn buffer_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect(),
        Value::String(s) => Some(s.clone().into_bytes()),
        _ => None,
    }
}

fn serialize_record(map: Map<String, Value>) -> Vec<u8> {
    serde_json::to_vec(&Value::Object(map)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_reference_keeps_structured_record() {
        let value = serde_json::json!({"id": 1, "filename": "a.png", "size": 1024});
        let att = Attachment::from_reference(&value).unwrap();
        assert_eq!(att.id, Some(1));
        assert_eq!(att.filename.as_deref(), Some("a.png"));
        assert_eq!(att.fields.get("size"), Some(&Value::from(1024)));
    }

    #[test]
    fn test_from_reference_keeps_odd_record_verbatim() {
        // Non-numeric id defeats the typed fields but the record survives.
        let value = serde_json::json!({"id": "weird", "filename": 5});
        let att = Attachment::from_reference(&value).unwrap();
        assert_eq!(att.id, None);
        assert_eq!(serde_json::to_value(&att).unwrap(), value);
    }

    #[test]
    fn test_from_reference_synthesizes_from_number() {
        let att = Attachment::from_reference(&Value::from(9)).unwrap();
        assert_eq!(att.id, Some(9));
        assert_eq!(att.filename.as_deref(), Some("attachment_9"));
    }

    #[test]
    fn test_from_reference_synthesizes_from_string() {
        let att = Attachment::from_reference(&Value::from("12")).unwrap();
        assert_eq!(att.id, Some(12));
        assert_eq!(att.filename.as_deref(), Some("attachment_12"));
    }

    #[test]
    fn test_from_reference_drops_unusable_values() {
        assert!(Attachment::from_reference(&Value::Null).is_none());
        assert!(Attachment::from_reference(&Value::Bool(true)).is_none());
    }

    #[test]
    fn test_payload_bytes_pass_through() {
        let payload = AttachmentPayload::Bytes(b"raw content".to_vec());
        assert_eq!(payload.into_bytes(), b"raw content");
    }

    #[test]
    fn test_payload_record_decodes_base64_data() {
        let mut map = Map::new();
        map.insert(
            "data".to_string(),
            Value::String(BASE64_STANDARD.encode("hello")),
        );
        let payload = AttachmentPayload::Record(map);
        assert_eq!(payload.into_bytes(), b"hello");
    }

    #[test]
    fn test_payload_record_bad_base64_serializes_record() {
        let mut map = Map::new();
        map.insert("data".to_string(), Value::String("not-base64!!".to_string()));
        let bytes = AttachmentPayload::Record(map.clone()).into_bytes();
        let expected = serde_json::to_vec(&Value::Object(map)).unwrap();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_payload_record_file_buffer() {
        let mut map = Map::new();
        map.insert("file".to_string(), serde_json::json!([104, 105]));
        assert_eq!(AttachmentPayload::Record(map).into_bytes(), b"hi");
    }

    #[test]
    fn test_payload_record_without_content_serializes_record() {
        let mut map = Map::new();
        map.insert("filename".to_string(), Value::from("a.txt"));
        let bytes = AttachmentPayload::Record(map.clone()).into_bytes();
        let expected = serde_json::to_vec(&Value::Object(map)).unwrap();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_payload_other_serializes_value() {
        let payload = AttachmentPayload::Other(Value::from("plain"));
        assert_eq!(payload.into_bytes(), b"\"plain\"");
    }

    #[test]
    fn test_payload_emptiness() {
        assert!(AttachmentPayload::Bytes(vec![]).is_empty());
        assert!(!AttachmentPayload::Bytes(vec![1]).is_empty());
        assert!(AttachmentPayload::Record(Map::new()).is_empty());
        assert!(AttachmentPayload::Other(Value::Null).is_empty());
    }
}
