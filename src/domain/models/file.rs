use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Bytes(Vec<u8>),
    Text(String),
}

impl FileContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Bytes(bytes) => bytes,
            FileContent::Text(text) => text.as_bytes(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FileContent::Bytes(bytes) => bytes,
            FileContent::Text(text) => text.into_bytes(),
        }
    }

    pub fn size(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(self.as_bytes())
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Bytes(bytes)
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        FileContent::Bytes(bytes.to_vec())
    }
}

impl From<String> for FileContent {
    fn from(text: String) -> Self {
        FileContent::Text(text)
    }
}

impl From<&str> for FileContent {
    fn from(text: &str) -> Self {
        FileContent::Text(text.to_string())
    }
}

/// What the filestore returned for a successful upload.
///
/// The response object is kept as received; typed accessors cover the
/// fields the service documents.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFileResult {
    fingerprint: String,
    fields: Map<String, Value>,
}

impl StoredFileResult {
    /// Returns `None` unless the response carries a usable fingerprint: a
    /// non-empty string or a non-zero number.
    pub fn from_response(fields: Map<String, Value>) -> Option<Self> {
        let fingerprint = match fields.get("fingerprint")? {
            Value::String(value) if !value.is_empty() => value.clone(),
            Value::Number(number) if number.as_f64() != Some(0.0) => number.to_string(),
            _ => return None,
        };

        Some(Self {
            fingerprint,
            fields,
        })
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn url(&self) -> Option<&str> {
        self.fields.get("url").and_then(Value::as_str)
    }

    pub fn size(&self) -> Option<u64> {
        self.fields.get("size").and_then(Value::as_u64)
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.fields.get("type").and_then(Value::as_str)
    }

    pub fn date(&self) -> Option<&Value> {
        self.fields.get("date")
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl Serialize for StoredFileResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_text_and_bytes_encode_identically() {
        let text = FileContent::from("hello");
        let bytes = FileContent::from(b"hello".to_vec());
        assert_eq!(text.to_base64(), "aGVsbG8=");
        assert_eq!(text.to_base64(), bytes.to_base64());
        assert_eq!(text.size(), 5);
    }

    #[test]
    fn test_base64_decodes_back_to_original_bytes() {
        let samples: Vec<Vec<u8>> = vec![
            Vec::new(),
            vec![0],
            (0..=255u8).collect(),
            "ünïcödé ✓".as_bytes().to_vec(),
        ];

        for sample in samples {
            let encoded = FileContent::from(sample.clone()).to_base64();
            assert_eq!(BASE64_STANDARD.decode(encoded).unwrap(), sample);
        }
    }

    #[test]
    fn test_result_keeps_all_fields() {
        let result = StoredFileResult::from_response(object(json!({
            "fingerprint": "fp1",
            "url": "http://filestore/fp1",
            "size": 5,
            "type": "text/plain",
            "date": 1700000000,
            "extra": true
        })))
        .unwrap();

        assert_eq!(result.fingerprint(), "fp1");
        assert_eq!(result.url(), Some("http://filestore/fp1"));
        assert_eq!(result.size(), Some(5));
        assert_eq!(result.mime_type(), Some("text/plain"));
        assert_eq!(result.date(), Some(&json!(1700000000)));
        assert_eq!(result.get("extra"), Some(&json!(true)));
    }

    #[test]
    fn test_result_requires_usable_fingerprint() {
        for response in [
            json!({}),
            json!({ "fingerprint": null }),
            json!({ "fingerprint": "" }),
            json!({ "fingerprint": 0 }),
            json!({ "fingerprint": false }),
        ] {
            assert!(StoredFileResult::from_response(object(response)).is_none());
        }
    }
}
