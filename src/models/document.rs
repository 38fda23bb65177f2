//! Tree-shaped document values.
//!
//! Observed state, desired state and the pipeline context all arrive as
//! decoded JSON. [`Document`] is the typed form the resolver walks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A decoded, semi-structured document value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(untagged)]
pub enum Document {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Document>),
    Mapping(BTreeMap<String, Document>),
}

impl Document {
    /// An empty mapping, the shape every namespace root has.
    pub fn mapping() -> Self {
        Document::Mapping(BTreeMap::new())
    }

    /// Short name of the variant, used in type mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "bool",
            Document::Integer(_) => "integer",
            Document::Float(_) => "float",
            Document::String(_) => "string",
            Document::Sequence(_) => "sequence",
            Document::Mapping(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Document::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Look up a key when this is a mapping.
    pub fn get_field(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Look up an element when this is a sequence.
    pub fn get_index(&self, index: usize) -> Option<&Document> {
        match self {
            Document::Sequence(seq) => seq.get(index),
            _ => None,
        }
    }

    /// Insert `value` under `key`, turning a non-mapping document into an
    /// empty mapping first.
    pub fn set_field(&mut self, key: &str, value: Document) {
        if !matches!(self, Document::Mapping(_)) {
            *self = Document::mapping();
        }
        if let Document::Mapping(map) = self {
            map.insert(key.to_string(), value);
        }
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::String(s.to_string())
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Document::String(s)
    }
}

impl From<i64> for Document {
    fn from(i: i64) -> Self {
        Document::Integer(i)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "<{}>", self.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nested_json() {
        let doc: Document = serde_json::from_str(
            r#"{"status": {"atProvider": {"cidrBlock": "10.10.0.0/24", "enableDns": true}},
                "ports": [80, 443], "ratio": 0.5, "owner": null}"#,
        )
        .expect("Error parsing document");

        let provider = doc
            .get_field("status")
            .and_then(|d| d.get_field("atProvider"))
            .expect("Missing atProvider");
        assert_eq!(
            provider.get_field("cidrBlock").and_then(Document::as_str),
            Some("10.10.0.0/24")
        );
        assert_eq!(
            provider.get_field("enableDns"),
            Some(&Document::Bool(true))
        );
        assert_eq!(
            doc.get_field("ports").and_then(|d| d.get_index(1)),
            Some(&Document::Integer(443))
        );
        assert_eq!(doc.get_field("ratio"), Some(&Document::Float(0.5)));
        assert_eq!(doc.get_field("owner"), Some(&Document::Null));
    }

    #[test]
    fn test_wrong_shape_lookups() {
        let doc = Document::from("10.0.0.0/8");
        assert!(doc.get_field("a").is_none());
        assert!(doc.get_index(0).is_none());
        assert!(doc.as_i64().is_none());
        assert_eq!(doc.type_name(), "string");
    }

    #[test]
    fn test_set_field_replaces_scalar() {
        let mut doc = Document::Null;
        doc.set_field("input", Document::from("10.10.0.240/28"));
        assert_eq!(doc.to_string(), r#"{"input":"10.10.0.240/28"}"#);
    }
}
