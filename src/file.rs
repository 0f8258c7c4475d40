//! In-memory file records handed to the pipeline by the build engine.

use crate::constants::fields;
use indexmap::IndexMap;
use serde_json::Value;

/// Working set of output files for one build pass, keyed by `/`-separated
/// path relative to the site's content directory.
pub type FileMap = IndexMap<String, FileRecord>;

/// Site-wide metadata merged into every file's props.
pub type Metadata = serde_json::Map<String, Value>;

/// A single front-matter field or payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Raw bytes, such as file contents.
    Buffer(Vec<u8>),
    /// Any structured front-matter value.
    Value(Value),
}

impl FieldValue {
    /// String form of the field: buffers decode lossily as UTF-8 and
    /// JSON strings are taken verbatim. Other JSON values use their JSON text.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Buffer(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            FieldValue::Value(Value::String(s)) => s.clone(),
            FieldValue::Value(other) => other.to_string(),
        }
    }

    /// JSON form of the field, with buffers coerced to strings.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Buffer(bytes) => {
                Value::String(String::from_utf8_lossy(bytes).into_owned())
            }
            FieldValue::Value(value) => value.clone(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Value(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(bytes: Vec<u8>) -> Self {
        FieldValue::Buffer(bytes)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Value(Value::String(s.to_string()))
    }
}

/// Per-file payload plus open-ended front-matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRecord {
    fields: IndexMap<String, FieldValue>,
}

impl FileRecord {
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        let mut record = Self::default();
        record.set_contents(contents);
        record
    }

    /// Adds a front-matter field, builder style.
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn contents(&self) -> &[u8] {
        match self.fields.get(fields::CONTENTS) {
            Some(FieldValue::Buffer(bytes)) => bytes,
            Some(FieldValue::Value(Value::String(s))) => s.as_bytes(),
            _ => &[],
        }
    }

    pub fn set_contents(&mut self, contents: impl Into<Vec<u8>>) {
        self.insert(fields::CONTENTS, FieldValue::Buffer(contents.into()));
    }

    pub fn raw_contents(&self) -> Option<&[u8]> {
        match self.fields.get(fields::RAW_CONTENTS) {
            Some(FieldValue::Buffer(bytes)) => Some(bytes),
            _ => None,
        }
    }

    pub fn set_raw_contents(&mut self, contents: Vec<u8>) {
        self.insert(fields::RAW_CONTENTS, FieldValue::Buffer(contents));
    }

    /// Template override from front-matter, if it is a non-empty string.
    pub fn rtemplate(&self) -> Option<&str> {
        match self.fields.get(fields::RTEMPLATE) {
            Some(FieldValue::Value(Value::String(s))) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// JSON snapshot of the props the record was rendered with.
    pub fn props(&self) -> Option<&str> {
        match self.fields.get(fields::PROPS) {
            Some(FieldValue::Value(Value::String(s))) => Some(s),
            _ => None,
        }
    }

    pub fn set_props(&mut self, props_json: String) {
        self.insert(fields::PROPS, FieldValue::Value(Value::String(props_json)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contents_round_trip_as_buffer() {
        let mut record = FileRecord::new("# Hello");
        assert_eq!(record.contents(), b"# Hello");
        record.set_contents("<h1>Hello</h1>");
        assert_eq!(record.contents(), b"<h1>Hello</h1>");
        assert!(matches!(record.get("contents"), Some(FieldValue::Buffer(_))));
    }

    #[test]
    fn rtemplate_ignores_non_strings() {
        let record = FileRecord::new("").with_field("rtemplate", json!(42));
        assert_eq!(record.rtemplate(), None);

        let record = FileRecord::new("").with_field("rtemplate", "");
        assert_eq!(record.rtemplate(), None);

        let record = FileRecord::new("").with_field("rtemplate", "post.html");
        assert_eq!(record.rtemplate(), Some("post.html"));
    }

    #[test]
    fn field_text_forms() {
        assert_eq!(FieldValue::Buffer(b"abc".to_vec()).to_text(), "abc");
        assert_eq!(FieldValue::from("plain").to_text(), "plain");
        assert_eq!(FieldValue::from(json!([1, 2])).to_text(), "[1,2]");
        assert_eq!(FieldValue::Buffer(b"abc".to_vec()).to_json(), json!("abc"));
    }

    #[test]
    fn raw_contents_absent_until_set() {
        let mut record = FileRecord::new("body");
        assert!(record.raw_contents().is_none());
        record.set_raw_contents(b"body".to_vec());
        assert_eq!(record.raw_contents(), Some(&b"body"[..]));
    }
}
