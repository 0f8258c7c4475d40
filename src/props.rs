use crate::constants::fields;
use crate::file::{FileRecord, Metadata};
use log::debug;
use serde_json::Value;

/// Merged data handed to a template at render time.
pub type Props = serde_json::Map<String, Value>;

/// Builds the props for one file.
///
/// Precedence from low to high: site metadata, the record's own fields, then
/// `contents` as a string. Buffer values are decoded to strings.
pub fn build_props(record: &FileRecord, metadata: &Metadata) -> Props {
    let mut props = metadata.clone();
    for (name, value) in record.fields() {
        props.insert(name.clone(), value.to_json());
    }
    props.insert(
        fields::CONTENTS.to_string(),
        Value::String(String::from_utf8_lossy(record.contents()).into_owned()),
    );
    debug!("Built {} props", props.len());
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn record_fields_win_over_metadata() {
        let record = FileRecord::new("body").with_field("title", "A");
        let props = build_props(&record, &metadata(json!({"title": "B", "site": "X"})));
        assert_eq!(props["title"], json!("A"));
        assert_eq!(props["site"], json!("X"));
    }

    #[test]
    fn contents_is_always_a_string() {
        let record = FileRecord::new("Hello");
        let props = build_props(&record, &metadata(json!({"contents": 12})));
        assert_eq!(props["contents"], json!("Hello"));
    }

    #[test]
    fn buffers_are_decoded() {
        let record = FileRecord::new("x").with_field("excerpt", b"short".to_vec());
        let props = build_props(&record, &Metadata::new());
        assert_eq!(props["excerpt"], json!("short"));
    }

    #[test]
    fn nested_values_are_kept_whole() {
        let record = FileRecord::new("x").with_field("author", json!({"name": "Ada"}));
        let props = build_props(&record, &metadata(json!({"author": {"email": "a@b"}})));
        assert_eq!(props["author"], json!({"name": "Ada"}));
    }
}
