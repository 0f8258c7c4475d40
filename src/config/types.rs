//! Basic types and enums for configuration

use crate::constants::{DEFAULT_DIRECTORY, DEFAULT_PATTERN, DEFAULT_TEMPLATE};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Template-compilation strategy used to render files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// MiniJinja templates
    #[default]
    MiniJinja,
    /// Tera templates
    Tera,
}

/// One glob pattern or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Patterns {
    One(String),
    Many(Vec<String>),
}

impl Patterns {
    pub fn as_vec(&self) -> Vec<&str> {
        match self {
            Patterns::One(pattern) => vec![pattern.as_str()],
            Patterns::Many(patterns) => patterns.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Patterns::One(DEFAULT_PATTERN.to_string())
    }
}

impl From<&str> for Patterns {
    fn from(pattern: &str) -> Self {
        Patterns::One(pattern.to_string())
    }
}

impl From<Vec<&str>> for Patterns {
    fn from(patterns: Vec<&str>) -> Self {
        Patterns::Many(patterns.into_iter().map(str::to_string).collect())
    }
}

/// JavaScript-like truthiness for loosely typed flags.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accepts any value for a boolean option and coerces it by truthiness.
pub fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

pub fn get_default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

pub fn get_default_directory() -> String {
    DEFAULT_DIRECTORY.to_string()
}

pub fn get_default_html() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_engine_deserialize() {
        let engine: Engine = serde_json::from_str(r#""minijinja""#).unwrap();
        assert_eq!(engine, Engine::MiniJinja);
        let engine: Engine = serde_json::from_str(r#""tera""#).unwrap();
        assert_eq!(engine, Engine::Tera);
    }

    #[test]
    fn test_patterns_one_or_many() {
        let one: Patterns = serde_json::from_str(r#""*.md""#).unwrap();
        assert_eq!(one.as_vec(), vec!["*.md"]);
        let many: Patterns = serde_json::from_str(r#"["**/*.md", "!drafts/**"]"#).unwrap();
        assert_eq!(many.as_vec(), vec!["**/*.md", "!drafts/**"]);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("no")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
