use log::warn;
use regex::Regex;
use std::collections::HashMap;

// Re-export all the case conversion and string manipulation functions
pub use cruet::{
    case::{
        camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
        screaming_snake::to_screaming_snake_case, snake::to_snake_case,
        table::to_table_case, train::to_train_case,
    },
    string::{pluralize::to_plural, singularize::to_singular},
};

/// String filters shared by every engine, by name.
pub const STRING_FILTERS: &[(&str, fn(&str) -> String)] = &[
    ("camel_case", to_camel_case),
    ("kebab_case", to_kebab_case),
    ("pascal_case", to_pascal_case),
    ("screaming_snake_case", to_screaming_snake_case),
    ("snake_case", to_snake_case),
    ("table_case", to_table_case),
    ("train_case", to_train_case),
    ("plural", to_plural),
    ("singular", to_singular),
];

/// Custom regex filter for template processing.
///
/// Tests if a string matches a given regular expression pattern.
///
/// # Arguments
/// * `val` - The string to test
/// * `re` - The regular expression pattern
///
/// # Returns
/// * `bool` - True if the string matches the pattern, false otherwise
pub fn regex_filter(val: &str, re: &str) -> bool {
    match Regex::new(re) {
        Ok(re) => re.is_match(val),
        Err(err) => {
            warn!("Invalid regex '{re}': {err}");
            false
        }
    }
}

/// Adapts a string filter to Tera's filter signature.
pub fn tera_string_filter(
    name: &'static str,
    filter: fn(&str) -> String,
) -> impl Fn(&tera::Value, &HashMap<String, tera::Value>) -> tera::Result<tera::Value>
       + Send
       + Sync {
    move |value, _args| {
        let s = value
            .as_str()
            .ok_or_else(|| tera::Error::msg(format!("{name} filter expects a string")))?;
        Ok(tera::Value::String(filter(s)))
    }
}

/// Tera form of [`regex_filter`], taking the pattern as `pattern=`.
pub fn tera_regex_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("regex filter expects a string"))?;
    let pattern = args
        .get("pattern")
        .and_then(tera::Value::as_str)
        .ok_or_else(|| tera::Error::msg("regex filter expects a `pattern` argument"))?;
    Ok(tera::Value::Bool(regex_filter(s, pattern)))
}
