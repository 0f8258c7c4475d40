use crate::error::{Error, Result};
use crate::file::FileRecord;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_$][A-Za-z0-9_$-]*)\s*\}\}").expect("valid token regex")
});

/// Replaces `{{name}}` tokens in `base` with the record's field of that name.
///
/// Literal substitution in a single pass: inserted text is never rescanned
/// and tokens naming unknown fields are left as they are.
pub fn substitute(base: &str, record: &FileRecord) -> String {
    TOKEN
        .replace_all(base, |caps: &Captures| match record.get(&caps[1]) {
            Some(value) => value.to_text(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Reads the base layout and wraps the record's contents in it.
pub fn apply_base_file(base_file: &Path, record: &mut FileRecord) -> Result<()> {
    let base = std::fs::read_to_string(base_file).map_err(|source| Error::BaseFileError {
        path: base_file.display().to_string(),
        source,
    })?;
    let wrapped = substitute(&base, record);
    record.set_contents(wrapped);
    Ok(())
}
