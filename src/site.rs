use crate::constants::FRONT_MATTER_FENCE;
use crate::error::{Error, Result};
use crate::file::{FileMap, FileRecord};
use log::debug;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Splits a leading YAML front-matter block from `text`.
///
/// The block must open with a `---` line at the very start and close with
/// another `---` line. Returns the parsed fields (if any) and the body.
pub fn split_front_matter(
    text: &str,
) -> Result<(Option<serde_yaml::Mapping>, &str), serde_yaml::Error> {
    let Some(rest) = text
        .strip_prefix(FRONT_MATTER_FENCE)
        .and_then(|rest| rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')))
    else {
        return Ok((None, text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let fields = if yaml.trim().is_empty() {
                serde_yaml::Mapping::new()
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok((Some(fields), body));
        }
        offset += line.len();
    }

    Ok((None, text))
}

/// Builds a record from a source file's bytes, lifting front-matter into fields.
pub fn parse_record(rel_path: &str, bytes: Vec<u8>) -> Result<FileRecord> {
    let Ok(text) = std::str::from_utf8(&bytes) else {
        return Ok(FileRecord::new(bytes));
    };

    let (fields, body) = split_front_matter(text).map_err(|e| Error::FrontMatterError {
        path: rel_path.to_string(),
        message: e.to_string(),
    })?;
    let Some(fields) = fields else {
        return Ok(FileRecord::new(text));
    };

    let mut record = FileRecord::new(body);
    for (name, value) in fields {
        let Some(name) = name.as_str() else {
            continue;
        };
        record.insert(name, serde_json::to_value(value)?);
    }
    Ok(record)
}

/// Reads every file under `source_dir` into a map keyed by relative path.
pub fn read_source<P: AsRef<Path>>(source_dir: P) -> Result<FileMap> {
    let source_dir = source_dir.as_ref();
    let mut files = FileMap::new();

    for dir_entry in WalkDir::new(source_dir).sort_by_file_name() {
        let dir_entry = dir_entry.map_err(|e| Error::Other(e.into()))?;
        if !dir_entry.file_type().is_file() {
            continue;
        }
        let rel_path = dir_entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| Error::Other(e.into()))?
            .to_string_lossy()
            .replace('\\', "/");
        debug!("Reading source file: {rel_path}");
        let record = parse_record(&rel_path, fs::read(dir_entry.path())?)?;
        files.insert(rel_path, record);
    }

    Ok(files)
}

/// Writes each record's contents under `destination`, creating parent
/// directories as needed.
pub fn write_destination<P: AsRef<Path>>(destination: P, files: &FileMap) -> Result<()> {
    let destination = destination.as_ref();
    for (rel_path, record) in files {
        let dest_path = destination.join(rel_path);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("Writing '{}'", dest_path.display());
        fs::write(&dest_path, record.contents())?;
    }
    Ok(())
}
