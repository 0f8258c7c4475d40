/// Handles argument parsing and the `kiln build` driver.
pub mod cli;

/// Stage options and site configuration.
pub mod config;

/// Constants shared across modules.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// File records and the per-pass file map.
pub mod file;

/// Base-layout token substitution.
pub mod layout;

/// The per-pass rendering stage.
pub mod pipeline;

/// Props merged from metadata and front-matter.
pub mod props;

/// Template-compilation strategies.
pub mod renderer;

/// Glob-based file selection.
pub mod select;

/// Reading a site's source files and writing its output.
pub mod site;

pub use config::Options;
pub use error::{Error, Result};
pub use file::{FieldValue, FileMap, FileRecord, Metadata};
pub use pipeline::{PassSummary, Pipeline, Site};
