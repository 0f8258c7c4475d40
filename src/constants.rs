//! Constants used throughout kiln

/// Site configuration file names in order of preference
pub const CONFIG_FILENAMES: &[&str] = &["kiln.json", "kiln.yaml", "kiln.yml"];

/// Default template used when a file has no `rtemplate` field
pub const DEFAULT_TEMPLATE: &str = "default.html";

/// Default template directory, relative to the site root
pub const DEFAULT_DIRECTORY: &str = "templates";

/// Default file selection pattern
pub const DEFAULT_PATTERN: &str = "**/*";

/// Default site source directory
pub const DEFAULT_SOURCE: &str = "src";

/// Default site destination directory
pub const DEFAULT_DESTINATION: &str = "build";

/// Extension given to processed files when renaming is enabled
pub const HTML_EXTENSION: &str = "html";

/// Front-matter fence
pub const FRONT_MATTER_FENCE: &str = "---";

/// Record fields the pipeline reads or writes
pub mod fields {
    pub const CONTENTS: &str = "contents";
    pub const RAW_CONTENTS: &str = "rawContents";
    pub const RTEMPLATE: &str = "rtemplate";
    pub const PROPS: &str = "props";
}

/// Exit codes
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
