//! Configuration loading and management

use crate::config::types::{
    deserialize_truthy, get_default_directory, get_default_html, get_default_template,
    Engine, Patterns,
};
use crate::constants::{CONFIG_FILENAMES, DEFAULT_DESTINATION, DEFAULT_SOURCE};
use crate::error::{Error, Result};
use crate::file::Metadata;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Options of the rendering stage. Missing fields fall back to defaults and
/// unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Layout file, relative to `directory`
    pub base_file: Option<String>,
    /// Template used when a file carries no `rtemplate`
    pub default_template: String,
    /// Template root, relative to the site root
    pub directory: String,
    /// Rename processed files to `.html`
    #[serde(deserialize_with = "deserialize_truthy")]
    pub html: bool,
    pub pattern: Patterns,
    /// Keep the pre-render contents as `rawContents`
    #[serde(deserialize_with = "deserialize_truthy")]
    pub preserve: bool,
    /// Extensions that load as empty templates
    pub require_ignore_ext: Vec<String>,
    pub engine: Engine,
    /// Engine-specific settings, passed through untouched
    pub tooling: serde_json::Value,
    /// Upper bound on files rendered at the same time
    pub concurrency: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_file: None,
            default_template: get_default_template(),
            directory: get_default_directory(),
            html: get_default_html(),
            pattern: Patterns::default(),
            preserve: false,
            require_ignore_ext: Vec::new(),
            engine: Engine::default(),
            tooling: serde_json::Value::Null,
            concurrency: None,
        }
    }
}

impl Options {
    /// Ignored extensions without their leading dot.
    pub fn ignored_extensions(&self) -> Vec<String> {
        self.require_ignore_ext
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    /// Number of render workers; zero or unset means one per available core.
    pub fn worker_count(&self) -> usize {
        self.concurrency.filter(|n| *n > 0).unwrap_or_else(|| {
            std::thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
        })
    }
}

/// A site description read by the `kiln` binary.
#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "get_default_source")]
    pub source: PathBuf,
    #[serde(default = "get_default_destination")]
    pub destination: PathBuf,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub render: Options,
}

impl SiteConfig {
    pub fn load_config<P: AsRef<Path>>(site_root: P) -> Result<Self> {
        let site_root = site_root.as_ref();

        for config_file_name in CONFIG_FILENAMES.iter() {
            let config_file_path = site_root.join(config_file_name);

            if config_file_path.exists() {
                log::debug!("Loading site configuration: {}", config_file_path.display());
                let content = std::fs::read_to_string(config_file_path)?;
                let config: SiteConfig = match *config_file_name {
                    "kiln.json" => serde_json::from_str(&content)?,
                    "kiln.yaml" | "kiln.yml" => serde_yaml::from_str(&content)?,
                    _ => unreachable!(),
                };

                return Ok(config);
            }
        }

        Err(Error::ConfigNotFound {
            site_dir: site_root.display().to_string(),
            config_files: CONFIG_FILENAMES.join(", "),
        })
    }
}

fn get_default_source() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE)
}

fn get_default_destination() -> PathBuf {
    PathBuf::from(DEFAULT_DESTINATION)
}
