use super::filters::{regex_filter, STRING_FILTERS};
use super::has_ignored_extension;
use crate::{
    error::Result,
    props::Props,
    renderer::interface::{CompiledTemplate, TemplateCompiler},
};
use log::debug;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Settings read from the `tooling` option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MiniJinjaTooling {
    pub trim_blocks: bool,
    pub lstrip_blocks: bool,
    pub keep_trailing_newline: bool,
    /// HTML-escape interpolated values
    pub autoescape: bool,
    /// Fail on undefined variables instead of rendering them empty
    pub strict: bool,
}

/// MiniJinja-based template compilation strategy.
///
/// Holds one environment per template root. Templates load lazily through
/// the environment's loader, so `{% include %}`, `{% extends %}` and
/// `{% import %}` resolve against the same root, and names with an ignored
/// extension load as empty templates.
pub struct MiniJinjaCompiler {
    tooling: MiniJinjaTooling,
    ignored: Arc<Vec<String>>,
    environments: RwLock<HashMap<PathBuf, Arc<Environment<'static>>>>,
}

impl MiniJinjaCompiler {
    pub fn new(tooling: MiniJinjaTooling, ignored_extensions: Vec<String>) -> Self {
        Self {
            tooling,
            ignored: Arc::new(ignored_extensions),
            environments: RwLock::new(HashMap::new()),
        }
    }

    /// Builds the compiler from the opaque `tooling` option.
    pub fn from_tooling(
        tooling: &serde_json::Value,
        ignored_extensions: Vec<String>,
    ) -> Result<Self> {
        let tooling = if tooling.is_null() {
            MiniJinjaTooling::default()
        } else {
            serde_json::from_value(tooling.clone())?
        };
        Ok(Self::new(tooling, ignored_extensions))
    }

    fn environment(&self, template_root: &Path) -> Arc<Environment<'static>> {
        if let Some(env) = self
            .environments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(template_root)
        {
            return env.clone();
        }

        let env = Arc::new(self.build_environment(template_root.to_path_buf()));
        self.environments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(template_root.to_path_buf())
            .or_insert(env)
            .clone()
    }

    fn build_environment(&self, template_root: PathBuf) -> Environment<'static> {
        debug!("Creating MiniJinja environment for {}", template_root.display());
        let mut env = Environment::new();

        for (name, filter) in STRING_FILTERS {
            env.add_filter(*name, *filter);
        }
        env.add_filter("regex", regex_filter);

        env.set_trim_blocks(self.tooling.trim_blocks);
        env.set_lstrip_blocks(self.tooling.lstrip_blocks);
        env.set_keep_trailing_newline(self.tooling.keep_trailing_newline);
        let auto_escape =
            if self.tooling.autoescape { AutoEscape::Html } else { AutoEscape::None };
        env.set_auto_escape_callback(move |_| auto_escape.clone());
        if self.tooling.strict {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }

        let ignored = self.ignored.clone();
        env.set_loader(move |name| {
            if has_ignored_extension(name, &ignored) {
                debug!("Loading '{name}' as an empty template");
                return Ok(Some(String::new()));
            }
            match std::fs::read_to_string(template_root.join(name)) {
                Ok(source) => Ok(Some(source)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template '{name}'"),
                )
                .with_source(err)),
            }
        });

        env
    }
}

impl TemplateCompiler for MiniJinjaCompiler {
    fn compile(&self, template_root: &Path, name: &str) -> Result<Arc<dyn CompiledTemplate>> {
        // Normalize the template name for cross-platform compatibility
        let name = name.replace('\\', "/");
        let env = self.environment(template_root);
        // Loading parses the template, surfacing syntax errors here
        env.get_template(&name)?;
        Ok(Arc::new(MiniJinjaTemplate { env, name }))
    }
}

struct MiniJinjaTemplate {
    env: Arc<Environment<'static>>,
    name: String,
}

impl CompiledTemplate for MiniJinjaTemplate {
    fn render(&self, props: &Props) -> Result<String> {
        let tmpl = self.env.get_template(&self.name)?;
        Ok(tmpl.render(props)?)
    }
}
