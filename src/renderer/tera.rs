use super::filters::{tera_regex_filter, tera_string_filter, STRING_FILTERS};
use super::has_ignored_extension;
use crate::{
    error::Result,
    props::Props,
    renderer::interface::{CompiledTemplate, TemplateCompiler},
};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tera::{Context, Tera};

/// Suffixes Tera escapes by default.
const DEFAULT_ESCAPE_SUFFIXES: &[&str] = &[".html", ".htm", ".xml"];

static REFERENCE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%-?\s*(?:extends|include|import)\s+([^%]*?)-?%\}").expect("valid tag regex")
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']+)["']"#).expect("valid quoted regex"));

/// Which templates get their output HTML-escaped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Autoescape {
    /// `true` escapes `.html`, `.htm` and `.xml` templates
    Enabled(bool),
    /// Escape templates whose name ends with one of these suffixes
    Suffixes(Vec<String>),
}

impl Default for Autoescape {
    fn default() -> Self {
        Autoescape::Suffixes(Vec::new())
    }
}

impl Autoescape {
    /// Whether rendering `name` escapes interpolated values.
    pub fn applies_to(&self, name: &str) -> bool {
        match self {
            Autoescape::Enabled(enabled) => {
                *enabled && DEFAULT_ESCAPE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
            }
            Autoescape::Suffixes(suffixes) => suffixes
                .iter()
                .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str())),
        }
    }
}

/// Settings read from the `tooling` option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeraTooling {
    pub autoescape: Autoescape,
}

/// Names of the templates `source` pulls in through `extends`, `include` or `import`.
fn referenced_templates(source: &str) -> Vec<String> {
    REFERENCE_TAG
        .captures_iter(source)
        .flat_map(|tag| {
            QUOTED
                .captures_iter(tag.get(1).map_or("", |m| m.as_str()))
                .map(|quoted| quoted[1].to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Tera-based template compilation strategy.
///
/// Each compiled template owns a Tera instance holding the target and the
/// templates it reaches through `extends`, `include` and `import`, resolved
/// against the template root. Other files under the root are never parsed.
/// Names with an ignored extension are registered as empty templates.
pub struct TeraCompiler {
    tooling: TeraTooling,
    ignored: Vec<String>,
}

impl TeraCompiler {
    pub fn new(tooling: TeraTooling, ignored_extensions: Vec<String>) -> Self {
        Self { tooling, ignored: ignored_extensions }
    }

    /// Builds the compiler from the opaque `tooling` option.
    pub fn from_tooling(
        tooling: &serde_json::Value,
        ignored_extensions: Vec<String>,
    ) -> Result<Self> {
        let tooling = if tooling.is_null() {
            TeraTooling::default()
        } else {
            serde_json::from_value(tooling.clone())?
        };
        Ok(Self::new(tooling, ignored_extensions))
    }

    /// Collects `(name, source)` pairs for the target and every template it reaches.
    ///
    /// A referenced file that does not exist is left out, so Tera reports it
    /// (or skips it for `ignore missing` includes).
    fn collect_sources(&self, template_root: &Path, name: &str) -> Result<Vec<(String, String)>> {
        let mut sources = Vec::new();
        let mut seen = HashSet::from([name.to_string()]);
        let mut pending = vec![(
            name.to_string(),
            std::fs::read_to_string(template_root.join(name))?,
        )];

        while let Some((current, source)) = pending.pop() {
            for reference in referenced_templates(&source) {
                if !seen.insert(reference.clone()) {
                    continue;
                }
                if has_ignored_extension(&reference, &self.ignored) {
                    debug!("Registering '{reference}' as an empty template");
                    sources.push((reference, String::new()));
                    continue;
                }
                match std::fs::read_to_string(template_root.join(&reference)) {
                    Ok(body) => pending.push((reference, body)),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                        debug!("'{current}' references missing template '{reference}'");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            sources.push((current, source));
        }

        Ok(sources)
    }
}

impl TemplateCompiler for TeraCompiler {
    fn compile(&self, template_root: &Path, name: &str) -> Result<Arc<dyn CompiledTemplate>> {
        let name = name.replace('\\', "/");
        let sources = self.collect_sources(template_root, &name)?;
        debug!("Compiling '{name}' with {} Tera template(s)", sources.len());

        let mut tera = Tera::default();
        // Tera picks escaping by the rendered template's name; "" matches any name
        if self.tooling.autoescape.applies_to(&name) {
            tera.autoescape_on(vec![""]);
        } else {
            tera.autoescape_on(vec![]);
        }
        for (filter_name, filter) in STRING_FILTERS {
            tera.register_filter(filter_name, tera_string_filter(*filter_name, *filter));
        }
        tera.register_filter("regex", tera_regex_filter);
        tera.add_raw_templates(sources)?;

        Ok(Arc::new(TeraTemplate { tera, name }))
    }
}

struct TeraTemplate {
    tera: Tera,
    name: String,
}

impl CompiledTemplate for TeraTemplate {
    fn render(&self, props: &Props) -> Result<String> {
        let context = Context::from_serialize(props)?;
        Ok(self.tera.render(&self.name, &context)?)
    }
}
