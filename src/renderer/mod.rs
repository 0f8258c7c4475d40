//! Template-compilation strategies.
//!
//! - `interface`: the strategy traits the pipeline renders through
//! - `minijinja`: default strategy
//! - `tera`: alternate strategy
//! - `cache`: per-pipeline memoization of compiled templates
//! - `filters`: filters registered in every engine

pub mod cache;
pub mod filters;
pub mod interface;
pub mod minijinja;
pub mod tera;

pub use self::cache::TemplateCache;
pub use self::interface::{CompiledTemplate, TemplateCompiler};
pub use self::minijinja::MiniJinjaCompiler;
pub use self::tera::TeraCompiler;

use crate::config::{Engine, Options};
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// Builds the compilation strategy named by `options.engine`.
pub fn compiler_for(options: &Options) -> Result<Arc<dyn TemplateCompiler>> {
    let ignored = options.ignored_extensions();
    let compiler: Arc<dyn TemplateCompiler> = match options.engine {
        Engine::MiniJinja => Arc::new(MiniJinjaCompiler::from_tooling(&options.tooling, ignored)?),
        Engine::Tera => Arc::new(TeraCompiler::from_tooling(&options.tooling, ignored)?),
    };
    Ok(compiler)
}

/// Whether a template name ends in one of the extensions that load as empty.
pub(crate) fn has_ignored_extension(name: &str, ignored: &[String]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ignored.iter().any(|ignored| ignored == ext))
}
