use crate::{error::Result, props::Props};
use std::path::Path;
use std::sync::Arc;

/// A template that has been loaded and compiled, ready to render props.
pub trait CompiledTemplate: Send + Sync {
    /// Renders the template.
    ///
    /// # Arguments
    /// * `props` - Props merged from site metadata and the file record
    ///
    /// # Returns
    /// * `Result<String>` - Rendered markup
    fn render(&self, props: &Props) -> Result<String>;
}

/// Strategy that turns template files into renderable templates.
pub trait TemplateCompiler: Send + Sync {
    /// Loads and compiles a template.
    ///
    /// # Arguments
    /// * `template_root` - Directory the template and its includes resolve against
    /// * `name` - `/`-separated template name relative to `template_root`
    ///
    /// # Returns
    /// * `Result<Arc<dyn CompiledTemplate>>` - The compiled template
    fn compile(&self, template_root: &Path, name: &str) -> Result<Arc<dyn CompiledTemplate>>;
}
