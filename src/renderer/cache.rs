use super::interface::{CompiledTemplate, TemplateCompiler};
use crate::error::Result;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Memoizes compiled templates by resolved path.
///
/// Lives as long as the pipeline that owns it. Failed compiles are not
/// cached, so a fixed template is picked up on the next pass.
pub struct TemplateCache {
    compiler: Arc<dyn TemplateCompiler>,
    compiled: RwLock<HashMap<PathBuf, Arc<dyn CompiledTemplate>>>,
}

impl TemplateCache {
    pub fn new(compiler: Arc<dyn TemplateCompiler>) -> Self {
        Self { compiler, compiled: RwLock::new(HashMap::new()) }
    }

    /// Returns the compiled template for `template_root/name`, compiling it
    /// on first use.
    pub fn get(&self, template_root: &Path, name: &str) -> Result<Arc<dyn CompiledTemplate>> {
        let key = template_root.join(name);
        if let Some(template) =
            self.compiled.read().unwrap_or_else(PoisonError::into_inner).get(&key)
        {
            return Ok(template.clone());
        }

        debug!("Compiling template: {}", key.display());
        let template = self.compiler.compile(template_root, name)?;
        Ok(self
            .compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(template)
            .clone())
    }

    /// Number of templates compiled so far.
    pub fn len(&self) -> usize {
        self.compiled.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
