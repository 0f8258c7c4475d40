#![allow(dead_code)]

use kiln::error::{Error, Result};
use kiln::props::Props;
use kiln::renderer::{CompiledTemplate, TemplateCompiler};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

/// Compiler that renders `<name>|<contents>` and fails for names listed in `failing`.
///
/// With a `gate`, every render waits on the barrier first, so that many
/// renders are in flight at once.
#[derive(Default)]
pub struct EchoCompiler {
    pub compiles: AtomicUsize,
    pub failing: Vec<String>,
    pub gate: Option<Arc<Barrier>>,
}

impl EchoCompiler {
    pub fn failing_on(names: &[&str]) -> Self {
        Self { failing: names.iter().map(|n| n.to_string()).collect(), ..Self::default() }
    }

    /// Holds each render until `renders` of them have started.
    pub fn gated(mut self, renders: usize) -> Self {
        self.gate = Some(Arc::new(Barrier::new(renders)));
        self
    }

    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }
}

struct EchoTemplate {
    name: String,
    fail: bool,
    gate: Option<Arc<Barrier>>,
}

impl CompiledTemplate for EchoTemplate {
    fn render(&self, props: &Props) -> Result<String> {
        if let Some(gate) = &self.gate {
            gate.wait();
        }
        if self.fail {
            return Err(Error::Other(anyhow::anyhow!("boom in {}", self.name)));
        }
        let contents = props.get("contents").and_then(|v| v.as_str()).unwrap_or_default();
        Ok(format!("{}|{}", self.name, contents))
    }
}

impl TemplateCompiler for EchoCompiler {
    fn compile(&self, _template_root: &Path, name: &str) -> Result<Arc<dyn CompiledTemplate>> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(EchoTemplate {
            name: name.to_string(),
            fail: self.failing.iter().any(|failing| failing == name),
            gate: self.gate.clone(),
        }))
    }
}

/// Writes `contents` to `root/rel_path`, creating parent directories.
pub fn write_file(root: &Path, rel_path: &str, contents: &str) {
    let path = root.join(rel_path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}
