//! The rendering stage run once per build pass.
//!
//! Each selected file goes through
//! `pending -> props built -> rendered -> (layout applied)? -> (renamed)? -> done`
//! on a bounded worker pool. Workers only read the file map and hand back
//! a [`FileOutcome`]; the calling thread applies the outcomes, so renames
//! never race with other workers.

use crate::config::Options;
use crate::constants::HTML_EXTENSION;
use crate::error::{Error, Result};
use crate::file::{FileMap, FileRecord, Metadata};
use crate::layout::apply_base_file;
use crate::props::build_props;
use crate::renderer::{compiler_for, TemplateCache, TemplateCompiler};
use crate::select::select_keys;
use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// What the build engine provides to a pass: the site root that relative
/// paths resolve against and the site-wide metadata.
#[derive(Debug, Clone, Default)]
pub struct Site {
    root: PathBuf,
    metadata: Metadata,
}

impl Site {
    pub fn new(root: impl Into<PathBuf>, metadata: Metadata) -> Self {
        Self { root: root.into(), metadata }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Joins `parts` onto the site root.
    pub fn path<I, P>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        parts.into_iter().fold(self.root.clone(), |path, part| path.join(part))
    }
}

/// Result of processing one file.
#[derive(Debug)]
pub enum FileOutcome {
    Rendered { key: String, new_key: String, record: FileRecord },
    Failed { key: String, error: Error, seq: usize },
    /// Not started because an earlier file had already failed.
    Skipped { key: String },
}

/// Counts reported for a successful pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub rendered: usize,
    pub renamed: usize,
}

/// Renames `a/b/post.md` to `a/b/post.html` and `index.md` to `index.html`.
pub fn html_path(key: &str) -> String {
    let path = Path::new(key);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{stem}.{HTML_EXTENSION}");
    match key.rfind('/') {
        Some(idx) if idx > 0 => format!("{}/{}", &key[..idx], file_name),
        _ => file_name,
    }
}

pub struct Pipeline {
    options: Options,
    templates: TemplateCache,
    workers: rayon::ThreadPool,
}

impl Pipeline {
    /// Creates a pipeline using the compilation strategy named by `options.engine`.
    pub fn new(options: Options) -> Result<Self> {
        let compiler = compiler_for(&options)?;
        Self::with_compiler(options, compiler)
    }

    /// Creates a pipeline that compiles templates with `compiler`.
    pub fn with_compiler(options: Options, compiler: Arc<dyn TemplateCompiler>) -> Result<Self> {
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(options.worker_count())
            .thread_name(|i| format!("kiln-render-{i}"))
            .build()?;
        Ok(Self { options, templates: TemplateCache::new(compiler), workers })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn templates(&self) -> &TemplateCache {
        &self.templates
    }

    /// Renders every selected file of `files` in place.
    ///
    /// Returns the first failure in completion order. Files not yet started
    /// when a failure is seen are left untouched; files already in flight
    /// finish and their results are kept.
    pub fn run(&self, site: &Site, files: &mut FileMap) -> Result<PassSummary> {
        let keys = select_keys(files.keys(), &self.options.pattern.as_vec());
        info!("Rendering {} of {} file(s)", keys.len(), files.len());

        let template_root = site.path([&self.options.directory]);
        debug!(
            "Resolving templates under {} (site root {})",
            template_root.display(),
            site.root().display()
        );
        let failed = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);

        let outcomes: Vec<FileOutcome> = {
            let files = &*files;
            self.workers.install(|| {
                keys.par_iter()
                    .map(|key| {
                        if failed.load(Ordering::SeqCst) {
                            return FileOutcome::Skipped { key: key.clone() };
                        }
                        let outcome = match files.get(key) {
                            Some(record) => {
                                self.process_file(key, record, site.metadata(), &template_root)
                            }
                            None => Err(Error::Other(anyhow::anyhow!("file '{key}' vanished"))),
                        };
                        let seq = completed.fetch_add(1, Ordering::SeqCst);
                        match outcome {
                            Ok((new_key, record)) => {
                                FileOutcome::Rendered { key: key.clone(), new_key, record }
                            }
                            Err(error) => {
                                failed.store(true, Ordering::SeqCst);
                                FileOutcome::Failed { key: key.clone(), error, seq }
                            }
                        }
                    })
                    .collect()
            })
        };

        self.apply(files, outcomes)
    }

    /// Applies worker outcomes to the map and picks the pass result.
    fn apply(&self, files: &mut FileMap, outcomes: Vec<FileOutcome>) -> Result<PassSummary> {
        let mut summary = PassSummary::default();
        let mut first_failure: Option<(usize, Error)> = None;
        let mut skipped = 0;
        let mut failed = 0;

        for outcome in outcomes {
            match outcome {
                FileOutcome::Rendered { key, new_key, record } => {
                    summary.rendered += 1;
                    if new_key == key {
                        files.insert(key, record);
                        continue;
                    }
                    debug!("Renaming file: {key} -> {new_key}");
                    summary.renamed += 1;
                    match files.get_index_of(&key) {
                        Some(idx) => {
                            files.shift_remove_index(idx);
                            // an existing entry under the new key is replaced, and
                            // the renamed record keeps the old key's place
                            let mut position = idx;
                            if let Some(existing) = files.get_index_of(&new_key) {
                                files.shift_remove_index(existing);
                                if existing < position {
                                    position -= 1;
                                }
                            }
                            files.shift_insert(position, new_key, record);
                        }
                        None => {
                            files.insert(new_key, record);
                        }
                    }
                }
                FileOutcome::Failed { key, error, seq } => {
                    log::error!("Failed to render '{key}': {error}");
                    failed += 1;
                    if first_failure.as_ref().map_or(true, |(first, _)| seq < *first) {
                        first_failure = Some((seq, error));
                    }
                }
                FileOutcome::Skipped { key } => {
                    debug!("Skipped file after an earlier failure: {key}");
                    skipped += 1;
                }
            }
        }

        info!(
            "Rendered {} file(s), renamed {}, failed {failed}, skipped {skipped}",
            summary.rendered, summary.renamed
        );
        match first_failure {
            Some((_, error)) => Err(error),
            None => Ok(summary),
        }
    }

    /// Runs one file through props, render, layout and rename.
    fn process_file(
        &self,
        key: &str,
        record: &FileRecord,
        metadata: &Metadata,
        template_root: &Path,
    ) -> Result<(String, FileRecord)> {
        let mut record = record.clone();

        debug!("Preparing Props: {key}");
        let props = build_props(&record, metadata);

        if self.options.preserve {
            debug!("Preserving untouched contents: {key}");
            record.set_raw_contents(record.contents().to_vec());
        }

        debug!("Starting conversion: {key}");
        let template_name =
            record.rtemplate().unwrap_or(self.options.default_template.as_str()).to_string();
        let rendered = self
            .templates
            .get(template_root, &template_name)
            .and_then(|template| template.render(&props))
            .map_err(|e| Error::RenderError {
                template: template_root.join(&template_name).display().to_string(),
                message: e.to_string(),
            })?;

        record.set_contents(rendered);
        record.set_props(serde_json::to_string(&props)?);

        if let Some(base_file) = &self.options.base_file {
            debug!("Applying baseFile to contents: {key}");
            apply_base_file(&template_root.join(base_file), &mut record)?;
        }

        let new_key = if self.options.html { html_path(key) } else { key.to_string() };
        debug!("Saved file: {key}");
        Ok((new_key, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_path_keeps_directory_prefix() {
        assert_eq!(html_path("a/b/post.md"), "a/b/post.html");
        assert_eq!(html_path("index.md"), "index.html");
        assert_eq!(html_path("notes"), "notes.html");
        assert_eq!(html_path("a/archive.tar.gz"), "a/archive.tar.html");
        assert_eq!(html_path("page.html"), "page.html");
    }

    #[test]
    fn pipeline_keeps_its_options() {
        let options = Options { directory: "layouts".into(), ..Options::default() };
        let pipeline = Pipeline::new(options.clone()).unwrap();
        assert_eq!(pipeline.options(), &options);
        assert!(pipeline.templates().is_empty());
    }

    #[test]
    fn site_path_joins_relative_to_root() {
        let site = Site::new("/site", Metadata::new());
        assert_eq!(site.root(), Path::new("/site"));
        assert_eq!(
            site.path(["templates", "base.html"]),
            PathBuf::from("/site/templates/base.html")
        );
    }
}
