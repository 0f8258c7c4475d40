use crate::{
    cli::Args,
    config::SiteConfig,
    error::Result,
    pipeline::{PassSummary, Pipeline, Site},
    site::{read_source, write_destination},
};

/// Main CLI runner that drives one build of a site
pub struct Runner {
    args: Args,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Executes the complete build: load config, read, render, write
    pub fn run(self) -> Result<PassSummary> {
        let site_root = &self.args.site_dir;
        let config = SiteConfig::load_config(site_root)?;

        let source_dir = site_root.join(&config.source);
        let destination = match &self.args.output {
            Some(output) => output.clone(),
            None => site_root.join(&config.destination),
        };

        log::debug!("Reading source files from {}", source_dir.display());
        let mut files = read_source(&source_dir)?;

        let pipeline = Pipeline::new(config.render)?;
        log::debug!(
            "Rendering with {:?}, templates from '{}'",
            pipeline.options().engine,
            pipeline.options().directory
        );
        let site = Site::new(site_root.clone(), config.metadata);
        let summary = pipeline.run(&site, &mut files)?;

        if self.args.dry_run {
            log::info!("[DRY RUN] Skipping write of {} file(s)", files.len());
        } else {
            write_destination(&destination, &files)?;
        }

        println!(
            "Rendered {} file(s) into {}.",
            summary.rendered,
            destination.display()
        );
        Ok(summary)
    }
}

/// Main entry point for CLI execution
pub fn run(args: Args) -> Result<PassSummary> {
    let runner = Runner::new(args);
    runner.run()
}
