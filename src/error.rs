use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Failed to render. Original error: {0}")]
    TeraError(#[from] tera::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to start the render workers. Original error: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),

    #[error("No configuration file found in '{site_dir}'. Tried: {config_files}.")]
    ConfigNotFound { site_dir: String, config_files: String },

    /// A template could not be loaded, compiled or rendered.
    #[error("Cannot render template '{template}': {message}")]
    RenderError { template: String, message: String },

    /// The base layout file could not be read.
    #[error("Cannot read base file '{path}': {source}")]
    BaseFileError { path: String, source: std::io::Error },

    #[error("Invalid front-matter in '{path}': {message}")]
    FrontMatterError { path: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results with kiln's Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
