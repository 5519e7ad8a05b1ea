use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Missing credential: set `{0}` in config.toml or export the {0} environment variable")]
    MissingCredential(&'static str),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
