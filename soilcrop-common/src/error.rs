//! Common error types for soilcrop

use thiserror::Error;

/// Common result type for soilcrop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the service
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML config file could not be parsed
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP client construction or request error
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}
