use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StingrayError>;

#[derive(Error, Debug)]
pub enum StingrayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Download failed: {url} ({message})")]
    DownloadError { url: String, message: String },

    #[error("Extraction failed: {path} ({message})")]
    ExtractionError { path: PathBuf, message: String },

    #[error("'{name}' not found")]
    NotFound { name: String },

    #[error("{message}")]
    UsageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Container runtime not found: {name}")]
    RuntimeNotFound { name: String },

    #[error("Container runtime error: {message}")]
    RuntimeError { message: String },
}

impl StingrayError {
    pub fn download_error<S: Into<String>, M: std::fmt::Display>(url: S, message: M) -> Self {
        StingrayError::DownloadError {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn extraction_error<P: Into<PathBuf>, M: std::fmt::Display>(path: P, message: M) -> Self {
        StingrayError::ExtractionError {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn usage_error<S: Into<String>>(message: S) -> Self {
        StingrayError::UsageError {
            message: message.into(),
        }
    }

    pub fn config_error<S: Into<String>>(message: S) -> Self {
        StingrayError::ConfigError {
            message: message.into(),
        }
    }
}
