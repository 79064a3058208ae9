/// Error types for listing retrieval and catalog output
use std::time::Duration;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Failure to retrieve or parse one directory listing
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP error {status}: {url}")]
    Http { status: u16, url: String },

    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("invalid listing URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether another attempt at the same URL could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout { .. } | FetchError::Transport { .. } => true,
            FetchError::Http { status, .. } => *status >= 500,
            FetchError::InvalidUrl(_) => false,
        }
    }
}

/// Errors that abort a catalog run
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Serialize(e.to_string())
    }
}

impl From<quick_xml::Error> for CatalogError {
    fn from(e: quick_xml::Error) -> Self {
        CatalogError::Serialize(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CatalogError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        CatalogError::Serialize(e.to_string())
    }
}
