//! Crate-wide error types.

use thiserror::Error;

pub type UiResult<T> = Result<T, UiError>;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("invalid pattern: {0}")]
    Pattern(String),
}

impl From<globset::Error> for UiError {
    fn from(value: globset::Error) -> Self {
        Self::Pattern(value.to_string())
    }
}

impl From<walkdir::Error> for UiError {
    fn from(value: walkdir::Error) -> Self {
        let msg = value.to_string();
        Self::Io(
            value
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other(msg)),
        )
    }
}
