use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateStatusError {
    #[error("Package index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Helper unavailable: {0}")]
    HelperUnavailable(String),

    #[error("Malformed helper output: {0}")]
    HelperOutputMalformed(String),

    #[error("Unexpected `uname -r` format: {0}")]
    UnameFormatUnexpected(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UpdateStatusError>;
