use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeclockError {
    #[error("invalid member id '{id}': must start with '{prefix}'")]
    InvalidMemberId { id: String, prefix: String },

    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("no open signups for member {0}")]
    NoOpenSignup(String),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("remote store returned {status} for {url}: {message}")]
    Remote {
        url: String,
        status: u16,
        message: String,
    },

    #[error("invalid time '{value}': expected format '{format}'")]
    InvalidTime { value: String, format: String },

    #[error("invalid strftime pattern: {0}")]
    InvalidFormat(String),

    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("missing API key: set RAGIC_API_KEY or ragic.api_key in the config file")]
    MissingApiKey,

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimeclockError>;
