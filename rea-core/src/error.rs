use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{operation} returned status {status}")]
    UnexpectedStatus { operation: &'static str, status: u16 },

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<redis::RedisError> for ServiceError {
    fn from(err: redis::RedisError) -> Self {
        Self::Session(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
