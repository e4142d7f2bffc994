use thiserror::Error;

#[derive(Error, Debug)]
pub enum AxtopError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Terminal error: {message}")]
    Terminal { message: String },
}

pub type AxtopResult<T> = Result<T, AxtopError>;

impl From<reqwest::Error> for AxtopError {
    fn from(err: reqwest::Error) -> Self {
        AxtopError::Network(err.to_string())
    }
}
