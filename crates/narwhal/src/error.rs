#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid resolver config: {message}")]
    InvalidConfig { message: String },
    #[error("resolver config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
