use thiserror::Error;

#[derive(Debug, Error)]
pub enum CutlistError {
    #[error("Invalid board {id}: {width}x{height} (dimensions must be finite and positive)")]
    InvalidBoard { id: String, width: f64, height: f64 },
    #[error("Invalid part {signature}: {width}x{height} (dimensions must be finite and positive)")]
    InvalidPart {
        signature: String,
        width: f64,
        height: f64,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CutlistError>;
