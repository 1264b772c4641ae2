use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine home directory")]
    HomeDirNotFound,

    #[error("Rental store not found at {0}")]
    Missing(PathBuf),
}

pub type Result<T> = std::result::Result<T, StoreError>;
