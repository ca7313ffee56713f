use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// The persistent tier could not be reached or failed mid-operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded.
    #[error("malformed entry under {key}: {reason}")]
    Malformed { key: String, reason: String },
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}
