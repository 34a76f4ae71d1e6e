use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("stale counter for credential {credential_id}: reported {reported}, stored {stored}")]
    StaleCounter {
        credential_id: String,
        reported: u64,
        stored: u64,
    },

    #[error("review case {0} is already decided")]
    AlreadyDecided(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}
