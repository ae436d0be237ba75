use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    #[error("intent not found: {0}")]
    IntentNotFound(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("checkpoint not found for project: {0}")]
    CheckpointNotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("storage operation failed: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger store lock poisoned")]
    LockPoisoned,

    #[error("transport error: {0}")]
    Transport(String),
}

impl CoreError {
    /// True when the underlying SQLite error is a uniqueness/PK violation.
    pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
