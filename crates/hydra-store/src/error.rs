//! Error types for hydra-store.

use std::path::PathBuf;

use hydra_types::GoalError;

/// Result type for hydra-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hydra-store.
///
/// Read paths never return these: a missing, corrupt or unreachable value
/// degrades to the zero record or the default goals. Write paths surface
/// [`Error::StorageUnavailable`] and [`Error::StorageQuotaExceeded`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The backend could not be reached or refused the operation.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The backend is out of space.
    #[error("Storage quota exceeded: {0}")]
    StorageQuotaExceeded(String),

    /// Goal settings failed validation.
    #[error("Invalid goal: {0}")]
    InvalidGoal(#[from] GoalError),

    /// Invalid watchdog or store configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Database error from SQLite while opening or migrating.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from the storage layer during a write.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Error::StorageUnavailable(_) | Error::StorageQuotaExceeded(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydra_types::IntakeKind;

    #[test]
    fn test_storage_failure_classification() {
        assert!(Error::StorageUnavailable("gone".into()).is_storage_failure());
        assert!(Error::StorageQuotaExceeded("full".into()).is_storage_failure());
        assert!(!Error::InvalidConfig("bad".into()).is_storage_failure());
    }

    #[test]
    fn test_goal_error_converts() {
        let err: Error = GoalError::NotPositive {
            kind: IntakeKind::Calories,
            value: 0,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid goal: calorie goal must be positive, got 0"
        );
    }
}
