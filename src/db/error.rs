use std::path::PathBuf;

use thiserror::Error;

/// Everything the store can report back to the orchestrator. Connection
/// problems degrade the UI to sample data; statement problems are shown to the
/// user and leave the in-memory table untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not open database at {}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database at {} has no customers table", path.display())]
    MissingTable { path: PathBuf },

    #[error("not connected to the database")]
    NotConnected,

    #[error("failed to {action} customer")]
    Statement {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("customer {id} not found")]
    NotFound { id: i64 },
}

impl StoreError {
    /// Whether this error means the database was never reachable, as opposed
    /// to a single statement failing.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            StoreError::Connect { .. } | StoreError::MissingTable { .. } | StoreError::NotConnected
        )
    }

    pub(crate) fn statement(action: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::Statement { action, source }
    }
}

/// Flatten an error and its causes into one line for logs and the status bar.
pub(crate) fn surface_store_error(err: &StoreError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
