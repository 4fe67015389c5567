use flowreap_history::HistoryError;

/// Errors that abort a cleanup pass.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    /// Invalid configuration, detected before any store call.
    #[error("configuration error: {0}")]
    Config(String),

    /// A store operation failed; deletions already performed in this
    /// pass remain in effect.
    #[error(transparent)]
    Store(#[from] HistoryError),
}
