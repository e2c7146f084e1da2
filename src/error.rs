use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// User-correctable input mistake. Never reaches the wallet.
    #[error("{0}")]
    Validation(String),

    /// Failure reported by the wallet service, surfaced verbatim.
    #[error("{0}")]
    Wallet(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// A dialog submission arrived while a previous one was in flight.
    #[error("A submission is already in progress")]
    Busy,
}

// Tauri commands return errors to the webview as JSON; the frontend only
// needs the user-facing message.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Wallet(e.to_string())
    }
}
