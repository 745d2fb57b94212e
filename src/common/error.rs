// Error taxonomy surfaced to the embedding shell

use thiserror::Error;

use super::validation::ValidationResult;
use crate::services::backend::BackendError;
use crate::services::generative::GenerativeError;

/// Application-level errors. Every variant maps to one way the shell reacts:
/// inline validation text, a form-level auth message, a generic connectivity
/// message, or a degraded AI feature. Nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum AppError {
    /// Blocked input, shown next to the offending field or as an alert.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or a broken account, shown as a form-level message.
    #[error("{0}")]
    Auth(String),

    /// Transport failure. The cause is logged; the user always sees the same
    /// generic message regardless of what went wrong on the wire.
    #[error("Could not reach the server. Check your connection and try again.")]
    Network(String),

    /// A generative call failed; call sites surface this or fall back to a
    /// degraded value.
    #[error("The assistant could not complete this request. Try again later.")]
    Generative(String),

    /// The AI-feature credit balance is exhausted.
    #[error("No credits remaining for AI features")]
    CreditsExhausted,

    #[error("{0}")]
    Forbidden(String),
}

impl From<ValidationResult> for AppError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            AppError::Validation("Validation result was valid but converted to error".to_string())
        } else {
            AppError::Validation(result.message())
        }
    }
}

impl From<BackendError> for AppError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::InvalidCredentials(msg) | BackendError::SignUpRejected(msg) => {
                AppError::Auth(msg)
            }
            BackendError::ProfileRowMissing => {
                AppError::Auth("Account exists but has no profile data".to_string())
            }
            BackendError::RequestFailed(msg) | BackendError::InvalidResponse(msg) => {
                AppError::Network(msg)
            }
        }
    }
}

impl From<GenerativeError> for AppError {
    fn from(error: GenerativeError) -> Self {
        AppError::Generative(error.to_string())
    }
}
