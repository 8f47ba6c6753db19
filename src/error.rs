use thiserror::Error;

use crate::notice::{Notice, Route};

/// The console's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The backend rejected the login credentials.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The backend answered 401 on an authenticated request.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The backend answered 403.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The backend answered with a 5xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered `success: false`.
    #[error("{0}")]
    Backend(String),

    /// A client-side form check failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Sealing or opening a persisted payload failed.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// A payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An authenticated call was attempted without a session.
    #[error("No authenticated user")]
    MissingIdentity,

    /// The client-side storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<sonic_rs::Error> for AppError {
    fn from(e: sonic_rs::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl AppError {
    /// Converts the error into what the user gets to see.
    ///
    /// Errors are caught at the screen-controller boundary and end up here;
    /// nothing is propagated as an unhandled failure.
    pub fn notice(&self) -> Notice {
        match self {
            AppError::InvalidCredentials => {
                tracing::warn!("Login rejected: invalid credentials");
                Notice::Toast { message: self.to_string(), retry: false }
            }

            AppError::SessionExpired => {
                tracing::warn!("Backend reported an expired session");
                Notice::Redirect { route: Route::Login, message: self.to_string() }
            }

            AppError::MissingIdentity => {
                tracing::warn!("Authenticated call attempted without a session");
                Notice::Redirect { route: Route::Login, message: self.to_string() }
            }

            AppError::Forbidden(msg) => {
                tracing::warn!("Authorization failed: {}", msg);
                Notice::Inline(self.to_string())
            }

            AppError::Server { status, message } => {
                tracing::error!("Server error {}: {}", status, message);
                Notice::Toast { message: "Server error, please try again".to_string(), retry: true }
            }

            AppError::Network(msg) => {
                tracing::error!("Network error: {}", msg);
                Notice::Toast { message: "Network error, please try again".to_string(), retry: true }
            }

            AppError::Backend(msg) => {
                tracing::error!("Backend reported failure: {}", msg);
                Notice::Toast { message: msg.clone(), retry: true }
            }

            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                Notice::Toast { message: msg.clone(), retry: false }
            }

            AppError::Encryption(msg) => {
                tracing::error!("Encryption error: {}", msg);
                Notice::Toast { message: "Encryption error".to_string(), retry: false }
            }

            AppError::Serialization(msg) => {
                tracing::error!("Serialization error: {}", msg);
                Notice::Toast { message: "Unexpected response from server".to_string(), retry: false }
            }

            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                Notice::Toast { message: "Local storage unavailable".to_string(), retry: false }
            }
        }
    }
}
