use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StoreError;

/// Errors returned by session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Sign-in rejected, network failure or malformed response; all collapse here.
    #[error("Sign-in failed: {0}")]
    AuthFailure(#[source] ApiError),

    #[error("No active session")]
    NoActiveSession,

    #[error("Failed to persist session: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::AuthFailure(ApiError::Unauthorized | ApiError::BadRequest(_)) => {
                "Incorrect email or password".to_string()
            }
            SessionError::AuthFailure(ApiError::NetworkError(e)) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            SessionError::AuthFailure(ApiError::NetworkError(_)) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            SessionError::AuthFailure(e) => format!("Sign-in failed: {}", e),
            SessionError::NoActiveSession => "You are not signed in".to_string(),
            SessionError::Store(e) => format!("Could not save your session: {}", e),
        }
    }
}

/// Why a persisted session could not be restored at startup.
///
/// Never returned to callers; restore falls back to an absent session and
/// logs the reason.
#[derive(Error, Debug)]
pub enum RestoreFailure {
    #[error("nothing persisted")]
    Empty,

    #[error("no persisted token")]
    MissingToken,

    #[error("no persisted profile")]
    MissingProfile,

    #[error("persisted token is not a valid header value")]
    MalformedToken,

    #[error("persisted profile is malformed: {0}")]
    MalformedProfile(#[from] serde_json::Error),

    #[error("storage read failed: {0}")]
    Store(#[from] StoreError),
}

impl RestoreFailure {
    /// Nothing stored at all is the normal signed-out state, not a failure worth a warning.
    pub fn is_empty_store(&self) -> bool {
        matches!(self, RestoreFailure::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_rejected_credentials() {
        let err = SessionError::AuthFailure(ApiError::Unauthorized);
        assert_eq!(err.user_message(), "Incorrect email or password");
    }

    #[test]
    fn test_user_message_for_server_error() {
        let err = SessionError::AuthFailure(ApiError::ServerError("boom".to_string()));
        assert_eq!(err.user_message(), "Sign-in failed: Server error: boom");
    }

    #[test]
    fn test_user_message_without_session() {
        assert_eq!(SessionError::NoActiveSession.user_message(), "You are not signed in");
    }
}
