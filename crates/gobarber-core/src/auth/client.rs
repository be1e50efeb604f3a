use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Credential, UserProfile};

use super::{RequestAuthorizer, SessionError};

/// Session-creation endpoint
const SESSIONS_PATH: &str = "sessions";

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: UserProfile,
}

/// Performs the sign-in exchange. Holds no state of its own.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange e-mail and password for a token and the user's profile.
    ///
    /// Sends exactly one request. Every failure is reported as
    /// [`SessionError::AuthFailure`].
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(Credential, UserProfile), SessionError> {
        debug!("Sending sign-in request");

        let auth: AuthResponse = self
            .api
            .post_once(SESSIONS_PATH, &SignInRequest { email, password })
            .await
            .map_err(SessionError::AuthFailure)?;

        let token = Credential::new(auth.token);
        if token.as_str().is_empty() || RequestAuthorizer::header_value(&token).is_err() {
            return Err(SessionError::AuthFailure(ApiError::InvalidResponse(
                "Server returned an unusable token".to_string(),
            )));
        }

        Ok((token, auth.user))
    }
}
