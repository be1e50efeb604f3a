use reqwest::header::{HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::Credential;

/// Owns the `Authorization` default header of the shared [`ApiClient`].
///
/// At most one token is active. Setting a new one replaces the previous
/// header; `None` removes it.
pub struct RequestAuthorizer {
    api: ApiClient,
}

impl RequestAuthorizer {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn set_token(&self, token: Option<&Credential>) {
        match token.map(Self::header_value) {
            Some(Ok(value)) => {
                self.api.set_default_header(AUTHORIZATION, value);
                debug!("Authorization header set");
            }
            Some(Err(_)) => {
                // Never leave a stale token behind a rejected one.
                self.api.remove_default_header(&AUTHORIZATION);
                warn!("Token is not a valid header value, authorization cleared");
            }
            None => {
                self.api.remove_default_header(&AUTHORIZATION);
                debug!("Authorization header cleared");
            }
        }
    }

    /// The header value currently attached to outgoing requests.
    pub fn current(&self) -> Option<HeaderValue> {
        self.api.default_header(&AUTHORIZATION)
    }

    /// `Bearer <token>` as a sensitive header value.
    pub fn header_value(token: &Credential) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&token.bearer())?;
        value.set_sensitive(true);
        Ok(value)
    }
}
