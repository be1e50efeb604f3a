//! Account flows that sit outside the session lifecycle: registration,
//! password recovery and profile edits.
//!
//! Profile edits return the server's updated `UserProfile`; callers hand it
//! to [`SessionManager::update_profile`](crate::auth::SessionManager::update_profile)
//! so the cached session follows.

use reqwest::multipart;
use serde::Serialize;
use tracing::info;

use crate::models::UserProfile;

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetPasswordRequest<'a> {
    password: &'a str,
    password_confirmation: &'a str,
    token: &'a str,
}

/// Body of `PUT profile`.
///
/// The password fields are only sent when the user is changing the password.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

impl ProfileUpdate {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_password_change(
        mut self,
        old_password: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        self.old_password = Some(old_password.into());
        self.password = Some(password.into());
        self.password_confirmation = Some(password_confirmation.into());
        self
    }
}

/// Account endpoints on top of the shared client.
///
/// Authenticated calls rely on the `Authorization` default header the
/// session layer installs; this type never touches it.
#[derive(Clone)]
pub struct AccountApi {
    api: ApiClient,
}

impl AccountApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Register a new account. Does not sign in.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let user: UserProfile = self
            .api
            .post("users", &SignUpRequest { name, email, password })
            .await?;
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Ask the server to e-mail a password reset link.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.api
            .post_unit("password/forgot", &ForgotPasswordRequest { email })
            .await
    }

    /// Set a new password using the token from the reset link.
    pub async fn reset_password(
        &self,
        password: &str,
        password_confirmation: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        self.api
            .post_unit(
                "password/reset",
                &ResetPasswordRequest {
                    password,
                    password_confirmation,
                    token,
                },
            )
            .await
    }

    /// Save name, e-mail and optionally a new password.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.api.put("profile", update).await
    }

    /// Upload a new avatar image.
    pub async fn update_avatar(&self, file_name: &str, bytes: Vec<u8>) -> Result<UserProfile, ApiError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("avatar", part);
        self.api.patch_multipart("users/avatar", form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_omits_password_fields_when_unchanged() {
        let update = ProfileUpdate::new("Foo Bar", "foo@example.com");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Foo Bar", "email": "foo@example.com"}));
    }

    #[test]
    fn test_profile_update_with_password_change() {
        let update = ProfileUpdate::new("Foo", "foo@example.com")
            .with_password_change("123456", "12345678", "12345678");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["old_password"], "123456");
        assert_eq!(json["password"], "12345678");
        assert_eq!(json["password_confirmation"], "12345678");
    }
}
