//! Identity models returned by the GoBarber API.
//!
//! Field names follow the server's snake_case JSON so a profile can be
//! persisted and restored without a translation layer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque bearer token issued by the server.
///
/// The client never inspects, validates or refreshes it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Tokens must never end up in log output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// The signed-in user's identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// First word of the display name, used for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn avatar_display(&self) -> &str {
        self.avatar_url.as_deref().unwrap_or("(no avatar)")
    }
}

/// The current authentication state.
///
/// Either fully populated or fully absent; a token without a profile (or the
/// reverse) cannot be represented.
///
/// Not serializable: the two halves are persisted separately and the raw
/// token never goes into a JSON dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export, tag = "status", rename_all = "snake_case"))]
pub enum Session {
    #[default]
    Absent,
    Active { token: Credential, user: UserProfile },
}

impl Session {
    pub fn new(token: Credential, user: UserProfile) -> Self {
        Session::Active { token, user }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active { .. })
    }

    pub fn token(&self) -> Option<&Credential> {
        match self {
            Session::Active { token, .. } => Some(token),
            Session::Absent => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Session::Active { user, .. } => Some(user),
            Session::Absent => None,
        }
    }
}
