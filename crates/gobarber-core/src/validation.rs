//! Form validation run before any account request is sent.
//!
//! Every rule set collects all failing fields instead of stopping at the
//! first one, so a form can highlight each problem at once.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::api::ProfileUpdate;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All failing fields of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Message for `field`, if that field failed.
    pub fn field(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Default)]
struct Checker {
    errors: Vec<ValidationError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, message: &'static str) {
        // First failure per field wins
        if !self.errors.iter().any(|e| e.field == field) {
            self.errors.push(ValidationError { field, message });
        }
    }

    fn required(&mut self, field: &'static str, value: &str, message: &'static str) {
        if value.trim().is_empty() {
            self.fail(field, message);
        }
    }

    fn email(&mut self, field: &'static str, value: &str) {
        self.required(field, value, "E-mail is required");
        if !value.trim().is_empty() && !is_valid_email(value) {
            self.fail(field, "Enter a valid e-mail address");
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Loose structural rule: a local part, one `@`, a dotted domain whose first
/// label is non-empty, no whitespace anywhere.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.][^\s@]*\.[^\s@.]+$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut check = Checker::default();
    check.email("email", email);
    check.required("password", password, "Password is required");
    check.finish()
}

pub fn validate_sign_up(name: &str, email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut check = Checker::default();
    check.required("name", name, "Name is required");
    check.email("email", email);
    if password.chars().count() < MIN_PASSWORD_LEN {
        check.fail("password", "Password must be at least 6 characters");
    }
    check.finish()
}

pub fn validate_forgot_password(email: &str) -> Result<(), ValidationErrors> {
    let mut check = Checker::default();
    check.email("email", email);
    check.finish()
}

/// `token` comes from the reset link; a link without one cannot succeed.
pub fn validate_reset_password(
    password: &str,
    password_confirmation: &str,
    token: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut check = Checker::default();
    check.required("password", password, "Password is required");
    if password != password_confirmation {
        check.fail("password_confirmation", "Passwords do not match");
    }
    if token.map_or(true, |t| t.trim().is_empty()) {
        check.fail("token", "Reset link is invalid or incomplete");
    }
    check.finish()
}

pub fn validate_profile_update(update: &ProfileUpdate) -> Result<(), ValidationErrors> {
    let mut check = Checker::default();
    check.required("name", &update.name, "Name is required");
    check.email("email", &update.email);

    let old_password = update.old_password.as_deref().unwrap_or("");
    let password = update.password.as_deref().unwrap_or("");
    let confirmation = update.password_confirmation.as_deref().unwrap_or("");

    if !old_password.is_empty() {
        check.required("password", password, "New password is required");
    } else if !password.is_empty() {
        check.fail("old_password", "Current password is required to set a new one");
    }
    if password != confirmation {
        check.fail("password_confirmation", "Passwords do not match");
    }
    check.finish()
}
