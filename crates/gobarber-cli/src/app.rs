//! Command handlers for the `gobarber` binary.
//!
//! `App` wires the configured store and API client into a
//! `SessionManager` once at startup; each command then reads or mutates the
//! session through it. Failures are turned into user-facing messages here,
//! never inside the core.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use gobarber_core::api::{AccountApi, ProfileUpdate};
use gobarber_core::routes::{Decision, Navigator, Route, SIGN_IN_PATH};
use gobarber_core::validation;
use gobarber_core::{Config, SessionManager, UserProfile};

use crate::prompt;
use crate::routes::{self, Page};

/// Environment variable pre-filling the sign-in e-mail
const EMAIL_ENV: &str = "GOBARBER_EMAIL";

/// Environment variable supplying the password non-interactively
const PASSWORD_ENV: &str = "GOBARBER_PASSWORD";

pub struct App {
    config: Config,
    session: SessionManager,
    account: AccountApi,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let api = config.api_client()?;
        let store = config.session_store()?;
        debug!(base_url = api.base_url(), store = ?config.store, "Client configured");

        let session = SessionManager::initialize(store, api.clone());
        let account = AccountApi::new(api);

        Ok(Self {
            config,
            session,
            account,
        })
    }

    // ===== Session =====

    pub async fn login(&mut self) -> Result<()> {
        let default_email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| self.config.last_email.clone());
        let email = prompt::line("E-mail", default_email.as_deref())?;
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(password) if !password.is_empty() => password,
            _ => prompt::password("Password")?,
        };

        validation::validate_sign_in(&email, &password)?;

        println!("\nSigning in...");
        if let Err(e) = self.session.sign_in(&email, &password).await {
            warn!(error = %e, "Sign-in failed");
            return Err(anyhow!(e.user_message()));
        }

        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        let current = self.session.current();
        if let Some(user) = current.user() {
            println!("Welcome, {}!", user.first_name());
        }
        self.open("/dashboard");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.session.sign_out();
        println!("Signed out.");
    }

    pub fn whoami(&self) {
        match self.session.current().user() {
            Some(user) => println!("{} <{}>", user.name, user.email),
            None => println!("Not signed in."),
        }
    }

    /// Navigate to `path` and print the page the guard lets through.
    pub fn open(&self, path: &str) {
        let Some((route, page)) = routes::resolve(path) else {
            println!("Page not found.");
            return;
        };

        let current = self.session.current();
        let mut navigator = Navigator::new(Route::public(SIGN_IN_PATH), &current);
        let page = match navigator.navigate(route, &current) {
            Decision::Render => page,
            Decision::Redirect(to) => {
                println!("(sign in required, redirected to {})\n", to);
                routes::resolve(to).map(|(_, p)| p).unwrap_or(Page::SignIn)
            }
        };

        println!("{}", routes::render(page, &current));
    }

    // ===== Account =====

    pub async fn sign_up(&self) -> Result<()> {
        let name = prompt::line("Name", None)?;
        let email = prompt::line("E-mail", None)?;
        let password = prompt::password("Password")?;

        validation::validate_sign_up(&name, &email, &password)?;

        self.account
            .sign_up(&name, &email, &password)
            .await
            .map_err(|e| anyhow!("Registration failed: {}", e))?;

        println!("Account created. You can now sign in with `gobarber login`.");
        Ok(())
    }

    pub async fn forgot_password(&self, email: Option<&str>) -> Result<()> {
        let email = match email {
            Some(email) => email.to_string(),
            None => prompt::line("E-mail", self.config.last_email.as_deref())?,
        };

        validation::validate_forgot_password(&email)?;

        self.account
            .forgot_password(&email)
            .await
            .map_err(|e| anyhow!("Could not request a password reset: {}", e))?;

        println!("We sent you an e-mail with instructions to reset your password.");
        Ok(())
    }

    pub async fn reset_password(&self, link_or_token: Option<&str>) -> Result<()> {
        let token = link_or_token.and_then(reset_token);
        let password = prompt::password("New password")?;
        let confirmation = prompt::password("Confirm password")?;

        validation::validate_reset_password(&password, &confirmation, token)?;
        let token = token.unwrap_or_default();

        self.account
            .reset_password(&password, &confirmation, token)
            .await
            .map_err(|e| anyhow!("Could not reset your password: {}", e))?;

        println!("Password changed. Sign in with `gobarber login`.");
        Ok(())
    }

    pub async fn edit_profile(&mut self) -> Result<()> {
        let user = self.require_session("/profile")?;

        let name = prompt::line("Name", Some(user.name.as_str()))?;
        let email = prompt::line("E-mail", Some(user.email.as_str()))?;
        let mut update = ProfileUpdate::new(name, email);

        let old_password = prompt::password("Current password (leave empty to keep it)")?;
        if !old_password.is_empty() {
            let password = prompt::password("New password")?;
            let confirmation = prompt::password("Confirm password")?;
            update = update.with_password_change(old_password, password, confirmation);
        }

        validation::validate_profile_update(&update)?;

        let updated = self
            .account
            .update_profile(&update)
            .await
            .map_err(|e| anyhow!("Could not update your profile: {}", e))?;
        self.session
            .update_profile(updated)
            .map_err(|e| anyhow!(e.user_message()))?;

        info!("Profile updated");
        println!("Profile updated.");
        self.open("/dashboard");
        Ok(())
    }

    pub async fn upload_avatar(&mut self, file: &str) -> Result<()> {
        self.require_session("/profile")?;

        let path = Path::new(file);
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("avatar")
            .to_string();

        let updated = self
            .account
            .update_avatar(&file_name, bytes)
            .await
            .map_err(|e| anyhow!("Could not update your avatar: {}", e))?;
        self.session
            .update_profile(updated)
            .map_err(|e| anyhow!(e.user_message()))?;

        println!("Avatar updated.");
        Ok(())
    }

    /// Run the guard for a protected page and return the signed-in user.
    fn require_session(&self, path: &str) -> Result<UserProfile> {
        let current = self.session.current();
        let (route, _) = routes::resolve(path).ok_or_else(|| anyhow!("Unknown page {}", path))?;

        match route.check(&current) {
            Decision::Render => current
                .user()
                .cloned()
                .ok_or_else(|| anyhow!("You are not signed in")),
            Decision::Redirect(_) => Err(anyhow!("You need to sign in first: gobarber login")),
        }
    }
}

/// Accept either the bare token or the whole reset link.
fn reset_token(input: &str) -> Option<&str> {
    let token = match input.split_once("token=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or(rest),
        None => input,
    };
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_from_link() {
        assert_eq!(
            reset_token("http://localhost:3000/reset-password?token=abc-123"),
            Some("abc-123")
        );
        assert_eq!(reset_token("/reset-password?token=abc&utm=x"), Some("abc"));
    }

    #[test]
    fn test_reset_token_bare() {
        assert_eq!(reset_token("abc-123"), Some("abc-123"));
        assert_eq!(reset_token("  "), None);
        assert_eq!(reset_token("/reset-password?token="), None);
    }
}
