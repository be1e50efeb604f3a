//! The application's route table and the text rendering of each page.
//!
//! The core guard only sees `Route` values; which paths exist and what they
//! show is decided here.

use gobarber_core::routes::{Access, Route};
use gobarber_core::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    SignIn,
    SignUp,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Profile,
}

const ROUTES: &[(&str, Access, Page)] = &[
    ("/", Access::Public, Page::SignIn),
    ("/signup", Access::Public, Page::SignUp),
    ("/forgot-password", Access::Public, Page::ForgotPassword),
    ("/reset-password", Access::Public, Page::ResetPassword),
    ("/dashboard", Access::Protected, Page::Dashboard),
    ("/profile", Access::Protected, Page::Profile),
];

/// Look up a path, ignoring any query string and trailing slash.
pub fn resolve(path: &str) -> Option<(Route, Page)> {
    let path = path.split('?').next().unwrap_or(path);
    let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };

    ROUTES
        .iter()
        .find(|(p, _, _)| *p == path)
        .map(|(p, access, page)| (Route { path: p.to_string(), access: *access }, *page))
}

pub fn render(page: Page, session: &Session) -> String {
    match (page, session.user()) {
        (Page::SignIn, _) => "Sign in\n  gobarber login".to_string(),
        (Page::SignUp, _) => "Create your account\n  gobarber signup".to_string(),
        (Page::ForgotPassword, _) => "Recover your password\n  gobarber forgot-password".to_string(),
        (Page::ResetPassword, _) => "Choose a new password\n  gobarber reset-password <token>".to_string(),
        (Page::Dashboard, Some(user)) => format!(
            "Welcome, {}\n  Scheduled appointments: none today",
            user.name
        ),
        (Page::Profile, Some(user)) => format!(
            "My profile\n  Name:   {}\n  E-mail: {}\n  Avatar: {}",
            user.name,
            user.email,
            user.avatar_display()
        ),
        // The guard never lets a protected page render without a user
        (Page::Dashboard | Page::Profile, None) => String::new(),
    }
}
