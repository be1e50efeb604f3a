use crate::models::Session;

/// Where unauthenticated visitors of a protected route are sent.
pub const SIGN_IN_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Rendered for everyone, signed in or not.
    Public,
    /// Requires an active session.
    Protected,
}

/// A navigable destination as the router describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub access: Access,
}

impl Route {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            access: Access::Public,
        }
    }

    pub fn protected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            access: Access::Protected,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.access == Access::Protected
    }

    /// Evaluate this route against a session.
    pub fn check(&self, session: &Session) -> Decision {
        decide(self.access, session.is_active())
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    /// Go to this path instead. The requested path is not remembered.
    Redirect(&'static str),
}

/// Pure route decision.
pub fn decide(access: Access, session_active: bool) -> Decision {
    match (access, session_active) {
        (Access::Public, _) => Decision::Render,
        (Access::Protected, true) => Decision::Render,
        (Access::Protected, false) => Decision::Redirect(SIGN_IN_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credential, UserProfile};

    fn active_session() -> Session {
        let user: UserProfile =
            serde_json::from_str(r#"{"id":"1","name":"Foo","email":"foo@example.com"}"#).unwrap();
        Session::new(Credential::new("abc"), user)
    }

    #[test]
    fn test_decide_truth_table() {
        assert_eq!(decide(Access::Public, false), Decision::Render);
        assert_eq!(decide(Access::Public, true), Decision::Render);
        assert_eq!(decide(Access::Protected, true), Decision::Render);
        assert_eq!(decide(Access::Protected, false), Decision::Redirect(SIGN_IN_PATH));
    }

    #[test]
    fn test_protected_route_checks_session() {
        let dashboard = Route::protected("/dashboard");
        assert!(dashboard.is_protected());
        assert_eq!(dashboard.check(&Session::Absent), Decision::Redirect("/"));
        assert_eq!(dashboard.check(&active_session()), Decision::Render);
    }

    #[test]
    fn test_public_route_renders_for_signed_in_user() {
        let sign_up = Route::public("/signup");
        assert_eq!(sign_up.check(&active_session()), Decision::Render);
        assert_eq!(sign_up.check(&Session::Absent), Decision::Render);
    }
}
