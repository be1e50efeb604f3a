use tokio::sync::watch;
use tracing::debug;

use crate::models::Session;

use super::guard::{Access, Decision, Route};

/// Which kind of view is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Public,
    Protected,
}

impl From<Access> for View {
    fn from(access: Access) -> Self {
        match access {
            Access::Public => View::Public,
            Access::Protected => View::Protected,
        }
    }
}

/// Tracks the route on screen and keeps it consistent with the session.
///
/// Every navigation goes through the guard. After a session change the
/// current route is evaluated again, so signing out while on a protected
/// view lands on the sign-in route.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Route,
    view: View,
}

impl Navigator {
    /// Start at `route`, redirecting immediately if the session does not allow it.
    pub fn new(route: Route, session: &Session) -> Self {
        let mut navigator = Self {
            view: View::from(route.access),
            current: route.clone(),
        };
        navigator.navigate(route, session);
        navigator
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn navigate(&mut self, route: Route, session: &Session) -> Decision {
        let decision = route.check(session);
        match decision {
            Decision::Render => {
                self.view = View::from(route.access);
                self.current = route;
            }
            Decision::Redirect(path) => {
                debug!(requested = %route.path, redirect = path, "Protected route without session");
                self.current = Route::public(path);
                self.view = View::Public;
            }
        }
        decision
    }

    /// Re-run the guard for the route currently on screen.
    pub fn reevaluate(&mut self, session: &Session) -> Decision {
        self.navigate(self.current.clone(), session)
    }

    /// Wait for the next session change and re-evaluate.
    ///
    /// Returns `None` once the session owner has gone away.
    pub async fn follow(&mut self, sessions: &mut watch::Receiver<Session>) -> Option<Decision> {
        sessions.changed().await.ok()?;
        let session = sessions.borrow_and_update().clone();
        Some(self.reevaluate(&session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credential, UserProfile};
    use crate::routes::SIGN_IN_PATH;

    fn active_session() -> Session {
        let user: UserProfile =
            serde_json::from_str(r#"{"id":"1","name":"Foo","email":"foo@example.com"}"#).unwrap();
        Session::new(Credential::new("abc"), user)
    }

    #[test]
    fn test_new_redirects_without_session() {
        let nav = Navigator::new(Route::protected("/dashboard"), &Session::Absent);
        assert_eq!(nav.current().path, SIGN_IN_PATH);
        assert_eq!(nav.view(), View::Public);
    }

    #[test]
    fn test_navigate_to_protected_with_session() {
        let session = active_session();
        let mut nav = Navigator::new(Route::public("/"), &session);
        assert_eq!(nav.navigate(Route::protected("/profile"), &session), Decision::Render);
        assert_eq!(nav.current().path, "/profile");
        assert_eq!(nav.view(), View::Protected);
    }

    #[test]
    fn test_reevaluate_after_sign_out_redirects() {
        let mut nav = Navigator::new(Route::protected("/dashboard"), &active_session());
        assert_eq!(nav.view(), View::Protected);

        assert_eq!(nav.reevaluate(&Session::Absent), Decision::Redirect(SIGN_IN_PATH));
        assert_eq!(nav.current().path, SIGN_IN_PATH);
        assert_eq!(nav.view(), View::Public);
    }

    #[test]
    fn test_public_view_survives_sign_out() {
        let mut nav = Navigator::new(Route::public("/forgot-password"), &active_session());
        assert_eq!(nav.reevaluate(&Session::Absent), Decision::Render);
        assert_eq!(nav.current().path, "/forgot-password");
    }

    #[tokio::test]
    async fn test_follow_reacts_to_published_session() {
        let (tx, mut rx) = watch::channel(active_session());
        let mut nav = Navigator::new(Route::protected("/dashboard"), &rx.borrow());

        tx.send_replace(Session::Absent);
        assert_eq!(nav.follow(&mut rx).await, Some(Decision::Redirect(SIGN_IN_PATH)));
        assert_eq!(nav.view(), View::Public);

        drop(tx);
        assert_eq!(nav.follow(&mut rx).await, None);
    }
}
