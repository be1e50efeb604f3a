use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{Credential, Session, UserProfile};
use crate::storage::{SessionStore, StoreError, TOKEN_KEY, USER_KEY};

use super::{AuthClient, RequestAuthorizer, RestoreFailure, SessionError};

/// Sole owner of the current [`Session`].
///
/// Built once at startup by [`SessionManager::initialize`], which restores
/// whatever the store holds. Every mutation writes the store first, then
/// publishes the new value to subscribers, so nobody observes an in-memory
/// session that disagrees with the persisted record.
///
/// Overlapping `sign_in` calls are not coordinated; the last one to finish
/// wins.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    auth: AuthClient,
    authorizer: RequestAuthorizer,
    state: watch::Sender<Session>,
}

impl SessionManager {
    /// Restore the persisted session, if any, and prime the authorizer.
    ///
    /// A missing half, an unreadable store or a malformed profile all yield
    /// an absent session. The restored token is trusted as-is; it is not
    /// checked against the server.
    pub fn initialize(store: Box<dyn SessionStore>, api: ApiClient) -> Self {
        let authorizer = RequestAuthorizer::new(api.clone());
        let auth = AuthClient::new(api);

        let session = match Self::load(store.as_ref()) {
            Ok((token, user)) => {
                authorizer.set_token(Some(&token));
                debug!(user_id = %user.id, "Session restored");
                Session::new(token, user)
            }
            Err(failure) if failure.is_empty_store() => {
                debug!("No persisted session");
                Session::Absent
            }
            Err(failure) => {
                warn!(reason = %failure, "Discarding persisted session");
                Session::Absent
            }
        };

        let (state, _) = watch::channel(session);

        Self {
            store,
            auth,
            authorizer,
            state,
        }
    }

    /// The current session. Cheap, side-effect free.
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_active()
    }

    /// Receiver that sees every session value published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Read-only view of the authorizer, for inspecting the active header.
    pub fn authorizer(&self) -> &RequestAuthorizer {
        &self.authorizer
    }

    /// Sign in and replace the current session.
    ///
    /// On an authentication failure the session, the store and the
    /// authorization header are left exactly as they were. If persisting
    /// the new record fails, the user ends up signed out everywhere: the
    /// store is cleared, the header removed and `Absent` published.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        let (token, user) = self.auth.authenticate(email, password).await?;

        if let Err(e) = self.save(&token, &user) {
            self.authorizer.set_token(None);
            self.publish(Session::Absent);
            return Err(e);
        }
        self.authorizer.set_token(Some(&token));

        info!(user_id = %user.id, "Signed in");
        self.publish(Session::new(token, user));
        Ok(())
    }

    /// Replace the profile half of the session, keeping the token.
    ///
    /// `profile` is taken as authoritative (typically the server's answer
    /// to a profile save); no network access happens here. If the store
    /// rejects the write, the current session is left unchanged.
    pub fn update_profile(&mut self, profile: UserProfile) -> Result<(), SessionError> {
        let token = self
            .state
            .borrow()
            .token()
            .cloned()
            .ok_or(SessionError::NoActiveSession)?;

        let serialized = serde_json::to_string(&profile).map_err(StoreError::from)?;
        self.store.set(USER_KEY, &serialized)?;

        debug!(user_id = %profile.id, "Profile replaced");
        self.publish(Session::new(token, profile));
        Ok(())
    }

    /// Clear the persisted record, the authorization header and the
    /// in-memory session. Safe to call when already signed out.
    pub fn sign_out(&mut self) {
        self.clear();
        self.authorizer.set_token(None);

        if self.state.borrow().is_active() {
            info!("Signed out");
        }
        self.publish(Session::Absent);
    }

    fn load(store: &dyn SessionStore) -> Result<(Credential, UserProfile), RestoreFailure> {
        let token = store.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let user = store.get(USER_KEY)?.filter(|u| !u.is_empty());

        let (token, user) = match (token, user) {
            (Some(token), Some(user)) => (token, user),
            (None, None) => return Err(RestoreFailure::Empty),
            (None, Some(_)) => return Err(RestoreFailure::MissingToken),
            (Some(_), None) => return Err(RestoreFailure::MissingProfile),
        };

        let token = Credential::new(token);
        RequestAuthorizer::header_value(&token).map_err(|_| RestoreFailure::MalformedToken)?;

        let user: UserProfile = serde_json::from_str(&user)?;
        Ok((token, user))
    }

    /// Write both halves. On failure both keys are removed.
    fn save(&self, token: &Credential, user: &UserProfile) -> Result<(), SessionError> {
        let serialized = serde_json::to_string(user).map_err(StoreError::from)?;

        let result = self
            .store
            .set(TOKEN_KEY, token.as_str())
            .and_then(|()| self.store.set(USER_KEY, &serialized));

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist session, rolling back");
            self.clear();
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove both halves. Errors are logged, never returned.
    fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(key, error = %e, "Failed to remove persisted session value");
            }
        }
    }

    fn publish(&self, session: Session) {
        self.state.send_replace(session);
    }
}
