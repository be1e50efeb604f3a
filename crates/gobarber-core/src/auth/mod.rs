//! Authentication module for the client-side session lifecycle.
//!
//! This module provides:
//! - `SessionManager`: owns the current session, restores it at startup,
//!   and publishes every change to subscribers
//! - `AuthClient`: the sign-in network exchange
//! - `RequestAuthorizer`: attaches the active token to outgoing requests
//!
//! Sessions are persisted through a [`SessionStore`](crate::storage::SessionStore)
//! under two keys and restored without contacting the server.

pub mod authorizer;
pub mod client;
pub mod error;
pub mod session;

pub use authorizer::RequestAuthorizer;
pub use client::AuthClient;
pub use error::{RestoreFailure, SessionError};
pub use session::SessionManager;
