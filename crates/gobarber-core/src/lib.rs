//! Core library for the GoBarber scheduling client.
//!
//! The interesting part of the client is its session lifecycle: restoring a
//! persisted session at startup, signing in, attaching the token to every
//! API call, replacing the cached profile, signing out, and gating
//! navigation on all of that. Presentation layers drive it through
//! [`auth::SessionManager`] and [`routes::Navigator`].

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;
pub mod storage;
pub mod validation;

pub use api::{AccountApi, ApiClient, ApiError, ProfileUpdate};
pub use auth::{SessionError, SessionManager};
pub use config::Config;
pub use models::{Credential, Session, UserProfile};
pub use routes::{Access, Decision, Navigator, Route};
pub use storage::{FileStore, KeychainStore, MemoryStore, SessionStore};
