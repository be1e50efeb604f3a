//! Data models shared by the session layer and the API client.
//!
//! - `Credential`: opaque bearer token
//! - `UserProfile`: the signed-in user's identity record
//! - `Session`: either an active (token, profile) pair or absent

pub mod user;

pub use user::{Credential, Session, UserProfile};
