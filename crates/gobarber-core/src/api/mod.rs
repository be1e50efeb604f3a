//! REST API client module for the GoBarber server.
//!
//! This module provides the shared `ApiClient` (default headers plus
//! `get`/`post`/`put`/`patch` verbs) and `AccountApi` for registration,
//! password recovery and profile edits.
//!
//! Authenticated endpoints expect a JWT bearer token in the
//! `Authorization` header, installed by the session layer.

pub mod account;
pub mod client;
pub mod error;

pub use account::{AccountApi, ProfileUpdate};
pub use client::ApiClient;
pub use error::ApiError;
