//! Durable key/value storage for the persisted session record.
//!
//! This module provides:
//! - `SessionStore`: the `get`/`set`/`remove` contract the session layer writes through
//! - `MemoryStore`: process-local store, shared between clones
//! - `FileStore`: JSON file on disk, the `localStorage` equivalent
//! - `KeychainStore`: OS keychain via keyring
//!
//! The session record lives under two independent keys, `TOKEN_KEY` and
//! `USER_KEY`.

pub mod file;
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use keychain::KeychainStore;
pub use memory::MemoryStore;

/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "GoBarber:token";

/// Key holding the JSON-encoded user profile.
pub const USER_KEY: &str = "GoBarber:user";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),
}

/// Durable string storage surviving restarts.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
