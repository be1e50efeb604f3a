use keyring::Entry;
use tracing::debug;

use super::{SessionStore, StoreError};

/// Default keychain service name
pub const SERVICE_NAME: &str = "gobarber";

/// Stores each key as a separate OS keychain entry.
///
/// Backed by the macOS Keychain, the Windows Credential Manager or the Linux
/// kernel keyutils session keyring. On Linux the entries last for the login
/// session. Protection is whatever the host keychain provides; nothing is
/// encrypted on top of it.
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

impl KeychainStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeychainStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entry(key)?.set_password(value)?;
        debug!(service = %self.service, key, "Stored keychain entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Talks to the host keychain, which CI containers usually lack
    #[test]
    #[ignore = "requires an OS keychain"]
    fn test_keychain_store_reads_back_from_fresh_instance() {
        let service = "gobarber-test-keychain";
        KeychainStore::with_service(service).set("GoBarber:token", "abc").unwrap();

        let reopened = KeychainStore::with_service(service);
        assert_eq!(reopened.get("GoBarber:token").unwrap().as_deref(), Some("abc"));

        reopened.remove("GoBarber:token").unwrap();
        assert_eq!(KeychainStore::with_service(service).get("GoBarber:token").unwrap(), None);
        // Removing again is not an error
        reopened.remove("GoBarber:token").unwrap();
    }
}
