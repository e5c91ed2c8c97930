//! Key/value persistence for session and UI state.
//!
//! [`Storage`] is the raw string store; [`LocalStore`] layers typed accessors
//! for every key the client persists. Values that fail to parse read as
//! absent.
//!
//! The bearer token is a secret and goes to a separate backend, the system
//! keyring ([`KeyringStorage`]) in the desktop app. Everything else lives in
//! a JSON file under the platform data directory.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use newsdesk_api::{SessionStore, User, UserId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::credits::CreditRecord;
use crate::error::Result;
use crate::ui::ThemeMode;

/// Bearer token key.
pub const TOKEN_KEY: &str = "auth_token";
/// Serialized user key.
pub const USER_KEY: &str = "auth_user";
/// Theme preference key.
pub const THEME_KEY: &str = "theme_mode";

/// Service name used for keyring entries.
const KEYRING_SERVICE: &str = "newsdesk";

/// Per-user credit record key.
#[must_use]
pub fn credits_key(user_id: UserId) -> String {
    format!("credits_{user_id}")
}

/// Per-user key for the dismissed search alert.
#[must_use]
pub fn search_alert_key(user_id: UserId) -> String {
    format!("search_alert_dismissed_{user_id}")
}

/// String key/value store.
///
/// Writers do not coordinate; the last write wins.
pub trait Storage: Send + Sync {
    /// Reads a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes a value. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process storage, used by tests and as a fallback when no data
/// directory is available.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk.
///
/// The whole map is rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Default location: `<data dir>/newsdesk/storage.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("newsdesk").join("storage.json"))
    }

    /// Opens (or starts) the store at `path`. A corrupt file starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable storage file {}: {e}", path.display());
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        debug!("Opened storage at {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

/// Storage backed by the platform credential store:
/// - Linux: Secret Service (GNOME Keyring, `KWallet`)
/// - macOS: Keychain
/// - Windows: Credential Manager
///
/// Each key is one keyring entry under the service name.
#[derive(Debug, Clone)]
pub struct KeyringStorage {
    service: String,
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE)
    }
}

impl KeyringStorage {
    /// Entries under `service`.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry> {
        Ok(keyring::Entry::new(&self.service, key)?)
    }
}

impl Storage for KeyringStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entry = self
            .entry(key)
            .map_err(|e| warn!("Keyring unavailable for {key}: {e}"))
            .ok()?;
        match entry.get_password() {
            Ok(secret) => Some(secret),
            Err(keyring::Error::NoEntry) => {
                debug!("No keyring entry for {key}");
                None
            }
            Err(e) => {
                warn!("Failed to read {key} from keyring: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?.set_password(value)?;
        debug!("Stored {key} in keyring");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => debug!("Deleted {key} from keyring"),
            Err(keyring::Error::NoEntry) => debug!("No {key} to delete from keyring"),
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

/// Typed view over a [`Storage`], with secrets kept in a second backend.
#[derive(Clone)]
pub struct LocalStore {
    storage: Arc<dyn Storage>,
    secrets: Arc<dyn Storage>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

impl LocalStore {
    /// Wraps one backend for every key, secrets included.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            secrets: Arc::clone(&storage),
            storage,
        }
    }

    /// Keeps the token in `secrets` and everything else in `storage`.
    ///
    /// A token left in `storage` by an older build is moved over.
    #[must_use]
    pub fn with_secrets(storage: Arc<dyn Storage>, secrets: Arc<dyn Storage>) -> Self {
        if let Some(token) = storage.get(TOKEN_KEY) {
            match secrets.set(TOKEN_KEY, &token) {
                Ok(()) => {
                    if let Err(e) = storage.remove(TOKEN_KEY) {
                        warn!("Failed to remove migrated token: {e}");
                    }
                }
                Err(e) => warn!("Failed to move token to secure storage: {e}"),
            }
        }
        Self { storage, secrets }
    }

    /// In-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// File-backed store at the default location with the token in the
    /// system keyring. Falls back to memory for the file part when no data
    /// directory exists or the file cannot be read.
    #[must_use]
    pub fn open_default() -> Self {
        let storage: Arc<dyn Storage> = match FileStorage::default_path().map(FileStorage::open) {
            Some(Ok(storage)) => Arc::new(storage),
            Some(Err(e)) => {
                warn!("Falling back to in-memory storage: {e}");
                Arc::new(MemoryStorage::new())
            }
            None => {
                warn!("No data directory available, using in-memory storage");
                Arc::new(MemoryStorage::new())
            }
        };
        Self::with_secrets(storage, Arc::new(KeyringStorage::default()))
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Discarding unparsable value for {key}: {e}");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.storage.set(key, &json)
    }

    /// Stored bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.secrets.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored user.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read_json(USER_KEY)
    }

    /// Persists token and user together.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails.
    pub fn save_session(&self, token: &str, user: &User) -> Result<()> {
        self.secrets.set(TOKEN_KEY, token)?;
        self.set_user(user)
    }

    /// Replaces the stored user.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_user(&self, user: &User) -> Result<()> {
        self.write_json(USER_KEY, user)
    }

    /// Removes token and user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    pub fn clear_session(&self) -> Result<()> {
        self.secrets.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)
    }

    /// Stored theme preference.
    #[must_use]
    pub fn theme(&self) -> Option<ThemeMode> {
        self.storage.get(THEME_KEY)?.parse().ok()
    }

    /// Persists the theme preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_theme(&self, theme: ThemeMode) -> Result<()> {
        self.storage.set(THEME_KEY, theme.as_str())
    }

    /// Stored credit record for a user.
    #[must_use]
    pub fn credits(&self, user_id: UserId) -> Option<CreditRecord> {
        self.read_json(&credits_key(user_id))
    }

    /// Persists a user's credit record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_credits(&self, user_id: UserId, record: &CreditRecord) -> Result<()> {
        self.write_json(&credits_key(user_id), record)
    }

    /// Whether the user dismissed the search alert.
    #[must_use]
    pub fn search_alert_dismissed(&self, user_id: UserId) -> bool {
        self.storage
            .get(&search_alert_key(user_id))
            .is_some_and(|v| v == "true")
    }

    /// Remembers that the user dismissed the search alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn dismiss_search_alert(&self, user_id: UserId) -> Result<()> {
        self.storage.set(&search_alert_key(user_id), "true")
    }
}

impl SessionStore for LocalStore {
    fn token(&self) -> Option<String> {
        Self::token(self)
    }

    fn clear(&self) {
        if let Err(e) = self.clear_session() {
            warn!("Failed to clear stored session: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId(3),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_session_round_trip_and_clear() {
        let store = LocalStore::in_memory();
        store.save_session("tok", &user()).unwrap();
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user(), Some(user()));

        store.clear_session().unwrap();
        assert!(store.token().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_corrupt_values_read_as_absent() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(USER_KEY, "{not json").unwrap();
        storage.set(THEME_KEY, "sepia").unwrap();
        storage.set(&credits_key(UserId(3)), "[]").unwrap();

        let store = LocalStore::new(storage);
        assert!(store.user().is_none());
        assert!(store.theme().is_none());
        assert!(store.credits(UserId(3)).is_none());
    }

    #[test]
    fn test_per_user_keys() {
        assert_eq!(credits_key(UserId(12)), "credits_12");
        assert_eq!(search_alert_key(UserId(12)), "search_alert_dismissed_12");

        let store = LocalStore::in_memory();
        assert!(!store.search_alert_dismissed(UserId(1)));
        store.dismiss_search_alert(UserId(1)).unwrap();
        assert!(store.search_alert_dismissed(UserId(1)));
        assert!(!store.search_alert_dismissed(UserId(2)));
    }

    #[test]
    fn test_session_store_clear_is_infallible() {
        let store = LocalStore::in_memory();
        store.save_session("tok", &user()).unwrap();
        SessionStore::clear(&store);
        assert!(SessionStore::token(&store).is_none());
    }

    #[test]
    fn test_file_storage_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(THEME_KEY, "dark").unwrap();
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.remove(TOKEN_KEY).unwrap();

        let reopened = LocalStore::new(Arc::new(FileStorage::open(&path).unwrap()));
        assert_eq!(reopened.theme(), Some(ThemeMode::Dark));
        assert!(reopened.token().is_none());
    }

    #[test]
    fn test_file_storage_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert!(storage.get(THEME_KEY).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // The parent is a file, so every persist fails.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let storage = FileStorage::open(blocker.join("storage.json")).unwrap();
        assert!(storage.set(THEME_KEY, "dark").is_err());
        assert!(storage.get(THEME_KEY).is_none());
    }

    #[test]
    fn test_token_is_kept_out_of_plain_storage() {
        let plain = Arc::new(MemoryStorage::new());
        let secrets = Arc::new(MemoryStorage::new());
        let store = LocalStore::with_secrets(plain.clone(), secrets.clone());

        store.save_session("tok", &user()).unwrap();
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert!(plain.get(TOKEN_KEY).is_none());
        assert!(plain.get(USER_KEY).is_some());
        assert_eq!(secrets.get(TOKEN_KEY).as_deref(), Some("tok"));

        store.clear_session().unwrap();
        assert!(secrets.get(TOKEN_KEY).is_none());
        assert!(plain.get(USER_KEY).is_none());
    }

    #[test]
    fn test_plain_token_is_migrated_to_secrets() {
        let plain = Arc::new(MemoryStorage::new());
        plain.set(TOKEN_KEY, "old").unwrap();
        let secrets = Arc::new(MemoryStorage::new());

        let store = LocalStore::with_secrets(plain.clone(), secrets.clone());
        assert_eq!(store.token().as_deref(), Some("old"));
        assert!(plain.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_missing_keyring_entry_reads_as_absent() {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        let keyring = KeyringStorage::new("newsdesk-test");
        assert!(keyring.get(TOKEN_KEY).is_none());
        keyring.remove(TOKEN_KEY).unwrap();
    }
}
