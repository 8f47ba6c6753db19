use crate::crypto::aes::{self, SecureKey};
use crate::error::{AppError, Result};
use crate::models::session::Session;
use crate::session::storage::KeyValueStorage;

/// Storage key of the sealed session payload.
pub const USER_KEY: &str = "user";
/// Storage key of the sealed last-refresh timestamp.
pub const LAST_REFRESHED_KEY: &str = "lastRefreshed";

/// A session read back from persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub session: Session,
    /// Epoch milliseconds of the last sliding refresh.
    pub refreshed_at: i64,
}

/// Persistence boundary of `SessionGuard`.
///
/// Swapping the encryption scheme means swapping the implementation; the
/// guard only sees these three calls.
pub trait SessionStore {
    /// `Ok(None)` when nothing (or only half of the pair) is stored.
    /// `Err` when something is stored but cannot be opened or parsed.
    fn load(&self) -> Result<Option<StoredSession>>;

    /// Persists the payload and its refresh timestamp together.
    fn save(&self, session: &Session, refreshed_at: i64) -> Result<()>;

    fn clear(&self);
}

/// Seals the session and timestamp with AES-256-GCM under two fixed keys.
pub struct EncryptedSessionStore<S> {
    storage: S,
    key: SecureKey,
}

impl<S: KeyValueStorage> EncryptedSessionStore<S> {
    /// Creates a store whose cipher key is derived from `secret`.
    ///
    /// # Arguments
    ///
    /// * `storage` - The backing key/value storage.
    /// * `secret` - The configuration-supplied session secret.
    pub fn new(storage: S, secret: &str) -> Self {
        Self {
            storage,
            key: SecureKey::from_secret(secret),
        }
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> SessionStore for EncryptedSessionStore<S> {
    fn load(&self) -> Result<Option<StoredSession>> {
        let (Some(sealed_user), Some(sealed_refreshed)) = (
            self.storage.get(USER_KEY),
            self.storage.get(LAST_REFRESHED_KEY),
        ) else {
            return Ok(None);
        };

        let user_json = aes::open(&self.key, &sealed_user)?;
        let session: Session = sonic_rs::from_slice(&user_json)?;

        let refreshed_raw = aes::open(&self.key, &sealed_refreshed)?;
        let refreshed_at = std::str::from_utf8(&refreshed_raw)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| AppError::Serialization("Invalid refresh timestamp".to_string()))?;

        Ok(Some(StoredSession { session, refreshed_at }))
    }

    fn save(&self, session: &Session, refreshed_at: i64) -> Result<()> {
        let user_json = sonic_rs::to_string(session)?;
        let sealed_user = aes::seal(&self.key, user_json.as_bytes())?;
        let sealed_refreshed = aes::seal(&self.key, refreshed_at.to_string().as_bytes())?;

        self.storage.set_many(&[
            (USER_KEY, sealed_user),
            (LAST_REFRESHED_KEY, sealed_refreshed),
        ]);

        tracing::debug!("💾 Session persisted for user: {}", session.user_id);
        Ok(())
    }

    fn clear(&self) {
        self.storage.remove_many(&[USER_KEY, LAST_REFRESHED_KEY]);
    }
}
