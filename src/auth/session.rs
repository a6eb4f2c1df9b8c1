use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use secrecy::SecretString;

use crate::{
    auth::token,
    config::Config,
    errors::AppResult,
    models::domain::user::{AuthUser, Role},
    storage::{FileStorage, KeyValueStorage, MemoryStorage},
};

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const USER_ID_KEY: &str = "userId";
pub const DISPLAY_NAME_KEY: &str = "username";

const SESSION_KEYS: [&str; 4] = [TOKEN_KEY, ROLE_KEY, USER_ID_KEY, DISPLAY_NAME_KEY];

/// Snapshot of the signed-in user.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub role: Role,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
}

/// The single session of this client.
///
/// Every public method takes `op_lock` for its whole read-modify-write, so
/// callers never observe a session that is half saved or half cleared.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    op_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            op_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// File-backed when `session_file` is configured, in-memory otherwise.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        match &config.session_file {
            Some(path) => Ok(Self::new(Arc::new(FileStorage::open(path)?))),
            None => Ok(Self::in_memory()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.op_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces whatever session was stored with the one from a login
    /// response. The role comes from the user block, falling back to the
    /// token's own claim.
    pub fn save(&self, token: &str, user: &AuthUser) -> AppResult<()> {
        let _guard = self.lock();
        self.clear_locked();

        self.storage.set(TOKEN_KEY, token)?;

        let role = user
            .parsed_role()
            .or_else(|| token::decode(token).ok().and_then(|claims| claims.role));
        if let Some(role) = role {
            self.storage.set(ROLE_KEY, role.as_str())?;
        }
        if let Some(id) = &user.id {
            self.storage.set(USER_ID_KEY, id)?;
        }
        if let Some(name) = user.display_name() {
            self.storage.set(DISPLAY_NAME_KEY, &name)?;
        }

        log::info!("Session saved for user {:?} with role {:?}", user.id, role);
        Ok(())
    }

    pub fn current_role(&self) -> Option<Role> {
        self.current_session().map(|session| session.role)
    }

    /// Resolves the stored session, tearing it down if the token is
    /// missing, undecodable, expired or carries no recognized role.
    pub fn current_session(&self) -> Option<Session> {
        let _guard = self.lock();
        self.resolve_locked()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// User id slot, falling back to the token's subject claim.
    pub fn user_id(&self) -> Option<String> {
        self.current_session().and_then(|session| session.user_id)
    }

    pub fn display_name(&self) -> Option<String> {
        self.current_session().and_then(|session| session.display_name)
    }

    /// Raw stored token with no expiry check; what goes on the wire.
    pub fn token(&self) -> Option<SecretString> {
        let _guard = self.lock();
        self.read(TOKEN_KEY).map(SecretString::from)
    }

    pub fn clear(&self) {
        let _guard = self.lock();
        self.clear_locked();
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read session slot '{}': {}", key, e);
                None
            }
        }
    }

    fn resolve_locked(&self) -> Option<Session> {
        let Some(raw_token) = self.read(TOKEN_KEY) else {
            self.clear_locked();
            return None;
        };

        let claims = match token::decode_unexpired(&raw_token, Utc::now()) {
            Ok(claims) => claims,
            Err(e) => {
                log::info!("Discarding stored session: {}", e);
                self.clear_locked();
                return None;
            }
        };

        let cached_role = self.read(ROLE_KEY).and_then(|r| r.parse::<Role>().ok());
        let Some(role) = cached_role.or(claims.role) else {
            log::warn!("Stored token carries no recognized role; clearing session");
            self.clear_locked();
            return None;
        };
        if cached_role.is_none() {
            if let Err(e) = self.storage.set(ROLE_KEY, role.as_str()) {
                log::warn!("Failed to cache role: {}", e);
            }
        }

        Some(Session {
            token: SecretString::from(raw_token),
            role,
            user_id: self.read(USER_ID_KEY).or(claims.subject_id),
            display_name: self.read(DISPLAY_NAME_KEY),
        })
    }

    fn clear_locked(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                log::warn!("Failed to remove session slot '{}': {}", key, e);
            }
        }
    }
}
