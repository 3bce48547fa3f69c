use super::{SessionError, Storage};
use crate::models::Session;

/// Fixed storage key holding the serialized session.
pub const SESSION_KEY: &str = "session";

pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads whatever is already stored, dropping it if it no longer parses.
    pub fn init(storage: S) -> Result<(Self, Option<Session>), SessionError> {
        let store = Self::new(storage);
        let session = store.get()?;
        match &session {
            Some(s) => log::debug!("Restored session for {} ({})", s.id, s.role),
            None => log::debug!("No stored session"),
        }
        Ok((store, session))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Raw stored value, used to notice when another writer replaced the session.
    pub fn raw(&self) -> Result<Option<String>, SessionError> {
        self.storage.get_item(SESSION_KEY)
    }

    /// Overwrites any previous session.
    pub fn set(&self, session: &Session) -> Result<(), SessionError> {
        session.validate().map_err(SessionError::Invalid)?;
        let raw = serde_json::to_string(session).map_err(|e| SessionError::Parse(e.to_string()))?;
        self.storage.set_item(SESSION_KEY, &raw)
    }

    /// `None` when nothing is stored. A value that fails to parse or validate
    /// is removed so later reads do not fail again.
    pub fn get(&self) -> Result<Option<Session>, SessionError> {
        let raw = match self.raw()? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match parse(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!("⚠️  Discarding stored session: {}", e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.storage.remove_item(SESSION_KEY)
    }
}

/// Deserializes and checks the session invariant in one step.
pub fn parse(raw: &str) -> Result<Session, SessionError> {
    let session: Session = serde_json::from_str(raw).map_err(|e| SessionError::Parse(e.to_string()))?;
    session.validate().map_err(SessionError::Parse)?;
    Ok(session)
}
