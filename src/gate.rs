//! Route guard for the admin pages.
//!
//! The policy ([`decide`], [`guard`]) is pure; [`AuthGate`] feeds it from a
//! [`SessionStore`] and remembers what it saw so callers can re-run it only
//! when the stored session changes.

use crate::{
    models::Session,
    session::{SessionError, SessionStore, Storage},
};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Unchecked,
    Unauthenticated,
    Authenticated(String),
}

/// Where an authenticated user lands after passing the gate.
pub fn landing_path(session: &Session) -> String {
    match session.slug() {
        Some(slug) if session.is_restaurant() => {
            format!("/{}{}", urlencoding::encode(slug), DASHBOARD_PATH)
        }
        _ => DASHBOARD_PATH.to_string(),
    }
}

pub fn decide(session: Option<&Session>) -> Decision {
    match session {
        None => Decision::Redirect(LOGIN_PATH.to_string()),
        Some(s) => Decision::Redirect(landing_path(s)),
    }
}

/// Like [`decide`], but lets the request through when it already targets the
/// area the session belongs to.
pub fn guard(session: Option<&Session>, requested_path: &str) -> Decision {
    let home = match session {
        None => LOGIN_PATH.to_string(),
        Some(s) => landing_path(s),
    };

    if is_within(requested_path, &home) {
        Decision::Allow
    } else {
        Decision::Redirect(home)
    }
}

fn is_within(path: &str, root: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    path == root || path.starts_with(&format!("{}/", root))
}

pub struct AuthGate<S: Storage> {
    store: SessionStore<S>,
    state: GateState,
    last_seen: Option<Option<String>>,
}

impl<S: Storage> AuthGate<S> {
    pub fn new(store: SessionStore<S>) -> Self {
        Self {
            store,
            state: GateState::Unchecked,
            last_seen: None,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Reads the store and decides where the page mount should go.
    pub fn mount(&mut self) -> Result<Decision, SessionError> {
        let session = self.evaluate()?;
        Ok(decide(session.as_ref()))
    }

    /// Same as [`AuthGate::mount`] for a concrete page path.
    pub fn mount_at(&mut self, requested_path: &str) -> Result<Decision, SessionError> {
        let session = self.evaluate()?;
        Ok(guard(session.as_ref(), requested_path))
    }

    /// Re-runs the check only if the stored session changed since the last
    /// evaluation, e.g. after a logout somewhere else in the app.
    pub fn refresh(&mut self) -> Result<Option<Decision>, SessionError> {
        let current = self.store.raw()?;
        if self.last_seen.as_ref() == Some(&current) {
            return Ok(None);
        }
        self.mount().map(Some)
    }

    pub fn logout(&mut self) -> Result<Decision, SessionError> {
        self.store.clear()?;
        log::info!("👋 Session cleared");
        self.mount()
    }

    fn evaluate(&mut self) -> Result<Option<Session>, SessionError> {
        let session = self.store.get()?;
        self.state = match &session {
            Some(s) => GateState::Authenticated(s.role.clone()),
            None => GateState::Unauthenticated,
        };
        // Read after `get`, which may have cleared a corrupt value.
        self.last_seen = Some(self.store.raw()?);
        Ok(session)
    }
}
