//! Login session state machine.
//!
//! ```text
//! LoggedOut ──login(role)──▶ LoggedIn(role)
//! LoggedIn(_) ──logout──────▶ LoggedOut
//! ```
//!
//! There is no expiry and no terminal state; a [`Session`] lives as long as
//! the window that owns it.  The role exists only inside `LoggedIn`, so a
//! logged-out session can never carry a stale role.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role string taken verbatim from the credential table (e.g. `"manager"`).
///
/// Never empty: a blank cell becomes [`Role::UNASSIGNED`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role(String);

impl Role {
    pub const UNASSIGNED: &'static str = "unassigned";

    pub fn new(role: impl Into<String>) -> Self {
        let role = role.into();
        if role.trim().is_empty() {
            Self(Self::UNASSIGNED.to_string())
        } else {
            Self(role)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The two states of an interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(Role),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("already logged in as '{0}'; log out first")]
    AlreadyLoggedIn(Role),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Session context passed explicitly to whatever handles user actions.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// A new session starts logged out.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn(_))
    }

    /// Role of the logged-in user, `None` while logged out.
    pub fn role(&self) -> Option<&Role> {
        match &self.state {
            SessionState::LoggedIn(role) => Some(role),
            SessionState::LoggedOut => None,
        }
    }

    /// `LoggedOut → LoggedIn(role)`.
    pub fn login(&mut self, role: Role) -> Result<(), SessionError> {
        match &self.state {
            SessionState::LoggedIn(current) => Err(SessionError::AlreadyLoggedIn(current.clone())),
            SessionState::LoggedOut => {
                log::debug!("session: LoggedOut -> LoggedIn({role})");
                self.state = SessionState::LoggedIn(role);
                Ok(())
            }
        }
    }

    /// `LoggedIn(_) → LoggedOut`.  Returns `false` if already logged out.
    pub fn logout(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            SessionState::LoggedIn(role) => {
                log::debug!("session: LoggedIn({role}) -> LoggedOut");
                true
            }
            SessionState::LoggedOut => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn role(s: &str) -> Role {
        Role::new(s)
    }

    #[test]
    fn new_session_is_logged_out() {
        let session = Session::new();
        assert_eq!(session.state(), &SessionState::LoggedOut);
        assert!(!session.is_logged_in());
        assert!(session.role().is_none());
    }

    #[test]
    fn login_carries_role() {
        let mut session = Session::new();
        session.login(role("manager")).unwrap();
        assert!(session.is_logged_in());
        assert_eq!(session.role().map(Role::as_str), Some("manager"));
    }

    #[test]
    fn login_twice_is_rejected_and_keeps_first_role() {
        let mut session = Session::new();
        session.login(role("manager")).unwrap();
        let err = session.login(role("picker")).unwrap_err();
        assert_eq!(err, SessionError::AlreadyLoggedIn(role("manager")));
        assert_eq!(session.role().map(Role::as_str), Some("manager"));
    }

    #[test]
    fn logout_clears_role() {
        let mut session = Session::new();
        session.login(role("manager")).unwrap();
        assert!(session.logout());
        assert_eq!(session.state(), &SessionState::LoggedOut);
        assert!(session.role().is_none());
    }

    #[test]
    fn logout_when_logged_out_is_noop() {
        let mut session = Session::new();
        assert!(!session.logout());
        assert_eq!(session.state(), &SessionState::LoggedOut);
    }

    #[test]
    fn relogin_after_logout() {
        let mut session = Session::new();
        session.login(role("manager")).unwrap();
        session.logout();
        session.login(role("picker")).unwrap();
        assert_eq!(session.role().map(Role::as_str), Some("picker"));
    }

    #[test]
    fn blank_role_becomes_unassigned() {
        assert_eq!(Role::new("").as_str(), Role::UNASSIGNED);
        assert_eq!(Role::new("   ").as_str(), Role::UNASSIGNED);
        assert_eq!(Role::new("admin").to_string(), "admin");
    }
}
