//! User-action handlers behind the window.
//!
//! [`Desk`] holds everything one operator's window needs: the [`Session`],
//! both data accessors and one [`QueryPanel`] per [`QueryTarget`].  Each
//! handler runs to completion and hands back [`Notice`]s; the UI only draws
//! them.
//!
//! ```text
//!   login ──▶ CredentialStore::authenticate ──▶ Session::login
//!   Speak ──▶ (worker) VoiceInput ──▶ apply_speech ──▶ panel text
//!   Find  ──▶ InventoryAccessor::load ──▶ QueryTarget::run ──▶ notices
//! ```

use std::sync::Arc;

use crate::config::DataConfig;
use crate::query::QueryTarget;
use crate::session::Session;
use crate::speech::{RecognitionFailure, SpeechOutcome};
use crate::store::{CredentialStore, DataError, InventoryAccessor, InventoryTable};

pub const INVALID_LOGIN: &str = "Invalid username or password!";
pub const NOT_LOGGED_IN: &str = "Please log in first.";
pub const INVENTORY_NOT_FOUND: &str = "Inventory data file not found!";
pub const CAPTURE_BROADENED: &str = "Speech was not captured; showing every stock item.";

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-visible message with a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }
}

// ---------------------------------------------------------------------------
// QueryPanel
// ---------------------------------------------------------------------------

/// Where a panel's pending query text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuerySource {
    #[default]
    Typed,
    Spoken,
    /// Speech capture failed and left the text empty.
    FailedCapture,
}

/// Pending input of one lookup panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPanel {
    pub text: String,
    pub source: QuerySource,
}

// ---------------------------------------------------------------------------
// Desk
// ---------------------------------------------------------------------------

pub struct Desk {
    session: Session,
    credentials: CredentialStore,
    inventory: InventoryAccessor,
    panels: [QueryPanel; 3],
}

impl Desk {
    pub fn new(credentials: CredentialStore, inventory: InventoryAccessor) -> Self {
        Self {
            session: Session::new(),
            credentials,
            inventory,
            panels: Default::default(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(
            CredentialStore::new(&config.credentials_file),
            InventoryAccessor::new(&config.inventory_file),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn panel(&self, target: QueryTarget) -> &QueryPanel {
        &self.panels[target.index()]
    }

    pub fn query_text(&self, target: QueryTarget) -> &str {
        &self.panel(target).text
    }

    /// Check the credentials and start a session on success.
    pub fn login(&mut self, username: &str, password: &str) -> Vec<Notice> {
        let role = match self.credentials.authenticate(username, password) {
            Ok(Some(role)) => role,
            Ok(None) => return vec![Notice::error(INVALID_LOGIN)],
            Err(e) => {
                log::error!("credential lookup failed: {e}");
                return vec![Notice::error(describe_data_error(&e)), Notice::error(INVALID_LOGIN)];
            }
        };

        let notice = Notice::success(format!("Logged in as {role}"));
        match self.session.login(role) {
            Ok(()) => vec![notice],
            Err(e) => vec![Notice::info(e.to_string())],
        }
    }

    /// End the session and clear every panel.
    pub fn logout(&mut self) -> Vec<Notice> {
        self.panels = Default::default();
        if self.session.logout() {
            log::info!("logged out");
            vec![Notice::info("Logged out")]
        } else {
            Vec::new()
        }
    }

    /// The memoized inventory table.
    pub fn inventory(&mut self) -> Result<Arc<InventoryTable>, Notice> {
        if !self.session.is_logged_in() {
            return Err(Notice::error(NOT_LOGGED_IN));
        }
        self.inventory.load().map_err(|e| {
            log::error!("inventory load failed: {e}");
            if e.is_not_found() {
                Notice::error(INVENTORY_NOT_FOUND)
            } else {
                Notice::error(describe_data_error(&e))
            }
        })
    }

    /// Typed input replaces the pending query.
    pub fn set_query_text(&mut self, target: QueryTarget, text: impl Into<String>) {
        self.panels[target.index()] = QueryPanel {
            text: text.into(),
            source: QuerySource::Typed,
        };
    }

    /// Store a capture result as the panel's pending query.
    pub fn apply_speech(&mut self, target: QueryTarget, outcome: SpeechOutcome) -> Notice {
        if !self.session.is_logged_in() {
            return Notice::error(NOT_LOGGED_IN);
        }

        let failure = outcome.failure();
        let text = outcome.into_query_text();
        let (source, notice) = match failure {
            None => (
                QuerySource::Spoken,
                Notice::success(format!("Recognized: {text}")),
            ),
            Some(failure @ RecognitionFailure::NotUnderstood) => {
                (QuerySource::FailedCapture, Notice::warning(failure.message()))
            }
            Some(failure @ RecognitionFailure::ServiceUnavailable) => {
                (QuerySource::FailedCapture, Notice::error(failure.message()))
            }
        };
        self.panels[target.index()] = QueryPanel { text, source };
        notice
    }

    /// Look up the panel's pending query and describe every match.
    pub fn run_query(&mut self, target: QueryTarget) -> Vec<Notice> {
        let table = match self.inventory() {
            Ok(table) => table,
            Err(notice) => return vec![notice],
        };

        let panel = &self.panels[target.index()];
        let mut notices = Vec::new();
        if panel.source == QuerySource::FailedCapture && panel.text.is_empty() {
            notices.push(Notice::warning(CAPTURE_BROADENED));
        }

        let hits = target.run(&table, &panel.text);
        log::info!("{target:?} query {:?}: {} match(es)", panel.text, hits.len());
        if hits.is_empty() {
            notices.push(Notice::warning(target.not_found()));
        } else {
            notices.extend(hits.into_iter().map(|r| Notice::success(target.describe(r))));
        }
        notices
    }
}

fn describe_data_error(e: &DataError) -> String {
    let name = e
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| e.path().display().to_string());
    if e.is_not_found() {
        format!("Error: {name} file not found!")
    } else {
        format!("Error: {e}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Role, SessionError};
    use crate::speech::RecognitionError;
    use std::path::Path;
    use tempfile::TempDir;

    const USERS: &str = "username,password,role\nalice,pw123,manager\nbob,hunter2,picker\n";
    const STOCK: &str = "Stock Name,Location,Quantity,Replenishment Date\n\
                         Salmon,A1,10,2024-05-01\n\
                         salmon fillet,A2,5,2024-05-10\n\
                         Tuna,B7,3,2024-06-02\n";

    fn desk_with(dir: &TempDir, users: Option<&str>, stock: Option<&str>) -> Desk {
        let users_path = dir.path().join("users.csv");
        let stock_path = dir.path().join("inventory.csv");
        if let Some(users) = users {
            std::fs::write(&users_path, users).unwrap();
        }
        if let Some(stock) = stock {
            std::fs::write(&stock_path, stock).unwrap();
        }
        Desk::new(
            CredentialStore::new(users_path),
            InventoryAccessor::new(stock_path),
        )
    }

    fn logged_in(dir: &TempDir) -> Desk {
        let mut desk = desk_with(dir, Some(USERS), Some(STOCK));
        desk.login("alice", "pw123");
        desk
    }

    fn texts(notices: &[Notice]) -> Vec<&str> {
        notices.iter().map(|n| n.text.as_str()).collect()
    }

    #[test]
    fn login_success_reports_role() {
        let dir = TempDir::new().unwrap();
        let mut desk = desk_with(&dir, Some(USERS), None);
        let notices = desk.login("alice", "pw123");
        assert_eq!(notices, [Notice::success("Logged in as manager")]);
        assert_eq!(desk.session().role().map(|r| r.as_str()), Some("manager"));
    }

    #[test]
    fn wrong_password_keeps_session_logged_out() {
        let dir = TempDir::new().unwrap();
        let mut desk = desk_with(&dir, Some(USERS), None);
        assert_eq!(desk.login("alice", "wrong"), [Notice::error(INVALID_LOGIN)]);
        assert!(!desk.session().is_logged_in());
    }

    #[test]
    fn missing_credential_file_is_reported_and_login_fails() {
        let dir = TempDir::new().unwrap();
        let mut desk = desk_with(&dir, None, None);
        let notices = desk.login("alice", "pw123");
        assert_eq!(
            texts(&notices),
            ["Error: users.csv file not found!", INVALID_LOGIN]
        );
        assert!(!desk.session().is_logged_in());
    }

    #[test]
    fn second_login_is_refused_without_changing_role() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        let notices = desk.login("bob", "hunter2");
        let expected = SessionError::AlreadyLoggedIn(Role::new("manager")).to_string();
        assert_eq!(notices, [Notice::info(expected)]);
        assert_eq!(desk.session().role().map(|r| r.as_str()), Some("manager"));
    }

    #[test]
    fn blank_role_row_logs_in_as_unassigned() {
        let dir = TempDir::new().unwrap();
        let mut desk = desk_with(&dir, Some("username,password,role\nghost,boo,\n"), None);
        assert_eq!(
            desk.login("ghost", "boo"),
            [Notice::success(format!("Logged in as {}", Role::UNASSIGNED))]
        );
        assert!(desk.session().is_logged_in());
    }

    #[test]
    fn logout_clears_session_and_panels() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        desk.set_query_text(QueryTarget::Location, "salmon");
        assert_eq!(desk.logout(), [Notice::info("Logged out")]);
        assert!(!desk.session().is_logged_in());
        assert_eq!(desk.query_text(QueryTarget::Location), "");
        assert!(desk.logout().is_empty());
    }

    #[test]
    fn handlers_require_a_session() {
        let dir = TempDir::new().unwrap();
        let mut desk = desk_with(&dir, Some(USERS), Some(STOCK));
        assert_eq!(desk.inventory().unwrap_err(), Notice::error(NOT_LOGGED_IN));
        assert_eq!(
            desk.run_query(QueryTarget::Location),
            [Notice::error(NOT_LOGGED_IN)]
        );
        assert_eq!(
            desk.apply_speech(QueryTarget::Location, SpeechOutcome::Recognized("x".into())),
            Notice::error(NOT_LOGGED_IN)
        );
    }

    #[test]
    fn typed_salmon_lists_both_rows() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        desk.set_query_text(QueryTarget::Location, "salmon");
        let notices = desk.run_query(QueryTarget::Location);
        assert_eq!(
            texts(&notices),
            ["Salmon is located at A1", "salmon fillet is located at A2"]
        );
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Success));
    }

    #[test]
    fn unknown_stock_warns_per_target() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        for target in QueryTarget::ALL {
            desk.set_query_text(target, "tofu");
            assert_eq!(desk.run_query(target), [Notice::warning(target.not_found())]);
        }
    }

    #[test]
    fn recognised_speech_becomes_the_query() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        let notice = desk.apply_speech(
            QueryTarget::Quantity,
            SpeechOutcome::Recognized("tuna".into()),
        );
        assert_eq!(notice, Notice::success("Recognized: tuna"));
        assert_eq!(desk.panel(QueryTarget::Quantity).source, QuerySource::Spoken);
        assert_eq!(
            texts(&desk.run_query(QueryTarget::Quantity)),
            ["Tuna has 3 units in stock."]
        );
    }

    #[test]
    fn failed_capture_shows_full_table_with_warning() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        let notice = desk.apply_speech(
            QueryTarget::Replenishment,
            SpeechOutcome::Failed(RecognitionError::NoSpeech { waited_secs: 5 }),
        );
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(desk.query_text(QueryTarget::Replenishment), "");

        let notices = desk.run_query(QueryTarget::Replenishment);
        assert_eq!(notices[0], Notice::warning(CAPTURE_BROADENED));
        assert_eq!(notices.len(), 4);
    }

    #[test]
    fn unavailable_service_is_an_error_notice() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        let notice = desk.apply_speech(
            QueryTarget::Location,
            SpeechOutcome::Failed(RecognitionError::ServiceUnreachable("down".into())),
        );
        assert_eq!(
            notice,
            Notice::error(RecognitionFailure::ServiceUnavailable.message())
        );
    }

    #[test]
    fn typing_after_failed_capture_drops_the_warning() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        desk.apply_speech(
            QueryTarget::Location,
            SpeechOutcome::Failed(RecognitionError::EmptyTranscript),
        );
        desk.set_query_text(QueryTarget::Location, "");
        let notices = desk.run_query(QueryTarget::Location);
        assert_eq!(notices.len(), 3);
        assert!(!texts(&notices).contains(&CAPTURE_BROADENED));
    }

    #[test]
    fn panels_are_independent() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        desk.set_query_text(QueryTarget::Location, "salmon");
        desk.set_query_text(QueryTarget::Quantity, "tuna");
        assert_eq!(desk.query_text(QueryTarget::Location), "salmon");
        assert_eq!(desk.query_text(QueryTarget::Quantity), "tuna");
        assert_eq!(desk.query_text(QueryTarget::Replenishment), "");
    }

    #[test]
    fn missing_inventory_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut desk = desk_with(&dir, Some(USERS), None);
        desk.login("alice", "pw123");
        assert_eq!(desk.inventory().unwrap_err(), Notice::error(INVENTORY_NOT_FOUND));
        assert_eq!(
            desk.run_query(QueryTarget::Location),
            [Notice::error(INVENTORY_NOT_FOUND)]
        );
    }

    #[test]
    fn inventory_is_loaded_once() {
        let dir = TempDir::new().unwrap();
        let mut desk = logged_in(&dir);
        let first = desk.inventory().unwrap();
        std::fs::remove_file(dir.path().join("inventory.csv")).unwrap();
        let second = desk.inventory().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn data_error_text_names_the_file() {
        let e = DataError::Unavailable {
            path: Path::new("/data/users.csv").to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(describe_data_error(&e), "Error: users.csv file not found!");
    }

    #[test]
    fn from_config_uses_configured_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("u.csv"), USERS).unwrap();
        let config = DataConfig {
            credentials_file: dir.path().join("u.csv"),
            inventory_file: dir.path().join("missing.csv"),
        };
        let mut desk = Desk::from_config(&config);
        assert_eq!(desk.login("bob", "hunter2"), [Notice::success("Logged in as picker")]);
    }
}
