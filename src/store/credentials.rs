//! Credential table lookup.
//!
//! The table is a CSV file with the header `username,password,role`.  It is
//! read in full on every [`CredentialStore::authenticate`] call and never
//! written.  Matching is exact and case-sensitive; the first matching row wins
//! when usernames repeat.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{read_rows, DataError};
use crate::session::Role;

/// One row of the credential table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
}

/// Read-only accessor over the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every credential row in file order.
    pub fn load(&self) -> Result<Vec<CredentialRecord>, DataError> {
        read_rows(&self.path)
    }

    /// Return the role of the first row whose username and password both
    /// equal the inputs.
    ///
    /// * `Ok(Some(_))`: a row matched; a blank role cell yields
    ///   [`Role::UNASSIGNED`].
    /// * `Ok(None)`: no row matched.
    /// * `Err(_)`: the table could not be loaded.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<Role>, DataError> {
        let records = self.load()?;
        let Some(record) = records
            .iter()
            .find(|r| r.username == username && r.password == password)
        else {
            log::info!("login rejected for user '{username}'");
            return Ok(None);
        };

        if record.role.trim().is_empty() {
            log::warn!("credential row for '{username}' has a blank role");
        }
        let role = Role::new(record.role.as_str());
        log::info!("user '{username}' authenticated as '{role}'");
        Ok(Some(role))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
