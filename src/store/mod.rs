//! Read-only accessors for the two tabular data files.
//!
//! * [`CredentialStore`]: `username,password,role` rows, re-read on every
//!   authentication attempt.
//! * [`InventoryAccessor`]: stock rows, loaded once and kept in an explicit
//!   cache cell for the rest of the process.
//!
//! Both report [`DataError`] when their file cannot be read.  Callers turn
//! that into a user-visible notice; nothing here ever terminates the process.

pub mod credentials;
pub mod inventory;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use credentials::{CredentialRecord, CredentialStore};
pub use inventory::{InventoryAccessor, InventoryTable, StockRecord};

// ---------------------------------------------------------------------------
// DataError
// ---------------------------------------------------------------------------

/// A backing data file could not be used.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file is missing or could not be opened.
    #[error("data file unavailable: {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was opened but its rows could not be parsed.
    #[error("data file malformed: {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl DataError {
    /// Path of the file that failed.
    pub fn path(&self) -> &Path {
        match self {
            DataError::Unavailable { path, .. } | DataError::Malformed { path, .. } => path,
        }
    }

    /// `true` when the file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DataError::Unavailable { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Open `path` as a headed CSV reader, mapping open failures to
/// [`DataError::Unavailable`].
pub(crate) fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file))
}

/// Deserialize every row of a headed CSV file into `T`, in file order.
pub(crate) fn read_rows<T>(path: &Path) -> Result<Vec<T>, DataError>
where
    T: serde::de::DeserializeOwned,
{
    let mut reader = open_csv(path)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| DataError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unavailable_and_not_found() {
        let err = open_csv(Path::new("/nonexistent/users.csv")).unwrap_err();
        assert!(matches!(err, DataError::Unavailable { .. }));
        assert!(err.is_not_found());
        assert_eq!(err.path(), Path::new("/nonexistent/users.csv"));
    }

    #[test]
    fn error_display_names_the_file() {
        let err = open_csv(Path::new("/nonexistent/stock.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stock.csv"));
    }
}
