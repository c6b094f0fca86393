//! Inventory table loading with a process-lifetime memo cell.
//!
//! [`InventoryAccessor::load`] reads the inventory CSV on the first successful
//! call and hands out the same [`Arc<InventoryTable>`] afterwards.  A failed
//! read leaves the cell empty, so the next call tries the file again.  Nothing
//! invalidates the cell once it is filled; a changed file is only observed by
//! a new process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use super::{read_rows, DataError};

// ---------------------------------------------------------------------------
// StockRecord
// ---------------------------------------------------------------------------

/// One row of the inventory file.
///
/// Every cell may be empty.  `quantity` is also `None` when the cell holds
/// something other than a non-negative integer, so one bad cell does not
/// make the whole table unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "Stock Name", default)]
    pub stock_name: Option<String>,
    #[serde(rename = "Location", default)]
    pub location: Option<String>,
    #[serde(
        rename = "Quantity",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub quantity: Option<u32>,
    #[serde(rename = "Replenishment Date", default)]
    pub replenishment_date: Option<String>,
}

impl StockRecord {
    /// Convenience constructor used by tests and fixtures.
    pub fn new(name: &str, location: &str, quantity: u32, replenishment_date: &str) -> Self {
        Self {
            stock_name: Some(name.to_string()),
            location: Some(location.to_string()),
            quantity: Some(quantity),
            replenishment_date: Some(replenishment_date.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// InventoryTable
// ---------------------------------------------------------------------------

/// Ordered, immutable set of stock records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryTable {
    records: Vec<StockRecord>,
}

impl InventoryTable {
    pub fn new(records: Vec<StockRecord>) -> Self {
        Self { records }
    }

    /// Records in source order.
    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<StockRecord> for InventoryTable {
    fn from_iter<I: IntoIterator<Item = StockRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// InventoryAccessor
// ---------------------------------------------------------------------------

/// Owns the inventory file path and the memo cell for its parsed contents.
#[derive(Debug)]
pub struct InventoryAccessor {
    path: PathBuf,
    cache: Option<Arc<InventoryTable>>,
}

impl InventoryAccessor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a table has already been loaded and cached.
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Return the cached table, reading the file on the first successful call.
    pub fn load(&mut self) -> Result<Arc<InventoryTable>, DataError> {
        if let Some(table) = &self.cache {
            return Ok(Arc::clone(table));
        }

        let records: Vec<StockRecord> = read_rows(&self.path)?;
        log::info!(
            "loaded {} inventory records from {}",
            records.len(),
            self.path.display()
        );

        let table = Arc::new(InventoryTable::new(records));
        self.cache = Some(Arc::clone(&table));
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
