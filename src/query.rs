//! Stock lookup by case-insensitive substring match.
//!
//! [`find`] is the only matching rule in the tool.  The three lookups the UI
//! offers ([`QueryTarget`]) all match on the stock name and only differ in
//! which columns they describe.
//!
//! ```rust
//! use warehouse_voice::query::{find, StockField};
//! use warehouse_voice::store::{InventoryTable, StockRecord};
//!
//! let table: InventoryTable = vec![
//!     StockRecord::new("Salmon", "A1", 10, "2024-05-01"),
//!     StockRecord::new("salmon fillet", "A2", 5, "2024-05-10"),
//!     StockRecord::new("Tuna", "B7", 3, "2024-06-02"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let hits = find(&table, "SALMON", StockField::StockName);
//! assert_eq!(hits.len(), 2);
//! ```

use std::borrow::Cow;

use crate::store::{InventoryTable, StockRecord};

// ---------------------------------------------------------------------------
// StockField
// ---------------------------------------------------------------------------

/// Column a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockField {
    StockName,
    Location,
    /// Matched through its decimal text.
    Quantity,
    ReplenishmentDate,
}

impl StockField {
    /// The record's value for this column, `None` when the cell is empty.
    pub fn value<'a>(&self, record: &'a StockRecord) -> Option<Cow<'a, str>> {
        match self {
            StockField::StockName => record.stock_name.as_deref().map(Cow::Borrowed),
            StockField::Location => record.location.as_deref().map(Cow::Borrowed),
            StockField::Quantity => record.quantity.map(|q| Cow::Owned(q.to_string())),
            StockField::ReplenishmentDate => {
                record.replenishment_date.as_deref().map(Cow::Borrowed)
            }
        }
    }

    /// Column header as it appears in the inventory file.
    pub fn header(&self) -> &'static str {
        match self {
            StockField::StockName => "Stock Name",
            StockField::Location => "Location",
            StockField::Quantity => "Quantity",
            StockField::ReplenishmentDate => "Replenishment Date",
        }
    }

    pub const ALL: [StockField; 4] = [
        StockField::StockName,
        StockField::Location,
        StockField::Quantity,
        StockField::ReplenishmentDate,
    ];
}

// ---------------------------------------------------------------------------
// find
// ---------------------------------------------------------------------------

/// Every record whose `field` contains `query`, ignoring case, in table order.
///
/// An empty query matches every record that has a value in `field`.  Records
/// with an empty `field` never match.  The query is a literal substring: no
/// pattern syntax, no whitespace or punctuation folding.
pub fn find<'t>(table: &'t InventoryTable, query: &str, field: StockField) -> Vec<&'t StockRecord> {
    let needle = query.to_lowercase();
    table
        .records()
        .iter()
        .filter(|record| {
            field
                .value(record)
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// QueryTarget
// ---------------------------------------------------------------------------

/// The three lookups offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTarget {
    /// Where is it stored?
    Location,
    /// How many units are in stock?
    Quantity,
    /// When will it be restocked?
    Replenishment,
}

const UNKNOWN: &str = "unknown";

impl QueryTarget {
    pub const ALL: [QueryTarget; 3] = [
        QueryTarget::Location,
        QueryTarget::Quantity,
        QueryTarget::Replenishment,
    ];

    /// Column every target matches on.
    pub fn match_field(&self) -> StockField {
        StockField::StockName
    }

    /// Position in [`QueryTarget::ALL`].
    pub fn index(&self) -> usize {
        match self {
            QueryTarget::Location => 0,
            QueryTarget::Quantity => 1,
            QueryTarget::Replenishment => 2,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            QueryTarget::Location => "Find Stock Location",
            QueryTarget::Quantity => "Check Stock Quantity",
            QueryTarget::Replenishment => "Check Replenishment Date",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            QueryTarget::Location => "Enter stock name (e.g., 'Salmon')",
            QueryTarget::Quantity => "Enter stock name (e.g., 'Shrimp')",
            QueryTarget::Replenishment => "Enter stock name (e.g., 'Tuna')",
        }
    }

    /// Label of the button that runs the lookup.
    pub fn action(&self) -> &'static str {
        match self {
            QueryTarget::Location => "Find Stock Location",
            QueryTarget::Quantity => "Check Quantity",
            QueryTarget::Replenishment => "Check Replenishment Date",
        }
    }

    /// Message shown when nothing matched.
    pub fn not_found(&self) -> &'static str {
        match self {
            QueryTarget::Location | QueryTarget::Quantity => "Stock not found!",
            QueryTarget::Replenishment => "No restocking information found!",
        }
    }

    /// One-line answer for a matching record.
    pub fn describe(&self, record: &StockRecord) -> String {
        let name = record.stock_name.as_deref().unwrap_or(UNKNOWN);
        match self {
            QueryTarget::Location => format!(
                "{name} is located at {}",
                record.location.as_deref().unwrap_or(UNKNOWN)
            ),
            QueryTarget::Quantity => match record.quantity {
                Some(q) => format!("{name} has {q} units in stock."),
                None => format!("{name} has an {UNKNOWN} number of units in stock."),
            },
            QueryTarget::Replenishment => format!(
                "{name} should be restocked by {}.",
                record.replenishment_date.as_deref().unwrap_or(UNKNOWN)
            ),
        }
    }

    /// Run the lookup against `table`.
    pub fn run<'t>(&self, table: &'t InventoryTable, query: &str) -> Vec<&'t StockRecord> {
        find(table, query, self.match_field())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
