//! Table selection.

use serde::{Deserialize, Serialize};

/// Bookkeeping table of the Sequelize migration runner, never exported.
pub const SEQUELIZE_META_TABLE: &str = "SequelizeMeta";

/// Selects which tables get a migration.
///
/// An include list, when present, takes precedence over the skip list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableFilter {
    /// Only these tables, if set.
    pub tables: Option<Vec<String>>,
    /// Tables to leave out when no include list is set.
    pub skip_tables: Option<Vec<String>>,
}

impl TableFilter {
    /// Creates a filter accepting every table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to the given tables.
    #[must_use]
    pub fn only(mut self, tables: Vec<String>) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Skips the given tables.
    #[must_use]
    pub fn skip(mut self, tables: Vec<String>) -> Self {
        self.skip_tables = Some(tables);
        self
    }

    /// Returns true if a migration should be generated for the table.
    #[must_use]
    pub fn accepts(&self, table: &str) -> bool {
        if table == SEQUELIZE_META_TABLE {
            return false;
        }
        match (&self.tables, &self.skip_tables) {
            (Some(only), _) => only.iter().any(|t| t == table),
            (None, Some(skip)) => !skip.iter().any(|t| t == table),
            (None, None) => true,
        }
    }

    /// Filters a table listing, preserving its order.
    #[must_use]
    pub fn apply(&self, tables: Vec<String>) -> Vec<String> {
        tables.into_iter().filter(|t| self.accepts(t)).collect()
    }
}
