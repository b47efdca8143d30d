//! Migration operations.
//!
//! A generated migration is a list of forward operations (`up`) and the list
//! of operations that undo them (`down`).

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnDefinition, MigrationDescriptor};

/// A single migration operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationOperation {
    /// Create a new table.
    CreateTable {
        /// Table name.
        name: String,
        /// Column definitions, in declaration order.
        columns: Vec<ColumnDefinition>,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        name: String,
    },

    /// Create an index.
    AddIndex {
        /// Table name.
        table: String,
        /// Index name.
        name: String,
        /// Columns to index, in key order.
        columns: Vec<String>,
        /// Whether this is a unique index.
        unique: bool,
    },
}

impl MigrationOperation {
    /// Creates a CreateTable operation.
    #[must_use]
    pub fn create_table(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self::CreateTable {
            name: name.into(),
            columns,
        }
    }

    /// Creates a DropTable operation.
    #[must_use]
    pub fn drop_table(name: impl Into<String>) -> Self {
        Self::DropTable { name: name.into() }
    }

    /// Creates an AddIndex operation.
    #[must_use]
    pub fn add_index(
        table: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<String>,
        unique: bool,
    ) -> Self {
        Self::AddIndex {
            table: table.into(),
            name: name.into(),
            columns,
            unique,
        }
    }

    /// Returns the reverse operation for rollback.
    ///
    /// Only table creation has one: dropping a table also drops its indexes,
    /// and a dropped table cannot be restored without its definition.
    #[must_use]
    pub fn reverse(&self) -> Option<Self> {
        match self {
            Self::CreateTable { name, .. } => Some(Self::drop_table(name.clone())),
            Self::DropTable { .. } | Self::AddIndex { .. } => None,
        }
    }

    /// Returns a human-readable description of this operation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTable { name, .. } => format!("Create table '{}'", name),
            Self::DropTable { name } => format!("Drop table '{}'", name),
            Self::AddIndex { table, name, .. } => {
                format!("Create index '{}' on table '{}'", name, table)
            }
        }
    }
}

impl MigrationDescriptor {
    /// Returns the forward operations: the table, then one index per entry.
    #[must_use]
    pub fn up_operations(&self) -> Vec<MigrationOperation> {
        let mut operations = vec![MigrationOperation::create_table(
            &self.table_name,
            self.columns.clone(),
        )];
        operations.extend(self.indexes.iter().map(|index| {
            MigrationOperation::add_index(
                &self.table_name,
                &index.name,
                index.columns.clone(),
                index.unique,
            )
        }));
        operations
    }

    /// Returns the reverse operations: a single `DropTable`.
    #[must_use]
    pub fn down_operations(&self) -> Vec<MigrationOperation> {
        self.up_operations()
            .iter()
            .filter_map(MigrationOperation::reverse)
            .collect()
    }
}
