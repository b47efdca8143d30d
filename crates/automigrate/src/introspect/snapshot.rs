//! JSON schema snapshots.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};
use crate::schema::{ColumnDescriptor, RawIndexRow};

use super::SchemaIntrospector;

/// Introspection results of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Table name.
    pub name: String,
    /// Columns, in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    /// Raw index rows, in listing order.
    #[serde(default)]
    pub indexes: Vec<RawIndexRow>,
}

/// Introspection results of a whole database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Tables, in listing order.
    pub tables: Vec<TableSnapshot>,
}

impl SchemaSnapshot {
    /// Gets a table by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Introspector backed by an in-memory snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotIntrospector {
    snapshot: SchemaSnapshot,
}

impl SnapshotIntrospector {
    /// Creates an introspector over a snapshot.
    #[must_use]
    pub fn new(snapshot: SchemaSnapshot) -> Self {
        Self { snapshot }
    }

    /// Loads a snapshot from a JSON file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        let snapshot = serde_json::from_str(&contents).map_err(|e| MigrateError::Snapshot {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::new(snapshot))
    }

    /// Returns the underlying snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &SchemaSnapshot {
        &self.snapshot
    }

    fn table(&self, name: &str) -> Result<&TableSnapshot> {
        self.snapshot
            .get_table(name)
            .ok_or_else(|| MigrateError::TableNotFound(name.to_string()))
    }
}

impl SchemaIntrospector for SnapshotIntrospector {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.snapshot.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        Ok(self.table(table)?.columns.clone())
    }

    async fn list_index_rows(&self, table: &str) -> Result<Vec<RawIndexRow>> {
        Ok(self.table(table)?.indexes.clone())
    }
}
