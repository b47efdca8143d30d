//! Schema introspection.
//!
//! An introspector supplies the table names, column descriptions and raw
//! index rows that translation consumes. [`MySqlIntrospector`] reads them from
//! a live database; [`SnapshotIntrospector`] reads them from a JSON file
//! previously captured with [`capture_snapshot`].

mod mysql;
mod snapshot;

pub use mysql::{MySqlIntrospector, ServerFlavor};
pub use snapshot::{SchemaSnapshot, SnapshotIntrospector, TableSnapshot};

use std::future::Future;

use crate::error::Result;
use crate::schema::{ColumnDescriptor, RawIndexRow};

/// Source of schema metadata.
pub trait SchemaIntrospector: Send + Sync {
    /// Lists table names, in a stable order.
    fn list_tables(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Describes the columns of a table, in declaration order.
    fn describe_columns(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Vec<ColumnDescriptor>>> + Send;

    /// Lists the raw index rows of a table, in listing order.
    fn list_index_rows(&self, table: &str)
        -> impl Future<Output = Result<Vec<RawIndexRow>>> + Send;
}

impl<T: SchemaIntrospector> SchemaIntrospector for &T {
    fn list_tables(&self) -> impl Future<Output = Result<Vec<String>>> + Send {
        (**self).list_tables()
    }

    fn describe_columns(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Vec<ColumnDescriptor>>> + Send {
        (**self).describe_columns(table)
    }

    fn list_index_rows(&self, table: &str)
        -> impl Future<Output = Result<Vec<RawIndexRow>>> + Send {
        (**self).list_index_rows(table)
    }
}

/// Reads the given tables from an introspector into a snapshot.
pub async fn capture_snapshot<I: SchemaIntrospector>(
    introspector: &I,
    tables: &[String],
) -> Result<SchemaSnapshot> {
    let mut snapshot = SchemaSnapshot::default();
    for table in tables {
        snapshot.tables.push(TableSnapshot {
            name: table.clone(),
            columns: introspector.describe_columns(table).await?,
            indexes: introspector.list_index_rows(table).await?,
        });
    }
    Ok(snapshot)
}
