//! Table translation.
//!
//! Combines a table's introspected columns and index rows into a
//! [`MigrationDescriptor`].

use tracing::debug;

use crate::error::{MigrateError, Result};
use crate::index::aggregate_indexes;
use crate::schema::{
    ColumnDefinition, ColumnDescriptor, DefaultValue, MigrationDescriptor, RawIndexRow,
};
use crate::typemap::map_native_type;

/// Translates one table.
///
/// Columns keep their introspected order. The first column whose type cannot
/// be mapped aborts translation with [`MigrateError::UnsupportedType`].
pub fn translate_table(
    table: &str,
    columns: &[ColumnDescriptor],
    index_rows: &[RawIndexRow],
) -> Result<MigrationDescriptor> {
    let columns = columns
        .iter()
        .map(|column| translate_column(table, column))
        .collect::<Result<Vec<_>>>()?;

    let indexes: Vec<_> = aggregate_indexes(index_rows).into_values().collect();

    debug!(
        table = %table,
        columns = columns.len(),
        indexes = indexes.len(),
        "Translated table"
    );

    Ok(MigrationDescriptor {
        table_name: table.to_string(),
        columns,
        indexes,
    })
}

fn translate_column(table: &str, column: &ColumnDescriptor) -> Result<ColumnDefinition> {
    let sql_type = map_native_type(&column.native_type).map_err(|_| {
        MigrateError::unsupported_type(table, &column.name, &column.native_type)
    })?;

    Ok(ColumnDefinition {
        name: column.name.clone(),
        sql_type,
        allow_null: column.allow_null,
        default: DefaultValue::of_column(column),
        primary_key: column.is_primary_key,
        auto_increment: column.is_auto_increment,
        comment: column.comment.clone().filter(|c| !c.is_empty()),
    })
}
