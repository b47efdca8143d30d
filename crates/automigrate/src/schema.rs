//! Schema representation types.
//!
//! [`ColumnDescriptor`] and [`RawIndexRow`] mirror what the database reports
//! during introspection. [`MigrationDescriptor`] is the translated unit for
//! one table, ready to be rendered into a migration file.

use serde::{Deserialize, Serialize};

use crate::typemap::TypeExpression;

/// Key name MySQL uses for the primary key in index listings.
pub const PRIMARY_KEY_NAME: &str = "PRIMARY";

/// One column of a table, as reported by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Raw type string, e.g. `INT(11) UNSIGNED ZEROFILL`.
    pub native_type: String,
    /// Whether the column allows NULL values.
    #[serde(default = "default_allow_null")]
    pub allow_null: bool,
    /// Default value, unquoted.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Whether the default is a SQL expression rather than a value.
    #[serde(default)]
    pub default_is_expression: bool,
    /// Whether this column is part of the primary key.
    #[serde(default)]
    pub is_primary_key: bool,
    /// Whether this column auto-increments.
    #[serde(default)]
    pub is_auto_increment: bool,
    /// Column comment.
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_allow_null() -> bool {
    true
}

impl ColumnDescriptor {
    /// Creates a nullable column with no default.
    #[must_use]
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            allow_null: true,
            default_value: None,
            default_is_expression: false,
            is_primary_key: false,
            is_auto_increment: false,
            comment: None,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    /// Sets the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.allow_null = false; // Primary keys are always NOT NULL
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.is_auto_increment = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self.default_is_expression = false;
        self
    }

    /// Sets a SQL expression default, e.g. `CURRENT_TIMESTAMP`.
    #[must_use]
    pub fn default_expression(mut self, expression: impl Into<String>) -> Self {
        self.default_value = Some(expression.into());
        self.default_is_expression = true;
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// One row of a native index listing (`SHOW INDEX FROM ...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawIndexRow {
    /// Index name.
    pub key_name: String,
    /// Indexed column.
    pub column_name: String,
    /// 1-based position of the column within the index.
    pub sequence_in_index: u32,
    /// 0 when the index is unique.
    pub non_unique: i64,
}

impl RawIndexRow {
    /// Creates a new raw index row.
    #[must_use]
    pub fn new(
        key_name: impl Into<String>,
        column_name: impl Into<String>,
        sequence_in_index: u32,
        non_unique: i64,
    ) -> Self {
        Self {
            key_name: key_name.into(),
            column_name: column_name.into(),
            sequence_in_index,
            non_unique,
        }
    }

    /// Returns true if this row belongs to the primary key.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.key_name == PRIMARY_KEY_NAME
    }

    /// Returns true if this row belongs to a unique index.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.non_unique == 0
    }
}

/// A composite index aggregated from raw rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// Index name.
    pub name: String,
    /// Indexed columns, in key order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
}

/// Default value of a translated column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultValue {
    /// Plain value, emitted as a quoted string.
    Literal(String),
    /// SQL expression (e.g. `CURRENT_TIMESTAMP`), emitted as a literal expression.
    Expression(String),
}

impl DefaultValue {
    /// Returns the default of an introspected column.
    ///
    /// Returns `None` when the column has no default or an empty one.
    #[must_use]
    pub fn of_column(column: &ColumnDescriptor) -> Option<Self> {
        let raw = column.default_value.as_deref().filter(|v| !v.is_empty())?;
        if column.default_is_expression {
            Some(Self::Expression(raw.to_string()))
        } else {
            Some(Self::Literal(raw.to_string()))
        }
    }
}

/// A column of a migration, with its type mapped to the target vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Mapped type.
    pub sql_type: TypeExpression,
    /// Whether the column allows NULL values.
    pub allow_null: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether this column is part of the primary key.
    pub primary_key: bool,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
    /// Column comment.
    pub comment: Option<String>,
}

/// The translated migration unit for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationDescriptor {
    /// Table name.
    pub table_name: String,
    /// Columns, in declaration order.
    pub columns: Vec<ColumnDefinition>,
    /// Secondary indexes, in listing order.
    pub indexes: Vec<IndexDescriptor>,
}

impl MigrationDescriptor {
    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
