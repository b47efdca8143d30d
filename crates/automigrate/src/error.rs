//! Error types for migration generation.

use std::path::PathBuf;

/// Errors that can occur while generating migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A column type has no equivalent in the target vocabulary.
    #[error("Unsupported type '{native_type}' for column '{column}' in table '{table}'")]
    UnsupportedType {
        /// Table containing the column.
        table: String,
        /// Column name.
        column: String,
        /// Native type string as reported by the database.
        native_type: String,
    },

    /// Database error during introspection.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading snapshots or config files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write the migration file for a table.
    #[error("Failed to write migration for table '{table}' to '{path}': {source}")]
    Emit {
        /// Table whose migration could not be written.
        table: String,
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse a schema snapshot.
    #[error("Invalid schema snapshot '{path}': {message}")]
    Snapshot {
        /// Path to the snapshot file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// A table is missing from the introspected schema.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Invalid generator configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Multiple errors occurred.
    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<MigrateError>),
}

impl MigrateError {
    /// Creates an `UnsupportedType` error for a column of a table.
    pub fn unsupported_type(
        table: impl Into<String>,
        column: impl Into<String>,
        native_type: impl Into<String>,
    ) -> Self {
        Self::UnsupportedType {
            table: table.into(),
            column: column.into(),
            native_type: native_type.into(),
        }
    }
}

/// Result type for migration generation.
pub type Result<T> = std::result::Result<T, MigrateError>;
