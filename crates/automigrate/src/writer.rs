//! Migration file writer.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MigrateError, Result};
use crate::format::MigrationFormat;
use crate::schema::MigrationDescriptor;

/// Writes one migration file per table into a directory.
pub struct MigrationWriter<F: MigrationFormat> {
    directory: PathBuf,
    format: F,
}

impl<F: MigrationFormat> MigrationWriter<F> {
    /// Creates a writer targeting a directory.
    pub fn new(directory: impl Into<PathBuf>, format: F) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    /// Returns the output directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the format.
    #[must_use]
    pub fn format(&self) -> &F {
        &self.format
    }

    /// Creates the output directory and its parents.
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory).await?;
        Ok(())
    }

    /// Returns the path of the migration file for a table.
    #[must_use]
    pub fn path_for(&self, table: &str) -> PathBuf {
        self.directory.join(self.format.file_name(table))
    }

    /// Renders the migration file for a table.
    #[must_use]
    pub fn render(&self, descriptor: &MigrationDescriptor) -> String {
        self.format.render(descriptor)
    }

    /// Writes the migration file for a table, replacing any previous one.
    pub async fn write(&self, descriptor: &MigrationDescriptor) -> Result<PathBuf> {
        let path = self.path_for(&descriptor.table_name);
        let contents = self.render(descriptor);

        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| MigrateError::Emit {
                table: descriptor.table_name.clone(),
                path: path.clone(),
                source,
            })?;

        debug!(table = %descriptor.table_name, path = %path.display(), "Wrote migration");
        for operation in descriptor.up_operations() {
            debug!("  {}", operation.description());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SequelizeFormat;

    fn descriptor(table: &str) -> MigrationDescriptor {
        MigrationDescriptor {
            table_name: table.to_string(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("migrations");
        let writer = MigrationWriter::new(&target, SequelizeFormat::new());

        writer.prepare().await.unwrap();
        let path = writer.write(&descriptor("users")).await.unwrap();

        assert_eq!(path, target.join("users.js"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("'use strict';\n"));
        assert!(contents.contains("queryInterface.dropTable('users')"));
    }

    #[tokio::test]
    async fn test_write_failure_names_table() {
        let dir = tempfile::tempdir().unwrap();
        // Directory never prepared
        let writer = MigrationWriter::new(dir.path().join("missing"), SequelizeFormat::new());

        let err = writer.write(&descriptor("posts")).await.unwrap_err();
        match err {
            MigrateError::Emit { table, path, .. } => {
                assert_eq!(table, "posts");
                assert!(path.ends_with("posts.js"));
            }
            other => panic!("Expected Emit error, got {:?}", other),
        }
    }
}
