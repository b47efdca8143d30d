//! Migration generation runs.
//!
//! A run lists and filters tables, introspects and translates each of them,
//! then writes one migration file per table. Translation of every table must
//! succeed before any file is written: an unsupported column type anywhere
//! aborts the run with nothing emitted.

use std::path::PathBuf;

use futures::{stream, StreamExt, TryStreamExt};
use tracing::{error, info};

use crate::config::GeneratorConfig;
use crate::error::{MigrateError, Result};
use crate::format::MigrationFormat;
use crate::introspect::SchemaIntrospector;
use crate::schema::MigrationDescriptor;
use crate::translate::translate_table;
use crate::writer::MigrationWriter;

/// A migration produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMigration {
    /// Table name.
    pub table: String,
    /// Destination of the migration file.
    pub path: PathBuf,
    /// Rendered file contents.
    pub contents: String,
    /// Whether the file was written (false in dry-run mode).
    pub written: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Migrations, in table listing order.
    pub migrations: Vec<GeneratedMigration>,
}

impl GenerationReport {
    /// Returns the paths of written files.
    pub fn written_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.migrations
            .iter()
            .filter(|m| m.written)
            .map(|m| &m.path)
    }
}

/// Generates migrations from an introspected schema.
pub struct MigrationGenerator<I: SchemaIntrospector, F: MigrationFormat> {
    introspector: I,
    writer: MigrationWriter<F>,
    config: GeneratorConfig,
}

impl<I: SchemaIntrospector, F: MigrationFormat> MigrationGenerator<I, F> {
    /// Creates a new generator.
    pub fn new(introspector: I, format: F, config: GeneratorConfig) -> Self {
        let writer = MigrationWriter::new(&config.directory, format);
        Self {
            introspector,
            writer,
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Lists the tables selected by the configured filter.
    pub async fn select_tables(&self) -> Result<Vec<String>> {
        let all = self.introspector.list_tables().await?;
        let total = all.len();
        let selected = self.config.filter.apply(all);
        info!(total, selected = selected.len(), "Selected tables");
        Ok(selected)
    }

    /// Introspects and translates one table.
    pub async fn translate(&self, table: &str) -> Result<MigrationDescriptor> {
        let columns = self.introspector.describe_columns(table).await?;
        let index_rows = self.introspector.list_index_rows(table).await?;
        translate_table(table, &columns, &index_rows)
    }

    /// Translates tables concurrently, keeping their order.
    ///
    /// Stops at the first failure.
    pub async fn translate_all(&self, tables: &[String]) -> Result<Vec<MigrationDescriptor>> {
        stream::iter(tables)
            .map(|table| self.translate(table))
            .buffered(self.config.concurrency.max(1))
            .try_collect()
            .await
    }

    /// Runs a full generation.
    pub async fn run(&self) -> Result<GenerationReport> {
        self.config.validate()?;

        let tables = self.select_tables().await?;
        let descriptors = self.translate_all(&tables).await?;

        if self.config.dry_run {
            info!("Dry run mode - migrations will be printed but not written.");
            let migrations = descriptors
                .iter()
                .map(|descriptor| GeneratedMigration {
                    table: descriptor.table_name.clone(),
                    path: self.writer.path_for(&descriptor.table_name),
                    contents: self.writer.render(descriptor),
                    written: false,
                })
                .collect();
            return Ok(GenerationReport { migrations });
        }

        self.writer.prepare().await?;
        info!(
            format = self.writer.format().name(),
            directory = %self.writer.directory().display(),
            "Writing migrations"
        );

        let mut report = GenerationReport::default();
        let mut errors = Vec::new();
        for descriptor in &descriptors {
            match self.writer.write(descriptor).await {
                Ok(path) => {
                    info!(table = %descriptor.table_name, path = %path.display(), "Generated migration");
                    report.migrations.push(GeneratedMigration {
                        table: descriptor.table_name.clone(),
                        path,
                        contents: self.writer.render(descriptor),
                        written: true,
                    });
                }
                Err(e) => {
                    error!(table = %descriptor.table_name, error = %e, "Failed to write migration");
                    errors.push(e);
                }
            }
        }

        match errors.len() {
            0 => {
                info!(count = report.migrations.len(), "Done! generated migration files.");
                Ok(report)
            }
            1 => Err(errors.remove(0)),
            _ => Err(MigrateError::Multiple(errors)),
        }
    }
}
