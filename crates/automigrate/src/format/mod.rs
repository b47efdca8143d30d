//! Migration file formats.
//!
//! Each format knows how to render a [`MigrationDescriptor`] as the source
//! of one migration file.

mod sequelize;

pub use sequelize::SequelizeFormat;

use crate::operations::MigrationOperation;
use crate::schema::MigrationDescriptor;
use crate::typemap::TypeExpression;

/// Trait for rendering migrations in a target schema-definition language.
pub trait MigrationFormat: Send + Sync {
    /// Returns the format name.
    fn name(&self) -> &'static str;

    /// Returns the extension of generated files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Renders a column type.
    fn type_expression(&self, sql_type: &TypeExpression) -> String;

    /// Renders a single operation as one statement.
    fn render_operation(&self, operation: &MigrationOperation) -> String;

    /// Renders the complete migration file for a table.
    fn render(&self, descriptor: &MigrationDescriptor) -> String;

    /// Returns the file name of the migration for a table.
    fn file_name(&self, table: &str) -> String {
        format!("{}.{}", table, self.file_extension())
    }
}
