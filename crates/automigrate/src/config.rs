//! Generator configuration.
//!
//! Options can come from a JSON file; command-line flags override them.
//!
//! ```json
//! {
//!   "directory": "db/migrations",
//!   "skipTables": ["sessions"],
//!   "concurrency": 8
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};
use crate::filter::TableFilter;

/// Default number of tables processed at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Options of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Output directory for migration files.
    pub directory: PathBuf,
    /// Table selection.
    #[serde(flatten)]
    pub filter: TableFilter,
    /// Maximum number of tables introspected at once.
    pub concurrency: usize,
    /// Print migrations instead of writing them.
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("migrations"),
            filter: TableFilter::default(),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }
}

impl GeneratorConfig {
    /// Loads options from a JSON file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Checks that the options are usable.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.concurrency == 0 {
            errors.push(MigrateError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.directory.as_os_str().is_empty() {
            errors.push(MigrateError::Config(
                "directory must not be empty".to_string(),
            ));
        }
        if self.filter.tables.as_ref().is_some_and(Vec::is_empty) {
            errors.push(MigrateError::Config(
                "tables list is empty, nothing would be generated".to_string(),
            ));
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(MigrateError::Multiple(errors)),
        }
    }
}
