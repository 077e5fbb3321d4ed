//! Compare two MySQL schemas and print the DDL that reconciles them.
//!
//! `mysqldiff` reads the reference schema (`src`, the desired state) and
//! the target schema (`dst`, the current state) either from live
//! databases or from SQL files, and emits the `CREATE`, `ALTER` and
//! `DROP` statements that make the target match the reference.
//!
//! Parsing and diffing live in [`mysqldiff_core`]; this crate adds the
//! MySQL connection layer, configuration and report rendering.
//!
//! # CLI Usage
//!
//! ```bash
//! # Two databases on the local server
//! mysqldiff --src-db-name app_next --dst-db-name app
//!
//! # A schema file against a remote database
//! mysqldiff --src-file-path schema.sql \
//!     --dst-db-host db.internal --dst-db-user reader --dst-db-name app
//!
//! # The same, through the environment
//! GO_MYSQL_DIFF_SRC_FILE_PATH=schema.sql GO_MYSQL_DIFF_DST_DB_NAME=app mysqldiff
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod source;

use mysqldiff_core::{FetchTables, SchemaDiff, diff_schema_with};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, Side};
use crate::source::MySqlSource;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{Config, SchemaSource, ServerConfig};
    pub use crate::error::{DiffError, Result, Side};
    pub use crate::output::{OutputFormat, write_diff};
    pub use crate::source::MySqlSource;
    pub use crate::compare;
    pub use mysqldiff_core::{DiffOptions, DiffWarning, SchemaDiff, Statement};
}

/// Fetches both sides described by `config` and diffs them.
///
/// Both schemas are read concurrently. Statements turn the target into
/// the reference. A side with no database name and no file path is an
/// empty schema, so configuring only `src` prints every `CREATE TABLE`
/// and configuring only `dst` prints every `DROP TABLE`.
///
/// # Errors
///
/// Returns an error if a SQL file cannot be read or any database
/// operation fails.
pub async fn compare(config: &Config) -> Result<SchemaDiff> {
    let reference = MySqlSource::new(Side::Reference, config.source(Side::Reference));
    let target = MySqlSource::new(Side::Target, config.source(Side::Target));
    debug!(reference = ?reference.location(), target = ?target.location(), "Resolved sources");

    let (reference_tables, target_tables) =
        tokio::try_join!(reference.fetch_tables(), target.fetch_tables())?;

    let diff = diff_schema_with(&reference_tables, &target_tables, &config.diff_options());
    info!(
        statements = diff.statements.len(),
        warnings = diff.warnings.len(),
        "Compared schemas"
    );
    Ok(diff)
}
