//! # mysqldiff-core
//!
//! Structural comparison of MySQL schemas.
//!
//! This crate provides:
//! - A line-oriented parser that turns `SHOW CREATE TABLE` output into a
//!   [`TableDescriptor`]
//! - A diff engine that compares a reference and a target table set and
//!   emits the `CREATE TABLE` / `ALTER TABLE` / `DROP TABLE` statements
//!   that move the target to the reference
//!
//! Both are pure: no I/O, no shared state. Fetching the DDL from a live
//! server is left to implementors of [`FetchTables`].
//!
//! ## Example
//!
//! ```rust
//! use mysqldiff_core::{DdlParser, diff_schema};
//!
//! let parser = DdlParser::new();
//! let reference = parser
//!     .parse("CREATE TABLE `t` (\n  `id` int,\n  `name` varchar(50)\n) ENGINE=InnoDB")
//!     .unwrap();
//! let target = parser
//!     .parse("CREATE TABLE `t` (\n  `id` int\n) ENGINE=InnoDB")
//!     .unwrap();
//!
//! let diff = diff_schema(&[reference], &[target]);
//! assert_eq!(
//!     diff.to_sql(),
//!     ["ALTER TABLE `t` ADD COLUMN `name` varchar(50) AFTER `id`;"]
//! );
//! ```

pub mod diff;
pub mod error;
pub mod introspect;
pub mod parser;
pub mod schema;
pub mod statement;

pub use diff::{DiffOptions, DiffWarning, SchemaDiff, diff_schema, diff_schema_with};
pub use error::ParseError;
pub use introspect::FetchTables;
pub use parser::{DdlParser, Line, parse_table};
pub use schema::{ColumnDefinition, KeyDescriptor, TableDescriptor};
pub use statement::{KeyKind, Statement, render_script};
