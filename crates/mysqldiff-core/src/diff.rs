//! Schema diff engine.
//!
//! Compares a "reference" table set (the desired end state) with a
//! "target" table set (the current state) and produces the ordered
//! [`Statement`]s that turn the target into the reference.
//!
//! Statement order is part of the contract:
//!
//! 1. For every reference table, in reference order: either the table's
//!    verbatim DDL (table missing from target) or its column, primary
//!    key, unique key and plain key changes, in that order.
//! 2. `DROP TABLE` for every target table missing from the reference,
//!    in target order.
//!
//! Comparison is textual. Column definitions are compared as whole
//! strings; keys are matched by name only.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::schema::{ColumnDefinition, KeyDescriptor, TableDescriptor};
use crate::statement::{KeyKind, Statement, render_script};

// ================================================================
// Public types
// ================================================================

/// Knobs for the diff engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Emit drop-then-add statements for primary keys and same-name
    /// keys whose column expression changed.
    ///
    /// Off by default: such changes only produce a [`DiffWarning`],
    /// which keeps the output identical to what existing consumers of
    /// this tool expect.
    pub replace_changed_keys: bool,
}

/// A difference the engine detected but did not turn into DDL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffWarning {
    /// Both sides have a primary key but the expressions differ.
    PrimaryKeyChanged {
        /// Table name.
        table: String,
        /// Expression on the reference side.
        reference: String,
        /// Expression on the target side.
        target: String,
    },
    /// A key exists on both sides under the same name with a
    /// different column expression.
    KeyChanged {
        /// Table name.
        table: String,
        /// Unique or plain.
        key_kind: KeyKind,
        /// Key name.
        name: String,
        /// Column expression on the reference side.
        reference: String,
        /// Column expression on the target side.
        target: String,
    },
}

impl fmt::Display for DiffWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryKeyChanged {
                table,
                reference,
                target,
            } => write!(
                f,
                "primary key of `{table}` differs ({target} -> {reference})"
            ),
            Self::KeyChanged {
                table,
                key_kind,
                name,
                reference,
                target,
            } => write!(
                f,
                "{key_kind} `{name}` on `{table}` differs ({target} -> {reference})"
            ),
        }
    }
}

/// Result of comparing two table sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaDiff {
    /// Statements in emission order.
    pub statements: Vec<Statement>,
    /// Differences that produced no statement.
    pub warnings: Vec<DiffWarning>,
}

impl SchemaDiff {
    /// Returns `true` if there are neither statements nor warnings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.warnings.is_empty()
    }

    /// Renders every statement with its `;` terminator.
    #[must_use]
    pub fn to_sql(&self) -> Vec<String> {
        self.statements.iter().map(Statement::to_sql).collect()
    }

    /// Renders the statements as a script. See [`render_script`].
    #[must_use]
    pub fn render(&self) -> String {
        render_script(&self.statements)
    }
}

// ================================================================
// Schema-level diff
// ================================================================

/// Diffs two table sets with default [`DiffOptions`].
#[must_use]
pub fn diff_schema(reference: &[TableDescriptor], target: &[TableDescriptor]) -> SchemaDiff {
    diff_schema_with(reference, target, &DiffOptions::default())
}

/// Diffs two table sets.
///
/// Both slices are expected to hold distinct table names. If the
/// target holds duplicates, the last one is used for comparison.
#[must_use]
pub fn diff_schema_with(
    reference: &[TableDescriptor],
    target: &[TableDescriptor],
    options: &DiffOptions,
) -> SchemaDiff {
    let mut diff = SchemaDiff::default();

    let target_tables: HashMap<&str, &TableDescriptor> = target
        .iter()
        .map(|t| (t.table_name.as_str(), t))
        .collect();

    for table in reference {
        if let Some(current) = target_tables.get(table.table_name.as_str()) {
            diff_table(table, current, options, &mut diff);
        } else {
            debug!(table = %table.table_name, "Table missing from target");
            diff.statements.push(Statement::CreateTable {
                table: table.table_name.clone(),
                definition: table.raw_definition.clone(),
            });
        }
    }

    let reference_tables: HashSet<&str> =
        reference.iter().map(|t| t.table_name.as_str()).collect();

    for table in target {
        if !reference_tables.contains(table.table_name.as_str()) {
            debug!(table = %table.table_name, "Table missing from reference");
            diff.statements.push(Statement::DropTable {
                table: table.table_name.clone(),
            });
        }
    }

    diff
}

/// Diffs one table present on both sides.
fn diff_table(
    reference: &TableDescriptor,
    target: &TableDescriptor,
    options: &DiffOptions,
    diff: &mut SchemaDiff,
) {
    let table = reference.table_name.as_str();
    let before = diff.statements.len();

    diff_columns(table, &reference.columns, &target.columns, diff);
    diff_primary_key(
        table,
        &reference.primary_key_expression,
        &target.primary_key_expression,
        options,
        diff,
    );
    diff_keys(
        table,
        KeyKind::Unique,
        &reference.unique_keys,
        &target.unique_keys,
        options,
        diff,
    );
    diff_keys(
        table,
        KeyKind::Plain,
        &reference.keys,
        &target.keys,
        options,
        diff,
    );

    debug!(
        table,
        statements = diff.statements.len() - before,
        "Compared table"
    );
}

// ================================================================
// Column diff
// ================================================================

/// Appends the column statements for `table`.
///
/// Added columns are positioned after the nearest preceding
/// *reference* column, so a run of additions lands in reference order
/// even when the target lacks their neighbours. Pure reordering of
/// otherwise identical columns produces nothing.
pub fn diff_columns(
    table: &str,
    reference: &[ColumnDefinition],
    target: &[ColumnDefinition],
    diff: &mut SchemaDiff,
) {
    let target_columns: HashMap<&str, &ColumnDefinition> =
        target.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut after: Option<&str> = None;
    for column in reference {
        match target_columns.get(column.name.as_str()) {
            Some(current) if current.definition != column.definition => {
                diff.statements.push(Statement::ModifyColumn {
                    table: table.to_string(),
                    column: column.name.clone(),
                    definition: column.definition.clone(),
                });
            }
            Some(_) => {}
            None => {
                diff.statements.push(Statement::AddColumn {
                    table: table.to_string(),
                    column: column.name.clone(),
                    definition: column.definition.clone(),
                    after: after.map(str::to_string),
                });
            }
        }
        after = Some(column.name.as_str());
    }

    let reference_columns: HashSet<&str> = reference.iter().map(|c| c.name.as_str()).collect();
    for column in target {
        if !reference_columns.contains(column.name.as_str()) {
            diff.statements.push(Statement::DropColumn {
                table: table.to_string(),
                column: column.name.clone(),
            });
        }
    }
}

// ================================================================
// Primary key diff
// ================================================================

/// Appends the primary key statements for `table`.
///
/// An empty expression means "no primary key". When both sides have
/// a primary key and they differ, a [`DiffWarning::PrimaryKeyChanged`]
/// is recorded; statements are emitted for it only with
/// [`DiffOptions::replace_changed_keys`].
pub fn diff_primary_key(
    table: &str,
    reference: &str,
    target: &str,
    options: &DiffOptions,
    diff: &mut SchemaDiff,
) {
    if reference == target {
        return;
    }

    match (reference.is_empty(), target.is_empty()) {
        (false, true) => diff.statements.push(Statement::AddPrimaryKey {
            table: table.to_string(),
            expression: reference.to_string(),
        }),
        (true, false) => diff.statements.push(Statement::DropPrimaryKey {
            table: table.to_string(),
        }),
        _ => {
            diff.warnings.push(DiffWarning::PrimaryKeyChanged {
                table: table.to_string(),
                reference: reference.to_string(),
                target: target.to_string(),
            });
            if options.replace_changed_keys {
                diff.statements.push(Statement::DropPrimaryKey {
                    table: table.to_string(),
                });
                diff.statements.push(Statement::AddPrimaryKey {
                    table: table.to_string(),
                    expression: reference.to_string(),
                });
            }
        }
    }
}

// ================================================================
// Key diff
// ================================================================

/// Appends the index statements for one key namespace of `table`.
///
/// Keys are matched by name. A name present on both sides with a
/// different column expression records a [`DiffWarning::KeyChanged`]
/// and is only rebuilt with [`DiffOptions::replace_changed_keys`].
pub fn diff_keys(
    table: &str,
    key_kind: KeyKind,
    reference: &[KeyDescriptor],
    target: &[KeyDescriptor],
    options: &DiffOptions,
    diff: &mut SchemaDiff,
) {
    let target_keys: HashMap<&str, &KeyDescriptor> =
        target.iter().map(|k| (k.name.as_str(), k)).collect();

    for key in reference {
        match target_keys.get(key.name.as_str()) {
            None => diff.statements.push(add_index(table, key_kind, key)),
            Some(current) if current.column_expression != key.column_expression => {
                diff.warnings.push(DiffWarning::KeyChanged {
                    table: table.to_string(),
                    key_kind,
                    name: key.name.clone(),
                    reference: key.column_expression.clone(),
                    target: current.column_expression.clone(),
                });
                if options.replace_changed_keys {
                    diff.statements.push(drop_index(table, &key.name));
                    diff.statements.push(add_index(table, key_kind, key));
                }
            }
            Some(_) => {}
        }
    }

    let reference_keys: HashSet<&str> = reference.iter().map(|k| k.name.as_str()).collect();
    for key in target {
        if !reference_keys.contains(key.name.as_str()) {
            diff.statements.push(drop_index(table, &key.name));
        }
    }
}

fn add_index(table: &str, key_kind: KeyKind, key: &KeyDescriptor) -> Statement {
    Statement::AddIndex {
        table: table.to_string(),
        key_kind,
        name: key.name.clone(),
        expression: key.column_expression.clone(),
    }
}

fn drop_index(table: &str, name: &str) -> Statement {
    Statement::DropIndex {
        table: table.to_string(),
        name: name.to_string(),
    }
}
