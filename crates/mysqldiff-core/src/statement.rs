//! DDL statements emitted by the diff engine.
//!
//! The rendered text is consumed by existing tooling, so the formats
//! here are fixed: identifiers are backtick-quoted and the column
//! definitions and key expressions are copied verbatim from the parsed
//! DDL.

use std::fmt;

use serde::Serialize;

/// Which key namespace an index statement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    /// `UNIQUE KEY`.
    Unique,
    /// Plain `KEY`.
    Plain,
}

impl KeyKind {
    /// The keyword used in `ALTER TABLE ... ADD <label>`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unique => "UNIQUE INDEX",
            Self::Plain => "INDEX",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single migration statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// Replays a table's original DDL.
    CreateTable {
        /// Table name.
        table: String,
        /// The verbatim `CREATE TABLE` text.
        definition: String,
    },
    /// ``DROP TABLE `t` ``.
    DropTable {
        /// Table name.
        table: String,
    },
    /// ``ALTER TABLE `t` MODIFY `c` <definition>``.
    ModifyColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// New column definition.
        definition: String,
    },
    /// ``ALTER TABLE `t` ADD COLUMN `c` <definition>[ AFTER `p`]``.
    AddColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Column definition.
        definition: String,
        /// Preceding column, `None` for the first position.
        after: Option<String>,
    },
    /// ``ALTER TABLE `t` DROP COLUMN `c` ``.
    DropColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
    /// ``ALTER TABLE `t` ADD PRIMARY KEY (<expression>)``.
    AddPrimaryKey {
        /// Table name.
        table: String,
        /// Primary key column list.
        expression: String,
    },
    /// ``ALTER TABLE `t` DROP PRIMARY KEY``.
    DropPrimaryKey {
        /// Table name.
        table: String,
    },
    /// ``ALTER TABLE `t` ADD <UNIQUE INDEX|INDEX> `k` (<expression>)``.
    AddIndex {
        /// Table name.
        table: String,
        /// Unique or plain.
        key_kind: KeyKind,
        /// Index name.
        name: String,
        /// Index column list.
        expression: String,
    },
    /// ``ALTER TABLE `t` DROP INDEX `k` ``.
    DropIndex {
        /// Table name.
        table: String,
        /// Index name.
        name: String,
    },
}

impl Statement {
    /// The table this statement touches.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable { table, .. }
            | Self::DropTable { table }
            | Self::ModifyColumn { table, .. }
            | Self::AddColumn { table, .. }
            | Self::DropColumn { table, .. }
            | Self::AddPrimaryKey { table, .. }
            | Self::DropPrimaryKey { table }
            | Self::AddIndex { table, .. }
            | Self::DropIndex { table, .. } => table,
        }
    }

    /// A `snake_case` tag naming the statement kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "create_table",
            Self::DropTable { .. } => "drop_table",
            Self::ModifyColumn { .. } => "modify_column",
            Self::AddColumn { .. } => "add_column",
            Self::DropColumn { .. } => "drop_column",
            Self::AddPrimaryKey { .. } => "add_primary_key",
            Self::DropPrimaryKey { .. } => "drop_primary_key",
            Self::AddIndex { .. } => "add_index",
            Self::DropIndex { .. } => "drop_index",
        }
    }

    /// Returns `true` for statements that create or drop a whole table.
    #[must_use]
    pub const fn is_table_level(&self) -> bool {
        matches!(self, Self::CreateTable { .. } | Self::DropTable { .. })
    }

    /// Renders the statement followed by `;`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        format!("{self};")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable { definition, .. } => f.write_str(definition),
            Self::DropTable { table } => write!(f, "DROP TABLE `{table}`"),
            Self::ModifyColumn {
                table,
                column,
                definition,
            } => write!(f, "ALTER TABLE `{table}` MODIFY `{column}` {definition}"),
            Self::AddColumn {
                table,
                column,
                definition,
                after,
            } => {
                write!(f, "ALTER TABLE `{table}` ADD COLUMN `{column}` {definition}")?;
                if let Some(after) = after {
                    write!(f, " AFTER `{after}`")?;
                }
                Ok(())
            }
            Self::DropColumn { table, column } => {
                write!(f, "ALTER TABLE `{table}` DROP COLUMN `{column}`")
            }
            Self::AddPrimaryKey { table, expression } => {
                write!(f, "ALTER TABLE `{table}` ADD PRIMARY KEY ({expression})")
            }
            Self::DropPrimaryKey { table } => write!(f, "ALTER TABLE `{table}` DROP PRIMARY KEY"),
            Self::AddIndex {
                table,
                key_kind,
                name,
                expression,
            } => write!(f, "ALTER TABLE `{table}` ADD {key_kind} `{name}` ({expression})"),
            Self::DropIndex { table, name } => {
                write!(f, "ALTER TABLE `{table}` DROP INDEX `{name}`")
            }
        }
    }
}

/// Renders statements as a script: every statement ends with `;`,
/// table-level statements are followed by two blank lines and
/// `ALTER TABLE` statements by one.
#[must_use]
pub fn render_script(statements: &[Statement]) -> String {
    let mut script = String::new();
    for statement in statements {
        script.push_str(&statement.to_sql());
        script.push_str(if statement.is_table_level() {
            "\n\n\n"
        } else {
            "\n\n"
        });
    }
    script
}
