//! Structured table model produced by the DDL parser.
//!
//! Every clause the diff engine looks at is kept as verbatim text:
//! column definitions, key column lists and the primary key expression
//! are compared by string equality only.

use serde::Serialize;

/// One column of a table, in physical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    /// Column name without quoting.
    pub name: String,
    /// Everything after the quoted name: type, nullability, default,
    /// comment and so on. Never split further.
    pub definition: String,
}

impl ColumnDefinition {
    /// Creates a column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
        }
    }
}

/// A secondary index, unique or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDescriptor {
    /// Index name without quoting.
    pub name: String,
    /// Content of the parenthesized column list, e.g. `` `email`,`org_id` ``.
    pub column_expression: String,
}

impl KeyDescriptor {
    /// Creates a key descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, column_expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_expression: column_expression.into(),
        }
    }
}

/// The parsed form of one `SHOW CREATE TABLE` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    /// Table name.
    pub table_name: String,
    /// Content of `PRIMARY KEY (...)`, empty when the table has none.
    pub primary_key_expression: String,
    /// `UNIQUE KEY` clauses in declaration order.
    pub unique_keys: Vec<KeyDescriptor>,
    /// Plain `KEY` clauses in declaration order.
    pub keys: Vec<KeyDescriptor>,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
    /// The full DDL text, replayed verbatim when the table is created.
    pub raw_definition: String,
}

impl TableDescriptor {
    /// Creates a descriptor with no columns or keys.
    #[must_use]
    pub fn new(table_name: impl Into<String>, raw_definition: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            primary_key_expression: String::new(),
            unique_keys: Vec::new(),
            keys: Vec::new(),
            columns: Vec::new(),
            raw_definition: raw_definition.into(),
        }
    }

    /// Sets the primary key expression.
    #[must_use]
    pub fn with_primary_key(mut self, expression: impl Into<String>) -> Self {
        self.primary_key_expression = expression.into();
        self
    }

    /// Appends a unique key.
    #[must_use]
    pub fn with_unique_key(mut self, key: KeyDescriptor) -> Self {
        self.unique_keys.push(key);
        self
    }

    /// Appends a plain key.
    #[must_use]
    pub fn with_key(mut self, key: KeyDescriptor) -> Self {
        self.keys.push(key);
        self
    }

    /// Appends a column.
    #[must_use]
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up a unique key by name.
    #[must_use]
    pub fn unique_key(&self, name: &str) -> Option<&KeyDescriptor> {
        self.unique_keys.iter().find(|k| k.name == name)
    }

    /// Looks up a plain key by name.
    #[must_use]
    pub fn key(&self, name: &str) -> Option<&KeyDescriptor> {
        self.keys.iter().find(|k| k.name == name)
    }

    /// Returns `true` if the table declares a primary key.
    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key_expression.is_empty()
    }
}
