//! Line-oriented parser for `SHOW CREATE TABLE` output.
//!
//! MySQL prints one clause per line, so a table definition can be
//! classified line by line without a SQL grammar. Each line is offered
//! to an ordered list of matchers; the first one that accepts it wins:
//!
//! 1. `PRIMARY KEY (...)`
//! 2. ``UNIQUE KEY `name` (...)``
//! 3. ``KEY `name` (...)``
//! 4. `` `column` definition``
//!
//! Anything else (the `CREATE TABLE` header, the closing `) ENGINE=...`
//! line, `CONSTRAINT`, `FULLTEXT KEY`, comments) is ignored.
//!
//! # Example
//!
//! ```rust
//! use mysqldiff_core::parser::DdlParser;
//!
//! let ddl = "CREATE TABLE `users` (\n  `id` int NOT NULL,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB";
//! let table = DdlParser::new().parse(ddl).unwrap();
//!
//! assert_eq!(table.table_name, "users");
//! assert_eq!(table.primary_key_expression, "`id`");
//! assert_eq!(table.columns[0].definition, "int NOT NULL");
//! ```

use regex::Regex;
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::schema::{ColumnDefinition, KeyDescriptor, TableDescriptor};

const PRIMARY_KEY_PATTERN: &str = r"^\s*PRIMARY KEY\s+\((.*)\)";
const UNIQUE_KEY_PATTERN: &str = r"^\s*UNIQUE KEY\s+`(.*)`\s+\((.*)\)";
const KEY_PATTERN: &str = r"^\s*KEY\s+`(.*)`\s+\((.*)\)";
const COLUMN_PATTERN: &str = r"^\s*`(.*?)`\s+(.+?)[\n,]?$";
const TABLE_NAME_PATTERN: &str =
    r"^\s*CREATE\s+(?:TEMPORARY\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?`([^`]+)`";

/// The classification of a single DDL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `PRIMARY KEY (...)`, carrying the parenthesized content.
    PrimaryKey(String),
    /// ``UNIQUE KEY `name` (...)``.
    UniqueKey(KeyDescriptor),
    /// ``KEY `name` (...)``.
    Key(KeyDescriptor),
    /// `` `name` definition``.
    Column(ColumnDefinition),
    /// Any line none of the matchers accepted.
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    PrimaryKey,
    UniqueKey,
    Key,
    Column,
}

/// A compiled pattern paired with the variant it produces.
#[derive(Debug, Clone)]
struct LineMatcher {
    kind: LineKind,
    pattern: Regex,
}

impl LineMatcher {
    fn new(kind: LineKind, pattern: &str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).expect("Invalid DDL line pattern"),
        }
    }

    fn try_match(&self, line: &str) -> Option<Line> {
        let caps = self.pattern.captures(line)?;
        let first = caps.get(1)?.as_str();
        let line = match self.kind {
            LineKind::PrimaryKey => Line::PrimaryKey(first.to_string()),
            LineKind::UniqueKey => {
                Line::UniqueKey(KeyDescriptor::new(first, caps.get(2)?.as_str()))
            }
            LineKind::Key => Line::Key(KeyDescriptor::new(first, caps.get(2)?.as_str())),
            LineKind::Column => {
                Line::Column(ColumnDefinition::new(first, caps.get(2)?.as_str()))
            }
        };
        Some(line)
    }
}

/// Turns raw table DDL into a [`TableDescriptor`].
///
/// The matchers are compiled once when the parser is built and are
/// never mutated afterwards, so one parser can be shared across
/// threads and reused for every table of a schema.
#[derive(Debug, Clone)]
pub struct DdlParser {
    matchers: [LineMatcher; 4],
    table_name: Regex,
}

impl Default for DdlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DdlParser {
    /// Compiles the line matchers.
    ///
    /// # Panics
    ///
    /// Only if one of the built-in patterns fails to compile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matchers: [
                LineMatcher::new(LineKind::PrimaryKey, PRIMARY_KEY_PATTERN),
                LineMatcher::new(LineKind::UniqueKey, UNIQUE_KEY_PATTERN),
                LineMatcher::new(LineKind::Key, KEY_PATTERN),
                LineMatcher::new(LineKind::Column, COLUMN_PATTERN),
            ],
            table_name: Regex::new(TABLE_NAME_PATTERN).expect("Invalid table name pattern"),
        }
    }

    /// Classifies one line. The first matching matcher wins.
    #[must_use]
    pub fn classify(&self, line: &str) -> Line {
        self.matchers
            .iter()
            .find_map(|m| m.try_match(line))
            .unwrap_or(Line::Unrecognized)
    }

    /// Parses `ddl` into a descriptor named `table_name`.
    ///
    /// Never fails: unrecognized lines are skipped. Columns and keys
    /// keep the order in which they appear in `ddl`. If several
    /// primary key lines are present the last one wins.
    #[must_use]
    pub fn parse_table(&self, table_name: &str, ddl: &str) -> TableDescriptor {
        let mut table = TableDescriptor::new(table_name, ddl);

        for line in ddl.lines() {
            match self.classify(line) {
                Line::PrimaryKey(expr) => table.primary_key_expression = expr,
                Line::UniqueKey(key) => table.unique_keys.push(key),
                Line::Key(key) => table.keys.push(key),
                Line::Column(column) => table.columns.push(column),
                Line::Unrecognized => trace!(table = table_name, line, "Skipping line"),
            }
        }

        debug!(
            table = table_name,
            columns = table.columns.len(),
            unique_keys = table.unique_keys.len(),
            keys = table.keys.len(),
            has_primary_key = table.has_primary_key(),
            "Parsed table definition"
        );
        table
    }

    /// Parses `ddl`, taking the table name from its `CREATE TABLE` line.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingTableName`] if no line of `ddl`
    /// looks like a ``CREATE TABLE `name` `` header.
    pub fn parse(&self, ddl: &str) -> Result<TableDescriptor, ParseError> {
        let name = self.table_name(ddl).ok_or_else(|| ParseError::MissingTableName {
            header: ddl
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or_default()
                .to_string(),
        })?;
        Ok(self.parse_table(name, ddl))
    }

    /// Extracts the table name from the first `CREATE TABLE` line.
    #[must_use]
    pub fn table_name<'a>(&self, ddl: &'a str) -> Option<&'a str> {
        ddl.lines().find_map(|line| {
            self.table_name
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
        })
    }
}

/// Parses a single table definition with a freshly built parser.
///
/// Prefer holding a [`DdlParser`] when parsing many tables.
///
/// # Errors
///
/// See [`DdlParser::parse`].
pub fn parse_table(ddl: &str) -> Result<TableDescriptor, ParseError> {
    DdlParser::new().parse(ddl)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS_DDL: &str = "CREATE TABLE `users` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `email` varchar(255) NOT NULL,
  `name` varchar(50) DEFAULT NULL COMMENT 'display name',
  `org_id` int(11) NOT NULL,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uk_email` (`email`),
  KEY `idx_org` (`org_id`),
  KEY `idx_org_name` (`org_id`,`name`(10)) USING BTREE
) ENGINE=InnoDB AUTO_INCREMENT=42 DEFAULT CHARSET=utf8mb4";

    #[test]
    fn classify_primary_key() {
        let parser = DdlParser::new();
        assert_eq!(
            parser.classify("  PRIMARY KEY (`id`,`tenant_id`),"),
            Line::PrimaryKey("`id`,`tenant_id`".to_string())
        );
    }

    #[test]
    fn classify_unique_key() {
        let parser = DdlParser::new();
        assert_eq!(
            parser.classify("  UNIQUE KEY `uk_email` (`email`),"),
            Line::UniqueKey(KeyDescriptor::new("uk_email", "`email`"))
        );
    }

    #[test]
    fn classify_plain_key() {
        let parser = DdlParser::new();
        assert_eq!(
            parser.classify("  KEY `idx_org` (`org_id`)"),
            Line::Key(KeyDescriptor::new("idx_org", "`org_id`"))
        );
    }

    #[test]
    fn classify_column_strips_trailing_comma() {
        let parser = DdlParser::new();
        assert_eq!(
            parser.classify("  `name` varchar(50) DEFAULT NULL,"),
            Line::Column(ColumnDefinition::new("name", "varchar(50) DEFAULT NULL"))
        );
        assert_eq!(
            parser.classify("  `name` varchar(50) DEFAULT NULL"),
            Line::Column(ColumnDefinition::new("name", "varchar(50) DEFAULT NULL"))
        );
    }

    #[test]
    fn classify_ignores_other_lines() {
        let parser = DdlParser::new();
        for line in [
            "CREATE TABLE `users` (",
            ") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
            "  CONSTRAINT `fk_org` FOREIGN KEY (`org_id`) REFERENCES `orgs` (`id`)",
            "  FULLTEXT KEY `ft_body` (`body`)",
            "",
        ] {
            assert_eq!(parser.classify(line), Line::Unrecognized, "line: {line:?}");
        }
    }

    #[test]
    fn key_capture_extends_to_last_parenthesis() {
        let parser = DdlParser::new();
        assert_eq!(
            parser.classify("  KEY `idx_org_name` (`org_id`,`name`(10)) USING BTREE,"),
            Line::Key(KeyDescriptor::new("idx_org_name", "`org_id`,`name`(10)"))
        );
    }

    #[test]
    fn parse_full_table() {
        let table = DdlParser::new().parse(USERS_DDL).unwrap();

        assert_eq!(table.table_name, "users");
        assert_eq!(table.primary_key_expression, "`id`");
        assert_eq!(table.raw_definition, USERS_DDL);

        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "email", "name", "org_id"]);
        assert_eq!(
            table.column("name").unwrap().definition,
            "varchar(50) DEFAULT NULL COMMENT 'display name'"
        );

        assert_eq!(table.unique_keys, vec![KeyDescriptor::new("uk_email", "`email`")]);
        let key_names: Vec<&str> = table.keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(key_names, ["idx_org", "idx_org_name"]);
    }

    #[test]
    fn parse_table_uses_caller_name() {
        let table = DdlParser::new().parse_table("renamed", USERS_DDL);
        assert_eq!(table.table_name, "renamed");
        assert_eq!(table.columns.len(), 4);
    }

    #[test]
    fn table_without_primary_key() {
        let ddl = "CREATE TABLE `log` (\n  `msg` text\n) ENGINE=InnoDB";
        let table = parse_table(ddl).unwrap();
        assert_eq!(table.primary_key_expression, "");
        assert!(table.unique_keys.is_empty());
        assert!(table.keys.is_empty());
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = parse_table("\n  `id` int NOT NULL,\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingTableName {
                header: "`id` int NOT NULL,".to_string()
            }
        );
    }

    #[test]
    fn header_variants() {
        let parser = DdlParser::new();
        assert_eq!(
            parser.table_name("CREATE TABLE IF NOT EXISTS `t1` ("),
            Some("t1")
        );
        assert_eq!(parser.table_name("CREATE TEMPORARY TABLE `t2` ("), Some("t2"));
        assert_eq!(parser.table_name("CREATE TABLE t3 ("), None);
    }
}
