//! Reading table definitions from MySQL.
//!
//! Tables are listed with `SHOW FULL TABLES` and each base table's DDL
//! is read with `SHOW CREATE TABLE`, then handed to the core parser.
//! A schema given as a SQL file is first loaded into a throwaway
//! database on the local server, which is dropped afterwards even if
//! loading fails. A side with nothing configured reads as an empty
//! schema.
//!
//! All statements go through the text protocol (`raw_sql`): `USE` and
//! multi-statement SQL files cannot be prepared.

use std::path::Path;

use chrono::Utc;
use mysqldiff_core::{DdlParser, FetchTables, TableDescriptor};
use sqlx::mysql::MySqlConnection;
use sqlx::{Connection, Executor, Row};
use tracing::{debug, info, warn};

use crate::config::{SchemaSource, ServerConfig};
use crate::error::{DiffError, Result, Side};

/// Prefix of the temporary databases created for SQL files.
pub const TEMP_SCHEMA_PREFIX: &str = "mysqldiff_tmp_";

/// Fetches one side of the comparison.
#[derive(Debug, Clone)]
pub struct MySqlSource {
    side: Side,
    source: SchemaSource,
    parser: DdlParser,
}

impl MySqlSource {
    /// Creates a source reading `side` from the given location.
    #[must_use]
    pub fn new(side: Side, source: SchemaSource) -> Self {
        Self {
            side,
            source,
            parser: DdlParser::new(),
        }
    }

    /// Returns where this source reads from.
    #[must_use]
    pub fn location(&self) -> &SchemaSource {
        &self.source
    }

    async fn fetch_database(
        &self,
        server: &ServerConfig,
        database: &str,
    ) -> Result<Vec<TableDescriptor>> {
        info!(server = %server.address(), database, "Reading schema from database");
        let options = server.connect_options(Some(database));
        let mut conn = MySqlConnection::connect_with(&options).await?;
        let tables = read_tables(&mut conn, &self.parser).await?;
        conn.close().await?;
        Ok(tables)
    }

    async fn fetch_file(
        &self,
        server: &ServerConfig,
        path: &Path,
    ) -> Result<Vec<TableDescriptor>> {
        let sql = load_sql_file(path)?;
        let schema = temp_schema_name(self.side);
        info!(
            server = %server.address(),
            file = %path.display(),
            schema = %schema,
            "Loading SQL file into temporary schema"
        );

        let mut conn = MySqlConnection::connect_with(&server.connect_options(None)).await?;
        conn.execute(sqlx::raw_sql(&format!(
            "CREATE DATABASE {}",
            quote_identifier(&schema)
        )))
        .await?;

        let loaded = load_and_read(&mut conn, &schema, &sql, &self.parser).await;

        let dropped = conn
            .execute(sqlx::raw_sql(&format!(
                "DROP DATABASE {}",
                quote_identifier(&schema)
            )))
            .await;

        match (loaded, dropped) {
            (Ok(tables), Ok(_)) => {
                debug!(schema = %schema, "Dropped temporary schema");
                conn.close().await?;
                Ok(tables)
            }
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(_)) => Err(err),
            (Err(err), Err(drop_err)) => {
                warn!(schema = %schema, error = %drop_err, "Failed to drop temporary schema");
                Err(err)
            }
        }
    }
}

impl FetchTables for MySqlSource {
    type Error = DiffError;

    async fn fetch_tables(&self) -> Result<Vec<TableDescriptor>> {
        match &self.source {
            SchemaSource::Database { server, database } => {
                self.fetch_database(server, database).await
            }
            SchemaSource::File { server, path } => self.fetch_file(server, path).await,
            SchemaSource::Empty => {
                warn!(
                    side = %self.side,
                    "No database name or file path set, using an empty schema"
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Switches to `schema`, runs `sql` in it and reads the result back.
async fn load_and_read(
    conn: &mut MySqlConnection,
    schema: &str,
    sql: &str,
    parser: &DdlParser,
) -> Result<Vec<TableDescriptor>> {
    conn.execute(sqlx::raw_sql(&format!("USE {}", quote_identifier(schema))))
        .await?;
    conn.execute(sqlx::raw_sql(sql)).await?;
    read_tables(conn, parser).await
}

/// Reads and parses every base table of the connection's current database.
async fn read_tables(
    conn: &mut MySqlConnection,
    parser: &DdlParser,
) -> Result<Vec<TableDescriptor>> {
    let rows = conn.fetch_all(sqlx::raw_sql("SHOW FULL TABLES")).await?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get(0)?;
        let table_type: String = row.try_get(1)?;
        if table_type != "BASE TABLE" {
            debug!(table = %name, table_type = %table_type, "Skipping non-table");
            continue;
        }

        let query = format!("SHOW CREATE TABLE {}", quote_identifier(&name));
        let row = conn.fetch_one(sqlx::raw_sql(&query)).await?;
        let table_name: String = row.try_get(0)?;
        let ddl: String = row.try_get(1)?;
        tables.push(parser.parse_table(&table_name, &ddl));
    }

    info!(tables = tables.len(), "Read table definitions");
    Ok(tables)
}

/// Reads a schema SQL file.
///
/// # Errors
///
/// Returns [`DiffError::SchemaFile`] if the file cannot be read.
pub fn load_sql_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| DiffError::SchemaFile {
        path: path.to_path_buf(),
        source,
    })
}

/// A fresh temporary database name for `side`.
///
/// The side is part of the name so both sides can be loaded into the
/// local server at the same time.
#[must_use]
pub fn temp_schema_name(side: Side) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{TEMP_SCHEMA_PREFIX}{side}_{nanos}")
}

/// Backtick-quotes an identifier, doubling embedded backticks.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn quote_plain_and_backticked_names() {
        assert_eq!(quote_identifier("users"), "`users`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn temp_schema_names_are_prefixed() {
        let name = temp_schema_name(Side::Reference);
        let suffix = name.strip_prefix("mysqldiff_tmp_src_").unwrap();
        assert!(suffix.parse::<i64>().is_ok(), "name: {name}");
    }

    #[test]
    fn temp_schema_names_differ_per_side() {
        let src = temp_schema_name(Side::Reference);
        let dst = temp_schema_name(Side::Target);
        assert_ne!(src, dst);
        assert!(dst.starts_with("mysqldiff_tmp_dst_"), "name: {dst}");
    }

    #[tokio::test]
    async fn empty_source_has_no_tables() {
        let source = MySqlSource::new(Side::Target, SchemaSource::Empty);
        assert!(source.fetch_tables().await.unwrap().is_empty());
    }

    #[test]
    fn load_existing_sql_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CREATE TABLE `t` (`id` int);").unwrap();

        let sql = load_sql_file(file.path()).unwrap();
        assert_eq!(sql, "CREATE TABLE `t` (`id` int);\n");
    }

    #[test]
    fn load_missing_sql_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sql");

        let err = load_sql_file(&path).unwrap_err();
        assert!(matches!(
            &err,
            DiffError::SchemaFile { path: p, .. } if *p == path
        ));
        assert!(err.to_string().contains("missing.sql"));
    }

    #[test]
    fn source_keeps_its_location() {
        let location = SchemaSource::File {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3306,
                user: "root".into(),
                password: String::new(),
            },
            path: PathBuf::from("schema.sql"),
        };
        assert_eq!(
            MySqlSource::new(Side::Reference, location.clone()).location(),
            &location
        );
    }
}
