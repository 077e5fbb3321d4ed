//! Command-line and environment configuration.
//!
//! Every flag can also be set through an environment variable. An
//! explicit flag wins over the environment, which wins over the
//! built-in default.
//!
//! Three connection groups are recognised:
//!
//! - `local`: a scratch server used to load SQL files into temporary
//!   schemas, and the fallback server for a side that only names a
//!   database.
//! - `src`: the reference schema, i.e. the desired end state.
//! - `dst`: the target schema, i.e. the current state.

use std::path::PathBuf;

use clap::{Args, Parser};
use mysqldiff_core::DiffOptions;
use sqlx::mysql::MySqlConnectOptions;

use crate::error::Side;
use crate::output::OutputFormat;

/// Compare two MySQL schemas and print the DDL that turns dst into src.
#[derive(Debug, Clone, Parser)]
#[command(name = "mysqldiff")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub local: LocalArgs,

    #[command(flatten)]
    pub src: SrcArgs,

    #[command(flatten)]
    pub dst: DstArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Rebuild primary keys and indexes whose columns changed instead
    /// of only warning about them.
    #[arg(long)]
    pub replace_changed_keys: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// The local scratch server.
#[derive(Debug, Clone, Args)]
pub struct LocalArgs {
    /// Local database host.
    #[arg(
        id = "local_db_host",
        long = "local-db-host",
        env = "GO_MYSQL_DIFF_LOCAL_DB_HOST",
        default_value = "127.0.0.1"
    )]
    pub host: String,

    /// Local database port.
    #[arg(
        id = "local_db_port",
        long = "local-db-port",
        env = "GO_MYSQL_DIFF_LOCAL_DB_PORT",
        default_value_t = 3306
    )]
    pub port: u16,

    /// Local database user.
    #[arg(
        id = "local_db_user",
        long = "local-db-user",
        env = "GO_MYSQL_DIFF_LOCAL_DB_USER",
        default_value = "root"
    )]
    pub user: String,

    /// Local database password.
    #[arg(
        id = "local_db_password",
        long = "local-db-password",
        env = "GO_MYSQL_DIFF_LOCAL_DB_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,
}

/// The reference schema.
#[derive(Debug, Clone, Args)]
pub struct SrcArgs {
    /// Source database host (defaults to the local server).
    #[arg(id = "src_db_host", long = "src-db-host", env = "GO_MYSQL_DIFF_SRC_DB_HOST")]
    pub host: Option<String>,

    /// Source database port.
    #[arg(id = "src_db_port", long = "src-db-port", env = "GO_MYSQL_DIFF_SRC_DB_PORT")]
    pub port: Option<u16>,

    /// Source database user.
    #[arg(id = "src_db_user", long = "src-db-user", env = "GO_MYSQL_DIFF_SRC_DB_USER")]
    pub user: Option<String>,

    /// Source database password.
    #[arg(
        id = "src_db_password",
        long = "src-db-password",
        env = "GO_MYSQL_DIFF_SRC_DB_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Source database name.
    #[arg(id = "src_db_name", long = "src-db-name", env = "GO_MYSQL_DIFF_SRC_DB_NAME")]
    pub name: Option<String>,

    /// SQL file describing the source schema.
    #[arg(id = "src_file_path", long = "src-file-path", env = "GO_MYSQL_DIFF_SRC_FILE_PATH")]
    pub file_path: Option<PathBuf>,
}

/// The target schema.
#[derive(Debug, Clone, Args)]
pub struct DstArgs {
    /// Destination database host (defaults to the local server).
    #[arg(id = "dst_db_host", long = "dst-db-host", env = "GO_MYSQL_DIFF_DST_DB_HOST")]
    pub host: Option<String>,

    /// Destination database port.
    #[arg(id = "dst_db_port", long = "dst-db-port", env = "GO_MYSQL_DIFF_DST_DB_PORT")]
    pub port: Option<u16>,

    /// Destination database user.
    #[arg(id = "dst_db_user", long = "dst-db-user", env = "GO_MYSQL_DIFF_DST_DB_USER")]
    pub user: Option<String>,

    /// Destination database password.
    #[arg(
        id = "dst_db_password",
        long = "dst-db-password",
        env = "GO_MYSQL_DIFF_DST_DB_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Destination database name.
    #[arg(id = "dst_db_name", long = "dst-db-name", env = "GO_MYSQL_DIFF_DST_DB_NAME")]
    pub name: Option<String>,

    /// SQL file describing the destination schema.
    #[arg(id = "dst_file_path", long = "dst-file-path", env = "GO_MYSQL_DIFF_DST_FILE_PATH")]
    pub file_path: Option<PathBuf>,
}

/// Connection settings for one MySQL server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl ServerConfig {
    /// Builds sqlx connect options, optionally selecting a database.
    #[must_use]
    pub fn connect_options(&self, database: Option<&str>) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password);
        match database {
            Some(database) => options.database(database),
            None => options,
        }
    }

    /// `host:port`, for logs.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where one side's schema comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// An existing database.
    Database {
        server: ServerConfig,
        database: String,
    },
    /// A SQL file loaded into a temporary schema on `server`.
    File { server: ServerConfig, path: PathBuf },
    /// Nothing configured: the side has no tables.
    Empty,
}

/// Flag values shared by the `src` and `dst` groups.
struct SideArgs<'a> {
    host: Option<&'a str>,
    port: Option<u16>,
    user: Option<&'a str>,
    password: Option<&'a str>,
    name: Option<&'a str>,
    file_path: Option<&'a PathBuf>,
}

impl Config {
    /// The local scratch server.
    #[must_use]
    pub fn local_server(&self) -> ServerConfig {
        ServerConfig {
            host: self.local.host.clone(),
            port: self.local.port,
            user: self.local.user.clone(),
            password: self.local.password.clone(),
        }
    }

    /// Resolves where the schema for `side` comes from.
    ///
    /// A database name takes precedence over a file path. A database
    /// without a host lives on the local server; a database with a
    /// host borrows any unset port, user or password from the local
    /// server. Files are always loaded into the local server. Empty
    /// values count as unset, and a side with neither a database name
    /// nor a file path resolves to [`SchemaSource::Empty`].
    #[must_use]
    pub fn source(&self, side: Side) -> SchemaSource {
        let args = self.side_args(side);
        let local = self.local_server();

        if let Some(database) = non_empty(args.name) {
            let server = match non_empty(args.host) {
                Some(host) => ServerConfig {
                    host: host.to_string(),
                    port: args.port.unwrap_or(local.port),
                    user: non_empty(args.user).map_or(local.user, str::to_string),
                    password: non_empty(args.password).map_or(local.password, str::to_string),
                },
                None => local,
            };
            return SchemaSource::Database {
                server,
                database: database.to_string(),
            };
        }

        match args.file_path {
            Some(path) if !path.as_os_str().is_empty() => SchemaSource::File {
                server: local,
                path: path.clone(),
            },
            _ => SchemaSource::Empty,
        }
    }

    /// Diff engine options derived from the flags.
    #[must_use]
    pub const fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            replace_changed_keys: self.replace_changed_keys,
        }
    }

    fn side_args(&self, side: Side) -> SideArgs<'_> {
        match side {
            Side::Reference => SideArgs {
                host: self.src.host.as_deref(),
                port: self.src.port,
                user: self.src.user.as_deref(),
                password: self.src.password.as_deref(),
                name: self.src.name.as_deref(),
                file_path: self.src.file_path.as_ref(),
            },
            Side::Target => SideArgs {
                host: self.dst.host.as_deref(),
                port: self.dst.port,
                user: self.dst.user.as_deref(),
                password: self.dst.password.as_deref(),
                name: self.dst.name.as_deref(),
                file_path: self.dst.file_path.as_ref(),
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["mysqldiff"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn local_defaults() {
        let config = parse(&[]);
        assert_eq!(
            config.local_server(),
            ServerConfig {
                host: "127.0.0.1".into(),
                port: 3306,
                user: "root".into(),
                password: String::new(),
            }
        );
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.replace_changed_keys);
    }

    #[test]
    fn database_without_host_uses_local_server() {
        let config = parse(&["--local-db-password", "secret", "--src-db-name", "app"]);
        let source = config.source(Side::Reference);
        assert_eq!(
            source,
            SchemaSource::Database {
                server: config.local_server(),
                database: "app".into(),
            }
        );
    }

    #[test]
    fn database_with_host_uses_its_own_credentials() {
        let config = parse(&[
            "--dst-db-host",
            "db.internal",
            "--dst-db-port",
            "3307",
            "--dst-db-user",
            "reader",
            "--dst-db-name",
            "prod",
        ]);
        let SchemaSource::Database { server, database } = config.source(Side::Target) else {
            panic!("expected a database source");
        };
        assert_eq!(database, "prod");
        assert_eq!(server.address(), "db.internal:3307");
        assert_eq!(server.user, "reader");
        assert_eq!(server.password, "");
    }

    #[test]
    fn database_name_wins_over_file_path() {
        let config = parse(&["--src-db-name", "app", "--src-file-path", "schema.sql"]);
        assert!(matches!(
            config.source(Side::Reference),
            SchemaSource::Database { .. }
        ));
    }

    #[test]
    fn file_path_loads_into_local_server() {
        let config = parse(&["--local-db-port", "13306", "--dst-file-path", "schema.sql"]);
        assert_eq!(
            config.source(Side::Target),
            SchemaSource::File {
                server: config.local_server(),
                path: PathBuf::from("schema.sql"),
            }
        );
    }

    #[test]
    fn unconfigured_side_is_empty() {
        let config = parse(&["--src-db-name", "app"]);
        assert_eq!(config.source(Side::Target), SchemaSource::Empty);
    }

    #[test]
    fn all_groups_parse_together() {
        let config = parse(&[
            "--local-db-host",
            "scratch",
            "--local-db-port",
            "13306",
            "--local-db-user",
            "builder",
            "--local-db-password",
            "pw",
            "--src-db-host",
            "src.internal",
            "--src-db-user",
            "reader",
            "--src-db-name",
            "app_next",
            "--dst-db-host",
            "dst.internal",
            "--dst-db-port",
            "3307",
            "--dst-db-password",
            "other",
            "--dst-db-name",
            "app",
        ]);

        assert_eq!(config.local_server().address(), "scratch:13306");
        assert_eq!(
            config.source(Side::Reference),
            SchemaSource::Database {
                server: ServerConfig {
                    host: "src.internal".into(),
                    port: 13306,
                    user: "reader".into(),
                    password: "pw".into(),
                },
                database: "app_next".into(),
            }
        );
        assert_eq!(
            config.source(Side::Target),
            SchemaSource::Database {
                server: ServerConfig {
                    host: "dst.internal".into(),
                    port: 3307,
                    user: "builder".into(),
                    password: "other".into(),
                },
                database: "app".into(),
            }
        );
    }

    #[test]
    fn empty_credentials_fall_back_to_local() {
        let config = parse(&[
            "--local-db-user",
            "builder",
            "--local-db-password",
            "pw",
            "--dst-db-host",
            "dst.internal",
            "--dst-db-user",
            "",
            "--dst-db-password",
            "",
            "--dst-db-name",
            "app",
        ]);
        let SchemaSource::Database { server, .. } = config.source(Side::Target) else {
            panic!("expected a database source");
        };
        assert_eq!(server.user, "builder");
        assert_eq!(server.password, "pw");
    }

    #[test]
    fn empty_database_name_is_ignored() {
        let config = parse(&["--src-db-name", "", "--src-file-path", "a.sql"]);
        assert!(matches!(
            config.source(Side::Reference),
            SchemaSource::File { .. }
        ));
    }

    #[test]
    fn output_and_key_flags() {
        let config = parse(&["--format", "json", "--replace-changed-keys", "-v"]);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.diff_options().replace_changed_keys);
        assert!(config.verbose);
    }
}
