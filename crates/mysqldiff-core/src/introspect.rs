//! Schema fetching trait.
//!
//! Anything that can list a schema's tables and hand back their parsed
//! definitions implements [`FetchTables`]. The MySQL implementation
//! lives in the `mysqldiff` crate.

use std::future::Future;

use crate::schema::TableDescriptor;

/// Produces the parsed tables of one schema snapshot.
pub trait FetchTables {
    /// Error type for fetch failures.
    type Error: std::error::Error;

    /// Reads every table of the schema, in the order the server lists
    /// them, and parses each definition.
    fn fetch_tables(&self) -> impl Future<Output = Result<Vec<TableDescriptor>, Self::Error>> + Send;
}
