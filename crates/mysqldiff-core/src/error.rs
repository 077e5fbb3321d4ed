//! Error types for the core crate.

/// Errors raised while turning DDL text into a [`TableDescriptor`].
///
/// [`TableDescriptor`]: crate::schema::TableDescriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No `CREATE TABLE` header line was found, so the table cannot be named.
    #[error("Cannot determine table name from DDL starting with: {header:?}")]
    MissingTableName {
        /// The first non-blank line of the input, for diagnostics.
        header: String,
    },
}
