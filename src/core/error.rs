use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has {found} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("catalog has no lens redshift")]
    MissingRedshift,

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CosmologyError {
    #[error("cosmology table is empty")]
    EmptyTable,

    #[error("cosmology table row {0} is not strictly after the previous redshift")]
    UnorderedTable(usize),

    #[error("cosmology table row {0} has a non-finite value")]
    NonFinite(usize),
}
