//! Error types for CiteGraph.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A PDF could not be opened or parsed. The caller skips the file
    /// and continues with the rest of the batch.
    #[error("Document read error: {0}")]
    DocumentRead(String),

    /// The graph backend could not be reached or a statement failed.
    /// Aborts the current phase; the whole batch is safe to retry since
    /// every write is idempotent.
    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
