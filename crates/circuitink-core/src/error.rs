//! Error types for the core.

use thiserror::Error;

/// Validation failures raised when constructing or querying model state.
///
/// These surface to the caller as a rejected operation; they are never
/// retried or silently recovered. Transient multi-select states (stale
/// selection ids, commands on an empty selection) are safe no-ops instead
/// and do not appear here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The symbol name is not registered in the library.
    #[error("unknown symbol type: {0}")]
    UnknownSymbolType(String),
    /// The port id does not exist on the symbol definition.
    #[error("unknown port: {0}")]
    UnknownPort(String),
    /// A wire endpoint references an element or port that does not exist.
    #[error("invalid wire endpoint: {0}")]
    InvalidWireEndpoint(String),
}
