use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy shared by every plumb crate.
///
/// All variants are raised at the point of violation and never recovered
/// internally. Messages carry the offending schema/column/value so a failing
/// test is diagnosable from the message alone.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Value or column count mismatch.
    #[error("arity error: {0}")]
    Arity(String),

    /// A referenced column is not present (or not uniquely present) in a schema.
    #[error("field resolution error: {0}")]
    FieldResolution(String),

    /// A value is incompatible with the declared column type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// An appended entry's columns differ from the declared output schema.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Advancing past the end of a group or record stream.
    #[error("exhausted: {0}")]
    Exhausted(String),

    /// Acting on a structure in the wrong state.
    #[error("illegal use: {0}")]
    IllegalUse(String),

    /// A capability the harness does not simulate.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("hashing error: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
