use thiserror::Error;

/// Core error type shared across seedfill crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A textual type reference could not be parsed.
    #[error("invalid type reference '{input}': {reason}")]
    InvalidTypeRef { input: String, reason: String },
    /// A type descriptor or type file violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A named type is referenced but never registered.
    #[error("unknown type: {0}")]
    UnknownType(String),
    /// Two descriptors were registered under the same name.
    #[error("duplicate type: {0}")]
    DuplicateType(String),
}

/// Convenience alias for results returned by seedfill crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure raised by a setter or constructor invoker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvokeError(pub String);

impl InvokeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
