use seedfill_core::InvokeError;
use thiserror::Error;

/// Errors emitted by the population engine.
///
/// Every variant raised while walking a graph carries the diagnostic path,
/// innermost frame first.
#[derive(Debug, Error)]
pub enum PopulateError {
    /// No generator applies and no construction strategy exists.
    #[error("Don't know how to generate value for setter at path '{path}'")]
    Unresolvable { path: String },
    #[error("failed to instantiate '{type_name}' at path '{path}': {source}")]
    Instantiation {
        type_name: String,
        path: String,
        #[source]
        source: InvokeError,
    },
    #[error("setter '{setter}' failed at path '{path}': {source}")]
    Invocation {
        setter: String,
        path: String,
        #[source]
        source: InvokeError,
    },
    #[error("ambiguous resolution at path '{path}': {source}")]
    AmbiguousResolution {
        path: String,
        #[source]
        source: Ambiguity,
    },
    #[error(
        "generator '{generator}' produced a {actual} value for declared type {expected} at path '{path}'"
    )]
    TypeMismatch {
        generator: String,
        expected: String,
        actual: String,
        path: String,
    },
    #[error("generator failed at path '{path}': {message}")]
    Generator { path: String, message: String },
    #[error("unknown type '{name}' at path '{path}'")]
    UnknownType { name: String, path: String },
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("type error: {0}")]
    Types(#[from] seedfill_core::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("conversion error: {0}")]
    Conversion(#[from] serde_json::Error),
}

impl PopulateError {
    /// Diagnostic path of the failure, when it happened inside a graph.
    pub fn path(&self) -> Option<&str> {
        match self {
            PopulateError::Unresolvable { path }
            | PopulateError::Instantiation { path, .. }
            | PopulateError::Invocation { path, .. }
            | PopulateError::AmbiguousResolution { path, .. }
            | PopulateError::TypeMismatch { path, .. }
            | PopulateError::Generator { path, .. }
            | PopulateError::UnknownType { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Resolution that has no single best candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ambiguity {
    #[error("setter '{setter}' on '{type_name}' has equally specific overloads: {candidates}")]
    Setter {
        type_name: String,
        setter: String,
        candidates: String,
    },
    #[error("'{type_name}' has {count} eligible constructors taking {arity} parameter(s)")]
    Constructor {
        type_name: String,
        arity: usize,
        count: usize,
    },
}
