//! Errors raised while describing a circuit

use thiserror::Error;

/// Failure to load or validate a circuit description
#[derive(Debug, Error)]
pub enum CircuitError {
    /// The circuit bytecode string was empty
    #[error("circuit bytecode is empty")]
    EmptyBytecode,
    /// The compiler manifest could not be parsed
    #[error("invalid circuit manifest: {0}")]
    Manifest(String),
    /// The layout violates an index or naming rule
    #[error("invalid circuit layout: {0}")]
    InvalidLayout(String),
    /// The manifest declares a parameter kind the bridge cannot encode
    #[error("unsupported parameter `{name}` of kind `{kind}`")]
    UnsupportedParameter {
        /// Parameter name as declared in the ABI
        name: String,
        /// ABI kind string
        kind: String,
    },
}

impl From<serde_json::Error> for CircuitError {
    fn from(err: serde_json::Error) -> Self {
        CircuitError::Manifest(err.to_string())
    }
}
