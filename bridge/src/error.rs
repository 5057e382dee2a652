//! Failures reported to the host runtime

use prover::ProverError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinError;

/// Code for failures outside the prover taxonomy, such as a panicked worker
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
/// Code for a method name the bridge does not export
pub const UNKNOWN_METHOD: &str = "UNKNOWN_METHOD";
/// Code for an argument map that does not match the method
pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";

/// Rejection carried back to the host: a stable code and a message
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct BridgeFailure {
    pub code: String,
    pub message: String,
}

impl BridgeFailure {
    /// Failure with an arbitrary code
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Failure outside the prover taxonomy
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }

    /// Call to a method the bridge does not export
    pub fn unknown_method(method: &str) -> Self {
        Self::new(
            UNKNOWN_METHOD,
            format!(
                "no bridge method named `{}`; expected one of {}",
                method,
                crate::METHODS.join(", ")
            ),
        )
    }

    /// Argument map that does not decode into the method's request
    pub fn invalid_arguments(method: &str, err: &serde_json::Error) -> Self {
        Self::new(INVALID_ARGUMENTS, format!("{}: {}", method, err))
    }
}

impl From<ProverError> for BridgeFailure {
    fn from(err: ProverError) -> Self {
        Self::new(err.kind().code(), err.to_string())
    }
}

pub(crate) fn map_join_error(operation: &str, err: JoinError) -> BridgeFailure {
    if err.is_panic() {
        tracing::warn!("{} worker panicked", operation);
        BridgeFailure::internal(format!("{} worker panicked", operation))
    } else {
        BridgeFailure::internal(format!("{} worker failed: {}", operation, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prover_errors_keep_their_code() {
        let failure: BridgeFailure = ProverError::Codec("odd length".to_string()).into();
        assert_eq!(failure.code, "CODEC_ERROR");
        assert_eq!(failure.message, "codec error: odd length");

        let failure: BridgeFailure = ProverError::SrsTooSmall { required: 9, available: 5 }.into();
        assert_eq!(failure.code, "SRS_TOO_SMALL");
    }

    #[test]
    fn test_failure_serialises_flat() {
        let failure = BridgeFailure::unknown_method("prooove");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["code"], "UNKNOWN_METHOD");
        assert_eq!(
            json["message"],
            "no bridge method named `prooove`; expected one of preloadCircuit, prove, verify, setupSrs, version"
        );
    }
}
