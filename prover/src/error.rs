//! Error taxonomy for the proving bridge
//!
//! Every failure surfaced to a caller carries one [`ErrorKind`] and a
//! human-readable message. A `false` verification verdict is not an error.

use circuit::CircuitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure of a bridge operation
#[derive(Debug, Error)]
pub enum ProverError {
    /// Malformed or missing witness input
    #[error("encoding error: {0}")]
    Encoding(String),
    /// Malformed proof or verification key transport string
    #[error("codec error: {0}")]
    Codec(String),
    /// No usable structured reference string has been set up
    #[error("SRS missing: {0}")]
    SrsMissing(String),
    /// The structured reference string cannot hold the circuit
    #[error("SRS too small: circuit needs {required} points, SRS holds {available}")]
    SrsTooSmall {
        /// Points the circuit needs
        required: u32,
        /// Points the current SRS provides
        available: u32,
    },
    /// Unsatisfied constraints or an internal prover failure
    #[error("proving error: {0}")]
    Proving(String),
    /// Verification could not produce a verdict
    #[error("verification error: {0}")]
    Verification(String),
    /// Malformed proof-system parameter at the boundary
    #[error("invalid parameter: {0}")]
    Parameter(String),
    /// Unreadable or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Discriminant of a [`ProverError`], stable across releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Encoding,
    Codec,
    SrsMissing,
    SrsTooSmall,
    Proving,
    Verification,
    Parameter,
    Config,
}

impl ErrorKind {
    /// Rejection code handed to the host runtime
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Encoding => "ENCODING_ERROR",
            ErrorKind::Codec => "CODEC_ERROR",
            ErrorKind::SrsMissing => "SRS_MISSING",
            ErrorKind::SrsTooSmall => "SRS_TOO_SMALL",
            ErrorKind::Proving => "PROOF_GENERATION_ERROR",
            ErrorKind::Verification => "PROOF_VERIFICATION_ERROR",
            ErrorKind::Parameter => "INVALID_PARAMETER",
            ErrorKind::Config => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl ProverError {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProverError::Encoding(_) => ErrorKind::Encoding,
            ProverError::Codec(_) => ErrorKind::Codec,
            ProverError::SrsMissing(_) => ErrorKind::SrsMissing,
            ProverError::SrsTooSmall { .. } => ErrorKind::SrsTooSmall,
            ProverError::Proving(_) => ErrorKind::Proving,
            ProverError::Verification(_) => ErrorKind::Verification,
            ProverError::Parameter(_) => ErrorKind::Parameter,
            ProverError::Config(_) => ErrorKind::Config,
        }
    }
}

// Layout and bytecode problems reach the bridge while building a witness.
impl From<CircuitError> for ProverError {
    fn from(err: CircuitError) -> Self {
        ProverError::Encoding(err.to_string())
    }
}

/// Render a backend error with its full context chain
pub(crate) fn backend_message(err: &anyhow::Error) -> String {
    format!("{:#}", err)
}
