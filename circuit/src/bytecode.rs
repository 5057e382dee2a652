//! Opaque compiled circuit bytecode

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{CircuitError, Result};

/// Compiled circuit bytecode as shipped by the Noir compiler
///
/// The bridge never inspects or mutates the contents; it only checks that
/// something was supplied and fingerprints it for logging and lookups.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CircuitBytecode(String);

impl CircuitBytecode {
    /// Wrap a transport-encoded bytecode string
    pub fn new(encoded: impl Into<String>) -> Result<Self> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(CircuitError::EmptyBytecode);
        }
        Ok(Self(encoded))
    }

    /// The bytecode exactly as supplied by the caller
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the encoded bytecode in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; empty bytecode is rejected on construction
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hex encoded SHA-256 of the encoded bytecode
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl TryFrom<String> for CircuitBytecode {
    type Error = CircuitError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<CircuitBytecode> for String {
    fn from(value: CircuitBytecode) -> Self {
        value.0
    }
}

// Bytecode blobs run to kilobytes; keep Debug output readable.
impl fmt::Debug for CircuitBytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBytecode")
            .field("len", &self.0.len())
            .field("digest", &self.digest())
            .finish()
    }
}
