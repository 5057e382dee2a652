//! Proof artifacts and their transport encoding
//!
//! A [`ProofArtifact`] is the raw proof plus the verification key it checks
//! against. On the wire both travel as hex strings in a [`TransportProof`].

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ProverError, Result};

/// Size of one serialized field element in a proof
pub const FIELD_SIZE: usize = 32;

/// Number of hex characters kept at each end of the abbreviated display
const DISPLAY_EDGE: usize = 100;

/// Serialized proof and verification key
///
/// Well formed only when both fields are non-empty: an engine never emits an
/// empty proof or key, so the facade and [`decode`](Self::decode) reject one,
/// and [`is_well_formed`](Self::is_well_formed) reports it.
#[derive(Clone, PartialEq, Eq)]
pub struct ProofArtifact {
    /// Proof bytes as produced by the engine
    pub proof: Vec<u8>,
    /// Verification key bytes for the proving circuit
    pub vk: Vec<u8>,
}

/// Transport-safe form of a [`ProofArtifact`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportProof {
    /// Hex encoded proof
    pub proof: String,
    /// Hex encoded verification key
    pub vk: String,
}

impl ProofArtifact {
    /// Create an artifact from raw bytes
    pub fn new(proof: Vec<u8>, vk: Vec<u8>) -> Self {
        Self { proof, vk }
    }

    /// True when neither field is empty
    pub fn is_well_formed(&self) -> bool {
        !self.proof.is_empty() && !self.vk.is_empty()
    }

    /// Encode both fields as lowercase hex
    pub fn encode(&self) -> TransportProof {
        TransportProof {
            proof: hex::encode(&self.proof),
            vk: hex::encode(&self.vk),
        }
    }

    /// Decode a transport pair
    ///
    /// Both fields must decode; an error in either yields no artifact.
    pub fn decode(transport: &TransportProof) -> Result<Self> {
        let proof = decode_field("proof", &transport.proof)?;
        let vk = decode_field("verification key", &transport.vk)?;
        Ok(Self { proof, vk })
    }

    /// Split the public inputs the engine prepends to the proof
    ///
    /// Returns the `count` leading field elements as canonical decimal
    /// strings and the remaining proof body.
    pub fn split_public_inputs(&self, count: usize) -> Result<(Vec<String>, &[u8])> {
        let prefix = count.checked_mul(FIELD_SIZE).ok_or_else(|| {
            ProverError::Codec(format!("public input count {} overflows", count))
        })?;
        if prefix > self.proof.len() {
            return Err(ProverError::Codec(format!(
                "proof of {} bytes cannot hold {} public inputs",
                self.proof.len(),
                count
            )));
        }

        let (head, body) = self.proof.split_at(prefix);
        let inputs = head
            .chunks_exact(FIELD_SIZE)
            .map(|chunk| BigUint::from_bytes_be(chunk).to_str_radix(10))
            .collect();

        Ok((inputs, body))
    }
}

fn decode_field(label: &str, encoded: &str) -> Result<Vec<u8>> {
    let digits = encoded
        .strip_prefix("0x")
        .or_else(|| encoded.strip_prefix("0X"))
        .unwrap_or(encoded);

    if digits.is_empty() {
        return Err(ProverError::Codec(format!("{} is empty", label)));
    }

    hex::decode(digits).map_err(|e| ProverError::Codec(format!("{} is not valid hex: {}", label, e)))
}

impl TryFrom<&TransportProof> for ProofArtifact {
    type Error = ProverError;

    fn try_from(transport: &TransportProof) -> Result<Self> {
        Self::decode(transport)
    }
}

impl From<&ProofArtifact> for TransportProof {
    fn from(artifact: &ProofArtifact) -> Self {
        artifact.encode()
    }
}

impl fmt::Debug for ProofArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofArtifact")
            .field("proof_len", &self.proof.len())
            .field("vk_len", &self.vk.len())
            .finish()
    }
}

/// Abbreviated hex of the proof, suitable for display
impl fmt::Display for ProofArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = hex::encode(&self.proof);
        if encoded.len() <= DISPLAY_EDGE * 2 {
            return f.write_str(&encoded);
        }
        write!(
            f,
            "{}...{}",
            &encoded[..DISPLAY_EDGE],
            &encoded[encoded.len() - DISPLAY_EDGE..]
        )
    }
}
