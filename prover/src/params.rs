//! Proof-system parameters
//!
//! Selects the backend proof system and an optional point count. The same
//! parameters must be used to prove and to verify.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ProverConfig, ProverError, Result};

/// Proof system selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofType {
    /// UltraHonk with Poseidon2 transcript
    #[default]
    UltraHonk,
    /// UltraHonk with Keccak transcript, for EVM verifiers
    UltraHonkKeccak,
    /// UltraPlonk
    UltraPlonk,
}

impl ProofType {
    /// Wire name of this proof type
    pub fn as_str(self) -> &'static str {
        match self {
            ProofType::UltraHonk => "ultra_honk",
            ProofType::UltraHonkKeccak => "ultra_honk_keccak",
            ProofType::UltraPlonk => "ultra_plonk",
        }
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProofType {
    type Err = ProverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ultra_honk" => Ok(ProofType::UltraHonk),
            "ultra_honk_keccak" => Ok(ProofType::UltraHonkKeccak),
            "ultra_plonk" => Ok(ProofType::UltraPlonk),
            _ => Err(ProverError::Parameter(format!("unknown proof type `{}`", s))),
        }
    }
}

/// Parameters shared by a prove call and its verification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofSystemParameters {
    /// Proof system
    pub proof_type: ProofType,
    /// Committed point count; `None` lets the circuit size decide
    pub num_points: Option<u32>,
}

impl ProofSystemParameters {
    /// Create parameters
    pub fn new(proof_type: ProofType, num_points: Option<u32>) -> Self {
        Self { proof_type, num_points }
    }

    /// Resolve boundary strings against configured defaults
    ///
    /// Absent or empty strings fall back to `config`. A point count must be
    /// a positive decimal integer.
    pub fn from_transport(
        proof_type: Option<&str>,
        num_points: Option<&str>,
        config: &ProverConfig,
    ) -> Result<Self> {
        let proof_type = match proof_type.filter(|s| !s.is_empty()) {
            Some(s) => s.parse()?,
            None => config.default_proof_type,
        };

        let num_points = match num_points.filter(|s| !s.is_empty()) {
            Some(s) => {
                let points: u32 = s.parse().map_err(|_| {
                    ProverError::Parameter(format!("numPoints `{}` is not a positive integer", s))
                })?;
                if points == 0 {
                    return Err(ProverError::Parameter("numPoints must be positive".to_string()));
                }
                Some(points)
            }
            None => config.default_num_points,
        };

        Ok(Self { proof_type, num_points })
    }

    /// SRS points needed by a circuit of `circuit_size` under these parameters
    pub fn srs_requirement(&self, circuit_size: u32) -> u32 {
        circuit_size.max(self.num_points.unwrap_or(0))
    }
}
