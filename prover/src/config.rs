//! Prover configuration
//!
//! Loaded from a TOML file; every field has a default so a missing key or
//! an empty file yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{ProofType, ProverError, Result, SrsConfig};

/// Version of the boundary contract implemented by this crate
///
/// Version 1 takes optional `proofType` and `numPoints` on both prove and
/// verify, resolved against [`ProverConfig`] defaults, and exposes SRS setup
/// as a separate operation.
pub const CONTRACT_VERSION: u32 = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverConfig {
    #[serde(default)]
    pub default_proof_type: ProofType,
    #[serde(default)]
    pub default_num_points: Option<u32>,
    #[serde(default)]
    pub srs: SrsConfig,
}

impl ProverConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            ProverError::Config(format!("unable to read {}: {err}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|err| ProverError::Config(format!("unable to parse config: {err}")))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .map_err(|err| ProverError::Config(format!("unable to create {}: {err}", parent.display())))?;
        let encoded = toml::to_string_pretty(self)
            .map_err(|err| ProverError::Config(format!("unable to encode config: {err}")))?;
        fs::write(path, encoded)
            .map_err(|err| ProverError::Config(format!("unable to write {}: {err}", path.display())))?;
        Ok(())
    }
}
