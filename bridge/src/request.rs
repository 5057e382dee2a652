//! Named-argument shapes exchanged with the host runtime
//!
//! Field names follow the host's camelCase convention. Optional arguments
//! may be absent, `null`, or an empty string; all three mean "use the
//! configured default".

use prover::{NamedInputs, ProofSystemParameters, ProverConfig, TransportProof};
use serde::{Deserialize, Serialize};

/// Point count as the host sends it: JavaScript callers pass numbers,
/// native callers strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointCount {
    Number(u64),
    Text(String),
}

impl PointCount {
    fn to_text(&self) -> String {
        match self {
            PointCount::Number(n) => n.to_string(),
            PointCount::Text(s) => s.clone(),
        }
    }
}

fn resolve_params(
    proof_type: Option<&str>,
    num_points: Option<&PointCount>,
    config: &ProverConfig,
) -> prover::Result<ProofSystemParameters> {
    let num_points = num_points.map(PointCount::to_text);
    ProofSystemParameters::from_transport(proof_type, num_points.as_deref(), config)
}

/// Arguments of `prove`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveRequest {
    pub circuit_bytecode: String,
    pub inputs: NamedInputs,
    #[serde(default)]
    pub proof_type: Option<String>,
    #[serde(default)]
    pub num_points: Option<PointCount>,
}

impl ProveRequest {
    /// Proof-system parameters, with absent values taken from `config`
    pub fn params(&self, config: &ProverConfig) -> prover::Result<ProofSystemParameters> {
        resolve_params(self.proof_type.as_deref(), self.num_points.as_ref(), config)
    }
}

/// Arguments of `verify`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub circuit_bytecode: String,
    pub proof: String,
    pub vk: String,
    #[serde(default)]
    pub proof_type: Option<String>,
    #[serde(default)]
    pub num_points: Option<PointCount>,
}

impl VerifyRequest {
    /// Proof-system parameters, with absent values taken from `config`
    pub fn params(&self, config: &ProverConfig) -> prover::Result<ProofSystemParameters> {
        resolve_params(self.proof_type.as_deref(), self.num_points.as_ref(), config)
    }

    /// The proof and key as a transport pair
    pub fn transport(&self) -> TransportProof {
        TransportProof {
            proof: self.proof.clone(),
            vk: self.vk.clone(),
        }
    }
}

/// Arguments of `preloadCircuit`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadRequest {
    /// Compiler manifest JSON text
    pub circuit_data: String,
}

/// Result of `preloadCircuit`: the key the circuit is registered under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadResponse {
    pub digest: String,
}

/// Arguments of `setupSrs`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupSrsRequest {
    pub circuit_bytecode: String,
    #[serde(default)]
    pub srs_path: Option<String>,
}

impl SetupSrsRequest {
    /// Explicit SRS path, if one was given
    pub fn srs_path(&self) -> Option<&str> {
        self.srs_path.as_deref().filter(|p| !p.is_empty())
    }
}

/// Result of `verify`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

/// Result of `setupSrs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupSrsResponse {
    pub num_points: u32,
}

/// Result of `version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub bridge_version: String,
    pub contract_version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prover::{InputValue, ProofType};
    use serde_json::json;

    #[test]
    fn test_prove_request_from_host_map() {
        let request: ProveRequest = serde_json::from_value(json!({
            "circuitBytecode": "H4sIAAAA",
            "inputs": {"a": "3", "b": "4", "xs": ["1", "2"]},
            "proofType": "ultra_plonk",
            "numPoints": 4096
        }))
        .unwrap();

        assert_eq!(request.inputs.get("a"), Some(&InputValue::Single("3".to_string())));
        assert_eq!(
            request.inputs.get("xs"),
            Some(&InputValue::Array(vec!["1".to_string(), "2".to_string()]))
        );

        let params = request.params(&ProverConfig::default()).unwrap();
        assert_eq!(params.proof_type, ProofType::UltraPlonk);
        assert_eq!(params.num_points, Some(4096));
    }

    #[test]
    fn test_missing_optionals_use_config_defaults() {
        let request: VerifyRequest = serde_json::from_value(json!({
            "circuitBytecode": "H4sIAAAA",
            "proof": "00",
            "vk": "01",
            "proofType": "",
            "numPoints": null
        }))
        .unwrap();
        let config = ProverConfig {
            default_proof_type: ProofType::UltraHonkKeccak,
            default_num_points: Some(2048),
            ..ProverConfig::default()
        };

        let params = request.params(&config).unwrap();

        assert_eq!(params, ProofSystemParameters::new(ProofType::UltraHonkKeccak, Some(2048)));
    }

    #[test]
    fn test_string_point_count() {
        let request: ProveRequest = serde_json::from_value(json!({
            "circuitBytecode": "H4sIAAAA",
            "inputs": {},
            "numPoints": "0"
        }))
        .unwrap();

        let err = request.params(&ProverConfig::default()).unwrap_err();
        assert_eq!(err.kind(), prover::ErrorKind::Parameter);
    }

    #[test]
    fn test_empty_srs_path_means_default() {
        let request: SetupSrsRequest =
            serde_json::from_value(json!({"circuitBytecode": "H4sIAAAA", "srsPath": ""})).unwrap();
        assert_eq!(request.srs_path(), None);
    }

    #[test]
    fn test_responses_use_host_field_names() {
        assert_eq!(
            serde_json::to_value(SetupSrsResponse { num_points: 65537 }).unwrap(),
            json!({"numPoints": 65537})
        );
        assert_eq!(
            serde_json::to_value(VerifyResponse { verified: false }).unwrap(),
            json!({"verified": false})
        );
    }
}
