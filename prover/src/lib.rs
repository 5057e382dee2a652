//! Prover - Orchestration layer for Noir proof generation
//!
//! This crate sits between a host application and a native proving engine.
//! It turns named inputs into a witness, sequences SRS setup before proving
//! and verification, and moves proofs across the boundary as strings.
//!
//! # Overview
//!
//! * [`witness`] - named inputs to positional, canonical witness maps
//! * [`artifact`] - proof + verification key and their hex transport form
//! * [`srs`] - process-wide structured reference string
//! * [`Prover`] - the facade tying them to a [`ProvingBackend`]
//!
//! ```no_run
//! # fn engine() -> prover::testing::MockBackend { unimplemented!() }
//! use circuit::Circuit;
//! use prover::{NamedInputs, ProofSystemParameters, Prover, ProverConfig};
//!
//! let circuit = Circuit::from_manifest_json(&std::fs::read_to_string("sum.json")?)?;
//! let prover = Prover::new(engine(), ProverConfig::default());
//! prover.setup_srs(&circuit.bytecode, None)?;
//!
//! let inputs: NamedInputs = [("a", "3"), ("b", "4"), ("result", "7")].into_iter().collect();
//! let params = ProofSystemParameters::default();
//! let artifact = prover.prove_inputs(&circuit, &inputs, &params)?;
//! assert!(prover.verify(&circuit.bytecode, &artifact, &params)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod artifact;
pub mod backend;
pub mod config;
pub mod error;
pub mod params;
pub mod srs;
pub mod witness;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use artifact::{ProofArtifact, TransportProof};
pub use backend::ProvingBackend;
pub use config::{ProverConfig, CONTRACT_VERSION};
pub use error::{ErrorKind, ProverError};
pub use params::{ProofSystemParameters, ProofType};
pub use srs::{SrsConfig, SrsHandle, SrsLocation, SrsManager, SrsState};
pub use witness::{InputValue, NamedInputs, WitnessMap};

use circuit::{Circuit, CircuitBytecode};
use error::backend_message;
use std::path::Path;

/// Result type for prover operations
pub type Result<T> = std::result::Result<T, ProverError>;

/// Proving and verification facade over a native backend
///
/// Constructing a `Prover` is the single initialisation point for the
/// engine handle. Share it behind an `Arc`; all methods take `&self`.
pub struct Prover<B> {
    backend: B,
    config: ProverConfig,
    srs: SrsManager,
}

impl<B: ProvingBackend> Prover<B> {
    /// Wrap an initialised backend
    pub fn new(backend: B, config: ProverConfig) -> Self {
        let srs = SrsManager::new(config.srs.clone());
        Self { backend, config, srs }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Active configuration
    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    /// Shared SRS state
    pub fn srs(&self) -> &SrsManager {
        &self.srs
    }

    /// Ensure an SRS large enough for `bytecode` is loaded
    pub fn setup_srs(&self, bytecode: &CircuitBytecode, srs_path: Option<&Path>) -> Result<SrsHandle> {
        self.srs.ensure(&self.backend, bytecode, srs_path)
    }

    /// Ensure an SRS covering `bytecode` under `params` is loaded
    ///
    /// Needed when `params.num_points` exceeds the circuit size.
    pub fn setup_srs_for(
        &self,
        bytecode: &CircuitBytecode,
        srs_path: Option<&Path>,
        params: &ProofSystemParameters,
    ) -> Result<SrsHandle> {
        self.srs
            .ensure_points(&self.backend, bytecode, srs_path, params.num_points.unwrap_or(0))
    }

    /// Encode named inputs and prove
    ///
    /// Encoding failures are reported before the backend is touched.
    pub fn prove_inputs(
        &self,
        circuit: &Circuit,
        inputs: &NamedInputs,
        params: &ProofSystemParameters,
    ) -> Result<ProofArtifact> {
        let witness = witness::encode(inputs, &circuit.layout)?;
        self.prove(circuit, &witness, params)
    }

    /// Generate a proof for `circuit` from an encoded witness
    ///
    /// The witness must assign exactly the indices the layout declares.
    pub fn prove(
        &self,
        circuit: &Circuit,
        witness: &WitnessMap,
        params: &ProofSystemParameters,
    ) -> Result<ProofArtifact> {
        tracing::info!(
            "Proving circuit {} with {} witness entries ({})",
            circuit.bytecode.digest(),
            witness.len(),
            params.proof_type
        );

        witness.check_against(&circuit.layout)?;

        let artifact = self.with_srs(&circuit.bytecode, params, ProverError::Proving, || {
            self.backend
                .prove(&circuit.bytecode, witness, params)
                .map_err(|e| ProverError::Proving(backend_message(&e)))
        })?;

        if !artifact.is_well_formed() {
            return Err(ProverError::Proving(
                "backend returned an empty proof or verification key".to_string(),
            ));
        }

        tracing::info!(
            "Proof generated: {} proof bytes, {} vk bytes",
            artifact.proof.len(),
            artifact.vk.len()
        );
        Ok(artifact)
    }

    /// Verify a decoded proof artifact
    ///
    /// Returns `Ok(false)` for a rejected proof, including one made for a
    /// different circuit or different parameters. Errors mean no verdict.
    pub fn verify(
        &self,
        bytecode: &CircuitBytecode,
        artifact: &ProofArtifact,
        params: &ProofSystemParameters,
    ) -> Result<bool> {
        tracing::info!(
            "Verifying proof ({} bytes) for circuit {} ({})",
            artifact.proof.len(),
            bytecode.digest(),
            params.proof_type
        );

        if !artifact.is_well_formed() {
            return Err(ProverError::Verification(
                "artifact has an empty proof or verification key".to_string(),
            ));
        }

        let verified = self.with_srs(bytecode, params, ProverError::Verification, || {
            self.backend
                .verify(bytecode, artifact, params)
                .map_err(|e| ProverError::Verification(backend_message(&e)))
        })?;

        tracing::info!("Verification result: {}", verified);
        Ok(verified)
    }

    /// Decode a transport pair, then verify it
    pub fn verify_transport(
        &self,
        bytecode: &CircuitBytecode,
        transport: &TransportProof,
        params: &ProofSystemParameters,
    ) -> Result<bool> {
        let artifact = ProofArtifact::decode(transport)?;
        self.verify(bytecode, &artifact, params)
    }

    /// Run `op` under the SRS read lock when `params` need an SRS
    fn with_srs<T>(
        &self,
        bytecode: &CircuitBytecode,
        params: &ProofSystemParameters,
        op_error: fn(String) -> ProverError,
        op: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        if !self.backend.requires_srs(params) {
            return op();
        }

        let circuit_size = self
            .backend
            .circuit_size(bytecode)
            .map_err(|e| op_error(format!("unable to size circuit: {}", backend_message(&e))))?;
        let required = params.srs_requirement(circuit_size);

        self.srs.with_ready(required, |_| op())
    }
}
