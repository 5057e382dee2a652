//! Native proving capability
//!
//! The proving engine lives outside this crate. [`ProvingBackend`] is the
//! seam it plugs into: four operations over opaque bytecode, nothing about
//! how proofs are built. Errors are opaque too; the facade decides which
//! [`ProverError`](crate::ProverError) kind they surface as.

use anyhow::Result;
use circuit::CircuitBytecode;
use std::path::Path;
use std::sync::Arc;

use crate::{ProofArtifact, ProofSystemParameters, WitnessMap};

/// Proving engine exposed to the bridge
///
/// Implementations must tolerate concurrent `prove`/`verify` calls; the
/// facade never calls `setup_srs` while either is in flight.
pub trait ProvingBackend: Send + Sync {
    /// SRS points needed to prove or verify `bytecode`
    fn circuit_size(&self, bytecode: &CircuitBytecode) -> Result<u32>;

    /// Load the SRS for `bytecode`
    ///
    /// Reads `srs_path` when given, otherwise downloads a reference string
    /// large enough for the circuit. Returns the number of points available.
    fn setup_srs(&self, bytecode: &CircuitBytecode, srs_path: Option<&Path>) -> Result<u32>;

    /// Solve the circuit from `witness` and produce a proof
    fn prove(
        &self,
        bytecode: &CircuitBytecode,
        witness: &WitnessMap,
        params: &ProofSystemParameters,
    ) -> Result<ProofArtifact>;

    /// Check `artifact` against `bytecode`
    ///
    /// `Ok(false)` is a rejected proof; `Err` means no verdict was reached.
    fn verify(
        &self,
        bytecode: &CircuitBytecode,
        artifact: &ProofArtifact,
        params: &ProofSystemParameters,
    ) -> Result<bool>;

    /// Whether proofs under `params` need an SRS
    fn requires_srs(&self, _params: &ProofSystemParameters) -> bool {
        true
    }
}

impl<B: ProvingBackend + ?Sized> ProvingBackend for Arc<B> {
    fn circuit_size(&self, bytecode: &CircuitBytecode) -> Result<u32> {
        (**self).circuit_size(bytecode)
    }

    fn setup_srs(&self, bytecode: &CircuitBytecode, srs_path: Option<&Path>) -> Result<u32> {
        (**self).setup_srs(bytecode, srs_path)
    }

    fn prove(
        &self,
        bytecode: &CircuitBytecode,
        witness: &WitnessMap,
        params: &ProofSystemParameters,
    ) -> Result<ProofArtifact> {
        (**self).prove(bytecode, witness, params)
    }

    fn verify(
        &self,
        bytecode: &CircuitBytecode,
        artifact: &ProofArtifact,
        params: &ProofSystemParameters,
    ) -> Result<bool> {
        (**self).verify(bytecode, artifact, params)
    }

    fn requires_srs(&self, params: &ProofSystemParameters) -> bool {
        (**self).requires_srs(params)
    }
}
