//! In-process stand-in for the native proving engine
//!
//! [`MockBackend`] is deterministic and keyed on SHA-256, not a proof system.
//! It keeps the behaviour callers depend on: a proof only verifies against
//! the bytecode and parameters it was made with, any altered byte makes
//! verification return `false`, and unsatisfied witnesses fail to prove.
//! SRS files are plain text holding their point capacity.

use anyhow::{bail, Context, Result};
use circuit::CircuitBytecode;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::{ProofArtifact, ProofSystemParameters, ProvingBackend, WitnessMap};

type Constraint = Arc<dyn Fn(&WitnessMap) -> bool + Send + Sync>;

const DIGEST_SIZE: usize = 32;

/// Deterministic test backend
pub struct MockBackend {
    circuit_size: u32,
    sizes: HashMap<String, u32>,
    fetch_capacity: u32,
    constraint: Option<Constraint>,
    requires_srs: bool,
    setup_calls: AtomicUsize,
    prove_calls: AtomicUsize,
    verify_calls: AtomicUsize,
}

impl MockBackend {
    /// Backend whose circuits all need `circuit_size` points
    ///
    /// Fetching an SRS yields the next power of two above the size, plus one.
    pub fn new(circuit_size: u32) -> Self {
        Self {
            circuit_size,
            sizes: HashMap::new(),
            fetch_capacity: circuit_size.saturating_add(1).next_power_of_two().saturating_add(1),
            constraint: None,
            requires_srs: true,
            setup_calls: AtomicUsize::new(0),
            prove_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
        }
    }

    /// Override the size reported for the bytecode string `bytecode`
    pub fn with_circuit_size(mut self, bytecode: &str, size: u32) -> Self {
        self.sizes.insert(bytecode.to_string(), size);
        self
    }

    /// Points provided by a fetched SRS
    pub fn with_fetch_capacity(mut self, points: u32) -> Self {
        self.fetch_capacity = points;
        self
    }

    /// Witness predicate standing in for the circuit's constraints
    pub fn with_constraint(
        mut self,
        constraint: impl Fn(&WitnessMap) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.constraint = Some(Arc::new(constraint));
        self
    }

    /// Report that no proof type needs an SRS
    pub fn without_srs(mut self) -> Self {
        self.requires_srs = false;
        self
    }

    /// Number of `setup_srs` calls so far
    pub fn setup_calls(&self) -> usize {
        self.setup_calls.load(Ordering::SeqCst)
    }

    /// Number of `prove` calls so far
    pub fn prove_calls(&self) -> usize {
        self.prove_calls.load(Ordering::SeqCst)
    }

    /// Number of `verify` calls so far
    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    fn verification_key(bytecode: &CircuitBytecode, params: &ProofSystemParameters) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(b"mock-vk");
        hasher.update(bytecode.as_str().as_bytes());
        hasher.update(params.proof_type.as_str().as_bytes());
        hasher.update(params.num_points.unwrap_or(0).to_le_bytes());
        hasher.finalize().to_vec()
    }

    fn witness_digest(witness: &WitnessMap) -> Vec<u8> {
        let mut hasher = Sha256::new();
        for (index, value) in witness.iter() {
            hasher.update(index.to_le_bytes());
            hasher.update(value.as_bytes());
            hasher.update([0u8]);
        }
        hasher.finalize().to_vec()
    }

    fn seal(vk: &[u8], body: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(vk);
        hasher.update(body);
        hasher.finalize().to_vec()
    }
}

impl ProvingBackend for MockBackend {
    fn circuit_size(&self, bytecode: &CircuitBytecode) -> Result<u32> {
        Ok(self
            .sizes
            .get(bytecode.as_str())
            .copied()
            .unwrap_or(self.circuit_size))
    }

    fn setup_srs(&self, _bytecode: &CircuitBytecode, srs_path: Option<&Path>) -> Result<u32> {
        self.setup_calls.fetch_add(1, Ordering::SeqCst);
        match srs_path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read SRS file: {:?}", path))?;
                content
                    .trim()
                    .parse()
                    .with_context(|| format!("Malformed SRS file: {:?}", path))
            }
            None => Ok(self.fetch_capacity),
        }
    }

    fn prove(
        &self,
        bytecode: &CircuitBytecode,
        witness: &WitnessMap,
        params: &ProofSystemParameters,
    ) -> Result<ProofArtifact> {
        self.prove_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(constraint) = &self.constraint {
            if !constraint(witness) {
                bail!("witness does not satisfy the circuit constraints");
            }
        }

        let vk = Self::verification_key(bytecode, params);
        let body = Self::witness_digest(witness);
        let mut proof = body.clone();
        proof.extend(Self::seal(&vk, &body));

        Ok(ProofArtifact::new(proof, vk))
    }

    fn verify(
        &self,
        bytecode: &CircuitBytecode,
        artifact: &ProofArtifact,
        params: &ProofSystemParameters,
    ) -> Result<bool> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        if artifact.vk.len() != DIGEST_SIZE {
            bail!("verification key has {} bytes, expected {}", artifact.vk.len(), DIGEST_SIZE);
        }
        if artifact.vk != Self::verification_key(bytecode, params) {
            return Ok(false);
        }
        if artifact.proof.len() != DIGEST_SIZE * 2 {
            return Ok(false);
        }

        let (body, seal) = artifact.proof.split_at(DIGEST_SIZE);
        Ok(seal == Self::seal(&artifact.vk, body).as_slice())
    }

    fn requires_srs(&self, _params: &ProofSystemParameters) -> bool {
        self.requires_srs
    }
}

/// Write an SRS file the mock backend reads as `capacity` points
pub fn write_srs_file(path: &Path, capacity: u32) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, capacity.to_string())
}
