//! End-to-end flow for a circuit constraining `a + b == result`
//!
//! The circuit is loaded from a compiler manifest, inputs are named, and the
//! engine is the deterministic mock from the `testing` feature.

use circuit::Circuit;
use prover::testing::{write_srs_file, MockBackend};
use prover::{
    ErrorKind, NamedInputs, ProofArtifact, ProofSystemParameters, ProofType, Prover, ProverConfig,
    SrsConfig, SrsLocation, WitnessMap,
};

const SUM_MANIFEST: &str = r#"{
    "noir_version": "0.23.0+5be9f9d7e2f39ca228df10e5a530474af0331704",
    "hash": 11408183655436419286,
    "abi": {
        "parameters": [
            {"name": "a", "type": {"kind": "field"}, "visibility": "private"},
            {"name": "b", "type": {"kind": "field"}, "visibility": "private"},
            {"name": "result", "type": {"kind": "field"}, "visibility": "public"}
        ],
        "param_witnesses": {
            "a": [{"start": 1, "end": 2}],
            "b": [{"start": 2, "end": 3}],
            "result": [{"start": 3, "end": 4}]
        },
        "return_type": null,
        "return_witnesses": []
    },
    "bytecode": "H4sIAAAAAAAA/7WTMRLEIAhFMbpHWkEwUO5VNhO9/xH2iLvMQmM3SRCMJyPGf6iKAIL1+YOIZ/Ll6Cs/AI+LRcuGjNQAAA=="
}"#;

const CIRCUIT_SIZE: u32 = 3_000;

fn sum_holds(witness: &WitnessMap) -> bool {
    let value = |i| witness.get(i).and_then(|v| v.parse::<u128>().ok());
    match (value(1), value(2), value(3)) {
        (Some(a), Some(b), Some(result)) => a + b == result,
        _ => false,
    }
}

fn inputs(a: &str, b: &str, result: &str) -> NamedInputs {
    [("a", a), ("b", b), ("result", result)].into_iter().collect()
}

fn prover_with_cache(cache_dir: &std::path::Path) -> Prover<MockBackend> {
    let config = ProverConfig {
        srs: SrsConfig::new(cache_dir, "srs.local"),
        ..ProverConfig::default()
    };
    Prover::new(
        MockBackend::new(CIRCUIT_SIZE).with_constraint(sum_holds),
        config,
    )
}

#[test]
fn test_sum_circuit_proves_and_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = Circuit::from_manifest_json(SUM_MANIFEST).unwrap();
    let prover = prover_with_cache(dir.path());
    let params = ProofSystemParameters::default();

    let handle = prover.setup_srs(&circuit.bytecode, None).unwrap();
    assert_eq!(handle.location, SrsLocation::Fetched);
    assert!(handle.capacity >= CIRCUIT_SIZE);

    let artifact = prover
        .prove_inputs(&circuit, &inputs("3", "4", "7"), &params)
        .unwrap();
    assert!(prover.verify(&circuit.bytecode, &artifact, &params).unwrap());

    let transport = artifact.encode();
    let decoded = ProofArtifact::decode(&transport).unwrap();
    assert_eq!(decoded, artifact);
    assert!(prover
        .verify_transport(&circuit.bytecode, &transport, &params)
        .unwrap());
}

#[test]
fn test_changed_result_is_checked_by_the_circuit() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = Circuit::from_manifest_json(SUM_MANIFEST).unwrap();
    let prover = prover_with_cache(dir.path());
    let params = ProofSystemParameters::default();
    prover.setup_srs(&circuit.bytecode, None).unwrap();

    let original = prover
        .prove_inputs(&circuit, &inputs("3", "4", "7"), &params)
        .unwrap();

    let err = prover
        .prove_inputs(&circuit, &inputs("3", "4", "8"), &params)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Proving);

    let rebalanced = prover
        .prove_inputs(&circuit, &inputs("4", "4", "8"), &params)
        .unwrap();
    assert_ne!(rebalanced.proof, original.proof);
    assert!(prover.verify(&circuit.bytecode, &rebalanced, &params).unwrap());
    assert!(prover.verify(&circuit.bytecode, &original, &params).unwrap());
}

#[test]
fn test_hex_inputs_normalise_to_the_same_witness() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = Circuit::from_manifest_json(SUM_MANIFEST).unwrap();
    let prover = prover_with_cache(dir.path());
    let params = ProofSystemParameters::default();
    prover.setup_srs(&circuit.bytecode, None).unwrap();

    let decimal = prover
        .prove_inputs(&circuit, &inputs("3", "4", "7"), &params)
        .unwrap();
    let hex = prover
        .prove_inputs(&circuit, &inputs("0x03", "0x4", "0X7"), &params)
        .unwrap();

    assert_eq!(decimal, hex);
}

#[test]
fn test_cached_srs_file_is_preferred() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = Circuit::from_manifest_json(SUM_MANIFEST).unwrap();
    let prover = prover_with_cache(dir.path());
    let cached = dir.path().join("srs.local");
    write_srs_file(&cached, 4_097).unwrap();

    let first = prover.setup_srs(&circuit.bytecode, None).unwrap();
    let second = prover.setup_srs(&circuit.bytecode, None).unwrap();

    assert_eq!(first.location, SrsLocation::Cached(cached));
    assert_eq!(first.capacity, 4_097);
    assert_eq!(first, second);
    assert_eq!(prover.backend().setup_calls(), 1);
}

#[test]
fn test_proof_bound_to_proof_type() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = Circuit::from_manifest_json(SUM_MANIFEST).unwrap();
    let prover = prover_with_cache(dir.path());
    prover.setup_srs(&circuit.bytecode, None).unwrap();

    let keccak = ProofSystemParameters::new(ProofType::UltraHonkKeccak, None);
    let artifact = prover
        .prove_inputs(&circuit, &inputs("3", "4", "7"), &keccak)
        .unwrap();

    assert!(prover.verify(&circuit.bytecode, &artifact, &keccak).unwrap());
    assert!(!prover
        .verify(&circuit.bytecode, &artifact, &ProofSystemParameters::default())
        .unwrap());
}

#[test]
fn test_invalidated_srs_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = Circuit::from_manifest_json(SUM_MANIFEST).unwrap();
    let prover = prover_with_cache(dir.path());
    let params = ProofSystemParameters::default();
    prover.setup_srs(&circuit.bytecode, None).unwrap();
    let artifact = prover
        .prove_inputs(&circuit, &inputs("3", "4", "7"), &params)
        .unwrap();

    prover.srs().invalidate();

    let err = prover.verify(&circuit.bytecode, &artifact, &params).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SrsMissing);
    assert_eq!(prover.backend().verify_calls(), 0);
}
