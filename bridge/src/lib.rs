//! Bridge - Host runtime adapter for the Noir prover
//!
//! Host runtimes call in with a method name, a map of named arguments and a
//! promise. The bridge decodes the arguments, runs the blocking prover call
//! on a worker thread and completes the promise exactly once.
//!
//! # Usage
//!
//! ```no_run
//! # fn engine() -> prover::testing::MockBackend { unimplemented!() }
//! use bridge::{Bridge, CallbackPromise};
//! use prover::{Prover, ProverConfig};
//! use serde_json::json;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let bridge = Bridge::new(Prover::new(engine(), ProverConfig::default()), runtime.handle().clone());
//!
//! bridge.dispatch(
//!     "setupSrs",
//!     json!({"circuitBytecode": "H4sIAAAAAAAA/..."}),
//!     CallbackPromise::new(
//!         |value| println!("ready: {}", value),
//!         |failure| eprintln!("failed: {}", failure),
//!     ),
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Circuits registered with [`Bridge::preload_circuit`] accept inputs by
//! ABI name. Any other bytecode takes inputs keyed by witness index.

pub mod error;
pub mod logging;
pub mod promise;
pub mod request;

pub use error::{BridgeFailure, INTERNAL_ERROR, INVALID_ARGUMENTS, UNKNOWN_METHOD};
pub use logging::init_tracing;
pub use promise::{CallbackPromise, Promise};
pub use request::{
    PointCount, PreloadRequest, PreloadResponse, ProveRequest, SetupSrsRequest, SetupSrsResponse,
    VerifyRequest, VerifyResponse, VersionInfo,
};

use circuit::{Circuit, CircuitBytecode, CircuitLayout};
use error::map_join_error;
use parking_lot::RwLock;
use promise::Completion;
use prover::{Prover, ProverError, ProvingBackend, TransportProof, CONTRACT_VERSION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Method names exported to the host
pub const METHODS: [&str; 5] = ["preloadCircuit", "prove", "verify", "setupSrs", "version"];

/// Adapter from host calls to a shared [`Prover`]
pub struct Bridge<B> {
    prover: Arc<Prover<B>>,
    runtime: Handle,
    circuits: Arc<RwLock<HashMap<String, Circuit>>>,
}

impl<B> Clone for Bridge<B> {
    fn clone(&self) -> Self {
        Self {
            prover: Arc::clone(&self.prover),
            runtime: self.runtime.clone(),
            circuits: Arc::clone(&self.circuits),
        }
    }
}

impl<B: ProvingBackend + 'static> Bridge<B> {
    /// Bridge whose workers run on `runtime`
    pub fn new(prover: Prover<B>, runtime: Handle) -> Self {
        Self {
            prover: Arc::new(prover),
            runtime,
            circuits: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The shared facade every call runs against
    pub fn prover(&self) -> &Prover<B> {
        &self.prover
    }

    /// Crate and boundary contract versions
    pub fn version(&self) -> VersionInfo {
        VersionInfo {
            bridge_version: env!("CARGO_PKG_VERSION").to_string(),
            contract_version: CONTRACT_VERSION,
        }
    }

    /// Register a compiled circuit so its inputs can be passed by name
    ///
    /// Returns the bytecode digest the circuit is registered under.
    /// Registering the same bytecode again replaces the layout.
    pub fn preload_circuit(&self, manifest_json: &str) -> Result<String, BridgeFailure> {
        let circuit = Circuit::from_manifest_json(manifest_json).map_err(ProverError::from)?;
        let digest = circuit.bytecode.digest();
        tracing::info!(
            "Registered circuit {} with {} inputs",
            digest,
            circuit.layout.len()
        );
        self.circuits.write().insert(digest.clone(), circuit);
        Ok(digest)
    }

    /// Prove and return the transport-encoded artifact
    pub async fn prove(&self, request: ProveRequest) -> Result<TransportProof, BridgeFailure> {
        let params = request.params(self.prover.config())?;
        let circuit = self.circuit_for(&request)?;

        self.run_blocking("prove", move |prover| {
            prover
                .prove_inputs(&circuit, &request.inputs, &params)
                .map(|artifact| artifact.encode())
        })
        .await
    }

    /// Verify a transport-encoded artifact
    pub async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, BridgeFailure> {
        let params = request.params(self.prover.config())?;
        let bytecode =
            CircuitBytecode::new(request.circuit_bytecode.as_str()).map_err(ProverError::from)?;

        self.run_blocking("verify", move |prover| {
            prover
                .verify_transport(&bytecode, &request.transport(), &params)
                .map(|verified| VerifyResponse { verified })
        })
        .await
    }

    /// Set up the SRS and report its capacity in points
    pub async fn setup_srs(
        &self,
        request: SetupSrsRequest,
    ) -> Result<SetupSrsResponse, BridgeFailure> {
        let bytecode =
            CircuitBytecode::new(request.circuit_bytecode.as_str()).map_err(ProverError::from)?;
        let srs_path = request.srs_path().map(PathBuf::from);

        self.run_blocking("setupSrs", move |prover| {
            prover
                .setup_srs(&bytecode, srs_path.as_deref())
                .map(|handle| SetupSrsResponse {
                    num_points: handle.capacity,
                })
        })
        .await
    }

    /// Run `method` with host arguments and complete `promise` when done
    ///
    /// Returns immediately and completes the promise exactly once. Calls
    /// that fail to decode, `preloadCircuit` and `version` complete before
    /// this returns; prover calls complete from the runtime.
    pub fn dispatch<P: Promise>(&self, method: &str, args: Value, promise: P) {
        tracing::debug!("Dispatching {}", method);
        let completion = Completion::new(method, promise);

        match method {
            "prove" => {
                self.spawn_call(completion, method, args, |bridge, request: ProveRequest| async move {
                    bridge.prove(request).await
                })
            }
            "verify" => {
                self.spawn_call(completion, method, args, |bridge, request: VerifyRequest| async move {
                    bridge.verify(request).await
                })
            }
            "setupSrs" => {
                self.spawn_call(completion, method, args, |bridge, request: SetupSrsRequest| async move {
                    bridge.setup_srs(request).await
                })
            }
            "preloadCircuit" => {
                let result = decode_args::<PreloadRequest>(method, args)
                    .and_then(|request| self.preload_circuit(&request.circuit_data))
                    .and_then(|digest| to_value(&PreloadResponse { digest }));
                completion.finish(result)
            }
            "version" => completion.finish(to_value(&self.version())),
            _ => completion.finish(Err(BridgeFailure::unknown_method(method))),
        }
    }

    fn spawn_call<P, Req, Res, F, Fut>(
        &self,
        completion: Completion<P>,
        method: &str,
        args: Value,
        call: F,
    ) where
        P: Promise,
        Req: DeserializeOwned,
        Res: Serialize,
        F: FnOnce(Bridge<B>, Req) -> Fut,
        Fut: std::future::Future<Output = Result<Res, BridgeFailure>> + Send + 'static,
    {
        let request = match decode_args::<Req>(method, args) {
            Ok(request) => request,
            Err(failure) => {
                completion.finish(Err(failure));
                return;
            }
        };

        let future = call(self.clone(), request);
        self.runtime.spawn(async move {
            let result = future.await.and_then(|response| to_value(&response));
            completion.finish(result);
        });
    }

    fn circuit_for(&self, request: &ProveRequest) -> Result<Circuit, ProverError> {
        let bytecode = CircuitBytecode::new(request.circuit_bytecode.as_str())?;
        if let Some(circuit) = self.circuits.read().get(&bytecode.digest()) {
            return Ok(circuit.clone());
        }
        let layout = CircuitLayout::positional(request.inputs.names())?;
        Ok(Circuit::new(bytecode, layout))
    }

    async fn run_blocking<T, F>(&self, operation: &'static str, f: F) -> Result<T, BridgeFailure>
    where
        T: Send + 'static,
        F: FnOnce(&Prover<B>) -> prover::Result<T> + Send + 'static,
    {
        let prover = Arc::clone(&self.prover);
        let job = self.runtime.spawn_blocking(move || f(&prover));
        match job.await {
            Ok(result) => result.map_err(BridgeFailure::from),
            Err(err) => Err(map_join_error(operation, err)),
        }
    }
}

fn decode_args<T: DeserializeOwned>(method: &str, args: Value) -> Result<T, BridgeFailure> {
    serde_json::from_value(args).map_err(|err| BridgeFailure::invalid_arguments(method, &err))
}

fn to_value<T: Serialize>(response: &T) -> Result<Value, BridgeFailure> {
    serde_json::to_value(response)
        .map_err(|err| BridgeFailure::internal(format!("unable to encode result: {}", err)))
}
