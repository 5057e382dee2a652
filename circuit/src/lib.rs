//! Circuit - Compiled Noir circuit descriptions for the proving bridge
//!
//! This crate holds everything the bridge knows about a circuit without
//! understanding it: the opaque compiled bytecode and the input layout that
//! says which witness indices each logical input occupies.
//!
//! # Overview
//!
//! A [`Circuit`] pairs two things:
//!
//! * [`CircuitBytecode`] - the compiled constraint system, passed through to the
//!   native engine unmodified (usually a gzipped, base64 encoded string)
//! * [`CircuitLayout`] - the ordered mapping from input names to witness indices
//!
//! Layouts come either from the Noir compiler manifest (`target/<name>.json`)
//! or are built by hand for circuits shipped as bare bytecode.
//!
//! # Usage
//!
//! ```no_run
//! use circuit::Circuit;
//!
//! let manifest = std::fs::read_to_string("target/product.json").unwrap();
//! let circuit = Circuit::from_manifest_json(&manifest).unwrap();
//! println!("{} public inputs", circuit.layout.public_input_count());
//! ```
//!
//! # Limitations
//!
//! * Struct and string parameters are not supported by the layout; manifests
//!   declaring them are rejected when loaded.

pub mod bytecode;
pub mod error;
pub mod layout;
pub mod manifest;

pub use bytecode::CircuitBytecode;
pub use error::CircuitError;
pub use layout::{CircuitLayout, InputSlot, LayoutBuilder, Visibility};
pub use manifest::CircuitManifest;

/// Result type for circuit operations
pub type Result<T> = std::result::Result<T, CircuitError>;

/// A compiled circuit together with its input layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    /// Compiled bytecode handed to the native engine
    pub bytecode: CircuitBytecode,
    /// Logical input name to witness index mapping
    pub layout: CircuitLayout,
}

impl Circuit {
    /// Create a circuit from bytecode and an explicit layout
    pub fn new(bytecode: CircuitBytecode, layout: CircuitLayout) -> Self {
        Self { bytecode, layout }
    }

    /// Load a circuit from the JSON manifest produced by the Noir compiler
    pub fn from_manifest_json(json: &str) -> Result<Self> {
        let manifest = CircuitManifest::from_json(json)?;
        manifest.into_circuit()
    }
}
