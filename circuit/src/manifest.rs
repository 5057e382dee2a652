//! Noir compiler manifest
//!
//! The JSON artifact written by `nargo compile` carries the bytecode and the
//! ABI. Only the parts needed to build a [`CircuitLayout`] are modelled; debug
//! symbols and the file map are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Circuit, CircuitBytecode, CircuitError, CircuitLayout, InputSlot, Result, Visibility};

/// Compiled circuit manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitManifest {
    /// Compiler version string, e.g. `0.23.0+...`
    #[serde(default)]
    pub noir_version: Option<String>,
    /// Compiler hash of the program
    #[serde(default)]
    pub hash: Option<u64>,
    /// Program ABI
    pub abi: Abi,
    /// Transport encoded bytecode
    pub bytecode: String,
}

/// Program ABI as emitted by the compiler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Abi {
    /// Parameters in declaration order
    pub parameters: Vec<AbiParameter>,
    /// Witness ranges per parameter name
    ///
    /// Absent in manifests from compilers that assign witnesses
    /// sequentially in parameter order.
    #[serde(default)]
    pub param_witnesses: Option<BTreeMap<String, Vec<WitnessRange>>>,
    /// Witness indices holding the return value
    #[serde(default)]
    pub return_witnesses: Vec<u32>,
}

/// One ABI parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: AbiType,
    pub visibility: Visibility,
}

/// ABI type descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiType {
    /// `field`, `integer`, `boolean`, `array`, `struct`, `string`
    pub kind: String,
    /// Element count for arrays and strings
    #[serde(default)]
    pub length: Option<u32>,
    /// Element type for arrays
    #[serde(default, rename = "type")]
    pub element: Option<Box<AbiType>>,
}

/// Half-open range of witness indices `[start, end)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WitnessRange {
    pub start: u32,
    pub end: u32,
}

impl AbiType {
    fn is_scalar(&self) -> bool {
        matches!(self.kind.as_str(), "field" | "integer" | "boolean")
    }
}

impl CircuitManifest {
    /// Parse a manifest from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: CircuitManifest = serde_json::from_str(json)?;
        tracing::debug!(
            "Parsed circuit manifest: noir_version={:?}, {} parameters",
            manifest.noir_version,
            manifest.abi.parameters.len()
        );
        Ok(manifest)
    }

    /// Derive the input layout from the ABI
    ///
    /// Uses `param_witnesses` when present. Otherwise witnesses are assigned
    /// sequentially in parameter order starting at index 1.
    pub fn layout(&self) -> Result<CircuitLayout> {
        let mut slots = Vec::with_capacity(self.abi.parameters.len());
        let mut next_index: u32 = 1;

        for param in &self.abi.parameters {
            let (width, is_array) = parameter_width(param)?;

            let indices = match &self.abi.param_witnesses {
                Some(ranges) => {
                    let ranges = ranges.get(&param.name).ok_or_else(|| {
                        CircuitError::Manifest(format!(
                            "parameter `{}` has no witness assignment",
                            param.name
                        ))
                    })?;
                    expand_ranges(&param.name, ranges, width)?
                }
                None => {
                    let end = next_index.checked_add(width).ok_or_else(|| {
                        CircuitError::InvalidLayout("witness index overflow".to_string())
                    })?;
                    let indices = (next_index..end).collect();
                    next_index = end;
                    indices
                }
            };

            if indices.len() != width as usize {
                return Err(CircuitError::InvalidLayout(format!(
                    "parameter `{}` expects {} witnesses, manifest assigns {}",
                    param.name,
                    width,
                    indices.len()
                )));
            }

            slots.push(InputSlot {
                name: param.name.clone(),
                indices,
                visibility: param.visibility,
                is_array,
            });
        }

        CircuitLayout::from_slots(slots)
    }

    /// Consume the manifest into a [`Circuit`]
    pub fn into_circuit(self) -> Result<Circuit> {
        let layout = self.layout()?;
        let bytecode = CircuitBytecode::new(self.bytecode)?;
        Ok(Circuit::new(bytecode, layout))
    }
}

fn parameter_width(param: &AbiParameter) -> Result<(u32, bool)> {
    let unsupported = || CircuitError::UnsupportedParameter {
        name: param.name.clone(),
        kind: param.typ.kind.clone(),
    };

    if param.typ.is_scalar() {
        return Ok((1, false));
    }
    if param.typ.kind == "array" {
        let element = param.typ.element.as_deref().ok_or_else(unsupported)?;
        if !element.is_scalar() {
            return Err(CircuitError::UnsupportedParameter {
                name: param.name.clone(),
                kind: format!("array<{}>", element.kind),
            });
        }
        let length = param.typ.length.ok_or_else(|| {
            CircuitError::Manifest(format!("array parameter `{}` has no length", param.name))
        })?;
        return Ok((length, true));
    }
    Err(unsupported())
}

fn expand_ranges(name: &str, ranges: &[WitnessRange], width: u32) -> Result<Vec<u32>> {
    let mut assigned: u32 = 0;
    for range in ranges {
        if range.end < range.start {
            return Err(CircuitError::Manifest(format!(
                "parameter `{}` has inverted witness range {}..{}",
                name, range.start, range.end
            )));
        }
        assigned = assigned
            .checked_add(range.end - range.start)
            .filter(|total| *total <= width)
            .ok_or_else(|| {
                CircuitError::InvalidLayout(format!(
                    "parameter `{}` expects {} witnesses, manifest assigns more",
                    name, width
                ))
            })?;
    }

    // Sized before expanding so a hostile range cannot force a huge allocation.
    let mut indices = Vec::with_capacity(assigned as usize);
    for range in ranges {
        indices.extend(range.start..range.end);
    }
    Ok(indices)
}
