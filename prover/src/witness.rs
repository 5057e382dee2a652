//! Witness Encoding
//!
//! Converts named caller inputs into the positional witness map consumed by
//! the native engine. Values are normalised into the BN254 scalar field and
//! written in canonical decimal form.

use circuit::CircuitLayout;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ProverError, Result};

/// BN254 scalar field modulus as little-endian 32-bit digits
///
/// 21888242871839275222246405745257275088548364400416034343698204186575808495617
const BN254_MODULUS_DIGITS: [u32; 8] = [
    0xf000_0001,
    0x43e1_f593,
    0x79b9_7091,
    0x2833_e848,
    0x8181_585d,
    0xb850_45b6,
    0xe131_a029,
    0x3064_4e72,
];

/// BN254 scalar field modulus
pub fn field_modulus() -> BigUint {
    BigUint::from_slice(&BN254_MODULUS_DIGITS)
}

/// A caller-supplied input value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// Single field element as a decimal or `0x` hex string
    Single(String),
    /// Array of field elements
    Array(Vec<String>),
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Single(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Single(value)
    }
}

impl From<Vec<String>> for InputValue {
    fn from(values: Vec<String>) -> Self {
        InputValue::Array(values)
    }
}

/// Named circuit inputs as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedInputs {
    values: BTreeMap<String, InputValue>,
}

impl NamedInputs {
    /// Create new empty inputs
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single value input
    pub fn set_single(&mut self, name: &str, value: &str) {
        self.values
            .insert(name.to_string(), InputValue::Single(value.to_string()));
    }

    /// Set an array value input
    pub fn set_array(&mut self, name: &str, values: Vec<String>) {
        self.values.insert(name.to_string(), InputValue::Array(values));
    }

    /// Value supplied for `name`
    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.values.get(name)
    }

    /// Supplied input names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of supplied inputs
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for NamedInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Positional witness: witness index to canonical decimal field element
///
/// Values are normalised on insertion, so every entry is canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessMap {
    entries: BTreeMap<u32, String>,
}

impl WitnessMap {
    /// Create an empty witness map
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise `value` and store it at `index`
    ///
    /// Replaces any previous value at the same index.
    pub fn insert(&mut self, index: u32, value: &str) -> Result<()> {
        if index == 0 {
            return Err(ProverError::Encoding(
                "witness index 0 is reserved; indices start at 1".to_string(),
            ));
        }
        let canonical = canonical_field_element(value)
            .map_err(|reason| ProverError::Encoding(format!("witness {}: {}", index, reason)))?;
        self.entries.insert(index, canonical);
        Ok(())
    }

    /// Canonical value at `index`
    pub fn get(&self, index: u32) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    /// Number of assigned indices
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no index is assigned
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(index, value)| (*index, value.as_str()))
    }

    /// Assigned indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// String-keyed copy, the shape the native layer consumes
    pub fn to_index_strings(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(index, value)| (index.to_string(), value.clone()))
            .collect()
    }

    /// Check that the map assigns exactly the indices `layout` requires
    pub fn check_against(&self, layout: &CircuitLayout) -> Result<()> {
        let required = layout.required_indices();

        let missing: Vec<u32> = required
            .iter()
            .copied()
            .filter(|index| !self.entries.contains_key(index))
            .collect();
        if !missing.is_empty() {
            return Err(ProverError::Proving(format!(
                "witness is missing indices {:?} declared by the circuit",
                missing
            )));
        }

        let extra: Vec<u32> = self.indices().filter(|index| !required.contains(index)).collect();
        if !extra.is_empty() {
            return Err(ProverError::Proving(format!(
                "witness assigns indices {:?} not used by the circuit",
                extra
            )));
        }

        Ok(())
    }
}

/// Encode named inputs into a witness map following `layout`
///
/// Every declared input must be supplied and nothing else may be. Each value
/// is written at the indices its slot occupies, in element order.
pub fn encode(inputs: &NamedInputs, layout: &CircuitLayout) -> Result<WitnessMap> {
    if let Some(unknown) = inputs.names().find(|name| layout.slot(name).is_none()) {
        return Err(ProverError::Encoding(format!(
            "input `{}` is not declared by the circuit",
            unknown
        )));
    }

    let mut witness = WitnessMap::new();

    for slot in layout.slots() {
        let value = inputs.get(&slot.name).ok_or_else(|| {
            ProverError::Encoding(format!(
                "missing input `{}` (witness indices {:?})",
                slot.name, slot.indices
            ))
        })?;

        let values: Vec<&str> = match value {
            InputValue::Single(v) if !slot.is_array => vec![v.as_str()],
            InputValue::Array(vs) if slot.is_array || vs.len() == 1 => {
                vs.iter().map(String::as_str).collect()
            }
            InputValue::Single(_) => {
                return Err(ProverError::Encoding(format!(
                    "input `{}` expects an array of {} values",
                    slot.name,
                    slot.width()
                )))
            }
            InputValue::Array(_) => {
                return Err(ProverError::Encoding(format!(
                    "input `{}` expects a single value",
                    slot.name
                )))
            }
        };

        if values.len() != slot.width() {
            return Err(ProverError::Encoding(format!(
                "input `{}` expects {} values, got {}",
                slot.name,
                slot.width(),
                values.len()
            )));
        }

        for (&index, raw) in slot.indices.iter().zip(values) {
            let canonical = canonical_field_element(raw).map_err(|reason| {
                ProverError::Encoding(format!("input `{}`: {}", slot.name, reason))
            })?;
            witness.entries.insert(index, canonical);
        }
    }

    tracing::debug!(
        "Encoded {} inputs into {} witness indices",
        inputs.len(),
        witness.len()
    );

    Ok(witness)
}

/// Normalise a textual integer into its canonical decimal field element
///
/// Accepts decimal or `0x`-prefixed hex, an optional leading `-` (mapped to
/// `p - n`), and the literals `true`/`false`.
pub fn canonical_field_element(raw: &str) -> std::result::Result<String, String> {
    match raw {
        "true" => return Ok("1".to_string()),
        "false" => return Ok("0".to_string()),
        _ => {}
    }

    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let magnitude = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) => parse_digits(hex, 16),
        None => parse_digits(body, 10),
    }
    .ok_or_else(|| format!("`{}` is not a decimal or 0x-prefixed hex integer", raw))?;

    let modulus = field_modulus();
    if magnitude >= modulus {
        return Err(format!("`{}` exceeds the field modulus", raw));
    }

    let element = if negative && !magnitude.is_zero() {
        modulus - magnitude
    } else {
        magnitude
    };

    Ok(element.to_str_radix(10))
}

fn parse_digits(digits: &str, radix: u32) -> Option<BigUint> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    BigUint::parse_bytes(digits.as_bytes(), radix)
}
