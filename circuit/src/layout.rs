//! Circuit input layout
//!
//! Maps the logical input names a caller knows about onto the positional
//! witness indices the native engine consumes. Witness indices are 1-based;
//! index 0 is never assigned to a caller input.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::{CircuitError, Result};

/// Whether an input is revealed to the verifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// One logical input and the witness indices it occupies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSlot {
    /// Input name as used by callers
    pub name: String,
    /// Witness indices, in element order for arrays
    pub indices: Vec<u32>,
    /// Public or private input
    pub visibility: Visibility,
    /// Whether the caller supplies a list of values
    pub is_array: bool,
}

impl InputSlot {
    /// Number of field elements this input occupies
    pub fn width(&self) -> usize {
        self.indices.len()
    }
}

/// Validated, ordered set of input slots for one circuit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitLayout {
    slots: Vec<InputSlot>,
}

impl CircuitLayout {
    /// Start building a layout by hand
    pub fn builder() -> LayoutBuilder {
        LayoutBuilder::default()
    }

    /// Validate a list of slots into a layout
    ///
    /// Rejects empty or duplicated names, index 0, indices shared between
    /// slots, and slots without any index.
    pub fn from_slots(slots: Vec<InputSlot>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut seen = HashSet::new();

        for slot in &slots {
            if slot.name.is_empty() {
                return Err(CircuitError::InvalidLayout("input with empty name".to_string()));
            }
            if !names.insert(slot.name.as_str()) {
                return Err(CircuitError::InvalidLayout(format!(
                    "input `{}` declared twice",
                    slot.name
                )));
            }
            if slot.indices.is_empty() {
                return Err(CircuitError::InvalidLayout(format!(
                    "input `{}` occupies no witness index",
                    slot.name
                )));
            }
            if !slot.is_array && slot.indices.len() != 1 {
                return Err(CircuitError::InvalidLayout(format!(
                    "scalar input `{}` occupies {} witness indices",
                    slot.name,
                    slot.indices.len()
                )));
            }
            for &index in &slot.indices {
                if index == 0 {
                    return Err(CircuitError::InvalidLayout(format!(
                        "input `{}` uses witness index 0; indices start at 1",
                        slot.name
                    )));
                }
                if !seen.insert(index) {
                    return Err(CircuitError::InvalidLayout(format!(
                        "witness index {} assigned twice (input `{}`)",
                        index, slot.name
                    )));
                }
            }
        }

        Ok(Self { slots })
    }

    /// Layout for callers that address witness indices directly
    ///
    /// Each key must be a decimal witness index (`"1"`, `"2"`, ...) and
    /// becomes a private scalar slot named after itself.
    pub fn positional<'a>(keys: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut slots = Vec::new();
        for key in keys {
            let index: u32 = key.parse().map_err(|_| {
                CircuitError::InvalidLayout(format!(
                    "input `{}` is not a witness index and no circuit manifest is loaded",
                    key
                ))
            })?;
            slots.push(InputSlot {
                name: key.to_string(),
                indices: vec![index],
                visibility: Visibility::Private,
                is_array: false,
            });
        }
        slots.sort_by_key(|slot| slot.indices[0]);
        Self::from_slots(slots)
    }

    /// All slots in declaration order
    pub fn slots(&self) -> &[InputSlot] {
        &self.slots
    }

    /// Look up a slot by input name
    pub fn slot(&self, name: &str) -> Option<&InputSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Number of declared inputs
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the circuit takes no inputs
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every witness index a caller must supply
    pub fn required_indices(&self) -> BTreeSet<u32> {
        self.slots
            .iter()
            .flat_map(|slot| slot.indices.iter().copied())
            .collect()
    }

    /// Number of public field elements among the inputs
    pub fn public_input_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.visibility == Visibility::Public)
            .map(InputSlot::width)
            .sum()
    }
}

/// Incremental construction of a [`CircuitLayout`]
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    slots: Vec<InputSlot>,
}

impl LayoutBuilder {
    /// Private scalar input at `index`
    pub fn field(self, name: &str, index: u32) -> Self {
        self.scalar(name, index, Visibility::Private)
    }

    /// Public scalar input at `index`
    pub fn public_field(self, name: &str, index: u32) -> Self {
        self.scalar(name, index, Visibility::Public)
    }

    /// Private array input over `indices`
    pub fn array(self, name: &str, indices: impl IntoIterator<Item = u32>) -> Self {
        self.vector(name, indices, Visibility::Private)
    }

    /// Public array input over `indices`
    pub fn public_array(self, name: &str, indices: impl IntoIterator<Item = u32>) -> Self {
        self.vector(name, indices, Visibility::Public)
    }

    /// Validate and finish
    pub fn build(self) -> Result<CircuitLayout> {
        CircuitLayout::from_slots(self.slots)
    }

    fn scalar(mut self, name: &str, index: u32, visibility: Visibility) -> Self {
        self.slots.push(InputSlot {
            name: name.to_string(),
            indices: vec![index],
            visibility,
            is_array: false,
        });
        self
    }

    fn vector(
        mut self,
        name: &str,
        indices: impl IntoIterator<Item = u32>,
        visibility: Visibility,
    ) -> Self {
        self.slots.push(InputSlot {
            name: name.to_string(),
            indices: indices.into_iter().collect(),
            visibility,
            is_array: true,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let layout = CircuitLayout::builder()
            .field("a", 1)
            .field("b", 2)
            .public_field("result", 3)
            .build()
            .unwrap();

        let names: Vec<_> = layout.slots().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "result"]);
        assert_eq!(layout.required_indices().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(layout.public_input_count(), 1);
    }

    #[test]
    fn test_sparse_indices_are_allowed() {
        let layout = CircuitLayout::builder()
            .field("x", 4)
            .public_array("ys", [9, 10, 11])
            .build()
            .unwrap();

        assert_eq!(layout.slot("ys").unwrap().width(), 3);
        assert_eq!(layout.public_input_count(), 3);
        assert!(layout.slot("z").is_none());
    }

    #[test]
    fn test_rejects_index_zero() {
        let result = CircuitLayout::builder().field("a", 0).build();
        assert!(matches!(result, Err(CircuitError::InvalidLayout(_))));
    }

    #[test]
    fn test_rejects_shared_index() {
        let result = CircuitLayout::builder().field("a", 1).array("b", [2, 1]).build();
        let err = result.unwrap_err().to_string();
        assert!(err.contains("witness index 1 assigned twice"), "{}", err);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = CircuitLayout::builder().field("a", 1).field("a", 2).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_array_slot() {
        let result = CircuitLayout::builder().array("a", []).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_positional_layout_from_index_keys() {
        let layout = CircuitLayout::positional(["3", "1", "2"]).unwrap();

        let indices: Vec<_> = layout.slots().iter().map(|s| s.indices[0]).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(layout.slot("3").unwrap().indices, vec![3]);
    }

    #[test]
    fn test_positional_layout_rejects_names() {
        let err = CircuitLayout::positional(["1", "a"]).unwrap_err();
        assert!(err.to_string().contains("no circuit manifest is loaded"));
    }
}
