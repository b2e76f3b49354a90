//! Node selection of the graph editor, keyed by renderer slot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Coarse selection state exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    /// Nothing is toggled.
    NoneSelected,
    /// At least one node is toggled.
    SomeSelected,
}

/// Emitted when a node becomes selected. Deselection emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSelected {
    /// Renderer slot index that was clicked.
    pub slot: usize,
    /// Node identifier carried by the click.
    pub node: NodeId,
}

/// Currently toggled nodes, keyed by renderer slot index.
///
/// Iteration is in ascending slot order, which is also the order in which a
/// delete batch is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    slots: BTreeMap<usize, NodeId>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles a slot: deselects it if present, otherwise selects it.
    pub fn toggle(&mut self, slot: usize, node: NodeId) -> Option<NodeSelected> {
        if self.slots.remove(&slot).is_some() {
            return None;
        }

        self.slots.insert(slot, node);
        Some(NodeSelected { slot, node })
    }

    /// Empties the selection unconditionally.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Returns the coarse selection state.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        if self.slots.is_empty() {
            SelectionState::NoneSelected
        } else {
            SelectionState::SomeSelected
        }
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of selected slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the given node is selected under any slot.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.slots.values().any(|selected| *selected == node)
    }

    /// Iterates selected `(slot, node)` pairs in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.slots.iter().map(|(slot, node)| (*slot, *node))
    }
}
