//! Node selection state.
//!
//! The selection is an insertion-ordered set of node IDs. It does not hold
//! references into the graph, so callers should [`SelectionManager::retain_existing`]
//! after edits that remove nodes.

use indexmap::IndexSet;

use crate::graph::Graph;
use crate::hit_test::Rectangle;
use crate::id::NodeId;

/// How a marquee combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Replace the selection with the nodes under the marquee
    #[default]
    Normal,
    /// Add the nodes under the marquee
    Additive,
    /// Remove the nodes under the marquee
    Subtractive,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: IndexSet<NodeId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single node.
    pub fn select(&mut self, id: NodeId) {
        self.selected.clear();
        self.selected.insert(id);
    }

    /// Combine the nodes intersecting `rect` with the current selection.
    pub fn select_in_rect(&mut self, graph: &Graph, rect: &Rectangle, mode: SelectionMode) {
        let hits = graph.nodes_in_rect(rect);
        self.apply(hits, mode);
    }

    /// Combine `ids` with the current selection according to `mode`.
    pub fn apply<I>(&mut self, ids: I, mode: SelectionMode)
    where
        I: IntoIterator<Item = NodeId>,
    {
        match mode {
            SelectionMode::Normal => self.replace_selection(ids),
            SelectionMode::Additive => self.selected.extend(ids),
            SelectionMode::Subtractive => {
                for id in ids {
                    self.selected.shift_remove(&id);
                }
            }
        }
    }

    /// Replace the current selection with a new set of IDs
    pub fn replace_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.selected.clear();
        self.selected.extend(ids);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn remove(&mut self, id: NodeId) -> bool {
        self.selected.shift_remove(&id)
    }

    /// Drop IDs of nodes that are no longer in `graph`.
    pub fn retain_existing(&mut self, graph: &Graph) {
        self.selected.retain(|id| graph.contains(*id));
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected IDs in the order they were selected.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
