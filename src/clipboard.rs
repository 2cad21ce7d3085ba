//! Copy and paste of node groups.
//!
//! Copied nodes are stored as detached duplicates together with their offset
//! from the top-left corner of the copied group, so a paste reproduces the
//! group's layout wherever it lands. Links are never carried over.

use log::debug;

use crate::graph::Graph;
use crate::grid::snap_down;
use crate::id::NodeId;
use crate::node::Node;
use crate::selection::SelectionManager;

#[derive(Debug, Clone)]
struct ClipboardEntry {
    node: Node,
    offset: (f32, f32),
}

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entries: Vec<ClipboardEntry>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the selected nodes whose kind allows editing.
    ///
    /// Returns how many nodes were copied. When nothing copyable is selected
    /// the previous clipboard contents are kept.
    pub fn copy(&mut self, graph: &Graph, selection: &SelectionManager) -> usize {
        let nodes: Vec<&Node> = selection
            .iter()
            .filter_map(|id| graph.node(id))
            .filter(|node| node.kind().can_edit_node())
            .collect();
        if nodes.is_empty() {
            return 0;
        }

        let min_x = nodes.iter().map(|n| n.position().0).fold(f32::INFINITY, f32::min);
        let min_y = nodes.iter().map(|n| n.position().1).fold(f32::INFINITY, f32::min);

        self.entries = nodes
            .into_iter()
            .map(|node| {
                let (x, y) = node.position();
                ClipboardEntry {
                    node: node.duplicate(),
                    offset: (x - min_x, y - min_y),
                }
            })
            .collect();
        debug!("copied {} node(s)", self.entries.len());
        self.entries.len()
    }

    /// Add a fresh copy of every clipboard node to `graph`, with the group's
    /// top-left corner at `(x, y)`.
    ///
    /// With `snap` set, each node's position is floored to that pitch.
    /// Returns the IDs of the new nodes in clipboard order.
    pub fn paste(&self, graph: &mut Graph, x: f32, y: f32, snap: Option<f32>) -> Vec<NodeId> {
        self.entries
            .iter()
            .map(|entry| {
                let mut node = entry.node.duplicate();
                let (mut nx, mut ny) = (x + entry.offset.0, y + entry.offset.1);
                if let Some(pitch) = snap {
                    nx = snap_down(nx, pitch);
                    ny = snap_down(ny, pitch);
                }
                node.set_position(nx, ny);
                graph.add_node(node)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
