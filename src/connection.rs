//! Connectors attached to one side of a node.
//!
//! A connection never stores its link. Links live in the graph's
//! [`LinkTable`](crate::links::LinkTable), keyed by the output side, so there is
//! exactly one owning record per wire.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::hit_test::Circle;
use crate::id::{ConnectionId, NodeId};
use crate::node::{Node, CONNECTOR_RADIUS, HEADER_HEIGHT, ROW_PITCH};

/// Which edge of its node a connector sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Input,
    Output,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Input => Side::Output,
            Side::Output => Side::Input,
        }
    }
}

/// A connector owned by exactly one node.
#[derive(Debug, Clone)]
pub struct Connection {
    pub(crate) id: ConnectionId,
    pub(crate) side: Side,
    pub(crate) index: usize,
    pub(crate) text: String,
    pub(crate) editable_label: bool,
    pub(crate) owner: NodeId,
}

impl Connection {
    pub(crate) fn new(owner: NodeId, side: Side, index: usize, text: &str, editable_label: bool) -> Self {
        Self {
            id: ConnectionId::new(),
            side,
            index,
            text: text.to_string(),
            editable_label,
            owner,
        }
    }

    /// Rebuild a connection from a saved record, keeping its identity.
    pub(crate) fn restore(
        id: ConnectionId,
        owner: NodeId,
        side: Side,
        index: usize,
        text: String,
        editable_label: bool,
    ) -> Self {
        Self { id, side, index, text, editable_label, owner }
    }

    /// Same side, label and flags under a new identity and owner.
    pub(crate) fn duplicate_for(&self, owner: NodeId) -> Self {
        Self {
            id: ConnectionId::new(),
            side: self.side,
            index: self.index,
            text: self.text.clone(),
            editable_label: self.editable_label,
            owner,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Position among siblings on the same side.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn editable_label(&self) -> bool {
        self.editable_label
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Whether a link between `self` and `other` is structurally allowed:
    /// opposite sides on different nodes.
    pub fn can_link_to(&self, other: &Connection) -> bool {
        self.side != other.side && self.owner != other.owner
    }

    /// Hit region and curve anchor, computed from the owning node's geometry.
    ///
    /// Inputs sit on the node's left edge, outputs on its right edge; both are
    /// stacked one row per index below the header.
    pub fn bounds(&self, owner: &Node) -> Circle {
        debug_assert_eq!(owner.id(), self.owner);
        let (x, y) = owner.position();
        let cy = y + (self.index as f32 + 1.0) * ROW_PITCH + HEADER_HEIGHT;
        let cx = match self.side {
            Side::Input => x,
            Side::Output => x + owner.width(),
        };
        Circle::new(cx, cy, CONNECTOR_RADIUS)
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}

impl Hash for Connection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
