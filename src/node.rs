//! Nodes: positioned entities of a fixed kind owning their connectors.

use std::hash::{Hash, Hasher};

use crate::connection::{Connection, Side};
use crate::hit_test::{NodeGeometry, Rectangle, Shape};
use crate::id::{ConnectionId, NodeId};
use crate::kind::NodeKind;

/// Height of the title bar above the first connector row.
pub const HEADER_HEIGHT: f32 = 20.0;
/// Vertical distance between connector rows.
pub const ROW_PITCH: f32 = 20.0;
/// Hit radius of a connector.
pub const CONNECTOR_RADIUS: f32 = 6.0;

/// Measures how wide a node must be to fit its labels.
///
/// The rendering layer implements this with its real font metrics; the core
/// only calls it after any edit that may change a label or the connector list.
pub trait WidthStrategy {
    fn node_width(&self, node: &Node) -> f32;
}

impl<F> WidthStrategy for F
where
    F: Fn(&Node) -> f32,
{
    fn node_width(&self, node: &Node) -> f32 {
        self(node)
    }
}

/// Width from monospace label lengths, rounded up to the grid pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelWidth {
    /// Advance of one character in canvas units
    pub char_width: f32,
    /// Space reserved around the widest label for the connector dots
    pub padding: f32,
    pub min_width: f32,
    /// Result is rounded up to a multiple of this; zero disables rounding
    pub pitch: f32,
}

impl Default for LabelWidth {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            padding: 40.0,
            min_width: 120.0,
            pitch: 10.0,
        }
    }
}

impl LabelWidth {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

impl WidthStrategy for LabelWidth {
    fn node_width(&self, node: &Node) -> f32 {
        let widest = std::iter::once(node.name())
            .chain(node.connections().map(Connection::text))
            .map(|text| self.measure(text) + self.padding)
            .fold(self.min_width, f32::max);

        if self.pitch > 0.0 {
            (widest / self.pitch).ceil() * self.pitch
        } else {
            widest
        }
    }
}

/// A placed dialogue node.
///
/// Identity is the [`NodeId`]; two nodes with identical content but
/// different IDs are different nodes.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    x: f32,
    y: f32,
    layer: f32,
    kind: NodeKind,
    name: String,
    input: Option<Connection>,
    outputs: Vec<Connection>,
    width: f32,
}

impl Node {
    /// Create a node with the kind's initial connector layout.
    pub fn new(kind: NodeKind, x: f32, y: f32, width: &dyn WidthStrategy) -> Self {
        let id = NodeId::new();
        let layout = kind.layout();
        let input = layout
            .input
            .map(|spec| Connection::new(id, Side::Input, 0, spec.text, spec.editable_label));
        let outputs = layout
            .outputs
            .iter()
            .enumerate()
            .map(|(i, spec)| Connection::new(id, Side::Output, i, spec.text, spec.editable_label))
            .collect();

        let mut node = Self {
            id,
            x,
            y,
            layer: 0.0,
            kind,
            name: kind.name().to_string(),
            input,
            outputs,
            width: 0.0,
        };
        node.recalculate_width(width);
        node
    }

    /// Rebuild a node from saved parts. Connector indices are renumbered from
    /// list order; the returned flag says whether any stored index disagreed.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: NodeId,
        kind: NodeKind,
        name: String,
        x: f32,
        y: f32,
        layer: f32,
        input: Option<Connection>,
        outputs: Vec<Connection>,
        width: &dyn WidthStrategy,
    ) -> (Self, bool) {
        let mut node = Self {
            id,
            x,
            y,
            layer,
            kind,
            name,
            input,
            outputs,
            width: 0.0,
        };
        let renumbered = node.renumber();
        node.recalculate_width(width);
        (node, renumbered)
    }

    /// Deep copy under a fresh identity.
    ///
    /// Every connector gets a new ID too. Links are not part of a node, so the
    /// copy starts out unwired.
    pub fn duplicate(&self) -> Node {
        let id = NodeId::new();
        Node {
            id,
            x: self.x,
            y: self.y,
            layer: self.layer,
            kind: self.kind,
            name: self.name.clone(),
            input: self.input.as_ref().map(|c| c.duplicate_for(id)),
            outputs: self.outputs.iter().map(|c| c.duplicate_for(id)).collect(),
            width: self.width,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn layer(&self) -> f32 {
        self.layer
    }

    pub(crate) fn set_layer(&mut self, layer: f32) {
        self.layer = layer;
    }

    pub fn input(&self) -> Option<&Connection> {
        self.input.as_ref()
    }

    pub fn outputs(&self) -> &[Connection] {
        &self.outputs
    }

    /// Input first, then outputs in order. This is also the picking order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.input.iter().chain(self.outputs.iter())
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections().find(|c| c.id == id)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        (self.outputs.len().max(1) as f32 + 1.0) * ROW_PITCH + HEADER_HEIGHT
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.width, self.height())
    }

    pub fn pick(&self, x: f32, y: f32) -> bool {
        self.bounds().pick(x, y)
    }

    /// Append an output. Returns `None` when the kind's connectors are fixed.
    pub fn add_output(&mut self, text: &str, width: &dyn WidthStrategy) -> Option<ConnectionId> {
        if !self.kind.can_edit_connectors() {
            return None;
        }
        let connection = Connection::new(self.id, Side::Output, self.outputs.len(), text, true);
        let id = connection.id;
        self.outputs.push(connection);
        self.renumber();
        self.recalculate_width(width);
        Some(id)
    }

    /// Remove an output. Returns the removed connector, or `None` when the
    /// kind's connectors are fixed or `id` is not one of this node's outputs.
    pub fn remove_output(&mut self, id: ConnectionId, width: &dyn WidthStrategy) -> Option<Connection> {
        if !self.kind.can_edit_connectors() {
            return None;
        }
        let position = self.outputs.iter().position(|c| c.id == id)?;
        let removed = self.outputs.remove(position);
        self.renumber();
        self.recalculate_width(width);
        Some(removed)
    }

    /// Change a connector label. Refused for labels marked non-editable.
    pub fn set_connection_text(&mut self, id: ConnectionId, text: &str, width: &dyn WidthStrategy) -> bool {
        let connection = self
            .input
            .iter_mut()
            .chain(self.outputs.iter_mut())
            .find(|c| c.id == id);
        match connection {
            Some(c) if c.editable_label => {
                c.text = text.to_string();
                self.recalculate_width(width);
                true
            }
            _ => false,
        }
    }

    pub fn recalculate_width(&mut self, width: &dyn WidthStrategy) {
        self.width = width.node_width(self);
    }

    /// Restore `outputs[i].index == i`. Returns whether anything changed.
    fn renumber(&mut self) -> bool {
        let mut changed = false;
        if let Some(input) = self.input.as_mut() {
            changed |= input.index != 0;
            input.index = 0;
        }
        for (i, output) in self.outputs.iter_mut().enumerate() {
            changed |= output.index != i;
            output.index = i;
        }
        changed
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl NodeGeometry for &Node {
    type Id = NodeId;

    fn id(&self) -> NodeId {
        self.id
    }

    fn bounds(&self) -> Rectangle {
        Node::bounds(self)
    }
}
