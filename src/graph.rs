use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use log::debug;

use crate::connection::{Connection, Side};
use crate::hit_test::{find_first_at, nodes_in_selection_box, Rectangle};
use crate::id::{ConnectionId, NodeId};
use crate::kind::NodeKind;
use crate::links::LinkTable;
use crate::node::{LabelWidth, Node, WidthStrategy};

/// The ordered collection of nodes plus the links between their connectors.
///
/// Node order matters only for picking ties (first node wins) and for the
/// order records are written in when saving.
///
/// All mutation goes through the graph so that the connection→owner index and
/// the link table stay consistent with the nodes.
#[derive(Clone)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    owners: HashMap<ConnectionId, NodeId>,
    links: LinkTable,
    width: Rc<dyn WidthStrategy>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(Rc::new(LabelWidth::default()))
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

impl Graph {
    /// Create an empty graph measuring node widths with `width`.
    pub fn new(width: Rc<dyn WidthStrategy>) -> Self {
        Self {
            nodes: IndexMap::new(),
            owners: HashMap::new(),
            links: LinkTable::new(),
            width,
        }
    }

    pub fn width_strategy(&self) -> Rc<dyn WidthStrategy> {
        self.width.clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in graph order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        let owner = self.owners.get(&id)?;
        self.nodes.get(owner)?.connection(id)
    }

    /// The node a connection belongs to.
    pub fn owner_of(&self, id: ConnectionId) -> Option<&Node> {
        self.nodes.get(self.owners.get(&id)?)
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    // === Node lifecycle ===

    /// Create a node of `kind` at `(x, y)` and append it.
    pub fn create_node(&mut self, kind: NodeKind, x: f32, y: f32) -> NodeId {
        let node = Node::new(kind, x, y, &*self.width);
        self.add_node(node)
    }

    /// Append an existing node. The node's width is re-measured with this
    /// graph's strategy.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        node.recalculate_width(&*self.width);
        let id = node.id();
        for connection in node.connections() {
            self.owners.insert(connection.id(), id);
        }
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node, first clearing every link that touches it.
    ///
    /// This covers the node's own outputs, its input, and any other node's
    /// output that targets its input, so no link in the graph is left pointing
    /// at a connector that no longer exists.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let connections: Vec<ConnectionId> = self.nodes.get(&id)?.connections().map(Connection::id).collect();
        for connection in &connections {
            self.clear_connections_from(*connection);
            self.owners.remove(connection);
        }
        debug!("removed node {id}");
        self.nodes.shift_remove(&id)
    }

    pub fn move_node(&mut self, id: NodeId, x: f32, y: f32) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.set_position(x, y);
                true
            }
            None => false,
        }
    }

    /// Set the draw depth of a node.
    pub fn set_layer(&mut self, id: NodeId, layer: f32) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.set_layer(layer);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.owners.clear();
        self.links.clear();
    }

    // === Connector editing ===

    /// Append an output to a node whose kind allows it.
    pub fn add_output(&mut self, node: NodeId, text: &str) -> Option<ConnectionId> {
        let width = self.width.clone();
        let id = self.nodes.get_mut(&node)?.add_output(text, &*width)?;
        self.owners.insert(id, node);
        Some(id)
    }

    /// Remove an output (and its link) from a node whose kind allows it.
    pub fn remove_output(&mut self, output: ConnectionId) -> bool {
        let Some(&owner) = self.owners.get(&output) else {
            return false;
        };
        let width = self.width.clone();
        let Some(node) = self.nodes.get_mut(&owner) else {
            return false;
        };
        if node.remove_output(output, &*width).is_none() {
            debug!("refused to remove output {output} from {}", node.kind());
            return false;
        }
        self.links.unlink_output(output);
        self.owners.remove(&output);
        true
    }

    /// Change a connector label, if that label is editable.
    pub fn set_connection_text(&mut self, connection: ConnectionId, text: &str) -> bool {
        let Some(&owner) = self.owners.get(&connection) else {
            return false;
        };
        let width = self.width.clone();
        match self.nodes.get_mut(&owner) {
            Some(node) => node.set_connection_text(connection, text, &*width),
            None => false,
        }
    }

    // === Linking ===

    /// Check whether two connections may be linked.
    pub fn validate_link(&self, a: ConnectionId, b: ConnectionId) -> ValidationResult {
        if a == b {
            return ValidationResult::Invalid(ValidationError::SameConnection);
        }
        let Some(first) = self.connection(a) else {
            return ValidationResult::Invalid(ValidationError::ConnectionNotFound(a));
        };
        let Some(second) = self.connection(b) else {
            return ValidationResult::Invalid(ValidationError::ConnectionNotFound(b));
        };
        if first.side() == second.side() {
            return ValidationResult::Invalid(ValidationError::SameSide);
        }
        if first.owner() == second.owner() {
            return ValidationResult::Invalid(ValidationError::SameNode);
        }
        ValidationResult::Valid
    }

    /// Link two connections, whichever of the pair is the output.
    ///
    /// The link is always stored on the output end, so `connect(a, b)` and
    /// `connect(b, a)` have the same effect. Invalid pairs are ignored.
    /// Returns whether a link was made.
    pub fn connect(&mut self, a: ConnectionId, b: ConnectionId) -> bool {
        if let ValidationResult::Invalid(reason) = self.validate_link(a, b) {
            debug!("ignored link {a} -> {b}: {reason}");
            return false;
        }
        let (output, input) = match self.connection(a).map(Connection::side) {
            Some(Side::Output) => (a, b),
            _ => (b, a),
        };
        self.links.link(output, input);
        debug!("linked {output} -> {input}");
        true
    }

    /// Drop the link held by an output. Inputs hold nothing, so this is a
    /// no-op for them; use [`Graph::clear_connections_from`] to detach an input.
    pub fn release_link(&mut self, connection: ConnectionId) {
        if self.connection(connection).map(Connection::side) == Some(Side::Output) {
            self.links.unlink_output(connection);
        }
    }

    /// Remove every link touching `connection`.
    ///
    /// For an output this clears its own target. For an input it clears every
    /// output in the graph that targets it.
    pub fn clear_connections_from(&mut self, connection: ConnectionId) {
        match self.connection(connection).map(Connection::side) {
            Some(Side::Output) => {
                self.links.unlink_output(connection);
            }
            Some(Side::Input) => {
                let cleared = self.links.unlink_input(connection);
                if !cleared.is_empty() {
                    debug!("cleared {} link(s) into {connection}", cleared.len());
                }
            }
            None => {}
        }
    }

    /// The input an output is linked to.
    pub fn target(&self, output: ConnectionId) -> Option<&Connection> {
        self.connection(self.links.target(output)?)
    }

    /// Every output linked to an input. Order is unspecified.
    pub fn sources(&self, input: ConnectionId) -> impl Iterator<Item = &Connection> + '_ {
        self.links.sources(input).filter_map(move |id| self.connection(id))
    }

    /// All links as `(output, input)` pairs, in graph and output order.
    pub fn link_pairs(&self) -> impl Iterator<Item = (&Connection, &Connection)> + '_ {
        self.nodes
            .values()
            .flat_map(|node| node.outputs().iter())
            .filter_map(move |output| Some((output, self.target(output.id())?)))
    }

    // === Picking ===

    /// First node in graph order whose bounds contain the point.
    pub fn pick_node(&self, x: f32, y: f32) -> Option<NodeId> {
        find_first_at(x, y, self.nodes.values(), |node| node.bounds()).map(Node::id)
    }

    /// First connection under the point that passes `filter`.
    ///
    /// Nodes are scanned in graph order; within a node the input is tested
    /// before the outputs.
    pub fn pick_connection<F>(&self, x: f32, y: f32, filter: F) -> Option<ConnectionId>
    where
        F: Fn(&Connection) -> bool,
    {
        self.nodes.values().find_map(|node| {
            let hits = node.connections().filter(|c| filter(*c));
            find_first_at(x, y, hits, |c| c.bounds(node)).map(Connection::id)
        })
    }

    /// Nodes whose bounds intersect `rect`, in graph order.
    pub fn nodes_in_rect(&self, rect: &Rectangle) -> Vec<NodeId> {
        nodes_in_selection_box(rect, self.nodes.values())
    }
}

// ============================================================================
// Link Validation
// ============================================================================

/// Result of link validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Link is valid
    Valid,
    /// Link is invalid with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Reasons why two connections cannot be linked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Connection is not part of this graph
    ConnectionNotFound(ConnectionId),
    /// Cannot link a connection to itself
    SameConnection,
    /// Both connections are inputs or both are outputs
    SameSide,
    /// Cannot link connections on the same node
    SameNode,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionNotFound(id) => write!(f, "Connection {} not found", id),
            Self::SameConnection => write!(f, "Cannot link connection to itself"),
            Self::SameSide => write!(f, "Must connect input to output"),
            Self::SameNode => write!(f, "Cannot link connections on same node"),
        }
    }
}
