//! JSON snapshot of a graph.
//!
//! The document is an array of node records. Cross references (a connector's
//! parent node, an output's linked input) are stored as IDs, so a record may
//! point at a node or connector that appears later in the file. Loading
//! therefore runs in passes:
//!
//! 1. index every node and connector ID in the document,
//! 2. build nodes and connectors, resolving parent IDs against the index,
//! 3. resolve links once every connector exists.
//!
//! Any ID that does not resolve aborts the load; a partially built graph is
//! never returned.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::connection::{Connection, Side};
use crate::error::{NedError, Result};
use crate::graph::Graph;
use crate::id::{ConnectionId, NodeId};
use crate::kind::NodeKind;
use crate::node::{Node, WidthStrategy};

/// On-disk form of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SavedNode {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub layer: f32,
    pub name: String,
    /// Kind name, see [`NodeKind::name`]
    pub node_function: String,
    pub input: Option<SavedConnection>,
    #[serde(default)]
    pub outputs: Vec<SavedConnection>,
}

/// On-disk form of a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SavedConnection {
    pub id: Uuid,
    pub side: Side,
    pub connection_index: usize,
    pub text: String,
    pub parent_node: Uuid,
    /// For outputs, the ID of the linked input connector
    pub connected_node: Option<Uuid>,
    #[serde(default = "default_true")]
    pub can_edit_name: bool,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Saving
// ============================================================================

/// Snapshot `graph` as records, in graph order.
pub fn to_records(graph: &Graph) -> Vec<SavedNode> {
    graph
        .nodes()
        .map(|node| {
            let (x, y) = node.position();
            SavedNode {
                id: node.id().0,
                x,
                y,
                layer: node.layer(),
                name: node.name().to_string(),
                node_function: node.kind().name().to_string(),
                input: node.input().map(|c| save_connection(graph, c)),
                outputs: node.outputs().iter().map(|c| save_connection(graph, c)).collect(),
            }
        })
        .collect()
}

fn save_connection(graph: &Graph, connection: &Connection) -> SavedConnection {
    SavedConnection {
        id: connection.id().0,
        side: connection.side(),
        connection_index: connection.index(),
        text: connection.text().to_string(),
        parent_node: connection.owner().0,
        connected_node: graph.links().target(connection.id()).map(|id| id.0),
        can_edit_name: connection.editable_label(),
    }
}

pub fn to_json_string(graph: &Graph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_records(graph))?)
}

// ============================================================================
// Loading
// ============================================================================

pub fn from_json_str(json: &str, width: Rc<dyn WidthStrategy>) -> Result<Graph> {
    let records: Vec<SavedNode> = serde_json::from_str(json)?;
    from_records(records, width)
}

/// Rebuild a graph from records.
pub fn from_records(records: Vec<SavedNode>, width: Rc<dyn WidthStrategy>) -> Result<Graph> {
    // Pass 1: every ID in the document.
    let mut node_ids = HashSet::new();
    let mut connection_ids = HashSet::new();
    for record in &records {
        if !node_ids.insert(record.id) {
            return Err(NedError::DuplicateId { id: record.id });
        }
        for connection in record.input.iter().chain(&record.outputs) {
            if !connection_ids.insert(connection.id) {
                return Err(NedError::DuplicateId { id: connection.id });
            }
        }
    }

    // Pass 2: nodes and connectors; links are only collected.
    let mut graph = Graph::new(width.clone());
    let mut pending: HashMap<Uuid, Uuid> = HashMap::new();
    let mut renumbered = 0;
    for record in records {
        let kind = NodeKind::lookup(&record.node_function).ok_or_else(|| NedError::UnknownKind {
            name: record.node_function.clone(),
        })?;
        let owner = NodeId(record.id);

        let input = match record.input {
            Some(saved) => {
                let (connection, link) = restore_connection(saved, owner, Side::Input, &node_ids)?;
                if let Some(target) = link {
                    if !connection_ids.contains(&target) {
                        return Err(NedError::UnknownConnection { id: target });
                    }
                    warn!("ignoring link stored on input {}", connection.id());
                }
                Some(connection)
            }
            None => None,
        };

        let mut outputs = Vec::with_capacity(record.outputs.len());
        for saved in record.outputs {
            let (connection, link) = restore_connection(saved, owner, Side::Output, &node_ids)?;
            if let Some(target) = link {
                pending.insert(connection.id().0, target);
            }
            outputs.push(connection);
        }

        let (node, changed) = Node::restore(
            owner,
            kind,
            record.name,
            record.x,
            record.y,
            record.layer,
            input,
            outputs,
            &*width,
        );
        if changed {
            renumbered += 1;
        }
        graph.add_node(node);
    }

    // Pass 3: links.
    for (output, target) in pending {
        if !connection_ids.contains(&target) {
            return Err(NedError::UnknownConnection { id: target });
        }
        if !graph.connect(ConnectionId(output), ConnectionId(target)) {
            return Err(NedError::InvalidLink { id: output });
        }
    }

    if renumbered > 0 {
        warn!("renumbered connectors on {renumbered} node(s) whose stored indices were out of order");
    }
    Ok(graph)
}

fn restore_connection(
    saved: SavedConnection,
    owner: NodeId,
    slot: Side,
    node_ids: &HashSet<Uuid>,
) -> Result<(Connection, Option<Uuid>)> {
    if saved.side != slot {
        return Err(NedError::SideMismatch { id: saved.id });
    }
    if !node_ids.contains(&saved.parent_node) {
        return Err(NedError::UnknownNode { id: saved.parent_node });
    }
    if saved.parent_node != owner.0 {
        return Err(NedError::OwnerMismatch { id: saved.id });
    }
    let connection = Connection::restore(
        ConnectionId(saved.id),
        owner,
        saved.side,
        saved.connection_index,
        saved.text,
        saved.can_edit_name,
    );
    Ok((connection, saved.connected_node))
}

// ============================================================================
// Files
// ============================================================================

impl Graph {
    /// Write the graph as a JSON document.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, to_json_string(self)?)?;
        info!("saved {} node(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a JSON document written by [`Graph::save`].
    pub fn load(path: impl AsRef<Path>, width: Rc<dyn WidthStrategy>) -> Result<Graph> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let graph = from_json_str(&text, width)?;
        info!(
            "loaded {} node(s) and {} link(s) from {}",
            graph.len(),
            graph.links().len(),
            path.display()
        );
        Ok(graph)
    }
}
