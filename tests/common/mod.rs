//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use ned_editor::{ConnectionId, Editor, EditorConfig, Graph, Node, NodeId, NodeKind, WidthStrategy};

/// Width every node gets from [`fixed_width`].
pub const NODE_WIDTH: f32 = 100.0;

/// A width strategy that ignores labels, so geometry is easy to predict.
pub fn fixed_width() -> Rc<dyn WidthStrategy> {
    Rc::new(|_: &Node| NODE_WIDTH)
}

pub fn graph() -> Graph {
    Graph::new(fixed_width())
}

/// Editor seeded with Start at (50, 50) and End at (300, 100).
pub fn editor() -> Editor {
    Editor::new(EditorConfig::default(), fixed_width())
}

pub fn empty_editor() -> Editor {
    Editor::empty(EditorConfig::default(), fixed_width())
}

pub fn output(graph: &Graph, node: NodeId, index: usize) -> ConnectionId {
    graph.node(node).unwrap().outputs()[index].id()
}

pub fn input(graph: &Graph, node: NodeId) -> ConnectionId {
    graph.node(node).unwrap().input().unwrap().id()
}

/// Canvas-space centre of a connector.
pub fn center(graph: &Graph, connection: ConnectionId) -> (f32, f32) {
    let owner = graph.owner_of(connection).unwrap();
    graph.connection(connection).unwrap().bounds(owner).center()
}

/// A Start node linked to an NPC line, which is linked to an End node.
pub struct Dialogue {
    pub graph: Graph,
    pub start: NodeId,
    pub npc: NodeId,
    pub end: NodeId,
}

pub fn dialogue() -> Dialogue {
    let mut graph = graph();
    let start = graph.create_node(NodeKind::Start, 0.0, 0.0);
    let npc = graph.create_node(NodeKind::NpcDialogue, 200.0, 0.0);
    let end = graph.create_node(NodeKind::End, 400.0, 0.0);
    assert!(graph.connect(output(&graph, start, 0), input(&graph, npc)));
    assert!(graph.connect(output(&graph, npc, 0), input(&graph, end)));
    Dialogue { graph, start, npc, end }
}

/// Linked `(output owner, input owner)` pairs by node ID, in graph order.
pub fn linked_nodes(graph: &Graph) -> Vec<(NodeId, NodeId)> {
    graph
        .link_pairs()
        .map(|(output, input)| (output.owner(), input.owner()))
        .collect()
}
