//! # Ned Editor
//!
//! Core of a node-graph editor for branching game dialogue. Writers build a
//! dialogue as a graph of typed nodes (NPC lines, player choices, flag and
//! quest checks) wired output-to-input, save it as JSON and export a compact
//! binary form for the game runtime.
//!
//! ## Model
//!
//! - [`Graph`] - Ordered node set plus the link table; every structural edit goes through it
//! - [`Node`] / [`Connection`] - Nodes with one optional input and ordered outputs
//! - [`NodeKind`] - The fixed kind catalog: initial layout and edit permissions
//! - [`WidthStrategy`] - Pluggable text measurement for node widths
//!
//! ## Editing
//!
//! - [`Editor`] - One open document: graph, selection, clipboard, viewport, pointer state
//! - [`SelectionManager`] - Ordered selection with additive and subtractive marquees
//! - [`Clipboard`] - Copy/paste of nodes without their links
//! - [`Interaction`] - The pointer state machine (link drags, node drags, marquee)
//! - [`Viewport`] - Zoom and pan
//!
//! ## Persistence
//!
//! - [`Graph::save`] / [`Graph::load`] - JSON documents
//! - [`export()`] - Binary `NEDX` export
//! - [`EditorConfig`] - JSON settings and keybinds
//!
//! ## Slint
//!
//! [`EditorController`] drives Slint `VecModel`s from an [`Editor`] and hands
//! out callbacks for the window's pointer, wheel and key events.

pub mod error;
pub mod id;
pub mod kind;
pub mod connection;
pub mod node;
pub mod links;
pub mod graph;
pub mod selection;
pub mod clipboard;
pub mod grid;
pub mod path;
pub mod viewport;
pub mod interaction;
pub mod keybinds;
pub mod config;
pub mod save;
pub mod export;
pub mod editor;
pub mod controller;

pub use error::{NedError, Result};
pub use id::{ConnectionId, NodeId};
pub use hit_test::{find_first_at, nodes_in_selection_box, Circle, NodeGeometry, Rectangle, Shape};
pub use kind::{ConnectorLayout, ConnectorSpec, NodeKind};
pub use connection::{Connection, Side};
pub use node::{LabelWidth, Node, WidthStrategy};
pub use links::LinkTable;
pub use graph::{Graph, ValidationError, ValidationResult};
pub use selection::{SelectionManager, SelectionMode};
pub use clipboard::Clipboard;
pub use grid::{snap_down, Grid};
pub use path::LinkCurve;
pub use viewport::Viewport;
pub use interaction::{DragState, Interaction, Modifiers, PointerButton};
pub use keybinds::{default_keybinds, EditorAction, Key, KeyCombo, Keybind};
pub use config::EditorConfig;
pub use save::{SavedConnection, SavedNode};
pub use export::{export, write_export};
pub use editor::Editor;
pub use controller::{kind_color, ConnectorView, EditorController, LinkView, NodeView};
