//! The editing session.
//!
//! [`Editor`] owns everything one open document needs: the graph, the
//! selection, the clipboard, the pointer state machine, the viewport and the
//! document path. Hosts feed it screen-space input and read state back for
//! drawing.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info};

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::error::{NedError, Result};
use crate::export;
use crate::graph::Graph;
use crate::id::{ConnectionId, NodeId};
use crate::interaction::{Interaction, Modifiers, PointerButton};
use crate::keybinds::{self, EditorAction, KeyCombo};
use crate::kind::NodeKind;
use crate::node::WidthStrategy;
use crate::selection::SelectionManager;
use crate::viewport::Viewport;

pub struct Editor {
    config: EditorConfig,
    graph: Graph,
    selection: SelectionManager,
    clipboard: Clipboard,
    interaction: Interaction,
    viewport: Viewport,
    document: Option<PathBuf>,
    screen_pointer: (f32, f32),
}

impl Editor {
    /// A new document holding a Start node at (50, 50) and an End node at
    /// (300, 100).
    pub fn new(config: EditorConfig, width: Rc<dyn WidthStrategy>) -> Self {
        let mut editor = Self::empty(config, width);
        editor.seed_document();
        editor
    }

    /// A new document with no nodes at all.
    pub fn empty(config: EditorConfig, width: Rc<dyn WidthStrategy>) -> Self {
        let viewport = Viewport::new(config.min_zoom, config.max_zoom);
        Self {
            config,
            graph: Graph::new(width),
            selection: SelectionManager::new(),
            clipboard: Clipboard::new(),
            interaction: Interaction::new(),
            viewport,
            document: None,
            screen_pointer: (0.0, 0.0),
        }
    }

    fn seed_document(&mut self) {
        self.graph.create_node(NodeKind::Start, 50.0, 50.0);
        self.graph.create_node(NodeKind::End, 300.0, 100.0);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
    }

    // === Document ===

    /// Path of the current document, if it was opened or saved.
    pub fn document_path(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    /// File name of the current document for window titles.
    pub fn file_name(&self) -> Option<String> {
        self.document
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Drop the current document and start over with the seed nodes.
    pub fn new_document(&mut self) {
        let width = self.graph.width_strategy();
        self.replace_graph(Graph::new(width));
        self.seed_document();
        self.document = None;
    }

    /// Load a document and make it current. On error the open document is
    /// left untouched.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let graph = Graph::load(path, self.graph.width_strategy())?;
        self.replace_graph(graph);
        self.document = Some(path.to_path_buf());
        Ok(())
    }

    /// Save to the current document path.
    pub fn save(&self) -> Result<()> {
        let path = self.document.as_ref().ok_or(NedError::NoDocumentPath)?;
        self.graph.save(path)
    }

    /// Save to `path` and make it the current document path.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.graph.save(path)?;
        self.document = Some(path.to_path_buf());
        Ok(())
    }

    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        export::export(&self.graph, path)
    }

    fn replace_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.selection.clear();
        self.interaction.cancel();
        info!("document now has {} node(s)", self.graph.len());
    }

    // === Editing ===

    /// Create a node and make it the selection.
    pub fn add_node(&mut self, kind: NodeKind, x: f32, y: f32) -> NodeId {
        let id = self.graph.create_node(kind, x, y);
        self.selection.select(id);
        id
    }

    /// Remove one node, honouring its kind's edit permission.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let editable = self.graph.node(id).is_some_and(|n| n.kind().can_edit_node());
        if !editable {
            debug!("refused to remove node {id}");
            return false;
        }
        self.graph.remove_node(id);
        self.selection.remove(id);
        true
    }

    pub fn add_output(&mut self, node: NodeId, text: &str) -> Option<ConnectionId> {
        self.graph.add_output(node, text)
    }

    pub fn remove_output(&mut self, output: ConnectionId) -> bool {
        self.graph.remove_output(output)
    }

    pub fn set_connection_text(&mut self, connection: ConnectionId, text: &str) -> bool {
        self.graph.set_connection_text(connection, text)
    }

    pub fn set_layer(&mut self, id: NodeId, layer: f32) -> bool {
        self.graph.set_layer(id, layer)
    }

    pub fn connect(&mut self, a: ConnectionId, b: ConnectionId) -> bool {
        self.graph.connect(a, b)
    }

    pub fn clear_connections_from(&mut self, connection: ConnectionId) {
        self.graph.clear_connections_from(connection);
    }

    /// Remove every selected node whose kind allows it. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let doomed: Vec<NodeId> = self
            .selection
            .iter()
            .filter(|id| self.graph.node(*id).is_some_and(|n| n.kind().can_edit_node()))
            .collect();
        for id in &doomed {
            self.graph.remove_node(*id);
        }
        self.selection.retain_existing(&self.graph);
        doomed.len()
    }

    pub fn copy(&mut self) -> usize {
        self.clipboard.copy(&self.graph, &self.selection)
    }

    pub fn cut(&mut self) -> usize {
        if self.copy() == 0 {
            return 0;
        }
        self.delete_selected()
    }

    /// Paste the clipboard with its top-left corner at canvas `(x, y)`.
    /// The pasted nodes become the selection.
    pub fn paste_at(&mut self, x: f32, y: f32) -> Vec<NodeId> {
        let pasted = self.clipboard.paste(&mut self.graph, x, y, self.config.snap());
        if !pasted.is_empty() {
            self.selection.replace_selection(pasted.iter().copied());
        }
        pasted
    }

    /// Paste at the last pointer position.
    pub fn paste(&mut self) -> Vec<NodeId> {
        let (x, y) = self.interaction.pointer();
        self.paste_at(x, y)
    }

    // === Input ===

    pub fn screen_to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        self.viewport.screen_to_canvas(x, y)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) {
        self.screen_pointer = (x, y);
        let (cx, cy) = self.viewport.screen_to_canvas(x, y);
        match button {
            PointerButton::Middle => self.interaction.begin_pan(),
            _ => self
                .interaction
                .pointer_down(&mut self.graph, &mut self.selection, cx, cy, button, modifiers),
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, modifiers: Modifiers) {
        let (last_x, last_y) = std::mem::replace(&mut self.screen_pointer, (x, y));
        if self.interaction.is_panning() {
            self.viewport.pan(x - last_x, y - last_y);
        }
        let (cx, cy) = self.viewport.screen_to_canvas(x, y);
        let snap = self.config.snap();
        self.interaction
            .pointer_move(&mut self.graph, &mut self.selection, cx, cy, modifiers, snap);
    }

    /// Returns whether the release completed a link.
    pub fn pointer_up(&mut self, x: f32, y: f32, button: PointerButton) -> bool {
        self.screen_pointer = (x, y);
        let (cx, cy) = self.viewport.screen_to_canvas(x, y);
        self.interaction.pointer_up(&mut self.graph, cx, cy, button)
    }

    /// One wheel notch. Positive `delta` zooms in; Shift zooms in finer steps.
    pub fn wheel(&mut self, delta: f32, modifiers: Modifiers) {
        if delta == 0.0 {
            return;
        }
        let step = if modifiers.shift {
            self.config.fine_zoom_step
        } else {
            self.config.zoom_step
        };
        self.viewport.zoom_by(delta > 0.0, step);
    }

    /// Run the action bound to `combo`, if any, and return it.
    ///
    /// Actions that need a path from the host ([`EditorAction::needs_host`])
    /// are only returned; the caller decides how to carry them out.
    pub fn handle_key(&mut self, combo: &KeyCombo) -> Option<EditorAction> {
        let action = keybinds::lookup(&self.config.keybinds, combo)?;
        self.perform(action);
        Some(action)
    }

    /// Carry out an editing action. Host actions are ignored.
    pub fn perform(&mut self, action: EditorAction) {
        match action {
            EditorAction::Delete => {
                self.delete_selected();
            }
            EditorAction::Copy => {
                self.copy();
            }
            EditorAction::Cut => {
                self.cut();
            }
            EditorAction::Paste => {
                self.paste();
            }
            EditorAction::ResetZoom => self.viewport.reset_zoom(),
            EditorAction::ResetView => self.viewport.reset(),
            EditorAction::Cancel => self.interaction.cancel(),
            EditorAction::Save | EditorAction::Open | EditorAction::Export => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybinds::Key;
    use crate::node::Node;

    fn editor() -> Editor {
        Editor::new(EditorConfig::default(), Rc::new(|_: &Node| 120.0_f32))
    }

    #[test]
    fn test_new_document_is_seeded() {
        let editor = editor();
        let nodes: Vec<_> = editor.graph().nodes().map(|n| (n.kind(), n.position())).collect();
        assert_eq!(
            nodes,
            vec![(NodeKind::Start, (50.0, 50.0)), (NodeKind::End, (300.0, 100.0))]
        );
        assert!(editor.document_path().is_none());
    }

    #[test]
    fn test_add_node_selects_it() {
        let mut editor = editor();
        let id = editor.add_node(NodeKind::NpcDialogue, 0.0, 300.0);
        assert!(editor.selection().contains(id));
        assert_eq!(editor.selection().len(), 1);
    }

    #[test]
    fn test_delete_skips_start_and_end() {
        let mut editor = editor();
        let all: Vec<_> = editor.graph().nodes().map(Node::id).collect();
        let npc = editor.add_node(NodeKind::NpcDialogue, 0.0, 300.0);
        editor.selection.replace_selection(all.iter().copied().chain([npc]));

        assert_eq!(editor.delete_selected(), 1);
        assert_eq!(editor.graph().len(), 2);
        assert!(!editor.selection().contains(npc));
        assert_eq!(editor.selection().len(), 2);
    }

    #[test]
    fn test_remove_node_respects_kind() {
        let mut editor = editor();
        let start = editor.graph().nodes().next().unwrap().id();
        assert!(!editor.remove_node(start));
        let npc = editor.add_node(NodeKind::NpcDialogue, 0.0, 300.0);
        assert!(editor.remove_node(npc));
    }

    #[test]
    fn test_cut_then_paste_at_pointer() {
        let mut editor = editor();
        let npc = editor.add_node(NodeKind::NpcDialogue, 10.0, 300.0);
        assert_eq!(editor.cut(), 1);
        assert!(editor.graph().node(npc).is_none());

        editor.pointer_move(205.0, 407.0, Modifiers::default());
        editor.perform(EditorAction::Paste);

        let pasted = editor.selection().iter().next().unwrap();
        assert_eq!(editor.graph().node(pasted).unwrap().position(), (200.0, 400.0));
    }

    #[test]
    fn test_keybinds_dispatch() {
        let mut editor = editor();
        editor.resize(800.0, 600.0);
        editor.wheel(1.0, Modifiers::default());
        assert_eq!(editor.viewport().zoom(), 2.0);

        let action = editor.handle_key(&KeyCombo::ctrl(Key::char('r')));
        assert_eq!(action, Some(EditorAction::ResetZoom));
        assert_eq!(editor.viewport().zoom(), 1.0);

        assert_eq!(editor.handle_key(&KeyCombo::ctrl(Key::char('s'))), Some(EditorAction::Save));
        assert_eq!(editor.handle_key(&KeyCombo::plain(Key::char('q'))), None);
    }

    #[test]
    fn test_fine_wheel_zoom() {
        let mut editor = editor();
        editor.wheel(-1.0, Modifiers::shift());
        assert!((editor.viewport().zoom() - 1.0 / 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_middle_drag_pans() {
        let mut editor = editor();
        editor.pointer_down(100.0, 100.0, PointerButton::Middle, Modifiers::default());
        editor.pointer_move(130.0, 90.0, Modifiers::default());
        editor.pointer_up(130.0, 90.0, PointerButton::Middle);

        assert_eq!(editor.viewport().offset(), (30.0, -10.0));
        assert!(editor.interaction().is_idle());
    }

    #[test]
    fn test_save_without_path_fails() {
        let editor = editor();
        assert!(matches!(editor.save(), Err(NedError::NoDocumentPath)));
    }

    #[test]
    fn test_save_as_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.json");

        let mut editor = editor();
        editor.add_node(NodeKind::TriggerEvent, 0.0, 300.0);
        editor.save_as(&path).unwrap();
        assert_eq!(editor.file_name().as_deref(), Some("talk.json"));

        let mut other = Editor::empty(EditorConfig::default(), Rc::new(|_: &Node| 120.0_f32));
        other.open(&path).unwrap();
        assert_eq!(other.graph().len(), 3);
        assert!(other.selection().is_empty());
        other.save().unwrap();
    }

    #[test]
    fn test_failed_open_keeps_document() {
        let mut editor = editor();
        assert!(editor.open("/no/such/file.json").is_err());
        assert_eq!(editor.graph().len(), 2);
    }
}
