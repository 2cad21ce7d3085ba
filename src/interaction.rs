//! Pointer state machine.
//!
//! [`Interaction`] turns canvas-space pointer events into graph and selection
//! edits. It holds only the drag state; the graph and selection are passed in
//! on every call. Screen-space concerns (panning, zoom) belong to the
//! [`Editor`](crate::editor::Editor), which converts coordinates before
//! calling in here.

use log::debug;

use crate::connection::Connection;
use crate::graph::Graph;
use crate::grid::snap_down;
use crate::hit_test::Rectangle;
use crate::id::{ConnectionId, NodeId};
use crate::selection::{SelectionManager, SelectionMode};

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    pub fn control() -> Self {
        Self { control: true, ..Self::default() }
    }

    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Marquee mode for these modifiers: Ctrl adds, Alt subtracts.
    pub fn selection_mode(self) -> SelectionMode {
        if self.control {
            SelectionMode::Additive
        } else if self.alt {
            SelectionMode::Subtractive
        } else {
            SelectionMode::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Dragging a new link out of a connector
    Link { from: ConnectionId },
    /// Moving the selected nodes; each keeps its grab offset from the pointer
    Nodes { grabs: Vec<(NodeId, f32, f32)> },
    /// Rubber-band selection. `base` is the selection when the drag started.
    Marquee { rect: Rectangle, base: Vec<NodeId> },
    /// Panning the view (driven by the editor)
    Pan,
}

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    drag: DragState,
    pointer: (f32, f32),
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Last pointer position in canvas space.
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub fn is_idle(&self) -> bool {
        self.drag == DragState::Idle
    }

    pub fn is_panning(&self) -> bool {
        self.drag == DragState::Pan
    }

    pub fn selection_rect(&self) -> Option<Rectangle> {
        match &self.drag {
            DragState::Marquee { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    pub fn dragging_connection(&self) -> Option<ConnectionId> {
        match self.drag {
            DragState::Link { from } => Some(from),
            _ => None,
        }
    }

    /// Whether `candidate` may receive the link currently being dragged.
    /// Anything passes while no link is being dragged.
    pub fn accepts(&self, graph: &Graph, candidate: &Connection) -> bool {
        match self.dragging_connection().and_then(|id| graph.connection(id)) {
            Some(from) => from.can_link_to(candidate),
            None => true,
        }
    }

    /// The connector under the pointer that a press or release would act on.
    pub fn hovered_connection(&self, graph: &Graph) -> Option<ConnectionId> {
        let (x, y) = self.pointer;
        graph.pick_connection(x, y, |c| self.accepts(graph, c))
    }

    /// Endpoints of the in-progress link curve: the source connector and
    /// either the hovered target or the pointer.
    pub fn link_preview(&self, graph: &Graph) -> Option<((f32, f32), (f32, f32))> {
        let from = graph.connection(self.dragging_connection()?)?;
        let start = from.bounds(graph.owner_of(from.id())?).center();
        let end = self
            .hovered_connection(graph)
            .and_then(|id| {
                let target = graph.connection(id)?;
                Some(target.bounds(graph.owner_of(id)?).center())
            })
            .unwrap_or(self.pointer);
        Some((start, end))
    }

    pub fn begin_pan(&mut self) {
        self.drag = DragState::Pan;
    }

    /// Press at canvas position `(x, y)`.
    ///
    /// Only the left button is handled here. A connector wins over the node
    /// under it; Shift on a connector breaks its links instead of starting a
    /// drag. On empty canvas the selection is cleared unless Ctrl or Alt is
    /// held, and a marquee starts.
    pub fn pointer_down(
        &mut self,
        graph: &mut Graph,
        selection: &mut SelectionManager,
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    ) {
        self.pointer = (x, y);
        if button != PointerButton::Left {
            return;
        }

        if let Some(connection) = self.hovered_connection(graph) {
            selection.clear();
            if modifiers.shift {
                graph.clear_connections_from(connection);
            } else {
                self.drag = DragState::Link { from: connection };
            }
            return;
        }

        if let Some(node) = graph.pick_node(x, y) {
            if !selection.contains(node) {
                selection.select(node);
            }
            let grabs = selection
                .iter()
                .filter_map(|id| graph.node(id))
                .map(|n| {
                    let (nx, ny) = n.position();
                    (n.id(), x - nx, y - ny)
                })
                .collect();
            self.drag = DragState::Nodes { grabs };
            return;
        }

        if !modifiers.control && !modifiers.alt {
            selection.clear();
        }
        self.drag = DragState::Marquee {
            rect: Rectangle::new(x, y, 0.0, 0.0),
            base: selection.iter().collect(),
        };
    }

    /// Pointer moved to canvas position `(x, y)`.
    ///
    /// Dragged nodes are floored to `snap` unless Shift is held.
    pub fn pointer_move(
        &mut self,
        graph: &mut Graph,
        selection: &mut SelectionManager,
        x: f32,
        y: f32,
        modifiers: Modifiers,
        snap: Option<f32>,
    ) {
        self.pointer = (x, y);
        match &mut self.drag {
            DragState::Marquee { rect, base } => {
                rect.width = x - rect.x;
                rect.height = y - rect.y;
                selection.replace_selection(base.iter().copied());
                selection.select_in_rect(graph, rect, modifiers.selection_mode());
            }
            DragState::Nodes { grabs } => {
                for &(id, gx, gy) in grabs.iter() {
                    let (mut nx, mut ny) = (x - gx, y - gy);
                    if let (Some(pitch), false) = (snap, modifiers.shift) {
                        nx = snap_down(nx, pitch);
                        ny = snap_down(ny, pitch);
                    }
                    graph.move_node(id, nx, ny);
                }
            }
            DragState::Link { .. } | DragState::Pan | DragState::Idle => {}
        }
    }

    /// Release at canvas position `(x, y)`. Returns whether a link was made.
    pub fn pointer_up(&mut self, graph: &mut Graph, x: f32, y: f32, button: PointerButton) -> bool {
        self.pointer = (x, y);
        match button {
            PointerButton::Middle if self.is_panning() => {
                self.drag = DragState::Idle;
                false
            }
            PointerButton::Left => {
                let linked = match (self.dragging_connection(), self.hovered_connection(graph)) {
                    (Some(from), Some(to)) => graph.connect(from, to),
                    (Some(from), None) => {
                        debug!("link drag from {from} dropped on nothing");
                        false
                    }
                    _ => false,
                };
                if !self.is_panning() {
                    self.drag = DragState::Idle;
                }
                linked
            }
            _ => false,
        }
    }

    /// Abandon whatever drag is in progress. Edits already applied stay.
    pub fn cancel(&mut self) {
        self.drag = DragState::Idle;
    }
}
