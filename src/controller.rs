//! Slint bridge for the editor.
//!
//! [`EditorController`] wraps an [`Editor`] and hands out callbacks that can be
//! passed straight to the window's `on_*` setters. After every event it
//! rebuilds screen-space views of the nodes, connectors and links and pushes
//! them into the bound `VecModel`s.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use ned_editor::{Editor, EditorConfig, EditorController, LabelWidth};
//! use slint::{ModelRc, VecModel};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = EditorController::new(Editor::new(EditorConfig::default(), Rc::new(LabelWidth::default())));
//!
//!     let nodes = Rc::new(VecModel::<NodeData>::default());
//!     ctrl.bind_nodes(nodes.clone(), |n| NodeData {
//!         id: n.id.clone(),
//!         title: n.title.clone(),
//!         x: n.x,
//!         y: n.y,
//!         width: n.width,
//!         height: n.height,
//!         color: n.color,
//!         selected: n.selected,
//!     });
//!     window.set_nodes(ModelRc::from(nodes));
//!
//!     window.on_pointer_down(ctrl.pointer_down_callback());
//!     window.on_pointer_move(ctrl.pointer_move_callback());
//!     window.on_pointer_up(ctrl.pointer_up_callback());
//!     window.on_wheel(ctrl.wheel_callback());
//!     window.on_key_pressed(ctrl.key_pressed_callback(|action| {
//!         // Open, Save and Export need a file dialog
//!     }));
//!
//!     ctrl.sync();
//!     window.run().unwrap();
//! }
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slint::platform::PointerEventButton;
use slint::{Color, Model, SharedString, VecModel};

use crate::connection::Side;
use crate::editor::Editor;
use crate::grid::Grid;
use crate::hit_test::Rectangle;
use crate::interaction::{Modifiers, PointerButton};
use crate::keybinds::{EditorAction, Key, KeyCombo};
use crate::kind::NodeKind;
use crate::path::LinkCurve;

/// A node as it should be drawn, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: SharedString,
    pub kind: NodeKind,
    pub title: SharedString,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Draw depth carried in the document.
    pub layer: f32,
    pub color: Color,
    pub selected: bool,
}

/// A connector circle and its label, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorView {
    pub id: SharedString,
    pub node_id: SharedString,
    pub is_input: bool,
    pub text: SharedString,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Color,
    /// Under the pointer and able to take part in the current gesture
    pub hovered: bool,
}

/// One link curve; `id` is the output connector the link is stored on.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkView {
    pub id: SharedString,
    pub path: SharedString,
    pub color: Color,
}

trait ModelSyncer<T> {
    fn sync(&self, rows: &[T]);
}

struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<T, P, F> ModelSyncer<T> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&T) -> P,
{
    fn sync(&self, rows: &[T]) {
        // Update existing rows or add new ones
        for (i, row) in rows.iter().enumerate() {
            let item = (self.constructor)(row);
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > rows.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

type Syncer<T> = Rc<RefCell<Option<Box<dyn ModelSyncer<T>>>>>;

pub fn link_color() -> Color {
    Color::from_rgb_u8(128, 128, 128)
}

pub fn connector_color(side: Side) -> Color {
    match side {
        Side::Input => Color::from_rgb_u8(0, 191, 255),
        Side::Output => Color::from_rgb_u8(50, 205, 50),
    }
}

/// Header color for a node kind.
pub fn kind_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Start => Color::from_rgb_u8(50, 205, 50),
        NodeKind::End => Color::from_rgb_u8(205, 92, 92),
        NodeKind::NpcDialogue => Color::from_rgb_u8(147, 112, 219),
        NodeKind::PlayerDialogue => Color::from_rgb_u8(135, 206, 250),
        NodeKind::WaitForFlag => Color::from_rgb_u8(255, 165, 0),
        NodeKind::SetFlag => Color::from_rgb_u8(60, 179, 113),
        NodeKind::ClearFlag => Color::from_rgb_u8(199, 21, 133),
        NodeKind::HasQuest => Color::from_rgb_u8(255, 140, 0),
        NodeKind::StartQuest => Color::from_rgb_u8(70, 130, 180),
        NodeKind::CompleteQuest => Color::from_rgb_u8(153, 50, 204),
        NodeKind::TriggerEvent => Color::from_rgb_u8(189, 183, 107),
    }
}

/// Map a Slint pointer button; buttons the editor has no use for map to `None`.
pub fn pointer_button(button: PointerEventButton) -> Option<PointerButton> {
    match button {
        PointerEventButton::Left => Some(PointerButton::Left),
        PointerEventButton::Middle => Some(PointerButton::Middle),
        PointerEventButton::Right => Some(PointerButton::Right),
        _ => None,
    }
}

/// Map the text of a Slint key event to a [`Key`].
pub fn key_from_text(text: &str) -> Option<Key> {
    let named = [
        (slint::platform::Key::Delete, Key::Delete),
        (slint::platform::Key::Backspace, Key::Backspace),
        (slint::platform::Key::Escape, Key::Escape),
        (slint::platform::Key::Return, Key::Enter),
    ];
    for (slint_key, key) in named {
        if SharedString::from(slint_key).as_str() == text {
            return Some(key);
        }
    }

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(Key::char(c)),
        _ => None,
    }
}

/// Shared handle on an [`Editor`] that drives Slint models.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct EditorController {
    editor: Rc<RefCell<Editor>>,
    nodes: Syncer<NodeView>,
    connectors: Syncer<ConnectorView>,
    links: Syncer<LinkView>,
}

impl EditorController {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor: Rc::new(RefCell::new(editor)),
            nodes: Rc::new(RefCell::new(None)),
            connectors: Rc::new(RefCell::new(None)),
            links: Rc::new(RefCell::new(None)),
        }
    }

    /// The wrapped editor. Call [`sync`](Self::sync) after changing it directly.
    pub fn editor(&self) -> Rc<RefCell<Editor>> {
        self.editor.clone()
    }

    // ========================================================================
    // Model binding
    // ========================================================================

    /// Keep `model` in step with [`node_views`](Self::node_views).
    pub fn bind_nodes<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&NodeView) -> P + 'static,
    {
        *self.nodes.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Keep `model` in step with [`connector_views`](Self::connector_views).
    pub fn bind_connectors<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&ConnectorView) -> P + 'static,
    {
        *self.connectors.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Keep `model` in step with [`link_views`](Self::link_views).
    pub fn bind_links<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&LinkView) -> P + 'static,
    {
        *self.links.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Push the current state into every bound model.
    pub fn sync(&self) {
        if let Some(syncer) = self.nodes.borrow().as_ref() {
            syncer.sync(&self.node_views());
        }
        if let Some(syncer) = self.connectors.borrow().as_ref() {
            syncer.sync(&self.connector_views());
        }
        if let Some(syncer) = self.links.borrow().as_ref() {
            syncer.sync(&self.link_views());
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Nodes in drawing order, bottom first.
    pub fn node_views(&self) -> Vec<NodeView> {
        let editor = self.editor.borrow();
        let viewport = editor.viewport();
        let zoom = viewport.zoom();

        let mut views: Vec<NodeView> = editor
            .graph()
            .nodes()
            .map(|node| {
                let (x, y) = node.position();
                let (sx, sy) = viewport.canvas_to_screen(x, y);
                NodeView {
                    id: node.id().to_string().into(),
                    kind: node.kind(),
                    title: node.name().into(),
                    x: sx,
                    y: sy,
                    width: node.width() * zoom,
                    height: node.height() * zoom,
                    layer: node.layer(),
                    color: kind_color(node.kind()),
                    selected: editor.selection().contains(node.id()),
                }
            })
            .collect();

        // Picking takes the first node in graph order, so it is drawn last
        views.reverse();
        views
    }

    pub fn connector_views(&self) -> Vec<ConnectorView> {
        let editor = self.editor.borrow();
        let graph = editor.graph();
        let viewport = editor.viewport();
        let hovered = editor.interaction().hovered_connection(graph);

        graph
            .nodes()
            .flat_map(|node| node.connections().map(move |c| (node, c)))
            .map(|(node, connection)| {
                let circle = connection.bounds(node);
                let (x, y) = viewport.canvas_to_screen(circle.x, circle.y);
                let is_input = connection.side() == Side::Input;
                ConnectorView {
                    id: connection.id().to_string().into(),
                    node_id: node.id().to_string().into(),
                    is_input,
                    text: connection.text().into(),
                    x,
                    y,
                    radius: circle.radius * viewport.zoom(),
                    color: connector_color(connection.side()),
                    hovered: hovered == Some(connection.id()),
                }
            })
            .collect()
    }

    pub fn link_views(&self) -> Vec<LinkView> {
        let editor = self.editor.borrow();
        let graph = editor.graph();
        let viewport = editor.viewport();

        graph
            .link_pairs()
            .filter_map(|(output, input)| {
                let start = output.bounds(graph.owner_of(output.id())?).center();
                let end = input.bounds(graph.owner_of(input.id())?).center();
                let curve = LinkCurve::new(start, Side::Output, end).to_screen(viewport);
                Some(LinkView {
                    id: output.id().to_string().into(),
                    path: curve.commands().into(),
                    color: link_color(),
                })
            })
            .collect()
    }

    /// Path of the link being dragged out, or an empty string.
    pub fn link_preview_path(&self) -> SharedString {
        let editor = self.editor.borrow();
        let graph = editor.graph();
        let interaction = editor.interaction();

        let side = interaction
            .dragging_connection()
            .and_then(|id| graph.connection(id))
            .map(|c| c.side());
        match (side, interaction.link_preview(graph)) {
            (Some(side), Some((start, end))) => LinkCurve::new(start, side, end)
                .to_screen(editor.viewport())
                .commands()
                .into(),
            _ => SharedString::new(),
        }
    }

    /// The rubber band in screen space while a marquee drag is running.
    pub fn selection_box(&self) -> Option<Rectangle> {
        let editor = self.editor.borrow();
        let rect = editor.interaction().selection_rect()?;
        let viewport = editor.viewport();
        let (x, y) = viewport.canvas_to_screen(rect.x, rect.y);
        Some(Rectangle::new(
            x,
            y,
            rect.width * viewport.zoom(),
            rect.height * viewport.zoom(),
        ))
    }

    pub fn grid_commands(&self) -> SharedString {
        let editor = self.editor.borrow();
        let viewport = editor.viewport();
        let (width, height) = viewport.size();
        Grid::new(editor.config().grid_pitch)
            .commands(width, height, viewport.zoom(), viewport.offset())
            .into()
    }

    pub fn zoom(&self) -> f32 {
        self.editor.borrow().viewport().zoom()
    }

    /// Window title: `Ned`, or `Ned - <file>` once the document has a path.
    pub fn title(&self) -> SharedString {
        match self.editor.borrow().file_name() {
            Some(name) => format!("Ned - {name}").into(),
            None => "Ned".into(),
        }
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    pub fn handle_pointer_down(&self, x: f32, y: f32, button: PointerEventButton, modifiers: Modifiers) {
        let Some(button) = pointer_button(button) else {
            return;
        };
        self.editor.borrow_mut().pointer_down(x, y, button, modifiers);
        self.sync();
    }

    pub fn handle_pointer_move(&self, x: f32, y: f32, modifiers: Modifiers) {
        self.editor.borrow_mut().pointer_move(x, y, modifiers);
        self.sync();
    }

    /// Returns whether the release completed a link.
    pub fn handle_pointer_up(&self, x: f32, y: f32, button: PointerEventButton) -> bool {
        let Some(button) = pointer_button(button) else {
            return false;
        };
        let linked = self.editor.borrow_mut().pointer_up(x, y, button);
        self.sync();
        linked
    }

    pub fn handle_wheel(&self, delta: f32, modifiers: Modifiers) {
        self.editor.borrow_mut().wheel(delta, modifiers);
        self.sync();
    }

    /// Run the keybind for a key event. Returns the action it was bound to.
    pub fn handle_key(&self, text: &str, modifiers: Modifiers) -> Option<EditorAction> {
        let key = key_from_text(text)?;
        let action = self.editor.borrow_mut().handle_key(&KeyCombo::new(key, modifiers));
        if action.is_some() {
            self.sync();
        }
        action
    }

    pub fn handle_resize(&self, width: f32, height: f32) {
        self.editor.borrow_mut().resize(width, height);
    }

    // ========================================================================
    // Callback factories
    // ========================================================================

    /// `(x, y, button, control, alt, shift)`
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32, PointerEventButton, bool, bool, bool) {
        let ctrl = self.clone();
        move |x, y, button, control, alt, shift| {
            ctrl.handle_pointer_down(x, y, button, Modifiers { control, alt, shift })
        }
    }

    /// `(x, y, control, alt, shift)`
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32, bool, bool, bool) {
        let ctrl = self.clone();
        move |x, y, control, alt, shift| ctrl.handle_pointer_move(x, y, Modifiers { control, alt, shift })
    }

    pub fn pointer_up_callback(&self) -> impl Fn(f32, f32, PointerEventButton) -> bool {
        let ctrl = self.clone();
        move |x, y, button| ctrl.handle_pointer_up(x, y, button)
    }

    /// `(delta, shift)`
    pub fn wheel_callback(&self) -> impl Fn(f32, bool) {
        let ctrl = self.clone();
        move |delta, shift| ctrl.handle_wheel(delta, Modifiers { shift, ..Modifiers::default() })
    }

    /// `(text, control, alt, shift) -> accepted`
    ///
    /// Actions that need a file path are passed on to `host`.
    pub fn key_pressed_callback<H>(&self, host: H) -> impl Fn(SharedString, bool, bool, bool) -> bool
    where
        H: Fn(EditorAction) + 'static,
    {
        let ctrl = self.clone();
        move |text, control, alt, shift| match ctrl.handle_key(&text, Modifiers { control, alt, shift }) {
            Some(action) => {
                if action.needs_host() {
                    host(action);
                }
                true
            }
            None => false,
        }
    }

    pub fn resize_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |width, height| ctrl.handle_resize(width, height)
    }
}
