//! Level 3: Picking and Selection Tests
//!
//! Hit testing order and marquee selection in its three modes.

mod common;

use common::{center, graph, input, output};
use ned_editor::{NodeKind, Rectangle, SelectionManager, SelectionMode};

#[test]
fn test_first_node_in_graph_order_wins() {
    let mut g = graph();
    let below = g.create_node(NodeKind::NpcDialogue, 0.0, 0.0);
    let _above = g.create_node(NodeKind::NpcDialogue, 50.0, 10.0);

    // Overlap region belongs to the node created first
    assert_eq!(g.pick_node(60.0, 20.0), Some(below));
    assert_eq!(g.pick_node(500.0, 500.0), None);
}

#[test]
fn test_input_picked_before_outputs() {
    let mut g = graph();
    let a = g.create_node(NodeKind::NpcDialogue, 0.0, 0.0);
    // Place b so its input sits on top of a's first output
    let (ox, oy) = center(&g, output(&g, a, 0));
    let b = g.create_node(NodeKind::NpcDialogue, ox, oy - 40.0);
    assert_eq!(center(&g, input(&g, b)), (ox, oy));

    // a comes first in graph order
    assert_eq!(g.pick_connection(ox, oy, |_| true), Some(output(&g, a, 0)));

    // Within one node the input is tested first
    let mut g2 = graph();
    let n = g2.create_node(NodeKind::NpcDialogue, 0.0, 0.0);
    let (ix, iy) = center(&g2, input(&g2, n));
    assert_eq!(g2.pick_connection(ix + 3.0, iy, |_| true), Some(input(&g2, n)));
}

#[test]
fn test_pick_connection_filter_skips_candidates() {
    let mut g = graph();
    let a = g.create_node(NodeKind::NpcDialogue, 0.0, 0.0);
    let (ox, oy) = center(&g, output(&g, a, 0));
    let b = g.create_node(NodeKind::NpcDialogue, ox, oy - 40.0);

    let only_inputs = g.pick_connection(ox, oy, |c| c.side() == ned_editor::Side::Input);
    assert_eq!(only_inputs, Some(input(&g, b)));
}

#[test]
fn test_connector_hit_radius() {
    let mut g = graph();
    let n = g.create_node(NodeKind::End, 0.0, 0.0);
    let (x, y) = center(&g, input(&g, n));
    assert!(g.pick_connection(x + 5.9, y, |_| true).is_some());
    assert!(g.pick_connection(x + 6.1, y, |_| true).is_none());
}

#[test]
fn test_nodes_in_rect_any_overlap() {
    let mut g = graph();
    let a = g.create_node(NodeKind::End, 0.0, 0.0);
    let b = g.create_node(NodeKind::End, 200.0, 0.0);
    let _c = g.create_node(NodeKind::End, 400.0, 400.0);

    // Dragged up and to the left: negative extent
    let rect = Rectangle::new(250.0, 30.0, -160.0, -20.0);
    assert_eq!(g.nodes_in_rect(&rect), vec![a, b]);
}

#[test]
fn test_selection_modes() {
    let mut g = graph();
    let a = g.create_node(NodeKind::End, 0.0, 0.0);
    let b = g.create_node(NodeKind::End, 200.0, 0.0);
    let c = g.create_node(NodeKind::End, 400.0, 0.0);
    let around_a = Rectangle::new(-10.0, -10.0, 20.0, 20.0);
    let around_bc = Rectangle::new(190.0, -10.0, 220.0, 20.0);

    let mut selection = SelectionManager::new();
    selection.select_in_rect(&g, &around_a, SelectionMode::Normal);
    assert_eq!(selection.iter().collect::<Vec<_>>(), vec![a]);

    selection.select_in_rect(&g, &around_bc, SelectionMode::Additive);
    assert_eq!(selection.iter().collect::<Vec<_>>(), vec![a, b, c]);

    selection.select_in_rect(&g, &around_a, SelectionMode::Subtractive);
    assert_eq!(selection.iter().collect::<Vec<_>>(), vec![b, c]);

    selection.select_in_rect(&g, &around_a, SelectionMode::Normal);
    assert_eq!(selection.iter().collect::<Vec<_>>(), vec![a]);
}

#[test]
fn test_selection_forgets_removed_nodes() {
    let mut g = graph();
    let a = g.create_node(NodeKind::End, 0.0, 0.0);
    let b = g.create_node(NodeKind::End, 200.0, 0.0);
    let mut selection = SelectionManager::new();
    selection.replace_selection([a, b]);

    g.remove_node(a);
    selection.retain_existing(&g);
    assert!(!selection.contains(a));
    assert_eq!(selection.len(), 1);
}
