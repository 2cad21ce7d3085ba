//! Level 5: Persistence Tests
//!
//! JSON documents on disk, load validation, and the binary export.

mod common;

use common::{dialogue, editor, fixed_width, graph, input, linked_nodes, output};
use ned_editor::save::{from_json_str, from_records, to_json_string, to_records};
use ned_editor::{Graph, NedError, NodeKind, Side};
use uuid::Uuid;

#[test]
fn test_file_round_trip_keeps_everything() {
    let mut g = graph();
    let mut ids = Vec::new();
    for (i, kind) in NodeKind::ALL.into_iter().enumerate() {
        ids.push(g.create_node(kind, i as f32 * 150.0, 40.0));
    }
    let player = ids[3];
    g.add_output(player, "Ask about the ring");
    let first = output(&g, player, 0);
    g.set_connection_text(first, "Hello there");
    g.connect(output(&g, ids[0], 0), input(&g, player));
    g.connect(first, input(&g, ids[1]));
    g.set_layer(ids[2], -1.5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dialogue.ned");
    g.save(&path).unwrap();
    let loaded = Graph::load(&path, fixed_width()).unwrap();

    assert_eq!(loaded.len(), g.len());
    for (a, b) in g.nodes().zip(loaded.nodes()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.position(), b.position());
        assert_eq!(a.name(), b.name());
        assert_eq!(a.layer(), b.layer());
        let ac: Vec<_> = a
            .connections()
            .map(|c| (c.id(), c.side(), c.index(), c.text().to_string(), c.editable_label()))
            .collect();
        let bc: Vec<_> = b
            .connections()
            .map(|c| (c.id(), c.side(), c.index(), c.text().to_string(), c.editable_label()))
            .collect();
        assert_eq!(ac, bc);
    }
    assert_eq!(linked_nodes(&loaded), linked_nodes(&g));
    assert_eq!(loaded.node(player).unwrap().outputs().len(), 4);
}

#[test]
fn test_layer_and_fixed_labels_survive_reload() {
    let node = Uuid::new_v4();
    let (inp, flag, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let json = format!(
        r#"[{{ "Id": "{node}", "X": 40, "Y": 60, "Layer": 3.5, "Name": "Has Flag", "NodeFunction": "Has Flag",
              "Input": {{ "Id": "{inp}", "Side": "Input", "ConnectionIndex": 0, "Text": "",
                          "ParentNode": "{node}", "ConnectedNode": null, "CanEditName": true }},
              "Outputs": [
                {{ "Id": "{flag}", "Side": "Output", "ConnectionIndex": 0, "Text": "door_open",
                   "ParentNode": "{node}", "ConnectedNode": null, "CanEditName": true }},
                {{ "Id": "{other}", "Side": "Output", "ConnectionIndex": 1, "Text": "[Else]",
                   "ParentNode": "{node}", "ConnectedNode": null, "CanEditName": false }}
              ] }}]"#
    );
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.ned");
    let second = dir.path().join("second.ned");
    std::fs::write(&first, json).unwrap();

    Graph::load(&first, fixed_width()).unwrap().save(&second).unwrap();
    let loaded = Graph::load(&second, fixed_width()).unwrap();

    let n = loaded.nodes().next().unwrap();
    assert_eq!(n.kind(), NodeKind::WaitForFlag);
    assert_eq!(n.layer(), 3.5);
    let labels: Vec<_> = n.outputs().iter().map(|c| (c.text().to_string(), c.editable_label())).collect();
    assert_eq!(labels, vec![("door_open".to_string(), true), ("[Else]".to_string(), false)]);
    assert!(n.input().unwrap().editable_label());
}

#[test]
fn test_document_uses_record_field_names() {
    let d = dialogue();
    let json = to_json_string(&d.graph).unwrap();
    for key in ["\"Id\"", "\"NodeFunction\"", "\"Outputs\"", "\"ParentNode\"", "\"ConnectedNode\""] {
        assert!(json.contains(key), "missing {key}");
    }
    assert!(json.contains("\"Interact\""));
}

#[test]
fn test_outputs_store_input_id() {
    let d = dialogue();
    let records = to_records(&d.graph);
    let start_out = &records[0].outputs[0];
    assert_eq!(start_out.connected_node, Some(input(&d.graph, d.npc).0));
    // Inputs never hold a link
    assert_eq!(records[1].input.as_ref().unwrap().connected_node, None);
}

#[test]
fn test_forward_references_resolve() {
    let d = dialogue();
    let mut records = to_records(&d.graph);
    records.reverse();

    let loaded = from_records(records, fixed_width()).unwrap();
    let mut expected = linked_nodes(&d.graph);
    expected.reverse();
    assert_eq!(linked_nodes(&loaded), expected);
}

#[test]
fn test_delete_cascade_survives_save() {
    let mut editor = editor();
    let npc = editor.add_node(NodeKind::NpcDialogue, 150.0, 200.0);
    let start = editor.graph().nodes().next().unwrap().id();
    let end = editor.graph().nodes().nth(1).unwrap().id();
    let npc_in = input(editor.graph(), npc);
    let npc_out = output(editor.graph(), npc, 0);
    let start_out = output(editor.graph(), start, 0);
    let end_in = input(editor.graph(), end);
    editor.connect(start_out, npc_in);
    editor.connect(npc_out, end_in);

    assert_eq!(editor.delete_selected(), 1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cascade.ned");
    editor.save_as(&path).unwrap();
    let loaded = Graph::load(&path, fixed_width()).unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.links().is_empty());
}

#[test]
fn test_unknown_kind_is_rejected() {
    let d = dialogue();
    let mut records = to_records(&d.graph);
    records[1].node_function = "Dance".to_string();
    let err = from_records(records, fixed_width()).unwrap_err();
    assert!(matches!(err, NedError::UnknownKind { name } if name == "Dance"));
}

#[test]
fn test_dangling_link_is_rejected() {
    let d = dialogue();
    let mut records = to_records(&d.graph);
    let missing = Uuid::new_v4();
    records[0].outputs[0].connected_node = Some(missing);
    let err = from_records(records, fixed_width()).unwrap_err();
    assert!(matches!(err, NedError::UnknownConnection { id } if id == missing));
}

#[test]
fn test_unknown_parent_is_rejected() {
    let d = dialogue();
    let mut records = to_records(&d.graph);
    let missing = Uuid::new_v4();
    records[1].outputs[0].parent_node = missing;
    let err = from_records(records, fixed_width()).unwrap_err();
    assert!(matches!(err, NedError::UnknownNode { id } if id == missing));
}

#[test]
fn test_wrong_parent_is_rejected() {
    let d = dialogue();
    let mut records = to_records(&d.graph);
    records[1].outputs[0].parent_node = d.start.0;
    let err = from_records(records, fixed_width()).unwrap_err();
    assert!(matches!(err, NedError::OwnerMismatch { .. }));
}

#[test]
fn test_side_mismatch_is_rejected() {
    let d = dialogue();
    let mut records = to_records(&d.graph);
    records[1].outputs[0].side = Side::Input;
    let err = from_records(records, fixed_width()).unwrap_err();
    assert!(matches!(err, NedError::SideMismatch { .. }));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let d = dialogue();
    let mut records = to_records(&d.graph);
    records[2].id = records[0].id;
    let err = from_records(records, fixed_width()).unwrap_err();
    assert!(matches!(err, NedError::DuplicateId { .. }));
}

#[test]
fn test_link_between_outputs_is_rejected() {
    let d = dialogue();
    let mut records = to_records(&d.graph);
    let npc_out = records[1].outputs[0].id;
    records[0].outputs[0].connected_node = Some(npc_out);
    let err = from_records(records, fixed_width()).unwrap_err();
    assert!(matches!(err, NedError::InvalidLink { .. }));
}

#[test]
fn test_out_of_order_indices_are_renumbered() {
    let mut g = graph();
    let player = g.create_node(NodeKind::PlayerDialogue, 0.0, 0.0);
    let mut records = to_records(&g);
    records[0].outputs[0].connection_index = 7;
    records[0].outputs[2].connection_index = 0;

    let loaded = from_records(records, fixed_width()).unwrap();
    let indices: Vec<usize> = loaded.node(player).unwrap().outputs().iter().map(|c| c.index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_malformed_document() {
    let err = from_json_str("[{ \"Id\": 3 }]", fixed_width()).unwrap_err();
    assert!(matches!(err, NedError::Json(_)));
}

#[test]
fn test_failed_open_keeps_current_document() {
    let mut editor = editor();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ned");
    std::fs::write(&path, "not json").unwrap();

    assert!(editor.open(&path).is_err());
    assert_eq!(editor.graph().len(), 2);
    assert!(editor.document_path().is_none());
}

#[test]
fn test_save_without_path() {
    let editor = editor();
    assert!(matches!(editor.save(), Err(NedError::NoDocumentPath)));
}

#[test]
fn test_export_file_layout() {
    let d = dialogue();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dialogue.nedx");
    ned_editor::export(&d.graph, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"NEDX");
    assert_eq!(i32::from_le_bytes(bytes[8..12].try_into().unwrap()), 3);
    // Start: id, code 0, one output with empty label, linked to the NPC node
    assert_eq!(&bytes[12..28], &d.start.0.to_bytes_le());
    assert_eq!(i32::from_le_bytes(bytes[28..32].try_into().unwrap()), 0);
    assert_eq!(bytes[36], 0);
    assert_eq!(bytes[37], 1);
    assert_eq!(&bytes[38..54], &d.npc.0.to_bytes_le());
}
