//! The fixed catalog of node kinds.
//!
//! A kind decides what a freshly created node looks like (its connector
//! layout), whether the user may add or remove outputs, and whether the node
//! may be selected for delete/cut/copy at all.

use std::fmt;
use std::str::FromStr;

use crate::error::NedError;

/// Archetype of a dialogue node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Start,
    End,
    NpcDialogue,
    PlayerDialogue,
    WaitForFlag,
    SetFlag,
    ClearFlag,
    HasQuest,
    StartQuest,
    CompleteQuest,
    TriggerEvent,
}

/// One connector in a kind's initial layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorSpec {
    pub text: &'static str,
    pub editable_label: bool,
}

impl ConnectorSpec {
    const fn editable(text: &'static str) -> Self {
        Self { text, editable_label: true }
    }

    const fn fixed(text: &'static str) -> Self {
        Self { text, editable_label: false }
    }
}

/// The connectors a new node of some kind starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorLayout {
    pub input: Option<ConnectorSpec>,
    pub outputs: Vec<ConnectorSpec>,
}

const INPUT: ConnectorSpec = ConnectorSpec::editable("");
const ELSE: ConnectorSpec = ConnectorSpec::fixed("[Else]");

impl NodeKind {
    /// Every kind, in export-code order.
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::NpcDialogue,
        NodeKind::PlayerDialogue,
        NodeKind::WaitForFlag,
        NodeKind::SetFlag,
        NodeKind::ClearFlag,
        NodeKind::HasQuest,
        NodeKind::StartQuest,
        NodeKind::CompleteQuest,
        NodeKind::TriggerEvent,
    ];

    /// Display name, also used as the key in saved documents.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Start => "Interact",
            NodeKind::End => "Exit",
            NodeKind::NpcDialogue => "NPC",
            NodeKind::PlayerDialogue => "Player",
            NodeKind::WaitForFlag => "Has Flag",
            NodeKind::SetFlag => "Set Flag",
            NodeKind::ClearFlag => "Clear Flag",
            NodeKind::HasQuest => "Is Quest Active",
            NodeKind::StartQuest => "Start Quest",
            NodeKind::CompleteQuest => "Complete Quest",
            NodeKind::TriggerEvent => "Trigger Event",
        }
    }

    /// Integer code written by the binary export.
    pub fn code(self) -> i32 {
        match self {
            NodeKind::Start => 0,
            NodeKind::End => 1,
            NodeKind::NpcDialogue => 2,
            NodeKind::PlayerDialogue => 3,
            NodeKind::WaitForFlag => 4,
            NodeKind::SetFlag => 5,
            NodeKind::ClearFlag => 6,
            NodeKind::HasQuest => 7,
            NodeKind::StartQuest => 8,
            NodeKind::CompleteQuest => 9,
            NodeKind::TriggerEvent => 10,
        }
    }

    /// Whether outputs may be added or removed at runtime.
    pub fn can_edit_connectors(self) -> bool {
        matches!(self, NodeKind::NpcDialogue | NodeKind::PlayerDialogue)
    }

    /// Whether the node may be deleted, cut or copied.
    pub fn can_edit_node(self) -> bool {
        !matches!(self, NodeKind::Start | NodeKind::End)
    }

    pub fn layout(self) -> ConnectorLayout {
        let (input, outputs) = match self {
            NodeKind::Start => (None, vec![ConnectorSpec::fixed("")]),
            NodeKind::End => (Some(INPUT), vec![]),
            NodeKind::NpcDialogue => (Some(INPUT), vec![ConnectorSpec::editable("NPC Dialogue")]),
            NodeKind::PlayerDialogue => (
                Some(INPUT),
                vec![
                    ConnectorSpec::editable("Dialogue Option 1"),
                    ConnectorSpec::editable("Dialogue Option 2"),
                    ConnectorSpec::editable("Dialogue Option 3"),
                ],
            ),
            NodeKind::WaitForFlag => (Some(INPUT), vec![ConnectorSpec::editable("flagname"), ELSE]),
            NodeKind::SetFlag | NodeKind::ClearFlag => {
                (Some(INPUT), vec![ConnectorSpec::editable("flagname")])
            }
            NodeKind::HasQuest => (Some(INPUT), vec![ConnectorSpec::editable("questname"), ELSE]),
            NodeKind::StartQuest | NodeKind::CompleteQuest => {
                (Some(INPUT), vec![ConnectorSpec::editable("questname")])
            }
            NodeKind::TriggerEvent => (Some(INPUT), vec![ConnectorSpec::editable("eventname")]),
        };
        ConnectorLayout { input, outputs }
    }

    /// Look a kind up by its display name.
    pub fn lookup(name: &str) -> Option<NodeKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    pub fn from_code(code: i32) -> Option<NodeKind> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeKind {
    type Err = NedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::lookup(s).ok_or_else(|| NedError::UnknownKind { name: s.to_string() })
    }
}
