//! Error types for the editor core.
//!
//! Only persistence and document handling can fail. Structural edits that the
//! UI should never be able to request (linking two inputs, deleting the start
//! node, ...) are rejected silently and reported through return values.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Errors produced while loading, saving or exporting a graph.
#[derive(Debug, Error)]
pub enum NedError {
    /// The underlying file could not be read or written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON document is malformed or does not match the record layout.
    #[error("malformed graph document: {0}")]
    Json(#[from] serde_json::Error),

    /// A node record names a kind that is not in the catalog.
    #[error("node kind not found: '{name}'")]
    UnknownKind { name: String },

    /// A connection record points at a node ID that is not in the document.
    #[error("unknown node referenced: {id}")]
    UnknownNode { id: Uuid },

    /// A connection record links to a connection ID that is not in the document.
    #[error("unknown connection referenced: {id}")]
    UnknownConnection { id: Uuid },

    /// Two records in the same document share an ID.
    #[error("duplicate id in document: {id}")]
    DuplicateId { id: Uuid },

    /// A connection record sits in the wrong slot (an output stored as input or vice versa).
    #[error("connection {id} is stored on the wrong side of its node")]
    SideMismatch { id: Uuid },

    /// A connection record names a parent other than the node it is stored in.
    #[error("connection {id} names a parent node it does not belong to")]
    OwnerMismatch { id: Uuid },

    /// A stored link does not join an output to an input on another node.
    #[error("connection {id} holds an invalid link")]
    InvalidLink { id: Uuid },

    /// `save` was requested before the document was ever saved or opened.
    #[error("document has no file name yet")]
    NoDocumentPath,

    /// The editor configuration file could not be used.
    #[error("invalid configuration at {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, NedError>;
