//! Storage-shape story types.
//!
//! Persistence stores nodes as independent rows, not nested structures.
//! `FlatNode` is the pre-persistence shape produced by flattening a nested
//! tree: node identity is positional (the root is index 0) and options
//! reference sibling indices. `StoredNode` is the post-persistence shape:
//! identity is the storage-assigned id and options reference storage ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An option on a flattened, not-yet-persisted node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatOption {
    /// The choice text shown to the reader.
    pub text: String,
    /// Pre-order index of the node this option leads to.
    pub next_index: usize,
}

/// A flattened, not-yet-persisted story node.
///
/// The node's own identifier is its position in the flattened collection;
/// the node at index 0 is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    /// Narrative text for this point in the story.
    pub content: String,
    /// True if this node has no outgoing options.
    pub is_ending: bool,
    /// True if this ending is a successful outcome.
    pub is_winning_ending: bool,
    /// Ordered outgoing options; empty iff `is_ending`.
    pub options: Vec<FlatOption>,
}

/// An option on a persisted node, as stored in the options column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOption {
    /// The choice text shown to the reader.
    pub text: String,
    /// Storage identifier of the node this option leads to.
    pub node_id: i64,
}

/// A persisted story node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNode {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Narrative text for this point in the story.
    pub content: String,
    /// True for exactly one node per story.
    pub is_root: bool,
    /// True if this node has no outgoing options.
    pub is_ending: bool,
    /// True if this ending is a successful outcome.
    pub is_winning_ending: bool,
    /// Ordered outgoing options; empty iff `is_ending`.
    pub options: Vec<StoredOption>,
}

/// The persisted story header row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRecord {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Story title from the generated tree.
    pub title: String,
    /// Opaque client session identifier.
    pub session_id: String,
    /// When the story was persisted.
    pub created_at: DateTime<Utc>,
}
