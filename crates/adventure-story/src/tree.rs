//! Nested story tree types.
//!
//! These types mirror the text-generation contract: field names are
//! camelCase on the wire and option targets are embedded recursively.
//! Exactly one root exists by construction; the other structural
//! invariants are checked by [`crate::validate`].

use serde::{Deserialize, Serialize};

/// Minimum root-to-ending depth, counting the root as level 1.
pub const MIN_DEPTH: usize = 3;
/// Maximum root-to-ending depth, counting the root as level 1.
pub const MAX_DEPTH: usize = 4;
/// Minimum number of options on a non-ending node.
pub const MIN_OPTIONS: usize = 2;
/// Maximum number of options on a non-ending node.
pub const MAX_OPTIONS: usize = 3;

/// One complete generated narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryTree {
    /// The story title.
    pub title: String,
    /// The root node; every other node is embedded beneath it.
    pub root_node: TreeNode,
}

/// One point in the story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Narrative text for this point in the story.
    pub content: String,
    /// True if this node has no outgoing options.
    pub is_ending: bool,
    /// True if this ending is a successful outcome.
    pub is_winning_ending: bool,
    /// Ordered outgoing options; the generation service may omit the field
    /// entirely on ending nodes.
    #[serde(default)]
    pub options: Vec<TreeOption>,
}

/// A choice leading from one node to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeOption {
    /// The choice text shown to the reader.
    pub text: String,
    /// The node this choice leads to.
    pub next_node: TreeNode,
}
