//! Flattening and hydration between the nested and flat representations.
//!
//! Persistence stores nodes as independent rows, so a nested tree is
//! flattened before saving and a flat node collection is hydrated back
//! into a tree when one is needed. Flattening is deterministic: traversal
//! is pre-order (parent before children, options in declaration order),
//! and that order defines the positional identifiers.

use std::collections::{HashMap, HashSet};

use adventure_core::error::DomainError;
use adventure_core::story::{FlatNode, FlatOption, StoredNode, StoredOption};

use crate::tree::{StoryTree, TreeNode, TreeOption};

/// Flattens a nested tree into pre-order positional nodes.
///
/// The root lands at index 0; each option references the index of its
/// target node. The output order is deterministic for a given tree.
#[must_use]
pub fn flatten(tree: &StoryTree) -> Vec<FlatNode> {
    let mut nodes = Vec::new();
    visit(&tree.root_node, &mut nodes);
    nodes
}

fn visit(node: &TreeNode, nodes: &mut Vec<FlatNode>) -> usize {
    let index = nodes.len();
    nodes.push(FlatNode {
        content: node.content.clone(),
        is_ending: node.is_ending,
        is_winning_ending: node.is_winning_ending,
        options: Vec::with_capacity(node.options.len()),
    });

    for option in &node.options {
        let next_index = visit(&option.next_node, nodes);
        nodes[index].options.push(FlatOption {
            text: option.text.clone(),
            next_index,
        });
    }

    index
}

/// Rewrites positional option targets to storage-assigned identifiers.
///
/// `ids[i]` is the durable identifier assigned to `nodes[i]`; the node at
/// index 0 becomes the root. Repositories share this mapping so that the
/// flat-to-stored step behaves identically everywhere.
///
/// # Errors
///
/// Returns `DomainError::Integrity` if the id count does not match the
/// node count or an option references an out-of-range index.
pub fn bind_ids(nodes: &[FlatNode], ids: &[i64]) -> Result<Vec<StoredNode>, DomainError> {
    if nodes.len() != ids.len() {
        return Err(DomainError::Integrity(format!(
            "{} nodes but {} assigned ids",
            nodes.len(),
            ids.len()
        )));
    }

    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let options = node
                .options
                .iter()
                .map(|option| {
                    let node_id = ids.get(option.next_index).copied().ok_or_else(|| {
                        DomainError::Integrity(format!(
                            "option on node {index} references index {} of {}",
                            option.next_index,
                            nodes.len()
                        ))
                    })?;
                    Ok(StoredOption {
                        text: option.text.clone(),
                        node_id,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;

            Ok(StoredNode {
                id: ids[index],
                content: node.content.clone(),
                is_root: index == 0,
                is_ending: node.is_ending,
                is_winning_ending: node.is_winning_ending,
                options,
            })
        })
        .collect()
}

/// Reconstructs the nested tree rooted at `root_id` from persisted nodes.
///
/// Inverse of [`flatten`] (after [`bind_ids`]): the returned node embeds
/// its whole subtree, with options in stored order.
///
/// # Errors
///
/// Returns `DomainError::Integrity` if the root or any option target is
/// missing from the collection, or if a node is reachable along more than
/// one path (a cycle or a shared child) — a defensive check, since
/// flattening never produces either.
pub fn hydrate(nodes: &[StoredNode], root_id: i64) -> Result<TreeNode, DomainError> {
    let by_id: HashMap<i64, &StoredNode> = nodes.iter().map(|node| (node.id, node)).collect();
    let mut reached = HashSet::new();
    build(&by_id, &mut reached, root_id)
}

fn build(
    by_id: &HashMap<i64, &StoredNode>,
    reached: &mut HashSet<i64>,
    id: i64,
) -> Result<TreeNode, DomainError> {
    let node = by_id
        .get(&id)
        .ok_or_else(|| DomainError::Integrity(format!("node {id} is missing from the story")))?;

    if !reached.insert(id) {
        return Err(DomainError::Integrity(format!(
            "node {id} is reachable along more than one path"
        )));
    }

    let options = node
        .options
        .iter()
        .map(|option| {
            Ok(TreeOption {
                text: option.text.clone(),
                next_node: build(by_id, reached, option.node_id)?,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    Ok(TreeNode {
        content: node.content.clone(),
        is_ending: node.is_ending,
        is_winning_ending: node.is_winning_ending,
        options,
    })
}
