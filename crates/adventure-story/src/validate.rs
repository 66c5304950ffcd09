//! Structural validation of a nested story tree.
//!
//! Runs immediately after parsing, before any trust is extended to the
//! generated tree: nothing reaches storage without passing here.

use adventure_core::error::DomainError;

use crate::tree::{MAX_DEPTH, MAX_OPTIONS, MIN_DEPTH, MIN_OPTIONS, StoryTree, TreeNode};

/// Checks the structural invariants of a story tree.
///
/// Rules: the title and every node's content are non-empty; ending nodes
/// have no options and non-ending nodes have 2–3; only ending nodes may be
/// winning; every root-to-ending path is 3–4 levels deep (root = level 1);
/// at least one ending is winning.
///
/// # Errors
///
/// Returns `DomainError::Structure` naming the violated rule and the
/// offending node. Nodes are identified by their option path from the
/// root, e.g. `root.2.1` is the second option of the root's third child.
pub fn validate(tree: &StoryTree) -> Result<(), DomainError> {
    if tree.title.trim().is_empty() {
        return Err(DomainError::Structure("story title is empty".to_owned()));
    }

    let mut winning_endings = 0usize;
    walk(&tree.root_node, 1, "root", &mut winning_endings)?;

    if winning_endings == 0 {
        return Err(DomainError::Structure(
            "story has no winning ending".to_owned(),
        ));
    }

    Ok(())
}

fn walk(
    node: &TreeNode,
    depth: usize,
    path: &str,
    winning_endings: &mut usize,
) -> Result<(), DomainError> {
    if node.content.trim().is_empty() {
        return Err(DomainError::Structure(format!(
            "node {path} has empty content"
        )));
    }

    if depth > MAX_DEPTH {
        return Err(DomainError::Structure(format!(
            "node {path} is at depth {depth}, beyond the maximum of {MAX_DEPTH}"
        )));
    }

    if node.is_ending {
        if !node.options.is_empty() {
            return Err(DomainError::Structure(format!(
                "node {path} is marked ending but has {} options",
                node.options.len()
            )));
        }
        if depth < MIN_DEPTH {
            return Err(DomainError::Structure(format!(
                "ending node {path} is at depth {depth}; endings must lie at depth {MIN_DEPTH}-{MAX_DEPTH}"
            )));
        }
        if node.is_winning_ending {
            *winning_endings += 1;
        }
        return Ok(());
    }

    if node.is_winning_ending {
        return Err(DomainError::Structure(format!(
            "node {path} is marked winning but is not an ending"
        )));
    }

    if node.options.is_empty() {
        return Err(DomainError::Structure(format!(
            "node {path} has 0 options but is not marked ending"
        )));
    }

    if node.options.len() < MIN_OPTIONS || node.options.len() > MAX_OPTIONS {
        return Err(DomainError::Structure(format!(
            "node {path} has {} options; non-ending nodes must have {MIN_OPTIONS}-{MAX_OPTIONS}",
            node.options.len()
        )));
    }

    for (index, option) in node.options.iter().enumerate() {
        let child_path = format!("{path}.{index}");
        walk(&option.next_node, depth + 1, &child_path, winning_endings)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeOption;

    fn ending(content: &str, winning: bool) -> TreeNode {
        TreeNode {
            content: content.to_owned(),
            is_ending: true,
            is_winning_ending: winning,
            options: Vec::new(),
        }
    }

    fn branch(content: &str, options: Vec<(&str, TreeNode)>) -> TreeNode {
        TreeNode {
            content: content.to_owned(),
            is_ending: false,
            is_winning_ending: false,
            options: options
                .into_iter()
                .map(|(text, next_node)| TreeOption {
                    text: text.to_owned(),
                    next_node,
                })
                .collect(),
        }
    }

    /// A minimal valid tree: three levels, two options per branch, one
    /// winning ending.
    fn valid_tree() -> StoryTree {
        StoryTree {
            title: "The Hollow Crown".to_owned(),
            root_node: branch(
                "You stand at the gates.",
                vec![
                    (
                        "Enter",
                        branch(
                            "The hall is empty.",
                            vec![
                                ("Take the crown", ending("You rule.", true)),
                                ("Flee", ending("You are lost to the moors.", false)),
                            ],
                        ),
                    ),
                    (
                        "Circle the walls",
                        branch(
                            "A postern gate stands ajar.",
                            vec![
                                ("Slip inside", ending("Guards seize you.", false)),
                                ("Wait for dark", ending("You freeze by dawn.", false)),
                            ],
                        ),
                    ),
                ],
            ),
        }
    }

    #[test]
    fn test_valid_tree_passes() {
        assert!(validate(&valid_tree()).is_ok());
    }

    #[test]
    fn test_depth_four_is_accepted() {
        let mut tree = valid_tree();
        // Replace one depth-3 ending with a branch whose endings sit at
        // depth 4.
        tree.root_node.options[0].next_node.options[0].next_node = branch(
            "A stair descends.",
            vec![
                ("Descend", ending("The vault is yours.", true)),
                ("Turn back", ending("The door seals forever.", false)),
            ],
        );

        assert!(validate(&tree).is_ok());
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let mut tree = valid_tree();
        tree.title = "  ".to_owned();

        let err = validate(&tree).unwrap_err();
        assert!(matches!(err, DomainError::Structure(_)));
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_non_ending_without_options_is_rejected() {
        let mut tree = valid_tree();
        tree.root_node.options[0].next_node.options.clear();

        let err = validate(&tree).unwrap_err();
        assert!(
            err.to_string()
                .contains("has 0 options but is not marked ending")
        );
    }

    #[test]
    fn test_single_option_is_rejected() {
        let mut tree = valid_tree();
        tree.root_node.options[0].next_node.options.truncate(1);

        let err = validate(&tree).unwrap_err();
        assert!(err.to_string().contains("non-ending nodes must have 2-3"));
    }

    #[test]
    fn test_four_options_are_rejected() {
        let mut tree = valid_tree();
        let extra = TreeOption {
            text: "Shout".to_owned(),
            next_node: branch(
                "Echoes answer.",
                vec![
                    ("Listen", ending("Nothing comes.", false)),
                    ("Run", ending("You escape.", true)),
                ],
            ),
        };
        tree.root_node.options.push(extra.clone());
        tree.root_node.options.push(extra);

        let err = validate(&tree).unwrap_err();
        assert!(err.to_string().contains("has 4 options"));
    }

    #[test]
    fn test_ending_with_options_is_rejected() {
        let mut tree = valid_tree();
        let node = &mut tree.root_node.options[0].next_node;
        node.is_ending = true;

        let err = validate(&tree).unwrap_err();
        assert!(err.to_string().contains("marked ending but has 2 options"));
    }

    #[test]
    fn test_winning_non_ending_is_rejected() {
        let mut tree = valid_tree();
        tree.root_node.options[0].next_node.is_winning_ending = true;

        let err = validate(&tree).unwrap_err();
        assert!(
            err.to_string()
                .contains("marked winning but is not an ending")
        );
    }

    #[test]
    fn test_tree_without_winning_ending_is_rejected() {
        let mut tree = valid_tree();
        tree.root_node.options[0].next_node.options[0]
            .next_node
            .is_winning_ending = false;

        let err = validate(&tree).unwrap_err();
        assert!(err.to_string().contains("no winning ending"));
    }

    #[test]
    fn test_ending_above_minimum_depth_is_rejected() {
        let mut tree = valid_tree();
        tree.root_node.options[1].next_node = ending("A portcullis falls.", false);

        let err = validate(&tree).unwrap_err();
        assert!(err.to_string().contains("is at depth 2"));
    }

    #[test]
    fn test_node_below_maximum_depth_is_rejected() {
        let mut tree = valid_tree();
        // Push one path to depth 5.
        tree.root_node.options[0].next_node.options[0].next_node = branch(
            "A stair descends.",
            vec![
                (
                    "Descend",
                    branch(
                        "A second stair descends.",
                        vec![
                            ("Descend again", ending("Too deep.", true)),
                            ("Turn back", ending("Lost.", false)),
                        ],
                    ),
                ),
                ("Turn back", ending("The door seals.", false)),
            ],
        );

        let err = validate(&tree).unwrap_err();
        assert!(err.to_string().contains("depth 5"));
    }

    #[test]
    fn test_error_names_offending_node_path() {
        let mut tree = valid_tree();
        tree.root_node.options[1].next_node.options[0]
            .next_node
            .content = String::new();

        let err = validate(&tree).unwrap_err();
        assert!(err.to_string().contains("root.1.0"));
    }
}
