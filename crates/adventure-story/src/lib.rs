//! Adventure — Story Tree Model.
//!
//! Defines the canonical nested shape of a generated story, independent of
//! storage format, together with the operations that move between the
//! nested and flat representations: `validate`, `flatten`, `bind_ids`,
//! and `hydrate`.

pub mod flatten;
pub mod tree;
pub mod validate;

pub use flatten::{bind_ids, flatten, hydrate};
pub use tree::{StoryTree, TreeNode, TreeOption};
pub use validate::validate;
