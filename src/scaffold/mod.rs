//! Declarative layout descriptions and the YAML scaffold files that carry them.

mod scaffold;
mod tree;

pub use scaffold::{Scaffold, ScaffoldLoadError, ScaffoldSource};
pub use tree::{Entry, ROOT_FILES_KEY, TreeNode};
