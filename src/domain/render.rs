//! Text rendering of a command tree.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::CommandTree;

/// Marker appended to nodes whose gate is currently closed.
pub const UNAVAILABLE_MARKER: &str = " (unavailable)";

pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<P, C> TreeRender for CommandTree<P, C> {
    fn to_tree_string(&self) -> Tree<String> {
        fn build<P, C>(tree: &CommandTree<P, C>, index: Index) -> Option<Tree<String>> {
            let node = tree.get(index)?;
            let mut text = node.label().to_string();
            if !node.is_available() {
                text.push_str(UNAVAILABLE_MARKER);
            }
            let leaves = node
                .children()
                .values()
                .filter_map(|&child| build(tree, child));
            Some(Tree::new(text).with_leaves(leaves))
        }

        build(self, self.root()).unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}
