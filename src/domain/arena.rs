use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::caller::{Caller, Invocation};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::filter::{tokenize, tokenize_partial};
use crate::domain::helper::{HelperNode, DEFAULT_HELPER_LABEL};
use crate::domain::node::{CommandNode, Node};
use crate::domain::root::RootNode;

/// Arena-based command tree.
///
/// The arena owns every node; children and parent links are generational
/// indices, so parent back-references never own and a stale index simply
/// resolves to nothing. The root always lives at [`CommandTree::root`].
pub struct CommandTree<P, C> {
    /// Arena storage for all nodes, attached or not
    arena: Arena<Box<dyn CommandNode<P, C>>>,
    /// Index of the root node
    root: Index,
}

impl<P, C> CommandTree<P, C>
where
    P: fmt::Display + Send + Sync + 'static,
    C: Caller + 'static,
{
    /// Tree whose root helper answers to the default `help` label.
    pub fn new(root: Node<P>) -> Self {
        Self::with_helper(root, |source| HelperNode::new(DEFAULT_HELPER_LABEL, source))
    }

    /// Tree whose root helper is built by `helper` from the root's index.
    pub fn with_helper<F>(root: Node<P>, helper: F) -> Self
    where
        F: FnOnce(Index) -> HelperNode<P, C>,
    {
        let mut arena: Arena<Box<dyn CommandNode<P, C>>> = Arena::new();
        let root = arena.insert_with(|index| {
            Box::new(RootNode::new(root, helper(index))) as Box<dyn CommandNode<P, C>>
        });
        Self { arena, root }
    }
}

impl<P, C> CommandTree<P, C> {
    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &dyn CommandNode<P, C> {
        self.arena[self.root].as_ref()
    }

    pub fn get(&self, index: Index) -> Option<&dyn CommandNode<P, C>> {
        self.arena.get(index).map(|node| node.as_ref())
    }

    /// Label reserved by the root for its helper.
    pub fn helper_label(&self) -> Option<&str> {
        self.root_node().reserved_label()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Store `node` without a parent; it stays unreachable until attached.
    #[instrument(level = "trace", skip_all)]
    pub fn insert_detached(&mut self, node: impl CommandNode<P, C> + 'static) -> Index {
        self.arena.insert(Box::new(node))
    }

    /// Insert `node` as a child of `parent`.
    ///
    /// On failure the node is dropped and the tree is left unchanged.
    pub fn add(&mut self, parent: Index, node: impl CommandNode<P, C> + 'static) -> TreeResult<Index> {
        let index = self.insert_detached(node);
        if let Err(e) = self.attach(parent, index) {
            self.arena.remove(index);
            return Err(e);
        }
        Ok(index)
    }

    /// Make the detached node `child` a child of `parent`.
    ///
    /// Fails when the child already has a parent, when its label is taken or
    /// reserved under `parent`, or when `child` is `parent` or one of its
    /// ancestors (the root included).
    #[instrument(level = "debug", skip(self))]
    pub fn attach(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        let child_node = self.get(child).ok_or(TreeError::UnknownNode(child))?;
        let parent_node = self.get(parent).ok_or(TreeError::UnknownNode(parent))?;
        let label = child_node.label().to_string();

        if child == self.root || self.is_ancestor(child, parent) {
            return Err(TreeError::CycleDetected {
                parent: parent_node.label().to_string(),
                child: label,
            });
        }
        if child_node.parent().is_some() {
            return Err(TreeError::AlreadyAttached(label));
        }
        if parent_node.reserved_label() == Some(label.as_str()) {
            return Err(TreeError::ReservedLabel(label));
        }
        if parent_node.children().contains_key(&label) {
            return Err(TreeError::DuplicateLabel {
                parent: parent_node.label().to_string(),
                label,
            });
        }

        debug!("attaching '{}' under '{}'", label, parent_node.label());
        if let Some(node) = self.arena.get_mut(parent) {
            node.node_mut().insert_child(label, child);
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.node_mut().set_parent(Some(parent));
        }
        Ok(())
    }

    /// True when `candidate` is `node` or lies on its parent chain.
    pub fn is_ancestor(&self, candidate: Index, node: Index) -> bool {
        let mut current = Some(node);
        while let Some(index) = current {
            if index == candidate {
                return true;
            }
            current = self.get(index).and_then(|n| n.parent());
        }
        false
    }

    /// Exact label path from the root, ignoring availability.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<Index> {
        path.iter().try_fold(self.root, |index, label| {
            self.get(index)?.children().get(label.as_ref()).copied()
        })
    }

    /// Labels from the root down to `index`, root excluded.
    pub fn path_of(&self, index: Index) -> Vec<String> {
        let mut labels = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            let Some(node) = self.get(i) else { break };
            if node.parent().is_some() {
                labels.push(node.label().to_string());
            }
            current = node.parent();
        }
        labels.reverse();
        labels
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, index: Index) -> usize {
        if let Some(node) = self.get(index) {
            1 + node
                .children()
                .values()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Depth-first traversal of the attached nodes, root first, children in
    /// label order.
    pub fn iter(&self) -> TreeIterator<'_, P, C> {
        TreeIterator::new(self)
    }

    pub fn dispatch(&self, caller: &C, arguments: &[String]) -> TreeResult<bool> {
        self.dispatch_as(caller, self.root_node().label(), arguments)
    }

    /// Dispatch a call made under `alias`; hooks see the alias in their
    /// [`Invocation`].
    #[instrument(level = "debug", skip(self, caller))]
    pub fn dispatch_as(&self, caller: &C, alias: &str, arguments: &[String]) -> TreeResult<bool> {
        let root = self.root_node();
        let invocation = Invocation {
            command: root.label(),
            alias,
            arguments,
        };
        root.dispatch(self, caller, &invocation, arguments)
    }

    pub fn dispatch_line(&self, caller: &C, line: &str) -> TreeResult<bool> {
        self.dispatch(caller, &tokenize(line))
    }

    #[instrument(level = "debug", skip(self, caller))]
    pub fn complete(&self, caller: &C, arguments: &[String]) -> Vec<String> {
        let root = self.root_node();
        let invocation = Invocation {
            command: root.label(),
            alias: root.label(),
            arguments,
        };
        root.complete(self, caller, &invocation, arguments)
    }

    /// Complete a line that is still being typed; a trailing space asks for
    /// the next word.
    pub fn complete_line(&self, caller: &C, line: &str) -> Vec<String> {
        self.complete(caller, &tokenize_partial(line))
    }
}

impl<P, C> fmt::Debug for CommandTree<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("root", &self.root_node().label())
            .field("nodes", &self.arena.len())
            .finish()
    }
}

pub struct TreeIterator<'a, P, C> {
    tree: &'a CommandTree<P, C>,
    stack: Vec<Index>,
}

impl<'a, P, C> TreeIterator<'a, P, C> {
    fn new(tree: &'a CommandTree<P, C>) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a, P, C> Iterator for TreeIterator<'a, P, C> {
    type Item = (Index, &'a dyn CommandNode<P, C>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.stack.pop() {
            if let Some(node) = self.tree.get(index) {
                // Push children in reverse order for label-order traversal
                self.stack.extend(node.children().values().rev().copied());
                return Some((index, node));
            }
        }
        None
    }
}
