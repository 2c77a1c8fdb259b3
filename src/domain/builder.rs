//! Fluent assembly of command trees.

use std::fmt;
use std::sync::Arc;

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::CommandTree;
use crate::domain::caller::{Caller, Invocation};
use crate::domain::error::TreeResult;
use crate::domain::helper::{Displayer, HelperNode, DEFAULT_HELPER_LABEL};
use crate::domain::node::{Availability, CommandNode, Node};
use crate::domain::wrapper::{Completer, Executor, HookError, NodeWrapper};

/// Builds a [`CommandTree`] top-down.
///
/// ```ignore
/// let tree = TreeBuilder::new("admin", "server administration")
///     .node("config", "configuration", |config| {
///         config.leaf("set", "sets a value")
///     })
///     .build()?;
/// ```
pub struct TreeBuilder<P, C> {
    root: Node<P>,
    helper_label: String,
    separator: Option<String>,
    displayer: Option<Displayer<P, C>>,
    children: Vec<NodeBuilder<P, C>>,
}

impl<P, C> TreeBuilder<P, C>
where
    P: fmt::Display + Send + Sync + 'static,
    C: Caller + 'static,
{
    pub fn new(label: impl Into<String>, payload: P) -> Self {
        Self {
            root: Node::new(label, payload),
            helper_label: DEFAULT_HELPER_LABEL.to_string(),
            separator: None,
            displayer: None,
            children: Vec::new(),
        }
    }

    /// Gate the whole command; a closed gate makes every dispatch fail.
    pub fn available_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.root = self.root.available_when(predicate);
        self
    }

    pub fn helper_label(mut self, label: impl Into<String>) -> Self {
        self.helper_label = label.into();
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn displayer<F>(mut self, displayer: F) -> Self
    where
        F: Fn(&C, &dyn CommandNode<P, C>) -> String + Send + Sync + 'static,
    {
        self.displayer = Some(Arc::new(displayer));
        self
    }

    pub fn node<F>(self, label: impl Into<String>, payload: P, configure: F) -> Self
    where
        F: FnOnce(NodeBuilder<P, C>) -> NodeBuilder<P, C>,
    {
        self.child(configure(NodeBuilder::new(label, payload)))
    }

    pub fn leaf(self, label: impl Into<String>, payload: P) -> Self {
        self.child(NodeBuilder::new(label, payload))
    }

    pub fn child(mut self, child: NodeBuilder<P, C>) -> Self {
        self.children.push(child);
        self
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build(self) -> TreeResult<CommandTree<P, C>> {
        let TreeBuilder {
            root,
            helper_label,
            separator,
            displayer,
            children,
        } = self;

        let mut tree = CommandTree::with_helper(root, |source| {
            let mut helper = HelperNode::new(helper_label, source);
            if let Some(separator) = separator {
                helper = helper.with_separator(separator);
            }
            if let Some(displayer) = displayer {
                helper = helper.with_displayer(displayer);
            }
            helper
        });

        let root = tree.root();
        for child in children {
            child.attach_to(&mut tree, root)?;
        }
        Ok(tree)
    }
}

/// One pending node with its hooks and children.
pub struct NodeBuilder<P, C> {
    node: Node<P>,
    executor: Option<Executor<C>>,
    completer: Option<Completer<C>>,
    children: Vec<NodeBuilder<P, C>>,
}

impl<P, C> NodeBuilder<P, C> {
    pub fn new(label: impl Into<String>, payload: P) -> Self {
        Self {
            node: Node::new(label, payload),
            executor: None,
            completer: None,
            children: Vec::new(),
        }
    }

    pub fn available_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.node = self.node.available_when(predicate);
        self
    }

    pub fn availability(mut self, availability: Availability) -> Self {
        self.node = self.node.with_availability(availability);
        self
    }

    pub fn with_executor<F>(mut self, executor: F) -> Self
    where
        F: Fn(&C, &Invocation<'_>, &[String]) -> Result<bool, HookError> + Send + Sync + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn with_completer<F>(mut self, completer: F) -> Self
    where
        F: Fn(&C, &Invocation<'_>, &[String]) -> Result<Vec<String>, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.completer = Some(Arc::new(completer));
        self
    }

    pub fn node<F>(self, label: impl Into<String>, payload: P, configure: F) -> Self
    where
        F: FnOnce(NodeBuilder<P, C>) -> NodeBuilder<P, C>,
    {
        self.child(configure(NodeBuilder::new(label, payload)))
    }

    pub fn leaf(self, label: impl Into<String>, payload: P) -> Self {
        self.child(NodeBuilder::new(label, payload))
    }

    pub fn child(mut self, child: NodeBuilder<P, C>) -> Self {
        self.children.push(child);
        self
    }

    /// Insert this node (as a wrapper when it carries hooks) and its
    /// subtree under `parent`.
    pub fn attach_to(self, tree: &mut CommandTree<P, C>, parent: Index) -> TreeResult<Index>
    where
        P: Send + Sync + 'static,
        C: 'static,
    {
        let NodeBuilder {
            node,
            executor,
            completer,
            children,
        } = self;

        let index = if executor.is_none() && completer.is_none() {
            tree.add(parent, node)?
        } else {
            tree.add(parent, NodeWrapper::new(node).with_hooks(executor, completer))?
        };

        for child in children {
            child.attach_to(tree, index)?;
        }
        Ok(index)
    }
}
