//! Command nodes and the default routing shared by all node kinds.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::CommandTree;
use crate::domain::caller::Invocation;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::filter::filter_prefix;

/// Availability gate, re-evaluated on every traversal step touching the node.
pub type Availability = Arc<dyn Fn() -> bool + Send + Sync>;

/// Gate that is always open.
pub fn always_available() -> Availability {
    Arc::new(|| true)
}

/// Plain tree node: label, payload, availability gate, children and parent.
///
/// Children and parent are arena indices into the owning [`CommandTree`];
/// the parent link never owns anything.
pub struct Node<P> {
    label: String,
    payload: P,
    availability: Availability,
    children: BTreeMap<String, Index>,
    parent: Option<Index>,
}

impl<P> Node<P> {
    pub fn new(label: impl Into<String>, payload: P) -> Self {
        Self {
            label: label.into(),
            payload,
            availability: always_available(),
            children: BTreeMap::new(),
            parent: None,
        }
    }

    /// Gate this node (and its subtree) behind `predicate`.
    pub fn available_when<F>(self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.with_availability(Arc::new(predicate))
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn is_available(&self) -> bool {
        (self.availability)()
    }

    pub fn children(&self) -> &BTreeMap<String, Index> {
        &self.children
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Index>) {
        self.parent = parent;
    }

    pub(crate) fn insert_child(&mut self, label: String, child: Index) {
        self.children.insert(label, child);
    }
}

impl<P: fmt::Debug> fmt::Debug for Node<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("label", &self.label)
            .field("payload", &self.payload)
            .field("children", &self.children)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Capability interface every node kind implements.
///
/// Accessors forward to the underlying [`Node`]; `dispatch` and `complete`
/// default to the standard recursive routing and are what wrappers and the
/// root override.
pub trait CommandNode<P, C>: Send + Sync {
    fn node(&self) -> &Node<P>;

    fn node_mut(&mut self) -> &mut Node<P>;

    fn label<'a>(&'a self) -> &'a str
    where
        P: 'a,
    {
        self.node().label()
    }

    fn payload(&self) -> &P {
        self.node().payload()
    }

    fn is_available(&self) -> bool {
        self.node().is_available()
    }

    fn children<'a>(&'a self) -> &'a BTreeMap<String, Index>
    where
        P: 'a,
    {
        self.node().children()
    }

    fn parent(&self) -> Option<Index> {
        self.node().parent()
    }

    /// Label no ordinary child may use (the root's helper).
    fn reserved_label(&self) -> Option<&str> {
        None
    }

    fn dispatch(
        &self,
        tree: &CommandTree<P, C>,
        caller: &C,
        invocation: &Invocation<'_>,
        arguments: &[String],
    ) -> TreeResult<bool> {
        route_dispatch(self.node(), tree, caller, invocation, arguments)
    }

    fn complete(
        &self,
        tree: &CommandTree<P, C>,
        caller: &C,
        invocation: &Invocation<'_>,
        arguments: &[String],
    ) -> Vec<String> {
        route_complete(self.node(), tree, caller, invocation, arguments)
    }
}

impl<P: Send + Sync, C> CommandNode<P, C> for Node<P> {
    fn node(&self) -> &Node<P> {
        self
    }

    fn node_mut(&mut self) -> &mut Node<P> {
        self
    }
}

/// Exact child lookup; ignores availability.
pub(crate) fn lookup<'t, P, C>(
    node: &Node<P>,
    tree: &'t CommandTree<P, C>,
    label: &str,
) -> Option<&'t dyn CommandNode<P, C>> {
    node.children().get(label).and_then(|&index| tree.get(index))
}

/// Children whose gate is currently open, in label order.
pub(crate) fn available_children<'t, P, C>(
    node: &'t Node<P>,
    tree: &'t CommandTree<P, C>,
) -> impl Iterator<Item = &'t dyn CommandNode<P, C>> + 't {
    node.children()
        .values()
        .filter_map(move |&index| tree.get(index))
        .filter(|child| child.is_available())
}

pub(crate) fn route_dispatch<P, C>(
    node: &Node<P>,
    tree: &CommandTree<P, C>,
    caller: &C,
    invocation: &Invocation<'_>,
    arguments: &[String],
) -> TreeResult<bool> {
    if !node.is_available() {
        return Err(TreeError::NotAvailableArgument {
            command: invocation.command.to_string(),
            segment: node.label().to_string(),
        });
    }
    dispatch_children(node, tree, caller, invocation, arguments)
}

/// Routing below `node` once its own gate has been checked.
#[instrument(level = "trace", skip_all, fields(node = node.label()))]
pub(crate) fn dispatch_children<P, C>(
    node: &Node<P>,
    tree: &CommandTree<P, C>,
    caller: &C,
    invocation: &Invocation<'_>,
    arguments: &[String],
) -> TreeResult<bool> {
    let Some((head, rest)) = arguments.split_first() else {
        debug!("arguments exhausted at '{}'", node.label());
        return Ok(true);
    };

    let child = lookup(node, tree, head).ok_or_else(|| TreeError::NodeNotFound {
        command: node.label().to_string(),
        segment: head.clone(),
        arguments: invocation.arguments.to_vec(),
    })?;

    if !child.is_available() {
        return Err(TreeError::NotAvailableArgument {
            command: invocation.command.to_string(),
            segment: head.clone(),
        });
    }

    child.dispatch(tree, caller, invocation, rest)
}

pub(crate) fn route_complete<P, C>(
    node: &Node<P>,
    tree: &CommandTree<P, C>,
    caller: &C,
    invocation: &Invocation<'_>,
    arguments: &[String],
) -> Vec<String> {
    if !node.is_available() {
        return Vec::new();
    }
    complete_children(node, tree, caller, invocation, arguments)
}

#[instrument(level = "trace", skip_all, fields(node = node.label()))]
pub(crate) fn complete_children<P, C>(
    node: &Node<P>,
    tree: &CommandTree<P, C>,
    caller: &C,
    invocation: &Invocation<'_>,
    arguments: &[String],
) -> Vec<String> {
    match arguments {
        [] => Vec::new(),
        [token] => filter_prefix(available_children(node, tree).map(|c| c.label()), token),
        [head, rest @ ..] => match lookup(node, tree, head) {
            Some(child) if child.is_available() => child.complete(tree, caller, invocation, rest),
            _ => Vec::new(),
        },
    }
}
