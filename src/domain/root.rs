//! Entry node of a tree: fatal availability gate and help interception.

use std::fmt;

use tracing::{debug, instrument};

use crate::domain::arena::CommandTree;
use crate::domain::caller::{Caller, Invocation};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::filter::filter_prefix;
use crate::domain::helper::HelperNode;
use crate::domain::node::{
    available_children, complete_children, dispatch_children, CommandNode, Node,
};

pub struct RootNode<P, C> {
    node: Node<P>,
    helper: HelperNode<P, C>,
}

impl<P, C> RootNode<P, C> {
    pub fn new(node: Node<P>, helper: HelperNode<P, C>) -> Self {
        Self { node, helper }
    }

    pub fn helper(&self) -> &HelperNode<P, C> {
        &self.helper
    }

    fn is_helper(&self, token: &str) -> bool {
        token == self.helper.label()
    }
}

impl<P, C> CommandNode<P, C> for RootNode<P, C>
where
    P: fmt::Display + Send + Sync,
    C: Caller,
{
    fn node(&self) -> &Node<P> {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node<P> {
        &mut self.node
    }

    fn reserved_label(&self) -> Option<&str> {
        Some(self.helper.label())
    }

    #[instrument(level = "trace", skip(self, tree, caller, invocation))]
    fn dispatch(
        &self,
        tree: &CommandTree<P, C>,
        caller: &C,
        invocation: &Invocation<'_>,
        arguments: &[String],
    ) -> TreeResult<bool> {
        if !self.is_available() {
            return Err(TreeError::NotAvailableCommand(invocation.command.to_string()));
        }

        if let Some((head, rest)) = arguments.split_first() {
            if self.is_helper(head) {
                debug!("'{}' routed to the helper", head);
                return Ok(self.helper.dispatch(tree, caller, rest));
            }
        }

        dispatch_children(&self.node, tree, caller, invocation, arguments)
    }

    #[instrument(level = "trace", skip(self, tree, caller, invocation))]
    fn complete(
        &self,
        tree: &CommandTree<P, C>,
        caller: &C,
        invocation: &Invocation<'_>,
        arguments: &[String],
    ) -> Vec<String> {
        if !self.is_available() {
            return Vec::new();
        }

        match arguments {
            [token] => {
                let labels = available_children(&self.node, tree)
                    .map(|c| c.label())
                    .chain(std::iter::once(self.helper.label()));
                filter_prefix(labels, token)
            }
            [head, rest @ ..] if self.is_helper(head) => self.helper.complete(tree, caller, rest),
            _ => complete_children(&self.node, tree, caller, invocation, arguments),
        }
    }
}
