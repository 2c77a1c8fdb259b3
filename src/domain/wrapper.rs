//! Per-node overrides of dispatch and completion without a new node type.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::arena::CommandTree;
use crate::domain::caller::Invocation;
use crate::domain::error::TreeResult;
use crate::domain::node::{CommandNode, Node};

/// Error type hooks may return; it never leaves the node boundary.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Replaces the routing below a node.
pub type Executor<C> =
    Arc<dyn Fn(&C, &Invocation<'_>, &[String]) -> Result<bool, HookError> + Send + Sync>;

/// Replaces the completion below a node.
pub type Completer<C> =
    Arc<dyn Fn(&C, &Invocation<'_>, &[String]) -> Result<Vec<String>, HookError> + Send + Sync>;

/// Decorator forwarding everything to the wrapped node unless an executor or
/// completer is set.
pub struct NodeWrapper<P, C> {
    source: Box<dyn CommandNode<P, C>>,
    executor: Option<Executor<C>>,
    completer: Option<Completer<C>>,
}

impl<P, C> NodeWrapper<P, C> {
    pub fn new(source: impl CommandNode<P, C> + 'static) -> Self {
        Self {
            source: Box::new(source),
            executor: None,
            completer: None,
        }
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

    pub(crate) fn with_hooks(
        mut self,
        executor: Option<Executor<C>>,
        completer: Option<Completer<C>>,
    ) -> Self {
        self.executor = executor;
        self.completer = completer;
        self
    }

    pub fn source(&self) -> &dyn CommandNode<P, C> {
        self.source.as_ref()
    }

    pub fn has_executor(&self) -> bool {
        self.executor.is_some()
    }

    pub fn has_completer(&self) -> bool {
        self.completer.is_some()
    }
}

impl<P, C> CommandNode<P, C> for NodeWrapper<P, C> {
    fn node(&self) -> &Node<P> {
        self.source.node()
    }

    fn node_mut(&mut self) -> &mut Node<P> {
        self.source.node_mut()
    }

    fn dispatch(
        &self,
        tree: &CommandTree<P, C>,
        caller: &C,
        invocation: &Invocation<'_>,
        arguments: &[String],
    ) -> TreeResult<bool> {
        match &self.executor {
            Some(executor) => {
                debug!("'{}' delegates dispatch to its executor", self.label());
                Ok(run_hook(self.label(), "executor", || executor(caller, invocation, arguments))
                    .unwrap_or(false))
            }
            None => self.source.dispatch(tree, caller, invocation, arguments),
        }
    }

    fn complete(
        &self,
        tree: &CommandTree<P, C>,
        caller: &C,
        invocation: &Invocation<'_>,
        arguments: &[String],
    ) -> Vec<String> {
        match &self.completer {
            Some(completer) => {
                run_hook(self.label(), "completer", || completer(caller, invocation, arguments))
                    .unwrap_or_default()
            }
            None => self.source.complete(tree, caller, invocation, arguments),
        }
    }
}

/// Run a hook, turning both an error and a panic into `None`.
fn run_hook<T>(label: &str, hook: &str, f: impl FnOnce() -> Result<T, HookError>) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!(node = label, hook, error = %e, "hook failed");
            None
        }
        Err(_) => {
            warn!(node = label, hook, "hook panicked");
            None
        }
    }
}
