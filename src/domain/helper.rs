//! Explanation traversal bound to a source node.

use std::fmt;
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::CommandTree;
use crate::domain::caller::Caller;
use crate::domain::filter::filter_prefix;
use crate::domain::node::{available_children, lookup, CommandNode};

/// Label the root reserves for its helper unless configured otherwise.
pub const DEFAULT_HELPER_LABEL: &str = "help";

/// Separator of the default `label - explanation` rendering.
pub const DEFAULT_SEPARATOR: &str = " - ";

/// Renders one help line for a caller.
pub type Displayer<P, C> = Arc<dyn Fn(&C, &dyn CommandNode<P, C>) -> String + Send + Sync>;

/// Walks the children of its source node and emits their explanations.
///
/// Holds no per-call state: the caller is a parameter of every operation,
/// so one helper serves any number of concurrent callers.
pub struct HelperNode<P, C> {
    label: String,
    source: Index,
    separator: String,
    displayer: Option<Displayer<P, C>>,
}

impl<P, C> HelperNode<P, C> {
    pub fn new(label: impl Into<String>, source: Index) -> Self {
        Self {
            label: label.into(),
            source,
            separator: DEFAULT_SEPARATOR.to_string(),
            displayer: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_displayer(mut self, displayer: Displayer<P, C>) -> Self {
        self.displayer = Some(displayer);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> Index {
        self.source
    }

    /// Follow `path` from the source by exact label. A missing node ends the
    /// walk unresolved; with `available_only`, so does a closed gate.
    fn resolve<'t>(
        &self,
        tree: &'t CommandTree<P, C>,
        path: &[String],
        available_only: bool,
    ) -> Option<&'t dyn CommandNode<P, C>> {
        let mut current = tree.get(self.source)?;
        for segment in path {
            current = lookup(current.node(), tree, segment)
                .filter(|n| !available_only || n.is_available())?;
        }
        Some(current)
    }

    /// Completion of `help <path>`: children of the node the path resolves
    /// to, filtered by the last token.
    #[instrument(level = "trace", skip(self, tree, _caller))]
    pub fn complete(&self, tree: &CommandTree<P, C>, _caller: &C, arguments: &[String]) -> Vec<String> {
        let Some((last, path)) = arguments.split_last() else {
            return Vec::new();
        };
        match self.resolve(tree, path, true) {
            Some(node) => filter_prefix(available_children(node.node(), tree).map(|c| c.label()), last),
            None => Vec::new(),
        }
    }
}

impl<P: fmt::Display, C: Caller> HelperNode<P, C> {
    /// Render the help line of `node` for `caller`.
    pub fn render(&self, caller: &C, node: &dyn CommandNode<P, C>) -> String {
        match &self.displayer {
            Some(displayer) => displayer(caller, node),
            None => format!("{}{}{}", node.label(), self.separator, node.payload()),
        }
    }

    fn display(&self, caller: &C, node: &dyn CommandNode<P, C>) {
        caller.send_message(&self.render(caller, node));
    }

    /// Without arguments, explain every available child of the source.
    /// With a path, explain the node it resolves to, gated or not, and
    /// preview its available children. Returns false when a label on the
    /// path does not exist.
    #[instrument(level = "trace", skip(self, tree, caller))]
    pub fn dispatch(&self, tree: &CommandTree<P, C>, caller: &C, arguments: &[String]) -> bool {
        let Some(target) = self.resolve(tree, arguments, false) else {
            debug!("help path does not resolve: {:?}", arguments);
            return false;
        };

        if !arguments.is_empty() {
            self.display(caller, target);
        }
        for child in available_children(target.node(), tree) {
            self.display(caller, child);
        }
        true
    }
}
