//! Declarative TOML description of a command tree
//!
//! ```toml
//! label = "admin"
//! explanation = "server administration"
//!
//! [[nodes]]
//! label = "config"
//! explanation = "inspect configuration"
//!
//!   [[nodes.nodes]]
//!   label = "reload"
//!   explanation = "reloads the configuration"
//!   reply = "configuration reloaded"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    always_available, filter_prefix, Availability, Caller, CommandTree, Invocation, NodeBuilder,
    TreeBuilder,
};

/// Placeholder in a reply replaced by the remaining arguments.
pub const ARGS_PLACEHOLDER: &str = "{args}";

fn default_true() -> bool {
    true
}

/// One node of a manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ManifestNode {
    pub label: String,
    #[serde(default)]
    pub explanation: String,
    /// Static gate
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Node is available only while this environment variable is set
    #[serde(default)]
    pub enabled_env: Option<String>,
    /// Message sent to the caller when a dispatch reaches this node
    #[serde(default)]
    pub reply: Option<String>,
    /// Static completions for the argument following this node
    #[serde(default)]
    pub suggest: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<ManifestNode>,
}

impl ManifestNode {
    /// Gate combining `enabled` and `enabled_env`; the variable is re-read
    /// on every evaluation.
    pub fn availability(&self) -> Availability {
        match (self.enabled, self.enabled_env.clone()) {
            (false, _) => Arc::new(|| false),
            (true, None) => always_available(),
            (true, Some(var)) => Arc::new(move || std::env::var_os(&var).is_some()),
        }
    }

    fn validate(&self, is_root: bool, errors: &mut Vec<String>) {
        if self.label.is_empty() || self.label.contains(char::is_whitespace) {
            errors.push(format!("invalid label '{}'", self.label));
        }
        if is_root && (self.reply.is_some() || !self.suggest.is_empty()) {
            errors.push(format!("root '{}' cannot carry reply or suggest", self.label));
        }
        if self.reply.is_some() && !self.nodes.is_empty() {
            errors.push(format!("'{}' has a reply and children", self.label));
        }
        if !self.suggest.is_empty() && self.reply.is_none() {
            errors.push(format!("'{}' has suggestions but no reply", self.label));
        }
        for child in &self.nodes {
            child.validate(false, errors);
        }
    }

    fn to_builder<C>(&self) -> NodeBuilder<String, C>
    where
        C: Caller + 'static,
    {
        let mut builder: NodeBuilder<String, C> =
            NodeBuilder::new(self.label.clone(), self.explanation.clone()).availability(self.availability());

        if let Some(reply) = self.reply.clone() {
            builder = builder.with_executor(
                move |caller: &C, _invocation: &Invocation<'_>, arguments: &[String]| {
                    caller.send_message(&render_reply(&reply, arguments));
                    Ok(true)
                },
            );
        }
        if !self.suggest.is_empty() {
            let suggest = self.suggest.clone();
            builder = builder.with_completer(
                move |_caller: &C, _invocation: &Invocation<'_>, arguments: &[String]| {
                    Ok(match arguments {
                        [token] => filter_prefix(suggest.iter().map(String::as_str), token),
                        _ => Vec::new(),
                    })
                },
            );
        }

        self.nodes
            .iter()
            .fold(builder, |builder, child| builder.child(child.to_builder()))
    }
}

/// Substitute the remaining arguments into a reply.
pub fn render_reply(reply: &str, arguments: &[String]) -> String {
    reply.replace(ARGS_PLACEHOLDER, &arguments.join(" "))
}

/// A parsed and validated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub root: ManifestNode,
    /// Where the manifest was read from, for error messages
    pub source: PathBuf,
}

impl Manifest {
    #[instrument(level = "debug")]
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ApplicationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse manifest text; `source` only labels errors.
    pub fn parse(content: &str, source: &Path) -> ApplicationResult<Self> {
        let root: ManifestNode = toml::from_str(content).map_err(|e| ApplicationError::Manifest {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut errors = Vec::new();
        root.validate(true, &mut errors);
        if !errors.is_empty() {
            return Err(ApplicationError::Manifest {
                path: source.to_path_buf(),
                message: errors.join("; "),
            });
        }

        debug!("parsed manifest '{}' from {}", root.label, source.display());
        Ok(Self {
            root,
            source: source.to_path_buf(),
        })
    }

    /// Builder preloaded with every node, for callers that still want to
    /// set a displayer.
    pub fn builder<C>(&self, settings: &Settings) -> TreeBuilder<String, C>
    where
        C: Caller + 'static,
    {
        let root = TreeBuilder::new(self.root.label.clone(), self.root.explanation.clone())
            .helper_label(settings.helper_label.clone())
            .separator(settings.separator.clone());
        let availability = self.root.availability();
        let root = root.available_when(move || availability());

        self.root
            .nodes
            .iter()
            .fold(root, |root, child| root.child(child.to_builder()))
    }

    pub fn into_tree<C>(&self, settings: &Settings) -> ApplicationResult<CommandTree<String, C>>
    where
        C: Caller + 'static,
    {
        Ok(self.builder(settings).build()?)
    }
}
