//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Route, complete and explain commands of a tree described by a TOML manifest
#[derive(Parser, Debug)]
#[command(name = "cmdtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Manifest describing the tree (default: `manifest` setting)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Directory holding the local .cmdtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch tokens through the tree
    Exec {
        /// Name the call was made under, visible to executors
        #[arg(long = "as", value_name = "ALIAS")]
        alias: Option<String>,
        /// Command tokens (root excluded)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// Print completions for the last token, one per line
    Complete {
        /// Raw input line; a trailing space completes the next word
        #[arg(long, conflicts_with = "tokens")]
        line: Option<String>,
        /// Tokens typed so far; pass "" to complete the next word
        #[arg(allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// Explain the children of a path
    Help {
        /// Path below the root
        path: Vec<String>,
    },

    /// Show the tree, marking unavailable nodes
    Show,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exec_keeps_hyphenated_tokens() {
        let cli = Cli::try_parse_from(["cmdtree", "exec", "--as", "adm", "config", "set", "-x"]).unwrap();
        match cli.command {
            Some(Commands::Exec { alias, tokens }) => {
                assert_eq!(alias.as_deref(), Some("adm"));
                assert_eq!(tokens, vec!["config", "set", "-x"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_complete_accepts_trailing_empty_token() {
        let cli = Cli::try_parse_from(["cmdtree", "complete", "config", ""]).unwrap();
        match cli.command {
            Some(Commands::Complete { tokens, line }) => {
                assert_eq!(tokens, vec!["config", ""]);
                assert!(line.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_debug_flag_counts() {
        let cli = Cli::try_parse_from(["cmdtree", "-dd", "show"]).unwrap();
        assert_eq!(cli.debug, 2);
    }
}
