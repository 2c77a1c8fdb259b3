//! Command handlers for the cmdtree binary

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::Manifest;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Caller, CommandNode, CommandTree, TreeRender};

/// Caller of the binary: messages go to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleCaller;

impl Caller for ConsoleCaller {
    fn send_message(&self, message: &str) {
        output::info(message);
    }
}

type ConsoleTree = CommandTree<String, ConsoleCaller>;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Exec { alias, tokens }) => cmd_exec(cli, alias.as_deref(), tokens),
        Some(Commands::Complete { line, tokens }) => cmd_complete(cli, line.as_deref(), tokens),
        Some(Commands::Help { path }) => cmd_help(cli, path),
        Some(Commands::Show) => cmd_show(cli),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(cli),
            ConfigCommands::Path => cmd_config_path(cli),
        },
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Err(CliError::Usage(
            "no command given, see `cmdtree --help`".to_string(),
        )),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) if dir.is_dir() => Ok(dir.clone()),
        Some(dir) => Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            dir.display()
        ))),
        None => std::env::current_dir().map_err(|e| {
            CliError::Usage(format!("cannot determine current directory: {e}"))
        }),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(Some(&project_dir(cli)?))?;
    if !settings.color {
        colored::control::set_override(false);
    }
    Ok(settings)
}

/// `--manifest` wins over the `manifest` setting.
fn manifest_path(cli: &Cli, settings: &Settings) -> CliResult<PathBuf> {
    cli.manifest
        .clone()
        .or_else(|| settings.manifest.clone())
        .ok_or_else(|| {
            CliError::Usage("no manifest: pass --manifest or set `manifest` in config".to_string())
        })
}

fn load_tree(cli: &Cli) -> CliResult<ConsoleTree> {
    let settings = load_settings(cli)?;
    let path = manifest_path(cli, &settings)?;
    build_tree(&path, &settings)
}

#[instrument(level = "debug", skip(settings))]
fn build_tree(path: &Path, settings: &Settings) -> CliResult<ConsoleTree> {
    let manifest = Manifest::from_path(path)?;
    let mut builder = manifest.builder::<ConsoleCaller>(settings);
    if settings.color {
        let separator = settings.separator.clone();
        builder = builder.displayer(
            move |_caller: &ConsoleCaller, node: &dyn CommandNode<String, ConsoleCaller>| {
                output::help_line(node.label(), &separator, node.payload())
            },
        );
    }
    let tree = builder.build()?;
    debug!("tree '{}' with {} nodes", tree.root_node().label(), tree.len());
    Ok(tree)
}

fn cmd_exec(cli: &Cli, alias: Option<&str>, tokens: &[String]) -> CliResult<()> {
    let tree = load_tree(cli)?;
    let handled = match alias {
        Some(alias) => tree.dispatch_as(&ConsoleCaller, alias, tokens)?,
        None => tree.dispatch(&ConsoleCaller, tokens)?,
    };
    if handled {
        Ok(())
    } else {
        Err(CliError::Rejected(tokens.join(" ")))
    }
}

fn cmd_complete(cli: &Cli, line: Option<&str>, tokens: &[String]) -> CliResult<()> {
    let tree = load_tree(cli)?;
    let completions = match line {
        Some(line) => tree.complete_line(&ConsoleCaller, line),
        None => tree.complete(&ConsoleCaller, tokens),
    };
    for completion in completions {
        output::info(&completion);
    }
    Ok(())
}

fn cmd_help(cli: &Cli, path: &[String]) -> CliResult<()> {
    let tree = load_tree(cli)?;
    let Some(helper) = tree.helper_label() else {
        return Err(CliError::Usage("tree has no helper".to_string()));
    };
    let tokens: Vec<String> = std::iter::once(helper.to_string())
        .chain(path.iter().cloned())
        .collect();
    if tree.dispatch(&ConsoleCaller, &tokens)? {
        Ok(())
    } else {
        Err(CliError::Rejected(tokens.join(" ")))
    }
}

fn cmd_show(cli: &Cli) -> CliResult<()> {
    let tree = load_tree(cli)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    output::header("Config files (lowest precedence first)");
    let paths = global_config_path()
        .into_iter()
        .chain(std::iter::once(local_config_path(&project_dir(cli)?)));
    for path in paths {
        if path.exists() {
            output::present(&path.display());
        } else {
            output::missing(&path.display());
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
