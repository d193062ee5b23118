// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, io, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::BoxFuture};
use tracing_subscriber::EnvFilter;
use wanisync_core::APP_NAME;

use crate::app::App;
use crate::cmd_generate_completion::CmdGenerateCompletion;
use crate::cmd_query::CmdQuery;
use crate::cmd_review::{CmdSwapMeaning, CmdToggleSound};
use crate::cmd_sync::CmdSync;
use crate::cmd_unlock::CmdUnlock;
use crate::config::parse_config;

/// Run the wanisync command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    }
    Ok(())
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Unsuspend the Anki cards of kanji unlocked on WaniKani.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(false) // allow default to unlock
            .arg_required_else_help(false)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $WANISYNC_CONFIG, then \
$XDG_CONFIG_HOME/wanisync/config.toml on Linux and MacOS, \
%APPDATA%/wanisync/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdUnlock::command())
            .subcommand(CmdSync::command())
            .subcommand(CmdQuery::command())
            .subcommand(CmdToggleSound::command())
            .subcommand(CmdSwapMeaning::command())
            .subcommand(CmdGenerateCompletion::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Ok(Self::from(&matches))
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Ok(Self::from(&matches))
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Self {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdUnlock::NAME, matches)) => Unlock(CmdUnlock::from(matches)),
            Some((CmdSync::NAME, matches)) => Sync(CmdSync::from(matches)),
            Some((CmdQuery::NAME, matches)) => Query(CmdQuery::from(matches)),
            Some((CmdToggleSound::NAME, matches)) => ToggleSound(CmdToggleSound::from(matches)),
            Some((CmdSwapMeaning::NAME, matches)) => SwapMeaning(CmdSwapMeaning::from(matches)),
            Some((CmdGenerateCompletion::NAME, matches)) => {
                GenerateCompletion(CmdGenerateCompletion::from(matches))
            }
            None => Unlock(CmdUnlock::default()),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        Cli { config, command }
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Sync and unsuspend the unlocked kanji cards
    Unlock(CmdUnlock),

    /// Refresh the kanji cache
    Sync(CmdSync),

    /// Print the search expression
    Query(CmdQuery),

    /// Toggle the sound fields of the current card
    ToggleSound(CmdToggleSound),

    /// Swap the meaning fields of the current card
    SwapMeaning(CmdSwapMeaning),

    /// Generate shell completion
    GenerateCompletion(CmdGenerateCompletion),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            Unlock(a)      => Self::run_with(config, |x| a.run(x).boxed()).await,
            Sync(a)        => Self::run_with(config, |x| a.run(x).boxed()).await,
            Query(a)       => Self::run_with(config, |x| a.run(x).boxed()).await,
            ToggleSound(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            SwapMeaning(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            GenerateCompletion(a) => a.run(),
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a mut App) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config).await?;
        let mut app = App::new(config).await?;
        f(&mut app).await
    }
}
