// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command};

use crate::app::App;
use crate::arg::{CommonArgs, OutputFormat};
use crate::card_formatter::CardFormatter;

#[derive(Debug, Clone)]
pub struct CmdUnlock {
    pub output_format: OutputFormat,
}

impl Default for CmdUnlock {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Table,
        }
    }
}

impl CmdUnlock {
    pub const NAME: &str = "unlock";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Sync unlocked kanji and unsuspend their cards")
            .long_about(
                "\
Sync the unlocked kanji from WaniKani, then unsuspend every Anki card matching them. \
This is the default command.",
            )
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, app: &mut App) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "unlocking kanji cards...");
        let report = app.unlock().await?;
        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Table => {
                println!("{report:#}");
                CardFormatter::new().write(&mut io::stdout(), &report.cards)?;
            }
        }
        Ok(())
    }
}
