// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};

use crate::app::App;

#[derive(Debug, Clone, Copy)]
pub struct CmdQuery;

impl CmdQuery {
    pub const NAME: &str = "query";

    pub fn command() -> Command {
        Command::new(Self::NAME).about("Print the Anki search for the cached kanji")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, app: &mut App) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "building search query...");
        match app.config().kanji_query() {
            Some(query) => println!("{query}"),
            None => return Err("No unlocked kanji cached yet, run `sync` first".into()),
        }
        Ok(())
    }
}
