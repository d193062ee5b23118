// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::Colorize;
use wanisync_core::{ReviewOutcome, swap_meaning, toggle_sound};

use crate::app::App;

#[derive(Debug, Clone, Copy)]
pub struct CmdToggleSound;

impl CmdToggleSound {
    pub const NAME: &str = "toggle-sound";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Move the sound of the current review card between its sound fields")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, app: &mut App) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "toggling sound of the current card...");
        let anki = app.anki()?;
        let outcome = toggle_sound(&anki).await?;
        print_outcome(&outcome, "Sound toggled", "No sound to toggle");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdSwapMeaning;

impl CmdSwapMeaning {
    pub const NAME: &str = "swap-meaning";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Swap the meaning and extra info of the current review card")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, app: &mut App) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "swapping meaning of the current card...");
        let anki = app.anki()?;
        let outcome = swap_meaning(&anki).await?;
        print_outcome(&outcome, "Meaning swapped", "Meaning fields missing");
        Ok(())
    }
}

fn print_outcome(outcome: &ReviewOutcome, updated: &str, unchanged: &str) {
    match outcome {
        ReviewOutcome::NoCard => println!("{}", "No card under review".yellow()),
        ReviewOutcome::Unchanged(note) => println!("{unchanged} for note {}", note.id),
        ReviewOutcome::Updated(note) => println!("{} for note {}", updated.green(), note.id),
    }
}
