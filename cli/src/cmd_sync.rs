// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command};
use colored::Colorize;
use wanisync_core::SyncReport;

use crate::app::App;
use crate::arg::{CommonArgs, OutputFormat};

#[derive(Debug, Clone)]
pub struct CmdSync {
    pub output_format: OutputFormat,
}

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Refresh the cached list of unlocked kanji")
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, app: &mut App) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "synchronizing kanji cache...");
        let report = app.sync().await?;
        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Table => write_report(&mut io::stdout(), &report)?,
        }
        Ok(())
    }
}

fn write_report(w: &mut impl io::Write, report: &SyncReport) -> io::Result<()> {
    let feed = |modified: bool| {
        if modified {
            "modified".green()
        } else {
            "not modified".dimmed()
        }
    };

    writeln!(w, "Assignments:  {}", feed(report.assignments_modified))?;
    writeln!(w, "Definitions:  {}", feed(report.definitions_modified))?;
    writeln!(w, "Reported ids: {}", report.updated_ids)?;
    writeln!(w, "Refreshed:    {}", report.refreshed_definitions)?;
    writeln!(
        w,
        "Fetched new:  {} of {} missing",
        report.new_definitions, report.missing_ids
    )?;
    writeln!(w, "Total kanji:  {}", report.total_definitions.to_string().bold())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync() {
        let cmd = Command::new("test").subcommand(CmdSync::command());
        let matches = cmd
            .try_get_matches_from(["test", "sync", "--output-format", "json"])
            .unwrap();
        let sub_matches = matches.subcommand_matches("sync").unwrap();
        let parsed = CmdSync::from(sub_matches);
        assert_eq!(parsed.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_write_report() {
        colored::control::set_override(false);
        let report = SyncReport {
            assignments_modified: true,
            definitions_modified: false,
            updated_ids: 2,
            refreshed_definitions: 0,
            missing_ids: 1,
            new_definitions: 1,
            total_definitions: 3,
        };

        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Assignments:  modified\n"));
        assert!(out.contains("Definitions:  not modified\n"));
        assert!(out.contains("Fetched new:  1 of 1 missing\n"));
        assert!(out.ends_with("Total kanji:  3\n"));
    }
}
