// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface of wanisync.

mod app;
mod arg;
mod card_formatter;
mod cli;
mod cmd_generate_completion;
mod cmd_query;
mod cmd_review;
mod cmd_sync;
mod cmd_unlock;
mod config;
mod table;

pub use crate::cli::{Cli, Commands, run};
