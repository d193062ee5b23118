// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests.

#![allow(dead_code)]

mod fixtures;
mod temp_dir;

pub use fixtures::{assignment_page, lacks_header, lacks_query, subject_page, test_config};
pub use temp_dir::{TempDirs, setup_temp_dirs};
