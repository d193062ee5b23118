// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Temporary directory management for integration tests.

use std::path::PathBuf;

use tempfile::TempDir;

/// Temporary state directory, removed when dropped.
#[derive(Debug)]
pub struct TempDirs {
    _base: TempDir,
    /// State directory for the cache file.
    pub state_dir: PathBuf,
}

impl TempDirs {
    /// Creates a fresh state directory.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let base = tempfile::tempdir()?;
        let state_dir = base.path().join("state");
        tokio::fs::create_dir_all(&state_dir).await?;
        Ok(Self {
            _base: base,
            state_dir,
        })
    }
}

/// Sets up temporary directories for integration tests.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub async fn setup_temp_dirs() -> Result<TempDirs, Box<dyn std::error::Error>> {
    TempDirs::new().await
}
