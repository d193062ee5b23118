// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use wanisync_wanikani::WaniKaniError;

/// Errors raised by the sync and unlock workflows.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote service failed; the pass was aborted.
    #[error("WaniKani request failed: {0}")]
    Remote(#[from] WaniKaniError),

    /// The host application (collection, review screen) failed.
    #[error("Host error: {0}")]
    Host(String),

    /// Reading or writing local state failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The persisted cache could not be (de)serialized.
    #[error("Invalid cache file {}: {source}", path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Another synchronization pass is already running.
    #[error("A synchronization pass is already in progress")]
    SyncInProgress,
}

impl Error {
    /// Wraps a host failure.
    pub fn host(err: impl std::fmt::Display) -> Self {
        Self::Host(err.to_string())
    }
}
