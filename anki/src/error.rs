// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use wanisync_core::Error;

/// `AnkiConnect` errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AnkiError {
    /// Transport error, including Anki not running.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `AnkiConnect` reported an error for the action.
    #[error("AnkiConnect error: {0}")]
    Api(String),

    /// The response did not have the expected shape.
    #[error("Invalid AnkiConnect response: {0}")]
    InvalidResponse(String),
}

impl From<AnkiError> for Error {
    fn from(e: AnkiError) -> Self {
        Self::host(e)
    }
}
