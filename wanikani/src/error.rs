// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// `WaniKani` client errors.
///
/// A `304 Not Modified` reply is not an error; it surfaces as
/// [`Fetched::NotModified`](crate::Fetched::NotModified).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum WaniKaniError {
    /// Transport failure, including request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token was rejected (401 or 403).
    #[error("Authentication failed ({status}): {body}")]
    Auth {
        /// Response status.
        status: StatusCode,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// Any other non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The response body or headers did not have the expected shape.
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WaniKaniError {
    /// Builds the error for a non-success status code.
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth { status, body },
            status => Self::Status { status, body },
        }
    }

    /// The HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            Self::InvalidResponse(_) | Self::Config(_) => None,
        }
    }
}

impl From<serde_json::Error> for WaniKaniError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}
