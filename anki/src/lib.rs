// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `AnkiConnect` client, exposing an Anki collection and its reviewer through
//! the [`Collection`](wanisync_core::Collection) and
//! [`ReviewHost`](wanisync_core::ReviewHost) traits.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]

mod client;
mod error;
mod host;

pub use crate::client::{API_VERSION, AnkiConnectClient, CardInfo, CurrentCard, FieldValue, NoteInfo};
pub use crate::error::AnkiError;
