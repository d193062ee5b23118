// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Keeps a local cache of the kanji unlocked on `WaniKani` and uses it to
//! unsuspend the matching cards of a flashcard collection.

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
#![allow(clippy::module_name_repetitions)]

mod cache;
mod config;
mod error;
mod host;
pub mod note;
mod review;
mod store;
mod sync;
mod unlock;

pub use crate::cache::SyncCache;
pub use crate::config::{APP_NAME, AnkiConfig, Config};
pub use crate::error::Error;
pub use crate::host::{CardId, CardSummary, Collection, NoteId, ReviewHost};
pub use crate::note::Note;
pub use crate::review::{ReviewOutcome, swap_meaning, toggle_sound};
pub use crate::store::CacheStore;
pub use crate::sync::{SubjectSource, SyncReport, Synchronizer, synchronize};
pub use crate::unlock::{UnlockReport, unlock_kanji, unsuspend_unlocked};
pub use wanisync_wanikani::{ApiConfig, ETag, SubjectId, WaniKaniClient, WaniKaniError};
