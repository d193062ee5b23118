// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `WaniKani` API v2 client for the assignment and subject collections.
//!
//! Every collection endpoint is paginated and supports conditional requests
//! through `ETag` / `If-None-Match`. The client exposes one generic paging
//! primitive and two feed operations built on top of it.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod config;
mod error;
mod http;
mod page;
mod types;

pub use crate::client::{DefinitionMode, WaniKaniClient};
pub use crate::config::{API_REVISION, ApiConfig};
pub use crate::error::WaniKaniError;
pub use crate::http::{HttpClient, PagedRequest};
pub use crate::page::{Fetched, Page, Pages};
pub use crate::types::{ETag, SubjectId};
