// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `WaniKani` client for the assignment and subject feeds.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use reqwest::Url;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::WaniKaniError;
use crate::http::{HttpClient, PagedRequest};
use crate::page::Fetched;
use crate::types::{ETag, SubjectId};

const SUBJECT_TYPE_KANJI: &str = "kanji";

/// How the definition feed should be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionMode<'a> {
    /// Only subjects changed after the watermark, conditional on the last
    /// `ETag`. Either part may be absent on the first sync.
    Incremental {
        /// `updated_after` filter.
        updated_after: Option<&'a str>,
        /// `If-None-Match` token.
        etag: Option<&'a ETag>,
    },

    /// Every requested subject, without time filter or conditional header.
    /// Used for subjects that are new to the watermark and would be hidden
    /// by `updated_after`.
    Unconditional,
}

/// `WaniKani` API client.
///
/// # Example
///
/// ```ignore
/// use wanisync_wanikani::{ApiConfig, DefinitionMode, Fetched, WaniKaniClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = WaniKaniClient::new(ApiConfig::with_token("api-key"))?;
/// if let Fetched::Modified { data: ids, .. } = client.started_kanji(None, None).await? {
///     let defs = client
///         .kanji_definitions(&ids, DefinitionMode::Unconditional)
///         .await?;
///     println!("{defs:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WaniKaniClient {
    http: Arc<HttpClient>,
}

impl WaniKaniClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or HTTP client
    /// initialization fails.
    pub fn new(config: ApiConfig) -> Result<Self, WaniKaniError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Fetches the ids of kanji whose assignment has started, optionally
    /// only those updated after `updated_after`.
    ///
    /// [`Fetched::NotModified`] means nothing changed since `etag`; an empty
    /// set inside [`Fetched::Modified`] means there were genuinely no
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn started_kanji(
        &self,
        updated_after: Option<&str>,
        etag: Option<&ETag>,
    ) -> Result<Fetched<BTreeSet<SubjectId>>, WaniKaniError> {
        let mut url = self.collection_url("assignments")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("started", "true")
                .append_pair("subject_types", SUBJECT_TYPE_KANJI);
            if let Some(ts) = updated_after {
                query.append_pair("updated_after", ts);
            }
        }

        tracing::debug!(?updated_after, conditional = etag.is_some(), "fetching started kanji");
        let request = PagedRequest::new(url).with_if_none_match(etag.cloned());
        let fetched = self.http.fetch_pages::<Assignment>(request).await?;
        Ok(fetched.map(|items| items.into_iter().map(|a| a.data.subject_id).collect()))
    }

    /// Fetches the characters of the given kanji subjects.
    ///
    /// An empty `ids` set returns an empty result without any request.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn kanji_definitions(
        &self,
        ids: &BTreeSet<SubjectId>,
        mode: DefinitionMode<'_>,
    ) -> Result<Fetched<BTreeMap<SubjectId, String>>, WaniKaniError> {
        if ids.is_empty() {
            tracing::debug!("no subject ids requested, skipping definition fetch");
            return Ok(Fetched::Modified {
                etag: None,
                updated_at: None,
                data: BTreeMap::new(),
            });
        }

        let (updated_after, etag) = match mode {
            DefinitionMode::Incremental {
                updated_after,
                etag,
            } => (updated_after, etag),
            DefinitionMode::Unconditional => (None, None),
        };

        let ids_param = ids
            .iter()
            .map(SubjectId::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.collection_url("subjects")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("types", SUBJECT_TYPE_KANJI)
                .append_pair("ids", &ids_param);
            if let Some(ts) = updated_after {
                query.append_pair("updated_after", ts);
            }
        }

        tracing::debug!(count = ids.len(), ?mode, "fetching kanji definitions");
        let request = PagedRequest::new(url).with_if_none_match(etag.cloned());
        let fetched = self.http.fetch_pages::<Subject>(request).await?;
        Ok(fetched.map(|items| {
            items
                .into_iter()
                .filter_map(|subject| match subject.data.characters {
                    Some(characters) => Some((subject.id, characters)),
                    None => {
                        tracing::warn!(id = %subject.id, "subject has no characters, skipping");
                        None
                    }
                })
                .collect()
        }))
    }

    fn collection_url(&self, path: &str) -> Result<Url, WaniKaniError> {
        let raw = self.http.config().url(path);
        Url::parse(&raw).map_err(|e| WaniKaniError::Config(format!("invalid URL {raw}: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct Assignment {
    data: AssignmentData,
}

#[derive(Debug, Deserialize)]
struct AssignmentData {
    subject_id: SubjectId,
}

#[derive(Debug, Deserialize)]
struct Subject {
    id: SubjectId,
    data: SubjectData,
}

#[derive(Debug, Deserialize)]
struct SubjectData {
    #[serde(default)]
    characters: Option<String>,
}
