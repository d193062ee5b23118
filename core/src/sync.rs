// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation of the assignment and subject feeds against the cache.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use wanisync_wanikani::{
    DefinitionMode, ETag, Fetched, SubjectId, WaniKaniClient, WaniKaniError,
};

use crate::config::Config;
use crate::error::Error;

/// Remote source of unlocked kanji and their characters.
#[async_trait]
pub trait SubjectSource: Send + Sync {
    /// Ids of kanji whose assignment has started, changed after
    /// `updated_after`, conditional on `etag`.
    async fn started_kanji(
        &self,
        updated_after: Option<&str>,
        etag: Option<&ETag>,
    ) -> Result<Fetched<BTreeSet<SubjectId>>, WaniKaniError>;

    /// Characters of the given kanji.
    async fn kanji_definitions(
        &self,
        ids: &BTreeSet<SubjectId>,
        mode: DefinitionMode<'_>,
    ) -> Result<Fetched<BTreeMap<SubjectId, String>>, WaniKaniError>;
}

#[async_trait]
impl SubjectSource for WaniKaniClient {
    async fn started_kanji(
        &self,
        updated_after: Option<&str>,
        etag: Option<&ETag>,
    ) -> Result<Fetched<BTreeSet<SubjectId>>, WaniKaniError> {
        WaniKaniClient::started_kanji(self, updated_after, etag).await
    }

    async fn kanji_definitions(
        &self,
        ids: &BTreeSet<SubjectId>,
        mode: DefinitionMode<'_>,
    ) -> Result<Fetched<BTreeMap<SubjectId, String>>, WaniKaniError> {
        WaniKaniClient::kanji_definitions(self, ids, mode).await
    }
}

/// What a synchronization pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SyncReport {
    /// The assignment feed returned fresh data.
    pub assignments_modified: bool,
    /// The incremental definition fetch returned fresh data.
    pub definitions_modified: bool,
    /// Ids reported by the assignment feed.
    pub updated_ids: usize,
    /// Cached definitions added or changed by the incremental fetch.
    pub refreshed_definitions: usize,
    /// Ids that needed the unconditional follow-up fetch.
    pub missing_ids: usize,
    /// Definitions added or changed by the follow-up fetch.
    pub new_definitions: usize,
    /// Cached definitions after the pass.
    pub total_definitions: usize,
}

impl SyncReport {
    /// Returns true if the pass did not change any cached definition.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.refreshed_definitions == 0 && self.new_definitions == 0
    }
}

/// Runs one synchronization pass and returns the updated configuration.
///
/// 1. Fetch started assignments since the list watermark.
/// 2. Fetch definitions of every known and newly reported id since the
///    definition watermark.
/// 3. Fetch, unconditionally, the newly reported ids the incremental fetch
///    did not return. This follow-up leaves the definition watermarks alone.
///
/// The input is consumed: on error the partially merged value is dropped and
/// whatever the caller persisted before stays intact. Persisting the
/// returned configuration is up to the caller.
///
/// # Errors
///
/// Returns an error if any remote request fails with something other than
/// `304 Not Modified`.
#[tracing::instrument(skip_all)]
pub async fn synchronize<S>(mut config: Config, source: &S) -> Result<(Config, SyncReport), Error>
where
    S: SubjectSource + ?Sized,
{
    let cache = &mut config.kanji_list_cache;
    let mut report = SyncReport::default();

    let listed = source
        .started_kanji(cache.last_list_update.as_deref(), cache.last_list_etag.as_ref())
        .await?;
    let updated_ids = match listed {
        Fetched::NotModified => {
            tracing::debug!("assignments not modified");
            BTreeSet::new()
        }
        Fetched::Modified {
            etag,
            updated_at,
            data,
        } => {
            report.assignments_modified = true;
            cache.merge_list_watermarks(etag, updated_at);
            data
        }
    };
    report.updated_ids = updated_ids.len();

    let all_ids: BTreeSet<SubjectId> = updated_ids.union(&cache.ids()).copied().collect();
    let returned_ids = if all_ids.is_empty() {
        tracing::debug!("nothing unlocked yet, skipping definition fetch");
        BTreeSet::new()
    } else {
        let refreshed = source
            .kanji_definitions(
                &all_ids,
                DefinitionMode::Incremental {
                    updated_after: cache.last_definition_update.as_deref(),
                    etag: cache.last_definition_etag.as_ref(),
                },
            )
            .await?;

        match refreshed {
            Fetched::NotModified => {
                tracing::debug!("definitions not modified");
                BTreeSet::new()
            }
            Fetched::Modified {
                etag,
                updated_at,
                data,
            } => {
                report.definitions_modified = true;
                cache.merge_definition_watermarks(etag, updated_at);
                let ids = data.keys().copied().collect::<BTreeSet<_>>();
                report.refreshed_definitions = cache.merge_definitions(data);
                ids
            }
        }
    };

    let missing_ids: BTreeSet<SubjectId> =
        updated_ids.difference(&returned_ids).copied().collect();
    report.missing_ids = missing_ids.len();
    if !missing_ids.is_empty() {
        tracing::debug!(count = missing_ids.len(), "fetching definitions of new kanji");
        match source
            .kanji_definitions(&missing_ids, DefinitionMode::Unconditional)
            .await?
        {
            Fetched::NotModified => {
                tracing::warn!("unconditional definition fetch answered not modified");
            }
            Fetched::Modified { data, .. } => {
                report.new_definitions = cache.merge_definitions(data);
            }
        }

        let unresolved = missing_ids
            .iter()
            .filter(|id| !cache.definitions.contains_key(id))
            .count();
        if unresolved > 0 {
            tracing::warn!(count = unresolved, "some unlocked kanji have no definition");
        }
    }

    report.total_definitions = cache.len();
    tracing::info!(?report, "synchronization finished");
    Ok((config, report))
}

/// Serializes synchronization passes.
///
/// The cache is mutated in place and persisted at the end of a pass, so two
/// overlapping passes would race on it.
#[derive(Debug, Default)]
pub struct Synchronizer {
    running: AtomicBool,
}

impl Synchronizer {
    /// Creates an idle synchronizer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
        }
    }

    /// Returns true while a pass is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Runs [`synchronize`] unless another pass is in progress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SyncInProgress`] if a pass is already running, or
    /// any error of the pass itself.
    pub async fn run<S>(&self, config: Config, source: &S) -> Result<(Config, SyncReport), Error>
    where
        S: SubjectSource + ?Sized,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::SyncInProgress);
        }

        let _guard = RunningGuard(&self.running);
        synchronize(config, source).await
    }
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
