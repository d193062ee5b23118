// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Unsuspending the host's kanji cards that have been unlocked remotely.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serializer;

use crate::config::Config;
use crate::error::Error;
use crate::host::{CardSummary, Collection};
use crate::sync::{SubjectSource, SyncReport, synchronize};

/// What an unlock run did.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UnlockReport {
    /// Cached kanji after the sync pass.
    pub unlocked_kanji: usize,
    /// Time spent synchronizing.
    #[serde(serialize_with = "as_secs")]
    pub sync_elapsed: Duration,
    /// Time spent searching the collection.
    #[serde(serialize_with = "as_secs")]
    pub search_elapsed: Duration,
    /// "quickly" or "slowly".
    pub speed: &'static str,
    /// Search expression sent to the host, if any kanji are cached.
    pub query: Option<String>,
    /// Summary of the sync pass.
    pub sync: SyncReport,
    /// Cards that were unsuspended.
    pub cards: Vec<CardSummary>,
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl fmt::Display for UnlockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Retrieved {} unlocked kanji from WaniKani in {:.6} seconds.",
            self.unlocked_kanji,
            self.sync_elapsed.as_secs_f64()
        )?;
        writeln!(f)?;

        let search = self.search_elapsed.as_secs_f64();
        if self.cards.is_empty() {
            writeln!(
                f,
                "No cards to unsuspend in {search:.6} seconds when searching {}.",
                self.speed
            )?;
        } else {
            writeln!(
                f,
                "Found {} card(s) to unsuspend in {search:.6} seconds when searching {}.",
                self.cards.len(),
                self.speed
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Used query:")?;
        write!(f, "{}", self.query.as_deref().unwrap_or("(none)"))?;

        if !self.cards.is_empty() {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "Unsuspended cards:")?;
            // alternate form leaves the card list to the caller
            if f.alternate() {
                return Ok(());
            }
            for card in &self.cards {
                write!(f, "\n{card}")?;
            }
        }
        Ok(())
    }
}

/// Synchronizes the kanji cache, then unsuspends every matching card.
///
/// The returned configuration carries the updated cache and must be
/// persisted even when no card matched. A host failure after the sync pass
/// drops the synced cache; callers that persist it should run the pass
/// themselves, save, and then call [`unsuspend_unlocked`].
///
/// # Errors
///
/// Returns an error if the sync pass or a host call fails.
#[tracing::instrument(skip_all)]
pub async fn unlock_kanji<S, C>(
    config: Config,
    source: &S,
    collection: &C,
) -> Result<(Config, UnlockReport), Error>
where
    S: SubjectSource + ?Sized,
    C: Collection + ?Sized,
{
    let started = Instant::now();
    let (config, sync) = synchronize(config, source).await?;
    let sync_elapsed = started.elapsed();

    let report = unsuspend_unlocked(&config, collection, sync, sync_elapsed).await?;
    Ok((config, report))
}

/// Unsuspends every card matching the cached kanji of an already synced
/// configuration.
///
/// `sync` and `sync_elapsed` describe the pass that produced `config` and
/// are carried into the report.
///
/// # Errors
///
/// Returns an error if a host call fails.
#[tracing::instrument(skip_all)]
pub async fn unsuspend_unlocked<C>(
    config: &Config,
    collection: &C,
    sync: SyncReport,
    sync_elapsed: Duration,
) -> Result<UnlockReport, Error>
where
    C: Collection + ?Sized,
{
    let started = Instant::now();
    let query = config.kanji_query();
    let found = match &query {
        Some(query) => collection.find_cards(query).await?,
        None => {
            tracing::info!("no unlocked kanji cached, skipping card search");
            Default::default()
        }
    };
    let search_elapsed = started.elapsed();

    let cards = if found.is_empty() {
        Vec::new()
    } else {
        collection.unsuspend_cards(&found).await?;
        collection.refresh().await?;
        collection.describe_cards(&found).await?
    };
    tracing::info!(found = found.len(), "cards unsuspended");

    Ok(UnlockReport {
        unlocked_kanji: config.kanji_list_cache.len(),
        sync_elapsed,
        search_elapsed,
        speed: config.search_speed(),
        query,
        sync,
        cards,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use wanisync_wanikani::{DefinitionMode, ETag, Fetched, SubjectId, WaniKaniError};

    use super::*;
    use crate::host::{CardId, NoteId};

    struct StaticSource {
        ids: BTreeSet<SubjectId>,
        defs: BTreeMap<SubjectId, String>,
    }

    #[async_trait]
    impl SubjectSource for StaticSource {
        async fn started_kanji(
            &self,
            _updated_after: Option<&str>,
            _etag: Option<&ETag>,
        ) -> Result<Fetched<BTreeSet<SubjectId>>, WaniKaniError> {
            Ok(Fetched::Modified {
                etag: None,
                updated_at: None,
                data: self.ids.clone(),
            })
        }

        async fn kanji_definitions(
            &self,
            ids: &BTreeSet<SubjectId>,
            _mode: DefinitionMode<'_>,
        ) -> Result<Fetched<BTreeMap<SubjectId, String>>, WaniKaniError> {
            Ok(Fetched::Modified {
                etag: None,
                updated_at: None,
                data: self
                    .defs
                    .iter()
                    .filter(|(id, _)| ids.contains(id))
                    .map(|(id, s)| (*id, s.clone()))
                    .collect(),
            })
        }
    }

    #[derive(Default)]
    struct FakeCollection {
        matching: BTreeSet<CardId>,
        queries: Mutex<Vec<String>>,
        unsuspended: Mutex<Vec<CardId>>,
        refreshed: Mutex<bool>,
    }

    #[async_trait]
    impl Collection for FakeCollection {
        async fn find_cards(&self, query: &str) -> Result<BTreeSet<CardId>, Error> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.matching.clone())
        }

        async fn unsuspend_cards(&self, cards: &BTreeSet<CardId>) -> Result<(), Error> {
            self.unsuspended.lock().unwrap().extend(cards.iter().copied());
            Ok(())
        }

        async fn describe_cards(&self, cards: &BTreeSet<CardId>) -> Result<Vec<CardSummary>, Error> {
            Ok(cards
                .iter()
                .map(|card| CardSummary {
                    card: *card,
                    note: NoteId(card.0 * 10),
                    kanji: "一".to_string(),
                    level: "1".to_string(),
                    onyomi: "いち".to_string(),
                    kunyomi: "ひと".to_string(),
                    meaning: "One".to_string(),
                })
                .collect())
        }

        async fn refresh(&self) -> Result<(), Error> {
            *self.refreshed.lock().unwrap() = true;
            Ok(())
        }
    }

    struct UnreachableCollection;

    #[async_trait]
    impl Collection for UnreachableCollection {
        async fn find_cards(&self, _query: &str) -> Result<BTreeSet<CardId>, Error> {
            Err(Error::host("connection refused"))
        }

        async fn unsuspend_cards(&self, _cards: &BTreeSet<CardId>) -> Result<(), Error> {
            Err(Error::host("connection refused"))
        }

        async fn describe_cards(
            &self,
            _cards: &BTreeSet<CardId>,
        ) -> Result<Vec<CardSummary>, Error> {
            Err(Error::host("connection refused"))
        }
    }

    fn config() -> Config {
        Config {
            kanji_global_query: "is:suspended ({kanji})".to_string(),
            kanji_individual_query: "Kanji:{kanji}".to_string(),
            should_searching_be_fast: true,
            ..Default::default()
        }
    }

    fn source() -> StaticSource {
        StaticSource {
            ids: [SubjectId::new(440)].into(),
            defs: [(SubjectId::new(440), "一".to_string())].into(),
        }
    }

    #[tokio::test]
    async fn unsuspends_matching_cards() {
        let collection = FakeCollection {
            matching: [CardId(1)].into(),
            ..Default::default()
        };

        let (config, report) = unlock_kanji(config(), &source(), &collection).await.unwrap();

        assert_eq!(config.kanji_list_cache.len(), 1);
        assert_eq!(
            collection.queries.lock().unwrap().as_slice(),
            ["is:suspended (Kanji:一)"]
        );
        assert_eq!(collection.unsuspended.lock().unwrap().as_slice(), [CardId(1)]);
        assert!(*collection.refreshed.lock().unwrap());

        assert_eq!(report.unlocked_kanji, 1);
        assert_eq!(report.speed, "quickly");
        assert_eq!(report.cards.len(), 1);
        assert_eq!(
            report.cards[0].to_string(),
            "cid#10 一 (Lv. 1, いち / ひと, One)"
        );
        let text = report.to_string();
        assert!(text.contains("Found 1 card(s) to unsuspend"));
        assert!(text.contains("Unsuspended cards:\ncid#10 一"));
        assert!(format!("{report:#}").ends_with("Unsuspended cards:"));
    }

    #[tokio::test]
    async fn no_match_still_returns_synced_config() {
        let collection = FakeCollection::default();

        let (config, report) = unlock_kanji(config(), &source(), &collection).await.unwrap();

        assert_eq!(config.kanji_list_cache.len(), 1);
        assert!(collection.unsuspended.lock().unwrap().is_empty());
        assert!(!*collection.refreshed.lock().unwrap());
        assert!(report.cards.is_empty());
        assert!(report.to_string().contains("No cards to unsuspend"));
    }

    #[tokio::test]
    async fn empty_cache_skips_search() {
        let empty = StaticSource {
            ids: BTreeSet::new(),
            defs: BTreeMap::new(),
        };
        let collection = FakeCollection::default();

        let (_, report) = unlock_kanji(config(), &empty, &collection).await.unwrap();

        assert!(collection.queries.lock().unwrap().is_empty());
        assert_eq!(report.query, None);
        assert_eq!(report.unlocked_kanji, 0);
    }

    #[tokio::test]
    async fn report_serializes_seconds() {
        let collection = FakeCollection::default();
        let (_, report) = unlock_kanji(config(), &source(), &collection).await.unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["sync_elapsed"].is_f64());
        assert_eq!(json["speed"], "quickly");
        assert_eq!(json["query"], "is:suspended (Kanji:一)");
    }

    #[tokio::test]
    async fn synced_config_outlives_host_failure() {
        let (config, sync) = synchronize(config(), &source()).await.unwrap();

        let err = unsuspend_unlocked(&config, &UnreachableCollection, sync, Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Host(ref msg) if msg == "connection refused"));
        assert_eq!(config.kanji_list_cache.len(), 1);
        assert_eq!(config.kanji_query().as_deref(), Some("is:suspended (Kanji:一)"));
    }

    #[tokio::test]
    async fn unsuspend_carries_sync_summary() {
        let (config, sync) = synchronize(config(), &source()).await.unwrap();
        let collection = FakeCollection {
            matching: [CardId(2)].into(),
            ..Default::default()
        };

        let report = unsuspend_unlocked(&config, &collection, sync, Duration::from_millis(250))
            .await
            .unwrap();

        assert_eq!(report.sync, sync);
        assert_eq!(report.sync_elapsed, Duration::from_millis(250));
        assert_eq!(collection.unsuspended.lock().unwrap().as_slice(), [CardId(2)]);
    }
}
