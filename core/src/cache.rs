// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use wanisync_wanikani::{ETag, SubjectId};

/// Cached kanji definitions and the watermarks of both feeds.
///
/// The watermarks are either unset or describe the most recent non-304
/// response that was merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCache {
    /// Subject id to kanji characters.
    #[serde(default)]
    pub definitions: BTreeMap<SubjectId, String>,

    /// `ETag` of the last assignment fetch.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_list_etag: Option<ETag>,

    /// `data_updated_at` of the last assignment fetch.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_list_update: Option<String>,

    /// `ETag` of the last incremental definition fetch.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_definition_etag: Option<ETag>,

    /// `data_updated_at` of the last incremental definition fetch.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_definition_update: Option<String>,
}

impl SyncCache {
    /// Ids of every cached subject.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<SubjectId> {
        self.definitions.keys().copied().collect()
    }

    /// Cached kanji characters, in subject id order.
    pub fn kanji(&self) -> impl Iterator<Item = &str> {
        self.definitions.values().map(String::as_str)
    }

    /// Number of cached definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Records the assignment feed watermarks that were returned.
    pub fn merge_list_watermarks(&mut self, etag: Option<ETag>, updated_at: Option<String>) {
        if let Some(etag) = etag {
            self.last_list_etag = Some(etag);
        }
        if let Some(updated_at) = updated_at {
            self.last_list_update = Some(updated_at);
        }
    }

    /// Records the definition feed watermarks that were returned.
    pub fn merge_definition_watermarks(&mut self, etag: Option<ETag>, updated_at: Option<String>) {
        if let Some(etag) = etag {
            self.last_definition_etag = Some(etag);
        }
        if let Some(updated_at) = updated_at {
            self.last_definition_update = Some(updated_at);
        }
    }

    /// Merges definitions, the remote text replacing any cached one.
    ///
    /// Returns how many entries were added or changed.
    pub fn merge_definitions<I>(&mut self, definitions: I) -> usize
    where
        I: IntoIterator<Item = (SubjectId, String)>,
    {
        let mut changed = 0;
        for (id, text) in definitions {
            if self.definitions.get(&id) != Some(&text) {
                self.definitions.insert(id, text);
                changed += 1;
            }
        }
        changed
    }
}

/// Older caches stored unset watermarks as empty strings.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()).map(T::from))
}
