// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Collection page envelope and the outcome of a paged fetch.

use serde::Deserialize;

use crate::types::ETag;

/// One page of a `WaniKani` collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Resources on this page.
    pub data: Vec<T>,
    /// Timestamp of the newest change in the whole collection; `null` for
    /// an empty collection.
    #[serde(default)]
    pub data_updated_at: Option<String>,
    /// Pagination links.
    pub pages: Pages,
}

/// Pagination links of a collection page.
#[derive(Debug, Clone, Deserialize)]
pub struct Pages {
    /// URL of the next page, absent or `null` on the last one.
    #[serde(default)]
    pub next_url: Option<String>,
}

/// Outcome of a conditional, possibly paginated fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The server answered `304 Not Modified`: nothing changed since the
    /// supplied `ETag`.
    NotModified,

    /// Fresh data, with the watermarks reported by the last page.
    Modified {
        /// `ETag` header of the last page.
        etag: Option<ETag>,
        /// `data_updated_at` of the last page.
        updated_at: Option<String>,
        /// Aggregated data of all pages.
        data: T,
    },
}

impl<T> Fetched<T> {
    /// Returns true for the "nothing changed" outcome.
    #[must_use]
    pub const fn is_not_modified(&self) -> bool {
        matches!(self, Self::NotModified)
    }

    /// Returns the data, or `None` when not modified.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::NotModified => None,
            Self::Modified { data, .. } => Some(data),
        }
    }

    /// Maps the data while keeping the watermarks.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Self::NotModified => Fetched::NotModified,
            Self::Modified {
                etag,
                updated_at,
                data,
            } => Fetched::Modified {
                etag,
                updated_at,
                data: f(data),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: u64,
    }

    #[test]
    fn parses_last_page() {
        let json = r#"{
            "object": "collection",
            "url": "https://api.wanikani.com/v2/subjects",
            "pages": { "per_page": 1000, "next_url": null, "previous_url": null },
            "total_count": 1,
            "data_updated_at": "2018-04-11T21:08:47.520856Z",
            "data": [ { "id": 440 } ]
        }"#;
        let page: Page<Item> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, 440);
        assert_eq!(
            page.data_updated_at.as_deref(),
            Some("2018-04-11T21:08:47.520856Z")
        );
        assert!(page.pages.next_url.is_none());
    }

    #[test]
    fn empty_collection_has_no_timestamp() {
        let json = r#"{ "pages": {}, "data_updated_at": null, "data": [] }"#;
        let page: Page<Item> = serde_json::from_str(json).unwrap();
        assert!(page.data.is_empty());
        assert!(page.data_updated_at.is_none());
    }

    #[test]
    fn missing_data_is_rejected() {
        let json = r#"{ "pages": {} }"#;
        assert!(serde_json::from_str::<Page<Item>>(json).is_err());
    }

    #[test]
    fn map_keeps_watermarks() {
        let fetched = Fetched::Modified {
            etag: Some(ETag::from("e1")),
            updated_at: Some("t1".to_string()),
            data: vec![1, 2, 3],
        };
        let mapped = fetched.map(|v| v.len());
        assert_eq!(
            mapped,
            Fetched::Modified {
                etag: Some(ETag::from("e1")),
                updated_at: Some("t1".to_string()),
                data: 3,
            }
        );
        assert!(Fetched::<Vec<u8>>::NotModified.map(|v| v.len()).is_not_modified());
    }
}
