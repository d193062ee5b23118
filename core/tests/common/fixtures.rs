// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test fixtures: configurations and `WaniKani` response bodies.

use std::path::Path;

use serde_json::{Value, json};
use wanisync_core::{ApiConfig, Config};
use wiremock::{MockServer, Request};

/// Creates a configuration pointing at the mock server.
pub fn test_config(server: &MockServer, state_dir: &Path) -> Config {
    Config {
        wk_api_key: "test-token".to_string(),
        kanji_global_query: "deck:Kanji is:suspended ({kanji})".to_string(),
        kanji_individual_query: "Kanji:{kanji}".to_string(),
        api: ApiConfig {
            base_url: format!("{}/v2", server.uri()),
            ..ApiConfig::default()
        },
        state_dir: Some(state_dir.to_path_buf()),
        ..Default::default()
    }
}

/// One page of the assignment collection.
pub fn assignment_page(subject_ids: &[u64], updated: &str) -> Value {
    json!({
        "object": "collection",
        "pages": { "per_page": 500, "next_url": null, "previous_url": null },
        "total_count": subject_ids.len(),
        "data_updated_at": updated,
        "data": subject_ids
            .iter()
            .map(|id| json!({ "id": id + 1000, "object": "assignment", "data": { "subject_id": id } }))
            .collect::<Vec<_>>(),
    })
}

/// One page of the subject collection.
pub fn subject_page(subjects: &[(u64, &str)], updated: &str) -> Value {
    json!({
        "object": "collection",
        "pages": { "per_page": 1000, "next_url": null, "previous_url": null },
        "total_count": subjects.len(),
        "data_updated_at": updated,
        "data": subjects
            .iter()
            .map(|(id, ch)| json!({ "id": id, "object": "kanji", "data": { "characters": ch } }))
            .collect::<Vec<_>>(),
    })
}

/// Matches requests without the given header.
pub fn lacks_header(name: &'static str) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    move |req: &Request| !req.headers.contains_key(name)
}

/// Matches requests without the given query parameter.
pub fn lacks_query(name: &'static str) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    move |req: &Request| !req.url.query_pairs().any(|(k, _)| k == name)
}
