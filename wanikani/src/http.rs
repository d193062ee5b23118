// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication, `ETag` handling and paging.

use std::time::Duration;

use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::{API_REVISION, ApiConfig};
use crate::error::WaniKaniError;
use crate::page::{Fetched, Page};
use crate::types::ETag;

const REVISION_HEADER: &str = "Wanikani-Revision";

/// Starting point of a paged fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedRequest {
    /// URL of the first page.
    pub url: String,
    /// Conditional token for the whole collection.
    pub if_none_match: Option<ETag>,
}

impl PagedRequest {
    /// Creates an unconditional request.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            if_none_match: None,
        }
    }

    /// Makes the request conditional on `etag`, if any.
    #[must_use]
    pub fn with_if_none_match(mut self, etag: Option<ETag>) -> Self {
        self.if_none_match = etag;
        self
    }
}

/// HTTP client for `WaniKani` operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: ApiConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or HTTP client creation fails.
    pub fn new(config: ApiConfig) -> Result<Self, WaniKaniError> {
        if config.token.trim().is_empty() {
            return Err(WaniKaniError::Config("missing API token".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Builds a GET request with the authentication and revision headers.
    pub fn build_request(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.config.token)
            .header(REVISION_HEADER, API_REVISION)
    }

    /// Adds the If-None-Match header for conditional fetches.
    pub fn if_none_match(req: RequestBuilder, etag: &ETag) -> RequestBuilder {
        req.header(IF_NONE_MATCH, etag.as_str())
    }

    /// Executes a request and checks for HTTP errors.
    ///
    /// Returns `None` for `304 Not Modified`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Option<Response>, WaniKaniError> {
        let resp = req.send().await?;

        match resp.status() {
            StatusCode::NOT_MODIFIED => Ok(None),
            status if status.is_success() => Ok(Some(resp)),
            status => {
                let text = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read response".to_string());
                Err(WaniKaniError::from_status(status, text))
            }
        }
    }

    /// Extracts the `ETag` from response headers, if the server sent one.
    #[must_use]
    pub fn extract_etag(resp: &Response) -> Option<ETag> {
        resp.headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| ETag::new(s.to_string()))
    }

    /// Fetches every page of a collection, following `pages.next_url`.
    ///
    /// The conditional token is only sent with the first request, since it
    /// describes the whole collection rather than a single page. A 304
    /// reply ends the fetch with [`Fetched::NotModified`]. The `ETag` and
    /// `data_updated_at` of the last page are returned with the aggregated
    /// data.
    ///
    /// # Errors
    ///
    /// Returns an error on any non-success status other than 304, on
    /// transport failures and on malformed page bodies.
    pub async fn fetch_pages<T: DeserializeOwned>(
        &self,
        request: PagedRequest,
    ) -> Result<Fetched<Vec<T>>, WaniKaniError> {
        let PagedRequest { url, if_none_match } = request;

        let mut next = Some(url);
        let mut conditional = if_none_match;
        let mut items = Vec::new();
        let mut etag = None;
        let mut updated_at = None;
        let mut page_count = 0_usize;

        while let Some(url) = next.take() {
            tracing::debug!(%url, conditional = conditional.is_some(), "fetching page");
            let mut req = self.build_request(&url);
            if let Some(tag) = conditional.take() {
                req = Self::if_none_match(req, &tag);
            }

            let Some(resp) = self.execute(req).await? else {
                tracing::debug!(%url, "not modified");
                return Ok(Fetched::NotModified);
            };

            etag = Self::extract_etag(&resp);
            let body = resp.text().await?;
            let page: Page<T> = serde_json::from_str(&body).map_err(|e| {
                WaniKaniError::InvalidResponse(format!("malformed page from {url}: {e}"))
            })?;

            page_count += 1;
            updated_at = page.data_updated_at;
            items.extend(page.data);
            next = page.pages.next_url.filter(|u| !u.is_empty());
        }

        tracing::debug!(pages = page_count, items = items.len(), "fetch complete");
        Ok(Fetched::Modified {
            etag,
            updated_at,
            data: items,
        })
    }
}
