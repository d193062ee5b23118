// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wanisync_core::{AnkiConfig, CardId, Note, NoteId};

use crate::error::AnkiError;

/// `AnkiConnect` API version spoken by this client.
pub const API_VERSION: u32 = 6;

/// Client for the `AnkiConnect` add-on.
#[derive(Debug, Clone)]
pub struct AnkiConnectClient {
    url: String,
    client: reqwest::Client,
}

impl AnkiConnectClient {
    /// Creates a client for the configured `AnkiConnect` endpoint.
    ///
    /// Every request is bounded by `config.timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AnkiConfig) -> Result<Self, AnkiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            url: config.url.clone(),
            client,
        })
    }

    /// Endpoint the client talks to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Checks that `AnkiConnect` is reachable and returns its version.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be reached.
    pub async fn version(&self) -> Result<u32, AnkiError> {
        self.invoke("version", json!({})).await
    }

    /// Cards matching an Anki search expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the search fails.
    pub async fn find_cards(&self, query: &str) -> Result<BTreeSet<CardId>, AnkiError> {
        self.invoke("findCards", json!({ "query": query })).await
    }

    /// Unsuspends the given cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unsuspend(&self, cards: &BTreeSet<CardId>) -> Result<(), AnkiError> {
        let _: Option<Value> = self
            .invoke_nullable("unsuspend", json!({ "cards": cards }))
            .await?;
        Ok(())
    }

    /// Card details, including the fields of their notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn cards_info(&self, cards: &BTreeSet<CardId>) -> Result<Vec<CardInfo>, AnkiError> {
        self.invoke("cardsInfo", json!({ "cards": cards })).await
    }

    /// Note details.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn notes_info(&self, notes: &[NoteId]) -> Result<Vec<NoteInfo>, AnkiError> {
        self.invoke("notesInfo", json!({ "notes": notes })).await
    }

    /// Card shown in the reviewer, if a review is in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn gui_current_card(&self) -> Result<Option<CurrentCard>, AnkiError> {
        self.invoke_nullable("guiCurrentCard", json!({})).await
    }

    /// Overwrites fields of a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_note_fields(
        &self,
        note: NoteId,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), AnkiError> {
        let params = json!({ "note": { "id": note, "fields": fields } });
        let _: Option<Value> = self.invoke_nullable("updateNoteFields", params).await?;
        Ok(())
    }

    /// Media files in the collection matching a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn media_file_names(&self, pattern: &str) -> Result<Vec<String>, AnkiError> {
        self.invoke("getMediaFilesNames", json!({ "pattern": pattern }))
            .await
    }

    /// Invokes an action whose result must not be null.
    async fn invoke<T: DeserializeOwned>(&self, action: &str, params: Value) -> Result<T, AnkiError> {
        self.invoke_nullable(action, params)
            .await?
            .ok_or_else(|| AnkiError::InvalidResponse(format!("{action} returned null")))
    }

    async fn invoke_nullable<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Value,
    ) -> Result<Option<T>, AnkiError> {
        let request = AnkiRequest {
            action,
            version: API_VERSION,
            params,
        };
        tracing::debug!(action, "invoking AnkiConnect");

        let resp = self.client.post(&self.url).json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AnkiError::InvalidResponse(format!(
                "{action} answered HTTP {status}"
            )));
        }

        let body: AnkiResponse<T> = resp
            .json()
            .await
            .map_err(|e| AnkiError::InvalidResponse(format!("{action}: {e}")))?;
        match body.error {
            Some(error) => Err(AnkiError::Api(error)),
            None => Ok(body.result),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnkiRequest<'a> {
    action: &'a str,
    version: u32,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

/// A note field as reported by `AnkiConnect`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldValue {
    /// Field content.
    pub value: String,
    /// Position in the note type.
    pub order: u32,
}

/// Result item of `cardsInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    /// Card id.
    pub card_id: CardId,
    /// Owning note.
    pub note: NoteId,
    /// Fields of the owning note.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl CardInfo {
    /// The owning note with its field values.
    #[must_use]
    pub fn to_note(&self) -> Note {
        Note::new(self.note, field_values(&self.fields))
    }
}

/// Result item of `notesInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    /// Note id.
    pub note_id: NoteId,
    /// Note type name.
    #[serde(default)]
    pub model_name: String,
    /// Note fields.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl NoteInfo {
    /// Converts into a [`Note`].
    #[must_use]
    pub fn to_note(&self) -> Note {
        Note::new(self.note_id, field_values(&self.fields))
    }
}

/// Result of `guiCurrentCard`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentCard {
    /// Card under review.
    pub card_id: CardId,
}

fn field_values(fields: &BTreeMap<String, FieldValue>) -> BTreeMap<String, String> {
    fields
        .iter()
        .map(|(name, field)| (name.clone(), field.value.clone()))
        .collect()
}
