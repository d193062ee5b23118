// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use async_trait::async_trait;
use wanisync_core::{CardId, CardSummary, Collection, Error, Note, ReviewHost};

use crate::client::AnkiConnectClient;
use crate::error::AnkiError;

#[async_trait]
impl Collection for AnkiConnectClient {
    async fn find_cards(&self, query: &str) -> Result<BTreeSet<CardId>, Error> {
        Ok(AnkiConnectClient::find_cards(self, query).await?)
    }

    async fn unsuspend_cards(&self, cards: &BTreeSet<CardId>) -> Result<(), Error> {
        Ok(self.unsuspend(cards).await?)
    }

    async fn describe_cards(&self, cards: &BTreeSet<CardId>) -> Result<Vec<CardSummary>, Error> {
        let infos = self.cards_info(cards).await?;
        Ok(infos
            .iter()
            .map(|info| CardSummary::from_note(info.card_id, &info.to_note()))
            .collect())
    }
}

#[async_trait]
impl ReviewHost for AnkiConnectClient {
    async fn current_note(&self) -> Result<Option<Note>, Error> {
        let Some(current) = self.gui_current_card().await? else {
            return Ok(None);
        };

        let cards = self.cards_info(&BTreeSet::from([current.card_id])).await?;
        let Some(card) = cards.first() else {
            return Err(AnkiError::InvalidResponse(format!(
                "card {} under review not found",
                current.card_id
            ))
            .into());
        };

        let notes = self.notes_info(&[card.note]).await?;
        match notes.first() {
            Some(note) => Ok(Some(note.to_note())),
            None => Err(AnkiError::InvalidResponse(format!("note {} not found", card.note)).into()),
        }
    }

    async fn update_note(&self, note: &Note) -> Result<(), Error> {
        Ok(self.update_note_fields(note.id, &note.fields).await?)
    }

    async fn media_exists(&self, filename: &str) -> Result<bool, Error> {
        let names = self.media_file_names(&escape_glob(filename)).await?;
        Ok(names.iter().any(|name| name == filename))
    }
}

/// Escapes glob metacharacters so that the pattern only matches `name`.
fn escape_glob(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '*' | '?' | '[' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            c => escaped.push(c),
        }
    }
    escaped
}
