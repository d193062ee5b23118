// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Narrow interfaces to the flashcard application hosting the workflows.

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;

use crate::error::Error;
use crate::note::Note;

/// Identifier of a card in the host collection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct CardId(pub i64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a note in the host collection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Summary of an unsuspended kanji card, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CardSummary {
    /// Card id.
    pub card: CardId,
    /// Note the card belongs to.
    pub note: NoteId,
    /// `Kanji` field.
    pub kanji: String,
    /// `level` field.
    pub level: String,
    /// `ONyomi` field.
    pub onyomi: String,
    /// `KUNyomi` field.
    pub kunyomi: String,
    /// `Meaning` field.
    pub meaning: String,
}

impl CardSummary {
    /// Builds a summary from the fields of a kanji note; absent fields
    /// are left empty.
    #[must_use]
    pub fn from_note(card: CardId, note: &Note) -> Self {
        let field = |name: &str| note.get(name).unwrap_or_default().to_string();
        Self {
            card,
            note: note.id,
            kanji: field("Kanji"),
            level: field("level"),
            onyomi: field("ONyomi"),
            kunyomi: field("KUNyomi"),
            meaning: field("Meaning"),
        }
    }
}

impl fmt::Display for CardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cid#{} {} (Lv. {}, {} / {}, {})",
            self.note, self.kanji, self.level, self.onyomi, self.kunyomi, self.meaning
        )
    }
}

/// Card search and suspension state of the host collection.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Cards matching a host search expression.
    async fn find_cards(&self, query: &str) -> Result<BTreeSet<CardId>, Error>;

    /// Makes the given cards eligible for review again.
    async fn unsuspend_cards(&self, cards: &BTreeSet<CardId>) -> Result<(), Error>;

    /// Describes the given cards for the unlock report.
    async fn describe_cards(&self, cards: &BTreeSet<CardId>) -> Result<Vec<CardSummary>, Error>;

    /// Lets the host refresh its views after a mutation.
    async fn refresh(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// The host's review screen.
#[async_trait]
pub trait ReviewHost: Send + Sync {
    /// Note of the card currently under review, if any.
    async fn current_note(&self) -> Result<Option<Note>, Error>;

    /// Writes the note fields back.
    async fn update_note(&self, note: &Note) -> Result<(), Error>;

    /// Returns true if the media file exists in the collection.
    async fn media_exists(&self, filename: &str) -> Result<bool, Error>;
}
