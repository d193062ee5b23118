// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Note transforms applied to the card under review.

use crate::error::Error;
use crate::host::ReviewHost;
use crate::note::{self, Note};

/// Outcome of a review action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// No card is being reviewed.
    NoCard,
    /// The note did not qualify; nothing was written.
    Unchanged(Note),
    /// The note was updated.
    Updated(Note),
}

impl ReviewOutcome {
    /// Returns true if the note was written back.
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Moves the sound of the current note between its good and broken fields.
///
/// # Errors
///
/// Returns an error if the host cannot be reached.
#[tracing::instrument(skip_all)]
pub async fn toggle_sound<H: ReviewHost + ?Sized>(host: &H) -> Result<ReviewOutcome, Error> {
    let Some(mut note) = host.current_note().await? else {
        return Ok(ReviewOutcome::NoCard);
    };
    let Some(sound) = note::sound_to_toggle(&note) else {
        tracing::debug!(note = %note.id, "no sound to toggle");
        return Ok(ReviewOutcome::Unchanged(note));
    };

    let exists = host.media_exists(&sound).await?;
    note::place_sound(&mut note, &sound, exists);
    host.update_note(&note).await?;
    tracing::info!(note = %note.id, %sound, exists, "sound toggled");
    Ok(ReviewOutcome::Updated(note))
}

/// Swaps `Meaning` and `ExtraInfo` of the current note.
///
/// # Errors
///
/// Returns an error if the host cannot be reached.
#[tracing::instrument(skip_all)]
pub async fn swap_meaning<H: ReviewHost + ?Sized>(host: &H) -> Result<ReviewOutcome, Error> {
    let Some(mut note) = host.current_note().await? else {
        return Ok(ReviewOutcome::NoCard);
    };
    if !note::swap_meaning_and_extra_info(&mut note) {
        return Ok(ReviewOutcome::Unchanged(note));
    }

    host.update_note(&note).await?;
    Ok(ReviewOutcome::Updated(note))
}
