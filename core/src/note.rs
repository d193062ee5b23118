// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Field transformations applied to the note under review.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::host::NoteId;

/// Field holding the working audio reference.
pub const SOUND_GOOD: &str = "Sound";
/// Field holding an audio reference known to be broken.
pub const SOUND_BAD: &str = "SoundBroken";
/// Field holding the meaning.
pub const MEANING: &str = "Meaning";
/// Field holding extra information.
pub const EXTRA_INFO: &str = "ExtraInfo";

const PRACTICE_SENTENCE: &str = "practice sentence";
const PRACTICE_SENTENCE_MAX_DISTANCE: usize = 5;

static SOUND_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[sound:(.+?)\]").expect("valid sound regex"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static STYLE_OR_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b.*?</style>|<script\b.*?</script>").expect("valid block regex")
});
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=["']?([^"'>]+)["']?[^>]*>"#).expect("valid image regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("valid tag regex"));

/// A note with named text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Note id.
    pub id: NoteId,
    /// Field name to HTML content.
    pub fields: BTreeMap<String, String>,
}

impl Note {
    /// Creates a note.
    #[must_use]
    pub const fn new(id: NoteId, fields: BTreeMap<String, String>) -> Self {
        Self { id, fields }
    }

    /// Content of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns true if the note has every named field.
    #[must_use]
    pub fn has_fields(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.fields.contains_key(*name))
    }

    fn set(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_string(), value);
    }
}

/// Media file names referenced by `[sound:...]` tags.
#[must_use]
pub fn sound_files(text: &str) -> Vec<&str> {
    SOUND_TAG
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// The audio file to toggle: the only sound of the good field, else the
/// only sound of the broken field.
///
/// Returns `None` if the note lacks either field or neither holds exactly
/// one sound.
#[must_use]
pub fn sound_to_toggle(note: &Note) -> Option<String> {
    if !note.has_fields(&[SOUND_GOOD, SOUND_BAD]) {
        return None;
    }

    let good = sound_files(note.get(SOUND_GOOD).unwrap_or_default());
    let bad = sound_files(note.get(SOUND_BAD).unwrap_or_default());
    match (good.as_slice(), bad.as_slice()) {
        ([sound], _) | (_, [sound]) => Some((*sound).to_string()),
        _ => None,
    }
}

/// Moves `filename` to the good field if the media exists, otherwise to the
/// broken field with a note about why.
pub fn place_sound(note: &mut Note, filename: &str, exists: bool) {
    if exists {
        note.set(SOUND_GOOD, format!("[sound:{filename}]"));
        note.set(SOUND_BAD, String::new());
    } else {
        note.set(SOUND_GOOD, String::new());
        note.set(SOUND_BAD, format!("[sound:{filename}] (File not found)"));
    }
}

/// Toggles the sound of a note between the good and broken fields,
/// depending on whether the referenced media file exists.
///
/// Returns false, leaving the note untouched, if there is no sound to
/// toggle.
pub fn toggle_sound(note: &mut Note, media_exists: impl FnOnce(&str) -> bool) -> bool {
    let Some(sound) = sound_to_toggle(note) else {
        return false;
    };
    let exists = media_exists(&sound);
    place_sound(note, &sound, exists);
    true
}

/// Swaps `Meaning` and `ExtraInfo`, dropping a meaning that is only the
/// "practice sentence" placeholder.
///
/// Returns false, leaving the note untouched, if either field is missing.
pub fn swap_meaning_and_extra_info(note: &mut Note) -> bool {
    let (Some(meaning), Some(extra_info)) = (note.get(MEANING), note.get(EXTRA_INFO)) else {
        return false;
    };
    let meaning = meaning.to_string();
    let extra_info = extra_info.to_string();

    let placeholder = is_practice_sentence(&meaning);
    tracing::debug!(note = %note.id, placeholder, "swapping meaning and extra info");

    note.set(MEANING, extra_info);
    note.set(EXTRA_INFO, if placeholder { String::new() } else { meaning });
    true
}

fn is_practice_sentence(meaning: &str) -> bool {
    strsim::levenshtein(&strip_html_media(meaning), PRACTICE_SENTENCE)
        < PRACTICE_SENTENCE_MAX_DISTANCE
}

/// Plain text of a field: image tags become their file name, every other
/// tag is dropped and common entities are decoded.
#[must_use]
pub fn strip_html_media(html: &str) -> String {
    let text = IMAGE.replace_all(html, " $1 ");
    let text = COMMENT.replace_all(&text, "");
    let text = STYLE_OR_SCRIPT.replace_all(&text, "");
    let text = TAG.replace_all(&text, "");
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
