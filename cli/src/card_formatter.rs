// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::io;

use colored::Color;
use wanisync_core::CardSummary;

use crate::table::{Column, PaddingDirection, Table};

#[derive(Debug)]
pub struct CardFormatter {
    pub columns: Vec<CardColumn>,
}

impl CardFormatter {
    pub fn new() -> Self {
        Self {
            columns: vec![
                CardColumn::Note,
                CardColumn::Kanji,
                CardColumn::Level,
                CardColumn::Readings,
                CardColumn::Meaning,
            ],
        }
    }

    pub fn write(&self, w: &mut impl io::Write, cards: &[CardSummary]) -> io::Result<()> {
        Table::new(&self.columns, cards).write_to(w)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum CardColumn {
    Note,
    Kanji,
    Level,
    Readings,
    Meaning,
}

impl Column<CardSummary> for CardColumn {
    fn format(&self, card: &CardSummary) -> String {
        match self {
            Self::Note => format!("cid#{}", card.note),
            Self::Kanji => card.kanji.clone(),
            Self::Level => format!("Lv. {}", card.level),
            Self::Readings => format!("{} / {}", card.onyomi, card.kunyomi),
            Self::Meaning => card.meaning.clone(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Level => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn get_color(&self, _card: &CardSummary) -> Option<Color> {
        match self {
            Self::Kanji => Some(Color::Magenta),
            _ => None,
        }
    }
}
