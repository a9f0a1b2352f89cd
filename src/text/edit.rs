// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Buffer edits behind the editor shortcuts (ruby insertion, dash insertion).
//!
//! Selections and carets are byte offsets into the buffer.

use std::ops::Range;

use super::ruby::{READING_CLOSE, READING_OPEN, RUBY_OPEN};

/// Double em-dash inserted by the dash shortcut.
pub const DASH: &str = "――";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub text: String,
    /// Caret position (byte offset) after the edit.
    pub caret: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("selection {start}..{end} is outside the buffer (len={len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("selection {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
}

/// Wraps the selection as `｜SEL《》` and places the caret inside the reading brackets.
pub fn insert_ruby(buffer: &str, selection: Range<usize>) -> Result<EditOutcome, EditError> {
    let selected = checked_slice(buffer, &selection)?;

    let mut block = String::with_capacity(selected.len() + 9);
    block.push(RUBY_OPEN);
    block.push_str(selected);
    block.push(READING_OPEN);
    let caret = selection.start + block.len();
    block.push(READING_CLOSE);

    Ok(EditOutcome { text: splice(buffer, &selection, &block), caret })
}

/// Replaces the selection with [`DASH`] and places the caret after it.
pub fn insert_dash(buffer: &str, selection: Range<usize>) -> Result<EditOutcome, EditError> {
    checked_slice(buffer, &selection)?;
    Ok(EditOutcome { text: splice(buffer, &selection, DASH), caret: selection.start + DASH.len() })
}

fn checked_slice<'a>(buffer: &'a str, selection: &Range<usize>) -> Result<&'a str, EditError> {
    let Range { start, end } = *selection;
    if start > end || end > buffer.len() {
        return Err(EditError::OutOfBounds { start, end, len: buffer.len() });
    }
    buffer.get(start..end).ok_or(EditError::NotCharBoundary { start, end })
}

fn splice(buffer: &str, selection: &Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(buffer.len() + replacement.len());
    out.push_str(&buffer[..selection.start]);
    out.push_str(replacement);
    out.push_str(&buffer[selection.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::{insert_dash, insert_ruby, EditError, DASH};

    #[test]
    fn ruby_wraps_selection_and_parks_caret_in_reading() {
        let buffer = "彼は漢字を読む";
        let start = "彼は".len();
        let end = start + "漢字".len();

        let outcome = insert_ruby(buffer, start..end).expect("insert ruby");
        assert_eq!(outcome.text, "彼は｜漢字《》を読む");
        assert_eq!(&outcome.text[..outcome.caret], "彼は｜漢字《");
    }

    #[test]
    fn ruby_with_empty_selection_inserts_empty_block() {
        let outcome = insert_ruby("ab", 1..1).expect("insert ruby");
        assert_eq!(outcome.text, "a｜《》b");
        assert_eq!(&outcome.text[outcome.caret..], "》b");
    }

    #[test]
    fn dash_replaces_selection() {
        let outcome = insert_dash("あいう", 3..6).expect("insert dash");
        assert_eq!(outcome.text, format!("あ{DASH}う"));
        assert_eq!(&outcome.text[outcome.caret..], "う");
    }

    #[test]
    fn rejects_bad_selections() {
        assert_eq!(
            insert_dash("ab", 1..5),
            Err(EditError::OutOfBounds { start: 1, end: 5, len: 2 })
        );
        assert_eq!(insert_ruby("あ", 1..2), Err(EditError::NotCharBoundary { start: 1, end: 2 }));
    }
}
