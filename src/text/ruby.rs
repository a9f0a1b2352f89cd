// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Ruby annotation markup: `｜BASE《READING》`.
//!
//! `BASE` is a non-empty run without any of the three marker glyphs. `READING` is the
//! shortest non-empty run up to the next `》` on the same line. Anything that does not
//! form a complete block is ordinary text.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

pub const RUBY_OPEN: char = '｜';
pub const READING_OPEN: char = '《';
pub const READING_CLOSE: char = '》';

static RUBY_BLOCK: OnceLock<Regex> = OnceLock::new();

pub(crate) fn ruby_block() -> &'static Regex {
    RUBY_BLOCK.get_or_init(|| {
        Regex::new(r"｜([^｜《》]+?)《(.+?)》").expect("hard-coded ruby pattern is valid")
    })
}

/// One well-formed annotation block found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubySpan<'a> {
    pub base: &'a str,
    pub reading: &'a str,
    /// Byte range of the whole block, markers included.
    pub range: Range<usize>,
}

/// Iterates the well-formed annotation blocks of `text`, left to right.
pub fn ruby_spans(text: &str) -> impl Iterator<Item = RubySpan<'_>> + '_ {
    ruby_block().captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let base = caps.get(1)?;
        let reading = caps.get(2)?;
        Some(RubySpan { base: base.as_str(), reading: reading.as_str(), range: whole.range() })
    })
}

/// Replaces every annotation block with its base text.
///
/// Borrows when the text contains no complete block.
pub fn strip_ruby(text: &str) -> Cow<'_, str> {
    ruby_block().replace_all(text, "$1")
}
