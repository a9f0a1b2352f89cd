// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Manuscript character counts.
//!
//! Both counts see annotation blocks as their base text only; readings and markers never
//! count. Lengths are in Unicode scalar values.

use super::ruby::strip_ruby;

/// Counts characters excluding whitespace (pure count).
///
/// Accepts `&str` or `Option<&str>`; absent or empty text counts as 0.
pub fn count_pure<'a>(text: impl Into<Option<&'a str>>) -> usize {
    match text.into() {
        None | Some("") => 0,
        Some(text) => strip_ruby(text).chars().filter(|ch| !ch.is_whitespace()).count(),
    }
}

/// Counts characters including whitespace (total count).
pub fn count_total<'a>(text: impl Into<Option<&'a str>>) -> usize {
    match text.into() {
        None | Some("") => 0,
        Some(text) => strip_ruby(text).chars().count(),
    }
}

/// Pure-count difference between two versions of a text, as a signed amount.
pub fn pure_delta(before: &str, after: &str) -> i64 {
    to_i64(count_pure(after)) - to_i64(count_pure(before))
}

fn to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
