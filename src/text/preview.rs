// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ruby::ruby_block;

/// Renders manuscript text as an HTML fragment with `<ruby>` elements.
///
/// `&`, `<` and `>` are escaped before markup conversion, so user text can never inject
/// tags. Line breaks are kept as-is; the caller decides on `white-space` handling.
pub fn render_ruby_html(text: &str) -> String {
    let escaped = escape_html(text);
    ruby_block().replace_all(&escaped, "<ruby>$1<rt>$2</rt></ruby>").into_owned()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
