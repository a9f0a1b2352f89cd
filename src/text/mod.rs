// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text accounting: ruby markup parsing, character counts, preview rendering and editor
//! buffer helpers. Everything here is pure.

pub mod count;
pub mod edit;
pub mod preview;
pub mod ruby;

pub use count::{count_pure, count_total, pure_delta};
pub use edit::{insert_dash, insert_ruby, EditError, EditOutcome, DASH};
pub use preview::render_ruby_html;
pub use ruby::{ruby_spans, strip_ruby, RubySpan};
