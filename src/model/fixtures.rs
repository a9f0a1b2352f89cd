// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::chapter::Chapter;
use super::ids::{ChapterId, MemoId, UserId, WorkId};
use super::memo::Memo;

pub(crate) fn cid(value: &str) -> ChapterId {
    ChapterId::new(value).expect("chapter id")
}

pub(crate) fn mid(value: &str) -> MemoId {
    MemoId::new(value).expect("memo id")
}

pub(crate) fn wid(value: &str) -> WorkId {
    WorkId::new(value).expect("work id")
}

pub(crate) fn uid(value: &str) -> UserId {
    UserId::new(value).expect("user id")
}

pub(crate) fn chapter(id: &str, order: i64, content: &str) -> Chapter {
    Chapter::new(cid(id), Chapter::default_title(order), content, order)
}

pub(crate) fn memo(id: &str, order: i64) -> Memo {
    Memo::new(mid(id), format!("memo {id}"), "", order)
}

/// Three chapters `a`, `b`, `c` with orders 1..=3.
pub(crate) fn abc_chapters() -> Vec<Chapter> {
    vec![chapter("a", 1, "あいう"), chapter("b", 2, "｜漢字《かんじ》"), chapter("c", 3, "x y")]
}
