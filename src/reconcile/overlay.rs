// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-your-writes overlay for chapter fields with a write in flight.
//!
//! A snapshot may predate a local write even when it arrives after it. Each locally written
//! field is remembered until the backend proves it has seen the write: the snapshot echoes
//! the value, or carries an `updated_at` at or after the acknowledged write stamp. A write
//! that was never acknowledged (its caller went away mid-flight) yields to any snapshot
//! stamped after the write was recorded.

use std::collections::HashMap;

use crate::model::{Chapter, ChapterId, ChapterPatch, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ChapterField {
    Title,
    Content,
}

impl ChapterField {
    fn read(self, chapter: &Chapter) -> &str {
        match self {
            Self::Title => chapter.title(),
            Self::Content => chapter.content(),
        }
    }

    fn write(self, chapter: &mut Chapter, value: &str) {
        match self {
            Self::Title => chapter.set_title(value),
            Self::Content => chapter.set_content(value),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingField {
    value: String,
    seq: u64,
    recorded_at: Timestamp,
    acked_at: Option<Timestamp>,
}

/// Identifies one recorded write so a late acknowledgement cannot settle a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WriteTicket {
    chapter_id: ChapterId,
    fields: Vec<ChapterField>,
    seq: u64,
}

#[derive(Debug, Default)]
pub(crate) struct OverlayTable {
    pending: HashMap<(ChapterId, ChapterField), PendingField>,
    next_seq: u64,
}

impl OverlayTable {
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// Records the title/content fields of `patch` as in flight for `chapter_id` as of `now`.
    pub(crate) fn record(
        &mut self,
        chapter_id: &ChapterId,
        patch: &ChapterPatch,
        now: Timestamp,
    ) -> WriteTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        let mut fields = Vec::new();
        for (field, value) in [
            (ChapterField::Title, patch.title.as_deref()),
            (ChapterField::Content, patch.content.as_deref()),
        ] {
            let Some(value) = value else {
                continue;
            };
            self.pending.insert(
                (chapter_id.clone(), field),
                PendingField { value: value.to_owned(), seq, recorded_at: now, acked_at: None },
            );
            fields.push(field);
        }
        WriteTicket { chapter_id: chapter_id.clone(), fields, seq }
    }

    pub(crate) fn acknowledge(&mut self, ticket: &WriteTicket, stamp: Timestamp) {
        for field in &ticket.fields {
            if let Some(pending) = self.pending.get_mut(&(ticket.chapter_id.clone(), *field)) {
                if pending.seq == ticket.seq {
                    pending.acked_at = Some(stamp);
                }
            }
        }
    }

    /// Gives up on a failed write; the next snapshot value wins.
    pub(crate) fn fail(&mut self, ticket: &WriteTicket) {
        for field in &ticket.fields {
            let key = (ticket.chapter_id.clone(), *field);
            if self.pending.get(&key).is_some_and(|pending| pending.seq == ticket.seq) {
                self.pending.remove(&key);
            }
        }
    }

    pub(crate) fn forget_chapter(&mut self, chapter_id: &ChapterId) {
        self.pending.retain(|(id, _), _| id != chapter_id);
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    /// Merges the overlay into `snapshot`, dropping entries the snapshot has caught up with
    /// or whose chapter is gone.
    pub(crate) fn merge(&mut self, snapshot: &mut [Chapter]) {
        self.pending.retain(|(chapter_id, field), pending| {
            let Some(chapter) = snapshot.iter_mut().find(|c| c.id() == chapter_id) else {
                return false;
            };
            if field.read(chapter) == pending.value {
                return false;
            }
            let caught_up = match (pending.acked_at, chapter.updated_at()) {
                (Some(acked), Some(seen)) => seen >= acked,
                (None, Some(seen)) => seen > pending.recorded_at,
                (_, None) => false,
            };
            if caught_up {
                return false;
            }
            field.write(chapter, &pending.value);
            true
        });
    }
}
