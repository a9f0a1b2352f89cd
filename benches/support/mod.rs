// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic manuscript fixtures (no RNG) and shared criterion settings.

use std::time::Duration;

use criterion::Criterion;
use genkou::model::{Chapter, ChapterId};

const SENTENCES: &[&str] = &[
    "吾輩は猫である。",
    "｜名前《なまえ》はまだ無い。",
    "どこで生れたかとんと｜見当《けんとう》がつかぬ。\n",
    "何でも薄暗いじめじめした所で泣いていた事だけは記憶している。 ",
    "\u{3000}「――｜此方《こちら》へ」\n",
];

/// Roughly `target_chars` of prose, one ruby block per few sentences.
pub fn manuscript(target_chars: usize) -> String {
    let mut out = String::new();
    let mut chars = 0;
    let mut i = 0;
    while chars < target_chars {
        let sentence = SENTENCES[i % SENTENCES.len()];
        out.push_str(sentence);
        chars += sentence.chars().count();
        i += 1;
    }
    out
}

pub fn chapters(count: usize, chars_each: usize) -> Vec<Chapter> {
    let body = manuscript(chars_each);
    (1..=count)
        .map(|n| {
            let id = ChapterId::new(format!("c{n:04}")).expect("chapter id");
            Chapter::new(id, Chapter::default_title(n as i64), body.clone(), n as i64)
        })
        .collect()
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse().ok()).unwrap_or(default)
}

pub fn criterion() -> Criterion {
    let samples = env_usize("GENKOU_BENCH_SAMPLES", 50).clamp(10, 500);
    let seconds = env_usize("GENKOU_BENCH_SECS", 5).clamp(1, 120) as u64;
    Criterion::default()
        .sample_size(samples)
        .measurement_time(Duration::from_secs(seconds))
}
