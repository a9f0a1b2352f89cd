// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Timestamp;

/// One day of a user's writing-progress ledger.
///
/// `count` is the net number of pure characters added across all works on `date`
/// (local calendar date, serialized as `YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub count: i64,
}

/// How content deltas are admitted into the daily ledger.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPolicy {
    /// Record both growth and shrinkage; the ledger is the net change for the day.
    #[default]
    NetDelta,
    /// Record growth only; deleting text never lowers the day's count.
    IncreaseOnly,
}

impl ProgressPolicy {
    /// Returns the amount to record for a pure-count delta, or `None` to skip the write.
    pub fn admit(self, delta: i64) -> Option<i64> {
        match self {
            _ if delta == 0 => None,
            Self::NetDelta => Some(delta),
            Self::IncreaseOnly if delta > 0 => Some(delta),
            Self::IncreaseOnly => None,
        }
    }
}

/// A content backup taken when a chapter is explicitly saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub content: String,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ProgressPolicy;

    #[rstest]
    #[case(ProgressPolicy::NetDelta, 2, Some(2))]
    #[case(ProgressPolicy::NetDelta, -4, Some(-4))]
    #[case(ProgressPolicy::NetDelta, 0, None)]
    #[case(ProgressPolicy::IncreaseOnly, 2, Some(2))]
    #[case(ProgressPolicy::IncreaseOnly, -4, None)]
    #[case(ProgressPolicy::IncreaseOnly, 0, None)]
    fn admit_follows_policy(
        #[case] policy: ProgressPolicy,
        #[case] delta: i64,
        #[case] expected: Option<i64>,
    ) {
        assert_eq!(policy.admit(delta), expected);
    }

    #[test]
    fn policy_reads_snake_case() {
        let policy: ProgressPolicy = serde_json::from_str("\"increase_only\"").expect("policy");
        assert_eq!(policy, ProgressPolicy::IncreaseOnly);
    }

    #[test]
    fn daily_progress_date_is_iso() {
        let progress = super::DailyProgress {
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 9).expect("date"),
            count: 12,
        };
        let json = serde_json::to_string(&progress).expect("serialize");
        assert_eq!(json, r#"{"date":"2026-03-09","count":12}"#);
    }
}
