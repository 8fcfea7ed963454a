//! Admin reports over a date range.
//!
//! Ranges are whole calendar days in UTC, both ends inclusive.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strequelistan_shared::types::AccountId;

/// Number of unvoided streques one account made in a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrequeCount {
    /// The account.
    pub account_id: AccountId,
    /// Unvoided streques in the range.
    pub count: u64,
}

/// Returns the half-open instant window `[from 00:00, to + 1 day 00:00)`.
///
/// A `to` before `from` yields an empty window.
#[must_use]
pub fn day_window(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = from.and_time(NaiveTime::MIN).and_utc();
    let end = to
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
        .and_utc();
    (start, end.max(start))
}

/// Counts streques per account, most first, ties by account id.
#[must_use]
pub fn rank_streque_counts(owners: impl IntoIterator<Item = AccountId>) -> Vec<StrequeCount> {
    let mut counts: HashMap<AccountId, u64> = HashMap::new();
    for account_id in owners {
        *counts.entry(account_id).or_default() += 1;
    }
    let mut ranked: Vec<StrequeCount> = counts
        .into_iter()
        .map(|(account_id, count)| StrequeCount { account_id, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.account_id.cmp(&b.account_id)));
    ranked
}
