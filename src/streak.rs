//! The saving streak: how many consecutive days a user has saved money.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};

/// A user's run of consecutive days with at least one goal contribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingStreak {
    /// The number of consecutive days.
    #[serde(rename = "savingStreak")]
    pub count: u32,
    /// When the user last contributed to a goal, if ever.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_saving_date: Option<OffsetDateTime>,
}

/// Update `streak` for a contribution made at `now`.
///
/// Calendar days are compared in `local_offset`. A second contribution on the
/// same day leaves the streak as is. Otherwise the streak grows by one if the
/// previous contribution was at most 24 hours ago and restarts at one if it was
/// longer ago or there was none.
pub fn apply_streak(streak: SavingStreak, now: OffsetDateTime, local_offset: UtcOffset) -> SavingStreak {
    let today = now.to_offset(local_offset).date();

    match streak.last_saving_date {
        Some(last) if last.to_offset(local_offset).date() == today => streak,
        last_saving_date => {
            let count = match last_saving_date {
                Some(last) if now - last <= Duration::DAY => streak.count.saturating_add(1),
                _ => 1,
            };

            tracing::debug!("saving streak changed from {} to {count}", streak.count);

            SavingStreak {
                count,
                last_saving_date: Some(now),
            }
        }
    }
}
