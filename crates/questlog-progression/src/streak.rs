//! Daily activity streaks.

use chrono::NaiveDate;

use crate::player::Player;

/// Records that the player completed something on `today`.
///
/// Consecutive days extend the streak, repeat activity on the same day is
/// ignored, and anything else (a gap, a first activity, or a clock that
/// moved backwards) starts a new streak of 1.
#[must_use]
pub fn record_activity(mut player: Player, today: NaiveDate) -> Player {
    player.streak = match player.last_active_date {
        Some(last) if last == today => player.streak,
        Some(last) if today.pred_opt() == Some(last) => player.streak.saturating_add(1),
        _ => 1,
    };
    player.last_active_date = Some(today);
    player.records.longest_streak = player.records.longest_streak.max(player.streak);
    player
}

/// Streak to display on `today` without recording any activity.
///
/// A streak whose last activity is older than yesterday is already broken
/// and reads as 0.
#[must_use]
pub fn current_streak(player: &Player, today: NaiveDate) -> u32 {
    match player.last_active_date {
        Some(last) if last == today || today.pred_opt() == Some(last) => player.streak,
        _ => 0,
    }
}
