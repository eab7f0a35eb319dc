//! # QuestLog Progression
//!
//! Progression and reward rules for QuestLog RPG.
//!
//! Everything in this crate is a pure function over a [`Player`] snapshot:
//! - Leveling and XP
//! - Quest completion and the gold economy
//! - Daily focus bonus and leisure rewards
//! - Activity streaks
//! - Personal records
//! - Date-seeded daily challenges
//! - JSON/CSV export and weekly insight stats
//!
//! No function here performs I/O. Callers own persistence and must apply
//! updates to a given player one at a time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod challenge;
pub mod economy;
pub mod engine;
pub mod events;
pub mod export;
pub mod insights;
pub mod leveling;
pub mod player;
pub mod quest;
pub mod records;
pub mod streak;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::challenge::*;
    pub use crate::economy::*;
    pub use crate::engine::*;
    pub use crate::events::*;
    pub use crate::export::*;
    pub use crate::insights::*;
    pub use crate::leveling::*;
    pub use crate::player::*;
    pub use crate::quest::*;
    pub use crate::records::*;
    pub use crate::streak::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn test_week_of_play() {
        let engine = ProgressionEngine::new(vec!["Health".to_string(), "Work".to_string()]);
        let mut player = Player::new();
        let mut quests = Vec::new();

        for d in 1..=5 {
            quests.push(Quest::new(format!("Day {d} run"), "Health", 40, at(d, 6)));
            quests.push(Quest::new(format!("Day {d} email"), "Work", 20, at(d, 6)));
        }

        for (i, quest) in quests.iter_mut().enumerate() {
            let d = (i / 2) as u32 + 1;
            let outcome = engine.complete_with_rotation(player, quest, at(d, 9 + i as u32 % 2));
            quest.completed = true;
            player = outcome.player;
        }

        assert_eq!(player.streak, 5);
        assert_eq!(player.records.longest_streak, 5);
        assert_eq!(player.quest_history.len(), 10);
        assert!(player.records.most_quests_in_day >= 2);
        assert!(player.level > 1);
        assert!(player.xp < player.next_level_threshold());
        assert_eq!(player.records.highest_level, player.level);
        assert!(player.records.total_gold_earned >= player.gold);
        assert!(quests.iter().all(|q| q.completed));

        let stats = WeeklyStats::collect(&player, at(5, 0).date());
        assert_eq!(stats.recent_quests.len(), 10);
        assert_eq!(stats.category_breakdown.get("Health"), Some(&5));

        let csv = export_csv(&player.quest_history);
        assert_eq!(csv.lines().count(), 11);
    }

    #[test]
    fn test_wallet_redemption_after_quests() {
        let engine = ProgressionEngine::default();
        let quest = Quest::new("Deep work", "Work", 200, at(1, 8));
        let outcome = engine.complete(Player::new(), &quest, None, at(1, 9));
        let reward = LeisureReward::new("Episode of a show", 50);
        let after = redeem_reward(&outcome.player, &reward).expect("Should afford");
        assert_eq!(after.gold, outcome.player.gold - 50);
        assert_eq!(after.records.total_gold_earned, outcome.player.records.total_gold_earned);
    }
}
