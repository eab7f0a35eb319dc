//! Player snapshot.
//!
//! The player is a plain value: every engine operation takes a snapshot by
//! value and hands back the updated one. Nothing here is global.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::challenge::DailyChallenge;
use crate::leveling::next_level_threshold;
use crate::quest::CompletedQuest;
use crate::records::PersonalRecords;

/// Progression state for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    /// Current level (always >= 1)
    pub level: u32,
    /// XP accumulated toward the next level
    pub xp: u32,
    /// Spendable gold
    pub gold: u64,
    /// Consecutive days with at least one completed quest
    pub streak: u32,
    /// Last day a quest was completed
    pub last_active_date: Option<NaiveDate>,
    /// Completed quests, oldest first
    pub quest_history: Vec<CompletedQuest>,
    /// All-time bests
    pub records: PersonalRecords,
    /// Daily challenges for the day they were generated
    pub active_challenges: Vec<DailyChallenge>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Creates a fresh level 1 player.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: 1,
            xp: 0,
            gold: 0,
            streak: 0,
            last_active_date: None,
            quest_history: Vec::new(),
            records: PersonalRecords {
                highest_level: 1,
                ..PersonalRecords::default()
            },
            active_challenges: Vec::new(),
        }
    }

    /// XP needed to leave the current level.
    #[must_use]
    pub const fn next_level_threshold(&self) -> u32 {
        next_level_threshold(self.level)
    }

    /// XP still missing before the next level-up.
    #[must_use]
    pub const fn xp_to_next_level(&self) -> u32 {
        self.next_level_threshold().saturating_sub(self.xp)
    }

    /// Progress within the current level in `0.0..1.0`.
    #[must_use]
    pub fn level_progress(&self) -> f32 {
        self.xp as f32 / self.next_level_threshold() as f32
    }

    /// Quests completed on the given day, in completion order.
    pub fn completions_on(&self, date: NaiveDate) -> impl Iterator<Item = &CompletedQuest> {
        self.quest_history
            .iter()
            .filter(move |entry| entry.completed_on() == date)
    }

    /// Number of quests completed on the given day.
    #[must_use]
    pub fn quests_completed_on(&self, date: NaiveDate) -> u32 {
        self.completions_on(date).count() as u32
    }

    /// Day the active challenges were generated for, if any.
    #[must_use]
    pub fn challenge_date(&self) -> Option<NaiveDate> {
        self.active_challenges.first().map(|c| c.date)
    }
}
