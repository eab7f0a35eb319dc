//! Quests and quest completion.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use questlog_common::QuestId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::economy::{apply_focus_bonus, credit_gold, gold_for_xp};
use crate::leveling::{apply_xp, LevelUps};
use crate::player::Player;

/// Smallest XP value a quest may carry.
pub const MIN_QUEST_XP: u32 = 10;

/// Largest XP value a quest may carry.
pub const MAX_QUEST_XP: u32 = 500;

/// Error types for quest operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestError {
    /// Quest name is empty
    #[error("Quest name cannot be empty")]
    EmptyName,
    /// Quest category is empty
    #[error("Quest category cannot be empty")]
    EmptyCategory,
    /// Quest XP outside the allowed range
    #[error("Quest XP must be between 10 and 500, got {0}")]
    XpOutOfRange(u32),
    /// Quest not found
    #[error("Quest not found: {0}")]
    NotFound(String),
    /// More than one quest matches an ID prefix
    #[error("Quest ID prefix is ambiguous: {0}")]
    Ambiguous(String),
    /// Quest already completed
    #[error("Quest already completed: {0}")]
    AlreadyCompleted(QuestId),
}

/// Result type for quest operations.
pub type QuestResult<T> = Result<T, QuestError>;

/// Checks user input for a new quest.
///
/// Runs before a [`Quest`] is built; the completion path trusts its input.
pub fn validate_quest_input(name: &str, category: &str, xp: u32) -> QuestResult<()> {
    if name.trim().is_empty() {
        return Err(QuestError::EmptyName);
    }
    if category.trim().is_empty() {
        return Err(QuestError::EmptyCategory);
    }
    if !(MIN_QUEST_XP..=MAX_QUEST_XP).contains(&xp) {
        return Err(QuestError::XpOutOfRange(xp));
    }
    Ok(())
}

/// A task the player has set for themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    /// Unique quest identifier
    pub id: QuestId,
    /// Quest name
    pub name: String,
    /// Category, matched against the daily focus
    pub category: String,
    /// Base XP reward
    pub xp: u32,
    /// Whether the quest has been completed
    pub completed: bool,
    /// Creation time
    pub created_at: NaiveDateTime,
}

impl Quest {
    /// Creates a new open quest with a fresh ID.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        xp: u32,
        created_at: NaiveDateTime,
    ) -> Self {
        Self::with_id(QuestId::generate(), name, category, xp, created_at)
    }

    /// Creates a new open quest with a known ID.
    #[must_use]
    pub fn with_id(
        id: QuestId,
        name: impl Into<String>,
        category: impl Into<String>,
        xp: u32,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            xp,
            completed: false,
            created_at,
        }
    }
}

/// Immutable record of a completed quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedQuest {
    /// ID of the quest that was completed
    pub quest_id: QuestId,
    /// Quest name at completion time
    pub name: String,
    /// Quest category
    pub category: String,
    /// XP awarded, including any focus bonus
    pub xp: u32,
    /// Gold awarded
    pub gold: u64,
    /// Completion time
    pub completed_at: NaiveDateTime,
}

impl CompletedQuest {
    /// Calendar day the quest was completed on.
    #[must_use]
    pub fn completed_on(&self) -> NaiveDate {
        self.completed_at.date()
    }
}

/// Rewards owed for a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestReward {
    /// XP to award
    pub xp: u32,
    /// Gold to award
    pub gold: u64,
    /// Whether the daily focus bonus applies
    pub bonus_applied: bool,
}

/// Computes the reward for completing `quest` under the given focus.
#[must_use]
pub fn quest_reward(quest: &Quest, daily_focus: Option<&str>) -> QuestReward {
    let bonus_applied = daily_focus.is_some_and(|focus| focus == quest.category);
    let xp = if bonus_applied {
        apply_focus_bonus(quest.xp)
    } else {
        quest.xp
    };
    QuestReward {
        xp,
        gold: gold_for_xp(quest.xp),
        bonus_applied,
    }
}

/// Result of [`complete_quest`].
#[derive(Debug, Clone)]
pub struct QuestCompletion {
    /// Updated player
    pub player: Player,
    /// History entry appended for this quest
    pub completed: CompletedQuest,
    /// Whether the focus bonus was applied
    pub bonus_applied: bool,
    /// Level-ups caused by the quest XP
    pub level_ups: LevelUps,
}

/// Pays out a quest and appends it to the player's history.
///
/// The caller is responsible for marking `quest` completed in its own
/// quest list.
#[must_use]
pub fn complete_quest(
    player: Player,
    quest: &Quest,
    daily_focus: Option<&str>,
    now: NaiveDateTime,
) -> QuestCompletion {
    let reward = quest_reward(quest, daily_focus);

    let (player, level_ups) = apply_xp(player, reward.xp);
    let mut player = credit_gold(player, reward.gold);

    let completed = CompletedQuest {
        quest_id: quest.id.clone(),
        name: quest.name.clone(),
        category: quest.category.clone(),
        xp: reward.xp,
        gold: reward.gold,
        completed_at: now,
    };
    player.quest_history.push(completed.clone());

    QuestCompletion {
        player,
        completed,
        bonus_applied: reward.bonus_applied,
        level_ups,
    }
}

/// Picks the focus category for a day by rotating through `categories`.
#[must_use]
pub fn daily_focus(date: NaiveDate, categories: &[String]) -> Option<&str> {
    if categories.is_empty() {
        return None;
    }
    let index = date.ordinal0() as usize % categories.len();
    Some(categories[index].as_str())
}

/// Finds an open quest by exact ID or unique ID prefix.
pub fn find_quest<'a>(quests: &'a mut [Quest], id_or_prefix: &str) -> QuestResult<&'a mut Quest> {
    let needle = id_or_prefix.trim();
    if let Some(pos) = quests.iter().position(|q| q.id.as_str() == needle) {
        return Ok(&mut quests[pos]);
    }

    let matches: Vec<usize> = quests
        .iter()
        .enumerate()
        .filter(|(_, q)| q.id.matches_prefix(needle))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [pos] => Ok(&mut quests[*pos]),
        [] => Err(QuestError::NotFound(needle.to_string())),
        _ => Err(QuestError::Ambiguous(needle.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid timestamp")
    }

    fn quest(category: &str, xp: u32) -> Quest {
        Quest::with_id(
            QuestId::from_raw(format!("q-{category}-{xp}")),
            "Test quest",
            category,
            xp,
            at(2024, 5, 1, 8),
        )
    }

    #[test]
    fn test_validate_quest_input() {
        assert!(validate_quest_input("Run 5k", "Health", 50).is_ok());
        assert_eq!(
            validate_quest_input("   ", "Health", 50),
            Err(QuestError::EmptyName)
        );
        assert_eq!(
            validate_quest_input("Run", "", 50),
            Err(QuestError::EmptyCategory)
        );
        assert_eq!(
            validate_quest_input("Run", "Health", 9),
            Err(QuestError::XpOutOfRange(9))
        );
        assert_eq!(
            validate_quest_input("Run", "Health", 501),
            Err(QuestError::XpOutOfRange(501))
        );
        assert!(validate_quest_input("Run", "Health", 10).is_ok());
        assert!(validate_quest_input("Run", "Health", 500).is_ok());
    }

    #[test]
    fn test_complete_quest_without_focus() {
        let work = quest("Work", 60);
        let outcome = complete_quest(Player::new(), &work, Some("Health"), at(2024, 5, 1, 9));
        assert!(!outcome.bonus_applied);
        assert_eq!(outcome.completed.xp, 60);
        assert_eq!(outcome.completed.gold, 30);
        assert_eq!(outcome.player.xp, 60);
        assert_eq!(outcome.player.gold, 30);
        assert_eq!(outcome.player.quest_history.len(), 1);
    }

    #[test]
    fn test_focus_category_gets_bonus_xp_but_same_gold() {
        let health = quest("Health", 50);
        let outcome = complete_quest(Player::new(), &health, Some("Health"), at(2024, 5, 1, 9));
        assert!(outcome.bonus_applied);
        assert_eq!(outcome.completed.xp, 63); // 62.5 rounds up
        assert_eq!(outcome.completed.gold, 25);
        assert_eq!(outcome.completed.category, "Health");
    }

    #[test]
    fn test_no_focus_means_no_bonus() {
        let outcome = complete_quest(Player::new(), &quest("Health", 40), None, at(2024, 5, 1, 9));
        assert!(!outcome.bonus_applied);
        assert_eq!(outcome.completed.xp, 40);
    }

    #[test]
    fn test_completion_can_level_up() {
        let player = Player {
            level: 2,
            xp: 150,
            ..Player::new()
        };
        let outcome = complete_quest(player, &quest("Work", 50), Some("Health"), at(2024, 5, 1, 9));
        assert_eq!(outcome.player.level, 3);
        assert_eq!(outcome.player.xp, 0);
        assert_eq!(outcome.level_ups.count, 1);
        assert_eq!(outcome.player.gold, 25);
    }

    #[test]
    fn test_history_is_append_only() {
        let first = complete_quest(Player::new(), &quest("Work", 20), None, at(2024, 5, 1, 9));
        let second = complete_quest(first.player, &quest("Learning", 30), None, at(2024, 5, 1, 10));
        let names: Vec<_> = second
            .player
            .quest_history
            .iter()
            .map(|q| q.category.as_str())
            .collect();
        assert_eq!(names, vec!["Work", "Learning"]);
    }

    #[test]
    fn test_daily_focus_rotates_by_day() {
        let categories = vec!["Work".to_string(), "Health".to_string(), "Learning".to_string()];
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).expect("date");
        let jan4 = NaiveDate::from_ymd_opt(2024, 1, 4).expect("date");
        assert_eq!(daily_focus(jan1, &categories), Some("Work"));
        assert_eq!(daily_focus(jan2, &categories), Some("Health"));
        assert_eq!(daily_focus(jan4, &categories), Some("Work"));
        assert_eq!(daily_focus(jan1, &[]), None);
    }

    #[test]
    fn test_find_quest_by_prefix() {
        let mut quests = vec![
            Quest::with_id(QuestId::from_raw("abc-1"), "A", "Work", 10, at(2024, 5, 1, 8)),
            Quest::with_id(QuestId::from_raw("abd-2"), "B", "Work", 10, at(2024, 5, 1, 8)),
        ];
        assert_eq!(find_quest(&mut quests, "abd").map(|q| q.name.clone()), Ok("B".to_string()));
        assert_eq!(
            find_quest(&mut quests, "ab").map(|q| q.name.clone()),
            Err(QuestError::Ambiguous("ab".to_string()))
        );
        assert_eq!(
            find_quest(&mut quests, "zzz").map(|q| q.name.clone()),
            Err(QuestError::NotFound("zzz".to_string()))
        );
        assert_eq!(find_quest(&mut quests, "abc-1").map(|q| q.name.clone()), Ok("A".to_string()));
    }
}
