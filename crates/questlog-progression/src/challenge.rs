//! Daily challenges.
//!
//! This module provides:
//! - A fixed catalog of challenge templates
//! - Date-seeded selection of the day's challenges
//! - Evaluation of challenges against the day's completions

use chrono::{Datelike, NaiveDate};
use questlog_common::ChallengeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::quest::CompletedQuest;

/// Day-of-year values are folded into this many seeds.
pub const SEED_PERIOD: u32 = 20;

/// Stride between selected catalog slots.
pub const SELECTION_STRIDE: usize = 7;

// ============================================================================
// Requirements and rewards
// ============================================================================

/// What a challenge asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChallengeRequirement {
    /// Complete a number of quests
    CompleteQuests {
        /// Required quest count
        count: u32,
    },
    /// Earn an amount of quest XP
    EarnXp {
        /// Required XP
        count: u32,
    },
    /// Complete a number of quests in one category
    CompleteCategory {
        /// Required quest count
        count: u32,
        /// Category to count
        category: String,
    },
}

impl ChallengeRequirement {
    /// Target value for this requirement.
    #[must_use]
    pub const fn required(&self) -> u64 {
        match self {
            ChallengeRequirement::CompleteQuests { count }
            | ChallengeRequirement::EarnXp { count }
            | ChallengeRequirement::CompleteCategory { count, .. } => *count as u64,
        }
    }

    /// Current value from the day's tally.
    #[must_use]
    pub fn progress(&self, tally: &DayTally) -> u64 {
        match self {
            ChallengeRequirement::CompleteQuests { .. } => u64::from(tally.quests),
            ChallengeRequirement::EarnXp { .. } => tally.xp,
            ChallengeRequirement::CompleteCategory { category, .. } => {
                u64::from(tally.category_count(category))
            },
        }
    }

    /// Whether the tally meets this requirement.
    #[must_use]
    pub fn is_satisfied(&self, tally: &DayTally) -> bool {
        self.progress(tally) >= self.required()
    }
}

/// Bonus paid once when a challenge is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChallengeReward {
    /// Bonus XP
    pub xp: u32,
    /// Bonus gold
    pub gold: u64,
}

// ============================================================================
// Catalog
// ============================================================================

/// Requirement shape inside a static template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRequirement {
    /// Complete N quests
    Quests(u32),
    /// Earn N XP
    Xp(u32),
    /// Complete N quests in a category
    Category(&'static str, u32),
}

impl TemplateRequirement {
    fn instantiate(self) -> ChallengeRequirement {
        match self {
            TemplateRequirement::Quests(count) => ChallengeRequirement::CompleteQuests { count },
            TemplateRequirement::Xp(count) => ChallengeRequirement::EarnXp { count },
            TemplateRequirement::Category(category, count) => {
                ChallengeRequirement::CompleteCategory {
                    count,
                    category: category.to_string(),
                }
            },
        }
    }
}

/// A catalog entry challenges are stamped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeTemplate {
    /// Display name
    pub name: &'static str,
    /// Display description
    pub description: &'static str,
    /// Requirement
    pub requirement: TemplateRequirement,
    /// Reward
    pub reward: ChallengeReward,
}

const fn template(
    name: &'static str,
    description: &'static str,
    requirement: TemplateRequirement,
    xp: u32,
    gold: u64,
) -> ChallengeTemplate {
    ChallengeTemplate {
        name,
        description,
        requirement,
        reward: ChallengeReward { xp, gold },
    }
}

/// The challenge catalog. Order is significant: selection indexes into it.
pub const CHALLENGE_CATALOG: [ChallengeTemplate; 10] = [
    template("Quest Starter", "Complete 3 quests today", TemplateRequirement::Quests(3), 50, 25),
    template("XP Hunter", "Earn 150 XP today", TemplateRequirement::Xp(150), 50, 25),
    template(
        "Fitness Focus",
        "Complete 2 Health quests",
        TemplateRequirement::Category("Health", 2),
        60,
        30,
    ),
    template("Productive Day", "Complete 5 quests today", TemplateRequirement::Quests(5), 100, 50),
    template(
        "Knowledge Seeker",
        "Complete 2 Learning quests",
        TemplateRequirement::Category("Learning", 2),
        60,
        30,
    ),
    template("XP Surge", "Earn 300 XP today", TemplateRequirement::Xp(300), 100, 50),
    template(
        "Work Warrior",
        "Complete 3 Work quests",
        TemplateRequirement::Category("Work", 3),
        75,
        40,
    ),
    template(
        "Early Momentum",
        "Complete your first quest today",
        TemplateRequirement::Quests(1),
        20,
        10,
    ),
    template(
        "Self-Care",
        "Complete 2 Personal quests",
        TemplateRequirement::Category("Personal", 2),
        60,
        30,
    ),
    template("Marathon", "Complete 8 quests today", TemplateRequirement::Quests(8), 200, 100),
];

// ============================================================================
// Daily challenges
// ============================================================================

/// A challenge active for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    /// Challenge identifier
    pub id: ChallengeId,
    /// Display name
    pub name: String,
    /// Display description
    pub description: String,
    /// Day the challenge belongs to
    pub date: NaiveDate,
    /// Requirement
    pub requirement: ChallengeRequirement,
    /// Reward
    pub reward: ChallengeReward,
    /// Whether the reward has been earned
    pub completed: bool,
}

impl DailyChallenge {
    fn from_template(template: &ChallengeTemplate, date: NaiveDate, slot: usize) -> Self {
        Self {
            id: ChallengeId::new(&date.format("%Y-%m-%d").to_string(), slot),
            name: template.name.to_string(),
            description: template.description.to_string(),
            date,
            requirement: template.requirement.instantiate(),
            reward: template.reward,
            completed: false,
        }
    }

    /// Progress toward the requirement as (current, required).
    #[must_use]
    pub fn status(&self, tally: &DayTally) -> (u64, u64) {
        let required = self.requirement.required();
        let current = self.requirement.progress(tally).min(required);
        (current, required)
    }
}

/// Zero-based day of the year (Jan 1 is 0).
#[must_use]
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal0()
}

/// Selection seed for a date.
#[must_use]
pub fn challenge_seed(date: NaiveDate) -> u32 {
    day_of_year(date) % SEED_PERIOD
}

/// Catalog slots chosen for a seed.
///
/// Picks `2 + seed % 2` slots at `(seed + i * 7) % catalog_len`. Two slots can
/// land on the same template; that is kept as is.
#[must_use]
pub fn challenge_indices(seed: u32, catalog_len: usize) -> Vec<usize> {
    if catalog_len == 0 {
        return Vec::new();
    }
    let seed = seed as usize;
    let count = 2 + seed % 2;
    (0..count)
        .map(|i| (seed + i * SELECTION_STRIDE) % catalog_len)
        .collect()
}

/// The challenges for a date. Same date, same challenges.
#[must_use]
pub fn generate_daily_challenges(date: NaiveDate) -> Vec<DailyChallenge> {
    challenge_indices(challenge_seed(date), CHALLENGE_CATALOG.len())
        .into_iter()
        .enumerate()
        .map(|(slot, index)| DailyChallenge::from_template(&CHALLENGE_CATALOG[index], date, slot))
        .collect()
}

// ============================================================================
// Evaluation
// ============================================================================

/// Running totals for one day's completions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTally {
    /// Quests completed
    pub quests: u32,
    /// XP earned from quests
    pub xp: u64,
    /// Quests completed per category
    pub by_category: BTreeMap<String, u32>,
}

impl DayTally {
    /// Builds a tally from completions.
    pub fn from_completions<'a>(completions: impl IntoIterator<Item = &'a CompletedQuest>) -> Self {
        let mut tally = Self::default();
        for entry in completions {
            tally.quests += 1;
            tally.xp += u64::from(entry.xp);
            *tally.by_category.entry(entry.category.clone()).or_insert(0) += 1;
        }
        tally
    }

    /// Quests completed in a category.
    #[must_use]
    pub fn category_count(&self, category: &str) -> u32 {
        self.by_category.get(category).copied().unwrap_or(0)
    }
}

/// Marks challenges whose requirement is now met.
///
/// Returns the updated challenges and those that completed during this call.
/// Already completed challenges are never reported again.
#[must_use]
pub fn evaluate_challenges<'a>(
    mut challenges: Vec<DailyChallenge>,
    todays_completions: impl IntoIterator<Item = &'a CompletedQuest>,
) -> (Vec<DailyChallenge>, Vec<DailyChallenge>) {
    let tally = DayTally::from_completions(todays_completions);
    let mut newly_completed = Vec::new();

    for challenge in &mut challenges {
        if !challenge.completed && challenge.requirement.is_satisfied(&tally) {
            challenge.completed = true;
            newly_completed.push(challenge.clone());
        }
    }

    (challenges, newly_completed)
}

/// The challenges for a date, with those its completions already meet marked
/// completed.
///
/// Used when a day's challenges are rebuilt after the day has been played:
/// whatever the history already satisfies was paid at the time and must not be
/// reported as newly completed again.
#[must_use]
pub fn restore_daily_challenges<'a>(
    date: NaiveDate,
    completions: impl IntoIterator<Item = &'a CompletedQuest>,
) -> Vec<DailyChallenge> {
    let (challenges, _) = evaluate_challenges(generate_daily_challenges(date), completions);
    challenges
}
