//! Personal records.
//!
//! Every record is a ratchet: it can only move up. Re-applying the same or
//! smaller observations leaves the records untouched.

use serde::{Deserialize, Serialize};

/// All-time bests for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalRecords {
    /// Longest streak ever reached
    pub longest_streak: u32,
    /// Most quests completed in one day
    pub most_quests_in_day: u32,
    /// Highest level ever reached
    pub highest_level: u32,
    /// Lifetime gold earned (never reduced by spending)
    pub total_gold_earned: u64,
}

/// Which record a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Longest streak
    LongestStreak,
    /// Most quests in a day
    MostQuestsInDay,
    /// Highest level
    HighestLevel,
    /// Lifetime gold
    TotalGoldEarned,
}

impl RecordKind {
    /// All record kinds in display order.
    pub const ALL: [RecordKind; 4] = [
        RecordKind::LongestStreak,
        RecordKind::MostQuestsInDay,
        RecordKind::HighestLevel,
        RecordKind::TotalGoldEarned,
    ];

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RecordKind::LongestStreak => "Longest streak",
            RecordKind::MostQuestsInDay => "Most quests in a day",
            RecordKind::HighestLevel => "Highest level",
            RecordKind::TotalGoldEarned => "Total gold earned",
        }
    }

    /// Whether beating this record deserves a notification.
    ///
    /// Lifetime gold grows on every completion, so it is not announced.
    #[must_use]
    pub const fn is_announced(self) -> bool {
        !matches!(self, RecordKind::TotalGoldEarned)
    }
}

/// Values observed after an event, to be ratcheted into the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordObservation {
    /// Current streak
    pub streak: u32,
    /// Quests completed so far today
    pub quests_today: u32,
    /// Current level
    pub level: u32,
    /// Lifetime gold including this event's award
    pub total_gold_earned: u64,
}

impl PersonalRecords {
    /// Returns the stored value of a record.
    #[must_use]
    pub const fn value(&self, kind: RecordKind) -> u64 {
        match kind {
            RecordKind::LongestStreak => self.longest_streak as u64,
            RecordKind::MostQuestsInDay => self.most_quests_in_day as u64,
            RecordKind::HighestLevel => self.highest_level as u64,
            RecordKind::TotalGoldEarned => self.total_gold_earned,
        }
    }
}

/// Ratchets each record up to the observed value.
///
/// Returns the new records and the kinds that improved, in
/// [`RecordKind::ALL`] order.
#[must_use]
pub fn update_records(
    records: PersonalRecords,
    observed: &RecordObservation,
) -> (PersonalRecords, Vec<RecordKind>) {
    let updated = PersonalRecords {
        longest_streak: records.longest_streak.max(observed.streak),
        most_quests_in_day: records.most_quests_in_day.max(observed.quests_today),
        highest_level: records.highest_level.max(observed.level),
        total_gold_earned: records.total_gold_earned.max(observed.total_gold_earned),
    };

    let improved = RecordKind::ALL
        .into_iter()
        .filter(|&kind| updated.value(kind) > records.value(kind))
        .collect();

    (updated, improved)
}
