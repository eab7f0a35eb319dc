//! Side-effect descriptors returned to the caller.
//!
//! The engine never notifies anyone itself; it returns these so the caller
//! can persist and display them.

use questlog_common::ChallengeId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::challenge::ChallengeReward;
use crate::records::RecordKind;

/// Something noteworthy that happened while applying an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    /// The daily focus bonus was applied
    FocusBonus {
        /// Focus category
        category: String,
        /// Extra XP over the base reward
        bonus_xp: u32,
    },
    /// A new level was reached
    LevelUp {
        /// Level reached
        level: u32,
    },
    /// A daily challenge was completed
    ChallengeCompleted {
        /// Challenge ID
        challenge_id: ChallengeId,
        /// Challenge name
        name: String,
        /// Reward paid
        reward: ChallengeReward,
    },
    /// A personal record was beaten
    NewRecord {
        /// Which record
        kind: RecordKind,
        /// New value
        value: u64,
    },
}

impl ProgressionEvent {
    /// Builds one level-up event per level in `levels`.
    pub fn level_ups(levels: impl IntoIterator<Item = u32>) -> impl Iterator<Item = Self> {
        levels.into_iter().map(|level| Self::LevelUp { level })
    }
}

impl fmt::Display for ProgressionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressionEvent::FocusBonus { category, bonus_xp } => {
                write!(f, "Daily focus bonus ({category}): +{bonus_xp} XP")
            },
            ProgressionEvent::LevelUp { level } => write!(f, "Level up! You reached level {level}"),
            ProgressionEvent::ChallengeCompleted { name, reward, .. } => write!(
                f,
                "Challenge complete: {name} (+{} XP, +{} gold)",
                reward.xp, reward.gold
            ),
            ProgressionEvent::NewRecord { kind, value } => {
                write!(f, "New record! {}: {value}", kind.label())
            },
        }
    }
}
