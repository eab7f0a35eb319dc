//! Progression engine.
//!
//! Ties the individual rules together into the one operation callers need:
//! "this quest was just completed, what changed?"

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::challenge::{evaluate_challenges, restore_daily_challenges};
use crate::economy::credit_gold;
use crate::events::ProgressionEvent;
use crate::leveling::apply_xp;
use crate::player::Player;
use crate::quest::{complete_quest, daily_focus, CompletedQuest, Quest, QuestCompletion};
use crate::records::{update_records, RecordKind, RecordObservation};
use crate::streak::record_activity;

/// Everything that came out of completing a quest.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    /// Updated player snapshot
    pub player: Player,
    /// History entry for the quest
    pub completed: CompletedQuest,
    /// Whether the daily focus bonus applied
    pub bonus_applied: bool,
    /// Notifications, in the order they happened
    pub events: Vec<ProgressionEvent>,
}

impl CompletionOutcome {
    /// Number of levels gained, including from challenge rewards.
    #[must_use]
    pub fn levels_gained(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ProgressionEvent::LevelUp { .. }))
            .count()
    }
}

/// Stateless rules engine configured with the focus category rotation.
#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine {
    focus_categories: Vec<String>,
}

impl ProgressionEngine {
    /// Creates an engine that rotates the daily focus through `focus_categories`.
    #[must_use]
    pub fn new(focus_categories: Vec<String>) -> Self {
        Self { focus_categories }
    }

    /// Focus category for a day, if any are configured.
    #[must_use]
    pub fn focus_for(&self, date: NaiveDate) -> Option<&str> {
        daily_focus(date, &self.focus_categories)
    }

    /// Makes sure the player's challenges belong to `date`.
    ///
    /// Calling this again on the same day keeps existing challenge progress.
    /// Returning to a day that was already played restores its challenges with
    /// everything its history met marked completed, so nothing is paid twice.
    #[must_use]
    pub fn start_day(&self, mut player: Player, date: NaiveDate) -> Player {
        if player.challenge_date() != Some(date) {
            player.active_challenges = restore_daily_challenges(date, player.completions_on(date));
            debug!(
                %date,
                count = player.active_challenges.len(),
                "Generated daily challenges"
            );
        }
        player
    }

    /// Completes a quest using the rotation's focus for `now`'s date.
    #[must_use]
    pub fn complete_with_rotation(
        &self,
        player: Player,
        quest: &Quest,
        now: NaiveDateTime,
    ) -> CompletionOutcome {
        self.complete(player, quest, self.focus_for(now.date()), now)
    }

    /// Applies a quest completion: rewards, streak, challenges and records.
    #[must_use]
    pub fn complete(
        &self,
        player: Player,
        quest: &Quest,
        daily_focus: Option<&str>,
        now: NaiveDateTime,
    ) -> CompletionOutcome {
        let today = now.date();
        let player = self.start_day(player, today);
        let records_before = player.records;
        let mut events = Vec::new();

        let QuestCompletion {
            player,
            completed,
            bonus_applied,
            level_ups,
        } = complete_quest(player, quest, daily_focus, now);

        if bonus_applied {
            events.push(ProgressionEvent::FocusBonus {
                category: completed.category.clone(),
                bonus_xp: completed.xp.saturating_sub(quest.xp),
            });
        }
        events.extend(ProgressionEvent::level_ups(level_ups.new_levels()));

        let mut player = record_activity(player, today);
        let mut gold_awarded = completed.gold;

        let challenges = std::mem::take(&mut player.active_challenges);
        let (challenges, newly_completed) =
            evaluate_challenges(challenges, player.completions_on(today));
        player.active_challenges = challenges;

        for challenge in newly_completed {
            let (updated, level_ups) = apply_xp(player, challenge.reward.xp);
            player = credit_gold(updated, challenge.reward.gold);
            gold_awarded = gold_awarded.saturating_add(challenge.reward.gold);

            info!(challenge = %challenge.id, name = %challenge.name, "Daily challenge completed");
            events.push(ProgressionEvent::ChallengeCompleted {
                challenge_id: challenge.id,
                name: challenge.name,
                reward: challenge.reward,
            });
            events.extend(ProgressionEvent::level_ups(level_ups.new_levels()));
        }

        let observed = RecordObservation {
            streak: player.streak,
            quests_today: player.quests_completed_on(today),
            level: player.level,
            total_gold_earned: records_before.total_gold_earned.saturating_add(gold_awarded),
        };
        let (records, _) = update_records(player.records, &observed);
        player.records = records;

        events.extend(
            RecordKind::ALL
                .into_iter()
                .filter(|kind| kind.is_announced())
                .filter(|&kind| records.value(kind) > records_before.value(kind))
                .map(|kind| ProgressionEvent::NewRecord {
                    kind,
                    value: records.value(kind),
                }),
        );

        info!(
            quest = %completed.name,
            xp = completed.xp,
            gold = completed.gold,
            level = player.level,
            streak = player.streak,
            "Quest completed"
        );

        CompletionOutcome {
            player,
            completed,
            bonus_applied,
            events,
        }
    }
}
