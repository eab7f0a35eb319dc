//! Weekly statistics for the coaching-text service.
//!
//! The service itself is an opaque text generator; this module only builds
//! its request body and reads the `insights` string out of its response.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::player::Player;
use crate::streak::current_streak;

/// Days covered by the weekly window, today included.
pub const WEEK_DAYS: i64 = 7;

/// A quest in the weekly window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentQuest {
    /// Quest name
    pub name: String,
    /// Quest category
    pub category: String,
    /// XP awarded
    pub xp: u32,
    /// Completion time
    pub completed_at: NaiveDateTime,
}

/// Aggregated stats sent to the insights service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    /// Current level
    pub level: u32,
    /// XP toward next level
    pub xp: u32,
    /// Current gold
    pub gold: u64,
    /// Current streak (0 if already broken)
    pub streak: u32,
    /// Quests completed all time
    pub completed_quests: usize,
    /// Quests completed in the last seven days, oldest first
    pub recent_quests: Vec<RecentQuest>,
    /// Quests per category over the last seven days
    pub category_breakdown: BTreeMap<String, u32>,
}

impl WeeklyStats {
    /// Collects stats for the seven days ending on `today`.
    #[must_use]
    pub fn collect(player: &Player, today: NaiveDate) -> Self {
        let window_start = today - Duration::days(WEEK_DAYS - 1);

        let recent_quests: Vec<RecentQuest> = player
            .quest_history
            .iter()
            .filter(|entry| (window_start..=today).contains(&entry.completed_on()))
            .map(|entry| RecentQuest {
                name: entry.name.clone(),
                category: entry.category.clone(),
                xp: entry.xp,
                completed_at: entry.completed_at,
            })
            .collect();

        let mut category_breakdown = BTreeMap::new();
        for quest in &recent_quests {
            *category_breakdown.entry(quest.category.clone()).or_insert(0) += 1;
        }

        Self {
            level: player.level,
            xp: player.xp,
            gold: player.gold,
            streak: current_streak(player, today),
            completed_quests: player.quest_history.len(),
            recent_quests,
            category_breakdown,
        }
    }

    /// Category with the most quests this week, ties broken alphabetically.
    #[must_use]
    pub fn top_category(&self) -> Option<&str> {
        self.category_breakdown
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(category, _)| category.as_str())
    }

    /// XP earned this week.
    #[must_use]
    pub fn weekly_xp(&self) -> u64 {
        self.recent_quests.iter().map(|q| u64::from(q.xp)).sum()
    }
}

/// Request body for the insights service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightsRequest<'a> {
    /// Stats to summarize
    pub stats: &'a WeeklyStats,
}

/// Response body from the insights service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InsightsResponse {
    /// Coaching text
    pub insights: String,
}

/// Extracts the coaching text from a service response body.
pub fn parse_insights_response(body: &str) -> Result<String, serde_json::Error> {
    serde_json::from_str::<InsightsResponse>(body).map(|r| r.insights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::CompletedQuest;
    use questlog_common::QuestId;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).expect("valid date")
    }

    fn done(name: &str, category: &str, xp: u32, d: u32) -> CompletedQuest {
        CompletedQuest {
            quest_id: QuestId::from_raw(name),
            name: name.to_string(),
            category: category.to_string(),
            xp,
            gold: u64::from(xp / 2),
            completed_at: day(d).and_hms_opt(10, 0, 0).expect("valid time"),
        }
    }

    fn player() -> Player {
        Player {
            level: 4,
            xp: 120,
            gold: 300,
            streak: 3,
            last_active_date: Some(day(14)),
            quest_history: vec![
                done("old", "Work", 30, 7),
                done("edge", "Health", 20, 8),
                done("a", "Work", 40, 12),
                done("b", "Learning", 50, 13),
                done("c", "Work", 60, 14),
            ],
            ..Player::new()
        }
    }

    #[test]
    fn test_window_is_seven_days_including_today() {
        let stats = WeeklyStats::collect(&player(), day(14));
        let names: Vec<_> = stats.recent_quests.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, vec!["edge", "a", "b", "c"]);
        assert_eq!(stats.completed_quests, 5);
        assert_eq!(stats.weekly_xp(), 170);
    }

    #[test]
    fn test_category_breakdown() {
        let stats = WeeklyStats::collect(&player(), day(14));
        assert_eq!(stats.category_breakdown.get("Work"), Some(&2));
        assert_eq!(stats.category_breakdown.get("Health"), Some(&1));
        assert_eq!(stats.top_category(), Some("Work"));
    }

    #[test]
    fn test_broken_streak_reported_as_zero() {
        let stats = WeeklyStats::collect(&player(), day(17));
        assert_eq!(stats.streak, 0);
        let stats = WeeklyStats::collect(&player(), day(15));
        assert_eq!(stats.streak, 3);
    }

    #[test]
    fn test_request_uses_camel_case() {
        let stats = WeeklyStats::collect(&player(), day(14));
        let body = serde_json::to_value(InsightsRequest { stats: &stats }).expect("serialize");
        assert_eq!(body["stats"]["completedQuests"], 5);
        assert!(body["stats"]["categoryBreakdown"].is_object());
    }

    #[test]
    fn test_parse_response() {
        let text = parse_insights_response(r#"{"insights": "Keep going!"}"#).expect("parse");
        assert_eq!(text, "Keep going!");
        assert!(parse_insights_response(r#"{"error": "down"}"#).is_err());
    }
}
