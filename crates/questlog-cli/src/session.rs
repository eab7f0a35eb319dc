//! Command handlers.
//!
//! A [`Session`] owns the loaded save for one invocation. Handlers return the
//! text to print; nothing is written to disk until the caller saves a dirty
//! session, so a failing command leaves the save untouched.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use questlog_progression::{
    current_streak, export_csv, export_json, find_quest, find_reward, import_json, locale_date,
    parse_insights_response, redeem_reward, restore_daily_challenges, validate_quest_input,
    DayTally, InsightsRequest, LeisureReward, ProgressionEngine, Quest, QuestError, RecordKind,
    WeeklyStats,
};
use std::fmt::Write as _;
use tracing::info;

use crate::store::SaveFile;

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Versioned JSON snapshot
    Json,
    /// Quest history as CSV
    Csv,
}

/// State for one CLI invocation.
#[derive(Debug)]
pub struct Session {
    save: SaveFile,
    engine: ProgressionEngine,
    rewards: Vec<LeisureReward>,
    now: NaiveDateTime,
    dirty: bool,
}

impl Session {
    /// Creates a session over a loaded save.
    pub fn new(
        save: SaveFile,
        engine: ProgressionEngine,
        rewards: Vec<LeisureReward>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            save,
            engine,
            rewards,
            now,
            dirty: false,
        }
    }

    /// The save as it currently stands.
    pub fn save(&self) -> &SaveFile {
        &self.save
    }

    /// Whether any handler changed the save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Adds a new open quest.
    pub fn add_quest(&mut self, name: &str, category: &str, xp: u32) -> Result<String> {
        validate_quest_input(name, category, xp)?;
        let quest = Quest::new(name.trim(), category.trim(), xp, self.now);
        let message = format!(
            "Added quest {} \"{}\" [{}] worth {} XP",
            short_id(&quest),
            quest.name,
            quest.category,
            quest.xp
        );
        info!(id = %quest.id, name = %quest.name, "Quest added");
        self.save.quests.push(quest);
        self.dirty = true;
        Ok(message)
    }

    /// Lists open quests, marking those in today's focus.
    pub fn list_quests(&self) -> String {
        let focus = self.engine.focus_for(self.today());
        let mut out = String::new();
        if let Some(focus) = focus {
            let _ = writeln!(out, "Today's focus: {focus} (+25% XP)");
        }
        if self.save.quests.is_empty() {
            out.push_str("No open quests.\n");
            return out;
        }
        for quest in &self.save.quests {
            let marker = if focus == Some(quest.category.as_str()) { "*" } else { " " };
            let _ = writeln!(
                out,
                "{marker} {}  {:<30} {:<12} {:>4} XP",
                short_id(quest),
                quest.name,
                quest.category,
                quest.xp
            );
        }
        out
    }

    /// Completes a quest by ID or ID prefix.
    pub fn complete_quest(&mut self, id: &str) -> Result<String> {
        let quest = find_quest(&mut self.save.quests, id)?;
        if quest.completed {
            return Err(QuestError::AlreadyCompleted(quest.id.clone()).into());
        }
        quest.completed = true;
        let quest = quest.clone();
        self.save.quests.retain(|q| q.id != quest.id);

        let player = std::mem::take(&mut self.save.player);
        let outcome = self.engine.complete_with_rotation(player, &quest, self.now);
        info!(
            id = %quest.id,
            levels = outcome.levels_gained(),
            events = outcome.events.len(),
            "Quest closed"
        );
        self.save.player = outcome.player;
        self.dirty = true;

        let mut out = format!(
            "Quest complete: {} (+{} XP, +{} gold)\n",
            outcome.completed.name, outcome.completed.xp, outcome.completed.gold
        );
        for event in &outcome.events {
            let _ = writeln!(out, "  {event}");
        }
        Ok(out)
    }

    /// Shows the challenges for a date, with progress when it is today.
    pub fn challenges(&self, date: Option<NaiveDate>) -> String {
        let date = date.unwrap_or_else(|| self.today());
        let player = &self.save.player;
        let challenges = if player.challenge_date() == Some(date) {
            player.active_challenges.clone()
        } else {
            restore_daily_challenges(date, player.completions_on(date))
        };
        let tally = DayTally::from_completions(player.completions_on(date));

        let mut out = format!("Daily challenges for {date}:\n");
        for challenge in &challenges {
            let (current, required) = challenge.status(&tally);
            let check = if challenge.completed { "x" } else { " " };
            let _ = writeln!(
                out,
                "[{check}] {} - {} ({current}/{required}) reward: {} XP, {} gold",
                challenge.name, challenge.description, challenge.reward.xp, challenge.reward.gold
            );
        }
        out
    }

    /// Summarizes the player.
    pub fn stats(&self) -> String {
        let player = &self.save.player;
        let today = self.today();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Level {}  ({}/{} XP, {:.0}%, {} to next level)",
            player.level,
            player.xp,
            player.next_level_threshold(),
            player.level_progress() * 100.0,
            player.xp_to_next_level()
        );
        let _ = writeln!(out, "Gold: {}", player.gold);
        let _ = writeln!(out, "Streak: {} day(s)", current_streak(player, today));
        let _ = writeln!(
            out,
            "Quests completed: {} total, {} today",
            player.quest_history.len(),
            player.quests_completed_on(today)
        );
        if let Some(focus) = self.engine.focus_for(today) {
            let _ = writeln!(out, "Today's focus: {focus}");
        }
        let week = WeeklyStats::collect(player, today);
        let _ = write!(
            out,
            "This week: {} quests, {} XP",
            week.recent_quests.len(),
            week.weekly_xp()
        );
        match week.top_category() {
            Some(top) => {
                let _ = writeln!(out, ", mostly {top}");
            },
            None => out.push('\n'),
        }
        out.push_str("Personal records:\n");
        for kind in RecordKind::ALL {
            let _ = writeln!(out, "  {}: {}", kind.label(), player.records.value(kind));
        }
        if let Some(last) = player.quest_history.last() {
            let _ = writeln!(
                out,
                "Last quest: {} on {}",
                last.name,
                locale_date(last.completed_at)
            );
        }
        out
    }

    /// Lists the reward catalog.
    pub fn rewards(&self) -> String {
        let mut out = format!("Gold: {}\n", self.save.player.gold);
        for reward in &self.rewards {
            let affordable = if self.save.player.gold >= reward.cost {
                ""
            } else {
                " (need more gold)"
            };
            let _ = writeln!(out, "  {:<24} {:>5} gold{affordable}", reward.name, reward.cost);
        }
        out
    }

    /// Buys a reward from the catalog.
    pub fn redeem(&mut self, name: &str) -> Result<String> {
        let reward = find_reward(&self.rewards, name)?.clone();
        self.save.player = redeem_reward(&self.save.player, &reward)?;
        self.dirty = true;
        info!(reward = %reward.name, cost = reward.cost, "Reward redeemed");
        Ok(format!(
            "Enjoy your {}! {} gold left.",
            reward.name, self.save.player.gold
        ))
    }

    /// Renders an export document.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => {
                export_json(&self.save.player, self.now).context("Failed to build JSON export")
            },
            ExportFormat::Csv => Ok(export_csv(&self.save.player.quest_history)),
        }
    }

    /// Replaces the player with one read from a JSON export.
    ///
    /// Open quests are kept.
    pub fn import(&mut self, json: &str) -> Result<String> {
        let player = import_json(json).context("Failed to read JSON export")?;
        let message = format!(
            "Imported level {} player with {} completed quests",
            player.level,
            player.quest_history.len()
        );
        info!(level = player.level, history = player.quest_history.len(), "Player imported");
        self.save.player = player;
        self.dirty = true;
        Ok(message)
    }

    /// Builds the insights request body for the past week.
    pub fn insights_request(&self) -> Result<String> {
        let stats = WeeklyStats::collect(&self.save.player, self.today());
        serde_json::to_string_pretty(&InsightsRequest { stats: &stats })
            .context("Failed to serialize insights request")
    }

    /// Reads coaching text out of an insights service response.
    pub fn read_insights(body: &str) -> Result<String> {
        parse_insights_response(body).context("Insights response has no \"insights\" text")
    }
}

fn short_id(quest: &Quest) -> &str {
    let id = quest.id.as_str();
    id.get(..8).unwrap_or(id)
}
