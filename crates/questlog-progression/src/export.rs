//! Export of player data for download.
//!
//! - JSON: the whole player snapshot wrapped with a schema version
//! - CSV: one row per completed quest

use chrono::NaiveDateTime;
use questlog_common::{QuestlogResult, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Write as _;

use crate::player::Player;
use crate::quest::CompletedQuest;

/// CSV header row.
pub const CSV_HEADER: &str = "Name,Category,XP,Gold,Completed At";

/// Versioned JSON export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerExport {
    /// Export schema version
    pub version: SchemaVersion,
    /// When the export was produced
    pub exported_at: NaiveDateTime,
    /// Player snapshot
    pub player: Player,
}

/// Serializes the player as a pretty-printed JSON document.
pub fn export_json(player: &Player, exported_at: NaiveDateTime) -> QuestlogResult<String> {
    let document = PlayerExport {
        version: SchemaVersion::EXPORT,
        exported_at,
        player: player.clone(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Reads a JSON export back, rejecting incompatible schema versions.
pub fn import_json(json: &str) -> QuestlogResult<Player> {
    let document: PlayerExport = serde_json::from_str(json)?;
    SchemaVersion::EXPORT.ensure_readable(document.version)?;
    Ok(document.player)
}

/// Formats a timestamp the way a US-English locale prints a date.
#[must_use]
pub fn locale_date(at: NaiveDateTime) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// Quotes a CSV field when it contains a separator, quote, or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Renders quest history as CSV, header first.
#[must_use]
pub fn export_csv(history: &[CompletedQuest]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + history.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for entry in history {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(&entry.name),
            csv_field(&entry.category),
            entry.xp,
            entry.gold,
            locale_date(entry.completed_at),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use questlog_common::{QuestId, QuestlogError};

    fn at(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .and_then(|date| date.and_hms_opt(14, 30, 0))
            .expect("valid timestamp")
    }

    fn entry(name: &str, category: &str, xp: u32, completed_at: NaiveDateTime) -> CompletedQuest {
        CompletedQuest {
            quest_id: QuestId::from_raw(name),
            name: name.to_string(),
            category: category.to_string(),
            xp,
            gold: u64::from(xp / 2),
            completed_at,
        }
    }

    #[test]
    fn test_csv_rows() {
        let history = vec![
            entry("Morning run", "Health", 50, at(3, 5)),
            entry("Write report", "Work", 125, at(11, 21)),
        ];
        let csv = export_csv(&history);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "Morning run,Health,50,25,3/5/2024");
        assert_eq!(lines[2], "Write report,Work,125,62,11/21/2024");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_quotes_special_fields() {
        let history = vec![entry("Read \"Dune\", part 1", "Learning", 40, at(1, 2))];
        let csv = export_csv(&history);
        assert_eq!(
            csv.lines().nth(1),
            Some("\"Read \"\"Dune\"\", part 1\",Learning,40,20,1/2/2024")
        );
    }

    #[test]
    fn test_empty_history_is_header_only() {
        assert_eq!(export_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn test_json_export_reads_back() {
        let player = Player {
            gold: 75,
            quest_history: vec![entry("Stretch", "Health", 20, at(2, 2))],
            ..Player::new()
        };
        let json = export_json(&player, at(2, 3)).expect("export");
        assert!(json.contains("\"exportedAt\""));
        let restored = import_json(&json).expect("import");
        assert_eq!(restored, player);
    }

    #[test]
    fn test_json_import_rejects_future_major_version() {
        let json = export_json(&Player::new(), at(2, 3))
            .expect("export")
            .replacen("\"major\": 1", "\"major\": 2", 1);
        assert!(matches!(
            import_json(&json),
            Err(QuestlogError::VersionMismatch { .. })
        ));
    }
}
