//! Save file persistence.
//!
//! The whole session state lives in one JSON document. Writes go to a temp
//! file first and are renamed into place, so a crash never leaves a
//! half-written save behind.

use questlog_common::{QuestlogResult, SchemaVersion};
use questlog_progression::{Player, Quest};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Save schema version
    pub version: SchemaVersion,
    /// Player progression
    pub player: Player,
    /// Open quests
    pub quests: Vec<Quest>,
}

impl Default for SaveFile {
    fn default() -> Self {
        Self {
            version: SchemaVersion::SAVE_FILE,
            player: Player::new(),
            quests: Vec::new(),
        }
    }
}

/// Reads and writes a single save file.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    /// Creates a store for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Save file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    /// Loads the save, or a fresh one if no save exists yet.
    pub fn load(&self) -> QuestlogResult<SaveFile> {
        if !self.path.exists() {
            info!("No save found at {}, starting fresh", self.path.display());
            return Ok(SaveFile::default());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let data: SaveFile = serde_json::from_reader(reader)?;
        SchemaVersion::SAVE_FILE.ensure_readable(data.version)?;

        debug!(
            quests = data.quests.len(),
            history = data.player.quest_history.len(),
            "Loaded save from {}",
            self.path.display()
        );
        Ok(data)
    }

    /// Writes the save atomically (temp file + rename).
    pub fn save(&self, data: &SaveFile) -> QuestlogResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            serde_json::to_writer_pretty(&mut writer, data)?;
            writer.flush()?;
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!("Saved to {}", self.path.display());
        Ok(())
    }
}
