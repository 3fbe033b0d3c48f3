use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::TournamentState;
use crate::errors::{parse_context, read_context, write_context};

/// Directory of JSON documents keyed by name
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<PathBuf> {
        let path = self.path_for(key);
        write_json(&path, data)?;
        info!("Saved {}", path.display());
        Ok(path)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

pub fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).with_context(|| read_context(path))?;
    serde_json::from_str(&json).with_context(|| parse_context(&path.display().to_string()))
}

pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
    fs::write(path, json).with_context(|| write_context(path))
}

/// Read a snapshot without repairing it.
///
/// When round tables are present the player histories are rebuilt from
/// them; otherwise the recorded histories are used as they are.
pub fn load_raw_state(path: &Path) -> Result<TournamentState> {
    let raw: TournamentState = read_json(path)?;
    if raw.rounds.is_empty() {
        return Ok(raw);
    }
    Ok(TournamentState::from_rounds(
        raw.tournament,
        raw.players.into_values(),
        raw.rounds.into_iter().map(|(number, mut round)| {
            round.number = number;
            round
        }),
    ))
}

/// Load a snapshot and bring it into a consistent shape
pub fn load_state(path: &Path) -> Result<TournamentState> {
    let state = load_raw_state(path)?.normalized();
    state.validate()?;

    info!(
        "Loaded {} ({} players, {} of {} rounds)",
        state.tournament.name,
        state.players.len(),
        state.tournament.completed_rounds,
        state.tournament.total_rounds
    );
    Ok(state)
}
