//! Save-game persistence on disk.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{board::Board, session::BoardStore};

/// Directory under `~/.config` used for save files.
pub const DEFAULT_SAVE_DIR: &str = "pegsol/saves";

/// Metadata describing a persisted board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEntry {
    /// Absolute path to the save file on disk.
    pub path: PathBuf,
    /// Layout the board belongs to.
    pub layout: String,
    /// Human readable save name.
    pub name: String,
    /// Timestamp when the save was written.
    pub updated_at: DateTime<Utc>,
}

/// Serialized representation of a save file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePayload {
    layout: String,
    name: String,
    saved_at: DateTime<Utc>,
    board: Board,
}

impl SavePayload {
    fn new(layout: &str, name: Option<&str>, board: Board) -> Self {
        let saved_at = Utc::now();
        let display_name = name
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
            .unwrap_or_else(|| format!("{layout} {}", saved_at.format("%Y-%m-%d %H:%M:%S")));
        Self {
            layout: layout.to_string(),
            name: display_name,
            saved_at,
            board,
        }
    }

    /// Layout the stored board belongs to.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Borrow the stored board without consuming the payload.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Consume the payload and return the stored board.
    pub fn into_board(self) -> Board {
        self.board
    }

    fn entry(&self, path: PathBuf) -> SaveEntry {
        SaveEntry {
            path,
            layout: self.layout.clone(),
            name: self.name.clone(),
            updated_at: self.saved_at,
        }
    }
}

/// Manager responsible for loading and writing save files.
#[derive(Debug, Clone)]
pub struct SaveManager {
    root: PathBuf,
}

impl SaveManager {
    /// Create a new manager rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the user's config directory.
    pub fn default_root() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_SAVE_DIR)
    }

    /// Directory holding the save files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return all known saves sorted by timestamp (most recent first).
    pub fn entries(&self) -> Result<Vec<SaveEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).context("failed to read save directory")? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if entry.path().extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match self.read_payload(entry.path()) {
                Ok(payload) => entries.push(payload.entry(entry.path())),
                Err(err) => {
                    warn!("Failed to read save {:?}: {err:#}", entry.path());
                }
            }
        }

        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }

    /// Most recent save for `layout`, if any.
    pub fn latest_for(&self, layout: &str) -> Result<Option<SaveEntry>> {
        Ok(self
            .entries()?
            .into_iter()
            .find(|entry| entry.layout == layout))
    }

    /// Write `board` to a new save file and return the resulting entry.
    ///
    /// Existing files are never overwritten; a clashing name gets a numeric suffix.
    pub fn create_save(&self, layout: &str, name: Option<&str>, board: &Board) -> Result<SaveEntry> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let payload = SavePayload::new(layout, name, board.clone());
        let stem = format!(
            "{}_{}",
            sanitize_component(&payload.layout),
            payload.saved_at.format("%Y%m%d%H%M%S%3f")
        );
        let path = self.write_new_payload(&stem, &payload)?;
        Ok(payload.entry(path))
    }

    /// Load payload for the provided entry.
    pub fn load(&self, entry: &SaveEntry) -> Result<SavePayload> {
        self.read_payload(&entry.path)
    }

    fn write_new_payload(&self, stem: &str, payload: &SavePayload) -> Result<PathBuf> {
        let serialised = serde_json::to_vec_pretty(payload)?;
        let mut attempt = 0u32;
        loop {
            let file_name = match attempt {
                0 => format!("{stem}.json"),
                n => format!("{stem}-{n}.json"),
            };
            let path = self.root.join(file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&serialised)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    return Ok(path);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => {
                    return Err(err).with_context(|| format!("failed to create {}", path.display()))
                }
            }
        }
    }

    fn read_payload(&self, path: impl AsRef<Path>) -> Result<SavePayload> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let payload = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(payload)
    }
}

/// [`BoardStore`] backed by a [`SaveManager`], scoped to a single layout.
#[derive(Debug, Clone)]
pub struct FileStore {
    manager: SaveManager,
    layout: String,
}

impl FileStore {
    /// Bind `manager` to saves of `layout`.
    pub fn new(manager: SaveManager, layout: impl Into<String>) -> Self {
        Self {
            manager,
            layout: layout.into(),
        }
    }

    /// Underlying save manager.
    pub fn manager(&self) -> &SaveManager {
        &self.manager
    }
}

impl BoardStore for FileStore {
    fn save(&mut self, board: &Board) -> Result<()> {
        self.manager.create_save(&self.layout, None, board)?;
        Ok(())
    }

    fn load(&mut self) -> Result<Board> {
        let entry = self
            .manager
            .latest_for(&self.layout)?
            .ok_or_else(|| anyhow!("no saved game for layout '{}'", self.layout))?;
        Ok(self.manager.load(&entry)?.into_board())
    }
}

fn sanitize_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            result.push(ch);
        }
    }
    if result.is_empty() {
        "save".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board::{Cell, Coord},
        engine,
        layout::Layout,
    };
    use tempfile::tempdir;

    fn english_board() -> Board {
        Layout::builtin("english").expect("built-in").start().clone()
    }

    #[test]
    fn save_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path());
        let mut board = english_board();
        engine::apply_jump(&mut board, Coord::new(3, 1), Coord::new(3, 3))?;

        let entry = manager.create_save("english", Some("First Save"), &board)?;
        assert!(entry.path.exists());

        let entries = manager.entries()?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].layout, "english");
        assert_eq!(entries[0].name, "First Save");

        let payload = manager.load(&entries[0])?;
        assert_eq!(payload.layout(), "english");
        assert_eq!(payload.board(), &board);
        assert_eq!(payload.into_board().get(Coord::new(3, 2)), Some(Cell::Hole));
        Ok(())
    }

    #[test]
    fn latest_is_scoped_to_layout() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path());
        let european = Layout::builtin("european").expect("built-in").start().clone();

        manager.create_save("english", None, &english_board())?;
        manager.create_save("european", None, &european)?;

        let latest = manager.latest_for("english")?.expect("english save");
        assert_eq!(latest.layout, "english");
        assert!(latest.name.starts_with("english "));
        assert!(manager.latest_for("diamond")?.is_none());
        Ok(())
    }

    #[test]
    fn unreadable_saves_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path());
        fs::write(dir.path().join("broken.json"), "{ not json")?;
        fs::write(dir.path().join("notes.txt"), "ignored")?;
        manager.create_save("english", None, &english_board())?;

        assert_eq!(manager.entries()?.len(), 1);
        Ok(())
    }

    #[test]
    fn file_store_round_trips_latest_board() -> Result<()> {
        let dir = tempdir()?;
        let mut store = FileStore::new(SaveManager::new(dir.path().join("saves")), "english");
        assert!(store.load().is_err());

        let mut board = english_board();
        store.save(&board)?;
        engine::apply_jump(&mut board, Coord::new(3, 1), Coord::new(3, 3))?;
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.save(&board)?;

        assert_eq!(store.load()?, board);
        assert_eq!(store.manager().entries()?.len(), 2);
        Ok(())
    }

    #[test]
    fn rapid_saves_never_overwrite() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path());
        let board = english_board();
        let paths: Vec<PathBuf> = (0..20)
            .map(|_| manager.create_save("english", None, &board).map(|entry| entry.path))
            .collect::<Result<_>>()?;

        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 20);
        assert_eq!(manager.entries()?.len(), 20);
        Ok(())
    }

    #[test]
    fn sanitize_creates_safe_filenames() {
        let name = sanitize_component("My Board!* 7x7??");
        assert_eq!(name, "MyBoard7x7");
        assert_eq!(sanitize_component("***"), "save");
    }
}
