//! Best-score persistence.
//!
//! One best score per game name. The terminal binary uses a JSON file:
//!
//! ```json
//! { "tetrisClassic": 12400 }
//! ```
//!
//! Persistence is best effort. Hosts load with [`load_best_or_default`] and
//! log (rather than propagate) save failures, so a read-only home directory
//! never stops a game.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Key under which this game's best score is stored.
pub const GAME_KEY: &str = "tetrisClassic";

/// Environment variable overriding the score file location.
pub const SCORES_PATH_ENV: &str = "BLOCKFALL_SCORES_PATH";

/// A slot holding one best score per game name.
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored for `game` yet.
    fn load_best(&self, game: &str) -> Result<Option<u32>>;

    fn save_best(&mut self, game: &str, score: u32) -> Result<()>;
}

/// Load a best score, falling back to 0 on any error.
pub fn load_best_or_default(store: &dyn ScoreStore, game: &str) -> u32 {
    match store.load_best(game) {
        Ok(best) => best.unwrap_or(0),
        Err(err) => {
            warn!(game, error = %format!("{err:#}"), "could not load best score, starting from 0");
            0
        }
    }
}

/// Save a best score, logging failures instead of returning them.
pub fn save_best_logged(store: &mut dyn ScoreStore, game: &str, score: u32) {
    match store.save_best(game, score) {
        Ok(()) => info!(game, score, "saved best score"),
        Err(err) => warn!(game, score, error = %format!("{err:#}"), "could not save best score"),
    }
}

/// In-process store (tests, `--no-persist`).
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: HashMap<String, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_best(&self, game: &str) -> Result<Option<u32>> {
        Ok(self.scores.get(game).copied())
    }

    fn save_best(&mut self, game: &str, score: u32) -> Result<()> {
        self.scores.insert(game.to_string(), score);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct ScoreFile {
    scores: BTreeMap<String, u32>,
}

/// Scores in a JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$BLOCKFALL_SCORES_PATH`, else the default data directory.
    pub fn from_env() -> Self {
        Self::new(default_path_from(|key| std::env::var_os(key)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<ScoreFile>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", self.path.display()));
            }
        };
        let file = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(file))
    }
}

impl ScoreStore for JsonScoreStore {
    fn load_best(&self, game: &str) -> Result<Option<u32>> {
        Ok(self
            .read()?
            .and_then(|file| file.scores.get(game).copied()))
    }

    fn save_best(&mut self, game: &str, score: u32) -> Result<()> {
        // Keep other games' entries; a corrupt file is replaced.
        let mut file = match self.read() {
            Ok(file) => file.unwrap_or_default(),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "replacing unreadable score file");
                ScoreFile::default()
            }
        };
        file.scores.insert(game.to_string(), score);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        let text = serde_json::to_string_pretty(&file).context("encode scores")?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Resolve the score file location from environment lookups.
///
/// `$BLOCKFALL_SCORES_PATH`, then `$XDG_DATA_HOME/blockfall/scores.json`,
/// then `$HOME/.local/share/blockfall/scores.json`, then the working
/// directory.
pub fn default_path_from(var: impl Fn(&str) -> Option<OsString>) -> PathBuf {
    if let Some(explicit) = var(SCORES_PATH_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(explicit);
    }

    let base = var("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            var("HOME").map(|home| {
                let mut p = PathBuf::from(home);
                p.push(".local");
                p.push("share");
                p
            })
        })
        .unwrap_or_else(|| PathBuf::from("."));

    let mut path = base;
    path.push("blockfall");
    path.push("scores.json");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("blockfall-store-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&p);
        p.push("scores.json");
        p
    }

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<OsString> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| OsString::from(*v))
        }
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryScoreStore::new();
        assert_eq!(store.load_best(GAME_KEY).unwrap(), None);
        store.save_best(GAME_KEY, 900).unwrap();
        assert_eq!(store.load_best(GAME_KEY).unwrap(), Some(900));
        assert_eq!(load_best_or_default(&store, "other"), 0);
    }

    #[test]
    fn json_store_missing_file_is_empty() {
        let store = JsonScoreStore::new(temp_path("missing"));
        assert_eq!(store.load_best(GAME_KEY).unwrap(), None);
    }

    #[test]
    fn json_store_keeps_other_games() {
        let path = temp_path("keep");
        let mut store = JsonScoreStore::new(&path);
        store.save_best("snake", 40).unwrap();
        store.save_best(GAME_KEY, 1200).unwrap();
        store.save_best(GAME_KEY, 1500).unwrap();

        let reopened = JsonScoreStore::new(&path);
        assert_eq!(reopened.load_best(GAME_KEY).unwrap(), Some(1500));
        assert_eq!(reopened.load_best("snake").unwrap(), Some(40));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"tetrisClassic\": 1500"));
    }

    #[test]
    fn corrupt_file_loads_as_error_and_defaults_to_zero() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let mut store = JsonScoreStore::new(&path);
        assert!(store.load_best(GAME_KEY).is_err());
        assert_eq!(load_best_or_default(&store, GAME_KEY), 0);

        // Saving replaces the corrupt file.
        store.save_best(GAME_KEY, 10).unwrap();
        assert_eq!(store.load_best(GAME_KEY).unwrap(), Some(10));
    }

    #[test]
    fn path_resolution_order() {
        assert_eq!(
            default_path_from(env(&[
                (SCORES_PATH_ENV, "/tmp/x.json"),
                ("XDG_DATA_HOME", "/data"),
            ])),
            PathBuf::from("/tmp/x.json")
        );
        assert_eq!(
            default_path_from(env(&[("XDG_DATA_HOME", "/data"), ("HOME", "/home/u")])),
            PathBuf::from("/data/blockfall/scores.json")
        );
        assert_eq!(
            default_path_from(env(&[("HOME", "/home/u")])),
            PathBuf::from("/home/u/.local/share/blockfall/scores.json")
        );
        assert_eq!(
            default_path_from(env(&[])),
            PathBuf::from("./blockfall/scores.json")
        );
    }
}
