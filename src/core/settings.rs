//! # Settings Persistence
//!
//! Remembers where the reader left off in `~/.lectern/settings.json`:
//! translation, book, chapter and theme. Written with an atomic rename
//! (write `.tmp`, then `rename()`) so a crash never leaves half a file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub book: Option<u32>,
    #[serde(default)]
    pub chapter: Option<u32>,
    #[serde(default)]
    pub theme: Option<String>,
}

/// Returns `~/.lectern/settings.json`.
pub fn settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lectern").join("settings.json"))
}

/// Loads settings; anything missing or unreadable yields the defaults.
pub fn load() -> Settings {
    match settings_path() {
        Some(path) => load_from(&path),
        None => Settings::default(),
    }
}

pub fn load_from(path: &Path) -> Settings {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!("No settings at {}: {}", path.display(), e);
            return Settings::default();
        }
    };
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!("Ignoring malformed settings {}: {}", path.display(), e);
        Settings::default()
    })
}

pub fn save(settings: &Settings) -> io::Result<()> {
    let path = settings_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    save_to(&path, settings)
}

pub fn save_to(path: &Path, settings: &Settings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    debug!("Saved settings to {}", path.display());
    Ok(())
}
