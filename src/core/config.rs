//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → saved settings → env vars → CLI flags.
//!
//! Config lives at `~/.lectern/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bible::cache::{DEFAULT_DOWNLOAD_URL, default_cache_dir};
use crate::bible::client::DEFAULT_BASE_URL;
use crate::core::settings::Settings;
use crate::core::state::DEFAULT_TRANSLATION;
use crate::core::theme::ThemeId;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LecternConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_translation: Option<String>,
    pub theme: Option<String>,
    pub comparison_translations: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub download_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    pub dir: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_COMPARISON_TRANSLATIONS: [&str; 3] = ["NLT", "KJV", "WEB"];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub translation: String,
    pub theme: ThemeId,
    pub book_id: u32,
    pub chapter: u32,
    pub comparison_translations: Vec<String>,
    pub base_url: String,
    pub download_url: String,
    pub cache_dir: Option<PathBuf>,
}

/// Values taken from the command line; `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub translation: Option<String>,
    pub theme: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.lectern/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lectern").join("config.toml"))
}

/// Load config from `~/.lectern/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LecternConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<LecternConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(LecternConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(LecternConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: LecternConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Lectern Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → last session → env vars → CLI flags.

# [general]
# default_translation = "NLT"        # Or set LECTERN_TRANSLATION
# theme = "Catppuccin Mocha"         # Catppuccin Mocha/Latte, Dracula, Rosé Pine Moon/Dawn,
#                                    # Solarized Dark/Light
# comparison_translations = ["NLT", "KJV", "WEB"]

# [api]
# base_url = "https://bolls.life"    # Or set LECTERN_BASE_URL
# download_url = "https://bolls.life/static/translations"

# [cache]
# dir = "/home/me/.lectern/translations"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing:
/// defaults → config file → saved settings → env vars → CLI.
pub fn resolve(config: &LecternConfig, settings: &Settings, cli: &CliOverrides) -> ResolvedConfig {
    // Translation: CLI → env → last session → config → default
    let translation = cli
        .translation
        .clone()
        .or_else(|| std::env::var("LECTERN_TRANSLATION").ok())
        .or_else(|| settings.translation.clone())
        .or_else(|| config.general.default_translation.clone())
        .unwrap_or_else(|| DEFAULT_TRANSLATION.to_string());

    // Theme: CLI → last session → config → default. Unknown names fall through.
    let theme = [
        cli.theme.as_deref(),
        settings.theme.as_deref(),
        config.general.theme.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find_map(|name| {
        let theme = ThemeId::from_name(name);
        if theme.is_none() {
            warn!("Unknown theme {name:?}");
        }
        theme
    })
    .unwrap_or_default();

    let comparison_translations = config
        .general
        .comparison_translations
        .clone()
        .filter(|list| !list.is_empty())
        .unwrap_or_else(|| {
            DEFAULT_COMPARISON_TRANSLATIONS
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

    // Base URL: env → config → default
    let base_url = std::env::var("LECTERN_BASE_URL")
        .ok()
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let download_url = std::env::var("LECTERN_DOWNLOAD_URL")
        .ok()
        .or_else(|| config.api.download_url.clone())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_URL.to_string());

    ResolvedConfig {
        translation: translation.to_uppercase(),
        theme,
        book_id: settings.book.filter(|b| *b > 0).unwrap_or(1),
        chapter: settings.chapter.filter(|c| *c > 0).unwrap_or(1),
        comparison_translations,
        base_url,
        download_url,
        cache_dir: config.cache.dir.clone().or_else(default_cache_dir),
    }
}
