//! # Translation Cache
//!
//! Whole translations downloaded once and kept as `~/.lectern/translations/<TR>.json`.
//!
//! The service publishes each translation as a zip archive holding a single JSON
//! array of every verse. We unpack the first `.json` entry and store it verbatim.
//! All writes use atomic rename (write `.tmp`, then `rename()`).

use std::fmt;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use super::types::Verse;

pub const DEFAULT_DOWNLOAD_URL: &str = "https://bolls.life/static/translations";

#[derive(Debug)]
pub enum CacheError {
    Io(io::Error),
    Parse(serde_json::Error),
    Archive(String),
    Network(String),
    /// The downloaded archive held no `.json` entry.
    MissingJson,
    NotCached(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io(e) => write!(f, "cache I/O error: {e}"),
            CacheError::Parse(e) => write!(f, "cache parse error: {e}"),
            CacheError::Archive(msg) => write!(f, "archive error: {msg}"),
            CacheError::Network(msg) => write!(f, "download failed: {msg}"),
            CacheError::MissingJson => write!(f, "archive contains no JSON file"),
            CacheError::NotCached(tr) => write!(f, "{tr} is not cached"),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<io::Error> for CacheError {
    fn from(e: io::Error) -> Self {
        CacheError::Io(e)
    }
}

/// Returns `~/.lectern/translations/`.
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lectern").join("translations"))
}

pub struct TranslationCache {
    dir: PathBuf,
    download_url: String,
    http: reqwest::Client,
    /// Last translation parsed from disk, so paging through a book doesn't re-read it.
    loaded: Mutex<Option<(String, Arc<Vec<Verse>>)>>,
}

impl TranslationCache {
    pub fn new(dir: PathBuf, download_url: Option<String>) -> Self {
        Self {
            dir,
            download_url: download_url.unwrap_or_else(|| DEFAULT_DOWNLOAD_URL.to_string()),
            http: reqwest::Client::new(),
            loaded: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, translation: &str) -> PathBuf {
        self.dir.join(format!("{}.json", translation.to_uppercase()))
    }

    pub fn is_cached(&self, translation: &str) -> bool {
        self.path_for(translation).is_file()
    }

    /// Verses of one chapter from a cached translation, ordered by verse number.
    pub fn chapter(
        &self,
        translation: &str,
        book: u32,
        chapter: u32,
    ) -> Result<Vec<Verse>, CacheError> {
        let all = self.load(translation)?;
        let mut verses: Vec<Verse> = all
            .iter()
            .filter(|v| v.book_id == book && v.chapter == chapter)
            .cloned()
            .collect();
        verses.sort_by_key(|v| v.number);
        Ok(verses)
    }

    /// [`chapter`](Self::chapter) on the blocking thread pool, for async callers.
    pub async fn read_chapter(
        self: Arc<Self>,
        translation: &str,
        book: u32,
        chapter: u32,
    ) -> Result<Vec<Verse>, CacheError> {
        let translation = translation.to_string();
        tokio::task::spawn_blocking(move || self.chapter(&translation, book, chapter))
            .await
            .map_err(|e| CacheError::Io(io::Error::other(e)))?
    }

    fn load(&self, translation: &str) -> Result<Arc<Vec<Verse>>, CacheError> {
        let key = translation.to_uppercase();
        if let Ok(guard) = self.loaded.lock()
            && let Some((code, verses)) = guard.as_ref()
            && *code == key
        {
            return Ok(Arc::clone(verses));
        }

        let path = self.path_for(translation);
        if !path.is_file() {
            return Err(CacheError::NotCached(key));
        }
        let contents = fs::read(&path)?;
        let verses: Vec<Verse> = serde_json::from_slice(&contents).map_err(CacheError::Parse)?;
        debug!("Loaded {} verses of {} from {}", verses.len(), key, path.display());
        let verses = Arc::new(verses);
        if let Ok(mut guard) = self.loaded.lock() {
            *guard = Some((key, Arc::clone(&verses)));
        }
        Ok(verses)
    }

    /// Cached translation codes, sorted.
    pub fn list_cached(&self) -> io::Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut codes = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                codes.push(stem.to_string());
            }
        }
        codes.sort();
        Ok(codes)
    }

    pub fn remove(&self, translation: &str) -> io::Result<()> {
        let key = translation.to_uppercase();
        fs::remove_file(self.path_for(translation))?;
        if let Ok(mut guard) = self.loaded.lock()
            && guard.as_ref().is_some_and(|(code, _)| *code == key)
        {
            *guard = None;
        }
        info!("Removed cached translation {key}");
        Ok(())
    }

    /// Total bytes of cached translation files.
    pub fn size_bytes(&self) -> io::Result<u64> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let meta = entry?.metadata()?;
            if meta.is_file() {
                total += meta.len();
            }
        }
        Ok(total)
    }

    /// Downloads `<download_url>/<TR>.zip` and stores the translation JSON inside it.
    pub async fn download(&self, translation: &str) -> Result<(), CacheError> {
        let key = translation.to_uppercase();
        let url = format!("{}/{}.zip", self.download_url.trim_end_matches('/'), key);
        info!("Downloading {key} from {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Network(format!("HTTP {}", status.as_u16())));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CacheError::Network(e.to_string()))?;

        let json = extract_first_json(&bytes)?;
        // Reject archives whose payload isn't a verse list before it lands on disk.
        let verses: Vec<Verse> = serde_json::from_slice(&json).map_err(CacheError::Parse)?;
        if verses.is_empty() {
            warn!("Downloaded {key} contains no verses");
        }

        fs::create_dir_all(&self.dir)?;
        atomic_write(&self.path_for(&key), &json)?;
        info!("Cached {key} ({} verses, {} bytes)", verses.len(), json.len());
        Ok(())
    }
}

fn extract_first_json(bytes: &[u8]) -> Result<Vec<u8>, CacheError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| CacheError::Archive(e.to_string()))?;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| CacheError::Archive(e.to_string()))?;
        if entry.is_file() && entry.name().to_ascii_lowercase().ends_with(".json") {
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            return Ok(buf);
        }
    }
    Err(CacheError::MissingJson)
}

fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
