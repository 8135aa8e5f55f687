use std::fmt;

use async_trait::async_trait;

use super::types::{Book, ParallelChapter, Translation, Verse};

/// Errors that can occur while fetching scripture.
#[derive(Debug)]
pub enum SourceError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The service answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body did not have the expected shape.
    Parse(String),
    /// Reading from the local translation cache failed.
    Cache(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Network(msg) => write!(f, "network error: {msg}"),
            SourceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            SourceError::Parse(msg) => write!(f, "parse error: {msg}"),
            SourceError::Cache(msg) => write!(f, "cache error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SourceError::Parse(e.to_string())
        } else {
            SourceError::Network(e.to_string())
        }
    }
}

/// Anything that can serve translations, books and chapters.
#[async_trait]
pub trait ScriptureSource: Send + Sync {
    /// Returns the name of the source (for logs).
    fn name(&self) -> &str;

    async fn translations(&self) -> Result<Vec<Translation>, SourceError>;

    async fn books(&self, translation: &str) -> Result<Vec<Book>, SourceError>;

    async fn chapter(
        &self,
        translation: &str,
        book: u32,
        chapter: u32,
    ) -> Result<Vec<Verse>, SourceError>;

    /// Fetches the same verses in several translations. Verses beyond the end of the
    /// chapter are omitted from the result rather than reported as errors.
    async fn parallel(
        &self,
        translations: &[String],
        book: u32,
        chapter: u32,
        verses: &[u32],
    ) -> Result<ParallelChapter, SourceError>;
}
