//! bolls.life client.
//!
//! Chapters of translations present in the local cache are served from disk;
//! everything else goes over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::cache::TranslationCache;
use super::source::{ScriptureSource, SourceError};
use super::types::{Book, LanguageGroup, ParallelChapter, ParallelQuery, Translation, Verse};

pub const DEFAULT_BASE_URL: &str = "https://bolls.life";

/// Only this language group of the catalogue is offered.
const CATALOGUE_LANGUAGE: &str = "English";

pub struct BollsClient {
    client: reqwest::Client,
    base_url: String,
    cache: Option<Arc<TranslationCache>>,
}

impl BollsClient {
    /// `base_url` is used as given, minus any trailing slash.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: None,
        }
    }

    /// Serve chapters of cached translations from `cache` instead of the network.
    pub fn with_cache(mut self, cache: Arc<TranslationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SourceError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Request failed with HTTP {}: {}", status.as_u16(), message);
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ScriptureSource for BollsClient {
    fn name(&self) -> &str {
        "bolls.life"
    }

    async fn translations(&self) -> Result<Vec<Translation>, SourceError> {
        let groups: Vec<LanguageGroup> = self
            .get_json("/static/bolls/app/views/languages.json")
            .await?;
        let translations: Vec<Translation> = groups
            .into_iter()
            .filter(|g| g.language.starts_with(CATALOGUE_LANGUAGE))
            .flat_map(|g| g.translations)
            .collect();
        info!("Fetched {} translations", translations.len());
        Ok(translations)
    }

    async fn books(&self, translation: &str) -> Result<Vec<Book>, SourceError> {
        let mut books: Vec<Book> = self.get_json(&format!("/get-books/{translation}/")).await?;
        books.sort_by_key(|b| b.id);
        Ok(books)
    }

    async fn chapter(
        &self,
        translation: &str,
        book: u32,
        chapter: u32,
    ) -> Result<Vec<Verse>, SourceError> {
        if let Some(cache) = &self.cache
            && cache.is_cached(translation)
        {
            debug!("Reading {translation} {book}:{chapter} from cache");
            return Arc::clone(cache)
                .read_chapter(translation, book, chapter)
                .await
                .map_err(|e| SourceError::Cache(e.to_string()));
        }

        let mut verses: Vec<Verse> = self
            .get_json(&format!("/get-text/{translation}/{book}/{chapter}/"))
            .await?;
        verses.sort_by_key(|v| v.number);
        Ok(verses)
    }

    async fn parallel(
        &self,
        translations: &[String],
        book: u32,
        chapter: u32,
        verses: &[u32],
    ) -> Result<ParallelChapter, SourceError> {
        let query = ParallelQuery {
            translations: translations.to_vec(),
            verses: verses.to_vec(),
            chapter,
            book,
        };
        let url = format!("{}/get-parallel-verses/", self.base_url);
        debug!("POST {url} {query:?}");
        let response = self.client.post(&url).json(&query).send().await?;
        let rows: Vec<Vec<Verse>> = Self::decode(response).await?;

        // Rows come back in request order; verses past the end of the chapter
        // arrive as empty placeholders.
        let columns = translations
            .iter()
            .cloned()
            .zip(rows.into_iter().chain(std::iter::repeat_with(Vec::new)))
            .map(|(code, verses)| {
                let verses = verses
                    .into_iter()
                    .filter(|v| v.number > 0 && !v.text.trim().is_empty())
                    .collect();
                (code, verses)
            })
            .collect();
        Ok(ParallelChapter { columns })
    }
}
