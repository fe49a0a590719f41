//! Translation catalogues for the about page.
//!
//! Catalogues are flat JSON objects of `key -> text`, served as
//! `about-{code}.json` next to the site pages. A language that cannot be
//! fetched falls back to English; if English is unavailable too, lookups
//! return the caller's built-in text.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::preferences::Language;

/// Errors fetching one catalogue. Never surfaced past [`TranslationClient`].
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation file returned HTTP {0}")]
    Status(u16),

    #[error("invalid translation file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("translation file has no entries")]
    Empty,

    #[error("invalid translation URL: {0}")]
    Url(#[from] url::ParseError),
}

/// One language's strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Parse a catalogue, keeping only string values.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON object.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;
        let entries = object
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();
        Ok(Self { entries })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Translated text for `key`, or `default` when missing.
    #[must_use]
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Catalogues stay fresh for an hour.
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const CACHE_CAPACITY: u64 = 8;

/// Fetches and caches catalogues per language.
///
/// Concurrent loads of one language share a single request.
pub struct TranslationClient {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<Language, Arc<Catalog>>,
}

impl TranslationClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            client,
            base_url,
            cache,
        }
    }

    /// URL of the catalogue for `lang`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be joined.
    pub fn catalog_url(&self, lang: Language) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("about-{}.json", lang.code()))
    }

    /// Catalogue for `lang`, falling back to English on any failure.
    ///
    /// Never fails. An empty catalogue means no translation was available;
    /// it is not cached, so the next call tries again.
    #[instrument(skip(self))]
    pub async fn load(&self, lang: Language) -> Arc<Catalog> {
        match self.cached_fetch(lang).await {
            Ok(catalog) => catalog,
            Err(e) if lang == Language::English => {
                tracing::error!(error = %e, "Failed to load English translations");
                Arc::new(Catalog::default())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Translation file not available, using English");
                match self.cached_fetch(Language::English).await {
                    Ok(english) => {
                        self.cache.insert(lang, Arc::clone(&english)).await;
                        english
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to load English translations");
                        Arc::new(Catalog::default())
                    }
                }
            }
        }
    }

    /// Cached catalogue, fetching it at most once across concurrent callers.
    async fn cached_fetch(&self, lang: Language) -> Result<Arc<Catalog>, Arc<TranslationError>> {
        self.cache
            .try_get_with(lang, async { self.fetch(lang).await.map(Arc::new) })
            .await
    }

    async fn fetch(&self, lang: Language) -> Result<Catalog, TranslationError> {
        let url = self.catalog_url(lang)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(TranslationError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        let catalog = Catalog::from_json(&body)?;
        if catalog.is_empty() {
            return Err(TranslationError::Empty);
        }
        tracing::debug!(entries = catalog.len(), "Loaded translations");
        Ok(catalog)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keeps_strings() {
        let catalog =
            Catalog::from_json(r#"{"hero.title":"Murakaza neza","count":3,"blank":""}"#).unwrap();
        assert_eq!(catalog.get("hero.title"), Some("Murakaza neza"));
        assert_eq!(catalog.get("count"), None);
        assert_eq!(catalog.text("blank", "Welcome"), "Welcome");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_catalog_rejects_non_object() {
        assert!(Catalog::from_json("[1,2]").is_err());
    }

    #[test]
    fn test_catalog_urls() {
        let base = Url::parse("http://localhost/movenpick/").unwrap();
        let client = TranslationClient::new(reqwest::Client::new(), base);
        assert_eq!(
            client.catalog_url(Language::Swahili).unwrap().as_str(),
            "http://localhost/movenpick/about-sw.json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_yields_empty_catalog() {
        // Nothing listens on port 9; every fetch fails fast.
        let base = Url::parse("http://127.0.0.1:9/").unwrap();
        let client = TranslationClient::new(reqwest::Client::new(), base);
        let catalog = client.load(Language::French).await;
        assert!(catalog.is_empty());
        assert_eq!(catalog.text("hero.title", "Welcome"), "Welcome");
    }
}
