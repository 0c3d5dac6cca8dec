///! Encyclopedia REST API client
///!
///! Two-step lookup against per-language editions: resolve a free-text
///! title to the article key, then pull that article's summary.
use anyhow::Result;
use async_trait::async_trait;
use urlencoding::encode;

use super::types::{PageSummary, PageSummaryResponse, TitleSearchResponse};
use crate::http;

/// Read access to the language editions of the encyclopedia.
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Key of the closest article title in `lang`, when the search matches.
    async fn search_title(&self, lang: &str, q: &str) -> Result<Option<String>>;

    /// Summary of the article with `key` in `lang`.
    async fn page_summary(&self, lang: &str, key: &str) -> Result<PageSummary>;
}

/// Client for Wikipedia-style wikis, addressed as `https://{lang}.{domain}`.
pub struct WikiClient {
    client: reqwest::Client,
    domain: String,
}

impl WikiClient {
    pub fn new(client: reqwest::Client, domain: String) -> Self {
        Self { client, domain }
    }

    fn search_url(&self, lang: &str, q: &str) -> String {
        format!(
            "https://{lang}.{}/w/rest.php/v1/search/title?q={}&limit=1",
            self.domain,
            encode(q)
        )
    }

    fn summary_url(&self, lang: &str, key: &str) -> String {
        format!(
            "https://{lang}.{}/w/rest.php/v1/page/summary/{}",
            self.domain,
            encode(key)
        )
    }
}

#[async_trait]
impl SummarySource for WikiClient {
    async fn search_title(&self, lang: &str, q: &str) -> Result<Option<String>> {
        let url = self.search_url(lang, q);
        let response: TitleSearchResponse = http::fetch_json(&self.client, &url).await?;
        Ok(response.first_key())
    }

    async fn page_summary(&self, lang: &str, key: &str) -> Result<PageSummary> {
        let url = self.summary_url(lang, key);
        let response: PageSummaryResponse = http::fetch_json(&self.client, &url).await?;
        Ok(response.into_summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WikiClient {
        let http_client = http::build_client("faunaglobe-tests/0.1", 30).unwrap();
        WikiClient::new(http_client, "wikipedia.org".to_string())
    }

    #[test]
    fn test_search_url_shape() {
        assert_eq!(
            client().search_url("ca", "ós bru"),
            "https://ca.wikipedia.org/w/rest.php/v1/search/title?q=%C3%B3s%20bru&limit=1"
        );
    }

    #[test]
    fn test_summary_url_encodes_key() {
        assert_eq!(
            client().summary_url("es", "Tursiops_truncatus"),
            "https://es.wikipedia.org/w/rest.php/v1/page/summary/Tursiops_truncatus"
        );
        assert_eq!(
            client().summary_url("en", "Pan paniscus"),
            "https://en.wikipedia.org/w/rest.php/v1/page/summary/Pan%20paniscus"
        );
    }

    #[tokio::test]
    #[ignore] // requires network access
    async fn test_live_title_search() {
        let api = client();
        let key = api.search_title("en", "Tursiops truncatus").await.unwrap();
        assert!(key.is_some());
    }
}
