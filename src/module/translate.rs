///! Translation service client (LibreTranslate-compatible)
///!
///! Optional: flows only reach for a translator when an English summary has
///! to be shown in another language, and the session runs fine without one.
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::http;

/// Text translation between two fixed languages.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Client for a LibreTranslate-style `/translate` endpoint.
pub struct LibreTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl LibreTranslator {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl Translator for LibreTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
        };
        let response: TranslateResponse =
            http::post_json(&self.client, &self.endpoint, &request).await?;
        Ok(response.translated_text)
    }
}
