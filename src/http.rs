use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

/// Builds the HTTP client shared by every service wrapper.
///
/// The agent string is sent twice: as the regular `User-Agent` and as
/// `Api-User-Agent`, which the encyclopedia's REST API asks clients to set.
pub fn build_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("api-user-agent"),
        HeaderValue::from_str(user_agent)
            .with_context(|| format!("Invalid user agent string: {user_agent}"))?,
    );

    reqwest::Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// GETs `url` and decodes the JSON body into `T`.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, FetchError> {
    debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: url.to_string(),
        });
    }

    response.json::<T>().await.map_err(|e| FetchError::Decode {
        url: url.to_string(),
        source: e,
    })
}

/// POSTs `body` as JSON to `url` and decodes the JSON response into `T`.
pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<T, FetchError> {
    debug!("POST {}", url);
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: url.to_string(),
        });
    }

    response.json::<T>().await.map_err(|e| FetchError::Decode {
        url: url.to_string(),
        source: e,
    })
}
