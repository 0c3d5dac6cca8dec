use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Tuning knobs for the explorer backend.
///
/// Every field has a default, so an empty (or absent) TOML file yields a
/// working configuration pointed at the public APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobeConfig {
    /// Base URL of the biodiversity API.
    #[serde(default = "default_inat_base_url")]
    pub inat_base_url: String,

    /// Domain of the encyclopedia; queried as `https://{lang}.{domain}`.
    #[serde(default = "default_wiki_domain")]
    pub wiki_domain: String,

    /// Translation endpoint (LibreTranslate-compatible). Disabled when unset.
    #[serde(default)]
    pub translate_url: Option<String>,

    /// Sent as both `User-Agent` and `Api-User-Agent` on every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Language for common names and summaries until the user picks one.
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Selection radius in kilometres when the user has not chosen one.
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// `per_page` for observation point queries.
    #[serde(default = "default_observation_page_size")]
    pub observation_page_size: u32,

    /// Maximum number of species records enriched and shown per area.
    #[serde(default = "default_species_list_limit")]
    pub species_list_limit: usize,

    /// Number of points on the selection circle.
    #[serde(default = "default_circle_segments")]
    pub circle_segments: usize,

    /// Concurrent summary lookups while enriching a species list.
    #[serde(default = "default_summary_concurrency")]
    pub summary_concurrency: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_inat_base_url() -> String {
    "https://api.inaturalist.org/v1".to_string()
}

fn default_wiki_domain() -> String {
    "wikipedia.org".to_string()
}

fn default_user_agent() -> String {
    "faunaglobe/0.1 (wildlife observation globe demo)".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_locale() -> String {
    "es".to_string()
}

fn default_radius_km() -> f64 {
    250.0
}

fn default_observation_page_size() -> u32 {
    200
}

fn default_species_list_limit() -> usize {
    50
}

fn default_circle_segments() -> usize {
    128
}

fn default_summary_concurrency() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GlobeConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let config: GlobeConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;
        Ok(config)
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            inat_base_url: default_inat_base_url(),
            wiki_domain: default_wiki_domain(),
            translate_url: None,
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            default_locale: default_locale(),
            default_radius_km: default_radius_km(),
            observation_page_size: default_observation_page_size(),
            species_list_limit: default_species_list_limit(),
            circle_segments: default_circle_segments(),
            summary_concurrency: default_summary_concurrency(),
            log_level: default_log_level(),
        }
    }
}
