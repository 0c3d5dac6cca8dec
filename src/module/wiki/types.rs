///! Data structures for the encyclopedia REST API
///!
///! The REST payloads are nested deeper than anything the explorer needs,
///! so the wire structs flatten them into small domain types on the way in.
use serde::{Deserialize, Serialize};

// ============ Title Search ============

#[derive(Debug, Deserialize)]
pub(crate) struct TitleSearchResponse {
    #[serde(default)]
    pub(crate) pages: Vec<RawTitlePage>,
}

impl TitleSearchResponse {
    /// Key of the best match, when the search found one.
    pub(crate) fn first_key(self) -> Option<String> {
        self.pages
            .into_iter()
            .next()
            .and_then(|page| page.key)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTitlePage {
    #[serde(default)]
    key: Option<String>,
}

// ============ Page Summary ============

/// The parts of a page summary the explorer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    /// Language the summary is actually written in, as declared by the wiki.
    pub lang: Option<String>,
    pub extract: Option<String>,
    pub thumbnail_url: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageSummaryResponse {
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    thumbnail: Option<RawThumbnail>,
    #[serde(default)]
    content_urls: Option<RawContentUrls>,
}

impl PageSummaryResponse {
    pub(crate) fn into_summary(self) -> PageSummary {
        PageSummary {
            lang: self.lang.filter(|s| !s.is_empty()),
            // An empty extract still means the page exists; keep it.
            extract: self.extract,
            thumbnail_url: self.thumbnail.and_then(|t| t.source).filter(|s| !s.is_empty()),
            source_url: self
                .content_urls
                .and_then(|c| c.desktop)
                .and_then(|d| d.page)
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawContentUrls {
    #[serde(default)]
    desktop: Option<RawDesktopUrls>,
}

#[derive(Debug, Deserialize)]
struct RawDesktopUrls {
    #[serde(default)]
    page: Option<String>,
}

// ============ Resolved Summary ============

/// Outcome of a summary lookup across the language fallback chain.
///
/// `extract` is `Some` (possibly empty) whenever some language edition had
/// the page; a default-constructed value means the whole chain came up dry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub source_url: Option<String>,
    pub extract: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl SummaryResult {
    /// True when no language produced a usable page.
    pub fn is_empty(&self) -> bool {
        self.source_url.is_none() && self.extract.is_none() && self.thumbnail_url.is_none()
    }
}
