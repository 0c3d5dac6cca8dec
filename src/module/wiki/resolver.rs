///! Multi-language summary resolution
///!
///! Looks a title up across a chain of language editions and keeps the
///! first hit. Resolution is total: failures inside the chain are logged
///! and skipped, and an exhausted chain yields an empty result rather than
///! an error.
use tracing::debug;

use super::client::SummarySource;
use super::types::SummaryResult;
use crate::module::translate::Translator;

/// Languages tried after the display language, in order.
pub const FALLBACK_LANGUAGES: [&str; 3] = ["ca", "es", "en"];

/// The display language followed by the fixed fallbacks. First occurrence
/// wins, so no language edition is queried twice.
pub fn language_priority(display_lang: &str) -> Vec<String> {
    let mut langs = vec![display_lang.to_string()];
    for fallback in FALLBACK_LANGUAGES {
        if !langs.iter().any(|l| l == fallback) {
            langs.push(fallback.to_string());
        }
    }
    langs
}

/// Resolves the summary for `title`, preferring `display_lang` and then
/// walking [`FALLBACK_LANGUAGES`].
///
/// Each language takes two requests: a title search, then the summary of
/// the matched key. A language without a match, or whose requests fail,
/// only advances the chain. When the winning summary declares itself
/// English but the caller wants another language, the extract is run
/// through `translator` (when wired up); a failed translation keeps the
/// English text.
pub async fn resolve_summary(
    source: &dyn SummarySource,
    translator: Option<&dyn Translator>,
    title: &str,
    display_lang: &str,
) -> SummaryResult {
    for lang in language_priority(display_lang) {
        let key = match source.search_title(&lang, title).await {
            Ok(Some(key)) => key,
            Ok(None) => {
                debug!("no title match for '{}' in {}", title, lang);
                continue;
            }
            Err(e) => {
                debug!("title search for '{}' failed in {}: {:#}", title, lang, e);
                continue;
            }
        };

        let summary = match source.page_summary(&lang, &key).await {
            Ok(summary) => summary,
            Err(e) => {
                debug!("summary fetch for '{}' failed in {}: {:#}", key, lang, e);
                continue;
            }
        };

        let mut extract = summary.extract.unwrap_or_default();
        if let Some(translator) = translator {
            if !extract.is_empty()
                && display_lang != "en"
                && summary.lang.as_deref() == Some("en")
            {
                match translator.translate(&extract, "en", display_lang).await {
                    Ok(translated) => extract = translated,
                    Err(e) => debug!("translation to {} failed: {:#}", display_lang, e),
                }
            }
        }

        return SummaryResult {
            source_url: summary.source_url,
            extract: Some(extract),
            thumbnail_url: summary.thumbnail_url,
        };
    }

    SummaryResult::default()
}
