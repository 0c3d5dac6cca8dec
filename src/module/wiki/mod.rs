///! Encyclopedia module (Wikipedia-style REST API)
///!
///! Two-step summary lookup (title search, then page summary) plus the
///! language fallback chain that makes it total: the resolver tries the
///! display language first and walks the fixed fallbacks until something
///! answers.

// ============ Core Data Structures ============
mod types;
pub use types::{PageSummary, SummaryResult};

// ============ API Client ============
mod client;
pub use client::{SummarySource, WikiClient};

// ============ Language Fallback Resolution ============
mod resolver;
pub use resolver::{FALLBACK_LANGUAGES, language_priority, resolve_summary};
