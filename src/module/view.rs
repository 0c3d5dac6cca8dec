///! View-model assembly
///!
///! Pure record assembly plus the bounded fan-out that enriches a species
///! list with summaries. `ViewUpdate` is the whole contract between the
///! session flows and whatever renders them.
use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream;
use serde::Serialize;

use crate::geo::{GeoPoint, SelectionPolygon};
use crate::module::inat::{SpeciesCount, TaxonRef};
use crate::module::translate::Translator;
use crate::module::wiki::{SummaryResult, SummarySource, resolve_summary};

/// Camera altitude after an area query resolves.
pub const AREA_FOCUS_ALTITUDE: f64 = 1.6;
/// Camera altitude after a taxon search resolves to observation points.
pub const POINT_FOCUS_ALTITUDE: f64 = 2.0;
/// Camera altitude when the user opens a record's detail view.
pub const DETAIL_FOCUS_ALTITUDE: f64 = 2.2;

/// Where the camera should settle after an update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraFocus {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl CameraFocus {
    pub fn over(point: GeoPoint, altitude: f64) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            altitude,
        }
    }
}

/// Focus for opening one record's detail view from the list.
pub fn detail_focus(point: GeoPoint) -> CameraFocus {
    CameraFocus::over(point, DETAIL_FOCUS_ALTITUDE)
}

/// One list entry, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    pub taxon_id: u64,
    /// Common name when known, scientific name otherwise.
    pub title: String,
    /// Always the scientific name.
    pub subtitle: String,
    pub rank: Option<String>,
    pub thumbnail: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
}

/// Merges a taxon and its resolved summary into a list entry. The summary
/// wins for thumbnail and link; the taxon's own fields back it up.
pub fn display_record(taxon: &TaxonRef, summary: SummaryResult) -> DisplayRecord {
    DisplayRecord {
        taxon_id: taxon.id,
        title: taxon.display_title().to_string(),
        subtitle: taxon.scientific_name.clone(),
        rank: taxon.rank.clone(),
        thumbnail: summary
            .thumbnail_url
            .or_else(|| taxon.default_photo_url.clone()),
        summary: summary.extract,
        link: summary.source_url.or_else(|| taxon.wikipedia_url.clone()),
    }
}

/// Enriches up to `limit` species rows with summaries, keeping at most
/// `concurrency` lookups in flight, and returns the records in the order
/// the rows arrived.
pub async fn enrich_species(
    counts: Vec<SpeciesCount>,
    source: &dyn SummarySource,
    translator: Option<&dyn Translator>,
    display_lang: &str,
    concurrency: usize,
    limit: usize,
) -> Vec<DisplayRecord> {
    stream::iter(counts.into_iter().take(limit))
        .map(|row| async move {
            let title = row.taxon.encyclopedia_title().to_string();
            let summary = resolve_summary(source, translator, &title, display_lang).await;
            display_record(&row.taxon, summary)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// What a completed user action hands back to the presentation layer.
///
/// Every flow resolves to exactly one of these; a flow whose work was
/// overtaken by a newer action reports `Superseded` and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewUpdate {
    /// An area query resolved: species list, observation points, the
    /// selection outline and where to aim the camera.
    Area {
        records: Vec<DisplayRecord>,
        points: Vec<GeoPoint>,
        selection: SelectionPolygon,
        focus: CameraFocus,
        fetched_at: DateTime<Utc>,
    },
    /// A taxon search resolved to a single enriched record.
    Taxon {
        record: DisplayRecord,
        points: Vec<GeoPoint>,
        /// Over the first observation point, when there is one.
        focus: Option<CameraFocus>,
        fetched_at: DateTime<Utc>,
    },
    /// The query ran fine but matched nothing.
    Empty,
    /// A step failed; the message names the step and the cause.
    Failed { message: String },
    /// A newer action took over before this one finished.
    Superseded,
}
