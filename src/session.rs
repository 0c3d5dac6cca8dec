use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::config::GlobeConfig;
use crate::geo::{GeoPoint, generate_circle};
use crate::http;
use crate::module::inat::{
    BiodiversitySource, IconicGroup, InatClient, ObservationParams, SpeciesCountParams, TaxonRef,
};
use crate::module::translate::{LibreTranslator, Translator};
use crate::module::view::{
    AREA_FOCUS_ALTITUDE, CameraFocus, POINT_FOCUS_ALTITUDE, ViewUpdate, display_record,
    enrich_species,
};
use crate::module::wiki::{SummarySource, WikiClient, resolve_summary};

/// What the search box submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Free-text animal or species name.
    Taxon,
    /// Named place.
    Place,
}

/// A submitted search, with the preferences active at submit time.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub query: String,
    /// Falls back to the configured default radius when unset.
    pub radius_km: Option<f64>,
    pub locale: String,
    pub filter: Option<IconicGroup>,
}

/// The center, radius and preference snapshot one area query runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
    pub locale: String,
    pub filter: Option<IconicGroup>,
}

impl AreaQuery {
    fn species_count_params(&self) -> SpeciesCountParams {
        SpeciesCountParams {
            center: Some(self.center),
            radius_km: Some(self.radius_km),
            iconic: self.filter,
            locale: Some(self.locale.clone()),
            ..Default::default()
        }
    }

    fn observation_params(&self, per_page: u32) -> ObservationParams {
        ObservationParams {
            center: Some(self.center),
            radius_km: Some(self.radius_km),
            iconic: self.filter,
            per_page,
            ..Default::default()
        }
    }
}

/// What the session remembers between user actions.
#[derive(Debug, Clone)]
struct SessionState {
    locale: String,
    filter: Option<IconicGroup>,
    last_query: Option<LastQuery>,
}

/// The last data-producing query, kept so preference changes can re-run it.
#[derive(Debug, Clone, PartialEq)]
enum LastQuery {
    Area { center: GeoPoint, radius_km: f64 },
    Taxon { taxon_id: u64 },
}

/// Handle tied to one user action. `cancelled()` resolves as soon as a
/// newer action starts, at which point this action must report itself
/// superseded instead of delivering a stale update.
struct ActionToken {
    generation: u64,
    rx: watch::Receiver<u64>,
}

impl ActionToken {
    /// True while no newer action has started.
    fn is_current(&self) -> bool {
        *self.rx.borrow() == self.generation
    }

    /// Final word for this action: the computed update while the action is
    /// still current, `Superseded` once a newer one has started.
    fn resolve(&self, update: ViewUpdate) -> ViewUpdate {
        if self.is_current() {
            update
        } else {
            ViewUpdate::Superseded
        }
    }

    async fn cancelled(&mut self) {
        loop {
            if !self.is_current() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // The sender only drops with the session itself; nothing
                // can supersede this action anymore.
                std::future::pending::<()>().await;
            }
        }
    }
}

/// One user's explorer: shared preferences, the last query, and the flows
/// user actions trigger. Methods take `&self`; the session is meant to sit
/// behind an `Arc` in whatever embeds it.
pub struct ExplorerSession {
    inat: Arc<dyn BiodiversitySource>,
    wiki: Arc<dyn SummarySource>,
    translator: Option<Arc<dyn Translator>>,
    config: GlobeConfig,
    state: RwLock<SessionState>,
    actions: watch::Sender<u64>,
}

impl ExplorerSession {
    /// Session wired to the live services named in `config`.
    pub fn new(config: GlobeConfig) -> Result<Self> {
        let client = http::build_client(&config.user_agent, config.request_timeout_secs)
            .context("Failed to build session HTTP client")?;
        let inat: Arc<dyn BiodiversitySource> =
            Arc::new(InatClient::new(client.clone(), config.inat_base_url.clone()));
        let wiki: Arc<dyn SummarySource> =
            Arc::new(WikiClient::new(client.clone(), config.wiki_domain.clone()));
        let translator: Option<Arc<dyn Translator>> = config
            .translate_url
            .clone()
            .map(|endpoint| Arc::new(LibreTranslator::new(client, endpoint)) as Arc<dyn Translator>);
        Ok(Self::with_sources(config, inat, wiki, translator))
    }

    /// Session over caller-provided sources; tests drive the flows through
    /// this.
    pub fn with_sources(
        config: GlobeConfig,
        inat: Arc<dyn BiodiversitySource>,
        wiki: Arc<dyn SummarySource>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        let state = SessionState {
            locale: config.default_locale.clone(),
            filter: None,
            last_query: None,
        };
        Self {
            inat,
            wiki,
            translator,
            config,
            state: RwLock::new(state),
            actions: watch::channel(0).0,
        }
    }

    /// Current display language.
    pub async fn locale(&self) -> String {
        self.state.read().await.locale.clone()
    }

    /// Current category filter.
    pub async fn category_filter(&self) -> Option<IconicGroup> {
        self.state.read().await.filter
    }

    /// Changes the display language for everything fetched from now on.
    /// Updates already delivered are not refetched.
    pub async fn set_locale(&self, locale: impl Into<String>) {
        let locale = locale.into();
        debug!("display language set to {}", locale);
        self.state.write().await.locale = locale;
    }

    /// Globe click: list the species around the clicked point and light
    /// their recent observations up.
    pub async fn globe_click(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> ViewUpdate {
        let mut token = self.begin_action();
        let center = GeoPoint::new(latitude, longitude);
        let radius_km = radius_km.unwrap_or(self.config.default_radius_km);
        self.remember_query(token.generation, LastQuery::Area { center, radius_km })
            .await;
        let area = {
            let state = self.state.read().await;
            AreaQuery {
                center,
                radius_km,
                locale: state.locale.clone(),
                filter: state.filter,
            }
        };

        let update = tokio::select! {
            _ = token.cancelled() => ViewUpdate::Superseded,
            update = self.area_update(&area) => update,
        };
        token.resolve(update)
    }

    /// Search box submit. Place mode resolves the place and runs an area
    /// query around it; taxon mode resolves the best-matching species.
    pub async fn submit_search(&self, request: SearchRequest) -> ViewUpdate {
        let mut token = self.begin_action();
        {
            let mut state = self.state.write().await;
            state.locale = request.locale.clone();
            state.filter = request.filter;
        }

        let generation = token.generation;
        let update = tokio::select! {
            _ = token.cancelled() => ViewUpdate::Superseded,
            update = self.run_search(&request, generation) => update,
        };
        token.resolve(update)
    }

    /// Switches the category filter and re-runs the last query under it.
    /// `None` when there is no last query to re-run.
    pub async fn set_category_filter(&self, filter: Option<IconicGroup>) -> Option<ViewUpdate> {
        let mut token = self.begin_action();
        let last = {
            let mut state = self.state.write().await;
            state.filter = filter;
            state.last_query.clone()
        }?;

        let update = tokio::select! {
            _ = token.cancelled() => ViewUpdate::Superseded,
            update = self.rerun(last) => update,
        };
        Some(token.resolve(update))
    }

    fn begin_action(&self) -> ActionToken {
        let mut generation = 0;
        self.actions.send_modify(|g| {
            *g += 1;
            generation = *g;
        });
        ActionToken {
            generation,
            rx: self.actions.subscribe(),
        }
    }

    /// Remembers the query a flow ran so a later filter change can re-run
    /// it. Skipped when a newer action has already started: a superseded
    /// flow must not overwrite the newer action's history.
    async fn remember_query(&self, generation: u64, query: LastQuery) {
        let mut state = self.state.write().await;
        if *self.actions.borrow() == generation {
            state.last_query = Some(query);
        }
    }

    async fn run_search(&self, request: &SearchRequest, generation: u64) -> ViewUpdate {
        let query = request.query.trim();
        if query.is_empty() {
            return ViewUpdate::Empty;
        }
        match request.mode {
            SearchMode::Place => self.place_search(query, request, generation).await,
            SearchMode::Taxon => self.taxon_search(query, request, generation).await,
        }
    }

    async fn place_search(
        &self,
        query: &str,
        request: &SearchRequest,
        generation: u64,
    ) -> ViewUpdate {
        info!("place search for '{}'", query);
        let places = match self.inat.places_autocomplete(query).await {
            Ok(places) => places,
            Err(e) => {
                warn!("place search failed: {:#}", e);
                return ViewUpdate::Failed {
                    message: format!("{e:#}"),
                };
            }
        };
        let Some(place) = places.into_iter().next() else {
            return ViewUpdate::Empty;
        };
        let Some(center) = place.location else {
            info!("place '{}' has no usable coordinates", place.name);
            return ViewUpdate::Empty;
        };

        let radius_km = request.radius_km.unwrap_or(self.config.default_radius_km);
        self.remember_query(generation, LastQuery::Area { center, radius_km })
            .await;
        let area = AreaQuery {
            center,
            radius_km,
            locale: request.locale.clone(),
            filter: request.filter,
        };
        self.area_update(&area).await
    }

    async fn taxon_search(
        &self,
        query: &str,
        request: &SearchRequest,
        generation: u64,
    ) -> ViewUpdate {
        info!("taxon search for '{}'", query);
        let taxa = match self.inat.taxa_search(query, Some(&request.locale)).await {
            Ok(taxa) => taxa,
            Err(e) => {
                warn!("taxon search failed: {:#}", e);
                return ViewUpdate::Failed {
                    message: format!("{e:#}"),
                };
            }
        };
        let Some(taxon) = taxa.into_iter().next() else {
            return ViewUpdate::Empty;
        };

        self.remember_query(generation, LastQuery::Taxon { taxon_id: taxon.id })
            .await;
        self.taxon_update(taxon, &request.locale).await
    }

    /// Re-runs the remembered query under the current preferences.
    async fn rerun(&self, last: LastQuery) -> ViewUpdate {
        match last {
            LastQuery::Area { center, radius_km } => {
                let (locale, filter) = {
                    let state = self.state.read().await;
                    (state.locale.clone(), state.filter)
                };
                let area = AreaQuery {
                    center,
                    radius_km,
                    locale,
                    filter,
                };
                self.area_update(&area).await
            }
            LastQuery::Taxon { taxon_id } => self.taxon_rerun(taxon_id).await,
        }
    }

    async fn taxon_rerun(&self, taxon_id: u64) -> ViewUpdate {
        let taxon = match self.inat.taxon_by_id(taxon_id).await {
            Ok(Some(taxon)) => taxon,
            Ok(None) => return ViewUpdate::Empty,
            Err(e) => {
                warn!("taxon lookup failed: {:#}", e);
                return ViewUpdate::Failed {
                    message: format!("{e:#}"),
                };
            }
        };
        let locale = self.state.read().await.locale.clone();
        self.taxon_update(taxon, &locale).await
    }

    async fn area_update(&self, area: &AreaQuery) -> ViewUpdate {
        match self.try_area_update(area).await {
            Ok(update) => update,
            Err(e) => {
                warn!("area query failed: {:#}", e);
                ViewUpdate::Failed {
                    message: format!("{e:#}"),
                }
            }
        }
    }

    async fn try_area_update(&self, area: &AreaQuery) -> Result<ViewUpdate> {
        info!(
            "listing species around ({:.4}, {:.4}) within {} km",
            area.center.latitude, area.center.longitude, area.radius_km
        );
        let counts = self
            .inat
            .species_counts(&area.species_count_params())
            .await
            .context("species list fetch failed")?;
        let records = enrich_species(
            counts,
            self.wiki.as_ref(),
            self.translator.as_deref(),
            &area.locale,
            self.config.summary_concurrency,
            self.config.species_list_limit,
        )
        .await;
        let points = self
            .inat
            .observation_points(&area.observation_params(self.config.observation_page_size))
            .await
            .context("observation fetch failed")?;
        debug!(
            "area resolved to {} records and {} points",
            records.len(),
            points.len()
        );

        Ok(ViewUpdate::Area {
            records,
            points,
            selection: generate_circle(area.center, area.radius_km, self.config.circle_segments),
            focus: CameraFocus::over(area.center, AREA_FOCUS_ALTITUDE),
            fetched_at: Utc::now(),
        })
    }

    async fn taxon_update(&self, taxon: TaxonRef, locale: &str) -> ViewUpdate {
        match self.try_taxon_update(taxon, locale).await {
            Ok(update) => update,
            Err(e) => {
                warn!("taxon query failed: {:#}", e);
                ViewUpdate::Failed {
                    message: format!("{e:#}"),
                }
            }
        }
    }

    async fn try_taxon_update(&self, taxon: TaxonRef, locale: &str) -> Result<ViewUpdate> {
        let summary = resolve_summary(
            self.wiki.as_ref(),
            self.translator.as_deref(),
            taxon.encyclopedia_title(),
            locale,
        )
        .await;

        let params = ObservationParams {
            taxon_id: Some(taxon.id),
            per_page: self.config.observation_page_size,
            ..Default::default()
        };
        let points = self
            .inat
            .observation_points(&params)
            .await
            .context("observation fetch failed")?;
        debug!("taxon {} resolved to {} points", taxon.id, points.len());

        let focus = points
            .first()
            .map(|p| CameraFocus::over(*p, POINT_FOCUS_ALTITUDE));
        Ok(ViewUpdate::Taxon {
            record: display_record(&taxon, summary),
            points,
            focus,
            fetched_at: Utc::now(),
        })
    }
}
