///! Biodiversity API client
///!
///! Thin async wrapper over the query builders: one method per endpoint,
///! decoding straight into the domain types. `BiodiversitySource` is the
///! seam the session flows are driven and tested through.
use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;

use super::query::{self, ObservationParams, SpeciesCountParams};
use super::types::{
    ObservationsResponse, Place, PlacesResponse, SpeciesCount, SpeciesCountsResponse,
    TaxaResponse, TaxonRef,
};
use crate::error::FetchError;
use crate::geo::GeoPoint;
use crate::http;

/// Read access to the biodiversity API.
#[async_trait]
pub trait BiodiversitySource: Send + Sync {
    /// Species-ranked name search.
    async fn taxa_search(&self, q: &str, locale: Option<&str>) -> Result<Vec<TaxonRef>>;

    /// Single taxon by id; `None` when the id is unknown.
    async fn taxon_by_id(&self, id: u64) -> Result<Option<TaxonRef>>;

    /// Distinct species observed in an area, most observed first.
    async fn species_counts(&self, params: &SpeciesCountParams) -> Result<Vec<SpeciesCount>>;

    /// Coordinates of matching observations, newest first. Observations
    /// without usable coordinates are already filtered out.
    async fn observation_points(&self, params: &ObservationParams) -> Result<Vec<GeoPoint>>;

    /// Named place search.
    async fn places_autocomplete(&self, q: &str) -> Result<Vec<Place>>;
}

/// Client for the iNaturalist v1 API.
pub struct InatClient {
    client: reqwest::Client,
    base_url: String,
}

impl InatClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl BiodiversitySource for InatClient {
    async fn taxa_search(&self, q: &str, locale: Option<&str>) -> Result<Vec<TaxonRef>> {
        let url = query::taxa_search_url(&self.base_url, q, locale);
        let response: TaxaResponse = http::fetch_json(&self.client, &url).await?;
        Ok(response.into_taxa())
    }

    async fn taxon_by_id(&self, id: u64) -> Result<Option<TaxonRef>> {
        let url = query::taxon_by_id_url(&self.base_url, id);
        let response: TaxaResponse = match http::fetch_json(&self.client, &url).await {
            Ok(response) => response,
            // Unknown ids come back as 404 rather than an empty result list.
            Err(FetchError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(response.into_taxa().into_iter().next())
    }

    async fn species_counts(&self, params: &SpeciesCountParams) -> Result<Vec<SpeciesCount>> {
        let url = query::species_counts_url(&self.base_url, params);
        let response: SpeciesCountsResponse = http::fetch_json(&self.client, &url).await?;
        Ok(response.into_counts())
    }

    async fn observation_points(&self, params: &ObservationParams) -> Result<Vec<GeoPoint>> {
        let url = query::observations_url(&self.base_url, params);
        let response: ObservationsResponse = http::fetch_json(&self.client, &url).await?;
        Ok(response.into_points())
    }

    async fn places_autocomplete(&self, q: &str) -> Result<Vec<Place>> {
        let url = query::places_autocomplete_url(&self.base_url, q);
        let response: PlacesResponse = http::fetch_json(&self.client, &url).await?;
        Ok(response.into_places())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_client() -> InatClient {
        let client = http::build_client("faunaglobe-tests/0.1", 30).unwrap();
        InatClient::new(client, "https://api.inaturalist.org/v1".to_string())
    }

    #[tokio::test]
    #[ignore] // requires network access
    async fn test_live_taxa_search() {
        let api = live_client();
        let taxa = api
            .taxa_search("Tursiops truncatus", Some("en"))
            .await
            .unwrap();
        assert!(!taxa.is_empty());
        assert_eq!(taxa[0].scientific_name, "Tursiops truncatus");
    }

    #[tokio::test]
    #[ignore] // requires network access
    async fn test_live_species_counts_near_barcelona() {
        let api = live_client();
        let params = SpeciesCountParams {
            center: Some(GeoPoint::new(41.4, 2.2)),
            radius_km: Some(50.0),
            ..Default::default()
        };
        let counts = api.species_counts(&params).await.unwrap();
        assert!(!counts.is_empty());
    }

    #[tokio::test]
    #[ignore] // requires network access
    async fn test_live_observation_points_have_finite_coordinates() {
        let api = live_client();
        let params = ObservationParams {
            center: Some(GeoPoint::new(41.4, 2.2)),
            radius_km: Some(50.0),
            per_page: 20,
            ..Default::default()
        };
        let points = api.observation_points(&params).await.unwrap();
        assert!(points.iter().all(|p| p.latitude.is_finite() && p.longitude.is_finite()));
    }
}
