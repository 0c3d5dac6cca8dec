///! Query builders for the biodiversity API
///!
///! Pure functions from typed parameters to request URLs. Each builder
///! appends the fixed parameters its endpoint always carries, so callers
///! only supply what varies between requests.
use urlencoding::encode;

use super::types::IconicGroup;
use crate::geo::GeoPoint;

/// Page size when listing species in an area. The endpoint is never asked
/// for more rows than the display cap can show.
pub const SPECIES_COUNTS_PER_PAGE: u32 = 50;

/// Page size for observation point queries unless configured otherwise.
pub const DEFAULT_OBSERVATION_PER_PAGE: u32 = 200;

/// Filters for an observation point query. Unset fields are left out of
/// the URL entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationParams {
    pub taxon_id: Option<u64>,
    pub place_id: Option<u64>,
    pub center: Option<GeoPoint>,
    pub radius_km: Option<f64>,
    pub iconic: Option<IconicGroup>,
    pub per_page: u32,
}

impl Default for ObservationParams {
    fn default() -> Self {
        Self {
            taxon_id: None,
            place_id: None,
            center: None,
            radius_km: None,
            iconic: None,
            per_page: DEFAULT_OBSERVATION_PER_PAGE,
        }
    }
}

/// Filters for an area species list query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesCountParams {
    pub place_id: Option<u64>,
    pub center: Option<GeoPoint>,
    pub radius_km: Option<f64>,
    pub iconic: Option<IconicGroup>,
    pub locale: Option<String>,
}

/// `GET /taxa`: species-ranked name search.
pub fn taxa_search_url(base: &str, q: &str, locale: Option<&str>) -> String {
    let mut url = format!("{base}/taxa?q={}&rank=species", encode(q));
    if let Some(locale) = locale {
        url.push_str(&format!("&locale={locale}"));
    }
    url
}

/// `GET /taxa/{id}`: single taxon lookup.
pub fn taxon_by_id_url(base: &str, id: u64) -> String {
    format!("{base}/taxa/{id}")
}

/// `GET /observations`: georeferenced, verifiable observations, newest
/// first.
pub fn observations_url(base: &str, params: &ObservationParams) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(id) = params.taxon_id {
        parts.push(format!("taxon_id={id}"));
    }
    if let Some(id) = params.place_id {
        parts.push(format!("place_id={id}"));
    }
    if let Some(center) = params.center {
        parts.push(format!("lat={}&lng={}", center.latitude, center.longitude));
    }
    if let Some(radius) = params.radius_km {
        parts.push(format!("radius={radius}"));
    }
    if let Some(iconic) = params.iconic {
        parts.push(format!("iconic_taxa={}", iconic.as_str()));
    }
    parts.push("order=desc".to_string());
    parts.push("order_by=created_at".to_string());
    parts.push("geo=true".to_string());
    parts.push("verifiable=true".to_string());
    parts.push(format!("per_page={}", params.per_page));

    format!("{base}/observations?{}", parts.join("&"))
}

/// `GET /observations/species_counts`: distinct species observed in an
/// area, most observed first.
pub fn species_counts_url(base: &str, params: &SpeciesCountParams) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(id) = params.place_id {
        parts.push(format!("place_id={id}"));
    }
    if let Some(center) = params.center {
        parts.push(format!("lat={}&lng={}", center.latitude, center.longitude));
    }
    if let Some(radius) = params.radius_km {
        parts.push(format!("radius={radius}"));
    }
    if let Some(iconic) = params.iconic {
        parts.push(format!("iconic_taxa={}", iconic.as_str()));
    }
    if let Some(locale) = &params.locale {
        parts.push(format!("locale={locale}"));
    }
    parts.push(format!("per_page={SPECIES_COUNTS_PER_PAGE}"));

    format!("{base}/observations/species_counts?{}", parts.join("&"))
}

/// `GET /places/autocomplete`: named place search.
pub fn places_autocomplete_url(base: &str, q: &str) -> String {
    format!("{base}/places/autocomplete?q={}", encode(q))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.inaturalist.org/v1";

    #[test]
    fn test_taxa_search_url_encodes_query() {
        assert_eq!(
            taxa_search_url(BASE, "ós bru", Some("ca")),
            "https://api.inaturalist.org/v1/taxa?q=%C3%B3s%20bru&rank=species&locale=ca"
        );
    }

    #[test]
    fn test_taxa_search_url_without_locale() {
        assert_eq!(
            taxa_search_url(BASE, "puffin", None),
            "https://api.inaturalist.org/v1/taxa?q=puffin&rank=species"
        );
    }

    #[test]
    fn test_taxon_by_id_url() {
        assert_eq!(
            taxon_by_id_url(BASE, 41577),
            "https://api.inaturalist.org/v1/taxa/41577"
        );
    }

    #[test]
    fn test_observations_url_for_area() {
        let params = ObservationParams {
            center: Some(GeoPoint::new(41.4, 2.2)),
            radius_km: Some(250.0),
            ..Default::default()
        };
        assert_eq!(
            observations_url(BASE, &params),
            "https://api.inaturalist.org/v1/observations?lat=41.4&lng=2.2&radius=250\
             &order=desc&order_by=created_at&geo=true&verifiable=true&per_page=200"
        );
    }

    #[test]
    fn test_observations_url_for_taxon() {
        let params = ObservationParams {
            taxon_id: Some(41577),
            ..Default::default()
        };
        assert_eq!(
            observations_url(BASE, &params),
            "https://api.inaturalist.org/v1/observations?taxon_id=41577\
             &order=desc&order_by=created_at&geo=true&verifiable=true&per_page=200"
        );
    }

    #[test]
    fn test_observations_url_with_category_filter() {
        let params = ObservationParams {
            center: Some(GeoPoint::new(41.4, 2.2)),
            radius_km: Some(250.0),
            iconic: Some(IconicGroup::Aves),
            per_page: 100,
            ..Default::default()
        };
        assert_eq!(
            observations_url(BASE, &params),
            "https://api.inaturalist.org/v1/observations?lat=41.4&lng=2.2&radius=250\
             &iconic_taxa=Aves&order=desc&order_by=created_at&geo=true&verifiable=true&per_page=100"
        );
    }

    #[test]
    fn test_species_counts_url_fixes_page_size() {
        let params = SpeciesCountParams {
            center: Some(GeoPoint::new(-33.87, 151.21)),
            radius_km: Some(100.0),
            locale: Some("es".to_string()),
            ..Default::default()
        };
        assert_eq!(
            species_counts_url(BASE, &params),
            "https://api.inaturalist.org/v1/observations/species_counts?lat=-33.87&lng=151.21\
             &radius=100&locale=es&per_page=50"
        );
    }

    #[test]
    fn test_species_counts_url_by_place() {
        let params = SpeciesCountParams {
            place_id: Some(40469),
            iconic: Some(IconicGroup::Mammalia),
            ..Default::default()
        };
        assert_eq!(
            species_counts_url(BASE, &params),
            "https://api.inaturalist.org/v1/observations/species_counts?place_id=40469\
             &iconic_taxa=Mammalia&per_page=50"
        );
    }

    #[test]
    fn test_places_autocomplete_url() {
        assert_eq!(
            places_autocomplete_url(BASE, "new york"),
            "https://api.inaturalist.org/v1/places/autocomplete?q=new%20york"
        );
    }
}
