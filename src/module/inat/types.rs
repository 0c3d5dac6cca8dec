///! Core data structures for the biodiversity API
///!
///! Wire-format structs mirror the JSON the API actually returns and stay
///! private to this module; the rest of the crate only sees the mapped
///! domain types. Mapping is lossy on purpose: rows that cannot be shown
///! (no taxon, unusable coordinates) are dropped, not propagated.
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

// ============ Iconic Groups ============

/// Top-level iconic grouping used as the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconicGroup {
    Aves,
    Amphibia,
    Reptilia,
    Mammalia,
    Actinopterygii,
    Mollusca,
    Arachnida,
    Insecta,
    Plantae,
    Fungi,
}

impl IconicGroup {
    /// Name in the form the `iconic_taxa` query parameter expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            IconicGroup::Aves => "Aves",
            IconicGroup::Amphibia => "Amphibia",
            IconicGroup::Reptilia => "Reptilia",
            IconicGroup::Mammalia => "Mammalia",
            IconicGroup::Actinopterygii => "Actinopterygii",
            IconicGroup::Mollusca => "Mollusca",
            IconicGroup::Arachnida => "Arachnida",
            IconicGroup::Insecta => "Insecta",
            IconicGroup::Plantae => "Plantae",
            IconicGroup::Fungi => "Fungi",
        }
    }

    /// Case-insensitive parse of an iconic group name.
    pub fn from_string(s: &str) -> Option<IconicGroup> {
        match s.trim().to_lowercase().as_str() {
            "aves" => Some(IconicGroup::Aves),
            "amphibia" => Some(IconicGroup::Amphibia),
            "reptilia" => Some(IconicGroup::Reptilia),
            "mammalia" => Some(IconicGroup::Mammalia),
            "actinopterygii" => Some(IconicGroup::Actinopterygii),
            "mollusca" => Some(IconicGroup::Mollusca),
            "arachnida" => Some(IconicGroup::Arachnida),
            "insecta" => Some(IconicGroup::Insecta),
            "plantae" => Some(IconicGroup::Plantae),
            "fungi" => Some(IconicGroup::Fungi),
            _ => None,
        }
    }
}

// ============ Taxa ============

/// A taxon as the rest of the crate sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonRef {
    pub id: u64,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub rank: Option<String>,
    pub wikipedia_url: Option<String>,
    pub default_photo_url: Option<String>,
}

impl TaxonRef {
    /// Common name when known, scientific name otherwise.
    pub fn display_title(&self) -> &str {
        self.common_name.as_deref().unwrap_or(&self.scientific_name)
    }

    /// Title to look up in the encyclopedia: the last path segment of the
    /// taxon's article URL when the API provides one, the scientific name
    /// otherwise.
    pub fn encyclopedia_title(&self) -> &str {
        self.wikipedia_url
            .as_deref()
            .and_then(|url| url.rsplit('/').next())
            .filter(|segment| !segment.is_empty())
            .unwrap_or(&self.scientific_name)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaxaResponse {
    #[serde(default)]
    pub(crate) results: Vec<RawTaxon>,
}

impl TaxaResponse {
    pub(crate) fn into_taxa(self) -> Vec<TaxonRef> {
        self.results.into_iter().map(RawTaxon::into_taxon).collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTaxon {
    pub(crate) id: u64,
    pub(crate) name: String,
    #[serde(default)]
    preferred_common_name: Option<String>,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    wikipedia_url: Option<String>,
    #[serde(default)]
    default_photo: Option<RawPhoto>,
}

impl RawTaxon {
    /// Empty strings in the payload carry no information and map to `None`.
    fn into_taxon(self) -> TaxonRef {
        TaxonRef {
            id: self.id,
            scientific_name: self.name,
            common_name: self.preferred_common_name.filter(|s| !s.is_empty()),
            rank: self.rank.filter(|s| !s.is_empty()),
            wikipedia_url: self.wikipedia_url.filter(|s| !s.is_empty()),
            default_photo_url: self
                .default_photo
                .and_then(|p| p.square_url)
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    #[serde(default)]
    square_url: Option<String>,
}

// ============ Species Counts ============

/// One row of an area's species list: a taxon and how often it was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesCount {
    pub taxon: TaxonRef,
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpeciesCountsResponse {
    #[serde(default)]
    pub(crate) results: Vec<RawSpeciesCount>,
}

impl SpeciesCountsResponse {
    /// Rows without a taxon carry nothing we could display and are dropped.
    pub(crate) fn into_counts(self) -> Vec<SpeciesCount> {
        self.results
            .into_iter()
            .filter_map(|row| {
                let taxon = row.taxon?;
                Some(SpeciesCount {
                    taxon: taxon.into_taxon(),
                    count: row.count,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSpeciesCount {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    taxon: Option<RawTaxon>,
}

// ============ Observations ============

#[derive(Debug, Deserialize)]
pub(crate) struct ObservationsResponse {
    #[serde(default)]
    pub(crate) results: Vec<RawObservation>,
}

impl ObservationsResponse {
    /// One map point per observation with usable coordinates. Records with
    /// missing, truncated or non-numeric coordinates are dropped; the order
    /// of the remaining points is preserved.
    pub(crate) fn into_points(self) -> Vec<GeoPoint> {
        self.results.into_iter().filter_map(|o| o.point()).collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawObservation {
    #[serde(default)]
    geojson: Option<RawGeoJson>,
}

impl RawObservation {
    fn point(&self) -> Option<GeoPoint> {
        let coords = &self.geojson.as_ref()?.coordinates;
        // GeoJSON order: [longitude, latitude]
        let longitude = coords.first()?.as_f64()?;
        let latitude = coords.get(1)?.as_f64()?;
        GeoPoint::checked(latitude, longitude)
    }
}

#[derive(Debug, Deserialize)]
struct RawGeoJson {
    #[serde(default)]
    coordinates: Vec<serde_json::Value>,
}

// ============ Places ============

/// A named place from autocomplete, with coordinates when the API has them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: u64,
    pub name: String,
    pub display_name: Option<String>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlacesResponse {
    #[serde(default)]
    pub(crate) results: Vec<RawPlace>,
}

impl PlacesResponse {
    pub(crate) fn into_places(self) -> Vec<Place> {
        self.results.into_iter().map(RawPlace::into_place).collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    pub(crate) id: u64,
    pub(crate) name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    latitude: Option<Coordinate>,
    #[serde(default)]
    longitude: Option<Coordinate>,
}

impl RawPlace {
    fn into_place(self) -> Place {
        let location = match (
            self.latitude.as_ref().and_then(Coordinate::as_f64),
            self.longitude.as_ref().and_then(Coordinate::as_f64),
        ) {
            (Some(lat), Some(lng)) => GeoPoint::checked(lat, lng),
            _ => None,
        };
        Place {
            id: self.id,
            name: self.name,
            display_name: self.display_name.filter(|s| !s.is_empty()),
            location,
        }
    }
}

/// The autocomplete endpoint returns coordinates as numbers or as quoted
/// strings depending on the record, so both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Coordinate::Number(n) => Some(*n),
            Coordinate::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxon_mapping_and_fallbacks() {
        let json = r#"{
            "total_results": 1,
            "results": [{
                "id": 41577,
                "name": "Tursiops truncatus",
                "rank": "species",
                "preferred_common_name": "Common Bottlenose Dolphin",
                "wikipedia_url": "http://en.wikipedia.org/wiki/Tursiops_truncatus",
                "default_photo": { "square_url": "https://static.example.org/41577_s.jpg" }
            }]
        }"#;
        let response: TaxaResponse = serde_json::from_str(json).unwrap();
        let taxa = response.into_taxa();
        assert_eq!(taxa.len(), 1);

        let taxon = &taxa[0];
        assert_eq!(taxon.id, 41577);
        assert_eq!(taxon.display_title(), "Common Bottlenose Dolphin");
        assert_eq!(taxon.encyclopedia_title(), "Tursiops_truncatus");
        assert_eq!(
            taxon.default_photo_url.as_deref(),
            Some("https://static.example.org/41577_s.jpg")
        );
    }

    #[test]
    fn test_taxon_without_optional_fields() {
        let json = r#"{ "results": [{ "id": 7, "name": "Gavia stellata" }] }"#;
        let taxa: Vec<TaxonRef> = serde_json::from_str::<TaxaResponse>(json)
            .unwrap()
            .into_taxa();
        let taxon = &taxa[0];
        assert_eq!(taxon.display_title(), "Gavia stellata");
        assert_eq!(taxon.encyclopedia_title(), "Gavia stellata");
        assert!(taxon.rank.is_none());
        assert!(taxon.default_photo_url.is_none());
    }

    #[test]
    fn test_empty_common_name_falls_back_to_scientific() {
        let json = r#"{ "results": [{ "id": 3, "name": "Falco peregrinus", "preferred_common_name": "" }] }"#;
        let taxa = serde_json::from_str::<TaxaResponse>(json)
            .unwrap()
            .into_taxa();
        assert_eq!(taxa[0].display_title(), "Falco peregrinus");
    }

    #[test]
    fn test_encyclopedia_title_ignores_trailing_slash() {
        let taxon = TaxonRef {
            id: 1,
            scientific_name: "Lynx pardinus".to_string(),
            common_name: None,
            rank: None,
            wikipedia_url: Some("https://en.wikipedia.org/wiki/Lynx_pardinus/".to_string()),
            default_photo_url: None,
        };
        assert_eq!(taxon.encyclopedia_title(), "Lynx pardinus");
    }

    #[test]
    fn test_species_counts_drop_rows_without_taxon() {
        let json = r#"{
            "total_results": 3,
            "results": [
                { "count": 120, "taxon": { "id": 1, "name": "Sturnus vulgaris" } },
                { "count": 40 },
                { "count": 7, "taxon": { "id": 2, "name": "Pica pica", "preferred_common_name": "Eurasian Magpie" } }
            ]
        }"#;
        let counts = serde_json::from_str::<SpeciesCountsResponse>(json)
            .unwrap()
            .into_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].count, 120);
        assert_eq!(counts[0].taxon.scientific_name, "Sturnus vulgaris");
        assert_eq!(counts[1].taxon.display_title(), "Eurasian Magpie");
    }

    #[test]
    fn test_observation_points_skip_unusable_coordinates() {
        let json = r#"{
            "results": [
                { "geojson": { "type": "Point", "coordinates": [2.17, 41.38] } },
                { "geojson": { "type": "Point", "coordinates": [2.17] } },
                { "geojson": { "type": "Point", "coordinates": ["bad", "data"] } },
                { "geojson": null },
                { },
                { "geojson": { "type": "Point", "coordinates": [151.21, -33.87] } }
            ]
        }"#;
        let points = serde_json::from_str::<ObservationsResponse>(json)
            .unwrap()
            .into_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], GeoPoint::new(41.38, 2.17));
        assert_eq!(points[1], GeoPoint::new(-33.87, 151.21));
    }

    #[test]
    fn test_place_coordinates_accept_numbers_and_strings() {
        let json = r#"{
            "results": [
                { "id": 10, "name": "Barcelona", "display_name": "Barcelona, ES",
                  "latitude": "41.3874", "longitude": "2.1686" },
                { "id": 11, "name": "Sydney", "latitude": -33.8688, "longitude": 151.2093 },
                { "id": 12, "name": "Nowhere" }
            ]
        }"#;
        let places = serde_json::from_str::<PlacesResponse>(json)
            .unwrap()
            .into_places();
        assert_eq!(places.len(), 3);
        assert_eq!(
            places[0].location,
            Some(GeoPoint::new(41.3874, 2.1686))
        );
        assert_eq!(
            places[1].location,
            Some(GeoPoint::new(-33.8688, 151.2093))
        );
        assert!(places[2].location.is_none());
    }

    #[test]
    fn test_iconic_group_round_trip() {
        assert_eq!(IconicGroup::from_string("aves"), Some(IconicGroup::Aves));
        assert_eq!(IconicGroup::from_string(" Mammalia "), Some(IconicGroup::Mammalia));
        assert_eq!(IconicGroup::Aves.as_str(), "Aves");
        assert_eq!(IconicGroup::from_string("dragons"), None);
    }
}
