///! Biodiversity data module (iNaturalist v1 API)
///!
///! Everything the explorer knows about living things comes from here:
///! typed query builders, wire-to-domain mapping and the async client used
///! to search taxa, list the species of an area and pull observation
///! coordinates for the globe.

// ============ Core Data Structures ============
mod types;
pub use types::{IconicGroup, Place, SpeciesCount, TaxonRef};

// ============ Query Builders ============
mod query;
pub use query::{
    DEFAULT_OBSERVATION_PER_PAGE, ObservationParams, SPECIES_COUNTS_PER_PAGE, SpeciesCountParams,
    observations_url, places_autocomplete_url, species_counts_url, taxa_search_url,
    taxon_by_id_url,
};

// ============ API Client ============
mod client;
pub use client::{BiodiversitySource, InatClient};
