//! Google Places "search nearby" client with distance ranking.

pub mod client;
pub mod error;
pub mod profile;
pub mod types;

pub use client::{PlacesClient, FIELD_MASK};
pub use error::PlacesError;
pub use profile::{RankPreference, SearchProfile, SearchType};
pub use types::{
    Circle, LocationRestriction, NearbyOutcome, NearbyRequest, NearbySearchResult, Place,
    ProviderRejection, DEFAULT_RADIUS_METERS, MAX_RADIUS_METERS,
};
