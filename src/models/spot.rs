use serde::{Deserialize, Serialize};

use crate::models::Coordinates;

/// A food spot as surfaced to users.
///
/// Built from raw Places API records at the gateway boundary. Everything
/// past the identifier, name and location is best-effort data the API may
/// omit for any given place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    pub place_id: String,
    pub name: String,
    pub location: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Price tier 0-4 as reported by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    /// None when the place reports no opening hours at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_refs: Vec<String>,
}

impl Spot {
    pub fn new(place_id: String, name: String, location: Coordinates) -> Self {
        Spot {
            place_id,
            name,
            location,
            rating: None,
            price_level: None,
            open_now: None,
            vicinity: None,
            photo_refs: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_price_level(mut self, price_level: u8) -> Self {
        self.price_level = Some(price_level);
        self
    }

    pub fn with_open_now(mut self, open_now: bool) -> Self {
        self.open_now = Some(open_now);
        self
    }

    /// Google Maps link for this spot's location.
    pub fn maps_url(&self) -> String {
        self.location.maps_url()
    }
}

/// A destination resolved from free-text lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceMatch {
    pub place_id: String,
    pub description: String,
    pub location: Coordinates,
}
