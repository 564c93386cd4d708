use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_DETOUR_MILES, DEFAULT_MAX_DISTANCE_MILES, MILES_TO_METERS,
    PLACES_MAX_RADIUS_METERS, PRICE_TIER_MAX, PRICE_TIER_MIN,
};

/// Curated food-type keywords offered by the quick picker.
pub const FOOD_TYPES: [&str; 22] = [
    "burgers",
    "tacos",
    "ramen",
    "pizza",
    "sushi",
    "chinese",
    "indian",
    "thai",
    "korean",
    "bbq",
    "vegan",
    "seafood",
    "mexican",
    "noodles",
    "salad",
    "dessert",
    "cafe",
    "italian",
    "mediterranean",
    "fast food",
    "steak",
    "pho",
];

/// Case-insensitive substring search over the food-type catalog.
pub fn matching_food_types(query: &str) -> Vec<&'static str> {
    let query = query.to_lowercase();
    FOOD_TYPES
        .iter()
        .filter(|food_type| food_type.contains(&query))
        .copied()
        .collect()
}

/// Criteria for the nearby flow, applied client-side after the fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotFilters {
    /// Keep only spots known to be open right now
    #[serde(default)]
    pub open_now: bool,
    /// Highest price tier to keep (1-4); spots without a price always pass
    #[serde(default = "default_max_price")]
    pub max_price: u8,
    /// Furthest distance from the reference point, in miles
    #[serde(default = "default_max_distance")]
    pub max_distance_miles: f64,
}

fn default_max_price() -> u8 {
    PRICE_TIER_MAX
}

fn default_max_distance() -> f64 {
    DEFAULT_MAX_DISTANCE_MILES
}

impl Default for SpotFilters {
    fn default() -> Self {
        SpotFilters {
            open_now: false,
            max_price: default_max_price(),
            max_distance_miles: default_max_distance(),
        }
    }
}

impl SpotFilters {
    pub fn validate(&self) -> Result<(), String> {
        if !(PRICE_TIER_MIN..=PRICE_TIER_MAX).contains(&self.max_price) {
            return Err(format!(
                "max_price must be between {} and {}",
                PRICE_TIER_MIN, PRICE_TIER_MAX
            ));
        }
        if self.max_distance_miles <= 0.0 {
            return Err("max_distance_miles must be positive".to_string());
        }
        Ok(())
    }
}

/// Criteria for the route flow, applied server-side in each nearby search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteFilters {
    /// Keyword narrowing every search along the route, e.g. "tacos"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_type: Option<String>,
    /// Search radius around each sampled route point, in miles
    #[serde(default = "default_max_detour")]
    pub max_detour_miles: f64,
    #[serde(default)]
    pub open_now: bool,
}

fn default_max_detour() -> f64 {
    DEFAULT_MAX_DETOUR_MILES
}

impl Default for RouteFilters {
    fn default() -> Self {
        RouteFilters {
            food_type: None,
            max_detour_miles: default_max_detour(),
            open_now: false,
        }
    }
}

impl RouteFilters {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_detour_miles <= 0.0 {
            return Err("max_detour_miles must be positive".to_string());
        }
        Ok(())
    }

    /// Keyword to send with each search; blank strings count as unset.
    pub fn keyword(&self) -> Option<&str> {
        self.food_type
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }

    /// Detour converted to a search radius the Places API accepts.
    pub fn radius_meters(&self) -> u32 {
        ((self.max_detour_miles * MILES_TO_METERS).round() as u32)
            .clamp(1, PLACES_MAX_RADIUS_METERS)
    }
}
