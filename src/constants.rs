//! Stable application-wide constants.
//!
//! Values here are unit-conversion factors, upstream API limits, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! Runtime-tunable knobs live in [`DiscoveryConfig`](crate::config::DiscoveryConfig).

// --- Geo conversion factors ---

/// Mean Earth radius (kilometers) for the haversine computation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Kilometers-to-miles conversion factor.
pub const KM_TO_MILES: f64 = 0.621371;
/// Miles-to-meters factor used when turning a detour distance into a search
/// radius (whole-meter granularity upstream).
pub const MILES_TO_METERS: f64 = 1609.0;

// --- Upstream API limits ---

/// Maximum radius the nearby-search endpoint accepts, in meters. Larger
/// requests are clamped, not rejected.
pub const PLACES_MAX_RADIUS_METERS: u32 = 50_000;

// --- Route sweep defaults (overridden by RAVN_* env vars) ---

/// Default stride between sampled route points: every 15th decoded point
/// becomes a nearby-search center. Overridden by `RAVN_SAMPLE_STRIDE`.
pub const DEFAULT_SAMPLE_STRIDE: usize = 15;
/// Default cap on concurrently in-flight nearby-search calls during a route
/// sweep. Overridden by `RAVN_MAX_IN_FLIGHT` (validated 1..=16).
pub const DEFAULT_MAX_IN_FLIGHT: usize = 6;

// --- Nearby flow defaults ---

/// Fixed fetch radius (meters) for the around-me search. Filtering down to
/// the user's distance cap happens client-side. Overridden by
/// `RAVN_NEARBY_RADIUS_M`.
pub const DEFAULT_NEARBY_RADIUS_METERS: u32 = 2_000;
/// The place category every search asks for.
pub const RESTAURANT_CATEGORY: &str = "restaurant";

// --- Filter defaults (the screens' initial state) ---

/// Price tiers run 0..=4 upstream; the filter UI offers 1..=4.
pub const PRICE_TIER_MIN: u8 = 1;
pub const PRICE_TIER_MAX: u8 = 4;
/// Default distance cap (miles) for the around-me flow.
pub const DEFAULT_MAX_DISTANCE_MILES: f64 = 5.0;
/// Default off-route detour (miles) for the route flow.
pub const DEFAULT_MAX_DETOUR_MILES: f64 = 1.0;

// --- HTTP defaults ---

/// Per-request timeout (seconds); expiry is reported as a network error.
/// Overridden by `RAVN_REQUEST_TIMEOUT_SECS` (validated 1..=120).
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;
/// Default `maxwidth` for constructed photo URLs. Overridden by
/// `RAVN_PHOTO_MAX_WIDTH`.
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 400;
