use ravn::config::{Config, DiscoveryConfig};
use ravn::models::{Coordinates, Spot};

/// API key for live integration tests, or `None` when they should be skipped.
/// Set `SKIP_REAL_API_TESTS` to force-skip even when a key is configured.
#[allow(dead_code)]
pub fn live_api_key() -> Option<String> {
    if std::env::var("SKIP_REAL_API_TESTS").is_ok() {
        return None;
    }
    std::env::var("GOOGLE_API_KEY").ok()
}

/// Create a test spot
#[allow(dead_code)]
pub fn make_spot(place_id: &str, name: &str, lat: f64, lng: f64) -> Spot {
    Spot::new(
        place_id.to_string(),
        name.to_string(),
        Coordinates::new(lat, lng).unwrap(),
    )
}

/// Get test configuration
#[allow(dead_code)]
pub fn get_test_config() -> Config {
    Config {
        api_key: std::env::var("GOOGLE_API_KEY").unwrap_or_else(|_| "test_key".to_string()),
        api_base: None,
        home: Some(Coordinates::new(36.1699, -115.1398).unwrap()),
        discovery: DiscoveryConfig::default(),
    }
}
