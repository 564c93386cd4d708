use crate::constants::*;
use crate::models::Coordinates;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    /// Base URL override for proxies and test servers
    pub api_base: Option<String>,
    /// Fallback position when no location is given on the command line
    pub home: Option<Coordinates>,
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryConfig {
    /// Take every Nth decoded route point as a search center
    pub sample_stride: usize,

    /// Concurrent nearby searches per wave of the route fan-out
    pub max_in_flight: usize,

    /// Fetch radius for the nearby flow, in meters
    pub nearby_radius_m: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Width requested for place photos, in pixels
    pub photo_max_width: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            nearby_radius_m: DEFAULT_NEARBY_RADIUS_METERS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            photo_max_width: DEFAULT_PHOTO_MAX_WIDTH,
        }
    }
}

impl DiscoveryConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            sample_stride: env::var("RAVN_SAMPLE_STRIDE")
                .unwrap_or_else(|_| defaults.sample_stride.to_string())
                .parse()
                .map_err(|_| "Invalid RAVN_SAMPLE_STRIDE")?,

            max_in_flight: env::var("RAVN_MAX_IN_FLIGHT")
                .unwrap_or_else(|_| defaults.max_in_flight.to_string())
                .parse()
                .map_err(|_| "Invalid RAVN_MAX_IN_FLIGHT")?,

            nearby_radius_m: env::var("RAVN_NEARBY_RADIUS_M")
                .unwrap_or_else(|_| defaults.nearby_radius_m.to_string())
                .parse()
                .map_err(|_| "Invalid RAVN_NEARBY_RADIUS_M")?,

            request_timeout_secs: env::var("RAVN_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.request_timeout_secs.to_string())
                .parse()
                .map_err(|_| "Invalid RAVN_REQUEST_TIMEOUT_SECS")?,

            photo_max_width: env::var("RAVN_PHOTO_MAX_WIDTH")
                .unwrap_or_else(|_| defaults.photo_max_width.to_string())
                .parse()
                .map_err(|_| "Invalid RAVN_PHOTO_MAX_WIDTH")?,
        };

        if config.sample_stride == 0 {
            return Err("RAVN_SAMPLE_STRIDE must be at least 1".to_string());
        }
        if !(1..=16).contains(&config.max_in_flight) {
            return Err("RAVN_MAX_IN_FLIGHT must be between 1 and 16".to_string());
        }
        if config.nearby_radius_m == 0 || config.nearby_radius_m > PLACES_MAX_RADIUS_METERS {
            return Err(format!(
                "RAVN_NEARBY_RADIUS_M must be between 1 and {}",
                PLACES_MAX_RADIUS_METERS
            ));
        }
        if !(1..=120).contains(&config.request_timeout_secs) {
            return Err("RAVN_REQUEST_TIMEOUT_SECS must be between 1 and 120 seconds".to_string());
        }

        Ok(config)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let home = match env::var("RAVN_HOME") {
            Ok(value) => Some(
                value
                    .parse()
                    .map_err(|e| format!("Invalid RAVN_HOME: {}", e))?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            api_key: env::var("GOOGLE_API_KEY").map_err(|_| "GOOGLE_API_KEY must be set")?,
            api_base: env::var("GOOGLE_MAPS_API_BASE").ok(),
            home,
            discovery: DiscoveryConfig::from_env()?,
        })
    }
}
