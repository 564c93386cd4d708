use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_RADIUS_KM, KM_TO_MILES};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Distance to `other` in miles, rounded to one decimal place.
    ///
    /// Distance filters compare against this rounded value, so a spot
    /// never displays as "5.0 mi" yet fails a 5-mile cutoff.
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        let miles = self.distance_to(other) * KM_TO_MILES;
        (miles * 10.0).round() / 10.0
    }

    /// Link to this point on Google Maps.
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.lat, self.lng
        )
    }
}

impl FromStr for Coordinates {
    type Err = String;

    /// Parse "lat,lng" as accepted on the command line and in env vars.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected \"lat,lng\", got \"{}\"", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude: {}", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude: {}", lng.trim()))?;
        Coordinates::new(lat, lng)
    }
}
