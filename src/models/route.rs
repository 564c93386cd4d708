use serde::{Deserialize, Serialize};

use crate::constants::MILES_TO_METERS;
use crate::models::{Coordinates, Spot};

/// Decoded route geometry, ordered from origin to destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    points: Vec<Coordinates>,
}

impl RoutePath {
    pub fn new(points: Vec<Coordinates>) -> Self {
        RoutePath { points }
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every `stride`-th point, starting from the first.
    ///
    /// This thins a dense polyline into the handful of centers the
    /// along-route search fans out from.
    pub fn sample(&self, stride: usize) -> Vec<Coordinates> {
        self.points.iter().copied().step_by(stride.max(1)).collect()
    }
}

/// A directions result: route geometry plus leg totals for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directions {
    pub path: RoutePath,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Directions {
    /// Total route length in miles, rounded to one decimal place.
    pub fn distance_miles(&self) -> f64 {
        let miles = self.distance_meters / MILES_TO_METERS;
        (miles * 10.0).round() / 10.0
    }

    pub fn duration_minutes(&self) -> u64 {
        (self.duration_seconds / 60.0).round() as u64
    }
}

/// Everything the route flow produces: the drive and the food along it.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDiscovery {
    pub directions: Directions,
    pub spots: Vec<Spot>,
}
