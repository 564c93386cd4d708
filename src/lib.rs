// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod polyline;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Coordinates, Directions, RouteDiscovery, RoutePath, Spot};
pub use services::{PlacesClient, SpotFinder};
