pub mod coordinates;
pub mod filters;
pub mod route;
pub mod spot;

pub use coordinates::Coordinates;
pub use filters::{matching_food_types, RouteFilters, SpotFilters, FOOD_TYPES};
pub use route::{Directions, RouteDiscovery, RoutePath};
pub use spot::{PlaceMatch, Spot};
