pub mod finder;
pub mod places;
pub mod ranking;
pub mod route_spots;

pub use finder::SpotFinder;
pub use places::{NearbySearch, PlacesClient};
pub use ranking::{filter_and_rank, sort_open_first};
pub use route_spots::RouteSpotAggregator;
