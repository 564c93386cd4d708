use std::sync::Arc;

use crate::constants::{DEFAULT_NEARBY_RADIUS_METERS, RESTAURANT_CATEGORY};
use crate::error::{AppError, Result};
use crate::models::{
    Coordinates, PlaceMatch, RouteDiscovery, RouteFilters, Spot, SpotFilters,
};
use crate::services::places::PlacesClient;
use crate::services::ranking;
use crate::services::route_spots::RouteSpotAggregator;

/// Facade wiring the gateway, aggregator and ranker into the two
/// end-to-end discovery flows.
pub struct SpotFinder {
    client: PlacesClient,
    aggregator: RouteSpotAggregator,
    nearby_radius_m: u32,
}

impl SpotFinder {
    pub fn new(client: PlacesClient) -> Self {
        let aggregator = RouteSpotAggregator::new(Arc::new(client.clone()));
        SpotFinder {
            client,
            aggregator,
            nearby_radius_m: DEFAULT_NEARBY_RADIUS_METERS,
        }
    }

    pub fn with_tuning(
        client: PlacesClient,
        sample_stride: usize,
        max_in_flight: usize,
        nearby_radius_m: u32,
    ) -> Self {
        let aggregator = RouteSpotAggregator::with_tuning(
            Arc::new(client.clone()),
            sample_stride,
            max_in_flight,
        );
        SpotFinder {
            client,
            aggregator,
            nearby_radius_m,
        }
    }

    /// The nearby flow: one fixed-radius fetch around `center`, open
    /// spots floated to the front, then client-side filtering and
    /// ranking against `criteria`.
    pub async fn find_nearby(
        &self,
        center: &Coordinates,
        criteria: &SpotFilters,
    ) -> Result<Vec<Spot>> {
        criteria.validate().map_err(AppError::InvalidRequest)?;

        let mut spots = self
            .client
            .nearby_search(center, self.nearby_radius_m, RESTAURANT_CATEGORY, None, false)
            .await?;
        ranking::sort_open_first(&mut spots);

        let ranked = ranking::filter_and_rank(spots, criteria, Some(center));
        tracing::info!(
            center = %format!("{},{}", center.lat, center.lng),
            kept = ranked.len(),
            "Nearby flow complete: {} spots kept",
            ranked.len()
        );
        Ok(ranked)
    }

    /// The route flow: fetch directions, collect spots along the
    /// decoded path, and rank them.
    ///
    /// Keyword and open-now filtering already happened server-side in
    /// each search, so ranking here orders without excluding.
    pub async fn find_along_route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        filters: &RouteFilters,
    ) -> Result<RouteDiscovery> {
        filters.validate().map_err(AppError::InvalidRequest)?;

        let directions = self.client.get_directions(origin, destination).await?;
        let collected = self
            .aggregator
            .collect_along_route(&directions.path, filters)
            .await?;
        let spots = ranking::filter_and_rank(collected, &SpotFilters::default(), None);

        tracing::info!(
            path_points = directions.path.len(),
            spots = spots.len(),
            "Route flow complete: {} spots along {} path points",
            spots.len(),
            directions.path.len()
        );

        Ok(RouteDiscovery { directions, spots })
    }

    /// Resolve a free-text destination, biased toward `near`.
    pub async fn resolve_destination(
        &self,
        query: &str,
        near: Option<&Coordinates>,
    ) -> Result<PlaceMatch> {
        self.client.find_place(query, near).await
    }

    /// Photo URL helper for presentation layers.
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        self.client.photo_url(photo_reference, max_width)
    }
}
