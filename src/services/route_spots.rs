use std::collections::HashSet;
use std::sync::Arc;

use crate::constants::{DEFAULT_MAX_IN_FLIGHT, DEFAULT_SAMPLE_STRIDE, RESTAURANT_CATEGORY};
use crate::error::{AppError, Result};
use crate::models::{RouteFilters, RoutePath, Spot};
use crate::services::places::NearbySearch;

/// Collects food spots along a route by fanning nearby searches out from
/// sampled route points and merging the results.
pub struct RouteSpotAggregator {
    provider: Arc<dyn NearbySearch>,
    sample_stride: usize,
    max_in_flight: usize,
}

impl RouteSpotAggregator {
    pub fn new(provider: Arc<dyn NearbySearch>) -> Self {
        RouteSpotAggregator {
            provider,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    pub fn with_tuning(
        provider: Arc<dyn NearbySearch>,
        sample_stride: usize,
        max_in_flight: usize,
    ) -> Self {
        RouteSpotAggregator {
            provider,
            sample_stride: sample_stride.max(1),
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Search around every sampled route point and merge the results.
    ///
    /// Failed samples are logged and skipped so one dead zone cannot sink
    /// the whole route; only when every sample fails does the last error
    /// propagate. Output order follows sample order, deduplicated by
    /// place id (first occurrence wins).
    pub async fn collect_along_route(
        &self,
        path: &RoutePath,
        filters: &RouteFilters,
    ) -> Result<Vec<Spot>> {
        let samples = path.sample(self.sample_stride);
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let radius_meters = filters.radius_meters();
        let keyword = filters.keyword();

        tracing::info!(
            samples = samples.len(),
            path_points = path.len(),
            radius_m = radius_meters,
            "Collecting spots along route: {} searches for {} path points",
            samples.len(),
            path.len()
        );

        let mut merged: Vec<Spot> = Vec::new();
        let mut successful_samples = 0;
        let mut failed_samples = 0;
        let mut last_error = None;

        // Issue searches in waves so at most max_in_flight are outstanding
        for (wave_idx, wave) in samples.chunks(self.max_in_flight).enumerate() {
            let wave_futures: Vec<_> = wave
                .iter()
                .enumerate()
                .map(|(idx, center)| {
                    let sample_idx = wave_idx * self.max_in_flight + idx;
                    let center = *center;
                    async move {
                        let result = self
                            .provider
                            .nearby_search(
                                &center,
                                radius_meters,
                                RESTAURANT_CATEGORY,
                                keyword,
                                filters.open_now,
                            )
                            .await;
                        (sample_idx, result)
                    }
                })
                .collect();

            // join_all preserves input order, so the merge is deterministic
            for (sample_idx, result) in futures::future::join_all(wave_futures).await {
                match result {
                    Ok(mut spots) => {
                        successful_samples += 1;
                        tracing::debug!(
                            "Sample {} returned {} spots",
                            sample_idx + 1,
                            spots.len()
                        );
                        merged.append(&mut spots);
                    }
                    Err(e) => {
                        failed_samples += 1;
                        tracing::warn!("Sample {} failed: {}", sample_idx + 1, e);
                        last_error = Some(e);
                    }
                }
            }
        }

        if successful_samples == 0 {
            return Err(last_error
                .unwrap_or_else(|| AppError::Api("All route samples failed".to_string())));
        }

        let unique = dedupe_by_place_id(merged);

        tracing::info!(
            "Route collection complete: {}/{} samples successful, {} unique spots",
            successful_samples,
            successful_samples + failed_samples,
            unique.len()
        );

        Ok(unique)
    }
}

/// Keep the first occurrence of each place id, preserving order.
fn dedupe_by_place_id(spots: Vec<Spot>) -> Vec<Spot> {
    let mut seen_ids = HashSet::new();
    spots
        .into_iter()
        .filter(|spot| seen_ids.insert(spot.place_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::models::Coordinates;

    fn straight_path(len: usize) -> RoutePath {
        let points = (0..len)
            .map(|i| Coordinates::new(i as f64 * 0.001, 0.0).unwrap())
            .collect();
        RoutePath::new(points)
    }

    fn spot(id: &str) -> Spot {
        Spot::new(
            id.to_string(),
            format!("Spot {}", id),
            Coordinates::new(36.1, -115.2).unwrap(),
        )
    }

    /// Provider scripted per search center (keyed by microdegree latitude).
    #[derive(Default)]
    struct ScriptedSearch {
        spots: HashMap<i64, Vec<Spot>>,
        failing: HashSet<i64>,
        calls: Mutex<Vec<(Coordinates, u32, Option<String>, bool)>>,
    }

    impl ScriptedSearch {
        fn lat_key(lat: f64) -> i64 {
            (lat * 1e6).round() as i64
        }

        fn with_spots(mut self, lat: f64, spots: Vec<Spot>) -> Self {
            self.spots.insert(Self::lat_key(lat), spots);
            self
        }

        fn failing_at(mut self, lat: f64) -> Self {
            self.failing.insert(Self::lat_key(lat));
            self
        }
    }

    #[async_trait]
    impl NearbySearch for ScriptedSearch {
        async fn nearby_search(
            &self,
            center: &Coordinates,
            radius_meters: u32,
            _category: &str,
            keyword: Option<&str>,
            open_now_only: bool,
        ) -> Result<Vec<Spot>> {
            self.calls.lock().unwrap().push((
                *center,
                radius_meters,
                keyword.map(str::to_string),
                open_now_only,
            ));

            let key = Self::lat_key(center.lat);
            if self.failing.contains(&key) {
                return Err(AppError::Network("connection reset".to_string()));
            }
            Ok(self.spots.get(&key).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_one_search_per_sample() {
        let provider = Arc::new(ScriptedSearch::default());
        let aggregator = RouteSpotAggregator::new(Arc::clone(&provider) as Arc<dyn NearbySearch>);

        let path = straight_path(90);
        aggregator
            .collect_along_route(&path, &RouteFilters::default())
            .await
            .unwrap();

        let calls = provider.calls.lock().unwrap();
        // Samples at indices 0, 15, 30, 45, 60, 75
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0].0, path.points()[0]);
        assert_eq!(calls[5].0, path.points()[75]);
    }

    #[tokio::test]
    async fn test_filters_reach_the_provider() {
        let provider = Arc::new(ScriptedSearch::default());
        let aggregator = RouteSpotAggregator::new(Arc::clone(&provider) as Arc<dyn NearbySearch>);

        let filters = RouteFilters {
            food_type: Some("tacos".to_string()),
            max_detour_miles: 0.5,
            open_now: true,
        };
        aggregator
            .collect_along_route(&straight_path(3), &filters)
            .await
            .unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (_, radius, keyword, open_now) = &calls[0];
        assert_eq!(*radius, 805);
        assert_eq!(keyword.as_deref(), Some("tacos"));
        assert!(open_now);
    }

    #[tokio::test]
    async fn test_dedupes_across_samples_keeping_first() {
        // Two samples: indices 0 and 15 of a 30-point path
        let provider = Arc::new(
            ScriptedSearch::default()
                .with_spots(0.0, vec![spot("shared"), spot("only-first")])
                .with_spots(0.015, vec![spot("shared"), spot("only-second")]),
        );
        let aggregator = RouteSpotAggregator::new(provider as Arc<dyn NearbySearch>);

        let spots = aggregator
            .collect_along_route(&straight_path(30), &RouteFilters::default())
            .await
            .unwrap();

        let ids: Vec<&str> = spots.iter().map(|s| s.place_id.as_str()).collect();
        assert_eq!(ids, vec!["shared", "only-first", "only-second"]);
    }

    #[tokio::test]
    async fn test_failed_sample_is_skipped() {
        // Three samples; the middle one fails
        let provider = Arc::new(
            ScriptedSearch::default()
                .with_spots(0.0, vec![spot("a")])
                .failing_at(0.015)
                .with_spots(0.030, vec![spot("b")]),
        );
        let aggregator = RouteSpotAggregator::new(provider as Arc<dyn NearbySearch>);

        let spots = aggregator
            .collect_along_route(&straight_path(45), &RouteFilters::default())
            .await
            .unwrap();

        let ids: Vec<&str> = spots.iter().map(|s| s.place_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_all_samples_failed_propagates_error() {
        let provider = Arc::new(
            ScriptedSearch::default()
                .failing_at(0.0)
                .failing_at(0.015)
                .failing_at(0.030),
        );
        let aggregator = RouteSpotAggregator::new(provider as Arc<dyn NearbySearch>);

        let err = aggregator
            .collect_along_route(&straight_path(45), &RouteFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }

    #[tokio::test]
    async fn test_empty_path_makes_no_calls() {
        let provider = Arc::new(ScriptedSearch::default());
        let aggregator = RouteSpotAggregator::new(Arc::clone(&provider) as Arc<dyn NearbySearch>);

        let spots = aggregator
            .collect_along_route(&RoutePath::new(vec![]), &RouteFilters::default())
            .await
            .unwrap();

        assert!(spots.is_empty());
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    /// Provider that tracks how many searches are in flight at once.
    #[derive(Default)]
    struct ConcurrencyProbe {
        in_flight: AtomicUsize,
        high_water: AtomicUsize,
    }

    #[async_trait]
    impl NearbySearch for ConcurrencyProbe {
        async fn nearby_search(
            &self,
            _center: &Coordinates,
            _radius_meters: u32,
            _category: &str,
            _keyword: Option<&str>,
            _open_now_only: bool,
        ) -> Result<Vec<Spot>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_waves_bound_in_flight_searches() {
        let provider = Arc::new(ConcurrencyProbe::default());
        let aggregator = RouteSpotAggregator::with_tuning(
            Arc::clone(&provider) as Arc<dyn NearbySearch>,
            1, // every point is a sample
            2,
        );

        aggregator
            .collect_along_route(&straight_path(7), &RouteFilters::default())
            .await
            .unwrap();

        assert!(provider.high_water.load(Ordering::SeqCst) <= 2);
    }
}
