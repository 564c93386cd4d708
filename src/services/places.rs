use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECONDS, PLACES_MAX_RADIUS_METERS};
use crate::error::{AppError, Result};
use crate::models::{Coordinates, Directions, PlaceMatch, RoutePath, Spot};
use crate::polyline;

pub const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com";

/// The one search operation the along-route aggregator needs.
///
/// Implemented by [`PlacesClient`] and by stub providers in tests.
#[async_trait]
pub trait NearbySearch: Send + Sync {
    async fn nearby_search(
        &self,
        center: &Coordinates,
        radius_meters: u32,
        category: &str,
        keyword: Option<&str>,
        open_now_only: bool,
    ) -> Result<Vec<Spot>>;
}

/// Typed client for the Google Places and Directions web APIs.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl PlacesClient {
    pub fn new(api_key: String) -> Self {
        PlacesClient {
            client: Client::new(),
            api_key,
            base_url: GOOGLE_MAPS_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }

    pub fn with_config(api_key: String, base_url: String, timeout: Duration) -> Self {
        PlacesClient {
            client: Client::new(),
            api_key,
            base_url,
            timeout,
        }
    }

    /// Search for places of `category` around a point.
    ///
    /// `keyword` and `open_now_only` are applied server-side. A
    /// `ZERO_RESULTS` payload is an empty vec, not an error.
    pub async fn nearby_search(
        &self,
        center: &Coordinates,
        radius_meters: u32,
        category: &str,
        keyword: Option<&str>,
        open_now_only: bool,
    ) -> Result<Vec<Spot>> {
        // The Places API rejects radii above 50 km
        let radius = radius_meters.clamp(1, PLACES_MAX_RADIUS_METERS);
        let url = format!("{}/maps/api/place/nearbysearch/json", self.base_url);

        tracing::debug!(
            lat = center.lat,
            lng = center.lng,
            radius_m = radius,
            category,
            keyword = keyword.unwrap_or(""),
            "Nearby search at {},{} within {} m",
            center.lat,
            center.lng,
            radius
        );

        let mut request = self.client.get(&url).timeout(self.timeout).query(&[
            ("location", format!("{},{}", center.lat, center.lng)),
            ("radius", radius.to_string()),
            ("type", category.to_string()),
            ("key", self.api_key.clone()),
        ]);
        if let Some(keyword) = keyword {
            request = request.query(&[("keyword", keyword)]);
        }
        if open_now_only {
            request = request.query(&[("opennow", "true")]);
        }

        let payload: NearbySearchResponse = self.execute(request, "nearby search").await?;
        check_payload_status(&payload.status, payload.error_message.as_deref())?;

        let spots: Vec<Spot> = payload
            .results
            .into_iter()
            .filter_map(spot_from_record)
            .collect();

        tracing::debug!(
            spots = spots.len(),
            "Nearby search returned {} spots",
            spots.len()
        );
        Ok(spots)
    }

    /// Get driving directions between two points.
    ///
    /// Decodes the overview polyline, so malformed geometry surfaces
    /// here rather than downstream.
    pub async fn get_directions(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<Directions> {
        let url = format!("{}/maps/api/directions/json", self.base_url);

        tracing::debug!(
            origin = %format!("{},{}", origin.lat, origin.lng),
            destination = %format!("{},{}", destination.lat, destination.lng),
            "Directions request"
        );

        let request = self.client.get(&url).timeout(self.timeout).query(&[
            ("origin", format!("{},{}", origin.lat, origin.lng)),
            (
                "destination",
                format!("{},{}", destination.lat, destination.lng),
            ),
            ("key", self.api_key.clone()),
        ]);

        let payload: DirectionsApiResponse = self.execute(request, "directions").await?;

        if payload.status == "ZERO_RESULTS" || payload.status == "NOT_FOUND" {
            return Err(AppError::NoRouteFound);
        }
        check_payload_status(&payload.status, payload.error_message.as_deref())?;

        let route = payload
            .routes
            .into_iter()
            .next()
            .ok_or(AppError::NoRouteFound)?;
        let directions = directions_from_route(route)?;

        tracing::debug!(
            path_points = directions.path.len(),
            distance_mi = %format!("{:.1}", directions.distance_miles()),
            "Directions response: {} path points, {} mi",
            directions.path.len(),
            directions.distance_miles()
        );
        Ok(directions)
    }

    /// Resolve free text to a single place via autocomplete plus details.
    ///
    /// Both legs share one session token so the Places API bills the
    /// pair as a single lookup. `near` biases predictions toward a
    /// location without restricting them.
    pub async fn find_place(&self, input: &str, near: Option<&Coordinates>) -> Result<PlaceMatch> {
        if input.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Destination text is empty".to_string(),
            ));
        }

        let session_token = Uuid::new_v4().to_string();

        let url = format!("{}/maps/api/place/autocomplete/json", self.base_url);
        let mut request = self.client.get(&url).timeout(self.timeout).query(&[
            ("input", input.to_string()),
            ("key", self.api_key.clone()),
            ("sessiontoken", session_token.clone()),
        ]);
        if let Some(near) = near {
            request = request.query(&[
                ("location", format!("{},{}", near.lat, near.lng)),
                ("radius", PLACES_MAX_RADIUS_METERS.to_string()),
            ]);
        }

        let payload: AutocompleteResponse = self.execute(request, "place autocomplete").await?;
        check_payload_status(&payload.status, payload.error_message.as_deref())?;

        let prediction = payload
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("No place matching \"{}\"", input)))?;

        tracing::debug!(
            place_id = %prediction.place_id,
            "Resolved \"{}\" to {}",
            input,
            prediction.description
        );

        let url = format!("{}/maps/api/place/details/json", self.base_url);
        let request = self.client.get(&url).timeout(self.timeout).query(&[
            ("place_id", prediction.place_id.clone()),
            ("fields", "geometry".to_string()),
            ("key", self.api_key.clone()),
            ("sessiontoken", session_token),
        ]);

        let payload: DetailsResponse = self.execute(request, "place details").await?;
        check_payload_status(&payload.status, payload.error_message.as_deref())?;

        let details = payload.result.ok_or_else(|| {
            AppError::NotFound(format!("No details for \"{}\"", prediction.description))
        })?;
        let location = Coordinates::new(details.geometry.location.lat, details.geometry.location.lng)
            .map_err(AppError::Api)?;

        Ok(PlaceMatch {
            place_id: prediction.place_id,
            description: prediction.description,
            location,
        })
    }

    /// URL serving a place photo scaled to `max_width` pixels.
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        format!(
            "{}/maps/api/place/photo?maxwidth={}&photoreference={}&key={}",
            self.base_url,
            max_width,
            urlencoding::encode(photo_reference),
            self.api_key
        )
    }

    /// Send a request and decode its JSON body, mapping transport and
    /// HTTP failures to their error categories.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Network(format!("{} timed out: {}", operation, e))
            } else {
                AppError::Network(format!("{} request failed: {}", operation, e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                operation,
                "Places API HTTP error {}: {}",
                status,
                error_text
            );
            return Err(AppError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Api(format!("Failed to parse {} response: {}", operation, e)))
    }
}

#[async_trait]
impl NearbySearch for PlacesClient {
    async fn nearby_search(
        &self,
        center: &Coordinates,
        radius_meters: u32,
        category: &str,
        keyword: Option<&str>,
        open_now_only: bool,
    ) -> Result<Vec<Spot>> {
        PlacesClient::nearby_search(self, center, radius_meters, category, keyword, open_now_only)
            .await
    }
}

/// An endpoint-level status other than OK / ZERO_RESULTS is an API error.
fn check_payload_status(status: &str, error_message: Option<&str>) -> Result<()> {
    if status == "OK" || status == "ZERO_RESULTS" {
        return Ok(());
    }
    let detail = error_message.unwrap_or("no detail");
    tracing::warn!(status, "Places API error status {}: {}", status, detail);
    Err(AppError::Api(format!("{}: {}", status, detail)))
}

/// Convert one raw result record into a domain spot.
///
/// A record with an invalid location is dropped rather than failing the
/// whole page.
fn spot_from_record(record: PlaceRecord) -> Option<Spot> {
    let location = match Coordinates::new(record.geometry.location.lat, record.geometry.location.lng)
    {
        Ok(location) => location,
        Err(reason) => {
            tracing::warn!(
                place_id = %record.place_id,
                "Dropping place with bad location: {}",
                reason
            );
            return None;
        }
    };

    Some(Spot {
        place_id: record.place_id,
        name: record.name,
        location,
        rating: record.rating,
        price_level: record.price_level,
        open_now: record.opening_hours.and_then(|hours| hours.open_now),
        vicinity: record.vicinity,
        photo_refs: record
            .photos
            .into_iter()
            .map(|photo| photo.photo_reference)
            .collect(),
    })
}

fn directions_from_route(route: RouteRecord) -> Result<Directions> {
    let points = polyline::decode(&route.overview_polyline.points)?;

    let distance_meters = route
        .legs
        .iter()
        .filter_map(|leg| leg.distance.as_ref())
        .map(|distance| distance.value)
        .sum();
    let duration_seconds = route
        .legs
        .iter()
        .filter_map(|leg| leg.duration.as_ref())
        .map(|duration| duration.value)
        .sum();

    Ok(Directions {
        path: RoutePath::new(points),
        distance_meters,
        duration_seconds,
        summary: route.summary.filter(|summary| !summary.is_empty()),
    })
}

// Places/Directions API payload types

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceRecord>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceRecord {
    place_id: String,
    name: String,
    geometry: GeometryRecord,
    rating: Option<f64>,
    price_level: Option<u8>,
    opening_hours: Option<OpeningHoursRecord>,
    vicinity: Option<String>,
    #[serde(default)]
    photos: Vec<PhotoRecord>,
}

#[derive(Debug, Deserialize)]
struct GeometryRecord {
    location: LatLngRecord,
}

#[derive(Debug, Deserialize)]
struct LatLngRecord {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct OpeningHoursRecord {
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct PhotoRecord {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    status: String,
    #[serde(default)]
    routes: Vec<RouteRecord>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteRecord {
    overview_polyline: PolylineRecord,
    #[serde(default)]
    legs: Vec<LegRecord>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PolylineRecord {
    points: String,
}

#[derive(Debug, Deserialize)]
struct LegRecord {
    distance: Option<TextValueRecord>,
    duration: Option<TextValueRecord>,
}

#[derive(Debug, Deserialize)]
struct TextValueRecord {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<PredictionRecord>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictionRecord {
    place_id: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsRecord>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsRecord {
    geometry: GeometryRecord,
}
