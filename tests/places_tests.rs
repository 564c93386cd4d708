use ravn::error::AppError;
use ravn::models::{Coordinates, Directions, RoutePath};
use ravn::services::PlacesClient;

mod common;

#[tokio::test]
async fn test_nearby_search_live() {
    let api_key = match common::live_api_key() {
        Some(key) => key,
        None => {
            println!("Skipping real API test");
            return;
        }
    };
    let client = PlacesClient::new(api_key);

    // Las Vegas Strip, restaurant density is as high as it gets
    let center = Coordinates::new(36.1147, -115.1728).unwrap();

    let result = client
        .nearby_search(&center, 2000, "restaurant", None, false)
        .await;
    assert!(result.is_ok(), "Places API call should succeed");

    let spots = result.unwrap();
    assert!(!spots.is_empty(), "The Strip should have restaurants");

    for spot in &spots {
        assert!(!spot.place_id.is_empty(), "Every spot carries a place_id");
        assert!(!spot.name.is_empty(), "Every spot carries a name");
        // Results of a 2km-radius search should stay roughly within it
        let distance_km = center.distance_to(&spot.location);
        assert!(
            distance_km < 3.5,
            "Spot too far from center: {} at {}km",
            spot.name,
            distance_km
        );
    }
}

#[tokio::test]
async fn test_nearby_search_keyword_live() {
    let api_key = match common::live_api_key() {
        Some(key) => key,
        None => {
            println!("Skipping real API test");
            return;
        }
    };
    let client = PlacesClient::new(api_key);

    let center = Coordinates::new(36.1147, -115.1728).unwrap();

    let result = client
        .nearby_search(&center, 5000, "restaurant", Some("tacos"), false)
        .await;
    assert!(result.is_ok(), "Keyword search should succeed");
    assert!(
        !result.unwrap().is_empty(),
        "Las Vegas should always have tacos"
    );
}

#[tokio::test]
async fn test_directions_live() {
    let api_key = match common::live_api_key() {
        Some(key) => key,
        None => {
            println!("Skipping real API test");
            return;
        }
    };
    let client = PlacesClient::new(api_key);

    let vegas = Coordinates::new(36.1699, -115.1398).unwrap();
    let henderson = Coordinates::new(36.0395, -114.9817).unwrap();

    let directions = client
        .get_directions(&vegas, &henderson)
        .await
        .expect("Directions API call should succeed");

    assert!(directions.distance_meters > 0.0, "Distance should be positive");
    assert!(directions.duration_seconds > 0.0, "Duration should be positive");
    assert!(!directions.path.is_empty(), "Route path should not be empty");

    // Rough sanity check: Vegas to Henderson is ~10-25 miles by road
    let miles = directions.distance_miles();
    assert!(
        miles > 8.0 && miles < 30.0,
        "Distance should be reasonable: got {} mi",
        miles
    );

    // Decoded path should start near the origin and end near the destination
    let points = directions.path.points();
    let first = points.first().unwrap();
    let last = points.last().unwrap();
    assert!(
        vegas.distance_to(first) < 1.0,
        "Path should start near origin (distance: {}km)",
        vegas.distance_to(first)
    );
    assert!(
        henderson.distance_to(last) < 1.0,
        "Path should end near destination (distance: {}km)",
        henderson.distance_to(last)
    );
}

#[tokio::test]
async fn test_directions_no_route_live() {
    let api_key = match common::live_api_key() {
        Some(key) => key,
        None => {
            println!("Skipping real API test");
            return;
        }
    };
    let client = PlacesClient::new(api_key);

    let vegas = Coordinates::new(36.1699, -115.1398).unwrap();
    let honolulu = Coordinates::new(21.3099, -157.8581).unwrap();

    let result = client.get_directions(&vegas, &honolulu).await;
    assert!(
        matches!(result, Err(AppError::NoRouteFound)),
        "Ocean crossing should have no driving route"
    );
}

#[tokio::test]
async fn test_find_place_live() {
    let api_key = match common::live_api_key() {
        Some(key) => key,
        None => {
            println!("Skipping real API test");
            return;
        }
    };
    let client = PlacesClient::new(api_key);

    let vegas = Coordinates::new(36.1699, -115.1398).unwrap();

    let matched = client
        .find_place("bellagio las vegas", Some(&vegas))
        .await
        .expect("Autocomplete should resolve a well-known landmark");

    assert!(!matched.place_id.is_empty());
    assert!(
        matched.description.to_lowercase().contains("bellagio"),
        "Unexpected match: {}",
        matched.description
    );
    // The Bellagio is a few km from downtown Las Vegas
    assert!(
        vegas.distance_to(&matched.location) < 15.0,
        "Matched place should be nearby"
    );
}

#[test]
fn test_photo_url_formatting() {
    let client = PlacesClient::new("test_key".to_string());

    let url = client.photo_url("CmRaAAAA", 400);
    assert!(url.starts_with("https://maps.googleapis.com/maps/api/place/photo"));
    assert!(url.contains("maxwidth=400"));
    assert!(url.contains("photoreference=CmRaAAAA"));
    assert!(url.contains("key=test_key"));
}

#[test]
fn test_polyline_round_trip() {
    let points = vec![
        Coordinates::new(36.1699, -115.1398).unwrap(),
        Coordinates::new(36.1215, -115.1739).unwrap(),
        Coordinates::new(36.0395, -114.9817).unwrap(),
    ];

    let encoded = ravn::polyline::encode(&points);
    let decoded = ravn::polyline::decode(&encoded).unwrap();
    assert_eq!(decoded, points);
}

#[test]
fn test_directions_conversions() {
    let directions = Directions {
        path: RoutePath::new(vec![
            Coordinates::new(36.1699, -115.1398).unwrap(),
            Coordinates::new(36.0395, -114.9817).unwrap(),
        ]),
        distance_meters: 8045.0,
        duration_seconds: 754.0,
        summary: Some("I-515 S".to_string()),
    };

    assert_eq!(directions.distance_miles(), 5.0);
    assert_eq!(directions.duration_minutes(), 13);
}
