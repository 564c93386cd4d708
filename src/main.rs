use ravn::config::Config;
use ravn::error::AppError;
use ravn::models::{matching_food_types, Coordinates, RouteFilters, Spot, SpotFilters};
use ravn::services::places::GOOGLE_MAPS_BASE_URL;
use ravn::services::{PlacesClient, SpotFinder};
use std::env;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"ravn - food spots near you or along your route

Usage: ravn <COMMAND> [OPTIONS]

Commands:
  near      Spots around a position
  route     Spots along a driving route
  foods     List the food-type keywords

Near options:
  --at=LAT,LNG        Position to search around (default: RAVN_HOME)
  --open-now          Keep only spots that are open right now
  --max-price=N       Highest price tier to keep, 1-4 (default: 4)
  --max-distance=MI   Drop spots further away than this (default: 5)

Route options:
  --to=DEST           Destination, "LAT,LNG" or free text (required)
  --from=LAT,LNG      Origin (default: RAVN_HOME)
  --food=TYPE         Food keyword, see `ravn foods`
  --detour=MI         Search this far off the route (default: 1)
  --open-now          Keep only spots that are open right now

Foods options:
  --match=STR         Only food types containing STR

Common options:
  --limit=N           Print at most N spots
  --json              Print JSON instead of text
  --help              Show this help

Environment:
  GOOGLE_API_KEY      Google Maps Platform key (required)
  RAVN_HOME           Fallback position as "LAT,LNG""#
    );
}

#[tokio::main]
async fn main() {
    // Initialize tracing; logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ravn=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if let Err(e) = run(&args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let command = args[0].as_str();

    // `foods` is a static catalog and needs neither config nor network
    if command == "foods" {
        run_foods(args);
        return Ok(());
    }
    if command != "near" && command != "route" {
        print_help();
        return Err(format!("Unknown command: {}", command).into());
    }

    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;
    let finder = build_finder(&config);

    if command == "near" {
        run_near(&finder, &config, args).await
    } else {
        run_route(&finder, &config, args).await
    }
}

fn build_finder(config: &Config) -> SpotFinder {
    let timeout = Duration::from_secs(config.discovery.request_timeout_secs);
    let base_url = config
        .api_base
        .clone()
        .unwrap_or_else(|| GOOGLE_MAPS_BASE_URL.to_string());
    let client = PlacesClient::with_config(config.api_key.clone(), base_url, timeout);
    SpotFinder::with_tuning(
        client,
        config.discovery.sample_stride,
        config.discovery.max_in_flight,
        config.discovery.nearby_radius_m,
    )
}

async fn run_near(
    finder: &SpotFinder,
    config: &Config,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let center = position(args, "--at=", config)?;

    let mut criteria = SpotFilters::default();
    criteria.open_now = args.iter().any(|a| a == "--open-now");
    if let Some(max_price) = parse_flag(args, "--max-price=")? {
        criteria.max_price = max_price;
    }
    if let Some(max_distance) = parse_flag(args, "--max-distance=")? {
        criteria.max_distance_miles = max_distance;
    }
    let limit: usize = parse_flag(args, "--limit=")?.unwrap_or(usize::MAX);

    let mut spots = finder.find_nearby(&center, &criteria).await?;
    spots.truncate(limit);

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&spots)?);
        return Ok(());
    }

    if spots.is_empty() {
        println!("No spots found near {:.4},{:.4}", center.lat, center.lng);
        return Ok(());
    }

    println!(
        "Found {} spots near {:.4},{:.4}:\n",
        spots.len(),
        center.lat,
        center.lng
    );
    for spot in &spots {
        print_spot(spot, Some(&center), finder, config.discovery.photo_max_width);
    }
    Ok(())
}

async fn run_route(
    finder: &SpotFinder,
    config: &Config,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let destination_arg = flag_value(args, "--to=")
        .ok_or_else(|| AppError::InvalidRequest("--to=DEST is required for route".to_string()))?;
    let origin = position(args, "--from=", config)?;

    // Literal coordinates skip the place lookup
    let destination = match destination_arg.parse::<Coordinates>() {
        Ok(coords) => coords,
        Err(_) => {
            let matched = finder
                .resolve_destination(destination_arg, Some(&origin))
                .await?;
            eprintln!("Destination: {}", matched.description);
            matched.location
        }
    };

    let mut filters = RouteFilters::default();
    filters.open_now = args.iter().any(|a| a == "--open-now");
    if let Some(food) = flag_value(args, "--food=") {
        filters.food_type = Some(food.to_string());
    }
    if let Some(detour) = parse_flag(args, "--detour=")? {
        filters.max_detour_miles = detour;
    }
    let limit: usize = parse_flag(args, "--limit=")?.unwrap_or(usize::MAX);

    let mut discovery = finder.find_along_route(&origin, &destination, &filters).await?;
    discovery.spots.truncate(limit);

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&discovery)?);
        return Ok(());
    }

    let directions = &discovery.directions;
    match directions.summary {
        Some(ref summary) => println!(
            "Route via {}: {:.1} mi, ~{} min",
            summary,
            directions.distance_miles(),
            directions.duration_minutes()
        ),
        None => println!(
            "Route: {:.1} mi, ~{} min",
            directions.distance_miles(),
            directions.duration_minutes()
        ),
    }

    if discovery.spots.is_empty() {
        println!("No spots found along this route.");
        return Ok(());
    }

    println!();
    for spot in &discovery.spots {
        print_spot(spot, None, finder, config.discovery.photo_max_width);
    }
    Ok(())
}

fn run_foods(args: &[String]) {
    let query = flag_value(args, "--match=").unwrap_or("");
    for food_type in matching_food_types(query) {
        println!("{}", food_type);
    }
}

fn flag_value<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter().find_map(|a| a.strip_prefix(prefix))
}

fn parse_flag<T: std::str::FromStr>(
    args: &[String],
    prefix: &str,
) -> Result<Option<T>, AppError> {
    match flag_value(args, prefix) {
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            AppError::InvalidRequest(format!(
                "Invalid value for {}: {}",
                prefix.trim_end_matches('='),
                raw
            ))
        }),
        None => Ok(None),
    }
}

/// Resolve a position from a `--flag=LAT,LNG` argument, falling back to the
/// configured home position.
fn position(args: &[String], prefix: &str, config: &Config) -> Result<Coordinates, AppError> {
    if let Some(raw) = flag_value(args, prefix) {
        return raw.parse().map_err(AppError::InvalidRequest);
    }
    config.home.ok_or_else(|| {
        AppError::PermissionDenied(format!(
            "no position given; pass {}LAT,LNG or set RAVN_HOME",
            prefix
        ))
    })
}

fn print_spot(spot: &Spot, reference: Option<&Coordinates>, finder: &SpotFinder, photo_width: u32) {
    let mut line = spot.name.clone();
    if let Some(rating) = spot.rating {
        line.push_str(&format!("  {:.1}*", rating));
    }
    if let Some(price_level) = spot.price_level {
        line.push_str(&format!("  {}", "$".repeat(price_level as usize)));
    }
    match spot.open_now {
        Some(true) => line.push_str("  [open]"),
        Some(false) => line.push_str("  [closed]"),
        None => {}
    }
    if let Some(reference) = reference {
        line.push_str(&format!("  {:.1} mi", reference.distance_miles(&spot.location)));
    }
    println!("{}", line);

    if let Some(ref vicinity) = spot.vicinity {
        println!("    {}", vicinity);
    }
    println!("    {}", spot.maps_url());
    if let Some(photo_ref) = spot.photo_refs.first() {
        println!("    photo: {}", finder.photo_url(photo_ref, photo_width));
    }
    println!();
}
