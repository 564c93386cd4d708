//! Pure filtering and ordering of spot collections.

use std::cmp::Ordering;

use crate::models::{Coordinates, Spot, SpotFilters};

/// Apply criteria and rank what survives.
///
/// Filtering drops spots that are not known-open (when `open_now` is
/// set), priced above `max_price` (unpriced spots always pass), or
/// further than `max_distance_miles` from `reference`. The comparison
/// uses the same rounded distance users see, so display and filtering
/// never disagree.
///
/// Ranking is stable: spots priced exactly at `max_price` first, then
/// rating descending, remaining ties in input order.
pub fn filter_and_rank(
    spots: Vec<Spot>,
    criteria: &SpotFilters,
    reference: Option<&Coordinates>,
) -> Vec<Spot> {
    let mut kept: Vec<Spot> = spots
        .into_iter()
        .filter(|spot| passes_filters(spot, criteria, reference))
        .collect();

    kept.sort_by(|a, b| {
        let a_exact = price_tier(a) == criteria.max_price;
        let b_exact = price_tier(b) == criteria.max_price;
        b_exact.cmp(&a_exact).then_with(|| {
            let a_rating = a.rating.unwrap_or(0.0);
            let b_rating = b.rating.unwrap_or(0.0);
            b_rating.partial_cmp(&a_rating).unwrap_or(Ordering::Equal)
        })
    });

    kept
}

/// Stable presort placing spots known to be open before the rest.
///
/// Applied to fresh fetches ahead of [`filter_and_rank`], so rating ties
/// in the final order break open-first.
pub fn sort_open_first(spots: &mut [Spot]) {
    spots.sort_by_key(|spot| spot.open_now != Some(true));
}

fn passes_filters(spot: &Spot, criteria: &SpotFilters, reference: Option<&Coordinates>) -> bool {
    // Unknown opening hours count as not open
    if criteria.open_now && spot.open_now != Some(true) {
        return false;
    }
    if let Some(price_level) = spot.price_level {
        if price_level > criteria.max_price {
            return false;
        }
    }
    if let Some(reference) = reference {
        if reference.distance_miles(&spot.location) > criteria.max_distance_miles {
            return false;
        }
    }
    true
}

fn price_tier(spot: &Spot) -> u8 {
    spot.price_level.unwrap_or(0)
}
