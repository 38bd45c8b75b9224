//! Geographic primitives used by the donor and camp lookups.
//!
//! The store keeps plain longitude/latitude columns; proximity filtering is
//! done here with a great-circle distance rather than in SQL, which keeps the
//! persistence adapters trivial and lets the in-memory adapter share the
//! exact same semantics.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres, as used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default search radius when a caller supplies a centre but no distance.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 10_000.0;

/// A WGS84 coordinate pair.
///
/// Longitude first to match the GeoJSON-style `[lon, lat]` ordering the
/// original data set used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Construct a point from a longitude/latitude pair.
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_m(&self, other: &Self) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * h.sqrt().asin()
    }
}

/// A proximity filter: a centre point and a maximum distance in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub centre: GeoPoint,
    pub max_distance_m: f64,
}

impl Proximity {
    /// Build a proximity filter, falling back to the default radius.
    pub fn new(centre: GeoPoint, max_distance_m: Option<f64>) -> Self {
        Self {
            centre,
            max_distance_m: max_distance_m.unwrap_or(DEFAULT_SEARCH_RADIUS_M),
        }
    }

    /// Whether `point` falls inside the search radius.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.centre.distance_m(point) <= self.max_distance_m
    }
}

/// Retain only items within the filter, ordered nearest first.
///
/// `position` extracts the (optional) coordinates of an item; items without
/// coordinates are dropped, matching how the original geospatial index
/// ignored unlocated records.
pub fn nearest_within<T>(
    items: Vec<T>,
    filter: &Proximity,
    position: impl Fn(&T) -> Option<GeoPoint>,
) -> Vec<T> {
    let mut located: Vec<(f64, T)> = items
        .into_iter()
        .filter_map(|item| {
            let point = position(&item)?;
            let distance = filter.centre.distance_m(&point);
            (distance <= filter.max_distance_m).then_some((distance, item))
        })
        .collect();
    located.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    located.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // Central London and a couple of reference points.
    const TRAFALGAR: GeoPoint = GeoPoint::new(-0.1281, 51.5080);
    const GREENWICH: GeoPoint = GeoPoint::new(0.0005, 51.4780);
    const EDINBURGH: GeoPoint = GeoPoint::new(-3.1883, 55.9533);

    #[test]
    fn distance_to_self_is_zero() {
        assert!(TRAFALGAR.distance_m(&TRAFALGAR) < 1e-6);
    }

    #[rstest]
    // Known distances with a generous tolerance; the haversine model is
    // accurate to well under 0.5% at these scales.
    #[case(TRAFALGAR, GREENWICH, 9_600.0, 500.0)]
    #[case(TRAFALGAR, EDINBURGH, 534_000.0, 5_000.0)]
    fn distances_match_known_values(
        #[case] a: GeoPoint,
        #[case] b: GeoPoint,
        #[case] expected_m: f64,
        #[case] tolerance_m: f64,
    ) {
        let measured = a.distance_m(&b);
        assert!(
            (measured - expected_m).abs() < tolerance_m,
            "distance {measured} not within {tolerance_m} of {expected_m}"
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let there = TRAFALGAR.distance_m(&EDINBURGH);
        let back = EDINBURGH.distance_m(&TRAFALGAR);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn nearest_within_filters_sorts_and_drops_unlocated() {
        let filter = Proximity::new(TRAFALGAR, Some(20_000.0));
        let items = vec![
            ("edinburgh", Some(EDINBURGH)),
            ("greenwich", Some(GREENWICH)),
            ("unlocated", None),
            ("trafalgar", Some(TRAFALGAR)),
        ];

        let found = nearest_within(items, &filter, |item| item.1);
        let names: Vec<&str> = found.iter().map(|item| item.0).collect();
        assert_eq!(names, vec!["trafalgar", "greenwich"]);
    }

    #[test]
    fn proximity_defaults_to_ten_kilometres() {
        let filter = Proximity::new(TRAFALGAR, None);
        assert!((filter.max_distance_m - DEFAULT_SEARCH_RADIUS_M).abs() < f64::EPSILON);
        assert!(filter.contains(&GREENWICH));
        assert!(!filter.contains(&EDINBURGH));
    }
}
