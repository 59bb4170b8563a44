//! Property tests for the geospatial primitives.

use fleet_routing::geo::{self, Coordinate, GeoError};
use proptest::prelude::*;

/// Slack for floating-point comparisons on meter-scale values.
const TOLERANCE_M: f64 = 1e-3;

/// Haversine loses precision near antipodal points.
const TRIANGLE_TOLERANCE_M: f64 = 1.0;

prop_compose! {
    fn coordinate()(latitude in -90.0..=90.0f64, longitude in -180.0..=180.0f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }
}

prop_compose! {
    fn local_coordinate()(latitude in 40.0..41.0f64, longitude in -75.0..-73.0f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }
}

proptest! {
    #[test]
    fn test_distance_is_non_negative_and_symmetric(a in coordinate(), b in coordinate()) {
        let ab = geo::distance(&a, &b).unwrap();
        let ba = geo::distance(&b, &a).unwrap();
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() <= TOLERANCE_M);
    }

    #[test]
    fn test_distance_to_self_is_zero(a in coordinate()) {
        prop_assert_eq!(geo::distance(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_triangle_inequality_holds(a in coordinate(), b in coordinate(), c in coordinate()) {
        let ab = geo::distance(&a, &b).unwrap();
        let bc = geo::distance(&b, &c).unwrap();
        let ac = geo::distance(&a, &c).unwrap();
        prop_assert!(ab + bc + TRIANGLE_TOLERANCE_M >= ac, "{} + {} < {}", ab, bc, ac);
    }

    #[test]
    fn test_distance_never_exceeds_half_circumference(a in coordinate(), b in coordinate()) {
        let half = std::f64::consts::PI * geo::EARTH_RADIUS_M;
        prop_assert!(geo::distance(&a, &b).unwrap() <= half + TOLERANCE_M);
    }

    #[test]
    fn test_heading_in_range(a in coordinate(), b in coordinate()) {
        let bearing = geo::heading(&a, &b).unwrap();
        prop_assert!((0.0..360.0).contains(&bearing), "bearing {} out of range", bearing);
    }

    #[test]
    fn test_bounding_box_contains_center(center in local_coordinate(), radius in 1.0..50_000.0f64) {
        let bbox = geo::bounding_box(&center, radius).unwrap();
        prop_assert!(bbox.contains(&center));
        prop_assert!(bbox.min_lat < bbox.max_lat);
        prop_assert!(bbox.min_lng < bbox.max_lng);
    }

    #[test]
    fn test_out_of_range_latitude_rejected(latitude in 90.0001..1_000.0f64, longitude in -180.0..=180.0f64) {
        let is_invalid = matches!(
            Coordinate::new(latitude, longitude),
            Err(GeoError::InvalidCoordinate { .. })
        );
        prop_assert!(is_invalid);

        let payload = serde_json::json!({ "latitude": latitude, "longitude": longitude });
        prop_assert!(serde_json::from_value::<Coordinate>(payload).is_err());
    }

}

#[test]
fn test_new_york_to_london_is_about_5570_km() {
    let new_york = Coordinate::new(40.7128, -74.0060).unwrap();
    let london = Coordinate::new(51.5074, -0.1278).unwrap();
    let km = geo::distance(&new_york, &london).unwrap() / 1000.0;
    assert!((km - 5570.0).abs() <= 55.7, "expected ~5570km, got {km}");
}

#[test]
fn test_square_polygon_membership() {
    let square: Vec<_> = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]
        .iter()
        .map(|&(lng, lat)| Coordinate::new(lat, lng).unwrap())
        .collect();

    let inside = Coordinate::new(5.0, 5.0).unwrap();
    let outside = Coordinate::new(20.0, 20.0).unwrap();
    assert!(geo::is_point_in_polygon(&inside, &square).unwrap());
    assert!(!geo::is_point_in_polygon(&outside, &square).unwrap());
    assert_eq!(
        geo::is_point_in_polygon(&inside, &square[..2]),
        Err(GeoError::InvalidPolygon { vertices: 2 })
    );
}

#[test]
fn test_invalid_polygon_vertex_cannot_be_built() {
    let payload = r#"[
        {"latitude": 0.0, "longitude": 0.0},
        {"latitude": 95.0, "longitude": 0.0},
        {"latitude": 0.0, "longitude": 5.0}
    ]"#;
    let err = serde_json::from_str::<Vec<Coordinate>>(payload).unwrap_err();
    assert!(err.to_string().contains("invalid coordinate (95, 0)"), "unexpected error: {err}");
}
