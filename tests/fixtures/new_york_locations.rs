//! New York metro delivery locations for realistic test fixtures.
//!
//! Coordinates are public landmarks, rounded to four decimals.

use fleet_routing::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng).unwrap()
    }
}

// ============================================================================
// Depots
// ============================================================================

pub const DEPOTS: &[Location] = &[
    Location::new("Hunts Point Market", 40.8095, -73.8780),
    Location::new("Red Hook Terminal", 40.6826, -74.0138),
];

// ============================================================================
// Manhattan
// ============================================================================

pub const MANHATTAN: &[Location] = &[
    Location::new("Battery Park", 40.7033, -74.0170),
    Location::new("City Hall", 40.7128, -74.0060),
    Location::new("Washington Square", 40.7308, -73.9973),
    Location::new("Union Square", 40.7359, -73.9911),
    Location::new("Empire State Building", 40.7484, -73.9857),
    Location::new("Times Square", 40.7580, -73.9855),
    Location::new("Columbus Circle", 40.7681, -73.9819),
    Location::new("Metropolitan Museum", 40.7794, -73.9632),
];

// ============================================================================
// Brooklyn / Queens
// ============================================================================

pub const OUTER_BOROUGHS: &[Location] = &[
    Location::new("Barclays Center", 40.6826, -73.9754),
    Location::new("Prospect Park", 40.6602, -73.9690),
    Location::new("Coney Island", 40.5755, -73.9707),
    Location::new("Long Island City", 40.7447, -73.9485),
    Location::new("Flushing Meadows", 40.7400, -73.8407),
    Location::new("JFK Airport", 40.6413, -73.7781),
];

/// Returns all locations as a single list.
pub fn all_locations() -> Vec<Location> {
    let mut all = Vec::with_capacity(16);
    all.extend_from_slice(DEPOTS);
    all.extend_from_slice(MANHATTAN);
    all.extend_from_slice(OUTER_BOROUGHS);
    all
}
