//! Geospatial primitives on a spherical Earth.
//!
//! Every function validates its inputs and is otherwise pure. Angles are
//! degrees at the API boundary and radians internally.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("polygon needs at least 3 vertices, got {vertices}")]
    InvalidPolygon { vertices: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A latitude/longitude pair in degrees.
///
/// Only constructible through [`Coordinate::new`] or deserialization, both of
/// which reject out-of-range and NaN values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Unchecked wire shape of a [`Coordinate`].
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range or NaN values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Skips range checks so tests can exercise the validation guards.
    #[cfg(test)]
    pub(crate) fn unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        // Range checks are false for NaN, so NaN is rejected here too.
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lng..=self.max_lng).contains(&point.longitude)
    }
}

/// Great-circle distance in meters (Haversine).
pub fn distance(a: &Coordinate, b: &Coordinate) -> Result<f64, GeoError> {
    a.validate()?;
    b.validate()?;

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    Ok(EARTH_RADIUS_M * c)
}

/// Initial great-circle bearing from `from` to `to`, in `[0, 360)`.
///
/// Identical points yield `0.0`.
pub fn heading(from: &Coordinate, to: &Coordinate) -> Result<f64, GeoError> {
    from.validate()?;
    to.validate()?;

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    Ok(if bearing >= 360.0 { 0.0 } else { bearing })
}

/// Ray-casting point-in-polygon test. The polygon closes implicitly.
///
/// Longitude is treated as x and latitude as y; edges are straight lines in
/// that plane, which is accurate for geofence-sized polygons.
pub fn is_point_in_polygon(point: &Coordinate, vertices: &[Coordinate]) -> Result<bool, GeoError> {
    if vertices.len() < 3 {
        return Err(GeoError::InvalidPolygon {
            vertices: vertices.len(),
        });
    }
    point.validate()?;
    for vertex in vertices {
        vertex.validate()?;
    }

    let (x, y) = (point.longitude, point.latitude);
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].longitude, vertices[i].latitude);
        let (xj, yj) = (vertices[j].longitude, vertices[j].latitude);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    Ok(inside)
}

/// Smallest lat/lng box containing a circle of `radius_m` around `center`.
///
/// Boxes reaching a pole, or crossing the antimeridian, span the full
/// longitude range.
pub fn bounding_box(center: &Coordinate, radius_m: f64) -> Result<BoundingBox, GeoError> {
    center.validate()?;
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(GeoError::InvalidArgument(format!(
            "radius must be a positive finite number of meters, got {radius_m}"
        )));
    }

    let angular = (radius_m / EARTH_RADIUS_M).to_degrees();
    let min_lat = center.latitude - angular;
    let max_lat = center.latitude + angular;

    if min_lat <= -90.0 || max_lat >= 90.0 {
        return Ok(BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            min_lng: -180.0,
            max_lng: 180.0,
        });
    }

    // Widest longitude span occurs at the latitude tangent to the circle.
    let lat_rad = center.latitude.to_radians();
    let angular_rad = radius_m / EARTH_RADIUS_M;
    let delta_lng = (angular_rad.sin() / lat_rad.cos()).min(1.0).asin().to_degrees();

    let min_lng = center.longitude - delta_lng;
    let max_lng = center.longitude + delta_lng;
    if min_lng < -180.0 || max_lng > 180.0 {
        return Ok(BoundingBox {
            min_lat,
            max_lat,
            min_lng: -180.0,
            max_lng: 180.0,
        });
    }

    Ok(BoundingBox {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    })
}
