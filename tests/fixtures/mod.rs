//! Test fixtures for fleet-routing.
//!
//! Provides realistic test data including:
//! - Real New York locations
//! - Builders for stops and a fixed clock
#![allow(dead_code)]

pub mod new_york_locations;

use chrono::{DateTime, Duration, TimeZone, Utc};
use fleet_routing::{Clock, Coordinate, Stop, StopInput, StopStatus};

pub use new_york_locations::*;

/// Start of the test shift.
pub fn shift_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

pub fn at_minute(minutes: i64) -> DateTime<Utc> {
    shift_start() + Duration::minutes(minutes)
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

pub fn stop_input(id: &str, lat: f64, lng: f64, minute: i64) -> StopInput {
    StopInput::new(coord(lat, lng), at_minute(minute)).with_id(id)
}

/// Builder for detached stops with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestStop {
    stop: Stop,
}

impl TestStop {
    pub fn new(id: &str) -> Self {
        Self {
            stop: Stop {
                id: id.to_string(),
                route_id: "route-1".to_string(),
                location: coord(0.0, 0.0),
                scheduled_time: shift_start(),
                completed_time: None,
                status: StopStatus::Pending,
                sequence_number: 0,
                proof_of_delivery: None,
            },
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.stop.location = coord(lat, lng);
        self
    }

    pub fn located(mut self, location: &Location) -> Self {
        self.stop.location = location.coordinate();
        self
    }

    pub fn scheduled(mut self, minute: i64) -> Self {
        self.stop.scheduled_time = at_minute(minute);
        self
    }

    pub fn build(self) -> Stop {
        self.stop
    }
}

pub fn ids(stops: &[Stop]) -> Vec<&str> {
    stops.iter().map(|stop| stop.id.as_str()).collect()
}
