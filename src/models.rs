//! Route and stop data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RouteStatus::Completed | RouteStatus::Cancelled)
    }

    /// Whether the route state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: RouteStatus) -> bool {
        use RouteStatus::*;
        matches!(
            (self, next),
            (Planned, InProgress) | (Planned, Cancelled) | (InProgress, Completed) | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteStatus::Planned => "PLANNED",
            RouteStatus::InProgress => "IN_PROGRESS",
            RouteStatus::Completed => "COMPLETED",
            RouteStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopStatus {
    Pending,
    InTransit,
    Delivered,
    Failed,
    Cancelled,
}

impl StopStatus {
    /// Delivered, failed and cancelled stops need no further work.
    pub fn is_resolved(self) -> bool {
        matches!(self, StopStatus::Delivered | StopStatus::Failed | StopStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: StopStatus) -> bool {
        use StopStatus::*;
        matches!(
            (self, next),
            (Pending, InTransit)
                | (Pending, Cancelled)
                | (InTransit, Delivered)
                | (InTransit, Failed)
                | (InTransit, Cancelled)
        )
    }
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StopStatus::Pending => "PENDING",
            StopStatus::InTransit => "IN_TRANSIT",
            StopStatus::Delivered => "DELIVERED",
            StopStatus::Failed => "FAILED",
            StopStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// Opaque payload attached to a stop (signature, photos, notes).
///
/// The routing core stores and returns it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attachment(pub serde_json::Value);

/// One delivery point on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    pub route_id: String,
    pub location: Coordinate,
    pub scheduled_time: DateTime<Utc>,
    pub completed_time: Option<DateTime<Utc>>,
    pub status: StopStatus,
    pub sequence_number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_delivery: Option<Attachment>,
}

/// Caller-supplied data for a stop on a new route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInput {
    /// Identifier to use for the stop; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub location: Coordinate,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub proof_of_delivery: Option<Attachment>,
}

impl StopInput {
    pub fn new(location: Coordinate, scheduled_time: DateTime<Utc>) -> Self {
        Self {
            id: None,
            location,
            scheduled_time,
            proof_of_delivery: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One vehicle's planned set of stops for a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub vehicle_id: String,
    pub driver_id: String,
    pub status: RouteStatus,
    /// Ordered by `sequence_number`.
    pub stops: Vec<Stop>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Quality score as of the last optimization; not invalidated by later edits.
    pub optimization_score: Option<f64>,
    /// Persisted version this copy was read at; 0 if never saved.
    #[serde(default)]
    pub version: u64,
}

impl Route {
    pub fn stop(&self, stop_id: &str) -> Option<&Stop> {
        self.stops.iter().find(|stop| stop.id == stop_id)
    }

    pub fn stop_mut(&mut self, stop_id: &str) -> Option<&mut Stop> {
        self.stops.iter_mut().find(|stop| stop.id == stop_id)
    }

    /// True when no stop is pending or in transit.
    pub fn is_resolved(&self) -> bool {
        self.stops.iter().all(|stop| stop.status.is_resolved())
    }

    /// Checks that sequence numbers are exactly `0..stops.len()` in order.
    pub fn has_contiguous_sequence(&self) -> bool {
        self.stops
            .iter()
            .enumerate()
            .all(|(index, stop)| stop.sequence_number == index)
    }

    pub fn locations(&self) -> Vec<Coordinate> {
        self.stops.iter().map(|stop| stop.location).collect()
    }
}
