//! Delivery efficiency metrics for routes.

use chrono::Duration;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoError};
use crate::models::{Route, RouteStatus, StopStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    pub route_id: String,
    pub status: RouteStatus,
    pub stop_count: usize,
    pub pending: usize,
    pub in_transit: usize,
    pub delivered: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Planned travel distance following the current stop order.
    pub total_distance_m: f64,
    pub average_leg_distance_m: f64,
    /// Share of stops that are delivered, failed or cancelled.
    pub completion_percentage: f64,
    /// Share of delivered stops completed by their scheduled time plus
    /// tolerance. `None` until something is delivered.
    pub on_time_percentage: Option<f64>,
}

impl RouteMetrics {
    pub fn for_route(route: &Route, on_time_tolerance: Duration) -> Result<Self, GeoError> {
        let mut total_distance_m = 0.0;
        for leg in route.stops.windows(2) {
            total_distance_m += geo::distance(&leg[0].location, &leg[1].location)?;
        }
        let legs = route.stops.len().saturating_sub(1);
        let average_leg_distance_m = if legs == 0 {
            0.0
        } else {
            total_distance_m / legs as f64
        };

        let count = |status: StopStatus| route.stops.iter().filter(|stop| stop.status == status).count();
        let (pending, in_transit) = (count(StopStatus::Pending), count(StopStatus::InTransit));
        let (delivered, failed, cancelled) = (
            count(StopStatus::Delivered),
            count(StopStatus::Failed),
            count(StopStatus::Cancelled),
        );

        let stop_count = route.stops.len();
        let completion_percentage = if stop_count == 0 {
            100.0
        } else {
            (delivered + failed + cancelled) as f64 / stop_count as f64 * 100.0
        };

        let on_time = route
            .stops
            .iter()
            .filter(|stop| stop.status == StopStatus::Delivered)
            .filter(|stop| {
                stop.completed_time
                    .is_some_and(|done| done <= stop.scheduled_time + on_time_tolerance)
            })
            .count();
        let on_time_percentage = (delivered > 0).then(|| on_time as f64 / delivered as f64 * 100.0);

        Ok(Self {
            route_id: route.id.clone(),
            status: route.status,
            stop_count,
            pending,
            in_transit,
            delivered,
            failed,
            cancelled,
            total_distance_m,
            average_leg_distance_m,
            completion_percentage,
            on_time_percentage,
        })
    }
}

/// Fleet-wide rollup of per-route metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub route_count: usize,
    pub stop_count: usize,
    pub delivered: usize,
    pub total_distance_m: f64,
    pub average_completion_percentage: f64,
    /// Weighted by delivered stops across all routes.
    pub on_time_percentage: Option<f64>,
}

impl FleetSummary {
    pub fn from_metrics(metrics: &[RouteMetrics]) -> Self {
        let route_count = metrics.len();
        let stop_count = metrics.iter().map(|m| m.stop_count).sum();
        let delivered: usize = metrics.iter().map(|m| m.delivered).sum();
        let total_distance_m = metrics.iter().map(|m| m.total_distance_m).sum();

        let average_completion_percentage = if route_count == 0 {
            0.0
        } else {
            metrics.iter().map(|m| m.completion_percentage).sum::<f64>() / route_count as f64
        };

        let on_time_stops: f64 = metrics
            .iter()
            .filter_map(|m| m.on_time_percentage.map(|pct| pct / 100.0 * m.delivered as f64))
            .sum();
        let on_time_percentage = (delivered > 0).then(|| on_time_stops / delivered as f64 * 100.0);

        Self {
            route_count,
            stop_count,
            delivered,
            total_distance_m,
            average_completion_percentage,
            on_time_percentage,
        }
    }
}

/// Compute metrics for many routes in parallel, preserving input order.
pub fn route_metrics(routes: &[Route], on_time_tolerance: Duration) -> Result<Vec<RouteMetrics>, GeoError> {
    routes
        .par_iter()
        .map(|route| RouteMetrics::for_route(route, on_time_tolerance))
        .collect()
}
