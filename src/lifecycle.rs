//! Route and stop state transitions on top of a persistence collaborator.
//!
//! Every operation loads the current route, mutates it in memory and hands the
//! whole route back to the repository in a single versioned save. A save that
//! races another writer fails with [`RouteError::ConcurrentModification`]
//! instead of overwriting it; retrying is left to the caller.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{RepositoryError, RouteError};
use crate::metrics::{self, RouteMetrics};
use crate::models::{Route, RouteStatus, Stop, StopInput, StopStatus};
use crate::sequencer::{self, SequenceOptions};
use crate::traits::{Clock, RouteRepository, SystemClock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub sequence: SequenceOptions,
    /// Grace period after a stop's scheduled time that still counts as on time.
    pub on_time_tolerance_secs: i64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            sequence: SequenceOptions::default(),
            on_time_tolerance_secs: 0,
        }
    }
}

pub struct RouteLifecycle<R, C = SystemClock> {
    repository: R,
    clock: C,
    config: LifecycleConfig,
}

impl<R: RouteRepository> RouteLifecycle<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R: RouteRepository, C: Clock> RouteLifecycle<R, C> {
    pub fn with_clock(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            config: LifecycleConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Create a planned route with stops in the given order.
    pub fn create_route(
        &self,
        vehicle_id: &str,
        driver_id: &str,
        stops: Vec<StopInput>,
    ) -> Result<Route, RouteError> {
        if vehicle_id.trim().is_empty() {
            return Err(RouteError::Validation("vehicle id is required".to_string()));
        }
        if driver_id.trim().is_empty() {
            return Err(RouteError::Validation("driver id is required".to_string()));
        }
        if stops.is_empty() {
            return Err(RouteError::Validation("route needs at least one stop".to_string()));
        }

        let route_id = Uuid::new_v4().to_string();
        let mut seen = HashSet::new();
        let mut route_stops = Vec::with_capacity(stops.len());
        for (index, input) in stops.into_iter().enumerate() {
            if !input.location.is_valid() {
                return Err(RouteError::Validation(format!(
                    "stop {index} has invalid location ({}, {})",
                    input.location.latitude(), input.location.longitude()
                )));
            }
            let id = input.id.unwrap_or_else(|| Uuid::new_v4().to_string());
            if id.trim().is_empty() {
                return Err(RouteError::Validation(format!("stop {index} has an empty id")));
            }
            if !seen.insert(id.clone()) {
                return Err(RouteError::Validation(format!("duplicate stop id {id}")));
            }

            route_stops.push(Stop {
                id,
                route_id: route_id.clone(),
                location: input.location,
                scheduled_time: input.scheduled_time,
                completed_time: None,
                status: StopStatus::Pending,
                sequence_number: index,
                proof_of_delivery: input.proof_of_delivery,
            });
        }

        let mut route = Route {
            id: route_id,
            vehicle_id: vehicle_id.to_string(),
            driver_id: driver_id.to_string(),
            status: RouteStatus::Planned,
            stops: route_stops,
            start_time: None,
            end_time: None,
            optimization_score: None,
            version: 0,
        };
        self.persist(&mut route)?;

        info!(
            route_id = %route.id,
            vehicle_id,
            driver_id,
            stops = route.stops.len(),
            "route created"
        );
        Ok(route)
    }

    pub fn get_route(&self, route_id: &str) -> Result<Route, RouteError> {
        Ok(self.repository.load_route(route_id)?)
    }

    pub fn get_active_routes(&self) -> Result<Vec<Route>, RouteError> {
        Ok(self.repository.load_active_routes()?)
    }

    /// Move a route through its state machine.
    ///
    /// Completing a route delivers every unresolved stop; cancelling it
    /// cancels them.
    pub fn update_route_status(&self, route_id: &str, new_status: RouteStatus) -> Result<Route, RouteError> {
        let mut route = self.repository.load_route(route_id)?;
        if !route.status.can_transition_to(new_status) {
            return Err(RouteError::InvalidRouteTransition {
                from: route.status,
                to: new_status,
            });
        }

        let previous = route.status;
        apply_route_status(&mut route, new_status, self.clock.now());
        self.persist(&mut route)?;

        info!(route_id, from = %previous, to = %new_status, "route status updated");
        Ok(route)
    }

    /// Move one stop through its state machine.
    ///
    /// When no stop is left pending or in transit an in-progress route
    /// completes. A planned route stays planned.
    pub fn update_stop_status(
        &self,
        route_id: &str,
        stop_id: &str,
        new_status: StopStatus,
    ) -> Result<Stop, RouteError> {
        let mut route = self.repository.load_route(route_id)?;
        let now = self.clock.now();

        let stop = route.stop_mut(stop_id).ok_or_else(|| RouteError::StopNotFound {
            route_id: route_id.to_string(),
            stop_id: stop_id.to_string(),
        })?;
        if !stop.status.can_transition_to(new_status) {
            return Err(RouteError::InvalidStopTransition {
                stop_id: stop_id.to_string(),
                from: stop.status,
                to: new_status,
            });
        }
        let previous = stop.status;
        stop.status = new_status;
        if new_status == StopStatus::Delivered {
            stop.completed_time = Some(now);
        }
        let updated = stop.clone();

        let auto_completed =
            route.status.can_transition_to(RouteStatus::Completed) && route.is_resolved();
        if auto_completed {
            apply_route_status(&mut route, RouteStatus::Completed, now);
        }
        self.persist(&mut route)?;

        info!(route_id, stop_id, from = %previous, to = %new_status, "stop status updated");
        if auto_completed {
            info!(route_id, "all stops resolved, route completed");
        }
        Ok(updated)
    }

    /// Resequence a route's stops and record the resulting score.
    ///
    /// The score reflects the stops as of this call; later stop changes do
    /// not invalidate it.
    pub fn optimize_route(&self, route_id: &str) -> Result<Route, RouteError> {
        let mut route = self.repository.load_route(route_id)?;

        let stops = std::mem::take(&mut route.stops);
        route.stops = sequencer::sequence_with(stops, &self.config.sequence)?;
        let breakdown = sequencer::evaluate(&route.stops, &self.config.sequence)?;
        debug!(
            route_id,
            total_distance_m = breakdown.total_distance_m,
            distance_penalty = breakdown.distance_penalty,
            time_window_violations = breakdown.time_window_violations,
            "route scored"
        );
        route.optimization_score = Some(breakdown.score);
        self.persist(&mut route)?;

        info!(
            route_id,
            stops = route.stops.len(),
            score = breakdown.score,
            "route optimized"
        );
        Ok(route)
    }

    /// Delivery metrics for every route currently in progress.
    pub fn active_route_metrics(&self) -> Result<Vec<RouteMetrics>, RouteError> {
        let routes = self.repository.load_active_routes()?;
        let tolerance = Duration::seconds(self.config.on_time_tolerance_secs);
        Ok(metrics::route_metrics(&routes, tolerance)?)
    }

    fn persist(&self, route: &mut Route) -> Result<(), RouteError> {
        match self.repository.save_route(route) {
            Ok(version) => {
                route.version = version;
                Ok(())
            }
            Err(err @ RepositoryError::VersionConflict { .. }) => {
                warn!(route_id = %route.id, error = %err, "concurrent route modification");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn apply_route_status(route: &mut Route, status: RouteStatus, now: DateTime<Utc>) {
    match status {
        RouteStatus::Planned => {}
        RouteStatus::InProgress => {
            route.start_time.get_or_insert(now);
        }
        RouteStatus::Completed => {
            for stop in route.stops.iter_mut().filter(|stop| !stop.status.is_resolved()) {
                stop.status = StopStatus::Delivered;
                stop.completed_time = Some(now);
            }
            route.end_time = Some(now);
        }
        RouteStatus::Cancelled => {
            for stop in route.stops.iter_mut().filter(|stop| !stop.status.is_resolved()) {
                stop.status = StopStatus::Cancelled;
            }
            route.end_time = Some(now);
        }
    }
    route.status = status;
}
