//! Error types surfaced by route operations and persistence collaborators.

use thiserror::Error;

use crate::geo::GeoError;
use crate::models::{RouteStatus, StopStatus};

/// Failures reported by a [`RouteRepository`](crate::traits::RouteRepository).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("route {0} not found")]
    NotFound(String),

    #[error("route {route_id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        route_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("route {0} not found")]
    RouteNotFound(String),

    #[error("stop {stop_id} not found on route {route_id}")]
    StopNotFound { route_id: String, stop_id: String },

    #[error("route cannot move from {from} to {to}")]
    InvalidRouteTransition { from: RouteStatus, to: RouteStatus },

    #[error("stop {stop_id} cannot move from {from} to {to}")]
    InvalidStopTransition {
        stop_id: String,
        from: StopStatus,
        to: StopStatus,
    },

    #[error("route {route_id} was modified concurrently")]
    ConcurrentModification { route_id: String },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl RouteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteError::RouteNotFound(_) | RouteError::StopNotFound { .. })
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            RouteError::InvalidRouteTransition { .. } | RouteError::InvalidStopTransition { .. }
        )
    }
}

impl From<RepositoryError> for RouteError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(route_id) => RouteError::RouteNotFound(route_id),
            RepositoryError::VersionConflict { route_id, .. } => {
                RouteError::ConcurrentModification { route_id }
            }
            RepositoryError::Backend(message) => RouteError::Storage(message),
        }
    }
}
