//! Collaborator interfaces consumed by the route lifecycle.
//!
//! These are intentionally minimal. Hosts implement them on top of their own
//! database and time source.

use chrono::{DateTime, Utc};

use crate::error::RepositoryError;
use crate::models::Route;

/// Durable storage for routes and their stops.
///
/// Implementations own all durable state. Writes use optimistic
/// concurrency: `Route::version` carries the version the caller read.
pub trait RouteRepository: Send + Sync {
    /// Load a route with its stops ordered by sequence number.
    fn load_route(&self, route_id: &str) -> Result<Route, RepositoryError>;

    /// Persist the route record and all of its stops as one atomic write.
    ///
    /// Must fail with [`RepositoryError::VersionConflict`] when the stored
    /// version differs from `route.version` (a route never saved has
    /// version 0). Returns the new version.
    fn save_route(&self, route: &Route) -> Result<u64, RepositoryError>;

    /// Routes currently in progress.
    fn load_active_routes(&self) -> Result<Vec<Route>, RepositoryError>;
}

/// Source of the current time, used for completion and start/end stamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<T: RouteRepository + ?Sized> RouteRepository for std::sync::Arc<T> {
    fn load_route(&self, route_id: &str) -> Result<Route, RepositoryError> {
        (**self).load_route(route_id)
    }

    fn save_route(&self, route: &Route) -> Result<u64, RepositoryError> {
        (**self).save_route(route)
    }

    fn load_active_routes(&self) -> Result<Vec<Route>, RepositoryError> {
        (**self).load_active_routes()
    }
}
