//! In-memory route repository using DashMap.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::RepositoryError;
use crate::models::{Route, RouteStatus};
use crate::traits::RouteRepository;

/// Thread-safe, non-durable [`RouteRepository`].
///
/// The version check and the write happen while holding the entry's shard
/// lock, so concurrent saves of the same route serialize and the loser sees
/// a version conflict.
#[derive(Debug, Default)]
pub struct InMemoryRouteRepository {
    routes: DashMap<String, Route>,
}

impl InMemoryRouteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteRepository for InMemoryRouteRepository {
    fn load_route(&self, route_id: &str) -> Result<Route, RepositoryError> {
        self.routes
            .get(route_id)
            .map(|route| route.value().clone())
            .ok_or_else(|| RepositoryError::NotFound(route_id.to_string()))
    }

    fn save_route(&self, route: &Route) -> Result<u64, RepositoryError> {
        let actual = match self.routes.entry(route.id.clone()) {
            Entry::Occupied(mut entry) => {
                let actual = entry.get().version;
                if actual == route.version {
                    let mut stored = route.clone();
                    stored.version = actual + 1;
                    entry.insert(stored);
                    return Ok(actual + 1);
                }
                actual
            }
            Entry::Vacant(entry) => {
                if route.version == 0 {
                    let mut stored = route.clone();
                    stored.version = 1;
                    entry.insert(stored);
                    return Ok(1);
                }
                0
            }
        };

        Err(RepositoryError::VersionConflict {
            route_id: route.id.clone(),
            expected: route.version,
            actual,
        })
    }

    fn load_active_routes(&self) -> Result<Vec<Route>, RepositoryError> {
        let mut active: Vec<Route> = self
            .routes
            .iter()
            .filter(|route| route.status == RouteStatus::InProgress)
            .map(|route| route.value().clone())
            .collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(active)
    }
}
