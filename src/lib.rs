//! fleet-routing core
//!
//! Stop sequencing, geospatial scoring and route lifecycle management for a
//! delivery fleet.

pub mod error;
pub mod geo;
pub mod lifecycle;
pub mod matrix;
pub mod memory;
pub mod metrics;
pub mod models;
pub mod sequencer;
pub mod traits;

pub use error::{RepositoryError, RouteError};
pub use geo::{BoundingBox, Coordinate, GeoError};
pub use lifecycle::{LifecycleConfig, RouteLifecycle};
pub use memory::InMemoryRouteRepository;
pub use metrics::{FleetSummary, RouteMetrics};
pub use models::{Attachment, Route, RouteStatus, Stop, StopInput, StopStatus};
pub use sequencer::{RouteScore, SequenceOptions};
pub use traits::{Clock, RouteRepository, SystemClock};
