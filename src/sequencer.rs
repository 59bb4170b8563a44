//! Stop sequencing and route quality scoring.
//!
//! Sequencing is a greedy nearest-neighbor walk from the first stop, with an
//! optional 2-opt refinement. Scoring rates an ordering from 0 to 100.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::{self, GeoError};
use crate::matrix::DistanceMatrix;
use crate::models::Stop;

/// Score of a route with no travel and no time-window violations.
pub const MAX_SCORE: f64 = 100.0;

/// Points deducted per kilometer of average leg length.
pub const PENALTY_PER_KM: f64 = 10.0;

/// Upper bound on the distance penalty.
pub const MAX_DISTANCE_PENALTY: f64 = 50.0;

/// Points deducted per adjacent pair visited out of scheduled order.
pub const TIME_WINDOW_VIOLATION_PENALTY: f64 = 5.0;

/// Minimum gain (meters) for a 2-opt move to count as an improvement.
const IMPROVEMENT_EPSILON_M: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Distance penalty per kilometer of average leg length.
    pub penalty_per_km: f64,
    /// Cap on the distance penalty.
    pub max_distance_penalty: f64,
    /// Penalty per time-window violation.
    pub time_window_penalty: f64,
    /// Maximum 2-opt passes after nearest-neighbor. 0 disables refinement.
    pub two_opt_passes: usize,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            penalty_per_km: PENALTY_PER_KM,
            max_distance_penalty: MAX_DISTANCE_PENALTY,
            time_window_penalty: TIME_WINDOW_VIOLATION_PENALTY,
            two_opt_passes: 0,
        }
    }
}

/// Breakdown of a route score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteScore {
    pub total_distance_m: f64,
    pub average_distance_m: f64,
    pub distance_penalty: f64,
    pub time_window_violations: usize,
    pub time_window_penalty: f64,
    pub score: f64,
}

/// Reorder stops by nearest neighbor using default options.
pub fn sequence(stops: Vec<Stop>) -> Result<Vec<Stop>, GeoError> {
    sequence_with(stops, &SequenceOptions::default())
}

/// Reorder stops to shorten total travel distance.
///
/// The first stop stays first. Each following position takes the closest
/// remaining stop to the previous one; ties go to the earliest stop in input
/// order. Sequence numbers are rewritten to the new 0-based positions.
pub fn sequence_with(stops: Vec<Stop>, options: &SequenceOptions) -> Result<Vec<Stop>, GeoError> {
    let locations: Vec<_> = stops.iter().map(|stop| stop.location).collect();
    let matrix = DistanceMatrix::build(&locations)?;

    let mut order = nearest_neighbor_order(&matrix);
    if options.two_opt_passes > 0 {
        let before = matrix.path_length(&order);
        let mut passes = 0;
        while passes < options.two_opt_passes && two_opt_improve(&mut order, &matrix) {
            passes += 1;
        }
        debug!(
            stops = order.len(),
            passes,
            before_m = before,
            after_m = matrix.path_length(&order),
            "2-opt refinement finished"
        );
    }

    Ok(apply_order(stops, &order))
}

/// Score an ordering using default options.
pub fn score(stops: &[Stop]) -> Result<f64, GeoError> {
    score_with(stops, &SequenceOptions::default())
}

pub fn score_with(stops: &[Stop], options: &SequenceOptions) -> Result<f64, GeoError> {
    evaluate(stops, options).map(|breakdown| breakdown.score)
}

/// Compute the score and its components for stops in their current order.
pub fn evaluate(stops: &[Stop], options: &SequenceOptions) -> Result<RouteScore, GeoError> {
    for stop in stops {
        stop.location.validate()?;
    }

    let mut total_distance_m = 0.0;
    let mut time_window_violations = 0;
    for leg in stops.windows(2) {
        total_distance_m += geo::distance(&leg[0].location, &leg[1].location)?;
        if leg[0].scheduled_time > leg[1].scheduled_time {
            time_window_violations += 1;
        }
    }

    let average_distance_m = if stops.is_empty() {
        0.0
    } else {
        total_distance_m / stops.len() as f64
    };
    let distance_penalty =
        (average_distance_m / 1000.0 * options.penalty_per_km).min(options.max_distance_penalty);
    let time_window_penalty = time_window_violations as f64 * options.time_window_penalty;
    let score = (MAX_SCORE - distance_penalty - time_window_penalty).clamp(0.0, MAX_SCORE);

    Ok(RouteScore {
        total_distance_m,
        average_distance_m,
        distance_penalty,
        time_window_violations,
        time_window_penalty,
        score,
    })
}

fn nearest_neighbor_order(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    let mut order: Vec<usize> = (0..n).collect();

    for i in 0..n.saturating_sub(1) {
        let current = order[i];
        let mut best = i + 1;
        let mut best_distance = matrix.get(current, order[best]);
        for candidate in i + 2..n {
            let distance = matrix.get(current, order[candidate]);
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        // Rotating keeps the unplaced tail in input order, so later ties
        // still resolve to the earliest input stop.
        order[i + 1..=best].rotate_right(1);
    }

    order
}

/// 2-opt: Reverse a segment of the open path to reduce its length.
/// Position 0 never moves. Returns true if an improvement was made.
fn two_opt_improve(order: &mut [usize], matrix: &DistanceMatrix) -> bool {
    let n = order.len();
    if n < 4 {
        return false;
    }

    for i in 0..n - 2 {
        for j in i + 2..n {
            let (a, b, c) = (order[i], order[i + 1], order[j]);
            let mut delta = matrix.get(a, c) - matrix.get(a, b);
            if j + 1 < n {
                let d = order[j + 1];
                delta += matrix.get(b, d) - matrix.get(c, d);
            }

            if delta < -IMPROVEMENT_EPSILON_M {
                order[i + 1..=j].reverse();
                return true;
            }
        }
    }

    false
}

fn apply_order(stops: Vec<Stop>, order: &[usize]) -> Vec<Stop> {
    let mut position = vec![0; order.len()];
    for (pos, &index) in order.iter().enumerate() {
        position[index] = pos;
    }

    let mut ranked: Vec<(usize, Stop)> = position.into_iter().zip(stops).collect();
    ranked.sort_by_key(|(pos, _)| *pos);
    ranked
        .into_iter()
        .map(|(pos, mut stop)| {
            stop.sequence_number = pos;
            stop
        })
        .collect()
}
