//! Pairwise great-circle distance matrix.
//!
//! Sequencing compares every stop against every other, so distances are
//! computed once up front. Rows are independent and built in parallel.

use rayon::prelude::*;

use crate::geo::{self, Coordinate, GeoError};

/// Square matrix of Haversine distances in meters, indexed by input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    meters: Vec<f64>,
}

impl DistanceMatrix {
    pub fn build(locations: &[Coordinate]) -> Result<Self, GeoError> {
        for location in locations {
            location.validate()?;
        }

        let rows = locations
            .par_iter()
            .map(|from| {
                locations
                    .iter()
                    .map(|to| geo::distance(from, to))
                    .collect::<Result<Vec<f64>, GeoError>>()
            })
            .collect::<Result<Vec<Vec<f64>>, GeoError>>()?;

        Ok(Self {
            size: locations.len(),
            meters: rows.into_iter().flatten().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance in meters from location `from` to location `to`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.meters[from * self.size + to]
    }

    /// Total length of an open path visiting `order` front to back.
    pub fn path_length(&self, order: &[usize]) -> f64 {
        order.windows(2).map(|leg| self.get(leg[0], leg[1])).sum()
    }
}
