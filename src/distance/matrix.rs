//! Dense distance matrix.

use super::{DistanceOracle, TrafficTable};
use crate::error::{Result, RoutingError};
use crate::models::Location;

/// Matrix index of the depot. Node `i > 0` is the `i`-th customer.
pub const DEPOT: usize = 0;

/// A dense n×n distance matrix stored in row-major order.
///
/// Built once per optimisation run from a [`DistanceOracle`], so every pair
/// of stops is queried exactly once. A traffic-weighted copy is derived with
/// [`DistanceMatrix::weighted`].
///
/// # Examples
///
/// ```
/// use delivery_routing::distance::{DistanceMatrix, DegreeApproximation};
/// use delivery_routing::models::Location;
///
/// let nodes = vec![
///     Location::new(0.0, 0.0),
///     Location::new(0.0, 1.0),
///     Location::new(1.0, 1.0),
/// ];
/// let dm = DistanceMatrix::from_oracle(&nodes, &DegreeApproximation).unwrap();
/// assert!((dm.get(0, 1) - 111_000.0).abs() < 1e-6);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Queries the oracle for every ordered pair of distinct locations.
    ///
    /// Fails on the first leg that is negative or not finite.
    pub fn from_oracle<O: DistanceOracle + ?Sized>(
        locations: &[Location],
        oracle: &O,
    ) -> Result<Self> {
        let n = locations.len();
        let mut dm = Self::new(n);
        for (i, &from) in locations.iter().enumerate() {
            for (j, &to) in locations.iter().enumerate() {
                if i == j {
                    continue;
                }
                let distance = oracle.distance(from, to);
                if !(distance.is_finite() && distance >= 0.0) {
                    return Err(RoutingError::InvalidDistance { from, to, distance });
                }
                dm.set(i, j, distance);
            }
        }
        Ok(dm)
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Copy of this matrix with every leg multiplied by its traffic factor.
    ///
    /// `locations[i]` must be the location of node `i`.
    pub fn weighted(&self, locations: &[Location], traffic: &TrafficTable) -> Self {
        debug_assert_eq!(locations.len(), self.size);
        let mut dm = self.clone();
        for i in 0..self.size {
            for j in 0..self.size {
                let factor = traffic.factor(locations[i], locations[j]);
                dm.set(i, j, self.get(i, j) * factor);
            }
        }
        dm
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}
