//! Distances between stops.
//!
//! - [`DistanceOracle`] — source of raw leg distances in meters
//! - [`DegreeApproximation`] — straight-line fallback
//! - [`RoadNetworkOracle`] — shortest path over a [`RoadNetwork`]
//! - [`TrafficTable`] — per-segment multipliers
//! - [`DistanceMatrix`] — dense per-run cache of oracle answers

mod matrix;
mod oracle;
mod road_network;
mod traffic;

pub use matrix::{DistanceMatrix, DEPOT};
pub use oracle::{DegreeApproximation, DistanceOracle, METERS_PER_DEGREE};
pub use road_network::{RoadNetwork, RoadNetworkOracle};
pub use traffic::TrafficTable;
