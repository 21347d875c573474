//! Fleet vehicles.

use serde::{Deserialize, Serialize};

use super::Location;

/// A delivery vehicle.
///
/// Construction uses the shared capacity from
/// [`RoutingConfig`](crate::config::RoutingConfig); the per-vehicle capacity
/// is kept for reporting and fleet checks.
///
/// # Examples
///
/// ```
/// use delivery_routing::models::{Location, Vehicle};
///
/// let v = Vehicle::new(0, 1000.0, Location::new(-31.9523, 115.8613));
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 1000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: u32,
    capacity: f64,
    start_location: Location,
}

impl Vehicle {
    /// Creates a vehicle starting and ending at `start_location`.
    pub fn new(id: u32, capacity: f64, start_location: Location) -> Self {
        Self {
            id,
            capacity,
            start_location,
        }
    }

    /// Vehicle ID.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Depot the vehicle leaves from and returns to.
    pub fn start_location(&self) -> Location {
        self.start_location
    }
}
