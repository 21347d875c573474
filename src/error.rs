//! Error type shared by every fallible operation in the crate.

use std::fmt;
use std::time::Duration;

use crate::models::Location;

/// Errors raised while configuring or running the routing engine.
///
/// Infeasible routes are not errors: they are repaired by splitting. Data is
/// validated when it enters the [`RoutingSystem`](crate::system::RoutingSystem),
/// so an optimisation run can only fail on its deadline.
#[derive(Debug)]
pub enum RoutingError {
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// A customer (or the depot, id `None`) has a non-finite or out-of-range coordinate.
    InvalidLocation {
        /// Offending customer, `None` for the depot.
        customer_id: Option<u32>,
    },
    /// A customer demand is negative or non-finite.
    InvalidDemand {
        /// Offending customer.
        customer_id: u32,
        /// Rejected demand.
        demand: f64,
    },
    /// A vehicle has an invalid start location or capacity.
    InvalidVehicle {
        /// Offending vehicle.
        vehicle_id: u32,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// The distance oracle returned a negative or non-finite leg.
    InvalidDistance {
        /// Origin of the leg.
        from: Location,
        /// Destination of the leg.
        to: Location,
        /// Rejected value.
        distance: f64,
    },
    /// A road references a node that was never added.
    UnknownRoadNode(usize),
    /// A road length is negative or non-finite.
    InvalidRoadLength {
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
        /// Rejected length in meters.
        meters: f64,
    },
    /// A customer with the same id was already added.
    DuplicateCustomer(u32),
    /// A traffic multiplier is non-positive or non-finite.
    InvalidTrafficFactor(f64),
    /// The configured time limit elapsed before the run finished.
    DeadlineExceeded {
        /// Time spent when the run was aborted.
        elapsed: Duration,
    },
    /// A reporting sink failed to publish.
    Report(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::InvalidLocation {
                customer_id: Some(id),
            } => write!(f, "customer {id} has an invalid location"),
            Self::InvalidLocation { customer_id: None } => {
                write!(f, "depot has an invalid location")
            }
            Self::InvalidDemand {
                customer_id,
                demand,
            } => write!(f, "customer {customer_id} has invalid demand {demand}"),
            Self::InvalidVehicle { vehicle_id, reason } => {
                write!(f, "vehicle {vehicle_id} is invalid: {reason}")
            }
            Self::InvalidDistance { from, to, distance } => write!(
                f,
                "oracle returned {distance} m from ({}, {}) to ({}, {})",
                from.lat, from.lon, to.lat, to.lon
            ),
            Self::UnknownRoadNode(node) => write!(f, "road node {node} does not exist"),
            Self::InvalidRoadLength { from, to, meters } => {
                write!(f, "road {from} -> {to} has invalid length {meters}")
            }
            Self::DuplicateCustomer(id) => write!(f, "customer {id} was already added"),
            Self::InvalidTrafficFactor(factor) => {
                write!(f, "traffic factor must be positive and finite, got {factor}")
            }
            Self::DeadlineExceeded { elapsed } => write!(
                f,
                "optimisation aborted after {:.3}s: time limit exceeded",
                elapsed.as_secs_f64()
            ),
            Self::Report(msg) => write!(f, "report failed: {msg}"),
        }
    }
}

impl std::error::Error for RoutingError {}

impl From<std::io::Error> for RoutingError {
    fn from(value: std::io::Error) -> Self {
        Self::Report(value.to_string())
    }
}

impl From<serde_json::Error> for RoutingError {
    fn from(value: serde_json::Error) -> Self {
        Self::Report(value.to_string())
    }
}

impl From<time::error::Format> for RoutingError {
    fn from(value: time::error::Format) -> Self {
        Self::Report(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            RoutingError::DuplicateCustomer(7).to_string(),
            "customer 7 was already added"
        );
        assert_eq!(
            RoutingError::InvalidLocation { customer_id: None }.to_string(),
            "depot has an invalid location"
        );
        let err = RoutingError::InvalidDemand {
            customer_id: 3,
            demand: -1.0,
        };
        assert!(err.to_string().contains("customer 3"));
        let err = RoutingError::InvalidVehicle {
            vehicle_id: 2,
            reason: "capacity must be positive",
        };
        assert_eq!(err.to_string(), "vehicle 2 is invalid: capacity must be positive");
        let err = RoutingError::InvalidDistance {
            from: Location::new(1.0, 2.0),
            to: Location::new(3.0, 4.0),
            distance: f64::NAN,
        };
        assert_eq!(err.to_string(), "oracle returned NaN m from (1, 2) to (3, 4)");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: RoutingError = io.into();
        assert!(matches!(err, RoutingError::Report(ref m) if m.contains("disk full")));
    }
}
