//! Distance oracle trait and the degree-based approximation.

use crate::models::Location;

/// Rough conversion from degrees to meters.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Source of travel distances between two coordinates, in meters.
///
/// Implementations must be total: when a better estimate is unavailable
/// they fall back to an approximation instead of failing.
///
/// Any `Fn(Location, Location) -> f64` is an oracle, which keeps tests short.
///
/// # Examples
///
/// ```
/// use delivery_routing::distance::DistanceOracle;
/// use delivery_routing::models::Location;
///
/// let flat = |_: Location, _: Location| 100.0;
/// assert_eq!(flat.distance(Location::new(0.0, 0.0), Location::new(1.0, 1.0)), 100.0);
/// ```
pub trait DistanceOracle {
    /// Travel distance from `from` to `to`, in meters.
    fn distance(&self, from: Location, to: Location) -> f64;
}

impl<F> DistanceOracle for F
where
    F: Fn(Location, Location) -> f64,
{
    fn distance(&self, from: Location, to: Location) -> f64 {
        self(from, to)
    }
}

/// Straight-line distance in degrees scaled by [`METERS_PER_DEGREE`].
///
/// # Examples
///
/// ```
/// use delivery_routing::distance::{DegreeApproximation, DistanceOracle};
/// use delivery_routing::models::Location;
///
/// let d = DegreeApproximation.distance(Location::new(0.0, 0.0), Location::new(0.0, 1.0));
/// assert!((d - 111_000.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeApproximation;

impl DistanceOracle for DegreeApproximation {
    fn distance(&self, from: Location, to: Location) -> f64 {
        from.degrees_to(&to) * METERS_PER_DEGREE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_approximation_symmetric() {
        let a = Location::new(-31.9523, 115.8613);
        let b = Location::new(-32.0569, 115.7439);
        let ab = DegreeApproximation.distance(a, b);
        let ba = DegreeApproximation.distance(b, a);
        assert!((ab - ba).abs() < 1e-10);
        assert!(ab > 0.0);
    }

    #[test]
    fn test_degree_approximation_same_point() {
        let a = Location::new(10.0, 20.0);
        assert_eq!(DegreeApproximation.distance(a, a), 0.0);
    }

    #[test]
    fn test_closure_oracle() {
        let manhattan =
            |a: Location, b: Location| ((a.lat - b.lat).abs() + (a.lon - b.lon).abs()) * 10.0;
        let d = manhattan.distance(Location::new(0.0, 0.0), Location::new(1.0, 2.0));
        assert!((d - 30.0).abs() < 1e-10);
    }
}
