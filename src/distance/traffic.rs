//! Per-segment traffic multipliers.

use std::collections::HashMap;

use crate::error::{Result, RoutingError};
use crate::models::Location;

type SegmentKey = ((u64, u64), (u64, u64));

/// Multipliers applied to raw leg distances, keyed by the ordered
/// `(origin, destination)` pair.
///
/// Keys are the exact coordinates: no rounding or snapping is applied, so a
/// lookup only hits when both endpoints are bit-identical to the stored ones.
/// Missing segments use the default factor.
///
/// # Examples
///
/// ```
/// use delivery_routing::distance::TrafficTable;
/// use delivery_routing::models::Location;
///
/// let depot = Location::new(-31.9523, 115.8613);
/// let stop = Location::new(-31.9714, 115.8971);
///
/// let mut table = TrafficTable::new(1.2).unwrap();
/// table.set(depot, stop, 1.8).unwrap();
/// assert_eq!(table.factor(depot, stop), 1.8);
/// assert_eq!(table.factor(stop, depot), 1.2);
/// ```
#[derive(Debug, Clone)]
pub struct TrafficTable {
    default_factor: f64,
    factors: HashMap<SegmentKey, f64>,
}

impl TrafficTable {
    /// Creates an empty table with the given default factor.
    pub fn new(default_factor: f64) -> Result<Self> {
        check_factor(default_factor)?;
        Ok(Self {
            default_factor,
            factors: HashMap::new(),
        })
    }

    /// Sets the multiplier of the directed segment `from -> to`.
    pub fn set(&mut self, from: Location, to: Location, factor: f64) -> Result<()> {
        check_factor(factor)?;
        self.factors.insert((from.bits(), to.bits()), factor);
        Ok(())
    }

    /// Multiplier of the directed segment `from -> to`.
    pub fn factor(&self, from: Location, to: Location) -> f64 {
        self.factors
            .get(&(from.bits(), to.bits()))
            .copied()
            .unwrap_or(self.default_factor)
    }

    /// Factor used for segments without an entry.
    pub fn default_factor(&self) -> f64 {
        self.default_factor
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Returns `true` if no segment has an explicit entry.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

fn check_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(RoutingError::InvalidTrafficFactor(factor))
    }
}
