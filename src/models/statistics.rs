//! Per-route statistics.

use serde::{Deserialize, Serialize};

use super::Customer;

/// Metrics recorded for one committed route.
///
/// Distances are traffic-weighted meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStatistics {
    /// Cost of the priority-ordered route, before 2-opt.
    pub initial_distance: f64,
    /// Cost after improvement.
    pub final_distance: f64,
    /// `(initial - final) / initial * 100`, or 0 when `initial` is 0.
    pub improvement_percentage: f64,
    /// Number of stops.
    pub num_customers: usize,
    /// Summed demand of all stops.
    pub total_demand: f64,
    /// Stops with a priority above the baseline.
    pub high_priority_customers: usize,
    /// Whether the committed route passed the time-window check.
    pub time_feasible: bool,
}

impl RouteStatistics {
    /// Statistics of a route before and after improvement.
    ///
    /// # Examples
    ///
    /// ```
    /// use delivery_routing::models::{Customer, Location, RouteStatistics};
    ///
    /// let stops = vec![
    ///     Customer::new(1, Location::new(0.0, 0.0), 100.0).with_priority(2),
    ///     Customer::new(2, Location::new(0.0, 1.0), 50.0),
    /// ];
    /// let stats = RouteStatistics::from_improvement(200.0, 150.0, &stops, 1);
    /// assert!((stats.improvement_percentage - 25.0).abs() < 1e-10);
    /// assert_eq!(stats.num_customers, 2);
    /// assert_eq!(stats.total_demand, 150.0);
    /// assert_eq!(stats.high_priority_customers, 1);
    /// ```
    pub fn from_improvement(
        initial_distance: f64,
        final_distance: f64,
        stops: &[Customer],
        high_priority_baseline: i32,
    ) -> Self {
        let improvement_percentage = if initial_distance > 0.0 {
            (initial_distance - final_distance) / initial_distance * 100.0
        } else {
            0.0
        };
        Self {
            initial_distance,
            final_distance,
            improvement_percentage,
            num_customers: stops.len(),
            total_demand: stops.iter().map(Customer::demand).sum(),
            high_priority_customers: stops
                .iter()
                .filter(|c| c.priority() > high_priority_baseline)
                .count(),
            time_feasible: true,
        }
    }

    /// Statistics of a route that was not improved (e.g. a split fragment).
    pub fn fresh(distance: f64, stops: &[Customer], high_priority_baseline: i32) -> Self {
        Self::from_improvement(distance, distance, stops, high_priority_baseline)
    }

    /// Records the outcome of the time-window check.
    pub fn with_time_feasible(mut self, feasible: bool) -> Self {
        self.time_feasible = feasible;
        self
    }
}
