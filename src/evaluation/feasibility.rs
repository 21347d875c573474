//! Time-window feasibility of a route.

use crate::config::RoutingConfig;
use crate::distance::{DistanceMatrix, DEPOT};
use crate::models::Customer;

/// A simulated stop on a feasible route.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    /// Customer being visited.
    pub customer_id: u32,
    /// Arrival time, minutes.
    pub arrival_time: f64,
    /// Departure time (arrival + service), minutes.
    pub departure_time: f64,
}

/// First stop whose arrival falls outside every time window.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindowViolation {
    /// Customer that could not be served.
    pub customer_id: u32,
    /// Position of the stop in the route.
    pub position: usize,
    /// Simulated arrival time, minutes.
    pub arrival_time: f64,
}

/// Simulates arrival times along routes and checks them against time windows.
///
/// Travel uses raw (untrafficked) distances at the configured average speed.
/// There is no waiting: an arrival before a window opens is a violation, and
/// the check stops at the first violating stop.
///
/// # Examples
///
/// ```
/// use delivery_routing::config::RoutingConfig;
/// use delivery_routing::distance::DistanceMatrix;
/// use delivery_routing::evaluation::FeasibilityChecker;
/// use delivery_routing::models::{Customer, Location, TimeWindow};
///
/// let customers = vec![
///     Customer::new(1, Location::new(0.0, 0.01), 10.0)
///         .with_time_window(TimeWindow::new(0.0, 60.0).unwrap()),
/// ];
/// // 1 km from the depot: 2 minutes at 30 km/h
/// let dm = DistanceMatrix::from_data(2, vec![0.0, 1000.0, 1000.0, 0.0]).unwrap();
/// let config = RoutingConfig::default();
///
/// let checker = FeasibilityChecker::new(&customers, &dm, &config);
/// let visits = checker.check_time_windows(&[1]).unwrap();
/// assert!((visits[0].arrival_time - 2.0).abs() < 1e-10);
/// assert!((visits[0].departure_time - 12.0).abs() < 1e-10);
/// ```
pub struct FeasibilityChecker<'a> {
    customers: &'a [Customer],
    distances: &'a DistanceMatrix,
    config: &'a RoutingConfig,
}

impl<'a> FeasibilityChecker<'a> {
    /// Creates a checker. Node `i > 0` of `distances` is `customers[i - 1]`.
    pub fn new(
        customers: &'a [Customer],
        distances: &'a DistanceMatrix,
        config: &'a RoutingConfig,
    ) -> Self {
        Self {
            customers,
            distances,
            config,
        }
    }

    /// Simulates the route from the depot, returning the visit schedule or
    /// the first stop that misses all of its windows.
    pub fn check_time_windows(
        &self,
        route: &[usize],
    ) -> Result<Vec<Visit>, TimeWindowViolation> {
        let mut visits = Vec::with_capacity(route.len());
        let mut current_time = self.config.start_time;
        let mut prev = DEPOT;

        for (position, &node) in route.iter().enumerate() {
            let customer = &self.customers[node - 1];
            let travel = self.config.travel_minutes(self.distances.get(prev, node));
            let arrival = current_time + travel;

            if !customer.accepts_arrival(arrival) {
                return Err(TimeWindowViolation {
                    customer_id: customer.id(),
                    position,
                    arrival_time: arrival,
                });
            }

            let departure = arrival + self.config.service_time_minutes;
            visits.push(Visit {
                customer_id: customer.id(),
                arrival_time: arrival,
                departure_time: departure,
            });
            current_time = departure;
            prev = node;
        }

        Ok(visits)
    }

    /// Returns `true` if every stop is reached inside one of its windows.
    pub fn is_time_feasible(&self, route: &[usize]) -> bool {
        self.check_time_windows(route).is_ok()
    }
}
