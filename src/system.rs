//! The routing orchestrator.
//!
//! One [`RoutingSystem::optimize`] call runs the whole pipeline:
//!
//! 1. Clarke-Wright savings partitions the customers into routes.
//! 2. Each route is reordered by descending priority and improved with 2-opt.
//! 3. Routes that miss a time window are split at their midpoint; fragments
//!    past the first get fresh ids allocated after every constructed id.
//!
//! The plan is assembled locally and returned whole, so an aborted run
//! leaves no partial routes or statistics behind.

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::{RoutingConfig, SplitPolicy};
use crate::constructive::clarke_wright_savings;
use crate::distance::{DistanceMatrix, DistanceOracle, TrafficTable, DEPOT};
use crate::error::{Result, RoutingError};
use crate::evaluation::{split_at_midpoint, split_until_feasible, FeasibilityChecker};
use crate::local_search::{route_cost, two_opt_improve};
use crate::models::{Customer, Location, RouteId, RouteIdAllocator, RouteStatistics, Vehicle};

/// Result of one optimisation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingPlan {
    routes: BTreeMap<RouteId, Vec<Customer>>,
    statistics: BTreeMap<RouteId, RouteStatistics>,
    elapsed: Duration,
    completed_at: OffsetDateTime,
}

impl RoutingPlan {
    /// Committed routes, each an ordered list of stops.
    pub fn routes(&self) -> &BTreeMap<RouteId, Vec<Customer>> {
        &self.routes
    }

    /// Statistics of every committed route, keyed like [`routes`](Self::routes).
    pub fn statistics(&self) -> &BTreeMap<RouteId, RouteStatistics> {
        &self.statistics
    }

    /// Wall time of the run.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// UTC instant at which the run finished.
    pub fn completed_at(&self) -> OffsetDateTime {
        self.completed_at
    }

    /// Number of committed routes.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of customers served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    /// Sum of the final (traffic-weighted) distances.
    pub fn total_distance(&self) -> f64 {
        self.statistics.values().map(|s| s.final_distance).sum()
    }

    /// Mean improvement percentage over all routes, 0 for an empty plan.
    pub fn average_improvement(&self) -> f64 {
        if self.statistics.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.statistics.values().map(|s| s.improvement_percentage).sum();
        sum / self.statistics.len() as f64
    }
}

/// Owns the fleet, the customers and the traffic table, and runs the
/// construct → improve → split pipeline.
///
/// # Examples
///
/// ```
/// use delivery_routing::config::RoutingConfig;
/// use delivery_routing::distance::DegreeApproximation;
/// use delivery_routing::models::{Customer, Location, TimeWindow, Vehicle};
/// use delivery_routing::system::RoutingSystem;
///
/// let depot = Location::new(-31.9523, 115.8613);
/// let config = RoutingConfig::default();
/// let mut system = RoutingSystem::new(depot, config, DegreeApproximation).unwrap();
/// system.add_vehicle(Vehicle::new(0, 1000.0, depot)).unwrap();
///
/// let all_day = TimeWindow::from_hours(0.0, 8.0).unwrap();
/// for (id, lat, lon) in [(1, -31.9714, 115.8971), (2, -31.9433, 115.9169)] {
///     let customer = Customer::new(id, Location::new(lat, lon), 100.0).with_time_window(all_day);
///     system.add_customer(customer).unwrap();
/// }
///
/// let plan = system.optimize().unwrap();
/// assert_eq!(plan.num_routes(), 1);
/// assert_eq!(plan.num_served(), 2);
/// ```
#[derive(Debug)]
pub struct RoutingSystem<O> {
    depot: Location,
    config: RoutingConfig,
    oracle: O,
    traffic: TrafficTable,
    customers: Vec<Customer>,
    vehicles: Vec<Vehicle>,
    customer_ids: HashSet<u32>,
}

impl<O: DistanceOracle> RoutingSystem<O> {
    /// Creates a system around a depot. The configuration is validated and
    /// then fixed for the system's lifetime.
    pub fn new(depot: Location, config: RoutingConfig, oracle: O) -> Result<Self> {
        config.validate()?;
        if !depot.is_valid() {
            return Err(RoutingError::InvalidLocation { customer_id: None });
        }
        let traffic = TrafficTable::new(config.traffic_factor)?;
        info!(lat = depot.lat, lon = depot.lon, "routing system initialised");
        Ok(Self {
            depot,
            config,
            oracle,
            traffic,
            customers: Vec::new(),
            vehicles: Vec::new(),
            customer_ids: HashSet::new(),
        })
    }

    /// Adds a customer after validating its location, demand and id.
    pub fn add_customer(&mut self, customer: Customer) -> Result<()> {
        let id = customer.id();
        if !customer.location().is_valid() {
            return Err(RoutingError::InvalidLocation {
                customer_id: Some(id),
            });
        }
        let demand = customer.demand();
        if !(demand.is_finite() && demand >= 0.0) {
            return Err(RoutingError::InvalidDemand {
                customer_id: id,
                demand,
            });
        }
        if !self.customer_ids.insert(id) {
            return Err(RoutingError::DuplicateCustomer(id));
        }
        if customer.time_windows().is_empty() {
            warn!(customer = id, "customer has no time window and can never be served on time");
        }
        self.customers.push(customer);
        info!(customer = id, "added customer");
        Ok(())
    }

    /// Adds a vehicle to the fleet.
    ///
    /// Routes are built against the shared capacity from the configuration;
    /// a vehicle with a different positive capacity is accepted with a warning.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<()> {
        if !vehicle.start_location().is_valid() {
            return Err(RoutingError::InvalidVehicle {
                vehicle_id: vehicle.id(),
                reason: "start location is out of range",
            });
        }
        if !(vehicle.capacity().is_finite() && vehicle.capacity() > 0.0) {
            return Err(RoutingError::InvalidVehicle {
                vehicle_id: vehicle.id(),
                reason: "capacity must be positive and finite",
            });
        }
        if vehicle.capacity() != self.config.vehicle_capacity {
            warn!(
                vehicle = vehicle.id(),
                capacity = vehicle.capacity(),
                shared = self.config.vehicle_capacity,
                "vehicle capacity differs from the shared capacity"
            );
        }
        info!(vehicle = vehicle.id(), "added vehicle");
        self.vehicles.push(vehicle);
        Ok(())
    }

    /// Sets the traffic multiplier of the directed segment `from -> to`.
    pub fn set_traffic_multiplier(
        &mut self,
        from: Location,
        to: Location,
        factor: f64,
    ) -> Result<()> {
        self.traffic.set(from, to, factor)
    }

    /// Depot location.
    pub fn depot(&self) -> Location {
        self.depot
    }

    /// Run configuration.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Customers in insertion order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Fleet vehicles in insertion order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Traffic multipliers.
    pub fn traffic(&self) -> &TrafficTable {
        &self.traffic
    }

    /// Runs one optimisation and returns the committed routes and statistics.
    ///
    /// Nothing carries over between calls: every run rebuilds its plan.
    pub fn optimize(&self) -> Result<RoutingPlan> {
        let started = Instant::now();
        info!(
            customers = self.customers.len(),
            vehicles = self.vehicles.len(),
            "starting route optimisation"
        );

        let mut locations = Vec::with_capacity(self.customers.len() + 1);
        locations.push(self.depot);
        locations.extend(self.customers.iter().map(Customer::location));
        let distances = DistanceMatrix::from_oracle(&locations, &self.oracle)?;
        let costs = distances.weighted(&locations, &self.traffic);
        let checker = FeasibilityChecker::new(&self.customers, &distances, &self.config);

        let initial_routes =
            clarke_wright_savings(&self.customers, &distances, self.config.vehicle_capacity);
        info!(routes = initial_routes.len(), "initial solution built");

        let mut ids = RouteIdAllocator::after(initial_routes.len());
        let mut routes = BTreeMap::new();
        let mut statistics = BTreeMap::new();

        for (index, mut route) in initial_routes.into_iter().enumerate() {
            self.check_deadline(started)?;
            let id = RouteId(index);

            // stable: equal priorities keep their construction order
            route.sort_by_key(|&node| std::cmp::Reverse(self.customers[node - 1].priority()));
            // the priority order is the improver's input and the statistics' baseline
            let initial_distance = route_cost(&route, DEPOT, &costs);
            let (improved, final_distance) = two_opt_improve(&route, DEPOT, &costs);

            match checker.check_time_windows(&improved) {
                Ok(_) => {
                    let stops = self.stops(&improved);
                    let stats = RouteStatistics::from_improvement(
                        initial_distance,
                        final_distance,
                        &stops,
                        self.config.high_priority_baseline,
                    );
                    debug!(
                        route = %id,
                        stops = stops.len(),
                        initial_distance,
                        final_distance,
                        "route committed"
                    );
                    routes.insert(id, stops);
                    statistics.insert(id, stats);
                }
                Err(violation) => {
                    let fragments = match self.config.split_policy {
                        SplitPolicy::SingleLevel => {
                            let (first, second) = split_at_midpoint(&improved);
                            vec![first, second]
                        }
                        SplitPolicy::Recursive => {
                            let feasible = |r: &[usize]| checker.is_time_feasible(r);
                            split_until_feasible(&improved, &feasible)
                        }
                    };
                    info!(
                        route = %id,
                        customer = violation.customer_id,
                        arrival = violation.arrival_time,
                        fragments = fragments.iter().filter(|f| !f.is_empty()).count(),
                        "time window missed, splitting route"
                    );

                    let mut fragment_id = Some(id);
                    for fragment in fragments.into_iter().filter(|f| !f.is_empty()) {
                        let fid = fragment_id.take().unwrap_or_else(|| ids.allocate());
                        let stops = self.stops(&fragment);
                        let stats = RouteStatistics::fresh(
                            route_cost(&fragment, DEPOT, &costs),
                            &stops,
                            self.config.high_priority_baseline,
                        )
                        .with_time_feasible(checker.is_time_feasible(&fragment));
                        debug!(
                            route = %fid,
                            stops = stops.len(),
                            feasible = stats.time_feasible,
                            "fragment committed"
                        );
                        routes.insert(fid, stops);
                        statistics.insert(fid, stats);
                    }
                }
            }
        }

        if !self.vehicles.is_empty() && routes.len() > self.vehicles.len() {
            warn!(
                routes = routes.len(),
                vehicles = self.vehicles.len(),
                "more routes than vehicles in the fleet"
            );
        }

        let plan = RoutingPlan {
            routes,
            statistics,
            elapsed: started.elapsed(),
            completed_at: OffsetDateTime::now_utc(),
        };
        info!(
            routes = plan.num_routes(),
            seconds = plan.elapsed.as_secs_f64(),
            "route optimisation completed"
        );
        Ok(plan)
    }

    fn stops(&self, route: &[usize]) -> Vec<Customer> {
        route.iter().map(|&node| self.customers[node - 1].clone()).collect()
    }

    fn check_deadline(&self, started: Instant) -> Result<()> {
        if let Some(limit) = self.config.time_limit_ms {
            let elapsed = started.elapsed();
            if elapsed > Duration::from_millis(limit) {
                warn!(seconds = elapsed.as_secs_f64(), "time limit exceeded, aborting run");
                return Err(RoutingError::DeadlineExceeded { elapsed });
            }
        }
        Ok(())
    }
}
