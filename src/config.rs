//! Run configuration.
//!
//! Every value is read once when a [`RoutingSystem`](crate::system::RoutingSystem)
//! is created and stays fixed for its lifetime.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// How an infeasible route is repaired after 2-opt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Halve the route once. Neither half is re-checked.
    #[default]
    SingleLevel,
    /// Keep halving every fragment until it is feasible or a single stop.
    Recursive,
}

/// Parameters of an optimisation run.
///
/// Times are minutes relative to `start_time`, distances are meters.
///
/// # Examples
///
/// ```
/// use delivery_routing::config::{RoutingConfig, SplitPolicy};
///
/// let config = RoutingConfig::from_json(r#"{ "vehicle_capacity": 500 }"#).unwrap();
/// assert_eq!(config.vehicle_capacity, 500.0);
/// assert_eq!(config.traffic_factor, 1.2);
/// assert_eq!(config.split_policy, SplitPolicy::SingleLevel);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Capacity shared by every vehicle of the fleet.
    pub vehicle_capacity: f64,
    /// Multiplier applied to legs without an explicit traffic entry.
    pub traffic_factor: f64,
    /// Average travel speed in km/h.
    pub average_speed_kmh: f64,
    /// Time spent at every stop, in minutes.
    pub service_time_minutes: f64,
    /// Departure time from the depot, in minutes.
    pub start_time: f64,
    /// Customers with a priority above this value count as high priority.
    pub high_priority_baseline: i32,
    /// Repair strategy for routes that miss a time window.
    pub split_policy: SplitPolicy,
    /// Optional wall-clock limit, checked between routes.
    pub time_limit_ms: Option<u64>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            vehicle_capacity: 1000.0,
            traffic_factor: 1.2,
            average_speed_kmh: 30.0,
            service_time_minutes: 10.0,
            start_time: 0.0,
            high_priority_baseline: 1,
            split_policy: SplitPolicy::SingleLevel,
            time_limit_ms: None,
        }
    }
}

impl RoutingConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RoutingError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the shared vehicle capacity.
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.vehicle_capacity = capacity;
        self
    }

    /// Sets the default traffic factor.
    pub fn with_traffic_factor(mut self, factor: f64) -> Self {
        self.traffic_factor = factor;
        self
    }

    /// Sets the split policy.
    pub fn with_split_policy(mut self, policy: SplitPolicy) -> Self {
        self.split_policy = policy;
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit_ms(mut self, limit: u64) -> Self {
        self.time_limit_ms = Some(limit);
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.vehicle_capacity.is_finite() && self.vehicle_capacity > 0.0) {
            return Err(RoutingError::InvalidConfig(format!(
                "vehicle_capacity must be positive, got {}",
                self.vehicle_capacity
            )));
        }
        if !(self.traffic_factor.is_finite() && self.traffic_factor > 0.0) {
            return Err(RoutingError::InvalidTrafficFactor(self.traffic_factor));
        }
        if !(self.average_speed_kmh.is_finite() && self.average_speed_kmh > 0.0) {
            return Err(RoutingError::InvalidConfig(format!(
                "average_speed_kmh must be positive, got {}",
                self.average_speed_kmh
            )));
        }
        if !(self.service_time_minutes.is_finite() && self.service_time_minutes >= 0.0) {
            return Err(RoutingError::InvalidConfig(format!(
                "service_time_minutes must be non-negative, got {}",
                self.service_time_minutes
            )));
        }
        if !self.start_time.is_finite() {
            return Err(RoutingError::InvalidConfig(
                "start_time must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Travel time in minutes for a distance in meters.
    pub fn travel_minutes(&self, meters: f64) -> f64 {
        let meters_per_minute = self.average_speed_kmh * 1000.0 / 60.0;
        meters / meters_per_minute
    }
}
