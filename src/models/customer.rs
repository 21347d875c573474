//! Locations, time windows and customers.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// # Examples
///
/// ```
/// use delivery_routing::models::Location;
///
/// let quay = Location::new(-31.9523, 115.8613);
/// assert!(quay.is_valid());
/// assert!(!Location::new(f64::NAN, 0.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Location {
    /// Creates a location.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `true` if both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }

    /// Euclidean distance to another location, in degrees.
    pub fn degrees_to(&self, other: &Location) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Exact bit pattern of both coordinates, used as a lookup key.
    pub(crate) fn bits(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }
}

/// An interval during which arrival is acceptable.
///
/// Bounds are minutes relative to the run's start time and both are inclusive.
///
/// # Examples
///
/// ```
/// use delivery_routing::models::TimeWindow;
///
/// let tw = TimeWindow::new(60.0, 180.0).unwrap();
/// assert!(tw.contains(60.0));
/// assert!(tw.contains(180.0));
/// assert!(!tw.contains(180.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `start > end` or either value is non-finite.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Window spanning `[start_hours, end_hours]`, expressed in minutes.
    pub fn from_hours(start_hours: f64, end_hours: f64) -> Option<Self> {
        Self::new(start_hours * 60.0, end_hours * 60.0)
    }

    /// Earliest acceptable arrival.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Latest acceptable arrival.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

/// A delivery customer.
///
/// Windows are OR-combined: an arrival is accepted if any window contains it.
/// A customer without windows accepts no arrival.
///
/// # Examples
///
/// ```
/// use delivery_routing::models::{Customer, Location, TimeWindow};
///
/// let c = Customer::new(1, Location::new(-32.0569, 115.7439), 200.0)
///     .with_time_window(TimeWindow::from_hours(0.0, 2.0).unwrap())
///     .with_priority(2);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.priority(), 2);
/// assert!(c.accepts_arrival(90.0));
/// assert!(!c.accepts_arrival(121.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: u32,
    location: Location,
    demand: f64,
    time_windows: Vec<TimeWindow>,
    priority: i32,
}

impl Customer {
    /// Creates a customer with no time windows and priority 1.
    pub fn new(id: u32, location: Location, demand: f64) -> Self {
        Self {
            id,
            location,
            demand,
            time_windows: Vec::new(),
            priority: 1,
        }
    }

    /// Adds a time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_windows.push(tw);
        self
    }

    /// Sets the priority (higher is more urgent).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Customer identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Delivery location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Quantity to deliver.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Acceptable arrival windows, in insertion order.
    pub fn time_windows(&self) -> &[TimeWindow] {
        &self.time_windows
    }

    /// Priority (higher is more urgent).
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns `true` if any window contains `arrival`.
    pub fn accepts_arrival(&self, arrival: f64) -> bool {
        self.time_windows.iter().any(|tw| tw.contains(arrival))
    }
}
