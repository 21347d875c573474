//! Reporting sinks for completed runs.
//!
//! A [`RunReport`] flattens a [`RoutingPlan`] into a serialisable summary.
//! Sinks decide where it goes: [`JsonReportSink`] writes pretty JSON to any
//! writer, [`LogReportSink`] emits it through `tracing`.

use std::io::Write;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use crate::error::Result;
use crate::models::{Location, RouteId, TimeWindow};
use crate::system::RoutingPlan;

/// One stop of a reported route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerReport {
    /// Customer id.
    pub id: u32,
    /// Delivery location.
    pub location: Location,
    /// Quantity delivered.
    pub demand: f64,
    /// Priority, higher is more urgent.
    pub priority: i32,
    /// Acceptable arrival windows, minutes from the run start.
    pub time_windows: Vec<TimeWindow>,
}

/// One committed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteReport {
    /// Route id, as keyed in the plan.
    pub route_id: RouteId,
    /// Number of stops.
    pub num_customers: usize,
    /// Final traffic-weighted distance in meters.
    pub total_distance: f64,
    /// Summed demand of all stops.
    pub total_demand: f64,
    /// Improvement percentage achieved by 2-opt.
    pub improvement: f64,
    /// Stops with a priority above the baseline.
    pub high_priority_customers: usize,
    /// Whether the route passed the time-window check.
    pub time_feasible: bool,
    /// Stops in visiting order.
    pub customers: Vec<CustomerReport>,
}

/// Summary of a whole run, in route id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// RFC 3339 UTC instant at which the run finished.
    pub timestamp: String,
    /// Wall time of the run in seconds.
    pub total_optimization_time: f64,
    /// Number of committed routes.
    pub total_routes: usize,
    /// Customers served across all routes.
    pub total_customers: usize,
    /// Sum of the final route distances in meters.
    pub total_distance: f64,
    /// Sum of all route demands.
    pub total_demand: f64,
    /// High-priority stops across all routes.
    pub high_priority_customers: usize,
    /// Per-route details in route id order.
    pub routes: Vec<RouteReport>,
}

impl RunReport {
    /// Builds the report of a plan.
    ///
    /// Fails only if the completion instant cannot be formatted.
    pub fn from_plan(plan: &RoutingPlan) -> Result<Self> {
        let routes: Vec<RouteReport> = plan
            .routes()
            .iter()
            .filter_map(|(&route_id, stops)| {
                let stats = plan.statistics().get(&route_id)?;
                Some(RouteReport {
                    route_id,
                    num_customers: stops.len(),
                    total_distance: stats.final_distance,
                    total_demand: stats.total_demand,
                    improvement: stats.improvement_percentage,
                    high_priority_customers: stats.high_priority_customers,
                    time_feasible: stats.time_feasible,
                    customers: stops
                        .iter()
                        .map(|c| CustomerReport {
                            id: c.id(),
                            location: c.location(),
                            demand: c.demand(),
                            priority: c.priority(),
                            time_windows: c.time_windows().to_vec(),
                        })
                        .collect(),
                })
            })
            .collect();

        Ok(Self {
            timestamp: plan.completed_at().format(&Rfc3339)?,
            total_optimization_time: plan.elapsed().as_secs_f64(),
            total_routes: routes.len(),
            total_customers: routes.iter().map(|r| r.num_customers).sum(),
            total_distance: routes.iter().map(|r| r.total_distance).sum(),
            total_demand: routes.iter().map(|r| r.total_demand).sum(),
            high_priority_customers: routes.iter().map(|r| r.high_priority_customers).sum(),
            routes,
        })
    }

    /// Mean improvement percentage, 0 without routes.
    pub fn average_improvement(&self) -> f64 {
        if self.routes.is_empty() {
            return 0.0;
        }
        self.routes.iter().map(|r| r.improvement).sum::<f64>() / self.routes.len() as f64
    }
}

/// Consumer of completed runs.
pub trait ReportSink {
    /// Publishes one run.
    fn publish(&mut self, report: &RunReport) -> Result<()>;
}

/// Writes each report as pretty-printed JSON followed by a newline.
///
/// # Examples
///
/// ```
/// use delivery_routing::config::RoutingConfig;
/// use delivery_routing::distance::DegreeApproximation;
/// use delivery_routing::models::Location;
/// use delivery_routing::report::{JsonReportSink, ReportSink, RunReport};
/// use delivery_routing::system::RoutingSystem;
///
/// let depot = Location::new(0.0, 0.0);
/// let system = RoutingSystem::new(depot, RoutingConfig::default(), DegreeApproximation).unwrap();
/// let report = RunReport::from_plan(&system.optimize().unwrap()).unwrap();
///
/// let mut sink = JsonReportSink::new(Vec::new());
/// sink.publish(&report).unwrap();
/// let json = String::from_utf8(sink.into_inner()).unwrap();
/// assert!(json.contains("\"total_routes\": 0"));
/// ```
#[derive(Debug)]
pub struct JsonReportSink<W> {
    writer: W,
}

impl<W: Write> JsonReportSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonReportSink<W> {
    fn publish(&mut self, report: &RunReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Logs a run summary and every route's stops at `info` level.
#[derive(Debug, Default)]
pub struct LogReportSink;

impl ReportSink for LogReportSink {
    fn publish(&mut self, report: &RunReport) -> Result<()> {
        info!(
            routes = report.total_routes,
            customers = report.total_customers,
            seconds = report.total_optimization_time,
            average_improvement = report.average_improvement(),
            "optimisation summary"
        );
        for route in &report.routes {
            info!(
                route = %route.route_id,
                customers = route.num_customers,
                km = route.total_distance / 1000.0,
                feasible = route.time_feasible,
                "route"
            );
            for c in &route.customers {
                info!(
                    route = %route.route_id,
                    customer = c.id,
                    priority = c.priority,
                    demand = c.demand,
                    "stop"
                );
            }
        }
        Ok(())
    }
}
