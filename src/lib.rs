//! # delivery-routing
//!
//! Delivery route planning for a capacity-limited fleet serving customers
//! with demands, priorities and arrival time windows.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Customer, Vehicle, RouteId, RouteStatistics)
//! - [`distance`] — Distance oracles, road network, traffic table, distance matrix
//! - [`constructive`] — Clarke-Wright savings construction
//! - [`local_search`] — Traffic-aware 2-opt
//! - [`evaluation`] — Time-window feasibility and route splitting
//! - [`system`] — The orchestrator running construct → improve → split
//! - [`report`] — Reporting sinks (JSON, log)
//! - [`config`], [`error`], [`logging`] — Run configuration, errors, tracing setup

pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod logging;
pub mod models;
pub mod report;
pub mod system;

pub use config::{RoutingConfig, SplitPolicy};
pub use error::{Result, RoutingError};
pub use system::{RoutingPlan, RoutingSystem};
