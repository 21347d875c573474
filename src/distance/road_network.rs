//! In-memory road graph with nearest-node snapping and Dijkstra.
//!
//! # Algorithm
//!
//! Both endpoints are snapped to their nearest graph node. The distance is
//! the approximate access leg to the first node, the shortest road path
//! between the snapped nodes, and the approximate egress leg:
//!
//! ```text
//! d(a, b) = approx(a, snap(a)) + path(snap(a), snap(b)) + approx(snap(b), b)
//! ```
//!
//! When the graph is empty or the nodes are disconnected the oracle falls
//! back to [`DegreeApproximation`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, warn};

use super::{DegreeApproximation, DistanceOracle};
use crate::error::{Result, RoutingError};
use crate::models::Location;

#[derive(Debug, Clone, Copy)]
struct Road {
    to: usize,
    meters: f64,
}

/// A directed road graph. Node ids are insertion indices.
///
/// # Examples
///
/// ```
/// use delivery_routing::distance::RoadNetwork;
/// use delivery_routing::models::Location;
///
/// let mut net = RoadNetwork::new();
/// let a = net.add_node(Location::new(0.0, 0.0));
/// let b = net.add_node(Location::new(0.0, 0.01));
/// let c = net.add_node(Location::new(0.01, 0.01));
/// net.add_two_way_road(a, b, 1200.0).unwrap();
/// net.add_road(b, c, 1500.0).unwrap();
/// assert!(net.add_road(c, 7, 10.0).is_err());
///
/// assert_eq!(net.shortest_path(a, c), Some(2700.0));
/// assert_eq!(net.shortest_path(c, a), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: Vec<Location>,
    roads: Vec<Vec<Road>>,
}

impl RoadNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an intersection and returns its id.
    pub fn add_node(&mut self, location: Location) -> usize {
        self.nodes.push(location);
        self.roads.push(Vec::new());
        self.nodes.len() - 1
    }

    /// Adds a one-way road of the given length in meters.
    ///
    /// Both nodes must exist and the length must be finite and non-negative.
    pub fn add_road(&mut self, from: usize, to: usize, meters: f64) -> Result<()> {
        self.check_road(from, to, meters)?;
        self.roads[from].push(Road { to, meters });
        Ok(())
    }

    /// Adds a road usable in both directions. Nothing is added on error.
    pub fn add_two_way_road(&mut self, a: usize, b: usize, meters: f64) -> Result<()> {
        self.check_road(a, b, meters)?;
        self.roads[a].push(Road { to: b, meters });
        self.roads[b].push(Road { to: a, meters });
        Ok(())
    }

    fn check_road(&self, from: usize, to: usize, meters: f64) -> Result<()> {
        for node in [from, to] {
            if node >= self.nodes.len() {
                return Err(RoutingError::UnknownRoadNode(node));
            }
        }
        if !(meters.is_finite() && meters >= 0.0) {
            return Err(RoutingError::InvalidRoadLength { from, to, meters });
        }
        Ok(())
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the network has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Location of a node.
    pub fn node_location(&self, node: usize) -> Option<Location> {
        self.nodes.get(node).copied()
    }

    /// Node closest to `location` (straight-line), lowest id on ties.
    pub fn nearest_node(&self, location: Location) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(id, n)| (id, n.degrees_to(&location)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Length of the shortest road path, `None` if `to` is unreachable.
    pub fn shortest_path(&self, from: usize, to: usize) -> Option<f64> {
        let n = self.nodes.len();
        if from >= n || to >= n {
            return None;
        }

        let mut best = vec![f64::INFINITY; n];
        let mut heap = BinaryHeap::new();
        best[from] = 0.0;
        heap.push(Frontier {
            cost: 0.0,
            node: from,
        });

        while let Some(Frontier { cost, node }) = heap.pop() {
            if node == to {
                return Some(cost);
            }
            if cost > best[node] {
                continue;
            }
            for road in &self.roads[node] {
                let next = cost + road.meters;
                if next < best[road.to] {
                    best[road.to] = next;
                    heap.push(Frontier {
                        cost: next,
                        node: road.to,
                    });
                }
            }
        }
        None
    }
}

/// Min-heap entry for Dijkstra.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap pops the cheapest first
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Distance oracle backed by a [`RoadNetwork`].
#[derive(Debug, Clone)]
pub struct RoadNetworkOracle {
    network: RoadNetwork,
    fallback: DegreeApproximation,
}

impl RoadNetworkOracle {
    /// Wraps a network.
    pub fn new(network: RoadNetwork) -> Self {
        if network.is_empty() {
            warn!("road network is empty, distances use the degree approximation");
        }
        Self {
            network,
            fallback: DegreeApproximation,
        }
    }

    /// The underlying network.
    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }
}

impl DistanceOracle for RoadNetworkOracle {
    fn distance(&self, from: Location, to: Location) -> f64 {
        let (Some(a), Some(b)) = (self.network.nearest_node(from), self.network.nearest_node(to))
        else {
            return self.fallback.distance(from, to);
        };

        match self.network.shortest_path(a, b) {
            Some(path) => {
                // both snapped nodes exist, so the locations are present
                let snap_a = self.network.nodes[a];
                let snap_b = self.network.nodes[b];
                let total = self.fallback.distance(from, snap_a)
                    + path
                    + self.fallback.distance(snap_b, to);
                debug!(from_node = a, to_node = b, meters = total, "road distance");
                total
            }
            None => {
                warn!(from_node = a, to_node = b, "no road path, using approximation");
                self.fallback.distance(from, to)
            }
        }
    }
}
