//! Clarke-Wright savings algorithm.
//!
//! # Algorithm
//!
//! Every customer starts on its own route (depot → customer → depot). The
//! saving of serving two customers on one route is
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! All pairs are pushed into a max-heap keyed by saving; equal savings pop
//! in ascending `(i, j)` order. For each popped pair whose endpoints have
//! not anchored a merge yet, the two routes holding them are concatenated
//! if their combined demand fits the shared capacity. Both endpoints are
//! then marked, so each customer anchors at most one merge.
//!
//! Surviving routes keep the order of a list where merged routes are
//! removed and their concatenation appended at the end.
//!
//! # Complexity
//!
//! O(n²) savings, O(n² log n) heap processing.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::distance::{DistanceMatrix, DEPOT};
use crate::models::Customer;

/// A savings value for merging two customers' routes.
#[derive(Debug, Clone, Copy)]
struct Saving {
    i: usize,
    j: usize,
    value: f64,
}

impl PartialEq for Saving {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Saving {}

impl Ord for Saving {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            // lower pair pops first on ties
            .then_with(|| other.i.cmp(&self.i))
            .then_with(|| other.j.cmp(&self.j))
    }
}

impl PartialOrd for Saving {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Partitions customers into routes with the Clarke-Wright savings algorithm.
///
/// Returns routes as matrix node indices (customer `k` of the slice is node
/// `k + 1`, the depot is node 0 and is not stored). Every customer appears
/// in exactly one route; a customer whose demand alone exceeds `capacity`
/// stays on a singleton route.
///
/// # Arguments
///
/// * `customers` — Customers in insertion order (depot excluded)
/// * `distances` — Raw distance matrix over `[depot, customers...]`
/// * `capacity` — Capacity shared by all vehicles
///
/// # Examples
///
/// ```
/// use delivery_routing::constructive::clarke_wright_savings;
/// use delivery_routing::distance::DistanceMatrix;
/// use delivery_routing::models::{Customer, Location};
///
/// let depot = Location::new(0.0, 0.0);
/// let customers = vec![
///     Customer::new(1, Location::new(0.0, 1.0), 100.0),
///     Customer::new(2, Location::new(0.0, 2.0), 100.0),
/// ];
/// let mut locations = vec![depot];
/// locations.extend(customers.iter().map(|c| c.location()));
/// let planar = |a: Location, b: Location| a.degrees_to(&b);
/// let dm = DistanceMatrix::from_oracle(&locations, &planar).unwrap();
///
/// let routes = clarke_wright_savings(&customers, &dm, 1000.0);
/// assert_eq!(routes, vec![vec![1, 2]]);
/// ```
pub fn clarke_wright_savings(
    customers: &[Customer],
    distances: &DistanceMatrix,
    capacity: f64,
) -> Vec<Vec<usize>> {
    let n = customers.len();
    if n == 0 {
        return Vec::new();
    }

    let mut savings = BinaryHeap::with_capacity(n * (n - 1) / 2);
    for i in 1..=n {
        for j in (i + 1)..=n {
            let value =
                distances.get(DEPOT, i) + distances.get(DEPOT, j) - distances.get(i, j);
            savings.push(Saving { i, j, value });
        }
    }

    // Route slot `s` starts as the singleton of node `s + 1`.
    let mut members: Vec<Vec<usize>> = (1..=n).map(|node| vec![node]).collect();
    let mut load: Vec<f64> = customers.iter().map(Customer::demand).collect();
    let mut created: Vec<usize> = (0..n).collect();
    let mut next_created = n;
    let mut slot_of: Vec<usize> = (0..=n).map(|node| node.saturating_sub(1)).collect();
    let mut anchored = vec![false; n + 1];
    let mut merges = 0usize;

    while let Some(Saving { i, j, value }) = savings.pop() {
        if anchored[i] || anchored[j] {
            continue;
        }
        let (si, sj) = (slot_of[i], slot_of[j]);
        if si == sj {
            continue;
        }
        let combined = load[si] + load[sj];
        if combined > capacity {
            continue;
        }

        let mut moved = std::mem::take(&mut members[sj]);
        for &node in &moved {
            slot_of[node] = si;
        }
        members[si].append(&mut moved);
        load[si] = combined;
        load[sj] = 0.0;
        created[si] = next_created;
        next_created += 1;
        anchored[i] = true;
        anchored[j] = true;
        merges += 1;
        debug!(i, j, saving = value, load = combined, "merged routes");
    }

    let mut slots: Vec<usize> = (0..n).filter(|&s| !members[s].is_empty()).collect();
    slots.sort_by_key(|&s| created[s]);
    debug!(customers = n, merges, routes = slots.len(), "savings construction done");

    slots
        .into_iter()
        .map(|s| std::mem::take(&mut members[s]))
        .collect()
}
