//! Intra-route 2-opt improvement under traffic-weighted costs.
//!
//! # Algorithm
//!
//! Repeatedly tries to reverse a contiguous segment `[i, j)` of the route.
//! Legs are charged from a traffic-weighted matrix, which is generally
//! asymmetric, so the change accounts for every reversed interior leg:
//!
//! ```text
//! delta = c(prev, r[j-1]) + Σ c(r[k+1], r[k]) + c(r[i], next)
//!       - c(prev, r[i])   - Σ c(r[k], r[k+1]) - c(r[j-1], next)
//! ```
//!
//! The first improving reversal is applied and the scan restarts from the
//! beginning (first-improvement strategy) until a full pass finds nothing.
//! The route cost strictly decreases with every accepted move, so the search
//! terminates.
//!
//! # Complexity
//!
//! O(n³) per pass, since each candidate walks its segment.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Applies 2-opt improvement to a single route (given as a sequence of node indices).
///
/// The route is assumed to start and end at `depot`. Routes with fewer than
/// three stops are returned unchanged. Returns the improved sequence and its
/// cost, which is never above the cost of the input.
///
/// # Arguments
///
/// * `route` — Ordered node indices (excluding depot)
/// * `depot` — Depot node index
/// * `costs` — Traffic-weighted leg costs
///
/// # Examples
///
/// ```
/// use delivery_routing::distance::DistanceMatrix;
/// use delivery_routing::local_search::{route_cost, two_opt_improve};
/// use delivery_routing::models::Location;
///
/// let nodes = vec![
///     Location::new(0.0, 0.0),
///     Location::new(1.0, 1.0),
///     Location::new(2.0, 0.0),
///     Location::new(1.0, -1.0),
/// ];
/// let planar = |a: Location, b: Location| a.degrees_to(&b);
/// let dm = DistanceMatrix::from_oracle(&nodes, &planar).unwrap();
///
/// // 1 → 3 → 2 crosses itself
/// let (improved, cost) = two_opt_improve(&[1, 3, 2], 0, &dm);
/// assert_eq!(improved, vec![1, 2, 3]);
/// assert!(cost < route_cost(&[1, 3, 2], 0, &dm));
/// ```
pub fn two_opt_improve(
    route: &[usize],
    depot: usize,
    costs: &DistanceMatrix,
) -> (Vec<usize>, f64) {
    let mut current = route.to_vec();
    let mut current_cost = route_cost(&current, depot, costs);
    if current.len() < 3 {
        return (current, current_cost);
    }

    let n = current.len();
    'search: loop {
        for i in 0..n - 1 {
            for j in (i + 2)..=n {
                if reversal_delta(&current, depot, costs, i, j) >= -IMPROVEMENT_EPS {
                    continue;
                }
                let mut candidate = current.clone();
                candidate[i..j].reverse();
                let candidate_cost = route_cost(&candidate, depot, costs);
                if candidate_cost < current_cost - IMPROVEMENT_EPS {
                    current = candidate;
                    current_cost = candidate_cost;
                    continue 'search;
                }
            }
        }
        break;
    }

    (current, current_cost)
}

/// Cost change from reversing `route[i..j]`.
fn reversal_delta(
    route: &[usize],
    depot: usize,
    costs: &DistanceMatrix,
    i: usize,
    j: usize,
) -> f64 {
    let prev = if i == 0 { depot } else { route[i - 1] };
    let next = if j == route.len() { depot } else { route[j] };
    let segment = &route[i..j];

    let mut old_cost = costs.get(prev, segment[0]) + costs.get(segment[segment.len() - 1], next);
    let mut new_cost = costs.get(prev, segment[segment.len() - 1]) + costs.get(segment[0], next);
    for pair in segment.windows(2) {
        old_cost += costs.get(pair[0], pair[1]);
        new_cost += costs.get(pair[1], pair[0]);
    }

    new_cost - old_cost
}

/// Total cost of a route: `depot → route[0] → ... → route[n-1] → depot`.
///
/// Zero for an empty route.
pub fn route_cost(route: &[usize], depot: usize, costs: &DistanceMatrix) -> f64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0.0;
    };
    let mut cost = costs.get(depot, first);
    for pair in route.windows(2) {
        cost += costs.get(pair[0], pair[1]);
    }
    cost + costs.get(last, depot)
}
