//! Property tests over randomly generated delivery instances.

use std::collections::BTreeSet;

use delivery_routing::constructive::clarke_wright_savings;
use delivery_routing::distance::{DegreeApproximation, DistanceMatrix};
use delivery_routing::local_search::{route_cost, two_opt_improve};
use delivery_routing::logging::init_test_logging;
use delivery_routing::models::{Customer, Location, TimeWindow};
use delivery_routing::{RoutingConfig, RoutingPlan, RoutingSystem, SplitPolicy};
use proptest::prelude::*;

const DEPOT: Location = Location {
    lat: -31.9523,
    lon: 115.8613,
};

/// (lat offset, lon offset, demand, window start, window length, priority)
type Stop = (f64, f64, f64, f64, f64, i32);

fn stop() -> impl Strategy<Value = Stop> {
    (
        -0.2f64..0.2,
        -0.2f64..0.2,
        0.0f64..400.0,
        0.0f64..120.0,
        10.0f64..400.0,
        1i32..4,
    )
}

fn policy() -> impl Strategy<Value = SplitPolicy> {
    prop_oneof![Just(SplitPolicy::SingleLevel), Just(SplitPolicy::Recursive)]
}

fn customers(stops: &[Stop]) -> Vec<Customer> {
    stops
        .iter()
        .enumerate()
        .map(|(k, &(dlat, dlon, demand, start, len, priority))| {
            Customer::new(
                k as u32 + 1,
                Location::new(DEPOT.lat + dlat, DEPOT.lon + dlon),
                demand,
            )
            .with_time_window(TimeWindow::new(start, start + len).expect("valid window"))
            .with_priority(priority)
        })
        .collect()
}

fn run(stops: &[Stop], config: RoutingConfig) -> RoutingPlan {
    run_with_jams(stops, &[], config)
}

/// Runs with `(stop index, multiplier)` entries set on the legs leaving and
/// entering the depot for those stops.
fn run_with_jams(stops: &[Stop], jams: &[(usize, f64)], config: RoutingConfig) -> RoutingPlan {
    init_test_logging();
    let mut sys = RoutingSystem::new(DEPOT, config, DegreeApproximation).expect("valid system");
    let cs = customers(stops);
    for &(k, factor) in jams {
        if let Some(c) = cs.get(k) {
            sys.set_traffic_multiplier(DEPOT, c.location(), factor).expect("valid factor");
            sys.set_traffic_multiplier(c.location(), DEPOT, factor / 2.0).expect("valid factor");
        }
    }
    for c in cs {
        sys.add_customer(c).expect("valid customer");
    }
    sys.optimize().expect("run")
}

fn constructed_routes(stops: &[Stop], capacity: f64) -> usize {
    let cs = customers(stops);
    let mut locations = vec![DEPOT];
    locations.extend(cs.iter().map(Customer::location));
    let dm = DistanceMatrix::from_oracle(&locations, &DegreeApproximation).expect("valid");
    clarke_wright_savings(&cs, &dm, capacity).len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_customer_served_once(
        stops in prop::collection::vec(stop(), 0..12),
        capacity in 100.0f64..1500.0,
        split_policy in policy(),
    ) {
        let config = RoutingConfig::default()
            .with_capacity(capacity)
            .with_split_policy(split_policy);
        let plan = run(&stops, config);
        let served: Vec<u32> = plan.routes().values().flatten().map(Customer::id).collect();
        let unique: BTreeSet<u32> = served.iter().copied().collect();
        prop_assert_eq!(served.len(), stops.len());
        prop_assert_eq!(unique.len(), stops.len());
        prop_assert!(plan.routes().values().all(|r| !r.is_empty()));
        prop_assert_eq!(plan.routes().len(), plan.statistics().len());
    }

    #[test]
    fn prop_multi_stop_routes_fit_capacity(
        stops in prop::collection::vec(stop(), 0..12),
        capacity in 100.0f64..1500.0,
        split_policy in policy(),
    ) {
        let config = RoutingConfig::default()
            .with_capacity(capacity)
            .with_split_policy(split_policy);
        let plan = run(&stops, config);
        for (id, stops) in plan.routes() {
            let demand: f64 = stops.iter().map(Customer::demand).sum();
            prop_assert!((plan.statistics()[id].total_demand - demand).abs() < 1e-9);
            if stops.len() > 1 {
                prop_assert!(demand <= capacity + 1e-9, "route {} carries {}", id, demand);
            }
        }
    }

    #[test]
    fn prop_final_distance_never_above_initial(
        stops in prop::collection::vec(stop(), 0..12),
        jams in prop::collection::vec((0usize..12, 0.5f64..6.0), 0..6),
        split_policy in policy(),
    ) {
        let config = RoutingConfig::default().with_split_policy(split_policy);
        let plan = run_with_jams(&stops, &jams, config);
        for stats in plan.statistics().values() {
            prop_assert!(stats.final_distance <= stats.initial_distance * (1.0 + 1e-12) + 1e-9);
            prop_assert!(stats.improvement_percentage >= -1e-9);
        }
    }

    #[test]
    fn prop_two_opt_never_worsens(
        points in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 3..10),
        factor in 0.5f64..3.0,
    ) {
        let mut nodes = vec![Location::new(0.0, 0.0)];
        nodes.extend(points.iter().map(|&(a, b)| Location::new(a, b)));
        let dm = DistanceMatrix::from_oracle(&nodes, &DegreeApproximation).expect("valid");
        let mut traffic = delivery_routing::distance::TrafficTable::new(factor).expect("valid");
        traffic.set(nodes[1], nodes[2], factor * 2.0).expect("valid");
        let costs = dm.weighted(&nodes, &traffic);

        let route: Vec<usize> = (1..nodes.len()).collect();
        let before = route_cost(&route, 0, &costs);
        let (improved, after) = two_opt_improve(&route, 0, &costs);
        prop_assert!(after <= before + 1e-9);
        let mut sorted = improved.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, route);
    }

    #[test]
    fn prop_runs_are_deterministic(
        stops in prop::collection::vec(stop(), 0..12),
        capacity in 100.0f64..1500.0,
        split_policy in policy(),
    ) {
        let config = RoutingConfig::default()
            .with_capacity(capacity)
            .with_split_policy(split_policy);
        let a = run(&stops, config.clone());
        let b = run(&stops, config);
        prop_assert_eq!(a.routes(), b.routes());
        prop_assert_eq!(a.statistics(), b.statistics());
    }

    #[test]
    fn prop_split_ids_come_after_constructed_ids(
        stops in prop::collection::vec(stop(), 0..12),
        capacity in 100.0f64..1500.0,
        split_policy in policy(),
    ) {
        let config = RoutingConfig::default()
            .with_capacity(capacity)
            .with_split_policy(split_policy);
        let constructed = constructed_routes(&stops, capacity);
        let plan = run(&stops, config);
        let ids: Vec<usize> = plan.routes().keys().map(|r| r.0).collect();
        // every constructed id survives, split ids fill the range after them
        prop_assert!(ids.len() >= constructed);
        prop_assert_eq!(ids, (0..plan.num_routes()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_default_factor_scales_distances(
        stops in prop::collection::vec(stop(), 0..10),
        factor in prop_oneof![Just(0.5f64), Just(2.0), Just(4.0)],
    ) {
        let base = run(&stops, RoutingConfig::default().with_traffic_factor(1.0));
        let scaled = run(&stops, RoutingConfig::default().with_traffic_factor(factor));
        prop_assert_eq!(base.routes(), scaled.routes());
        for (id, stats) in base.statistics() {
            let expected = stats.final_distance * factor;
            let got = scaled.statistics()[id].final_distance;
            prop_assert!((got - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
