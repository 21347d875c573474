//! End-to-end scenarios for the routing pipeline.

use delivery_routing::distance::{DegreeApproximation, RoadNetwork, RoadNetworkOracle};
use delivery_routing::evaluation::split_at_midpoint;
use delivery_routing::logging::init_test_logging;
use delivery_routing::models::{Customer, Location, RouteId, TimeWindow, Vehicle};
use delivery_routing::report::{JsonReportSink, ReportSink, RunReport};
use delivery_routing::{RoutingConfig, RoutingError, RoutingSystem, SplitPolicy};

const DEPOT: Location = Location {
    lat: -31.9523,
    lon: 115.8613,
};

fn horizon() -> TimeWindow {
    TimeWindow::from_hours(0.0, 24.0).expect("valid")
}

fn system(config: RoutingConfig) -> RoutingSystem<DegreeApproximation> {
    init_test_logging();
    let mut sys = RoutingSystem::new(DEPOT, config.clone(), DegreeApproximation).expect("valid");
    sys.add_vehicle(Vehicle::new(0, config.vehicle_capacity, DEPOT))
        .expect("valid");
    sys
}

fn suburb(id: u32, lat: f64, lon: f64, demand: f64) -> Customer {
    Customer::new(id, Location::new(lat, lon), demand).with_time_window(horizon())
}

#[test]
fn test_two_customers_share_one_route() {
    let mut sys = system(RoutingConfig::default());
    sys.add_customer(suburb(1, -31.9714, 115.8971, 100.0))
        .expect("valid");
    sys.add_customer(suburb(2, -31.9433, 115.9169, 100.0))
        .expect("valid");

    let plan = sys.optimize().expect("run");
    assert_eq!(plan.num_routes(), 1);
    let stats = &plan.statistics()[&RouteId(0)];
    assert_eq!(stats.num_customers, 2);
    assert!(stats.improvement_percentage.abs() < 1e-9);
    assert!((stats.total_demand - 200.0).abs() < 1e-10);
    assert!(stats.time_feasible);
}

#[test]
fn test_single_late_customer_is_kept_not_dropped() {
    let mut sys = system(RoutingConfig::default());
    // ~17 km away: about 35 minutes at 30 km/h, window closes after 5
    sys.add_customer(
        Customer::new(1, Location::new(-32.0569, 115.7439), 50.0)
            .with_time_window(TimeWindow::new(0.0, 5.0).expect("valid")),
    )
    .expect("valid");

    // a lone stop splits into an empty first half and the full route
    assert_eq!(split_at_midpoint(&[1]), (vec![], vec![1]));

    let plan = sys.optimize().expect("run");
    assert_eq!(plan.num_routes(), 1);
    let route = &plan.routes()[&RouteId(0)];
    assert_eq!(route.len(), 1);
    let stats = &plan.statistics()[&RouteId(0)];
    assert!(!stats.time_feasible);
    assert_eq!(stats.improvement_percentage, 0.0);
}

#[test]
fn test_default_traffic_factor_scales_distances() {
    let customers = [
        suburb(1, -32.0569, 115.7439, 150.0),
        suburb(2, -31.8943, 115.7505, 200.0),
        suburb(3, -31.8915, 116.0010, 250.0),
        suburb(4, -31.9714, 115.8971, 300.0),
        suburb(5, -31.9927, 115.7547, 350.0),
    ];
    let run = |factor: f64| {
        let mut sys = system(RoutingConfig::default().with_traffic_factor(factor));
        for c in &customers {
            sys.add_customer(c.clone()).expect("valid");
        }
        sys.optimize().expect("run")
    };

    let base = run(1.0);
    let doubled = run(2.0);
    assert_eq!(base.routes(), doubled.routes());
    for (id, stats) in base.statistics() {
        let scaled = &doubled.statistics()[id];
        assert!((scaled.final_distance - 2.0 * stats.final_distance).abs() < 1e-6);
        assert!((scaled.initial_distance - 2.0 * stats.initial_distance).abs() < 1e-6);
    }
}

#[test]
fn test_segment_multiplier_only_affects_its_leg() {
    let a = Location::new(-31.9714, 115.8971);
    let customers = [suburb(1, a.lat, a.lon, 100.0)];
    let mut plain = system(RoutingConfig::default().with_traffic_factor(1.0));
    let mut jammed = system(RoutingConfig::default().with_traffic_factor(1.0));
    for c in &customers {
        plain.add_customer(c.clone()).expect("valid");
        jammed.add_customer(c.clone()).expect("valid");
    }
    jammed.set_traffic_multiplier(DEPOT, a, 3.0).expect("valid");

    let leg = DEPOT.degrees_to(&a) * 111_000.0;
    let plain_d = plain.optimize().expect("run").total_distance();
    let jammed_d = jammed.optimize().expect("run").total_distance();
    assert!((plain_d - 2.0 * leg).abs() < 1e-6);
    assert!((jammed_d - 4.0 * leg).abs() < 1e-6);
}

#[test]
fn test_split_ids_follow_constructed_ids() {
    let mut sys = system(RoutingConfig::default().with_capacity(250.0));
    let tight = TimeWindow::new(0.0, 20.0).expect("valid");
    // pairs of close suburbs; every second stop of a pair misses its window
    let pairs = [
        ((-32.0569, 115.7439), (-32.0600, 115.7500)),
        ((-31.7430, 115.7629), (-31.7500, 115.7700)),
        ((-32.1506, 116.0137), (-32.1550, 116.0200)),
    ];
    let mut id = 1;
    for (p, q) in pairs {
        let open = Customer::new(id, Location::new(p.0, p.1), 100.0).with_time_window(horizon());
        let late = Customer::new(id + 1, Location::new(q.0, q.1), 100.0).with_time_window(tight);
        sys.add_customer(open).expect("valid");
        sys.add_customer(late).expect("valid");
        id += 2;
    }

    let plan = sys.optimize().expect("run");
    assert_eq!(plan.num_served(), 6);
    let ids: Vec<usize> = plan.routes().keys().map(|r| r.0).collect();
    // keys are contiguous: constructed ids first, split ids after them
    assert_eq!(ids, (0..ids.len()).collect::<Vec<_>>());
    assert!(ids.len() > 3);
}

#[test]
fn test_recursive_policy_commits_only_feasible_or_single_stops() {
    let config = RoutingConfig::default().with_split_policy(SplitPolicy::Recursive);
    let mut sys = system(config);
    let tight = TimeWindow::new(0.0, 30.0).expect("valid");
    let spots = [
        (-31.9714, 115.8971),
        (-31.9433, 115.9169),
        (-31.8865, 115.9006),
        (-31.9927, 115.7547),
    ];
    for (k, (lat, lon)) in spots.iter().enumerate() {
        let customer =
            Customer::new(k as u32 + 1, Location::new(*lat, *lon), 10.0).with_time_window(tight);
        sys.add_customer(customer).expect("valid");
    }
    let plan = sys.optimize().expect("run");
    assert_eq!(plan.num_served(), 4);
    for (id, stats) in plan.statistics() {
        assert!(stats.time_feasible || plan.routes()[id].len() == 1);
    }
}

#[test]
fn test_road_network_oracle_run() {
    init_test_logging();
    let mut net = RoadNetwork::new();
    let hub = net.add_node(DEPOT);
    let east = net.add_node(Location::new(-31.9714, 115.8971));
    let north = net.add_node(Location::new(-31.8865, 115.9006));
    net.add_two_way_road(hub, east, 4500.0).expect("valid");
    net.add_two_way_road(hub, north, 9000.0).expect("valid");
    net.add_two_way_road(east, north, 10_000.0).expect("valid");

    let config = RoutingConfig::default().with_traffic_factor(1.0);
    let mut sys = RoutingSystem::new(DEPOT, config, RoadNetworkOracle::new(net)).expect("valid");
    sys.add_customer(suburb(1, -31.9714, 115.8971, 100.0))
        .expect("valid");
    sys.add_customer(suburb(2, -31.8865, 115.9006, 100.0))
        .expect("valid");

    let plan = sys.optimize().expect("run");
    assert_eq!(plan.num_served(), 2);
    // depot -> east -> north -> depot over roads
    assert!((plan.total_distance() - 23_500.0).abs() < 1e-6);
}

#[test]
fn test_deadline_error_is_typed() {
    init_test_logging();
    let slow = |a: Location, b: Location| {
        std::thread::sleep(std::time::Duration::from_millis(2));
        a.degrees_to(&b) * 111_000.0
    };
    let mut sys = RoutingSystem::new(DEPOT, RoutingConfig::default().with_time_limit_ms(1), slow)
        .expect("valid");
    sys.add_customer(suburb(1, -31.9714, 115.8971, 100.0))
        .expect("valid");
    let err = sys.optimize().expect_err("deadline");
    assert!(matches!(err, RoutingError::DeadlineExceeded { .. }));
    assert!(err.to_string().contains("time limit"));
}

#[test]
fn test_report_of_perth_like_run() {
    let mut sys = system(RoutingConfig::default());
    let presets = [(0.0, 2.0), (1.0, 3.0), (2.0, 5.0), (0.0, 4.0)];
    let spots = [
        (-32.0569, 115.7439),
        (-31.8943, 115.7505),
        (-31.8915, 116.0010),
        (-32.1506, 116.0137),
        (-31.7430, 115.7629),
        (-31.9714, 115.8971),
    ];
    for (k, (lat, lon)) in spots.iter().enumerate() {
        let i = k as u32 + 1;
        let (s, e) = presets[i as usize % presets.len()];
        sys.add_customer(
            Customer::new(i, Location::new(*lat, *lon), 150.0 + f64::from((i * 50) % 200))
                .with_time_window(TimeWindow::from_hours(s, e).expect("valid"))
                .with_priority(if i % 3 == 0 { 2 } else { 1 }),
        )
        .expect("valid");
    }
    let plan = sys.optimize().expect("run");
    let report = RunReport::from_plan(&plan).expect("report");
    assert_eq!(report.total_customers, spots.len());
    assert_eq!(report.high_priority_customers, 2);

    let mut sink = JsonReportSink::new(Vec::new());
    sink.publish(&report).expect("publish");
    assert!(!sink.into_inner().is_empty());
}

#[test]
fn test_malformed_oracle_distance_aborts_run() {
    init_test_logging();
    let broken = Location::new(-31.9433, 115.9169);
    let oracle = move |a: Location, b: Location| {
        if a == broken || b == broken {
            f64::NAN
        } else {
            a.degrees_to(&b) * 111_000.0
        }
    };
    let mut sys = RoutingSystem::new(DEPOT, RoutingConfig::default(), oracle).expect("valid");
    sys.add_customer(suburb(1, -31.9714, 115.8971, 100.0))
        .expect("valid");
    sys.add_customer(suburb(2, broken.lat, broken.lon, 100.0))
        .expect("valid");

    let err = sys.optimize().expect_err("nan leg");
    assert!(matches!(err, RoutingError::InvalidDistance { .. }));
}

#[test]
fn test_priority_reorder_under_segment_traffic_never_reports_a_loss() {
    let mut sys = system(RoutingConfig::default());
    let urgent = Location::new(-31.9433, 115.9169);
    sys.add_customer(suburb(1, -31.9714, 115.8971, 100.0))
        .expect("valid");
    sys.add_customer(Customer::new(2, urgent, 100.0).with_time_window(horizon()).with_priority(3))
        .expect("valid");
    // the priority order starts on the jammed leg
    sys.set_traffic_multiplier(DEPOT, urgent, 5.0).expect("valid");

    let plan = sys.optimize().expect("run");
    let ids: Vec<u32> = plan.routes()[&RouteId(0)].iter().map(Customer::id).collect();
    assert_eq!(ids, vec![2, 1]);
    let stats = &plan.statistics()[&RouteId(0)];
    assert!(stats.final_distance <= stats.initial_distance);
    assert!(stats.improvement_percentage >= 0.0);
}

#[test]
fn test_vehicle_errors_name_the_vehicle() {
    let mut sys = system(RoutingConfig::default());
    let err = sys
        .add_vehicle(Vehicle::new(4, 1000.0, Location::new(f64::NAN, 0.0)))
        .expect_err("bad location");
    assert!(matches!(err, RoutingError::InvalidVehicle { vehicle_id: 4, .. }));
    assert!(err.to_string().contains("vehicle 4"));

    let err = sys.add_vehicle(Vehicle::new(5, -10.0, DEPOT)).expect_err("bad capacity");
    assert!(matches!(err, RoutingError::InvalidVehicle { vehicle_id: 5, .. }));
    assert_eq!(sys.vehicles().len(), 1);
}
