mod common;

use common::{assert_well_formed, at, request_from_a_to_c, stop, two_option_network};
use rangeraptor_core::prelude::*;

fn service() -> RaptorService {
    RaptorService::new(RaptorTuningParameters::default())
}

fn weakly_dominates(a: &Path, b: &Path) -> bool {
    a.end_time <= b.end_time && a.number_of_transfers <= b.number_of_transfers && a.c1 <= b.c1
}

#[test]
fn no_path_dominates_another() {
    let data = two_option_network();
    let request = request_from_a_to_c(&data, RaptorProfile::MultiCriteria).build();
    let response = service().route(&data, &request).unwrap();

    assert_eq!(response.paths.len(), 2);
    for (i, a) in response.paths.iter().enumerate() {
        assert_well_formed(a);
        for (j, b) in response.paths.iter().enumerate() {
            if i != j {
                assert!(!weakly_dominates(a, b), "{a} dominates {b}");
            }
        }
    }

    let fast = &response.paths[0];
    assert_eq!(fast.end_time, at("09:40"));
    assert_eq!(fast.number_of_transfers, 1);
    // 10m walk, two boardings, 10m and 15m riding and 5m waiting at B
    assert_eq!(fast.c1, 120_000 + 12_000 + 60_000 + 12_000 + 30_000 + 90_000);

    let direct = &response.paths[1];
    assert_eq!(direct.end_time, at("10:00"));
    assert_eq!(direct.number_of_transfers, 0);
    assert_eq!(direct.c1, 120_000 + 12_000 + 300_000);
}

#[test]
fn path_leg_costs_add_up_to_path_cost() {
    let data = two_option_network();
    let request = request_from_a_to_c(&data, RaptorProfile::MultiCriteria).build();
    let response = service().route(&data, &request).unwrap();
    for path in &response.paths {
        let sum: Cost = path.legs.iter().map(PathLeg::c1).sum();
        assert_eq!(sum, path.c1, "{path}");
    }
}

/// Two routes from A to D, the faster one via B and the slower one via C
fn two_route_network(groups: bool) -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    builder
        .route("R1", |r| {
            r.stops(&["A", "B", "D"]).schedule("fast", "09:10 09:20 09:30");
            if groups {
                r.priority_group(1);
            }
        })
        .route("R2", |r| {
            r.stops(&["A", "C", "D"]).schedule("slow", "09:10 09:25 09:40");
            if groups {
                r.priority_group(2);
            }
        });
    builder.build()
}

fn request_from_a_to_d(data: &PublicTransitData) -> RaptorRequestBuilder {
    RaptorRequest::builder()
        .profile(RaptorProfile::MultiCriteria)
        .earliest_departure_time(at("09:00"))
        .search_window(0)
        .access(AccessEgress::walk(stop(data, "A"), 600))
        .egress(AccessEgress::walk(stop(data, "D"), 0))
}

#[test]
fn pass_through_point_is_visited_on_board() {
    let data = two_route_network(false);
    let c = stop(&data, "C");

    let plain = service()
        .route(&data, &request_from_a_to_d(&data).build())
        .unwrap();
    assert_eq!(plain.paths.len(), 1);
    assert_eq!(plain.paths[0].end_time, at("09:30"));
    assert!(!plain.paths[0].visited_stops().contains(&c));

    let request = request_from_a_to_d(&data)
        .pass_through(PassThroughPoint::new("C", &[c]))
        .build();
    let response = service().route(&data, &request).unwrap();
    assert_eq!(response.paths.len(), 1);
    let path = &response.paths[0];
    assert_eq!(path.end_time, at("09:40"));
    assert!(path.visited_stops().contains(&c));
    assert_eq!(path.c2, Some(1));
}

fn reverse_request_to_d(data: &PublicTransitData, latest_arrival: &str) -> RaptorRequestBuilder {
    RaptorRequest::builder()
        .profile(RaptorProfile::MultiCriteria)
        .direction(SearchDirection::Reverse)
        .latest_arrival_time(at(latest_arrival))
        .search_window(0)
        .access(AccessEgress::walk(stop(data, "A"), 600))
        .egress(AccessEgress::walk(stop(data, "D"), 0))
}

#[test]
fn reverse_pass_through_point_is_visited_on_board() {
    let data = two_route_network(false);
    let c = stop(&data, "C");
    let request = reverse_request_to_d(&data, "09:40")
        .pass_through(PassThroughPoint::new("C", &[c]))
        .build();
    let response = service().route(&data, &request).unwrap();
    assert_eq!(response.paths.len(), 1);
    let path = &response.paths[0];
    assert_well_formed(path);
    assert_eq!((path.start_time, path.end_time), (at("09:00"), at("09:40")));
    assert_eq!(path.number_of_transfers, 0);
    assert!(path.visited_stops().contains(&c));
    assert_eq!(path.c2, Some(1));
}

/// One line A -> B -> C -> D, 09:10 -> 09:40
fn single_line_network() -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    builder.route("R1", |r| {
        r.stops(&["A", "B", "C", "D"])
            .schedule("t1", "09:10 09:20 09:30 09:40");
    });
    builder.build()
}

#[test]
fn pass_through_order_holds_in_both_directions() {
    let data = single_line_network();
    let b = PassThroughPoint::new("B", &[stop(&data, "B")]);
    let c = PassThroughPoint::new("C", &[stop(&data, "C")]);
    let forward = || request_from_a_to_d(&data);
    let reverse = || reverse_request_to_d(&data, "09:40");

    for builder in [forward(), reverse()] {
        let in_order = builder
            .pass_through(b.clone())
            .pass_through(c.clone())
            .build();
        let response = service().route(&data, &in_order).unwrap();
        assert_eq!(response.paths.len(), 1, "{:?}", in_order.direction);
        let path = &response.paths[0];
        assert_eq!((path.start_time, path.end_time), (at("09:00"), at("09:40")));
        assert_eq!(path.c2, Some(2));
    }

    for builder in [forward(), reverse()] {
        let out_of_order = builder
            .pass_through(c.clone())
            .pass_through(b.clone())
            .build();
        let response = service().route(&data, &out_of_order).unwrap();
        assert!(response.is_empty(), "{:?}", out_of_order.direction);
    }
}

#[test]
fn pass_through_points_must_be_visited_in_order() {
    let data = two_route_network(false);
    let request = request_from_a_to_d(&data)
        .pass_through(PassThroughPoint::new("C", &[stop(&data, "C")]))
        .pass_through(PassThroughPoint::new("B", &[stop(&data, "B")]))
        .build();
    let response = service().route(&data, &request).unwrap();
    assert!(response.paths.is_empty());
}

#[test]
fn different_priority_groups_do_not_compete() {
    let data = two_route_network(true);

    let plain = service()
        .route(&data, &request_from_a_to_d(&data).build())
        .unwrap();
    assert_eq!(plain.paths.len(), 1);

    let request = request_from_a_to_d(&data).transit_group_priority(true).build();
    let response = service().route(&data, &request).unwrap();
    let ends: Vec<Time> = response.paths.iter().map(|p| p.end_time).collect();
    assert_eq!(ends, vec![at("09:30"), at("09:40")]);
    assert_ne!(response.paths[0].c2, response.paths[1].c2);
}

/// A -> C direct, or A -> V -> C changing at V
fn via_network() -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    builder
        .route("R1", |r| {
            r.stops(&["A", "V"]).schedule("to_v", "09:10 09:20");
        })
        .route("R2", |r| {
            r.stops(&["V", "C"]).schedule("from_v", "09:25 09:40");
        })
        .route("R3", |r| {
            r.stops(&["A", "C"]).schedule("direct", "09:10 09:30");
        });
    builder.build()
}

#[test]
fn via_location_forces_a_stop() {
    let data = via_network();
    let v = stop(&data, "V");

    let plain = service()
        .route(
            &data,
            &request_from_a_to_c(&data, RaptorProfile::MultiCriteria).build(),
        )
        .unwrap();
    assert_eq!(plain.paths.len(), 1);
    assert_eq!(plain.paths[0].end_time, at("09:30"));

    let request = request_from_a_to_c(&data, RaptorProfile::MultiCriteria)
        .via(ViaLocation::new("V").stop(v))
        .build();
    let response = service().route(&data, &request).unwrap();
    assert_eq!(response.paths.len(), 1);
    let path = &response.paths[0];
    assert_well_formed(path);
    assert_eq!(path.end_time, at("09:40"));
    assert_eq!(path.number_of_transfers, 1);
    assert!(path.visited_stops().contains(&v));
}

/// One line A -> B -> C every ten minutes from 09:10
fn frequent_line_network() -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    builder.route("R1", |r| {
        r.stops(&["A", "B", "C"])
            .schedule("t1", "09:10 09:20 09:30")
            .schedule("t2", "09:20 09:30 09:40")
            .schedule("t3", "09:30 09:40 09:50");
    });
    builder.build()
}

#[test]
fn via_stop_is_a_stop_over_and_pass_through_is_not() {
    let data = frequent_line_network();
    let b = stop(&data, "B");

    let via = request_from_a_to_c(&data, RaptorProfile::MultiCriteria)
        .via(ViaLocation::new("B").stop(b))
        .build();
    let response = service().route(&data, &via).unwrap();
    assert_eq!(response.paths.len(), 1);
    let path = &response.paths[0];
    assert_well_formed(path);
    // Alights t1 at B and boards t2 after the transfer slack
    assert_eq!(path.end_time, at("09:40"));
    assert_eq!(path.number_of_transfers, 1);
    let trips: Vec<&str> = path
        .legs
        .iter()
        .filter_map(|leg| match leg {
            PathLeg::Transit { trip_id, .. } => Some(trip_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(trips, vec!["t1", "t2"]);

    let pass_through = request_from_a_to_c(&data, RaptorProfile::MultiCriteria)
        .pass_through(PassThroughPoint::new("B", &[b]))
        .build();
    let response = service().route(&data, &pass_through).unwrap();
    assert_eq!(response.paths.len(), 1);
    let path = &response.paths[0];
    assert_eq!(path.end_time, at("09:30"));
    assert_eq!(path.number_of_transfers, 0);
    assert_eq!(path.c2, Some(1));
}

#[test]
fn via_max_wait_limits_the_connection() {
    let data = via_network();
    let request = request_from_a_to_c(&data, RaptorProfile::MultiCriteria)
        .via(ViaLocation::new("V").stop(stop(&data, "V")).with_max_wait(60))
        .build();
    let response = service().route(&data, &request).unwrap();
    assert!(response.paths.is_empty());
}

#[test]
fn via_min_wait_delays_the_next_boarding() {
    let data = via_network();
    // 09:20 + 10m is after the only departure from V
    let request = request_from_a_to_c(&data, RaptorProfile::MultiCriteria)
        .via(ViaLocation::new("V").stop(stop(&data, "V")).with_min_wait(600))
        .build();
    let response = service().route(&data, &request).unwrap();
    assert!(response.paths.is_empty());
}

#[test]
fn timetable_view_keeps_every_departure_across_iterations() {
    let mut builder = TransitDataBuilder::new();
    builder.route("L1", |r| {
        r.stops(&["A", "C"])
            .schedule("t1", "09:10 09:40")
            .schedule("t2", "09:20 09:50")
            .schedule("t3", "09:30 10:00");
    });
    let data = builder.build();

    let request = request_from_a_to_c(&data, RaptorProfile::MultiCriteria)
        .search_window(30 * 60)
        .timetable(true)
        .build();
    let response = service().route(&data, &request).unwrap();
    let starts: Vec<Time> = response.paths.iter().map(|p| p.start_time).collect();
    assert_eq!(starts, vec![at("09:00"), at("09:10"), at("09:20")]);

    // Without the timetable view only the earliest arrival survives
    let request = request_from_a_to_c(&data, RaptorProfile::MultiCriteria)
        .search_window(30 * 60)
        .build();
    let response = service().route(&data, &request).unwrap();
    assert_eq!(response.paths.len(), 1);
    assert_eq!(response.paths[0].end_time, at("09:40"));
}

#[test]
fn num_itineraries_crops_and_suggests_a_smaller_window() {
    let mut builder = TransitDataBuilder::new();
    builder.route("L1", |r| {
        r.stops(&["A", "C"])
            .schedule("t1", "09:10 09:40")
            .schedule("t2", "09:40 10:10")
            .schedule("t3", "10:10 10:40");
    });
    let data = builder.build();
    let request = request_from_a_to_c(&data, RaptorProfile::Standard)
        .search_window(90 * 60)
        .num_itineraries(2)
        .build();
    let response = service().route(&data, &request).unwrap();

    let starts: Vec<Time> = response.paths.iter().map(|p| p.start_time).collect();
    assert_eq!(starts, vec![at("09:00"), at("09:30")]);
    // The dropped path starts one hour into the window
    assert_eq!(response.next_search_window, 3600);
}
