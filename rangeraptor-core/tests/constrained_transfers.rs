mod common;

use common::{assert_well_formed, at, request_from_a_to_c, stop};
use rangeraptor_core::prelude::*;

/// R1 reaches B at 09:30. R2 leaves B at 09:30 and 10:00, the first one
/// too close for the regular two minute transfer slack.
fn interlined_network(constraint: Option<TransferConstraint>) -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    builder
        .route("R1", |r| {
            r.stops(&["A", "B"]).schedule("t1", "09:10 09:30");
        })
        .route("R2", |r| {
            r.stops(&["B", "C"])
                .schedule("t2", "09:30 09:50")
                .schedule("t3", "10:00 10:20");
        });
    if let Some(constraint) = constraint {
        builder.constrained_transfer("t1", "B", "t2", "B", constraint);
    }
    builder.build()
}

fn route(data: &PublicTransitData, profile: RaptorProfile) -> RaptorResponse {
    let request = request_from_a_to_c(data, profile)
        .constrained_transfers(true)
        .build();
    RaptorService::new(RaptorTuningParameters::default())
        .route(data, &request)
        .unwrap()
}

/// Arrive-by search at C, same legs as `route`
fn route_reverse(
    data: &PublicTransitData,
    profile: RaptorProfile,
    latest_arrival: &str,
) -> RaptorResponse {
    let request = RaptorRequest::builder()
        .profile(profile)
        .direction(SearchDirection::Reverse)
        .latest_arrival_time(at(latest_arrival))
        .search_window(0)
        .access(AccessEgress::walk(stop(data, "A"), 600))
        .egress(AccessEgress::walk(stop(data, "C"), 0))
        .constrained_transfers(true)
        .build();
    RaptorService::new(RaptorTuningParameters::default())
        .route(data, &request)
        .unwrap()
}

const PROFILES: [RaptorProfile; 2] = [RaptorProfile::Standard, RaptorProfile::MultiCriteria];

#[test]
fn regular_transfer_respects_transfer_slack() {
    let data = interlined_network(None);
    for profile in [RaptorProfile::Standard, RaptorProfile::MultiCriteria] {
        let response = route(&data, profile);
        assert_eq!(response.paths.len(), 1, "{profile:?}");
        let path = &response.paths[0];
        assert_eq!(path.end_time, at("10:20"));
        assert_eq!(path.number_of_transfers, 1);
    }
}

#[test]
fn stay_seated_continues_on_the_next_trip() {
    let data = interlined_network(Some(TransferConstraint::stay_seated()));
    for profile in [RaptorProfile::Standard, RaptorProfile::MultiCriteria] {
        let response = route(&data, profile);
        assert_eq!(response.paths.len(), 1, "{profile:?}");
        let path = &response.paths[0];
        assert_well_formed(path);
        assert_eq!(path.end_time, at("09:50"));
        assert_eq!(path.number_of_transfers, 0);
        let seated = path
            .legs
            .iter()
            .filter(|leg| matches!(leg, PathLeg::Transit { stay_seated: true, .. }))
            .count();
        assert_eq!(seated, 1);
    }
}

#[test]
fn guaranteed_transfer_skips_the_slack_but_counts() {
    let data = interlined_network(Some(TransferConstraint::guaranteed()));
    for profile in [RaptorProfile::Standard, RaptorProfile::MultiCriteria] {
        let response = route(&data, profile);
        assert_eq!(response.paths.len(), 1, "{profile:?}");
        let path = &response.paths[0];
        assert_eq!(path.end_time, at("09:50"));
        assert_eq!(path.number_of_transfers, 1);
    }
}

#[test]
fn reverse_search_stays_seated() {
    let data = interlined_network(Some(TransferConstraint::stay_seated()));
    for profile in PROFILES {
        let response = route_reverse(&data, profile, "09:50");
        assert_eq!(response.paths.len(), 1, "{profile:?}");
        let path = &response.paths[0];
        assert_well_formed(path);
        assert_eq!((path.start_time, path.end_time), (at("09:00"), at("09:50")));
        assert_eq!(path.number_of_transfers, 0, "{profile:?}");
        let seated = path
            .legs
            .iter()
            .filter(|leg| matches!(leg, PathLeg::Transit { stay_seated: true, .. }))
            .count();
        assert_eq!(seated, 1, "{profile:?}");
    }
}

#[test]
fn reverse_search_without_constraint_misses_the_tight_connection() {
    let data = interlined_network(None);
    for profile in PROFILES {
        assert!(route_reverse(&data, profile, "09:50").is_empty(), "{profile:?}");
    }
}

#[test]
fn reverse_search_uses_guaranteed_transfer() {
    let data = interlined_network(Some(TransferConstraint::guaranteed()));
    for profile in PROFILES {
        let response = route_reverse(&data, profile, "09:50");
        assert_eq!(response.paths.len(), 1, "{profile:?}");
        let path = &response.paths[0];
        assert_well_formed(path);
        assert_eq!((path.start_time, path.end_time), (at("09:00"), at("09:50")));
        assert_eq!(path.number_of_transfers, 1, "{profile:?}");
    }
}

#[test]
fn constraints_are_ignored_unless_enabled() {
    let data = interlined_network(Some(TransferConstraint::stay_seated()));
    let request = request_from_a_to_c(&data, RaptorProfile::Standard).build();
    let response = RaptorService::new(RaptorTuningParameters::default())
        .route(&data, &request)
        .unwrap();
    assert_eq!(response.paths[0].end_time, at("10:20"));
}

/// R1 reaches B at 09:30, R2 leaves B at 09:40 and 10:10. Changing from
/// t1 to t2 is forbidden.
fn not_allowed_network() -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    builder
        .route("R1", |r| {
            r.stops(&["A", "B"]).schedule("t1", "09:10 09:30");
        })
        .route("R2", |r| {
            r.stops(&["B", "C"])
                .schedule("t2", "09:40 10:00")
                .schedule("t3", "10:10 10:30");
        })
        .constrained_transfer("t1", "B", "t2", "B", TransferConstraint::not_allowed());
    builder.build()
}

#[test]
fn not_allowed_transfer_takes_a_later_trip() {
    let data = not_allowed_network();
    for profile in PROFILES {
        let response = route(&data, profile);
        assert_eq!(response.paths.len(), 1, "{profile:?}");
        assert_eq!(response.paths[0].end_time, at("10:30"));
    }
}

#[test]
fn reverse_search_skips_the_not_allowed_transfer() {
    let data = not_allowed_network();
    for profile in PROFILES {
        assert!(route_reverse(&data, profile, "10:00").is_empty(), "{profile:?}");

        let response = route_reverse(&data, profile, "10:30");
        assert_eq!(response.paths.len(), 1, "{profile:?}");
        let path = &response.paths[0];
        assert_well_formed(path);
        assert_eq!((path.start_time, path.end_time), (at("09:00"), at("10:30")));
        assert_eq!(path.number_of_transfers, 1);
        let trips: Vec<&str> = path
            .legs
            .iter()
            .filter_map(|leg| match leg {
                PathLeg::Transit { trip_id, .. } => Some(trip_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(trips, vec!["t1", "t3"]);
    }
}
