#![allow(dead_code)]

use rangeraptor_core::prelude::*;

pub fn at(time: &str) -> Time {
    parse_time(time).unwrap()
}

pub fn stop(data: &PublicTransitData, name: &str) -> StopIdx {
    data.stop_by_name(name).unwrap()
}

/// L1 runs A -> B -> C, 09:10 -> 09:25 -> 09:40
pub fn sample_network() -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    builder.route("L1", |r| {
        r.stops(&["A", "B", "C"])
            .schedule("t1", "09:10:00 09:25:00 09:40:00");
    });
    builder.build()
}

/// A -> C direct in 50 minutes, or A -> B -> C with a change at B in 30
pub fn two_option_network() -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    builder
        .route("L1", |r| {
            r.stops(&["A", "C"]).schedule("direct", "09:10 10:00");
        })
        .route("L2", |r| {
            r.stops(&["A", "B"]).schedule("first", "09:10 09:20");
        })
        .route("L3", |r| {
            r.stops(&["B", "C"]).schedule("second", "09:25 09:40");
        });
    builder.build()
}

/// 10 minute walk to A at 09:00, egress at C
pub fn request_from_a_to_c(
    data: &PublicTransitData,
    profile: RaptorProfile,
) -> RaptorRequestBuilder {
    RaptorRequest::builder()
        .profile(profile)
        .earliest_departure_time(at("09:00"))
        .search_window(0)
        .access(AccessEgress::walk(stop(data, "A"), 600))
        .egress(AccessEgress::walk(stop(data, "C"), 0))
}

/// One access leg, one egress leg and legs that never go back in time
pub fn assert_well_formed(path: &Path) {
    assert!(matches!(path.legs.first(), Some(PathLeg::Access { .. })), "{path}");
    assert!(matches!(path.legs.last(), Some(PathLeg::Egress { .. })), "{path}");
    let street_ends = path
        .legs
        .iter()
        .filter(|leg| matches!(leg, PathLeg::Access { .. } | PathLeg::Egress { .. }))
        .count();
    assert_eq!(street_ends, 2, "{path}");
    for leg in &path.legs {
        assert!(leg.start_time() <= leg.end_time(), "{path}");
    }
    for pair in path.legs.windows(2) {
        assert!(pair[0].end_time() <= pair[1].start_time(), "{path}");
    }
    assert_eq!(path.start_time, path.legs[0].start_time());
    assert_eq!(path.end_time, path.legs[path.legs.len() - 1].end_time());
}
