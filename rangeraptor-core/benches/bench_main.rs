use criterion::{Criterion, criterion_group, criterion_main};
use rangeraptor_core::prelude::*;
use std::hint::black_box;

const GRID: usize = 12;
const HEADWAY: Time = 600;
const HOP: Time = 120;

fn stop_name(row: usize, col: usize) -> String {
    format!("S{row}_{col}")
}

/// Square grid with one line per row and per column, both directions,
/// running every ten minutes from 06:00 to 10:00
fn grid_network() -> PublicTransitData {
    let mut builder = TransitDataBuilder::new();
    for line in 0..GRID {
        let rows: Vec<String> = (0..GRID).map(|i| stop_name(line, i)).collect();
        let cols: Vec<String> = (0..GRID).map(|i| stop_name(i, line)).collect();
        for (kind, stops) in [("H", rows), ("V", cols)] {
            let forward: Vec<&str> = stops.iter().map(String::as_str).collect();
            let backward: Vec<&str> = forward.iter().rev().copied().collect();
            for (dir, stops) in [("f", forward), ("b", backward)] {
                let name = format!("{kind}{line}{dir}");
                builder.route(&name, |r| {
                    r.stops(&stops);
                    for (i, first) in (6 * 3600..10 * 3600).step_by(HEADWAY as usize).enumerate() {
                        let times = (0..GRID)
                            .map(|pos| StopTime::at(first + pos as Time * HOP))
                            .collect();
                        r.trip(&format!("{name}_{i}"), times);
                    }
                });
            }
        }
    }
    builder.build()
}

fn corner_to_corner(data: &PublicTransitData, profile: RaptorProfile) -> RaptorRequest {
    let origin = data.stop_by_name(&stop_name(0, 0)).unwrap_or_default();
    let target = data
        .stop_by_name(&stop_name(GRID - 1, GRID - 1))
        .unwrap_or_default();
    RaptorRequest::builder()
        .profile(profile)
        .earliest_departure_time(7 * 3600)
        .search_window(3600)
        .access(AccessEgress::walk(origin, 300))
        .egress(AccessEgress::walk(target, 300))
        .build()
}

fn bench_profiles(c: &mut Criterion) {
    let data = grid_network();
    let service = RaptorService::new(RaptorTuningParameters::default());

    let mut group = c.benchmark_group("range_raptor");
    for (label, profile) in [
        ("standard", RaptorProfile::Standard),
        ("multi_criteria", RaptorProfile::MultiCriteria),
        ("min_travel_duration", RaptorProfile::MinTravelDuration),
    ] {
        let mut request = corner_to_corner(&data, profile);
        if profile == RaptorProfile::MinTravelDuration {
            request.search_params.search_window = Some(0);
        }
        group.bench_function(label, |b| {
            b.iter(|| service.route(black_box(&data), black_box(&request)));
        });
    }
    group.finish();
}

fn bench_heuristic_window(c: &mut Criterion) {
    let data = grid_network();
    let service = RaptorService::new(RaptorTuningParameters::default());
    let mut request = corner_to_corner(&data, RaptorProfile::Standard);
    request.search_params.search_window = None;
    c.bench_function("standard_dynamic_window", |b| {
        b.iter(|| service.route(black_box(&data), black_box(&request)));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_profiles, bench_heuristic_window
}
criterion_main!(benches);
