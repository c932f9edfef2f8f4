mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use common::{at, request_from_a_to_c, sample_network};
use rangeraptor_core::prelude::*;

fn pooled_config() -> RaptorConfig {
    RaptorConfig::new(RaptorTuningParameters {
        search_thread_pool_size: 2,
        ..RaptorTuningParameters::default()
    })
    .unwrap()
}

fn default_router(profile: RaptorProfile) -> Arc<dyn RaptorRouter> {
    let data = sample_network();
    let request = request_from_a_to_c(&data, profile).build();
    Arc::new(DefaultRaptorRouter::new(
        Arc::new(data),
        request,
        RaptorService::new(RaptorTuningParameters::default()),
    ))
}

struct PanickingRouter;

impl RaptorRouter for PanickingRouter {
    fn route(&self, _cancel: Arc<AtomicBool>) -> Result<RaptorResponse, Error> {
        panic!("broken router");
    }
}

/// Spins until cancelled
struct SlowRouter;

impl RaptorRouter for SlowRouter {
    fn route(&self, cancel: Arc<AtomicBool>) -> Result<RaptorResponse, Error> {
        while !cancel.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(5));
        }
        Err(Error::Interrupted("cancelled".to_string()))
    }
}

#[test]
fn composite_merges_equal_paths_on_the_pool() {
    let config = pooled_config();
    assert!(config.is_multi_threaded());
    let router = ConcurrentCompositeRaptorRouter::new(
        default_router(RaptorProfile::Standard),
        default_router(RaptorProfile::MultiCriteria),
    );
    let response = router.route(&config).unwrap();
    assert_eq!(response.paths.len(), 1);
    assert_eq!(response.paths[0].end_time, at("09:40"));
    assert!(!response.timed_out);
}

#[test]
fn composite_runs_sequentially_without_a_pool() {
    let config = RaptorConfig::default_for_test();
    let router = ConcurrentCompositeRaptorRouter::new(
        default_router(RaptorProfile::Standard),
        default_router(RaptorProfile::MultiCriteria),
    );
    let response = router.route(&config).unwrap();
    assert_eq!(response.paths.len(), 1);
}

#[test]
fn custom_merger_replaces_the_default_one() {
    let config = RaptorConfig::default_for_test();
    let router = ConcurrentCompositeRaptorRouter::new(
        default_router(RaptorProfile::Standard),
        default_router(RaptorProfile::MultiCriteria),
    )
    .with_merger(Box::new(|mut main, alternative| {
        main.extend(alternative);
        main
    }));
    let response = router.route(&config).unwrap();
    assert_eq!(response.paths.len(), 2);
}

#[test]
fn panicking_side_is_reported_as_timeout() {
    let config = pooled_config();
    let router = ConcurrentCompositeRaptorRouter::new(
        default_router(RaptorProfile::Standard),
        Arc::new(PanickingRouter),
    );
    assert_eq!(router.route(&config).unwrap_err(), Error::Timeout);
}

#[test]
fn slow_side_is_cancelled_after_the_timeout() {
    let config = pooled_config();
    let router = ConcurrentCompositeRaptorRouter::new(
        default_router(RaptorProfile::Standard),
        Arc::new(SlowRouter),
    )
    .with_timeout(Duration::from_millis(50));
    assert_eq!(router.route(&config).unwrap_err(), Error::Timeout);
}

#[test]
fn sequential_composite_honours_the_timeout() {
    let config = RaptorConfig::default_for_test();
    assert!(!config.is_multi_threaded());
    let router = ConcurrentCompositeRaptorRouter::new(
        default_router(RaptorProfile::Standard),
        Arc::new(SlowRouter),
    )
    .with_timeout(Duration::from_millis(50));
    let started = Instant::now();
    assert_eq!(router.route(&config).unwrap_err(), Error::Timeout);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn sequential_composite_reports_a_panicking_side_as_timeout() {
    let config = RaptorConfig::default_for_test();
    let router = ConcurrentCompositeRaptorRouter::new(
        Arc::new(PanickingRouter),
        default_router(RaptorProfile::Standard),
    );
    assert_eq!(router.route(&config).unwrap_err(), Error::Timeout);

    let timed = ConcurrentCompositeRaptorRouter::new(
        default_router(RaptorProfile::Standard),
        Arc::new(PanickingRouter),
    )
    .with_timeout(Duration::from_secs(10));
    assert_eq!(timed.route(&config).unwrap_err(), Error::Timeout);
}

#[test]
fn sequential_composite_within_the_timeout_returns_paths() {
    let config = RaptorConfig::default_for_test();
    let router = ConcurrentCompositeRaptorRouter::new(
        default_router(RaptorProfile::Standard),
        default_router(RaptorProfile::MultiCriteria),
    )
    .with_timeout(Duration::from_secs(30));
    let response = router.route(&config).unwrap();
    assert_eq!(response.paths.len(), 1);
}

#[test]
fn merged_paths_are_not_dominated() {
    let fast = Path {
        start_time: at("09:00"),
        end_time: at("09:40"),
        c1: 1000,
        c2: None,
        number_of_transfers: 0,
        legs: Vec::new(),
    };
    let slow = Path {
        end_time: at("10:00"),
        c1: 2000,
        ..fast.clone()
    };
    let merged = merge_paths(vec![slow.clone()], vec![fast.clone(), fast.clone()]);
    assert_eq!(merged, vec![fast]);
}
