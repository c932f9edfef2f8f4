//! Routers wrapping a prepared request, and a composite running two of
//! them side by side on the search thread pool.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, warn};

use super::path::{Path, PathComparator};
use super::raptor::multicriteria::ParetoSet;
use super::service::{RaptorResponse, RaptorService};
use crate::Error;
use crate::config::RaptorConfig;
use crate::model::transit::TransitDataProvider;
use crate::request::RaptorRequest;

pub trait RaptorRouter: Send + Sync {
    /// Runs the search. Setting `cancel` stops it at the next round boundary.
    fn route(&self, cancel: Arc<AtomicBool>) -> Result<RaptorResponse, Error>;
}

/// A request bound to its transit data. The cancellation flag passed to
/// `route` replaces the one of the request.
pub struct DefaultRaptorRouter {
    provider: Arc<dyn TransitDataProvider>,
    request: RaptorRequest,
    service: RaptorService,
}

impl DefaultRaptorRouter {
    pub fn new(
        provider: Arc<dyn TransitDataProvider>,
        request: RaptorRequest,
        service: RaptorService,
    ) -> Self {
        Self {
            provider,
            request,
            service,
        }
    }
}

impl RaptorRouter for DefaultRaptorRouter {
    fn route(&self, cancel: Arc<AtomicBool>) -> Result<RaptorResponse, Error> {
        let mut request = self.request.clone();
        request.cancel = Some(cancel);
        self.service.route(self.provider.as_ref(), &request)
    }
}

pub type PathMerger = Box<dyn Fn(Vec<Path>, Vec<Path>) -> Vec<Path> + Send + Sync>;

/// Union of both path lists without dominated or duplicate paths
pub fn merge_paths(main: Vec<Path>, alternative: Vec<Path>) -> Vec<Path> {
    let mut set = ParetoSet::new(PathComparator::for_merge());
    for path in main.into_iter().chain(alternative).sorted() {
        set.add(path);
    }
    set.into_vec().into_iter().sorted().dedup().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Main,
    Alternative,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Main => write!(f, "main"),
            Side::Alternative => write!(f, "alternative"),
        }
    }
}

/// Runs a main and an alternative search concurrently and merges their paths
pub struct ConcurrentCompositeRaptorRouter {
    main: Arc<dyn RaptorRouter>,
    alternative: Arc<dyn RaptorRouter>,
    merger: PathMerger,
    timeout: Option<Duration>,
}

impl ConcurrentCompositeRaptorRouter {
    pub fn new(main: Arc<dyn RaptorRouter>, alternative: Arc<dyn RaptorRouter>) -> Self {
        Self {
            main,
            alternative,
            merger: Box::new(merge_paths),
            timeout: None,
        }
    }

    pub fn with_merger(mut self, merger: PathMerger) -> Self {
        self.merger = merger;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs both searches on the config thread pool, or one after the other
    /// on the calling thread when the config has no pool. The timeout covers
    /// both searches either way.
    pub fn route(&self, config: &RaptorConfig) -> Result<RaptorResponse, Error> {
        let cancel = Arc::new(AtomicBool::new(false));
        let Some(pool) = config.thread_pool() else {
            return self.route_in_place(&cancel);
        };

        let (tx, rx) = mpsc::channel();
        for (side, router) in [(Side::Main, &self.main), (Side::Alternative, &self.alternative)] {
            let tx = tx.clone();
            let router = Arc::clone(router);
            let cancel = Arc::clone(&cancel);
            pool.spawn(move || {
                let result = run_side(side, &*router, cancel);
                // The receiver is gone if the composite already gave up
                let _ = tx.send((side, result));
            });
        }
        drop(tx);

        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut main = None;
        let mut alternative = None;
        while main.is_none() || alternative.is_none() {
            let received = match deadline {
                Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((Side::Main, result)) => main = Some(result),
                Ok((Side::Alternative, result)) => alternative = Some(result),
                Err(e) => {
                    warn!("Composite search aborted: {e}");
                    cancel.store(true, Ordering::Relaxed);
                    return Err(Error::Timeout);
                }
            }
        }

        let main = main.ok_or(Error::Timeout)?.map_err(remap_error)?;
        let alternative = alternative.ok_or(Error::Timeout)?.map_err(remap_error)?;
        Ok(self.merge(main, alternative))
    }

    fn route_in_place(&self, cancel: &Arc<AtomicBool>) -> Result<RaptorResponse, Error> {
        let Some(timeout) = self.timeout else {
            return self.route_sides(cancel);
        };
        let (done, finished) = mpsc::channel::<()>();
        thread::scope(|scope| {
            scope.spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = finished.recv_timeout(timeout) {
                    cancel.store(true, Ordering::Relaxed);
                }
            });
            let result = self.route_sides(cancel);
            drop(done);
            result
        })
    }

    fn route_sides(&self, cancel: &Arc<AtomicBool>) -> Result<RaptorResponse, Error> {
        let run = |side, router: &Arc<dyn RaptorRouter>| {
            let response = run_side(side, &**router, Arc::clone(cancel));
            if cancel.load(Ordering::Relaxed) {
                warn!("Composite search aborted during the {side} search");
                return Err(Error::Timeout);
            }
            response.map_err(remap_error)
        };
        let main = run(Side::Main, &self.main)?;
        let alternative = run(Side::Alternative, &self.alternative)?;
        Ok(self.merge(main, alternative))
    }

    fn merge(&self, main: RaptorResponse, alternative: RaptorResponse) -> RaptorResponse {
        debug!(
            "Merging {} main and {} alternative paths",
            main.paths.len(),
            alternative.paths.len()
        );
        RaptorResponse {
            paths: (self.merger)(main.paths, alternative.paths),
            timed_out: main.timed_out || alternative.timed_out,
            iterations: main.iterations + alternative.iterations,
            ..main
        }
    }
}

fn run_side(
    side: Side,
    router: &dyn RaptorRouter,
    cancel: Arc<AtomicBool>,
) -> Result<RaptorResponse, Error> {
    panic::catch_unwind(AssertUnwindSafe(|| router.route(cancel)))
        .unwrap_or_else(|_| Err(Error::Interrupted(format!("{side} search panicked"))))
}

fn remap_error(error: Error) -> Error {
    match error {
        Error::Interrupted(reason) => {
            warn!("Search interrupted: {reason}");
            Error::Timeout
        }
        other => other,
    }
}
