//! Entry point of a single search: validation, window sizing, the
//! profile-specific worker and result cropping.

use log::{debug, info};
use serde::Serialize;

use super::path::Path;
use super::raptor::common::{LifeCycleEventPublisher, RoundTracker, SearchContext, SearchDeadline};
use super::raptor::multicriteria::McRoutingStrategy;
use super::raptor::regular::{StdRoutingStrategy, StopArrivals};
use super::raptor::{RangeRaptor, RangeRaptorResult, RangeRaptorWorker, RoutingStrategy};
use super::search_window::{PagingSearchWindowAdjuster, SearchWindowCalculator};
use crate::Error;
use crate::config::{RaptorConfig, RaptorTuningParameters};
use crate::model::transit::{Time, TransitDataProvider};
use crate::request::{RaptorProfile, RaptorRequest};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RaptorResponse {
    pub paths: Vec<Path>,
    /// Best times per stop, standard and min-travel-duration searches only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_arrivals: Option<StopArrivals>,
    pub search_window_used: Time,
    pub timed_out: bool,
    pub iterations: usize,
    /// Suggested window for the next page of results
    pub next_search_window: Time,
}

impl RaptorResponse {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RaptorService {
    tuning: RaptorTuningParameters,
}

impl RaptorService {
    pub fn new(tuning: RaptorTuningParameters) -> Self {
        Self { tuning }
    }

    pub fn from_config(config: &RaptorConfig) -> Self {
        Self::new(config.tuning().clone())
    }

    pub fn tuning(&self) -> &RaptorTuningParameters {
        &self.tuning
    }

    pub fn route(
        &self,
        provider: &dyn TransitDataProvider,
        request: &RaptorRequest,
    ) -> Result<RaptorResponse, Error> {
        self.route_with_listeners(provider, request, LifeCycleEventPublisher::new())
    }

    /// Like `route`, with extra subscribers notified of every worker event
    pub fn route_with_listeners(
        &self,
        provider: &dyn TransitDataProvider,
        request: &RaptorRequest,
        publisher: LifeCycleEventPublisher,
    ) -> Result<RaptorResponse, Error> {
        request.validate(provider.num_stops())?;
        let deadline = SearchDeadline::new(
            request.timeout,
            request.cancel.clone(),
            self.tuning.deadline_check_interval,
        );

        let search_window = self.search_window(provider, request, &deadline);
        let ctx = SearchContext::new(provider, request, &self.tuning, search_window);
        let RangeRaptorResult {
            result,
            timed_out,
            iterations,
        } = self.run(&ctx, deadline, publisher);

        let profile = request.profile;
        if timed_out && result.paths.is_empty() && profile != RaptorProfile::MinTravelDuration {
            return Err(Error::Timeout);
        }

        let found = result.paths.len();
        let (paths, next_search_window) = self.crop(&ctx, result.paths, search_window);
        info!(
            "{profile:?} search: kept {} of {found} paths, window {search_window}s, \
             {iterations} iterations",
            paths.len()
        );
        Ok(RaptorResponse {
            paths,
            stop_arrivals: result.stop_arrivals,
            search_window_used: search_window,
            timed_out,
            iterations,
            next_search_window,
        })
    }

    /// The requested window, or one sized from a single-iteration heuristic
    fn search_window(
        &self,
        provider: &dyn TransitDataProvider,
        request: &RaptorRequest,
        deadline: &SearchDeadline,
    ) -> Time {
        if let Some(window) = request.search_params.search_window {
            return window;
        }
        if request.profile == RaptorProfile::MinTravelDuration {
            return 0;
        }
        let heuristic = request.heuristic();
        let ctx = SearchContext::new(provider, &heuristic, &self.tuning, 0);
        let outcome = self.run(&ctx, deadline.clone(), LifeCycleEventPublisher::new());
        let duration = outcome.result.best_travel_duration;
        let window = SearchWindowCalculator::new(&self.tuning.dynamic_search_window)
            .calculate(duration);
        debug!("Heuristic travel duration {duration:?}, search window {window}s");
        window
    }

    fn run<'a>(
        &self,
        ctx: &'a SearchContext<'a>,
        deadline: SearchDeadline,
        publisher: LifeCycleEventPublisher,
    ) -> RangeRaptorResult {
        let params = &ctx.request.search_params;
        let rounds = RoundTracker::new(
            params.max_transfers,
            self.tuning.max_number_of_transfers,
            params.max_additional_transfers,
        );
        let max_rounds = rounds.max_rounds();
        match ctx.profile() {
            RaptorProfile::Standard => {
                let strategy = StdRoutingStrategy::new(ctx, max_rounds, false);
                search(ctx, strategy, rounds, deadline, publisher)
            }
            RaptorProfile::MinTravelDuration => {
                let strategy = StdRoutingStrategy::new(ctx, max_rounds, true);
                search(ctx, strategy, rounds, deadline, publisher)
            }
            RaptorProfile::MultiCriteria => {
                let strategy = McRoutingStrategy::new(ctx);
                search(ctx, strategy, rounds, deadline, publisher)
            }
        }
    }

    /// Keeps the requested number of paths: the earliest arrivals in forward
    /// searches, the latest departures in reverse ones
    fn crop(
        &self,
        ctx: &SearchContext<'_>,
        mut paths: Vec<Path>,
        window: Time,
    ) -> (Vec<Path>, Time) {
        let calculator = &ctx.calculator;
        let params = &ctx.request.search_params;
        let adjuster =
            PagingSearchWindowAdjuster::from_coefficients(&self.tuning.dynamic_search_window);
        let n = params.num_itineraries;
        if paths.len() <= n {
            let next = adjuster.increase_or_keep(window, n, paths.len());
            return (paths, next);
        }

        let forward = calculator.is_forward();
        if !forward {
            paths.sort_by(|a, b| b.start_time.cmp(&a.start_time).then_with(|| a.cmp(b)));
        }
        let removed = paths.split_off(n);
        paths.sort();
        let (search_start, first_removed) = if forward {
            (params.earliest_departure_time, removed[0].start_time)
        } else {
            (params.latest_arrival_time, removed[0].end_time)
        };
        let offset = calculator.duration_between(search_start.unwrap_or(0), first_removed);
        debug!("Cropped {} paths", removed.len());
        (paths, adjuster.decrease(window, offset))
    }
}

fn search<'a, S: RoutingStrategy<'a>>(
    ctx: &'a SearchContext<'a>,
    strategy: S,
    rounds: RoundTracker,
    deadline: SearchDeadline,
    publisher: LifeCycleEventPublisher,
) -> RangeRaptorResult {
    let worker = RangeRaptorWorker::new(ctx, strategy, rounds, deadline, publisher);
    RangeRaptor::new(ctx, worker).route()
}
