use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::access_egress::AccessEgress;
use super::cost::CostParameters;
use super::slack::SlackParameters;
use super::via::{PassThroughPoint, ViaLocation};
use crate::Error;
use crate::model::transit::{StopIdx, Time};

pub const DEFAULT_NUM_ITINERARIES: usize = 50;
/// Widest accepted search window, seven days.
pub const MAX_SEARCH_WINDOW: Time = 7 * 24 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaptorProfile {
    /// Arrival time and number of transfers
    #[default]
    Standard,
    /// Travel duration without waiting, one iteration only
    MinTravelDuration,
    /// Arrival time, transfers, generalized cost and the optional c2
    MultiCriteria,
}

impl RaptorProfile {
    pub fn is_multi_criteria(self) -> bool {
        self == RaptorProfile::MultiCriteria
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// Depart after `earliest_departure_time`
    #[default]
    Forward,
    /// Arrive before `latest_arrival_time`, searching from the egress side
    Reverse,
}

impl SearchDirection {
    pub fn is_forward(self) -> bool {
        self == SearchDirection::Forward
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub earliest_departure_time: Option<Time>,
    pub latest_arrival_time: Option<Time>,
    /// `None` lets the service size the window from a heuristic search
    pub search_window: Option<Time>,
    pub access: Vec<AccessEgress>,
    pub egress: Vec<AccessEgress>,
    pub via_locations: Vec<ViaLocation>,
    pub pass_through_points: Vec<PassThroughPoint>,
    /// Keep every departure found in the window instead of the fastest paths only
    pub timetable: bool,
    pub max_transfers: Option<usize>,
    /// Once the destination is reached, search at most this many extra rounds
    pub max_additional_transfers: Option<usize>,
    pub num_itineraries: usize,
    pub constrained_transfers: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            earliest_departure_time: None,
            latest_arrival_time: None,
            search_window: None,
            access: Vec::new(),
            egress: Vec::new(),
            via_locations: Vec::new(),
            pass_through_points: Vec::new(),
            timetable: false,
            max_transfers: None,
            max_additional_transfers: None,
            num_itineraries: DEFAULT_NUM_ITINERARIES,
            constrained_transfers: false,
        }
    }
}

impl SearchParams {
    fn stops(&self) -> impl Iterator<Item = StopIdx> + '_ {
        let legs = self.access.iter().chain(&self.egress).map(|leg| leg.stop);
        let via = self.via_locations.iter().flat_map(|v| v.stops.iter().copied());
        let pass = self
            .pass_through_points
            .iter()
            .flat_map(|p| p.stops.iter().copied());
        legs.chain(via).chain(pass)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RaptorRequest {
    pub profile: RaptorProfile,
    pub direction: SearchDirection,
    pub search_params: SearchParams,
    pub cost: CostParameters,
    pub slack: SlackParameters,
    /// Use the route priority groups as c2, multi-criteria only
    pub transit_group_priority: bool,
    pub timeout: Option<Duration>,
    /// Shared cancellation flag, checked together with the timeout
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RaptorRequest {
    pub fn builder() -> RaptorRequestBuilder {
        RaptorRequestBuilder::default()
    }

    /// Rejects malformed requests before any round runs
    pub fn validate(&self, num_stops: usize) -> Result<(), Error> {
        let params = &self.search_params;
        let invalid = |msg: &str| Err(Error::InvalidRequest(msg.to_string()));

        if params.access.is_empty() {
            return invalid("no access legs");
        }
        if params.egress.is_empty() {
            return invalid("no egress legs");
        }
        match self.direction {
            SearchDirection::Forward if params.earliest_departure_time.is_none() => {
                return invalid("forward search requires an earliest departure time");
            }
            SearchDirection::Reverse if params.latest_arrival_time.is_none() => {
                return invalid("reverse search requires a latest arrival time");
            }
            _ => {}
        }
        if let (Some(edt), Some(lat)) = (params.earliest_departure_time, params.latest_arrival_time)
        {
            if lat < edt {
                return invalid("latest arrival time is before earliest departure time");
            }
        }
        if params.search_window.is_some_and(|w| w < 0) {
            return invalid("negative search window");
        }
        if params.search_window.is_some_and(|w| w > MAX_SEARCH_WINDOW) {
            return invalid("search window exceeds seven days");
        }
        if self.profile == RaptorProfile::MinTravelDuration
            && params.search_window.is_some_and(|w| w > 0)
        {
            return invalid("min travel duration search runs a single iteration");
        }
        if params.num_itineraries == 0 {
            return invalid("number of itineraries must be positive");
        }
        if params
            .access
            .iter()
            .chain(&params.egress)
            .any(|leg| leg.duration < 0 || leg.c1 < 0)
        {
            return invalid("negative access or egress duration");
        }

        if !params.via_locations.is_empty() && !self.profile.is_multi_criteria() {
            return invalid("via locations require the multi-criteria profile");
        }
        for via in &params.via_locations {
            if via.stops.is_empty() {
                return Err(Error::InvalidRequest(format!(
                    "via location '{}' has no stops",
                    via.label
                )));
            }
            if via.min_wait < 0 || via.max_wait < via.min_wait {
                return Err(Error::InvalidRequest(format!(
                    "via location '{}' has an invalid wait range",
                    via.label
                )));
            }
        }

        if !params.pass_through_points.is_empty() {
            if !self.profile.is_multi_criteria() {
                return invalid("pass-through points require the multi-criteria profile");
            }
            if self.transit_group_priority {
                return invalid("pass-through points and transit group priority both use c2");
            }
            if let Some(p) = params.pass_through_points.iter().find(|p| p.stops.is_empty()) {
                return Err(Error::InvalidRequest(format!(
                    "pass-through point '{}' has no stops",
                    p.label
                )));
            }
        }

        if let Some(stop) = params.stops().find(|&s| s >= num_stops) {
            return Err(Error::InvalidStop(stop));
        }
        Ok(())
    }

    /// Copy suitable for the window-sizing heuristic
    pub(crate) fn heuristic(&self) -> RaptorRequest {
        let mut request = self.clone();
        request.profile = RaptorProfile::MinTravelDuration;
        request.transit_group_priority = false;
        request.search_params.search_window = Some(0);
        request.search_params.via_locations.clear();
        request.search_params.pass_through_points.clear();
        request.search_params.timetable = false;
        request
    }
}

#[derive(Debug, Default)]
pub struct RaptorRequestBuilder {
    request: RaptorRequest,
}

impl RaptorRequestBuilder {
    pub fn profile(mut self, profile: RaptorProfile) -> Self {
        self.request.profile = profile;
        self
    }

    pub fn direction(mut self, direction: SearchDirection) -> Self {
        self.request.direction = direction;
        self
    }

    pub fn earliest_departure_time(mut self, time: Time) -> Self {
        self.request.search_params.earliest_departure_time = Some(time);
        self
    }

    pub fn latest_arrival_time(mut self, time: Time) -> Self {
        self.request.search_params.latest_arrival_time = Some(time);
        self
    }

    pub fn search_window(mut self, window: Time) -> Self {
        self.request.search_params.search_window = Some(window);
        self
    }

    pub fn access(mut self, leg: AccessEgress) -> Self {
        self.request.search_params.access.push(leg);
        self
    }

    pub fn egress(mut self, leg: AccessEgress) -> Self {
        self.request.search_params.egress.push(leg);
        self
    }

    pub fn via(mut self, via: ViaLocation) -> Self {
        self.request.search_params.via_locations.push(via);
        self
    }

    pub fn pass_through(mut self, point: PassThroughPoint) -> Self {
        self.request.search_params.pass_through_points.push(point);
        self
    }

    pub fn timetable(mut self, timetable: bool) -> Self {
        self.request.search_params.timetable = timetable;
        self
    }

    pub fn max_transfers(mut self, max_transfers: usize) -> Self {
        self.request.search_params.max_transfers = Some(max_transfers);
        self
    }

    pub fn max_additional_transfers(mut self, n: usize) -> Self {
        self.request.search_params.max_additional_transfers = Some(n);
        self
    }

    pub fn num_itineraries(mut self, n: usize) -> Self {
        self.request.search_params.num_itineraries = n;
        self
    }

    pub fn constrained_transfers(mut self, enabled: bool) -> Self {
        self.request.search_params.constrained_transfers = enabled;
        self
    }

    pub fn cost(mut self, cost: CostParameters) -> Self {
        self.request.cost = cost;
        self
    }

    pub fn slack(mut self, slack: SlackParameters) -> Self {
        self.request.slack = slack;
        self
    }

    pub fn transit_group_priority(mut self, enabled: bool) -> Self {
        self.request.transit_group_priority = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.request.cancel = Some(flag);
        self
    }

    pub fn build(self) -> RaptorRequest {
        self.request
    }
}
