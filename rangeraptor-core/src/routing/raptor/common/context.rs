//! Per-request assembly of everything a worker needs

use super::access::{AccessPaths, EgressPaths};
use super::calculator::TransitCalculator;
use super::cost::CostCalculator;
use super::slack::SearchSlack;
use crate::config::RaptorTuningParameters;
use crate::model::transit::{Time, TransitDataProvider};
use crate::request::{RaptorProfile, RaptorRequest, ViaLocation};
use crate::routing::raptor::multicriteria::{C2Dominance, PassThroughPointsService};

pub struct SearchContext<'a> {
    pub provider: &'a dyn TransitDataProvider,
    pub request: &'a RaptorRequest,
    pub tuning: &'a RaptorTuningParameters,
    pub calculator: TransitCalculator,
    pub slack: SearchSlack<'a>,
    pub cost: CostCalculator,
    /// Request access legs forward, egress legs in reverse
    pub access: AccessPaths,
    pub egress: EgressPaths,
    /// Via locations in search order
    pub via: Vec<ViaLocation>,
    pub pass_through: PassThroughPointsService,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        provider: &'a dyn TransitDataProvider,
        request: &'a RaptorRequest,
        tuning: &'a RaptorTuningParameters,
        search_window: Time,
    ) -> Self {
        let forward = request.direction.is_forward();
        let params = &request.search_params;
        let calculator = TransitCalculator::new(
            request.direction,
            params.earliest_departure_time,
            params.latest_arrival_time,
            search_window,
            tuning.iteration_departure_step,
        );
        let (access, egress) = if forward {
            (&params.access, &params.egress)
        } else {
            (&params.egress, &params.access)
        };
        let mut via = params.via_locations.clone();
        let mut points = params.pass_through_points.clone();
        if !forward {
            via.reverse();
            points.reverse();
        }
        Self {
            provider,
            request,
            tuning,
            calculator,
            slack: SearchSlack::new(&request.slack, forward),
            cost: CostCalculator::new(&request.cost, forward),
            access: AccessPaths::new(access),
            egress: EgressPaths::new(egress),
            via,
            pass_through: PassThroughPointsService::new(points),
        }
    }

    pub fn profile(&self) -> RaptorProfile {
        self.request.profile
    }

    pub fn num_legs(&self) -> usize {
        self.via.len() + 1
    }

    pub fn constrained_transfers_enabled(&self) -> bool {
        self.request.search_params.constrained_transfers
    }

    pub fn c2_dominance(&self) -> C2Dominance {
        if !self.pass_through.is_noop() {
            C2Dominance::PassThrough
        } else if self.request.transit_group_priority {
            C2Dominance::GroupPriority
        } else {
            C2Dominance::None
        }
    }
}
