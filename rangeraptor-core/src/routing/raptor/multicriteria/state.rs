//! Pareto frontiers per stop, one set per via leg.
//!
//! Frontiers live for the whole search, so arrivals of later iterations
//! compete with those found in earlier ones. The per-round lists only hold
//! ids; an id is alive while its label is still in the frontier.

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use itertools::Itertools;

use super::label::{ArrivalComparator, McLabel};
use super::pareto_set::ParetoSet;
use crate::model::transit::{StopIdx, Time};
use crate::routing::raptor::common::{ArrivalId, WorkerLifeCycle};

#[derive(Debug, Clone)]
struct LegArrivals {
    frontiers: Vec<ParetoSet<McLabel, ArrivalComparator>>,
    current: HashMap<StopIdx, Vec<ArrivalId>>,
    previous: HashMap<StopIdx, Vec<ArrivalId>>,
    transit_current: HashMap<StopIdx, Vec<ArrivalId>>,
}

impl LegArrivals {
    fn is_alive(&self, stop: StopIdx, id: ArrivalId) -> bool {
        self.frontiers[stop].iter().any(|label| label.id == id)
    }

    fn alive<'s>(
        &'s self,
        round: &'s HashMap<StopIdx, Vec<ArrivalId>>,
        stop: StopIdx,
    ) -> impl Iterator<Item = ArrivalId> + 's {
        round
            .get(&stop)
            .into_iter()
            .flatten()
            .copied()
            .filter(move |&id| self.is_alive(stop, id))
    }
}

#[derive(Debug, Clone)]
pub struct McStopArrivals {
    legs: Vec<LegArrivals>,
    touched_previous_round: FixedBitSet,
}

impl McStopArrivals {
    pub fn new(num_stops: usize, num_legs: usize, comparator: ArrivalComparator) -> Self {
        let leg = LegArrivals {
            frontiers: vec![ParetoSet::new(comparator); num_stops],
            current: HashMap::new(),
            previous: HashMap::new(),
            transit_current: HashMap::new(),
        };
        Self {
            legs: vec![leg; num_legs.max(1)],
            touched_previous_round: FixedBitSet::with_capacity(num_stops),
        }
    }

    /// Adds the label to the frontier of `stop`. A transfer source may start
    /// a transfer in the same round.
    pub fn add(
        &mut self,
        leg: usize,
        stop: StopIdx,
        label: McLabel,
        transfer_source: bool,
    ) -> bool {
        let arrivals = &mut self.legs[leg];
        if !arrivals.frontiers[stop].add(label) {
            return false;
        }
        arrivals.current.entry(stop).or_default().push(label.id);
        if transfer_source {
            arrivals.transit_current.entry(stop).or_default().push(label.id);
        }
        true
    }

    pub fn frontier(&self, leg: usize, stop: StopIdx) -> &ParetoSet<McLabel, ArrivalComparator> {
        &self.legs[leg].frontiers[stop]
    }

    /// Surviving arrivals of the previous round at `stop`, all legs
    pub fn previous_round(&self, stop: StopIdx) -> Vec<ArrivalId> {
        self.legs
            .iter()
            .flat_map(|leg| leg.alive(&leg.previous, stop))
            .collect()
    }

    /// Surviving transfer sources of the current round at `stop`, all legs
    pub fn transit_current_round(&self, stop: StopIdx) -> Vec<ArrivalId> {
        self.legs
            .iter()
            .flat_map(|leg| leg.alive(&leg.transit_current, stop))
            .collect()
    }

    pub fn touched_previous_round(&self) -> &FixedBitSet {
        &self.touched_previous_round
    }

    pub fn stops_reached_by_transit_current_round(&self) -> Vec<StopIdx> {
        self.legs
            .iter()
            .flat_map(|leg| leg.transit_current.keys().copied())
            .sorted_unstable()
            .dedup()
            .collect()
    }

    pub fn is_current_round_updated(&self) -> bool {
        self.legs.iter().any(|leg| !leg.current.is_empty())
    }

    pub fn num_labels(&self) -> usize {
        self.legs
            .iter()
            .flat_map(|leg| &leg.frontiers)
            .map(ParetoSet::len)
            .sum()
    }
}

impl WorkerLifeCycle for McStopArrivals {
    fn setup_iteration(&mut self, _departure_time: Time) {
        for leg in &mut self.legs {
            leg.current.clear();
            leg.previous.clear();
            leg.transit_current.clear();
        }
        self.touched_previous_round.clear();
    }

    fn prepare_for_next_round(&mut self, _round: usize) {
        self.touched_previous_round.clear();
        for leg in &mut self.legs {
            leg.previous = std::mem::take(&mut leg.current);
            leg.transit_current.clear();
            self.touched_previous_round
                .extend(leg.previous.keys().copied());
        }
    }
}
