use crate::model::transit::StopIdx;
use crate::routing::raptor::common::ArrivalId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSlot {
    pub best: Option<ArrivalId>,
    pub best_transit: Option<ArrivalId>,
}

/// Best arrival and best on-board arrival per round and stop.
///
/// Slots are only overwritten by strict improvements, across iterations
/// too, so a slot may hold an arrival from an earlier iteration.
#[derive(Debug, Clone)]
pub struct StdStopArrivalState {
    rounds: Vec<Vec<RoundSlot>>,
    first_round: Vec<Option<usize>>,
}

impl StdStopArrivalState {
    pub fn new(num_stops: usize, max_rounds: usize) -> Self {
        Self {
            rounds: vec![vec![RoundSlot::default(); num_stops]; max_rounds + 1],
            first_round: vec![None; num_stops],
        }
    }

    pub fn slot(&self, round: usize, stop: StopIdx) -> RoundSlot {
        self.rounds
            .get(round)
            .and_then(|r| r.get(stop))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_best(&mut self, round: usize, stop: StopIdx, id: ArrivalId) {
        self.rounds[round][stop].best = Some(id);
        let first = self.first_round[stop].map_or(round, |r| r.min(round));
        self.first_round[stop] = Some(first);
    }

    pub fn set_best_transit(&mut self, round: usize, stop: StopIdx, id: ArrivalId) {
        self.rounds[round][stop].best_transit = Some(id);
    }

    /// Boardings minus one at the first round the stop was reached
    pub fn min_transfers(&self) -> Vec<Option<usize>> {
        self.first_round
            .iter()
            .map(|r| r.map(|round| round.saturating_sub(1)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_first_round_reached() {
        let mut state = StdStopArrivalState::new(2, 3);
        state.set_best(2, 1, ArrivalId::new(0));
        state.set_best(1, 1, ArrivalId::new(1));
        state.set_best(3, 1, ArrivalId::new(2));
        assert_eq!(state.min_transfers(), vec![None, Some(0)]);
        assert_eq!(state.slot(1, 1).best, Some(ArrivalId::new(1)));
        assert_eq!(state.slot(9, 1), RoundSlot::default());
    }
}
