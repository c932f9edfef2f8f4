use super::lifecycle::WorkerLifeCycle;
use crate::model::transit::Time;

/// Tracks the current round and when to stop.
///
/// Round `r` holds journeys with at most `r` boardings, round 0 is access.
#[derive(Debug, Clone)]
pub struct RoundTracker {
    max_rounds: usize,
    round_limit: usize,
    round: usize,
    max_additional_transfers: Option<usize>,
}

impl RoundTracker {
    pub fn new(
        max_transfers: Option<usize>,
        tuning_max_transfers: usize,
        max_additional_transfers: Option<usize>,
    ) -> Self {
        let transfers = max_transfers.map_or(tuning_max_transfers, |n| n.min(tuning_max_transfers));
        let max_rounds = transfers + 1;
        Self {
            max_rounds,
            round_limit: max_rounds,
            round: 0,
            max_additional_transfers,
        }
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn has_more_rounds(&self) -> bool {
        self.round < self.round_limit
    }

    pub fn next_round(&mut self) -> usize {
        self.round += 1;
        self.round
    }
}

impl WorkerLifeCycle for RoundTracker {
    fn setup_iteration(&mut self, _departure_time: Time) {
        self.round = 0;
        self.round_limit = self.max_rounds;
    }

    fn round_complete(&mut self, destination_reached: bool) {
        if let (true, Some(n)) = (destination_reached, self.max_additional_transfers) {
            self.round_limit = self.round_limit.min(self.round + n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_cannot_exceed_tuning_limit() {
        assert_eq!(RoundTracker::new(Some(30), 12, None).max_rounds(), 13);
        assert_eq!(RoundTracker::new(Some(2), 12, None).max_rounds(), 3);
        assert_eq!(RoundTracker::new(None, 5, None).max_rounds(), 6);
    }

    #[test]
    fn destination_reached_limits_extra_rounds() {
        let mut tracker = RoundTracker::new(None, 12, Some(1));
        tracker.setup_iteration(0);
        tracker.next_round();
        tracker.next_round();
        tracker.round_complete(true);
        assert!(tracker.has_more_rounds());
        tracker.next_round();
        tracker.round_complete(false);
        assert!(!tracker.has_more_rounds());

        tracker.setup_iteration(60);
        assert_eq!(tracker.round(), 0);
        for _ in 0..13 {
            assert!(tracker.has_more_rounds());
            tracker.next_round();
        }
        assert!(!tracker.has_more_rounds());
    }
}
