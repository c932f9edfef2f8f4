use hashbrown::HashMap;

use crate::model::transit::StopIdx;
use crate::request::AccessEgress;

/// Access legs in search direction, grouped by the round they enter
#[derive(Debug, Clone, Default)]
pub struct AccessPaths {
    legs: Vec<AccessEgress>,
    max_rides: usize,
}

impl AccessPaths {
    pub fn new(legs: &[AccessEgress]) -> Self {
        Self {
            legs: legs.to_vec(),
            max_rides: legs.iter().map(|leg| leg.num_rides).max().unwrap_or(0),
        }
    }

    /// Legs ending with a walk, added in round `num_rides` after transfers
    pub fn walking(&self, round: usize) -> impl Iterator<Item = &AccessEgress> {
        self.legs
            .iter()
            .filter(move |leg| leg.num_rides == round && !leg.stop_reached_on_board())
    }

    /// Legs arriving on board, added in round `num_rides` before transfers
    pub fn on_board(&self, round: usize) -> impl Iterator<Item = &AccessEgress> {
        self.legs
            .iter()
            .filter(move |leg| leg.num_rides == round && leg.stop_reached_on_board())
    }

    pub fn has_more_rides_after(&self, round: usize) -> bool {
        self.max_rides > round
    }

    pub fn stops(&self) -> impl Iterator<Item = StopIdx> + '_ {
        self.legs.iter().map(|leg| leg.stop)
    }
}

/// Egress legs in search direction, indexed by stop
#[derive(Debug, Clone, Default)]
pub struct EgressPaths {
    by_stop: HashMap<StopIdx, Vec<AccessEgress>>,
}

impl EgressPaths {
    pub fn new(legs: &[AccessEgress]) -> Self {
        let mut by_stop: HashMap<StopIdx, Vec<AccessEgress>> = HashMap::new();
        for leg in legs {
            by_stop.entry(leg.stop).or_default().push(*leg);
        }
        Self { by_stop }
    }

    pub fn for_stop(&self, stop: StopIdx) -> &[AccessEgress] {
        self.by_stop.get(&stop).map_or(&[], Vec::as_slice)
    }

    pub fn is_egress_stop(&self, stop: StopIdx) -> bool {
        self.by_stop.contains_key(&stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_access_by_round_and_kind() {
        let access = AccessPaths::new(&[
            AccessEgress::walk(0, 60),
            AccessEgress::flex(1, 600, 1),
            AccessEgress::flex_and_walk(2, 700, 2),
        ]);
        assert_eq!(access.walking(0).count(), 1);
        assert_eq!(access.on_board(1).map(|l| l.stop).collect::<Vec<_>>(), vec![1]);
        assert_eq!(access.walking(2).map(|l| l.stop).collect::<Vec<_>>(), vec![2]);
        assert!(access.has_more_rides_after(1));
        assert!(!access.has_more_rides_after(2));

        let egress = EgressPaths::new(&[AccessEgress::walk(4, 60), AccessEgress::walk(4, 90)]);
        assert_eq!(egress.for_stop(4).len(), 2);
        assert!(egress.for_stop(3).is_empty());
    }
}
