use serde::{Deserialize, Serialize};

use crate::model::transit::{Cost, StopIdx, Time};

/// Generalized cost of one second of walking with the default reluctance 2.0
pub const WALK_C1_PER_SECOND: Cost = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open: Time,
    pub close: Time,
}

/// Street leg between the origin (or destination) and a stop.
///
/// `num_rides > 0` marks flexible legs that already contain rides. With
/// `on_board` set such a leg arrives riding, so it may be followed by a
/// transfer like any transit arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEgress {
    pub stop: StopIdx,
    pub duration: Time,
    pub c1: Cost,
    #[serde(default)]
    pub num_rides: usize,
    #[serde(default)]
    pub on_board: bool,
    /// Allowed departure window of the leg, in real time
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

impl AccessEgress {
    pub fn walk(stop: StopIdx, duration: Time) -> Self {
        Self::walk_with_cost(stop, duration, duration * WALK_C1_PER_SECOND)
    }

    pub fn walk_with_cost(stop: StopIdx, duration: Time, c1: Cost) -> Self {
        Self {
            stop,
            duration,
            c1,
            num_rides: 0,
            on_board: false,
            opening_hours: None,
        }
    }

    /// Flexible leg with `num_rides` rides, arriving on board
    pub fn flex(stop: StopIdx, duration: Time, num_rides: usize) -> Self {
        Self {
            num_rides,
            on_board: true,
            ..Self::walk(stop, duration)
        }
    }

    /// Flexible leg with `num_rides` rides that ends with a walk
    pub fn flex_and_walk(stop: StopIdx, duration: Time, num_rides: usize) -> Self {
        Self {
            num_rides,
            on_board: false,
            ..Self::walk(stop, duration)
        }
    }

    pub fn with_opening_hours(mut self, open: Time, close: Time) -> Self {
        self.opening_hours = Some(OpeningHours { open, close });
        self
    }

    pub fn has_rides(&self) -> bool {
        self.num_rides > 0
    }

    /// The stop is reached on board, a transfer may follow
    pub fn stop_reached_on_board(&self) -> bool {
        self.has_rides() && self.on_board
    }

    /// Earliest departure at or after `time`, `None` when the leg is already closed
    pub fn earliest_departure_time(&self, time: Time) -> Option<Time> {
        match self.opening_hours {
            None => Some(time),
            Some(OpeningHours { open, .. }) if time < open => Some(open),
            Some(OpeningHours { close, .. }) if time > close => None,
            Some(_) => Some(time),
        }
    }

    /// Latest arrival at or before `time`, `None` when the leg has not opened yet
    pub fn latest_arrival_time(&self, time: Time) -> Option<Time> {
        let departure = time - self.duration;
        match self.opening_hours {
            None => Some(time),
            Some(OpeningHours { close, .. }) if departure > close => Some(close + self.duration),
            Some(OpeningHours { open, .. }) if departure < open => None,
            Some(_) => Some(time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walking_leg_cost_uses_walk_reluctance() {
        let leg = AccessEgress::walk(3, 30);
        assert_eq!(leg.c1, 6_000);
        assert!(!leg.stop_reached_on_board());
        assert!(AccessEgress::flex(3, 300, 1).stop_reached_on_board());
        assert!(!AccessEgress::flex_and_walk(3, 300, 1).stop_reached_on_board());
    }

    #[test]
    fn opening_hours_shift_or_reject() {
        let leg = AccessEgress::walk(0, 60).with_opening_hours(600, 900);
        assert_eq!(leg.earliest_departure_time(300), Some(600));
        assert_eq!(leg.earliest_departure_time(700), Some(700));
        assert_eq!(leg.earliest_departure_time(901), None);

        assert_eq!(leg.latest_arrival_time(1200), Some(960));
        assert_eq!(leg.latest_arrival_time(700), Some(700));
        assert_eq!(leg.latest_arrival_time(620), None);
    }
}
