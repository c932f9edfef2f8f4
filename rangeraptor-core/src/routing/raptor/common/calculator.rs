//! Direction-aware time arithmetic.
//!
//! A forward search moves forward in time and prefers earlier arrivals. A
//! reverse search runs from the egress side back in time and prefers later
//! departures. Everything time-related in the workers goes through
//! `TransitCalculator` so one implementation serves both directions.

use std::iter::Rev;
use std::ops::{Range, RangeInclusive};

use itertools::Either;

use crate::model::transit::{Pattern, StopIdx, Time, Transfer, TransitDataProvider, TripSchedule};
use crate::request::{AccessEgress, SearchDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitCalculator {
    forward: bool,
    /// Earliest departure (forward) or latest arrival (reverse) of the window
    search_start: Time,
    search_window: Time,
    iteration_step: Time,
    /// Latest arrival (forward) or earliest departure (reverse), if any
    time_limit: Option<Time>,
}

impl TransitCalculator {
    pub fn new(
        direction: SearchDirection,
        earliest_departure_time: Option<Time>,
        latest_arrival_time: Option<Time>,
        search_window: Time,
        iteration_step: Time,
    ) -> Self {
        let forward = direction.is_forward();
        let (search_start, time_limit) = if forward {
            (earliest_departure_time.unwrap_or(0), latest_arrival_time)
        } else {
            (latest_arrival_time.unwrap_or(0), earliest_departure_time)
        };
        Self {
            forward,
            search_start,
            search_window,
            iteration_step: iteration_step.max(1),
            time_limit,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn search_window(&self) -> Time {
        self.search_window
    }

    /// `a` is strictly better than `b` in search direction
    pub fn is_before(&self, a: Time, b: Time) -> bool {
        if self.forward { a < b } else { a > b }
    }

    pub fn plus(&self, time: Time, delta: Time) -> Time {
        if self.forward {
            time.saturating_add(delta)
        } else {
            time.saturating_sub(delta)
        }
    }

    pub fn minus(&self, time: Time, delta: Time) -> Time {
        if self.forward {
            time.saturating_sub(delta)
        } else {
            time.saturating_add(delta)
        }
    }

    /// Positive when `to` comes after `from` in search direction
    pub fn duration_between(&self, from: Time, to: Time) -> Time {
        if self.forward { to - from } else { from - to }
    }

    pub fn unreached_time(&self) -> Time {
        if self.forward { Time::MAX } else { Time::MIN }
    }

    pub fn exceeds_time_limit(&self, time: Time) -> bool {
        self.time_limit.is_some_and(|limit| self.is_before(limit, time))
    }

    /// Iteration departure times, processed in the returned order.
    ///
    /// The window is half-open: a window of one hour with a one minute step
    /// gives 60 iterations. Forward searches start with the latest minute,
    /// reverse searches with the earliest.
    pub fn range_raptor_minutes(&self) -> Vec<Time> {
        let step = i64::from(self.iteration_step);
        let n = if self.search_window <= 0 {
            1
        } else {
            (i64::from(self.search_window) + step - 1) / step
        };
        (0..n)
            .map(|i| {
                let offset = Time::try_from(i * step).unwrap_or(Time::MAX);
                self.plus(self.search_start, offset)
            })
            .rev()
            .collect()
    }

    /// Pattern positions in search order, starting at `start`
    pub fn pattern_stop_positions(
        &self,
        num_stops: usize,
        start: usize,
    ) -> Either<Range<usize>, Rev<RangeInclusive<usize>>> {
        if self.forward {
            Either::Left(start..num_stops)
        } else {
            Either::Right((0..=start.min(num_stops.saturating_sub(1))).rev())
        }
    }

    /// First position to scan given the touched positions of a pattern
    pub fn first_position(&self, positions: impl Iterator<Item = usize>) -> Option<usize> {
        if self.forward {
            positions.min()
        } else {
            positions.max()
        }
    }

    pub fn board_allowed(&self, pattern: &Pattern<'_>, pos: usize) -> bool {
        if self.forward {
            pattern.can_board(pos)
        } else {
            pattern.can_alight(pos)
        }
    }

    pub fn alight_allowed(&self, pattern: &Pattern<'_>, pos: usize) -> bool {
        if self.forward {
            pattern.can_alight(pos)
        } else {
            pattern.can_board(pos)
        }
    }

    pub fn board_time(&self, trip: &TripSchedule<'_>, pos: usize) -> Time {
        if self.forward {
            trip.departure(pos)
        } else {
            trip.arrival(pos)
        }
    }

    pub fn alight_time(&self, trip: &TripSchedule<'_>, pos: usize) -> Time {
        if self.forward {
            trip.arrival(pos)
        } else {
            trip.departure(pos)
        }
    }

    /// Walking transfers leaving `stop` in search direction
    pub fn transfers<'p>(
        &self,
        provider: &'p dyn TransitDataProvider,
        stop: StopIdx,
    ) -> &'p [Transfer] {
        if self.forward {
            provider.transfers_from(stop)
        } else {
            provider.transfers_to(stop)
        }
    }

    /// Time at the far end of an access or egress leg entered at `time`,
    /// `None` when the leg is closed
    pub fn traverse(&self, leg: &AccessEgress, time: Time) -> Option<Time> {
        if self.forward {
            leg.earliest_departure_time(time).map(|t| t + leg.duration)
        } else {
            leg.latest_arrival_time(time).map(|t| t - leg.duration)
        }
    }
}
