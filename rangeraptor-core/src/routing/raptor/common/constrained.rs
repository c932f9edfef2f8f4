//! Lookup of constrained transfers while boarding.
//!
//! Constraints are stored in real time order. In a reverse search the rider
//! comes from the real "to" trip and boards the real "from" trip, so the
//! sides are swapped.

use super::arrivals::{ArrivalKind, StopArrival};
use super::calculator::TransitCalculator;
use crate::model::transit::{
    ConstrainedTransfer, RouteIdx, Timetable, TransferConstraint, TripSchedule,
};

/// Constraints linking the trip `source` arrived on to `route` at `pos`,
/// paired with the index of the trip to board
pub(crate) fn constraints_from<'c>(
    calculator: &TransitCalculator,
    constraints: &'c [ConstrainedTransfer],
    route: RouteIdx,
    pos: usize,
    source: &StopArrival,
) -> impl Iterator<Item = (usize, TransferConstraint)> + use<'c> {
    let forward = calculator.is_forward();
    let from = match source.kind {
        ArrivalKind::Transit {
            route,
            trip,
            alight_pos,
            ..
        } => Some((route, trip, alight_pos)),
        _ => None,
    };
    constraints.iter().filter_map(move |c| {
        let from = from?;
        let (source_side, target_side) = if forward {
            ((c.from_route, c.from_trip, c.from_pos), (c.to_route, c.to_trip, c.to_pos))
        } else {
            ((c.to_route, c.to_trip, c.to_pos), (c.from_route, c.from_trip, c.from_pos))
        };
        let (to_route, to_trip, to_pos) = target_side;
        let matches = source_side == from && to_route == route && to_pos == pos;
        matches.then_some((to_trip, c.constraint))
    })
}

/// Stay-seated or guaranteed boarding after `source`, highest priority first.
/// The trip must not leave before the source trip arrives.
pub(crate) fn facilitated_boarding<'t>(
    calculator: &TransitCalculator,
    timetable: &Timetable<'t>,
    constraints: &[ConstrainedTransfer],
    pos: usize,
    source: &StopArrival,
) -> Option<(TripSchedule<'t>, TransferConstraint)> {
    let ArrivalKind::Transit { alight_time, .. } = source.kind else {
        return None;
    };
    constraints_from(calculator, constraints, timetable.route, pos, source)
        .filter(|(trip, constraint)| constraint.is_facilitated() && *trip < timetable.num_trips())
        .map(|(trip, constraint)| (timetable.trip(trip), constraint))
        .filter(|(trip, _)| !calculator.is_before(calculator.board_time(trip, pos), alight_time))
        .max_by_key(|(_, constraint)| constraint.priority)
}

/// Trips that may not be boarded after `source`
pub(crate) fn not_allowed_trips(
    calculator: &TransitCalculator,
    constraints: &[ConstrainedTransfer],
    route: RouteIdx,
    pos: usize,
    source: &StopArrival,
) -> Vec<usize> {
    constraints_from(calculator, constraints, route, pos, source)
        .filter(|(_, constraint)| constraint.not_allowed)
        .map(|(trip, _)| trip)
        .collect()
}
