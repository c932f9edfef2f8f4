use crate::model::transit::{Time, Timetable, TripSchedule};

/// Earliest trip in `0..end` departing at `pos` at or after `earliest_board`.
/// Ties go to the lowest trip index.
pub(crate) fn find_earliest_trip(
    timetable: &Timetable<'_>,
    pos: usize,
    earliest_board: Time,
    end: usize,
) -> Option<usize> {
    if !timetable.is_fifo() {
        return (0..end)
            .filter(|&i| timetable.trip(i).departure(pos) >= earliest_board)
            .min_by_key(|&i| (timetable.trip(i).departure(pos), i));
    }
    let mut low = 0;
    let mut high = end;
    let mut result = None;
    while low < high {
        let mid = (low + high) / 2;
        if timetable.trip(mid).departure(pos) >= earliest_board {
            result = Some(mid);
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    result
}

/// Latest trip in `start..` arriving at `pos` at or before `latest_alight`.
/// Ties go to the highest trip index.
pub(crate) fn find_latest_trip(
    timetable: &Timetable<'_>,
    pos: usize,
    latest_alight: Time,
    start: usize,
) -> Option<usize> {
    let num_trips = timetable.num_trips();
    if !timetable.is_fifo() {
        return (start..num_trips)
            .filter(|&i| timetable.trip(i).arrival(pos) <= latest_alight)
            .max_by_key(|&i| (timetable.trip(i).arrival(pos), i));
    }
    let mut low = start;
    let mut high = num_trips;
    let mut result = None;
    while low < high {
        let mid = (low + high) / 2;
        if timetable.trip(mid).arrival(pos) <= latest_alight {
            result = Some(mid);
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    result
}

/// Boarding search over one timetable in search direction
#[derive(Debug, Clone, Copy)]
pub struct TripSearch<'a> {
    timetable: Timetable<'a>,
    forward: bool,
}

impl<'a> TripSearch<'a> {
    pub fn new(timetable: Timetable<'a>, forward: bool) -> Self {
        Self { timetable, forward }
    }

    /// Best trip boardable at `pos` no sooner than `earliest_board`.
    ///
    /// Only trips better than `on_trip` are considered, and trips listed in
    /// `excluded` are skipped.
    pub fn search(
        &self,
        pos: usize,
        earliest_board: Time,
        on_trip: Option<usize>,
        excluded: &[usize],
    ) -> Option<TripSchedule<'a>> {
        let num_trips = self.timetable.num_trips();
        if num_trips == 0 {
            return None;
        }
        if self.forward {
            let end = on_trip.unwrap_or(num_trips).min(num_trips);
            let mut found = find_earliest_trip(&self.timetable, pos, earliest_board, end)?;
            while excluded.contains(&found) {
                found = if self.timetable.is_fifo() {
                    Some(found + 1).filter(|&i| i < end)?
                } else {
                    (0..end)
                        .filter(|i| !excluded.contains(i))
                        .filter(|&i| self.timetable.trip(i).departure(pos) >= earliest_board)
                        .min_by_key(|&i| (self.timetable.trip(i).departure(pos), i))?
                };
            }
            Some(self.timetable.trip(found))
        } else {
            let start = on_trip.map_or(0, |i| i + 1);
            let mut found = find_latest_trip(&self.timetable, pos, earliest_board, start)?;
            while excluded.contains(&found) {
                found = if self.timetable.is_fifo() {
                    found.checked_sub(1).filter(|&i| i >= start)?
                } else {
                    (start..num_trips)
                        .filter(|i| !excluded.contains(i))
                        .filter(|&i| self.timetable.trip(i).arrival(pos) <= earliest_board)
                        .max_by_key(|&i| (self.timetable.trip(i).arrival(pos), i))?
                };
            }
            Some(self.timetable.trip(found))
        }
    }

    pub fn trip(&self, index: usize) -> Option<TripSchedule<'a>> {
        (index < self.timetable.num_trips()).then(|| self.timetable.trip(index))
    }
}
