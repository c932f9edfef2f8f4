//! Journeys reconstructed from the search, in real time order

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::model::transit::{Cost, RouteIdx, StopIdx, Time};
use crate::model::{duration_to_str, time_to_str};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathLeg {
    Access {
        to_stop: StopIdx,
        to_stop_name: String,
        start_time: Time,
        end_time: Time,
        num_rides: usize,
        c1: Cost,
    },
    Transit {
        route: RouteIdx,
        route_label: String,
        trip: usize,
        trip_id: String,
        from_stop: StopIdx,
        from_stop_name: String,
        to_stop: StopIdx,
        to_stop_name: String,
        /// Every stop passed, both ends included
        stops: Vec<StopIdx>,
        start_time: Time,
        end_time: Time,
        stay_seated: bool,
        c1: Cost,
    },
    Transfer {
        from_stop: StopIdx,
        from_stop_name: String,
        to_stop: StopIdx,
        to_stop_name: String,
        start_time: Time,
        end_time: Time,
        c1: Cost,
    },
    Egress {
        from_stop: StopIdx,
        from_stop_name: String,
        start_time: Time,
        end_time: Time,
        num_rides: usize,
        c1: Cost,
    },
}

impl PathLeg {
    pub fn start_time(&self) -> Time {
        match self {
            PathLeg::Access { start_time, .. }
            | PathLeg::Transit { start_time, .. }
            | PathLeg::Transfer { start_time, .. }
            | PathLeg::Egress { start_time, .. } => *start_time,
        }
    }

    pub fn end_time(&self) -> Time {
        match self {
            PathLeg::Access { end_time, .. }
            | PathLeg::Transit { end_time, .. }
            | PathLeg::Transfer { end_time, .. }
            | PathLeg::Egress { end_time, .. } => *end_time,
        }
    }

    pub fn duration(&self) -> Time {
        self.end_time() - self.start_time()
    }

    pub fn c1(&self) -> Cost {
        match self {
            PathLeg::Access { c1, .. }
            | PathLeg::Transit { c1, .. }
            | PathLeg::Transfer { c1, .. }
            | PathLeg::Egress { c1, .. } => *c1,
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(self, PathLeg::Transit { .. })
    }

    /// Stop the leg ends at, `None` for egress
    pub fn to_stop(&self) -> Option<(StopIdx, &str)> {
        match self {
            PathLeg::Access {
                to_stop,
                to_stop_name,
                ..
            }
            | PathLeg::Transit {
                to_stop,
                to_stop_name,
                ..
            }
            | PathLeg::Transfer {
                to_stop,
                to_stop_name,
                ..
            } => Some((*to_stop, to_stop_name)),
            PathLeg::Egress { .. } => None,
        }
    }
}

fn street_leg(f: &mut fmt::Formatter<'_>, duration: Time, num_rides: usize) -> fmt::Result {
    if num_rides > 0 {
        write!(f, "Flex {} {num_rides}x", duration_to_str(duration))
    } else {
        write!(f, "Walk {}", duration_to_str(duration))
    }
}

impl fmt::Display for PathLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathLeg::Access { num_rides, .. } | PathLeg::Egress { num_rides, .. } => {
                street_leg(f, self.duration(), *num_rides)
            }
            PathLeg::Transit {
                route_label,
                start_time,
                end_time,
                ..
            } => write!(
                f,
                "{route_label} {} {}",
                time_to_str(*start_time),
                time_to_str(*end_time)
            ),
            PathLeg::Transfer { .. } => street_leg(f, self.duration(), 0),
        }
    }
}

/// Formats centi-second cost as seconds with `_` thousand separators
pub fn cost_to_str(c1: Cost) -> String {
    let sign = if c1 < 0 { "-" } else { "" };
    let abs = c1.unsigned_abs();
    let digits = (abs / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('_');
        }
        grouped.push(ch);
    }
    match abs % 100 {
        0 => format!("{sign}{grouped}"),
        cents => format!("{sign}{grouped}.{cents:02}"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Path {
    pub start_time: Time,
    pub end_time: Time,
    pub c1: Cost,
    pub c2: Option<u32>,
    pub number_of_transfers: usize,
    pub legs: Vec<PathLeg>,
}

impl Path {
    pub fn duration(&self) -> Time {
        self.end_time - self.start_time
    }

    pub fn transit_legs(&self) -> impl Iterator<Item = &PathLeg> {
        self.legs.iter().filter(|leg| leg.is_transit())
    }

    pub fn access_leg(&self) -> Option<&PathLeg> {
        self.legs.first()
    }

    pub fn egress_leg(&self) -> Option<&PathLeg> {
        self.legs.last()
    }

    /// Every stop visited, on board or not, in travel order
    pub fn visited_stops(&self) -> Vec<StopIdx> {
        let mut stops = Vec::new();
        for leg in &self.legs {
            match leg {
                PathLeg::Transit { stops: passed, .. } => stops.extend_from_slice(passed),
                PathLeg::Transfer {
                    from_stop, to_stop, ..
                } => stops.extend([*from_stop, *to_stop]),
                PathLeg::Access { to_stop, .. } => stops.push(*to_stop),
                PathLeg::Egress { from_stop, .. } => stops.push(*from_stop),
            }
        }
        stops.dedup();
        stops
    }

    fn sort_key(&self) -> (Time, Time, Cost, usize) {
        (
            self.end_time,
            self.start_time,
            self.c1,
            self.number_of_transfers,
        )
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Path {}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, leg) in self.legs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ~ ")?;
            }
            write!(f, "{leg}")?;
            if let (Some((_, name)), true) = (leg.to_stop(), i + 1 < self.legs.len()) {
                write!(f, " ~ {name}")?;
            }
        }
        write!(
            f,
            " [{} {} {} Tₓ{} C₁{}",
            time_to_str(self.start_time),
            time_to_str(self.end_time),
            duration_to_str(self.duration()),
            self.number_of_transfers,
            cost_to_str(self.c1)
        )?;
        if let Some(c2) = self.c2 {
            write!(f, " C₂{c2}")?;
        }
        f.write_str("]")
    }
}
