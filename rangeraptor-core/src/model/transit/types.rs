//! Basic types of the transit model

use serde::{Deserialize, Serialize};

/// Dense stop index, valid within one `PublicTransitData`
pub type StopIdx = usize;
/// Dense route (pattern) index
pub type RouteIdx = usize;
/// Seconds since the service-day midnight. Durations use the same type.
pub type Time = i32;
/// Generalized cost in centi-seconds
pub type Cost = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitMode {
    #[default]
    Bus,
    Tram,
    Rail,
    Subway,
    Ferry,
    Cable,
    Other,
}

impl TransitMode {
    pub fn label(self) -> &'static str {
        match self {
            TransitMode::Bus => "BUS",
            TransitMode::Tram => "TRAM",
            TransitMode::Rail => "RAIL",
            TransitMode::Subway => "SUBWAY",
            TransitMode::Ferry => "FERRY",
            TransitMode::Cable => "CABLE",
            TransitMode::Other => "TRANSIT",
        }
    }
}

/// Scheduled arrival and departure of one trip at one pattern position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopTime {
    pub arrival: Time,
    pub departure: Time,
}

impl StopTime {
    pub fn at(time: Time) -> Self {
        Self {
            arrival: time,
            departure: time,
        }
    }
}

/// Boarding/alighting permission at a pattern position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardAlight {
    pub board: bool,
    pub alight: bool,
}

impl BoardAlight {
    pub const ALLOWED: Self = Self {
        board: true,
        alight: true,
    };
    pub const BOARD_ONLY: Self = Self {
        board: true,
        alight: false,
    };
    pub const ALIGHT_ONLY: Self = Self {
        board: false,
        alight: true,
    };
}

impl Default for BoardAlight {
    fn default() -> Self {
        Self::ALLOWED
    }
}

#[derive(Debug, Clone)]
pub struct Stop {
    pub name: String,
    /// Generalized cost added when boarding or alighting here
    pub board_alight_cost: Cost,
    pub routes_start: usize,
    pub routes_len: usize,
    pub transfers_start: usize,
    pub transfers_len: usize,
    pub transfers_to_start: usize,
    pub transfers_to_len: usize,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub mode: TransitMode,
    pub stops_start: usize,
    pub num_stops: usize,
    pub trips_start: usize,
    pub num_trips: usize,
    /// Index of the first trip of this route in the trip id table
    pub first_trip: usize,
    pub slack_index: usize,
    pub reluctance_index: usize,
    /// Bitmask of transit priority groups, 0 when the route has none
    pub priority_group: u32,
    /// False when some trip overtakes another, binary trip search is not valid then
    pub fifo: bool,
    pub constrained_start: usize,
    pub constrained_len: usize,
}

/// Walking link between two stops. In the reverse index `target_stop` is
/// the origin of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub target_stop: StopIdx,
    pub duration: Time,
    #[serde(default)]
    pub c1: Option<Cost>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConstraint {
    pub priority: i32,
    pub stay_seated: bool,
    pub guaranteed: bool,
    pub not_allowed: bool,
}

impl TransferConstraint {
    pub fn stay_seated() -> Self {
        Self {
            stay_seated: true,
            ..Self::default()
        }
    }

    pub fn guaranteed() -> Self {
        Self {
            guaranteed: true,
            ..Self::default()
        }
    }

    pub fn not_allowed() -> Self {
        Self {
            not_allowed: true,
            ..Self::default()
        }
    }

    /// Stay-seated and guaranteed transfers bypass the regular slack
    pub fn is_facilitated(&self) -> bool {
        self.stay_seated || self.guaranteed
    }
}

/// Constraint linking two specific trips at one stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstrainedTransfer {
    pub from_route: RouteIdx,
    pub from_trip: usize,
    pub from_pos: usize,
    pub to_route: RouteIdx,
    pub to_trip: usize,
    pub to_pos: usize,
    pub constraint: TransferConstraint,
}
