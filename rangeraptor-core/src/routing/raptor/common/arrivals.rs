//! Stop arrivals shared by all rounds and iterations of one search.
//!
//! Arrivals are appended to an arena and refer to their predecessor by
//! index. Several destination arrivals may share a prefix.

use std::ops::Index;

use crate::model::transit::{Cost, RouteIdx, StopIdx, Time};
use crate::request::AccessEgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrivalId(usize);

impl ArrivalId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalKind {
    Access {
        leg: AccessEgress,
        /// Iteration departure time the leg was added for
        departure_time: Time,
    },
    /// Times are raw trip times in search direction, without slack
    Transit {
        route: RouteIdx,
        trip: usize,
        board_stop: StopIdx,
        board_pos: usize,
        alight_pos: usize,
        board_time: Time,
        alight_time: Time,
        stay_seated: bool,
    },
    Transfer {
        from_stop: StopIdx,
        duration: Time,
        c1: Cost,
    },
    /// Copy of an arrival at a via location, starting the next leg
    Via {
        location: usize,
        latest_board_time: Time,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopArrival {
    pub stop: StopIdx,
    pub time: Time,
    pub round: usize,
    pub c1: Cost,
    pub c2: u32,
    /// Via leg the arrival belongs to, 0 without via locations
    pub leg: usize,
    pub previous: Option<ArrivalId>,
    pub kind: ArrivalKind,
    on_board: bool,
}

impl StopArrival {
    pub fn new(
        stop: StopIdx,
        time: Time,
        round: usize,
        c1: Cost,
        previous: Option<ArrivalId>,
        kind: ArrivalKind,
    ) -> Self {
        let on_board = match kind {
            ArrivalKind::Transit { .. } => true,
            ArrivalKind::Access { leg, .. } => leg.stop_reached_on_board(),
            ArrivalKind::Transfer { .. } | ArrivalKind::Via { .. } => false,
        };
        Self {
            stop,
            time,
            round,
            c1,
            c2: 0,
            leg: 0,
            previous,
            kind,
            on_board,
        }
    }

    pub fn with_c2(mut self, c2: u32) -> Self {
        self.c2 = c2;
        self
    }

    pub fn with_leg(mut self, leg: usize) -> Self {
        self.leg = leg;
        self
    }

    /// Reached riding, so a walking transfer or egress may follow
    pub fn arrived_on_board(&self) -> bool {
        self.on_board
    }

    /// Copy of `self` continuing in the next via leg
    pub fn via_copy(&self, id: ArrivalId, location: usize, time: Time, latest_board: Time) -> Self {
        Self {
            time,
            leg: self.leg + 1,
            previous: Some(id),
            kind: ArrivalKind::Via {
                location,
                latest_board_time: latest_board,
            },
            ..*self
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(self.kind, ArrivalKind::Transit { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArrivalArena {
    arrivals: Vec<StopArrival>,
}

impl ArrivalArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Id the next pushed arrival will get
    pub fn next_id(&self) -> ArrivalId {
        ArrivalId::new(self.arrivals.len())
    }

    pub fn push(&mut self, arrival: StopArrival) -> ArrivalId {
        let id = self.next_id();
        debug_assert!(arrival.previous.is_none_or(|p| p < id));
        self.arrivals.push(arrival);
        id
    }

    pub fn get(&self, id: ArrivalId) -> &StopArrival {
        &self.arrivals[id.0]
    }
}

impl Index<ArrivalId> for ArrivalArena {
    type Output = StopArrival;

    fn index(&self, id: ArrivalId) -> &StopArrival {
        self.get(id)
    }
}
