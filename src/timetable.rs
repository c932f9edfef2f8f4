//! JSON timetable files.
//!
//! Stops are referenced by name and created on first use. Trip times are
//! whitespace separated `HH:MM[:SS]` values, one per route stop.

use std::fs;
use std::path::Path;

use log::{info, warn};
use rangeraptor_core::prelude::{
    BoardAlight, Cost, PublicTransitData, Time, TransferConstraint, TransitDataBuilder,
    TransitMode,
};
use serde::Deserialize;

use crate::error::CliError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimetableFile {
    /// Board/alight costs, stops without an entry cost nothing
    pub stop_costs: Vec<StopCost>,
    pub routes: Vec<RouteEntry>,
    pub transfers: Vec<TransferEntry>,
    pub constrained_transfers: Vec<ConstraintEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopCost {
    pub stop: String,
    pub cost: Cost,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub name: String,
    #[serde(default)]
    pub mode: TransitMode,
    pub stops: Vec<String>,
    #[serde(default)]
    pub priority_group: Option<u8>,
    #[serde(default)]
    pub slack_index: usize,
    #[serde(default)]
    pub reluctance_index: usize,
    /// Positions where boarding or alighting is restricted
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
    pub trips: Vec<TripEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Restriction {
    pub pos: usize,
    #[serde(default = "allowed")]
    pub board: bool,
    #[serde(default = "allowed")]
    pub alight: bool,
}

fn allowed() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripEntry {
    pub id: String,
    pub times: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferEntry {
    pub from: String,
    pub to: String,
    pub duration: Time,
    #[serde(default)]
    pub c1: Option<Cost>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstraintEntry {
    pub from_trip: String,
    pub from_stop: String,
    pub to_trip: String,
    pub to_stop: String,
    #[serde(flatten)]
    pub constraint: TransferConstraint,
}

impl TimetableFile {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn build(&self) -> PublicTransitData {
        let mut builder = TransitDataBuilder::new();
        for route in &self.routes {
            let stops: Vec<&str> = route.stops.iter().map(String::as_str).collect();
            builder.route(&route.name, |r| {
                r.stops(&stops)
                    .mode(route.mode)
                    .slack_index(route.slack_index)
                    .reluctance_index(route.reluctance_index);
                if let Some(group) = route.priority_group {
                    r.priority_group(group);
                }
                for rule in &route.restrictions {
                    let board_alight = BoardAlight {
                        board: rule.board,
                        alight: rule.alight,
                    };
                    r.board_alight(rule.pos, board_alight);
                }
                for trip in &route.trips {
                    r.schedule(&trip.id, &trip.times);
                }
            });
        }
        for entry in &self.stop_costs {
            builder.stop_cost(&entry.stop, entry.cost);
        }
        for transfer in &self.transfers {
            let (from, to) = (&transfer.from, &transfer.to);
            match transfer.c1 {
                Some(c1) => builder.transfer_with_cost(from, to, transfer.duration, c1),
                None => builder.transfer(from, to, transfer.duration),
            };
        }
        for c in &self.constrained_transfers {
            builder.constrained_transfer(
                &c.from_trip,
                &c.from_stop,
                &c.to_trip,
                &c.to_stop,
                c.constraint,
            );
        }

        let data = builder.build();
        for issue in &data.issues {
            warn!("{issue}");
        }
        info!(
            "Loaded {} stops and {} routes",
            data.stops.len(),
            data.routes.len()
        );
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangeraptor_core::prelude::TransitDataProvider;

    const SAMPLE: &str = r#"{
        "stop_costs": [{ "stop": "B", "cost": 500 }],
        "routes": [
            {
                "name": "L1",
                "mode": "tram",
                "stops": ["A", "B", "C"],
                "restrictions": [{ "pos": 0, "alight": false }],
                "trips": [
                    { "id": "t1", "times": "09:10 09:25 09:40" },
                    { "id": "broken", "times": "09:10 09:05 09:40" }
                ]
            }
        ],
        "transfers": [{ "from": "C", "to": "D", "duration": 120 }],
        "constrained_transfers": [
            {
                "from_trip": "t1", "from_stop": "B",
                "to_trip": "t1", "to_stop": "C",
                "guaranteed": true
            }
        ]
    }"#;

    #[test]
    fn builds_transit_data_from_json() {
        let file: TimetableFile = serde_json::from_str(SAMPLE).unwrap();
        let data = file.build();

        assert_eq!(data.num_stops(), 4);
        assert_eq!(data.num_routes(), 1);
        let b = data.stop_by_name("B").unwrap();
        assert_eq!(data.stop_board_alight_cost(b), 500);
        let c = data.stop_by_name("C").unwrap();
        assert_eq!(data.transfers_from(c).len(), 1);

        let timetable = data.timetable(0).unwrap();
        assert_eq!(timetable.num_trips(), 1);
        assert!(
            data.issues
                .iter()
                .any(|issue| issue.to_string().contains("broken"))
        );
    }

    #[test]
    fn constraint_flags_are_flattened() {
        let file: TimetableFile = serde_json::from_str(SAMPLE).unwrap();
        let constraint = file.constrained_transfers[0].constraint;
        assert!(constraint.guaranteed);
        assert!(!constraint.stay_seated);
        assert_eq!(constraint.priority, 0);
    }
}
