//! JSON request files with stop names and clock times

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use rangeraptor_core::prelude::{
    AccessEgress, Cost, CostParameters, PassThroughPoint, PublicTransitData, RaptorProfile,
    RaptorRequest, SearchDirection, SlackParameters, StopIdx, Time, ViaLocation, parse_time,
};
use serde::Deserialize;

use crate::error::CliError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestFile {
    pub profile: RaptorProfile,
    pub direction: SearchDirection,
    /// Only used to print absolute times
    pub service_date: Option<NaiveDate>,
    pub earliest_departure: Option<String>,
    pub latest_arrival: Option<String>,
    /// Seconds, sized from the travel duration when missing
    pub search_window: Option<Time>,
    pub access: Vec<LegEntry>,
    pub egress: Vec<LegEntry>,
    pub via: Vec<ViaEntry>,
    pub pass_through: Vec<PassThroughEntry>,
    pub timetable: bool,
    pub max_transfers: Option<usize>,
    pub max_additional_transfers: Option<usize>,
    pub num_itineraries: Option<usize>,
    pub constrained_transfers: bool,
    pub transit_group_priority: bool,
    pub cost: CostParameters,
    pub slack: SlackParameters,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegEntry {
    pub stop: String,
    /// Seconds
    pub duration: Time,
    /// Walking cost when missing
    #[serde(default)]
    pub c1: Option<Cost>,
    #[serde(default)]
    pub num_rides: usize,
    #[serde(default)]
    pub on_board: bool,
    /// Opening and closing time
    #[serde(default)]
    pub opening_hours: Option<(String, String)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViaEntry {
    pub label: String,
    pub stops: Vec<String>,
    #[serde(default)]
    pub min_wait: Option<Time>,
    #[serde(default)]
    pub max_wait: Option<Time>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassThroughEntry {
    pub label: String,
    pub stops: Vec<String>,
}

fn time(value: &str) -> Result<Time, CliError> {
    parse_time(value).ok_or_else(|| CliError::InvalidTime(value.to_string()))
}

fn stop(data: &PublicTransitData, name: &str) -> Result<StopIdx, CliError> {
    data.stop_by_name(name)
        .ok_or_else(|| CliError::UnknownStop(name.to_string()))
}

fn stops(data: &PublicTransitData, names: &[String]) -> Result<Vec<StopIdx>, CliError> {
    names.iter().map(|name| stop(data, name)).collect()
}

impl LegEntry {
    fn resolve(&self, data: &PublicTransitData) -> Result<AccessEgress, CliError> {
        let stop = stop(data, &self.stop)?;
        let mut leg = match self.c1 {
            Some(c1) => AccessEgress::walk_with_cost(stop, self.duration, c1),
            None => AccessEgress::walk(stop, self.duration),
        };
        leg.num_rides = self.num_rides;
        leg.on_board = self.on_board;
        if let Some((open, close)) = &self.opening_hours {
            leg = leg.with_opening_hours(time(open)?, time(close)?);
        }
        Ok(leg)
    }
}

impl RequestFile {
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

    /// Resolves stop names and times against `data`. Semantic checks are
    /// left to the engine.
    pub fn to_request(
        &self,
        data: &PublicTransitData,
        timeout: Option<Duration>,
    ) -> Result<RaptorRequest, CliError> {
        let mut builder = RaptorRequest::builder()
            .profile(self.profile)
            .direction(self.direction)
            .timetable(self.timetable)
            .constrained_transfers(self.constrained_transfers)
            .transit_group_priority(self.transit_group_priority)
            .cost(self.cost.clone())
            .slack(self.slack.clone());

        if let Some(edt) = &self.earliest_departure {
            builder = builder.earliest_departure_time(time(edt)?);
        }
        if let Some(lat) = &self.latest_arrival {
            builder = builder.latest_arrival_time(time(lat)?);
        }
        if let Some(window) = self.search_window {
            builder = builder.search_window(window);
        }
        if let Some(n) = self.max_transfers {
            builder = builder.max_transfers(n);
        }
        if let Some(n) = self.max_additional_transfers {
            builder = builder.max_additional_transfers(n);
        }
        if let Some(n) = self.num_itineraries {
            builder = builder.num_itineraries(n);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        for leg in &self.access {
            builder = builder.access(leg.resolve(data)?);
        }
        for leg in &self.egress {
            builder = builder.egress(leg.resolve(data)?);
        }
        for via in &self.via {
            let mut location = ViaLocation::new(&via.label);
            for stop in stops(data, &via.stops)? {
                location = location.stop(stop);
            }
            if let Some(min_wait) = via.min_wait {
                location = location.with_min_wait(min_wait);
            }
            if let Some(max_wait) = via.max_wait {
                location = location.with_max_wait(max_wait);
            }
            builder = builder.via(location);
        }
        for point in &self.pass_through {
            let point_stops = stops(data, &point.stops)?;
            builder = builder.pass_through(PassThroughPoint::new(&point.label, &point_stops));
        }
        Ok(builder.build())
    }
}
