use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rangeraptor_core::prelude::{Path, RaptorResponse, Time, duration_to_str, time_to_str};
use rangeraptor_core::routing::path::cost_to_str;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub response: &'a RaptorResponse,
}

/// `time` on `date`, times past midnight roll over to the next days
pub fn absolute_time(date: NaiveDate, time: Time) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + TimeDelta::seconds(i64::from(time))
}

fn format_time(date: Option<NaiveDate>, time: Time) -> String {
    match date {
        Some(date) => absolute_time(date, time).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => time_to_str(time),
    }
}

fn path_line(path: &Path, date: Option<NaiveDate>) -> String {
    let mut line = format!(
        "{} - {} ({}, {} transfers, cost {}",
        format_time(date, path.start_time),
        format_time(date, path.end_time),
        duration_to_str(path.duration()),
        path.number_of_transfers,
        cost_to_str(path.c1),
    );
    if let Some(c2) = path.c2 {
        let _ = write!(line, ", c2 {c2}");
    }
    let _ = write!(line, ")\n    {path}");
    line
}

/// Human readable listing of the paths of `response`
pub fn summary(response: &RaptorResponse, date: Option<NaiveDate>) -> String {
    let mut out = String::new();
    if response.is_empty() {
        out.push_str("No paths found");
    } else {
        let _ = write!(out, "{} path(s)", response.paths.len());
    }
    let _ = writeln!(
        out,
        ", {} iterations over a {} window{}",
        response.iterations,
        duration_to_str(response.search_window_used),
        if response.timed_out { ", timed out" } else { "" }
    );
    for (i, path) in response.paths.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, path_line(path, date));
    }
    let _ = write!(
        out,
        "Next search window: {}",
        duration_to_str(response.next_search_window)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> RaptorResponse {
        RaptorResponse {
            paths: vec![Path {
                start_time: 9 * 3600,
                end_time: 9 * 3600 + 2400,
                c1: 252_000,
                c2: None,
                number_of_transfers: 0,
                legs: Vec::new(),
            }],
            search_window_used: 1800,
            iterations: 31,
            next_search_window: 3600,
            ..RaptorResponse::default()
        }
    }

    #[test]
    fn times_past_midnight_move_to_the_next_day() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let time = absolute_time(date, 25 * 3600 + 30);
        assert_eq!(time.to_string(), "2024-05-02 01:00:30");
    }

    #[test]
    fn summary_lists_every_path() {
        let text = summary(&response(), None);
        assert!(text.starts_with("1 path(s), 31 iterations"), "{text}");
        assert!(text.contains("9:00 - 9:40"), "{text}");
        assert!(text.contains("0 transfers, cost 2_520"), "{text}");
        assert!(text.ends_with("Next search window: 1h"), "{text}");

        let date = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert!(summary(&response(), date).contains("2024-05-01 09:40:00"));
    }

    #[test]
    fn report_flattens_the_response() {
        let response = response();
        let report = Report {
            service_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            response: &response,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["service_date"], "2024-05-01");
        assert_eq!(json["paths"][0]["end_time"], 9 * 3600 + 2400);
        assert!(json.get("stop_arrivals").is_none());
    }
}
