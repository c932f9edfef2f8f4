//! Service-day time parsing and formatting.
//!
//! Times are plain seconds since midnight and may exceed 24 hours for trips
//! running past midnight.

use super::transit::Time;

/// Parse time string in `HH:MM:SS` or `H:MM` format to seconds since midnight
pub fn parse_time(time_str: &str) -> Option<Time> {
    let bytes = time_str.as_bytes();

    // Fast path for HH:MM:SS format
    if bytes.len() == 8
        && bytes[2] == b':'
        && bytes[5] == b':'
        && [0, 1, 3, 4, 6, 7].iter().all(|&i| bytes[i].is_ascii_digit())
    {
        let digit = |i: usize| Time::from(bytes[i] - b'0');
        let hours = digit(0) * 10 + digit(1);
        let minutes = digit(3) * 10 + digit(4);
        let seconds = digit(6) * 10 + digit(7);
        if minutes < 60 && seconds < 60 {
            return Some(hours * 3600 + minutes * 60 + seconds);
        }
        return None;
    }

    parse_time_fallback(time_str)
}

fn parse_time_fallback(time_str: &str) -> Option<Time> {
    let mut parts = time_str.trim().split(':');
    let hours: Time = parts.next()?.parse().ok()?;
    let minutes: Time = parts.next()?.parse().ok()?;
    let seconds: Time = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || hours < 0 || !(0..60).contains(&minutes) {
        return None;
    }
    if !(0..60).contains(&seconds) {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}

/// Formats a time as `9:05`, or `10:00:15` when seconds are present
pub fn time_to_str(time: Time) -> String {
    let sign = if time < 0 { "-" } else { "" };
    let t = time.abs();
    let (h, m, s) = (t / 3600, t % 3600 / 60, t % 60);
    if s == 0 {
        format!("{sign}{h}:{m:02}")
    } else {
        format!("{sign}{h}:{m:02}:{s:02}")
    }
}

/// Formats a duration as `30s`, `19m` or `1h59m45s`
pub fn duration_to_str(duration: Time) -> String {
    if duration == 0 {
        return "0s".to_string();
    }
    let mut out = String::new();
    if duration < 0 {
        out.push('-');
    }
    let d = duration.abs();
    let (h, m, s) = (d / 3600, d % 3600 / 60, d % 60);
    if h > 0 {
        out.push_str(&format!("{h}h"));
    }
    if m > 0 {
        out.push_str(&format!("{m}m"));
    }
    if s > 0 {
        out.push_str(&format!("{s}s"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gtfs_style_times() {
        assert_eq!(parse_time("09:10:00"), Some(9 * 3600 + 600));
        assert_eq!(parse_time("25:00:01"), Some(25 * 3600 + 1));
        assert_eq!(parse_time("0:02"), Some(120));
        assert_eq!(parse_time("0:05:45"), Some(345));
        assert_eq!(parse_time("9:61"), None);
        assert_eq!(parse_time("abc"), None);
        assert_eq!(parse_time("1:02:03:04"), None);
    }

    #[test]
    fn formats_times_and_durations() {
        assert_eq!(time_to_str(120), "0:02");
        assert_eq!(time_to_str(90), "0:01:30");
        assert_eq!(time_to_str(10 * 3600 + 15), "10:00:15");
        assert_eq!(duration_to_str(0), "0s");
        assert_eq!(duration_to_str(30), "30s");
        assert_eq!(duration_to_str(19 * 60), "19m");
        assert_eq!(duration_to_str(11 * 60 + 30), "11m30s");
        assert_eq!(duration_to_str(7185), "1h59m45s");
    }
}
