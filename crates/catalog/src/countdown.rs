//! Time left until the daily rotation changes

use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Duration from `now` until the next local midnight
pub fn time_until_rotation(now: NaiveDateTime) -> Duration {
    match now.date().succ_opt() {
        Some(tomorrow) => tomorrow.and_time(NaiveTime::MIN) - now,
        None => Duration::zero(),
    }
}

/// Formats a duration as `HH:MM:SS`; negative durations show as zero
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid time")
    }

    #[test]
    fn test_until_midnight() {
        assert_eq!(time_until_rotation(at(23, 59, 30)), Duration::seconds(30));
        assert_eq!(time_until_rotation(at(0, 0, 0)), Duration::hours(24));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_countdown(time_until_rotation(at(10, 15, 5))), "13:44:55");
        assert_eq!(format_countdown(Duration::seconds(-5)), "00:00:00");
        assert_eq!(format_countdown(Duration::milliseconds(1999)), "00:00:01");
    }
}
