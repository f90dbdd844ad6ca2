use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::ForecastEntry;

/// Maximum number of days shown in the forecast strip.
pub const MAX_DAYS: usize = 5;

const NOON: u32 = 12;

/// Collapse sub-daily samples into one sample per calendar date.
///
/// Dates keep the order in which they first appear in `entries` and only
/// the first [`MAX_DAYS`] are kept. Within a date the sample whose hour is
/// closest to noon wins; on a tie the earlier sample stays.
pub fn daily(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    let mut days: Vec<(&str, &ForecastEntry)> = Vec::new();

    for entry in entries {
        let date = date_part(&entry.timestamp);
        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, best)) => {
                if noon_distance(entry) < noon_distance(best) {
                    *best = entry;
                }
            }
            None => days.push((date, entry)),
        }
    }

    days.into_iter()
        .take(MAX_DAYS)
        .map(|(_, entry)| entry.clone())
        .collect()
}

/// English weekday name for the entry's calendar date.
pub fn weekday_name(entry: &ForecastEntry) -> Option<&'static str> {
    let date = NaiveDate::parse_from_str(date_part(&entry.timestamp), "%Y-%m-%d").ok()?;
    Some(match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    })
}

fn split(timestamp: &str) -> (&str, Option<&str>) {
    match timestamp.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (timestamp, None),
    }
}

fn date_part(timestamp: &str) -> &str {
    split(timestamp).0
}

fn hour(timestamp: &str) -> Option<u32> {
    let time = split(timestamp).1?;
    let hour = time.split(':').next()?;
    hour.trim().parse().ok()
}

// Unparseable hours sort last so they never displace a real sample.
fn noon_distance(entry: &ForecastEntry) -> u32 {
    hour(&entry.timestamp)
        .map(|h| h.abs_diff(NOON))
        .unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp: ts.to_string(),
            temperature: 10.0,
            feels_like: None,
            humidity: None,
            condition_text: "clear sky".to_string(),
            condition_code: "01d".to_string(),
        }
    }

    fn stamps(entries: &[ForecastEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.timestamp.as_str()).collect()
    }

    #[test]
    fn picks_sample_closest_to_noon() {
        let input = [
            entry("2024-01-01 06:00:00"),
            entry("2024-01-01 09:00:00"),
            entry("2024-01-01 12:00:00"),
            entry("2024-01-01 15:00:00"),
            entry("2024-01-02 00:00:00"),
            entry("2024-01-02 15:00:00"),
        ];

        let out = daily(&input);
        assert_eq!(stamps(&out), ["2024-01-01 12:00:00", "2024-01-02 15:00:00"]);
    }

    #[test]
    fn ties_keep_first_seen() {
        let input = [entry("2024-01-01 09:00:00"), entry("2024-01-01 15:00:00")];
        assert_eq!(stamps(&daily(&input)), ["2024-01-01 09:00:00"]);
    }

    #[test]
    fn caps_at_five_days() {
        let input: Vec<_> = (1..=7)
            .flat_map(|d| {
                [
                    entry(&format!("2024-03-0{d} 09:00:00")),
                    entry(&format!("2024-03-0{d} 12:00:00")),
                ]
            })
            .collect();

        let out = daily(&input);
        assert_eq!(out.len(), MAX_DAYS);
        assert!(out.iter().all(|e| e.timestamp.ends_with("12:00:00")));
        assert_eq!(out[4].timestamp, "2024-03-05 12:00:00");
    }

    #[test]
    fn both_timestamp_formats_partition_the_same() {
        let spaced = [entry("2024-01-01 12:00:00"), entry("2024-01-02 12:00:00")];
        let iso = [entry("2024-01-01T12:00:00"), entry("2024-01-02T12:00:00")];

        assert_eq!(daily(&spaced).len(), 2);
        assert_eq!(daily(&iso).len(), 2);

        let mixed = [entry("2024-01-01T06:00:00"), entry("2024-01-01 12:00:00")];
        assert_eq!(stamps(&daily(&mixed)), ["2024-01-01 12:00:00"]);
    }

    #[test]
    fn keeps_input_order_of_dates() {
        let input = [entry("2024-01-03 12:00:00"), entry("2024-01-01 12:00:00")];
        assert_eq!(
            stamps(&daily(&input)),
            ["2024-01-03 12:00:00", "2024-01-01 12:00:00"]
        );
    }

    #[test]
    fn unparseable_hour_does_not_win() {
        let input = [entry("2024-01-01 21:00:00"), entry("2024-01-01")];
        assert_eq!(stamps(&daily(&input)), ["2024-01-01 21:00:00"]);
    }

    #[test]
    fn empty_input() {
        assert!(daily(&[]).is_empty());
    }

    #[test]
    fn weekday_from_either_format() {
        assert_eq!(weekday_name(&entry("2024-01-01 12:00:00")), Some("Monday"));
        assert_eq!(weekday_name(&entry("2024-01-06T12:00:00")), Some("Saturday"));
        assert_eq!(weekday_name(&entry("not a date")), None);
    }
}
