use weather_core::HistoryRecord;

use super::fmt_temp;

/// Saved searches, in the order given (the list keeps them newest first).
pub fn history_list(records: &[HistoryRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut out = String::from("Saved Searches");
    for record in records {
        out.push_str(&format!(
            "\n#{id:<4} {name:<24} {temp:>4}  {text}",
            id = record.id,
            name = record.conditions.display_name(),
            temp = fmt_temp(record.conditions.temperature),
            text = record.conditions.condition_text,
        ));
        if let Some(at) = record.searched_at.as_deref() {
            out.push_str(&format!("  saved {}", searched_on(at)));
        }
        if let Some(trip) = record.trip() {
            out.push_str(&format!("  ({trip})"));
        }
    }

    Some(out)
}

/// Date part of the backend's search timestamp.
fn searched_on(raw: &str) -> &str {
    raw.split_once(['T', ' ']).map_or(raw, |(date, _)| date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tests::paris;
    use chrono::NaiveDate;

    fn record(id: i64, trip: bool) -> HistoryRecord {
        let date = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
        HistoryRecord {
            id,
            conditions: paris(),
            searched_at: Some("2024-05-20T09:15:00+00:00".into()),
            start_date: if trip { date("2024-06-01") } else { None },
            end_date: if trip { date("2024-06-05") } else { None },
        }
    }

    #[test]
    fn empty_history_renders_nothing() {
        assert!(history_list(&[]).is_none());
    }

    #[test]
    fn shows_trip_range_when_present() {
        let out = history_list(&[record(2, true), record(1, false)]).unwrap();
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("#2"));
        assert!(lines[1].ends_with("(2024-06-01 → 2024-06-05)"));
        assert!(!lines[2].contains('('));
    }

    #[test]
    fn shows_search_date() {
        let mut undated = record(3, false);
        undated.searched_at = None;

        let out = history_list(&[record(4, true), undated]).unwrap();
        let lines: Vec<_> = out.lines().collect();

        assert!(lines[1].contains("saved 2024-05-20  (2024-06-01"));
        assert!(!lines[2].contains("saved"));
        assert_eq!(searched_on("2024-05-20 09:15:00"), "2024-05-20");
        assert_eq!(searched_on("2024-05-20"), "2024-05-20");
    }
}
