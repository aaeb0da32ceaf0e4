use chrono::{Datelike, Duration, NaiveDate};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangeKind {
    Today,
    Week,
    Month,
    All,
    Custom,
}

/// Calendar reference injected by the caller. Holds the reference day plus the
/// precomputed Monday-start week window covering it, so every range check is
/// deterministic for a given reference date.
#[derive(Debug, Clone)]
pub struct Calendar {
    pub today: NaiveDate,
    pub today_key: String,
    pub week: Vec<String>,
}

impl Calendar {
    pub fn for_reference(reference: NaiveDate) -> Self {
        let monday = reference - Duration::days(reference.weekday().num_days_from_monday() as i64);
        let week = (0..7)
            .map(|offset| (monday + Duration::days(offset)).format("%Y-%m-%d").to_string())
            .collect();
        Self {
            today: reference,
            today_key: reference.format("%Y-%m-%d").to_string(),
            week,
        }
    }

    pub fn month_key(&self) -> String {
        self.today.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RangeFilter<'a> {
    pub kind: RangeKind,
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
}

impl<'a> RangeFilter<'a> {
    pub const ALL: RangeFilter<'static> = RangeFilter {
        kind: RangeKind::All,
        start: None,
        end: None,
    };

    pub fn new(kind: RangeKind, start: Option<&'a str>, end: Option<&'a str>) -> Self {
        Self { kind, start, end }
    }

    pub fn matches(&self, date_key: &str, calendar: &Calendar) -> bool {
        in_range(date_key, self.kind, self.start, self.end, calendar)
    }
}

/// Lenient date-key parse. Accepts a plain YYYY-MM-DD key or a longer string
/// with that prefix; anything else is None.
pub fn parse_date_key(date_key: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = NaiveDate::parse_from_str(date_key, "%Y-%m-%d") {
        return Some(parsed);
    }
    let prefix = date_key.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Decides whether `date_key` falls inside the given window. Malformed dates
/// silently fail the filter; this never panics.
pub fn in_range(
    date_key: &str,
    kind: RangeKind,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    calendar: &Calendar,
) -> bool {
    match kind {
        RangeKind::Today => date_key == calendar.today_key,
        RangeKind::Week => calendar.week.iter().any(|key| key == date_key),
        RangeKind::Month => match parse_date_key(date_key) {
            Some(parsed) => {
                parsed.month() == calendar.today.month() && parsed.year() == calendar.today.year()
            }
            None => false,
        },
        RangeKind::All => true,
        RangeKind::Custom => {
            if custom_start.is_none() && custom_end.is_none() {
                return true;
            }
            let Some(parsed) = parse_date_key(date_key) else {
                return false;
            };
            // A bound that fails to parse never excludes anything.
            if let Some(start) = custom_start.and_then(parse_date_key) {
                if parsed < start {
                    return false;
                }
            }
            if let Some(end) = custom_end.and_then(parse_date_key) {
                if parsed > end {
                    return false;
                }
            }
            true
        }
    }
}

/// YYYY-MM bucket key for a record date. Unparseable dates get no bucket.
pub fn month_key(date_key: &str) -> Option<String> {
    parse_date_key(date_key).map(|parsed| parsed.format("%Y-%m").to_string())
}

/// Human label for a YYYY-MM key, e.g. "March 2024". Falls back to the raw key.
pub fn month_label(key: &str) -> String {
    match NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %Y").to_string(),
        Err(_) => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar(key: &str) -> Calendar {
        Calendar::for_reference(NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap())
    }

    #[test]
    fn today_is_exact_string_match() {
        let cal = calendar("2024-03-05");
        assert!(in_range("2024-03-05", RangeKind::Today, None, None, &cal));
        assert!(!in_range("2024-03-06", RangeKind::Today, None, None, &cal));
    }

    #[test]
    fn week_starts_monday_and_spans_seven_days() {
        // 2024-03-06 is a Wednesday; the covering week is Mon 03-04 .. Sun 03-10.
        let cal = calendar("2024-03-06");
        assert_eq!(cal.week.first().map(String::as_str), Some("2024-03-04"));
        assert_eq!(cal.week.last().map(String::as_str), Some("2024-03-10"));
        assert!(in_range("2024-03-10", RangeKind::Week, None, None, &cal));
        assert!(!in_range("2024-03-11", RangeKind::Week, None, None, &cal));
    }

    #[test]
    fn sunday_is_the_last_day_of_its_week() {
        // 2024-03-10 is a Sunday; its week still starts Monday 03-04.
        let cal = calendar("2024-03-10");
        assert_eq!(cal.week.first().map(String::as_str), Some("2024-03-04"));
        assert!(in_range("2024-03-04", RangeKind::Week, None, None, &cal));
    }

    #[test]
    fn month_means_calendar_month_not_rolling_window() {
        let cal = calendar("2024-03-05");
        assert!(in_range("2024-03-31", RangeKind::Month, None, None, &cal));
        assert!(!in_range("2024-02-28", RangeKind::Month, None, None, &cal));
        assert!(!in_range("2023-03-05", RangeKind::Month, None, None, &cal));
    }

    #[test]
    fn all_matches_everything_including_garbage() {
        let cal = calendar("2024-03-05");
        assert!(in_range("not-a-date", RangeKind::All, None, None, &cal));
    }

    #[test]
    fn custom_without_bounds_matches_everything() {
        let cal = calendar("2024-03-05");
        assert!(in_range("1999-01-01", RangeKind::Custom, None, None, &cal));
    }

    #[test]
    fn custom_bounds_are_inclusive_and_open_ended() {
        let cal = calendar("2024-03-05");
        assert!(in_range(
            "2024-03-01",
            RangeKind::Custom,
            Some("2024-03-01"),
            Some("2024-03-31"),
            &cal
        ));
        assert!(!in_range(
            "2024-02-29",
            RangeKind::Custom,
            Some("2024-03-01"),
            None,
            &cal
        ));
        assert!(in_range(
            "2030-01-01",
            RangeKind::Custom,
            Some("2024-03-01"),
            None,
            &cal
        ));
        assert!(!in_range(
            "2030-01-01",
            RangeKind::Custom,
            None,
            Some("2024-03-31"),
            &cal
        ));
    }

    #[test]
    fn malformed_dates_fail_bounded_filters_without_panicking() {
        let cal = calendar("2024-03-05");
        assert!(!in_range("garbage", RangeKind::Month, None, None, &cal));
        assert!(!in_range(
            "garbage",
            RangeKind::Custom,
            Some("2024-01-01"),
            None,
            &cal
        ));
    }

    #[test]
    fn unparseable_bound_never_excludes() {
        let cal = calendar("2024-03-05");
        assert!(in_range(
            "2024-03-05",
            RangeKind::Custom,
            Some("whenever"),
            None,
            &cal
        ));
    }

    #[test]
    fn month_keys_come_from_valid_dates_only() {
        assert_eq!(month_key("2024-03-05").as_deref(), Some("2024-03"));
        assert_eq!(month_key("2024-03-05T10:00:00").as_deref(), Some("2024-03"));
        assert_eq!(month_key(""), None);
        assert_eq!(month_key("soon"), None);
    }

    #[test]
    fn month_labels_are_human_readable() {
        assert_eq!(month_label("2024-02"), "February 2024");
        assert_eq!(month_label("junk"), "junk");
    }
}
