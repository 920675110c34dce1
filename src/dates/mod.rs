use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// `true` if `a` is later in the day than `b`, looking only at hours and
/// minutes. Seconds and the date are ignored.
pub fn is_time_greater(a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    a.hour() > b.hour() || (a.hour() == b.hour() && a.minute() > b.minute())
}

/// Same calendar day, whatever the time.
pub fn is_same_day(a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    a.day() == b.day() && a.month() == b.month() && a.year() == b.year()
}

/// Midnight at the start of `dt`'s day.
pub fn date_only(dt: &NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

/// Day zero of spreadsheet serial dates: 1899-12-30.
pub fn sheets_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Time-only values read from a sheet land on the epoch day.
pub fn is_on_sheets_epoch(dt: &NaiveDateTime) -> bool {
    dt.date() == sheets_epoch()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_is_time_greater() {
        // date is irrelevant
        assert!(is_time_greater(&at(2020, 1, 1, 10, 0, 0), &at(2024, 6, 1, 9, 59, 0)));
        assert!(is_time_greater(&at(2024, 1, 1, 9, 31, 0), &at(2024, 1, 1, 9, 30, 59)));
        // seconds are ignored
        assert!(!is_time_greater(&at(2024, 1, 1, 9, 30, 59), &at(2024, 1, 1, 9, 30, 0)));
        assert!(!is_time_greater(&at(2024, 1, 1, 8, 59, 0), &at(2024, 1, 1, 9, 0, 0)));
    }

    #[test]
    fn test_is_same_day() {
        assert!(is_same_day(&at(2024, 3, 5, 0, 0, 0), &at(2024, 3, 5, 23, 59, 59)));
        assert!(!is_same_day(&at(2024, 3, 5, 12, 0, 0), &at(2023, 3, 5, 12, 0, 0)));
        assert!(!is_same_day(&at(2024, 3, 5, 12, 0, 0), &at(2024, 4, 5, 12, 0, 0)));
    }

    #[test]
    fn test_date_only() {
        assert_eq!(date_only(&at(2024, 3, 5, 17, 45, 12)), at(2024, 3, 5, 0, 0, 0));
    }

    #[test]
    fn test_sheets_epoch() {
        assert_eq!(sheets_epoch().to_string(), "1899-12-30");
        assert!(is_on_sheets_epoch(&at(1899, 12, 30, 14, 0, 0)));
        assert!(!is_on_sheets_epoch(&at(1899, 12, 31, 0, 0, 0)));
    }
}
