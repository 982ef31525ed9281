//! Time helpers - business-timezone month handling
//!
//! All month-key parsing and month→timestamp conversion lives here; the
//! repository layer works with `i64` unix millis and `YYYY-MM` keys only.

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Strict `YYYY-MM` shape check. Returns (year, month) on success.
///
/// Rejects out-of-range months ("2024-13") as well as malformed shapes
/// ("24-01", "2024-1", "2024/01").
pub fn parse_month_key(month: &str) -> Option<(i32, u32)> {
    let bytes = month.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return None;
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let year: i32 = month[..4].parse().ok()?;
    let m: u32 = month[5..].parse().ok()?;
    if !(1..=12).contains(&m) {
        return None;
    }
    Some((year, m))
}

/// Month key (`YYYY-MM`) of a unix-milli timestamp in the business timezone
pub fn month_key_of(millis: i64, tz: Tz) -> String {
    let dt = Utc
        .timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
        .with_timezone(&tz);
    format!("{:04}-{:02}", dt.year(), dt.month())
}

/// Calendar bounds of a month as `[start, end)` unix millis in the business
/// timezone. Callers use `>= start AND < end` semantics.
pub fn month_bounds(month: &str, tz: Tz) -> Option<(i64, i64)> {
    let (year, m) = parse_month_key(month)?;
    let first = NaiveDate::from_ymd_opt(year, m, 1)?;
    let next = add_months(first, 1);
    Some((day_start_millis(first, tz), day_start_millis(next, tz)))
}

/// Day start (00:00:00) → unix millis in the business timezone
///
/// DST gap fallback: when local midnight does not exist, fall back to UTC.
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// First day of the month shifted by `delta` months (delta may be negative)
pub fn add_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months0 = date.year() * 12 + date.month0() as i32 + delta;
    let year = months0.div_euclid(12);
    let month0 = months0.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

/// Chronological month keys ending at `base`: `months_back + 1` entries
pub fn month_window(base: NaiveDate, months_back: u32) -> Vec<String> {
    let anchor = NaiveDate::from_ymd_opt(base.year(), base.month(), 1).unwrap_or(base);
    (0..=months_back)
        .rev()
        .map(|back| {
            let d = add_months(anchor, -(back as i32));
            format!("{:04}-{:02}", d.year(), d.month())
        })
        .collect()
}

/// Short display name for a month key, e.g. "2024-03" → "Mar"
pub fn month_display(month: &str) -> String {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    parse_month_key(month)
        .map(|(_, m)| NAMES[(m - 1) as usize].to_string())
        .unwrap_or_else(|| month.to_string())
}

/// ISO timestamp of the first instant of a month (UTC)
pub fn month_first_iso(month: &str) -> String {
    format!("{month}-01T00:00:00Z")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_month_keys() {
        assert_eq!(parse_month_key("2024-01"), Some((2024, 1)));
        assert_eq!(parse_month_key("1999-12"), Some((1999, 12)));
    }

    #[test]
    fn rejects_malformed_month_keys() {
        for bad in ["2024-13", "2024-00", "24-01", "2024-1", "2024/01", "2024-011", ""] {
            assert_eq!(parse_month_key(bad), None, "should reject {bad:?}");
        }
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let tz = chrono_tz::UTC;
        let (start, end) = month_bounds("2024-03", tz).unwrap();
        // 2024-03-01T00:00:00Z .. 2024-04-01T00:00:00Z
        assert_eq!(start, 1709251200000);
        assert_eq!(end, 1711929600000);

        // A record at 23:59 on the last day is inside the bounds
        let last_minute = 1711929540000; // 2024-03-31T23:59:00Z
        assert!(last_minute >= start && last_minute < end);
    }

    #[test]
    fn window_is_chronological_and_inclusive() {
        let base = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let window = month_window(base, 3);
        assert_eq!(window, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn add_months_crosses_year_boundaries() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(add_months(jan, -1), NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(add_months(jan, 13), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }

    #[test]
    fn month_key_of_respects_timezone() {
        // 2024-03-31T23:30:00Z is already April in Madrid (UTC+2 in summer)
        let millis = 1711927800000;
        assert_eq!(month_key_of(millis, chrono_tz::UTC), "2024-03");
        assert_eq!(month_key_of(millis, chrono_tz::Europe::Madrid), "2024-04");
    }
}
