//! Month bucketing
//!
//! Every aggregator works over the same canonical sequence of calendar months
//! spanned by the report's date range. Scoped residents and facilities get an
//! entry for every bucket even with zero transactions that month, which is
//! what lets missing-income detection fire for quiet months.

use chrono::{Datelike, NaiveDate};

use crate::models::{DateRange, MonthBucket};

/// Sortable month key for a date, "YYYY-MM"
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Display label for a date's month, "MMM YYYY" (e.g. "Jan 2024")
pub fn month_display(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Generate the ordered month buckets covered by an inclusive date range
///
/// Steps from the first day of the start month, one month at a time, while the
/// bucket's first day is on or before the range end. An inverted range yields
/// no buckets.
pub fn month_buckets(range: &DateRange) -> Vec<MonthBucket> {
    let mut buckets = vec![];
    let Some(mut cursor) = range.start.with_day(1) else {
        return buckets;
    };
    while cursor <= range.end {
        buckets.push(MonthBucket {
            key: month_key(cursor),
            display: month_display(cursor),
        });
        cursor = next_month(cursor);
    }
    buckets
}

fn next_month(first_of_month: NaiveDate) -> NaiveDate {
    let (year, month) = if first_of_month.month() == 12 {
        (first_of_month.year() + 1, 1)
    } else {
        (first_of_month.year(), first_of_month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_single_month_range() {
        let buckets = month_buckets(&DateRange::new(d(2024, 3, 10), d(2024, 3, 20)));
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].key, "2024-03");
        assert_eq!(buckets[0].display, "Mar 2024");
    }

    #[test]
    fn test_partial_months_are_included() {
        // Start mid-January, end late February: both months appear
        let buckets = month_buckets(&DateRange::new(d(2024, 1, 15), d(2024, 2, 28)));
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02"]);
    }

    #[test]
    fn test_year_boundary() {
        let buckets = month_buckets(&DateRange::new(d(2023, 11, 1), d(2024, 2, 1)));
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_inverted_range_yields_no_buckets() {
        let buckets = month_buckets(&DateRange::new(d(2024, 5, 1), d(2024, 1, 1)));
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_full_year_has_twelve_buckets() {
        let buckets = month_buckets(&DateRange::new(d(2024, 1, 1), d(2024, 12, 31)));
        assert_eq!(buckets.len(), 12);
        // Keys sort chronologically
        let mut sorted = buckets.clone();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(buckets, sorted);
    }
}
