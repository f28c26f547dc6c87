// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Proleptic-Gregorian helpers, mostly thin over jiff.
//!
//! What jiff does not provide directly is everything `WKST`-relative: where
//! a week starts, how many numbered weeks a year has, and where week 1 of
//! the `BYWEEKNO` numbering anchors. Those live here, next to ordinal
//! weekday resolution.

use jiff::ToSpan;
use jiff::civil::Date;

use crate::weekday::Weekday;

/// Monday-zero weekday index of a date: `MO=0 … SU=6`.
#[must_use]
pub fn weekday_index(date: Date) -> u8 {
    // to_monday_zero_offset is 0..=6 by construction.
    date.weekday().to_monday_zero_offset().unsigned_abs()
}

/// Ordinal day of the year, `1..=366`.
#[must_use]
pub fn day_of_year(date: Date) -> i16 {
    date.day_of_year()
}

/// ISO 8601 week number, `1..=53`: the week of the nearest Thursday.
#[must_use]
pub fn iso_week(date: Date) -> i8 {
    date.iso_week_date().week()
}

/// Whether the year is a leap year.
#[must_use]
pub fn is_leap_year(year: i16) -> bool {
    Date::new(year, 1, 1).map_or(false, |d| d.in_leap_year())
}

/// Number of days in the year, 365 or 366.
#[must_use]
pub fn days_in_year(year: i16) -> i16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Number of days in the month, or 0 for an invalid month.
#[must_use]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    Date::new(year, month, 1).map_or(0, |d| d.days_in_month())
}

/// January 1 of the date's year.
#[must_use]
pub fn start_of_year(date: Date) -> Date {
    date.first_of_year()
}

/// December 31 of the date's year.
#[must_use]
pub fn end_of_year(date: Date) -> Date {
    date.last_of_year()
}

/// The first day of the date's month.
#[must_use]
pub fn first_of_month(date: Date) -> Date {
    date.first_of_month()
}

/// The last day of the date's month.
#[must_use]
pub fn last_of_month(date: Date) -> Date {
    date.last_of_month()
}

/// The most recent `wkst` day at or before `date`.
#[must_use]
pub fn start_of_week(date: Date, wkst: Weekday) -> Option<Date> {
    let back = (weekday_index(date) + 7 - wkst.index()) % 7;
    date.checked_sub(i64::from(back).days()).ok()
}

/// How many numbered weeks the year carries under the given week start:
/// 53 when January 1 falls on `wkst`, or when the year is a leap year and
/// January 1 falls on the day before `wkst`; otherwise 52.
#[must_use]
pub fn weeks_in_year(year: i16, wkst: Weekday) -> i8 {
    let Ok(jan1) = Date::new(year, 1, 1) else {
        return 52;
    };
    let index = weekday_index(jan1);
    if index == wkst.index() || (jan1.in_leap_year() && index == (wkst.index() + 6) % 7) {
        53
    } else {
        52
    }
}

/// The start of week 1: the week (per `wkst`) containing January 4.
#[must_use]
pub fn week_one_start(year: i16, wkst: Weekday) -> Option<Date> {
    let jan4 = Date::new(year, 1, 4).ok()?;
    start_of_week(jan4, wkst)
}

/// The start of week `n` (1-based) of the year, under the given week start.
#[must_use]
pub fn nth_week_start(year: i16, n: i8, wkst: Weekday) -> Option<Date> {
    let week1 = week_one_start(year, wkst)?;
    week1.checked_add((i64::from(n) - 1).weeks()).ok()
}

/// Resolve an ordinal weekday within a year: the `n`-th such weekday from
/// the start of the year (`n > 0`) or from its end (`n < 0`). `None` when
/// the ordinal walks out of the year.
#[must_use]
pub fn nth_weekday_in_year(year: i16, weekday: Weekday, n: i8) -> Option<Date> {
    match n {
        1.. => {
            let start = Date::new(year, 1, 1).ok()?;
            let forward = (weekday.index() + 7 - weekday_index(start)) % 7;
            let days = i64::from(forward) + 7 * (i64::from(n) - 1);
            let date = start.checked_add(days.days()).ok()?;
            (date.year() == year).then_some(date)
        }
        ..=-1 => {
            let end = Date::new(year, 12, 31).ok()?;
            let backward = (weekday_index(end) + 7 - weekday.index()) % 7;
            let days = i64::from(backward) + 7 * (i64::from(-n) - 1);
            let date = end.checked_sub(days.days()).ok()?;
            (date.year() == year).then_some(date)
        }
        0 => None,
    }
}

/// All days of the month falling on the given weekday, in ascending order.
#[must_use]
pub fn weekday_days_in_month(year: i16, month: i8, weekday: Weekday) -> Vec<i8> {
    let Ok(first) = Date::new(year, month, 1) else {
        return Vec::new();
    };
    let offset = (weekday.index() + 7 - weekday_index(first)) % 7;
    let first_day = 1 + i8::try_from(offset).unwrap_or(0);
    (first_day..=first.days_in_month()).step_by(7).collect()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn computes_weekday_index() {
        assert_eq!(weekday_index(date(1997, 9, 1)), 0); // Monday
        assert_eq!(weekday_index(date(1997, 9, 2)), 1); // Tuesday
        assert_eq!(weekday_index(date(1997, 9, 7)), 6); // Sunday
    }

    #[test]
    fn computes_day_of_year() {
        assert_eq!(day_of_year(date(1997, 1, 1)), 1);
        assert_eq!(day_of_year(date(1997, 4, 10)), 100);
        assert_eq!(day_of_year(date(2000, 12, 31)), 366);
    }

    #[test]
    fn computes_iso_weeks() {
        // ISO 8601 reference points.
        assert_eq!(iso_week(date(2005, 1, 1)), 53); // Sat of 2004-W53
        assert_eq!(iso_week(date(2007, 1, 1)), 1); // Monday
        assert_eq!(iso_week(date(2015, 12, 31)), 53); // 2015 is a long year
        assert_eq!(iso_week(date(2020, 12, 31)), 53); // 2020 is a long year
    }

    #[test]
    fn detects_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(1997));
        assert_eq!(days_in_year(2000), 366);
        assert_eq!(days_in_year(1997), 365);
    }

    #[test]
    fn computes_start_of_week() {
        // 1997-09-02 is a Tuesday.
        let tue = date(1997, 9, 2);
        assert_eq!(start_of_week(tue, Weekday::Monday), Some(date(1997, 9, 1)));
        assert_eq!(start_of_week(tue, Weekday::Sunday), Some(date(1997, 8, 31)));
        assert_eq!(start_of_week(tue, Weekday::Tuesday), Some(tue));
        assert_eq!(
            start_of_week(tue, Weekday::Wednesday),
            Some(date(1997, 8, 27))
        );
    }

    #[test]
    fn counts_weeks_in_year() {
        // 2001-01-01 is a Monday.
        assert_eq!(weeks_in_year(2001, Weekday::Monday), 53);
        // 2024 is leap and starts on a Monday, the day before Tuesday.
        assert_eq!(weeks_in_year(2024, Weekday::Tuesday), 53);
        assert_eq!(weeks_in_year(1997, Weekday::Monday), 52);
        assert_eq!(weeks_in_year(1998, Weekday::Monday), 52);
    }

    #[test]
    fn anchors_week_one_on_january_fourth() {
        // 1998-01-04 is a Sunday; the ISO week containing it starts Dec 29.
        assert_eq!(
            week_one_start(1998, Weekday::Monday),
            Some(date(1997, 12, 29))
        );
        // 2007-01-04 is a Thursday in the week starting Monday Jan 1.
        assert_eq!(week_one_start(2007, Weekday::Monday), Some(date(2007, 1, 1)));
        assert_eq!(
            nth_week_start(2007, 2, Weekday::Monday),
            Some(date(2007, 1, 8))
        );
    }

    #[test]
    fn resolves_ordinal_weekdays_in_year() {
        // First Monday of 1997 is Jan 6.
        assert_eq!(
            nth_weekday_in_year(1997, Weekday::Monday, 1),
            Some(date(1997, 1, 6))
        );
        // Last Friday of 1997 is Dec 26.
        assert_eq!(
            nth_weekday_in_year(1997, Weekday::Friday, -1),
            Some(date(1997, 12, 26))
        );
        // The 53rd Monday of 1997 does not exist.
        assert_eq!(nth_weekday_in_year(1997, Weekday::Monday, 53), None);
        assert_eq!(nth_weekday_in_year(1997, Weekday::Monday, 0), None);
    }

    #[test]
    fn buckets_weekdays_in_month() {
        // September 1997 starts on a Monday.
        assert_eq!(
            weekday_days_in_month(1997, 9, Weekday::Monday),
            vec![1, 8, 15, 22, 29]
        );
        assert_eq!(
            weekday_days_in_month(1997, 9, Weekday::Thursday),
            vec![4, 11, 18, 25]
        );
        // February 1997 has no 5th Monday.
        assert_eq!(
            weekday_days_in_month(1997, 2, Weekday::Monday),
            vec![3, 10, 17, 24]
        );
    }
}
