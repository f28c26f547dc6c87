// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Per-period candidate expansion.
//!
//! Selectors at a resolution coarser than the frequency limit the cursor;
//! finer selectors expand it. `BYSETPOS` indexes into the full expanded set
//! of one period, before the anchor filter removes pre-`DTSTART` moments.

use jiff::ToSpan;
use jiff::civil::{Date, DateTime, Time};

use crate::calendar;
use crate::rule::{Frequency, Rule};
use crate::weekday::Weekday;

/// Build the chronologically sorted candidate set for one period:
/// date expansion, time expansion, `BYSETPOS`, then the anchor filter.
pub(super) fn period_set(
    rule: &Rule,
    start: DateTime,
    cursor: DateTime,
    date_only: bool,
) -> Vec<DateTime> {
    let days = date_candidates(rule, start, cursor);
    let mut set = time_expand(rule, cursor, &days, date_only);
    set.sort_unstable();
    set.dedup();
    apply_by_set_pos(rule.by_set_pos(), &mut set);
    set.retain(|dt| *dt >= start);
    set
}

fn date_candidates(rule: &Rule, start: DateTime, cursor: DateTime) -> Vec<Date> {
    match rule.freq() {
        Frequency::Yearly => yearly(rule, start, cursor.date()),
        Frequency::Monthly => monthly(rule, start, cursor.date()),
        Frequency::Weekly => weekly(rule, start, cursor.date()),
        Frequency::Daily => daily(rule, cursor.date()),
        Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => sub_daily(rule, cursor),
    }
}

/// DAILY: the cursor's day survives iff it passes the date-level limiters.
fn daily(rule: &Rule, date: Date) -> Vec<Date> {
    if passes_by_month(rule, date) && passes_by_month_day(rule, date) && passes_bare_by_day(rule, date)
    {
        vec![date]
    } else {
        Vec::new()
    }
}

/// HOURLY, MINUTELY, SECONDLY: like DAILY, plus the time selectors at or
/// above the frequency's own granularity act as limiters on the cursor.
fn sub_daily(rule: &Rule, cursor: DateTime) -> Vec<Date> {
    let date = cursor.date();
    if !(passes_by_month(rule, date)
        && passes_by_month_day(rule, date)
        && passes_bare_by_day(rule, date))
    {
        return Vec::new();
    }

    let hour_limited = !rule.by_hour().is_empty()
        && !rule.by_hour().contains(&cursor.hour().unsigned_abs());
    if hour_limited {
        return Vec::new();
    }
    if matches!(rule.freq(), Frequency::Minutely | Frequency::Secondly) {
        let minute_limited = !rule.by_minute().is_empty()
            && !rule.by_minute().contains(&cursor.minute().unsigned_abs());
        if minute_limited {
            return Vec::new();
        }
    }
    if rule.freq() == Frequency::Secondly {
        let second_limited = !rule.by_second().is_empty()
            && !rule.by_second().contains(&cursor.second().unsigned_abs());
        if second_limited {
            return Vec::new();
        }
    }
    vec![date]
}

/// WEEKLY: walk the 7 days of the cursor's week (per `WKST`), keeping the
/// weekdays selected by `BYDAY` (ordinals stripped), or the anchor's
/// weekday when `BYDAY` is empty; then apply the date-level limiters.
fn weekly(rule: &Rule, start: DateTime, cursor: Date) -> Vec<Date> {
    let Some(week_start) = calendar::start_of_week(cursor, rule.week_start()) else {
        return Vec::new();
    };
    let anchor_weekday: Weekday = start.date().weekday().into();

    let mut out = Vec::new();
    for offset in 0..7i64 {
        let Ok(day) = week_start.checked_add(offset.days()) else {
            continue;
        };
        let weekday: Weekday = day.weekday().into();
        let wanted = if rule.by_day().is_empty() {
            weekday == anchor_weekday
        } else {
            rule.by_day().iter().any(|term| term.day == weekday)
        };
        if wanted && passes_by_month(rule, day) && passes_by_month_day(rule, day) {
            out.push(day);
        }
    }
    out
}

/// MONTHLY: resolve the selected days of the cursor's month.
fn monthly(rule: &Rule, start: DateTime, cursor: Date) -> Vec<Date> {
    monthly_days(rule, start, cursor.year(), cursor.month())
        .into_iter()
        .filter_map(|day| Date::new(cursor.year(), cursor.month(), day).ok())
        .collect()
}

/// The day-of-month set for one month.
///
/// `BYMONTHDAY` and `BYDAY` intersect when both are present; with neither,
/// the anchor's day number is used, and a month without that day (the
/// Feb-31 case) is a legitimately empty period.
fn monthly_days(rule: &Rule, start: DateTime, year: i16, month: i8) -> Vec<i8> {
    if !rule.by_month().is_empty() && !rule.by_month().contains(&month.unsigned_abs()) {
        return Vec::new();
    }
    let days_in_month = calendar::days_in_month(year, month);

    match (rule.by_month_day().is_empty(), rule.by_day().is_empty()) {
        (true, true) => {
            let day = start.day();
            if day <= days_in_month {
                vec![day]
            } else {
                Vec::new()
            }
        }
        (false, true) => normalized_month_days(rule, days_in_month),
        (true, false) => by_day_in_month(rule, year, month),
        (false, false) => {
            let month_days = normalized_month_days(rule, days_in_month);
            by_day_in_month(rule, year, month)
                .into_iter()
                .filter(|day| month_days.contains(day))
                .collect()
        }
    }
}

/// `BYMONTHDAY` values normalised against the month length; out-of-month
/// entries drop out.
fn normalized_month_days(rule: &Rule, days_in_month: i8) -> Vec<i8> {
    rule.by_month_day()
        .iter()
        .filter_map(|&d| {
            let day = if d > 0 { d } else { days_in_month + d + 1 };
            (1..=days_in_month).contains(&day).then_some(day)
        })
        .collect()
}

/// Resolve `BYDAY` terms inside one month via the per-weekday day buckets.
fn by_day_in_month(rule: &Rule, year: i16, month: i8) -> Vec<i8> {
    let mut out = Vec::new();
    for term in rule.by_day() {
        let bucket = calendar::weekday_days_in_month(year, month, term.day);
        match term.nth {
            None => out.extend(bucket),
            Some(n) => {
                let index = if n > 0 {
                    i64::from(n) - 1
                } else {
                    i64::from(n) + i64::try_from(bucket.len()).unwrap_or(0)
                };
                if let Ok(index) = usize::try_from(index)
                    && let Some(day) = bucket.get(index)
                {
                    out.push(*day);
                }
            }
        }
    }
    out
}

/// YEARLY expansion, by selector precedence.
fn yearly(rule: &Rule, start: DateTime, cursor: Date) -> Vec<Date> {
    let year = cursor.year();
    let has_ordinal = rule.by_day().iter().any(|term| term.nth.is_some());

    if has_ordinal && rule.by_month().is_empty() {
        by_day_in_year(rule, year)
    } else if !rule.by_year_day().is_empty() {
        year_days(rule, year)
    } else if !rule.by_week_no().is_empty() {
        week_no_days(rule, year)
    } else {
        let months: Vec<i8> = if !rule.by_month().is_empty() {
            rule.by_month()
                .iter()
                .filter_map(|&m| i8::try_from(m).ok())
                .collect()
        } else if !rule.by_month_day().is_empty() || !rule.by_day().is_empty() {
            (1..=12).collect()
        } else {
            vec![cursor.month()]
        };
        months
            .into_iter()
            .flat_map(|month| {
                monthly_days(rule, start, year, month)
                    .into_iter()
                    .filter_map(move |day| Date::new(year, month, day).ok())
            })
            .collect()
    }
}

/// Ordinal (and bare) `BYDAY` terms resolved against the whole year.
fn by_day_in_year(rule: &Rule, year: i16) -> Vec<Date> {
    let mut out = Vec::new();
    for term in rule.by_day() {
        match term.nth {
            Some(n) => out.extend(calendar::nth_weekday_in_year(year, term.day, n)),
            None => {
                let mut n = 1;
                while let Some(date) = calendar::nth_weekday_in_year(year, term.day, n) {
                    out.push(date);
                    n += 1;
                }
            }
        }
    }
    out
}

/// `BYYEARDAY` values normalised against the year length, intersected with
/// `BYMONTH` when present.
fn year_days(rule: &Rule, year: i16) -> Vec<Date> {
    let days_in_year = calendar::days_in_year(year);
    let Ok(jan1) = Date::new(year, 1, 1) else {
        return Vec::new();
    };
    rule.by_year_day()
        .iter()
        .filter_map(|&yd| {
            let day = if yd > 0 { yd } else { days_in_year + yd + 1 };
            if !(1..=days_in_year).contains(&day) {
                return None;
            }
            let date = jan1.checked_add((i64::from(day) - 1).days()).ok()?;
            passes_by_month(rule, date).then_some(date)
        })
        .collect()
}

/// `BYWEEKNO` weeks anchored on the week containing January 4, keeping the
/// days selected by the bare weekdays of `BYDAY` (all seven without it) and
/// lying in the cursor's year.
fn week_no_days(rule: &Rule, year: i16) -> Vec<Date> {
    let wkst = rule.week_start();
    let weeks_in_year = calendar::weeks_in_year(year, wkst);
    let weekdays: Vec<Weekday> = rule.by_day().iter().map(|term| term.day).collect();

    let mut out = Vec::new();
    for &wn in rule.by_week_no() {
        let week = if wn > 0 { wn } else { weeks_in_year + wn + 1 };
        if !(1..=weeks_in_year).contains(&week) {
            continue;
        }
        let Some(week_start) = calendar::nth_week_start(year, week, wkst) else {
            continue;
        };
        for offset in 0..7i64 {
            let Ok(day) = week_start.checked_add(offset.days()) else {
                continue;
            };
            if day.year() != year {
                continue;
            }
            if !weekdays.is_empty() && !weekdays.contains(&day.weekday().into()) {
                continue;
            }
            out.push(day);
        }
    }
    out
}

/// Cartesian time expansion of the date candidates.
///
/// An empty selector contributes the cursor's own field; selectors at or
/// above the frequency granularity were already applied as limiters, so
/// here they stay pinned to the cursor.
fn time_expand(rule: &Rule, cursor: DateTime, days: &[Date], date_only: bool) -> Vec<DateTime> {
    if date_only {
        return days
            .iter()
            .map(|&d| DateTime::from_parts(d, Time::midnight()))
            .collect();
    }

    let freq = rule.freq();
    let hours: Vec<i8> = if !freq.is_sub_daily() && !rule.by_hour().is_empty() {
        rule.by_hour()
            .iter()
            .filter_map(|&h| i8::try_from(h).ok())
            .collect()
    } else {
        vec![cursor.hour()]
    };
    let expands_minutes = matches!(
        freq,
        Frequency::Yearly
            | Frequency::Monthly
            | Frequency::Weekly
            | Frequency::Daily
            | Frequency::Hourly
    );
    let minutes: Vec<i8> = if expands_minutes && !rule.by_minute().is_empty() {
        rule.by_minute()
            .iter()
            .filter_map(|&m| i8::try_from(m).ok())
            .collect()
    } else {
        vec![cursor.minute()]
    };
    let seconds: Vec<i8> = if freq != Frequency::Secondly && !rule.by_second().is_empty() {
        rule.by_second()
            .iter()
            .filter_map(|&s| i8::try_from(s).ok())
            .collect()
    } else {
        vec![cursor.second()]
    };

    let mut out = Vec::with_capacity(days.len() * hours.len() * minutes.len() * seconds.len());
    for &day in days {
        for &hour in &hours {
            for &minute in &minutes {
                for &second in &seconds {
                    if let Ok(time) = Time::new(hour, minute, second, cursor.subsec_nanosecond()) {
                        out.push(DateTime::from_parts(day, time));
                    }
                }
            }
        }
    }
    out
}

/// Keep the 1-based positions listed in `BYSETPOS` (negative from the end),
/// preserving chronological order.
fn apply_by_set_pos(by_set_pos: &[i16], set: &mut Vec<DateTime>) {
    if by_set_pos.is_empty() {
        return;
    }
    let len = i64::try_from(set.len()).unwrap_or(0);
    let mut position = 0i64;
    set.retain(|_| {
        let positive = position + 1;
        let negative = positive - 1 - len;
        position += 1;
        by_set_pos.iter().any(|&p| {
            let p = i64::from(p);
            p == positive || p == negative
        })
    });
}

fn passes_by_month(rule: &Rule, date: Date) -> bool {
    rule.by_month().is_empty() || rule.by_month().contains(&date.month().unsigned_abs())
}

fn passes_by_month_day(rule: &Rule, date: Date) -> bool {
    if rule.by_month_day().is_empty() {
        return true;
    }
    let positive = date.day();
    // Minus 1 because -1 is the last day of the month and days are
    // 1-indexed.
    let negative = positive - 1 - date.days_in_month();
    rule.by_month_day().contains(&positive) || rule.by_month_day().contains(&negative)
}

/// Only bare `BYDAY` terms filter here; ordinals are meaningless outside
/// MONTHLY/YEARLY expansion and are ignored.
fn passes_bare_by_day(rule: &Rule, date: Date) -> bool {
    let mut bare = rule
        .by_day()
        .iter()
        .filter(|term| term.nth.is_none())
        .peekable();
    if bare.peek().is_none() {
        return true;
    }
    let weekday: Weekday = date.weekday().into();
    bare.any(|term| term.day == weekday)
}
