// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! One-pass sanitization of a [`RuleOptions`] record.
//!
//! Value-level faults are soft: out-of-range entries are dropped with a
//! warning and the lists deduplicated preserving first-seen order.
//! Structural faults are hard and fail construction.

use std::fmt::Display;
use std::ops::RangeInclusive;

use crate::error::Error;
use crate::rule::{Frequency, Rule, RuleOptions};
use crate::weekday::WeekdayNum;

pub(super) fn build(options: RuleOptions) -> Result<Rule, Error> {
    if options.count.is_some() && options.until.is_some() {
        return Err(Error::invalid_rule("COUNT and UNTIL are mutually exclusive"));
    }
    if let (Some(dtstart), Some(until)) = (&options.dtstart, &options.until)
        && until < dtstart
    {
        return Err(Error::invalid_rule("UNTIL is before DTSTART"));
    }

    let interval = options.interval.unwrap_or(1);
    if interval == 0 {
        return Err(Error::invalid_rule("INTERVAL must be at least 1"));
    }
    if let Some(count) = options.count
        && count == 0
    {
        return Err(Error::invalid_rule("COUNT must be at least 1"));
    }

    let by_month = keep_in_range("BYMONTH", options.by_month, 1..=12, false);
    let by_month_day = keep_in_range("BYMONTHDAY", options.by_month_day, -31..=31, true);
    let by_year_day = keep_in_range("BYYEARDAY", options.by_year_day, -366..=366, true);
    let by_week_no = keep_in_range("BYWEEKNO", options.by_week_no, -53..=53, true);
    let by_hour = keep_in_range("BYHOUR", options.by_hour, 0..=23, false);
    let by_minute = keep_in_range("BYMINUTE", options.by_minute, 0..=59, false);
    let by_second = keep_in_range("BYSECOND", options.by_second, 0..=59, false);
    let by_set_pos = keep_in_range("BYSETPOS", options.by_set_pos, -366..=366, true);
    let by_day = clean_by_day(options.by_day);

    if !by_set_pos.is_empty()
        && by_month.is_empty()
        && by_month_day.is_empty()
        && by_year_day.is_empty()
        && by_week_no.is_empty()
        && by_day.is_empty()
        && by_hour.is_empty()
        && by_minute.is_empty()
        && by_second.is_empty()
    {
        return Err(Error::invalid_rule(
            "BYSETPOS requires at least one other BY* selector",
        ));
    }

    Ok(Rule {
        freq: options.freq.unwrap_or(Frequency::Yearly),
        dtstart: options.dtstart,
        interval,
        count: options.count,
        until: options.until,
        wkst: options.wkst,
        by_month,
        by_month_day,
        by_year_day,
        by_week_no,
        by_day,
        by_hour,
        by_minute,
        by_second,
        by_set_pos,
    })
}

/// Filter a selector list against its declared range, then deduplicate
/// preserving first-seen order.
fn keep_in_range<T>(
    key: &'static str,
    values: Vec<T>,
    range: RangeInclusive<i64>,
    forbid_zero: bool,
) -> Vec<T>
where
    T: Copy + PartialEq + Into<i64> + Display,
{
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for value in values {
        let n: i64 = value.into();
        if !range.contains(&n) || (forbid_zero && n == 0) {
            tracing::warn!(key, value = %value, "dropping out-of-range selector value");
            continue;
        }
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn clean_by_day(values: Vec<WeekdayNum>) -> Vec<WeekdayNum> {
    let mut out: Vec<WeekdayNum> = Vec::with_capacity(values.len());
    for term in values {
        if term.nth.is_some_and(|n| n == 0 || n.unsigned_abs() > 53) {
            tracing::warn!(term = %term, "dropping BYDAY term with invalid ordinal");
            continue;
        }
        if !out.contains(&term) {
            out.push(term);
        }
    }
    out
}
