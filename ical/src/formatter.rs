// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical emission of `DTSTART` and `RRULE` lines.
//!
//! The writer emits rule parts in a fixed order so that formatting is
//! deterministic and `parse(format(rule))` round-trips: `FREQ`, `INTERVAL`
//! (only when not 1), `COUNT`, `UNTIL`, `WKST`, `BYMONTH`, `BYMONTHDAY`,
//! `BYYEARDAY`, `BYWEEKNO`, `BYDAY`, `BYHOUR`, `BYMINUTE`, `BYSECOND`,
//! `BYSETPOS`. Absent or empty parts are omitted.

use std::fmt::{Display, Write};

use crate::keyword::{
    KW_DATE, KW_DTSTART, KW_RRULE, KW_RRULE_BYDAY, KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE,
    KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND, KW_RRULE_BYSETPOS,
    KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_FREQ, KW_RRULE_INTERVAL,
    KW_RRULE_UNTIL, KW_RRULE_WKST, KW_TZID, KW_VALUE,
};
use crate::property::{DateTimeForm, DtStart};
use crate::value::datetime::{DateOrDateTime, ValueDate, ValueDateTime, ValueTime};
use crate::value::recur::{RecurFrequency, RecurRule};

/// Format a date value as `YYYYMMDD`.
///
/// # Errors
///
/// Propagates formatter errors.
pub fn write_date<W: Write>(w: &mut W, date: ValueDate) -> std::fmt::Result {
    write!(w, "{:04}{:02}{:02}", date.year, date.month, date.day)
}

/// Format a time value as `HHMMSS[Z]`.
///
/// # Errors
///
/// Propagates formatter errors.
pub fn write_time<W: Write>(w: &mut W, time: ValueTime) -> std::fmt::Result {
    let utc = if time.utc { "Z" } else { "" };
    write!(
        w,
        "{:02}{:02}{:02}{}",
        time.hour, time.minute, time.second, utc
    )
}

/// Format a date-time value as `YYYYMMDDTHHMMSS[Z]`.
///
/// # Errors
///
/// Propagates formatter errors.
pub fn write_date_time<W: Write>(w: &mut W, dt: ValueDateTime) -> std::fmt::Result {
    write_date(w, dt.date)?;
    w.write_char('T')?;
    write_time(w, dt.time)
}

/// Format a recurrence rule value (RFC 5545 Section 3.3.10) in canonical
/// part order.
///
/// # Errors
///
/// Propagates formatter errors.
pub fn write_recur_value<W: Write>(w: &mut W, rule: &RecurRule) -> std::fmt::Result {
    // FREQ is required; an unset frequency formats as the default.
    let freq = rule.freq.unwrap_or(RecurFrequency::Yearly);
    write!(w, "{KW_RRULE_FREQ}={freq}")?;

    if let Some(interval) = rule.interval
        && interval != 1
    {
        write!(w, ";{KW_RRULE_INTERVAL}={interval}")?;
    }

    if let Some(count) = rule.count {
        write!(w, ";{KW_RRULE_COUNT}={count}")?;
    }

    if let Some(until) = rule.until {
        write!(w, ";{KW_RRULE_UNTIL}=")?;
        match until {
            DateOrDateTime::Date(date) => write_date(w, date)?,
            DateOrDateTime::DateTime(dt) => write_date_time(w, dt)?,
        }
    }

    if let Some(wkst) = rule.wkst {
        write!(w, ";{KW_RRULE_WKST}={wkst}")?;
    }

    write_list(w, KW_RRULE_BYMONTH, &rule.by_month)?;
    write_list(w, KW_RRULE_BYMONTHDAY, &rule.by_month_day)?;
    write_list(w, KW_RRULE_BYYEARDAY, &rule.by_year_day)?;
    write_list(w, KW_RRULE_BYWEEKNO, &rule.by_week_no)?;
    write_list(w, KW_RRULE_BYDAY, &rule.by_day)?;
    write_list(w, KW_RRULE_BYHOUR, &rule.by_hour)?;
    write_list(w, KW_RRULE_BYMINUTE, &rule.by_minute)?;
    write_list(w, KW_RRULE_BYSECOND, &rule.by_second)?;
    write_list(w, KW_RRULE_BYSETPOS, &rule.by_set_pos)
}

/// Format a complete `RRULE:` line (without a trailing line break).
///
/// # Errors
///
/// Propagates formatter errors.
pub fn write_rrule_line<W: Write>(w: &mut W, rule: &RecurRule) -> std::fmt::Result {
    write!(w, "{KW_RRULE}:")?;
    write_recur_value(w, rule)
}

/// Format a complete `DTSTART` line (without a trailing line break).
///
/// # Errors
///
/// Propagates formatter errors.
pub fn write_dtstart_line<W: Write>(w: &mut W, dtstart: &DtStart) -> std::fmt::Result {
    match &dtstart.value {
        DateTimeForm::Date(date) => {
            write!(w, "{KW_DTSTART};{KW_VALUE}={KW_DATE}:")?;
            write_date(w, *date)
        }
        DateTimeForm::Floating(dt) | DateTimeForm::Utc(dt) => {
            write!(w, "{KW_DTSTART}:")?;
            write_date_time(w, *dt)
        }
        DateTimeForm::Zoned { date_time, tz_id } => {
            write!(w, "{KW_DTSTART};{KW_TZID}={tz_id}:")?;
            write_date_time(w, *date_time)
        }
    }
}

fn write_list<W: Write, T: Display>(w: &mut W, key: &str, values: &[T]) -> std::fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    write!(w, ";{key}=")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            w.write_char(',')?;
        }
        write!(w, "{value}")?;
    }
    Ok(())
}
