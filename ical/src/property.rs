// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The `DTSTART` property and assembly of a recurrence text block.

use chumsky::Parser;
use chumsky::input::Stream;
use chumsky::prelude::*;

use crate::Mode;
use crate::error::LineError;
use crate::keyword::{KW_DATE, KW_DATETIME, KW_DTSTART, KW_RRULE, KW_TZID, KW_VALUE};
use crate::scanner::{ContentLine, scan_line};
use crate::value::datetime::{ValueDate, ValueDateTime, value_date, value_date_time};
use crate::value::recur::{RecurRule, parse_recur};

/// The four shapes a `DTSTART` value can take once its parameters are
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeForm {
    /// Date-only value (`VALUE=DATE`).
    Date(ValueDate),

    /// Date and time without timezone (floating time).
    Floating(ValueDateTime),

    /// Date and time in UTC (trailing `Z`).
    Utc(ValueDateTime),

    /// Date and time interpreted in a named timezone (`TZID=`).
    Zoned {
        /// Wall-clock date and time.
        date_time: ValueDateTime,
        /// The timezone identifier, as given.
        tz_id: String,
    },
}

/// A parsed `DTSTART` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtStart {
    /// The resolved value.
    pub value: DateTimeForm,
}

impl DtStart {
    /// Check if this is a date-only value.
    #[must_use]
    pub const fn is_date_only(&self) -> bool {
        matches!(self.value, DateTimeForm::Date(_))
    }

    /// Check if this is a UTC value.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self.value, DateTimeForm::Utc(_))
    }

    /// The date part.
    #[must_use]
    pub const fn date(&self) -> ValueDate {
        match &self.value {
            DateTimeForm::Date(date) => *date,
            DateTimeForm::Floating(dt) | DateTimeForm::Utc(dt) => dt.date,
            DateTimeForm::Zoned { date_time, .. } => date_time.date,
        }
    }
}

/// A parsed recurrence text block: an `RRULE` line plus an optional
/// `DTSTART` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLines {
    /// The start anchor, when a `DTSTART` line was present.
    pub dtstart: Option<DtStart>,

    /// The recurrence rule.
    pub rrule: RecurRule,
}

/// Parse an unfolded text block containing an `RRULE` line and optionally a
/// `DTSTART` line, in either order. Blank lines are ignored.
///
/// # Errors
///
/// [`LineError::MissingRule`] when no `RRULE` line is present; otherwise the
/// first fault per the [`Mode`] discipline.
pub fn parse_block(src: &str, mode: Mode) -> Result<RuleLines, LineError> {
    let mut dtstart = None;
    let mut rrule = None;

    for line in src.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let content = match scan_line(line) {
            Ok(content) => content,
            Err(err) => match mode {
                Mode::Strict => return Err(err.into()),
                Mode::Lenient => continue,
            },
        };

        let name = content.name.to_ascii_uppercase();
        match name.as_str() {
            KW_DTSTART => match (&dtstart, mode) {
                (Some(_), Mode::Strict) => {
                    return Err(LineError::Duplicate {
                        key: KW_DTSTART.to_owned(),
                    });
                }
                (Some(_), Mode::Lenient) => {}
                (None, _) => match parse_dtstart(&content, mode) {
                    Ok(parsed) => dtstart = Some(parsed),
                    Err(_) if mode.is_lenient() => {}
                    Err(err) => return Err(err),
                },
            },
            KW_RRULE => match (&rrule, mode) {
                (Some(_), Mode::Strict) => {
                    return Err(LineError::Duplicate {
                        key: KW_RRULE.to_owned(),
                    });
                }
                (Some(_), Mode::Lenient) => {}
                (None, _) => {
                    if !content.params.is_empty() && mode.is_strict() {
                        return Err(LineError::malformed(
                            KW_RRULE,
                            "unexpected parameters before the colon",
                        ));
                    }
                    rrule = Some(parse_recur(content.value, mode)?);
                }
            },
            _ if mode.is_strict() => {
                return Err(LineError::malformed(&name, "unexpected property"));
            }
            _ => {}
        }
    }

    match rrule {
        Some(rrule) => Ok(RuleLines { dtstart, rrule }),
        None => Err(LineError::MissingRule),
    }
}

/// Interpret a scanned `DTSTART` content line.
///
/// # Errors
///
/// In strict mode: unknown or repeated parameters, a `VALUE` parameter
/// contradicting the value's shape, `TZID` on a date-only value, and `TZID`
/// combined with the UTC `Z` suffix all fail. Lenient mode drops the
/// conflicting parameter instead.
pub fn parse_dtstart(line: &ContentLine<'_>, mode: Mode) -> Result<DtStart, LineError> {
    let mut tz_id: Option<&str> = None;
    let mut value_type: Option<String> = None;

    for param in &line.params {
        let name = param.name.to_ascii_uppercase();
        match name.as_str() {
            KW_TZID => match tz_id {
                Some(_) if mode.is_strict() => {
                    return Err(LineError::malformed(KW_DTSTART, "repeated TZID parameter"));
                }
                Some(_) => {}
                None => tz_id = Some(param.value),
            },
            KW_VALUE => match value_type {
                Some(_) if mode.is_strict() => {
                    return Err(LineError::malformed(KW_DTSTART, "repeated VALUE parameter"));
                }
                Some(_) => {}
                None => value_type = Some(param.value.to_ascii_uppercase()),
            },
            _ if mode.is_strict() => {
                return Err(LineError::malformed(
                    KW_DTSTART,
                    format!("unknown parameter `{name}`"),
                ));
            }
            _ => {}
        }
    }

    let normalized;
    let raw = match mode {
        Mode::Strict => line.value,
        Mode::Lenient => {
            normalized = line.value.to_ascii_uppercase();
            &normalized
        }
    };

    let parsed = parse_date_or_date_time(raw).ok_or_else(|| {
        LineError::malformed(
            KW_DTSTART,
            format!("`{}` is not a date or date-time", line.value),
        )
    })?;

    // VALUE must agree with the shape actually present.
    if let Some(value_type) = &value_type {
        let matches_shape = match (value_type.as_str(), &parsed) {
            (KW_DATE, Parsed::Date(_)) | (KW_DATETIME, Parsed::DateTime(_)) => true,
            (KW_DATE | KW_DATETIME, _) => false,
            _ => {
                if mode.is_strict() {
                    return Err(LineError::malformed(
                        KW_DTSTART,
                        format!("unknown VALUE type `{value_type}`"),
                    ));
                }
                true
            }
        };
        if !matches_shape && mode.is_strict() {
            return Err(LineError::malformed(
                KW_DTSTART,
                format!("VALUE={value_type} does not match the value"),
            ));
        }
    }

    let value = match parsed {
        Parsed::Date(date) => {
            if tz_id.is_some() && mode.is_strict() {
                return Err(LineError::malformed(
                    KW_DTSTART,
                    "TZID is not allowed on a date-only value",
                ));
            }
            DateTimeForm::Date(date)
        }
        Parsed::DateTime(dt) if dt.time.utc => {
            if tz_id.is_some() && mode.is_strict() {
                return Err(LineError::malformed(
                    KW_DTSTART,
                    "TZID conflicts with the UTC `Z` suffix",
                ));
            }
            DateTimeForm::Utc(dt)
        }
        Parsed::DateTime(dt) => match tz_id {
            Some(tz_id) => DateTimeForm::Zoned {
                date_time: dt,
                tz_id: tz_id.to_owned(),
            },
            None => DateTimeForm::Floating(dt),
        },
    };

    Ok(DtStart { value })
}

enum Parsed {
    Date(ValueDate),
    DateTime(ValueDateTime),
}

fn parse_date_or_date_time(raw: &str) -> Option<Parsed> {
    let stream = Stream::from_iter(raw.chars());
    if let Ok(dt) = value_date_time::<'_, _, extra::Err<Rich<'_, char>>>()
        .parse(stream)
        .into_result()
    {
        return Some(Parsed::DateTime(dt));
    }
    let stream = Stream::from_iter(raw.chars());
    value_date::<'_, _, extra::Err<Rich<'_, char>>>()
        .parse(stream)
        .into_result()
        .ok()
        .map(Parsed::Date)
}
