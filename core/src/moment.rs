// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The `Moment` type: a date, a floating date-time, or a zoned date-time.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::{Span, Zoned};

use crate::error::Error;
use crate::weekday::Weekday;

/// A point on the calendar, at one of three precisions.
///
/// Arithmetic and field mutation preserve the variant; only
/// [`Moment::in_time_zone`] converts between them. Ordering is total and
/// variant-agnostic: a date orders as its midnight, two zoned moments
/// compare by instant, and a zoned moment compares to a plain one by wall
/// clock.
#[derive(Debug, Clone)]
pub enum Moment {
    /// Date only, without time fields.
    Date(Date),

    /// Date and time without a timezone (floating time).
    Floating(DateTime),

    /// Date and time in a named timezone.
    Zoned(Zoned),
}

impl Moment {
    /// The date part.
    #[must_use]
    pub fn date(&self) -> Date {
        match self {
            Moment::Date(d) => *d,
            Moment::Floating(dt) => dt.date(),
            Moment::Zoned(zoned) => zoned.date(),
        }
    }

    /// The time part, if available.
    #[must_use]
    pub fn time(&self) -> Option<Time> {
        match self {
            Moment::Date(_) => None,
            Moment::Floating(dt) => Some(dt.time()),
            Moment::Zoned(zoned) => Some(zoned.time()),
        }
    }

    /// The wall-clock date-time; a date-only moment reads as its midnight.
    #[must_use]
    pub(crate) fn civil(&self) -> DateTime {
        match self {
            Moment::Date(d) => DateTime::from_parts(*d, Time::midnight()),
            Moment::Floating(dt) => *dt,
            Moment::Zoned(zoned) => zoned.datetime(),
        }
    }

    /// Year component.
    #[must_use]
    pub fn year(&self) -> i16 {
        self.date().year()
    }

    /// Month component, 1-12.
    #[must_use]
    pub fn month(&self) -> i8 {
        self.date().month()
    }

    /// Day component, 1-31.
    #[must_use]
    pub fn day(&self) -> i8 {
        self.date().day()
    }

    /// Hour component, absent on a date-only moment.
    #[must_use]
    pub fn hour(&self) -> Option<i8> {
        self.time().map(|t| t.hour())
    }

    /// Minute component, absent on a date-only moment.
    #[must_use]
    pub fn minute(&self) -> Option<i8> {
        self.time().map(|t| t.minute())
    }

    /// Second component, absent on a date-only moment.
    #[must_use]
    pub fn second(&self) -> Option<i8> {
        self.time().map(|t| t.second())
    }

    /// Millisecond component, absent on a date-only moment.
    #[must_use]
    pub fn millisecond(&self) -> Option<i16> {
        self.time().map(|t| t.millisecond())
    }

    /// The day of the week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.date().weekday().into()
    }

    /// Whether this is a date-only moment.
    #[must_use]
    pub fn is_date_only(&self) -> bool {
        matches!(self, Moment::Date(_))
    }

    /// Whether this is a zoned moment in UTC.
    #[must_use]
    pub fn is_utc(&self) -> bool {
        match self {
            Moment::Zoned(zoned) => *zoned.time_zone() == TimeZone::UTC,
            _ => false,
        }
    }

    /// The timezone, when this moment carries one.
    #[must_use]
    pub fn time_zone(&self) -> Option<&TimeZone> {
        match self {
            Moment::Zoned(zoned) => Some(zoned.time_zone()),
            _ => None,
        }
    }

    /// Add a duration, preserving the variant.
    ///
    /// Calendar units use constrain semantics: when the target day does not
    /// exist in the target month, the result clamps to the last valid day.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] on overflow past the representable range.
    pub fn checked_add(&self, span: Span) -> Result<Moment, Error> {
        match self {
            Moment::Date(d) => d.checked_add(span).map(Moment::Date),
            Moment::Floating(dt) => dt.checked_add(span).map(Moment::Floating),
            Moment::Zoned(zoned) => zoned.checked_add(span).map(Moment::Zoned),
        }
        .map_err(Error::invalid_moment)
    }

    /// Subtract a duration, preserving the variant.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] on overflow past the representable range.
    pub fn checked_sub(&self, span: Span) -> Result<Moment, Error> {
        self.checked_add(-span)
    }

    /// Rebuild with a different year.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] when the resulting date does not exist.
    pub fn with_year(&self, year: i16) -> Result<Moment, Error> {
        match self {
            Moment::Date(d) => d.with().year(year).build().map(Moment::Date),
            Moment::Floating(dt) => dt.with().year(year).build().map(Moment::Floating),
            Moment::Zoned(zoned) => zoned.with().year(year).build().map(Moment::Zoned),
        }
        .map_err(Error::invalid_moment)
    }

    /// Rebuild with a different month.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] when the resulting date does not exist.
    pub fn with_month(&self, month: i8) -> Result<Moment, Error> {
        match self {
            Moment::Date(d) => d.with().month(month).build().map(Moment::Date),
            Moment::Floating(dt) => dt.with().month(month).build().map(Moment::Floating),
            Moment::Zoned(zoned) => zoned.with().month(month).build().map(Moment::Zoned),
        }
        .map_err(Error::invalid_moment)
    }

    /// Rebuild with a different day of the month.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] when the resulting date does not exist.
    pub fn with_day(&self, day: i8) -> Result<Moment, Error> {
        match self {
            Moment::Date(d) => d.with().day(day).build().map(Moment::Date),
            Moment::Floating(dt) => dt.with().day(day).build().map(Moment::Floating),
            Moment::Zoned(zoned) => zoned.with().day(day).build().map(Moment::Zoned),
        }
        .map_err(Error::invalid_moment)
    }

    /// Rebuild with a different hour.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] on a date-only moment or an out-of-range
    /// hour.
    pub fn with_hour(&self, hour: i8) -> Result<Moment, Error> {
        match self {
            Moment::Date(_) => Err(Error::invalid_moment(
                "a date-only moment has no time fields",
            )),
            Moment::Floating(dt) => dt
                .with()
                .hour(hour)
                .build()
                .map(Moment::Floating)
                .map_err(Error::invalid_moment),
            Moment::Zoned(zoned) => zoned
                .with()
                .hour(hour)
                .build()
                .map(Moment::Zoned)
                .map_err(Error::invalid_moment),
        }
    }

    /// Rebuild with a different minute.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] on a date-only moment or an out-of-range
    /// minute.
    pub fn with_minute(&self, minute: i8) -> Result<Moment, Error> {
        match self {
            Moment::Date(_) => Err(Error::invalid_moment(
                "a date-only moment has no time fields",
            )),
            Moment::Floating(dt) => dt
                .with()
                .minute(minute)
                .build()
                .map(Moment::Floating)
                .map_err(Error::invalid_moment),
            Moment::Zoned(zoned) => zoned
                .with()
                .minute(minute)
                .build()
                .map(Moment::Zoned)
                .map_err(Error::invalid_moment),
        }
    }

    /// Rebuild with a different second.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] on a date-only moment or an out-of-range
    /// second.
    pub fn with_second(&self, second: i8) -> Result<Moment, Error> {
        match self {
            Moment::Date(_) => Err(Error::invalid_moment(
                "a date-only moment has no time fields",
            )),
            Moment::Floating(dt) => dt
                .with()
                .second(second)
                .build()
                .map(Moment::Floating)
                .map_err(Error::invalid_moment),
            Moment::Zoned(zoned) => zoned
                .with()
                .second(second)
                .build()
                .map(Moment::Zoned)
                .map_err(Error::invalid_moment),
        }
    }

    /// Rebuild with a different millisecond.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] on a date-only moment or an out-of-range
    /// millisecond.
    pub fn with_millisecond(&self, millisecond: i16) -> Result<Moment, Error> {
        match self {
            Moment::Date(_) => Err(Error::invalid_moment(
                "a date-only moment has no time fields",
            )),
            Moment::Floating(dt) => dt
                .with()
                .millisecond(millisecond)
                .build()
                .map(Moment::Floating)
                .map_err(Error::invalid_moment),
            Moment::Zoned(zoned) => zoned
                .with()
                .millisecond(millisecond)
                .build()
                .map(Moment::Zoned)
                .map_err(Error::invalid_moment),
        }
    }

    /// Interpret or convert this moment in the named timezone.
    ///
    /// A plain moment keeps its wall clock (a date-only moment its
    /// midnight); a zoned moment converts its instant into the new zone.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMoment`] for an unknown zone identifier.
    pub fn in_time_zone(&self, zone: &str) -> Result<Moment, Error> {
        let tz = TimeZone::get(zone).map_err(Error::invalid_moment)?;
        match self {
            Moment::Date(_) | Moment::Floating(_) => self
                .civil()
                .to_zoned(tz)
                .map(Moment::Zoned)
                .map_err(Error::invalid_moment),
            Moment::Zoned(zoned) => Ok(Moment::Zoned(zoned.with_time_zone(tz))),
        }
    }
}

impl From<Date> for Moment {
    fn from(d: Date) -> Self {
        Moment::Date(d)
    }
}

impl From<DateTime> for Moment {
    fn from(dt: DateTime) -> Self {
        Moment::Floating(dt)
    }
}

impl From<Zoned> for Moment {
    fn from(zoned: Zoned) -> Self {
        Moment::Zoned(zoned)
    }
}

impl PartialEq for Moment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Moment {}

impl PartialOrd for Moment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Moment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Moment::Zoned(a), Moment::Zoned(b)) => a.timestamp().cmp(&b.timestamp()),
            _ => self.civil().cmp(&other.civil()),
        }
    }
}

impl Display for Moment {
    /// The wire value form: `YYYYMMDD`, `YYYYMMDDTHHMMSS`, the UTC `Z`
    /// suffix, or a bracketed zone name for other zones.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn civil(f: &mut fmt::Formatter<'_>, dt: DateTime) -> fmt::Result {
            write!(
                f,
                "{:04}{:02}{:02}T{:02}{:02}{:02}",
                dt.year(),
                dt.month(),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            )
        }

        match self {
            Moment::Date(d) => write!(f, "{:04}{:02}{:02}", d.year(), d.month(), d.day()),
            Moment::Floating(dt) => civil(f, *dt),
            Moment::Zoned(zoned) => {
                civil(f, zoned.datetime())?;
                if self.is_utc() {
                    f.write_str("Z")
                } else {
                    match zoned.time_zone().iana_name() {
                        Some(name) => write!(f, "[{name}]"),
                        None => Ok(()),
                    }
                }
            }
        }
    }
}

impl FromStr for Moment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::invalid_moment(format!("`{s}` is not a moment"));

        if let Some((civil, zone)) = s.split_once('[') {
            let zone = zone.strip_suffix(']').ok_or_else(invalid)?;
            let dt = DateTime::strptime("%Y%m%dT%H%M%S", civil).map_err(|_| invalid())?;
            return Moment::Floating(dt).in_time_zone(zone);
        }
        if let Some(civil) = s.strip_suffix('Z') {
            let dt = DateTime::strptime("%Y%m%dT%H%M%S", civil).map_err(|_| invalid())?;
            return dt
                .to_zoned(TimeZone::UTC)
                .map(Moment::Zoned)
                .map_err(Error::invalid_moment);
        }
        if s.len() == 8 {
            let d = Date::strptime("%Y%m%d", s).map_err(|_| invalid())?;
            return Ok(Moment::Date(d));
        }
        DateTime::strptime("%Y%m%dT%H%M%S", s)
            .map(Moment::Floating)
            .map_err(|_| invalid())
    }
}
