// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Weekdays and ordinal weekday terms.

use std::fmt::{self, Display};
use std::str::FromStr;

use ritmo_ical::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE,
};
use ritmo_ical::{RecurWeekday, RecurWeekdayNum};

use crate::error::Error;

/// Day of the week.
///
/// The index mapping is Monday-first: `MO=0 … SU=6`, matching the RFC 5545
/// default week start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// All weekdays in index order.
pub(crate) const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

impl Weekday {
    /// Monday-zero index: `MO=0 … SU=6`.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    /// The weekday for a Monday-zero index.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Weekday> {
        match index {
            0 => Some(Weekday::Monday),
            1 => Some(Weekday::Tuesday),
            2 => Some(Weekday::Wednesday),
            3 => Some(Weekday::Thursday),
            4 => Some(Weekday::Friday),
            5 => Some(Weekday::Saturday),
            6 => Some(Weekday::Sunday),
            _ => None,
        }
    }

    const fn token(self) -> &'static str {
        match self {
            Weekday::Monday => KW_DAY_MO,
            Weekday::Tuesday => KW_DAY_TU,
            Weekday::Wednesday => KW_DAY_WE,
            Weekday::Thursday => KW_DAY_TH,
            Weekday::Friday => KW_DAY_FR,
            Weekday::Saturday => KW_DAY_SA,
            Weekday::Sunday => KW_DAY_SU,
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Weekday {
    type Err = Error;

    /// Parse a two-letter weekday token, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_ascii_uppercase();
        ALL_WEEKDAYS
            .into_iter()
            .find(|day| day.token() == token)
            .ok_or_else(|| Error::MalformedText {
                key: "WKST".to_owned(),
                reason: format!("`{s}` is not a weekday"),
            })
    }
}

impl From<jiff::civil::Weekday> for Weekday {
    fn from(weekday: jiff::civil::Weekday) -> Self {
        match weekday {
            jiff::civil::Weekday::Monday => Weekday::Monday,
            jiff::civil::Weekday::Tuesday => Weekday::Tuesday,
            jiff::civil::Weekday::Wednesday => Weekday::Wednesday,
            jiff::civil::Weekday::Thursday => Weekday::Thursday,
            jiff::civil::Weekday::Friday => Weekday::Friday,
            jiff::civil::Weekday::Saturday => Weekday::Saturday,
            jiff::civil::Weekday::Sunday => Weekday::Sunday,
        }
    }
}

impl From<Weekday> for jiff::civil::Weekday {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => jiff::civil::Weekday::Monday,
            Weekday::Tuesday => jiff::civil::Weekday::Tuesday,
            Weekday::Wednesday => jiff::civil::Weekday::Wednesday,
            Weekday::Thursday => jiff::civil::Weekday::Thursday,
            Weekday::Friday => jiff::civil::Weekday::Friday,
            Weekday::Saturday => jiff::civil::Weekday::Saturday,
            Weekday::Sunday => jiff::civil::Weekday::Sunday,
        }
    }
}

impl From<RecurWeekday> for Weekday {
    fn from(weekday: RecurWeekday) -> Self {
        match weekday {
            RecurWeekday::Monday => Weekday::Monday,
            RecurWeekday::Tuesday => Weekday::Tuesday,
            RecurWeekday::Wednesday => Weekday::Wednesday,
            RecurWeekday::Thursday => Weekday::Thursday,
            RecurWeekday::Friday => Weekday::Friday,
            RecurWeekday::Saturday => Weekday::Saturday,
            RecurWeekday::Sunday => Weekday::Sunday,
        }
    }
}

impl From<Weekday> for RecurWeekday {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => RecurWeekday::Monday,
            Weekday::Tuesday => RecurWeekday::Tuesday,
            Weekday::Wednesday => RecurWeekday::Wednesday,
            Weekday::Thursday => RecurWeekday::Thursday,
            Weekday::Friday => RecurWeekday::Friday,
            Weekday::Saturday => RecurWeekday::Saturday,
            Weekday::Sunday => RecurWeekday::Sunday,
        }
    }
}

/// A weekday with an optional ordinal, the shape behind `BYDAY`.
///
/// A bare weekday matches every such weekday in the period. With an ordinal
/// `n > 0` it names the n-th occurrence from the start of the containing
/// period, `n < 0` from the end (`-1FR` is the last Friday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayNum {
    /// The weekday.
    pub day: Weekday,

    /// Ordinal within the containing period, when present. Never 0 and
    /// always within `-53..=53` on a sanitized rule.
    pub nth: Option<i8>,
}

impl WeekdayNum {
    /// A bare weekday term.
    #[must_use]
    pub const fn every(day: Weekday) -> Self {
        WeekdayNum { day, nth: None }
    }

    /// An ordinal weekday term, e.g. `nth(Weekday::Monday, -2)` for the
    /// second-to-last Monday.
    #[must_use]
    pub const fn nth(day: Weekday, nth: i8) -> Self {
        WeekdayNum { day, nth: Some(nth) }
    }
}

impl From<Weekday> for WeekdayNum {
    fn from(day: Weekday) -> Self {
        WeekdayNum::every(day)
    }
}

impl Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nth {
            Some(n) => write!(f, "{n}{}", self.day),
            None => write!(f, "{}", self.day),
        }
    }
}

impl FromStr for WeekdayNum {
    type Err = Error;

    /// Parse a `BYDAY` token such as `MO`, `+1WE` or `-2FR`,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedText {
            key: "BYDAY".to_owned(),
            reason: format!("`{s}` is not a weekday token"),
        };

        let split_at = s.len().checked_sub(2).ok_or_else(malformed)?;
        if !s.is_char_boundary(split_at) {
            return Err(malformed());
        }
        let (prefix, token) = s.split_at(split_at);
        let day = Weekday::from_str(token).map_err(|_| malformed())?;
        if prefix.is_empty() {
            return Ok(WeekdayNum::every(day));
        }

        let digits = prefix.strip_prefix('+').unwrap_or(prefix);
        let nth: i8 = digits.parse().map_err(|_| malformed())?;
        if nth == 0 || nth.abs() > 53 {
            return Err(Error::Unsupported {
                key: "BYDAY".to_owned(),
                value: s.to_owned(),
            });
        }
        Ok(WeekdayNum::nth(day, nth))
    }
}

impl From<RecurWeekdayNum> for WeekdayNum {
    fn from(term: RecurWeekdayNum) -> Self {
        WeekdayNum {
            day: term.day.into(),
            nth: term.occurrence,
        }
    }
}

impl From<WeekdayNum> for RecurWeekdayNum {
    fn from(term: WeekdayNum) -> Self {
        RecurWeekdayNum {
            day: term.day.into(),
            occurrence: term.nth,
        }
    }
}
