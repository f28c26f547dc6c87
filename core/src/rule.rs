// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The sanitized recurrence rule and its query surface.

mod sanitize;

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::{Span, ToSpan};
use ritmo_ical::Mode;
use ritmo_ical::keyword::{
    KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_HOURLY, KW_RRULE_FREQ_MINUTELY, KW_RRULE_FREQ_MONTHLY,
    KW_RRULE_FREQ_SECONDLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY,
};
use ritmo_ical::RecurFrequency;

use crate::error::Error;
use crate::generator::{IterationPolicy, Occurrences};
use crate::moment::Moment;
use crate::text;
use crate::weekday::{Weekday, WeekdayNum};

/// How often the rule's base period repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

impl Frequency {
    /// One base period as a span.
    pub(crate) fn unit_span(self) -> Span {
        match self {
            Frequency::Yearly => 1.years(),
            Frequency::Monthly => 1.months(),
            Frequency::Weekly => 1.weeks(),
            Frequency::Daily => 1.days(),
            Frequency::Hourly => 1.hours(),
            Frequency::Minutely => 1.minutes(),
            Frequency::Secondly => 1.seconds(),
        }
    }

    /// Whether the period is finer than a day.
    pub(crate) fn is_sub_daily(self) -> bool {
        matches!(
            self,
            Frequency::Hourly | Frequency::Minutely | Frequency::Secondly
        )
    }

    const fn token(self) -> &'static str {
        match self {
            Frequency::Yearly => KW_RRULE_FREQ_YEARLY,
            Frequency::Monthly => KW_RRULE_FREQ_MONTHLY,
            Frequency::Weekly => KW_RRULE_FREQ_WEEKLY,
            Frequency::Daily => KW_RRULE_FREQ_DAILY,
            Frequency::Hourly => KW_RRULE_FREQ_HOURLY,
            Frequency::Minutely => KW_RRULE_FREQ_MINUTELY,
            Frequency::Secondly => KW_RRULE_FREQ_SECONDLY,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    /// Parse an RFC 5545 frequency keyword, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_ascii_uppercase();
        [
            Frequency::Yearly,
            Frequency::Monthly,
            Frequency::Weekly,
            Frequency::Daily,
            Frequency::Hourly,
            Frequency::Minutely,
            Frequency::Secondly,
        ]
        .into_iter()
        .find(|freq| freq.token() == token)
        .ok_or_else(|| Error::MalformedText {
            key: "FREQ".to_owned(),
            reason: format!("`{s}` is not a frequency"),
        })
    }
}

impl From<RecurFrequency> for Frequency {
    fn from(freq: RecurFrequency) -> Self {
        match freq {
            RecurFrequency::Yearly => Frequency::Yearly,
            RecurFrequency::Monthly => Frequency::Monthly,
            RecurFrequency::Weekly => Frequency::Weekly,
            RecurFrequency::Daily => Frequency::Daily,
            RecurFrequency::Hourly => Frequency::Hourly,
            RecurFrequency::Minutely => Frequency::Minutely,
            RecurFrequency::Secondly => Frequency::Secondly,
        }
    }
}

impl From<Frequency> for RecurFrequency {
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Yearly => RecurFrequency::Yearly,
            Frequency::Monthly => RecurFrequency::Monthly,
            Frequency::Weekly => RecurFrequency::Weekly,
            Frequency::Daily => RecurFrequency::Daily,
            Frequency::Hourly => RecurFrequency::Hourly,
            Frequency::Minutely => RecurFrequency::Minutely,
            Frequency::Secondly => RecurFrequency::Secondly,
        }
    }
}

/// Caller-facing options for building a [`Rule`].
///
/// Everything is optional and unvalidated; [`Rule::new`] sanitizes the
/// record in one pass. Textual `BYDAY` and `WKST` forms enter through the
/// `FromStr` impls on [`WeekdayNum`] and [`Weekday`].
#[derive(Debug, Clone, Default, PartialEq)]
#[expect(missing_docs)]
pub struct RuleOptions {
    pub freq: Option<Frequency>,
    pub dtstart: Option<Moment>,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    pub until: Option<Moment>,
    pub wkst: Option<Weekday>,
    pub by_month: Vec<u8>,
    pub by_month_day: Vec<i8>,
    pub by_year_day: Vec<i16>,
    pub by_week_no: Vec<i8>,
    pub by_day: Vec<WeekdayNum>,
    pub by_hour: Vec<u8>,
    pub by_minute: Vec<u8>,
    pub by_second: Vec<u8>,
    pub by_set_pos: Vec<i16>,
}

/// A sanitized recurrence rule.
///
/// Construction validates once; afterwards the rule is immutable. The
/// setters rebuild through [`RuleOptions`] and re-validate, and generators
/// snapshot the rule, so mutation can never invalidate a live iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub(crate) freq: Frequency,
    pub(crate) dtstart: Option<Moment>,
    pub(crate) interval: u32,
    pub(crate) count: Option<u32>,
    pub(crate) until: Option<Moment>,
    pub(crate) wkst: Option<Weekday>,
    pub(crate) by_month: Vec<u8>,
    pub(crate) by_month_day: Vec<i8>,
    pub(crate) by_year_day: Vec<i16>,
    pub(crate) by_week_no: Vec<i8>,
    pub(crate) by_day: Vec<WeekdayNum>,
    pub(crate) by_hour: Vec<u8>,
    pub(crate) by_minute: Vec<u8>,
    pub(crate) by_second: Vec<u8>,
    pub(crate) by_set_pos: Vec<i16>,
}

impl Rule {
    /// Sanitize an options record into a rule.
    ///
    /// Out-of-range selector values are dropped (logged at `warn`) and the
    /// lists deduplicated preserving first-seen order; a missing `FREQ`
    /// defaults to yearly.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRule`] for structural faults: `COUNT` and `UNTIL`
    /// both set, `UNTIL` before `DTSTART`, `BYSETPOS` without another
    /// selector, or a zero `INTERVAL`.
    pub fn new(options: RuleOptions) -> Result<Rule, Error> {
        sanitize::build(options)
    }

    /// Parse a text block containing an `RRULE:` line and optionally a
    /// `DTSTART` line, in either order; blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Per the [`Mode`] discipline; structural faults fail in both modes.
    pub fn parse(text: &str, mode: Mode) -> Result<Rule, Error> {
        text::rule_from_text(text, mode)
    }

    /// Serialise to the wire form: a `DTSTART` line (when anchored)
    /// followed by the `RRULE` line.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRule`] when `UNTIL` precedes `DTSTART` (possible
    /// only through direct field surgery, since construction checks it).
    pub fn to_text(&self) -> Result<String, Error> {
        text::rule_to_text(self)
    }

    /// The frequency.
    #[must_use]
    pub fn freq(&self) -> Frequency {
        self.freq
    }

    /// The start anchor.
    #[must_use]
    pub fn dtstart(&self) -> Option<&Moment> {
        self.dtstart.as_ref()
    }

    /// The interval between periods, at least 1.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// The occurrence count bound, if any.
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// The end bound, if any (inclusive).
    #[must_use]
    pub fn until(&self) -> Option<&Moment> {
        self.until.as_ref()
    }

    /// The explicitly configured week start, if any.
    #[must_use]
    pub fn wkst(&self) -> Option<Weekday> {
        self.wkst
    }

    /// The effective week start: the configured one, or Monday.
    #[must_use]
    pub fn week_start(&self) -> Weekday {
        self.wkst.unwrap_or(Weekday::Monday)
    }

    /// The `BYMONTH` selector.
    #[must_use]
    pub fn by_month(&self) -> &[u8] {
        &self.by_month
    }

    /// The `BYMONTHDAY` selector.
    #[must_use]
    pub fn by_month_day(&self) -> &[i8] {
        &self.by_month_day
    }

    /// The `BYYEARDAY` selector.
    #[must_use]
    pub fn by_year_day(&self) -> &[i16] {
        &self.by_year_day
    }

    /// The `BYWEEKNO` selector.
    #[must_use]
    pub fn by_week_no(&self) -> &[i8] {
        &self.by_week_no
    }

    /// The `BYDAY` selector.
    #[must_use]
    pub fn by_day(&self) -> &[WeekdayNum] {
        &self.by_day
    }

    /// The `BYHOUR` selector.
    #[must_use]
    pub fn by_hour(&self) -> &[u8] {
        &self.by_hour
    }

    /// The `BYMINUTE` selector.
    #[must_use]
    pub fn by_minute(&self) -> &[u8] {
        &self.by_minute
    }

    /// The `BYSECOND` selector.
    #[must_use]
    pub fn by_second(&self) -> &[u8] {
        &self.by_second
    }

    /// The `BYSETPOS` selector.
    #[must_use]
    pub fn by_set_pos(&self) -> &[i16] {
        &self.by_set_pos
    }

    /// Rebuild the mutable options record backing this rule.
    #[must_use]
    pub fn to_options(&self) -> RuleOptions {
        RuleOptions {
            freq: Some(self.freq),
            dtstart: self.dtstart.clone(),
            interval: Some(self.interval),
            count: self.count,
            until: self.until.clone(),
            wkst: self.wkst,
            by_month: self.by_month.clone(),
            by_month_day: self.by_month_day.clone(),
            by_year_day: self.by_year_day.clone(),
            by_week_no: self.by_week_no.clone(),
            by_day: self.by_day.clone(),
            by_hour: self.by_hour.clone(),
            by_minute: self.by_minute.clone(),
            by_second: self.by_second.clone(),
            by_set_pos: self.by_set_pos.clone(),
        }
    }

    /// Rebuild with a different start anchor.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRule`] when the new anchor violates a structural
    /// constraint (e.g. `UNTIL` before it).
    pub fn with_dtstart(&self, dtstart: Moment) -> Result<Rule, Error> {
        let mut options = self.to_options();
        options.dtstart = Some(dtstart);
        Rule::new(options)
    }

    /// Rebuild with a different count bound, clearing any `UNTIL`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRule`] on re-validation failure.
    pub fn with_count(&self, count: Option<u32>) -> Result<Rule, Error> {
        let mut options = self.to_options();
        options.count = count;
        if count.is_some() {
            options.until = None;
        }
        Rule::new(options)
    }

    /// Rebuild with a different end bound, clearing any `COUNT`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRule`] when the new bound precedes the anchor.
    pub fn with_until(&self, until: Option<Moment>) -> Result<Rule, Error> {
        let mut options = self.to_options();
        if until.is_some() {
            options.count = None;
        }
        options.until = until;
        Rule::new(options)
    }

    /// Rebuild with a different interval.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRule`] when the interval is zero.
    pub fn with_interval(&self, interval: u32) -> Result<Rule, Error> {
        let mut options = self.to_options();
        options.interval = Some(interval);
        Rule::new(options)
    }

    /// A lazy occurrence generator with the default iteration policy.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDtstart`] when the rule has no anchor.
    pub fn occurrences(&self) -> Result<Occurrences, Error> {
        self.occurrences_with(IterationPolicy::default())
    }

    /// A lazy occurrence generator with an explicit iteration policy.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDtstart`] when the rule has no anchor.
    pub fn occurrences_with(&self, policy: IterationPolicy) -> Result<Occurrences, Error> {
        Occurrences::new(self, policy)
    }

    /// Collect occurrences until exhaustion, or at most `limit`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDtstart`] or [`Error::MaxIterationsExceeded`].
    pub fn all(&self, limit: Option<usize>) -> Result<Vec<Moment>, Error> {
        let mut out = Vec::new();
        for item in self.occurrences()? {
            out.push(item?);
            if limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
        }
        Ok(out)
    }

    /// Collect occurrences between `start` and `end`.
    ///
    /// Inclusive bounds by default in the wire API; pass `inclusive=false`
    /// to exclude both endpoints.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDtstart`] or [`Error::MaxIterationsExceeded`].
    pub fn between(
        &self,
        start: &Moment,
        end: &Moment,
        inclusive: bool,
    ) -> Result<Vec<Moment>, Error> {
        let mut occurrences = self.occurrences()?;
        occurrences.seek(start);

        let mut out = Vec::new();
        for item in occurrences {
            let moment = item?;
            let after_start = if inclusive {
                moment >= *start
            } else {
                moment > *start
            };
            if !after_start {
                continue;
            }
            let before_end = if inclusive {
                moment <= *end
            } else {
                moment < *end
            };
            if !before_end {
                break;
            }
            out.push(moment);
        }
        Ok(out)
    }

    /// Collect occurrences strictly before `t` (or at `t` when inclusive),
    /// capped at `limit` items.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDtstart`] or [`Error::MaxIterationsExceeded`].
    pub fn before(
        &self,
        t: &Moment,
        inclusive: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Moment>, Error> {
        let mut out = Vec::new();
        for item in self.occurrences()? {
            let moment = item?;
            let keep = if inclusive { moment <= *t } else { moment < *t };
            if !keep {
                break;
            }
            out.push(moment);
            if limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
        }
        Ok(out)
    }

    /// Collect occurrences strictly after `t` (or from `t` when inclusive),
    /// capped at `limit` items; all remaining when `limit` is `None`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDtstart`] or [`Error::MaxIterationsExceeded`].
    pub fn after(
        &self,
        t: &Moment,
        inclusive: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Moment>, Error> {
        let mut occurrences = self.occurrences()?;
        occurrences.seek(t);

        let mut out = Vec::new();
        for item in occurrences {
            let moment = item?;
            let keep = if inclusive { moment >= *t } else { moment > *t };
            if !keep {
                continue;
            }
            out.push(moment);
            if limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
        }
        Ok(out)
    }

    /// The first occurrence after `t` (or at `t` when inclusive).
    ///
    /// # Errors
    ///
    /// [`Error::MissingDtstart`] or [`Error::MaxIterationsExceeded`].
    pub fn next_after(&self, t: &Moment, inclusive: bool) -> Result<Option<Moment>, Error> {
        Ok(self.after(t, inclusive, Some(1))?.into_iter().next())
    }

    /// The last occurrence before `t` (or at `t` when inclusive), or `None`
    /// when the anchor is not before `t`.
    ///
    /// Scans from the anchor without seeking; unbounded rules rely on
    /// `COUNT`, `UNTIL` or the iteration policy to terminate.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDtstart`] or [`Error::MaxIterationsExceeded`].
    pub fn previous_before(&self, t: &Moment, inclusive: bool) -> Result<Option<Moment>, Error> {
        let mut last = None;
        for item in self.occurrences()? {
            let moment = item?;
            let keep = if inclusive { moment <= *t } else { moment < *t };
            if !keep {
                break;
            }
            last = Some(moment);
        }
        Ok(last)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_text().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Rule {
    type Err = Error;

    /// Strict-mode parse of a recurrence text block.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::parse(s, Mode::Strict)
    }
}
