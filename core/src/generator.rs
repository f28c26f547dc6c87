// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The lazy occurrence generator.
//!
//! A cursor steps period by period from the anchor; each period expands
//! into a sorted candidate set which is drained in order. The n-th cursor
//! is always computed as `dtstart + n·interval` units in one multiplication
//! rather than by repeated addition, so a month-end clamp in one period
//! cannot leak into the next.

mod expand;

use std::collections::VecDeque;

use jiff::Unit;
use jiff::civil::{DateTime, Time};
use jiff::tz::TimeZone;

use crate::calendar;
use crate::error::Error;
use crate::moment::Moment;
use crate::rule::{Frequency, Rule};

/// How many consecutive empty periods before an unproductive rule is
/// declared finished (only before anything was emitted).
const MAX_EMPTY_PERIODS: usize = 1_000;

/// The generator's safety bound against unbounded work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationPolicy {
    max_iterations: usize,
}

impl IterationPolicy {
    /// A policy with an explicit iteration cap.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRule`] when `max_iterations` is zero.
    pub fn new(max_iterations: usize) -> Result<IterationPolicy, Error> {
        if max_iterations == 0 {
            return Err(Error::invalid_rule("the iteration limit must be at least 1"));
        }
        Ok(IterationPolicy { max_iterations })
    }

    /// The configured cap.
    #[must_use]
    pub fn max_iterations(self) -> usize {
        self.max_iterations
    }
}

impl Default for IterationPolicy {
    fn default() -> Self {
        IterationPolicy {
            max_iterations: 10_000,
        }
    }
}

/// What variant the generator emits, snapshotted from the anchor.
#[derive(Debug, Clone)]
enum EmitKind {
    Date,
    Floating,
    Zoned(TimeZone),
}

/// A lazy, restartable sequence of the rule's occurrences.
///
/// Yields moments in strict chronological order. The only mid-stream error
/// is [`Error::MaxIterationsExceeded`]; after reporting it once the
/// iterator is fused.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: Rule,
    kind: EmitKind,
    start: DateTime,
    until: Option<DateTime>,
    /// Periods advanced so far, paired with the cursor they produced.
    /// `None` once the walk is over.
    cursor: Option<(i64, DateTime)>,
    pending: VecDeque<DateTime>,
    emitted: u64,
    iterations: usize,
    consecutive_empty: usize,
    policy: IterationPolicy,
    failed: bool,
}

impl Occurrences {
    pub(crate) fn new(rule: &Rule, policy: IterationPolicy) -> Result<Occurrences, Error> {
        let Some(dtstart) = rule.dtstart() else {
            return Err(Error::MissingDtstart);
        };
        let kind = match dtstart {
            Moment::Date(_) => EmitKind::Date,
            Moment::Floating(_) => EmitKind::Floating,
            Moment::Zoned(zoned) => EmitKind::Zoned(zoned.time_zone().clone()),
        };
        let start = dtstart.civil();
        let until = rule.until().map(|until| civil_in_frame(until, &kind));
        Ok(Occurrences {
            rule: rule.clone(),
            kind,
            start,
            until,
            cursor: Some((0, start)),
            pending: VecDeque::new(),
            emitted: 0,
            iterations: 0,
            consecutive_empty: 0,
            policy,
            failed: false,
        })
    }

    /// Advance the cursor by whole periods toward `target` without
    /// emitting, never past any occurrence at or after it.
    ///
    /// The period count is computed arithmetically and rounded down, then
    /// backed off by one extra period; candidates of a period never precede
    /// its own window, so nothing at or after `target` can be skipped.
    /// Only meaningful before iteration has begun.
    pub fn seek(&mut self, target: &Moment) {
        let Some((0, _)) = self.cursor else {
            return;
        };
        // A COUNT bound counts every emission from the anchor onward;
        // skipping periods would let the sequence run past its true end.
        if self.rule.count().is_some() {
            return;
        }
        let target = civil_in_frame(target, &self.kind);
        if target <= self.start {
            return;
        }

        let units = match self.rule.freq() {
            Frequency::Yearly => i64::from(target.year()) - i64::from(self.start.year()),
            Frequency::Monthly => {
                (i64::from(target.year()) - i64::from(self.start.year())) * 12
                    + (i64::from(target.month()) - i64::from(self.start.month()))
            }
            Frequency::Weekly => self
                .start
                .date()
                .until(target.date())
                .map_or(0, |span| i64::from(span.get_days()) / 7),
            Frequency::Daily => self
                .start
                .date()
                .until(target.date())
                .map_or(0, |span| i64::from(span.get_days())),
            Frequency::Hourly => self
                .start
                .until((Unit::Hour, target))
                .map_or(0, |span| i64::from(span.get_hours())),
            Frequency::Minutely => self
                .start
                .until((Unit::Minute, target))
                .map_or(0, |span| i64::from(span.get_minutes())),
            Frequency::Secondly => self
                .start
                .until((Unit::Second, target))
                .map_or(0, |span| i64::from(span.get_seconds())),
        };

        let interval = i64::from(self.rule.interval());
        let periods = units / interval - 1;
        if periods <= 0 {
            return;
        }
        let Ok(span) = self
            .rule
            .freq()
            .unit_span()
            .checked_mul(periods.saturating_mul(interval))
        else {
            return;
        };
        let Ok(cursor) = self.start.checked_add(span) else {
            return;
        };
        tracing::debug!(periods, "seeking cursor toward target");
        self.iterations += 1;
        self.cursor = Some((periods, cursor));
    }

    fn advance(&mut self) {
        let Some((n, _)) = self.cursor else {
            return;
        };
        self.cursor = (|| {
            let n = n.checked_add(1)?;
            let units = n.checked_mul(i64::from(self.rule.interval()))?;
            let span = self.rule.freq().unit_span().checked_mul(units).ok()?;
            let cursor = self.start.checked_add(span).ok()?;
            Some((n, cursor))
        })();
    }

    /// The earliest wall clock any candidate of the cursor's period can
    /// carry; lets an `UNTIL` bound stop the walk through barren periods.
    fn period_floor(&self, cursor: DateTime) -> DateTime {
        match self.rule.freq() {
            Frequency::Yearly => DateTime::from_parts(cursor.date().first_of_year(), Time::midnight()),
            Frequency::Monthly => {
                DateTime::from_parts(cursor.date().first_of_month(), Time::midnight())
            }
            Frequency::Weekly => {
                let week_start = calendar::start_of_week(cursor.date(), self.rule.week_start())
                    .unwrap_or_else(|| cursor.date());
                DateTime::from_parts(week_start, Time::midnight())
            }
            Frequency::Daily => DateTime::from_parts(cursor.date(), Time::midnight()),
            Frequency::Hourly => cursor
                .with()
                .minute(0)
                .second(0)
                .subsec_nanosecond(0)
                .build()
                .unwrap_or(cursor),
            Frequency::Minutely => cursor
                .with()
                .second(0)
                .subsec_nanosecond(0)
                .build()
                .unwrap_or(cursor),
            Frequency::Secondly => cursor,
        }
    }

    fn emit(&self, dt: DateTime) -> Result<Moment, Error> {
        match &self.kind {
            EmitKind::Date => Ok(Moment::Date(dt.date())),
            EmitKind::Floating => Ok(Moment::Floating(dt)),
            // Wall clocks in a DST gap or fold resolve with jiff's
            // compatible disambiguation.
            EmitKind::Zoned(tz) => dt
                .to_zoned(tz.clone())
                .map(Moment::Zoned)
                .map_err(Error::invalid_moment),
        }
    }

    fn finish(&mut self) {
        self.cursor = None;
        self.pending.clear();
    }
}

impl Iterator for Occurrences {
    type Item = Result<Moment, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(dt) = self.pending.pop_front() {
                if let Some(until) = self.until
                    && dt > until
                {
                    self.finish();
                    return None;
                }
                self.emitted += 1;
                if let Some(count) = self.rule.count()
                    && self.emitted >= u64::from(count)
                {
                    self.finish();
                }
                return Some(self.emit(dt));
            }

            let (_, cursor) = self.cursor?;
            if let Some(until) = self.until
                && self.period_floor(cursor) > until
            {
                self.cursor = None;
                return None;
            }
            if self.iterations >= self.policy.max_iterations {
                self.failed = true;
                return Some(Err(Error::MaxIterationsExceeded {
                    limit: self.policy.max_iterations,
                }));
            }
            self.iterations += 1;

            let date_only = matches!(self.kind, EmitKind::Date);
            let set = expand::period_set(&self.rule, self.start, cursor, date_only);
            if set.is_empty() {
                self.consecutive_empty += 1;
                if self.emitted == 0 && self.consecutive_empty >= MAX_EMPTY_PERIODS {
                    self.cursor = None;
                    return None;
                }
            } else {
                self.consecutive_empty = 0;
                self.pending.extend(set);
            }
            self.advance();
        }
    }
}

impl std::iter::FusedIterator for Occurrences {}

fn civil_in_frame(moment: &Moment, kind: &EmitKind) -> DateTime {
    match (moment, kind) {
        (Moment::Zoned(zoned), EmitKind::Zoned(tz)) => zoned.with_time_zone(tz.clone()).datetime(),
        (moment, _) => moment.civil(),
    }
}
