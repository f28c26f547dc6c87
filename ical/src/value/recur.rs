// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The `RECUR` value type (RFC 5545 Section 3.3.10).
//!
//! [`parse_recur`] interprets the raw value of an `RRULE` line. Rule parts
//! are split and parsed one item at a time so that lenient mode can drop
//! exactly the offending items while strict mode reports them by key.

use std::fmt::{self, Display};
use std::ops::RangeInclusive;

use chumsky::Parser;
use chumsky::extra::ParserExtra;
use chumsky::input::{Input, Stream};
use chumsky::prelude::*;

use crate::Mode;
use crate::error::LineError;
use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE, KW_RRULE_BYDAY,
    KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND,
    KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKDAY, KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT,
    KW_RRULE_FREQ, KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_HOURLY, KW_RRULE_FREQ_MINUTELY,
    KW_RRULE_FREQ_MONTHLY, KW_RRULE_FREQ_SECONDLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY,
    KW_RRULE_INTERVAL, KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::value::datetime::{DateOrDateTime, value_end_date};
use crate::value::primitive::{i8_0_3, i8_0_9, i8_1_4, i8_1_9, is_positive, u32_non_zero};

/// Recurrence rule in wire form: grammatically valid, semantically raw.
///
/// Selector lists keep their source order and may still contain duplicates;
/// semantic sanitization is the domain layer's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurRule {
    /// Frequency of recurrence; `None` when absent (or invalid in lenient mode)
    pub freq: Option<RecurFrequency>,
    /// Until date for recurrence
    pub until: Option<DateOrDateTime>,
    /// Number of occurrences
    pub count: Option<u32>,
    /// Interval between recurrences
    pub interval: Option<u32>,
    /// Second specifier
    pub by_second: Vec<u8>,
    /// Minute specifier
    pub by_minute: Vec<u8>,
    /// Hour specifier
    pub by_hour: Vec<u8>,
    /// Day of week specifier
    pub by_day: Vec<RecurWeekdayNum>,
    /// Day of month specifier
    pub by_month_day: Vec<i8>,
    /// Day of year specifier
    pub by_year_day: Vec<i16>,
    /// Week number specifier
    pub by_week_no: Vec<i8>,
    /// Month specifier
    pub by_month: Vec<u8>,
    /// Position in the expanded set
    pub by_set_pos: Vec<i16>,
    /// Start day of week
    pub wkst: Option<RecurWeekday>,
}

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(missing_docs)]
pub enum RecurFrequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Display for RecurFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurFrequency::Secondly => write!(f, "{KW_RRULE_FREQ_SECONDLY}"),
            RecurFrequency::Minutely => write!(f, "{KW_RRULE_FREQ_MINUTELY}"),
            RecurFrequency::Hourly => write!(f, "{KW_RRULE_FREQ_HOURLY}"),
            RecurFrequency::Daily => write!(f, "{KW_RRULE_FREQ_DAILY}"),
            RecurFrequency::Weekly => write!(f, "{KW_RRULE_FREQ_WEEKLY}"),
            RecurFrequency::Monthly => write!(f, "{KW_RRULE_FREQ_MONTHLY}"),
            RecurFrequency::Yearly => write!(f, "{KW_RRULE_FREQ_YEARLY}"),
        }
    }
}

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(missing_docs)]
pub enum RecurWeekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Display for RecurWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurWeekday::Sunday => write!(f, "{KW_DAY_SU}"),
            RecurWeekday::Monday => write!(f, "{KW_DAY_MO}"),
            RecurWeekday::Tuesday => write!(f, "{KW_DAY_TU}"),
            RecurWeekday::Wednesday => write!(f, "{KW_DAY_WE}"),
            RecurWeekday::Thursday => write!(f, "{KW_DAY_TH}"),
            RecurWeekday::Friday => write!(f, "{KW_DAY_FR}"),
            RecurWeekday::Saturday => write!(f, "{KW_DAY_SA}"),
        }
    }
}

/// Day of week with optional occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurWeekdayNum {
    /// Day of the week
    pub day: RecurWeekday,
    /// Occurrence in the containing period (optional)
    pub occurrence: Option<i8>,
}

impl Display for RecurWeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occurrence {
            Some(n) => write!(f, "{n}{}", self.day),
            None => write!(f, "{}", self.day),
        }
    }
}

/// Parse the raw value of an `RRULE` line.
///
/// ```txt
/// recur           = recur-rule-part *( ";" recur-rule-part )
///                 ;
///                 ; The rule parts are not ordered in any
///                 ; particular sequence.
///                 ;
///                 ; The FREQ rule part is REQUIRED,
///                 ; but MUST NOT occur more than once.
///                 ;
///                 ; The UNTIL or COUNT rule parts are OPTIONAL,
///                 ; but they MUST NOT occur in the same 'recur'.
///                 ;
///                 ; The other rule parts are OPTIONAL,
///                 ; but MUST NOT occur more than once.
/// ```
///
/// Keys are matched case-insensitively and `BYWEEKDAY` is accepted as an
/// alias of `BYDAY`. A missing `FREQ` is left as `None` here; the domain
/// layer injects the default.
///
/// # Errors
///
/// In strict mode, the first malformed token yields [`LineError::Malformed`],
/// the first out-of-range value [`LineError::OutOfRange`], a repeated key
/// [`LineError::Duplicate`], all naming the key. Lenient mode drops the
/// offending items instead and never fails.
pub fn parse_recur(value: &str, mode: Mode) -> Result<RecurRule, LineError> {
    let mut rule = RecurRule::default();
    let mut seen: Vec<&'static str> = Vec::new();

    for part in value.split(';') {
        let Some((key, raw)) = part.split_once('=') else {
            if mode.is_strict() {
                return Err(LineError::malformed(
                    "RRULE",
                    format!("rule part `{part}` has no `=`"),
                ));
            }
            continue;
        };

        let key = key.to_ascii_uppercase();
        let key = match known_key(&key) {
            Some(KW_RRULE_BYWEEKDAY) => KW_RRULE_BYDAY,
            Some(key) => key,
            None if mode.is_strict() => {
                return Err(LineError::malformed(&key, "unknown rule part"));
            }
            None => continue,
        };
        if seen.contains(&key) {
            if mode.is_strict() {
                return Err(LineError::Duplicate {
                    key: key.to_owned(),
                });
            }
            continue; // first occurrence wins
        }
        seen.push(key);

        match key {
            KW_RRULE_FREQ => rule.freq = parse_freq(raw, mode)?,
            KW_RRULE_UNTIL => rule.until = parse_until(raw, mode)?,
            KW_RRULE_COUNT => rule.count = parse_positive_u32(key, raw, mode)?,
            KW_RRULE_INTERVAL => rule.interval = parse_positive_u32(key, raw, mode)?,
            KW_RRULE_BYSECOND => rule.by_second = parse_int_list(key, raw, mode, 0..=59, false)?,
            KW_RRULE_BYMINUTE => rule.by_minute = parse_int_list(key, raw, mode, 0..=59, false)?,
            KW_RRULE_BYHOUR => rule.by_hour = parse_int_list(key, raw, mode, 0..=23, false)?,
            KW_RRULE_BYDAY => rule.by_day = parse_weekday_list(key, raw, mode)?,
            KW_RRULE_BYMONTHDAY => {
                rule.by_month_day = parse_int_list(key, raw, mode, -31..=31, true)?;
            }
            KW_RRULE_BYYEARDAY => {
                rule.by_year_day = parse_int_list(key, raw, mode, -366..=366, true)?;
            }
            KW_RRULE_BYWEEKNO => rule.by_week_no = parse_int_list(key, raw, mode, -53..=53, true)?,
            KW_RRULE_BYMONTH => rule.by_month = parse_int_list(key, raw, mode, 1..=12, false)?,
            KW_RRULE_BYSETPOS => {
                rule.by_set_pos = parse_int_list(key, raw, mode, -366..=366, true)?;
            }
            KW_RRULE_WKST => rule.wkst = parse_wkst(raw, mode)?,
            _ => unreachable!("known_key returns only dispatched keys"),
        }
    }

    Ok(rule)
}

/// Map an upper-cased key onto its canonical static keyword, if recognised.
fn known_key(key: &str) -> Option<&'static str> {
    [
        KW_RRULE_FREQ,
        KW_RRULE_UNTIL,
        KW_RRULE_COUNT,
        KW_RRULE_INTERVAL,
        KW_RRULE_BYSECOND,
        KW_RRULE_BYMINUTE,
        KW_RRULE_BYHOUR,
        KW_RRULE_BYDAY,
        KW_RRULE_BYWEEKDAY,
        KW_RRULE_BYMONTHDAY,
        KW_RRULE_BYYEARDAY,
        KW_RRULE_BYWEEKNO,
        KW_RRULE_BYMONTH,
        KW_RRULE_BYSETPOS,
        KW_RRULE_WKST,
    ]
    .into_iter()
    .find(|kw| *kw == key)
}

/// ```txt
/// freq        = "SECONDLY" / "MINUTELY" / "HOURLY" / "DAILY"
///             / "WEEKLY" / "MONTHLY" / "YEARLY"
/// ```
fn parse_freq(raw: &str, mode: Mode) -> Result<Option<RecurFrequency>, LineError> {
    let raw = raw.to_ascii_uppercase();
    let freq = match raw.as_str() {
        KW_RRULE_FREQ_SECONDLY => Some(RecurFrequency::Secondly),
        KW_RRULE_FREQ_MINUTELY => Some(RecurFrequency::Minutely),
        KW_RRULE_FREQ_HOURLY => Some(RecurFrequency::Hourly),
        KW_RRULE_FREQ_DAILY => Some(RecurFrequency::Daily),
        KW_RRULE_FREQ_WEEKLY => Some(RecurFrequency::Weekly),
        KW_RRULE_FREQ_MONTHLY => Some(RecurFrequency::Monthly),
        KW_RRULE_FREQ_YEARLY => Some(RecurFrequency::Yearly),
        _ if mode.is_strict() => {
            return Err(LineError::malformed(
                KW_RRULE_FREQ,
                format!("`{raw}` is not a frequency"),
            ));
        }
        _ => None,
    };
    Ok(freq)
}

fn parse_until(raw: &str, mode: Mode) -> Result<Option<DateOrDateTime>, LineError> {
    let normalized;
    let src = match mode {
        Mode::Strict => raw,
        Mode::Lenient => {
            normalized = raw.to_ascii_uppercase();
            &normalized
        }
    };
    let stream = Stream::from_iter(src.chars());
    match value_end_date::<'_, _, extra::Err<Rich<'_, char>>>()
        .parse(stream)
        .into_result()
    {
        Ok(v) => Ok(Some(v)),
        Err(_) if mode.is_lenient() => Ok(None),
        Err(_) => Err(LineError::malformed(
            KW_RRULE_UNTIL,
            format!("`{raw}` is not a date or date-time"),
        )),
    }
}

fn parse_positive_u32(key: &str, raw: &str, mode: Mode) -> Result<Option<u32>, LineError> {
    let stream = Stream::from_iter(raw.chars());
    match u32_non_zero::<'_, _, extra::Err<Rich<'_, char>>>()
        .parse(stream)
        .into_result()
    {
        Ok(v) => Ok(Some(v)),
        Err(_) if mode.is_lenient() => Ok(None),
        // A numeric literal that the grammar refused is a range problem
        // (zero or overflow); anything else is lexical.
        Err(_) => match parse_signed(raw) {
            Some(_) => Err(LineError::out_of_range(key, raw)),
            None => Err(LineError::malformed(key, "expected a positive integer")),
        },
    }
}

fn parse_wkst(raw: &str, mode: Mode) -> Result<Option<RecurWeekday>, LineError> {
    match weekday_from_token(&raw.to_ascii_uppercase()) {
        Some(day) => Ok(Some(day)),
        None if mode.is_lenient() => Ok(None),
        None => Err(LineError::malformed(
            KW_RRULE_WKST,
            format!("`{raw}` is not a weekday"),
        )),
    }
}

fn weekday_from_token(token: &str) -> Option<RecurWeekday> {
    match token {
        KW_DAY_SU => Some(RecurWeekday::Sunday),
        KW_DAY_MO => Some(RecurWeekday::Monday),
        KW_DAY_TU => Some(RecurWeekday::Tuesday),
        KW_DAY_WE => Some(RecurWeekday::Wednesday),
        KW_DAY_TH => Some(RecurWeekday::Thursday),
        KW_DAY_FR => Some(RecurWeekday::Friday),
        KW_DAY_SA => Some(RecurWeekday::Saturday),
        _ => None,
    }
}

/// Parse a comma-separated integer list, checking each item against `range`.
fn parse_int_list<T: TryFrom<i64>>(
    key: &str,
    raw: &str,
    mode: Mode,
    range: RangeInclusive<i64>,
    forbid_zero: bool,
) -> Result<Vec<T>, LineError> {
    let mut out = Vec::new();
    for item in raw.split(',') {
        let Some(n) = parse_signed(item) else {
            if mode.is_strict() {
                return Err(LineError::malformed(
                    key,
                    format!("`{item}` is not an integer"),
                ));
            }
            continue;
        };
        if !range.contains(&n) || (forbid_zero && n == 0) {
            if mode.is_strict() {
                return Err(LineError::out_of_range(key, item));
            }
            continue;
        }
        if let Ok(v) = T::try_from(n) {
            out.push(v);
        }
    }
    Ok(out)
}

/// Parse an optionally signed decimal integer, `+` included.
fn parse_signed(item: &str) -> Option<i64> {
    let digits = item.strip_prefix('+').unwrap_or(item);
    if digits.is_empty() {
        return None;
    }
    lexical::parse::<i64, _>(digits).ok()
}

fn parse_weekday_list(
    key: &str,
    raw: &str,
    mode: Mode,
) -> Result<Vec<RecurWeekdayNum>, LineError> {
    let mut out = Vec::new();
    for item in raw.split(',') {
        let token = item.to_ascii_uppercase();
        let stream = Stream::from_iter(token.chars());
        match weekdaynum::<'_, _, extra::Err<Rich<'_, char>>>()
            .parse(stream)
            .into_result()
        {
            Ok(v) => out.push(v),
            Err(_) if mode.is_lenient() => {}
            Err(_) => {
                // `0MO` and `54FR` have the right shape but a bad ordinal;
                // report those as range faults rather than lexical ones.
                return Err(match split_ordinal(&token) {
                    Some(_) => LineError::out_of_range(key, item),
                    None => {
                        LineError::malformed(key, format!("`{item}` is not a weekday token"))
                    }
                });
            }
        }
    }
    Ok(out)
}

/// Split `<signed int><weekday>` shapes that the grammar rejected.
fn split_ordinal(token: &str) -> Option<(i64, RecurWeekday)> {
    let split_at = token.len().checked_sub(2)?;
    if !token.is_char_boundary(split_at) {
        return None;
    }
    let (num, day) = token.split_at(split_at);
    let day = weekday_from_token(day)?;
    let n = parse_signed(num)?;
    Some((n, day))
}

/// ```txt
/// weekdaynum  = [[plus / minus] ordwk] weekday
/// plus        = "+"
/// minus       = "-"
/// ```
fn weekdaynum<'src, I, E>() -> impl Parser<'src, I, RecurWeekdayNum, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan> + chumsky::input::ValueInput<'src>,
    E: ParserExtra<'src, I>,
{
    is_positive()
        .then(ordwk())
        .map(|(positive, n)| if positive { n } else { -n })
        .or_not()
        .then(weekday())
        .map(|(occurrence, day)| RecurWeekdayNum { day, occurrence })
}

/// ```txt
/// ordwk       = 1*2DIGIT       ;1 to 53
/// ```
fn ordwk<'src, I, E>() -> impl Parser<'src, I, i8, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan> + chumsky::input::ValueInput<'src>,
    E: ParserExtra<'src, I>,
{
    choice((
        i8_1_4().then(i8_0_9()).map(|(a, b)| a * 10 + b), // 10-49
        just('5').ignore_then(i8_0_3()).map(|a| 50 + a),  // 50-53
        just('0').ignore_then(i8_1_9()),                  // 01-09
        i8_1_9(),                                         // 1-9
    ))
}

/// ```txt
/// weekday     = "SU" / "MO" / "TU" / "WE" / "TH" / "FR" / "SA"
/// ```
fn weekday<'src, I, E>() -> impl Parser<'src, I, RecurWeekday, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan> + chumsky::input::ValueInput<'src>,
    E: ParserExtra<'src, I>,
{
    choice((
        just(KW_DAY_SU).to(RecurWeekday::Sunday),
        just(KW_DAY_MO).to(RecurWeekday::Monday),
        just(KW_DAY_TU).to(RecurWeekday::Tuesday),
        just(KW_DAY_WE).to(RecurWeekday::Wednesday),
        just(KW_DAY_TH).to(RecurWeekday::Thursday),
        just(KW_DAY_FR).to(RecurWeekday::Friday),
        just(KW_DAY_SA).to(RecurWeekday::Saturday),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::datetime::ValueDate;

    fn parse(src: &str) -> Result<RecurRule, LineError> {
        parse_recur(src, Mode::Strict)
    }

    #[test]
    fn parses_rrule_freq_only() {
        let freqs = [
            ("FREQ=SECONDLY", RecurFrequency::Secondly),
            ("FREQ=MINUTELY", RecurFrequency::Minutely),
            ("FREQ=HOURLY", RecurFrequency::Hourly),
            ("FREQ=DAILY", RecurFrequency::Daily),
            ("FREQ=WEEKLY", RecurFrequency::Weekly),
            ("FREQ=MONTHLY", RecurFrequency::Monthly),
            ("FREQ=YEARLY", RecurFrequency::Yearly),
        ];

        for (src, expected_freq) in freqs {
            let result = parse(src).unwrap();
            assert_eq!(result.freq, Some(expected_freq), "Failed for {src}");
            assert!(result.until.is_none());
            assert!(result.count.is_none());
            assert!(result.interval.is_none());
        }
    }

    #[test]
    fn parses_keys_case_insensitively() {
        let result = parse("freq=daily;Count=10").unwrap();
        assert_eq!(result.freq, Some(RecurFrequency::Daily));
        assert_eq!(result.count, Some(10));
    }

    #[test]
    fn parses_rrule_with_interval() {
        let result = parse("FREQ=DAILY;INTERVAL=2").unwrap();
        assert_eq!(result.freq, Some(RecurFrequency::Daily));
        assert_eq!(result.interval, Some(2));
    }

    #[test]
    fn parses_rrule_with_until_datetime() {
        let result = parse("FREQ=DAILY;UNTIL=19971224T000000Z").unwrap();
        let Some(DateOrDateTime::DateTime(until)) = result.until else {
            panic!("expected a date-time until");
        };
        assert_eq!(
            until.date,
            ValueDate {
                year: 1997,
                month: 12,
                day: 24
            }
        );
        assert!(until.time.utc);
    }

    #[test]
    fn parses_rrule_with_until_date() {
        let result = parse("FREQ=DAILY;UNTIL=19971224").unwrap();
        assert_eq!(
            result.until,
            Some(DateOrDateTime::Date(ValueDate {
                year: 1997,
                month: 12,
                day: 24
            }))
        );
    }

    #[test]
    fn parses_rrule_with_byday() {
        // Simple days
        let result = parse("FREQ=WEEKLY;BYDAY=MO,WE,FR").unwrap();
        assert_eq!(result.by_day.len(), 3);

        let first = result.by_day.first().unwrap();
        assert_eq!(first.day, RecurWeekday::Monday);
        assert_eq!(first.occurrence, None);
        assert_eq!(result.by_day.get(1).unwrap().day, RecurWeekday::Wednesday);
        assert_eq!(result.by_day.get(2).unwrap().day, RecurWeekday::Friday);

        // With occurrence
        let result = parse("FREQ=MONTHLY;BYDAY=1MO,-1MO").unwrap();
        assert_eq!(result.by_day.len(), 2);
        assert_eq!(result.by_day.first().unwrap().occurrence, Some(1));
        assert_eq!(result.by_day.get(1).unwrap().occurrence, Some(-1));

        // Case-insensitive tokens
        let result = parse("FREQ=MONTHLY;BYDAY=-2fr").unwrap();
        let term = result.by_day.first().unwrap();
        assert_eq!(term.day, RecurWeekday::Friday);
        assert_eq!(term.occurrence, Some(-2));
    }

    #[test]
    fn parses_byweekday_alias() {
        let result = parse("FREQ=WEEKLY;BYWEEKDAY=TU,TH").unwrap();
        assert_eq!(result.by_day.len(), 2);
    }

    #[test]
    fn parses_numeric_selector_lists() {
        let result =
            parse("FREQ=YEARLY;BYMONTH=1,2,3;BYYEARDAY=1,100,200,-1;BYWEEKNO=20,-1").unwrap();
        assert_eq!(result.by_month, vec![1, 2, 3]);
        assert_eq!(result.by_year_day, vec![1, 100, 200, -1]);
        assert_eq!(result.by_week_no, vec![20, -1]);

        let result = parse("FREQ=DAILY;BYHOUR=9,10,11;BYMINUTE=0,20,40;BYSECOND=0,30").unwrap();
        assert_eq!(result.by_hour, vec![9, 10, 11]);
        assert_eq!(result.by_minute, vec![0, 20, 40]);
        assert_eq!(result.by_second, vec![0, 30]);

        let result = parse("FREQ=MONTHLY;BYMONTHDAY=1,15,-1;BYSETPOS=+1,-2").unwrap();
        assert_eq!(result.by_month_day, vec![1, 15, -1]);
        assert_eq!(result.by_set_pos, vec![1, -2]);
    }

    #[test]
    fn parses_rrule_with_wkst() {
        let result = parse("FREQ=WEEKLY;WKST=SU").unwrap();
        assert_eq!(result.wkst, Some(RecurWeekday::Sunday));

        let result = parse("FREQ=WEEKLY;WKST=su").unwrap();
        assert_eq!(result.wkst, Some(RecurWeekday::Sunday));
    }

    #[test]
    fn parses_rrule_complex() {
        // Example from RFC 5545
        let result = parse("FREQ=YEARLY;INTERVAL=2;BYMONTH=1;BYDAY=SU;BYHOUR=8,9;BYMINUTE=30")
            .unwrap();
        assert_eq!(result.freq, Some(RecurFrequency::Yearly));
        assert_eq!(result.interval, Some(2));
        assert_eq!(result.by_month, vec![1]);
        assert_eq!(result.by_day.len(), 1);
        assert_eq!(result.by_day.first().unwrap().day, RecurWeekday::Sunday);
        assert_eq!(result.by_hour, vec![8, 9]);
        assert_eq!(result.by_minute, vec![30]);
    }

    #[test]
    fn handles_reordered_parts() {
        let result = parse("COUNT=10;INTERVAL=2;FREQ=DAILY").unwrap();
        assert_eq!(result.freq, Some(RecurFrequency::Daily));
        assert_eq!(result.count, Some(10));
        assert_eq!(result.interval, Some(2));
    }

    #[test]
    fn rejects_duplicate_parts() {
        let test_cases = [
            "FREQ=DAILY;FREQ=WEEKLY",
            "FREQ=DAILY;UNTIL=19971224T000000Z;UNTIL=19971225T000000Z",
            "FREQ=DAILY;COUNT=10;COUNT=20",
            "FREQ=DAILY;INTERVAL=1;INTERVAL=2",
            "FREQ=WEEKLY;BYDAY=MO;BYDAY=FR",
            "FREQ=DAILY;BYHOUR=9;BYHOUR=10",
            "FREQ=WEEKLY;BYDAY=MO;BYWEEKDAY=FR", // alias counts as the same key
        ];

        for src in test_cases {
            assert!(
                matches!(parse(src), Err(LineError::Duplicate { .. })),
                "Duplicate should fail for input: {src}"
            );
        }
    }

    #[test]
    fn strict_rejects_out_of_range_values() {
        let test_cases = [
            ("FREQ=DAILY;BYHOUR=24", KW_RRULE_BYHOUR),
            ("FREQ=MONTHLY;BYMONTHDAY=0", KW_RRULE_BYMONTHDAY),
            ("FREQ=MONTHLY;BYMONTHDAY=32", KW_RRULE_BYMONTHDAY),
            ("FREQ=YEARLY;BYMONTH=13", KW_RRULE_BYMONTH),
            ("FREQ=YEARLY;BYYEARDAY=367", KW_RRULE_BYYEARDAY),
            ("FREQ=YEARLY;BYWEEKNO=0", KW_RRULE_BYWEEKNO),
            ("FREQ=DAILY;COUNT=0", KW_RRULE_COUNT),
            ("FREQ=MONTHLY;BYDAY=0MO", KW_RRULE_BYDAY),
            ("FREQ=MONTHLY;BYDAY=54FR", KW_RRULE_BYDAY),
        ];

        for (src, expected_key) in test_cases {
            match parse(src) {
                Err(LineError::OutOfRange { key, .. }) => {
                    assert_eq!(key, expected_key, "for input: {src}");
                }
                other => panic!("expected OutOfRange for {src}, got {other:?}"),
            }
        }
    }

    #[test]
    fn strict_rejects_malformed_values() {
        let test_cases = [
            "FREQ=SOMETIMES",
            "FREQ=DAILY;COUNT=x",
            "FREQ=DAILY;BYHOUR=nine",
            "FREQ=DAILY;UNTIL=tomorrow",
            "FREQ=WEEKLY;BYDAY=MONDAY",
            "FREQ=WEEKLY;WKST=XX",
            "FREQ=WEEKLY;NOPE=1",
            "FREQ=WEEKLY;COUNT",
        ];

        for src in test_cases {
            assert!(
                matches!(parse(src), Err(LineError::Malformed { .. })),
                "expected Malformed for {src}, got {:?}",
                parse(src)
            );
        }
    }

    #[test]
    fn lenient_drops_invalid_items() {
        let result = parse_recur("FREQ=DAILY;BYHOUR=9,24,x,10", Mode::Lenient).unwrap();
        assert_eq!(result.by_hour, vec![9, 10]);

        let result = parse_recur("FREQ=SOMETIMES;COUNT=10", Mode::Lenient).unwrap();
        assert_eq!(result.freq, None);
        assert_eq!(result.count, Some(10));

        let result = parse_recur("FREQ=WEEKLY;NOPE=1;BYDAY=MO,XX,FR", Mode::Lenient).unwrap();
        assert_eq!(result.by_day.len(), 2);
    }

    #[test]
    fn lenient_keeps_first_duplicate() {
        let result = parse_recur("FREQ=DAILY;COUNT=10;COUNT=20", Mode::Lenient).unwrap();
        assert_eq!(result.count, Some(10));
    }
}
