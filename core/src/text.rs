// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Conversion between the wire types of `ritmo-ical` and the domain model.

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use ritmo_ical::formatter::{write_dtstart_line, write_rrule_line};
use ritmo_ical::{
    DateOrDateTime, DateTimeForm, DtStart, Mode, RecurRule, RuleLines, ValueDate, ValueDateTime,
    ValueTime, parse_block, unfold,
};

use crate::error::Error;
use crate::moment::Moment;
use crate::rule::{Frequency, Rule, RuleOptions};
use crate::weekday::{Weekday, WeekdayNum};

pub(crate) fn rule_from_text(text: &str, mode: Mode) -> Result<Rule, Error> {
    let unfolded = unfold(text);
    let lines = parse_block(&unfolded, mode)?;
    let options = options_from_wire(lines, mode)?;
    Rule::new(options)
}

pub(crate) fn rule_to_text(rule: &Rule) -> Result<String, Error> {
    if let (Some(dtstart), Some(until)) = (rule.dtstart(), rule.until())
        && until < dtstart
    {
        return Err(Error::invalid_rule("UNTIL is before DTSTART"));
    }

    let dtstart = rule.dtstart().map(dtstart_from_moment);
    let wire = wire_from_rule(rule);

    let mut out = String::new();
    let fail = |_| Error::invalid_rule("failed to format the rule");
    if let Some(dtstart) = &dtstart {
        write_dtstart_line(&mut out, dtstart).map_err(fail)?;
        out.push('\n');
    }
    write_rrule_line(&mut out, &wire).map_err(fail)?;
    Ok(out)
}

fn options_from_wire(lines: RuleLines, mode: Mode) -> Result<RuleOptions, Error> {
    let RuleLines { dtstart, rrule } = lines;
    let dtstart = match dtstart {
        Some(dtstart) => Some(moment_from_form(&dtstart.value, mode)?),
        None => None,
    };
    let until = rrule.until.map(moment_from_end_date).transpose()?;

    Ok(RuleOptions {
        freq: rrule.freq.map(Frequency::from),
        dtstart,
        interval: rrule.interval,
        count: rrule.count,
        until,
        wkst: rrule.wkst.map(Weekday::from),
        by_month: rrule.by_month,
        by_month_day: rrule.by_month_day,
        by_year_day: rrule.by_year_day,
        by_week_no: rrule.by_week_no,
        by_day: rrule.by_day.into_iter().map(WeekdayNum::from).collect(),
        by_hour: rrule.by_hour,
        by_minute: rrule.by_minute,
        by_second: rrule.by_second,
        by_set_pos: rrule.by_set_pos,
    })
}

fn moment_from_form(form: &DateTimeForm, mode: Mode) -> Result<Moment, Error> {
    match form {
        DateTimeForm::Date(date) => Ok(Moment::Date(civil_date(*date)?)),
        DateTimeForm::Floating(dt) => Ok(Moment::Floating(civil_date_time(*dt)?)),
        DateTimeForm::Utc(dt) => civil_date_time(*dt)?
            .to_zoned(TimeZone::UTC)
            .map(Moment::Zoned)
            .map_err(Error::invalid_moment),
        DateTimeForm::Zoned { date_time, tz_id } => {
            let dt = civil_date_time(*date_time)?;
            match TimeZone::get(tz_id) {
                Ok(tz) => dt
                    .to_zoned(tz)
                    .map(Moment::Zoned)
                    .map_err(Error::invalid_moment),
                Err(err) if mode.is_strict() => Err(Error::invalid_moment(format!(
                    "unknown timezone `{tz_id}`: {err}"
                ))),
                Err(_) => {
                    tracing::warn!(tzid = %tz_id, "unknown timezone, treating as floating");
                    Ok(Moment::Floating(dt))
                }
            }
        }
    }
}

fn moment_from_end_date(until: DateOrDateTime) -> Result<Moment, Error> {
    match until {
        DateOrDateTime::Date(date) => Ok(Moment::Date(civil_date(date)?)),
        DateOrDateTime::DateTime(dt) if dt.time.utc => civil_date_time(dt)?
            .to_zoned(TimeZone::UTC)
            .map(Moment::Zoned)
            .map_err(Error::invalid_moment),
        DateOrDateTime::DateTime(dt) => Ok(Moment::Floating(civil_date_time(dt)?)),
    }
}

fn civil_date(date: ValueDate) -> Result<Date, Error> {
    Date::new(date.year, date.month, date.day).map_err(Error::invalid_moment)
}

fn civil_date_time(dt: ValueDateTime) -> Result<DateTime, Error> {
    // Leap seconds clamp to :59, as jiff does not track them.
    let time = Time::new(dt.time.hour, dt.time.minute, dt.time.second.min(59), 0)
        .map_err(Error::invalid_moment)?;
    Ok(DateTime::from_parts(civil_date(dt.date)?, time))
}

fn dtstart_from_moment(moment: &Moment) -> DtStart {
    let value = match moment {
        Moment::Date(date) => DateTimeForm::Date(value_date(*date)),
        Moment::Floating(dt) => DateTimeForm::Floating(value_date_time(*dt, false)),
        Moment::Zoned(zoned) => match zoned.time_zone().iana_name() {
            Some(name) if *zoned.time_zone() != TimeZone::UTC => DateTimeForm::Zoned {
                date_time: value_date_time(zoned.datetime(), false),
                tz_id: name.to_owned(),
            },
            // UTC, or a zone with no name to serialise: emit as UTC.
            _ => DateTimeForm::Utc(value_date_time(
                zoned.with_time_zone(TimeZone::UTC).datetime(),
                true,
            )),
        },
    };
    DtStart { value }
}

fn wire_from_rule(rule: &Rule) -> RecurRule {
    RecurRule {
        freq: Some(rule.freq().into()),
        until: rule.until().map(|until| end_date_from_moment(rule, until)),
        count: rule.count(),
        interval: Some(rule.interval()),
        by_second: rule.by_second().to_vec(),
        by_minute: rule.by_minute().to_vec(),
        by_hour: rule.by_hour().to_vec(),
        by_day: rule.by_day().iter().map(|&term| term.into()).collect(),
        by_month_day: rule.by_month_day().to_vec(),
        by_year_day: rule.by_year_day().to_vec(),
        by_week_no: rule.by_week_no().to_vec(),
        by_month: rule.by_month().to_vec(),
        by_set_pos: rule.by_set_pos().to_vec(),
        wkst: rule.wkst().map(Weekday::into),
    }
}

/// `UNTIL` is emitted in the form matching the anchor: date form for a
/// date-anchored rule, floating date-time for a floating anchor, and a UTC
/// date-time (converting from the until moment's own zone) for a zoned
/// anchor. Without an anchor, the until moment's own variant decides.
fn end_date_from_moment(rule: &Rule, until: &Moment) -> DateOrDateTime {
    let anchor = rule.dtstart().unwrap_or(until);
    match anchor {
        Moment::Date(_) => DateOrDateTime::Date(value_date(until.date())),
        Moment::Floating(_) => DateOrDateTime::DateTime(value_date_time(until.civil(), false)),
        Moment::Zoned(_) => {
            let civil = match until {
                Moment::Zoned(zoned) => zoned.with_time_zone(TimeZone::UTC).datetime(),
                other => other.civil(),
            };
            DateOrDateTime::DateTime(value_date_time(civil, true))
        }
    }
}

fn value_date(date: Date) -> ValueDate {
    ValueDate {
        year: date.year(),
        month: date.month(),
        day: date.day(),
    }
}

fn value_date_time(dt: DateTime, utc: bool) -> ValueDateTime {
    ValueDateTime {
        date: value_date(dt.date()),
        time: ValueTime {
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            utc,
        },
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, datetime};

    use super::*;

    #[test]
    fn parses_dtstart_and_rrule() {
        let rule = rule_from_text(
            "DTSTART:19970902T090000\nRRULE:FREQ=DAILY;COUNT=10",
            Mode::Strict,
        )
        .unwrap();
        assert_eq!(rule.freq(), Frequency::Daily);
        assert_eq!(rule.count(), Some(10));
        assert_eq!(
            rule.dtstart(),
            Some(&Moment::Floating(datetime(1997, 9, 2, 9, 0, 0, 0)))
        );
    }

    #[test]
    fn parses_zoned_dtstart() {
        let rule = rule_from_text(
            "DTSTART;TZID=America/New_York:19970902T090000\nRRULE:FREQ=DAILY",
            Mode::Strict,
        )
        .unwrap();
        let dtstart = rule.dtstart().unwrap();
        assert_eq!(
            dtstart.time_zone().and_then(|tz| tz.iana_name()),
            Some("America/New_York")
        );
    }

    #[test]
    fn unknown_timezone_is_strict_error_lenient_floating() {
        let text = "DTSTART;TZID=Not/AZone:19970902T090000\nRRULE:FREQ=DAILY";
        assert!(matches!(
            rule_from_text(text, Mode::Strict),
            Err(Error::InvalidMoment { .. })
        ));
        let rule = rule_from_text(text, Mode::Lenient).unwrap();
        assert_eq!(
            rule.dtstart(),
            Some(&Moment::Floating(datetime(1997, 9, 2, 9, 0, 0, 0)))
        );
    }

    #[test]
    fn structural_faults_stay_fatal_in_lenient_mode() {
        let text = "RRULE:FREQ=DAILY;COUNT=10;UNTIL=19971224T000000Z";
        assert!(matches!(
            rule_from_text(text, Mode::Lenient),
            Err(Error::InvalidRule { .. })
        ));
    }

    #[test]
    fn serialises_without_dtstart() {
        let rule = rule_from_text("RRULE:FREQ=WEEKLY", Mode::Strict).unwrap();
        assert_eq!(rule.to_text().unwrap(), "RRULE:FREQ=WEEKLY");
    }

    #[test]
    fn serialises_until_in_the_anchor_form() {
        // Date anchor: date form.
        let rule = Rule::new(RuleOptions {
            freq: Some(Frequency::Daily),
            dtstart: Some(Moment::Date(date(1997, 9, 2))),
            until: Some(Moment::Date(date(1997, 12, 24))),
            ..RuleOptions::default()
        })
        .unwrap();
        assert_eq!(
            rule.to_text().unwrap(),
            "DTSTART;VALUE=DATE:19970902\nRRULE:FREQ=DAILY;UNTIL=19971224"
        );

        // Zoned anchor: until converts into UTC with `Z`.
        let ny = TimeZone::get("America/New_York").unwrap();
        let start = datetime(1997, 9, 2, 9, 0, 0, 0).to_zoned(ny.clone()).unwrap();
        let until = datetime(1997, 12, 24, 9, 0, 0, 0).to_zoned(ny).unwrap();
        let rule = Rule::new(RuleOptions {
            freq: Some(Frequency::Daily),
            dtstart: Some(Moment::Zoned(start)),
            until: Some(Moment::Zoned(until)),
            ..RuleOptions::default()
        })
        .unwrap();
        // 09:00 EST is 14:00 UTC in December.
        assert_eq!(
            rule.to_text().unwrap(),
            "DTSTART;TZID=America/New_York:19970902T090000\n\
             RRULE:FREQ=DAILY;UNTIL=19971224T140000Z"
        );
    }
}
