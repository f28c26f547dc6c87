// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end expansion scenarios from RFC 5545 Section 3.8.5.3.

use jiff::civil::{DateTime, date, datetime};
use ritmo_core::{Error, Mode, Moment, Rule};

fn parse(text: &str) -> Rule {
    Rule::parse(text, Mode::Strict).unwrap()
}

fn floats(rule: &Rule, limit: Option<usize>) -> Vec<DateTime> {
    rule.all(limit)
        .unwrap()
        .into_iter()
        .map(|m| match m {
            Moment::Floating(dt) => dt,
            other => panic!("expected a floating moment, got {other:?}"),
        })
        .collect()
}

#[test]
fn daily_count() {
    let rule = parse("DTSTART:19970902T090000\nRRULE:FREQ=DAILY;COUNT=10");
    let out = floats(&rule, None);
    assert_eq!(out.len(), 10);
    assert_eq!(out.first(), Some(&datetime(1997, 9, 2, 9, 0, 0, 0)));
    assert_eq!(out.last(), Some(&datetime(1997, 9, 11, 9, 0, 0, 0)));
    // Consecutive days throughout.
    for pair in out.windows(2) {
        assert_eq!(
            pair[1].date(),
            pair[0].date().tomorrow().unwrap(),
            "days must be consecutive"
        );
    }
}

#[test]
fn biweekly_tuesdays_and_thursdays_with_sunday_week_start() {
    let rule = parse("DTSTART:19970902T090000\nRRULE:FREQ=WEEKLY;INTERVAL=2;WKST=SU;COUNT=4;BYDAY=TU,TH");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1997, 9, 2, 9, 0, 0, 0),
            datetime(1997, 9, 4, 9, 0, 0, 0),
            datetime(1997, 9, 16, 9, 0, 0, 0),
            datetime(1997, 9, 18, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn monthly_second_to_last_monday() {
    let rule = parse("DTSTART:19970922T090000\nRRULE:FREQ=MONTHLY;COUNT=6;BYDAY=-2MO");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1997, 9, 22, 9, 0, 0, 0),
            datetime(1997, 10, 20, 9, 0, 0, 0),
            datetime(1997, 11, 17, 9, 0, 0, 0),
            datetime(1997, 12, 22, 9, 0, 0, 0),
            datetime(1998, 1, 19, 9, 0, 0, 0),
            datetime(1998, 2, 16, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn friday_the_thirteenth() {
    let rule = parse("DTSTART:19970902T090000\nRRULE:FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13");
    assert_eq!(
        floats(&rule, Some(5)),
        vec![
            datetime(1998, 2, 13, 9, 0, 0, 0),
            datetime(1998, 3, 13, 9, 0, 0, 0),
            datetime(1998, 11, 13, 9, 0, 0, 0),
            datetime(1999, 8, 13, 9, 0, 0, 0),
            datetime(2000, 10, 13, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn third_weekday_of_the_month_via_bysetpos() {
    let rule = parse("DTSTART:19970904T090000\nRRULE:FREQ=MONTHLY;COUNT=3;BYDAY=TU,WE,TH;BYSETPOS=3");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1997, 9, 4, 9, 0, 0, 0),
            datetime(1997, 10, 7, 9, 0, 0, 0),
            datetime(1997, 11, 6, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn triennial_year_days() {
    let rule = parse("DTSTART:19970101T090000\nRRULE:FREQ=YEARLY;INTERVAL=3;COUNT=10;BYYEARDAY=1,100,200");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1997, 1, 1, 9, 0, 0, 0),
            datetime(1997, 4, 10, 9, 0, 0, 0),
            datetime(1997, 7, 19, 9, 0, 0, 0),
            datetime(2000, 1, 1, 9, 0, 0, 0),
            datetime(2000, 4, 9, 9, 0, 0, 0),
            datetime(2000, 7, 18, 9, 0, 0, 0),
            datetime(2003, 1, 1, 9, 0, 0, 0),
            datetime(2003, 4, 10, 9, 0, 0, 0),
            datetime(2003, 7, 19, 9, 0, 0, 0),
            datetime(2006, 1, 1, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn month_day_31_skips_short_months() {
    let rule = parse("DTSTART:19970131T090000\nRRULE:FREQ=MONTHLY;COUNT=6;BYMONTHDAY=31");
    let months: Vec<i8> = floats(&rule, None).iter().map(|dt| dt.month()).collect();
    // No February, April, June; every emission lands on the 31st.
    assert_eq!(months, vec![1, 3, 5, 7, 8, 10]);
}

#[test]
fn year_day_366_only_in_leap_years() {
    let rule = parse("DTSTART:19970101T090000\nRRULE:FREQ=YEARLY;COUNT=3;BYYEARDAY=366");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(2000, 12, 31, 9, 0, 0, 0),
            datetime(2004, 12, 31, 9, 0, 0, 0),
            datetime(2008, 12, 31, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn week_53_only_in_long_years() {
    let rule = parse("DTSTART:19970101T090000\nRRULE:FREQ=YEARLY;COUNT=7;BYWEEKNO=53;BYDAY=MO");
    let years: Vec<i16> = floats(&rule, None).iter().map(|dt| dt.year()).collect();
    // Years whose week numbering (per the Monday week start) carries a
    // 53rd week: those starting on Monday, or leap years starting Sunday.
    assert!(years.iter().all(|y| {
        let jan1 = date(*y, 1, 1);
        jan1.weekday() == jiff::civil::Weekday::Monday
            || (jan1.in_leap_year() && jan1.weekday() == jiff::civil::Weekday::Sunday)
    }));
    assert_eq!(years.len(), 7);
}

#[test]
fn weekly_on_monday_wednesday_friday_in_canonical_order() {
    let rule = parse("DTSTART:19970901T090000\nRRULE:FREQ=WEEKLY;COUNT=6;BYDAY=MO,WE,FR");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1997, 9, 1, 9, 0, 0, 0),  // Monday
            datetime(1997, 9, 3, 9, 0, 0, 0),  // Wednesday
            datetime(1997, 9, 5, 9, 0, 0, 0),  // Friday
            datetime(1997, 9, 8, 9, 0, 0, 0),
            datetime(1997, 9, 10, 9, 0, 0, 0),
            datetime(1997, 9, 12, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn fifth_monday_emits_at_most_once_per_month() {
    let rule = parse("DTSTART:19970901T090000\nRRULE:FREQ=MONTHLY;COUNT=4;BYDAY=5MO");
    let out = floats(&rule, None);
    // Only months with five Mondays qualify; at most one emission each.
    assert_eq!(
        out,
        vec![
            datetime(1997, 9, 29, 9, 0, 0, 0),
            datetime(1997, 12, 29, 9, 0, 0, 0),
            datetime(1998, 3, 30, 9, 0, 0, 0),
            datetime(1998, 6, 29, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn emissions_are_strictly_increasing() {
    let rules = [
        "DTSTART:19970902T090000\nRRULE:FREQ=MONTHLY;COUNT=30;BYDAY=MO,TU,WE;BYSETPOS=1,-1",
        "DTSTART:19970902T090000\nRRULE:FREQ=YEARLY;COUNT=30;BYMONTH=1,7;BYDAY=SU",
        "DTSTART:19970902T090000\nRRULE:FREQ=DAILY;COUNT=30;BYHOUR=9,13;BYMINUTE=0,30",
    ];
    for text in rules {
        let out = parse(text).all(None).unwrap();
        for pair in out.windows(2) {
            assert!(pair[0] < pair[1], "monotonicity violated in {text}");
        }
    }
}

#[test]
fn count_is_exact() {
    for count in [1usize, 7, 29] {
        let rule = parse(&format!(
            "DTSTART:19970902T090000\nRRULE:FREQ=DAILY;COUNT={count}"
        ));
        assert_eq!(rule.all(None).unwrap().len(), count);
    }
}

#[test]
fn nothing_precedes_dtstart_or_follows_until() {
    let rule = parse("DTSTART:19970902T090000\nRRULE:FREQ=WEEKLY;UNTIL=19971007T090000;BYDAY=MO,TU");
    let start = Moment::Floating(datetime(1997, 9, 2, 9, 0, 0, 0));
    let until = Moment::Floating(datetime(1997, 10, 7, 9, 0, 0, 0));
    let out = rule.all(None).unwrap();
    assert!(!out.is_empty());
    assert!(out.iter().all(|m| *m >= start && *m <= until));
    // The Monday of the first week precedes the anchor and must be absent.
    assert_eq!(
        out.first(),
        Some(&Moment::Floating(datetime(1997, 9, 2, 9, 0, 0, 0)))
    );
    // UNTIL itself is inclusive.
    assert_eq!(out.last(), Some(&until));
}

#[test]
fn safety_bound_fires_on_unbounded_selector_free_walks() {
    let rule = parse("DTSTART:19970902T090000\nRRULE:FREQ=DAILY");
    let result: Result<Vec<_>, _> = rule.occurrences().unwrap().collect();
    assert!(matches!(result, Err(Error::MaxIterationsExceeded { .. })));
}

#[test]
fn hourly_with_minute_expansion() {
    let rule = parse("DTSTART:19970902T090000\nRRULE:FREQ=HOURLY;INTERVAL=3;COUNT=4;BYMINUTE=15,45");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1997, 9, 2, 9, 15, 0, 0),
            datetime(1997, 9, 2, 9, 45, 0, 0),
            datetime(1997, 9, 2, 12, 15, 0, 0),
            datetime(1997, 9, 2, 12, 45, 0, 0),
        ]
    );
}

#[test]
fn yearly_in_selected_months() {
    let rule = parse("DTSTART:19970610T090000\nRRULE:FREQ=YEARLY;COUNT=6;BYMONTH=6,7");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1997, 6, 10, 9, 0, 0, 0),
            datetime(1997, 7, 10, 9, 0, 0, 0),
            datetime(1998, 6, 10, 9, 0, 0, 0),
            datetime(1998, 7, 10, 9, 0, 0, 0),
            datetime(1999, 6, 10, 9, 0, 0, 0),
            datetime(1999, 7, 10, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn yearly_first_sunday_of_november() {
    let rule = parse("DTSTART:19961105T090000\nRRULE:FREQ=YEARLY;COUNT=3;BYMONTH=11;BYDAY=1SU");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1997, 11, 2, 9, 0, 0, 0),
            datetime(1998, 11, 1, 9, 0, 0, 0),
            datetime(1999, 11, 7, 9, 0, 0, 0),
        ]
    );
}

#[test]
fn leap_day_yearly_skips_common_years() {
    let rule = parse("DTSTART:19960229T090000\nRRULE:FREQ=YEARLY;COUNT=3");
    assert_eq!(
        floats(&rule, None),
        vec![
            datetime(1996, 2, 29, 9, 0, 0, 0),
            datetime(2000, 2, 29, 9, 0, 0, 0),
            datetime(2004, 2, 29, 9, 0, 0, 0),
        ]
    );
}
