// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Strict and lenient parsing discipline, fault class by fault class.

use jiff::civil::datetime;
use ritmo_core::{Error, Frequency, Mode, Moment, Rule};

fn strict(text: &str) -> Result<Rule, Error> {
    Rule::parse(text, Mode::Strict)
}

fn lenient(text: &str) -> Rule {
    Rule::parse(text, Mode::Lenient).unwrap()
}

#[test]
fn malformed_tokens_name_the_key() {
    match strict("RRULE:FREQ=DAILY;BYHOUR=nine") {
        Err(Error::MalformedText { key, .. }) => assert_eq!(key, "BYHOUR"),
        other => panic!("expected MalformedText, got {other:?}"),
    }
    match strict("RRULE:FREQ=SOMETIMES") {
        Err(Error::MalformedText { key, .. }) => assert_eq!(key, "FREQ"),
        other => panic!("expected MalformedText, got {other:?}"),
    }
}

#[test]
fn out_of_range_values_are_unsupported() {
    match strict("RRULE:FREQ=DAILY;BYHOUR=24") {
        Err(Error::Unsupported { key, value }) => {
            assert_eq!(key, "BYHOUR");
            assert_eq!(value, "24");
        }
        other => panic!("expected Unsupported, got {other:?}"),
    }
    assert!(matches!(
        strict("RRULE:FREQ=MONTHLY;BYMONTHDAY=0"),
        Err(Error::Unsupported { .. })
    ));
}

#[test]
fn unknown_and_duplicate_keys_fail_strict_parsing() {
    assert!(matches!(
        strict("RRULE:FREQ=DAILY;NOPE=1"),
        Err(Error::MalformedText { .. })
    ));
    assert!(matches!(
        strict("RRULE:FREQ=DAILY;COUNT=1;COUNT=2"),
        Err(Error::MalformedText { .. })
    ));
}

#[test]
fn lenient_mode_recovers() {
    let rule = lenient("RRULE:FREQ=DAILY;BYHOUR=9,24,nine;NOPE=1;COUNT=0x");
    assert_eq!(rule.freq(), Frequency::Daily);
    assert_eq!(rule.by_hour(), &[9]);
    assert_eq!(rule.count(), None);

    // Invalid FREQ falls back to the yearly default.
    let rule = lenient("RRULE:FREQ=SOMETIMES;INTERVAL=2");
    assert_eq!(rule.freq(), Frequency::Yearly);
    assert_eq!(rule.interval(), 2);
}

#[test]
fn structural_faults_are_fatal_in_both_modes() {
    let collision = "DTSTART:19970902T090000\nRRULE:FREQ=DAILY;COUNT=3;UNTIL=19971224T000000";
    assert!(matches!(
        strict(collision),
        Err(Error::InvalidRule { .. })
    ));
    assert!(matches!(
        Rule::parse(collision, Mode::Lenient),
        Err(Error::InvalidRule { .. })
    ));

    let backwards = "DTSTART:19970902T090000\nRRULE:FREQ=DAILY;UNTIL=19900101T000000";
    assert!(matches!(
        Rule::parse(backwards, Mode::Lenient),
        Err(Error::InvalidRule { .. })
    ));

    let orphan_setpos = "DTSTART:19970902T090000\nRRULE:FREQ=MONTHLY;BYSETPOS=1";
    assert!(matches!(
        Rule::parse(orphan_setpos, Mode::Lenient),
        Err(Error::InvalidRule { .. })
    ));
}

#[test]
fn dtstart_parameter_conflicts() {
    let zoned_date = "DTSTART;TZID=America/New_York:19970902\nRRULE:FREQ=DAILY;COUNT=1";
    assert!(strict(zoned_date).is_err());
    let rule = lenient(zoned_date);
    assert!(rule.dtstart().unwrap().is_date_only());

    let zoned_utc = "DTSTART;TZID=America/New_York:19970902T090000Z\nRRULE:FREQ=DAILY;COUNT=1";
    assert!(strict(zoned_utc).is_err());
    let rule = lenient(zoned_utc);
    assert!(rule.dtstart().unwrap().is_utc());
}

#[test]
fn folded_lines_parse_in_both_modes() {
    let folded = "DTSTART:19970902T090000\r\nRRULE:FREQ=WEEKLY;\r\n BYDAY=TU,TH;COUNT=2";
    let rule = strict(folded).unwrap();
    assert_eq!(
        rule.all(None).unwrap(),
        vec![
            Moment::Floating(datetime(1997, 9, 2, 9, 0, 0, 0)),
            Moment::Floating(datetime(1997, 9, 4, 9, 0, 0, 0)),
        ]
    );
}

#[test]
fn missing_rrule_line_is_always_fatal() {
    for mode in [Mode::Strict, Mode::Lenient] {
        assert!(matches!(
            Rule::parse("DTSTART:19970902T090000", mode),
            Err(Error::MalformedText { .. })
        ));
    }
}
