// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parsers for property values as defined in RFC 5545 Section 3.3.

pub(crate) mod datetime;
mod primitive;
pub(crate) mod recur;

pub use datetime::{
    DateOrDateTime, ValueDate, ValueDateTime, ValueTime, value_date, value_date_time,
    value_end_date, value_time,
};
pub use primitive::ValueExpected;
pub use recur::{RecurFrequency, RecurRule, RecurWeekday, RecurWeekdayNum, parse_recur};
