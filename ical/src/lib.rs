// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse and format the RFC 5545 `DTSTART` and `RRULE` wire forms.
//!
//! This crate is the codec half of ritmo: it turns the textual recurrence
//! surface into grammatically validated wire types and back, without
//! attaching calendar semantics. Sanitization and occurrence generation
//! live in `ritmo-core`.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::single_match_else, clippy::match_bool)]

mod error;
pub mod formatter;
pub mod keyword;
pub mod property;
pub mod scanner;
mod unfold;
pub mod value;

pub use crate::error::LineError;
pub use crate::property::{DateTimeForm, DtStart, RuleLines, parse_block, parse_dtstart};
pub use crate::scanner::{ContentLine, Param, ScanError, scan_line};
pub use crate::unfold::unfold;
pub use crate::value::{
    DateOrDateTime, RecurFrequency, RecurRule, RecurWeekday, RecurWeekdayNum, ValueDate,
    ValueDateTime, ValueExpected, ValueTime, parse_recur,
};

/// Parsing discipline for the textual surface.
///
/// Strict mode fails on the first malformed token, out-of-range value,
/// duplicate or unknown key. Lenient mode silently drops the offending item
/// (an invalid `FREQ` falls back to the default downstream) and only
/// structural faults remain fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Reject any malformed or out-of-range input.
    #[default]
    Strict,
    /// Drop invalid values and ignore unknown keys.
    Lenient,
}

impl Mode {
    /// Whether this is [`Mode::Strict`].
    #[must_use]
    pub fn is_strict(self) -> bool {
        self == Mode::Strict
    }

    /// Whether this is [`Mode::Lenient`].
    #[must_use]
    pub fn is_lenient(self) -> bool {
        self == Mode::Lenient
    }
}
