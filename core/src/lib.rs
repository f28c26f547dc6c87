// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! RFC 5545 recurrence rules: a sanitized rule model, a lazy occurrence
//! generator, and queries over the generated sequence.
//!
//! ```
//! use ritmo_core::{Mode, Rule};
//!
//! let rule = Rule::parse(
//!     "DTSTART:19970902T090000\nRRULE:FREQ=WEEKLY;COUNT=3;BYDAY=TU,TH",
//!     Mode::Strict,
//! )?;
//! let moments = rule.all(None)?;
//! assert_eq!(moments.len(), 3);
//! assert_eq!(moments.first().unwrap().to_string(), "19970902T090000");
//! # Ok::<(), ritmo_core::Error>(())
//! ```

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

pub mod calendar;
mod error;
mod generator;
mod moment;
mod rule;
mod text;
mod weekday;

pub use ritmo_ical::Mode;

pub use crate::error::Error;
pub use crate::generator::{IterationPolicy, Occurrences};
pub use crate::moment::Moment;
pub use crate::rule::{Frequency, Rule, RuleOptions};
pub use crate::weekday::{Weekday, WeekdayNum};
