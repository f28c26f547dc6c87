// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced by the recurrence engine.

use ritmo_ical::LineError;

/// Every failure the library reports.
///
/// Faults are raised synchronously at the boundary where they are first
/// observable: parse time, rule construction, or a generator step. There are
/// no retries and no partial results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Lexical failure while parsing text (strict mode only).
    #[error("malformed {key}: {reason}")]
    MalformedText {
        /// The property or rule-part key the fault was found under.
        key: String,
        /// Human-readable description of the fault.
        reason: String,
    },

    /// Structural violation detected at sanitization, such as `COUNT` and
    /// `UNTIL` both set, `UNTIL` before `DTSTART`, or `BYSETPOS` without a
    /// partner selector.
    #[error("invalid rule: {reason}")]
    InvalidRule {
        /// What constraint was violated.
        reason: String,
    },

    /// A malformed date or time literal, or an impossible field value.
    #[error("invalid moment: {reason}")]
    InvalidMoment {
        /// What made the moment invalid.
        reason: String,
    },

    /// The occurrence generator needs a `DTSTART` anchor.
    #[error("the rule has no DTSTART anchor")]
    MissingDtstart,

    /// The generator's iteration safety bound was hit before the sequence
    /// terminated.
    #[error("exceeded the iteration limit of {limit}")]
    MaxIterationsExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A lexically valid value outside its declared range (strict mode only).
    #[error("{key} value `{value}` is unsupported")]
    Unsupported {
        /// The rule-part key.
        key: String,
        /// The offending value.
        value: String,
    },
}

impl Error {
    pub(crate) fn invalid_rule(reason: impl Into<String>) -> Self {
        Error::InvalidRule {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_moment(reason: impl std::fmt::Display) -> Self {
        Error::InvalidMoment {
            reason: reason.to_string(),
        }
    }
}

impl From<LineError> for Error {
    fn from(err: LineError) -> Self {
        match err {
            LineError::Malformed { key, reason } => Error::MalformedText { key, reason },
            LineError::OutOfRange { key, value } => Error::Unsupported { key, value },
            LineError::Duplicate { key } => Error::MalformedText {
                key,
                reason: "repeated rule part".to_owned(),
            },
            LineError::MissingRule => Error::MalformedText {
                key: "RRULE".to_owned(),
                reason: "missing RRULE line".to_owned(),
            },
            LineError::Scan(err) => Error::MalformedText {
                key: "line".to_owned(),
                reason: err.to_string(),
            },
        }
    }
}
