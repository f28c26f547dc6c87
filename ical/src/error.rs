// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Typed errors surfaced by the line-level parsers.

use crate::scanner::ScanError;

/// Failure to interpret a scanned `DTSTART` or `RRULE` line.
///
/// Every variant names the offending key so that callers can report the
/// fault precisely. In lenient mode most of these are never produced; see
/// [`Mode`](crate::Mode).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// Lexically malformed text under the given key.
    #[error("malformed {key}: {reason}")]
    Malformed {
        /// The property or rule-part key, upper-cased.
        key: String,
        /// Human-readable description of the fault.
        reason: String,
    },

    /// A lexically valid value outside the key's declared range.
    #[error("{key} value `{value}` is out of range")]
    OutOfRange {
        /// The rule-part key, upper-cased.
        key: String,
        /// The offending source text.
        value: String,
    },

    /// A rule part occurred more than once.
    #[error("duplicate rule part {key}")]
    Duplicate {
        /// The repeated key, upper-cased.
        key: String,
    },

    /// The text block contained no `RRULE` line.
    #[error("missing RRULE line")]
    MissingRule,

    /// Content-line structure was broken before any key could be read.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl LineError {
    pub(crate) fn malformed(key: &str, reason: impl Into<String>) -> Self {
        LineError::Malformed {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(key: &str, value: &str) -> Self {
        LineError::OutOfRange {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}
