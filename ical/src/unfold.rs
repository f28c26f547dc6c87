// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Line unfolding as defined in RFC 5545 Section 3.1.

use std::borrow::Cow;

/// Remove folded line breaks from iCalendar source.
///
/// A `CRLF` (or a bare `LF`) immediately followed by a single space or
/// horizontal tab marks a continuation; the break and the one whitespace
/// character are removed. Input without any fold is returned borrowed.
#[must_use]
pub fn unfold(src: &str) -> Cow<'_, str> {
    let bytes = src.as_bytes();
    if !(0..bytes.len()).any(|i| fold_len(bytes, i).is_some()) {
        return Cow::Borrowed(src);
    }

    let mut out = String::with_capacity(src.len());
    let mut chunk_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match fold_len(bytes, i) {
            Some(len) => {
                // Fold sequences are pure ASCII, so both cut points sit on
                // character boundaries.
                if let Some(chunk) = src.get(chunk_start..i) {
                    out.push_str(chunk);
                }
                i += len;
                chunk_start = i;
            }
            None => i += 1,
        }
    }
    if let Some(tail) = src.get(chunk_start..) {
        out.push_str(tail);
    }
    Cow::Owned(out)
}

/// Length of the fold sequence starting at `i`, if any.
fn fold_len(bytes: &[u8], i: usize) -> Option<usize> {
    match bytes.get(i)? {
        b'\r' if matches!(bytes.get(i + 1), Some(b'\n')) => {
            matches!(bytes.get(i + 2), Some(b' ' | b'\t')).then_some(3)
        }
        b'\n' => matches!(bytes.get(i + 1), Some(b' ' | b'\t')).then_some(2),
        _ => None,
    }
}
