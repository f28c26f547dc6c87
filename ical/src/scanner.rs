// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content line scanning as defined in RFC 5545 Section 3.1.
//!
//! A content line has the shape `NAME *(";" param "=" value) ":" value`.
//! Parameter values may be double-quoted to protect `;`, `:` and `,`.
//! Scanning splits the line into its raw parts without interpreting any
//! value; interpretation happens in the `value` and `property` layers.

use std::fmt;

/// A scanned content line, borrowing from the (unfolded) source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine<'src> {
    /// Property name, e.g. `DTSTART`.
    pub name: &'src str,

    /// Parameters between the name and the colon, in source order.
    pub params: Vec<Param<'src>>,

    /// Everything after the first unquoted colon.
    pub value: &'src str,
}

/// A single `name=value` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'src> {
    /// Parameter name, e.g. `TZID`.
    pub name: &'src str,

    /// Parameter value with surrounding quotes removed.
    pub value: &'src str,

    /// Whether the value was quoted in the source.
    pub quoted: bool,
}

impl<'src> ContentLine<'src> {
    /// Look up a parameter by case-insensitive name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Param<'src>> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Errors that can occur when scanning a content line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// No unquoted colon separates the name/parameters from the value.
    #[error("missing colon in content line")]
    MissingColon,

    /// The line starts with `;` or `:` and has no property name.
    #[error("empty property name")]
    EmptyName,

    /// A parameter is missing its `=` sign.
    #[error("missing equals in parameter `{name}`")]
    MissingEquals {
        /// The parameter text up to the separator.
        name: String,
    },

    /// A parameter name is empty (`;=value`).
    #[error("empty parameter name")]
    EmptyParamName,

    /// A quoted parameter value never closes.
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    /// A quoted parameter value is followed by junk before `;` or `:`.
    #[error("unexpected text after quoted value")]
    TrailingAfterQuote,
}

/// Cursor over the raw bytes of one line.
struct Scanner<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Scanner<'src> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn slice(&self, start: usize) -> &'src str {
        self.src.get(start..self.pos).unwrap_or_default()
    }

    /// Consume until one of `stop` (ASCII) is hit; returns the consumed text.
    fn take_until(&mut self, stop: &[u8]) -> &'src str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if stop.contains(&b) {
                break;
            }
            self.bump();
        }
        self.slice(start)
    }
}

impl fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner").field("pos", &self.pos).finish()
    }
}

/// Scan one unfolded content line into name, parameters and value.
///
/// # Errors
///
/// Returns a [`ScanError`] describing the first structural fault.
pub fn scan_line(line: &str) -> Result<ContentLine<'_>, ScanError> {
    let mut s = Scanner { src: line, pos: 0 };

    let name = s.take_until(&[b';', b':']);
    if name.is_empty() {
        return Err(ScanError::EmptyName);
    }

    let mut params = Vec::new();
    loop {
        match s.peek() {
            Some(b':') => {
                s.bump();
                break;
            }
            Some(b';') => {
                s.bump();
                params.push(scan_param(&mut s)?);
            }
            Some(_) => unreachable!("take_until stops only at `;`, `:` or EOL"),
            None => return Err(ScanError::MissingColon),
        }
    }

    let start = s.pos;
    s.pos = line.len();
    let value = s.slice(start);
    Ok(ContentLine { name, params, value })
}

fn scan_param<'src>(s: &mut Scanner<'src>) -> Result<Param<'src>, ScanError> {
    let name = s.take_until(&[b'=', b';', b':']);
    match s.peek() {
        Some(b'=') => s.bump(),
        _ => {
            return Err(ScanError::MissingEquals {
                name: name.to_owned(),
            });
        }
    }
    if name.is_empty() {
        return Err(ScanError::EmptyParamName);
    }

    if s.peek() == Some(b'"') {
        s.bump();
        let value = s.take_until(&[b'"']);
        if s.peek() != Some(b'"') {
            return Err(ScanError::UnterminatedQuote);
        }
        s.bump();
        if !matches!(s.peek(), Some(b';' | b':') | None) {
            return Err(ScanError::TrailingAfterQuote);
        }
        Ok(Param {
            name,
            value,
            quoted: true,
        })
    } else {
        let value = s.take_until(&[b';', b':']);
        Ok(Param {
            name,
            value,
            quoted: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_bare_property() {
        let line = scan_line("RRULE:FREQ=DAILY;COUNT=10").unwrap();
        assert_eq!(line.name, "RRULE");
        assert!(line.params.is_empty());
        assert_eq!(line.value, "FREQ=DAILY;COUNT=10");
    }

    #[test]
    fn scans_parameters() {
        let line = scan_line("DTSTART;TZID=America/New_York:19970902T090000").unwrap();
        assert_eq!(line.name, "DTSTART");
        assert_eq!(line.params.len(), 1);
        let p = line.params.first().unwrap();
        assert_eq!(p.name, "TZID");
        assert_eq!(p.value, "America/New_York");
        assert!(!p.quoted);
        assert_eq!(line.value, "19970902T090000");
    }

    #[test]
    fn scans_multiple_parameters() {
        let line = scan_line("DTSTART;VALUE=DATE;TZID=UTC:19970902").unwrap();
        assert_eq!(line.params.len(), 2);
        assert_eq!(line.param("value").unwrap().value, "DATE");
        assert_eq!(line.param("TZID").unwrap().value, "UTC");
    }

    #[test]
    fn scans_quoted_parameter_value() {
        let line = scan_line("DTSTART;TZID=\"US/Eastern\":19970902T090000").unwrap();
        let p = line.param("TZID").unwrap();
        assert_eq!(p.value, "US/Eastern");
        assert!(p.quoted);
    }

    #[test]
    fn allows_empty_value() {
        let line = scan_line("RRULE:").unwrap();
        assert_eq!(line.value, "");
    }

    #[test]
    fn rejects_missing_colon() {
        assert_eq!(scan_line("RRULE"), Err(ScanError::MissingColon));
        assert!(matches!(
            scan_line("DTSTART;TZID=UTC"),
            Err(ScanError::MissingColon)
        ));
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(scan_line(":value"), Err(ScanError::EmptyName));
        assert_eq!(scan_line(""), Err(ScanError::EmptyName));
    }

    #[test]
    fn rejects_parameter_without_equals() {
        assert!(matches!(
            scan_line("DTSTART;TZID:19970902"),
            Err(ScanError::MissingEquals { .. })
        ));
    }

    #[test]
    fn rejects_empty_parameter_name() {
        assert_eq!(
            scan_line("DTSTART;=UTC:19970902"),
            Err(ScanError::EmptyParamName)
        );
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert_eq!(
            scan_line("DTSTART;TZID=\"US/Eastern:19970902"),
            Err(ScanError::UnterminatedQuote)
        );
    }
}
