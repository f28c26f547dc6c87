// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Small shared parsers for the value grammars.

use std::borrow::Cow;

use chumsky::Parser;
use chumsky::error::RichPattern;
use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::input::ValueInput;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

/// Failure reasons when a specific value type was expected but not found.
///
/// Surfaces in the `LabelError` bounds of the value parsers.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueExpected {
    /// A calendar date was expected
    Date,
    /// A time of day was expected
    Time,
    /// A 32-bit unsigned integer was expected
    U32,
    /// A positive (non-zero) 32-bit unsigned integer was expected
    PositiveU32,
}

impl From<ValueExpected> for RichPattern<'_, char> {
    fn from(expected: ValueExpected) -> Self {
        match expected {
            ValueExpected::Date => Self::Label(Cow::Borrowed("invalid date")),
            ValueExpected::Time => Self::Label(Cow::Borrowed("invalid time")),
            ValueExpected::U32 => Self::Label(Cow::Borrowed("u32 out of range")),
            ValueExpected::PositiveU32 => Self::Label(Cow::Borrowed("expected positive integer")),
        }
    }
}

macro_rules! digit_range {
    ($($name:ident: $ty:ty = $lo:literal ..= $hi:literal;)+) => {$(
        pub(crate) fn $name<'src, I, E>() -> impl Parser<'src, I, $ty, E> + Copy
        where
            I: Input<'src, Token = char, Span = SimpleSpan> + ValueInput<'src>,
            E: ParserExtra<'src, I>,
        {
            #[allow(trivial_numeric_casts)]
            let digit = select! { c @ $lo..=$hi => (c as u8 - b'0') as $ty };
            digit
        }
    )+};
}

digit_range! {
    i8_0_1: i8 = '0'..='1';
    i8_0_2: i8 = '0'..='2';
    i8_0_3: i8 = '0'..='3';
    i8_0_5: i8 = '0'..='5';
    i8_0_9: i8 = '0'..='9';
    i8_1_2: i8 = '1'..='2';
    i8_1_4: i8 = '1'..='4';
    i8_1_9: i8 = '1'..='9';
    i16_0_9: i16 = '0'..='9';
}

/// Optional leading sign; yields `true` unless a `-` was present.
pub(crate) fn is_positive<'src, I, E>() -> impl Parser<'src, I, bool, E> + Copy
where
    I: Input<'src, Token = char, Span = SimpleSpan> + ValueInput<'src>,
    E: ParserExtra<'src, I>,
{
    select! { c @ ('+' | '-') => c }
        .or_not()
        .map(|c| !matches!(c, Some('-')))
}

/// Parse a positive (non-zero) u32 of 1 or more digits.
pub(crate) fn u32_non_zero<'src, I, E>() -> impl Parser<'src, I, u32, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan> + ValueInput<'src>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, ValueExpected>,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .at_most(10) // u32 max is 10 digits
        .collect::<String>()
        .try_map_with(|str, e| {
            lexical::parse_partial::<u32, _>(&str)
                .map_err(|_| E::Error::expected_found([ValueExpected::U32], None, e.span()))
                .and_then(|(v, _)| match v {
                    0 => Err(E::Error::expected_found(
                        [ValueExpected::PositiveU32],
                        None,
                        e.span(),
                    )),
                    v => Ok(v),
                })
        })
}
