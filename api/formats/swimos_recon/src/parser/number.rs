// Copyright 2015-2023 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::parser::cursor::{Cursor, Location};
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::machine::{Parse, StateParser};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::str::FromStr;
use swimos_form::structural::read::event::NumericValue;

/// Beyond this many significant digits a decimal cannot be held exactly by an `f64`.
const MAX_F64_DIGITS: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    AfterSign,
    LeadingZero,
    Integer,
    FractionStart,
    Fraction,
    ExponentStart,
    ExponentSign,
    Exponent,
    HexStart,
    Hex,
    Word,
}

enum Step {
    Consume,
    Finish,
    Fail(&'static str),
}

/// Parses a numeric literal: a decimal integer, a decimal with an optional fraction and
/// exponent, a hexadecimal integer (`0x1F`) or one of `nan`, `inf` and `infinity`, each with an
/// optional leading `-`.
///
/// Integers are produced at the narrowest width that can hold them. Integers that overflow a
/// 64-bit accumulator are re-read, from the retained digits, as a [`BigInt`].
#[derive(Debug, Clone)]
pub struct NumberParser {
    stage: Stage,
    negative: bool,
    text: String,
    acc: Option<u64>,
    hex_start: usize,
}

impl Default for NumberParser {
    fn default() -> Self {
        NumberParser {
            stage: Stage::Start,
            negative: false,
            text: String::new(),
            acc: Some(0),
            hex_start: 0,
        }
    }
}

impl NumberParser {
    fn accept(&mut self, c: Option<char>) -> Step {
        let c = match c {
            Some(c) => c,
            None => {
                return match self.stage {
                    Stage::Start | Stage::AfterSign => Step::Fail("a number"),
                    _ => Step::Finish,
                }
            }
        };
        let next = match (self.stage, c) {
            (Stage::Start, '-') => {
                self.negative = true;
                self.stage = Stage::AfterSign;
                return Step::Consume;
            }
            (Stage::Start | Stage::AfterSign, '0') => Stage::LeadingZero,
            (Stage::Start | Stage::AfterSign, '1'..='9') => Stage::Integer,
            (Stage::Start | Stage::AfterSign, '.') => {
                self.text.push('0');
                Stage::FractionStart
            }
            (Stage::Start | Stage::AfterSign, c) if c.is_alphabetic() => Stage::Word,
            (Stage::Start | Stage::AfterSign, _) => return Step::Fail("a number"),
            (Stage::LeadingZero, 'x' | 'X') => {
                self.hex_start = self.text.len() + 1;
                Stage::HexStart
            }
            (Stage::LeadingZero | Stage::Integer, '0'..='9') => Stage::Integer,
            (Stage::LeadingZero | Stage::Integer, '.') => Stage::FractionStart,
            (Stage::LeadingZero | Stage::Integer | Stage::Fraction, 'e' | 'E') => {
                Stage::ExponentStart
            }
            (Stage::FractionStart | Stage::Fraction, '0'..='9') => Stage::Fraction,
            (Stage::ExponentStart, '+' | '-') => Stage::ExponentSign,
            (Stage::ExponentStart | Stage::ExponentSign | Stage::Exponent, '0'..='9') => {
                Stage::Exponent
            }
            (Stage::HexStart | Stage::Hex, c) if c.is_ascii_hexdigit() => Stage::Hex,
            (Stage::Word, c) if c.is_alphabetic() => Stage::Word,
            (Stage::LeadingZero | Stage::Integer | Stage::Fraction | Stage::Exponent, _)
            | (Stage::Hex | Stage::Word, _) => return Step::Finish,
            (Stage::FractionStart, _) => return Step::Fail("a digit after the decimal point"),
            (Stage::ExponentStart | Stage::ExponentSign, _) => {
                return Step::Fail("the digits of an exponent")
            }
            (Stage::HexStart, _) => return Step::Fail("a hexadecimal digit"),
        };
        self.text.push(c);
        if next == Stage::Integer {
            let digit = c.to_digit(10).map(u64::from);
            self.acc = self
                .acc
                .zip(digit)
                .and_then(|(acc, d)| acc.checked_mul(10)?.checked_add(d));
        }
        self.stage = next;
        Step::Consume
    }

    fn finish(self, location: Location) -> Result<NumericValue, ParseError> {
        let invalid =
            |text: &str| ParseError::new(ParseErrorKind::InvalidNumber(text.to_string()), location);
        match self.stage {
            Stage::LeadingZero | Stage::Integer => Ok(self.integer(&invalid)?),
            Stage::Fraction | Stage::Exponent => decimal(self.negative, &self.text)
                .ok_or_else(|| invalid(&self.text)),
            Stage::Hex => hexadecimal(self.negative, &self.text[self.hex_start..])
                .ok_or_else(|| invalid(&self.text)),
            Stage::Word => {
                let sign = if self.negative { -1.0 } else { 1.0 };
                match self.text.as_str() {
                    "nan" => Ok(NumericValue::Double(f64::NAN)),
                    "inf" | "infinity" => Ok(NumericValue::Double(sign * f64::INFINITY)),
                    ow => Err(invalid(ow)),
                }
            }
            _ => Err(invalid(&self.text)),
        }
    }

    fn integer<F>(&self, invalid: &F) -> Result<NumericValue, ParseError>
    where
        F: Fn(&str) -> ParseError,
    {
        let NumberParser {
            negative, text, acc, ..
        } = self;
        match acc {
            Some(n) => {
                let n = i128::from(*n);
                Ok(narrowest_integer(if *negative { -n } else { n }))
            }
            None => {
                let magnitude = BigInt::from_str(text).map_err(|_| invalid(text))?;
                Ok(NumericValue::BigInt(if *negative {
                    -magnitude
                } else {
                    magnitude
                }))
            }
        }
    }
}

fn narrowest_integer(n: i128) -> NumericValue {
    if let Ok(n) = i32::try_from(n) {
        NumericValue::Int(n)
    } else if let Ok(n) = i64::try_from(n) {
        NumericValue::Long(n)
    } else {
        NumericValue::BigInt(BigInt::from(n))
    }
}

fn significant_digits(text: &str) -> usize {
    let mantissa = text.split(['e', 'E']).next().unwrap_or_default();
    let digits = mantissa
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

fn decimal(negative: bool, text: &str) -> Option<NumericValue> {
    let signed = if negative {
        format!("-{}", text)
    } else {
        text.to_string()
    };
    let as_big = || BigDecimal::from_str(&signed).ok().map(NumericValue::BigDecimal);
    if significant_digits(text) > MAX_F64_DIGITS {
        return as_big();
    }
    let x = f64::from_str(&signed).ok()?;
    if x.is_infinite() {
        as_big()
    } else if f64::from(x as f32) == x {
        Some(NumericValue::Float(x as f32))
    } else {
        Some(NumericValue::Double(x))
    }
}

/// Hexadecimal literals are bit patterns: up to 8 digits is a 32-bit integer and up to 16 a
/// 64-bit integer.
fn hexadecimal(negative: bool, digits: &str) -> Option<NumericValue> {
    let value = if digits.len() <= 8 {
        let n = u32::from_str_radix(digits, 16).ok()? as i32;
        NumericValue::Int(if negative { n.wrapping_neg() } else { n })
    } else if digits.len() <= 16 {
        let n = u64::from_str_radix(digits, 16).ok()? as i64;
        NumericValue::Long(if negative { n.wrapping_neg() } else { n })
    } else {
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 16)?;
        NumericValue::BigInt(if negative { -magnitude } else { magnitude })
    };
    Some(value)
}

impl StateParser for NumberParser {
    type Output = NumericValue;

    fn feed(mut self, input: &mut Cursor<'_>) -> Parse<NumericValue, Self> {
        loop {
            let head = input.head();
            if head.is_none() && !input.is_final() {
                return Parse::Cont(self);
            }
            match self.accept(head) {
                Step::Consume => *input = input.step(),
                Step::Finish => {
                    return match self.finish(input.location()) {
                        Ok(value) => Parse::Done(value),
                        Err(err) => Parse::Error(err),
                    }
                }
                Step::Fail(expected) => {
                    return Parse::Error(ParseError::unexpected(input, expected))
                }
            }
        }
    }
}
