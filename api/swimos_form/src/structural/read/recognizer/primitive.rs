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

use super::Recognizer;
use crate::structural::read::error::ExpectedEvent;
use crate::structural::read::event::{NumericValue, ReadEvent};
use crate::structural::read::ReadError;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use swimos_model::ValueKind;

#[derive(Debug, Default, Clone, Copy)]
pub struct UnitRecognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct BoolRecognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct I32Recognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct I64Recognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct U32Recognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct U64Recognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct UsizeRecognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct F32Recognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct F64Recognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct BigIntRecognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct BigDecimalRecognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct StringRecognizer;
#[derive(Debug, Default, Clone, Copy)]
pub struct DataRecognizer;

fn out_of_range<T>(value: Option<T>) -> Result<T, ReadError> {
    value.ok_or(ReadError::NumberOutOfRange)
}

/// Converts any integral literal with the conversions from [`ToPrimitive`].
macro_rules! integral_recognizer {
    ($recog:ident, $target:ty, $conv:ident, $kind:expr) => {
        impl Recognizer for $recog {
            type Target = $target;

            fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
                match input {
                    ReadEvent::Number(NumericValue::Int(n)) => Some(out_of_range(n.$conv())),
                    ReadEvent::Number(NumericValue::Long(n)) => Some(out_of_range(n.$conv())),
                    ReadEvent::Number(NumericValue::BigInt(n)) => Some(out_of_range(n.$conv())),
                    ow => Some(Err(ow.kind_error(ExpectedEvent::ValueEvent($kind)))),
                }
            }

            fn reset(&mut self) {}
        }
    };
}

integral_recognizer!(I32Recognizer, i32, to_i32, ValueKind::Int32);
integral_recognizer!(I64Recognizer, i64, to_i64, ValueKind::Int64);
integral_recognizer!(U32Recognizer, u32, to_u32, ValueKind::Int32);
integral_recognizer!(U64Recognizer, u64, to_u64, ValueKind::Int64);
integral_recognizer!(UsizeRecognizer, usize, to_usize, ValueKind::Int64);

impl Recognizer for UnitRecognizer {
    type Target = ();

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match input {
            ReadEvent::Extant => Some(Ok(())),
            ow => Some(Err(
                ow.kind_error(ExpectedEvent::ValueEvent(ValueKind::Extant))
            )),
        }
    }

    fn reset(&mut self) {}
}

impl Recognizer for BoolRecognizer {
    type Target = bool;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match input {
            ReadEvent::Boolean(p) => Some(Ok(p)),
            ow => Some(Err(
                ow.kind_error(ExpectedEvent::ValueEvent(ValueKind::Boolean))
            )),
        }
    }

    fn reset(&mut self) {}
}

impl Recognizer for F64Recognizer {
    type Target = f64;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match input {
            ReadEvent::Number(NumericValue::Float(x)) => Some(Ok(x as f64)),
            ReadEvent::Number(NumericValue::Double(x)) => Some(Ok(x)),
            ReadEvent::Number(NumericValue::Int(n)) => Some(Ok(n as f64)),
            ReadEvent::Number(NumericValue::Long(n)) => Some(Ok(n as f64)),
            ReadEvent::Number(NumericValue::BigInt(n)) => Some(out_of_range(n.to_f64())),
            ReadEvent::Number(NumericValue::BigDecimal(n)) => Some(out_of_range(n.to_f64())),
            ow => Some(Err(
                ow.kind_error(ExpectedEvent::ValueEvent(ValueKind::Float64))
            )),
        }
    }

    fn reset(&mut self) {}
}

impl Recognizer for F32Recognizer {
    type Target = f32;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match input {
            ReadEvent::Number(NumericValue::Float(x)) => Some(Ok(x)),
            ReadEvent::Number(NumericValue::Double(x)) => Some(Ok(x as f32)),
            ReadEvent::Number(NumericValue::Int(n)) => Some(Ok(n as f32)),
            ReadEvent::Number(NumericValue::Long(n)) => Some(Ok(n as f32)),
            ReadEvent::Number(NumericValue::BigInt(n)) => Some(out_of_range(n.to_f32())),
            ReadEvent::Number(NumericValue::BigDecimal(n)) => Some(out_of_range(n.to_f32())),
            ow => Some(Err(
                ow.kind_error(ExpectedEvent::ValueEvent(ValueKind::Float32))
            )),
        }
    }

    fn reset(&mut self) {}
}

impl Recognizer for BigIntRecognizer {
    type Target = BigInt;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match input {
            ReadEvent::Number(NumericValue::Int(n)) => Some(Ok(BigInt::from(n))),
            ReadEvent::Number(NumericValue::Long(n)) => Some(Ok(BigInt::from(n))),
            ReadEvent::Number(NumericValue::BigInt(n)) => Some(Ok(n)),
            ow => Some(Err(
                ow.kind_error(ExpectedEvent::ValueEvent(ValueKind::BigInt))
            )),
        }
    }

    fn reset(&mut self) {}
}

impl Recognizer for BigDecimalRecognizer {
    type Target = BigDecimal;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match input {
            ReadEvent::Number(NumericValue::BigDecimal(n)) => Some(Ok(n)),
            ReadEvent::Number(NumericValue::BigInt(n)) => Some(Ok(BigDecimal::new(n, 0))),
            ReadEvent::Number(NumericValue::Int(n)) => Some(Ok(BigDecimal::from(n))),
            ReadEvent::Number(NumericValue::Long(n)) => Some(Ok(BigDecimal::from(n))),
            ReadEvent::Number(NumericValue::Float(x)) => {
                Some(out_of_range(BigDecimal::from_f32(x)))
            }
            ReadEvent::Number(NumericValue::Double(x)) => {
                Some(out_of_range(BigDecimal::from_f64(x)))
            }
            ow => Some(Err(
                ow.kind_error(ExpectedEvent::ValueEvent(ValueKind::BigDecimal))
            )),
        }
    }

    fn reset(&mut self) {}
}

impl Recognizer for StringRecognizer {
    type Target = String;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match input {
            ReadEvent::TextValue(string) => Some(Ok(string)),
            ow => Some(Err(
                ow.kind_error(ExpectedEvent::ValueEvent(ValueKind::Text))
            )),
        }
    }

    fn reset(&mut self) {}
}

impl Recognizer for DataRecognizer {
    type Target = Vec<u8>;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match input {
            ReadEvent::Blob(v) => Some(Ok(v)),
            ow => Some(Err(
                ow.kind_error(ExpectedEvent::ValueEvent(ValueKind::Data))
            )),
        }
    }

    fn reset(&mut self) {}
}
