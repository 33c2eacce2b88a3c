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

use crate::structural::read::error::ExpectedEvent;
use crate::structural::read::ReadError;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use swimos_model::ValueKind;

/// Reading a serialized representation of a record in the Swim data model produces
/// a stream of these events. An event is either a token, a notification that an
/// attribute or record body has started or ended or a notifcation of a slot (this will
/// occur between the slot key and the slot value). Events own their data, so a stream of
/// events can outlive the input that it was read from.
#[derive(Debug, PartialEq, Clone)]
pub enum ReadEvent {
    Extant,
    TextValue(String),
    Number(NumericValue),
    Boolean(bool),
    Blob(Vec<u8>),
    StartAttribute(String),
    EndAttribute,
    StartBody,
    Slot,
    EndRecord,
}

/// The numeric literals that can occur in a stream of [`ReadEvent`]s. Integer literals are
/// produced at the narrowest width that can hold them.
#[derive(Debug, PartialEq, Clone)]
pub enum NumericValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInt(BigInt),
    BigDecimal(BigDecimal),
}

impl NumericValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            NumericValue::Int(_) => ValueKind::Int32,
            NumericValue::Long(_) => ValueKind::Int64,
            NumericValue::Float(_) => ValueKind::Float32,
            NumericValue::Double(_) => ValueKind::Float64,
            NumericValue::BigInt(_) => ValueKind::BigInt,
            NumericValue::BigDecimal(_) => ValueKind::BigDecimal,
        }
    }
}

impl ReadEvent {
    pub fn kind_error(&self, expected: ExpectedEvent) -> ReadError {
        let expected = Some(expected);
        match self {
            ReadEvent::Number(n) => ReadError::unexpected_kind(n.kind(), expected),
            ReadEvent::Boolean(_) => ReadError::unexpected_kind(ValueKind::Boolean, expected),
            ReadEvent::TextValue(_) => ReadError::unexpected_kind(ValueKind::Text, expected),
            ReadEvent::Extant => ReadError::unexpected_kind(ValueKind::Extant, expected),
            ReadEvent::Blob(_) => ReadError::unexpected_kind(ValueKind::Data, expected),
            ReadEvent::StartBody | ReadEvent::StartAttribute(_) => {
                ReadError::unexpected_kind(ValueKind::Record, expected)
            }
            ReadEvent::Slot => ReadError::UnexpectedSlot,
            ReadEvent::EndAttribute | ReadEvent::EndRecord => ReadError::IncompleteRecord,
        }
    }
}

impl From<i32> for ReadEvent {
    fn from(n: i32) -> Self {
        ReadEvent::Number(NumericValue::Int(n))
    }
}

impl From<i64> for ReadEvent {
    fn from(n: i64) -> Self {
        ReadEvent::Number(NumericValue::Long(n))
    }
}

impl From<f32> for ReadEvent {
    fn from(x: f32) -> Self {
        ReadEvent::Number(NumericValue::Float(x))
    }
}

impl From<f64> for ReadEvent {
    fn from(x: f64) -> Self {
        ReadEvent::Number(NumericValue::Double(x))
    }
}

impl From<BigInt> for ReadEvent {
    fn from(n: BigInt) -> Self {
        ReadEvent::Number(NumericValue::BigInt(n))
    }
}

impl From<BigDecimal> for ReadEvent {
    fn from(n: BigDecimal) -> Self {
        ReadEvent::Number(NumericValue::BigDecimal(n))
    }
}

impl From<NumericValue> for ReadEvent {
    fn from(n: NumericValue) -> Self {
        ReadEvent::Number(n)
    }
}

impl From<&str> for ReadEvent {
    fn from(s: &str) -> Self {
        ReadEvent::TextValue(s.to_string())
    }
}

impl From<String> for ReadEvent {
    fn from(s: String) -> Self {
        ReadEvent::TextValue(s)
    }
}

impl From<bool> for ReadEvent {
    fn from(p: bool) -> Self {
        ReadEvent::Boolean(p)
    }
}

impl From<Vec<u8>> for ReadEvent {
    fn from(blob: Vec<u8>) -> Self {
        ReadEvent::Blob(blob)
    }
}
