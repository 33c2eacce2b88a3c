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

use std::fmt::{Display, Formatter};
use swimos_model::ValueKind;
use thiserror::Error;

/// Description of the event that a recognizer was expecting when it failed.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum ExpectedEvent {
    ValueEvent(ValueKind),
    Attribute(Option<String>),
    RecordBody,
    Slot,
    EndOfRecord,
    EndOfAttribute,
    Or(Vec<ExpectedEvent>),
}

/// Errors that can occur when a stream of events is interpreted as a value of a specific type.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum ReadError {
    #[error("{}", format_unexpected_kind(.actual, .expected))]
    UnexpectedKind {
        actual: ValueKind,
        expected: Option<ExpectedEvent>,
    },
    #[error("Stack underflow deserializing the value.")]
    ReaderUnderflow,
    #[error("Slot divider encountered within the value of a slot.")]
    DoubleSlot,
    #[error("The record ended before all parts of the value were deserialized.")]
    IncompleteRecord,
    #[error("Fields [{}] are required.", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Unexpected attribute: '{0}'")]
    UnexpectedAttribute(String),
    #[error("The deserialization state became corrupted.")]
    InconsistentState,
    #[error("Unexpected item in record.")]
    UnexpectedItem,
    #[error("Unexpected slot in record.")]
    UnexpectedSlot,
    #[error("Field '{0}' occurred more than once.")]
    DuplicateField(String),
    #[error("Unexpected field: '{0}'")]
    UnexpectedField(String),
    #[error("Number out of range.")]
    NumberOutOfRange,
    /// None of the candidate representations of a polymorphic type accepted the input.
    #[error("tag mismatch")]
    TagMismatch,
    #[error("{0}")]
    Message(String),
}

impl ReadError {
    pub fn unexpected_kind(actual: ValueKind, expected: Option<ExpectedEvent>) -> Self {
        ReadError::UnexpectedKind { actual, expected }
    }
}

fn format_unexpected_kind(actual: &ValueKind, expected: &Option<ExpectedEvent>) -> String {
    if let Some(expected) = expected {
        format!("Unexpected value kind: {}, expected: {}.", actual, expected)
    } else {
        format!("Unexpected value kind: {}", actual)
    }
}

impl Display for ExpectedEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedEvent::ValueEvent(kind) => {
                write!(f, "A value of kind {}", kind)
            }
            ExpectedEvent::Attribute(Some(name)) => {
                write!(f, "An attribute named '{}'", name)
            }
            ExpectedEvent::Attribute(_) => f.write_str("An attribute"),
            ExpectedEvent::RecordBody => f.write_str("A record body"),
            ExpectedEvent::Slot => f.write_str("A slot divider"),
            ExpectedEvent::EndOfRecord => f.write_str("The end of the record body"),
            ExpectedEvent::EndOfAttribute => f.write_str("The end of the attribute"),
            ExpectedEvent::Or(alternatives) => match alternatives.as_slice() {
                [] => f.write_str("Nothing"),
                [single] => write!(f, "{}", single),
                [first, rest @ ..] => {
                    write!(f, "One of: [{}", first)?;
                    for alternative in rest {
                        write!(f, ", {}", alternative)?;
                    }
                    f.write_str("]")
                }
            },
        }
    }
}
