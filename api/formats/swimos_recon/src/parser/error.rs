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
use thiserror::Error;

/// The reasons that Recon text can fail to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Unexpected character '{found}', expected {expected}.")]
    UnexpectedChar { found: char, expected: &'static str },
    #[error("Unexpected end of input.")]
    UnexpectedEnd,
    #[error("Unterminated text literal.")]
    UnterminatedText,
    #[error("Invalid escape sequence: {0}")]
    InvalidEscape(String),
    #[error("Invalid numeric literal: {0}")]
    InvalidNumber(String),
    #[error("Invalid blob literal: {0}")]
    InvalidBlob(String),
}

/// A failure to parse Recon text with the location in the document at which it occurred.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} At {location}.")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, location: Location) -> Self {
        ParseError { kind, location }
    }

    /// The character at the cursor (or the end of the input) was not what was expected.
    pub fn unexpected(input: &Cursor<'_>, expected: &'static str) -> Self {
        let kind = match input.head() {
            Some(found) => ParseErrorKind::UnexpectedChar { found, expected },
            None => ParseErrorKind::UnexpectedEnd,
        };
        ParseError::new(kind, input.location())
    }
}
