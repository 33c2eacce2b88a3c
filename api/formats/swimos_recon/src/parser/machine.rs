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

/// The outcome of feeding input to a [`StateParser`].
#[derive(Debug)]
pub enum Parse<T, P> {
    /// The parser completed. The cursor has been moved past the consumed input.
    Done(T),
    /// The parser failed.
    Error(ParseError),
    /// The input ran out before the parser could decide. The parser should be fed again with
    /// the input from the position of the cursor onwards, followed by the next fragment.
    Cont(P),
}

impl<T, P> Parse<T, P> {
    pub fn map<U, F>(self, f: F) -> Parse<U, P>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Parse::Done(t) => Parse::Done(f(t)),
            Parse::Error(e) => Parse::Error(e),
            Parse::Cont(p) => Parse::Cont(p),
        }
    }

    pub fn map_cont<Q, F>(self, f: F) -> Parse<T, Q>
    where
        F: FnOnce(P) -> Q,
    {
        match self {
            Parse::Done(t) => Parse::Done(t),
            Parse::Error(e) => Parse::Error(e),
            Parse::Cont(p) => Parse::Cont(f(p)),
        }
    }

    pub fn is_cont(&self) -> bool {
        matches!(self, Parse::Cont(_))
    }
}

/// A parser that can be suspended when it runs out of input and resumed when more arrives.
///
/// Suspension is expressed by returning the parser to continue with in [`Parse::Cont`].
/// Input before the position of the cursor at suspension is never presented again so anything
/// needed from it must be held in the returned state. Parsers that suspend speculatively leave
/// the cursor where it was and return their state from before the call.
///
/// When the cursor is final a parser must not suspend.
pub trait StateParser: Sized {
    type Output;

    fn feed(self, input: &mut Cursor<'_>) -> Parse<Self::Output, Self>;
}

/// Run a parser over the whole of a document, returning its output and the unconsumed input.
pub fn parse_complete<P: StateParser>(
    parser: P,
    input: &str,
) -> Result<(P::Output, &str), ParseError> {
    let mut cursor = Cursor::new(input, true);
    match parser.feed(&mut cursor) {
        Parse::Done(output) => Ok((output, cursor.remaining())),
        Parse::Error(err) => Err(err),
        Parse::Cont(_) => Err(ParseError::new(
            ParseErrorKind::UnexpectedEnd,
            cursor.location(),
        )),
    }
}

/// Run a parser over a document that is provided in a sequence of fragments. The last fragment
/// is treated as the end of the document.
pub fn parse_fragments<P: StateParser>(
    parser: P,
    fragments: &[&str],
) -> Result<P::Output, ParseError> {
    let mut parser = parser;
    let mut buffer = String::new();
    let mut origin = Location::default();
    let last = fragments.len().saturating_sub(1);
    for (i, fragment) in fragments.iter().chain(std::iter::once(&"")).enumerate() {
        buffer.push_str(fragment);
        let mut cursor = Cursor::with_origin(&buffer, origin, i >= last);
        match parser.feed(&mut cursor) {
            Parse::Done(output) => return Ok(output),
            Parse::Error(err) => return Err(err),
            Parse::Cont(next) if i < last => {
                parser = next;
                origin = cursor.location();
                let consumed = cursor.index();
                buffer.drain(..consumed);
            }
            Parse::Cont(_) => break,
        }
    }
    Err(ParseError::new(ParseErrorKind::UnexpectedEnd, origin))
}
