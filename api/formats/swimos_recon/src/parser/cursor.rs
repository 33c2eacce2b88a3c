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

/// A position in the input, counted from the start of the whole document (not the current
/// fragment). Lines and columns are 1-based, the offset counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Default for Location {
    fn default() -> Self {
        Location {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Location {
    fn after(self, c: char) -> Location {
        let Location {
            offset,
            line,
            column,
        } = self;
        if c == '\n' {
            Location {
                offset: offset + 1,
                line: line + 1,
                column: 1,
            }
        } else {
            Location {
                offset: offset + 1,
                line,
                column: column + 1,
            }
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}, column {} (offset {})",
            self.line, self.column, self.offset
        )
    }
}

/// A position within a fragment of input text. Moving the cursor produces a new cursor so a
/// copy serves as a snapshot to restore after speculative parsing.
///
/// A cursor over a partial fragment ([`Cursor::is_final`] is false) may run out of input
/// before the document is complete. Parsers that reach the end of such a cursor suspend rather
/// than fail.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a str,
    index: usize,
    location: Location,
    is_final: bool,
}

impl<'a> Cursor<'a> {
    /// A cursor at the start of a document.
    pub fn new(input: &'a str, is_final: bool) -> Self {
        Cursor::with_origin(input, Location::default(), is_final)
    }

    /// A cursor over a fragment that starts at `location` in the document.
    pub fn with_origin(input: &'a str, location: Location, is_final: bool) -> Self {
        Cursor {
            input,
            index: 0,
            location,
            is_final,
        }
    }

    pub fn head(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Move past the next character, if there is one.
    pub fn step(self) -> Self {
        match self.head() {
            Some(c) => Cursor {
                index: self.index + c.len_utf8(),
                location: self.location.after(c),
                ..self
            },
            None => self,
        }
    }

    /// Move past the next `n` characters (or to the end of the fragment).
    pub fn advance(self, n: usize) -> Self {
        (0..n).fold(self, |cursor, _| cursor.step())
    }

    /// Whether at least `n` more characters are available in this fragment.
    pub fn has_at_least(&self, n: usize) -> bool {
        self.remaining().chars().nth(n.saturating_sub(1)).is_some() || n == 0
    }

    pub fn is_empty(&self) -> bool {
        self.index >= self.input.len()
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// No input remains and none will follow.
    pub fn is_final_end(&self) -> bool {
        self.is_final && self.is_empty()
    }

    /// No input remains in this fragment but more may follow.
    pub fn is_awaiting_more(&self) -> bool {
        !self.is_final && self.is_empty()
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// The byte offset of the cursor within the current fragment.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> &'a str {
        &self.input[self.index..]
    }

    /// The text between an earlier copy of this cursor and this one.
    pub fn consumed_since(&self, earlier: &Cursor<'a>) -> &'a str {
        let start = earlier.index.min(self.index);
        &self.input[start..self.index]
    }
}
