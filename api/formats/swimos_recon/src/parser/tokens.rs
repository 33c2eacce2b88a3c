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

#[cfg(test)]
mod tests;

use crate::parser::combinators::{Alt, Boxed, CharLit, EndOfInput, Map, Peek, Satisfy};
use crate::parser::cursor::Cursor;
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::machine::{Parse, StateParser};
use crate::parser::number::NumberParser;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use swimos_form::structural::read::event::{NumericValue, ReadEvent};
use swimos_model::identifier::{is_identifier_char, is_identifier_start};

/// The units of Recon text from which the events of a document are built.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A literal value.
    Value(ReadEvent),
    /// The name of an attribute and whether it is followed by an opening parenthesis.
    Attr { name: String, has_body: bool },
    /// One of the punctuation characters `{ } ( ) : , ;`.
    Punct(char),
    Newline,
    /// The attributes of a record are followed by something that cannot be a record body.
    EndOfAttrs,
    /// The end of the final input.
    End,
}

/// Skips spaces and tabs and, optionally, new lines and `#` comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Whitespace {
    newlines: bool,
    comments: bool,
    in_comment: bool,
}

impl Whitespace {
    pub fn new(newlines: bool, comments: bool) -> Self {
        Whitespace {
            newlines,
            comments,
            in_comment: false,
        }
    }
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

impl StateParser for Whitespace {
    type Output = ();

    fn feed(mut self, input: &mut Cursor<'_>) -> Parse<(), Self> {
        loop {
            match input.head() {
                None if input.is_final() => return Parse::Done(()),
                None => return Parse::Cont(self),
                Some(c) if self.in_comment && is_newline(c) => self.in_comment = false,
                Some(_) if self.in_comment => *input = input.step(),
                Some(' ' | '\t') => *input = input.step(),
                Some(c) if self.newlines && is_newline(c) => *input = input.step(),
                Some('#') if self.comments => {
                    self.in_comment = true;
                    *input = input.step();
                }
                _ => return Parse::Done(()),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextStage {
    Open,
    Body,
    Escape,
    Unicode { digits: u8, code: u32 },
}

/// Parses a quoted text literal, applying escapes.
#[derive(Debug, Clone)]
pub struct StringLiteral {
    stage: TextStage,
    text: String,
}

impl Default for StringLiteral {
    fn default() -> Self {
        StringLiteral {
            stage: TextStage::Open,
            text: String::new(),
        }
    }
}

fn escaped(c: char) -> Option<char> {
    match c {
        '"' | '\\' | '/' | '\'' => Some(c),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

impl StateParser for StringLiteral {
    type Output = String;

    fn feed(mut self, input: &mut Cursor<'_>) -> Parse<String, Self> {
        loop {
            let c = match input.head() {
                Some(c) => c,
                None if !input.is_final() => return Parse::Cont(self),
                None if self.stage == TextStage::Open => {
                    return Parse::Error(ParseError::unexpected(input, "a text literal"))
                }
                None => {
                    return Parse::Error(ParseError::new(
                        ParseErrorKind::UnterminatedText,
                        input.location(),
                    ))
                }
            };
            let location = input.location();
            let invalid_escape = |seq: String| {
                Parse::Error(ParseError::new(
                    ParseErrorKind::InvalidEscape(seq),
                    location,
                ))
            };
            self.stage = match (self.stage, c) {
                (TextStage::Open, '"') => TextStage::Body,
                (TextStage::Open, _) => {
                    return Parse::Error(ParseError::unexpected(input, "a text literal"))
                }
                (TextStage::Body, '"') => {
                    *input = input.step();
                    return Parse::Done(self.text);
                }
                (TextStage::Body, '\\') => TextStage::Escape,
                (TextStage::Body, c) => {
                    self.text.push(c);
                    TextStage::Body
                }
                (TextStage::Escape, 'u') => TextStage::Unicode { digits: 0, code: 0 },
                (TextStage::Escape, c) => match escaped(c) {
                    Some(e) => {
                        self.text.push(e);
                        TextStage::Body
                    }
                    None => return invalid_escape(format!("\\{}", c)),
                },
                (TextStage::Unicode { digits, code }, c) => match c.to_digit(16) {
                    Some(d) if digits == 3 => {
                        let code = code * 16 + d;
                        match char::from_u32(code) {
                            Some(e) => self.text.push(e),
                            None => return invalid_escape(format!("\\u{:04x}", code)),
                        }
                        TextStage::Body
                    }
                    Some(d) => TextStage::Unicode {
                        digits: digits + 1,
                        code: code * 16 + d,
                    },
                    None => return invalid_escape(format!("\\u{:x}{}", code, c)),
                },
            };
            *input = input.step();
        }
    }
}

/// Parses a Recon identifier.
#[derive(Debug, Clone, Default)]
pub struct Identifier {
    text: String,
}

impl StateParser for Identifier {
    type Output = String;

    fn feed(mut self, input: &mut Cursor<'_>) -> Parse<String, Self> {
        loop {
            match input.head() {
                None if !input.is_final() => return Parse::Cont(self),
                Some(c) if self.text.is_empty() && is_identifier_start(c) => self.text.push(c),
                Some(c) if !self.text.is_empty() && is_identifier_char(c) => self.text.push(c),
                _ if self.text.is_empty() => {
                    return Parse::Error(ParseError::unexpected(input, "an identifier"))
                }
                _ => return Parse::Done(self.text),
            }
            *input = input.step();
        }
    }
}

/// Parses a `%` prefixed, base64 encoded blob.
#[derive(Debug, Clone, Default)]
pub struct BlobLiteral {
    started: bool,
    encoded: String,
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='
}

impl StateParser for BlobLiteral {
    type Output = Vec<u8>;

    fn feed(mut self, input: &mut Cursor<'_>) -> Parse<Vec<u8>, Self> {
        loop {
            match input.head() {
                None if !input.is_final() => return Parse::Cont(self),
                Some('%') if !self.started => self.started = true,
                _ if !self.started => {
                    return Parse::Error(ParseError::unexpected(input, "a blob literal"))
                }
                Some(c) if is_base64_char(c) => self.encoded.push(c),
                _ => {
                    return match STANDARD.decode(&self.encoded) {
                        Ok(data) => Parse::Done(data),
                        Err(err) => Parse::Error(ParseError::new(
                            ParseErrorKind::InvalidBlob(err.to_string()),
                            input.location(),
                        )),
                    }
                }
            }
            *input = input.step();
        }
    }
}

#[derive(Debug, Clone)]
enum AttrStage {
    At,
    Name(Alt<Boxed<String>>),
    AfterName(String),
}

/// Parses the name of an attribute (an identifier or a text literal, prefixed by `@`) and
/// an opening parenthesis, if one follows immediately.
#[derive(Debug, Clone)]
pub struct AttrParser {
    stage: AttrStage,
}

impl Default for AttrParser {
    fn default() -> Self {
        AttrParser {
            stage: AttrStage::At,
        }
    }
}

fn attr_name() -> Alt<Boxed<String>> {
    Alt::new(vec![
        Boxed::new(StringLiteral::default()),
        Boxed::new(Identifier::default()),
    ])
}

impl StateParser for AttrParser {
    type Output = (String, bool);

    fn feed(self, input: &mut Cursor<'_>) -> Parse<(String, bool), Self> {
        let mut stage = self.stage;
        loop {
            stage = match stage {
                AttrStage::At => match input.head() {
                    Some('@') => {
                        *input = input.step();
                        AttrStage::Name(attr_name())
                    }
                    None if !input.is_final() => {
                        return Parse::Cont(AttrParser {
                            stage: AttrStage::At,
                        })
                    }
                    _ => return Parse::Error(ParseError::unexpected(input, "an attribute")),
                },
                AttrStage::Name(name) => match name.feed(input) {
                    Parse::Done(name) => AttrStage::AfterName(name),
                    Parse::Error(err) => return Parse::Error(err),
                    Parse::Cont(name) => {
                        return Parse::Cont(AttrParser {
                            stage: AttrStage::Name(name),
                        })
                    }
                },
                AttrStage::AfterName(name) => {
                    return match input.head() {
                        Some('(') => {
                            *input = input.step();
                            Parse::Done((name, true))
                        }
                        None if !input.is_final() => Parse::Cont(AttrParser {
                            stage: AttrStage::AfterName(name),
                        }),
                        _ => Parse::Done((name, false)),
                    }
                }
            }
        }
    }
}

fn text_token(text: String) -> Token {
    Token::Value(ReadEvent::TextValue(text))
}

/// Identifiers that are the names of boolean and floating point constants.
fn identifier_token(name: String) -> Token {
    let event = match name.as_str() {
        "true" => ReadEvent::Boolean(true),
        "false" => ReadEvent::Boolean(false),
        "nan" => ReadEvent::Number(NumericValue::Double(f64::NAN)),
        "inf" | "infinity" => ReadEvent::Number(NumericValue::Double(f64::INFINITY)),
        _ => ReadEvent::TextValue(name),
    };
    Token::Value(event)
}

fn number_token(n: NumericValue) -> Token {
    Token::Value(ReadEvent::Number(n))
}

fn blob_token(data: Vec<u8>) -> Token {
    Token::Value(ReadEvent::Blob(data))
}

fn attr_token((name, has_body): (String, bool)) -> Token {
    Token::Attr { name, has_body }
}

/// The literal values. Identifiers are tried before numbers so that `nan` and `inf` are read
/// as identifiers when both would complete.
pub fn literals() -> Vec<Boxed<Token>> {
    vec![
        Boxed::new(Map::new(StringLiteral::default(), text_token)),
        Boxed::new(Map::new(Identifier::default(), identifier_token)),
        Boxed::new(Map::new(NumberParser::default(), number_token)),
        Boxed::new(Map::new(BlobLiteral::default(), blob_token)),
    ]
}

pub fn attribute() -> Boxed<Token> {
    Boxed::new(Map::new(AttrParser::default(), attr_token))
}

pub fn punct(c: char) -> Boxed<Token> {
    Boxed::new(Map::new(CharLit(c), Token::Punct))
}

pub fn newline() -> Boxed<Token> {
    Boxed::new(Map::new(
        Satisfy::new(is_newline, "a new line"),
        |_: char| Token::Newline,
    ))
}

pub fn end_of_input() -> Boxed<Token> {
    Boxed::new(Map::new(EndOfInput, |_: ()| Token::End))
}

fn ends_attrs(c: char) -> bool {
    matches!(c, ',' | ';' | ')' | '}') || is_newline(c)
}

/// Matches, without consuming it, anything that ends a record that has only attributes.
pub fn end_of_attrs() -> Vec<Boxed<Token>> {
    vec![
        Boxed::new(Map::new(
            Peek(Satisfy::new(ends_attrs, "a separator")),
            |_: char| Token::EndOfAttrs,
        )),
        Boxed::new(Map::new(EndOfInput, |_: ()| Token::EndOfAttrs)),
    ]
}
