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

use crate::config::ParserConfig;
use crate::parser::tokens::Whitespace;
use crate::parser::{
    Cursor, IncrementalReconParser, Location, Parse, ParseError, ParseEvents, Progress,
    StateParser,
};
use bytes::{Buf, BytesMut};
use std::str::Utf8Error;
use swimos_form::registry::RecognizerRegistry;
use swimos_form::structural::read::materializers::value::ValueMaterializer;
use swimos_form::structural::read::recognizer::MappedRecognizer;
use swimos_form::structural::read::ReadError;
use swimos_form::{Recognizer, RecognizerReadable};
use swimos_model::{Item, Value};
use thiserror::Error;
use tracing::trace;

/// Errors that can occur when decoding Recon.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid Recon: {0}")]
    Syntax(#[from] ParseError),
    #[error("The Recon was not a valid representation of the type: {0}")]
    Structure(#[from] ReadError),
    #[error("Unexpected input after the end of the value at {0}.")]
    TrailingInput(Location),
    #[error("The input ended before the value was complete.")]
    IncompleteInput,
    #[error("The input was not valid UTF-8: {0}")]
    BadUtf8(#[from] Utf8Error),
}

/// Recognizer for the items of a document.
pub type DocumentRecognizer = MappedRecognizer<ValueMaterializer, fn(Value) -> Vec<Item>>;

fn into_items(value: Value) -> Vec<Item> {
    match value {
        Value::Record(_, items) => items,
        ow => vec![Item::ValueItem(ow)],
    }
}

/// Decodes a value from Recon text that is provided in fragments. Fragments may split the
/// text at any point, including inside a token (or, for [`Decoder::feed_bytes`], inside a
/// UTF-8 sequence).
///
/// The value is returned as soon as it is complete. Any further input must be whitespace.
///
/// # Examples
///
/// ```
/// use swimos_recon::Decoder;
/// use swimos_form::RecognizerReadable;
///
/// let mut decoder = Decoder::new(<Vec<i32>>::make_recognizer());
/// assert_eq!(decoder.feed("{1, 2").unwrap(), None);
/// assert_eq!(decoder.feed("3, 4}").unwrap(), Some(vec![1, 23, 4]));
/// assert_eq!(decoder.finish().unwrap(), None);
/// ```
pub struct Decoder<R> {
    recognizer: R,
    parser: IncrementalReconParser,
    config: ParserConfig,
    text: String,
    bytes: BytesMut,
    origin: Location,
    trailing: Option<Whitespace>,
}

impl<R: Recognizer> Decoder<R> {
    pub fn new(recognizer: R) -> Self {
        Decoder::with_config(recognizer, ParserConfig::default())
    }

    pub fn with_config(recognizer: R, config: ParserConfig) -> Self {
        Decoder::with_parser(recognizer, IncrementalReconParser::new(config), config)
    }

    fn with_parser(recognizer: R, parser: IncrementalReconParser, config: ParserConfig) -> Self {
        Decoder {
            recognizer,
            parser,
            config,
            text: String::new(),
            bytes: BytesMut::new(),
            origin: Location::default(),
            trailing: None,
        }
    }

    /// Provide the next fragment of the input.
    pub fn feed(&mut self, text: &str) -> Result<Option<R::Target>, DecodeError> {
        self.text.push_str(text);
        self.run(false)
    }

    /// Provide the next fragment of the input as UTF-8 bytes. An incomplete character at the
    /// end of the fragment is held until the next fragment.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<R::Target>, DecodeError> {
        self.bytes.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.bytes) {
            Ok(text) => text.len(),
            Err(err) if err.error_len().is_some() => return Err(err.into()),
            Err(err) => err.valid_up_to(),
        };
        let text = std::str::from_utf8(&self.bytes[..valid])?;
        self.text.push_str(text);
        self.bytes.advance(valid);
        self.run(false)
    }

    /// Signal the end of the input. Returns the value if it was completed by the end of the
    /// input or nothing if it was returned by an earlier call to [`Decoder::feed`].
    pub fn finish(mut self) -> Result<Option<R::Target>, DecodeError> {
        if !self.bytes.is_empty() {
            std::str::from_utf8(&self.bytes)?;
        }
        self.run(true)
    }

    /// Whether the value has been completed.
    pub fn is_complete(&self) -> bool {
        self.trailing.is_some()
    }

    fn run(&mut self, is_final: bool) -> Result<Option<R::Target>, DecodeError> {
        let Decoder {
            recognizer,
            parser,
            config,
            text,
            origin,
            trailing,
            ..
        } = self;
        let mut cursor = Cursor::with_origin(text, *origin, is_final);
        let result = drive(recognizer, parser, *config, trailing, &mut cursor);
        *origin = cursor.location();
        let consumed = cursor.index();
        text.drain(..consumed);
        result
    }
}

impl Decoder<DocumentRecognizer> {
    /// A decoder for a document: a sequence of items, without record delimiters, that ends
    /// with the input.
    pub fn document(config: ParserConfig) -> Self {
        let recognizer = MappedRecognizer::new(
            ValueMaterializer::record_body(),
            into_items as fn(Value) -> Vec<Item>,
        );
        Decoder::with_parser(recognizer, IncrementalReconParser::document(config), config)
    }
}

fn drive<R: Recognizer>(
    recognizer: &mut R,
    parser: &mut IncrementalReconParser,
    config: ParserConfig,
    trailing: &mut Option<Whitespace>,
    cursor: &mut Cursor<'_>,
) -> Result<Option<R::Target>, DecodeError> {
    let mut completed = None;
    loop {
        if let Some(whitespace) = trailing.take() {
            return match whitespace.feed(cursor) {
                Parse::Cont(whitespace) => {
                    *trailing = Some(whitespace);
                    Ok(completed)
                }
                Parse::Done(_) if cursor.is_empty() => {
                    *trailing = Some(whitespace);
                    Ok(completed)
                }
                Parse::Done(_) => Err(DecodeError::TrailingInput(cursor.location())),
                Parse::Error(err) => Err(err.into()),
            };
        }
        let value = match parser.parse(cursor)? {
            Progress::NeedMore => {
                trace!(location = %cursor.location(), "Decoder suspended awaiting more input.");
                return Ok(None);
            }
            Progress::Complete => recognizer
                .try_flush()
                .ok_or(DecodeError::IncompleteInput)??,
            Progress::Events(events) => match feed_events(recognizer, events, cursor)? {
                Some(value) => value,
                None => continue,
            },
        };
        trace!(location = %cursor.location(), "Decoder completed a value.");
        completed = Some(value);
        *trailing = Some(Whitespace::new(true, config.allow_comments));
    }
}

fn feed_events<R: Recognizer>(
    recognizer: &mut R,
    events: ParseEvents,
    cursor: &Cursor<'_>,
) -> Result<Option<R::Target>, DecodeError> {
    let mut events = events.into_iter();
    while let Some(event) = events.next() {
        if let Some(result) = recognizer.feed_event(event) {
            let value = result?;
            return if events.next().is_some() {
                Err(DecodeError::TrailingInput(cursor.location()))
            } else {
                Ok(Some(value))
            };
        }
    }
    Ok(None)
}

/// Decode a value of a type from Recon text.
///
/// # Examples
///
/// ```
/// use swimos_recon::decode;
/// use std::collections::HashMap;
///
/// let map = decode::<HashMap<String, i32>>("{a: 1, b: 2}").unwrap();
/// assert_eq!(map.get("b"), Some(&2));
/// ```
pub fn decode<T: RecognizerReadable>(text: &str) -> Result<T, DecodeError> {
    decode_with(text, T::make_recognizer())
}

/// Decode Recon text into the generic model.
pub fn decode_value(text: &str) -> Result<Value, DecodeError> {
    decode::<Value>(text)
}

/// Decode Recon text with a specific recognizer.
pub fn decode_with<R: Recognizer>(text: &str, recognizer: R) -> Result<R::Target, DecodeError> {
    decode_with_config(text, recognizer, ParserConfig::default())
}

pub fn decode_with_config<R: Recognizer>(
    text: &str,
    recognizer: R,
    config: ParserConfig,
) -> Result<R::Target, DecodeError> {
    finish_decode(Decoder::with_config(recognizer, config), text)
}

/// Decode a value of a type that has a recognizer in a registry.
pub fn decode_registered<T: 'static>(
    registry: &RecognizerRegistry,
    text: &str,
) -> Result<T, DecodeError> {
    decode_with(text, registry.proxy::<T>())
}

/// Decode the items of a Recon document (a record body without the enclosing braces).
pub fn decode_document(text: &str, config: ParserConfig) -> Result<Vec<Item>, DecodeError> {
    finish_decode(Decoder::document(config), text)
}

fn finish_decode<R: Recognizer>(
    mut decoder: Decoder<R>,
    text: &str,
) -> Result<R::Target, DecodeError> {
    let early = decoder.feed(text)?;
    let late = decoder.finish()?;
    early.or(late).ok_or(DecodeError::IncompleteInput)
}
