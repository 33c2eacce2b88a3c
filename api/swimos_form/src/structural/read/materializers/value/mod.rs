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
use crate::structural::read::event::{NumericValue, ReadEvent};
use crate::structural::read::recognizer::Recognizer;
use crate::structural::read::ReadError;
use swimos_model::{Attr, Blob, Item, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Value,
    AttrBody,
    DelegatedBody,
    RecordBody,
}

#[derive(Debug)]
enum FrameKind {
    Record { in_body: bool },
    Attr(String),
}

/// A record or attribute body that is still open.
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    /// The key of the slot that this frame is the value of, if any.
    key: Option<Value>,
    attrs: Vec<Attr>,
    items: Vec<Item>,
}

impl Frame {
    fn record(in_body: bool, key: Option<Value>) -> Self {
        Frame {
            kind: FrameKind::Record { in_body },
            key,
            attrs: vec![],
            items: vec![],
        }
    }

    fn attr(name: String) -> Self {
        Frame {
            kind: FrameKind::Attr(name),
            key: None,
            attrs: vec![],
            items: vec![],
        }
    }
}

#[derive(Clone, Copy)]
enum Top {
    Empty,
    Attrs,
    Body,
    AttrBody,
}

/// [`Recognizer`] that builds an instance of the generic model type [`Value`] from any valid
/// stream of events, using an explicit stack of the records and attributes that are open.
///
/// There are three variants, matching the representations of [`RecognizerReadable`]:
/// a complete value, the contents of an attribute body (terminated by the end of the attribute)
/// and the remainder of a record, the tag of which has already been consumed.
///
/// [`RecognizerReadable`]: crate::structural::read::recognizer::RecognizerReadable
#[derive(Debug)]
pub struct ValueMaterializer {
    mode: Mode,
    stack: Vec<Frame>,
    slot_key: Option<Value>,
}

impl Default for ValueMaterializer {
    fn default() -> Self {
        ValueMaterializer::new(Mode::Value)
    }
}

impl ValueMaterializer {
    fn new(mode: Mode) -> Self {
        ValueMaterializer {
            mode,
            stack: initial_stack(mode),
            slot_key: None,
        }
    }

    /// Materialize the body of an attribute. An attribute body containing a single value is
    /// collapsed to that value.
    pub fn attr_body() -> Self {
        ValueMaterializer::new(Mode::AttrBody)
    }

    /// Materialize the remaining attributes and the body of a record.
    pub fn delegated_body() -> Self {
        ValueMaterializer::new(Mode::DelegatedBody)
    }

    /// Materialize the items of a record body that is already open, up to the closing
    /// [`ReadEvent::EndRecord`].
    pub fn record_body() -> Self {
        ValueMaterializer::new(Mode::RecordBody)
    }

    /// The number of records and attributes that are currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn top(&self) -> Top {
        match self.stack.last() {
            None => Top::Empty,
            Some(Frame {
                kind: FrameKind::Record { in_body: false },
                ..
            }) => Top::Attrs,
            Some(Frame {
                kind: FrameKind::Record { in_body: true },
                ..
            }) => Top::Body,
            Some(Frame {
                kind: FrameKind::Attr(_),
                ..
            }) => Top::AttrBody,
        }
    }

    fn step(&mut self, input: ReadEvent) -> Result<Option<Value>, ReadError> {
        match (self.top(), input) {
            (Top::Empty, ReadEvent::StartAttribute(name)) => {
                self.stack.push(Frame::record(false, None));
                self.stack.push(Frame::attr(name));
                Ok(None)
            }
            (Top::Empty, ReadEvent::StartBody) => {
                self.stack.push(Frame::record(true, None));
                Ok(None)
            }
            (Top::Empty, ReadEvent::Slot) => Err(ReadError::UnexpectedSlot),
            (Top::Empty, ReadEvent::EndAttribute | ReadEvent::EndRecord) => {
                Err(ReadError::ReaderUnderflow)
            }
            (Top::Empty, scalar) => scalar_value(scalar).map(Some),
            (Top::Attrs, ReadEvent::StartAttribute(name)) => {
                self.stack.push(Frame::attr(name));
                Ok(None)
            }
            (Top::Attrs, ReadEvent::StartBody) => {
                if let Some(Frame {
                    kind: FrameKind::Record { in_body },
                    ..
                }) = self.stack.last_mut()
                {
                    *in_body = true;
                }
                Ok(None)
            }
            (Top::Attrs, ow) => Err(ow.kind_error(ExpectedEvent::Or(vec![
                ExpectedEvent::RecordBody,
                ExpectedEvent::Attribute(None),
            ]))),
            (Top::Body, ReadEvent::EndRecord) | (Top::AttrBody, ReadEvent::EndAttribute) => {
                self.pop()
            }
            (Top::Body, ow @ ReadEvent::EndAttribute) => {
                Err(ow.kind_error(ExpectedEvent::EndOfRecord))
            }
            (Top::AttrBody, ow @ ReadEvent::EndRecord) => {
                Err(ow.kind_error(ExpectedEvent::EndOfAttribute))
            }
            (_, ReadEvent::Slot) => self.start_slot().map(|_| None),
            (_, ReadEvent::StartAttribute(name)) => {
                let key = self.slot_key.take();
                self.stack.push(Frame::record(false, key));
                self.stack.push(Frame::attr(name));
                Ok(None)
            }
            (_, ReadEvent::StartBody) => {
                let key = self.slot_key.take();
                self.stack.push(Frame::record(true, key));
                Ok(None)
            }
            (_, scalar) => {
                let value = scalar_value(scalar)?;
                self.add_item(value);
                Ok(None)
            }
        }
    }

    fn start_slot(&mut self) -> Result<(), ReadError> {
        if self.slot_key.is_some() {
            return Err(ReadError::DoubleSlot);
        }
        let frame = self.stack.last_mut().ok_or(ReadError::UnexpectedSlot)?;
        let key = match frame.items.pop() {
            Some(Item::ValueItem(key)) => key,
            Some(slot) => {
                frame.items.push(slot);
                Value::Extant
            }
            None => Value::Extant,
        };
        self.slot_key = Some(key);
        Ok(())
    }

    fn add_item(&mut self, value: Value) {
        let item = if let Some(key) = self.slot_key.take() {
            Item::Slot(key, value)
        } else {
            Item::ValueItem(value)
        };
        if let Some(frame) = self.stack.last_mut() {
            frame.items.push(item);
        }
    }

    /// Close the innermost frame, folding it into its parent. Returns the completed value when
    /// the outermost frame is closed.
    fn pop(&mut self) -> Result<Option<Value>, ReadError> {
        let Frame {
            kind,
            key,
            attrs,
            mut items,
        } = self.stack.pop().ok_or(ReadError::ReaderUnderflow)?;
        if let Some(dangling) = self.slot_key.take() {
            items.push(Item::Slot(dangling, Value::Extant));
        }
        match kind {
            FrameKind::Attr(name) => {
                let body = collapse_attr_body(attrs, items);
                match self.stack.last_mut() {
                    Some(parent) => {
                        parent.attrs.push(Attr { name, value: body });
                        Ok(None)
                    }
                    None => Ok(Some(body)),
                }
            }
            FrameKind::Record { .. } => {
                let record = Value::Record(attrs, items);
                match self.stack.last_mut() {
                    Some(parent) => {
                        parent.items.push(match key {
                            Some(key) => Item::Slot(key, record),
                            None => Item::ValueItem(record),
                        });
                        Ok(None)
                    }
                    None => Ok(Some(record)),
                }
            }
        }
    }
}

fn initial_stack(mode: Mode) -> Vec<Frame> {
    match mode {
        Mode::Value => vec![],
        Mode::AttrBody => vec![Frame::attr(String::new())],
        Mode::DelegatedBody => vec![Frame::record(false, None)],
        Mode::RecordBody => vec![Frame::record(true, None)],
    }
}

/// An attribute body with no attributes and at most one item is written without record
/// delimiters: an empty body is [`Value::Extant`] and a single value item is that value.
fn collapse_attr_body(attrs: Vec<Attr>, mut items: Vec<Item>) -> Value {
    if attrs.is_empty() && items.len() <= 1 {
        match items.pop() {
            Some(Item::ValueItem(value)) => value,
            Some(slot @ Item::Slot(_, _)) => Value::Record(vec![], vec![slot]),
            None => Value::Extant,
        }
    } else {
        Value::Record(attrs, items)
    }
}

fn scalar_value(event: ReadEvent) -> Result<Value, ReadError> {
    let value = match event {
        ReadEvent::Extant => Value::Extant,
        ReadEvent::TextValue(text) => Value::Text(text),
        ReadEvent::Boolean(p) => Value::BooleanValue(p),
        ReadEvent::Blob(data) => Value::Data(Blob::from_vec(data)),
        ReadEvent::Number(NumericValue::Int(n)) => Value::Int32Value(n),
        ReadEvent::Number(NumericValue::Long(n)) => Value::Int64Value(n),
        ReadEvent::Number(NumericValue::Float(x)) => Value::Float32Value(x),
        ReadEvent::Number(NumericValue::Double(x)) => Value::Float64Value(x),
        ReadEvent::Number(NumericValue::BigInt(n)) => Value::BigInt(n),
        ReadEvent::Number(NumericValue::BigDecimal(n)) => Value::BigDecimal(n),
        _ => return Err(ReadError::InconsistentState),
    };
    Ok(value)
}

impl Recognizer for ValueMaterializer {
    type Target = Value;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        self.step(input).transpose()
    }

    fn reset(&mut self) {
        self.stack = initial_stack(self.mode);
        self.slot_key = None;
    }
}
