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

use super::structure::{Bitset, FieldSpec};
use super::{FirstOf, Recognizer, Selector};
use crate::structural::read::error::ExpectedEvent;
use crate::structural::read::event::ReadEvent;
use crate::structural::read::ReadError;
use swimos_model::ValueKind;

#[derive(Clone, Copy)]
enum HeaderState {
    Init,
    ExpectingBody,
    BodyItem,
    BetweenSlots,
    ExpectingSlot,
    SlotItem,
    End,
}

/// A key to specify the field that has been encounted in the stream of events when reading
/// a header of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderFieldKey<'a> {
    /// The first value inside the tag attribute.
    HeaderBody,
    /// A labelled slot in the tag attribute.
    HeaderSlot(&'a str),
}

/// The functions that determine how incoming events modify the state of a [`HeaderRecognizer`].
pub struct HeaderVTable<T, Flds> {
    select_index: for<'a> fn(HeaderFieldKey<'a>) -> Option<u32>,
    select_recog: Selector<Flds>,
    on_done: fn(&mut Flds) -> Result<T, ReadError>,
    reset: fn(&mut Flds),
}

impl<T, Flds> HeaderVTable<T, Flds> {
    pub fn new(
        select_index: for<'a> fn(HeaderFieldKey<'a>) -> Option<u32>,
        select_recog: Selector<Flds>,
        on_done: fn(&mut Flds) -> Result<T, ReadError>,
        reset: fn(&mut Flds),
    ) -> Self {
        HeaderVTable {
            select_index,
            select_recog,
            on_done,
            reset,
        }
    }
}

impl<T, Flds> Clone for HeaderVTable<T, Flds> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, Flds> Copy for HeaderVTable<T, Flds> {}

/// Recognizes the body of a tag attribute into which fields of a record have been promoted,
/// for example the `(3, x: 1, y: 2)` in `@Tag(3, x: 1, y: 2)`. The promoted fields may be
/// written directly into the attribute body (flattened) or as a nested record within it
/// (`@Tag({3, x: 1, y: 2})`).
pub struct HeaderRecognizer<T, Flds> {
    has_body: bool,
    flattened: bool,
    state: HeaderState,
    fields: Flds,
    specs: &'static [FieldSpec],
    progress: Bitset,
    index: u32,
    vtable: HeaderVTable<T, Flds>,
}

/// Create a recognizer for the body of the header attribute of a record that accepts both the
/// flattened and the nested representations, whichever occurs.
///
/// #Arguments
/// * `has_body` - Whether there is a field promoted to be the body of the header.
/// * `make_fields` - Factory to construct the state of the recognizer.
/// * `specs` - The promoted fields, in index order.
/// * `vtable` - Functions that determine how incoming events modify the state.
pub fn header_recognizer<T, Flds, MkFlds>(
    has_body: bool,
    make_fields: MkFlds,
    specs: &'static [FieldSpec],
    vtable: HeaderVTable<T, Flds>,
) -> FirstOf<HeaderRecognizer<T, Flds>, HeaderRecognizer<T, Flds>>
where
    MkFlds: Fn() -> Flds,
{
    let flattened = HeaderRecognizer::new(has_body, true, make_fields(), specs, vtable);
    let nested = HeaderRecognizer::new(has_body, false, make_fields(), specs, vtable);
    FirstOf::new(flattened, nested)
}

impl<T, Flds> HeaderRecognizer<T, Flds> {
    /// #Arguments
    /// * `has_body` - Whether there is a field promoted to be the body of the header.
    /// * `flattened` - Whether the record containing the fields has been flattened into the
    /// attribute body (and so does not have explicit record body delimiting).
    /// * `fields` - The state of the recognizer.
    /// * `specs` - The promoted fields, in index order.
    /// * `vtable` - Functions that determine how incoming events modify the state.
    pub fn new(
        has_body: bool,
        flattened: bool,
        fields: Flds,
        specs: &'static [FieldSpec],
        vtable: HeaderVTable<T, Flds>,
    ) -> Self {
        HeaderRecognizer {
            has_body,
            flattened,
            state: Self::initial_state(has_body, flattened),
            fields,
            specs,
            progress: Bitset::new(specs.len() as u32),
            index: 0,
            vtable,
        }
    }

    fn initial_state(has_body: bool, flattened: bool) -> HeaderState {
        match (flattened, has_body) {
            (false, _) => HeaderState::Init,
            (true, false) => HeaderState::BetweenSlots,
            (true, true) => HeaderState::ExpectingBody,
        }
    }

    fn finish(&mut self) -> Result<T, ReadError> {
        let missing = self
            .specs
            .iter()
            .enumerate()
            .filter(|(i, spec)| !spec.optional && !self.progress.get(*i as u32))
            .map(|(_, spec)| spec.name.to_string())
            .collect::<Vec<_>>();
        if missing.is_empty() {
            (self.vtable.on_done)(&mut self.fields)
        } else {
            Err(ReadError::MissingFields(missing))
        }
    }
}

impl<T, Flds> Recognizer for HeaderRecognizer<T, Flds> {
    type Target = T;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let HeaderVTable {
            select_index,
            select_recog,
            ..
        } = self.vtable;
        let flattened = self.flattened;
        match self.state {
            HeaderState::Init => {
                if matches!(&input, ReadEvent::StartBody) {
                    self.state = if self.has_body {
                        HeaderState::ExpectingBody
                    } else {
                        HeaderState::BetweenSlots
                    };
                    None
                } else {
                    Some(Err(input.kind_error(ExpectedEvent::RecordBody)))
                }
            }
            HeaderState::ExpectingBody => match input {
                ReadEvent::EndAttribute if flattened => Some(self.finish()),
                ReadEvent::EndRecord if !flattened => {
                    self.state = HeaderState::End;
                    None
                }
                _ => {
                    if let Some(i) = select_index(HeaderFieldKey::HeaderBody) {
                        self.index = i;
                        self.state = HeaderState::BodyItem;
                        self.feed_field(select_recog, input)
                    } else {
                        Some(Err(ReadError::InconsistentState))
                    }
                }
            },
            HeaderState::BodyItem | HeaderState::SlotItem => self.feed_field(select_recog, input),
            HeaderState::BetweenSlots => match input {
                ReadEvent::EndAttribute if flattened => Some(self.finish()),
                ReadEvent::EndRecord if !flattened => {
                    self.state = HeaderState::End;
                    None
                }
                ReadEvent::TextValue(name) => {
                    match select_index(HeaderFieldKey::HeaderSlot(&name)) {
                        Some(i) if self.progress.get(i) => {
                            Some(Err(ReadError::DuplicateField(name)))
                        }
                        Some(i) => {
                            self.index = i;
                            self.state = HeaderState::ExpectingSlot;
                            None
                        }
                        None => Some(Err(ReadError::UnexpectedField(name))),
                    }
                }
                ow => {
                    let end = if flattened {
                        ExpectedEvent::EndOfAttribute
                    } else {
                        ExpectedEvent::EndOfRecord
                    };
                    Some(Err(ow.kind_error(ExpectedEvent::Or(vec![
                        end,
                        ExpectedEvent::ValueEvent(ValueKind::Text),
                    ]))))
                }
            },
            HeaderState::ExpectingSlot => {
                if matches!(&input, ReadEvent::Slot) {
                    self.state = HeaderState::SlotItem;
                    None
                } else {
                    Some(Err(input.kind_error(ExpectedEvent::Slot)))
                }
            }
            HeaderState::End => {
                if matches!(&input, ReadEvent::EndAttribute) {
                    Some(self.finish())
                } else {
                    Some(Err(input.kind_error(ExpectedEvent::EndOfAttribute)))
                }
            }
        }
    }

    fn reset(&mut self) {
        self.state = Self::initial_state(self.has_body, self.flattened);
        (self.vtable.reset)(&mut self.fields);
        self.progress.clear();
        self.index = 0;
    }
}

impl<T, Flds> HeaderRecognizer<T, Flds> {
    fn feed_field(
        &mut self,
        select_recog: Selector<Flds>,
        input: ReadEvent,
    ) -> Option<Result<T, ReadError>> {
        if let Err(e) = select_recog(&mut self.fields, self.index, input)? {
            Some(Err(e))
        } else {
            self.progress.set(self.index);
            self.state = HeaderState::BetweenSlots;
            None
        }
    }
}
