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

use super::{Recognizer, RecognizerReadable, Selector};
use crate::structural::read::error::ExpectedEvent;
use crate::structural::read::event::ReadEvent;
use crate::structural::read::ReadError;
use swimos_model::ValueKind;

/// Records which of the fields of a record have been populated. A record may have at most
/// [`Bitset::CAPACITY`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitset(u32, u64);

impl Bitset {
    pub const CAPACITY: u32 = u64::BITS;

    pub fn new(cap: u32) -> Self {
        Bitset(cap.min(Self::CAPACITY), 0)
    }

    /// Mark a field as populated, returning whether it was previously unset.
    pub fn set(&mut self, index: u32) -> bool {
        let Bitset(cap, bits) = self;
        if index < *cap {
            let was_clear = (*bits >> index) & 0x1 == 0;
            *bits |= 1 << index;
            was_clear
        } else {
            false
        }
    }

    pub fn get(&self, index: u32) -> bool {
        let Bitset(cap, bits) = self;
        index < *cap && (*bits >> index) & 0x1 != 0
    }

    pub fn clear(&mut self) {
        self.1 = 0
    }
}

/// Describes one field of a record. The position of a spec in the table passed to a struct
/// recognizer is the index of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Optional fields may be omitted and will be bound to the default provided by
    /// [`RecognizerReadable::on_absent`].
    pub optional: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        FieldSpec {
            name,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        FieldSpec {
            name,
            optional: true,
        }
    }
}

/// Take the value of a field from the state of a recognizer, falling back to the default for
/// the type if the field did not occur.
pub fn take_field<T: RecognizerReadable>(
    field: &mut Option<T>,
    name: &'static str,
) -> Result<T, ReadError> {
    field
        .take()
        .or_else(T::on_absent)
        .ok_or_else(|| ReadError::MissingFields(vec![name.to_string()]))
}

fn complete<T, Flds>(
    specs: &[FieldSpec],
    progress: &Bitset,
    fields: &mut Flds,
    on_done: fn(&mut Flds) -> Result<T, ReadError>,
) -> Result<T, ReadError> {
    let missing = specs
        .iter()
        .enumerate()
        .filter(|(i, spec)| !spec.optional && !progress.get(*i as u32))
        .map(|(_, spec)| spec.name.to_string())
        .collect::<Vec<_>>();
    if missing.is_empty() {
        on_done(fields)
    } else {
        Err(ReadError::MissingFields(missing))
    }
}

/// Specifies whether the tag attribute for a record is expected to be a fixed string, one of a
/// number of strings or should be used to populate one of the fields.
#[derive(Debug, Clone, Copy)]
pub enum TagSpec {
    Fixed(&'static str),
    /// Any of the names is accepted. If the record has a tag field, the name is stored in it.
    Variants(&'static [&'static str]),
    Field,
}

impl TagSpec {
    fn expected(&self) -> ExpectedEvent {
        match self {
            TagSpec::Fixed(name) => ExpectedEvent::Attribute(Some(name.to_string())),
            TagSpec::Variants(names) => ExpectedEvent::Or(
                names
                    .iter()
                    .map(|name| ExpectedEvent::Attribute(Some(name.to_string())))
                    .collect(),
            ),
            TagSpec::Field => ExpectedEvent::Attribute(None),
        }
    }
}

/// A key to specify the field that has been encounted in the stream of events when reading
/// a type with labelled body fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelledFieldKey<'a> {
    /// The name of the tag when this is used to populate a field.
    Tag,
    Header,
    /// Another attribute after the tag.
    Attr(&'a str),
    /// A labelled slot in the body of the record.
    Item(&'a str),
}

/// A key to specify the field that has been encounted in the stream of events when reading
/// a type with un-labelled body fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrdinalFieldKey<'a> {
    /// The name of the tag when this is used to populate a field.
    Tag,
    Header,
    /// Another attribute after the tag.
    Attr(&'a str),
    /// The first field in the body of the record. All other body fields are assumed to ocurr
    /// sequentially after the first.
    FirstItem,
}

#[derive(Clone, Copy)]
enum AttrKey<'a> {
    Tag,
    Header,
    Attr(&'a str),
}

impl<'a> From<AttrKey<'a>> for LabelledFieldKey<'a> {
    fn from(key: AttrKey<'a>) -> Self {
        match key {
            AttrKey::Tag => LabelledFieldKey::Tag,
            AttrKey::Header => LabelledFieldKey::Header,
            AttrKey::Attr(name) => LabelledFieldKey::Attr(name),
        }
    }
}

impl<'a> From<AttrKey<'a>> for OrdinalFieldKey<'a> {
    fn from(key: AttrKey<'a>) -> Self {
        match key {
            AttrKey::Tag => OrdinalFieldKey::Tag,
            AttrKey::Header => OrdinalFieldKey::Header,
            AttrKey::Attr(name) => OrdinalFieldKey::Attr(name),
        }
    }
}

#[derive(Clone, Copy)]
enum AttrState {
    Tag,
    Header,
    NoHeader,
    Between,
    Item,
}

enum AttrStep {
    Consumed,
    StartBody,
    /// An attribute, after the tag, that is not mapped to any field.
    Unmapped(String),
}

/// The part of a struct recognizer that reads the tag, the header and any further attributes
/// up to the start of the body of the record.
struct RecordAttrs {
    tag: TagSpec,
    state: AttrState,
    index: u32,
}

impl RecordAttrs {
    fn new(tag: TagSpec) -> Self {
        RecordAttrs {
            tag,
            state: AttrState::Tag,
            index: 0,
        }
    }

    fn reset(&mut self) {
        self.state = AttrState::Tag;
        self.index = 0;
    }

    fn feed<Flds, F>(
        &mut self,
        input: ReadEvent,
        fields: &mut Flds,
        progress: &mut Bitset,
        select_index: F,
        select_recog: Selector<Flds>,
    ) -> Option<Result<AttrStep, ReadError>>
    where
        F: Fn(AttrKey<'_>) -> Option<u32>,
    {
        let RecordAttrs { tag, state, index } = self;
        match *state {
            AttrState::Tag => match input {
                ReadEvent::StartAttribute(name) => {
                    let accepted = match tag {
                        TagSpec::Fixed(expected) => *expected == name,
                        TagSpec::Variants(names) => names.iter().any(|n| *n == name),
                        TagSpec::Field => true,
                    };
                    if !accepted {
                        return Some(Err(ReadError::UnexpectedAttribute(name)));
                    }
                    match (tag, select_index(AttrKey::Tag)) {
                        (TagSpec::Field, None) => return Some(Err(ReadError::InconsistentState)),
                        (TagSpec::Fixed(_), _) | (_, None) => {}
                        (_, Some(i)) => {
                            if let Err(e) = select_recog(fields, i, ReadEvent::TextValue(name))? {
                                return Some(Err(e));
                            }
                            progress.set(i);
                        }
                    }
                    if let Some(i) = select_index(AttrKey::Header) {
                        *index = i;
                        *state = AttrState::Header;
                    } else {
                        *state = AttrState::NoHeader;
                    }
                    Some(Ok(AttrStep::Consumed))
                }
                ow => Some(Err(ow.kind_error(tag.expected()))),
            },
            AttrState::Header | AttrState::Item => {
                if let Err(e) = select_recog(fields, *index, input)? {
                    Some(Err(e))
                } else {
                    progress.set(*index);
                    *state = AttrState::Between;
                    Some(Ok(AttrStep::Consumed))
                }
            }
            AttrState::NoHeader => match input {
                ReadEvent::Extant => Some(Ok(AttrStep::Consumed)),
                ReadEvent::EndAttribute => {
                    *state = AttrState::Between;
                    Some(Ok(AttrStep::Consumed))
                }
                ow => Some(Err(ow.kind_error(ExpectedEvent::EndOfAttribute))),
            },
            AttrState::Between => match input {
                ReadEvent::StartBody => Some(Ok(AttrStep::StartBody)),
                ReadEvent::StartAttribute(name) => match select_index(AttrKey::Attr(&name)) {
                    Some(i) if progress.get(i) => Some(Err(ReadError::DuplicateField(name))),
                    Some(i) => {
                        *index = i;
                        *state = AttrState::Item;
                        Some(Ok(AttrStep::Consumed))
                    }
                    None => Some(Ok(AttrStep::Unmapped(name))),
                },
                ow => Some(Err(ow.kind_error(ExpectedEvent::Or(vec![
                    ExpectedEvent::RecordBody,
                    ExpectedEvent::Attribute(None),
                ])))),
            },
        }
    }
}

/// The functions that determine how incoming events modify the state of a
/// [`LabelledStructRecognizer`].
pub struct LabelledVTable<T, Flds> {
    select_index: for<'a> fn(LabelledFieldKey<'a>) -> Option<u32>,
    select_recog: Selector<Flds>,
    on_done: fn(&mut Flds) -> Result<T, ReadError>,
    reset: fn(&mut Flds),
}

impl<T, Flds> LabelledVTable<T, Flds> {
    pub fn new(
        select_index: for<'a> fn(LabelledFieldKey<'a>) -> Option<u32>,
        select_recog: Selector<Flds>,
        on_done: fn(&mut Flds) -> Result<T, ReadError>,
        reset: fn(&mut Flds),
    ) -> Self {
        LabelledVTable {
            select_index,
            select_recog,
            on_done,
            reset,
        }
    }
}

impl<T, Flds> Clone for LabelledVTable<T, Flds> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, Flds> Copy for LabelledVTable<T, Flds> {}

/// The functions that determine how incoming events modify the state of an
/// [`OrdinalStructRecognizer`] or a [`DelegateStructRecognizer`].
pub struct OrdinalVTable<T, Flds> {
    select_index: for<'a> fn(OrdinalFieldKey<'a>) -> Option<u32>,
    select_recog: Selector<Flds>,
    on_done: fn(&mut Flds) -> Result<T, ReadError>,
    reset: fn(&mut Flds),
}

impl<T, Flds> OrdinalVTable<T, Flds> {
    pub fn new(
        select_index: for<'a> fn(OrdinalFieldKey<'a>) -> Option<u32>,
        select_recog: Selector<Flds>,
        on_done: fn(&mut Flds) -> Result<T, ReadError>,
        reset: fn(&mut Flds),
    ) -> Self {
        OrdinalVTable {
            select_index,
            select_recog,
            on_done,
            reset,
        }
    }
}

impl<T, Flds> Clone for OrdinalVTable<T, Flds> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, Flds> Copy for OrdinalVTable<T, Flds> {}

#[derive(Clone, Copy)]
enum LabelledStructState {
    Attrs,
    BodyBetween,
    BodyExpectingSlot,
    BodyItem,
}

/// Recognizes a record with a tag, optional header and attribute fields and labelled slots in
/// its body, for example `@Point{x:1,y:2}`. Each field has an index (the position of its
/// [`FieldSpec`]); a field that occurs twice or a required field that is missing when the record
/// ends is an error.
pub struct LabelledStructRecognizer<T, Flds> {
    attrs: RecordAttrs,
    state: LabelledStructState,
    fields: Flds,
    specs: &'static [FieldSpec],
    progress: Bitset,
    index: u32,
    vtable: LabelledVTable<T, Flds>,
}

impl<T, Flds> LabelledStructRecognizer<T, Flds> {
    /// #Arguments
    /// * `tag` - The expected name of the first attribute or an inidcation that it should be used
    /// to populate a field.
    /// * `fields` - The state of the recognizer state machine.
    /// * `specs` - The fields of the record, in index order.
    /// * `vtable` - Functions that determine how incoming events modify the state.
    pub fn new(
        tag: TagSpec,
        fields: Flds,
        specs: &'static [FieldSpec],
        vtable: LabelledVTable<T, Flds>,
    ) -> Self {
        LabelledStructRecognizer {
            attrs: RecordAttrs::new(tag),
            state: LabelledStructState::Attrs,
            fields,
            specs,
            progress: Bitset::new(specs.len() as u32),
            index: 0,
            vtable,
        }
    }
}

impl<T, Flds> Recognizer for LabelledStructRecognizer<T, Flds> {
    type Target = T;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let LabelledStructRecognizer {
            attrs,
            state,
            fields,
            specs,
            progress,
            index,
            vtable,
        } = self;
        let LabelledVTable {
            select_index,
            select_recog,
            on_done,
            ..
        } = *vtable;

        match *state {
            LabelledStructState::Attrs => {
                let step = attrs.feed(
                    input,
                    fields,
                    progress,
                    |key: AttrKey<'_>| select_index(key.into()),
                    select_recog,
                )?;
                match step {
                    Ok(AttrStep::Consumed) => None,
                    Ok(AttrStep::StartBody) => {
                        *state = LabelledStructState::BodyBetween;
                        None
                    }
                    Ok(AttrStep::Unmapped(name)) => Some(Err(ReadError::UnexpectedField(name))),
                    Err(e) => Some(Err(e)),
                }
            }
            LabelledStructState::BodyBetween => match input {
                ReadEvent::EndRecord => Some(complete(specs, progress, fields, on_done)),
                ReadEvent::TextValue(name) => match select_index(LabelledFieldKey::Item(&name)) {
                    Some(i) if progress.get(i) => Some(Err(ReadError::DuplicateField(name))),
                    Some(i) => {
                        *index = i;
                        *state = LabelledStructState::BodyExpectingSlot;
                        None
                    }
                    None => Some(Err(ReadError::UnexpectedField(name))),
                },
                ow => Some(Err(ow.kind_error(ExpectedEvent::Or(vec![
                    ExpectedEvent::EndOfRecord,
                    ExpectedEvent::ValueEvent(ValueKind::Text),
                ])))),
            },
            LabelledStructState::BodyExpectingSlot => {
                if matches!(&input, ReadEvent::Slot) {
                    *state = LabelledStructState::BodyItem;
                    None
                } else {
                    Some(Err(input.kind_error(ExpectedEvent::Slot)))
                }
            }
            LabelledStructState::BodyItem => {
                if let Err(e) = select_recog(fields, *index, input)? {
                    Some(Err(e))
                } else {
                    progress.set(*index);
                    *state = LabelledStructState::BodyBetween;
                    None
                }
            }
        }
    }

    fn reset(&mut self) {
        self.attrs.reset();
        self.state = LabelledStructState::Attrs;
        self.progress.clear();
        self.index = 0;
        (self.vtable.reset)(&mut self.fields);
    }
}

#[derive(Clone, Copy)]
enum OrdinalStructState {
    Attrs,
    BodyBetween,
    BodyItem,
}

/// Recognizes a record with a tag, optional header and attribute fields and a sequence of
/// unlabelled values in its body, for example `@Pair{1,2}`.
pub struct OrdinalStructRecognizer<T, Flds> {
    attrs: RecordAttrs,
    state: OrdinalStructState,
    fields: Flds,
    specs: &'static [FieldSpec],
    progress: Bitset,
    index: u32,
    vtable: OrdinalVTable<T, Flds>,
}

impl<T, Flds> OrdinalStructRecognizer<T, Flds> {
    /// #Arguments
    /// * `tag` - The expected name of the first attribute or an inidcation that it should be used
    /// to populate a field.
    /// * `fields` - The state of the recognizer state machine.
    /// * `specs` - The fields of the record, in index order.
    /// * `vtable` - Functions that determine how incoming events modify the state.
    pub fn new(
        tag: TagSpec,
        fields: Flds,
        specs: &'static [FieldSpec],
        vtable: OrdinalVTable<T, Flds>,
    ) -> Self {
        OrdinalStructRecognizer {
            attrs: RecordAttrs::new(tag),
            state: OrdinalStructState::Attrs,
            fields,
            specs,
            progress: Bitset::new(specs.len() as u32),
            index: 0,
            vtable,
        }
    }
}

impl<T, Flds> Recognizer for OrdinalStructRecognizer<T, Flds> {
    type Target = T;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let OrdinalStructRecognizer {
            attrs,
            state,
            fields,
            specs,
            progress,
            index,
            vtable,
        } = self;
        let OrdinalVTable {
            select_index,
            select_recog,
            on_done,
            ..
        } = *vtable;

        let feed_item = |fields: &mut Flds, progress: &mut Bitset, index: &mut u32, input| {
            if *index as usize >= specs.len() {
                return Some(Err(ReadError::UnexpectedItem));
            }
            if let Err(e) = select_recog(fields, *index, input)? {
                Some(Err(e))
            } else {
                progress.set(*index);
                *index += 1;
                Some(Ok(()))
            }
        };

        match *state {
            OrdinalStructState::Attrs => {
                let step = attrs.feed(
                    input,
                    fields,
                    progress,
                    |key: AttrKey<'_>| select_index(key.into()),
                    select_recog,
                )?;
                match step {
                    Ok(AttrStep::Consumed) => None,
                    Ok(AttrStep::StartBody) => {
                        *index = select_index(OrdinalFieldKey::FirstItem)
                            .unwrap_or(specs.len() as u32);
                        *state = OrdinalStructState::BodyBetween;
                        None
                    }
                    Ok(AttrStep::Unmapped(name)) => Some(Err(ReadError::UnexpectedField(name))),
                    Err(e) => Some(Err(e)),
                }
            }
            OrdinalStructState::BodyBetween if matches!(&input, ReadEvent::EndRecord) => {
                Some(complete(specs, progress, fields, on_done))
            }
            OrdinalStructState::BodyBetween | OrdinalStructState::BodyItem => {
                *state = OrdinalStructState::BodyItem;
                match feed_item(fields, progress, index, input) {
                    Some(Ok(())) => {
                        *state = OrdinalStructState::BodyBetween;
                        None
                    }
                    Some(Err(e)) => Some(Err(e)),
                    None => None,
                }
            }
        }
    }

    fn reset(&mut self) {
        self.attrs.reset();
        self.state = OrdinalStructState::Attrs;
        self.progress.clear();
        self.index = 0;
        (self.vtable.reset)(&mut self.fields);
    }
}

#[derive(Clone, Copy)]
enum DelegateStructState {
    Attrs,
    Delegated,
}

/// Recognizes a record where everything after the attributes that are mapped to fields (any
/// remaining attributes and the body) is delegated to a single field.
pub struct DelegateStructRecognizer<T, Flds> {
    attrs: RecordAttrs,
    state: DelegateStructState,
    fields: Flds,
    specs: &'static [FieldSpec],
    progress: Bitset,
    index: u32,
    vtable: OrdinalVTable<T, Flds>,
}

impl<T, Flds> DelegateStructRecognizer<T, Flds> {
    /// #Arguments
    /// * `tag` - The expected name of the first attribute or an inidcation that it should be used
    /// to populate a field.
    /// * `fields` - The state of the recognizer state machine.
    /// * `specs` - The fields of the record, in index order.
    /// * `vtable` - Functions that determine how incoming events modify the state. The
    /// delegate field is the one selected by [`OrdinalFieldKey::FirstItem`].
    pub fn new(
        tag: TagSpec,
        fields: Flds,
        specs: &'static [FieldSpec],
        vtable: OrdinalVTable<T, Flds>,
    ) -> Self {
        DelegateStructRecognizer {
            attrs: RecordAttrs::new(tag),
            state: DelegateStructState::Attrs,
            fields,
            specs,
            progress: Bitset::new(specs.len() as u32),
            index: 0,
            vtable,
        }
    }
}

impl<T, Flds> Recognizer for DelegateStructRecognizer<T, Flds> {
    type Target = T;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let DelegateStructRecognizer {
            attrs,
            state,
            fields,
            specs,
            progress,
            index,
            vtable,
        } = self;
        let OrdinalVTable {
            select_index,
            select_recog,
            on_done,
            ..
        } = *vtable;

        let delegated = match *state {
            DelegateStructState::Attrs => {
                let step = attrs.feed(
                    input,
                    fields,
                    progress,
                    |key: AttrKey<'_>| select_index(key.into()),
                    select_recog,
                )?;
                let first = match step {
                    Ok(AttrStep::Consumed) => return None,
                    Ok(AttrStep::StartBody) => ReadEvent::StartBody,
                    Ok(AttrStep::Unmapped(name)) => ReadEvent::StartAttribute(name),
                    Err(e) => return Some(Err(e)),
                };
                if let Some(i) = select_index(OrdinalFieldKey::FirstItem) {
                    *index = i;
                    *state = DelegateStructState::Delegated;
                    select_recog(fields, i, first)?
                } else if let ReadEvent::StartAttribute(name) = first {
                    return Some(Err(ReadError::UnexpectedField(name)));
                } else {
                    return Some(Err(ReadError::InconsistentState));
                }
            }
            DelegateStructState::Delegated => select_recog(fields, *index, input)?,
        };
        if let Err(e) = delegated {
            Some(Err(e))
        } else {
            progress.set(*index);
            Some(complete(specs, progress, fields, on_done))
        }
    }

    fn reset(&mut self) {
        self.attrs.reset();
        self.state = DelegateStructState::Attrs;
        self.progress.clear();
        self.index = 0;
        (self.vtable.reset)(&mut self.fields);
    }
}

fn no_fields(_: &mut (), _: u32, _: ReadEvent) -> Option<Result<(), ReadError>> {
    Some(Err(ReadError::InconsistentState))
}

/// Recognizer for records that consist of only a tag, for example `@Empty` or `@Empty{}`.
pub struct UnitStructRecognizer<T> {
    attrs: RecordAttrs,
    in_body: bool,
    on_done: fn() -> T,
}

impl<T> UnitStructRecognizer<T> {
    /// #Arguments
    /// * `tag` - The expected name of the tag attribute.
    /// * `on_done` - Factory to create an instance.
    pub fn new(tag: &'static str, on_done: fn() -> T) -> Self {
        UnitStructRecognizer {
            attrs: RecordAttrs::new(TagSpec::Fixed(tag)),
            in_body: false,
            on_done,
        }
    }
}

impl<T> Recognizer for UnitStructRecognizer<T> {
    type Target = T;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        if self.in_body {
            return Some(match input {
                ReadEvent::EndRecord => Ok((self.on_done)()),
                ow => Err(ow.kind_error(ExpectedEvent::EndOfRecord)),
            });
        }
        let mut progress = Bitset::new(0);
        match self
            .attrs
            .feed(input, &mut (), &mut progress, |_| None, no_fields)?
        {
            Ok(AttrStep::Consumed) => None,
            Ok(AttrStep::StartBody) => {
                self.in_body = true;
                None
            }
            Ok(AttrStep::Unmapped(name)) => Some(Err(ReadError::UnexpectedAttribute(name))),
            Err(e) => Some(Err(e)),
        }
    }

    fn reset(&mut self) {
        self.attrs.reset();
        self.in_body = false;
    }
}
