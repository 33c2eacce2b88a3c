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

mod header;
mod polymorphic;
/// [`Recognizer`] implementations for basic types.
pub mod primitive;
mod structure;
#[cfg(test)]
mod tests;

pub use header::{header_recognizer, HeaderFieldKey, HeaderRecognizer, HeaderVTable};
pub use polymorphic::PolymorphicRecognizer;
pub use structure::{
    take_field, Bitset, DelegateStructRecognizer, FieldSpec, LabelledFieldKey,
    LabelledStructRecognizer, LabelledVTable, OrdinalFieldKey, OrdinalStructRecognizer,
    OrdinalVTable, TagSpec, UnitStructRecognizer,
};

use crate::structural::read::error::ExpectedEvent;
use crate::structural::read::event::ReadEvent;
use crate::structural::read::materializers::value::ValueMaterializer;
use crate::structural::read::ReadError;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use swimos_model::{Blob, Value};

/// Types that can be read from a stream of [`ReadEvent`]s.
pub trait RecognizerReadable: Sized {
    type Rec: Recognizer<Target = Self>;
    type AttrRec: Recognizer<Target = Self>;
    type BodyRec: Recognizer<Target = Self>;

    /// A recognizer for a complete value of the type.
    fn make_recognizer() -> Self::Rec;

    /// A recognizer for a value of the type inside an attribute that has already been opened. It
    /// consumes the closing [`ReadEvent::EndAttribute`]. A record with no attributes may appear
    /// there either nested, as in `@a({1,2})`, or spread over the attribute body, as in `@a(1,2)`.
    fn make_attr_recognizer() -> Self::AttrRec;

    /// A recognizer for a value that makes up the remainder of an enclosing record. This only
    /// differs from [`RecognizerReadable::make_recognizer`] for simple types and [`Value`].
    fn make_body_recognizer() -> Self::BodyRec;

    /// The value of a record field of this type that never occurred, if the field may be left out.
    fn on_absent() -> Option<Self> {
        None
    }

    /// Whether a value of the type is always read from exactly one event.
    fn is_simple() -> bool {
        false
    }
}

/// An incremental state machine that builds a value from [`ReadEvent`]s. After producing a result
/// (a value or an error) it must be reset before it is fed again.
pub trait Recognizer {
    type Target;

    /// Consume one event. `None` means that more events are needed.
    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>>;

    /// Complete the value from the events seen so far, where the type permits it. Called when the
    /// input ends without the recognizer having produced a result.
    fn try_flush(&mut self) -> Option<Result<Self::Target, ReadError>> {
        None
    }

    fn reset(&mut self);
}

macro_rules! forward_recognizer {
    ($($ptr:ty),*) => {
        $(
            impl<R: Recognizer + ?Sized> Recognizer for $ptr {
                type Target = R::Target;

                fn feed_event(&mut self, input: ReadEvent) -> Option<Result<R::Target, ReadError>> {
                    R::feed_event(self, input)
                }

                fn try_flush(&mut self) -> Option<Result<R::Target, ReadError>> {
                    R::try_flush(self)
                }

                fn reset(&mut self) {
                    R::reset(self)
                }
            }
        )*
    };
}

forward_recognizer!(Box<R>, &mut R);

/// A type-erased [`Recognizer`] that can be moved between threads.
pub type BoxedRecognizer<T> = Box<dyn Recognizer<Target = T> + Send>;

/// Feeds an event to the recognizer of the field with the given index, storing the value in the
/// fields of the record when it completes.
pub type Selector<Flds> = fn(&mut Flds, u32, ReadEvent) -> Option<Result<(), ReadError>>;

/// The event that closes the sequence of events for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// A record body. The recognizer consumes the opening [`ReadEvent::StartBody`] and the final
    /// [`ReadEvent::EndRecord`].
    Record,
    /// The body of an attribute that is already open, up to [`ReadEvent::EndAttribute`].
    Attribute,
}

impl Bounds {
    fn is_open_at_start(self) -> bool {
        matches!(self, Bounds::Attribute)
    }

    fn closes(self, event: &ReadEvent) -> bool {
        matches!(
            (self, event),
            (Bounds::Record, ReadEvent::EndRecord) | (Bounds::Attribute, ReadEvent::EndAttribute)
        )
    }

    fn closing(self) -> ExpectedEvent {
        match self {
            Bounds::Record => ExpectedEvent::EndOfRecord,
            Bounds::Attribute => ExpectedEvent::EndOfAttribute,
        }
    }
}

fn expect_start_body(input: ReadEvent) -> Result<(), ReadError> {
    match input {
        ReadEvent::StartBody => Ok(()),
        ow => Err(ow.kind_error(ExpectedEvent::RecordBody)),
    }
}

enum EnclosedState<T> {
    Opening,
    Content,
    Closing(Option<T>),
}

/// Reads a single value that is the only content of a record body (`{3}`) or of an attribute
/// body (`@a(3)`).
pub struct Enclosed<R: Recognizer> {
    bounds: Bounds,
    state: EnclosedState<R::Target>,
    inner: R,
}

impl<R: Recognizer> Enclosed<R> {
    pub fn record_body(inner: R) -> Self {
        Enclosed::new(Bounds::Record, inner)
    }

    pub fn attr_body(inner: R) -> Self {
        Enclosed::new(Bounds::Attribute, inner)
    }

    fn new(bounds: Bounds, inner: R) -> Self {
        Enclosed {
            bounds,
            state: Self::start(bounds),
            inner,
        }
    }

    fn start(bounds: Bounds) -> EnclosedState<R::Target> {
        if bounds.is_open_at_start() {
            EnclosedState::Content
        } else {
            EnclosedState::Opening
        }
    }
}

impl<R: Recognizer> Recognizer for Enclosed<R> {
    type Target = R::Target;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let Enclosed {
            bounds,
            state,
            inner,
        } = self;
        match state {
            EnclosedState::Opening => match expect_start_body(input) {
                Ok(()) => {
                    *state = EnclosedState::Content;
                    None
                }
                Err(e) => Some(Err(e)),
            },
            EnclosedState::Content => match inner.feed_event(input)? {
                Ok(value) => {
                    *state = EnclosedState::Closing(Some(value));
                    None
                }
                Err(e) => Some(Err(e)),
            },
            EnclosedState::Closing(value) if bounds.closes(&input) => {
                Some(value.take().ok_or(ReadError::InconsistentState))
            }
            EnclosedState::Closing(_) => Some(Err(input.kind_error(bounds.closing()))),
        }
    }

    fn reset(&mut self) {
        self.state = Self::start(self.bounds);
        self.inner.reset();
    }
}

macro_rules! simple_readable {
    ($($target:ty => $recog:ident),* $(,)?) => {
        $(
            impl RecognizerReadable for $target {
                type Rec = primitive::$recog;
                type AttrRec = Enclosed<primitive::$recog>;
                type BodyRec = Enclosed<primitive::$recog>;

                fn make_recognizer() -> Self::Rec {
                    primitive::$recog
                }

                fn make_attr_recognizer() -> Self::AttrRec {
                    Enclosed::attr_body(primitive::$recog)
                }

                fn make_body_recognizer() -> Self::BodyRec {
                    Enclosed::record_body(primitive::$recog)
                }

                fn is_simple() -> bool {
                    true
                }
            }
        )*
    };
}

simple_readable! {
    () => UnitRecognizer,
    bool => BoolRecognizer,
    i32 => I32Recognizer,
    i64 => I64Recognizer,
    u32 => U32Recognizer,
    u64 => U64Recognizer,
    usize => UsizeRecognizer,
    f32 => F32Recognizer,
    f64 => F64Recognizer,
    BigInt => BigIntRecognizer,
    BigDecimal => BigDecimalRecognizer,
    String => StringRecognizer,
    Vec<u8> => DataRecognizer,
}

type BlobRec = MappedRecognizer<primitive::DataRecognizer, fn(Vec<u8>) -> Blob>;

impl RecognizerReadable for Blob {
    type Rec = BlobRec;
    type AttrRec = Enclosed<BlobRec>;
    type BodyRec = Enclosed<BlobRec>;

    fn make_recognizer() -> Self::Rec {
        MappedRecognizer::new(primitive::DataRecognizer, Blob::from_vec)
    }

    fn make_attr_recognizer() -> Self::AttrRec {
        Enclosed::attr_body(Self::make_recognizer())
    }

    fn make_body_recognizer() -> Self::BodyRec {
        Enclosed::record_body(Self::make_recognizer())
    }

    fn is_simple() -> bool {
        true
    }
}

#[derive(Clone, Copy)]
enum SeqState {
    Opening,
    BetweenItems,
    InItem,
}

/// Reads the items of a record body (or an attribute body) as a sequence of values of the same
/// type.
pub struct SeqRecognizer<R: Recognizer> {
    bounds: Bounds,
    state: SeqState,
    items: Vec<R::Target>,
    item: R,
}

impl<R: Recognizer> SeqRecognizer<R> {
    pub fn new(bounds: Bounds, item: R) -> Self {
        SeqRecognizer {
            bounds,
            state: Self::start(bounds),
            items: vec![],
            item,
        }
    }

    fn start(bounds: Bounds) -> SeqState {
        if bounds.is_open_at_start() {
            SeqState::BetweenItems
        } else {
            SeqState::Opening
        }
    }
}

impl<R: Recognizer> Recognizer for SeqRecognizer<R> {
    type Target = Vec<R::Target>;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        match self.state {
            SeqState::Opening => match expect_start_body(input) {
                Ok(()) => {
                    self.state = SeqState::BetweenItems;
                    None
                }
                Err(e) => Some(Err(e)),
            },
            SeqState::BetweenItems if self.bounds.closes(&input) => {
                Some(Ok(std::mem::take(&mut self.items)))
            }
            SeqState::BetweenItems | SeqState::InItem => {
                self.state = SeqState::InItem;
                let item = match self.item.feed_event(input)? {
                    Ok(item) => item,
                    Err(e) => return Some(Err(e)),
                };
                self.items.push(item);
                self.item.reset();
                self.state = SeqState::BetweenItems;
                None
            }
        }
    }

    fn reset(&mut self) {
        self.state = Self::start(self.bounds);
        self.items.clear();
        self.item.reset();
    }
}

impl<T: RecognizerReadable> RecognizerReadable for Vec<T> {
    type Rec = SeqRecognizer<T::Rec>;
    type AttrRec = FirstOf<SeqRecognizer<T::Rec>, Enclosed<SeqRecognizer<T::Rec>>>;
    type BodyRec = SeqRecognizer<T::Rec>;

    fn make_recognizer() -> Self::Rec {
        SeqRecognizer::new(Bounds::Record, T::make_recognizer())
    }

    fn make_attr_recognizer() -> Self::AttrRec {
        let spread = SeqRecognizer::new(Bounds::Attribute, T::make_recognizer());
        FirstOf::new(spread, Enclosed::attr_body(Self::make_recognizer()))
    }

    fn make_body_recognizer() -> Self::BodyRec {
        Self::make_recognizer()
    }
}

/// Feeds a candidate of a [`FirstOf`] that has not yet failed, keeping its error if it does.
fn feed_candidate<R: Recognizer>(
    candidate: &mut R,
    failure: &mut Option<ReadError>,
    input: ReadEvent,
) -> Option<R::Target> {
    match candidate.feed_event(input)? {
        Ok(value) => Some(value),
        Err(e) => {
            *failure = Some(e);
            None
        }
    }
}

/// Races two recognizers for the same type over the same events. The first to produce a value
/// wins (the left one if both complete on the same event). A candidate that fails is no longer
/// fed and once both have failed the error of the right candidate is returned, whichever order
/// they failed in.
pub struct FirstOf<R1, R2> {
    left: R1,
    right: R2,
    left_failure: Option<ReadError>,
    right_failure: Option<ReadError>,
}

impl<R1, R2> FirstOf<R1, R2>
where
    R1: Recognizer,
    R2: Recognizer<Target = R1::Target>,
{
    pub fn new(left: R1, right: R2) -> Self {
        FirstOf {
            left,
            right,
            left_failure: None,
            right_failure: None,
        }
    }
}

impl<R1, R2> Recognizer for FirstOf<R1, R2>
where
    R1: Recognizer,
    R2: Recognizer<Target = R1::Target>,
{
    type Target = R1::Target;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let FirstOf {
            left,
            right,
            left_failure,
            right_failure,
        } = self;
        let winner = match (left_failure.is_none(), right_failure.is_none()) {
            (true, true) => feed_candidate(left, left_failure, input.clone())
                .or_else(|| feed_candidate(right, right_failure, input)),
            (true, false) => feed_candidate(left, left_failure, input),
            (false, true) => feed_candidate(right, right_failure, input),
            (false, false) => return Some(Err(ReadError::InconsistentState)),
        };
        match (winner, &*left_failure, &*right_failure) {
            (Some(value), _, _) => Some(Ok(value)),
            (None, Some(_), Some(cause)) => Some(Err(cause.clone())),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.left_failure = None;
        self.right_failure = None;
        self.left.reset();
        self.right.reset();
    }
}

/// Transforms the value produced by another recognizer.
pub struct MappedRecognizer<R, F> {
    delegate: R,
    transform: F,
}

impl<R, F> MappedRecognizer<R, F> {
    pub fn new(delegate: R, transform: F) -> Self {
        MappedRecognizer {
            delegate,
            transform,
        }
    }
}

impl<U, R, F> Recognizer for MappedRecognizer<R, F>
where
    R: Recognizer,
    F: Fn(R::Target) -> U,
{
    type Target = U;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<U, ReadError>> {
        let result = self.delegate.feed_event(input)?;
        Some(result.map(&self.transform))
    }

    fn try_flush(&mut self) -> Option<Result<U, ReadError>> {
        let result = self.delegate.try_flush()?;
        Some(result.map(&self.transform))
    }

    fn reset(&mut self) {
        self.delegate.reset()
    }
}

macro_rules! pointer_readable {
    ($($ptr:ident),*) => {
        $(
            impl<T: RecognizerReadable> RecognizerReadable for $ptr<T> {
                type Rec = MappedRecognizer<T::Rec, fn(T) -> $ptr<T>>;
                type AttrRec = MappedRecognizer<T::AttrRec, fn(T) -> $ptr<T>>;
                type BodyRec = MappedRecognizer<T::BodyRec, fn(T) -> $ptr<T>>;

                fn make_recognizer() -> Self::Rec {
                    MappedRecognizer::new(T::make_recognizer(), $ptr::new)
                }

                fn make_attr_recognizer() -> Self::AttrRec {
                    MappedRecognizer::new(T::make_attr_recognizer(), $ptr::new)
                }

                fn make_body_recognizer() -> Self::BodyRec {
                    MappedRecognizer::new(T::make_body_recognizer(), $ptr::new)
                }

                fn on_absent() -> Option<Self> {
                    T::on_absent().map($ptr::new)
                }

                fn is_simple() -> bool {
                    T::is_simple()
                }
            }
        )*
    };
}

pointer_readable!(Box, Arc);

/// Reads an optional value. A lone [`ReadEvent::Extant`] that the inner recognizer rejects is
/// read as `None`.
#[derive(Default)]
pub struct OptionRecognizer<R> {
    inner: R,
    started: bool,
}

impl<R> OptionRecognizer<R> {
    pub fn new(inner: R) -> Self {
        OptionRecognizer {
            inner,
            started: false,
        }
    }
}

impl<R: Recognizer> Recognizer for OptionRecognizer<R> {
    type Target = Option<R::Target>;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let first = !std::mem::replace(&mut self.started, true);
        let is_extant = matches!(input, ReadEvent::Extant);
        match self.inner.feed_event(input)? {
            Err(_) if first && is_extant => Some(Ok(None)),
            result => Some(result.map(Some)),
        }
    }

    fn try_flush(&mut self) -> Option<Result<Self::Target, ReadError>> {
        match self.inner.try_flush() {
            Some(Ok(value)) => Some(Ok(Some(value))),
            _ => Some(Ok(None)),
        }
    }

    fn reset(&mut self) {
        self.started = false;
        self.inner.reset();
    }
}

/// Reads an empty record body (`{}`) or an empty attribute body as `None`.
pub struct AbsentRecognizer<T> {
    bounds: Bounds,
    opened: bool,
    _type: PhantomData<fn() -> Option<T>>,
}

impl<T> AbsentRecognizer<T> {
    pub fn new(bounds: Bounds) -> Self {
        AbsentRecognizer {
            bounds,
            opened: false,
            _type: PhantomData,
        }
    }
}

impl<T> Recognizer for AbsentRecognizer<T> {
    type Target = Option<T>;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let AbsentRecognizer { bounds, opened, .. } = self;
        let may_close = *opened || bounds.is_open_at_start();
        if may_close && bounds.closes(&input) {
            return Some(Ok(None));
        }
        // An attribute with no body reports a single extant value before it closes.
        let opening = match bounds {
            Bounds::Record => matches!(input, ReadEvent::StartBody),
            Bounds::Attribute => matches!(input, ReadEvent::Extant),
        };
        if opening && !*opened {
            *opened = true;
            None
        } else if may_close {
            Some(Err(input.kind_error(bounds.closing())))
        } else {
            Some(Err(input.kind_error(ExpectedEvent::RecordBody)))
        }
    }

    fn reset(&mut self) {
        self.opened = false;
    }
}

type Present<R, T> = MappedRecognizer<R, fn(T) -> Option<T>>;

impl<T: RecognizerReadable> RecognizerReadable for Option<T> {
    type Rec = OptionRecognizer<T::Rec>;
    type AttrRec = FirstOf<AbsentRecognizer<T>, Present<T::AttrRec, T>>;
    type BodyRec = FirstOf<AbsentRecognizer<T>, Present<T::BodyRec, T>>;

    fn make_recognizer() -> Self::Rec {
        OptionRecognizer::new(T::make_recognizer())
    }

    fn make_attr_recognizer() -> Self::AttrRec {
        FirstOf::new(
            AbsentRecognizer::new(Bounds::Attribute),
            MappedRecognizer::new(T::make_attr_recognizer(), Some),
        )
    }

    fn make_body_recognizer() -> Self::BodyRec {
        FirstOf::new(
            AbsentRecognizer::new(Bounds::Record),
            MappedRecognizer::new(T::make_body_recognizer(), Some),
        )
    }

    fn on_absent() -> Option<Self> {
        Some(None)
    }

    fn is_simple() -> bool {
        T::is_simple()
    }
}

impl RecognizerReadable for Value {
    type Rec = ValueMaterializer;
    type AttrRec = ValueMaterializer;
    type BodyRec = ValueMaterializer;

    fn make_recognizer() -> Self::Rec {
        ValueMaterializer::default()
    }

    fn make_attr_recognizer() -> Self::AttrRec {
        ValueMaterializer::attr_body()
    }

    fn make_body_recognizer() -> Self::BodyRec {
        ValueMaterializer::delegated_body()
    }
}

enum MapState<K> {
    Opening,
    BetweenEntries,
    InKey,
    AwaitingSlot(K),
    InValue(K),
}

/// Reads a [`HashMap`] from the slots of a record body (`{a:1,b:2}`). A repeated key replaces the
/// earlier entry.
pub struct MapRecognizer<RK: Recognizer, RV: Recognizer> {
    bounds: Bounds,
    state: MapState<RK::Target>,
    entries: HashMap<RK::Target, RV::Target>,
    key_rec: RK,
    value_rec: RV,
}

impl<RK: Recognizer, RV: Recognizer> MapRecognizer<RK, RV> {
    pub fn new(bounds: Bounds, key_rec: RK, value_rec: RV) -> Self {
        MapRecognizer {
            bounds,
            state: Self::start(bounds),
            entries: HashMap::new(),
            key_rec,
            value_rec,
        }
    }

    fn start(bounds: Bounds) -> MapState<RK::Target> {
        if bounds.is_open_at_start() {
            MapState::BetweenEntries
        } else {
            MapState::Opening
        }
    }
}

impl<RK, RV> Recognizer for MapRecognizer<RK, RV>
where
    RK: Recognizer,
    RV: Recognizer,
    RK::Target: Eq + Hash,
{
    type Target = HashMap<RK::Target, RV::Target>;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let MapRecognizer {
            bounds,
            state,
            entries,
            key_rec,
            value_rec,
        } = self;
        match state {
            MapState::Opening => match expect_start_body(input) {
                Ok(()) => {
                    *state = MapState::BetweenEntries;
                    None
                }
                Err(e) => Some(Err(e)),
            },
            MapState::BetweenEntries if bounds.closes(&input) => Some(Ok(std::mem::take(entries))),
            MapState::BetweenEntries | MapState::InKey => {
                *state = MapState::InKey;
                match key_rec.feed_event(input)? {
                    Ok(key) => {
                        key_rec.reset();
                        *state = MapState::AwaitingSlot(key);
                        None
                    }
                    Err(e) => Some(Err(e)),
                }
            }
            MapState::AwaitingSlot(_) => {
                if !matches!(input, ReadEvent::Slot) {
                    return Some(Err(input.kind_error(ExpectedEvent::Slot)));
                }
                if let MapState::AwaitingSlot(key) =
                    std::mem::replace(state, MapState::BetweenEntries)
                {
                    *state = MapState::InValue(key);
                }
                None
            }
            MapState::InValue(_) => {
                let value = match value_rec.feed_event(input)? {
                    Ok(value) => value,
                    Err(e) => return Some(Err(e)),
                };
                value_rec.reset();
                match std::mem::replace(state, MapState::BetweenEntries) {
                    MapState::InValue(key) => {
                        entries.insert(key, value);
                        None
                    }
                    _ => Some(Err(ReadError::InconsistentState)),
                }
            }
        }
    }

    fn reset(&mut self) {
        self.state = Self::start(self.bounds);
        self.entries.clear();
        self.key_rec.reset();
        self.value_rec.reset();
    }
}

impl<K, V> RecognizerReadable for HashMap<K, V>
where
    K: Eq + Hash + RecognizerReadable,
    V: RecognizerReadable,
{
    type Rec = MapRecognizer<K::Rec, V::Rec>;
    type AttrRec = MapRecognizer<K::Rec, V::Rec>;
    type BodyRec = MapRecognizer<K::Rec, V::Rec>;

    fn make_recognizer() -> Self::Rec {
        MapRecognizer::new(Bounds::Record, K::make_recognizer(), V::make_recognizer())
    }

    fn make_attr_recognizer() -> Self::AttrRec {
        MapRecognizer::new(Bounds::Attribute, K::make_recognizer(), V::make_recognizer())
    }

    fn make_body_recognizer() -> Self::BodyRec {
        Self::make_recognizer()
    }
}

/// Feeds an event to the recognizer of one field of a record, storing the value when it
/// completes. Fails with [`ReadError::DuplicateField`] if the field already has a value.
pub fn feed_field<R: Recognizer>(
    name: &'static str,
    field: &mut Option<R::Target>,
    recognizer: &mut R,
    event: ReadEvent,
) -> Option<Result<(), ReadError>> {
    if field.is_some() {
        return Some(Err(ReadError::DuplicateField(name.to_owned())));
    }
    let result = recognizer.feed_event(event)?;
    Some(result.map(|value| *field = Some(value)))
}
