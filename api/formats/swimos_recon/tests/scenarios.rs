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

use num_bigint::BigInt;
use std::str::FromStr;
use std::sync::Once;
use swimos_form::structural::read::event::ReadEvent;
use swimos_form::structural::read::recognizer::primitive::{I32Recognizer, StringRecognizer};
use swimos_form::structural::read::recognizer::{
    feed_field, take_field, FieldSpec, LabelledFieldKey, LabelledStructRecognizer, LabelledVTable,
    OptionRecognizer, PolymorphicRecognizer, TagSpec, UnitStructRecognizer,
};
use swimos_form::structural::read::ReadError;
use swimos_form::Recognizer;
use swimos_model::{Item, Value};
use swimos_recon::{decode, decode_value, decode_with, DecodeError, Decoder};
use tracing::Level;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Point {
    x: i32,
    y: i32,
    label: Option<String>,
}

static POINT_FIELDS: [FieldSpec; 3] = [
    FieldSpec::required("x"),
    FieldSpec::required("y"),
    FieldSpec::optional("label"),
];

#[derive(Default)]
struct PointFields {
    x: Option<i32>,
    y: Option<i32>,
    label: Option<Option<String>>,
    x_rec: I32Recognizer,
    y_rec: I32Recognizer,
    label_rec: OptionRecognizer<StringRecognizer>,
}

fn point_index(key: LabelledFieldKey<'_>) -> Option<u32> {
    match key {
        LabelledFieldKey::Item("x") => Some(0),
        LabelledFieldKey::Item("y") => Some(1),
        LabelledFieldKey::Item("label") => Some(2),
        _ => None,
    }
}

fn point_select(
    fields: &mut PointFields,
    index: u32,
    event: ReadEvent,
) -> Option<Result<(), ReadError>> {
    match index {
        0 => feed_field("x", &mut fields.x, &mut fields.x_rec, event),
        1 => feed_field("y", &mut fields.y, &mut fields.y_rec, event),
        2 => feed_field("label", &mut fields.label, &mut fields.label_rec, event),
        _ => Some(Err(ReadError::InconsistentState)),
    }
}

fn point_done(fields: &mut PointFields) -> Result<Point, ReadError> {
    Ok(Point {
        x: take_field(&mut fields.x, "x")?,
        y: take_field(&mut fields.y, "y")?,
        label: take_field(&mut fields.label, "label")?,
    })
}

fn point_reset(fields: &mut PointFields) {
    *fields = PointFields::default();
}

fn point_recognizer() -> LabelledStructRecognizer<Point, PointFields> {
    LabelledStructRecognizer::new(
        TagSpec::Fixed("Point"),
        PointFields::default(),
        &POINT_FIELDS,
        LabelledVTable::new(point_index, point_select, point_done, point_reset),
    )
}

fn point(x: i32, y: i32) -> Point {
    Point { x, y, label: None }
}

#[test]
fn labelled_record() {
    init_tracing();
    assert_eq!(
        decode_with("@Point{x:1,y:2}", point_recognizer()),
        Ok(point(1, 2))
    );
    assert_eq!(
        decode_with("@Point{ y: 2, label: origin, x: 1 }", point_recognizer()),
        Ok(Point {
            x: 1,
            y: 2,
            label: Some("origin".to_string())
        })
    );
}

#[test]
fn labelled_record_in_fragments() {
    init_tracing();
    let mut decoder = Decoder::new(point_recognizer());
    assert_eq!(decoder.feed("@Point{x:1,"), Ok(None));
    assert_eq!(decoder.feed("y:2}"), Ok(Some(point(1, 2))));
    assert_eq!(decoder.finish(), Ok(None));
}

#[test]
fn duplicate_field() {
    init_tracing();
    for text in ["@Point{x:1,x:2}", "@Point{x:1,y:2,x:3}", "@Point{y:2,x:1,x:1}"] {
        assert_eq!(
            decode_with(text, point_recognizer()),
            Err(DecodeError::Structure(ReadError::DuplicateField(
                "x".to_string()
            ))),
            "{}",
            text
        );
    }
}

#[test]
fn missing_field() {
    init_tracing();
    assert_eq!(
        decode_with("@Point{y:2}", point_recognizer()),
        Err(DecodeError::Structure(ReadError::MissingFields(vec![
            "x".to_string()
        ])))
    );
}

#[test]
fn unknown_field() {
    init_tracing();
    assert_eq!(
        decode_with("@Point{x:1,y:2,z:3}", point_recognizer()),
        Err(DecodeError::Structure(ReadError::UnexpectedField(
            "z".to_string()
        )))
    );
}

#[test]
fn overflowing_integer() {
    init_tracing();
    let text = "123456789012345678901234567890";
    let expected = BigInt::from_str(text).ok();
    assert!(expected.is_some());
    assert_eq!(decode::<BigInt>(text).ok(), expected);
    assert_eq!(decode_value(text).ok(), expected.map(Value::BigInt));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    A,
    B,
}

fn variants() -> PolymorphicRecognizer<Variant> {
    PolymorphicRecognizer::default()
        .with(UnitStructRecognizer::new("A", || Variant::A))
        .with(UnitStructRecognizer::new("B", || Variant::B))
}

#[test]
fn polymorphic_records() {
    init_tracing();
    assert_eq!(decode_with("@A{}", variants()), Ok(Variant::A));
    assert_eq!(decode_with("@B{}", variants()), Ok(Variant::B));
    assert_eq!(decode_with("@B", variants()), Ok(Variant::B));
    assert_eq!(
        decode_with("@C{}", variants()),
        Err(DecodeError::Structure(ReadError::TagMismatch))
    );
}

#[test]
fn polymorphic_recognizer_is_reusable() {
    init_tracing();
    let mut recognizer = variants();
    assert_eq!(decode_with("@B{}", &mut recognizer), Ok(Variant::B));
    recognizer.reset();
    assert_eq!(decode_with("@A{}", &mut recognizer), Ok(Variant::A));
}

#[test]
fn untyped_record() {
    init_tracing();
    let inner = Value::from_vec(vec![Item::slot("a", 3)]);
    assert_eq!(
        decode_value("{1,2,{a:3}}"),
        Ok(Value::from_vec(vec![Item::of(1), Item::of(2), Item::of(inner)]))
    );
}
