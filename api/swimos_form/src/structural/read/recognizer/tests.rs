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


use super::primitive::{I32Recognizer, StringRecognizer};
use super::*;
use swimos_model::{Item, ValueKind};

fn run_recognizer<R: Recognizer>(
    events: Vec<ReadEvent>,
    rec: &mut R,
) -> Result<R::Target, ReadError> {
    let mut result = None;
    for event in events.into_iter() {
        if result.is_none() {
            result = rec.feed_event(event);
        } else {
            panic!("Not all input was consumed.");
        }
    }
    if result.is_none() {
        result = rec.try_flush();
    }
    match result {
        Some(r) => r,
        _ => panic!("Record not complete."),
    }
}

fn attr(name: &str) -> ReadEvent {
    ReadEvent::StartAttribute(name.to_string())
}

#[test]
fn vec_recognizer() {
    let mut rec = SeqRecognizer::new(Bounds::Record, I32Recognizer);

    let events = vec![
        ReadEvent::StartBody,
        ReadEvent::from(1),
        ReadEvent::from(2),
        ReadEvent::from(3),
        ReadEvent::EndRecord,
    ];

    assert_eq!(run_recognizer(events, &mut rec), Ok(vec![1, 2, 3]));
}

#[test]
fn vec_recognizer_in_attr_body() {
    let mut rec = <Vec<i32> as RecognizerReadable>::make_attr_recognizer();
    let flattened = vec![1.into(), 2.into(), ReadEvent::EndAttribute];
    assert_eq!(run_recognizer(flattened, &mut rec), Ok(vec![1, 2]));

    rec.reset();
    let nested = vec![
        ReadEvent::StartBody,
        1.into(),
        2.into(),
        ReadEvent::EndRecord,
        ReadEvent::EndAttribute,
    ];
    assert_eq!(run_recognizer(nested, &mut rec), Ok(vec![1, 2]));
}

#[test]
fn option_recognizer() {
    let mut rec = <Option<i32> as RecognizerReadable>::make_recognizer();
    assert_eq!(run_recognizer(vec![ReadEvent::Extant], &mut rec), Ok(None));
    rec.reset();
    assert_eq!(run_recognizer(vec![5.into()], &mut rec), Ok(Some(5)));
}

#[test]
fn hash_map_recognizer() {
    let mut rec = <HashMap<String, i32> as RecognizerReadable>::make_recognizer();
    let events = vec![
        ReadEvent::StartBody,
        "a".into(),
        ReadEvent::Slot,
        1.into(),
        "b".into(),
        ReadEvent::Slot,
        2.into(),
        ReadEvent::EndRecord,
    ];
    let mut expected = HashMap::new();
    expected.insert("a".to_string(), 1);
    expected.insert("b".to_string(), 2);
    assert_eq!(run_recognizer(events, &mut rec), Ok(expected));

    rec.reset();
    let bad = vec![ReadEvent::StartBody, "a".into(), 1.into()];
    assert!(matches!(
        run_recognizer(bad, &mut rec),
        Err(ReadError::UnexpectedKind {
            actual: ValueKind::Int32,
            ..
        })
    ));
}

#[test]
fn integral_range_checks() {
    let mut rec = <u32 as RecognizerReadable>::make_recognizer();
    assert_eq!(run_recognizer(vec![(-1).into()], &mut rec), Err(ReadError::NumberOutOfRange));
    let mut rec = <i32 as RecognizerReadable>::make_recognizer();
    assert_eq!(
        run_recognizer(vec![ReadEvent::from(i64::MAX)], &mut rec),
        Err(ReadError::NumberOutOfRange)
    );
    let mut rec = <i64 as RecognizerReadable>::make_recognizer();
    assert_eq!(run_recognizer(vec![7.into()], &mut rec), Ok(7i64));
}

#[test]
fn simple_value_in_record_body() {
    let mut rec = <i32 as RecognizerReadable>::make_body_recognizer();
    let events = vec![ReadEvent::StartBody, 3.into(), ReadEvent::EndRecord];
    assert_eq!(run_recognizer(events, &mut rec), Ok(3));
}

fn singleton(n: i32) -> Vec<i32> {
    vec![n]
}

#[test]
fn first_of_takes_whichever_completes() {
    let mut rec = FirstOf::new(
        <Vec<i32> as RecognizerReadable>::make_recognizer(),
        MappedRecognizer::new(I32Recognizer, singleton),
    );
    assert_eq!(run_recognizer(vec![4.into()], &mut rec), Ok(vec![4]));

    rec.reset();
    let events = vec![ReadEvent::StartBody, 1.into(), 2.into(), ReadEvent::EndRecord];
    assert_eq!(run_recognizer(events, &mut rec), Ok(vec![1, 2]));
}

#[test]
fn first_of_reports_right_error_when_right_fails_first() {
    let mut rec = FirstOf::new(
        <Vec<i32> as RecognizerReadable>::make_recognizer(),
        MappedRecognizer::new(I32Recognizer, singleton),
    );
    let events = vec![ReadEvent::StartBody, "text".into()];
    assert_eq!(
        run_recognizer(events, &mut rec),
        Err(ReadEvent::StartBody.kind_error(ExpectedEvent::ValueEvent(ValueKind::Int32)))
    );
}

#[test]
fn first_of_reports_right_error_when_left_fails_first() {
    let mut rec = FirstOf::new(
        MappedRecognizer::new(I32Recognizer, singleton),
        <Vec<i32> as RecognizerReadable>::make_recognizer(),
    );
    let events = vec![ReadEvent::StartBody, "text".into()];
    assert_eq!(
        run_recognizer(events, &mut rec),
        Err(ReadError::UnexpectedKind {
            actual: ValueKind::Text,
            expected: Some(ExpectedEvent::ValueEvent(ValueKind::Int32)),
        })
    );
}

#[test]
fn first_of_is_reusable_after_failure() {
    let mut rec = FirstOf::new(
        MappedRecognizer::new(I32Recognizer, singleton),
        <Vec<i32> as RecognizerReadable>::make_recognizer(),
    );
    assert!(run_recognizer(vec![true.into()], &mut rec).is_err());
    rec.reset();
    assert_eq!(run_recognizer(vec![9.into()], &mut rec), Ok(vec![9]));
}

#[test]
fn option_in_attr_body() {
    let mut rec = <Option<i32> as RecognizerReadable>::make_attr_recognizer();
    assert_eq!(
        run_recognizer(vec![ReadEvent::EndAttribute], &mut rec),
        Ok(None)
    );

    rec.reset();
    let extant = vec![ReadEvent::Extant, ReadEvent::EndAttribute];
    assert_eq!(run_recognizer(extant, &mut rec), Ok(None));

    rec.reset();
    let present = vec![5.into(), ReadEvent::EndAttribute];
    assert_eq!(run_recognizer(present, &mut rec), Ok(Some(5)));

    rec.reset();
    let wrong = vec!["x".into()];
    assert_eq!(
        run_recognizer(wrong, &mut rec),
        Err(ReadError::UnexpectedKind {
            actual: ValueKind::Text,
            expected: Some(ExpectedEvent::ValueEvent(ValueKind::Int32)),
        })
    );
}

#[test]
fn option_in_record_body() {
    let mut rec = <Option<String> as RecognizerReadable>::make_body_recognizer();
    let empty = vec![ReadEvent::StartBody, ReadEvent::EndRecord];
    assert_eq!(run_recognizer(empty, &mut rec), Ok(None));

    rec.reset();
    let present = vec![ReadEvent::StartBody, "a".into(), ReadEvent::EndRecord];
    assert_eq!(run_recognizer(present, &mut rec), Ok(Some("a".to_string())));
}

#[test]
fn simple_value_in_attr_body() {
    let mut rec = <bool as RecognizerReadable>::make_attr_recognizer();
    assert_eq!(
        run_recognizer(vec![true.into(), ReadEvent::EndAttribute], &mut rec),
        Ok(true)
    );

    rec.reset();
    let events = vec![true.into(), false.into()];
    assert_eq!(
        run_recognizer(events, &mut rec),
        Err(ReadError::UnexpectedKind {
            actual: ValueKind::Boolean,
            expected: Some(ExpectedEvent::EndOfAttribute),
        })
    );
}

#[test]
fn boxed_values() {
    let mut rec = <Box<i32> as RecognizerReadable>::make_recognizer();
    assert_eq!(run_recognizer(vec![2.into()], &mut rec), Ok(Box::new(2)));
    assert!(<Arc<Option<i32>> as RecognizerReadable>::on_absent().is_some());
}

#[derive(Debug, PartialEq, Eq)]
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

fn point_events(body: Vec<ReadEvent>) -> Vec<ReadEvent> {
    let mut events = vec![attr("Point"), ReadEvent::EndAttribute, ReadEvent::StartBody];
    events.extend(body);
    events.push(ReadEvent::EndRecord);
    events
}

#[test]
fn labelled_struct_recognizer() {
    let mut rec = point_recognizer();
    let events = point_events(vec![
        "y".into(),
        ReadEvent::Slot,
        2.into(),
        "x".into(),
        ReadEvent::Slot,
        1.into(),
    ]);
    assert_eq!(
        run_recognizer(events, &mut rec),
        Ok(Point {
            x: 1,
            y: 2,
            label: None
        })
    );

    rec.reset();
    let events = point_events(vec![
        "x".into(),
        ReadEvent::Slot,
        1.into(),
        "label".into(),
        ReadEvent::Slot,
        "origin".into(),
        "y".into(),
        ReadEvent::Slot,
        2.into(),
    ]);
    assert_eq!(
        run_recognizer(events, &mut rec),
        Ok(Point {
            x: 1,
            y: 2,
            label: Some("origin".to_string())
        })
    );
}

#[test]
fn labelled_struct_duplicate_field() {
    let mut rec = point_recognizer();
    let events = vec![
        attr("Point"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        "x".into(),
        ReadEvent::Slot,
        1.into(),
        "x".into(),
    ];
    assert_eq!(
        run_recognizer(events, &mut rec),
        Err(ReadError::DuplicateField("x".to_string()))
    );
}

#[test]
fn labelled_struct_missing_fields() {
    let mut rec = point_recognizer();
    let events = point_events(vec!["label".into(), ReadEvent::Slot, "p".into()]);
    let result = run_recognizer(events, &mut rec);
    assert_eq!(
        result,
        Err(ReadError::MissingFields(vec!["x".to_string(), "y".to_string()]))
    );
    if let Err(e) = result {
        assert_eq!(e.to_string(), "Fields [x, y] are required.");
    }
}

#[test]
fn labelled_struct_bad_tag_and_field() {
    let mut rec = point_recognizer();
    assert_eq!(
        run_recognizer(vec![attr("Line")], &mut rec),
        Err(ReadError::UnexpectedAttribute("Line".to_string()))
    );
    rec.reset();
    let events = vec![
        attr("Point"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        "z".into(),
    ];
    assert_eq!(
        run_recognizer(events, &mut rec),
        Err(ReadError::UnexpectedField("z".to_string()))
    );
}

#[test]
fn labelled_struct_reused_after_error() {
    let mut rec = point_recognizer();
    let events = vec![
        attr("Point"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        "x".into(),
        ReadEvent::Slot,
        true.into(),
    ];
    assert!(run_recognizer(events, &mut rec).is_err());
    rec.reset();
    let events = point_events(vec![
        "x".into(),
        ReadEvent::Slot,
        3.into(),
        "y".into(),
        ReadEvent::Slot,
        4.into(),
    ]);
    assert_eq!(
        run_recognizer(events, &mut rec),
        Ok(Point {
            x: 3,
            y: 4,
            label: None
        })
    );
}

type PairFields = (Option<i32>, Option<i32>);

static PAIR_FIELDS: [FieldSpec; 2] = [FieldSpec::required("first"), FieldSpec::required("second")];

fn pair_index(key: OrdinalFieldKey<'_>) -> Option<u32> {
    if matches!(key, OrdinalFieldKey::FirstItem) {
        Some(0)
    } else {
        None
    }
}

fn pair_select(
    fields: &mut PairFields,
    index: u32,
    event: ReadEvent,
) -> Option<Result<(), ReadError>> {
    let mut rec = I32Recognizer;
    match index {
        0 => feed_field("first", &mut fields.0, &mut rec, event),
        1 => feed_field("second", &mut fields.1, &mut rec, event),
        _ => Some(Err(ReadError::UnexpectedItem)),
    }
}

fn pair_done(fields: &mut PairFields) -> Result<(i32, i32), ReadError> {
    Ok((
        take_field(&mut fields.0, "first")?,
        take_field(&mut fields.1, "second")?,
    ))
}

fn pair_reset(fields: &mut PairFields) {
    *fields = (None, None);
}

fn pair_recognizer() -> OrdinalStructRecognizer<(i32, i32), PairFields> {
    OrdinalStructRecognizer::new(
        TagSpec::Fixed("Pair"),
        (None, None),
        &PAIR_FIELDS,
        OrdinalVTable::new(pair_index, pair_select, pair_done, pair_reset),
    )
}

#[test]
fn ordinal_struct_recognizer() {
    let mut rec = pair_recognizer();
    let events = vec![
        attr("Pair"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        1.into(),
        2.into(),
        ReadEvent::EndRecord,
    ];
    assert_eq!(run_recognizer(events, &mut rec), Ok((1, 2)));

    rec.reset();
    let too_many = vec![
        attr("Pair"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        1.into(),
        2.into(),
        3.into(),
    ];
    assert_eq!(run_recognizer(too_many, &mut rec), Err(ReadError::UnexpectedItem));

    rec.reset();
    let too_few = vec![
        attr("Pair"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        1.into(),
        ReadEvent::EndRecord,
    ];
    assert_eq!(
        run_recognizer(too_few, &mut rec),
        Err(ReadError::MissingFields(vec!["second".to_string()]))
    );
}

struct WrapperFields {
    body: Option<Value>,
    body_rec: ValueMaterializer,
}

static WRAPPER_FIELDS: [FieldSpec; 1] = [FieldSpec::required("body")];

fn wrapper_select(
    fields: &mut WrapperFields,
    index: u32,
    event: ReadEvent,
) -> Option<Result<(), ReadError>> {
    if index == 0 {
        feed_field("body", &mut fields.body, &mut fields.body_rec, event)
    } else {
        Some(Err(ReadError::InconsistentState))
    }
}

fn wrapper_done(fields: &mut WrapperFields) -> Result<Value, ReadError> {
    take_field(&mut fields.body, "body")
}

fn wrapper_reset(fields: &mut WrapperFields) {
    fields.body = None;
    fields.body_rec.reset();
}

#[test]
fn delegate_struct_recognizer() {
    let mut rec = DelegateStructRecognizer::new(
        TagSpec::Fixed("Wrapper"),
        WrapperFields {
            body: None,
            body_rec: ValueMaterializer::delegated_body(),
        },
        &WRAPPER_FIELDS,
        OrdinalVTable::new(pair_index, wrapper_select, wrapper_done, wrapper_reset),
    );
    let events = vec![
        attr("Wrapper"),
        ReadEvent::EndAttribute,
        attr("extra"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        1.into(),
        2.into(),
        ReadEvent::EndRecord,
    ];
    let expected = Value::Record(
        vec![swimos_model::Attr::with_value("extra", Value::Extant)],
        vec![Item::of(1), Item::of(2)],
    );
    assert_eq!(run_recognizer(events, &mut rec), Ok(expected));
}

#[derive(Debug, PartialEq, Eq)]
enum Shape {
    Circle,
    Square,
}

#[test]
fn unit_struct_recognizer() {
    let mut rec = UnitStructRecognizer::new("Circle", || Shape::Circle);
    let events = vec![
        attr("Circle"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        ReadEvent::EndRecord,
    ];
    assert_eq!(run_recognizer(events, &mut rec), Ok(Shape::Circle));
}

#[test]
fn unit_struct_rejects_extra_attribute() {
    let mut rec = UnitStructRecognizer::new("Circle", || Shape::Circle);
    let events = vec![attr("Circle"), ReadEvent::EndAttribute, attr("radius")];
    assert_eq!(
        run_recognizer(events, &mut rec),
        Err(ReadError::UnexpectedAttribute("radius".to_string()))
    );

    rec.reset();
    let events = vec![
        attr("Circle"),
        ReadEvent::Extant,
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        ReadEvent::EndRecord,
    ];
    assert_eq!(run_recognizer(events, &mut rec), Ok(Shape::Circle));
}

fn shape_recognizer() -> PolymorphicRecognizer<Shape> {
    PolymorphicRecognizer::default()
        .with(UnitStructRecognizer::new("Circle", || Shape::Circle))
        .with(UnitStructRecognizer::new("Square", || Shape::Square))
}

#[test]
fn polymorphic_recognizer_selects_by_tag() {
    let mut rec = shape_recognizer();
    let events = vec![
        attr("Square"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        ReadEvent::EndRecord,
    ];
    assert_eq!(run_recognizer(events, &mut rec), Ok(Shape::Square));

    rec.reset();
    let events = vec![
        attr("Circle"),
        ReadEvent::EndAttribute,
        ReadEvent::StartBody,
        ReadEvent::EndRecord,
    ];
    assert_eq!(run_recognizer(events, &mut rec), Ok(Shape::Circle));
}

#[test]
fn polymorphic_recognizer_tag_mismatch() {
    let mut rec = shape_recognizer();
    let result = run_recognizer(vec![attr("Triangle")], &mut rec);
    assert_eq!(result, Err(ReadError::TagMismatch));
    if let Err(e) = result {
        assert_eq!(e.to_string(), "tag mismatch");
    }
}

#[derive(Default)]
struct HeaderFields {
    id: Option<i32>,
    name: Option<Option<String>>,
    id_rec: I32Recognizer,
    name_rec: OptionRecognizer<StringRecognizer>,
}

static HEADER_FIELDS: [FieldSpec; 2] = [FieldSpec::required("id"), FieldSpec::optional("name")];

fn header_index(key: HeaderFieldKey<'_>) -> Option<u32> {
    match key {
        HeaderFieldKey::HeaderBody => Some(0),
        HeaderFieldKey::HeaderSlot("name") => Some(1),
        _ => None,
    }
}

fn header_select(
    fields: &mut HeaderFields,
    index: u32,
    event: ReadEvent,
) -> Option<Result<(), ReadError>> {
    match index {
        0 => feed_field("id", &mut fields.id, &mut fields.id_rec, event),
        1 => feed_field("name", &mut fields.name, &mut fields.name_rec, event),
        _ => Some(Err(ReadError::InconsistentState)),
    }
}

fn header_done(fields: &mut HeaderFields) -> Result<(i32, Option<String>), ReadError> {
    Ok((
        take_field(&mut fields.id, "id")?,
        take_field(&mut fields.name, "name")?,
    ))
}

fn header_reset(fields: &mut HeaderFields) {
    *fields = HeaderFields::default();
}

fn header_vtable() -> HeaderVTable<(i32, Option<String>), HeaderFields> {
    HeaderVTable::new(header_index, header_select, header_done, header_reset)
}

#[test]
fn header_recognizer_flattened_and_nested() {
    let mut rec = header_recognizer(true, HeaderFields::default, &HEADER_FIELDS, header_vtable());

    let flattened = vec![
        3.into(),
        "name".into(),
        ReadEvent::Slot,
        "node".into(),
        ReadEvent::EndAttribute,
    ];
    assert_eq!(
        run_recognizer(flattened, &mut rec),
        Ok((3, Some("node".to_string())))
    );

    rec.reset();
    let nested = vec![
        ReadEvent::StartBody,
        3.into(),
        "name".into(),
        ReadEvent::Slot,
        "node".into(),
        ReadEvent::EndRecord,
        ReadEvent::EndAttribute,
    ];
    assert_eq!(
        run_recognizer(nested, &mut rec),
        Ok((3, Some("node".to_string())))
    );

    rec.reset();
    let body_only = vec![7.into(), ReadEvent::EndAttribute];
    assert_eq!(run_recognizer(body_only, &mut rec), Ok((7, None)));
}

#[test]
fn header_recognizer_missing_field() {
    let mut rec = HeaderRecognizer::new(
        true,
        true,
        HeaderFields::default(),
        &HEADER_FIELDS,
        header_vtable(),
    );
    assert_eq!(
        run_recognizer(vec![ReadEvent::EndAttribute], &mut rec),
        Err(ReadError::MissingFields(vec!["id".to_string()]))
    );
}

#[test]
fn header_recognizer_duplicate_slot() {
    let mut rec = HeaderRecognizer::new(
        true,
        true,
        HeaderFields::default(),
        &HEADER_FIELDS,
        header_vtable(),
    );
    let events = vec![
        1.into(),
        "name".into(),
        ReadEvent::Slot,
        "a".into(),
        "name".into(),
    ];
    assert_eq!(
        run_recognizer(events, &mut rec),
        Err(ReadError::DuplicateField("name".to_string()))
    );
}

#[test]
fn bitset_tracks_fields() {
    let mut bits = Bitset::new(3);
    assert!(bits.set(0));
    assert!(!bits.set(0));
    assert!(bits.get(0));
    assert!(!bits.get(1));
    assert!(!bits.set(3));
    assert!(!bits.get(3));
    bits.clear();
    assert!(!bits.get(0));
}

#[test]
fn read_error_display() {
    assert_eq!(
        ReadError::DuplicateField("x".to_string()).to_string(),
        "Field 'x' occurred more than once."
    );
    let err = ReadEvent::Slot.kind_error(ExpectedEvent::EndOfRecord);
    assert_eq!(err, ReadError::UnexpectedSlot);
    let err = ReadEvent::from(1).kind_error(ExpectedEvent::Or(vec![
        ExpectedEvent::RecordBody,
        ExpectedEvent::Attribute(None),
    ]));
    assert_eq!(
        err.to_string(),
        "Unexpected value kind: Int32, expected: One of: [A record body, An attribute]."
    );
    assert_eq!(
        ExpectedEvent::Or(vec![ExpectedEvent::Slot]).to_string(),
        "A slot divider"
    );
    assert_eq!(ExpectedEvent::Or(vec![]).to_string(), "Nothing");
    assert_eq!(
        ReadError::MissingFields(vec!["x".to_string(), "y".to_string()]).to_string(),
        "Fields [x, y] are required."
    );
}
