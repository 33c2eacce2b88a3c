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

use super::{
    decode, decode_document, decode_registered, decode_value, decode_with_config, DecodeError,
    Decoder,
};
use crate::config::ParserConfig;
use crate::parser::ParseErrorKind;
use std::collections::HashMap;
use swimos_form::registry::RegistryBuilder;
use swimos_form::structural::read::ReadError;
use swimos_form::RecognizerReadable;
use swimos_model::{Attr, Item, Value};

fn point(x: i32, y: i32) -> Value {
    Value::Record(
        vec![Attr::of("Point")],
        vec![Item::slot("x", x), Item::slot("y", y)],
    )
}

#[test]
fn decode_primitives() {
    assert_eq!(decode::<i32>("42"), Ok(42));
    assert_eq!(decode::<i64>(" -7 "), Ok(-7));
    assert_eq!(decode::<String>(r#""hello""#), Ok("hello".to_string()));
    assert_eq!(decode::<bool>("true"), Ok(true));
    assert_eq!(decode::<Vec<i32>>("{1, 2, 3}"), Ok(vec![1, 2, 3]));
}

#[test]
fn decode_generic_values() {
    assert_eq!(decode_value("@Point{x:1,y:2}"), Ok(point(1, 2)));
    assert_eq!(decode_value(""), Ok(Value::Extant));
    assert_eq!(
        decode_value("{1,2,{a:3}}"),
        Ok(Value::Record(
            vec![],
            vec![
                Item::of(1),
                Item::of(2),
                Item::of(Value::Record(vec![], vec![Item::slot("a", 3)]))
            ]
        ))
    );
}

#[test]
fn decode_map() {
    let map = decode::<HashMap<String, i32>>("{a: 1, b: 2}");
    let mut expected = HashMap::new();
    expected.insert("a".to_string(), 1);
    expected.insert("b".to_string(), 2);
    assert_eq!(map, Ok(expected));
}

#[test]
fn value_in_fragments() {
    let mut decoder = Decoder::new(Value::make_recognizer());
    assert_eq!(decoder.feed("@Point{x:1,"), Ok(None));
    assert!(!decoder.is_complete());
    assert_eq!(decoder.feed("y:2}"), Ok(Some(point(1, 2))));
    assert!(decoder.is_complete());
    assert_eq!(decoder.feed("  \n"), Ok(None));
    assert_eq!(decoder.finish(), Ok(None));
}

#[test]
fn value_completed_by_end_of_input() {
    let mut decoder = Decoder::new(i32::make_recognizer());
    assert_eq!(decoder.feed("1"), Ok(None));
    assert_eq!(decoder.feed("2"), Ok(None));
    assert_eq!(decoder.finish(), Ok(Some(12)));
}

#[test]
fn input_after_value() {
    assert!(matches!(
        decode::<i32>("1 2"),
        Err(DecodeError::TrailingInput(location)) if location.offset == 2
    ));
    assert_eq!(decode::<i32>(" 1 \n "), Ok(1));
}

#[test]
fn input_after_value_in_later_fragment() {
    let mut decoder = Decoder::new(i32::make_recognizer());
    assert_eq!(decoder.feed("1 "), Ok(Some(1)));
    assert!(matches!(
        decoder.feed("x"),
        Err(DecodeError::TrailingInput(location)) if location.offset == 2
    ));
}

#[test]
fn syntax_errors() {
    match decode_value("{1,") {
        Err(DecodeError::Syntax(err)) => assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd),
        ow => panic!("Unexpected result: {:?}", ow),
    }
    assert!(matches!(
        decode_value("{a: 1)"),
        Err(DecodeError::Syntax(_))
    ));
}

#[test]
fn structure_errors() {
    assert!(matches!(
        decode::<i32>(r#""one""#),
        Err(DecodeError::Structure(ReadError::UnexpectedKind { .. }))
    ));
    assert_eq!(
        decode::<i32>("12345678901"),
        Err(DecodeError::Structure(ReadError::NumberOutOfRange))
    );
}

#[test]
fn bytes_split_inside_character() {
    let text = "\"é\"".as_bytes();
    let mut decoder = Decoder::new(String::make_recognizer());
    assert_eq!(decoder.feed_bytes(&text[..2]), Ok(None));
    assert_eq!(decoder.feed_bytes(&text[2..]), Ok(Some("é".to_string())));
    assert_eq!(decoder.finish(), Ok(None));
}

#[test]
fn invalid_utf8() {
    let mut decoder = Decoder::new(String::make_recognizer());
    assert!(matches!(
        decoder.feed_bytes(&[b'"', 0xFF]),
        Err(DecodeError::BadUtf8(_))
    ));

    let mut decoder = Decoder::new(String::make_recognizer());
    assert_eq!(decoder.feed_bytes(&[b'"', 0xC3]), Ok(None));
    assert!(matches!(decoder.finish(), Err(DecodeError::BadUtf8(_))));
}

#[test]
fn comments_require_config() {
    let text = "{a, # comment\n b}";
    let expected = Value::Record(vec![], vec![Item::of("a"), Item::of("b")]);
    assert_eq!(
        decode_with_config(
            text,
            Value::make_recognizer(),
            ParserConfig::default().with_comments()
        ),
        Ok(expected)
    );
    assert!(matches!(decode_value(text), Err(DecodeError::Syntax(_))));
}

#[test]
fn documents() {
    assert_eq!(
        decode_document("a: 1\nb: 2", ParserConfig::default()),
        Ok(vec![Item::slot("a", 1), Item::slot("b", 2)])
    );
    assert_eq!(decode_document("", ParserConfig::default()), Ok(vec![]));
    assert_eq!(
        decode_document("@Point{x:1,y:2}, 3", ParserConfig::default()),
        Ok(vec![Item::of(point(1, 2)), Item::of(3)])
    );
    assert!(matches!(
        decode_document("a}", ParserConfig::default()),
        Err(DecodeError::Syntax(_))
    ));
}

#[test]
fn document_with_nested_records() {
    let expected = vec![
        Item::slot("a", Value::from_vec(vec![Item::slot("b", 1)])),
        Item::of(Value::from_vec(vec![2, 3])),
        Item::of("c"),
    ];
    assert_eq!(
        decode_document("a: {b: 1}\n{2, 3}; c", ParserConfig::default()),
        Ok(expected)
    );
}

#[test]
fn document_in_fragments() {
    let mut decoder = Decoder::document(ParserConfig::default());
    assert_eq!(decoder.feed("a: 1\n"), Ok(None));
    assert_eq!(decoder.feed("b: 2"), Ok(None));
    assert_eq!(
        decoder.finish(),
        Ok(Some(vec![Item::slot("a", 1), Item::slot("b", 2)]))
    );
}

#[test]
fn registered_types() {
    let registry = RegistryBuilder::default()
        .register_readable::<i32>()
        .register_readable::<Value>()
        .build();
    assert_eq!(decode_registered::<i32>(&registry, "5"), Ok(5));
    assert_eq!(
        decode_registered::<Value>(&registry, "@Point{x:1,y:2}"),
        Ok(point(1, 2))
    );
    assert!(matches!(
        decode_registered::<String>(&registry, "\"a\""),
        Err(DecodeError::Structure(ReadError::Message(_)))
    ));
}
