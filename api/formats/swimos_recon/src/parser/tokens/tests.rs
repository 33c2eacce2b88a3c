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
    attribute, literals, AttrParser, BlobLiteral, Identifier, StringLiteral, Token, Whitespace,
};
use crate::parser::combinators::Alt;
use crate::parser::error::ParseErrorKind;
use crate::parser::machine::{parse_complete, parse_fragments};
use swimos_form::structural::read::event::{NumericValue, ReadEvent};

#[test]
fn string_literals() {
    assert_eq!(
        parse_complete(StringLiteral::default(), r#""hello" rest"#),
        Ok(("hello".to_string(), " rest"))
    );
    assert_eq!(
        parse_complete(StringLiteral::default(), r#""""#),
        Ok((String::new(), ""))
    );
}

#[test]
fn string_escapes() {
    let input = r#""a\"b\\c\/d\'e\bf\fg\nh\ri\tjé""#;
    assert_eq!(
        parse_complete(StringLiteral::default(), input),
        Ok(("a\"b\\c/d'e\u{08}f\u{0c}g\nh\ri\tjé".to_string(), ""))
    );
}

#[test]
fn string_escapes_split_across_fragments() {
    assert_eq!(
        parse_fragments(StringLiteral::default(), &["\"x\\", "n\\u00", "41", "\""]),
        Ok("x\nA".to_string())
    );
}

#[test]
fn bad_strings() {
    let err = parse_complete(StringLiteral::default(), r#""abc"#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedText);
    let err = parse_complete(StringLiteral::default(), r#""a\qb""#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidEscape("\\q".to_string()));
    assert_eq!(err.location.offset, 3);
    let err = parse_complete(StringLiteral::default(), r#""\ud800""#).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::InvalidEscape(_)));
}

#[test]
fn identifiers() {
    assert_eq!(
        parse_complete(Identifier::default(), "two-parts_1:"),
        Ok(("two-parts_1".to_string(), ":"))
    );
    assert!(parse_complete(Identifier::default(), "1abc").is_err());
    assert_eq!(
        parse_fragments(Identifier::default(), &["na", "me"]),
        Ok("name".to_string())
    );
}

#[test]
fn blobs() {
    assert_eq!(
        parse_complete(BlobLiteral::default(), "%aGVsbG8=,"),
        Ok((b"hello".to_vec(), ","))
    );
    assert_eq!(
        parse_complete(BlobLiteral::default(), "%"),
        Ok((vec![], ""))
    );
    let err = parse_complete(BlobLiteral::default(), "%abc").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::InvalidBlob(_)));
}

#[test]
fn attributes() {
    assert_eq!(
        parse_complete(AttrParser::default(), "@tag{"),
        Ok((("tag".to_string(), false), "{"))
    );
    assert_eq!(
        parse_complete(AttrParser::default(), "@tag(1)"),
        Ok((("tag".to_string(), true), "1)"))
    );
    assert_eq!(
        parse_complete(AttrParser::default(), r#"@"two words""#),
        Ok((("two words".to_string(), false), ""))
    );
    assert_eq!(
        parse_fragments(AttrParser::default(), &["@ta", "g", "("]),
        Ok(("tag".to_string(), true))
    );
    assert!(parse_complete(AttrParser::default(), "@1").is_err());
}

#[test]
fn whitespace_and_comments() {
    assert_eq!(
        parse_complete(Whitespace::new(false, false), " \t\nx"),
        Ok(((), "\nx"))
    );
    assert_eq!(
        parse_complete(Whitespace::new(true, false), " \t\n x"),
        Ok(((), "x"))
    );
    assert_eq!(
        parse_complete(Whitespace::new(true, true), "# note\n  x"),
        Ok(((), "x"))
    );
    assert_eq!(
        parse_complete(Whitespace::new(false, true), " # note\nx"),
        Ok(((), "\nx"))
    );
    assert_eq!(
        parse_complete(Whitespace::new(true, false), "# note"),
        Ok(((), "# note"))
    );
    assert_eq!(
        parse_fragments(Whitespace::new(true, true), &["# no", "te\n"]),
        Ok(())
    );
}

fn literal(input: &str) -> Token {
    match parse_complete(Alt::new(literals()), input) {
        Ok((token, "")) => token,
        ow => panic!("Parsing {} failed: {:?}", input, ow),
    }
}

#[test]
fn literal_tokens() {
    assert_eq!(
        literal("name"),
        Token::Value(ReadEvent::TextValue("name".to_string()))
    );
    assert_eq!(literal("true"), Token::Value(ReadEvent::Boolean(true)));
    assert_eq!(literal("false"), Token::Value(ReadEvent::Boolean(false)));
    assert_eq!(
        literal("infinity"),
        Token::Value(ReadEvent::Number(NumericValue::Double(f64::INFINITY)))
    );
    assert!(matches!(
        literal("nan"),
        Token::Value(ReadEvent::Number(NumericValue::Double(x))) if x.is_nan()
    ));
    assert_eq!(
        literal("-3"),
        Token::Value(ReadEvent::Number(NumericValue::Int(-3)))
    );
    assert_eq!(
        literal(r#""1""#),
        Token::Value(ReadEvent::TextValue("1".to_string()))
    );
    assert_eq!(literal("%AQI="), Token::Value(ReadEvent::Blob(vec![1, 2])));
}

#[test]
fn literal_tokens_in_fragments() {
    assert_eq!(
        parse_fragments(Alt::new(literals()), &["tr", "ue"]),
        Ok(Token::Value(ReadEvent::Boolean(true)))
    );
    assert_eq!(
        parse_fragments(Alt::new(literals()), &["-i", "nf"]),
        Ok(Token::Value(ReadEvent::Number(NumericValue::Double(
            f64::NEG_INFINITY
        ))))
    );
}

#[test]
fn attribute_token() {
    assert_eq!(
        parse_complete(attribute(), "@a"),
        Ok((
            Token::Attr {
                name: "a".to_string(),
                has_body: false
            },
            ""
        ))
    );
}
