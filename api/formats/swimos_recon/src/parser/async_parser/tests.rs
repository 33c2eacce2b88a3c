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

use super::{parse_recognize, parse_recognize_with, parse_recon_document, AsyncParseError};
use crate::config::ParserConfig;
use crate::decoder::DecodeError;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use swimos_form::RecognizerReadable;
use swimos_model::{Attr, Item, Value};
use tokio::io::{AsyncRead, ReadBuf};

/// Provides its input a few bytes at a time.
struct Trickle<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> AsyncRead for Trickle<'a> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let n = self.chunk.min(self.data.len()).min(buf.remaining());
        let (head, tail) = self.data.split_at(n);
        buf.put_slice(head);
        self.data = tail;
        Poll::Ready(Ok(()))
    }
}

struct Failing;

impl AsyncRead for Failing {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "Closed.")))
    }
}

fn point() -> Value {
    Value::Record(
        vec![Attr::of("Point")],
        vec![Item::slot("x", 1), Item::slot("y", 2)],
    )
}

#[tokio::test]
async fn read_value() {
    let input = "@Point{x:1,y:2}".as_bytes();
    let result = parse_recognize::<Value, _>(input).await;
    assert!(matches!(result, Ok(v) if v == point()));
}

#[tokio::test]
async fn read_value_in_small_chunks() {
    for chunk in 1..4 {
        let input = Trickle {
            data: "{a: \"é\", b: 12345678901} ".as_bytes(),
            chunk,
        };
        let result = parse_recognize::<Value, _>(input).await;
        let expected = Value::Record(
            vec![],
            vec![Item::slot("a", "é"), Item::slot("b", 12345678901i64)],
        );
        assert!(matches!(result, Ok(v) if v == expected));
    }
}

#[tokio::test]
async fn read_with_recognizer() {
    let mut recognizer = <Vec<i32>>::make_recognizer();
    let result = parse_recognize_with("{1, 2, 3}".as_bytes(), &mut recognizer).await;
    assert!(matches!(result, Ok(v) if v == vec![1, 2, 3]));
}

#[tokio::test]
async fn read_document() {
    let input = Trickle {
        data: "a: 1\nb: @Point{x:1,y:2}\n".as_bytes(),
        chunk: 3,
    };
    let result = parse_recon_document(input, ParserConfig::default()).await;
    let expected = vec![Item::slot("a", 1), Item::slot("b", point())];
    assert!(matches!(result, Ok(items) if items == expected));
}

#[tokio::test]
async fn decode_errors_are_reported() {
    let result = parse_recognize::<i32, _>("1 2".as_bytes()).await;
    assert!(matches!(
        result,
        Err(AsyncParseError::Decode(DecodeError::TrailingInput(_)))
    ));

    let result = parse_recognize::<Value, _>("{1,".as_bytes()).await;
    assert!(matches!(
        result,
        Err(AsyncParseError::Decode(DecodeError::Syntax(_)))
    ));
}

#[tokio::test]
async fn io_errors_are_reported() {
    let result = parse_recognize::<Value, _>(Failing).await;
    assert!(matches!(result, Err(AsyncParseError::Io(_))));
}
