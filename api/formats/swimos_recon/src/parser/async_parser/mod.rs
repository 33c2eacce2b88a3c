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
use crate::decoder::{DecodeError, Decoder};
use bytes::BytesMut;
use swimos_form::{Recognizer, RecognizerReadable};
use swimos_model::Item;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

const BUFFER_SIZE: usize = 4096;

/// Errors that can occur when decoding Recon from an asynchronous source.
#[derive(Error, Debug)]
pub enum AsyncParseError {
    #[error("Reading the input failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

async fn run_decoder<In, R>(
    mut input: In,
    mut decoder: Decoder<R>,
) -> Result<R::Target, AsyncParseError>
where
    In: AsyncRead + Unpin,
    R: Recognizer,
{
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    let mut completed = None;
    loop {
        buffer.clear();
        let n = input.read_buf(&mut buffer).await?;
        trace!(bytes = n, "Read from Recon input.");
        if n == 0 {
            break;
        }
        if let Some(value) = decoder.feed_bytes(&buffer)? {
            completed = Some(value);
        }
    }
    let last = decoder.finish()?;
    Ok(completed.or(last).ok_or(DecodeError::IncompleteInput)?)
}

/// Read a value from an asynchronous source using the provided recognizer. The whole of the
/// input is consumed and anything after the value must be whitespace.
pub async fn parse_recognize_with<In, R>(
    input: In,
    recognizer: &mut R,
) -> Result<R::Target, AsyncParseError>
where
    In: AsyncRead + Unpin,
    R: Recognizer,
{
    run_decoder(input, Decoder::new(recognizer)).await
}

/// Read a value of a type from an asynchronous source.
pub async fn parse_recognize<T, In>(input: In) -> Result<T, AsyncParseError>
where
    T: RecognizerReadable,
    In: AsyncRead + Unpin,
{
    let mut recognizer = T::make_recognizer();
    parse_recognize_with(input, &mut recognizer).await
}

/// Read the items of a Recon document (a record body without the enclosing braces) from an
/// asynchronous source.
pub async fn parse_recon_document<In>(
    input: In,
    config: ParserConfig,
) -> Result<Vec<Item>, AsyncParseError>
where
    In: AsyncRead + Unpin,
{
    run_decoder(input, Decoder::document(config)).await
}
