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

//! Incremental parsing of Recon text.
//!
//! Parsers are state machines ([`StateParser`]) that consume input from a [`Cursor`] and, if the
//! input runs out before they can complete, return the state from which to continue when more
//! is available. The [`IncrementalReconParser`] uses them to turn Recon text into a stream of
//! [`swimos_form::structural::read::event::ReadEvent`]s.

#[cfg(feature = "async_parser")]
mod async_parser;
pub mod combinators;
pub mod cursor;
mod error;
pub mod machine;
pub mod number;
mod record;
pub mod tokens;

#[cfg(feature = "async_parser")]
pub use async_parser::{
    parse_recognize, parse_recognize_with, parse_recon_document, AsyncParseError,
};
pub use cursor::{Cursor, Location};
pub use error::{ParseError, ParseErrorKind};
pub use machine::{parse_complete, parse_fragments, Parse, StateParser};
pub use record::{IncrementalReconParser, ParseEvents, Progress};
