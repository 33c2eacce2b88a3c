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

//! # Recon decoding
//!
//! Recon is a text format for the SwimOS data model: attributes, records, slots and scalar
//! literals, for example `@Point { x: 1, y: 2 }`. This crate reads Recon incrementally: the
//! [`parser`] module turns text, presented in fragments of any size, into a stream of
//! [`swimos_form::structural::read::event::ReadEvent`]s and a [`swimos_form::Recognizer`]
//! builds the value from them.
//!
//! # Examples
//!
//! ```
//! use swimos_recon::decode_value;
//! use swimos_model::{Attr, Item, Value};
//!
//! let value = decode_value("@Point{x:1,y:2}").unwrap();
//! assert_eq!(
//!     value,
//!     Value::Record(
//!         vec![Attr::of("Point")],
//!         vec![Item::slot("x", 1), Item::slot("y", 2)],
//!     )
//! );
//! ```

mod config;
mod decoder;
pub mod parser;

pub use config::ParserConfig;
pub use decoder::{
    decode, decode_document, decode_registered, decode_value, decode_with, decode_with_config,
    DecodeError, Decoder, DocumentRecognizer,
};
