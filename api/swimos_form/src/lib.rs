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

//! # SwimOS deserialization
//!
//! This crate contains the [`structural::read::recognizer::Recognizer`] state machines that
//! consume a stream of [`structural::read::event::ReadEvent`]s and produce typed values, and the
//! [`structural::read::recognizer::RecognizerReadable`] trait that associates a type with the
//! recognizers for its representations. It is implemented for most common primitive types,
//! standard library collections and the generic model type [`swimos_model::Value`].
//!
//! Recognizers for types without a static implementation can be resolved at decode time from a
//! [`registry::RecognizerRegistry`].

pub mod registry;
pub mod structural;

pub use structural::read::recognizer::{Recognizer, RecognizerReadable};
