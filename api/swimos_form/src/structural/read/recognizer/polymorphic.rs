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

use super::{BoxedRecognizer, Recognizer};
use crate::structural::read::event::ReadEvent;
use crate::structural::read::ReadError;

/// Recognizes a value that may have any one of a number of representations (typically records
/// with different tags). The first event is offered to each candidate in turn and the first
/// candidate to accept it receives all subsequent events. If no candidate accepts the first
/// event, the recognizer fails with [`ReadError::TagMismatch`].
pub struct PolymorphicRecognizer<T> {
    candidates: Vec<BoxedRecognizer<T>>,
    selected: Option<usize>,
}

impl<T> Default for PolymorphicRecognizer<T> {
    fn default() -> Self {
        PolymorphicRecognizer {
            candidates: vec![],
            selected: None,
        }
    }
}

impl<T> PolymorphicRecognizer<T> {
    pub fn new(candidates: Vec<BoxedRecognizer<T>>) -> Self {
        PolymorphicRecognizer {
            candidates,
            selected: None,
        }
    }

    /// Add another candidate, with lower priority than those already present.
    pub fn with<R>(mut self, recognizer: R) -> Self
    where
        R: Recognizer<Target = T> + Send + 'static,
    {
        self.candidates.push(Box::new(recognizer));
        self
    }
}

impl<T> Recognizer for PolymorphicRecognizer<T> {
    type Target = T;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        let PolymorphicRecognizer {
            candidates,
            selected,
        } = self;
        if let Some(i) = *selected {
            return match candidates.get_mut(i) {
                Some(candidate) => candidate.feed_event(input),
                None => Some(Err(ReadError::InconsistentState)),
            };
        }
        for (i, candidate) in candidates.iter_mut().enumerate() {
            match candidate.feed_event(input.clone()) {
                Some(Err(_)) => candidate.reset(),
                outcome => {
                    *selected = Some(i);
                    return outcome;
                }
            }
        }
        Some(Err(ReadError::TagMismatch))
    }

    fn try_flush(&mut self) -> Option<Result<Self::Target, ReadError>> {
        let i = self.selected?;
        self.candidates.get_mut(i)?.try_flush()
    }

    fn reset(&mut self) {
        if let Some(i) = self.selected.take() {
            if let Some(candidate) = self.candidates.get_mut(i) {
                candidate.reset();
            }
        }
    }
}
