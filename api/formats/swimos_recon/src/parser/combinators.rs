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


use crate::parser::cursor::Cursor;
use crate::parser::error::ParseError;
use crate::parser::machine::{Parse, StateParser};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const NO_HINT: usize = usize::MAX;

/// Consumes a single character that satisfies a predicate.
#[derive(Debug, Clone, Copy)]
pub struct Satisfy {
    pred: fn(char) -> bool,
    expected: &'static str,
}

impl Satisfy {
    /// #Arguments
    /// * `pred` - The predicate that the character must satisfy.
    /// * `expected` - Description of the accepted characters, for error reporting.
    pub fn new(pred: fn(char) -> bool, expected: &'static str) -> Self {
        Satisfy { pred, expected }
    }
}

impl StateParser for Satisfy {
    type Output = char;

    fn feed(self, input: &mut Cursor<'_>) -> Parse<char, Self> {
        match input.head() {
            Some(c) if (self.pred)(c) => {
                *input = input.step();
                Parse::Done(c)
            }
            None if !input.is_final() => Parse::Cont(self),
            _ => Parse::Error(ParseError::unexpected(input, self.expected)),
        }
    }
}

/// Consumes a specific character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharLit(pub char);

impl StateParser for CharLit {
    type Output = char;

    fn feed(self, input: &mut Cursor<'_>) -> Parse<char, Self> {
        let CharLit(expected) = self;
        match input.head() {
            Some(c) if c == expected => {
                *input = input.step();
                Parse::Done(c)
            }
            None if !input.is_final() => Parse::Cont(self),
            _ => Parse::Error(ParseError::unexpected(input, "a specific character")),
        }
    }
}

/// Succeeds, without consuming anything, only at the end of the final input.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndOfInput;

impl StateParser for EndOfInput {
    type Output = ();

    fn feed(self, input: &mut Cursor<'_>) -> Parse<(), Self> {
        if input.is_final_end() {
            Parse::Done(())
        } else if input.is_awaiting_more() {
            Parse::Cont(self)
        } else {
            Parse::Error(ParseError::unexpected(input, "the end of the input"))
        }
    }
}

/// Transforms the output of a parser.
#[derive(Debug, Clone, Copy)]
pub struct Map<P, F> {
    parser: P,
    f: F,
}

impl<P, F> Map<P, F> {
    pub fn new(parser: P, f: F) -> Self {
        Map { parser, f }
    }
}

impl<P, F, U> StateParser for Map<P, F>
where
    P: StateParser,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    fn feed(self, input: &mut Cursor<'_>) -> Parse<U, Self> {
        let Map { parser, f } = self;
        match parser.feed(input) {
            Parse::Done(output) => Parse::Done(f(output)),
            Parse::Error(err) => Parse::Error(err),
            Parse::Cont(parser) => Parse::Cont(Map { parser, f }),
        }
    }
}

/// Runs two parsers in sequence, discarding the output of the first.
#[derive(Debug, Clone)]
pub enum Chain<A, B> {
    First(A, B),
    Second(B),
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Chain::First(first, second)
    }
}

impl<A, B> StateParser for Chain<A, B>
where
    A: StateParser,
    B: StateParser,
{
    type Output = B::Output;

    fn feed(self, input: &mut Cursor<'_>) -> Parse<B::Output, Self> {
        let mut current = self;
        loop {
            current = match current {
                Chain::First(first, second) => match first.feed(input) {
                    Parse::Done(_) => Chain::Second(second),
                    Parse::Error(err) => return Parse::Error(err),
                    Parse::Cont(first) => return Parse::Cont(Chain::First(first, second)),
                },
                Chain::Second(second) => return second.feed(input).map_cont(Chain::Second),
            }
        }
    }
}

/// Sequence any number of parsers, producing the output of the last.
#[macro_export]
macro_rules! chain {
    ($last:expr $(,)?) => {
        $last
    };
    ($first:expr, $($rest:expr),+ $(,)?) => {
        $crate::parser::combinators::Chain::new($first, $crate::chain!($($rest),+))
    };
}

/// Applies a parser repeatedly until it fails, collecting the outputs. Each repetition is
/// speculative: when a repetition fails the input it consumed is restored and when it runs
/// out of input it is restarted, from the beginning, once more is available. A repetition that
/// completes without consuming anything ends the sequence.
pub struct Many0<P: StateParser> {
    parser: P,
    outputs: Vec<P::Output>,
}

impl<P> Clone for Many0<P>
where
    P: StateParser + Clone,
    P::Output: Clone,
{
    fn clone(&self) -> Self {
        Many0 {
            parser: self.parser.clone(),
            outputs: self.outputs.clone(),
        }
    }
}

impl<P: StateParser> Many0<P> {
    pub fn new(parser: P) -> Self {
        Many0 {
            parser,
            outputs: vec![],
        }
    }
}

impl<P> StateParser for Many0<P>
where
    P: StateParser + Clone,
{
    type Output = Vec<P::Output>;

    fn feed(mut self, input: &mut Cursor<'_>) -> Parse<Self::Output, Self> {
        loop {
            let mut trial = *input;
            match self.parser.clone().feed(&mut trial) {
                Parse::Done(output) if trial.index() > input.index() => {
                    self.outputs.push(output);
                    *input = trial;
                }
                Parse::Done(_) | Parse::Error(_) => return Parse::Done(self.outputs),
                Parse::Cont(_) => return Parse::Cont(self),
            }
        }
    }
}

/// Runs a parser without consuming any input.
#[derive(Debug, Clone, Copy)]
pub struct Peek<P>(pub P);

impl<P> StateParser for Peek<P>
where
    P: StateParser + Clone,
{
    type Output = P::Output;

    fn feed(self, input: &mut Cursor<'_>) -> Parse<P::Output, Self> {
        let mut trial = *input;
        match self.0.clone().feed(&mut trial) {
            Parse::Done(output) => Parse::Done(output),
            Parse::Error(err) => Parse::Error(err),
            Parse::Cont(_) => Parse::Cont(self),
        }
    }
}

/// Object safe view of a [`StateParser`] used by [`Boxed`].
pub trait DynParser<T>: Send {
    fn feed_boxed(self: Box<Self>, input: &mut Cursor<'_>) -> Parse<T, Boxed<T>>;

    fn clone_boxed(&self) -> Boxed<T>;
}

impl<P> DynParser<P::Output> for P
where
    P: StateParser + Clone + Send + 'static,
    P::Output: 'static,
{
    fn feed_boxed(self: Box<Self>, input: &mut Cursor<'_>) -> Parse<P::Output, Boxed<P::Output>> {
        (*self).feed(input).map_cont(Boxed::new)
    }

    fn clone_boxed(&self) -> Boxed<P::Output> {
        Boxed::new(self.clone())
    }
}

/// A type erased parser, allowing parsers of different types (with the same output) to be
/// combined with [`Alt`].
pub struct Boxed<T>(Box<dyn DynParser<T>>);

impl<T: 'static> Boxed<T> {
    pub fn new<P>(parser: P) -> Self
    where
        P: StateParser<Output = T> + Clone + Send + 'static,
    {
        Boxed(Box::new(parser))
    }
}

impl<T> Clone for Boxed<T> {
    fn clone(&self) -> Self {
        self.0.clone_boxed()
    }
}

impl<T> std::fmt::Debug for Boxed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Boxed")
    }
}

impl<T> StateParser for Boxed<T> {
    type Output = T;

    fn feed(self, input: &mut Cursor<'_>) -> Parse<T, Self> {
        self.0.feed_boxed(input)
    }
}

/// Records the branch of an [`Alt`] that completed most recently. Shared between copies of
/// the same [`Alt`].
#[derive(Debug, Clone)]
pub struct AltHint(Arc<AtomicUsize>);

impl Default for AltHint {
    fn default() -> Self {
        AltHint(Arc::new(AtomicUsize::new(NO_HINT)))
    }
}

impl AltHint {
    pub fn get(&self) -> Option<usize> {
        match self.0.load(Ordering::Relaxed) {
            NO_HINT => None,
            n => Some(n),
        }
    }

    fn set(&self, index: usize) {
        self.0.store(index, Ordering::Relaxed);
    }
}

/// Ordered choice between parsers that are all run against the same input.
///
/// Each feed offers the input to every branch that has not yet failed:
/// * If any branch completes, the completing branch with the lowest index wins.
/// * If more than one branch needs more input, the alternative suspends without consuming
/// anything so all of them see the same input when resumed.
/// * If exactly one branch needs more input, and the others have failed, that branch is
/// adopted.
/// * If every branch fails, the last error is returned.
///
/// The branch that completed last time is tried first. Its result is only taken without
/// trying the remaining branches if every branch before it fails.
#[derive(Debug, Clone)]
pub struct Alt<P> {
    branches: Vec<(usize, P)>,
    hint: AltHint,
}

impl<P> Alt<P> {
    pub fn new(branches: Vec<P>) -> Self {
        Alt::with_hint(branches, AltHint::default())
    }

    /// Create an alternative that shares its fast path hint with other instances.
    pub fn with_hint(branches: Vec<P>, hint: AltHint) -> Self {
        Alt {
            branches: branches.into_iter().enumerate().collect(),
            hint,
        }
    }

    pub fn hint(&self) -> &AltHint {
        &self.hint
    }

    /// The indices of the branches that have not yet failed.
    pub fn live(&self) -> Vec<usize> {
        self.branches.iter().map(|(i, _)| *i).collect()
    }
}

type Trial<'a, T, P> = (Parse<T, P>, Cursor<'a>);

impl<P> StateParser for Alt<P>
where
    P: StateParser + Clone,
{
    type Output = P::Output;

    fn feed(self, input: &mut Cursor<'_>) -> Parse<P::Output, Self> {
        let Alt { branches, hint } = self;
        let start = *input;
        let mut trials: Vec<Option<Trial<'_, P::Output, P>>> =
            branches.iter().map(|_| None).collect();

        if let Some(h) = hint
            .get()
            .and_then(|hinted| branches.iter().position(|(i, _)| *i == hinted))
        {
            let mut cursor = start;
            let outcome = branches[h].1.clone().feed(&mut cursor);
            if let Parse::Done(_) = &outcome {
                let mut lower_failed = true;
                for (k, (_, branch)) in branches.iter().enumerate().take(h) {
                    let mut lower = start;
                    let lower_outcome = branch.clone().feed(&mut lower);
                    let failed = matches!(&lower_outcome, Parse::Error(_));
                    trials[k] = Some((lower_outcome, lower));
                    if !failed {
                        lower_failed = false;
                        break;
                    }
                }
                if lower_failed {
                    if let Parse::Done(output) = outcome {
                        *input = cursor;
                        return Parse::Done(output);
                    }
                }
            }
            trials[h] = Some((outcome, cursor));
        }

        let mut suspended = Vec::with_capacity(branches.len());
        let mut last_err = None;
        for ((index, branch), trial) in branches.into_iter().zip(trials) {
            let (outcome, cursor) = match trial {
                Some(trial) => trial,
                None => {
                    let mut cursor = start;
                    (branch.clone().feed(&mut cursor), cursor)
                }
            };
            match outcome {
                Parse::Done(output) => {
                    hint.set(index);
                    *input = cursor;
                    return Parse::Done(output);
                }
                Parse::Error(err) => last_err = Some(err),
                Parse::Cont(next) => suspended.push((index, branch, next, cursor)),
            }
        }

        if suspended.len() == 1 {
            if let Some((index, _, next, cursor)) = suspended.pop() {
                *input = cursor;
                return Parse::Cont(Alt {
                    branches: vec![(index, next)],
                    hint,
                });
            }
        }
        if suspended.is_empty() {
            let err = last_err.unwrap_or_else(|| ParseError::unexpected(&start, "an alternative"));
            Parse::Error(err)
        } else {
            Parse::Cont(Alt {
                branches: suspended
                    .into_iter()
                    .map(|(index, branch, _, _)| (index, branch))
                    .collect(),
                hint,
            })
        }
    }
}
