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


use crate::config::ParserConfig;
use crate::parser::combinators::{Alt, AltHint, Boxed, Chain};
use crate::parser::cursor::{Cursor, Location};
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::machine::{Parse, StateParser};
use crate::parser::tokens::{
    attribute, end_of_attrs, end_of_input, literals, newline, punct, Token, Whitespace,
};
use smallvec::{smallvec, SmallVec};
use swimos_form::structural::read::event::ReadEvent;

/// The events produced by a single token.
pub type ParseEvents = SmallVec<[ReadEvent; 3]>;

/// Progress made by an [`IncrementalReconParser`].
#[derive(Debug, PartialEq)]
pub enum Progress {
    /// The next events of the document.
    Events(ParseEvents),
    /// The input ran out. The unconsumed input should be presented again with the next fragment.
    NeedMore,
    /// The document is complete.
    Complete,
}

/// The states of the parser. Each record (or attribute body) that is open has its own frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Init,
    AfterAttr,
    AttrBodyStartOrNl,
    AttrBodyAfterValue,
    AttrBodyAfterSlot,
    AttrBodySlot,
    AttrBodyAfterSep,
    RecordBodyStartOrNl,
    RecordBodyAfterValue,
    RecordBodyAfterSlot,
    RecordBodySlot,
    RecordBodyAfterSep,
    DocumentStartOrNl,
    DocumentAfterValue,
    DocumentAfterSlot,
    DocumentSlot,
    DocumentAfterSep,
}

impl ParseState {
    fn after_item(self) -> Self {
        match self {
            ParseState::Init => ParseState::AfterAttr,
            ParseState::AttrBodyStartOrNl | ParseState::AttrBodyAfterSep => {
                ParseState::AttrBodyAfterValue
            }
            ParseState::AttrBodySlot => ParseState::AttrBodyAfterSlot,
            ParseState::RecordBodyStartOrNl | ParseState::RecordBodyAfterSep => {
                ParseState::RecordBodyAfterValue
            }
            ParseState::RecordBodySlot => ParseState::RecordBodyAfterSlot,
            ParseState::DocumentStartOrNl | ParseState::DocumentAfterSep => {
                ParseState::DocumentAfterValue
            }
            ParseState::DocumentSlot => ParseState::DocumentAfterSlot,
            ow => ow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateChange {
    PopAfterAttr,
    PopAfterItem,
    ChangeState(ParseState),
    PushAttr,
    PushAttrNewRec { has_body: bool },
    PushBody,
    Clear,
}

/// The different sequences of items: the body of an attribute, the body of a record and the
/// top level of a document (a record body without delimiters).
trait ItemsKind {
    fn start_or_nl() -> ParseState;
    fn after_sep() -> ParseState;
    fn start_slot() -> ParseState;
    fn after_value() -> ParseState;
    fn after_slot() -> ParseState;
    /// The closing delimiter or `None` if the items end with the input.
    fn end_delim() -> Option<char>;
    fn end_event() -> ReadEvent;
    fn end_state_change() -> StateChange;
}

struct AttrBody;
struct RecBody;
struct DocBody;

impl ItemsKind for AttrBody {
    fn start_or_nl() -> ParseState {
        ParseState::AttrBodyStartOrNl
    }

    fn after_sep() -> ParseState {
        ParseState::AttrBodyAfterSep
    }

    fn start_slot() -> ParseState {
        ParseState::AttrBodySlot
    }

    fn after_value() -> ParseState {
        ParseState::AttrBodyAfterValue
    }

    fn after_slot() -> ParseState {
        ParseState::AttrBodyAfterSlot
    }

    fn end_delim() -> Option<char> {
        Some(')')
    }

    fn end_event() -> ReadEvent {
        ReadEvent::EndAttribute
    }

    fn end_state_change() -> StateChange {
        StateChange::PopAfterAttr
    }
}

impl ItemsKind for RecBody {
    fn start_or_nl() -> ParseState {
        ParseState::RecordBodyStartOrNl
    }

    fn after_sep() -> ParseState {
        ParseState::RecordBodyAfterSep
    }

    fn start_slot() -> ParseState {
        ParseState::RecordBodySlot
    }

    fn after_value() -> ParseState {
        ParseState::RecordBodyAfterValue
    }

    fn after_slot() -> ParseState {
        ParseState::RecordBodyAfterSlot
    }

    fn end_delim() -> Option<char> {
        Some('}')
    }

    fn end_event() -> ReadEvent {
        ReadEvent::EndRecord
    }

    fn end_state_change() -> StateChange {
        StateChange::PopAfterItem
    }
}

impl ItemsKind for DocBody {
    fn start_or_nl() -> ParseState {
        ParseState::DocumentStartOrNl
    }

    fn after_sep() -> ParseState {
        ParseState::DocumentAfterSep
    }

    fn start_slot() -> ParseState {
        ParseState::DocumentSlot
    }

    fn after_value() -> ParseState {
        ParseState::DocumentAfterValue
    }

    fn after_slot() -> ParseState {
        ParseState::DocumentAfterSlot
    }

    fn end_delim() -> Option<char> {
        None
    }

    fn end_event() -> ReadEvent {
        ReadEvent::EndRecord
    }

    fn end_state_change() -> StateChange {
        StateChange::PopAfterItem
    }
}

/// The sets of tokens that are valid in the different states.
#[derive(Debug, Clone, Copy)]
enum Grammar {
    Init,
    AfterAttr,
    ItemStart,
    Slot,
    AfterValue,
    AfterSlot,
}

const NUM_GRAMMARS: usize = 6;

type TokenParser = Chain<Whitespace, Alt<Boxed<Token>>>;

/// The events and change of state for a token, or the token if it is not valid in the state.
type Transition = Result<(ParseEvents, StateChange), Token>;

/// Incremental parser that reads Recon text as a stream of [`ReadEvent`]s. The parser can be
/// fed the input in fragments of any size, suspending when a fragment ends in the middle of a
/// token.
///
/// # Examples
///
/// ```
/// use swimos_recon::parser::{Cursor, IncrementalReconParser, Progress};
/// use swimos_recon::ParserConfig;
/// use swimos_form::structural::read::event::ReadEvent;
///
/// let mut parser = IncrementalReconParser::new(ParserConfig::default());
/// let mut cursor = Cursor::new("{a}", true);
/// let mut events = vec![];
/// while let Progress::Events(evs) = parser.parse(&mut cursor).unwrap() {
///     events.extend(evs);
/// }
/// assert_eq!(
///     events,
///     vec![
///         ReadEvent::StartBody,
///         ReadEvent::TextValue("a".to_string()),
///         ReadEvent::EndRecord
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct IncrementalReconParser {
    config: ParserConfig,
    stack: Vec<ParseState>,
    pending: Option<TokenParser>,
    hints: [AltHint; NUM_GRAMMARS],
}

impl Default for IncrementalReconParser {
    fn default() -> Self {
        IncrementalReconParser::new(ParserConfig::default())
    }
}

impl IncrementalReconParser {
    /// A parser for a single Recon value.
    pub fn new(config: ParserConfig) -> Self {
        IncrementalReconParser::with_stack(config, ParseState::Init)
    }

    /// A parser for a document: a sequence of items, without record delimiters, that ends with
    /// the input. The events are those of the body of a record, omitting the initial
    /// [`ReadEvent::StartBody`].
    pub fn document(config: ParserConfig) -> Self {
        IncrementalReconParser::with_stack(config, ParseState::DocumentStartOrNl)
    }

    fn with_stack(config: ParserConfig, initial: ParseState) -> Self {
        IncrementalReconParser {
            config,
            stack: vec![initial],
            pending: None,
            hints: Default::default(),
        }
    }

    /// Whether the complete value has been read.
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty()
    }

    /// The number of records and attribute bodies that are open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Parse the next token, consuming input from the cursor.
    pub fn parse(&mut self, input: &mut Cursor<'_>) -> Result<Progress, ParseError> {
        loop {
            let state = match self.stack.last() {
                Some(state) => *state,
                None => return Ok(Progress::Complete),
            };
            let parser = match self.pending.take() {
                Some(parser) => parser,
                None => self.token_parser(state),
            };
            let before = *input;
            match parser.feed(input) {
                Parse::Done(token) => {
                    let (events, change) = transition(state, token).map_err(|_| {
                        misplaced(input.consumed_since(&before), before.location())
                    })?;
                    self.apply(change);
                    if !events.is_empty() {
                        return Ok(Progress::Events(events));
                    }
                }
                Parse::Error(err) => return Err(err),
                Parse::Cont(parser) => {
                    self.pending = Some(parser);
                    return Ok(Progress::NeedMore);
                }
            }
        }
    }

    fn apply(&mut self, change: StateChange) {
        let IncrementalReconParser { stack, .. } = self;
        match change {
            StateChange::PopAfterAttr => {
                stack.pop();
                if let Some(top) = stack.last_mut() {
                    *top = ParseState::AfterAttr;
                }
            }
            StateChange::PopAfterItem => {
                stack.pop();
                if let Some(top) = stack.last_mut() {
                    *top = top.after_item();
                }
            }
            StateChange::ChangeState(state) => {
                if let Some(top) = stack.last_mut() {
                    *top = state;
                }
            }
            StateChange::PushAttr => stack.push(ParseState::AttrBodyStartOrNl),
            StateChange::PushAttrNewRec { has_body: true } => {
                stack.push(ParseState::Init);
                stack.push(ParseState::AttrBodyStartOrNl);
            }
            StateChange::PushAttrNewRec { has_body: false } => stack.push(ParseState::AfterAttr),
            StateChange::PushBody => stack.push(ParseState::RecordBodyStartOrNl),
            StateChange::Clear => stack.clear(),
        }
    }

    fn token_parser(&self, state: ParseState) -> TokenParser {
        let (grammar, branches) = match state {
            ParseState::Init => (Grammar::Init, init_tokens()),
            ParseState::AfterAttr => (Grammar::AfterAttr, after_attr_tokens()),
            ParseState::AttrBodyStartOrNl | ParseState::AttrBodyAfterSep => {
                (Grammar::ItemStart, item_start_tokens::<AttrBody>())
            }
            ParseState::AttrBodySlot => (Grammar::Slot, slot_tokens::<AttrBody>()),
            ParseState::AttrBodyAfterValue => {
                (Grammar::AfterValue, after_value_tokens::<AttrBody>())
            }
            ParseState::AttrBodyAfterSlot => (Grammar::AfterSlot, after_slot_tokens::<AttrBody>()),
            ParseState::RecordBodyStartOrNl | ParseState::RecordBodyAfterSep => {
                (Grammar::ItemStart, item_start_tokens::<RecBody>())
            }
            ParseState::RecordBodySlot => (Grammar::Slot, slot_tokens::<RecBody>()),
            ParseState::RecordBodyAfterValue => {
                (Grammar::AfterValue, after_value_tokens::<RecBody>())
            }
            ParseState::RecordBodyAfterSlot => {
                (Grammar::AfterSlot, after_slot_tokens::<RecBody>())
            }
            ParseState::DocumentStartOrNl | ParseState::DocumentAfterSep => {
                (Grammar::ItemStart, item_start_tokens::<DocBody>())
            }
            ParseState::DocumentSlot => (Grammar::Slot, slot_tokens::<DocBody>()),
            ParseState::DocumentAfterValue => {
                (Grammar::AfterValue, after_value_tokens::<DocBody>())
            }
            ParseState::DocumentAfterSlot => (Grammar::AfterSlot, after_slot_tokens::<DocBody>()),
        };
        let newlines = matches!(grammar, Grammar::Init | Grammar::ItemStart);
        let whitespace = Whitespace::new(newlines, self.config.allow_comments);
        let hint = self.hints[grammar as usize].clone();
        Chain::new(whitespace, Alt::with_hint(branches, hint))
    }
}

fn end_token<K: ItemsKind>() -> Boxed<Token> {
    match K::end_delim() {
        Some(c) => punct(c),
        None => end_of_input(),
    }
}

fn init_tokens() -> Vec<Boxed<Token>> {
    let mut branches = literals();
    branches.extend([attribute(), punct('{'), end_of_input()]);
    branches
}

fn after_attr_tokens() -> Vec<Boxed<Token>> {
    let mut branches = literals();
    branches.extend([attribute(), punct('{')]);
    branches.extend(end_of_attrs());
    branches
}

fn item_start_tokens<K: ItemsKind>() -> Vec<Boxed<Token>> {
    let mut branches = literals();
    branches.extend([
        punct(','),
        punct(';'),
        punct(':'),
        end_token::<K>(),
        attribute(),
        punct('{'),
    ]);
    branches
}

fn slot_tokens<K: ItemsKind>() -> Vec<Boxed<Token>> {
    let mut branches = literals();
    branches.extend([
        newline(),
        punct(','),
        punct(';'),
        end_token::<K>(),
        attribute(),
        punct('{'),
    ]);
    branches
}

fn after_value_tokens<K: ItemsKind>() -> Vec<Boxed<Token>> {
    vec![
        newline(),
        punct(','),
        punct(';'),
        punct(':'),
        end_token::<K>(),
    ]
}

fn after_slot_tokens<K: ItemsKind>() -> Vec<Boxed<Token>> {
    vec![newline(), punct(','), punct(';'), end_token::<K>()]
}

fn transition(state: ParseState, token: Token) -> Transition {
    match state {
        ParseState::Init => init(token),
        ParseState::AfterAttr => after_attr(token),
        ParseState::AttrBodyStartOrNl => item_start::<AttrBody>(token, false),
        ParseState::AttrBodyAfterSep => item_start::<AttrBody>(token, true),
        ParseState::AttrBodySlot => slot_value::<AttrBody>(token),
        ParseState::AttrBodyAfterValue => after_value::<AttrBody>(token),
        ParseState::AttrBodyAfterSlot => after_slot::<AttrBody>(token),
        ParseState::RecordBodyStartOrNl => item_start::<RecBody>(token, false),
        ParseState::RecordBodyAfterSep => item_start::<RecBody>(token, true),
        ParseState::RecordBodySlot => slot_value::<RecBody>(token),
        ParseState::RecordBodyAfterValue => after_value::<RecBody>(token),
        ParseState::RecordBodyAfterSlot => after_slot::<RecBody>(token),
        ParseState::DocumentStartOrNl => item_start::<DocBody>(token, false),
        ParseState::DocumentAfterSep => item_start::<DocBody>(token, true),
        ParseState::DocumentSlot => slot_value::<DocBody>(token),
        ParseState::DocumentAfterValue => after_value::<DocBody>(token),
        ParseState::DocumentAfterSlot => after_slot::<DocBody>(token),
    }
}

/// A token that the grammar for a state admits but the state does not handle.
fn misplaced(consumed: &str, location: Location) -> ParseError {
    let kind = match consumed.trim_start().chars().next() {
        Some(found) => ParseErrorKind::UnexpectedChar {
            found,
            expected: "an item or a separator",
        },
        None => ParseErrorKind::UnexpectedEnd,
    };
    ParseError::new(kind, location)
}

fn is_end<K: ItemsKind>(token: &Token) -> bool {
    match (K::end_delim(), token) {
        (Some(delim), Token::Punct(c)) => *c == delim,
        (None, Token::End) => true,
        _ => false,
    }
}

fn is_sep(token: &Token) -> bool {
    matches!(token, Token::Punct(',' | ';'))
}

fn attr_events(name: String, has_body: bool) -> ParseEvents {
    if has_body {
        smallvec![ReadEvent::StartAttribute(name)]
    } else {
        smallvec![ReadEvent::StartAttribute(name), ReadEvent::EndAttribute]
    }
}

fn init(token: Token) -> Transition {
    match token {
        Token::Value(event) => Ok((smallvec![event], StateChange::Clear)),
        Token::Attr { name, has_body } => {
            let change = if has_body {
                StateChange::PushAttr
            } else {
                StateChange::ChangeState(ParseState::AfterAttr)
            };
            Ok((attr_events(name, has_body), change))
        }
        Token::Punct('{') => Ok((
            smallvec![ReadEvent::StartBody],
            StateChange::ChangeState(ParseState::RecordBodyStartOrNl),
        )),
        Token::End => Ok((smallvec![ReadEvent::Extant], StateChange::Clear)),
        ow => Err(ow),
    }
}

fn after_attr(token: Token) -> Transition {
    match token {
        Token::Value(event) => Ok((
            smallvec![ReadEvent::StartBody, event, ReadEvent::EndRecord],
            StateChange::PopAfterItem,
        )),
        Token::Attr { name, has_body } => {
            let change = if has_body {
                StateChange::PushAttr
            } else {
                StateChange::ChangeState(ParseState::AfterAttr)
            };
            Ok((attr_events(name, has_body), change))
        }
        Token::Punct('{') => Ok((
            smallvec![ReadEvent::StartBody],
            StateChange::ChangeState(ParseState::RecordBodyStartOrNl),
        )),
        Token::EndOfAttrs => Ok((
            smallvec![ReadEvent::StartBody, ReadEvent::EndRecord],
            StateChange::PopAfterItem,
        )),
        ow => Err(ow),
    }
}

fn nested(token: Token) -> Transition {
    match token {
        Token::Attr { name, has_body } => Ok((
            attr_events(name, has_body),
            StateChange::PushAttrNewRec { has_body },
        )),
        Token::Punct('{') => Ok((smallvec![ReadEvent::StartBody], StateChange::PushBody)),
        ow => Err(ow),
    }
}

fn item_start<K: ItemsKind>(token: Token, item_required: bool) -> Transition {
    match token {
        Token::Value(event) => Ok((
            smallvec![event],
            StateChange::ChangeState(K::after_value()),
        )),
        t if is_end::<K>(&t) => {
            let events = if item_required {
                smallvec![ReadEvent::Extant, K::end_event()]
            } else {
                smallvec![K::end_event()]
            };
            Ok((events, K::end_state_change()))
        }
        t if is_sep(&t) => Ok((
            smallvec![ReadEvent::Extant],
            StateChange::ChangeState(K::after_sep()),
        )),
        Token::Punct(':') => Ok((
            smallvec![ReadEvent::Extant, ReadEvent::Slot],
            StateChange::ChangeState(K::start_slot()),
        )),
        ow => nested(ow),
    }
}

fn slot_value<K: ItemsKind>(token: Token) -> Transition {
    match token {
        Token::Value(event) => Ok((
            smallvec![event],
            StateChange::ChangeState(K::after_slot()),
        )),
        t if is_end::<K>(&t) => Ok((
            smallvec![ReadEvent::Extant, K::end_event()],
            K::end_state_change(),
        )),
        t if is_sep(&t) => Ok((
            smallvec![ReadEvent::Extant],
            StateChange::ChangeState(K::after_sep()),
        )),
        Token::Newline => Ok((
            smallvec![ReadEvent::Extant],
            StateChange::ChangeState(K::start_or_nl()),
        )),
        ow => nested(ow),
    }
}

fn after_value<K: ItemsKind>(token: Token) -> Transition {
    match token {
        Token::Punct(':') => Ok((
            smallvec![ReadEvent::Slot],
            StateChange::ChangeState(K::start_slot()),
        )),
        ow => after_slot::<K>(ow),
    }
}

fn after_slot<K: ItemsKind>(token: Token) -> Transition {
    match token {
        t if is_end::<K>(&t) => Ok((smallvec![K::end_event()], K::end_state_change())),
        t if is_sep(&t) => Ok((
            SmallVec::new(),
            StateChange::ChangeState(K::after_sep()),
        )),
        Token::Newline => Ok((
            SmallVec::new(),
            StateChange::ChangeState(K::start_or_nl()),
        )),
        ow => Err(ow),
    }
}
