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

//! # SwimOS Model
//!
//! The generic representation of the SwimOS serialization model. Any value that can be read from
//! Recon can be represented as a [`Value`]: a scalar, or a record consisting of a sequence of
//! attributes followed by a body of items.

use std::borrow::Cow;
use std::fmt::Formatter;

mod attr;
mod blob;
pub mod identifier;
mod item;
mod value;

pub use attr::Attr;
pub use bigdecimal;
pub use blob::Blob;
pub use item::Item;
pub use num_bigint as bigint;
pub use value::{Value, ValueKind};

/// Words that are valid identifiers but which would be read back as a literal of another kind.
const KEYWORDS: [&str; 5] = ["true", "false", "nan", "inf", "infinity"];

/// Write a string as a Recon text literal. Identifiers are written bare, all other strings are
/// quoted (with escapes applied where needed).
pub fn write_string_literal(literal: &str, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
    if identifier::is_identifier(literal) && !KEYWORDS.contains(&literal) {
        f.write_str(literal)
    } else {
        write!(f, "\"{}\"", escape_if_needed(literal))
    }
}

pub fn escape_if_needed(text: &str) -> Cow<str> {
    if needs_escape(text) {
        Cow::Owned(escape_text(text))
    } else {
        Cow::Borrowed(text)
    }
}

fn escape_text(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        let escape = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\r' => "\\r",
            '\n' => "\\n",
            '\t' => "\\t",
            '\u{08}' => "\\b",
            '\u{0c}' => "\\f",
            control if control < '\u{20}' => {
                output.push_str(&format!("\\u{:04x}", u32::from(control)));
                continue;
            }
            _ => {
                output.push(c);
                continue;
            }
        };
        output.push_str(escape);
    }
    output
}

fn needs_escape(text: &str) -> bool {
    text.chars().any(|c| c < '\u{20}' || c == '"' || c == '\\')
}
