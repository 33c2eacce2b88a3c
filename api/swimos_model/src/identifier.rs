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

//! Character classes of Recon identifiers. Identifiers are written without quotes and are read
//! back as text, unless they spell one of the keyword literals.

/// Non-ASCII code points that may begin an identifier, as inclusive ranges.
const START_RANGES: [(char, char); 14] = [
    ('\u{b7}', '\u{b7}'),
    ('\u{c0}', '\u{d6}'),
    ('\u{d8}', '\u{f6}'),
    ('\u{f8}', '\u{37d}'),
    ('\u{37f}', '\u{1fff}'),
    ('\u{200c}', '\u{200d}'),
    ('\u{203f}', '\u{2040}'),
    ('\u{2070}', '\u{218f}'),
    ('\u{2c00}', '\u{2fef}'),
    ('\u{3001}', '\u{d7ff}'),
    ('\u{f900}', '\u{fdcf}'),
    ('\u{fdf0}', '\u{fffd}'),
    ('\u{10000}', '\u{effff}'),
    ('_', '_'),
];

/// Whether `c` may be the first character of an identifier.
///
/// ```
/// use swimos_model::identifier::is_identifier_start;
///
/// assert!(is_identifier_start('x'));
/// assert!(is_identifier_start('_'));
/// assert!(is_identifier_start('é'));
/// assert!(!is_identifier_start('7'));
/// assert!(!is_identifier_start('-'));
/// ```
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic()
        || START_RANGES
            .iter()
            .any(|&(first, last)| first <= c && c <= last)
}

/// Whether `c` may occur after the first character of an identifier. Digits and `-` are
/// permitted here but not at the start.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_digit() || c == '-' || is_identifier_start(c)
}

/// Whether the whole of `name` is an identifier.
///
/// ```
/// use swimos_model::identifier::is_identifier;
///
/// assert!(is_identifier("node-1"));
/// assert!(!is_identifier("1node"));
/// assert!(!is_identifier("a b"));
/// assert!(!is_identifier(""));
/// ```
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_char)
}
