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

use crate::value::write_items;
use crate::{write_string_literal, Item, Value};
use std::fmt::{Display, Formatter};

/// A named attribute of a record, `@name(value)`. An attribute without a body has the value
/// [`Value::Extant`].
#[derive(Clone, PartialEq, Debug)]
pub struct Attr {
    pub name: String,
    pub value: Value,
}

impl Attr {
    /// ```
    /// use swimos_model::{Attr, Value};
    ///
    /// assert_eq!(Attr::of("tag").value, Value::Extant);
    /// assert_eq!(Attr::of(("tag", 1)).value, Value::Int32Value(1));
    /// ```
    pub fn of<T: Into<Attr>>(rep: T) -> Attr {
        rep.into()
    }

    pub fn with_value<N: Into<String>, V: Into<Value>>(name: N, value: V) -> Attr {
        Attr {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl From<&str> for Attr {
    fn from(name: &str) -> Self {
        Attr::with_value(name, Value::Extant)
    }
}

impl From<String> for Attr {
    fn from(name: String) -> Self {
        Attr::with_value(name, Value::Extant)
    }
}

impl<N: Into<String>, V: Into<Value>> From<(N, V)> for Attr {
    fn from((name, value): (N, V)) -> Self {
        Attr::with_value(name, value)
    }
}

impl Display for Attr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("@")?;
        write_string_literal(&self.name, f)?;
        match &self.value {
            Value::Extant => Ok(()),
            // Empty bodies and lone value items are only kept apart from a nested record when
            // the record keeps its braces.
            Value::Record(attrs, items)
                if attrs.is_empty() && !matches!(items.as_slice(), [] | [Item::ValueItem(_)]) =>
            {
                f.write_str("(")?;
                write_items(items, f)?;
                f.write_str(")")
            }
            body => write!(f, "({})", body),
        }
    }
}
