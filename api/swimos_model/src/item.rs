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

use crate::Value;
use std::fmt::{Display, Formatter};

/// One entry in the body of a record: either a bare value or a `key: value` slot.
#[derive(Clone, PartialEq, Debug)]
pub enum Item {
    ValueItem(Value),
    Slot(Value, Value),
}

impl Item {
    /// Convert a value, or a `(key, value)` pair for a slot, into an item.
    ///
    /// ```
    /// use swimos_model::{Item, Value};
    ///
    /// assert_eq!(Item::of(3), Item::ValueItem(Value::Int32Value(3)));
    /// assert_eq!(Item::of(("on", true)), Item::slot("on", true));
    /// ```
    pub fn of<I: Into<Item>>(item: I) -> Item {
        item.into()
    }

    pub fn slot<K: Into<Value>, V: Into<Value>>(key: K, value: V) -> Item {
        Item::Slot(key.into(), value.into())
    }
}

impl<V: Into<Value>> From<V> for Item {
    fn from(value: V) -> Self {
        Item::ValueItem(value.into())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<(K, V)> for Item {
    fn from((key, value): (K, V)) -> Self {
        Item::slot(key, value)
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Item::ValueItem(value) => value.fmt(f),
            Item::Slot(key, value) => {
                key.fmt(f)?;
                f.write_str(":")?;
                value.fmt(f)
            }
        }
    }
}
