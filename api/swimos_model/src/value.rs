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

use crate::{write_string_literal, Attr, Blob, Item};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::fmt::{Display, Formatter};

/// The core SwimOS model type. A recursive data type that can be represented in text as a Recon
/// document.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// A defined value that carries no data.
    #[default]
    Extant,

    Int32Value(i32),

    Int64Value(i64),

    Float32Value(f32),

    Float64Value(f64),

    BooleanValue(bool),

    BigInt(BigInt),

    BigDecimal(BigDecimal),

    Text(String),

    /// A compound value consisting of any number of attributes followed by any number of items.
    Record(Vec<Attr>, Vec<Item>),

    /// A binary blob of data.
    Data(Blob),
}

/// Discriminant of the variants of [`Value`], used when reporting errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Extant,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    Text,
    Record,
    BigInt,
    BigDecimal,
    Data,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Extant => "Extant",
            ValueKind::Int32 => "Int32",
            ValueKind::Int64 => "Int64",
            ValueKind::Float32 => "Float32",
            ValueKind::Float64 => "Float64",
            ValueKind::Boolean => "Boolean",
            ValueKind::Text => "Text",
            ValueKind::Record => "Record",
            ValueKind::BigInt => "BigInt",
            ValueKind::BigDecimal => "BigDecimal",
            ValueKind::Data => "Data",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn text<T: Into<String>>(x: T) -> Value {
        Value::Text(x.into())
    }

    pub fn record(attrs: Vec<Attr>, items: Vec<Item>) -> Value {
        Value::Record(attrs, items)
    }

    /// Create a record from a vector of anything that can be converted to an [`Item`].
    pub fn from_vec<I: Into<Item>>(items: Vec<I>) -> Value {
        Value::Record(vec![], items.into_iter().map(Into::into).collect())
    }

    pub fn empty_record() -> Value {
        Value::Record(vec![], vec![])
    }

    /// Create a record with a single attribute and no items.
    pub fn of_attr<A: Into<Attr>>(attr: A) -> Value {
        Value::Record(vec![attr.into()], vec![])
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Extant => ValueKind::Extant,
            Value::Int32Value(_) => ValueKind::Int32,
            Value::Int64Value(_) => ValueKind::Int64,
            Value::Float32Value(_) => ValueKind::Float32,
            Value::Float64Value(_) => ValueKind::Float64,
            Value::BooleanValue(_) => ValueKind::Boolean,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::BigDecimal(_) => ValueKind::BigDecimal,
            Value::Text(_) => ValueKind::Text,
            Value::Record(_, _) => ValueKind::Record,
            Value::Data(_) => ValueKind::Data,
        }
    }

    fn as_integral(&self) -> Option<BigInt> {
        match self {
            Value::Int32Value(n) => Some(BigInt::from(*n)),
            Value::Int64Value(n) => Some(BigInt::from(*n)),
            Value::BigInt(n) => Some(n.clone()),
            _ => None,
        }
    }
}

fn float_eq(left: &Value, right: &Value) -> Option<bool> {
    let same = |x: f64, y: f64| x == y || (x.is_nan() && y.is_nan());
    match (left, right) {
        (Value::Float64Value(x), Value::Float64Value(y)) => Some(same(*x, *y)),
        (Value::Float32Value(x), Value::Float32Value(y)) => {
            Some(same(f64::from(*x), f64::from(*y)))
        }
        // Widening is exact so this stays transitive with the other two cases.
        (Value::Float32Value(x), Value::Float64Value(y))
        | (Value::Float64Value(y), Value::Float32Value(x)) => Some(same(f64::from(*x), *y)),
        _ => None,
    }
}

/// Numeric values are compared by value within the integral and floating point families so that
/// a value read back from its Recon representation is equal to the original, whatever width the
/// literal was read at.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Extant, Value::Extant) => true,
            (Value::BooleanValue(x), Value::BooleanValue(y)) => x == y,
            (Value::Text(x), Value::Text(y)) => x == y,
            (Value::Data(x), Value::Data(y)) => x == y,
            (Value::BigDecimal(x), Value::BigDecimal(y)) => x == y,
            (Value::Record(attrs1, items1), Value::Record(attrs2, items2)) => {
                attrs1 == attrs2 && items1 == items2
            }
            (l, r) => {
                if let Some(eq) = float_eq(l, r) {
                    eq
                } else {
                    match (l.as_integral(), r.as_integral()) {
                        (Some(x), Some(y)) => x == y,
                        _ => false,
                    }
                }
            }
        }
    }
}

fn write_float(f: &mut Formatter<'_>, value: f64, rep: String) -> std::fmt::Result {
    if value.is_nan() {
        f.write_str("nan")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "inf" } else { "-inf" })
    } else if rep.contains(['.', 'e', 'E']) {
        f.write_str(&rep)
    } else {
        write!(f, "{}.0", rep)
    }
}

pub(crate) fn write_items(items: &[Item], f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut it = items.iter();
    if let Some(first) = it.next() {
        write!(f, "{}", first)?;
    }
    for item in it {
        write!(f, ",{}", item)?;
    }
    Ok(())
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Extant => Ok(()),
            Value::Int32Value(n) => write!(f, "{}", n),
            Value::Int64Value(n) => write!(f, "{}", n),
            Value::Float32Value(x) => {
                let widened = f64::from(*x);
                write_float(f, widened, format!("{:?}", widened))
            }
            Value::Float64Value(x) => write_float(f, *x, format!("{:?}", x)),
            Value::BooleanValue(p) => write!(f, "{}", p),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::BigDecimal(d) => {
                let rep = d.to_string();
                if rep.contains(['.', 'e', 'E']) {
                    f.write_str(&rep)
                } else {
                    write!(f, "{}.0", rep)
                }
            }
            Value::Text(text) => write_string_literal(text, f),
            Value::Data(blob) => write!(f, "{}", blob),
            Value::Record(attrs, items) => {
                for attr in attrs {
                    write!(f, "{}", attr)?;
                }
                if attrs.is_empty() || !items.is_empty() {
                    f.write_str("{")?;
                    write_items(items, f)?;
                    f.write_str("}")
                } else {
                    Ok(())
                }
            }
        }
    }
}

macro_rules! from_primitive {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

from_primitive! {
    i32 => Int32Value,
    i64 => Int64Value,
    f32 => Float32Value,
    f64 => Float64Value,
    bool => BooleanValue,
    BigInt => BigInt,
    BigDecimal => BigDecimal,
    String => Text,
    Blob => Data
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Extant
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Data(Blob::from_vec(value))
    }
}
