use std::fmt;

use serde::{Deserialize, Serialize};

/// The kinds of member values the store understands.
///
/// The first seven are the built-in scalar kinds with direct codec support.
/// `Custom` marks a self-describing scalar: its value crosses the codec
/// boundary as rendered text. `Opaque` marks a declared member the codec
/// cannot handle; whether it is dropped at registration or fails at first
/// use is decided by the registry's unsupported-member policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Bool,
    Text,
    I32,
    U32,
    I64,
    U64,
    F64,
    Custom,
    Opaque,
}

impl FieldKind {
    /// Returns `true` if the codec can render and parse this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldKind::Opaque)
    }

    /// Returns `true` if values of this kind are carried as text.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Custom)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::Text => "text",
            FieldKind::I32 => "i32",
            FieldKind::U32 => "u32",
            FieldKind::I64 => "i64",
            FieldKind::U64 => "u64",
            FieldKind::F64 => "f64",
            FieldKind::Custom => "custom scalar",
            FieldKind::Opaque => "opaque",
        };
        write!(f, "{name}")
    }
}

/// One storable member value.
///
/// Custom scalars do not get their own variant: they enter and leave the
/// store as `Value::Text` of their rendered form, and the owning record
/// parses the text back in its [`Record::set`](crate::Record::set) impl.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Text(String),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Value {
    /// The kind of this value. Text carrying a custom scalar reports `Text`.
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Bool(_) => FieldKind::Bool,
            Value::Text(_) => FieldKind::Text,
            Value::I32(_) => FieldKind::I32,
            Value::U32(_) => FieldKind::U32,
            Value::I64(_) => FieldKind::I64,
            Value::U64(_) => FieldKind::U64,
            Value::F64(_) => FieldKind::F64,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}
