use std::any::Any;

use crate::error::FieldError;
use crate::value::{FieldKind, Value};

/// A scalar type that can describe itself as text.
///
/// Implementing this gives a user type codec support without a dedicated
/// `Value` variant: the store carries the rendered text and the record
/// parses it back on load. `render_text` and `parse_text` must be exact
/// inverses for every value the type can hold.
pub trait TextScalar: Sized {
    /// Render the value to its canonical text form.
    fn render_text(&self) -> String;

    /// Parse the canonical text form back into a value.
    fn parse_text(text: &str) -> Result<Self, String>;
}

/// Built-in scalar field types usable directly in [`define_record!`].
///
/// Implemented for `bool`, `String`, and the supported integer and float
/// widths. Not implementable for other types; self-describing scalars go
/// through [`TextScalar`] instead.
pub trait BuiltinScalar: Sized {
    /// The kind tag of this scalar type.
    const KIND: FieldKind;

    /// Wrap the scalar in a [`Value`].
    fn to_value(&self) -> Value;

    /// Extract the scalar from a [`Value`], or report a kind mismatch for
    /// the named field.
    fn from_value(field: &str, value: Value) -> Result<Self, FieldError>;
}

macro_rules! impl_builtin_scalar {
    ($ty:ty, $variant:ident) => {
        impl BuiltinScalar for $ty {
            const KIND: FieldKind = FieldKind::$variant;

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(field: &str, value: Value) -> Result<Self, FieldError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(FieldError::KindMismatch {
                        field: field.to_string(),
                        expected: FieldKind::$variant,
                        got: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_builtin_scalar!(bool, Bool);
impl_builtin_scalar!(String, Text);
impl_builtin_scalar!(i32, I32);
impl_builtin_scalar!(u32, U32);
impl_builtin_scalar!(i64, I64);
impl_builtin_scalar!(u64, U64);
impl_builtin_scalar!(f64, F64);

/// Declaration of a single storable member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Attribute name of the member in the persistence format.
    pub name: String,
    /// Kind tag driving codec dispatch.
    pub kind: FieldKind,
    /// Explicit opt-out: the member is declared but never persisted.
    pub ignore: bool,
}

impl FieldSpec {
    /// A member of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ignore: false,
        }
    }

    /// A self-describing scalar member (see [`TextScalar`]).
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Custom)
    }

    /// A declared member with no codec support.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Opaque)
    }

    /// Mark the member as opted out of persistence.
    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

/// The ordered member declarations of one record shape.
///
/// Order is the declaration order and must be deterministic for a given
/// shape; the registry caches the filtered list once at registration and
/// the persistence layer relies on it staying stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeDescriptor {
    fields: Vec<FieldSpec>,
}

impl ShapeDescriptor {
    /// An empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one member declaration.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Compose this descriptor over a base shape's descriptor.
    ///
    /// The base's members are appended after this shape's own, so when both
    /// declare the same name the registry's first-occurrence rule keeps the
    /// redeclaring shape's member.
    pub fn chain(mut self, base: ShapeDescriptor) -> Self {
        self.fields.extend(base.fields);
        self
    }

    /// The declared members, in order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Consume the descriptor.
    pub fn into_fields(self) -> Vec<FieldSpec> {
        self.fields
    }
}

/// Capability contract every registrable record shape implements.
///
/// The store never looks inside a record beyond this trait: it enumerates
/// the declared member table via [`Record::descriptor`] and moves values in
/// and out through [`Record::get`] / [`Record::set`]. Shapes are registered
/// with a `Default` bound; the store instantiates them through it on create
/// and on load.
///
/// Most implementations come from [`define_record!`](crate::define_record);
/// hand-written impls are fine as long as `descriptor()` returns the same
/// ordered table every time.
pub trait Record: Any {
    /// Declared member table, in deterministic declaration order.
    fn descriptor() -> ShapeDescriptor
    where
        Self: Sized;

    /// Read a member by its attribute name.
    ///
    /// Returns `None` for names the shape does not declare.
    fn get(&self, field: &str) -> Option<Value>;

    /// Write a member by its attribute name.
    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldError>;

    /// Upcast for typed access to the concrete shape.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed access to the concrete shape.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scalar_roundtrip() {
        assert_eq!(42i64.to_value(), Value::I64(42));
        assert_eq!(i64::from_value("Age", Value::I64(42)), Ok(42));
        assert_eq!(
            String::from_value("Label", Value::Text("x".into())),
            Ok("x".to_string())
        );
    }

    #[test]
    fn builtin_scalar_kind_mismatch() {
        let err = i32::from_value("Age", Value::Text("24".into())).unwrap_err();
        assert_eq!(
            err,
            FieldError::KindMismatch {
                field: "Age".to_string(),
                expected: FieldKind::I32,
                got: FieldKind::Text,
            }
        );
    }

    #[test]
    fn descriptor_preserves_declaration_order() {
        let desc = ShapeDescriptor::new()
            .field(FieldSpec::new("B", FieldKind::Bool))
            .field(FieldSpec::new("A", FieldKind::Text));
        let names: Vec<&str> = desc.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn chain_appends_base_after_own() {
        let base = ShapeDescriptor::new()
            .field(FieldSpec::new("Shared", FieldKind::Text))
            .field(FieldSpec::new("BaseOnly", FieldKind::I64));
        let derived = ShapeDescriptor::new()
            .field(FieldSpec::new("Shared", FieldKind::I32))
            .chain(base);
        let names: Vec<&str> = derived.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Shared", "Shared", "BaseOnly"]);
        // First occurrence is the derived declaration.
        assert_eq!(derived.fields()[0].kind, FieldKind::I32);
    }

    #[test]
    fn ignored_flag() {
        let spec = FieldSpec::new("Cache", FieldKind::Text).ignored();
        assert!(spec.ignore);
        assert!(!FieldSpec::custom("Color").ignore);
    }
}
