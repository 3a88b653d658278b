//! The [`define_record!`](crate::define_record) macro.
//!
//! Generates a record struct plus its [`Record`](crate::Record) impl from a
//! compact member table, so downstream shapes never hand-write get/set
//! dispatch. Each line binds an attribute name to a struct field:
//!
//! ```
//! stow_types::define_record! {
//!     /// A worker.
//!     pub struct Worker {
//!         "Age" => age: i64,
//!         "Label" => label: String,
//!     }
//! }
//!
//! let mut w = Worker::default();
//! w.age = 24;
//! assert_eq!(
//!     stow_types::Record::get(&w, "Age"),
//!     Some(stow_types::Value::I64(24))
//! );
//! ```
//!
//! Field types are the built-in scalars (`bool`, `String`, `i32`, `u32`,
//! `i64`, `u64`, `f64`). Prefix a line with `custom` to use a
//! [`TextScalar`](crate::TextScalar) type, or with `ignore` to declare a
//! member that is never persisted. Custom and ignored field types must
//! still implement `Default`, `Debug`, `Clone`, and `PartialEq` for the
//! derives on the generated struct.

/// Define a record struct and derive its [`Record`](crate::Record) impl.
#[macro_export]
macro_rules! define_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $($marker:ident)? $attr:literal => $field:ident : $fty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $( pub $field: $fty, )+
        }

        impl $crate::Record for $name {
            fn descriptor() -> $crate::ShapeDescriptor {
                $crate::ShapeDescriptor::new()
                    $( .field($crate::define_record!(@spec $($marker)? $attr, $fty)) )+
            }

            fn get(&self, field: &str) -> ::std::option::Option<$crate::Value> {
                match field {
                    $( $attr => ::std::option::Option::Some(
                        $crate::define_record!(@get $($marker)? self, $field)
                    ), )+
                    _ => ::std::option::Option::None,
                }
            }

            fn set(
                &mut self,
                field: &str,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::FieldError> {
                match field {
                    $( $attr => {
                        $crate::define_record!(@set $($marker)? self, $field, $attr, $fty, value);
                        ::std::result::Result::Ok(())
                    } )+
                    _ => ::std::result::Result::Err(
                        $crate::FieldError::NoSuchField(field.to_string()),
                    ),
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };

    // -- member table entries -------------------------------------------

    (@spec ignore $attr:literal, $fty:ty) => {
        $crate::FieldSpec::new($attr, <$fty as $crate::BuiltinScalar>::KIND).ignored()
    };
    (@spec custom $attr:literal, $fty:ty) => {
        $crate::FieldSpec::custom($attr)
    };
    (@spec $attr:literal, $fty:ty) => {
        $crate::FieldSpec::new($attr, <$fty as $crate::BuiltinScalar>::KIND)
    };

    // -- member reads -----------------------------------------------------

    (@get ignore $self_:ident, $field:ident) => {
        $crate::BuiltinScalar::to_value(&$self_.$field)
    };
    (@get custom $self_:ident, $field:ident) => {
        $crate::Value::Text($crate::TextScalar::render_text(&$self_.$field))
    };
    (@get $self_:ident, $field:ident) => {
        $crate::BuiltinScalar::to_value(&$self_.$field)
    };

    // -- member writes ----------------------------------------------------

    (@set ignore $self_:ident, $field:ident, $attr:literal, $fty:ty, $value:ident) => {
        $self_.$field = <$fty as $crate::BuiltinScalar>::from_value($attr, $value)?
    };
    (@set custom $self_:ident, $field:ident, $attr:literal, $fty:ty, $value:ident) => {
        match $value {
            $crate::Value::Text(text) => {
                $self_.$field = <$fty as $crate::TextScalar>::parse_text(&text).map_err(
                    |message| $crate::FieldError::Parse {
                        field: $attr.to_string(),
                        message,
                    },
                )?;
            }
            other => {
                return ::std::result::Result::Err($crate::FieldError::KindMismatch {
                    field: $attr.to_string(),
                    expected: $crate::FieldKind::Custom,
                    got: other.kind(),
                });
            }
        }
    };
    (@set $self_:ident, $field:ident, $attr:literal, $fty:ty, $value:ident) => {
        $self_.$field = <$fty as $crate::BuiltinScalar>::from_value($attr, $value)?
    };
}

#[cfg(test)]
mod tests {
    use crate::{FieldError, FieldKind, FieldSpec, Record, TextScalar, Value};

    define_record! {
        /// Test shape covering every built-in scalar.
        pub struct Sample {
            "Flag" => flag: bool,
            "Label" => label: String,
            "Small" => small: i32,
            "Count" => count: u32,
            "Age" => age: i64,
            "Big" => big: u64,
            "Ratio" => ratio: f64,
        }
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
    }

    impl TextScalar for Point {
        fn render_text(&self) -> String {
            format!("{},{}", self.x, self.y)
        }

        fn parse_text(text: &str) -> Result<Self, String> {
            let (x, y) = text
                .split_once(',')
                .ok_or_else(|| format!("expected 'x,y', got '{text}'"))?;
            Ok(Point {
                x: x.parse().map_err(|_| format!("bad x in '{text}'"))?,
                y: y.parse().map_err(|_| format!("bad y in '{text}'"))?,
            })
        }
    }

    define_record! {
        struct Marker {
            "Label" => label: String,
            custom "Pos" => pos: Point,
            ignore "Cache" => cache: String,
        }
    }

    #[test]
    fn descriptor_lists_members_in_declaration_order() {
        let names: Vec<String> = Sample::descriptor()
            .into_fields()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            ["Flag", "Label", "Small", "Count", "Age", "Big", "Ratio"]
        );
    }

    #[test]
    fn descriptor_kinds_follow_field_types() {
        let fields = Sample::descriptor().into_fields();
        assert_eq!(fields[0].kind, FieldKind::Bool);
        assert_eq!(fields[1].kind, FieldKind::Text);
        assert_eq!(fields[4].kind, FieldKind::I64);
        assert_eq!(fields[6].kind, FieldKind::F64);
    }

    #[test]
    fn get_and_set_builtins() {
        let mut s = Sample::default();
        s.set("Age", Value::I64(24)).unwrap();
        s.set("Label", Value::Text("hello".into())).unwrap();
        assert_eq!(s.age, 24);
        assert_eq!(s.get("Age"), Some(Value::I64(24)));
        assert_eq!(s.get("Label"), Some(Value::Text("hello".into())));
        assert_eq!(s.get("Nope"), None);
    }

    #[test]
    fn set_rejects_wrong_kind() {
        let mut s = Sample::default();
        let err = s.set("Age", Value::Text("24".into())).unwrap_err();
        assert!(matches!(err, FieldError::KindMismatch { .. }));
        // Nothing was written.
        assert_eq!(s.age, 0);
    }

    #[test]
    fn set_rejects_unknown_field() {
        let mut s = Sample::default();
        let err = s.set("Nope", Value::Bool(true)).unwrap_err();
        assert_eq!(err, FieldError::NoSuchField("Nope".to_string()));
    }

    #[test]
    fn custom_scalar_renders_and_parses() {
        let mut m = Marker::default();
        m.pos = Point { x: 3, y: -7 };
        assert_eq!(m.get("Pos"), Some(Value::Text("3,-7".into())));

        m.set("Pos", Value::Text("10,20".into())).unwrap();
        assert_eq!(m.pos, Point { x: 10, y: 20 });
    }

    #[test]
    fn custom_scalar_surfaces_parse_failures() {
        let mut m = Marker::default();
        let err = m.set("Pos", Value::Text("garbage".into())).unwrap_err();
        assert!(matches!(err, FieldError::Parse { ref field, .. } if field == "Pos"));
    }

    #[test]
    fn custom_scalar_rejects_non_text() {
        let mut m = Marker::default();
        let err = m.set("Pos", Value::I64(1)).unwrap_err();
        assert!(matches!(
            err,
            FieldError::KindMismatch {
                expected: FieldKind::Custom,
                ..
            }
        ));
    }

    #[test]
    fn ignored_member_is_declared_but_flagged() {
        let fields = Marker::descriptor().into_fields();
        let cache = fields.iter().find(|f| f.name == "Cache").unwrap();
        assert!(cache.ignore);
        let spec = fields.iter().find(|f| f.name == "Pos").unwrap();
        assert_eq!(spec.kind, FieldKind::Custom);
    }

    #[test]
    fn generated_struct_has_working_default() {
        let s = Sample::default();
        assert!(!s.flag);
        assert_eq!(s.label, "");
        assert_eq!(s.ratio, 0.0);
    }
}
