//! Render/parse between scalar values and their canonical attribute text.

use stow_types::{FieldKind, Value};

use crate::error::{CodecError, CodecResult};

/// Render a value to its canonical attribute text.
///
/// Booleans render as `true`/`false`, integers as standard decimal, floats
/// with Rust's shortest round-trip formatting, text verbatim. The result
/// still passes through escaping before emission.
pub fn render(value: &Value) -> String {
    match value {
        Value::Bool(v) => v.to_string(),
        Value::Text(v) => v.clone(),
        Value::I32(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
    }
}

/// Parse attribute text back into a value of the given kind.
///
/// `Custom` passes the text through unchanged (the owning record parses
/// it); `Opaque` has no codec support.
pub fn parse(text: &str, kind: FieldKind) -> CodecResult<Value> {
    let unparsable = || CodecError::Unparsable {
        kind,
        text: text.to_string(),
    };
    match kind {
        FieldKind::Bool => text.parse().map(Value::Bool).map_err(|_| unparsable()),
        FieldKind::Text | FieldKind::Custom => Ok(Value::Text(text.to_string())),
        FieldKind::I32 => text.parse().map(Value::I32).map_err(|_| unparsable()),
        FieldKind::U32 => text.parse().map(Value::U32).map_err(|_| unparsable()),
        FieldKind::I64 => text.parse().map(Value::I64).map_err(|_| unparsable()),
        FieldKind::U64 => text.parse().map(Value::U64).map_err(|_| unparsable()),
        FieldKind::F64 => text.parse().map(Value::F64).map_err(|_| unparsable()),
        FieldKind::Opaque => Err(CodecError::Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_canonical_forms() {
        assert_eq!(render(&Value::Bool(true)), "true");
        assert_eq!(render(&Value::Bool(false)), "false");
        assert_eq!(render(&Value::I32(-42)), "-42");
        assert_eq!(render(&Value::U64(18_446_744_073_709_551_615)), "18446744073709551615");
        assert_eq!(render(&Value::F64(7.5)), "7.5");
        assert_eq!(render(&Value::Text("hello".into())), "hello");
    }

    #[test]
    fn parses_what_it_renders() {
        let values = [
            Value::Bool(true),
            Value::Text("hello\tworld".into()),
            Value::I32(i32::MIN),
            Value::U32(u32::MAX),
            Value::I64(-9_007_199_254_740_993),
            Value::U64(u64::MAX),
            Value::F64(0.1),
            Value::F64(1e300),
        ];
        for value in values {
            let text = render(&value);
            assert_eq!(parse(&text, value.kind()).unwrap(), value);
        }
    }

    #[test]
    fn float_special_values_roundtrip() {
        for v in [f64::INFINITY, f64::NEG_INFINITY] {
            let text = render(&Value::F64(v));
            assert_eq!(parse(&text, FieldKind::F64).unwrap(), Value::F64(v));
        }
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            parse("True", FieldKind::Bool),
            Err(CodecError::Unparsable { .. })
        ));
        assert!(parse("24.5", FieldKind::I64).is_err());
        assert!(parse("-1", FieldKind::U32).is_err());
        assert!(parse("", FieldKind::F64).is_err());
    }

    #[test]
    fn rejects_out_of_range_integers() {
        assert!(parse("2147483648", FieldKind::I32).is_err());
        assert!(parse("18446744073709551616", FieldKind::U64).is_err());
    }

    #[test]
    fn custom_kind_passes_text_through() {
        assert_eq!(
            parse("3,-7", FieldKind::Custom).unwrap(),
            Value::Text("3,-7".to_string())
        );
    }

    #[test]
    fn opaque_kind_is_unsupported() {
        assert_eq!(parse("x", FieldKind::Opaque), Err(CodecError::Unsupported));
    }
}
