//! The clean-text rule and the base64 form for everything that fails it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{CodecError, CodecResult};

/// Returns `true` if the text can be embedded verbatim as an attribute
/// value: every codepoint is TAB, LF, CR, or falls in `[0x20, 0xD7FF]` or
/// `[0xE000, 0xFFFD]`.
///
/// Rust strings can never hold lone surrogates, so the excluded surrogate
/// range is unreachable here; supplementary-plane codepoints sit above
/// `0xFFFD` and therefore take the encoded path.
pub fn is_clean(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c, '\t' | '\n' | '\r')
            || ('\u{20}'..='\u{D7FF}').contains(&c)
            || ('\u{E000}'..='\u{FFFD}').contains(&c)
    })
}

/// Encode non-clean text: the UTF-16LE bytes of the text, base64'd.
pub fn encode_text(text: &str) -> String {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    STANDARD.encode(bytes)
}

/// Decode the base64 + UTF-16LE form produced by [`encode_text`].
pub fn decode_text(encoded: &str) -> CodecResult<String> {
    let bytes = STANDARD.decode(encoded)?;
    if bytes.len() % 2 != 0 {
        return Err(CodecError::InvalidUtf16);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| CodecError::InvalidUtf16)
}

/// An attribute value ready for emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrText {
    /// Clean text, emitted under the plain attribute key.
    Plain(String),
    /// Base64-encoded text, emitted under the namespaced attribute key.
    Encoded(String),
}

impl AttrText {
    /// Classify raw text per the clean rule, encoding when required.
    pub fn from_raw(text: &str) -> Self {
        if is_clean(text) {
            AttrText::Plain(text.to_string())
        } else {
            AttrText::Encoded(encode_text(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn plain_ascii_is_clean() {
        assert!(is_clean("hello world"));
        assert!(is_clean(""));
        assert!(is_clean("tabs\tand\nnewlines\rtoo"));
    }

    #[test]
    fn range_boundaries() {
        assert!(is_clean("\u{20}"));
        assert!(is_clean("\u{D7FF}"));
        assert!(is_clean("\u{E000}"));
        assert!(is_clean("\u{FFFD}"));
        assert!(!is_clean("\u{1F}"));
        assert!(!is_clean("\u{01}"));
        assert!(!is_clean("\u{0B}")); // vertical tab: control, not TAB/LF/CR
    }

    #[test]
    fn supplementary_plane_is_not_clean() {
        assert!(!is_clean("😀"));
        assert!(!is_clean("clean until 𝕏"));
    }

    #[test]
    fn non_ascii_bmp_text_is_clean() {
        assert!(is_clean("приветствие"));
        assert!(is_clean("日本語テキスト"));
    }

    #[test]
    fn encode_decode_control_character() {
        let original = "ctrl\u{01}char";
        let encoded = encode_text(original);
        assert_eq!(decode_text(&encoded).unwrap(), original);
    }

    #[test]
    fn encode_decode_supplementary_plane() {
        let original = "mixed 😀 and 𝕏 content";
        let encoded = encode_text(original);
        assert_eq!(decode_text(&encoded).unwrap(), original);
    }

    #[test]
    fn encode_empty_text() {
        assert_eq!(encode_text(""), "");
        assert_eq!(decode_text("").unwrap(), "");
    }

    #[test]
    fn decode_rejects_bad_base64() {
        assert!(matches!(
            decode_text("not base64!!!"),
            Err(CodecError::InvalidBase64(_))
        ));
    }

    #[test]
    fn decode_rejects_odd_byte_length() {
        let odd = STANDARD.encode([0x61u8, 0x00, 0x62]);
        assert_eq!(decode_text(&odd), Err(CodecError::InvalidUtf16));
    }

    #[test]
    fn decode_rejects_lone_surrogate() {
        // 0xD800 little-endian: a high surrogate with no partner.
        let lone = STANDARD.encode([0x00u8, 0xD8]);
        assert_eq!(decode_text(&lone), Err(CodecError::InvalidUtf16));
    }

    #[test]
    fn attr_text_picks_the_form() {
        assert_eq!(
            AttrText::from_raw("plain"),
            AttrText::Plain("plain".to_string())
        );
        assert!(matches!(AttrText::from_raw("bad\u{01}"), AttrText::Encoded(_)));
    }

    proptest! {
        #[test]
        fn encode_decode_roundtrips_any_text(s in any::<String>()) {
            prop_assert_eq!(decode_text(&encode_text(&s)).unwrap(), s);
        }

        #[test]
        fn attr_text_roundtrips_any_text(s in any::<String>()) {
            match AttrText::from_raw(&s) {
                AttrText::Plain(p) => prop_assert_eq!(p, s),
                AttrText::Encoded(e) => prop_assert_eq!(decode_text(&e).unwrap(), s),
            }
        }
    }
}
