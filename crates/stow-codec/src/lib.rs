//! Value codec for stow: scalar render/parse and attribute-text escaping.
//!
//! This crate is stateless. It converts [`Value`](stow_types::Value)s to and
//! from their canonical attribute text, and decides per the clean-text rule
//! whether a piece of text can be embedded verbatim in the persistence
//! format or must travel base64-encoded.
//!
//! # Escaping
//!
//! Text is **clean** when every codepoint is TAB, LF, CR, or falls in
//! `[0x20, 0xD7FF]` or `[0xE000, 0xFFFD]`. Clean text is emitted verbatim;
//! anything else (control characters, supplementary-plane codepoints) is
//! re-encoded as UTF-16LE bytes in base64 and emitted under a namespaced
//! attribute key so readers can tell the two forms apart. The rule applies
//! uniformly to item names and to every textual member value.

pub mod error;
pub mod escape;
pub mod scalar;

pub use error::{CodecError, CodecResult};
pub use escape::{decode_text, encode_text, is_clean, AttrText};
pub use scalar::{parse, render};
