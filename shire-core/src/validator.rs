//! Keystroke-level validation for address entry fields.
//!
//! Validators are pure: they take the field text and cursor position and
//! hand back a verdict together with a possibly corrected text and cursor.
//! Corrections are conservative. Only invisible or whitespace characters
//! are removed, so a typo can never be silently turned into a different
//! address.

use serde::{Deserialize, Serialize};

/// Tri-state classification of in-progress input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Reject the keystroke.
    Invalid,
    /// Not complete yet; keep the keystroke and judge later.
    Intermediate,
    Acceptable,
}

/// Result of one validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validated {
    pub verdict: Verdict,
    pub text: String,
    /// Cursor as a character index into `text`.
    pub cursor: usize,
}

/// A validator for one kind of text field.
pub trait TextValidator {
    fn validate(&self, text: &str, cursor: usize) -> Validated;
}

/// Characters dropped while typing or pasting.
pub fn is_stripped(ch: char) -> bool {
    // U+200B and U+FEFF are format characters, not whitespace.
    ch.is_whitespace() || ch == '\u{200B}' || ch == '\u{FEFF}'
}

/// Alphabet shared by Base58 and Bech32 addresses.
pub fn is_address_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() && ch != 'I' && ch != 'O'
}

/// Remove stripped characters and move the cursor left past any that
/// preceded it.
pub fn sanitize(text: &str, cursor: usize) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut new_cursor = 0;
    for (i, ch) in text.chars().enumerate() {
        if is_stripped(ch) {
            continue;
        }
        out.push(ch);
        if i < cursor {
            new_cursor += 1;
        }
    }

    let removed = text.chars().count() - out.chars().count();
    if removed > 0 {
        tracing::trace!(removed, "stripped characters from address input");
    }
    (out, new_cursor)
}

fn all_address_chars(text: &str) -> bool {
    text.chars().all(is_address_char)
}

/// Free-form entry filter: strips whitespace and accepts anything left
/// that is made of address characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressEntryValidator;

impl TextValidator for AddressEntryValidator {
    fn validate(&self, text: &str, cursor: usize) -> Validated {
        let (text, cursor) = sanitize(text, cursor);
        let verdict = if all_address_chars(&text) {
            Verdict::Acceptable
        } else {
            Verdict::Invalid
        };
        Validated {
            verdict,
            text,
            cursor,
        }
    }
}

/// Structural/checksum decoder for the address encoding in use.
pub trait AddressDecoder {
    fn is_valid_destination(&self, text: &str) -> bool;
}

/// Final-form address check.
///
/// Empty input is `Intermediate`. Without a decoder, any non-empty string of
/// address characters is `Acceptable`; with one, the decoder has the last
/// word on such candidates.
#[derive(Clone, Copy, Default)]
pub struct AddressCheckValidator<'a> {
    decoder: Option<&'a dyn AddressDecoder>,
}

impl<'a> AddressCheckValidator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decoder(decoder: &'a dyn AddressDecoder) -> Self {
        Self {
            decoder: Some(decoder),
        }
    }
}

impl std::fmt::Debug for AddressCheckValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressCheckValidator")
            .field("decoder", &self.decoder.is_some())
            .finish()
    }
}

impl TextValidator for AddressCheckValidator<'_> {
    fn validate(&self, text: &str, cursor: usize) -> Validated {
        let (text, cursor) = sanitize(text, cursor);
        let verdict = if text.is_empty() {
            Verdict::Intermediate
        } else if !all_address_chars(&text) {
            Verdict::Invalid
        } else {
            match self.decoder {
                Some(decoder) if !decoder.is_valid_destination(&text) => Verdict::Invalid,
                _ => Verdict::Acceptable,
            }
        };
        Validated {
            verdict,
            text,
            cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PrefixDecoder(&'static str);

    impl AddressDecoder for PrefixDecoder {
        fn is_valid_destination(&self, text: &str) -> bool {
            text.starts_with(self.0)
        }
    }

    #[test]
    fn entry_accepts_base58_text() {
        let out = AddressEntryValidator.validate("S1xyzABC9", 9);
        assert_eq!(out.verdict, Verdict::Acceptable);
        assert_eq!(out.text, "S1xyzABC9");
        assert_eq!(out.cursor, 9);
    }

    #[test]
    fn entry_strips_whitespace_and_zero_width_chars() {
        let out = AddressEntryValidator.validate(" S1\u{200B}ab\tc\u{FEFF}\n", 6);
        assert_eq!(out.verdict, Verdict::Acceptable);
        assert_eq!(out.text, "S1abc");
    }

    #[test]
    fn entry_rejects_forbidden_letters() {
        assert_eq!(AddressEntryValidator.validate("S1abcI", 6).verdict, Verdict::Invalid);
        assert_eq!(AddressEntryValidator.validate("S1Oabc", 6).verdict, Verdict::Invalid);
        // Lowercase forms are valid bech32/base58 characters.
        assert_eq!(AddressEntryValidator.validate("sio", 3).verdict, Verdict::Acceptable);
    }

    #[test]
    fn entry_rejects_punctuation_and_non_ascii() {
        for input in ["S1-abc", "S1.abc", "S1_abc", "S1\u{4F60}", "S1\u{FF11}"] {
            let out = AddressEntryValidator.validate(input, 0);
            assert_eq!(out.verdict, Verdict::Invalid, "{input}");
        }
    }

    #[test]
    fn entry_keeps_disallowed_characters_in_text() {
        let out = AddressEntryValidator.validate("a b-c", 5);
        assert_eq!(out.verdict, Verdict::Invalid);
        assert_eq!(out.text, "ab-c");
        assert_eq!(out.cursor, 4);
    }

    #[test]
    fn entry_accepts_empty_text() {
        assert_eq!(AddressEntryValidator.validate("", 0).verdict, Verdict::Acceptable);
    }

    #[test]
    fn cursor_moves_past_removed_characters() {
        let (text, cursor) = sanitize("ab  cd", 4);
        assert_eq!(text, "abcd");
        assert_eq!(cursor, 2);

        let (_, cursor) = sanitize("ab  cd", 1);
        assert_eq!(cursor, 1);

        let (_, cursor) = sanitize("  ", 2);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn cursor_is_clamped_to_text_length() {
        let (text, cursor) = sanitize("abc", 10);
        assert_eq!(text, "abc");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn cursor_counts_characters_not_bytes() {
        let (text, cursor) = sanitize("\u{4F60} \u{4F60}", 3);
        assert_eq!(text, "\u{4F60}\u{4F60}");
        assert_eq!(cursor, 2);
    }

    #[test]
    fn check_treats_empty_as_intermediate() {
        let validator = AddressCheckValidator::new();
        assert_eq!(validator.validate("", 0).verdict, Verdict::Intermediate);
        assert_eq!(validator.validate(" \u{200B} ", 3).verdict, Verdict::Intermediate);
    }

    #[test]
    fn check_accepts_unverified_candidate() {
        let validator = AddressCheckValidator::new();
        let out = validator.validate("Szzzzzzzzzz", 11);
        assert_eq!(out.verdict, Verdict::Acceptable);
    }

    #[test]
    fn check_rejects_disallowed_characters() {
        let validator = AddressCheckValidator::new();
        assert_eq!(validator.validate("S1#", 3).verdict, Verdict::Invalid);
    }

    #[test]
    fn check_defers_to_decoder() {
        let decoder = PrefixDecoder("S");
        let validator = AddressCheckValidator::with_decoder(&decoder);
        assert_eq!(validator.validate("Sabc", 4).verdict, Verdict::Acceptable);
        assert_eq!(validator.validate("tabc", 4).verdict, Verdict::Invalid);
        assert_eq!(validator.validate("", 0).verdict, Verdict::Intermediate);
        assert_eq!(validator.validate("S#", 2).verdict, Verdict::Invalid);
    }

    #[test]
    fn verdict_serializes_lowercase() {
        let json = serde_json::to_string(&Verdict::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
    }
}
