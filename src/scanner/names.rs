//! File name normalization used when names take part in a match key.
//!
//! macOS stores file names in NFD (decomposed) form while Windows and Linux
//! usually store NFC (composed) form, so the same visible name can have two
//! byte representations:
//!
//! - NFC: `café.txt` - 'é' is U+00E9
//! - NFD: `café.txt` - 'e' U+0065 + combining acute accent U+0301
//!
//! Names are always brought to NFC before comparison. Case folding is
//! applied on top only when [`NameCase::Insensitive`] is configured.
//!
//! # Example
//!
//! ```
//! use dupefind::scanner::names::normalize_name;
//! use dupefind::search::NameCase;
//!
//! let nfc = "café.txt";
//! let nfd = "cafe\u{0301}.txt";
//! assert_eq!(
//!     normalize_name(nfc, NameCase::Sensitive),
//!     normalize_name(nfd, NameCase::Sensitive),
//! );
//! assert_eq!(normalize_name("README.md", NameCase::Insensitive), "readme.md");
//! ```

use std::borrow::Cow;

use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

use crate::search::NameCase;

/// Normalize a file name for keying under the given case policy.
///
/// Borrows the input when it is already in the requested form.
#[must_use]
pub fn normalize_name(name: &str, case: NameCase) -> Cow<'_, str> {
    let composed = to_nfc(name);
    match case {
        NameCase::Sensitive => composed,
        NameCase::Insensitive => {
            if composed.chars().any(char::is_uppercase) {
                Cow::Owned(composed.to_lowercase())
            } else {
                composed
            }
        }
    }
}

/// Bring a string to NFC, borrowing when it already is.
#[must_use]
pub fn to_nfc(s: &str) -> Cow<'_, str> {
    match is_nfc_quick(s.chars()) {
        IsNormalized::Yes => Cow::Borrowed(s),
        _ => {
            let normalized: String = s.nfc().collect();
            if normalized == s {
                Cow::Borrowed(s)
            } else {
                Cow::Owned(normalized)
            }
        }
    }
}
