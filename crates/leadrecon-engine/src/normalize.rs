//! Canonical text forms used for every fuzzy comparison in the engine.
//!
//! Campaign names and lead titles are never compared raw: both sides go
//! through [`normalize`] first, so `"Villa Gávea"` and `"villa  gavea"` are
//! the same string (`"villagavea"`). Lead sources use the gentler
//! [`normalize_source`], which keeps word boundaries.

use std::ops::RangeInclusive;

use unicode_normalization::UnicodeNormalization;

/// The Combining Diacritical Marks block. Marks outside it are kept.
const COMBINING_DIACRITICS: RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Whitespace as ECMAScript `\s` defines it: Unicode space separators, line
/// terminators, the ASCII controls `\t\n\v\f\r` and U+FEFF. Unlike
/// [`char::is_whitespace`] it includes U+FEFF and excludes U+0085.
#[must_use]
pub fn is_text_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Lower-cases, decomposes (NFD), strips combining diacritical marks
/// (U+0300..=U+036F) and removes every [`is_text_space`] character.
///
/// Lower-casing runs before decomposition: `'İ'` lower-cases into `i` plus a
/// combining dot, and that mark has to go in the same pass.
#[must_use]
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_DIACRITICS.contains(c) && !is_text_space(*c))
        .collect()
}

/// [`normalize`] for optional input; `None` is the empty string.
#[must_use]
pub fn normalize_opt(input: Option<&str>) -> String {
    input.map(normalize).unwrap_or_default()
}

/// Lead-source form: NFD, then only ASCII letters, digits, `_`, `(`, `)`,
/// `/` and whitespace survive; whitespace runs collapse to one space; the
/// result is trimmed and lower-cased.
///
/// `"Landing Page (RE/MAX  Comunitá)"` → `"landing page (re/max comunita)"`.
#[must_use]
pub fn normalize_source(input: &str) -> String {
    let kept: String = input
        .nfd()
        .filter(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')' | '/') || is_text_space(*c)
        })
        .collect();
    kept.split(is_text_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
