use std::borrow::Cow;

#[cfg(feature = "unicode")]
use unicode_casefold::UnicodeCaseFold;
#[cfg(feature = "unicode")]
use unicode_normalization::UnicodeNormalization;

/// Folds `input` for case-insensitive comparison.
///
/// Already-folded ASCII input is returned borrowed.
pub fn fold_case(input: &str) -> Cow<'_, str> {
    if input.is_ascii() {
        if input.bytes().any(|b| b.is_ascii_uppercase()) {
            return Cow::Owned(input.to_ascii_lowercase());
        }
        return Cow::Borrowed(input);
    }

    Cow::Owned(fold_non_ascii(input))
}

/// Returns the first character of `input` after folding.
///
/// Prefix buckets in the entity index are keyed by this, so it must stay
/// consistent with [`fold_case`].
pub fn first_folded_char(input: &str) -> Option<char> {
    if input.is_ascii() {
        return input
            .as_bytes()
            .first()
            .map(|&b0| b0.to_ascii_lowercase() as char);
    }

    fold_non_ascii(input).chars().next()
}

#[cfg(feature = "unicode")]
fn fold_non_ascii(input: &str) -> String {
    input.nfkc().case_fold().collect()
}

#[cfg(not(feature = "unicode"))]
fn fold_non_ascii(input: &str) -> String {
    input.to_lowercase()
}
