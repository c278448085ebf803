//! Script-range language classification
//!
//! Best-effort classifier for the model's own reply text: it sniffs Unicode
//! script ranges rather than running a real language-identification model.
//! Good enough to pick a synthesis voice, nothing more.

/// Language tag used when no script range matches
pub const DEFAULT_LANGUAGE: &str = "en-IN";

/// Devanagari block (Hindi)
const DEVANAGARI: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Gurmukhi block (Punjabi)
const GURMUKHI: std::ops::RangeInclusive<char> = '\u{0A00}'..='\u{0A7F}';

/// Classify reply text into a BCP-47 language tag by script range
///
/// Any Devanagari character wins over Gurmukhi; text with neither falls back
/// to [`DEFAULT_LANGUAGE`].
#[must_use]
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(|c| DEVANAGARI.contains(&c)) {
        "hi-IN"
    } else if text.chars().any(|c| GURMUKHI.contains(&c)) {
        "pa-IN"
    } else {
        DEFAULT_LANGUAGE
    }
}

/// Primary language subtag of a BCP-47 tag ("hi-IN" -> "hi")
#[must_use]
pub fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}
