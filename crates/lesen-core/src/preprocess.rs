use unicode_normalization::UnicodeNormalization;

/// Clean up raw engine output before it is judged or translated
pub fn normalize_recognized(text: &str) -> String {
    // Composed form so umlauts count as one character against the length limit
    let text: String = text.nfc().collect();
    text.replace("\r\n", "\n").trim().to_string()
}

/// Whitespace-only output means the engine found no glyphs
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
