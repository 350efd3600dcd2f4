//! Display-width helpers for cursor positioning with wide characters.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Display width of a string, grapheme cluster by grapheme cluster.
pub fn str_width(text: &str) -> usize {
    text.graphemes(true).map(grapheme_width).sum()
}

/// Display width of a single grapheme cluster.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.chars().all(|c| c.is_control()) {
        return 0;
    }

    // Joined emoji sequences render as a single double-width cell.
    if grapheme.chars().any(|c| c == '\u{200D}') {
        return 2;
    }

    grapheme.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Display column corresponding to a char offset within a line.
pub fn char_index_to_col(text: &str, char_index: usize) -> usize {
    let mut col = 0;
    let mut chars_seen = 0;

    for grapheme in text.graphemes(true) {
        let grapheme_chars = grapheme.chars().count();
        if chars_seen + grapheme_chars > char_index {
            break;
        }
        chars_seen += grapheme_chars;
        col += grapheme_width(grapheme);
    }

    col
}
