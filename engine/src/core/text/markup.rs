//! Inline markup removal.

use std::sync::LazyLock;

use regex::Regex;

static ANGLE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

static BRACE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("valid override pattern"));

/// Strips SRT/VTT style tags (`<b>`, `</i>`, `<v Speaker>`, `<00:00:01.000>`).
///
/// A `<` with no closing `>` is left in place.
pub fn strip_angle_markup(text: &str) -> String {
    ANGLE_TAG.replace_all(text, "").into_owned()
}

/// Strips ASS override blocks (`{\i1}`, `{\an8\pos(10,10)}`)
pub fn strip_brace_markup(text: &str) -> String {
    BRACE_BLOCK.replace_all(text, "").into_owned()
}

/// Collapses every whitespace run into a single space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleans ASS dialogue text: hard (`\N`) and soft (`\n`) line breaks become
/// spaces and override blocks are removed.
pub fn normalize_ass_text(text: &str) -> String {
    let unbroken = text.replace("\\N", " ").replace("\\n", " ");
    collapse_whitespace(&strip_brace_markup(&unbroken))
}
