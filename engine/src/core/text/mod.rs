//! Text Cleanup and Keyword Extraction
//!
//! Cue text arrives with format-specific inline markup (`<i>`, `<v Speaker>`,
//! `{\an8}`). Everything stored in the transcript goes through the strippers
//! here first; keywords are extracted from the already-stripped text.

mod keywords;
mod markup;

pub use keywords::{extract_keywords, is_stop_word, KeywordExtractor, STOP_WORDS};
pub use markup::{collapse_whitespace, normalize_ass_text, strip_angle_markup, strip_brace_markup};
