/*!
 * Text-level cleanup passes for subtitle documents.
 *
 * Two independent passes live here: block reformatting, which repairs the
 * blank-line structure a translation model tends to mangle, and punctuation
 * cleanup, which replaces full-width/CJK punctuation with plain spaces.
 * Both are pure text transforms and both are idempotent.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Cue header, an index line followed by a timestamp line
static CUE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\n(\d{2}:\d{2}:\d{2},\d{3} --> \d{2}:\d{2}:\d{2},\d{3})\n").unwrap()
});

// @const: Three or more newlines collapse to one blank line
static EXCESS_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

// @const: Full-width and CJK punctuation block ranges
static WIDE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{3000}-\x{303F}\x{FF00}-\x{FF0F}\x{FF1A}-\x{FF20}\x{FF3B}-\x{FF40}\x{FF5B}-\x{FF65}]")
        .unwrap()
});

// @const: Any run of whitespace inside a line
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Repairs the blank-line structure of translated subtitle text
pub struct BlockFormatter;

impl BlockFormatter {
    /// Normalize a subtitle document back into canonical cue blocks.
    ///
    /// A translation call may collapse or multiply the blank lines between
    /// cue blocks while leaving the index and timestamp lines intact. This
    /// restores one blank line before every cue header, collapses longer
    /// runs, and trims the document ends.
    pub fn reformat(content: &str) -> String {
        let content = content.replace("\r\n", "\n");

        // Insert a blank line ahead of every cue header, then collapse any
        // overlong runs that insertion (or the model) produced.
        let content = CUE_HEADER.replace_all(&content, "\n${1}\n${2}\n");
        let content = EXCESS_BLANK_LINES.replace_all(&content, "\n\n");

        content.trim().to_string()
    }
}

/// Replaces full-width/CJK punctuation in cue text with spaces
pub struct PunctuationCleaner;

impl PunctuationCleaner {
    /// Clean a single line: wide punctuation becomes a space, whitespace
    /// runs collapse to one space, and the line is trimmed.
    pub fn strip_line(line: &str) -> String {
        let replaced = WIDE_PUNCTUATION.replace_all(line, " ");
        let collapsed = WHITESPACE_RUN.replace_all(&replaced, " ");
        collapsed.trim().to_string()
    }

    /// Clean a multi-line text payload, preserving its line structure.
    ///
    /// This operates on cue text only; callers must not feed it whole
    /// serialized documents, or index and timestamp lines would be trimmed
    /// along with everything else.
    pub fn strip_text(text: &str) -> String {
        text.split('\n')
            .map(Self::strip_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
