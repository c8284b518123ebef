/*!
 * Tests for block reformatting and punctuation cleanup
 */

use subfuse::text_formatting::{BlockFormatter, PunctuationCleaner};
use crate::common;

/// Test that a collapsed blank line before a cue header is restored
#[test]
fn test_reformat_withMissingBlankLine_shouldInsertIt() {
    let mangled = "1\n00:00:01,000 --> 00:00:04,000\nHello\n2\n00:00:05,000 --> 00:00:09,000\nWorld";

    let formatted = BlockFormatter::reformat(mangled);

    assert_eq!(
        formatted,
        "1\n00:00:01,000 --> 00:00:04,000\nHello\n\n2\n00:00:05,000 --> 00:00:09,000\nWorld"
    );
}

/// Test that runs of three or more newlines collapse to one blank line
#[test]
fn test_reformat_withExcessBlankLines_shouldCollapseToOne() {
    let mangled = "1\n00:00:01,000 --> 00:00:04,000\nHello\n\n\n\n2\n00:00:05,000 --> 00:00:09,000\nWorld";

    let formatted = BlockFormatter::reformat(mangled);

    assert_eq!(
        formatted,
        "1\n00:00:01,000 --> 00:00:04,000\nHello\n\n2\n00:00:05,000 --> 00:00:09,000\nWorld"
    );
}

/// Test that document edges are trimmed
#[test]
fn test_reformat_withSurroundingWhitespace_shouldTrim() {
    let mangled = "\n\n1\n00:00:01,000 --> 00:00:04,000\nHello\n\n";

    let formatted = BlockFormatter::reformat(mangled);

    assert_eq!(formatted, "1\n00:00:01,000 --> 00:00:04,000\nHello");
}

/// Test the idempotence law: reformat(reformat(x)) == reformat(x)
#[test]
fn test_reformat_appliedTwice_shouldBeIdempotent() {
    let mangled = "\n1\n00:00:01,000 --> 00:00:04,000\nHello\n2\n00:00:05,000 --> 00:00:09,000\nWorld\n\n\n3\n00:00:10,000 --> 00:00:14,000\nAgain\n";

    let once = BlockFormatter::reformat(mangled);
    let twice = BlockFormatter::reformat(&once);

    assert_eq!(once, twice);
}

/// Test that already-canonical serialized text passes through unchanged
#[test]
fn test_reformat_withCanonicalDocument_shouldBeIdentity() {
    let canonical = common::generate_srt(5);

    assert_eq!(BlockFormatter::reformat(&canonical), canonical);
}

/// Test full-width punctuation replacement, collapsing and trimming
#[test]
fn test_strip_line_withWidePunctuation_shouldReplaceWithSingleSpaces() {
    assert_eq!(PunctuationCleaner::strip_line("你好，世界！"), "你好 世界");
    assert_eq!(
        PunctuationCleaner::strip_line("（测试）：【字幕】"),
        "测试 字幕"
    );
}

/// Test that ASCII punctuation is left alone
#[test]
fn test_strip_line_withAsciiPunctuation_shouldNotChange() {
    assert_eq!(
        PunctuationCleaner::strip_line("Hello, world! (Really?)"),
        "Hello, world! (Really?)"
    );
}

/// Test that CJK ideographs survive while their punctuation goes
#[test]
fn test_strip_line_withIdeographicSpaceAndStops_shouldClean() {
    // U+3000 ideographic space and U+3002 ideographic full stop
    assert_eq!(
        PunctuationCleaner::strip_line("前半\u{3000}后半。"),
        "前半 后半"
    );
}

/// Test the line structure of multi-line text is preserved
#[test]
fn test_strip_text_withMultipleLines_shouldKeepLineCount() {
    let text = "第一行，测试\n第二行！";

    let stripped = PunctuationCleaner::strip_text(text);

    assert_eq!(stripped, "第一行 测试\n第二行");
}

/// Test the idempotence law: strip(strip(x)) == strip(x)
#[test]
fn test_strip_text_appliedTwice_shouldBeIdempotent() {
    let text = "你好，，世界\u{3000}！\nplain ascii line";

    let once = PunctuationCleaner::strip_text(text);
    let twice = PunctuationCleaner::strip_text(&once);

    assert_eq!(once, twice);
}
