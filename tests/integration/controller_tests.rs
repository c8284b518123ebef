/*!
 * Controller-level tests for the file-based workflows that need no
 * translation provider: merge, format and strip.
 */

use std::fs;
use std::path::Path;

use subfuse::app_config::Config;
use subfuse::app_controller::Controller;
use subfuse::subtitle_processor::SubtitleCollection;
use crate::common;

fn controller() -> Controller {
    Controller::with_config(Config::default())
}

/// Test merging two subtitle files through the controller
#[test]
fn test_run_merge_withTwoFiles_shouldWriteBilingualFile() {
    let temp_dir = common::create_temp_dir().unwrap();

    let first = common::create_test_file(
        temp_dir.path(),
        "first.srt",
        "1\n00:00:01,000 --> 00:00:02,000\n你好\n\n2\n00:00:03,000 --> 00:00:04,000\n再见",
    )
    .unwrap();
    let second = common::create_test_file(
        temp_dir.path(),
        "second.srt",
        "1\n00:00:05,000 --> 00:00:06,000\nHello\n\n2\n00:00:07,000 --> 00:00:08,000\nGoodbye",
    )
    .unwrap();
    let output = temp_dir.path().join("merged.srt");

    let written = controller()
        .run_merge(&first, &second, Some(&output))
        .unwrap();

    assert_eq!(written, output);
    let content = fs::read_to_string(&output).unwrap();
    let parsed = SubtitleCollection::parse_srt_string(&content);
    assert_eq!(parsed.entries.len(), 2);
    // First file owns the timestamps and the top line
    assert_eq!(parsed.entries[0].start_time_ms, 1000);
    assert_eq!(parsed.entries[0].text, "你好\nHello");
    assert_eq!(parsed.entries[1].text, "再见\nGoodbye");
}

/// Test that merging rejects inputs with no parseable cues
#[test]
fn test_run_merge_withEmptyFirstFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let first = common::create_test_file(temp_dir.path(), "first.srt", "no cues here").unwrap();
    let second = common::create_test_subtitle(temp_dir.path(), "second.srt").unwrap();

    let result = controller().run_merge(&first, &second, None);

    assert!(result.is_err());
}

/// Test formatting a mangled file through the controller
#[test]
fn test_run_format_withMangledFile_shouldWriteCanonicalBlocks() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(
        temp_dir.path(),
        "mangled.txt",
        "1\n00:00:01,000 --> 00:00:02,000\nhello\n2\n00:00:03,000 --> 00:00:04,000\nworld",
    )
    .unwrap();
    let output = temp_dir.path().join("fixed.txt");

    controller().run_format(&input, Some(&output)).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "1\n00:00:01,000 --> 00:00:02,000\nhello\n\n2\n00:00:03,000 --> 00:00:04,000\nworld"
    );
}

/// Test the default output name of the format command
#[test]
fn test_run_format_withoutOutputPath_shouldPrefixFileName() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();

    let written = controller().run_format(&input, None).unwrap();

    assert_eq!(
        written,
        temp_dir.path().join("formatted_movie.srt")
    );
    assert!(written.exists());
}

/// Test punctuation cleanup of a single file
#[test]
fn test_run_strip_withSingleFile_shouldWriteProcessedCopy() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(
        temp_dir.path(),
        "cn.srt",
        "1\n00:00:01,000 --> 00:00:02,000\n你好，世界！",
    )
    .unwrap();

    controller().run_strip(&input).unwrap();

    let output = temp_dir.path().join("Processed").join("cn_processed.srt");
    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content, "1\n00:00:01,000 --> 00:00:02,000\n你好 世界");
}

/// Test punctuation cleanup across a directory, bad files skipped
#[test]
fn test_run_strip_withDirectory_shouldProcessEverySubtitleFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(
        temp_dir.path(),
        "a.srt",
        "1\n00:00:01,000 --> 00:00:02,000\n第一个，文件",
    )
    .unwrap();
    common::create_test_file(
        temp_dir.path(),
        "b.txt",
        "1\n00:00:01,000 --> 00:00:02,000\n第二个！文件",
    )
    .unwrap();
    // A file with no cues is reported and skipped, not fatal
    common::create_test_file(temp_dir.path(), "broken.srt", "not a subtitle").unwrap();

    controller().run_strip(temp_dir.path()).unwrap();

    let processed = temp_dir.path().join("Processed");
    assert_eq!(
        fs::read_to_string(processed.join("a_processed.srt")).unwrap(),
        "1\n00:00:01,000 --> 00:00:02,000\n第一个 文件"
    );
    assert_eq!(
        fs::read_to_string(processed.join("b_processed.txt")).unwrap(),
        "1\n00:00:01,000 --> 00:00:02,000\n第二个 文件"
    );
    assert!(!processed.join("broken_processed.srt").exists());
}

/// Test that an unsupported extension is rejected up front
#[test]
fn test_run_merge_withUnsupportedExtension_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let bad = common::create_test_file(temp_dir.path(), "movie.mp4", "binary-ish").unwrap();
    let good = common::create_test_subtitle(temp_dir.path(), "good.srt").unwrap();

    let result = controller().run_merge(&bad, &good, None);

    assert!(result.is_err());
}

/// Test that a missing input path is rejected up front
#[test]
fn test_run_format_withMissingFile_shouldFail() {
    let result = controller().run_format(Path::new("/definitely/not/here.srt"), None);

    assert!(result.is_err());
}
