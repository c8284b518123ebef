/*!
 * Tests for file and directory utilities
 */

use std::fs;
use std::path::Path;
use subfuse::file_utils::FileManager;
use crate::common;

/// Test extension acceptance for pipeline inputs
#[test]
fn test_is_supported_extension_withVariousPaths_shouldMatchPolicy() {
    assert!(FileManager::is_supported_extension("movie.srt"));
    assert!(FileManager::is_supported_extension("movie.SRT"));
    assert!(FileManager::is_supported_extension("notes.txt"));
    assert!(!FileManager::is_supported_extension("movie.mp4"));
    assert!(!FileManager::is_supported_extension("no_extension"));
}

/// Test reading a plain UTF-8 file
#[test]
fn test_read_to_string_detect_withPlainUtf8_shouldReturnContent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "plain.srt", "你好 world").unwrap();

    let content = FileManager::read_to_string_detect(&path).unwrap();

    assert_eq!(content, "你好 world");
}

/// Test that a UTF-8 byte order mark is stripped
#[test]
fn test_read_to_string_detect_withUtf8Bom_shouldStripBom() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("bom.srt");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("hello".as_bytes());
    fs::write(&path, bytes).unwrap();

    let content = FileManager::read_to_string_detect(&path).unwrap();

    assert_eq!(content, "hello");
}

/// Test decoding a UTF-16LE file with byte order mark
#[test]
fn test_read_to_string_detect_withUtf16Le_shouldDecode() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("utf16.srt");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "hi 你".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(&path, bytes).unwrap();

    let content = FileManager::read_to_string_detect(&path).unwrap();

    assert_eq!(content, "hi 你");
}

/// Test that invalid UTF-8 falls back to lossy decoding instead of failing
#[test]
fn test_read_to_string_detect_withInvalidUtf8_shouldDecodeLossily() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("legacy.srt");
    fs::write(&path, [b'o', b'k', 0xFF, b'!']).unwrap();

    let content = FileManager::read_to_string_detect(&path).unwrap();

    assert!(content.starts_with("ok"));
    assert!(content.ends_with('!'));
}

/// Test the Processed/ output path derivation
#[test]
fn test_processed_output_path_withSrtInput_shouldNestUnderProcessed() {
    let output = FileManager::processed_output_path(Path::new("/videos/movie.srt"), "srt");

    assert_eq!(
        output,
        Path::new("/videos/Processed/movie_processed.srt")
    );
}

/// Test subtitle discovery is non-recursive and extension-filtered
#[test]
fn test_find_subtitle_files_withMixedDirectory_shouldFindOnlySubtitles() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "a.srt", "x").unwrap();
    common::create_test_file(temp_dir.path(), "b.txt", "x").unwrap();
    common::create_test_file(temp_dir.path(), "c.mp4", "x").unwrap();
    let nested = temp_dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    common::create_test_file(&nested, "d.srt", "x").unwrap();

    let files = FileManager::find_subtitle_files(temp_dir.path()).unwrap();

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.srt", "b.txt"]);
}

/// Test that writing creates missing parent directories
#[test]
fn test_write_to_file_withMissingParents_shouldCreateThem() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("deep/nested/out.srt");

    FileManager::write_to_file(&path, "content").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "content");
}

/// Test the work directory timestamp shape (YYYYmmdd_HHMMSS)
#[test]
fn test_run_timestamp_shouldMatchExpectedShape() {
    let timestamp = FileManager::run_timestamp();

    assert_eq!(timestamp.len(), 15);
    assert_eq!(timestamp.as_bytes()[8], b'_');
    assert!(timestamp
        .chars()
        .enumerate()
        .all(|(i, c)| if i == 8 { c == '_' } else { c.is_ascii_digit() }));
}
