/*!
 * Tests for subtitle parsing, serialization and chunking
 */

use std::fmt::Write;
use std::path::PathBuf;
use subfuse::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::common;

/// Test timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert_eq!(ms, 5_025_678);

    let formatted = SubtitleEntry::format_timestamp(ms);
    assert_eq!(formatted, ts);
}

/// Test timestamp parsing rejection of out-of-range components
#[test]
fn test_timestamp_parsing_withInvalidComponents_shouldFail() {
    assert!(SubtitleEntry::parse_timestamp("00:99:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:00:75,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("not a timestamp").is_err());
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = SubtitleEntry::new(1, 5000, 10000, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle");
}

/// Test parsing a well-formed document
#[test]
fn test_parse_srt_string_withValidContent_shouldParseAllEntries() {
    let content = "1
00:00:01,000 --> 00:00:04,000
First line

2
00:00:05,000 --> 00:00:09,000
Second line
spanning two rows

3
00:00:10,000 --> 00:00:14,000
Third line";

    let outcome = SubtitleCollection::parse_srt_string(content);

    assert_eq!(outcome.skipped_blocks, 0);
    assert_eq!(outcome.entries.len(), 3);
    assert_eq!(outcome.entries[0].seq_num, 1);
    assert_eq!(outcome.entries[0].start_time_ms, 1000);
    assert_eq!(outcome.entries[0].end_time_ms, 4000);
    assert_eq!(outcome.entries[1].text, "Second line\nspanning two rows");
    assert_eq!(outcome.entries[2].seq_num, 3);
}

/// Test that source order and original numbering survive parsing
#[test]
fn test_parse_srt_string_withNonContiguousNumbers_shouldPreserveOrderAndNumbers() {
    let content = "10
00:00:01,000 --> 00:00:02,000
Ten

2
00:00:03,000 --> 00:00:04,000
Two

7
00:00:05,000 --> 00:00:06,000
Seven";

    let outcome = SubtitleCollection::parse_srt_string(content);

    let numbers: Vec<usize> = outcome.entries.iter().map(|e| e.seq_num).collect();
    assert_eq!(numbers, vec![10, 2, 7]);
}

/// Test that malformed blocks are dropped and counted, not errored
#[test]
fn test_parse_srt_string_withMalformedBlocks_shouldSkipAndCount() {
    let content = "1
00:00:01,000 --> 00:00:04,000
Good entry

just some prose without a cue shape

2
00:00:05.000 --> 00:00:09.000
Dot separators are not valid

3
00:00:10,000 --> 00:00:14,000
Another good entry";

    let outcome = SubtitleCollection::parse_srt_string(content);

    assert_eq!(outcome.entries.len(), 2);
    assert_eq!(outcome.skipped_blocks, 2);
    assert_eq!(outcome.entries[0].seq_num, 1);
    assert_eq!(outcome.entries[1].seq_num, 3);
}

/// Test that out-of-range timestamp components drop the block
#[test]
fn test_parse_srt_string_withOutOfRangeMinutes_shouldSkipBlock() {
    let content = "1
00:75:00,000 --> 00:76:00,000
Cannot round-trip

2
00:00:05,000 --> 00:00:09,000
Fine";

    let outcome = SubtitleCollection::parse_srt_string(content);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].seq_num, 2);
    assert_eq!(outcome.skipped_blocks, 1);
}

/// Test that a cue with index and timestamp but no text still parses
#[test]
fn test_parse_srt_string_withEmptyText_shouldKeepEntry() {
    let content = "1
00:00:01,000 --> 00:00:04,000

2
00:00:05,000 --> 00:00:09,000
Some text";

    let outcome = SubtitleCollection::parse_srt_string(content);

    assert_eq!(outcome.entries.len(), 2);
    assert_eq!(outcome.entries[0].text, "");
    assert_eq!(outcome.entries[1].text, "Some text");
}

/// Test stray lines ahead of a cue header inside a block
#[test]
fn test_parse_srt_string_withStrayLeadingLines_shouldStillFindCue() {
    let content = "Here is your translation:
5
00:00:01,000 --> 00:00:02,000
Hello";

    let outcome = SubtitleCollection::parse_srt_string(content);

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].seq_num, 5);
    assert_eq!(outcome.entries[0].text, "Hello");
}

/// Test CRLF input parses the same as LF input
#[test]
fn test_parse_srt_string_withCrlfLineEndings_shouldParse() {
    let content = "1\r\n00:00:01,000 --> 00:00:04,000\r\nWindows line endings\r\n\r\n2\r\n00:00:05,000 --> 00:00:09,000\r\nSecond";

    let outcome = SubtitleCollection::parse_srt_string(content);

    assert_eq!(outcome.entries.len(), 2);
    assert_eq!(outcome.entries[0].text, "Windows line endings");
}

/// Test the serialize format joins blocks with exactly one blank line
#[test]
fn test_serialize_entries_withTwoEntries_shouldJoinWithBlankLine() {
    let entries = vec![
        SubtitleEntry::new(1, 1000, 4000, "First".to_string()),
        SubtitleEntry::new(2, 5000, 9000, "Second".to_string()),
    ];

    let text = SubtitleCollection::serialize_entries(&entries);

    assert_eq!(
        text,
        "1\n00:00:01,000 --> 00:00:04,000\nFirst\n\n2\n00:00:05,000 --> 00:00:09,000\nSecond"
    );
}

/// Test the round-trip law: parse(serialize(entries)) == entries
#[test]
fn test_round_trip_withGeneratedEntries_shouldReproduceExactly() {
    let mut entries = common::generate_entries(25);
    entries[4].text = "Multi\nline\ntext".to_string();
    entries[9].text = String::new();

    let serialized = SubtitleCollection::serialize_entries(&entries);
    let outcome = SubtitleCollection::parse_srt_string(&serialized);

    assert_eq!(outcome.skipped_blocks, 0);
    assert_eq!(outcome.entries, entries);
}

/// Test writing a collection to disk and reading it back
#[test]
fn test_write_to_srt_withCollection_shouldRoundTripThroughFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("out/result.srt");
    let entries = common::generate_entries(5);
    let collection = SubtitleCollection::new(path.clone(), entries.clone());

    collection.write_to_srt(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let outcome = SubtitleCollection::parse_srt_string(&content);
    assert_eq!(outcome.entries, entries);
}

/// Test splitting entries into fixed-size chunks
#[test]
fn test_split_into_chunks_with150Entries_shouldYieldTwoChunks() {
    let collection =
        SubtitleCollection::new(PathBuf::from("test.srt"), common::generate_entries(150));

    let chunks = collection.split_into_chunks(100);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].len(), 100);
    assert_eq!(chunks[1].len(), 50);
}

/// Test chunk coverage: concatenating chunks reproduces the input
#[test]
fn test_split_into_chunks_withAnyChunkSize_shouldCoverAllEntries() {
    let entries = common::generate_entries(25);
    let collection = SubtitleCollection::new(PathBuf::from("test.srt"), entries.clone());

    let chunks = collection.split_into_chunks(7);

    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![7, 7, 7, 4]);

    let rejoined: Vec<_> = chunks.into_iter().flatten().collect();
    assert_eq!(rejoined, entries);
}

/// Test that zero entries produce zero chunks, not one empty chunk
#[test]
fn test_split_into_chunks_withNoEntries_shouldYieldNoChunks() {
    let collection = SubtitleCollection::new(PathBuf::from("test.srt"), Vec::new());

    let chunks = collection.split_into_chunks(100);

    assert!(chunks.is_empty());
}

/// Test a chunk size larger than the entry count
#[test]
fn test_split_into_chunks_withOversizedChunkSize_shouldYieldOneChunk() {
    let collection =
        SubtitleCollection::new(PathBuf::from("test.srt"), common::generate_entries(10));

    let chunks = collection.split_into_chunks(100);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].len(), 10);
}
