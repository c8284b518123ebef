use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{error, warn, debug};

// @module: Subtitle parsing, serialization and chunking

// @const: SRT timestamp line, millisecond precision, comma separator
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

// @const: Cue blocks are separated by at least one blank line
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Cue number as it appears in the source (merge key, not renumbered)
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, may be empty
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.split(&[':', ','][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\n{} --> {}\n{}",
            self.seq_num,
            self.format_start_time(),
            self.format_end_time(),
            self.text
        )
    }
}

/// Result of a tolerant parse: the entries that matched the cue pattern and
/// the number of blocks that did not.
#[derive(Debug)]
pub struct ParseOutcome {
    /// Entries in source order, original numbering preserved
    pub entries: Vec<SubtitleEntry>,

    /// Blocks dropped because they did not match the three-part cue shape
    pub skipped_blocks: usize,
}

/// Collection of subtitle entries with their source path
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create a new subtitle collection
    pub fn new(source_file: PathBuf, entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection {
            source_file,
            entries,
        }
    }

    /// Parse SRT-shaped content into subtitle entries.
    ///
    /// Parsing is tolerant: any blank-line-delimited block that does not
    /// carry the `{index}\n{start --> end}\n{text}` shape is dropped, and the
    /// drop is surfaced in the outcome rather than treated as an error.
    /// Entry order and numbering follow the source.
    pub fn parse_srt_string(content: &str) -> ParseOutcome {
        let normalized = content.replace("\r\n", "\n");
        let trimmed = normalized.trim();

        let mut entries = Vec::new();
        let mut skipped_blocks = 0;

        for block in BLOCK_SEPARATOR.split(trimmed) {
            if block.trim().is_empty() {
                continue;
            }
            match Self::parse_block(block) {
                Some(entry) => entries.push(entry),
                None => {
                    skipped_blocks += 1;
                    debug!(
                        "Skipping block without cue shape, starts with: {:?}",
                        block.lines().next().unwrap_or("")
                    );
                }
            }
        }

        ParseOutcome {
            entries,
            skipped_blocks,
        }
    }

    /// Parse one blank-line-delimited block into an entry.
    ///
    /// Translation output sometimes prepends stray lines to a block, so the
    /// scan accepts the first index line that is immediately followed by a
    /// valid timestamp line; everything after the timestamp line is text.
    fn parse_block(block: &str) -> Option<SubtitleEntry> {
        let lines: Vec<&str> = block.split('\n').collect();

        for i in 0..lines.len().saturating_sub(1) {
            let index_line = lines[i].trim();
            if index_line.is_empty() || !index_line.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }

            let Some(caps) = TIMESTAMP_REGEX.captures(lines[i + 1].trim()) else {
                continue;
            };
            let Ok(seq_num) = index_line.parse::<usize>() else {
                continue;
            };
            let Some(start_time_ms) = Self::timestamp_to_ms(&caps, 1) else {
                continue;
            };
            let Some(end_time_ms) = Self::timestamp_to_ms(&caps, 5) else {
                continue;
            };

            let text = lines[i + 2..].join("\n").trim().to_string();
            return Some(SubtitleEntry {
                seq_num,
                start_time_ms,
                end_time_ms,
                text,
            });
        }

        None
    }

    /// Convert captured timestamp fields to milliseconds.
    /// Out-of-range minutes or seconds would not survive a round-trip, so
    /// they disqualify the whole block.
    fn timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
        let field = |offset: usize| {
            caps.get(start_idx + offset)
                .and_then(|m| m.as_str().parse::<u64>().ok())
        };

        let hours = field(0)?;
        let minutes = field(1)?;
        let seconds = field(2)?;
        let millis = field(3)?;

        if minutes >= 60 || seconds >= 60 {
            return None;
        }

        Some((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
    }

    /// Render entries back to SRT text, cue blocks joined by one blank line
    pub fn serialize_entries(entries: &[SubtitleEntry]) -> String {
        entries
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render this collection to SRT text
    pub fn to_srt_string(&self) -> String {
        Self::serialize_entries(&self.entries)
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        file.write_all(self.to_srt_string().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }

    /// Split subtitles into fixed-size chunks for translation.
    ///
    /// Entries are consumed left to right into chunks of `chunk_size`; the
    /// final chunk may be smaller. Order is preserved and nothing is dropped.
    pub fn split_into_chunks(&self, chunk_size: usize) -> Vec<Vec<SubtitleEntry>> {
        if self.entries.is_empty() {
            warn!("No subtitle entries to split into chunks");
            return Vec::new();
        }

        // Protect against accidental loss of subtitles - count at the beginning
        let total_entries = self.entries.len();

        // Config validation rejects zero, but a direct caller might not go
        // through it
        let chunk_size = chunk_size.max(1);

        let mut chunks = Vec::with_capacity(total_entries.div_ceil(chunk_size));
        let mut current_chunk = Vec::with_capacity(chunk_size);

        for entry in &self.entries {
            current_chunk.push(entry.clone());
            if current_chunk.len() >= chunk_size {
                chunks.push(current_chunk);
                current_chunk = Vec::with_capacity(chunk_size);
            }
        }

        if !current_chunk.is_empty() {
            chunks.push(current_chunk);
        }

        // Verify that all entries have been included in the chunks
        let total_chunked_entries: usize = chunks.iter().map(|chunk| chunk.len()).sum();
        if total_chunked_entries != total_entries {
            error!(
                "CRITICAL ERROR: Lost entries during chunking! Original: {}, After chunking: {}",
                total_entries, total_chunked_entries
            );
        } else if log::max_level() >= log::LevelFilter::Debug {
            for (i, chunk) in chunks.iter().enumerate() {
                debug!(
                    "Chunk {}: {} entries (seq_nums {} to {})",
                    i + 1,
                    chunk.len(),
                    chunk.first().map(|e| e.seq_num).unwrap_or(0),
                    chunk.last().map(|e| e.seq_num).unwrap_or(0)
                );
            }
        }

        chunks
    }
}
