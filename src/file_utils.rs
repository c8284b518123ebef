use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use chrono::Local;
use log::warn;

// @module: File and directory utilities

// Extensions the pipeline accepts as subtitle input
const SUBTITLE_EXTENSIONS: [&str; 2] = ["srt", "txt"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @checks: Extension is one the pipeline accepts (.srt or .txt)
    pub fn is_supported_extension<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                SUBTITLE_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// Read a subtitle file to a string with encoding auto-detection.
    ///
    /// UTF-8 and UTF-16 byte order marks are honored; everything else is
    /// treated as UTF-8, falling back to lossy decoding so a stray legacy
    /// byte cannot abort the run.
    pub fn read_to_string_detect<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;

        if let Some(stripped) = bytes.strip_prefix(&[0xFF, 0xFE]) {
            return Ok(Self::decode_utf16(stripped, u16::from_le_bytes));
        }
        if let Some(stripped) = bytes.strip_prefix(&[0xFE, 0xFF]) {
            return Ok(Self::decode_utf16(stripped, u16::from_be_bytes));
        }

        let without_bom = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
        match std::str::from_utf8(without_bom) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => {
                warn!(
                    "File {:?} is not valid UTF-8, decoding lossily",
                    path
                );
                Ok(String::from_utf8_lossy(without_bom).into_owned())
            }
        }
    }

    fn decode_utf16(bytes: &[u8], to_u16: fn([u8; 2]) -> u16) -> String {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| to_u16([pair[0], pair[1]]))
            .collect();
        char::decode_utf16(units)
            .map(|result| result.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    /// Write a string to a file as UTF-8
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Timestamp string used to name per-run work directories
    pub fn run_timestamp() -> String {
        Local::now().format("%Y%m%d_%H%M%S").to_string()
    }

    // @generates: Output path under Processed/ next to the input file
    // @params: input_file, extension
    pub fn processed_output_path<P: AsRef<Path>>(input_file: P, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let parent = input_file.parent().unwrap_or_else(|| Path::new("."));
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str("_processed");
        output_filename.push('.');
        output_filename.push_str(extension);

        parent.join("Processed").join(output_filename)
    }

    /// Find subtitle files (.srt/.txt) directly inside a directory
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_supported_extension(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }
}
