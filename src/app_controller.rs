use anyhow::{Result, anyhow};
use log::{error, warn, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::subtitle_merger::SubtitleMerger;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::text_formatting::{BlockFormatter, PunctuationCleaner};
use crate::translation::{BatchTranslator, ChunkTranslator, TranslationService};

// @module: Application controller for the subtitle pipeline

/// Main application controller driving the pipeline stages
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Controller { config }
    }

    /// Run the full pipeline on one subtitle file:
    /// parse, chunk, translate, reformat, merge, punctuation cleanup, write.
    ///
    /// Returns the path of the final bilingual file. Recoverable issues
    /// (malformed blocks, failed batches, cues without a primary timestamp)
    /// degrade the output and are logged; a stage that yields nothing at all
    /// aborts the run.
    pub async fn run_pipeline(&self, input_file: &Path) -> Result<PathBuf> {
        let start_time = std::time::Instant::now();

        let original_entries = self.parse_input_file(input_file)?;

        let work_dir =
            Path::new(&self.config.pipeline.work_dir).join(FileManager::run_timestamp());
        FileManager::ensure_dir(&work_dir)?;

        let collection = SubtitleCollection::new(input_file.to_path_buf(), original_entries);
        let chunks = collection.split_into_chunks(self.config.pipeline.chunk_size);

        info!(
            "Translating {} entries in {} batches via {} - {}",
            collection.entries.len(),
            chunks.len(),
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        // One provider client for the whole run, shared across batches
        let service: Arc<dyn ChunkTranslator> = Arc::new(TranslationService::new(
            self.config.translation.clone(),
            &self.config.source_language,
            &self.config.target_language,
        )?);

        let progress_bar = ProgressBar::new(chunks.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg} {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("#>-"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let batch_translator = BatchTranslator::new(
            service,
            self.config.translation.get_concurrent_requests(),
        );
        let outcome = batch_translator
            .translate_batches(&chunks, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await?;
        progress_bar.finish_and_clear();

        let stem = input_file
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let translated_path = work_dir.join(format!("translated_{}.txt", stem));
        FileManager::write_to_file(&translated_path, &outcome.translated_text)?;

        let formatted_text = BlockFormatter::reformat(&outcome.translated_text);
        let formatted_path = work_dir.join(format!("formatted_{}.txt", stem));
        FileManager::write_to_file(&formatted_path, &formatted_text)?;

        let translated_outcome = SubtitleCollection::parse_srt_string(&formatted_text);
        if translated_outcome.skipped_blocks > 0 {
            warn!(
                "Dropped {} malformed blocks from the translated output",
                translated_outcome.skipped_blocks
            );
        }
        if translated_outcome.entries.is_empty() {
            return Err(SubtitleError::NoEntries("the translated output".to_string()).into());
        }

        let (primary, secondary) = if self.config.pipeline.translation_on_top {
            (&translated_outcome.entries, &collection.entries)
        } else {
            (&collection.entries, &translated_outcome.entries)
        };
        let mut merged = SubtitleMerger::merge(primary, secondary);
        if !merged.dropped.is_empty() {
            warn!(
                "Dropped {} cues without a timestamp on the primary side",
                merged.dropped.len()
            );
        }
        if merged.entries.is_empty() {
            return Err(SubtitleError::NoEntries("the merged result".to_string()).into());
        }

        let merged_path = work_dir.join(format!("merged_{}.srt", stem));
        FileManager::write_to_file(
            &merged_path,
            &SubtitleCollection::serialize_entries(&merged.entries),
        )?;

        // Cleanup runs on cue text only; index and timestamp lines stay as-is
        for entry in &mut merged.entries {
            entry.text = PunctuationCleaner::strip_text(&entry.text);
        }

        let output_path = FileManager::processed_output_path(input_file, "srt");
        FileManager::write_to_file(
            &output_path,
            &SubtitleCollection::serialize_entries(&merged.entries),
        )?;

        if self.config.pipeline.keep_intermediate {
            info!("Intermediate files kept in {:?}", work_dir);
        } else if let Err(e) = fs::remove_dir_all(&work_dir) {
            warn!("Failed to clean up work directory {:?}: {}", work_dir, e);
        }

        info!(
            "Processing complete in {}: {:?}",
            Self::format_duration(start_time.elapsed()),
            output_path
        );

        Ok(output_path)
    }

    /// Merge two subtitle files, the first being the timestamp authority
    pub fn run_merge(
        &self,
        first: &Path,
        second: &Path,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let first_entries = self.parse_input_file(first)?;
        let second_entries = self.parse_input_file(second)?;

        let merged = SubtitleMerger::merge(&first_entries, &second_entries);
        if !merged.dropped.is_empty() {
            warn!(
                "Dropped {} cues without a timestamp in {:?}",
                merged.dropped.len(),
                first
            );
        }
        if merged.entries.is_empty() {
            return Err(SubtitleError::NoEntries("the merged result".to_string()).into());
        }

        let output_path = output.map(Path::to_path_buf).unwrap_or_else(|| {
            PathBuf::from(format!("merged_subtitle_{}.srt", FileManager::run_timestamp()))
        });
        FileManager::write_to_file(
            &output_path,
            &SubtitleCollection::serialize_entries(&merged.entries),
        )?;

        info!("Merged subtitles saved to {:?}", output_path);
        Ok(output_path)
    }

    /// Reformat a translation-mangled subtitle file into canonical blocks
    pub fn run_format(&self, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        let content = FileManager::read_to_string_detect(input)?;
        let formatted = BlockFormatter::reformat(&content);

        let output_path = output.map(Path::to_path_buf).unwrap_or_else(|| {
            let parent = input.parent().unwrap_or_else(|| Path::new("."));
            let name = input.file_name().unwrap_or_default().to_string_lossy();
            parent.join(format!("formatted_{}", name))
        });
        FileManager::write_to_file(&output_path, &formatted)?;

        info!("Formatted subtitles saved to {:?}", output_path);
        Ok(output_path)
    }

    /// Strip full-width punctuation from one file or from every subtitle
    /// file directly inside a directory
    pub fn run_strip(&self, path: &Path) -> Result<()> {
        if FileManager::dir_exists(path) {
            let files = FileManager::find_subtitle_files(path)?;
            if files.is_empty() {
                warn!("No subtitle files found in {:?}", path);
                return Ok(());
            }

            info!("Found {} subtitle files", files.len());
            let mut success_count = 0;
            for file in &files {
                match self.strip_file(file) {
                    Ok(output) => {
                        success_count += 1;
                        info!("Processed {:?} -> {:?}", file, output);
                    }
                    Err(e) => error!("Failed to process {:?}: {}", file, e),
                }
            }
            info!(
                "Punctuation cleanup finished: {} of {} files processed",
                success_count,
                files.len()
            );
            Ok(())
        } else {
            let output = self.strip_file(path)?;
            info!("Processed {:?} -> {:?}", path, output);
            Ok(())
        }
    }

    /// Strip punctuation from the cue text of one file
    fn strip_file(&self, input: &Path) -> Result<PathBuf> {
        let entries = self.parse_input_file(input)?;

        let stripped: Vec<SubtitleEntry> = entries
            .into_iter()
            .map(|mut entry| {
                entry.text = PunctuationCleaner::strip_text(&entry.text);
                entry
            })
            .collect();

        let extension = input
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "srt".to_string());
        let output_path = FileManager::processed_output_path(input, &extension);
        FileManager::write_to_file(
            &output_path,
            &SubtitleCollection::serialize_entries(&stripped),
        )?;

        Ok(output_path)
    }

    /// Check, read and parse a subtitle input file
    fn parse_input_file(&self, input_file: &Path) -> Result<Vec<SubtitleEntry>> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if !FileManager::is_supported_extension(input_file) {
            return Err(
                SubtitleError::UnsupportedExtension(input_file.display().to_string()).into(),
            );
        }

        let content = FileManager::read_to_string_detect(input_file)?;
        let outcome = SubtitleCollection::parse_srt_string(&content);
        if outcome.skipped_blocks > 0 {
            warn!(
                "Dropped {} malformed blocks from {:?}",
                outcome.skipped_blocks, input_file
            );
        }
        if outcome.entries.is_empty() {
            return Err(SubtitleError::NoEntries(input_file.display().to_string()).into());
        }

        Ok(outcome.entries)
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
