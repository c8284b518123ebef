/*!
 * # subfuse - bilingual subtitle processing pipeline
 *
 * A Rust library for turning a single-language subtitle file into a
 * bilingual one using AI translation.
 *
 * ## Features
 *
 * - Tolerant SRT parsing and canonical serialization
 * - Fixed-size chunking for batch translation
 * - Translation via DeepSeek (OpenAI-compatible API) or a local Ollama server
 * - Repair of blank-line structure in model output
 * - Index-keyed bilingual merging with timestamp authority
 * - Full-width/CJK punctuation cleanup of cue text
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Cue parsing, serialization and chunking
 * - `subtitle_merger`: Bilingual merge of two cue streams
 * - `text_formatting`: Block reformatting and punctuation cleanup
 * - `translation`: AI-powered translation:
 *   - `translation::core`: Provider ownership and per-chunk calls
 *   - `translation::batch`: Concurrent best-effort batch processing
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::deepseek`: DeepSeek API client
 *   - `providers::ollama`: Ollama API client
 * - `file_utils`: File system operations and encoding detection
 * - `app_controller`: Pipeline orchestration
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod subtitle_merger;
pub mod subtitle_processor;
pub mod text_formatting;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
pub use subtitle_merger::{MergeOutcome, SubtitleMerger};
pub use subtitle_processor::{ParseOutcome, SubtitleCollection, SubtitleEntry};
pub use text_formatting::{BlockFormatter, PunctuationCleaner};
pub use translation::{BatchOutcome, BatchTranslator, ChunkTranslator, TranslationService};
