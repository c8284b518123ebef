/*!
 * Translation layer for subtitle batches.
 *
 * This module contains the service that talks to an LLM provider and the
 * batch driver that feeds it cue chunks:
 *
 * - `core`: provider client ownership, prompt building, per-chunk calls
 * - `batch`: concurrent best-effort processing of batches with ordered
 *   reassembly
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOutcome, BatchTranslator};
pub use self::core::{ChunkTranslator, TranslationService};

// Submodules
pub mod batch;
pub mod core;
