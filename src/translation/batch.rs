/*!
 * Batch translation processing.
 *
 * Batches are independent, so they are translated concurrently up to a
 * configured limit and reassembled in their original order before
 * concatenation. A failed batch is logged and omitted rather than aborting
 * the run; only a run in which every batch failed is an error.
 */

use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use futures::stream::{self, StreamExt};

use crate::errors::TranslationError;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use super::core::ChunkTranslator;

/// What a batch run produced: the concatenated translated document and the
/// indices of batches whose calls failed.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Translated blocks joined with one blank line, in batch order
    pub translated_text: String,

    /// Zero-based indices of batches that failed
    pub failed_batches: Vec<usize>,

    /// Number of batches that were attempted
    pub total_batches: usize,
}

/// Batch translator for processing subtitle chunks
pub struct BatchTranslator {
    /// The chunk translator to drive
    translator: Arc<dyn ChunkTranslator>,

    /// Maximum number of concurrent requests
    max_concurrent_requests: usize,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(translator: Arc<dyn ChunkTranslator>, max_concurrent_requests: usize) -> Self {
        Self {
            translator,
            max_concurrent_requests: max_concurrent_requests.max(1),
        }
    }

    /// Translate batches of subtitle entries.
    ///
    /// Each batch is rendered to its SRT block form and handed to the chunk
    /// translator. `progress_callback` is invoked with (completed, total)
    /// as batches finish, in completion order.
    pub async fn translate_batches(
        &self,
        batches: &[Vec<SubtitleEntry>],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<BatchOutcome, TranslationError> {
        if batches.is_empty() {
            return Ok(BatchOutcome {
                translated_text: String::new(),
                failed_batches: Vec::new(),
                total_batches: 0,
            });
        }

        // Create a semaphore to limit concurrent requests
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));

        // Track progress
        let total_batches = batches.len();
        let processed_batches = Arc::new(AtomicUsize::new(0));

        // Process batches concurrently
        let results = stream::iter(batches.iter().enumerate())
            .map(|(batch_index, batch)| {
                let translator = Arc::clone(&self.translator);
                let semaphore = Arc::clone(&semaphore);
                let processed_batches = Arc::clone(&processed_batches);
                let progress_callback = progress_callback.clone();
                let block_text = SubtitleCollection::serialize_entries(batch);

                async move {
                    // Acquire a permit from the semaphore
                    let _permit = semaphore.acquire().await.unwrap();

                    debug!("Translating batch {} of {}", batch_index + 1, total_batches);
                    let result = translator.translate_chunk(&block_text).await;

                    // Update progress
                    let current = processed_batches.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_batches);

                    (batch_index, result)
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Sort results by batch index to restore original order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(idx, _)| *idx);

        let mut translated_blocks = Vec::with_capacity(total_batches);
        let mut failed_batches = Vec::new();

        for (batch_index, result) in sorted_results {
            match result {
                Ok(text) => translated_blocks.push(text.trim().to_string()),
                Err(e) => {
                    error!("Batch {} failed: {}", batch_index + 1, e);
                    failed_batches.push(batch_index);
                }
            }
        }

        if translated_blocks.is_empty() {
            return Err(TranslationError::AllBatchesFailed(total_batches));
        }

        if !failed_batches.is_empty() {
            warn!(
                "{} of {} batches failed; the translated output will be incomplete",
                failed_batches.len(),
                total_batches
            );
        }

        Ok(BatchOutcome {
            translated_text: translated_blocks.join("\n\n"),
            failed_batches,
            total_batches,
        })
    }
}
