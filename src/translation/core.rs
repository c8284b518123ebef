/*!
 * Core translation service implementation.
 *
 * The service owns one provider client for the lifetime of the process,
 * builds the system prompt from the configured template, and retries failed
 * chunk requests with a backoff before giving up on that chunk.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::warn;
use tokio::time::{Duration, sleep};

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::deepseek::{DeepSeek, DeepSeekRequest};
use crate::providers::ollama::{ChatRequest, Ollama};

/// The seam the batch driver depends on: one opaque text-to-text call per
/// cue chunk. Tests substitute their own implementations here.
#[async_trait]
pub trait ChunkTranslator: Send + Sync {
    /// Translate one serialized cue chunk, returning the translated block
    async fn translate_chunk(&self, block_text: &str) -> Result<String, TranslationError>;
}

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// DeepSeek API service
    DeepSeek {
        /// Client instance
        client: DeepSeek,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },
}

/// Main translation service for subtitle translation
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// System prompt with language placeholders resolved
    system_prompt: String,
}

impl TranslationService {
    /// Create a new translation service with the given configuration.
    ///
    /// The provider client is constructed here, once, and reused for every
    /// chunk request the service handles.
    pub fn new(
        config: TranslationConfig,
        source_language: &str,
        target_language: &str,
    ) -> Result<Self> {
        let provider = match config.provider {
            ConfigTranslationProvider::DeepSeek => TranslationProviderImpl::DeepSeek {
                client: DeepSeek::new(
                    config.get_api_key(),
                    config.get_endpoint(),
                    config.get_timeout_secs(),
                ),
            },
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::from_url(config.get_endpoint(), config.get_timeout_secs()),
            },
        };

        let system_prompt = Self::build_system_prompt(&config, source_language, target_language);

        Ok(Self {
            provider,
            config,
            system_prompt,
        })
    }

    /// Resolve the prompt template's language placeholders to full names,
    /// falling back to the raw code when a name is unknown
    fn build_system_prompt(
        config: &TranslationConfig,
        source_language: &str,
        target_language: &str,
    ) -> String {
        let source_name = language_utils::get_language_name(source_language)
            .unwrap_or_else(|_| source_language.to_string());
        let target_name = language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());

        config
            .common
            .system_prompt
            .replace("{source_language}", &source_name)
            .replace("{target_language}", &target_name)
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        match &self.provider {
            TranslationProviderImpl::DeepSeek { client } => client
                .test_connection()
                .await
                .map_err(|e| anyhow!("Failed to connect to DeepSeek API: {}", e)),
            TranslationProviderImpl::Ollama { client } => client
                .test_connection()
                .await
                .map_err(|e| anyhow!("Failed to connect to Ollama: {}", e)),
        }
    }

    /// Issue a single translation request without retries
    async fn request_translation(&self, block_text: &str) -> Result<String, ProviderError> {
        match &self.provider {
            TranslationProviderImpl::DeepSeek { client } => {
                let request = DeepSeekRequest::new(self.config.get_model())
                    .system(self.system_prompt.clone())
                    .user(block_text)
                    .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;
                Ok(DeepSeek::extract_text(&response))
            }
            TranslationProviderImpl::Ollama { client } => {
                let request = ChatRequest::new(self.config.get_model())
                    .system(self.system_prompt.clone())
                    .user(block_text)
                    .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            }
        }
    }
}

#[async_trait]
impl ChunkTranslator for TranslationService {
    async fn translate_chunk(&self, block_text: &str) -> Result<String, TranslationError> {
        let max_attempts = self.config.common.retry_count as u64 + 1;
        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let backoff = Duration::from_millis(self.config.common.retry_backoff_ms * attempt);
                warn!(
                    "Translation request failed, retrying in {:?} ({}/{} attempts used)",
                    backoff, attempt, max_attempts
                );
                sleep(backoff).await;
            }

            match self.request_translation(block_text).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => {
                    last_error = Some(ProviderError::ParseError(
                        "provider returned an empty response".to_string(),
                    ));
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(TranslationError::Provider(last_error.unwrap_or_else(
            || ProviderError::RequestFailed("no translation attempts were made".to_string()),
        )))
    }
}
