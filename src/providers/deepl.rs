use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;

use super::{ProviderKind, TranslationResult, Translator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// DeepL API client.
///
/// The only batch-capable backend: one round trip translates every
/// unresolved line of a file.
#[derive(Debug)]
pub struct DeepLTranslator {
    /// Base URL of the DeepL API
    base_url: Url,
    /// API authentication key
    api_key: String,
    /// Fixed source language, or None for auto-detect
    source_lang: Option<String>,
    /// Target language code (e.g. "en-US")
    target_lang: String,
    /// HTTP client for making requests
    client: Client,
}

/// Translate request for the DeepL v2 API
#[derive(Debug, Serialize)]
struct TranslateRequest {
    /// Lines to translate
    text: Vec<String>,
    /// Source language, omitted for auto-detect
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
    /// Target language
    target_lang: String,
}

/// Translate response from the DeepL v2 API
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

/// One translated line in a DeepL response
#[derive(Debug, Deserialize)]
struct Translation {
    /// Language DeepL detected the input to be
    #[serde(default)]
    detected_source_language: Option<String>,
    /// Translated text
    text: String,
}

/// Usage response from the DeepL v2 API
#[derive(Debug, Deserialize)]
struct UsageResponse {
    #[serde(default)]
    character_count: Option<u64>,
    #[serde(default)]
    character_limit: Option<u64>,
    #[serde(default)]
    document_count: Option<u64>,
    #[serde(default)]
    document_limit: Option<u64>,
}

impl UsageResponse {
    /// Whether any metered quota is exhausted
    fn any_limit_reached(&self) -> bool {
        let reached = |count: Option<u64>, limit: Option<u64>| match (count, limit) {
            (Some(c), Some(l)) => l > 0 && c >= l,
            _ => false,
        };
        reached(self.character_count, self.character_limit)
            || reached(self.document_count, self.document_limit)
    }
}

impl DeepLTranslator {
    /// Create a new DeepL client
    pub fn new(
        endpoint: &str,
        api_key: &str,
        source_lang: Option<String>,
        target_lang: String,
    ) -> Result<Self> {
        let base_url = Url::parse(endpoint)
            .with_context(|| format!("Invalid DeepL endpoint: {}", endpoint))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(DeepLTranslator {
            base_url,
            api_key: api_key.to_string(),
            source_lang,
            target_lang,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid URL path {}: {}", path, e)))
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    /// Run one batched translate request with the given source language
    /// (None means auto-detect). Failures degrade to empty results.
    async fn request_batch(
        &self,
        lines: &[String],
        source_lang: Option<&str>,
    ) -> Vec<TranslationResult> {
        let url = match self.endpoint("/v2/translate") {
            Ok(url) => url,
            Err(e) => {
                error!("DeepL request could not be built: {}", e);
                return vec![TranslationResult::empty(self.kind()); lines.len()];
            }
        };

        let request = TranslateRequest {
            text: lines.to_vec(),
            source_lang: source_lang.map(|l| l.to_string()),
            target_lang: self.target_lang.clone(),
        };

        let response = self
            .client
            .post(url)
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await;

        let parsed: Result<TranslateResponse, String> = match response {
            Ok(resp) if resp.status().is_success() => {
                resp.json().await.map_err(|e| e.to_string())
            }
            Ok(resp) => Err(format!("status {}", resp.status())),
            Err(e) => Err(e.to_string()),
        };

        match parsed {
            Ok(body) => {
                debug!("DeepL returned {} translations for {} lines", body.translations.len(), lines.len());
                let mut results: Vec<TranslationResult> = body
                    .translations
                    .into_iter()
                    .take(lines.len())
                    .map(|t| TranslationResult {
                        text: t.text.trim().to_string(),
                        detected_source_lang: t
                            .detected_source_language
                            .map(|l| l.to_lowercase()),
                        translator: self.kind(),
                    })
                    .collect();
                // Contract: one result per line. Short responses are padded
                // with empties so validation rejects the missing tail.
                while results.len() < lines.len() {
                    results.push(TranslationResult::empty(self.kind()));
                }
                results
            }
            Err(e) => {
                error!("DeepL batch translation failed: {}", e);
                vec![TranslationResult::empty(self.kind()); lines.len()]
            }
        }
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeepL
    }

    fn source_lang(&self) -> Option<&str> {
        self.source_lang.as_deref()
    }

    fn target_lang(&self) -> &str {
        &self.target_lang
    }

    /// Verify the API key and remaining quota via the usage endpoint
    async fn init(&mut self) -> Result<(), ProviderError> {
        let url = self.endpoint("/v2/usage")?;
        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 403 {
            return Err(ProviderError::AuthenticationError(
                "DeepL rejected the API key. Please ensure DEEPL_API_KEY is set correctly in the environment or .env file".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let usage: UsageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if usage.any_limit_reached() {
            let mut details = Vec::new();
            if let (Some(count), Some(limit)) = (usage.character_count, usage.character_limit) {
                details.push(format!("characters: {} of {}", count, limit));
            }
            if let (Some(count), Some(limit)) = (usage.document_count, usage.document_limit) {
                details.push(format!("documents: {} of {}", count, limit));
            }
            return Err(ProviderError::QuotaExceeded(details.join(", ")));
        }

        info!("DeepL translator ready (target language {})", self.target_lang);
        Ok(())
    }

    /// Translate all lines in a single batched request.
    ///
    /// A failed batch degrades to empty results for every line; validation
    /// rejects them and the file's captions keep their prior text.
    async fn translate(&self, lines: &[String]) -> Vec<TranslationResult> {
        self.request_batch(lines, self.source_lang.as_deref()).await
    }

    /// Same batched request with the caller's source language instead of
    /// the configured one
    async fn translate_from(
        &self,
        lines: &[String],
        source_lang: Option<&str>,
    ) -> Vec<TranslationResult> {
        self.request_batch(lines, source_lang).await
    }
}
