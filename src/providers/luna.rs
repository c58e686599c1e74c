use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::errors::ProviderError;

use super::{ProviderKind, TranslationResult, Translator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// LunaTranslator HTTP bridge client.
///
/// Luna exposes whatever translation engines the operator enabled in its
/// own UI; an optional engine name is resolved to an id during init.
/// Line-at-a-time, errors isolated per line.
#[derive(Debug)]
pub struct LunaTranslator {
    /// Base URL of the LunaTranslator HTTP server
    base_url: Url,
    /// Engine name configured by the operator, empty for Luna's default
    engine_name: String,
    /// Engine id resolved from the name during init
    engine_id: Option<String>,
    /// Declared source language, if any (Luna does not detect languages)
    source_lang: Option<String>,
    /// Target language the configured engine translates into
    target_lang: String,
    /// HTTP client for making requests
    client: Client,
}

/// One entry of the /api/list/translator listing
#[derive(Debug, Deserialize)]
struct EngineInfo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
}

/// Response of /api/translate
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    result: String,
}

impl LunaTranslator {
    /// Create a new LunaTranslator client
    pub fn new(
        endpoint: &str,
        engine_name: String,
        source_lang: Option<String>,
        target_lang: String,
    ) -> Result<Self> {
        let base_url = Url::parse(endpoint)
            .with_context(|| format!("Invalid LunaTranslator endpoint: {}", endpoint))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(LunaTranslator {
            base_url,
            engine_name,
            engine_id: None,
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

    async fn translate_line(&self, line: &str) -> Result<TranslationResult, ProviderError> {
        let mut url = self.endpoint("/api/translate")?;
        url.query_pairs_mut().append_pair("text", line);
        if let Some(id) = &self.engine_id {
            url.query_pairs_mut().append_pair("id", id);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(TranslationResult {
            text: body.result.trim().to_string(),
            detected_source_lang: None,
            translator: self.kind(),
        })
    }
}

#[async_trait]
impl Translator for LunaTranslator {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Luna
    }

    fn source_lang(&self) -> Option<&str> {
        self.source_lang.as_deref()
    }

    fn target_lang(&self) -> &str {
        &self.target_lang
    }

    /// Verify the bridge is reachable and resolve the configured engine
    /// name to its id
    async fn init(&mut self) -> Result<(), ProviderError> {
        let url = self.endpoint("/api/list/translator")?;
        let engines: Vec<EngineInfo> = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if engines.is_empty() {
            return Err(ProviderError::UnsupportedLanguage(
                "LunaTranslator reported no enabled translation engines".to_string(),
            ));
        }

        if !self.engine_name.is_empty() {
            let engine = engines
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(&self.engine_name))
                .filter(|e| !e.id.is_empty())
                .ok_or_else(|| {
                    ProviderError::UnsupportedLanguage(format!(
                        "unknown engine '{}'. Please visit {} for the list of enabled engines; engines must be configured in LunaTranslator itself",
                        self.engine_name, url
                    ))
                })?;
            self.engine_id = Some(engine.id.clone());
        }

        info!(
            "LunaTranslator ready at {} (engine: {})",
            self.base_url,
            self.engine_id.as_deref().unwrap_or("default")
        );
        Ok(())
    }

    /// Translate lines one at a time; a failed line yields an empty result
    /// and the rest of the batch proceeds
    async fn translate(&self, lines: &[String]) -> Vec<TranslationResult> {
        let mut results = Vec::with_capacity(lines.len());
        for line in lines {
            match self.translate_line(line).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("LunaTranslator failed for a line: {}", e);
                    results.push(TranslationResult::empty(self.kind()));
                }
            }
        }
        results
    }
}
