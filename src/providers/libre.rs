use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;

use super::{ProviderKind, TranslationResult, Translator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// LibreTranslate client for a self-hosted server.
///
/// Line-at-a-time: one round trip per caption line, errors isolated per line.
#[derive(Debug)]
pub struct LibreTranslator {
    /// Base URL of the LibreTranslate server
    base_url: Url,
    /// Source language code, or "auto" for detection
    source_lang: String,
    /// Target language code
    target_lang: String,
    /// HTTP client for making requests
    client: Client,
}

/// Translate request for the LibreTranslate API
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
}

/// Translate response from the LibreTranslate API
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
    #[serde(rename = "detectedLanguage", default)]
    detected_language: Option<DetectedLanguage>,
}

/// Detection info returned when translating with source "auto"
#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    language: String,
}

/// One entry of the /languages listing
#[derive(Debug, Deserialize)]
struct LanguageInfo {
    code: String,
    #[serde(default)]
    targets: Vec<String>,
}

impl LibreTranslator {
    /// Create a new LibreTranslate client
    pub fn new(endpoint: &str, source_lang: String, target_lang: String) -> Result<Self> {
        let base_url = Url::parse(endpoint)
            .with_context(|| format!("Invalid LibreTranslate endpoint: {}", endpoint))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(LibreTranslator {
            base_url,
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

    async fn translate_line(
        &self,
        line: &str,
        source: &str,
    ) -> Result<TranslationResult, ProviderError> {
        let url = self.endpoint("/translate")?;
        let request = TranslateRequest {
            q: line,
            source,
            target: &self.target_lang,
        };

        let response = self
            .client
            .post(url)
            .json(&request)
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
            text: body.translated_text.trim().to_string(),
            detected_source_lang: body.detected_language.map(|d| d.language.to_lowercase()),
            translator: self.kind(),
        })
    }
}

#[async_trait]
impl Translator for LibreTranslator {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Libre
    }

    fn source_lang(&self) -> Option<&str> {
        // "auto" means the server detects the language per line
        if self.source_lang.is_empty() || self.source_lang.eq_ignore_ascii_case("auto") {
            None
        } else {
            Some(&self.source_lang)
        }
    }

    fn target_lang(&self) -> &str {
        &self.target_lang
    }

    /// Verify the server is reachable and the configured language pair is
    /// actually offered by it
    async fn init(&mut self) -> Result<(), ProviderError> {
        let url = self.endpoint("/languages")?;
        let languages: Vec<LanguageInfo> = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if languages.is_empty() {
            return Err(ProviderError::UnsupportedLanguage(
                "server reported no supported languages".to_string(),
            ));
        }

        if let Some(source) = self.source_lang() {
            let source_info = languages
                .iter()
                .find(|l| l.code.eq_ignore_ascii_case(source))
                .ok_or_else(|| {
                    ProviderError::UnsupportedLanguage(format!(
                        "source language '{}' is not offered by the server",
                        source
                    ))
                })?;

            if !source_info
                .targets
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&self.target_lang))
            {
                return Err(ProviderError::UnsupportedLanguage(format!(
                    "target language '{}' is not offered for source '{}'. Please visit {} for a list of supported language codes",
                    self.target_lang, source, url
                )));
            }
        }

        info!(
            "LibreTranslate ready at {} ({} -> {})",
            self.base_url, self.source_lang, self.target_lang
        );
        Ok(())
    }

    /// Translate lines one at a time; a failed line yields an empty result
    /// and the rest of the batch proceeds
    async fn translate(&self, lines: &[String]) -> Vec<TranslationResult> {
        self.translate_from(lines, self.source_lang()).await
    }

    /// Same per-line requests with the caller's source language instead of
    /// the configured one
    async fn translate_from(
        &self,
        lines: &[String],
        source_lang: Option<&str>,
    ) -> Vec<TranslationResult> {
        let source = source_lang.unwrap_or("auto");
        let mut results = Vec::with_capacity(lines.len());
        for line in lines {
            match self.translate_line(line, source).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("LibreTranslate failed for a line: {}", e);
                    results.push(TranslationResult::empty(self.kind()));
                }
            }
        }
        results
    }
}
