use async_trait::async_trait;
use serde_json::json;

use super::TranslationClient;
use crate::config::{Language, LlmProviderConfig};
use crate::error::{Result, SublateError};

const DEFAULT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Translation through an OpenAI-compatible chat-completions endpoint.
pub struct LlmTranslator {
    client: reqwest::Client,
    provider: LlmProviderConfig,
}

impl LlmTranslator {
    pub fn new(provider: LlmProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider,
        }
    }

    fn endpoint(&self) -> String {
        match &self.provider.base_url {
            Some(base_url) => format!(
                "{}/v1/chat/completions",
                base_url.trim_end_matches('/')
            ),
            None => DEFAULT_URL.to_string(),
        }
    }
}

fn translation_error(target: Language, message: impl std::fmt::Display) -> SublateError {
    SublateError::Translation {
        target: target.to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl TranslationClient for LlmTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String> {
        let body = json!({
            "model": self.provider.model,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "You are a professional video subtitle translator. \
                         Translate the user's text into {}. \
                         Output ONLY the translation, nothing else.",
                        target.as_str()
                    ),
                },
                { "role": "user", "content": text },
            ],
        });

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(api_key) = &self.provider.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| translation_error(target, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(translation_error(
                target,
                format!("API error {status}: {error_text}"),
            ));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| translation_error(target, e))?;

        response_json["choices"][0]["message"]["content"]
            .as_str()
            .map(|content| content.trim().to_string())
            .ok_or_else(|| translation_error(target, "response has no message content"))
    }
}
