use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::OperationalError;
use crate::tts::api::{GenerateContentRequest, GenerateContentResponse, api_error_message};
use crate::tts::synth::SpeechSynth;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub voice: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-2.5-flash-preview-tts".into(),
            voice: "Kore".into(),
        }
    }
}

/// Gemini text-to-speech over the REST `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiTts {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl Default for GeminiTts {
    fn default() -> Self {
        Self::from_config(GeminiConfig::default())
    }
}

impl GeminiTts {
    pub fn from_config(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl SpeechSynth for GeminiTts {
    async fn synthesize(&self, api_key: &str, prompt: &str) -> Result<Vec<u8>, OperationalError> {
        let url = self.endpoint();
        tracing::debug!(
            "POST {} voice={} prompt_chars={}",
            url,
            self.config.voice,
            prompt.chars().count()
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::speech(prompt, &self.config.voice))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            let message = api_error_message(&String::from_utf8_lossy(&body));
            tracing::warn!("gemini returned {}: {}", status, message);
            return Err(OperationalError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|e| OperationalError::MalformedResponse(e.to_string()))?;
        let inline = parsed.into_inline_audio()?;
        let pcm = STANDARD.decode(inline.data.as_bytes())?;

        tracing::debug!(
            "received {} bytes of {}",
            pcm.len(),
            inline.mime_type.as_deref().unwrap_or("audio")
        );
        Ok(pcm)
    }
}
