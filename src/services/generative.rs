use reqwest::Client;
use serde_json::{json, Value};

use crate::errors::{ApiError, Result};

const MODEL: &str = "gemini-2.5-flash-lite";

/// Single-shot client for the generative-text API. No polling: one
/// request, one response. Quota gating happens in the handlers before
/// any call lands here.
pub struct GenerativeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GenerativeClient {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate(json!([{ "parts": [{ "text": prompt }] }]))
            .await
    }

    pub async fn explain_image(
        &self,
        prompt: &str,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<String> {
        self.generate(json!([{
            "parts": [
                { "text": prompt },
                { "inline_data": { "mime_type": mime_type, "data": image_base64 } }
            ]
        }]))
        .await
    }

    async fn generate(&self, contents: Value) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, MODEL
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "contents": contents }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "model API returned {}: {}",
                status, detail
            )));
        }

        let body: Value = response.json().await?;
        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ApiError::Upstream("model API response had no text candidate".to_string()))
    }
}
