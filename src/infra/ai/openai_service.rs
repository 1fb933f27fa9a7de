use crate::domain::ports::LlmService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;
const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";

pub struct OpenAiService {
    client: Client,
}

impl Default for OpenAiService {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenAiService {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn send_request_with_retry(&self, api_key: &str, payload: &Value) -> Result<String, AppError> {
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self.client.post(COMPLETIONS_URL)
                .bearer_auth(api_key)
                .header("Content-Type", "application/json")
                .json(payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response.json().await.map_err(|e| {
                            error!("Failed to parse completion response JSON: {:?}", e);
                            AppError::Internal
                        })?;
                        return extract_content(body);
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            error!("Completion API failed after {} retries. Status: {}", retries, status);
                            let text = response.text().await.unwrap_or_default();
                            return Err(AppError::InternalWithMsg(format!("AI Provider Error: {} - {}", status, text)));
                        }
                        warn!("Completion API transient error {}. Retrying in {}ms...", status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("Completion API Terminal Error {}: {}", status, text);
                        return Err(AppError::Validation(format!("AI Request Rejected: {} - {}", status, text)));
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Completion Network Error after {} retries: {:?}", retries, e);
                        return Err(AppError::InternalWithMsg(format!("AI Network Error: {}", e)));
                    }
                    warn!("Completion Network Error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

fn extract_content(body: Value) -> Result<String, AppError> {
    if let Some(choices) = body.get("choices").and_then(|c| c.as_array())
        && let Some(first) = choices.first()
        && let Some(content) = first.pointer("/message/content").and_then(|t| t.as_str()) {
        return Ok(content.trim().to_string());
    }

    error!("Invalid or unexpected response structure from completion API: {:?}", body);
    Err(AppError::InternalWithMsg("AI response missing content".to_string()))
}

#[async_trait]
impl LlmService for OpenAiService {
    #[instrument(skip(self, api_key), fields(prompt_len = prompt.len()))]
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError> {
        let payload = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": system_instruction },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": 300
        });

        info!("Sending recommendation request to completion API...");
        let result = self.send_request_with_retry(api_key, &payload).await?;
        info!("Successfully generated recommendation reply.");
        Ok(result)
    }
}
