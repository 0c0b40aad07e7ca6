//! Remote answer generation over a chat-completions endpoint
//!
//! The one network-facing step of the core. Every failure mode (connect
//! error, timeout, non-2xx status, malformed body, missing credential) maps
//! to `RemoteOutcome::Failure`; the caller decides nothing here and falls
//! back locally on any non-success tag.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::errors::{RagError, Result};

const SYSTEM_INSTRUCTION: &str = "你是一个专业的医疗知识问答助手。请根据提供的医疗文献内容，\
简洁、准确地回答用户的问题。如果文献中没有相关信息，请明确说明。";

/// Tagged outcome of one remote generation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Success(String),
    Failure(String),
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client for one bounded chat-completion call per synthesis
pub struct RemoteGenerator {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl RemoteGenerator {
    pub fn new(api_url: String, api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    /// Attempt one generation call; never propagates an error
    pub async fn generate(&self, query: &str, context: &str) -> RemoteOutcome {
        if self.api_key.trim().is_empty() {
            return RemoteOutcome::Failure("api key is not configured".to_string());
        }

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                {
                    "role": "user",
                    "content": format!(
                        "以下是相关医疗文献内容：\n\n{}\n\n请回答问题：{}",
                        context, query
                    ),
                },
            ],
            "max_tokens": 1000,
            "temperature": 0.7,
        });

        let response = match self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return RemoteOutcome::Failure(format!("request failed: {}", e)),
        };

        if !response.status().is_success() {
            return RemoteOutcome::Failure(format!("non-success status: {}", response.status()));
        }

        let body: ChatCompletionResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => return RemoteOutcome::Failure(format!("malformed response: {}", e)),
        };

        match body.choices.into_iter().next() {
            Some(choice) if !choice.message.content.trim().is_empty() => {
                RemoteOutcome::Success(choice.message.content)
            }
            _ => RemoteOutcome::Failure("response missing answer text".to_string()),
        }
    }
}
