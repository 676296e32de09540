//! HTTP client for the chat answer service

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio::time::timeout;

use sohmon_core::{AnswerProvider, AnswerReply, AssistantMode, Error, Result};

use crate::config::ServiceConfig;

/// Client for `POST /chat`
pub struct AnswerClient {
    config: ServiceConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
    mode: &'static str,
}

impl AnswerClient {
    /// Create a new answer client from configuration
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new answer client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ServiceConfig::from_env()?)
    }

    async fn perform_ask(&self, question: &str, mode: AssistantMode) -> Result<AnswerReply> {
        let url = format!("{}/chat", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest {
                question,
                mode: mode.wire_value(),
            })
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Service(format!(
                "chat request failed with status {}: {}",
                status, error_text
            )));
        }

        // A body without an `answer` field is malformed; a missing `source`
        // is fine and resolved by the session.
        response
            .json::<AnswerReply>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[async_trait]
impl AnswerProvider for AnswerClient {
    async fn ask(&self, question: &str, mode: AssistantMode) -> Result<AnswerReply> {
        match timeout(self.config.timeout(), self.perform_ask(question, mode)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("chat request timed out".to_string())),
        }
    }
}
