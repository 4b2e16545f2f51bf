use crate::config::ConsultantConfig;
use crate::consultant::{AdviceProvider, SYSTEM_PROMPT};
use crate::error::{InventoryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct OpenAiConsultant {
    http_client: Client,
    config: ConsultantConfig,
}

impl OpenAiConsultant {
    pub fn new(config: ConsultantConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(*config.timeout())
            .build()
            .map_err(|e| InventoryError::Internal(e.into()))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url().trim_end_matches('/')
        )
    }
}

fn build_messages(question: &str, context: &serde_json::Value) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: format!("Current inventory data:\n{context}\n\nQuestion: {question}"),
        },
    ]
}

#[async_trait]
impl AdviceProvider for OpenAiConsultant {
    async fn advise(&self, question: &str, context: &serde_json::Value) -> Result<String> {
        let api_key = self
            .config
            .api_key()
            .as_deref()
            .ok_or_else(|| InventoryError::Consultant("no API key configured".to_string()))?;

        let request = ChatRequest {
            model: self.config.model(),
            messages: build_messages(question, context),
            temperature: 0.7,
        };

        tracing::debug!(model = %self.config.model(), "requesting consultant advice");
        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InventoryError::Consultant(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "completion API returned an error");
            return Err(InventoryError::Consultant(format!(
                "completion API returned {status}"
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| InventoryError::Consultant(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| InventoryError::Consultant("completion API returned no choices".into()))
    }
}
