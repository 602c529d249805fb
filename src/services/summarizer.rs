use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors from the summarization collaborator
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Summarization collaborator: search snippets in, candidate JSON out.
///
/// The returned text is only a *candidate* JSON document; the sanitizer owns
/// parsing and validation.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, disease: &str, snippets: &str) -> Result<String, SummarizerError>;
}

/// Instruction contract sent as the system message. Demands a fixed JSON
/// shape and explicitly forbids markdown fencing; the model still is not
/// trusted to comply.
const SYSTEM_PROMPT: &str = r#"你是一个资深保险核保专家。根据提供的检索资料，总结针对该疾病核保最宽松的保险产品。
必须严格返回以下 JSON 结构，不要包含 markdown 代码块，不要输出任何其他文字：
{
  "products": [
    {
      "product_name": "产品名称",
      "company": "保险公司",
      "verdict": "pass | exclude | manual",
      "summary": "专家一句话点评",
      "content": "具体的核保结论"
    }
  ]
}"#;

/// OpenAI-compatible chat-completions client (DeepSeek/Kimi deployments use
/// the same wire shape).
#[derive(Clone)]
pub struct ChatSummarizer {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

impl ChatSummarizer {
    pub fn new(endpoint: String, api_key: String, model: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            model,
            client,
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, disease: &str, snippets: &str) -> Result<String, SummarizerError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let user_message = format!(
            "疾病：{}\n\n以下是全网检索到的核保资料：\n{}",
            disease, snippets
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": user_message },
                ],
                "response_format": { "type": "json_object" },
                "temperature": 0.1,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Summarization request failed ({}): {}", status, body);
            return Err(SummarizerError::ApiError(format!(
                "Summarization request failed: {}",
                status
            )));
        }

        let completion: ChatCompletion = response.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SummarizerError::InvalidResponse("No choices in completion".into()))?;

        tracing::debug!("Summarizer returned {} chars", content.chars().count());

        Ok(content)
    }
}
