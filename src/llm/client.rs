use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::gate::{CallGate, SystemClock};
use super::prompts::{self, Language};
use super::{ChatMessage, ChatRequest};
use crate::analysis::{CampaignReport, MarketReport};
use crate::config::LlmConfig;
use crate::error::InsightError;
use crate::models::CampaignKpis;

/// Wire seam to an OpenAI-compatible chat-completions provider.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one request and return the first choice's message content.
    async fn complete(&self, request: &ChatRequest) -> Result<String, InsightError>;

    /// True when the provider answers its model listing with 200.
    async fn health(&self) -> Result<bool, InsightError>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(cfg: &LlmConfig) -> Result<Self, InsightError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| InsightError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }
}

fn send_error(e: reqwest::Error) -> InsightError {
    if e.is_timeout() {
        InsightError::Timeout
    } else {
        InsightError::Network(e.to_string())
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String, InsightError> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(InsightError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InsightError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| InsightError::Malformed(e.to_string()))?;
        extract_content(&json)
    }

    async fn health(&self) -> Result<bool, InsightError> {
        let url = format!("{}/models", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(send_error)?;
        Ok(resp.status().as_u16() == 200)
    }
}

pub fn extract_content(json: &serde_json::Value) -> Result<String, InsightError> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| InsightError::Malformed("missing choices[0].message.content".to_string()))
}

/// Builds prompts, gates calls, and turns provider failures into text the
/// user can read.
pub struct InsightClient {
    config: LlmConfig,
    transport: Box<dyn ChatTransport>,
    gate: Arc<CallGate>,
}

impl InsightClient {
    /// Clients built from the same gate share its spacing and backoff state.
    pub fn new(config: LlmConfig, transport: Box<dyn ChatTransport>, gate: Arc<CallGate>) -> Self {
        Self {
            config,
            transport,
            gate,
        }
    }

    /// HTTP transport behind a fresh gate on the system clock.
    pub fn from_config(config: LlmConfig) -> Result<Self, InsightError> {
        let gate = Arc::new(CallGate::new(&config, Arc::new(SystemClock)));
        Self::from_config_with_gate(config, gate)
    }

    pub fn from_config_with_gate(
        config: LlmConfig,
        gate: Arc<CallGate>,
    ) -> Result<Self, InsightError> {
        if config.api_key.is_empty() {
            warn!("LLM_API_KEY is not set; provider calls will likely be rejected");
        }
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Box::new(transport), gate))
    }

    pub fn gate(&self) -> Arc<CallGate> {
        Arc::clone(&self.gate)
    }

    /// Message order: system instruction, then "Context: ..." as a second
    /// system line, then the user prompt.
    pub fn build_request(
        &self,
        prompt: &str,
        context: Option<&str>,
        system: Option<&str>,
        max_tokens: Option<u32>,
    ) -> ChatRequest {
        let mut messages = Vec::with_capacity(3);
        if let Some(s) = system.filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::system(s));
        }
        if let Some(c) = context.filter(|c| !c.is_empty()) {
            messages.push(ChatMessage::system(format!("Context: {}", c)));
        }
        messages.push(ChatMessage::user(prompt));

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: max_tokens.unwrap_or(self.config.max_tokens),
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        context: Option<&str>,
        system: Option<&str>,
        max_tokens: Option<u32>,
    ) -> Result<String, InsightError> {
        let request = self.build_request(prompt, context, system, max_tokens);
        debug!(
            "Chat request: model={} messages={}",
            request.model,
            request.messages.len()
        );

        let transport = self.transport.as_ref();
        let req = &request;
        let out = self.gate.run(move || transport.complete(req)).await;
        match &out {
            Ok(text) => info!("Provider returned {} chars", text.len()),
            Err(e) => warn!("Provider call failed: {}", e),
        }
        out
    }

    /// Like `generate`, but failures come back as a readable message.
    pub async fn generate_response(
        &self,
        prompt: &str,
        context: Option<&str>,
        system: Option<&str>,
        max_tokens: Option<u32>,
    ) -> String {
        match self.generate(prompt, context, system, max_tokens).await {
            Ok(text) => text,
            Err(e) => user_message(&e),
        }
    }

    pub async fn analyze_trading(&self, report: &MarketReport) -> String {
        let prompt = prompts::trading_prompt(report);
        self.generate_response(&prompt, None, Some(prompts::TRADING_SYSTEM), None)
            .await
    }

    pub async fn analyze_marketing(&self, kpis: &[CampaignKpis]) -> String {
        let prompt = prompts::marketing_prompt(kpis);
        self.generate_response(&prompt, None, Some(prompts::MARKETING_SYSTEM), None)
            .await
    }

    pub async fn trading_summary(&self, report: &MarketReport) -> String {
        let prompt = prompts::trading_summary_prompt(report);
        self.generate_response(&prompt, None, Some(prompts::EXECUTIVE_SYSTEM), None)
            .await
    }

    pub async fn marketing_summary(&self, report: &CampaignReport) -> String {
        let prompt = prompts::marketing_summary_prompt(report);
        self.generate_response(&prompt, None, Some(prompts::EXECUTIVE_SYSTEM), None)
            .await
    }

    /// Off-topic questions get a fixed refusal without touching the provider.
    pub async fn chat(&self, message: &str, language: Language) -> String {
        if !prompts::is_in_scope(message) {
            debug!("Chat message out of scope");
            return prompts::OUT_OF_SCOPE_REPLY.to_string();
        }
        let system = prompts::chat_system_prompt(language);
        self.generate_response(message, None, Some(&system), None)
            .await
    }

    pub async fn health_check(&self) -> bool {
        match self.transport.health().await {
            Ok(ok) => ok,
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }
}

pub fn user_message(err: &InsightError) -> String {
    match err {
        InsightError::RateLimited | InsightError::Exhausted { .. } => {
            "API rate limit exceeded. Please wait a moment and try again.".to_string()
        }
        InsightError::Timeout => "Request timeout. Please try again.".to_string(),
        InsightError::Http { .. } | InsightError::Network(_) => format!("API Error: {}", err),
        InsightError::Malformed(msg) => format!("Response parsing error: {}", msg),
    }
}

#[cfg(test)]
mod tests {
    use super::super::gate::testing::FakeClock;
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted results and records every request it sees.
    struct FakeTransport {
        script: Mutex<VecDeque<Result<String, InsightError>>>,
        seen: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl FakeTransport {
        fn new(script: Vec<Result<String, InsightError>>) -> (Self, Arc<Mutex<Vec<ChatRequest>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    script: Mutex::new(script.into()),
                    seen: seen.clone(),
                },
                seen,
            )
        }
    }

    #[async_trait]
    impl ChatTransport for FakeTransport {
        async fn complete(&self, request: &ChatRequest) -> Result<String, InsightError> {
            self.seen.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(InsightError::Malformed("script empty".into())))
        }

        async fn health(&self) -> Result<bool, InsightError> {
            Err(InsightError::Network("unreachable".into()))
        }
    }

    fn client(
        script: Vec<Result<String, InsightError>>,
    ) -> (InsightClient, Arc<FakeClock>, Arc<Mutex<Vec<ChatRequest>>>) {
        let clock = FakeClock::new();
        let (transport, seen) = FakeTransport::new(script);
        let gate = Arc::new(CallGate::new(&LlmConfig::default(), clock.clone()));
        let c = InsightClient::new(LlmConfig::default(), Box::new(transport), gate);
        (c, clock, seen)
    }

    #[test]
    fn message_order_is_system_context_user() {
        let (c, _, _) = client(vec![]);
        let req = c.build_request("What now?", Some("AAPL up 3%"), Some("Be brief"), Some(100));
        let roles: Vec<&str> = req.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "system", "user"]);
        assert_eq!(req.messages[1].content, "Context: AAPL up 3%");
        assert_eq!(req.max_tokens, 100);
    }

    #[test]
    fn request_without_extras_is_just_the_prompt() {
        let (c, _, _) = client(vec![]);
        let req = c.build_request("hi", None, None, None);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.max_tokens, LlmConfig::default().max_tokens);
        assert_eq!(req.model, LlmConfig::default().model);
    }

    #[test]
    fn extracts_first_choice() {
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "hello" } }]
        });
        assert_eq!(extract_content(&body), Ok("hello".to_string()));
        assert!(matches!(
            extract_content(&serde_json::json!({ "choices": [] })),
            Err(InsightError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn rate_limit_then_success() {
        let (c, clock, seen) = client(vec![
            Err(InsightError::RateLimited),
            Ok("insight".to_string()),
        ]);
        let out = c.generate_response("q", None, None, None).await;
        assert_eq!(out, "insight");
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(2)]);
    }

    #[tokio::test]
    async fn exhausted_rate_limit_becomes_message() {
        let (c, _, seen) = client(vec![
            Err(InsightError::RateLimited),
            Err(InsightError::RateLimited),
            Err(InsightError::RateLimited),
        ]);
        let out = c.generate_response("q", None, None, None).await;
        assert!(out.contains("rate limit exceeded"));
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn http_error_surfaces_immediately() {
        let (c, _, seen) = client(vec![Err(InsightError::Http {
            status: 401,
            body: "bad key".into(),
        })]);
        let out = c.generate_response("q", None, None, None).await;
        assert_eq!(out, "API Error: provider returned 401: bad key");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn timeout_message() {
        let (c, _, _) = client(vec![Err(InsightError::Timeout)]);
        let out = c.generate_response("q", None, None, None).await;
        assert_eq!(out, "Request timeout. Please try again.");
    }

    #[tokio::test]
    async fn out_of_scope_chat_skips_provider() {
        let (c, _, seen) = client(vec![Ok("should not be used".to_string())]);
        let out = c.chat("Tell me a joke about cats", Language::English).await;
        assert_eq!(out, prompts::OUT_OF_SCOPE_REPLY);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_scope_chat_sends_system_prompt() {
        let (c, _, seen) = client(vec![Ok("RSI measures momentum".to_string())]);
        let out = c.chat("Explain RSI in trading", Language::Arabic).await;
        assert_eq!(out, "RSI measures momentum");
        let req = seen.lock().unwrap()[0].clone();
        assert_eq!(req.messages[0].role, "system");
        assert!(req.messages[0].content.contains("Arabic"));
        assert_eq!(req.messages[1].content, "Explain RSI in trading");
    }

    #[test]
    fn from_config_uses_configured_model() {
        let cfg = LlmConfig {
            model: "test-model".to_string(),
            ..LlmConfig::default()
        };
        let c = InsightClient::from_config(cfg).unwrap();
        assert_eq!(c.build_request("hi", None, None, None).model, "test-model");
    }

    #[tokio::test]
    async fn clients_sharing_a_gate_are_spaced() {
        let (first, clock, _) = client(vec![Ok("one".to_string())]);
        let (transport, seen) = FakeTransport::new(vec![Ok("two".to_string())]);
        let second = InsightClient::new(LlmConfig::default(), Box::new(transport), first.gate());

        assert_eq!(first.generate_response("q", None, None, None).await, "one");
        clock.advance(Duration::from_millis(250));
        assert_eq!(second.generate_response("q", None, None, None).await, "two");

        assert_eq!(clock.sleeps(), vec![Duration::from_millis(750)]);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn health_check_swallows_errors() {
        let (c, _, _) = client(vec![]);
        assert!(!c.health_check().await);
    }
}
