// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The LLM Router (C10): routes a chat request to the provider configured
//! for its [`TaskType`], retries retryable failures with backoff, and
//! falls back to a single local attempt once retries are exhausted.
//! Grounded on `original_source/tests/unit/test_llm_router.py` (provider-
//! per-task-type routing, Ollama-as-local-fallback, rate-limit retry) and,
//! for the provider trait shape, on `querymt-querymt`'s
//! `crates/querymt/src/chat::ChatProvider`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// Which routing bucket a chat request falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    Planning,
    Structuring,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub tokens_used: u64,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tokens_used: 0,
        }
    }
}

/// A normalized chat error. `retryable` drives the router's retry loop;
/// `InvalidRequest`/`AuthFailure` surface immediately.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("auth failure: {0}")]
    AuthFailure(String),

    #[error("provider error: {0}")]
    Other(String),
}

impl LlmError {
    fn is_retryable(&self) -> bool {
        matches!(self, LlmError::RateLimited(_) | LlmError::Timeout(_))
    }
}

/// A chat backend. Concrete HTTP wiring per provider is out of scope;
/// `kira-cli` ships a `FakeLlmProvider` for demo wiring.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(
        &self,
        messages: &[Message],
        opts: &ChatOptions,
    ) -> Result<LlmResponse, LlmError>;
}

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub planning_provider: String,
    pub structuring_provider: String,
    pub default_provider: String,
    pub enable_local_fallback: bool,
    pub local_fallback_provider: Option<String>,
    pub max_retries: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            planning_provider: "default".to_string(),
            structuring_provider: "default".to_string(),
            default_provider: "default".to_string(),
            enable_local_fallback: false,
            local_fallback_provider: None,
            max_retries: 3,
        }
    }
}

/// Routes chat requests to one of several named providers by [`TaskType`],
/// with retry-with-backoff on retryable errors and an optional single-shot
/// local fallback once retries are exhausted.
pub struct LlmRouter {
    config: RouterConfig,
    providers: HashMap<String, Arc<dyn LlmProvider>>,
}

impl LlmRouter {
    pub fn new(config: RouterConfig, providers: HashMap<String, Arc<dyn LlmProvider>>) -> Self {
        Self { config, providers }
    }

    fn provider_for(&self, task_type: TaskType) -> &str {
        match task_type {
            TaskType::Planning => &self.config.planning_provider,
            TaskType::Structuring => &self.config.structuring_provider,
            TaskType::Default => &self.config.default_provider,
        }
    }

    /// Routes `messages` by `task_type`, retrying retryable errors up to
    /// `max_retries` times with exponential backoff + jitter, then issuing
    /// one attempt against the local fallback provider if configured.
    pub async fn chat(
        &self,
        messages: &[Message],
        task_type: TaskType,
        opts: &ChatOptions,
    ) -> Result<LlmResponse, LlmError> {
        let provider_name = self.provider_for(task_type);
        let provider = self.providers.get(provider_name).ok_or_else(|| {
            LlmError::Other(format!("no provider configured for `{provider_name}`"))
        })?;

        let mut attempt = 0u32;
        let mut last_err;
        loop {
            match provider.chat(messages, opts).await {
                Ok(response) => return Ok(response),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    last_err = err;
                    attempt += 1;
                    if attempt > self.config.max_retries {
                        break;
                    }
                    tokio::time::sleep(backoff_delay(attempt)).await;
                }
            }
        }

        if self.config.enable_local_fallback {
            if let Some(fallback_name) = &self.config.local_fallback_provider {
                if let Some(fallback) = self.providers.get(fallback_name) {
                    return fallback.chat(messages, opts).await;
                }
            }
        }

        Err(last_err)
    }
}

/// Exponential backoff with jitter: `100ms * 2^(attempt-1)`, plus up to
/// 50ms of jitter so concurrent retries don't synchronize.
fn backoff_delay(attempt: u32) -> Duration {
    let base_ms = 100u64.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let jitter_ms = rand::rng().random_range(0..50);
    Duration::from_millis(base_ms + jitter_ms)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
