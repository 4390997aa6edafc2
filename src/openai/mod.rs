//! Completion orchestration against an OpenAI-compatible chat backend:
//! one client, two modes (single-shot and SSE streaming).

mod sse;
mod types;

use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;
use crate::error::{SolveError, classify_transport_error, extract_api_error};
use crate::utils::with_cancel;
use sse::{DONE_SENTINEL, SseDecoder};
use types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatStreamChunk,
};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const TEMPERATURE: f32 = 0.2;

/// One fully-built completion call; immutable after construction.
#[derive(Debug)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub stream: bool,
}

/// Terminal output of a successful completion. `paragraphs` holds a single
/// element in practice; `raw` keeps the upstream payload for diagnostics.
#[derive(Debug)]
pub struct CompletionResult {
    pub paragraphs: Vec<String>,
    pub raw: Value,
}

enum StreamEvent {
    Delta(String),
    Done,
    Failed(SolveError),
}

pub struct CompletionClient {
    http: Client,
    chat_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(config: &Config) -> Result<Self, SolveError> {
        // Only the connect phase is bounded here; non-streaming calls add a
        // total deadline per request, streams are cancelled, never timed out.
        let mut builder = Client::builder().connect_timeout(config.timeout());
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| SolveError::Param(format!("invalid proxy {proxy:?}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| SolveError::unknown("failed to build HTTP client", e.to_string()))?;
        Ok(Self {
            http,
            chat_url: chat_completions_url(&config.api_base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: config.timeout(),
        })
    }

    /// Single-shot completion. Success requires a 2xx status and a payload
    /// with non-empty message content; any other shape is `Unknown`.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionResult, SolveError> {
        let response = with_cancel(cancel, self.prepare(request).timeout(self.timeout).send())
            .await?
            .map_err(|e| classify_transport_error(&e))?;
        let status = response.status();
        let body = with_cancel(cancel, response.text())
            .await?
            .map_err(|e| classify_transport_error(&e))?;
        if !status.is_success() {
            return Err(completion_status_error(status, &body));
        }

        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            SolveError::unknown("unexpected completion payload", e.to_string())
        })?;
        let parsed: ChatCompletionResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            SolveError::unknown("unexpected completion payload", e.to_string())
        })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                SolveError::unknown("completion payload missing message content", raw.to_string())
            })?;
        Ok(CompletionResult {
            paragraphs: vec![content],
            raw,
        })
    }

    /// Streaming completion. `on_update` receives the cumulative text after
    /// every delta; the final result carries the full accumulation.
    pub async fn complete_streaming(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
        on_update: impl Fn(&str),
    ) -> Result<CompletionResult, SolveError> {
        let response = with_cancel(cancel, self.prepare(request).send())
            .await?
            .map_err(|e| classify_transport_error(&e))?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = with_cancel(cancel, response.text())
                .await?
                .unwrap_or_else(|e| format!("(failed to read body: {e})"));
            return Err(completion_status_error(status, &body));
        }

        let (tx, mut rx) = mpsc::channel(64);
        let pump = tokio::spawn(pump_sse(response, tx));

        let mut accumulated = String::new();
        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break Err(SolveError::Cancelled),
                event = rx.recv() => match event {
                    Some(StreamEvent::Delta(delta)) => {
                        accumulated.push_str(&delta);
                        on_update(&accumulated);
                    }
                    Some(StreamEvent::Failed(err)) => break Err(err),
                    // A closed channel means the stream ended without an
                    // explicit [DONE]; finalize with what we have.
                    Some(StreamEvent::Done) | None => break Ok(()),
                }
            }
        };
        pump.abort();
        outcome?;

        let raw = Value::String(accumulated.clone());
        Ok(CompletionResult {
            paragraphs: vec![accumulated],
            raw,
        })
    }

    fn prepare(&self, request: &CompletionRequest) -> reqwest::RequestBuilder {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: request.system_prompt.clone() },
                ChatMessage { role: "user", content: request.user_prompt.clone() },
            ],
            temperature: TEMPERATURE,
            stream: request.stream,
        };
        let mut builder = self
            .http
            .post(&self.chat_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body);
        if request.stream {
            builder = builder
                .header("Accept", "text/event-stream")
                .header("Cache-Control", "no-cache");
        }
        builder
    }
}

async fn pump_sse(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    let mut stream = response.bytes_stream();
    let mut decoder = SseDecoder::new();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                let _ = tx.send(StreamEvent::Failed(classify_transport_error(&e))).await;
                return;
            }
        };
        for payload in decoder.push(&chunk) {
            if payload == DONE_SENTINEL {
                let _ = tx.send(StreamEvent::Done).await;
                return;
            }
            let parsed: ChatStreamChunk = match serde_json::from_str(&payload) {
                Ok(parsed) => parsed,
                Err(_) => {
                    debug!(payload = %payload, "skipping malformed SSE frame");
                    continue;
                }
            };
            let delta = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.and_then(|d| d.content).or(choice.text));
            if let Some(delta) = delta.filter(|d| !d.is_empty()) {
                // A closed receiver means the caller went away; stop reading.
                if tx.send(StreamEvent::Delta(delta)).await.is_err() {
                    return;
                }
            }
        }
    }
    let _ = tx.send(StreamEvent::Done).await;
}

/// Normalize the configured base URL before appending the fixed path: one
/// trailing slash and a trailing `/v1` are tolerated without duplicating
/// path segments.
fn chat_completions_url(base_url: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{base}{CHAT_COMPLETIONS_PATH}")
}

fn completion_status_error(status: StatusCode, body: &str) -> SolveError {
    let message = match status.as_u16() {
        401 => "API key rejected (unauthorized)",
        429 => "rate limited by the completion backend",
        500 => "completion backend internal error",
        503 => "completion backend temporarily unavailable",
        _ => "completion request failed",
    };
    let api_message = extract_api_error(body);
    let detail = if api_message.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {} - {}", status.as_u16(), api_message)
    };
    SolveError::network(message, detail)
}
