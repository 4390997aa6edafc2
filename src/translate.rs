//! The translate orchestration: classify the input, resolve and fetch the
//! problem when needed, build the prompts, run the completion.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;
use crate::error::{ErrorRecord, SolveError};
use crate::input::{InputKind, classify};
use crate::leetcode::{FetchedProblem, LeetCodeClient, ProblemMeta};
use crate::openai::{CompletionClient, CompletionRequest, CompletionResult};
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::text::normalize_text;

/// Callback receiving the cumulative partial answer after each delta. Each
/// invocation supersedes the previous one.
pub type StreamHandler = Box<dyn Fn(&str) + Send + Sync>;

/// One translate invocation. Nothing in here outlives the call.
pub struct TranslateQuery {
    pub text: String,
    pub cancel: CancellationToken,
    pub on_stream: Option<StreamHandler>,
}

pub struct Translator {
    config: Config,
    leetcode: LeetCodeClient,
    completion: CompletionClient,
}

impl Translator {
    pub fn new(config: Config) -> Result<Self, SolveError> {
        let leetcode = LeetCodeClient::new(&config)?;
        let completion = CompletionClient::new(&config)?;
        Ok(Self {
            config,
            leetcode,
            completion,
        })
    }

    pub async fn translate(&self, query: TranslateQuery) -> Result<CompletionResult, SolveError> {
        if self.config.api_key.trim().is_empty() {
            return Err(SolveError::SecretKey(
                "no API key configured; set OPENAI_API_KEY".into(),
            ));
        }

        let input = classify(&query.text);
        debug!(kind = ?input.kind, "classified input");

        let (problem_text, meta) = match input.kind {
            InputKind::Empty => {
                return Err(SolveError::Param("no content detected in the input".into()));
            }
            InputKind::Statement => (input.value, ProblemMeta::default()),
            // With remote fetch disabled every non-empty input is treated as
            // a literal statement.
            _ if !self.config.fetch_problems => {
                (normalize_text(&query.text), ProblemMeta::default())
            }
            InputKind::Slug => self.fetch(&input.value, None, &query.cancel).await?,
            InputKind::Id => {
                let resolved = self.leetcode.resolve_by_id(&input.value, &query.cancel).await?;
                self.fetch(&resolved.slug, Some(&resolved.endpoint), &query.cancel)
                    .await?
            }
            InputKind::Keyword => {
                let outcome = self
                    .leetcode
                    .search_problems(&input.value, self.config.max_candidates, &query.cancel)
                    .await?;
                // First candidate wins even when several match; ranking is
                // deliberately out of scope.
                let Some(candidate) = outcome.questions.first() else {
                    return Err(SolveError::NotFound(format!(
                        "no problem matched keyword {:?}",
                        input.value
                    )));
                };
                self.fetch(&candidate.title_slug, Some(&outcome.endpoint), &query.cancel)
                    .await?
            }
        };

        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(&problem_text, &meta),
            // Streaming only when the caller can actually consume it.
            stream: self.config.stream && query.on_stream.is_some(),
        };

        match (&query.on_stream, request.stream) {
            (Some(on_stream), true) => {
                self.completion
                    .complete_streaming(&request, &query.cancel, |partial| on_stream(partial))
                    .await
            }
            _ => self.completion.complete(&request, &query.cancel).await,
        }
    }

    async fn fetch(
        &self,
        slug: &str,
        endpoint: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(String, ProblemMeta), SolveError> {
        let FetchedProblem { question, .. } =
            self.leetcode.fetch_details(slug, endpoint, cancel).await?;
        Ok((question.problem_text(), question.meta()))
    }
}

/// Boundary adapter for hosts that deliver results through a completion
/// callback. A cancelled request never reaches the callback.
pub async fn translate_with_callback(
    translator: &Translator,
    query: TranslateQuery,
    on_completion: impl FnOnce(Result<CompletionResult, ErrorRecord>),
) {
    match translator.translate(query).await {
        Ok(result) => on_completion(Ok(result)),
        Err(SolveError::Cancelled) => {
            debug!("translate cancelled, completion callback skipped");
        }
        Err(err) => on_completion(Err(err.to_record())),
    }
}
