//! Problem catalog access over GraphQL: keyword search, numeric ID
//! resolution with endpoint fallback, and the problem detail fetch.

mod types;

pub use types::{ProblemMeta, Question, QuestionSummary, TopicTag};

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;
use crate::error::{SolveError, classify_transport_error};
use crate::text::contains_han;
use crate::utils::with_cancel;
use types::{GraphqlEnvelope, ProblemsetData, QuestionData};

const USER_AGENT: &str = concat!("leetcoach/", env!("CARGO_PKG_VERSION"));

const SEARCH_QUERY: &str = "query problemsetQuestionList($search: String!, $limit: Int!) {\n  problemsetQuestionList(searchKeyword: $search, limit: $limit) {\n    questions {\n      titleSlug\n      title\n      frontendQuestionId\n      difficulty\n    }\n  }\n}";

const DETAIL_QUERY: &str = "query questionData($titleSlug: String!) {\n  question(titleSlug: $titleSlug) {\n    title\n    titleSlug\n    content\n    translatedTitle\n    translatedContent\n    difficulty\n    exampleTestcases\n    similarQuestions\n    topicTags { name slug }\n    constraints\n  }\n}";

/// A slug plus the endpoint that produced it. Detail fetches must stay on
/// that endpoint; the two catalogs do not mirror each other.
#[derive(Debug, Clone)]
pub struct ResolvedProblem {
    pub slug: String,
    pub endpoint: String,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub endpoint: String,
    pub questions: Vec<QuestionSummary>,
}

#[derive(Debug)]
pub struct FetchedProblem {
    pub endpoint: String,
    pub question: Question,
}

pub struct LeetCodeClient {
    http: Client,
    international: String,
    regional: String,
    timeout: Duration,
}

impl LeetCodeClient {
    pub fn new(config: &Config) -> Result<Self, SolveError> {
        let mut builder = Client::builder();
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
            international: config.leetcode_url.clone(),
            regional: config.leetcode_cn_url.clone(),
            timeout: config.timeout(),
        })
    }

    /// Keyword search on the endpoint picked by the Han heuristic. The
    /// caller decides what to do with multiple candidates.
    pub async fn search_problems(
        &self,
        keyword: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, SolveError> {
        let endpoint = self.pick_endpoint(keyword).to_string();
        let data: Option<ProblemsetData> = self
            .graphql(&endpoint, SEARCH_QUERY, json!({ "search": keyword, "limit": limit }), cancel)
            .await?;
        Ok(SearchOutcome {
            endpoint,
            questions: question_list(data),
        })
    }

    /// Resolve a numeric problem ID to a slug. The international endpoint is
    /// queried first; when it fails or comes back empty, the identical query
    /// is retried against the regional endpoint before declaring `NotFound`.
    pub async fn resolve_by_id(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ResolvedProblem, SolveError> {
        let variables = json!({ "search": id, "limit": 1 });
        match self.id_lookup(&self.international, variables.clone(), cancel).await {
            Ok(Some(first)) => {
                return Ok(ResolvedProblem {
                    slug: first.title_slug,
                    endpoint: self.international.clone(),
                });
            }
            Err(SolveError::Cancelled) => return Err(SolveError::Cancelled),
            Ok(None) => {
                debug!("primary catalog has no match, retrying regional endpoint");
            }
            Err(err) => {
                debug!(error = %err, "primary catalog lookup failed, retrying regional endpoint");
            }
        }
        let first = self
            .id_lookup(&self.regional, variables, cancel)
            .await?
            .ok_or_else(|| SolveError::NotFound(format!("no problem found for id {id}")))?;
        Ok(ResolvedProblem {
            slug: first.title_slug,
            endpoint: self.regional.clone(),
        })
    }

    async fn id_lookup(
        &self,
        endpoint: &str,
        variables: Value,
        cancel: &CancellationToken,
    ) -> Result<Option<QuestionSummary>, SolveError> {
        let data: Option<ProblemsetData> =
            self.graphql(endpoint, SEARCH_QUERY, variables, cancel).await?;
        Ok(question_list(data).into_iter().next())
    }

    /// Fetch the full problem record for a slug. An explicit endpoint (from
    /// a prior resolution) wins over the Han heuristic. A well-formed reply
    /// without a question object is `NotFound`, not a transport failure.
    pub async fn fetch_details(
        &self,
        slug: &str,
        endpoint_override: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<FetchedProblem, SolveError> {
        let endpoint = endpoint_override
            .unwrap_or_else(|| self.pick_endpoint(slug))
            .to_string();
        let data: Option<QuestionData> = self
            .graphql(&endpoint, DETAIL_QUERY, json!({ "titleSlug": slug }), cancel)
            .await?;
        let question = data
            .and_then(|d| d.question)
            .ok_or_else(|| SolveError::NotFound(format!("no problem found for slug {slug:?}")))?;
        Ok(FetchedProblem { endpoint, question })
    }

    fn pick_endpoint(&self, text: &str) -> &str {
        if contains_han(text) { &self.regional } else { &self.international }
    }

    async fn graphql<T>(
        &self,
        endpoint: &str,
        query: &str,
        variables: Value,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, SolveError>
    where
        T: DeserializeOwned,
    {
        let referer = if endpoint.contains("leetcode.cn") {
            "https://leetcode.cn"
        } else {
            "https://leetcode.com"
        };
        let request = self
            .http
            .post(endpoint)
            .header("Referer", referer)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .json(&json!({ "query": query, "variables": variables }))
            .send();
        let response = with_cancel(cancel, request)
            .await?
            .map_err(|e| classify_transport_error(&e))?;
        let status = response.status();
        debug!(%endpoint, status = status.as_u16(), "problem catalog response");
        let body = with_cancel(cancel, response.text())
            .await?
            .map_err(|e| classify_transport_error(&e))?;
        if !status.is_success() {
            return Err(SolveError::network(
                "problem catalog request failed",
                format!("status: {}, body: {}", status.as_u16(), preview(&body)),
            ));
        }
        let envelope: GraphqlEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            SolveError::unknown("malformed problem catalog response", e.to_string())
        })?;
        Ok(envelope.data)
    }
}

fn question_list(data: Option<ProblemsetData>) -> Vec<QuestionSummary> {
    data.and_then(|d| d.problemset_question_list)
        .map(|l| l.questions)
        .unwrap_or_default()
}

fn preview(body: &str) -> String {
    if body.chars().count() > 500 {
        let mut cut: String = body.chars().take(500).collect();
        cut.push_str("...");
        cut
    } else {
        body.to_string()
    }
}
