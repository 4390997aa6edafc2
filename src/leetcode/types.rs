//! Wire types for the problem catalog GraphQL API, plus the prompt-facing
//! problem metadata derived from them.

use serde::Deserialize;

use crate::text::{html_to_text, normalize_text};

/// Cap applied to the rendered problem statement before it enters the prompt.
const MAX_CONTENT_CHARS: usize = 12_000;

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlEnvelope<T> {
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProblemsetData {
    pub problemset_question_list: Option<QuestionList>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionList {
    #[serde(default)]
    pub questions: Vec<QuestionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub title_slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub frontend_question_id: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionData {
    pub question: Option<Question>,
}

/// Full problem record as returned by the detail query. Everything except
/// the slug is optional; the catalogs are not equally complete.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub title_slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub translated_title: Option<String>,
    #[serde(default)]
    pub translated_content: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub example_testcases: Option<String>,
    #[serde(default)]
    pub similar_questions: Option<String>,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
    #[serde(default)]
    pub constraints: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicTag {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Metadata summarized into the user prompt. Every field is optional and
/// nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct ProblemMeta {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub slug: Option<String>,
    pub tags: Vec<String>,
    pub examples: Option<String>,
    pub constraints: Option<String>,
}

impl Question {
    /// Plain-text statement for the prompt: translated content preferred,
    /// example and constraint sections appended when present.
    pub fn problem_text(&self) -> String {
        let html = self
            .translated_content
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.content.as_deref())
            .unwrap_or("");
        let mut text = html_to_text(html, MAX_CONTENT_CHARS);
        if let Some(examples) = non_empty(self.example_testcases.as_deref()) {
            text.push_str("\n示例：\n");
            text.push_str(&examples);
        }
        if let Some(constraints) = non_empty(self.constraints.as_deref()) {
            text.push_str("\n约束：\n");
            text.push_str(&constraints);
        }
        text
    }

    pub fn meta(&self) -> ProblemMeta {
        ProblemMeta {
            title: self
                .translated_title
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| self.title.clone()),
            difficulty: self.difficulty.clone(),
            slug: Some(self.title_slug.clone()),
            tags: self.topic_tags.iter().map(|t| t.name.clone()).collect(),
            examples: non_empty(self.example_testcases.as_deref()),
            constraints: non_empty(self.constraints.as_deref()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(normalize_text).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question {
            title_slug: "two-sum".into(),
            title: Some("Two Sum".into()),
            content: Some("<p>Given an array of integers...</p>".into()),
            translated_title: Some("两数之和".into()),
            translated_content: Some("<p>给定一个整数数组</p>".into()),
            difficulty: Some("Easy".into()),
            example_testcases: Some("[2,7,11,15]\n9".into()),
            similar_questions: None,
            topic_tags: vec![TopicTag { name: "Array".into(), slug: Some("array".into()) }],
            constraints: None,
        }
    }

    #[test]
    fn translated_content_is_preferred() {
        let text = question().problem_text();
        assert!(text.starts_with("给定一个整数数组"));
        assert!(text.contains("示例：\n[2,7,11,15]"));
        assert!(!text.contains("约束："));
    }

    #[test]
    fn falls_back_to_original_content() {
        let q = Question {
            translated_content: None,
            ..question()
        };
        assert!(q.problem_text().starts_with("Given an array"));
    }

    #[test]
    fn meta_prefers_translated_title_and_collects_tags() {
        let meta = question().meta();
        assert_eq!(meta.title.as_deref(), Some("两数之和"));
        assert_eq!(meta.slug.as_deref(), Some("two-sum"));
        assert_eq!(meta.tags, vec!["Array".to_string()]);
        assert!(meta.constraints.is_none());
    }
}
