//! Prompt composition: a fixed coach persona plus a user prompt carrying the
//! problem text and a one-line metadata summary.

use crate::leetcode::ProblemMeta;

/// Coach persona with the mandatory three-section output contract.
pub const SYSTEM_PROMPT: &str = "你是一名资深 LeetCode 算法教练与竞赛工程师。\
输出必须严格包含三段固定标题，按顺序为：\n\
## 思路讲解\n\
## 标准 C++ 代码（可提交）\n\
## 代码讲解\n\
要求：使用中文讲解；C++17，必须包含 class Solution，禁止 main；\
思路讲解需给出关键观察、编号步骤、时间复杂度、空间复杂度、至少 2 个边界情况；\
代码讲解需说明关键变量/数据结构含义、按代码结构解释，并列出 1~3 个易错点；\
若题面不完整，合理假设后给出完整可提交解答，不要反问。";

const USER_PREFIX: &str = "请把下面内容当作 LeetCode 算法题进行解答，\
给出中文思路讲解、可提交的 C++17 代码（class Solution，无 main），以及代码讲解：\n";

const META_SEPARATOR: &str = "；";

/// Fixed instruction prefix, optional one-line metadata summary (non-empty
/// fields only), then the problem text verbatim.
pub fn build_user_prompt(problem_text: &str, meta: &ProblemMeta) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(title) = meta.title.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("标题: {title}"));
    }
    if let Some(difficulty) = meta.difficulty.as_deref().filter(|d| !d.is_empty()) {
        parts.push(format!("难度: {difficulty}"));
    }
    if let Some(slug) = meta.slug.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("slug: {slug}"));
    }
    if !meta.tags.is_empty() {
        parts.push(format!("标签: {}", meta.tags.join(", ")));
    }
    if let Some(examples) = meta.examples.as_deref().filter(|e| !e.is_empty()) {
        parts.push(format!("示例: {examples}"));
    }
    if let Some(constraints) = meta.constraints.as_deref().filter(|c| !c.is_empty()) {
        parts.push(format!("约束: {constraints}"));
    }

    let mut prompt = String::from(USER_PREFIX);
    if !parts.is_empty() {
        prompt.push_str(&format!("（题目信息：{}）\n", parts.join(META_SEPARATOR)));
    }
    prompt.push_str("题目文本：\n");
    prompt.push_str(problem_text);
    prompt
}
