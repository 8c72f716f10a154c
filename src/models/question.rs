use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 一个答案选项
///
/// `value` 是选项的身份（通常是单个字母），同一道题内唯一。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub text: String,
}

impl AnswerOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// 考试中的一页（一道题）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPage {
    /// 题号（C 列）
    pub id: String,
    pub title: String,
    pub topic: String,
    pub chapter: String,
    pub options: Vec<AnswerOption>,
    /// 正确答案的 value，顺序与答案键一致；为空表示无法判定
    pub correct_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_description: Option<String>,
}

impl QuestionPage {
    /// 是否有可判定的正确答案
    pub fn has_known_answer(&self) -> bool {
        !self.correct_values.is_empty()
    }

    /// 判断作答是否正确（与顺序无关的集合比较）
    pub fn is_answer_correct(&self, answer: &[String]) -> bool {
        if !self.has_known_answer() {
            return false;
        }
        let given: BTreeSet<&str> = answer.iter().map(String::as_str).collect();
        let expected: BTreeSet<&str> = self.correct_values.iter().map(String::as_str).collect();
        given == expected
    }

    /// 按 1 开始的序号查找选项
    pub fn option_at(&self, position: usize) -> Option<&AnswerOption> {
        position
            .checked_sub(1)
            .and_then(|idx| self.options.get(idx))
    }

    /// 按选项标签首字母查找（不区分大小写）
    pub fn option_by_letter(&self, letter: char) -> Option<&AnswerOption> {
        self.options.iter().find(|o| {
            o.value
                .trim()
                .chars()
                .next()
                .is_some_and(|c| c.to_lowercase().eq(letter.to_lowercase()))
        })
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}
