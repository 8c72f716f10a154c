//! 考试设置步骤的输入
//!
//! 对应设置表单中的各项，从 TOML 文件读取。没有填写的项沿用默认配置。

use serde::{Deserialize, Serialize};

use crate::config::{
    SourceFilter, MAX_QUESTION_COUNT, MAX_TIME_PER_QUESTION_SECS, MIN_QUESTION_COUNT,
};
use crate::error::ValidationError;

/// 章节选择中表示"全部"的值
pub const ALL_CHAPTERS: &str = "none";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSetup {
    /// 打乱题目
    pub shuffle: Option<bool>,
    /// 打乱选项
    pub shuffle_answers: Option<bool>,
    /// 考试模式（关闭严格模式）
    pub test_mode: Option<bool>,
    pub question_count: Option<usize>,
    /// 章节，"none" 表示全部
    pub chapter: Option<String>,
    /// 手写过滤条件，例如 "C = 'C2Q23'"
    pub explicit_filter: Option<String>,
    pub allow_stop: Option<bool>,
    pub time_per_question_secs: Option<u64>,
}

impl ExamSetup {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(count) = self.question_count {
            if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&count) {
                return Err(ValidationError::QuestionCountOutOfRange {
                    value: count,
                    min: MIN_QUESTION_COUNT,
                    max: MAX_QUESTION_COUNT,
                });
            }
        }
        match self.time_per_question_secs {
            Some(0) => return Err(ValidationError::TimePerQuestionZero),
            Some(secs) if secs > MAX_TIME_PER_QUESTION_SECS => {
                return Err(ValidationError::TimePerQuestionOutOfRange {
                    value: secs,
                    max: MAX_TIME_PER_QUESTION_SECS,
                });
            }
            _ => {}
        }
        Ok(())
    }

    /// 章节优先，其次是手写过滤条件
    pub fn source_filter(&self) -> SourceFilter {
        let chapter = self
            .chapter
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CHAPTERS);
        if let Some(chapter) = chapter {
            return SourceFilter::Chapter(chapter.to_string());
        }

        match self.explicit_filter.as_deref().map(str::trim) {
            Some(filter) if !filter.is_empty() => SourceFilter::Explicit(filter.to_string()),
            _ => SourceFilter::All,
        }
    }
}
