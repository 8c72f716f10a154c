//! 成绩统计服务
//!
//! 考试结束后统计得分，生成按行的报告：
//! `题号<TAB>是否出错(0/1)<TAB>作答<TAB>日期(DD.MM.YYYY)`，未作答的题不写入报告。

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::services::report_writer::ClipboardSink;
use crate::workflow::exam_flow::ExamOutcome;

/// 得分汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub total: usize,
    pub correct_count: usize,
    pub skipped_count: usize,
    pub answered_count: usize,
    pub score_percent: u32,
}

impl ScoreSummary {
    /// 结束页显示的提示
    pub fn completion_message(&self) -> String {
        if self.correct_count == 0 {
            "Unfortunately, none of your answers is correct. Please try again.".to_string()
        } else if self.correct_count == self.total {
            "Congratulations! You answered all the questions correctly!".to_string()
        } else {
            format!(
                "You got {} out of {} correct answers.",
                self.correct_count, self.total
            )
        }
    }
}

/// 单题结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub answer: Vec<String>,
    pub is_answer_correct: bool,
    /// 考试中答错过或最终答案不正确
    pub was_mistake: bool,
}

impl QuestionResult {
    pub fn is_skipped(&self) -> bool {
        self.answer.is_empty()
    }
}

/// 统计结果
#[derive(Debug, Clone)]
pub struct ExamReport {
    pub summary: ScoreSummary,
    pub results: Vec<QuestionResult>,
}

impl ExamReport {
    /// 生成制表符分隔的报告文本
    pub fn to_tsv(&self, date: NaiveDate) -> String {
        let date = format_date(date);
        self.results
            .iter()
            .filter(|r| !r.is_skipped())
            .map(|r| {
                format!(
                    "{}\t{}\t{}\t{}",
                    r.question_id,
                    u8::from(r.was_mistake),
                    r.answer.join(","),
                    date
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 做错的题号
    pub fn mistaken_ids(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.was_mistake)
            .map(|r| r.question_id.as_str())
            .collect()
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// 成绩统计服务
#[derive(Debug, Default)]
pub struct ScoreReporter;

impl ScoreReporter {
    pub fn new() -> Self {
        Self
    }

    /// 统计成绩
    pub fn grade(&self, outcome: &ExamOutcome) -> ExamReport {
        let results: Vec<QuestionResult> = outcome
            .pages
            .iter()
            .enumerate()
            .map(|(idx, page)| {
                let answer = outcome.answers.get(idx).cloned().unwrap_or_default();
                let is_answer_correct = page.is_answer_correct(&answer);
                let flagged = outcome.mistakes.get(idx).copied().unwrap_or(false);
                QuestionResult {
                    question_id: page.id.clone(),
                    was_mistake: flagged || !is_answer_correct,
                    is_answer_correct,
                    answer,
                }
            })
            .collect();

        let total = results.len();
        let skipped_count = results.iter().filter(|r| r.is_skipped()).count();
        let correct_count = results
            .iter()
            .filter(|r| !r.is_skipped() && !r.was_mistake)
            .count();
        let score_percent = if total == 0 {
            0
        } else {
            (100.0 * correct_count as f64 / total as f64).round() as u32
        };

        ExamReport {
            summary: ScoreSummary {
                total,
                correct_count,
                skipped_count,
                answered_count: total - skipped_count,
                score_percent,
            },
            results,
        }
    }

    /// 输出报告并交给剪贴板，失败只记录警告
    pub fn publish(&self, report: &ExamReport, date: NaiveDate, sink: &dyn ClipboardSink) -> String {
        let text = report.to_tsv(date);
        info!("成绩报告:\n{}", text);

        match sink.write_text(&text) {
            Ok(()) => info!("✓ 成绩报告已复制"),
            Err(e) => warn!("⚠️ 成绩报告复制失败: {}", e),
        }

        text
    }
}
