//! 考试会话
//!
//! 保存一次考试的运行状态：当前页、每题的作答、错误标记和计时。
//! 只由 `ExamFlowController` 持有和修改。

use std::time::{Duration, Instant};

use crate::models::question::QuestionPage;

#[derive(Debug)]
pub struct ExamSession {
    pages: Vec<QuestionPage>,
    current: usize,
    /// 每题已选的 value，按选择顺序
    answers: Vec<Vec<String>>,
    /// 严格模式下答错过（一旦置位不再清除）
    mistakes: Vec<bool>,
    reasoning_visible: Vec<bool>,
    reasoning: Vec<Option<String>>,
    started_at: Instant,
    time_budget: Duration,
}

impl ExamSession {
    pub fn new(pages: Vec<QuestionPage>, time_budget: Duration) -> Self {
        let n = pages.len();
        Self {
            pages,
            current: 0,
            answers: vec![Vec::new(); n],
            mistakes: vec![false; n],
            reasoning_visible: vec![false; n],
            reasoning: vec![None; n],
            started_at: Instant::now(),
            time_budget,
        }
    }

    pub fn pages(&self) -> &[QuestionPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> Option<&QuestionPage> {
        self.pages.get(self.current)
    }

    pub fn is_last_page(&self) -> bool {
        self.current + 1 >= self.pages.len()
    }

    pub fn answer(&self, page: usize) -> &[String] {
        self.answers.get(page).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn was_mistake(&self, page: usize) -> bool {
        self.mistakes.get(page).copied().unwrap_or(false)
    }

    pub fn is_reasoning_visible(&self, page: usize) -> bool {
        self.reasoning_visible.get(page).copied().unwrap_or(false)
    }

    pub fn reasoning(&self, page: usize) -> Option<&str> {
        self.reasoning.get(page).and_then(|r| r.as_deref())
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.time_budget.saturating_sub(self.elapsed())
    }

    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }

    // ========== 仅供流程控制器调用 ==========

    pub(crate) fn set_current(&mut self, page: usize) {
        self.current = page;
    }

    /// 切换选项：已选则取消，未选则追加
    pub(crate) fn toggle(&mut self, page: usize, value: &str) {
        let Some(answer) = self.answers.get_mut(page) else {
            return;
        };
        if let Some(pos) = answer.iter().position(|v| v == value) {
            answer.remove(pos);
        } else {
            answer.push(value.to_string());
        }
    }

    pub(crate) fn mark_mistake(&mut self, page: usize) {
        if let Some(flag) = self.mistakes.get_mut(page) {
            *flag = true;
        }
    }

    pub(crate) fn set_reasoning_visible(&mut self, page: usize, visible: bool) {
        if let Some(flag) = self.reasoning_visible.get_mut(page) {
            *flag = visible;
        }
    }

    pub(crate) fn set_reasoning(&mut self, page: usize, text: String) {
        if let Some(slot) = self.reasoning.get_mut(page) {
            *slot = Some(text);
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<QuestionPage>, Vec<Vec<String>>, Vec<bool>) {
        (self.pages, self.answers, self.mistakes)
    }
}
