//! 考试流程控制 - 流程层
//!
//! 一个小状态机，决定翻页请求是否被接受：
//!
//! ```text
//! AwaitingAnswer(p) --Advance(答对 / 非严格)--> Advancing{p, p+1} --> AwaitingAnswer(p+1)
//! AwaitingAnswer(p) --Advance(严格且答错)------> Blocked(p)
//! Blocked(p)        --Toggle-------------------> AwaitingAnswer(p)
//! 任意状态          --Stop / TimeExpired-------> Completed
//! ```
//!
//! 渲染层把事件交给 `dispatch`，根据返回的 `Decision` 决定是否真的翻页。

use tracing::{debug, info, warn};

use crate::config::ExamConfig;
use crate::models::question::QuestionPage;
use crate::workflow::exam_session::ExamSession;

/// 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamState {
    AwaitingAnswer(usize),
    /// 翻页已被接受，等待页面切换完成
    Advancing { from: usize, to: usize },
    /// 严格模式下答错，停留在该页
    Blocked(usize),
    Completed,
}

/// 用户或计时器产生的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamEvent {
    /// 选中/取消某个选项
    Toggle(String),
    /// 下一页（最后一页时交卷）
    Advance,
    Back,
    /// 结束考试
    Stop,
    /// 总时长用完
    TimeExpired,
    /// 填写"说明理由"
    Explain(String),
}

/// 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// 严格模式下答案不正确
    IncorrectAnswer { page: usize },
    UnknownOption,
    AtFirstPage,
    StopDisabled,
    AlreadyCompleted,
}

/// 对事件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected(Rejection),
    /// 本次事件使考试结束
    Completed,
}

/// 考试结束后交给成绩统计的数据
#[derive(Debug, Clone)]
pub struct ExamOutcome {
    pub pages: Vec<QuestionPage>,
    /// 每题最终作答，未作答为空
    pub answers: Vec<Vec<String>>,
    /// 考试过程中留下的错误标记
    pub mistakes: Vec<bool>,
}

/// 考试流程控制器
#[derive(Debug)]
pub struct ExamFlowController {
    session: ExamSession,
    state: ExamState,
    strict: bool,
    allow_stop: bool,
}

impl ExamFlowController {
    pub fn new(session: ExamSession, config: &ExamConfig) -> Self {
        // 没有题目时直接结束
        let state = if session.page_count() == 0 {
            ExamState::Completed
        } else {
            ExamState::AwaitingAnswer(0)
        };

        Self {
            session,
            state,
            strict: config.prevent_page_change_on_incorrect,
            allow_stop: config.allow_stop,
        }
    }

    pub fn state(&self) -> ExamState {
        self.state
    }

    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    pub fn is_completed(&self) -> bool {
        self.state == ExamState::Completed
    }

    /// 当前显示的页（翻页过程中返回目标页）
    pub fn current_page(&self) -> usize {
        match self.state {
            ExamState::Advancing { to, .. } => to,
            _ => self.session.current_index(),
        }
    }

    /// 页面切换完成
    pub fn page_shown(&mut self) {
        if let ExamState::Advancing { to, .. } = self.state {
            self.session.set_current(to);
            self.state = ExamState::AwaitingAnswer(to);
        }
    }

    pub fn dispatch(&mut self, event: ExamEvent) -> Decision {
        self.page_shown();

        if self.is_completed() {
            debug!("考试已结束，忽略事件 {:?}", event);
            return Decision::Rejected(Rejection::AlreadyCompleted);
        }

        match event {
            ExamEvent::Toggle(value) => self.toggle(&value),
            ExamEvent::Explain(text) => {
                self.session.set_reasoning(self.session.current_index(), text);
                Decision::Accepted
            }
            ExamEvent::Advance => self.advance(),
            ExamEvent::Back => self.back(),
            ExamEvent::Stop => self.stop(),
            ExamEvent::TimeExpired => {
                info!("⏰ 考试时间到，自动交卷");
                self.complete()
            }
        }
    }

    /// 结束后取出成绩数据，控制器被消耗，保证只统计一次
    pub fn into_outcome(self) -> Result<ExamOutcome, Self> {
        if !self.is_completed() {
            return Err(self);
        }
        let (pages, answers, mistakes) = self.session.into_parts();
        Ok(ExamOutcome {
            pages,
            answers,
            mistakes,
        })
    }

    fn toggle(&mut self, value: &str) -> Decision {
        let page = self.session.current_index();
        let known = self
            .session
            .current_page()
            .is_some_and(|p| p.has_option(value));
        if !known {
            return Decision::Rejected(Rejection::UnknownOption);
        }

        self.session.toggle(page, value);
        if self.state == ExamState::Blocked(page) {
            self.state = ExamState::AwaitingAnswer(page);
        }
        Decision::Accepted
    }

    fn advance(&mut self) -> Decision {
        let page = self.session.current_index();

        if self.strict {
            if let Some(rejection) = self.check_current(page) {
                return Decision::Rejected(rejection);
            }
        }

        if self.session.is_last_page() {
            return self.complete();
        }

        self.state = ExamState::Advancing {
            from: page,
            to: page + 1,
        };
        Decision::Accepted
    }

    /// 严格模式检查当前页，答错时标记并阻止翻页
    fn check_current(&mut self, page: usize) -> Option<Rejection> {
        let current = self.session.current_page()?;

        // 正确答案无法判定的题目不阻塞
        if !current.has_known_answer() {
            warn!("[题目 {}] 没有可判定的正确答案，直接放行", current.id);
            return None;
        }

        if current.is_answer_correct(self.session.answer(page)) {
            self.session.set_reasoning_visible(page, false);
            return None;
        }

        info!("[题目 {}] ✗ 答案不正确，停留在本页", current.id);
        self.session.mark_mistake(page);
        self.session.set_reasoning_visible(page, true);
        self.state = ExamState::Blocked(page);
        Some(Rejection::IncorrectAnswer { page })
    }

    fn back(&mut self) -> Decision {
        let page = self.session.current_index();
        if page == 0 {
            return Decision::Rejected(Rejection::AtFirstPage);
        }
        self.session.set_current(page - 1);
        self.state = ExamState::AwaitingAnswer(page - 1);
        Decision::Accepted
    }

    fn stop(&mut self) -> Decision {
        if !self.allow_stop {
            return Decision::Rejected(Rejection::StopDisabled);
        }
        info!("🛑 提前结束考试");
        // 放开当前页待填写的理由
        self.session
            .set_reasoning_visible(self.session.current_index(), false);
        self.complete()
    }

    fn complete(&mut self) -> Decision {
        self.state = ExamState::Completed;
        Decision::Completed
    }
}
