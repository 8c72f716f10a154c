//! # Sheet Exam
//!
//! 从在线表格读取题库并运行限时考试的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 数据源层（Clients）
//! - `clients/` - 拼装查询语句，读取表格
//! - `SheetSource` - 数据源接口，`SheetClient` 是基于 HTTP 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 只处理单道题或单份结果
//! - `AnswerOptionSplitter` - 把选项单元格拆成选项列表
//! - `AnswerKeyResolver` - 把答案字母映射到选项 value
//! - `QuestionSetBuilder` - 原始记录 → 题目集（打乱、截取）
//! - `ScoreReporter` - 计分并生成报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 一次考试的状态机
//! - `ExamSession` - 当前页、作答、错误标记、计时
//! - `ExamFlowController` - 判定翻页请求是否被接受
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/quiz_app` - 应用生命周期，加载题目与统计成绩
//! - `orchestrator/exam_runner` - 终端输入循环
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{SheetClient, SheetSource};
pub use config::{Config, ExamConfig, SourceFilter};
pub use error::{AppError, AppResult};
pub use models::{AnswerOption, QuestionPage, RawRow};
pub use orchestrator::{prepare_exam, App};
pub use services::{AnswerKeyResolver, AnswerOptionSplitter, QuestionSetBuilder, ScoreReporter};
pub use workflow::{ExamEvent, ExamFlowController, ExamSession};
