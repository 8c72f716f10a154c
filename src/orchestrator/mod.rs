//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `quiz_app` - 考试应用
//! - 管理应用生命周期（初始化、运行）
//! - 设置步骤、加载题目、构建题目集
//! - 考试结束后统计成绩并写报告
//!
//! ### `exam_runner` - 终端运行器
//! - 读取标准输入，转换成事件
//! - 计时器到时自动交卷
//!
//! ## 层次关系
//!
//! ```text
//! quiz_app (加载 + 统计)
//!     ↓
//! exam_runner (输入 → 事件)
//!     ↓
//! workflow::ExamFlowController (翻页判定)
//!     ↓
//! services (拆分选项 / 解析答案 / 计分)
//!     ↓
//! clients (表格数据源)
//! ```

pub mod exam_runner;
pub mod quiz_app;

// 重新导出主要类型
pub use exam_runner::run_in_terminal;
pub use quiz_app::{finish_exam, prepare_exam, App, PreparedExam};
