//! 考试应用 - 编排层
//!
//! ## 职责
//!
//! 1. **初始化**：读取配置、创建表格客户端
//! 2. **设置步骤**：显示章节目录，读取设置文件并应用到考试配置
//! 3. **加载题目**：拉取记录并构建题目集
//! 4. **运行考试**：交给终端运行器驱动状态机
//! 5. **统计成绩**：生成报告并写入结果文件
//!
//! 加载失败时只记录错误，不进入考试。

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use tracing::{error, info, warn};

use crate::clients::{self, SheetClient, SheetSource};
use crate::config::{Config, ExamConfig};
use crate::error::{AppError, AppResult};
use crate::models::load_setup_file;
use crate::orchestrator::exam_runner;
use crate::services::{
    ClipboardSink, ExamReport, QuestionSet, QuestionSetBuilder, ReportFileWriter, ScoreReporter,
    SurveyDefinition,
};
use crate::utils::logging::{log_chapters, log_questions_loaded, log_startup, print_final_stats};
use crate::workflow::{ExamFlowController, ExamOutcome, ExamSession};

/// 准备好的考试：冻结后的配置和题目集
#[derive(Debug, Clone)]
pub struct PreparedExam {
    pub config: ExamConfig,
    pub questions: QuestionSet,
}

impl PreparedExam {
    /// 创建会话并交给状态机
    pub fn start(self) -> ExamFlowController {
        let session = ExamSession::new(self.questions.pages, self.questions.time_budget);
        ExamFlowController::new(session, &self.config)
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    client: SheetClient,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = SheetClient::new(&config)?;

        Ok(Self { config, client })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let prepared = match prepare_exam(&self.client, &self.config, &ExamConfig::default()).await
        {
            Ok(prepared) => prepared,
            Err(AppError::Validation(e)) => {
                error!("❌ 考试设置无效，请修改 {} 后重新开始: {}", self.config.setup_file, e);
                return Ok(());
            }
            Err(e) => {
                error!("❌ 题目加载失败，无法开始考试: {}", e);
                return Ok(());
            }
        };

        if prepared.questions.is_empty() {
            warn!("⚠️ 没有可用的题目，程序结束");
            return Ok(());
        }

        if let Some(path) = &self.config.survey_json_file {
            write_survey_definition(path, &self.config.exam_title, &prepared.questions).await?;
        }

        let use_hotkeys = prepared.config.use_hotkeys;
        let controller = exam_runner::run_in_terminal(prepared.start(), use_hotkeys).await?;

        let outcome = match controller.into_outcome() {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("⚠️ 输入已结束，考试没有完成，不生成报告");
                return Ok(());
            }
        };

        let sink = ReportFileWriter::with_path(self.config.result_file.clone());
        let report = finish_exam(&outcome, &sink);
        print_final_stats(&report.summary, sink.path());

        Ok(())
    }
}

/// 设置步骤 + 加载题目
///
/// 设置文件校验失败或拉取题目失败时返回错误，不进入考试。
pub async fn prepare_exam<S: SheetSource>(
    source: &S,
    config: &Config,
    base: &ExamConfig,
) -> AppResult<PreparedExam> {
    let mut exam = base.clone();

    if exam.initialization {
        match clients::fetch_chapters(source, &exam).await {
            Ok(chapters) => log_chapters(&chapters),
            Err(e) => warn!("⚠️ 章节目录加载失败: {}", e),
        }

        if let Some(setup) = load_setup_file(Path::new(&config.setup_file)).await? {
            exam = exam.apply_setup(&setup)?;
            info!("✓ 已应用考试设置: {}", config.setup_file);
        }
    }

    let rows = clients::fetch_rows(source, &exam).await?;
    let questions = QuestionSetBuilder::new(&exam).build(rows);
    log_questions_loaded(questions.len(), questions.rejected.len(), &exam);

    Ok(PreparedExam {
        config: exam,
        questions,
    })
}

/// 统计成绩并发布报告
pub fn finish_exam(outcome: &ExamOutcome, sink: &dyn ClipboardSink) -> ExamReport {
    let reporter = ScoreReporter::new();
    let report = reporter.grade(outcome);
    reporter.publish(&report, Local::now().date_naive(), sink);
    info!("🏁 {}", report.summary.completion_message());
    report
}

async fn write_survey_definition(path: &str, title: &str, questions: &QuestionSet) -> AppResult<()> {
    let json = SurveyDefinition::from_question_set(title, questions).to_json()?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| AppError::io_failed(path, e))?;
    info!("✓ 问卷定义已写入: {}", path);
    Ok(())
}
