/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ExamConfig, SourceFilter};
use crate::models::ChapterSummary;
use crate::services::ScoreSummary;

/// 初始化日志
///
/// 默认级别为 info，可以通过 `RUST_LOG` 覆盖。重复调用不会报错。
pub fn init() {
    init_level("info");
}

/// 按配置初始化日志，`verbose_logging` 时默认级别为 debug
pub fn init_with(config: &Config) {
    init_level(if config.verbose_logging { "debug" } else { "info" });
}

fn init_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", config.exam_title);
    info!("📄 题库: {}", config.sheet_url);
    info!("{}", "=".repeat(60));
}

/// 记录章节目录
pub fn log_chapters(chapters: &[ChapterSummary]) {
    info!("📚 共 {} 个章节", chapters.len());
    for chapter in chapters {
        info!(
            "   {} / {} ({} 题)",
            chapter.topic, chapter.chapter, chapter.question_count
        );
    }
}

/// 记录题目加载信息
pub fn log_questions_loaded(total: usize, rejected: usize, config: &ExamConfig) {
    let source = match &config.source_filter {
        SourceFilter::All => "全部".to_string(),
        SourceFilter::Chapter(chapter) => format!("章节 {}", chapter),
        SourceFilter::Explicit(filter) => format!("条件 {}", truncate_text(filter, 40)),
    };
    info!("✓ 共 {} 道题目（来源: {}）", total, source);
    if rejected > 0 {
        info!("⚠️ {} 道题目的选项无法解析，已跳过", rejected);
    }
    info!(
        "⏱️ 每题 {} 秒, 严格模式: {}",
        config.time_per_question.as_secs(),
        if config.prevent_page_change_on_incorrect { "开" } else { "关" }
    );
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &ScoreSummary, result_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 考试结束统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 正确: {}/{}", summary.correct_count, summary.total);
    info!("⏭️ 未作答: {}", summary.skipped_count);
    info!("📈 得分: {}%", summary.score_percent);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", result_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
