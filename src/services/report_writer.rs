//! 成绩报告写入服务 - 业务能力层
//!
//! 报告原本复制到剪贴板，这里抽象成 `ClipboardSink`，默认实现写入文件。

use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 接收报告文本的一方（尽力而为，失败由调用方记录）
pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> AppResult<()>;
}

/// 把报告写入文件
pub struct ReportFileWriter {
    result_file_path: String,
}

impl ReportFileWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            result_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.result_file_path
    }
}

impl Default for ReportFileWriter {
    fn default() -> Self {
        Self::with_path("quiz_result.tsv")
    }
}

impl ClipboardSink for ReportFileWriter {
    fn write_text(&self, text: &str) -> AppResult<()> {
        debug!(
            "写入成绩报告: {} | 长度: {}",
            self.result_file_path,
            text.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.result_file_path)
            .map_err(|e| AppError::io_failed(&self.result_file_path, e))?;

        file.write_all(text.as_bytes())
            .map_err(|e| AppError::io_failed(&self.result_file_path, e))?;

        Ok(())
    }
}
