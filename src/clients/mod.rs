//! 数据源客户端
//!
//! - `query` - 拼装表格查询语句
//! - `sheet_client` - 通过 HTTP 读取表格，`SheetSource` 是可替换的数据源接口

pub mod query;
pub mod sheet_client;

pub use sheet_client::{SheetClient, SheetSource};

use crate::config::ExamConfig;
use crate::error::AppResult;
use crate::models::{ChapterSummary, RawRow};
use tracing::{info, warn};

/// 拉取题目行
///
/// 列数不足的行会被跳过并记录警告。
pub async fn fetch_rows<S: SheetSource>(source: &S, config: &ExamConfig) -> AppResult<Vec<RawRow>> {
    let query = query::questions_query(config);
    let cells = source.query(&query, config.fetch_size_hint()).await?;

    let mut rows = Vec::with_capacity(cells.len());
    for (index, row) in cells.iter().enumerate() {
        match RawRow::from_cells(row) {
            Some(raw) => rows.push(raw),
            None => warn!("[第 {} 行] ⚠️ 列数不足 ({}), 已跳过", index + 1, row.len()),
        }
    }

    info!("✓ 拉取到 {} 道题目", rows.len());
    Ok(rows)
}

/// 拉取章节目录（主题、章节、题目数）
pub async fn fetch_chapters<S: SheetSource>(
    source: &S,
    config: &ExamConfig,
) -> AppResult<Vec<ChapterSummary>> {
    let query = query::chapters_query(config);
    let cells = source.query(&query, None).await?;
    Ok(cells.iter().filter_map(|row| ChapterSummary::from_cells(row)).collect())
}
