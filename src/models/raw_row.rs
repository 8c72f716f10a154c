//! 表格原始记录
//!
//! 列顺序固定：A 主题 | B 章节 | C 题号 | D 题干 | E 选项 | F 答案 | G 图片 | H 附加信息

use serde::{Deserialize, Serialize};

/// 题目记录至少需要的列数（A..F）
pub const REQUIRED_COLUMNS: usize = 6;

/// 表格中的一行题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub topic: String,
    pub chapter: String,
    pub question_id: String,
    pub question_text: String,
    /// 所有选项写在同一个单元格里
    pub variants: String,
    /// 逗号分隔的正确答案，例如 "A,C"
    pub answer_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl RawRow {
    /// 按列位置构造记录，列数不足时返回 None
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        if cells.len() < REQUIRED_COLUMNS {
            return None;
        }

        let optional = |idx: usize| {
            cells
                .get(idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            topic: cells[0].clone(),
            chapter: cells[1].clone(),
            question_id: cells[2].trim().to_string(),
            question_text: cells[3].clone(),
            variants: cells[4].clone(),
            answer_key: cells[5].clone(),
            image_url: optional(6),
            extra: optional(7),
        })
    }
}

/// 章节目录中的一项（group by A, B 的结果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub topic: String,
    pub chapter: String,
    pub question_count: usize,
}

impl ChapterSummary {
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        let topic = cells.first()?.clone();
        let chapter = cells.get(1)?.clone();
        // count() 返回的数字可能被格式化成 "12" 或 "12.0"
        let question_count = cells
            .get(2)
            .and_then(|c| c.trim().parse::<f64>().ok())
            .map(|n| n as usize)
            .unwrap_or(0);

        Some(Self {
            topic,
            chapter,
            question_count,
        })
    }
}
