//! 表格查询语句
//!
//! 查询语言是 SQL 的一个子集（select / where / group by / order by / limit）。

use crate::config::{ExamConfig, SourceFilter};

const QUESTION_COLUMNS: &str = "select A,B,C,D,E,F,G,H where C != 'Question'";

/// 排除题干、选项或答案为空的题目
fn unfilled_exclusion() -> &'static str {
    " AND D != '' AND E != '' AND F != ''"
}

/// 单引号按查询语言的规则加倍
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// 拉取题目的查询
pub fn questions_query(config: &ExamConfig) -> String {
    let mut query = QUESTION_COLUMNS.to_string();

    match &config.source_filter {
        SourceFilter::All => {}
        SourceFilter::Chapter(chapter) => {
            query.push_str(" AND B = ");
            query.push_str(&quote(chapter));
        }
        SourceFilter::Explicit(filter) => {
            query.push_str(" AND ");
            query.push_str(filter);
        }
    }

    // 手写条件由用户完全负责
    let explicit = matches!(config.source_filter, SourceFilter::Explicit(_));
    if config.exclude_unfilled_questions && !explicit {
        query.push_str(unfilled_exclusion());
    }

    query
}

/// 章节目录查询（按主题、章节分组计数）
pub fn chapters_query(config: &ExamConfig) -> String {
    let exclusion = if config.exclude_unfilled_questions {
        unfilled_exclusion()
    } else {
        ""
    };
    format!(
        "select A, B, count(C) where (C != '' AND A != 'Book'){} group by A, B order by A, B",
        exclusion
    )
}

/// 追加 limit 子句
pub fn with_limit(query: &str, fetch_size: Option<usize>) -> String {
    match fetch_size {
        Some(n) => format!("{} limit {}", query, n),
        None => query.to_string(),
    }
}
